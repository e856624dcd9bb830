use fpl_terminal::fpl_fetch::ManagerPicks;
use fpl_terminal::squad::{SQUAD_ERROR_MARKER, error_row, reconcile_squad};
use fpl_terminal::state::{
    Bucket, LiveStats, Manager, Pick, PlayerDirectory, PlayerInfo, Position,
};

fn manager() -> Manager {
    Manager {
        id: 1001,
        team_name: "Top Spinners".to_string(),
        manager_name: "Alex Tan".to_string(),
        rank: 1,
        rank_sort: 1,
        total_points: 1205,
    }
}

fn directory() -> PlayerDirectory {
    let mut directory = PlayerDirectory::default();
    let players = [
        (100, "Keeper", Some(Position::Gkp)),
        (200, "Back One", Some(Position::Def)),
        (201, "Back Two", Some(Position::Def)),
        (202, "Back Three", Some(Position::Def)),
        (203, "Back Four", Some(Position::Def)),
        (300, "Wing", Some(Position::Mid)),
        (301, "Engine", Some(Position::Mid)),
        (302, "Pivot", Some(Position::Mid)),
        (303, "Creator", Some(Position::Mid)),
        (400, "Striker", Some(Position::Fwd)),
        (500, "Oddball", None),
        (102, "Backup", Some(Position::Gkp)),
        (204, "Sub Back", Some(Position::Def)),
        (304, "Sub Mid", Some(Position::Mid)),
        (402, "Sub Fwd", Some(Position::Fwd)),
    ];
    for (id, name, position) in players {
        directory.insert(
            id,
            PlayerInfo {
                display_name: name.to_string(),
                position,
            },
        );
    }
    directory
}

fn live() -> LiveStats {
    let mut live = LiveStats::default();
    live.insert(100, 6);
    live.insert(300, 12);
    live.insert(400, 9);
    live.insert(301, 9);
    live.insert(304, 7); // benched, should never count
    live
}

fn pick(player_id: u32, slot: u8, multiplier: i32, captain: bool, vice: bool) -> Pick {
    Pick {
        player_id,
        slot,
        multiplier,
        is_captain: captain,
        is_vice_captain: vice,
    }
}

fn full_squad() -> ManagerPicks {
    ManagerPicks {
        picks: vec![
            pick(100, 1, 1, false, false),
            pick(200, 2, 1, false, false),
            pick(201, 3, 1, false, false),
            pick(202, 4, 1, false, false),
            pick(203, 5, 1, false, false),
            pick(300, 6, 2, true, false),
            pick(301, 7, 1, false, true),
            pick(302, 8, 1, false, false),
            pick(303, 9, 1, false, false),
            pick(400, 10, 1, false, false),
            pick(500, 11, 1, false, false),
            pick(102, 12, 0, false, false),
            pick(204, 13, 0, false, false),
            pick(304, 14, 0, false, false),
            pick(402, 15, 0, false, false),
        ],
        official_total: Some(64),
    }
}

#[test]
fn fifteen_picks_yield_fifteen_entries_across_buckets() {
    let row = reconcile_squad(&manager(), 3, &directory(), &live(), &full_squad());
    assert_eq!(row.buckets.total_entries(), 15);
    assert_eq!(row.contributions.len(), 15);
    // 4 bench slots plus the unknown-category starter land in SUBS.
    assert!(row.buckets.get(Bucket::Subs).len() >= 4);
    assert_eq!(row.buckets.get(Bucket::Gkp).len(), 1);
    assert_eq!(row.buckets.get(Bucket::Def).len(), 4);
}

#[test]
fn unknown_category_starter_routes_to_subs_not_dropped() {
    let row = reconcile_squad(&manager(), 3, &directory(), &live(), &full_squad());
    let subs = row.buckets.get(Bucket::Subs);
    assert!(subs.iter().any(|s| s.contains("Oddball")));
    assert_eq!(subs.len(), 5);
}

#[test]
fn captain_contribution_is_doubled_and_tagged() {
    let row = reconcile_squad(&manager(), 3, &directory(), &live(), &full_squad());
    let captain = row
        .contributions
        .iter()
        .find(|c| c.is_captain)
        .expect("captain present");
    assert_eq!(captain.name, "Wing");
    assert_eq!(captain.points, 24);
    assert!(
        row.buckets
            .get(Bucket::Mid)
            .iter()
            .any(|s| s == "Wing (C) (24)")
    );
}

#[test]
fn zero_multiplier_zeroes_bench_contribution() {
    let row = reconcile_squad(&manager(), 3, &directory(), &live(), &full_squad());
    let benched = row
        .contributions
        .iter()
        .find(|c| c.name == "Sub Mid")
        .expect("bench pick recorded");
    assert!(benched.is_on_bench);
    assert_eq!(benched.points, 0);
}

#[test]
fn official_total_wins_over_computed_sum() {
    let row = reconcile_squad(&manager(), 3, &directory(), &live(), &full_squad());
    assert_eq!(row.gw_total_points, 64);
}

#[test]
fn missing_official_total_falls_back_to_starting_xi_sum() {
    let mut picks = full_squad();
    picks.official_total = None;
    let row = reconcile_squad(&manager(), 3, &directory(), &live(), &picks);
    // 6 (keeper) + 12*2 (captain) + 9 (Engine) + 9 (Striker), everyone else 0.
    assert_eq!(row.gw_total_points, 48);
}

#[test]
fn contributions_follow_slot_order() {
    let mut picks = full_squad();
    picks.picks.reverse(); // arrival order must not matter
    let row = reconcile_squad(&manager(), 3, &directory(), &live(), &picks);
    assert_eq!(row.contributions[0].name, "Keeper");
    assert_eq!(row.contributions[14].name, "Sub Fwd");
}

#[test]
fn stale_directory_keeps_the_row_alive() {
    let row = reconcile_squad(
        &manager(),
        3,
        &PlayerDirectory::default(),
        &live(),
        &full_squad(),
    );
    assert_eq!(row.buckets.total_entries(), 15);
    assert!(
        row.contributions
            .iter()
            .all(|c| c.name.starts_with("Unknown Player (ID:"))
    );
    // Unknown positions all fall through to SUBS.
    assert_eq!(row.buckets.get(Bucket::Subs).len(), 15);
}

#[test]
fn error_row_keeps_manager_visible_with_zero_total() {
    let row = error_row(&manager(), 3);
    assert!(row.fetch_failed);
    assert_eq!(row.squad_text(), SQUAD_ERROR_MARKER);
    assert_eq!(row.gw_total_points, 0);
    assert!(row.contributions.is_empty());
}

#[test]
fn squad_text_lists_buckets_in_position_order() {
    let row = reconcile_squad(&manager(), 3, &directory(), &live(), &full_squad());
    let text = row.squad_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("GKP: "));
    assert!(lines[1].starts_with("DEF: "));
    assert!(lines[2].starts_with("MID: "));
    assert!(lines[3].starts_with("FWD: "));
    assert!(lines[4].starts_with("SUBS: "));
}
