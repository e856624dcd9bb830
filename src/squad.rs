use crate::fpl_fetch::ManagerPicks;
use crate::state::{
    Bucket, Contribution, LiveStats, Manager, Pick, PlayerDirectory, STARTING_XI_SLOTS,
    SquadBuckets, SquadRow,
};

/// Squad cell text for a manager whose picks could not be fetched.
pub const SQUAD_ERROR_MARKER: &str = "Error fetching squad data.";

/// Merge one manager's 15 picks with the player directory and the gameweek's
/// live stats into a positioned squad row.
///
/// Picks are walked in slot order. Missing directory entries fall back to a
/// synthetic label, missing live stats to 0 points; neither aborts the row.
/// The official entry-history total wins over the computed sum whenever the
/// API reports one.
pub fn reconcile_squad(
    manager: &Manager,
    gameweek: u32,
    directory: &PlayerDirectory,
    live: &LiveStats,
    picks: &ManagerPicks,
) -> SquadRow {
    let mut sorted: Vec<&Pick> = picks.picks.iter().collect();
    sorted.sort_by_key(|p| p.slot);

    let mut buckets = SquadBuckets::default();
    let mut contributions = Vec::with_capacity(sorted.len());
    let mut starting_xi_total = 0;

    for pick in sorted {
        let name = directory.display_name(pick.player_id);
        let position = directory.position(pick.player_id);
        let is_on_bench = pick.slot > STARTING_XI_SLOTS;

        // Multiplier 0 zeroes the contribution regardless of live points.
        let points = live.points_for(pick.player_id) * pick.multiplier;

        let designation = if pick.is_captain {
            " (C)"
        } else if pick.is_vice_captain {
            " (VC)"
        } else {
            ""
        };
        buckets.push(
            Bucket::for_pick(pick.slot, position),
            format!("{name}{designation} ({points})"),
        );

        if !is_on_bench {
            starting_xi_total += points;
        }

        // Every pick is recorded, bench included, for the narrator.
        contributions.push(Contribution {
            name,
            points,
            is_captain: pick.is_captain,
            is_vice_captain: pick.is_vice_captain,
            is_on_bench,
        });
    }

    let gw_total_points = picks.official_total.unwrap_or(starting_xi_total);

    SquadRow {
        manager: manager.clone(),
        gameweek,
        buckets,
        gw_total_points,
        contributions,
        fetch_failed: false,
    }
}

/// Placeholder row for a manager whose picks fetch failed. One manager's
/// failure must not block the rest of the batch.
pub fn error_row(manager: &Manager, gameweek: u32) -> SquadRow {
    SquadRow {
        manager: manager.clone(),
        gameweek,
        buckets: SquadBuckets::default(),
        gw_total_points: 0,
        contributions: Vec::new(),
        fetch_failed: true,
    }
}
