use crate::state::Contribution;

// Captain scores above this read as excellent.
const CAPTAIN_EXCELLENT_OVER: i32 = 10;
// Non-captain starters above this get named as support.
const SUPPORT_OVER: i32 = 8;
const SUPPORT_NAMES: usize = 2;
// Half-open tiers: 60 and 40 are inclusive on the lower bound.
const VERY_GOOD_MIN: i32 = 60;
const SOLID_MIN: i32 = 40;

/// Short templated summary of one manager's gameweek: a captain sentence, a
/// supporting-cast sentence and an overall sentence, joined by single spaces.
pub fn narrate_gameweek(gw_total_points: i32, contributions: &[Contribution]) -> String {
    [
        captain_sentence(contributions),
        support_sentence(contributions),
        overall_sentence(gw_total_points),
    ]
    .join(" ")
}

fn captain_sentence(contributions: &[Contribution]) -> String {
    // Exactly one captain should exist; the fallback sentence covers upstream
    // data that violates that.
    let Some(captain) = contributions.iter().find(|c| c.is_captain) else {
        return "No captain found.".to_string();
    };
    let points = captain.points;
    if points > CAPTAIN_EXCELLENT_OVER {
        format!("Captain {} ({points} pts) was excellent!", captain.name)
    } else if points > 0 {
        format!("Captain {} ({points} pts) contributed.", captain.name)
    } else {
        format!("Captain {} underperformed ({points} pts).", captain.name)
    }
}

fn support_sentence(contributions: &[Contribution]) -> String {
    let mut starters: Vec<&Contribution> = contributions
        .iter()
        .filter(|c| !c.is_captain && !c.is_on_bench)
        .collect();
    // Stable sort: ties keep their original slot order.
    starters.sort_by(|a, b| b.points.cmp(&a.points));

    let top: Vec<String> = starters
        .iter()
        .take(SUPPORT_NAMES)
        .filter(|c| c.points > SUPPORT_OVER)
        .map(|c| format!("{} ({} pts)", c.name, c.points))
        .collect();

    if top.is_empty() {
        "The rest of the squad was modest.".to_string()
    } else {
        format!("Supported by {}.", top.join(", "))
    }
}

fn overall_sentence(gw_total_points: i32) -> String {
    if gw_total_points >= VERY_GOOD_MIN {
        "A very good week overall!".to_string()
    } else if gw_total_points >= SOLID_MIN {
        "A solid points haul this week.".to_string()
    } else {
        "Needs improvement next week.".to_string()
    }
}
