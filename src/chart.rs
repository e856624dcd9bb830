use std::collections::HashMap;

use crate::state::HistoryEntry;

/// One manager's cumulative points line, dense over gameweeks 1..=max.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerSeries {
    pub team_name: String,
    /// (gameweek, cumulative total) pairs, ordered by gameweek.
    pub points: Vec<(f64, f64)>,
}

/// Build one dense series per manager from their raw histories. Gameweeks a
/// manager is missing (joined late, blank week in the data) carry the
/// previous cumulative total forward; gaps before their first entry read 0.
pub fn cumulative_series(
    histories: &[(String, Vec<HistoryEntry>)],
    max_gameweek: u32,
) -> Vec<ManagerSeries> {
    histories
        .iter()
        .map(|(team_name, entries)| {
            let by_gameweek: HashMap<u32, i32> = entries
                .iter()
                .map(|e| (e.gameweek, e.total_points))
                .collect();

            let mut points = Vec::with_capacity(max_gameweek as usize);
            let mut last_total = 0;
            for gw in 1..=max_gameweek {
                if let Some(total) = by_gameweek.get(&gw) {
                    last_total = *total;
                }
                points.push((gw as f64, last_total as f64));
            }

            ManagerSeries {
                team_name: team_name.clone(),
                points,
            }
        })
        .collect()
}

/// Axis bounds covering every series: (max gameweek, max cumulative total).
pub fn series_bounds(series: &[ManagerSeries]) -> (f64, f64) {
    let mut max_x = 1.0f64;
    let mut max_y = 0.0f64;
    for s in series {
        for (x, y) in &s.points {
            max_x = max_x.max(*x);
            max_y = max_y.max(*y);
        }
    }
    (max_x, max_y)
}
