use std::collections::{HashMap, VecDeque};

use crate::chart::ManagerSeries;
use crate::layout::TableLayout;

/// Slots 1..=11 are the starting lineup; anything above is the bench.
pub const STARTING_XI_SLOTS: u8 = 11;

const MAX_LOGS: usize = 200;

/// One league entry, as reported by the standings endpoint. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manager {
    pub id: u32,
    pub team_name: String,
    pub manager_name: String,
    pub rank: u32,
    // Server-provided sort key; already breaks rank ties upstream.
    pub rank_sort: u32,
    pub total_points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Gkp,
    Def,
    Mid,
    Fwd,
}

impl Position {
    pub fn from_short_name(name: &str) -> Option<Position> {
        match name {
            "GKP" => Some(Position::Gkp),
            "DEF" => Some(Position::Def),
            "MID" => Some(Position::Mid),
            "FWD" => Some(Position::Fwd),
            _ => None,
        }
    }
}

/// Display bucket for one squad slot. `Subs` doubles as the fallback for
/// unknown position categories so no player is ever dropped from a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Gkp,
    Def,
    Mid,
    Fwd,
    Subs,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Gkp,
        Bucket::Def,
        Bucket::Mid,
        Bucket::Fwd,
        Bucket::Subs,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Gkp => "GKP",
            Bucket::Def => "DEF",
            Bucket::Mid => "MID",
            Bucket::Fwd => "FWD",
            Bucket::Subs => "SUBS",
        }
    }

    /// Bench slots always land in `Subs`, whatever their nominal category.
    pub fn for_pick(slot: u8, position: Option<Position>) -> Bucket {
        if slot > STARTING_XI_SLOTS {
            return Bucket::Subs;
        }
        match position {
            Some(Position::Gkp) => Bucket::Gkp,
            Some(Position::Def) => Bucket::Def,
            Some(Position::Mid) => Bucket::Mid,
            Some(Position::Fwd) => Bucket::Fwd,
            None => Bucket::Subs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerInfo {
    pub display_name: String,
    pub position: Option<Position>,
}

/// Player id → {name, position category}, built once from the global catalog
/// and shared read-only by every reconciliation.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: HashMap<u32, PlayerInfo>,
}

impl PlayerDirectory {
    pub fn insert(&mut self, id: u32, info: PlayerInfo) {
        self.players.insert(id, info);
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Directory staleness must not abort reconciliation, so unknown ids get
    /// a synthetic label instead of an error.
    pub fn display_name(&self, id: u32) -> String {
        self.players
            .get(&id)
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| format!("Unknown Player (ID:{id})"))
    }

    pub fn position(&self, id: u32) -> Option<Position> {
        self.players.get(&id).and_then(|p| p.position)
    }
}

/// Per-player points for one specific gameweek. Never mutated after creation.
#[derive(Debug, Clone, Default)]
pub struct LiveStats {
    points: HashMap<u32, i32>,
}

impl LiveStats {
    pub fn insert(&mut self, player_id: u32, points: i32) {
        self.points.insert(player_id, points);
    }

    pub fn points_for(&self, player_id: u32) -> i32 {
        self.points.get(&player_id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One of the 15 squad slots a manager's picks occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub player_id: u32,
    pub slot: u8,
    // Opaque multiplier from the API: 0 for non-scoring bench, 2 for the
    // captain, possibly higher for captaincy chips.
    pub multiplier: i32,
    pub is_captain: bool,
    pub is_vice_captain: bool,
}

/// Gameweek history line for one manager: per-gameweek and cumulative totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub gameweek: u32,
    pub points: i32,
    pub total_points: i32,
}

/// One pick's point contribution, recorded for every slot (bench included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub name: String,
    pub points: i32,
    pub is_captain: bool,
    pub is_vice_captain: bool,
    pub is_on_bench: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SquadBuckets {
    gkp: Vec<String>,
    def: Vec<String>,
    mid: Vec<String>,
    fwd: Vec<String>,
    subs: Vec<String>,
}

impl SquadBuckets {
    pub fn push(&mut self, bucket: Bucket, entry: String) {
        self.list_mut(bucket).push(entry);
    }

    pub fn get(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::Gkp => &self.gkp,
            Bucket::Def => &self.def,
            Bucket::Mid => &self.mid,
            Bucket::Fwd => &self.fwd,
            Bucket::Subs => &self.subs,
        }
    }

    pub fn total_entries(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.get(*b).len()).sum()
    }

    /// One line per non-empty bucket, in GKP/DEF/MID/FWD/SUBS order.
    pub fn formatted(&self) -> String {
        let lines: Vec<String> = Bucket::ALL
            .iter()
            .filter(|b| !self.get(**b).is_empty())
            .map(|b| format!("{}: {}", b.label(), self.get(*b).join(", ")))
            .collect();
        lines.join("\n")
    }

    fn list_mut(&mut self, bucket: Bucket) -> &mut Vec<String> {
        match bucket {
            Bucket::Gkp => &mut self.gkp,
            Bucket::Def => &mut self.def,
            Bucket::Mid => &mut self.mid,
            Bucket::Fwd => &mut self.fwd,
            Bucket::Subs => &mut self.subs,
        }
    }
}

/// One manager's reconciled squad for one gameweek. Built fresh per render,
/// never persisted.
#[derive(Debug, Clone)]
pub struct SquadRow {
    pub manager: Manager,
    pub gameweek: u32,
    pub buckets: SquadBuckets,
    pub gw_total_points: i32,
    pub contributions: Vec<Contribution>,
    pub fetch_failed: bool,
}

impl SquadRow {
    pub fn squad_text(&self) -> String {
        if self.fetch_failed {
            crate::squad::SQUAD_ERROR_MARKER.to_string()
        } else {
            self.buckets.formatted()
        }
    }
}

/// Final table row, one per manager. Input to the layout engine and exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub rank: u32,
    pub team: String,
    pub manager: String,
    pub gw_total_points: i32,
    pub squad: String,
    pub analysis: String,
}

impl TableRow {
    pub fn cells(&self) -> [String; 6] {
        [
            self.rank.to_string(),
            self.team.clone(),
            self.manager.clone(),
            self.gw_total_points.to_string(),
            self.squad.clone(),
            self.analysis.clone(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Table,
    Chart,
}

pub struct AppState {
    pub screen: Screen,
    pub league_id: u32,
    pub gameweek: u32,
    pub rows: Vec<TableRow>,
    pub layout: TableLayout,
    pub series: Vec<ManagerSeries>,
    pub selected: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(
        league_id: u32,
        gameweek: u32,
        rows: Vec<TableRow>,
        layout: TableLayout,
        series: Vec<ManagerSeries>,
    ) -> Self {
        Self {
            screen: Screen::Table,
            league_id,
            gameweek,
            rows,
            layout,
            series,
            selected: 0,
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn latest_log(&self) -> Option<&str> {
        self.logs.back().map(|s| s.as_str())
    }
}
