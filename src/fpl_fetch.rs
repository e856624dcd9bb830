use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_client::FplClient;
use crate::state::{
    HistoryEntry, LiveStats, Manager, Pick, PlayerDirectory, PlayerInfo, Position,
};

const FPL_BASE_URL: &str = "https://fantasy.premierleague.com/api";

/// One page of standings is plenty for a mini-league; rows beyond this are
/// ignored.
pub const ROSTER_CAP: usize = 20;
/// How many managers' histories to sample when resolving the active gameweek.
pub const HISTORY_SAMPLE_CAP: usize = 20;

// ---------------- Player directory (bootstrap-static) ----------------

pub fn fetch_player_directory(client: &FplClient) -> Result<PlayerDirectory> {
    let body = client
        .get_text(&format!("{FPL_BASE_URL}/bootstrap-static/"))
        .context("bootstrap request failed")?;
    parse_bootstrap_json(&body)
}

#[derive(Debug, Deserialize)]
struct BootstrapResponse {
    #[serde(default)]
    elements: Vec<BootstrapElement>,
    #[serde(default)]
    element_types: Vec<BootstrapElementType>,
}

#[derive(Debug, Deserialize)]
struct BootstrapElement {
    id: u32,
    web_name: String,
    element_type: u32,
}

#[derive(Debug, Deserialize)]
struct BootstrapElementType {
    id: u32,
    singular_name_short: String,
}

pub fn parse_bootstrap_json(raw: &str) -> Result<PlayerDirectory> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(PlayerDirectory::default());
    }
    let data: BootstrapResponse =
        serde_json::from_str(trimmed).context("invalid bootstrap json")?;

    let mut directory = PlayerDirectory::default();
    for element in data.elements {
        let position = data
            .element_types
            .iter()
            .find(|t| t.id == element.element_type)
            .and_then(|t| Position::from_short_name(&t.singular_name_short));
        directory.insert(
            element.id,
            PlayerInfo {
                display_name: element.web_name,
                position,
            },
        );
    }
    Ok(directory)
}

// ---------------- League roster (standings) ----------------

pub fn fetch_league_managers(client: &FplClient, league_id: u32) -> Result<Vec<Manager>> {
    let body = client
        .get_text(&format!(
            "{FPL_BASE_URL}/leagues-classic/{league_id}/standings/"
        ))
        .context("standings request failed")?;
    parse_standings_json(&body)
}

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    #[serde(default)]
    standings: StandingsBlock,
}

#[derive(Debug, Deserialize, Default)]
struct StandingsBlock {
    #[serde(default)]
    results: Vec<StandingsEntry>,
}

#[derive(Debug, Deserialize)]
struct StandingsEntry {
    entry: u32,
    entry_name: String,
    player_name: String,
    total: i32,
    rank: u32,
    rank_sort: u32,
}

pub fn parse_standings_json(raw: &str) -> Result<Vec<Manager>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: StandingsResponse =
        serde_json::from_str(trimmed).context("invalid standings json")?;

    let mut managers: Vec<Manager> = data
        .standings
        .results
        .into_iter()
        .map(|entry| Manager {
            id: entry.entry,
            team_name: entry.entry_name,
            manager_name: entry.player_name,
            rank: entry.rank,
            rank_sort: entry.rank_sort,
            total_points: entry.total,
        })
        .collect();
    // rank_sort is the server's own tie-resolved ordering; keep rank 1 at top.
    managers.sort_by_key(|m| m.rank_sort);
    Ok(managers)
}

// ---------------- Gameweek live stats ----------------

pub fn fetch_gameweek_live(client: &FplClient, gameweek: u32) -> Result<LiveStats> {
    let body = client
        .get_text(&format!("{FPL_BASE_URL}/event/{gameweek}/live/"))
        .with_context(|| format!("live request failed for GW{gameweek}"))?;
    parse_live_json(&body)
}

#[derive(Debug, Deserialize)]
struct LiveResponse {
    #[serde(default)]
    elements: Vec<LiveElement>,
}

#[derive(Debug, Deserialize)]
struct LiveElement {
    id: u32,
    #[serde(default)]
    stats: LiveElementStats,
}

#[derive(Debug, Deserialize, Default)]
struct LiveElementStats {
    // Points scored in this specific gameweek, not the season total.
    #[serde(default)]
    total_points: i32,
}

pub fn parse_live_json(raw: &str) -> Result<LiveStats> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(LiveStats::default());
    }
    let data: LiveResponse = serde_json::from_str(trimmed).context("invalid live json")?;

    let mut stats = LiveStats::default();
    for element in data.elements {
        stats.insert(element.id, element.stats.total_points);
    }
    Ok(stats)
}

// ---------------- Manager history ----------------

pub fn fetch_manager_history(client: &FplClient, manager_id: u32) -> Result<Vec<HistoryEntry>> {
    let body = client
        .get_text(&format!("{FPL_BASE_URL}/entry/{manager_id}/history/"))
        .with_context(|| format!("history request failed for manager {manager_id}"))?;
    parse_history_json(&body)
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    current: Vec<HistoryItem>,
}

#[derive(Debug, Deserialize)]
struct HistoryItem {
    event: u32,
    #[serde(default)]
    points: i32,
    #[serde(default)]
    total_points: i32,
}

pub fn parse_history_json(raw: &str) -> Result<Vec<HistoryEntry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: HistoryResponse = serde_json::from_str(trimmed).context("invalid history json")?;
    Ok(data
        .current
        .into_iter()
        .map(|item| HistoryEntry {
            gameweek: item.event,
            points: item.points,
            total_points: item.total_points,
        })
        .collect())
}

/// Most recently completed gameweek across the sampled histories. `None`
/// when every history is empty; callers must treat that as a hard stop
/// rather than defaulting to gameweek 1.
pub fn resolve_active_gameweek<'a, I>(histories: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a [HistoryEntry]>,
{
    let max = histories
        .into_iter()
        .flat_map(|history| history.iter().map(|entry| entry.gameweek))
        .max();
    match max {
        Some(gw) if gw > 0 => Some(gw),
        _ => None,
    }
}

// ---------------- Manager picks ----------------

/// Raw 15-slot squad for one manager and gameweek, plus the API's own
/// authoritative total for that gameweek when it reports one.
#[derive(Debug, Clone, Default)]
pub struct ManagerPicks {
    pub picks: Vec<Pick>,
    pub official_total: Option<i32>,
}

pub fn fetch_manager_picks(
    client: &FplClient,
    manager_id: u32,
    gameweek: u32,
) -> Result<ManagerPicks> {
    let body = client
        .get_text(&format!(
            "{FPL_BASE_URL}/entry/{manager_id}/event/{gameweek}/picks/"
        ))
        .with_context(|| format!("picks request failed for manager {manager_id} GW{gameweek}"))?;
    parse_picks_json(&body)
}

#[derive(Debug, Deserialize)]
struct PicksResponse {
    #[serde(default)]
    picks: Vec<PickEntry>,
    entry_history: Option<PicksEntryHistory>,
}

#[derive(Debug, Deserialize)]
struct PickEntry {
    element: u32,
    position: u8,
    #[serde(default)]
    multiplier: i32,
    #[serde(default)]
    is_captain: bool,
    #[serde(default)]
    is_vice_captain: bool,
}

#[derive(Debug, Deserialize)]
struct PicksEntryHistory {
    points: i32,
}

pub fn parse_picks_json(raw: &str) -> Result<ManagerPicks> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ManagerPicks::default());
    }
    let data: PicksResponse = serde_json::from_str(trimmed).context("invalid picks json")?;

    Ok(ManagerPicks {
        picks: data
            .picks
            .into_iter()
            .map(|entry| Pick {
                player_id: entry.element,
                slot: entry.position,
                multiplier: entry.multiplier,
                is_captain: entry.is_captain,
                is_vice_captain: entry.is_vice_captain,
            })
            .collect(),
        official_total: data.entry_history.map(|h| h.points),
    })
}
