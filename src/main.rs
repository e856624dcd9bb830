use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph};

use fpl_terminal::chart::{self, ManagerSeries};
use fpl_terminal::export;
use fpl_terminal::fpl_fetch::{self, HISTORY_SAMPLE_CAP, ROSTER_CAP};
use fpl_terminal::http_client::{FplClient, RetryPolicy};
use fpl_terminal::layout::{self, LayoutParams, TABLE_HEADERS};
use fpl_terminal::narrate;
use fpl_terminal::squad;
use fpl_terminal::state::{
    AppState, HistoryEntry, LiveStats, Manager, PlayerDirectory, Screen, TableRow,
};

// Pauses between per-manager requests, purely to respect upstream rate
// limits. Tunable via FPL_HISTORY_PAUSE_MS / FPL_PICKS_PAUSE_MS.
const HISTORY_PAUSE_MS: u64 = 100;
const PICKS_PAUSE_MS: u64 = 500;

const SERIES_COLORS: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
    Color::Blue,
    Color::LightGreen,
    Color::LightMagenta,
];

struct PipelineOutput {
    gameweek: u32,
    rows: Vec<TableRow>,
    series: Vec<ManagerSeries>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let league_id = env_parse::<u32>("FPL_LEAGUE_ID")
        .context("FPL_LEAGUE_ID must be set to your classic mini-league id")?;
    let headless = std::env::args().any(|arg| arg == "--headless");

    let mut params = LayoutParams::default();
    if let Some(width) = env_parse::<usize>("FPL_WRAP_WIDTH") {
        params.analysis_wrap_width = width.max(10);
    }
    let history_pause =
        Duration::from_millis(env_parse("FPL_HISTORY_PAUSE_MS").unwrap_or(HISTORY_PAUSE_MS));
    let picks_pause =
        Duration::from_millis(env_parse("FPL_PICKS_PAUSE_MS").unwrap_or(PICKS_PAUSE_MS));

    let client = FplClient::new(RetryPolicy::default())?;
    let mut data = run_pipeline(&client, league_id, history_pause, picks_pause)?;

    layout::wrap_analysis(&mut data.rows, &params);
    let table_layout = layout::compute_table_layout(&data.rows, &params);

    let csv_path = PathBuf::from(format!("fpl_squad_analysis_gw{}.csv", data.gameweek));
    export::write_csv(&csv_path, &data.rows)?;
    println!("Saved {}", csv_path.display());

    let xlsx_path = PathBuf::from(format!("fpl_squad_analysis_gw{}.xlsx", data.gameweek));
    export::write_xlsx(&xlsx_path, &data.rows, data.gameweek)?;
    println!("Saved {}", xlsx_path.display());

    if headless {
        return Ok(());
    }

    let mut state = AppState::new(league_id, data.gameweek, data.rows, table_layout, data.series);
    state.push_log(format!("Exports saved: {}", csv_path.display()));
    run_tui(state)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.parse().ok())
}

/// Sequential fetch pipeline: directory and roster once, one history pass
/// (shared by the gameweek resolver and the chart), live stats once, then
/// picks per manager. Only the roster and the gameweek resolution are hard
/// stops; everything else degrades to defaults.
fn run_pipeline(
    client: &FplClient,
    league_id: u32,
    history_pause: Duration,
    picks_pause: Duration,
) -> Result<PipelineOutput> {
    println!("Fetching global player data...");
    let directory = match fpl_fetch::fetch_player_directory(client) {
        Ok(directory) => {
            println!("Fetched {} players.", directory.len());
            directory
        }
        Err(err) => {
            eprintln!("[WARN] player directory unavailable: {err:#}");
            PlayerDirectory::default()
        }
    };

    println!("Fetching standings for league {league_id}...");
    let managers = fpl_fetch::fetch_league_managers(client, league_id)
        .context("league standings are required")?;
    if managers.is_empty() {
        bail!("league {league_id} returned no managers");
    }
    let managers: Vec<Manager> = managers.into_iter().take(ROSTER_CAP).collect();
    println!("Fetched {} managers.", managers.len());

    println!("Fetching manager histories...");
    let mut histories: Vec<(String, Vec<HistoryEntry>)> = Vec::new();
    for manager in managers.iter().take(HISTORY_SAMPLE_CAP) {
        let history = match fpl_fetch::fetch_manager_history(client, manager.id) {
            Ok(history) => history,
            Err(err) => {
                eprintln!("[WARN] history for manager {}: {err:#}", manager.id);
                Vec::new()
            }
        };
        histories.push((manager.team_name.clone(), history));
        thread::sleep(history_pause);
    }

    let gameweek =
        fpl_fetch::resolve_active_gameweek(histories.iter().map(|(_, h)| h.as_slice()))
            .context("no active gameweeks found for any sampled manager")?;
    println!("Resolved active gameweek: GW{gameweek}");

    let live = match fpl_fetch::fetch_gameweek_live(client, gameweek) {
        Ok(live) => {
            println!("Fetched live points for {} players.", live.len());
            live
        }
        Err(err) => {
            eprintln!("[WARN] live data for GW{gameweek} unavailable: {err:#}");
            LiveStats::default()
        }
    };

    let mut rows = Vec::with_capacity(managers.len());
    for manager in &managers {
        println!("  Fetching squad for {} (GW{gameweek})...", manager.team_name);
        let squad_row = match fpl_fetch::fetch_manager_picks(client, manager.id, gameweek) {
            Ok(picks) => squad::reconcile_squad(manager, gameweek, &directory, &live, &picks),
            Err(err) => {
                eprintln!("  [WARN] squad for manager {}: {err:#}", manager.id);
                squad::error_row(manager, gameweek)
            }
        };
        let analysis = narrate::narrate_gameweek(squad_row.gw_total_points, &squad_row.contributions);
        rows.push(TableRow {
            rank: manager.rank,
            team: manager.team_name.clone(),
            manager: manager.manager_name.clone(),
            gw_total_points: squad_row.gw_total_points,
            squad: squad_row.squad_text(),
            analysis,
        });
        thread::sleep(picks_pause);
    }

    let series = chart::cumulative_series(&histories, gameweek);
    Ok(PipelineOutput {
        gameweek,
        rows,
        series,
    })
}

// ---------------- TUI ----------------

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Table,
            KeyCode::Char('2') => self.state.screen = Screen::Chart,
            KeyCode::Tab => {
                self.state.screen = match self.state.screen {
                    Screen::Table => Screen::Chart,
                    Screen::Chart => Screen::Table,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn run_tui(state: AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("terminal ui failed")
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Table => render_table(frame, chunks[1], &app.state),
        Screen::Chart => render_chart(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Table => "Squads",
        Screen::Chart => "Standings",
    };
    format!(
        "FPL TERMINAL | League {} | GW{} | {}",
        state.league_id, state.gameweek, screen
    )
}

fn footer_text(state: &AppState) -> String {
    let hints = match state.screen {
        Screen::Table => "1 Squads | 2 Standings | j/k/↑/↓ Scroll | ? Help | q Quit",
        Screen::Chart => "1 Squads | 2 Standings | ? Help | q Quit",
    };
    match state.latest_log() {
        Some(log) => format!("{hints} | {log}"),
        None => hints.to_string(),
    }
}

fn render_table(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.rows.is_empty() {
        let empty =
            Paragraph::new("No manager rows").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = column_constraints(&state.layout.column_widths, area.width);
    render_table_header(frame, sections[0], &widths);

    let list_area = sections[1];
    if list_area.height == 0 {
        return;
    }

    // The selected row scrolls to the top; rows below fill the remaining
    // height at their content-derived line counts.
    let start = state.selected.min(state.rows.len() - 1);
    let mut y = list_area.y;
    for (idx, row) in state.rows.iter().enumerate().skip(start) {
        let height = (layout::row_line_count(row) as u16).min(list_area.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        let row_area = Rect {
            x: list_area.x,
            y,
            width: list_area.width,
            height,
        };
        y += height;

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths.clone())
            .split(row_area);
        for (col, cell) in row.cells().iter().enumerate() {
            let paragraph = Paragraph::new(cell.clone()).style(row_style);
            frame.render_widget(paragraph, cols[col]);
        }
    }
}

fn render_table_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths.to_vec())
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);
    for (col, header) in TABLE_HEADERS.iter().enumerate() {
        frame.render_widget(Paragraph::new(*header).style(style), cols[col]);
    }
}

/// Turn the layout engine's width fractions into terminal constraints. The
/// last column absorbs the rounding remainder.
fn column_constraints(widths: &[f64], total_width: u16) -> Vec<Constraint> {
    let mut constraints: Vec<Constraint> = widths
        .iter()
        .map(|w| Constraint::Length((w * total_width as f64).round() as u16))
        .collect();
    if let Some(last) = constraints.last_mut() {
        *last = Constraint::Min(10);
    }
    constraints
}

fn render_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.series.is_empty() {
        let empty =
            Paragraph::new("No history data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let (max_x, max_y) = chart::series_bounds(&state.series);
    let datasets: Vec<Dataset> = state
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            Dataset::default()
                .name(series.team_name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(&series.points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Cumulative points by gameweek"),
        )
        .x_axis(
            Axis::default()
                .title("Gameweek")
                .bounds([1.0, max_x.max(2.0)])
                .labels(vec!["1".into(), format!("{}", max_x as u32).into()]),
        )
        .y_axis(
            Axis::default()
                .title("Points")
                .bounds([0.0, max_y.max(1.0)])
                .labels(vec!["0".into(), format!("{}", max_y as i64).into()]),
        );
    frame.render_widget(chart, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = area.width.min(52);
    let height = area.height.min(10);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);

    let text = "1      Squad table\n\
                2      Standings chart\n\
                Tab    Switch screen\n\
                j/k    Scroll table rows\n\
                ?      Toggle this help\n\
                q      Quit";
    let help = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Keys"),
    );
    frame.render_widget(help, popup);
}
