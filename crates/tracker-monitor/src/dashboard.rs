//! TUI Dashboard using ratatui.

use chrono::{DateTime, Local, Utc};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracker_indicators::RsiZone;

use crate::poller::ReloadRequest;
use crate::snapshot::{RsiParams, SnapshotRow, TABLE_HEADERS};

/// Dashboard state.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub rows: Vec<SnapshotRow>,
    pub provider_name: String,
    pub refresh_secs: u64,
    /// Thresholds the rows were classified with
    pub rsi: RsiParams,
}

impl DashboardState {
    /// Latest update time across all quote rows.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.rows
            .iter()
            .filter_map(|r| match r {
                SnapshotRow::Quote(q) => Some(q.updated),
                SnapshotRow::Error { .. } => None,
            })
            .max()
    }

    /// Count rows in `zone`.
    pub fn count_zone(&self, zone: RsiZone) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, SnapshotRow::Quote(q) if q.zone == zone))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, SnapshotRow::Error { .. }))
            .count()
    }
}

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Select(usize),
    Reload(ReloadRequest),
    Ignore,
}

fn key_action(code: KeyCode, selected: usize, rows: &[SnapshotRow]) -> KeyAction {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Up | KeyCode::Char('k') => KeyAction::Select(selected.saturating_sub(1)),
        KeyCode::Down | KeyCode::Char('j') if !rows.is_empty() => {
            KeyAction::Select((selected + 1).min(rows.len() - 1))
        }
        KeyCode::Char('r') => rows.get(selected).map_or(KeyAction::Ignore, |row| {
            KeyAction::Reload(ReloadRequest::Symbol(row.symbol().to_string()))
        }),
        KeyCode::Char('R') => KeyAction::Reload(ReloadRequest::All),
        _ => KeyAction::Ignore,
    }
}

/// TUI Dashboard.
pub struct Dashboard {
    refresh_ms: u64,
}

impl Dashboard {
    /// Create a new dashboard.
    pub fn new(refresh_ms: u64) -> Self {
        Self { refresh_ms }
    }

    /// Run the dashboard until `q` or `Esc` is pressed.
    ///
    /// `r` passes a reload of the selected symbol to `on_reload`, `R` a
    /// reload of everything.
    pub fn run<F, R>(&self, mut get_state: F, mut on_reload: R) -> io::Result<()>
    where
        F: FnMut() -> DashboardState,
        R: FnMut(ReloadRequest),
    {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal, &mut get_state, &mut on_reload);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop<F, R>(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        get_state: &mut F,
        on_reload: &mut R,
    ) -> io::Result<()>
    where
        F: FnMut() -> DashboardState,
        R: FnMut(ReloadRequest),
    {
        let mut table_state = TableState::default();
        let mut selected = 0;

        loop {
            let state = get_state();
            selected = selected.min(state.rows.len().saturating_sub(1));
            table_state.select((!state.rows.is_empty()).then_some(selected));
            terminal.draw(|f| self.ui(f, &state, &mut table_state))?;

            if event::poll(Duration::from_millis(self.refresh_ms))? {
                if let Event::Key(key) = event::read()? {
                    match key_action(key.code, selected, &state.rows) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Select(row) => selected = row,
                        KeyAction::Reload(request) => on_reload(request),
                        KeyAction::Ignore => {}
                    }
                }
            }
        }
    }

    fn ui(&self, frame: &mut Frame, state: &DashboardState, table_state: &mut TableState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(4), // Stats
                Constraint::Min(8),    // Watchlist
                Constraint::Length(3), // Legend
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0], state);
        self.render_stats(frame, chunks[1], state);
        self.render_watchlist(frame, chunks[2], state, table_state);
        self.render_legend(frame, chunks[3], &state.rsi);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        let header = Paragraph::new(vec![Line::from(vec![
            Span::styled("RSI Tracker", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | "),
            Span::styled(&state.provider_name, Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | every {}s", state.refresh_secs)),
            Span::raw(" | ↑↓ select, 'r' reload, 'R' reload all, 'q' quit"),
        ])])
        .block(Block::default().borders(Borders::ALL).title("System"));
        frame.render_widget(header, area);
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        let last = state
            .last_update()
            .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string());

        let stats = Paragraph::new(vec![Line::from(vec![
            Span::raw("Symbols: "),
            Span::styled(
                format!("{}", state.rows.len()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  Overbought: "),
            Span::styled(
                format!("{}", state.count_zone(RsiZone::Overbought)),
                Style::default().fg(zone_color(RsiZone::Overbought)),
            ),
            Span::raw("  |  Oversold: "),
            Span::styled(
                format!("{}", state.count_zone(RsiZone::Oversold)),
                Style::default().fg(zone_color(RsiZone::Oversold)),
            ),
            Span::raw("  |  Errors: "),
            Span::styled(format!("{}", state.error_count()), Style::default()),
            Span::raw("  |  Last: "),
            Span::styled(last, Style::default()),
        ])])
        .block(Block::default().borders(Borders::ALL).title("Statistics"));
        frame.render_widget(stats, area);
    }

    fn render_watchlist(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &DashboardState,
        table_state: &mut TableState,
    ) {
        let header_cells = TABLE_HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells).height(1);

        let rows = state.rows.iter().map(|row| {
            let [symbol, price, change, change_pct, rsi, status, updated] = row.cells();
            let (change_color, zone_style) = match row {
                SnapshotRow::Quote(q) => (
                    if q.change >= 0.0 {
                        Color::Green
                    } else {
                        Color::Red
                    },
                    Style::default().fg(zone_color(q.zone)),
                ),
                SnapshotRow::Error { .. } => (Color::DarkGray, Style::default().fg(Color::Red)),
            };

            Row::new(vec![
                Cell::from(symbol),
                Cell::from(price),
                Cell::from(change).style(Style::default().fg(change_color)),
                Cell::from(change_pct).style(Style::default().fg(change_color)),
                Cell::from(rsi).style(zone_style),
                Cell::from(status).style(zone_style),
                Cell::from(updated),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(12),
                Constraint::Percentage(14),
                Constraint::Percentage(14),
                Constraint::Percentage(14),
                Constraint::Percentage(10),
                Constraint::Percentage(20),
                Constraint::Percentage(16),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title("Watchlist"));

        frame.render_stateful_widget(table, area, table_state);
    }

    fn render_legend(&self, frame: &mut Frame, area: Rect, rsi: &RsiParams) {
        let [overbought, oversold] = legend_labels(rsi);
        let legend = Paragraph::new(Line::from(vec![
            Span::styled(overbought, Style::default().fg(zone_color(RsiZone::Overbought))),
            Span::raw("  "),
            Span::styled(oversold, Style::default().fg(zone_color(RsiZone::Oversold))),
            Span::raw("  "),
            Span::styled("Neutral", Style::default().fg(zone_color(RsiZone::Neutral))),
        ]))
        .block(Block::default().borders(Borders::ALL).title("RSI"));
        frame.render_widget(legend, area);
    }
}

fn legend_labels(rsi: &RsiParams) -> [String; 2] {
    [
        format!("Overbought (>{})", rsi.overbought),
        format!("Oversold (<{})", rsi.oversold),
    ]
}

fn zone_color(zone: RsiZone) -> Color {
    match zone {
        RsiZone::Overbought => Color::Red,
        RsiZone::Oversold => Color::Green,
        RsiZone::Neutral => Color::Yellow,
    }
}
