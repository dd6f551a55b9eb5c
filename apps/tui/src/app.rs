//! Core TUI application state and event loop.

use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use leadgen_core::RunRequest;
use leadgen_shared::{AppConfig, load_config};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::runner::{RunEvent, spawn_run};
use crate::screens::{Action, ScreenId, Screens};
use crate::widgets::status_bar;

const TABS: [ScreenId; 2] = [ScreenId::Inputs, ScreenId::Leads];

/// Application state.
pub(crate) struct App {
    runtime: Runtime,
    config: AppConfig,
    /// Currently active screen tab.
    pub active_tab: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Status message shown in bottom bar.
    pub status: String,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Per-screen state.
    pub screens: Screens,
    /// Events from the run in flight, if any.
    rx: Option<Receiver<RunEvent>>,
}

impl App {
    pub(crate) fn new(runtime: Runtime) -> Self {
        let (config, status) = match load_config() {
            Ok(config) => (config, "Ready. Press ? for help".to_string()),
            Err(e) => {
                warn!(error = %e, "config load failed, using defaults");
                (AppConfig::default(), format!("Config error ({e}); using defaults"))
            }
        };
        let screens = Screens::new(
            &config.defaults.role_persona,
            &config.defaults.science_context,
        );

        Self {
            runtime,
            config,
            active_tab: 0,
            should_quit: false,
            status,
            show_help: false,
            screens,
            rx: None,
        }
    }

    fn active_screen(&self) -> ScreenId {
        TABS[self.active_tab]
    }

    fn is_running(&self) -> bool {
        self.rx.is_some()
    }

    fn start_run(&mut self, role: String, science: String, offline: bool) {
        if self.is_running() {
            self.status = "A run is already in progress".to_string();
            return;
        }
        info!(role = %role, science = %science, offline, "starting run");
        let request = RunRequest::new(role, science);
        self.rx = Some(spawn_run(&self.runtime, &self.config, request, offline));
        self.status = "Starting pipeline…".to_string();
    }

    /// Drain pending run events without blocking.
    fn poll_run(&mut self) {
        let Some(rx) = &self.rx else {
            return;
        };

        let mut finished = false;
        loop {
            match rx.try_recv() {
                Ok(RunEvent::Phase(phase)) => {
                    self.status = format!("[{:>3}%] {phase}", phase.percent());
                }
                Ok(RunEvent::Enriched { current, total }) => {
                    self.status = format!("Enriching funding data {current}/{total}");
                }
                Ok(RunEvent::Finished(report)) => {
                    self.status = format!(
                        "Done: {} leads ranked in {} ms",
                        report.leads.len(),
                        report.elapsed_ms
                    );
                    self.screens.leads.set_report(*report);
                    self.active_tab = 1;
                    finished = true;
                    break;
                }
                Ok(RunEvent::Failed(msg)) => {
                    self.status = format!("Run failed: {msg}");
                    finished = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.status = "Run ended unexpectedly".to_string();
                    finished = true;
                    break;
                }
            }
        }

        if finished {
            self.rx = None;
        }
    }
}

/// Entry point: set up the terminal, run the event loop, restore the terminal.
pub(crate) fn run() -> Result<()> {
    let runtime = Runtime::new()?;

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, runtime: Runtime) -> Result<()> {
    let mut app = App::new(runtime);

    loop {
        app.poll_run();
        terminal.draw(|f| draw(f, &app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key.code, key.modifiers);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Global keybindings (always active)
    match code {
        KeyCode::Char('q') | KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return;
        }
        // Tab navigation with number keys
        KeyCode::Char(c @ '1'..='2') => {
            app.active_tab = (c as usize) - ('1' as usize);
            app.status = app.active_screen().to_string();
            return;
        }
        KeyCode::Tab => {
            app.active_tab = (app.active_tab + 1) % TABS.len();
            app.status = app.active_screen().to_string();
            return;
        }
        KeyCode::BackTab => {
            app.active_tab = (app.active_tab + TABS.len() - 1) % TABS.len();
            app.status = app.active_screen().to_string();
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Delegate to current screen
    let screen = app.active_screen();
    if let Some(Action::Run {
        role,
        science,
        offline,
    }) = app.screens.handle_key(screen, code, modifiers)
    {
        app.start_run(role, science, offline);
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // Tab bar
    let tab_titles: Vec<Line> = TABS.iter().map(|s| Line::from(s.to_string())).collect();

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" LeadGen "))
        .select(app.active_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, chunks[0]);

    app.screens.draw(app.active_screen(), f, chunks[1]);

    let bar = status_bar(&app.status);
    f.render_widget(bar, chunks[2]);

    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  1-2          Switch to screen"),
        Line::from("  Tab/S-Tab    Next/previous screen"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
        Line::from(""),
        Line::from("Inputs:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  ←/→          Switch between persona and context"),
        Line::from("  ↑/↓ j/k      Choose an entry"),
        Line::from("  o            Toggle PubMed search"),
        Line::from("  Enter / r    Run the pipeline"),
        Line::from(""),
        Line::from("Ranked Leads:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  ↑/↓ j/k      Scroll the table"),
        Line::from("  g / Home     Back to the top"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (press any key to close) ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 60, parent);
        assert!(inner.x >= parent.x && inner.right() <= parent.right());
        assert!(inner.y >= parent.y && inner.bottom() <= parent.bottom());
        assert_eq!(inner.width, 60);
    }
}
