//! Interactive TUI dashboard for today's checklists, history and costs.

pub mod app;
mod ui;

use std::io;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use dogflow_core::OpsResult;
use dogflow_db::DocumentStore;

use app::App;

/// Launch the interactive TUI dashboard.
pub fn run_dashboard<S: DocumentStore>(store: S, currency: &str, today: NaiveDate) -> Result<()> {
    let mut app = App::new(store, currency, today);

    // Initial load before touching the terminal so store errors print cleanly.
    app.refresh()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<S: DocumentStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Clear status message on any keypress.
        app.status_message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                app.navigate_back();
                surface(app, |a| a.refresh())?;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true;
            }
            KeyCode::Enter => {
                app.navigate_enter();
                surface(app, |a| a.refresh())?;
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                surface(app, |a| a.toggle_selected())?;
            }
            KeyCode::Char('j') | KeyCode::Down => app.move_down(),
            KeyCode::Char('k') | KeyCode::Up => app.move_up(),
            KeyCode::Tab => {
                app.cycle_view();
                surface(app, |a| a.refresh())?;
            }
            KeyCode::Char('?') => app.show_help(),
            _ => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Run an action, showing recoverable errors in the status bar.
fn surface<S: DocumentStore>(
    app: &mut App<S>,
    action: impl FnOnce(&mut App<S>) -> OpsResult<()>,
) -> Result<()> {
    match action(app) {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(e) => {
            app.status_message = Some(e.to_string());
            Ok(())
        }
    }
}
