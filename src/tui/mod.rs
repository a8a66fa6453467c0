pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{Result, SessionContext};

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

const EXPORT_DIR: &str = "claimlens-export";

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: &mut SessionContext) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Event loop. Every pipeline action runs to completion before the next
/// event is read, so each button press is one synchronous request/response
/// cycle; failures land in the status bar instead of crashing the process.
async fn run_app(terminal: &mut Tui, ctx: &mut SessionContext) -> Result<()> {
    let mut tui_app = TuiApp::new();
    let event_handler = EventHandler::new(Duration::from_millis(100));

    loop {
        terminal.draw(|frame| layout::render(frame, &tui_app, ctx))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = Action::from(key);
                match action {
                    Action::Quit => {
                        tui_app.should_quit = true;
                    }
                    Action::MoveUp => {
                        tui_app.move_up();
                    }
                    Action::MoveDown => {
                        let table_count =
                            ctx.extract.as_ref().map(|e| e.tables.len()).unwrap_or(0);
                        tui_app.move_down(table_count);
                    }
                    Action::NextPane => {
                        tui_app.active_pane = tui_app.active_pane.next();
                    }
                    Action::PrevPane => {
                        tui_app.active_pane = tui_app.active_pane.prev();
                    }
                    Action::Login => {
                        show_busy(terminal, &mut tui_app, ctx, "Logging in...")?;
                        match ctx.login().await {
                            Ok(result) if result.success => {
                                tui_app.set_status("Login successful".into());
                            }
                            Ok(result) => {
                                tui_app.set_status(format!(
                                    "Login failed: {}",
                                    result.reason.unwrap_or_else(|| "unknown".into())
                                ));
                            }
                            Err(e) => tui_app.set_status(format!("Login error: {e}")),
                        }
                        tui_app.busy_message = None;
                    }
                    Action::CheckSession => {
                        show_busy(terminal, &mut tui_app, ctx, "Checking session...")?;
                        match ctx.check_session().await {
                            Ok(result) if result.success => {
                                tui_app.set_status("Session active".into());
                            }
                            Ok(result) => {
                                tui_app.set_status(format!(
                                    "No session: {}",
                                    result.reason.unwrap_or_else(|| "unknown".into())
                                ));
                            }
                            Err(e) => tui_app.set_status(format!("Session check error: {e}")),
                        }
                        tui_app.busy_message = None;
                    }
                    Action::Scrape => {
                        show_busy(terminal, &mut tui_app, ctx, "Scraping dashboard...")?;
                        match ctx.scrape().await {
                            Ok(extract) => {
                                tui_app.reset_view();
                                if extract.is_empty() {
                                    tui_app.set_status("Page fetched but contained no content".into());
                                } else {
                                    tui_app.set_status(format!(
                                        "Scraped: {} chars, {} table(s)",
                                        extract.raw_text.chars().count(),
                                        extract.tables.len()
                                    ));
                                }
                            }
                            Err(e) => tui_app.set_status(format!("Scrape error: {e}")),
                        }
                        tui_app.busy_message = None;
                    }
                    Action::Analyze => {
                        show_busy(terminal, &mut tui_app, ctx, "Analyzing with model...")?;
                        match ctx.analyze().await {
                            Ok(crate::domain::SummaryResult::Structured(_)) => {
                                tui_app.set_status("Analysis complete".into());
                            }
                            Ok(crate::domain::SummaryResult::Raw(_)) => {
                                tui_app.set_status(
                                    "Analysis complete (reply was not valid JSON)".into(),
                                );
                            }
                            Err(e) => tui_app.set_status(format!("Analysis error: {e}")),
                        }
                        tui_app.busy_message = None;
                    }
                    Action::Export => match ctx.export(Path::new(EXPORT_DIR)) {
                        Ok(written) => {
                            tui_app.set_status(format!(
                                "Exported {} file(s) to {EXPORT_DIR}/",
                                written.len()
                            ));
                        }
                        Err(e) => tui_app.set_status(format!("Export error: {e}")),
                    },
                    Action::None => {}
                }
            }
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Redraw once with a busy message so the operator sees what is blocking.
fn show_busy(
    terminal: &mut Tui,
    tui_app: &mut TuiApp,
    ctx: &SessionContext,
    message: &str,
) -> Result<()> {
    tui_app.busy_message = Some(message.to_string());
    terminal.draw(|frame| layout::render(frame, tui_app, ctx))?;
    Ok(())
}
