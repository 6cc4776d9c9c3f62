use crate::tui::app::App;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use instamon::session::WizardStep;
use std::time::Duration;

pub fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut ratatui::Terminal<B>,
    mut app: App,
) -> Result<App> {
    loop {
        app.on_tick();
        terminal.draw(|f| crate::tui::ui::ui(f, &mut app))?;

        if app.should_quit {
            return Ok(app);
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key.code);
            }
        }
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    if app.session.is_complete() {
        handle_complete_key(app, code);
        return;
    }

    // Tab/BackTab drive the flow on every step so that steps with free-text
    // input keep all printable characters for the buffer.
    match code {
        KeyCode::Tab => {
            app.next_step();
            return;
        }
        KeyCode::BackTab => {
            app.previous_step();
            return;
        }
        KeyCode::Esc => {
            app.quit();
            return;
        }
        KeyCode::Up => {
            app.cursor_up();
            return;
        }
        KeyCode::Down => {
            app.cursor_down();
            return;
        }
        _ => {}
    }

    match app.session.step() {
        WizardStep::SelectServers => handle_select_servers_key(app, code),
        WizardStep::CheckConnectivity => handle_check_connectivity_key(app, code),
        WizardStep::ChooseServices => handle_choose_services_key(app, code),
        WizardStep::ConfigurePaths => handle_configure_paths_key(app, code),
        WizardStep::SetupAlerts => handle_setup_alerts_key(app, code),
        WizardStep::Complete => {}
    }
}

fn handle_select_servers_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Char(' ') => app.toggle_cursor_server(),
        KeyCode::Char('n') | KeyCode::Enter => app.next_step(),
        _ => {}
    }
}

fn handle_check_connectivity_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Char('n') | KeyCode::Enter => app.next_step(),
        KeyCode::Char('p') => app.previous_step(),
        _ => {}
    }
}

fn handle_choose_services_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Left => app.service_col = 0,
        KeyCode::Right => app.service_col = 1,
        KeyCode::Char(' ') => app.toggle_cursor_service(),
        KeyCode::Char('n') | KeyCode::Enter => app.next_step(),
        KeyCode::Char('p') => app.previous_step(),
        _ => {}
    }
}

fn handle_configure_paths_key(app: &mut App, code: KeyCode) {
    match code {
        // Empty submissions are allowed: the path list takes anything.
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => app.pop_input(),
        KeyCode::Char(c) => app.push_input(c),
        _ => {}
    }
}

fn handle_setup_alerts_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => app.pop_input(),
        KeyCode::Left => {
            if app.input_active() {
                app.flip_severity();
            } else {
                app.threshold_col = 0;
            }
        }
        KeyCode::Right => {
            if app.input_active() {
                app.flip_severity();
            } else {
                app.threshold_col = 1;
            }
        }
        KeyCode::Char(' ') => {
            // Space starts a toggle only while the input buffer is empty;
            // mid-word it belongs to the keyword or process name.
            if app.input_active() && !app.input_buffer.is_empty() {
                app.push_input(' ');
            } else {
                app.toggle_cursor_alert();
            }
        }
        KeyCode::Char(c) => {
            if app.input_active() {
                app.push_input(c);
            } else {
                match c {
                    'q' => app.quit(),
                    'k' => app.cursor_up(),
                    'j' => app.cursor_down(),
                    '+' | '=' => app.adjust_threshold(5),
                    '-' => app.adjust_threshold(-5),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

fn handle_complete_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('r') => app.reset_wizard(),
        KeyCode::Char('q') | KeyCode::Enter | KeyCode::Esc => app.quit(),
        _ => {}
    }
}
