use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, FocusPane, InputMode, LoginField, Screen};
use crate::gemini::AnalysisResult;
use crate::jurisdiction::LawSystem;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.poll_analysis().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global quit, works in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Login => handle_login_key(app, key),
        Screen::Main => match app.input_mode {
            InputMode::Normal => handle_main_normal(app, key),
            InputMode::Editing => handle_details_editing(app, key),
        },
    }
}

/// The login screen is always in text-entry: printable keys go into the
/// focused field, Tab switches fields, Enter submits.
fn handle_login_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
            app.login_field = match app.login_field {
                LoginField::Username => LoginField::Password,
                LoginField::Password => LoginField::Username,
            };
        }
        KeyCode::Enter => app.submit_login(),
        _ => {
            // Typing again after a rejection clears the inline error.
            let edited = match app.login_field {
                LoginField::Username => edit_field(
                    &mut app.username_input,
                    &mut app.username_cursor,
                    key.code,
                ),
                LoginField::Password => edit_field(
                    &mut app.password_input,
                    &mut app.password_cursor,
                    key.code,
                ),
            };
            if edited {
                app.login_error = None;
            }
        }
    }
}

fn handle_main_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Focus cycle: Jurisdiction -> Details -> Result -> Jurisdiction.
        // Focusing the details field drops straight into text entry.
        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusPane::Jurisdiction => FocusPane::Details,
                FocusPane::Details => FocusPane::Result,
                FocusPane::Result => FocusPane::Jurisdiction,
            };
            if app.focus == FocusPane::Details {
                app.input_mode = InputMode::Editing;
                app.details_cursor = app.details_input.chars().count();
            }
        }

        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Jurisdiction => app.jurisdiction_nav_down(),
            FocusPane::Result => app.scroll_result_down(),
            FocusPane::Details => {}
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Jurisdiction => app.jurisdiction_nav_up(),
            FocusPane::Result => app.scroll_result_up(),
            FocusPane::Details => {}
        },

        // Selecting a jurisdiction moves on to the case details
        KeyCode::Enter => {
            if app.focus == FocusPane::Jurisdiction && app.selected_jurisdiction().is_some() {
                app.focus = FocusPane::Details;
                app.input_mode = InputMode::Editing;
                app.details_cursor = app.details_input.chars().count();
            }
        }

        KeyCode::Char('i') => {
            app.focus = FocusPane::Details;
            app.input_mode = InputMode::Editing;
            app.details_cursor = app.details_input.chars().count();
        }

        KeyCode::Char('s') => app.submit_analysis(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('p') => print_report(app),
        KeyCode::Char('o') => app.logout(),

        _ => {}
    }
}

fn handle_details_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.focus = FocusPane::Result;
        }
        // Alt+Enter inserts a line break, plain Enter submits
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            let byte_pos = char_to_byte_index(&app.details_input, app.details_cursor);
            app.details_input.insert(byte_pos, '\n');
            app.details_cursor += 1;
        }
        // Submit straight from the field; inert while a request is out or
        // either field is still empty.
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.submit_analysis();
        }
        code => {
            edit_field(&mut app.details_input, &mut app.details_cursor, code);
        }
    }
}

/// Cursor-aware single-line editing shared by all text fields. Returns true
/// if the key changed the field.
fn edit_field(input: &mut String, cursor: &mut usize, code: KeyCode) -> bool {
    match code {
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
                return true;
            }
        }
        KeyCode::Delete => {
            let char_count = input.chars().count();
            if *cursor < char_count {
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
                return true;
            }
        }
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = input.chars().count();
            *cursor = (*cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            *cursor = 0;
        }
        KeyCode::End => {
            *cursor = input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(input, *cursor);
            input.insert(byte_pos, c);
            *cursor += 1;
            return true;
        }
        _ => {}
    }
    false
}

/// Hand the current result to the host print spooler. The header names the
/// jurisdiction the result was analyzed under, not whatever the list
/// selection moved to since.
fn print_report(app: &App) {
    let Some(result) = &app.result else {
        return;
    };
    let report = build_report(app.analyzed_jurisdiction, result);
    send_to_printer(&report);
}

fn build_report(law_system: Option<LawSystem>, result: &AnalysisResult) -> String {
    let mut report = String::new();

    report.push_str("منصة واعد القانونية\n");
    report.push_str("نتائج الدراسة القانونية\n");
    if let Some(law_system) = law_system {
        report.push_str("النظام القضائي: ");
        report.push_str(law_system.label());
        report.push('\n');
    }
    report.push('\n');
    report.push_str(&result.text);
    report.push('\n');

    if !result.sources.is_empty() {
        report.push_str("\nالمراجع والروابط:\n");
        for (i, source) in result.sources.iter().enumerate() {
            report.push_str(&format!("{}. {} <{}>\n", i + 1, source.title, source.uri));
        }
    }

    report
}

fn send_to_printer(text: &str) {
    match pipe_to_command("lp", text) {
        Ok(status) if !status.success() => tracing::warn!("lp exited with {status}"),
        Ok(_) => {}
        Err(err) => tracing::warn!("Could not spawn lp: {err}"),
    }
}

/// Spawn a command with the text on stdin and reap it.
fn pipe_to_command(program: &str, text: &str) -> std::io::Result<std::process::ExitStatus> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    // stdin is closed at this point, so the child can run to completion
    child.wait()
}
