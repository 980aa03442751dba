use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, FocusPane, InputMode, LoginField, Screen, Theme};
use crate::jurisdiction::LawSystem;

/// The fixed color tokens a theme maps to. Swapping themes swaps these and
/// nothing else.
struct Tokens {
    bg: Color,
    fg: Color,
    accent: Color,
    dim: Color,
    error: Color,
}

fn tokens(theme: Theme) -> Tokens {
    match theme {
        // Navy and amber, the "golden" look
        Theme::Dark => Tokens {
            bg: Color::Rgb(10, 15, 30),
            fg: Color::Rgb(226, 232, 240),
            accent: Color::Rgb(245, 158, 11),
            dim: Color::DarkGray,
            error: Color::Red,
        },
        // Light and green, the "official" look
        Theme::Light => Tokens {
            bg: Color::Rgb(248, 250, 252),
            fg: Color::Rgb(15, 23, 42),
            accent: Color::Rgb(21, 128, 61),
            dim: Color::Gray,
            error: Color::Red,
        },
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let t = tokens(app.theme);

    // Base canvas in the theme colors
    frame.render_widget(
        Block::default().style(Style::default().bg(t.bg).fg(t.fg)),
        area,
    );

    match app.screen {
        Screen::Login => render_login_screen(app, frame, area),
        Screen::Main => render_main_screen(app, frame, area),
    }
}

// Login screen: a centered card, nothing else.

fn render_login_screen(app: &App, frame: &mut Frame, area: Rect) {
    let t = tokens(app.theme);

    let card_width = 54.min(area.width.saturating_sub(4));
    let card_height = 14.min(area.height.saturating_sub(2));
    let card = Rect::new(
        (area.width.saturating_sub(card_width)) / 2,
        (area.height.saturating_sub(card_height)) / 2,
        card_width,
        card_height,
    );

    frame.render_widget(Clear, card);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent))
        .title(Span::styled(" منصة واعد القانونية ", Style::default().fg(t.accent).bold()));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let subtitle = Paragraph::new("نظام التحليل بالذكاء الاصطناعي")
        .style(Style::default().fg(t.dim))
        .centered();
    frame.render_widget(subtitle, Rect::new(inner.x, inner.y, inner.width, 1));

    render_login_field(
        frame,
        Rect::new(inner.x, inner.y + 2, inner.width, 2),
        "اسم المستخدم",
        &app.username_input,
        app.login_field == LoginField::Username,
        &t,
    );

    let masked: String = "*".repeat(app.password_input.chars().count());
    render_login_field(
        frame,
        Rect::new(inner.x, inner.y + 5, inner.width, 2),
        "كلمة المرور",
        &masked,
        app.login_field == LoginField::Password,
        &t,
    );

    if let Some(error) = app.login_error {
        let error_line = Paragraph::new(error)
            .style(Style::default().fg(t.error))
            .centered()
            .wrap(Wrap { trim: true });
        frame.render_widget(
            error_line,
            Rect::new(inner.x, inner.y + 8, inner.width, 2),
        );
    }

    let hint = Line::from(vec![
        Span::styled(" Enter ", Style::default().bg(t.accent).fg(t.bg)),
        Span::raw(" دخول النظام  "),
        Span::styled(" Tab ", Style::default().bg(Color::DarkGray).fg(Color::White)),
        Span::raw(" تبديل الحقل "),
    ]);
    frame.render_widget(
        Paragraph::new(hint).centered(),
        Rect::new(inner.x, inner.y + inner.height.saturating_sub(1), inner.width, 1),
    );

    // Cursor in the focused field's value line
    let (value, row) = match app.login_field {
        LoginField::Username => (app.username_cursor, inner.y + 3),
        LoginField::Password => (app.password_cursor, inner.y + 6),
    };
    let cursor_x = (value as u16).min(inner.width.saturating_sub(1));
    frame.set_cursor_position((inner.x + cursor_x, row));
}

fn render_login_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    t: &Tokens,
) {
    let label_style = if focused {
        Style::default().fg(t.accent).bold()
    } else {
        Style::default().fg(t.dim)
    };
    frame.render_widget(
        Paragraph::new(label).style(label_style),
        Rect::new(area.x, area.y, area.width, 1),
    );
    frame.render_widget(
        Paragraph::new(value).style(Style::default().fg(t.fg)),
        Rect::new(area.x, area.y + 1, area.width, 1),
    );
}

// Main screen

fn render_main_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [nav_area, content_area] =
        Layout::horizontal([Constraint::Length(28), Constraint::Min(0)]).areas(body_area);

    render_jurisdiction_pane(app, frame, nav_area);

    let [details_area, status_area, result_area] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(content_area);

    render_details_pane(app, frame, details_area);
    render_status_line(app, frame, status_area);
    render_result_pane(app, frame, result_area);

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let t = tokens(app.theme);

    let title = Line::from(vec![
        Span::styled(" منصة واعد القانونية ", Style::default().fg(t.accent).bold()),
        Span::styled("المستشار الذكي ", Style::default().fg(t.dim)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(t.dim),
        ),
    ]);

    frame.render_widget(Paragraph::new(title), area);
}

fn render_jurisdiction_pane(app: &mut App, frame: &mut Frame, area: Rect) {
    let t = tokens(app.theme);
    let focused = app.focus == FocusPane::Jurisdiction;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(t.accent)
        } else {
            Style::default().fg(t.dim)
        })
        .title(" النظام القضائي ");

    let items: Vec<ListItem> = LawSystem::all()
        .iter()
        .map(|law| ListItem::new(format!(" {} ", law.label())))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(t.accent)
                .fg(t.bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.jurisdiction_state);
}

fn render_details_pane(app: &App, frame: &mut Frame, area: Rect) {
    let t = tokens(app.theme);
    let editing = app.input_mode == InputMode::Editing;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing || app.focus == FocusPane::Details {
            Style::default().fg(t.accent)
        } else {
            Style::default().fg(t.dim)
        })
        .title(" وقائع الحالة ");
    let inner = block.inner(area);

    let content = if app.details_input.is_empty() && !editing {
        Paragraph::new("اكتب تفاصيل الحالة القانونية هنا...")
            .style(Style::default().fg(t.dim))
    } else {
        Paragraph::new(app.details_input.as_str()).style(Style::default().fg(t.fg))
    };

    frame.render_widget(content.block(block).wrap(Wrap { trim: false }), area);

    if editing && inner.width > 0 {
        // Approximate: the cursor tracks the character offset within the
        // wrapped field
        let offset = app.details_cursor as u16;
        let cursor_x = inner.x + offset % inner.width;
        let cursor_y = inner.y + (offset / inner.width).min(inner.height.saturating_sub(1));
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

fn render_status_line(app: &App, frame: &mut Frame, area: Rect) {
    let t = tokens(app.theme);

    let line = if app.loading {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        Line::from(Span::styled(
            format!(" جاري التحليل الرقمي{dots}"),
            Style::default().fg(t.accent).bold(),
        ))
    } else if app.can_submit() {
        Line::from(Span::styled(
            " جاهز: اضغط s لتوليد التحليل القانوني",
            Style::default().fg(t.accent),
        ))
    } else {
        Line::from(Span::styled(
            " اختر النظام القضائي وأدخل وقائع الحالة",
            Style::default().fg(t.dim),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_result_pane(app: &mut App, frame: &mut Frame, area: Rect) {
    let t = tokens(app.theme);
    let focused = app.focus == FocusPane::Result;

    let sources_len = app
        .result
        .as_ref()
        .map(|r| r.sources.len())
        .unwrap_or(0);

    let (narrative_area, sources_area) = if sources_len > 0 {
        let sources_height = (sources_len as u16 + 2).min(8);
        let [narrative, sources] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(sources_height)]).areas(area);
        (narrative, Some(sources))
    } else {
        (area, None)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(t.accent)
        } else {
            Style::default().fg(t.dim)
        })
        .title(" نتائج الدراسة القانونية ");
    let inner = block.inner(narrative_area);

    // Remembered for scroll clamping
    app.result_height = inner.height;
    app.result_width = inner.width;

    let narrative = match &app.result {
        Some(result) => Paragraph::new(result.text.as_str())
            .style(Style::default().fg(t.fg))
            .wrap(Wrap { trim: false })
            .scroll((app.result_scroll, 0)),
        None => Paragraph::new("لا توجد نتائج بعد. أدخل تفاصيل الحالة ثم اطلب التحليل.")
            .style(Style::default().fg(t.dim))
            .wrap(Wrap { trim: true }),
    };
    frame.render_widget(narrative.block(block), narrative_area);

    if let (Some(sources_area), Some(result)) = (sources_area, &app.result) {
        let lines: Vec<Line> = result
            .sources
            .iter()
            .enumerate()
            .map(|(i, source)| {
                Line::from(vec![
                    Span::styled(format!(" {}. ", i + 1), Style::default().fg(t.accent)),
                    Span::styled(source.title.clone(), Style::default().fg(t.fg).bold()),
                    Span::raw(" "),
                    Span::styled(source.uri.clone(), Style::default().fg(t.dim)),
                ])
            })
            .collect();

        let sources_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.dim))
            .title(" المراجع والروابط ");

        frame.render_widget(Paragraph::new(Text::from(lines)).block(sources_block), sources_area);
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " عرض ",
        InputMode::Editing => " تحرير ",
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let theme_label = match app.theme {
        Theme::Dark => " الوضع الرسمي ",
        Theme::Light => " الوضع الذهبي ",
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];

    match app.input_mode {
        InputMode::Editing => {
            spans.extend(vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" تحليل ", label_style),
                Span::styled(" Alt+Enter ", key_style),
                Span::styled(" سطر جديد ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" إنهاء التحرير ", label_style),
            ]);
        }
        InputMode::Normal => {
            if app.focus == FocusPane::Jurisdiction {
                spans.extend(vec![
                    Span::styled(" j/k ", key_style),
                    Span::styled(" اختيار ", label_style),
                    Span::styled(" Enter ", key_style),
                    Span::styled(" متابعة ", label_style),
                ]);
            } else if app.focus == FocusPane::Result {
                spans.extend(vec![
                    Span::styled(" j/k ", key_style),
                    Span::styled(" تمرير ", label_style),
                    Span::styled(" p ", key_style),
                    Span::styled(" طباعة التقرير ", label_style),
                ]);
            }
            spans.extend(vec![
                Span::styled(" Tab ", key_style),
                Span::styled(" تنقل ", label_style),
                Span::styled(" s ", key_style),
                Span::styled(" تحليل ", label_style),
                Span::styled(" t ", key_style),
                Span::styled(theme_label, label_style),
                Span::styled(" o ", key_style),
                Span::styled(" خروج ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" إنهاء ", label_style),
            ]);
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{AnalysisResult, GeminiClient, SourceLink, DEFAULT_MODEL};
    use crate::session::SessionStore;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(
            GeminiClient::new("test-key", DEFAULT_MODEL),
            SessionStore::at(dir.path()),
        );
        (app, dir)
    }

    fn draw(app: &mut App) {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
    }

    #[test]
    fn login_screen_renders_in_both_themes() {
        let (mut app, _dir) = test_app();
        app.login_error = Some(crate::auth::LOGIN_ERROR);
        draw(&mut app);

        app.toggle_theme();
        draw(&mut app);
    }

    #[test]
    fn main_screen_renders_empty_loading_and_with_result() {
        let (mut app, _dir) = test_app();
        app.screen = Screen::Main;
        draw(&mut app);

        app.loading = true;
        app.animation_frame = 2;
        draw(&mut app);

        app.loading = false;
        app.jurisdiction_state.select(Some(0));
        app.result = Some(AnalysisResult {
            text: "تحليل مفصل للحالة المعروضة.".to_string(),
            sources: vec![SourceLink {
                title: "بوابة الأنظمة".to_string(),
                uri: "https://laws.example".to_string(),
            }],
        });
        draw(&mut app);

        // The render pass records the pane geometry for scroll clamping
        assert!(app.result_width > 0);
        assert!(app.result_height > 0);
    }
}
