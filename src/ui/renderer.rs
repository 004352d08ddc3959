use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::app::ui_state::{NotificationKind, Screen};
use crate::core::app::{App, OverflowContent, OverflowPanel};
use crate::ui::layout::LayoutEngine;
use crate::ui::sections::OverflowKind;
use crate::utils::scroll::ScrollCalculator;

/// Input rows shown before the box starts scrolling.
const MAX_INPUT_ROWS: u16 = 5;

const SUGGESTIONS: &[&str] = &[
    "What goes with white sneakers?",
    "Show me similar items to a denim jacket",
    "Find something to match a linen shirt",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub title: Rect,
    pub transcript: Rect,
    pub panel: Option<Rect>,
    pub status: Rect,
    pub input: Rect,
}

pub fn input_rows(app: &App) -> u16 {
    (app.ui.textarea.lines().len() as u16).clamp(1, MAX_INPUT_ROWS)
}

/// Split the frame; shared by drawing and the scroll math.
pub fn screen_areas(area: Rect, app: &App) -> ScreenAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(input_rows(app) + 2), // +2 for borders
        ])
        .split(area);

    let (transcript, panel) = if app.ui.overflow.is_open() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        (columns[0], Some(columns[1]))
    } else {
        (rows[1], None)
    };

    ScreenAreas {
        title: rows[0],
        transcript,
        panel,
        status: rows[2],
        input: rows[3],
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    let areas = screen_areas(f.area(), app);
    let theme = &app.ui.theme;

    let title = format!(
        "OutfitMatch v{} • {} mode • Logging: {}",
        env!("CARGO_PKG_VERSION"),
        app.session.mode(),
        app.session.logging.get_status_string()
    );
    f.render_widget(
        Paragraph::new(Span::styled(title, theme.title_style)),
        areas.title,
    );

    match app.ui.screen {
        Screen::Landing => render_landing(f, app, areas.transcript),
        Screen::Chat => render_transcript(f, app, areas.transcript),
    }

    if let (Some(panel), OverflowPanel::Open { content, selected }) =
        (areas.panel, &app.ui.overflow)
    {
        render_overflow_panel(f, app, panel, content, *selected);
    }

    f.render_widget(Paragraph::new(status_line(app)), areas.status);
    render_input(f, app, areas.input);
}

fn render_landing(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("OutfitMatch", theme.card_title_style)),
        Line::from(Span::styled(
            "Describe a look or attach a photo to get outfit ideas.",
            theme.assistant_text_style,
        )),
        Line::from(""),
        Line::from(Span::styled("Try:", theme.muted_style)),
    ];
    lines.extend(
        SUGGESTIONS
            .iter()
            .map(|s| Line::from(Span::styled(format!("“{s}”"), theme.action_style))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "/image <path> attaches a photo • /help lists commands",
        theme.muted_style,
    )));

    let top = area.height.saturating_sub(lines.len() as u16) / 3;
    let body = Rect {
        y: area.y + top,
        height: area.height.saturating_sub(top),
        ..area
    };
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        body,
    );
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let layout = LayoutEngine::layout_messages(
        &app.ui.messages,
        &app.ui.theme,
        area.width,
        app.ui.focus,
    );
    let max_offset = ScrollCalculator::max_scroll_offset(layout.lines.len(), area.height);
    let scroll_offset = if app.ui.auto_scroll {
        max_offset
    } else {
        app.ui.scroll_offset.min(max_offset)
    };

    f.render_widget(
        Paragraph::new(layout.lines).scroll((scroll_offset, 0)),
        area,
    );
}

fn render_overflow_panel(
    f: &mut Frame,
    app: &App,
    area: Rect,
    content: &OverflowContent,
    selected: usize,
) {
    let theme = &app.ui.theme;
    let kind = content.kind();
    let title = format!(
        " All {} ({}) ",
        kind.noun(content.len()),
        content.len()
    );
    let hint = match kind {
        OverflowKind::Products => " ↑/↓ select • m match • s similar • Esc close ",
        OverflowKind::Posts => " ↑/↓ select • Esc close ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border_style)
        .title(Span::styled(title, theme.card_title_style))
        .title_bottom(Span::styled(hint, theme.muted_style));

    let inner_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut selected_line = 0usize;

    let mut push_entry = |lines: &mut Vec<Line<'static>>,
                          index: usize,
                          heading: Vec<Span<'static>>,
                          details: Vec<String>| {
        let is_selected = index == selected;
        if is_selected {
            selected_line = lines.len();
        }
        let marker = if is_selected { "› " } else { "  " };
        let mut spans = vec![Span::raw(marker)];
        spans.extend(heading);
        let mut line = Line::from(spans);
        if is_selected {
            line = line.style(theme.selected_style);
        }
        lines.push(line);
        if is_selected {
            for detail in details {
                for row in ScrollCalculator::wrap_text(&detail, inner_width.saturating_sub(4)) {
                    lines.push(Line::from(vec![
                        Span::raw("    "),
                        Span::styled(row, theme.muted_style),
                    ]));
                }
            }
        }
    };

    match content {
        OverflowContent::Products(products) => {
            for (index, product) in products.iter().enumerate() {
                let heading = vec![
                    Span::styled(product.name.clone(), theme.card_title_style),
                    Span::raw(" "),
                    Span::styled(product.price.clone(), theme.price_style),
                    Span::styled(format!(" · {}", product.shop), theme.muted_style),
                ];
                let mut details = vec![product.description.clone()];
                details.extend(product.link.clone());
                push_entry(&mut lines, index, heading, details);
            }
        }
        OverflowContent::Posts(posts) => {
            for (index, post) in posts.iter().enumerate() {
                let heading = vec![Span::styled(
                    format!("@{}", post.username),
                    theme.card_title_style,
                )];
                let details = vec![post.caption.clone(), post.link.clone()];
                push_entry(&mut lines, index, heading, details);
            }
        }
    }

    let visible = area.height.saturating_sub(2);
    let offset = ScrollCalculator::scroll_into_view(0, selected_line as u16, visible);
    f.render_widget(
        Paragraph::new(lines).block(block).scroll((offset, 0)),
        area,
    );
}

fn pulse_symbol(started: Instant) -> &'static str {
    let elapsed = started.elapsed().as_millis() as f32 / 1000.0;
    let phase = (elapsed * 2.0) % 2.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
    if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

fn status_line(app: &App) -> Line<'static> {
    let theme = &app.ui.theme;
    if let Some(notification) = &app.ui.notification {
        let style = match notification.kind {
            NotificationKind::Info => theme.info_style,
            NotificationKind::Error => theme.error_style,
        };
        return Line::from(Span::styled(notification.message.clone(), style));
    }
    if app.session.request.is_pending() {
        return Line::from(vec![
            Span::styled(
                pulse_symbol(app.ui.pulse_start),
                theme.pending_indicator_style,
            ),
            Span::styled(
                " Finding recommendations… (Esc to cancel)",
                theme.muted_style,
            ),
        ]);
    }
    let hint = if app.ui.focus.is_some() {
        "Enter: activate • Tab/Shift+Tab: move • Esc: back to typing"
    } else if app.ui.screen == Screen::Chat {
        "Enter: send • Tab: browse cards • PgUp/PgDn: scroll • /help"
    } else {
        "Enter: send • Alt+Enter: new line • Ctrl+C: quit"
    };
    Line::from(Span::styled(hint, theme.muted_style))
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let mut title = vec![Span::styled(" Message ", theme.input_title_style)];
    if let Some(image) = &app.session.pending_image {
        title.push(Span::styled(
            format!("[image: {}] ", image.file_name),
            theme.action_style,
        ));
    }

    let border_style = if app.ui.focus.is_some() || app.ui.overflow.is_open() {
        theme.muted_style
    } else {
        theme.input_border_style
    };

    let mut textarea = app.ui.textarea.clone();
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Line::from(title)),
    );
    textarea.set_style(theme.input_text_style);
    textarea.set_cursor_line_style(theme.input_cursor_line_style);
    textarea.set_cursor_style(if app.ui.focus.is_some() {
        Style::default()
    } else {
        theme.input_cursor_style
    });
    f.render_widget(&textarea, area);
}
