//! Transcript layout: render blocks → width-aware terminal lines.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::sections::{render_sections, OverflowKind, ProductAction, RenderBlock};
use super::theme::Theme;
use crate::core::app::ui_state::FocusTarget;
use crate::core::message::{Message, Product, SocialPost};
use crate::utils::scroll::ScrollCalculator;

const INDENT: &str = "  ";
const MAX_CARD_WIDTH: usize = 64;
const POST_GAP: usize = 2;
/// Below this width posts stack in one column.
const MIN_GRID_WIDTH: usize = 40;
const DESCRIPTION_LINES: usize = 2;

/// Result of a layout pass.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub lines: Vec<Line<'static>>,
    /// Line holding the focused element, when one was requested and found.
    pub focus_line: Option<usize>,
}

pub struct LayoutEngine;

impl LayoutEngine {
    /// Lay out every message at `width` columns. The renderer and the scroll
    /// math both consume this; nothing wraps after it.
    pub fn layout_messages(
        messages: &[Message],
        theme: &Theme,
        width: u16,
        focus: Option<FocusTarget>,
    ) -> Layout {
        let mut builder = Builder {
            lines: Vec::new(),
            focus_line: None,
            width: width as usize,
            theme,
            focus,
        };
        for (index, message) in messages.iter().enumerate() {
            builder.message(index, message);
        }

        Layout {
            lines: builder.lines,
            focus_line: builder.focus_line,
        }
    }
}

struct Builder<'t> {
    lines: Vec<Line<'static>>,
    focus_line: Option<usize>,
    width: usize,
    theme: &'t Theme,
    focus: Option<FocusTarget>,
}

impl Builder<'_> {
    fn content_width(&self) -> usize {
        self.width.saturating_sub(INDENT.len()).max(1)
    }

    fn card_width(&self) -> usize {
        self.content_width().clamp(8, MAX_CARD_WIDTH)
    }

    fn message(&mut self, index: usize, message: &Message) {
        let (prefix, prefix_style, text_style) = if message.is_user() {
            ("You", self.theme.user_prefix_style, self.theme.user_text_style)
        } else {
            (
                "Stylist",
                self.theme.assistant_prefix_style,
                self.theme.assistant_text_style,
            )
        };
        self.lines.push(Line::from(Span::styled(prefix, prefix_style)));

        for block in render_sections(message) {
            match block {
                RenderBlock::Text(text) => self.text(&text, text_style),
                RenderBlock::Image(_) => self.lines.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled("[image attached]", self.theme.muted_style),
                ])),
                RenderBlock::Products { items, actions } => {
                    for (product_index, product) in items.iter().enumerate() {
                        self.product_card(index, product_index, product, actions);
                    }
                }
                RenderBlock::Overflow { kind, remaining } => {
                    self.overflow_button(index, kind, remaining)
                }
                RenderBlock::Posts(posts) => self.post_grid(&posts),
                RenderBlock::Styles(styles) => self.lines.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled("Styles: ", self.theme.muted_style),
                    Span::styled(styles.join(", "), self.theme.style_tag_style),
                ])),
            }
        }

        self.lines.push(Line::from(""));
    }

    fn text(&mut self, text: &str, style: Style) {
        for row in ScrollCalculator::wrap_text(text, self.content_width()) {
            self.lines
                .push(Line::from(vec![Span::raw(INDENT), Span::styled(row, style)]));
        }
    }

    fn is_focused(&self, target: FocusTarget) -> bool {
        self.focus == Some(target)
    }

    fn product_card(&mut self, message: usize, index: usize, product: &Product, actions: bool) {
        let inner = self.card_width().saturating_sub(4);
        let theme = self.theme;
        let mut body: Vec<Vec<Span<'static>>> = Vec::new();

        body.push(vec![
            Span::styled(product.price.clone(), theme.price_style),
            Span::styled(format!(" · {}", product.shop), theme.muted_style),
        ]);
        let description = ScrollCalculator::wrap_text(&product.description, inner);
        for row in description
            .into_iter()
            .filter(|row| !row.is_empty())
            .take(DESCRIPTION_LINES)
        {
            body.push(vec![Span::styled(row, theme.muted_style)]);
        }
        if let Some(link) = product.link.as_deref().filter(|l| !l.is_empty()) {
            body.push(vec![Span::styled(link.to_string(), theme.action_style)]);
        }

        let mut action_row = None;
        if actions {
            let mut spans = Vec::new();
            for (n, action) in ProductAction::ALL.into_iter().enumerate() {
                if n > 0 {
                    spans.push(Span::raw(" "));
                }
                let target = FocusTarget::ProductAction {
                    message,
                    product: index,
                    action,
                };
                let style = if self.is_focused(target) {
                    theme.focus_style
                } else {
                    theme.action_style
                };
                spans.push(Span::styled(format!("[{}]", action.label()), style));
            }
            action_row = Some(body.len());
            body.push(spans);
        }

        let start = self.lines.len();
        let card = card_lines(&product.name, body, self.card_width(), theme);
        if let Some(row) = action_row {
            let focused = ProductAction::ALL.into_iter().any(|action| {
                self.is_focused(FocusTarget::ProductAction {
                    message,
                    product: index,
                    action,
                })
            });
            if focused {
                // +1 for the top border.
                self.focus_line = Some(start + row + 1);
            }
        }
        self.lines.extend(card.into_iter().map(indent_line));
    }

    fn overflow_button(&mut self, message: usize, kind: OverflowKind, remaining: usize) {
        let target = FocusTarget::Overflow { message, kind };
        let style = if self.is_focused(target) {
            self.focus_line = Some(self.lines.len());
            self.theme.focus_style
        } else {
            self.theme.action_style
        };
        self.lines.push(Line::from(vec![
            Span::raw(INDENT),
            Span::styled(
                format!("[ View {remaining} more {} ]", kind.noun(remaining)),
                style,
            ),
        ]));
    }

    fn post_grid(&mut self, posts: &[SocialPost]) {
        let content = self.content_width();
        let two_columns = content >= MIN_GRID_WIDTH;
        let column_width = if two_columns {
            ((content - POST_GAP) / 2).min(MAX_CARD_WIDTH / 2 + 8)
        } else {
            self.card_width()
        };

        let cards: Vec<Vec<Line<'static>>> = posts
            .iter()
            .map(|post| self.post_card(post, column_width))
            .collect();

        if !two_columns {
            for card in cards {
                self.lines.extend(card.into_iter().map(indent_line));
            }
            return;
        }

        for pair in cards.chunks(2) {
            let rows = pair.iter().map(Vec::len).max().unwrap_or(0);
            for row in 0..rows {
                let mut spans = vec![Span::raw(INDENT)];
                for (column, card) in pair.iter().enumerate() {
                    if column > 0 {
                        spans.push(Span::raw(" ".repeat(POST_GAP)));
                    }
                    match card.get(row) {
                        Some(line) => spans.extend(line.spans.iter().cloned()),
                        None => spans.push(Span::raw(" ".repeat(column_width))),
                    }
                }
                self.lines.push(Line::from(spans));
            }
        }
    }

    fn post_card(&self, post: &SocialPost, width: usize) -> Vec<Line<'static>> {
        let inner = width.saturating_sub(4);
        let theme = self.theme;
        let mut body = Vec::new();
        let caption = ScrollCalculator::wrap_text(&post.caption, inner);
        for row in caption.into_iter().take(DESCRIPTION_LINES) {
            body.push(vec![Span::styled(row, theme.assistant_text_style)]);
        }
        if !post.link.is_empty() {
            body.push(vec![Span::styled(post.link.clone(), theme.action_style)]);
        }
        card_lines(&format!("@{}", post.username), body, width, theme)
    }
}

fn indent_line(line: Line<'static>) -> Line<'static> {
    let mut spans = Vec::with_capacity(line.spans.len() + 1);
    spans.push(Span::raw(INDENT));
    spans.extend(line.spans);
    Line::from(spans)
}

/// Draw a bordered box `width` columns wide around `body` rows.
fn card_lines(
    title: &str,
    body: Vec<Vec<Span<'static>>>,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let inner = width.saturating_sub(4);
    let border = theme.card_border_style;
    let mut lines = Vec::with_capacity(body.len() + 2);

    let title = truncate_to_width(title, inner.saturating_sub(1));
    let fill = width.saturating_sub(title.width() + 5);
    lines.push(Line::from(vec![
        Span::styled("┌─ ", border),
        Span::styled(title, theme.card_title_style),
        Span::styled(format!(" {}┐", "─".repeat(fill)), border),
    ]));

    for row in body {
        let mut spans = vec![Span::styled("│ ", border)];
        let mut used = 0usize;
        for span in row {
            let remaining = inner.saturating_sub(used);
            if remaining == 0 {
                break;
            }
            let text = truncate_to_width(&span.content, remaining);
            used += text.width();
            spans.push(Span::styled(text, span.style));
        }
        spans.push(Span::raw(" ".repeat(inner.saturating_sub(used))));
        spans.push(Span::styled(" │", border));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled(
        format!("└{}┘", "─".repeat(width.saturating_sub(2))),
        border,
    )));
    lines
}

/// Cut `text` to at most `max` columns, marking the cut with an ellipsis.
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    if max > 0 {
        out.push('…');
    }
    out
}
