use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,

    // Cards
    pub card_border_style: Style,
    pub card_title_style: Style,
    pub price_style: Style,
    pub muted_style: Style,
    pub action_style: Style,
    pub focus_style: Style,
    pub style_tag_style: Style,

    // Chrome
    pub title_style: Style,
    pub pending_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub info_style: Style,
    pub error_style: Style,
    pub panel_border_style: Style,
    pub selected_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,
    pub input_cursor_line_style: Style,
}

impl Theme {
    pub fn default_dark() -> Self {
        Theme {
            background_color: Color::Reset,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_prefix_style: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),

            card_border_style: Style::default().fg(Color::DarkGray),
            card_title_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            price_style: Style::default().fg(Color::LightGreen),
            muted_style: Style::default().fg(Color::Gray),
            action_style: Style::default().fg(Color::LightBlue),
            focus_style: Style::default()
                .fg(Color::Black)
                .bg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            style_tag_style: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default().fg(Color::Gray),
            pending_indicator_style: Style::default().fg(Color::LightMagenta),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            info_style: Style::default().fg(Color::LightCyan),
            error_style: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
            panel_border_style: Style::default().fg(Color::LightMagenta),
            selected_style: Style::default().add_modifier(Modifier::REVERSED),

            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: Style::default(),
        }
    }
}
