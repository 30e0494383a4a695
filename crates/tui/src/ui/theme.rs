use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub selected_bg: Color,
    pub range_bg: Color,
    pub positive: Color,
    pub amount: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(170, 170, 180),
            dim: Color::Rgb(130, 130, 140),
            accent: Color::Rgb(99, 102, 241),
            border: Color::Rgb(70, 70, 90),
            border_focused: Color::Rgb(129, 140, 248),
            selected_bg: Color::Rgb(49, 46, 129),
            range_bg: Color::Rgb(67, 56, 202),
            positive: Color::Rgb(80, 180, 120),
            amount: Color::Rgb(165, 180, 252),
            error: Color::Rgb(220, 90, 90),
        }
    }
}
