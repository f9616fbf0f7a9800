use ratatui::style::Color;

/// Palette for the exhibition page
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub page_bg: Color,
    pub card_bg: Color,
    pub card_bg_alt: Color,
    pub bar_bg: Color,

    // Foreground colors
    pub fg: Color,
    pub fg_dim: Color,
    pub grey: Color,

    // Semantic colors
    pub accent: Color,
    pub captured: Color,
    pub releasing: Color,
    pub idle: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            page_bg: Color::Rgb(0x12, 0x12, 0x12),
            card_bg: Color::Rgb(0x1d, 0x1d, 0x1d),
            card_bg_alt: Color::Rgb(0x26, 0x26, 0x26),
            bar_bg: Color::Rgb(0x2a, 0x2a, 0x2a),
            fg: Color::Rgb(0xf5, 0xf5, 0xf5),
            fg_dim: Color::Rgb(0x9a, 0x9a, 0x9a),
            grey: Color::Rgb(0x55, 0x55, 0x55),
            accent: Color::Rgb(0xd7, 0xdf, 0x21),
            captured: Color::Rgb(0xd7, 0xdf, 0x21),
            releasing: Color::Rgb(0xe7, 0x8a, 0x4e),
            idle: Color::Rgb(0x7d, 0xae, 0xa3),
        }
    }
}

impl Theme {
    /// Status bar color for a capture state label
    pub fn state_color(&self, label: &str) -> Color {
        match label {
            "captured" => self.captured,
            "releasing" => self.releasing,
            _ => self.idle,
        }
    }

    /// Background for card `index` of the stack, alternating so stacked
    /// cards stay distinguishable
    pub fn card_color(&self, index: usize) -> Color {
        if index % 2 == 0 {
            self.card_bg
        } else {
            self.card_bg_alt
        }
    }
}
