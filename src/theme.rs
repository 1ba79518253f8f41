//! Theme data model: built-in palettes and resolution from config.
//!
//! Two built-in palettes (dark and light) plus custom hex overrides from the
//! config file.

use ratatui::style::Color;

use crate::config::{AppConfig, ThemeColorsConfig};

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the interactive view.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,
    pub size_fg: Color,
    /// Highlight for the matched part of a name.
    pub match_fg: Color,

    // Search bar
    pub search_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),          // #cdd6f4 (text)
        tree_selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        tree_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        tree_dir_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        tree_file_fg: Color::Rgb(205, 214, 244),     // #cdd6f4
        size_fg: Color::Rgb(108, 112, 134),          // #6c7086 (overlay0)
        match_fg: Color::Rgb(250, 179, 135),         // #fab387 (peach)

        search_fg: Color::Rgb(205, 214, 244),

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        info_fg: Color::Rgb(137, 180, 250),    // #89b4fa (blue)
        accent_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086
    }
}

/// Light theme, Catppuccin Latte.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105),            // #4c4f69 (text)
        tree_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        tree_selected_fg: Color::Rgb(76, 79, 105),
        tree_dir_fg: Color::Rgb(30, 102, 245), // #1e66f5 (blue)
        tree_file_fg: Color::Rgb(76, 79, 105),
        size_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)
        match_fg: Color::Rgb(254, 100, 11), // #fe640b (peach)

        search_fg: Color::Rgb(76, 79, 105),

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        success_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        info_fg: Color::Rgb(30, 102, 245),
        accent_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn apply(slot: &mut Color, hex: &Option<String>) {
    if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
        *slot = color;
    }
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: start from dark palette, then override with custom hex values
pub fn resolve_theme(config: &AppConfig) -> ThemeColors {
    match config.theme_scheme() {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.theme.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

/// Apply custom hex color overrides on top of an existing theme.
/// Malformed values keep the existing color.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    apply(&mut theme.tree_fg, &custom.tree_fg);
    apply(&mut theme.tree_selected_bg, &custom.tree_selected_bg);
    apply(&mut theme.tree_selected_fg, &custom.tree_selected_fg);
    apply(&mut theme.tree_dir_fg, &custom.tree_dir_fg);
    apply(&mut theme.tree_file_fg, &custom.tree_file_fg);
    apply(&mut theme.size_fg, &custom.size_fg);
    apply(&mut theme.match_fg, &custom.match_fg);
    apply(&mut theme.search_fg, &custom.search_fg);
    apply(&mut theme.status_bg, &custom.status_bg);
    apply(&mut theme.status_fg, &custom.status_fg);
    apply(&mut theme.border_fg, &custom.border_fg);
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;

    fn with_theme(theme: ThemeConfig) -> AppConfig {
        AppConfig {
            theme,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#1a1b26"), Some(Color::Rgb(26, 27, 38)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_resolve_light_theme() {
        let config = ThemeConfig {
            scheme: Some("light".to_string()),
            custom: None,
        };
        assert_eq!(resolve_theme(&with_theme(config)).tree_dir_fg, Color::Rgb(30, 102, 245));
    }

    #[test]
    fn test_resolve_default_and_unknown_are_dark() {
        assert_eq!(
            resolve_theme(&AppConfig::default()).tree_dir_fg,
            Color::Rgb(137, 180, 250)
        );
        let config = ThemeConfig {
            scheme: Some("neon".to_string()),
            custom: None,
        };
        assert_eq!(resolve_theme(&with_theme(config)).tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_resolve_custom_overrides() {
        let config = ThemeConfig {
            scheme: Some("custom".to_string()),
            custom: Some(ThemeColorsConfig {
                match_fg: Some("#ff9e64".to_string()),
                tree_fg: Some("#zzzzzz".to_string()),
                ..Default::default()
            }),
        };
        let theme = resolve_theme(&with_theme(config));
        assert_eq!(theme.match_fg, Color::Rgb(255, 158, 100));
        // Invalid hex keeps the dark default
        assert_eq!(theme.tree_fg, Color::Rgb(205, 214, 244));
        assert_eq!(theme.tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_dark_and_light_different() {
        let dark = dark_theme();
        let light = light_theme();
        assert_ne!(dark.tree_fg, light.tree_fg);
        assert_ne!(dark.match_fg, light.match_fg);
        assert_ne!(dark.error_fg, light.error_fg);
    }
}
