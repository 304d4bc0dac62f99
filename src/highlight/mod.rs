//! Syntax highlighting for fenced code blocks.
//!
//! Wraps syntect. The syntax set and theme load once per process; theme
//! choice follows the detected (or overridden) terminal background.

use std::sync::{Mutex, OnceLock};

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::document::{InlineColor, InlineSpan, InlineStyle};

/// Highlight `code` as `language`, one span vector per line.
///
/// Unknown or missing languages fall back to unstyled code spans.
pub fn highlight_code(language: Option<&str>, code: &str) -> Vec<Vec<InlineSpan>> {
    let syntax_set = syntax_set();
    let syntax = language
        .and_then(|lang| syntax_set.find_syntax_by_token(lang))
        .or_else(|| language.and_then(|lang| syntax_set.find_syntax_by_name(lang)));

    let Some(syntax) = syntax else {
        return code
            .lines()
            .map(|line| {
                vec![InlineSpan::new(
                    line.to_string(),
                    InlineStyle {
                        code: true,
                        ..InlineStyle::default()
                    },
                )]
            })
            .collect();
    };

    let mode = background_mode();
    let mut highlighter = HighlightLines::new(syntax, theme());
    let mut lines = Vec::new();
    for line in code.lines() {
        let ranges = highlighter
            .highlight_line(line, syntax_set)
            .unwrap_or_default();
        let spans = ranges
            .into_iter()
            .map(|(style, text)| {
                let fg = InlineColor {
                    r: style.foreground.r,
                    g: style.foreground.g,
                    b: style.foreground.b,
                };
                InlineSpan::new(
                    text.to_string(),
                    InlineStyle {
                        code: true,
                        fg: Some(adjust_fg_for_background(fg, mode)),
                        ..InlineStyle::default()
                    },
                )
            })
            .collect();
        lines.push(spans);
    }
    lines
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| {
        let theme_set = ThemeSet::load_defaults();
        let preferred = match background_mode() {
            BackgroundMode::Dark => [
                "Monokai Extended",
                "Dracula",
                "Solarized (dark)",
                "base16-ocean.dark",
            ]
            .as_slice(),
            BackgroundMode::Light => [
                "InspiredGitHub",
                "Solarized (light)",
                "base16-ocean.light",
            ]
            .as_slice(),
        };
        for name in preferred {
            if let Some(theme) = theme_set.themes.get(*name) {
                return theme.clone();
            }
        }
        theme_set
            .themes
            .values()
            .next()
            .cloned()
            .unwrap_or_default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

/// Explicit background choice from the CLI or config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<HighlightBackground>>> = OnceLock::new();

/// Override background detection. `None` restores COLORFGBG detection.
pub fn set_background_mode(mode: Option<HighlightBackground>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    let mut guard = lock.lock().expect("highlight background lock");
    *guard = mode;
}

/// True when the terminal background is (or is forced to be) light.
pub fn is_light_background() -> bool {
    background_mode() == BackgroundMode::Light
}

fn background_mode() -> BackgroundMode {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock()
        && let Some(mode) = *guard
    {
        return match mode {
            HighlightBackground::Light => BackgroundMode::Light,
            HighlightBackground::Dark => BackgroundMode::Dark,
        };
    }
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let Ok(bg) = bg_str.parse::<u8>() else {
        return BackgroundMode::Dark;
    };
    if bg >= 7 {
        BackgroundMode::Light
    } else {
        BackgroundMode::Dark
    }
}

/// On light backgrounds, bright theme colors wash out; dim anything above
/// the readable luma threshold.
fn adjust_fg_for_background(color: InlineColor, mode: BackgroundMode) -> InlineColor {
    match mode {
        BackgroundMode::Dark => color,
        BackgroundMode::Light => {
            let luma = (0.2126 * f32::from(color.r))
                + (0.7152 * f32::from(color.g))
                + (0.0722 * f32::from(color.b));
            if luma < 155.0 {
                return color;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            InlineColor {
                r: (f32::from(color.r) * 0.42).round() as u8,
                g: (f32::from(color.g) * 0.42).round() as u8,
                b: (f32::from(color.b) * 0.42).round() as u8,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust_produces_colored_spans() {
        let lines = highlight_code(Some("rust"), "fn main() {\n    let x = 1;\n}\n");
        assert_eq!(lines.len(), 3);
        let has_color = lines.iter().flatten().any(|span| span.style().fg.is_some());
        assert!(has_color);
    }

    #[test]
    fn test_unknown_language_stays_plain() {
        let lines = highlight_code(Some("nope"), "just text");
        assert_eq!(lines.len(), 1);
        let has_color = lines.iter().flatten().any(|span| span.style().fg.is_some());
        assert!(!has_color);
    }

    #[test]
    fn test_plain_code_sets_code_flag() {
        let lines = highlight_code(None, "plain");
        assert!(lines[0].iter().all(|span| span.style().code));
    }

    #[test]
    fn test_highlight_never_sets_background() {
        let lines = highlight_code(Some("rust"), "fn main() {}");
        let has_bg = lines.iter().flatten().any(|span| span.style().bg.is_some());
        assert!(!has_bg);
    }

    #[test]
    fn test_colorfgbg_dark() {
        assert_eq!(
            background_mode_from_colorfgbg(Some("15;0")),
            BackgroundMode::Dark
        );
    }

    #[test]
    fn test_colorfgbg_light() {
        assert_eq!(
            background_mode_from_colorfgbg(Some("0;15")),
            BackgroundMode::Light
        );
    }

    #[test]
    fn test_colorfgbg_missing_defaults_dark() {
        assert_eq!(background_mode_from_colorfgbg(None), BackgroundMode::Dark);
    }

    #[test]
    fn test_light_mode_dims_bright_foreground() {
        let bright = InlineColor {
            r: 240,
            g: 230,
            b: 120,
        };
        let adjusted = adjust_fg_for_background(bright, BackgroundMode::Light);
        assert!(adjusted.r < bright.r);
        let luma = (0.2126 * f32::from(adjusted.r))
            + (0.7152 * f32::from(adjusted.g))
            + (0.0722 * f32::from(adjusted.b));
        assert!(luma < 120.0);
    }

    #[test]
    fn test_dark_mode_leaves_colors_alone() {
        let c = InlineColor {
            r: 200,
            g: 200,
            b: 200,
        };
        assert_eq!(adjust_fg_for_background(c, BackgroundMode::Dark), c);
    }
}
