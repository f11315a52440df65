//! Handle the color theme
use ratatui::style::{Color, Modifier, Style};

use crate::options::TypeaheadOptions;

/// The color scheme of the UI
///
/// <pre>
/// +- Search ---------------------+
/// | react                    [x] |  --> query & clear
/// +------------------------------+
/// | React Basics        Frontend |  --> normal & category
/// | React Hooks Demo    Frontend |  --> focused & focused_category
/// +------------------------------+  --> border
/// </pre>
#[derive(Copy, Clone, Debug, Default)]
pub struct ColorTheme {
    /// General text
    pub normal: Style,
    /// Query text
    pub query: Style,
    /// Placeholder shown while the query is empty
    pub placeholder: Style,
    /// Clear button
    pub clear: Style,
    /// Result row under keyboard focus
    pub focused: Style,
    /// Category column
    pub category: Style,
    /// Category column of the focused row
    pub focused_category: Style,
    /// Loading indicator
    pub loading: Style,
    /// Query error message
    pub error: Style,
    /// "No results" indicator
    pub empty: Style,
    /// Page titles
    pub title: Style,
    /// Selected item panel
    pub selected: Style,
    /// Border
    pub border: Style,
    /// Success toast
    pub toast_success: Style,
    /// Error toast
    pub toast_error: Style,
    /// Info toast
    pub toast_info: Style,
}

impl ColorTheme {
    /// Setup the theme from the options
    pub fn init_from_options(options: &TypeaheadOptions) -> ColorTheme {
        if let Some(color) = options.color.clone() {
            ColorTheme::from_options(&color)
        } else {
            // Check for NO_COLOR environment variable
            match std::env::var_os("NO_COLOR") {
                Some(no_color) if !no_color.is_empty() => ColorTheme::none(),
                _ => ColorTheme::dark256(),
            }
        }
    }

    fn none() -> Self {
        Self {
            focused: Style::default().reversed(),
            focused_category: Style::default().reversed(),
            placeholder: Style::default().dim(),
            title: Style::default().bold(),
            error: Style::default().bold(),
            toast_success: Style::default().reversed(),
            toast_error: Style::default().reversed().bold(),
            toast_info: Style::default().reversed(),
            ..ColorTheme::default()
        }
    }

    fn dark256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            query: base.query.fg(Color::Indexed(254)),
            placeholder: base.placeholder.fg(Color::Indexed(242)),
            clear: base.clear.fg(Color::Indexed(161)),
            focused: Style::default().fg(Color::Indexed(254)).bg(Color::Indexed(24)),
            category: base.category.fg(Color::Indexed(109)),
            focused_category: Style::default().fg(Color::Indexed(152)).bg(Color::Indexed(24)),
            loading: base.loading.fg(Color::Indexed(148)),
            error: base.error.fg(Color::Indexed(196)),
            empty: base.empty.fg(Color::Indexed(144)),
            title: base.title.fg(Color::Indexed(110)),
            selected: base.selected.fg(Color::Indexed(168)),
            border: base.border.fg(Color::Indexed(59)),
            toast_success: Style::default().fg(Color::White).bg(Color::Green),
            toast_error: Style::default().fg(Color::White).bg(Color::Red),
            toast_info: Style::default().fg(Color::White).bg(Color::Blue),
            ..base
        }
    }

    fn light256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            query: base.query.fg(Color::Indexed(0)),
            placeholder: base.placeholder.fg(Color::Indexed(246)),
            clear: base.clear.fg(Color::Indexed(161)),
            focused: Style::default().fg(Color::Indexed(0)).bg(Color::Indexed(153)),
            category: base.category.fg(Color::Indexed(31)),
            focused_category: Style::default().fg(Color::Indexed(24)).bg(Color::Indexed(153)),
            loading: base.loading.fg(Color::Indexed(65)),
            error: base.error.fg(Color::Indexed(160)),
            empty: base.empty.fg(Color::Indexed(101)),
            title: base.title.fg(Color::Indexed(25)),
            selected: base.selected.fg(Color::Indexed(168)),
            border: base.border.fg(Color::Indexed(145)),
            toast_success: Style::default().fg(Color::White).bg(Color::Green),
            toast_error: Style::default().fg(Color::White).bg(Color::Red),
            toast_info: Style::default().fg(Color::White).bg(Color::Blue),
            ..base
        }
    }

    fn set_color(&mut self, name: &str, spec: &str) {
        let spec_parts: Vec<_> = spec.split(&['+', ':']).collect();

        let raw_color = spec_parts[0];
        let new_color = if raw_color.len() == 7 && raw_color.starts_with('#') {
            // RGB Hex color
            let r = u8::from_str_radix(&raw_color[1..3], 16).unwrap_or(255);
            let g = u8::from_str_radix(&raw_color[3..5], 16).unwrap_or(255);
            let b = u8::from_str_radix(&raw_color[5..7], 16).unwrap_or(255);
            Some(Color::Rgb(r, g, b))
        } else {
            raw_color.parse::<u8>().ok().map(Color::Indexed).or_else(|| {
                debug!("Unknown color '{}'", spec_parts[0]);
                None
            })
        };

        let mut modifier = Modifier::empty();
        for part in spec_parts.iter().skip(1) {
            modifier |= match *part {
                "b" | "bold" => Modifier::BOLD,
                "u" | "underlined" => Modifier::UNDERLINED,
                "d" | "dim" => Modifier::DIM,
                "i" | "italic" => Modifier::ITALIC,
                "r" | "reverse" => Modifier::REVERSED,
                m => {
                    debug!("Unknown modifier '{m}'");
                    Modifier::empty()
                }
            };
        }
        let (component_name, layer) = if let Some(n) = name.strip_suffix("_bg").or(name.strip_suffix("-bg")) {
            (n, "bg")
        } else if let Some(n) = name.strip_suffix("_fg").or(name.strip_suffix("-fg")) {
            (n, "fg")
        } else {
            (name, "fg")
        };

        let style = match component_name {
            "" | "normal" => &mut self.normal,
            "query" => &mut self.query,
            "placeholder" => &mut self.placeholder,
            "clear" => &mut self.clear,
            "focused" | "current" => &mut self.focused,
            "category" => &mut self.category,
            "focused_category" => &mut self.focused_category,
            "loading" | "spinner" => &mut self.loading,
            "error" => &mut self.error,
            "empty" => &mut self.empty,
            "title" => &mut self.title,
            "selected" => &mut self.selected,
            "border" => &mut self.border,
            other => {
                debug!("Unknown theme component '{other}'");
                return;
            }
        };
        set_style(style, layer, new_color, modifier);
    }

    fn from_options(color: &str) -> Self {
        let mut theme = ColorTheme::dark256();
        for pair in color.split(',') {
            if let Some((name, spec)) = pair.split_once(':') {
                theme.set_color(name, spec);
            } else {
                theme = match pair {
                    "light" => ColorTheme::light256(),
                    "none" | "empty" => ColorTheme::none(),
                    "dark" | "default" => ColorTheme::dark256(),
                    t => {
                        debug!("Unknown color theme '{t}'");
                        ColorTheme::dark256()
                    }
                };
            }
        }
        theme
    }
}

fn set_style(s: &mut Style, layer: &str, color: Option<Color>, modifier: Modifier) {
    if let Some(c) = color {
        *s = match layer {
            "bg" => s.bg(c),
            _ => s.fg(c),
        }
    }
    *s = s.add_modifier(modifier);
}
