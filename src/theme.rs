use crate::model::Theme;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const DIM_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const STATUS_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

/// Styles for the parts of the sheet preview that change with the sheet's
/// theme
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Palette {
    pub(crate) title: Style,
    pub(crate) weekday: Style,
    pub(crate) weekend: Style,
    pub(crate) habit: Style,
    pub(crate) number: Style,
    pub(crate) accent: Style,
}

impl Palette {
    pub(crate) const fn for_theme(theme: Theme) -> Palette {
        match theme {
            Theme::Monochrome => Palette {
                title: TITLE_STYLE,
                weekday: DIM_STYLE,
                weekend: BASE_STYLE.add_modifier(Modifier::BOLD),
                habit: BASE_STYLE.add_modifier(Modifier::BOLD),
                number: DIM_STYLE,
                accent: BASE_STYLE.add_modifier(Modifier::BOLD),
            },
            Theme::Colorful => Palette {
                title: TITLE_STYLE.fg(Color::LightBlue),
                weekday: DIM_STYLE,
                weekend: BASE_STYLE.fg(Color::LightRed).add_modifier(Modifier::BOLD),
                habit: BASE_STYLE.add_modifier(Modifier::BOLD),
                number: BASE_STYLE.fg(Color::LightBlue),
                accent: BASE_STYLE.fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
            },
        }
    }
}

pub(crate) mod panel {
    use super::*;

    pub(crate) const SECTION_STYLE: Style = BASE_STYLE
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD);

    pub(crate) const CURSOR_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

    /// Style for a preset's name given the preset's color tag.  Unknown tags
    /// get the base style.
    pub(crate) fn preset_style(color: &str) -> Style {
        let fg = match color {
            "blue" => Color::LightBlue,
            "green" => Color::LightGreen,
            "purple" => Color::LightMagenta,
            "gray" => Color::Gray,
            _ => return BASE_STYLE,
        };
        BASE_STYLE.fg(fg).add_modifier(Modifier::BOLD)
    }
}

pub(crate) mod prompt {
    use super::*;

    pub(crate) const HINT_STYLE: Style = DIM_STYLE.add_modifier(Modifier::ITALIC);

    pub(crate) const INPUT_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
