use crate::presets;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{macros::date, Date};

/// Maximum number of habits on one sheet; the printed table always has this
/// many rows.
pub(crate) const MAX_HABITS: usize = 8;

pub(crate) const DEFAULT_START: Date = date!(2026 - 01 - 15);
pub(crate) const DEFAULT_END: Date = date!(2026 - 02 - 16);

/// Everything the user can configure about a sheet.
///
/// A `Configuration` is never edited in place; the functions in
/// [`crate::editor`] return a new value which the holder swaps in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Configuration {
    pub(crate) child_name: String,
    /// `None` when the entered text was not a valid date
    pub(crate) start_date: Option<Date>,
    /// `None` when the entered text was not a valid date
    pub(crate) end_date: Option<Date>,
    // Invariant: at most MAX_HABITS entries, no duplicates
    pub(crate) habits: Vec<String>,
    pub(crate) reward: String,
    pub(crate) note: String,
    pub(crate) theme: Theme,
}

impl Configuration {
    /// Number of days from the start date to the end date, counting both.
    /// This is zero or negative when the range is inverted, and `None` when
    /// either date is missing.
    pub(crate) fn span_days(&self) -> Option<i64> {
        let (start, end) = self.start_date.zip(self.end_date)?;
        Some((end - start).whole_days() + 1)
    }

    pub(crate) fn is_full(&self) -> bool {
        self.habits.len() >= MAX_HABITS
    }

    pub(crate) fn habit_count_label(&self) -> String {
        format!("{}/{MAX_HABITS}", self.habits.len())
    }
}

impl Default for Configuration {
    fn default() -> Configuration {
        Configuration {
            child_name: String::new(),
            start_date: Some(DEFAULT_START),
            end_date: Some(DEFAULT_END),
            habits: presets::default_preset().habit_list(),
            reward: String::new(),
            note: String::new(),
            theme: Theme::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Theme {
    #[default]
    Monochrome,
    Colorful,
}

impl Theme {
    pub(crate) fn toggled(self) -> Theme {
        match self {
            Theme::Monochrome => Theme::Colorful,
            Theme::Colorful => Theme::Monochrome,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Theme::Monochrome => "monochrome",
            Theme::Colorful => "colorful",
        }
    }

    /// Label shown in the editor panel
    pub(crate) fn label(self) -> &'static str {
        match self {
            Theme::Monochrome => "黑白",
            Theme::Colorful => "彩色",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Theme, UnknownNameError> {
        match s {
            "monochrome" | "black-white" => Ok(Theme::Monochrome),
            "colorful" => Ok(Theme::Colorful),
            _ => Err(UnknownNameError::new("theme", s)),
        }
    }
}

/// Returned when parsing the name of a theme, preset, or date range fails
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown {kind} {name:?}")]
pub(crate) struct UnknownNameError {
    kind: &'static str,
    name: String,
}

impl UnknownNameError {
    pub(crate) fn new(kind: &'static str, name: &str) -> UnknownNameError {
        UnknownNameError {
            kind,
            name: name.to_owned(),
        }
    }
}
