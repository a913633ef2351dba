//! Pure edits on a [`Configuration`].
//!
//! Each operation borrows the current configuration and returns the one that
//! should replace it.  Operations that can be refused come in two flavors:
//! `try_*`, which report why, and a silent form that hands back an unchanged
//! copy.
use crate::model::{Configuration, Theme, UnknownNameError, MAX_HABITS};
use crate::presets::Preset;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{format_description::FormatItem, macros::date, macros::format_description, Date};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub(crate) fn select_preset(config: &Configuration, preset: &Preset) -> Configuration {
    Configuration {
        habits: preset.habit_list(),
        ..config.clone()
    }
}

pub(crate) fn try_add_habit(
    config: &Configuration,
    text: &str,
) -> Result<Configuration, HabitError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(HabitError::Blank);
    }
    if config.habits.len() >= MAX_HABITS {
        return Err(HabitError::Full);
    }
    if config.habits.iter().any(|h| h == text) {
        return Err(HabitError::Duplicate(text.to_owned()));
    }
    let mut habits = config.habits.clone();
    habits.push(text.to_owned());
    Ok(Configuration {
        habits,
        ..config.clone()
    })
}

pub(crate) fn add_habit(config: &Configuration, text: &str) -> Configuration {
    try_add_habit(config, text).unwrap_or_else(|_| config.clone())
}

pub(crate) fn try_remove_habit(
    config: &Configuration,
    index: usize,
) -> Result<Configuration, HabitError> {
    let len = config.habits.len();
    if index >= len {
        return Err(HabitError::OutOfRange { index, len });
    }
    let mut habits = config.habits.clone();
    habits.remove(index);
    Ok(Configuration {
        habits,
        ..config.clone()
    })
}

/// Out-of-range indices leave the habit list as it was.
pub(crate) fn remove_habit(config: &Configuration, index: usize) -> Configuration {
    try_remove_habit(config, index).unwrap_or_else(|_| config.clone())
}

pub(crate) fn set_date_range(config: &Configuration, range: DateRange) -> Configuration {
    let (start, end) = range.bounds();
    Configuration {
        start_date: Some(start),
        end_date: Some(end),
        ..config.clone()
    }
}

pub(crate) fn set_field(config: &Configuration, field: Field) -> Configuration {
    let mut config = config.clone();
    match field {
        Field::ChildName(s) => config.child_name = s,
        Field::Reward(s) => config.reward = s,
        Field::Note(s) => config.note = s,
        Field::StartDate(d) => config.start_date = d,
        Field::EndDate(d) => config.end_date = d,
        Field::Theme(t) => config.theme = t,
    }
    config
}

/// Parse a `YYYY-MM-DD` date as entered by the user.  Anything else becomes
/// `None`, which leaves the sheet without dates.
pub(crate) fn parse_date_input(s: &str) -> Option<Date> {
    Date::parse(s.trim(), &YMD_FMT).ok()
}

pub(crate) fn format_date_input(date: Date) -> String {
    date.format(&YMD_FMT).unwrap_or_default()
}

/// A single settable field together with its new value
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Field {
    ChildName(String),
    Reward(String),
    Note(String),
    StartDate(Option<Date>),
    EndDate(Option<Date>),
    Theme(Theme),
}

/// The fixed holiday ranges offered as shortcuts
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum DateRange {
    Standard,
    PreHoliday,
    PostHoliday,
}

impl DateRange {
    pub(crate) const ALL: [DateRange; 3] = [
        DateRange::Standard,
        DateRange::PreHoliday,
        DateRange::PostHoliday,
    ];

    pub(crate) fn bounds(self) -> (Date, Date) {
        match self {
            DateRange::Standard => (date!(2026 - 01 - 15), date!(2026 - 02 - 16)),
            DateRange::PreHoliday => (date!(2026 - 01 - 15), date!(2026 - 01 - 28)),
            DateRange::PostHoliday => (date!(2026 - 01 - 29), date!(2026 - 02 - 16)),
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            DateRange::Standard => "标准寒假",
            DateRange::PreHoliday => "春节前",
            DateRange::PostHoliday => "春节后",
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            DateRange::Standard => "standard",
            DateRange::PreHoliday => "pre-holiday",
            DateRange::PostHoliday => "post-holiday",
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<DateRange, UnknownNameError> {
        DateRange::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownNameError::new("date range", s))
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum HabitError {
    #[error("habit text is blank")]
    Blank,
    #[error("sheet already has {} habits", MAX_HABITS)]
    Full,
    #[error("habit {0:?} is already on the sheet")]
    Duplicate(String),
    #[error("no habit at position {index} (sheet has {len})")]
    OutOfRange { index: usize, len: usize },
}
