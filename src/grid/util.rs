use std::iter::successors;
use time::{Date, Weekday};

pub(super) trait WeekdayExt {
    /// Short weekday name in the zh-CN locale, without the leading "周"
    fn short_label(&self) -> &'static str;

    fn is_weekend(&self) -> bool;
}

impl WeekdayExt for Weekday {
    fn short_label(&self) -> &'static str {
        match self {
            Weekday::Monday => "一",
            Weekday::Tuesday => "二",
            Weekday::Wednesday => "三",
            Weekday::Thursday => "四",
            Weekday::Friday => "五",
            Weekday::Saturday => "六",
            Weekday::Sunday => "日",
        }
    }

    fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

/// Every date from `start` through `end`, both included.  Yields nothing if
/// `start` comes after `end`.
pub(super) fn iter_days_between(start: Date, end: Date) -> impl Iterator<Item = Date> {
    successors((start <= end).then_some(start), move |&d| {
        d.next_day().filter(|&next| next <= end)
    })
}

/// Long-form date as printed in the sheet's subtitle, e.g. "2026年1月15日"
pub(super) fn long_date(date: Date) -> String {
    format!("{}年{}月{}日", date.year(), u8::from(date.month()), date.day())
}
