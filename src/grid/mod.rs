mod util;
mod widget;
pub(crate) use self::widget::Preview;
use self::util::{iter_days_between, long_date, WeekdayExt};
use crate::model::{Configuration, Theme, MAX_HABITS};
use time::Date;

pub(crate) const DEFAULT_TITLE: &str = "寒假成长打卡表";

pub(crate) const REWARD_PLACEHOLDER: &str = "__________________________";

pub(crate) const NOTE_PLACEHOLDER: &str = "__________________________________________________";

/// Above this many days the date columns are drawn narrower
const NARROW_THRESHOLD: usize = 25;

/// Everything needed to draw a sheet, derived from a [`Configuration`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GridView {
    pub(crate) title: String,
    pub(crate) range_label: String,
    pub(crate) columns: Vec<DateColumn>,
    // Invariant: always MAX_HABITS entries
    pub(crate) rows: Vec<GridRow>,
    pub(crate) column_width: ColumnWidth,
    pub(crate) habit_count_label: String,
    pub(crate) reward: String,
    pub(crate) note: String,
    pub(crate) theme: Theme,
}

impl GridView {
    pub(crate) fn render(config: &Configuration) -> GridView {
        let columns = sheet_dates(config)
            .into_iter()
            .map(DateColumn::new)
            .collect::<Vec<_>>();
        let title = if config.child_name.is_empty() {
            String::from(DEFAULT_TITLE)
        } else {
            format!("{}的寒假打卡表", config.child_name)
        };
        let range_label = format!(
            "{} - {}",
            config.start_date.map_or_else(|| String::from("?"), long_date),
            config.end_date.map_or_else(|| String::from("?"), long_date),
        );
        let rows = config
            .habits
            .iter()
            .take(MAX_HABITS)
            .zip(1..)
            .map(|(label, number)| GridRow::Habit {
                number,
                label: label.clone(),
            })
            .chain(std::iter::repeat(GridRow::Blank))
            .take(MAX_HABITS)
            .collect();
        let column_width = if columns.len() > NARROW_THRESHOLD {
            ColumnWidth::Narrow
        } else {
            ColumnWidth::Regular
        };
        GridView {
            title,
            range_label,
            columns,
            rows,
            column_width,
            habit_count_label: config.habit_count_label(),
            reward: or_placeholder(&config.reward, REWARD_PLACEHOLDER),
            note: or_placeholder(&config.note, NOTE_PLACEHOLDER),
            theme: config.theme,
        }
    }

    pub(crate) fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.columns.iter().map(|c| c.date)
    }

    /// Number of days covered by the sheet, shown as "共 N 天"
    pub(crate) fn day_count(&self) -> usize {
        self.columns.len()
    }

    pub(crate) fn day_count_label(&self) -> String {
        format!("共 {} 天", self.day_count())
    }

    pub(crate) fn blank_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_blank()).count()
    }
}

/// The dates spanned by the configuration, or nothing if the range is
/// missing or backwards
fn sheet_dates(config: &Configuration) -> Vec<Date> {
    match (config.start_date, config.end_date) {
        (Some(start), Some(end)) => iter_days_between(start, end).collect(),
        _ => Vec::new(),
    }
}

fn or_placeholder(s: &str, placeholder: &str) -> String {
    if s.is_empty() {
        String::from(placeholder)
    } else {
        String::from(s)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DateColumn {
    pub(crate) date: Date,
    pub(crate) weekday_label: &'static str,
    pub(crate) day: u8,
    pub(crate) weekend: bool,
}

impl DateColumn {
    fn new(date: Date) -> DateColumn {
        let wd = date.weekday();
        DateColumn {
            date,
            weekday_label: wd.short_label(),
            day: date.day(),
            weekend: wd.is_weekend(),
        }
    }
}

/// One row of the table.  Every row has an empty mark cell per date; nothing
/// about check-offs is tracked.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum GridRow {
    Habit { number: usize, label: String },
    Blank,
}

impl GridRow {
    pub(crate) fn is_blank(&self) -> bool {
        matches!(self, GridRow::Blank)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ColumnWidth {
    Regular,
    Narrow,
}
