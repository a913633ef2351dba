use super::{ColumnWidth, GridRow, GridView};
use crate::theme::{Palette, BASE_STYLE, DIM_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Width of the leftmost column, in which the habits are written, not
/// counting the vertical rule to its right
const HABIT_WIDTH: u16 = 18;

/// Columns available for a habit's label after its row number
const HABIT_LABEL_WIDTH: u16 = HABIT_WIDTH - 4;

/// Number of lines taken up by the title, subtitle, and the gap after them
const TITLE_LINES: u16 = 3;

/// Number of lines taken up by the weekday row, the day-of-month row, and
/// the rule below them
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each habit row and the rule below it
const ROW_LINES: u16 = 2;

/// Number of lines below the table: a gap, the reward, the note, the
/// signature line, and the motto
const FOOTER_LINES: u16 = 5;

/// Label column for the lines in the footer; values start after it
const FOOTER_LABEL_WIDTH: u16 = 10;

/// Upper bound on the cells in a buffer `Rect`; sheets too wide to fit are
/// cut off on the right
const MAX_CELLS: u16 = u16::MAX;

const SIGNATURE_LINE: &str = "________________";

const MOTTO: &str = "每一个小习惯，都是成长的勋章 · Created with 寒假打卡助手";

const ACS_HLINE: char = '─';
const ACS_VLINE: char = '│';
const ACS_PLUS: char = '┼';
const ACS_RTEE: char = '┤';
const ACS_DASH: char = '┄';

/// Terminal rendering of a [`GridView`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Preview<'a> {
    view: &'a GridView,
}

impl<'a> Preview<'a> {
    pub(crate) fn new(view: &'a GridView) -> Preview<'a> {
        Preview { view }
    }

    /// Number of columns per date, including the rule to its right
    fn column_step(&self) -> u16 {
        match self.view.column_width {
            ColumnWidth::Regular => 4,
            ColumnWidth::Narrow => 3,
        }
    }

    fn column_qty(&self) -> u16 {
        u16::try_from(self.view.columns.len()).unwrap_or(u16::MAX)
    }

    // Columns at which vertical rules are drawn, left to right.  Rules that
    // would lie past the last addressable column are left out.
    fn rule_columns(&self) -> impl Iterator<Item = u16> {
        let step = self.column_step();
        (0..=self.column_qty())
            .map_while(move |i| i.checked_mul(step).and_then(|dx| HABIT_WIDTH.checked_add(dx)))
    }

    fn table_width(&self) -> u16 {
        HABIT_WIDTH
            .saturating_add(self.column_qty().saturating_mul(self.column_step()))
            .saturating_add(1)
    }

    fn subtitle(&self) -> String {
        format!("{}   {}", self.view.range_label, self.view.day_count_label())
    }

    /// Columns needed to show the whole sheet, or as much of it as fits in
    /// one buffer
    pub(crate) fn width(&self) -> u16 {
        [
            Span::raw(self.view.title.as_str()).width(),
            Span::raw(self.subtitle()).width(),
            Span::raw(self.view.reward.as_str()).width() + usize::from(FOOTER_LABEL_WIDTH),
            Span::raw(self.view.note.as_str()).width() + usize::from(FOOTER_LABEL_WIDTH),
            Span::raw(MOTTO).width(),
        ]
        .into_iter()
        .map(|w| u16::try_from(w).unwrap_or(u16::MAX))
        .fold(self.table_width(), u16::max)
        .min(MAX_CELLS / self.height())
    }

    /// Lines needed to show the whole sheet
    pub(crate) fn height(&self) -> u16 {
        let rows = u16::try_from(self.view.rows.len()).unwrap_or(u16::MAX);
        TITLE_LINES + HEADER_LINES + rows.saturating_mul(ROW_LINES) + FOOTER_LINES
    }
}

impl Widget for Preview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self.width().min(area.width);
        let left = area.width.saturating_sub(width) / 2;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(left),
                Constraint::Length(width),
                Constraint::Min(0),
            ])
            .split(area);
        let palette = Palette::for_theme(self.view.theme);
        let mut canvas = BufferCanvas::new(chunks[1], buf);
        canvas.center(0, &self.view.title, palette.title);
        canvas.center(1, &self.subtitle(), BASE_STYLE);
        self.draw_header(&mut canvas, palette);
        let mut y = TITLE_LINES + HEADER_LINES;
        for row in &self.view.rows {
            match row {
                GridRow::Habit { number, label } => {
                    canvas.mvprint(y, 1, number.to_string(), palette.number);
                    canvas.mvprint_within(y, 3, label, palette.habit, HABIT_LABEL_WIDTH);
                }
                GridRow::Blank => {
                    canvas.mvprint(y, 1, hline(ACS_DASH, HABIT_WIDTH - 2), DIM_STYLE);
                }
            }
            for x in self.rule_columns() {
                canvas.mvaddch(y, x, ACS_VLINE);
            }
            self.draw_rule(&mut canvas, y + 1);
            y += ROW_LINES;
        }
        self.draw_footer(&mut canvas, y, palette);
    }
}

impl Preview<'_> {
    fn draw_header(&self, canvas: &mut BufferCanvas<'_>, palette: Palette) {
        let y = TITLE_LINES;
        canvas.mvprint(y, HABIT_WIDTH - 5, "日期", DIM_STYLE);
        canvas.mvprint(y + 1, 1, "习惯", palette.habit);
        let step = self.column_step();
        for (col, x) in self.view.columns.iter().zip(self.rule_columns()) {
            // Right-align both labels within the cell
            let label_x = x.saturating_add(step - 2);
            let (wd_style, day_style) = if col.weekend {
                (palette.weekend, palette.weekend)
            } else {
                (palette.weekday, BASE_STYLE)
            };
            canvas.mvprint(y, label_x, col.weekday_label, wd_style);
            canvas.mvprint(y + 1, label_x, format!("{:>2}", col.day), day_style);
        }
        for x in self.rule_columns() {
            canvas.mvaddch(y, x, ACS_VLINE);
            canvas.mvaddch(y + 1, x, ACS_VLINE);
        }
        self.draw_rule(canvas, y + 2);
    }

    fn draw_rule(&self, canvas: &mut BufferCanvas<'_>, y: u16) {
        canvas.mvprint(y, 0, hline(ACS_HLINE, self.table_width()), BASE_STYLE);
        let last = self.table_width().saturating_sub(1);
        for x in self.rule_columns() {
            canvas.mvaddch(y, x, if x == last { ACS_RTEE } else { ACS_PLUS });
        }
    }

    fn draw_footer(&self, canvas: &mut BufferCanvas<'_>, y: u16, palette: Palette) {
        for (dy, label, value) in [
            (1, "奖励承诺：", self.view.reward.as_str()),
            (2, "家长寄语：", self.view.note.as_str()),
            (3, "家长签名：", SIGNATURE_LINE),
        ] {
            canvas.mvprint(y + dy, 0, label, palette.accent);
            canvas.mvprint(y + dy, FOOTER_LABEL_WIDTH, value, BASE_STYLE);
        }
        canvas.center(y + 4, MOTTO, DIM_STYLE);
    }
}

fn hline(ch: char, length: u16) -> String {
    String::from(ch).repeat(length.into())
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn mvaddch(&mut self, y: u16, x: u16, ch: char) {
        if y < self.area.height && x < self.area.width {
            let pos = (x.saturating_add(self.area.x), y.saturating_add(self.area.y));
            if let Some(cell) = self.buf.cell_mut(pos) {
                cell.set_char(ch);
            }
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        self.mvprint_within(y, x, s, style, u16::MAX);
    }

    // Like `mvprint()`, but text past `limit` columns is cut off
    fn mvprint_within<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style, limit: u16) {
        if y < self.area.height && x < self.area.width {
            let line = Line::styled(s.as_ref(), style);
            let width = u16::try_from(line.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // sheet's area, though we need to be sure that the Rect passed to
            // the Paragraph is entirely within the frame lest a panic result.
            Paragraph::new(line).render(
                Rect {
                    x: x.saturating_add(self.area.x),
                    y: y.saturating_add(self.area.y),
                    width: (self.area.width - x).min(width).min(limit),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn center(&mut self, y: u16, s: &str, style: Style) {
        let width = u16::try_from(Span::raw(s).width()).unwrap_or(u16::MAX);
        self.mvprint(y, self.area.width.saturating_sub(width) / 2, s, style);
    }
}
