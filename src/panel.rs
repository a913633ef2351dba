//! The editor view: the sheet's settings as a list of selectable items
use crate::editor::{format_date_input, DateRange};
use crate::model::{Configuration, Theme, MAX_HABITS};
use crate::presets::{Preset, PRESETS};
use crate::theme::{
    panel::{preset_style, CURSOR_STYLE, SECTION_STYLE},
    BASE_STYLE, DIM_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};
use time::Date;

/// Indentation of items below their section heading
const ITEM_INDENT: &str = "   ";

/// Width of the label column for labelled items
const LABEL_WIDTH: usize = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PanelItem {
    Preset(&'static Preset),
    ChildName,
    Range(DateRange),
    StartDate,
    EndDate,
    Habit(usize),
    AddHabit,
    Reward,
    Note,
    Theme,
}

/// The selectable items for `config`, in display order
pub(crate) fn panel_items(config: &Configuration) -> Vec<PanelItem> {
    let mut items = PRESETS.iter().map(PanelItem::Preset).collect::<Vec<_>>();
    items.push(PanelItem::ChildName);
    items.extend(DateRange::ALL.into_iter().map(PanelItem::Range));
    items.push(PanelItem::StartDate);
    items.push(PanelItem::EndDate);
    items.extend((0..config.habits.len()).map(PanelItem::Habit));
    if !config.is_full() {
        items.push(PanelItem::AddHabit);
    }
    items.extend([PanelItem::Reward, PanelItem::Note, PanelItem::Theme]);
    items
}

/// Cursor position within the editor view
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct PanelState {
    cursor: usize,
    // Line at the top of the visible area
    offset: usize,
}

impl PanelState {
    pub(crate) fn new() -> PanelState {
        PanelState::default()
    }

    pub(crate) fn selected(&self, config: &Configuration) -> Option<PanelItem> {
        panel_items(config).get(self.cursor).copied()
    }

    // Returns `false` if already at the last item
    pub(crate) fn move_down(&mut self, config: &Configuration) -> bool {
        if self.cursor + 1 < panel_items(config).len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    // Returns `false` if already at the first item
    pub(crate) fn move_up(&mut self) -> bool {
        if let Some(c) = self.cursor.checked_sub(1) {
            self.cursor = c;
            true
        } else {
            false
        }
    }

    /// Keep the cursor on an existing item after the item list has shrunk
    pub(crate) fn clamp(&mut self, config: &Configuration) {
        let len = panel_items(config).len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    // Scrolls so that `line` is within a view of `height` lines
    fn scroll_to(&mut self, line: usize, height: usize) {
        if line < self.offset {
            self.offset = line;
        } else if height > 0 && line >= self.offset + height {
            self.offset = line + 1 - height;
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Panel<'a> {
    config: &'a Configuration,
}

impl<'a> Panel<'a> {
    pub(crate) fn new(config: &'a Configuration) -> Panel<'a> {
        Panel { config }
    }

    // Returns the lines to draw along with the index of the line showing the
    // cursor
    fn lines(&self, cursor: usize) -> (Vec<Line<'static>>, usize) {
        let config = self.config;
        let mut lines = Vec::new();
        let mut cursor_line = 0;
        let mut section = None;
        for (i, item) in panel_items(config).into_iter().enumerate() {
            let heading = item_section(item);
            if section != Some(heading) {
                section = Some(heading);
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                lines.push(section_line(heading, config));
            }
            if i == cursor {
                cursor_line = lines.len();
                lines.push(item_line(item, config).patch_style(CURSOR_STYLE));
            } else {
                lines.push(item_line(item, config));
            }
        }
        (lines, cursor_line)
    }
}

impl StatefulWidget for Panel<'_> {
    type State = PanelState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.clamp(self.config);
        let (lines, cursor_line) = self.lines(state.cursor);
        state.scroll_to(cursor_line, usize::from(area.height));
        let visible = lines.into_iter().skip(state.offset).collect::<Vec<_>>();
        Paragraph::new(visible).style(BASE_STYLE).render(area, buf);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Section {
    Presets,
    Basics,
    Habits,
    Motivation,
}

fn item_section(item: PanelItem) -> Section {
    match item {
        PanelItem::Preset(_) => Section::Presets,
        PanelItem::ChildName | PanelItem::Range(_) | PanelItem::StartDate | PanelItem::EndDate => {
            Section::Basics
        }
        PanelItem::Habit(_) | PanelItem::AddHabit => Section::Habits,
        PanelItem::Reward | PanelItem::Note | PanelItem::Theme => Section::Motivation,
    }
}

fn section_line(section: Section, config: &Configuration) -> Line<'static> {
    let title = match section {
        Section::Presets => "快捷预设",
        Section::Basics => "基础信息",
        Section::Habits => "打卡习惯",
        Section::Motivation => "激励承诺",
    };
    let mut spans = vec![Span::styled(format!(" {title}"), SECTION_STYLE)];
    match section {
        Section::Basics => {
            if let Some(days) = config.span_days() {
                spans.push(Span::styled(format!("  共 {days} 天"), DIM_STYLE));
            }
        }
        Section::Habits => {
            spans.push(Span::styled(
                format!("  {}", config.habit_count_label()),
                DIM_STYLE,
            ));
        }
        Section::Presets | Section::Motivation => (),
    }
    Line::from(spans)
}

fn item_line(item: PanelItem, config: &Configuration) -> Line<'static> {
    match item {
        PanelItem::Preset(p) => {
            let name_style = match config.theme {
                Theme::Monochrome => BASE_STYLE,
                Theme::Colorful => preset_style(p.color),
            };
            Line::from(vec![
                Span::raw(format!("{ITEM_INDENT}{} ", p.icon)),
                Span::styled(p.name, name_style),
                Span::styled(format!("  {}", p.description), DIM_STYLE),
            ])
        }
        PanelItem::ChildName => labelled("孩子姓名", &config.child_name, "例如：王小明"),
        PanelItem::Range(r) => {
            let (start, end) = r.bounds();
            Line::from(vec![
                Span::raw(format!("{ITEM_INDENT}{}", pad(r.label()))),
                Span::styled(
                    format!("{} ~ {}", format_date_input(start), format_date_input(end)),
                    DIM_STYLE,
                ),
            ])
        }
        PanelItem::StartDate => labelled("开始日期", &show_date(config.start_date), ""),
        PanelItem::EndDate => labelled("结束日期", &show_date(config.end_date), ""),
        PanelItem::Habit(i) => Line::raw(format!(
            "{ITEM_INDENT}{}. {}",
            i + 1,
            config.habits.get(i).map_or("", String::as_str)
        )),
        PanelItem::AddHabit => Line::from(Span::styled(
            format!("{ITEM_INDENT}+ 添加习惯 (最多 {MAX_HABITS} 个)"),
            DIM_STYLE,
        )),
        PanelItem::Reward => labelled("奖励", &config.reward, "完成挑战的奖励是..."),
        PanelItem::Note => labelled("寄语", &config.note, "写一句鼓励的话..."),
        PanelItem::Theme => labelled("配色", config.theme.label(), ""),
    }
}

fn labelled(label: &str, value: &str, hint: &str) -> Line<'static> {
    let value = if value.is_empty() {
        Span::styled(String::from(hint), DIM_STYLE)
    } else {
        Span::raw(String::from(value))
    };
    Line::from(vec![Span::raw(format!("{ITEM_INDENT}{}", pad(label))), value])
}

// Pads `label` with spaces to LABEL_WIDTH columns
fn pad(label: &str) -> String {
    let width = Span::raw(label).width();
    format!("{label}{}", " ".repeat(LABEL_WIDTH.saturating_sub(width)))
}

fn show_date(date: Option<Date>) -> String {
    date.map_or_else(|| String::from("(无效日期)"), format_date_input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{add_habit, set_field, Field};
    use crate::print::buffer_lines;
    use pretty_assertions::assert_eq;

    fn draw(config: &Configuration, state: &mut PanelState, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, 50, height);
        let mut buffer = Buffer::empty(area);
        Panel::new(config).render(area, &mut buffer, state);
        buffer_lines(&buffer)
    }

    #[test]
    fn test_items() {
        let config = Configuration::default();
        let items = panel_items(&config);
        assert_eq!(items.len(), 4 + 1 + 3 + 2 + 4 + 1 + 3);
        assert_eq!(items[4], PanelItem::ChildName);
        assert_eq!(items[10], PanelItem::Habit(0));
        assert_eq!(items[14], PanelItem::AddHabit);
        assert_eq!(items[17], PanelItem::Theme);
    }

    #[test]
    fn test_items_full() {
        let mut config = Configuration::default();
        for h in ["a", "b", "c", "d"] {
            config = add_habit(&config, h);
        }
        assert!(!panel_items(&config).contains(&PanelItem::AddHabit));
    }

    #[test]
    fn test_movement() {
        let config = Configuration::default();
        let mut state = PanelState::new();
        assert!(!state.move_up());
        assert_eq!(state.selected(&config), Some(PanelItem::Preset(&PRESETS[0])));
        for _ in 0..17 {
            assert!(state.move_down(&config));
        }
        assert!(!state.move_down(&config));
        assert_eq!(state.selected(&config), Some(PanelItem::Theme));
    }

    #[test]
    fn test_clamp() {
        let config = Configuration::default();
        let mut state = PanelState::new();
        while state.move_down(&config) {}
        let cleared = Configuration {
            habits: Vec::new(),
            ..config
        };
        state.clamp(&cleared);
        assert_eq!(state.selected(&cleared), Some(PanelItem::Theme));
    }

    #[test]
    fn test_render() {
        let config = set_field(
            &Configuration::default(),
            Field::ChildName(String::from("王小明")),
        );
        let mut state = PanelState::new();
        let lines = draw(&config, &mut state, 40);
        assert_eq!(
            lines[..14].to_vec(),
            [
                " 快捷预设",
                "   📚 学霸养成  侧重学习习惯",
                "   🏃 健康活力  侧重身体健康",
                "   🎨 全面发展  学习生活平衡",
                "   ⚡ 自定义  由你自由发挥",
                "",
                " 基础信息  共 33 天",
                "   孩子姓名  王小明",
                "   标准寒假  2026-01-15 ~ 2026-02-16",
                "   春节前    2026-01-15 ~ 2026-01-28",
                "   春节后    2026-01-29 ~ 2026-02-16",
                "   开始日期  2026-01-15",
                "   结束日期  2026-02-16",
                "",
            ]
        );
        assert_eq!(lines[14], " 打卡习惯  4/8");
        assert_eq!(lines[15], "   1. 阅读30分钟");
        assert_eq!(lines[19], "   + 添加习惯 (最多 8 个)");
        assert_eq!(lines[21], " 激励承诺");
        assert_eq!(lines[22], "   奖励      完成挑战的奖励是...");
        assert_eq!(lines[24], "   配色      黑白");
    }

    #[test]
    fn test_colorful_preset_names() {
        let config = set_field(&Configuration::default(), Field::Theme(Theme::Colorful));
        let area = Rect::new(0, 0, 50, 40);
        let mut buffer = Buffer::empty(area);
        Panel::new(&config).render(area, &mut buffer, &mut PanelState::new());
        // Below the cursor, which sits on the first preset
        assert_eq!(buffer[(6, 2)].fg, ratatui::style::Color::LightGreen);
        assert_eq!(buffer[(6, 3)].fg, ratatui::style::Color::LightMagenta);
    }

    #[test]
    fn test_render_invalid_date() {
        let config = set_field(&Configuration::default(), Field::EndDate(None));
        let mut state = PanelState::new();
        let lines = draw(&config, &mut state, 40);
        assert_eq!(lines[6], " 基础信息");
        assert_eq!(lines[12], "   结束日期  (无效日期)");
    }

    #[test]
    fn test_scrolls_to_cursor() {
        let config = Configuration::default();
        let mut state = PanelState::new();
        while state.move_down(&config) {}
        let lines = draw(&config, &mut state, 10);
        assert_eq!(lines[9], "   配色      黑白");
        assert_eq!(lines[6], " 激励承诺");
    }
}
