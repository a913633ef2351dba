use crate::editor::{
    format_date_input, parse_date_input, remove_habit, select_preset, set_date_range, set_field,
    try_add_habit, Field,
};
use crate::grid::{GridView, Preview};
use crate::help::Help;
use crate::model::Configuration;
use crate::panel::{Panel, PanelItem, PanelState};
use crate::print::{write_html, DEFAULT_HTML_FILE};
use crate::prompt::{Prompt, PromptInput, PromptOutput, PromptState, PromptTarget};
use crate::theme::{BASE_STYLE, STATUS_STYLE};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::path::PathBuf;
use time::Date;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    config: Configuration,
    view: View,
    panel: PanelState,
    scroll: Scroll,
    state: AppState,
    status: Option<String>,
    html_path: PathBuf,
}

impl App {
    pub(crate) fn new(config: Configuration) -> App {
        App {
            config,
            view: View::Editor,
            panel: PanelState::new(),
            scroll: Scroll::default(),
            state: AppState::Editing,
            status: None,
            html_path: PathBuf::from(DEFAULT_HTML_FILE),
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or the requested
    // edit was refused
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Editing => {
                self.status = None;
                match key {
                    KeyCode::Tab => {
                        self.view = self.view.toggled();
                        true
                    }
                    KeyCode::Char('t') => {
                        self.toggle_theme();
                        true
                    }
                    KeyCode::Char('P') => self.save_html(),
                    KeyCode::Char('?') => {
                        self.state = AppState::Helping;
                        true
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.state = AppState::Quitting;
                        true
                    }
                    _ => match self.view {
                        View::Editor => self.handle_editor_key(key),
                        View::Preview => self.handle_preview_key(key),
                    },
                }
            }
            AppState::Helping => {
                self.state = AppState::Editing;
                true
            }
            AppState::Prompting(state) => {
                let output = match key {
                    KeyCode::Char(c) => state.handle_input(PromptInput::Char(c)),
                    KeyCode::Backspace => state.handle_input(PromptInput::Backspace),
                    KeyCode::Enter => state.handle_input(PromptInput::Enter),
                    KeyCode::Esc => state.handle_input(PromptInput::Escape),
                    _ => PromptOutput::Invalid,
                };
                match output {
                    PromptOutput::Ok => true,
                    PromptOutput::Invalid => false,
                    PromptOutput::Cancel => {
                        self.state = AppState::Editing;
                        true
                    }
                    PromptOutput::Submit(target, text) => self.submit(target, &text),
                }
            }
            AppState::Quitting => false,
        }
    }

    fn handle_editor_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('j') | KeyCode::Down => self.panel.move_down(&self.config),
            KeyCode::Char('k') | KeyCode::Up => self.panel.move_up(),
            KeyCode::Enter => self.activate(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_habit(),
            _ => false,
        }
    }

    fn handle_preview_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('j') | KeyCode::Down => self.scroll.down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll.up(),
            KeyCode::Char('l') | KeyCode::Right => self.scroll.right(),
            KeyCode::Char('h') | KeyCode::Left => self.scroll.left(),
            _ => false,
        }
    }

    fn activate(&mut self) -> bool {
        let Some(item) = self.panel.selected(&self.config) else {
            return false;
        };
        match item {
            PanelItem::Preset(preset) => {
                self.config = select_preset(&self.config, preset);
                tracing::debug!(preset = preset.id, "selected preset");
                self.status = Some(format!("Applied preset {}", preset.name));
            }
            PanelItem::Range(range) => {
                self.config = set_date_range(&self.config, range);
                tracing::debug!(%range, "set date range");
            }
            PanelItem::Theme => self.toggle_theme(),
            PanelItem::Habit(_) => return false,
            PanelItem::ChildName => {
                self.open_prompt(PromptTarget::ChildName, self.config.child_name.clone());
            }
            PanelItem::StartDate => {
                let initial = self.config.start_date.map(format_date_input);
                self.open_prompt(PromptTarget::StartDate, initial.unwrap_or_default());
            }
            PanelItem::EndDate => {
                let initial = self.config.end_date.map(format_date_input);
                self.open_prompt(PromptTarget::EndDate, initial.unwrap_or_default());
            }
            PanelItem::AddHabit => self.open_prompt(PromptTarget::NewHabit, String::new()),
            PanelItem::Reward => {
                self.open_prompt(PromptTarget::Reward, self.config.reward.clone());
            }
            PanelItem::Note => self.open_prompt(PromptTarget::Note, self.config.note.clone()),
        }
        true
    }

    fn open_prompt(&mut self, target: PromptTarget, initial: String) {
        self.state = AppState::Prompting(PromptState::new(target, initial));
    }

    // A refused habit leaves the prompt open so that the text can be fixed
    fn submit(&mut self, target: PromptTarget, text: &str) -> bool {
        let field = match target {
            PromptTarget::ChildName => Field::ChildName(text.to_owned()),
            PromptTarget::Reward => Field::Reward(text.to_owned()),
            PromptTarget::Note => Field::Note(text.to_owned()),
            PromptTarget::StartDate => Field::StartDate(self.parse_date(text)),
            PromptTarget::EndDate => Field::EndDate(self.parse_date(text)),
            PromptTarget::NewHabit => {
                return match try_add_habit(&self.config, text) {
                    Ok(config) => {
                        self.config = config;
                        tracing::debug!(habit = text.trim(), "added habit");
                        self.state = AppState::Editing;
                        true
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "refused to add habit");
                        self.status = Some(e.to_string());
                        false
                    }
                };
            }
        };
        tracing::debug!(?field, "set field");
        self.config = set_field(&self.config, field);
        self.state = AppState::Editing;
        true
    }

    fn parse_date(&mut self, text: &str) -> Option<Date> {
        let date = parse_date_input(text);
        if date.is_none() {
            tracing::warn!(input = text, "unparseable date; sheet will have no dates");
            self.status = Some(format!("{:?} is not a YYYY-MM-DD date", text.trim()));
        }
        date
    }

    fn remove_selected_habit(&mut self) -> bool {
        let Some(PanelItem::Habit(index)) = self.panel.selected(&self.config) else {
            return false;
        };
        self.config = remove_habit(&self.config, index);
        self.panel.clamp(&self.config);
        tracing::debug!(index, "removed habit");
        true
    }

    fn toggle_theme(&mut self) {
        let theme = self.config.theme.toggled();
        self.config = set_field(&self.config, Field::Theme(theme));
        tracing::debug!(%theme, "toggled theme");
    }

    fn save_html(&mut self) -> bool {
        match write_html(&self.html_path, &GridView::render(&self.config)) {
            Ok(()) => {
                self.status = Some(format!("Wrote {}", self.html_path.display()));
                true
            }
            Err(e) => {
                tracing::error!("could not save sheet: {e:#}");
                self.status = Some(format!("{e:#}"));
                false
            }
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn status_line(&self) -> String {
        if let Some(ref msg) = self.status {
            format!(" {msg}")
        } else {
            let other = match self.view {
                View::Editor => "preview",
                View::Preview => "editor",
            };
            format!(" TAB: {other}   P: save HTML   ?: help   q: quit")
        }
    }

    // Draws the sheet into an off-screen buffer and copies the part within
    // the scroll window to `area`
    fn render_preview(&mut self, area: Rect, buf: &mut Buffer) {
        let view = GridView::render(&self.config);
        let preview = Preview::new(&view);
        let width = preview.width().max(area.width);
        let height = preview.height();
        let sheet_area = Rect::new(0, 0, width, height);
        let mut sheet = Buffer::empty(sheet_area);
        sheet.set_style(sheet_area, BASE_STYLE);
        preview.render(sheet_area, &mut sheet);
        self.scroll
            .fit(width.saturating_sub(area.width), height.saturating_sub(area.height));
        for y in 0..area.height.min(height.saturating_sub(self.scroll.y)) {
            for x in 0..area.width {
                let src = (x.saturating_add(self.scroll.x), y.saturating_add(self.scroll.y));
                if let (Some(cell), Some(dest)) = (
                    sheet.cell(src),
                    buf.cell_mut((area.x.saturating_add(x), area.y.saturating_add(y))),
                ) {
                    *dest = cell.clone();
                }
            }
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [main_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        match self.view {
            View::Editor => Panel::new(&self.config).render(main_area, buf, &mut self.panel),
            View::Preview => self.render_preview(main_area, buf),
        }
        Line::styled(self.status_line(), STATUS_STYLE).render(status_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Prompting(ref mut state) = self.state {
            Prompt.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum View {
    Editor,
    Preview,
}

impl View {
    fn toggled(self) -> View {
        match self {
            View::Editor => View::Preview,
            View::Preview => View::Editor,
        }
    }
}

/// Offset of the preview window into the sheet, along with the largest
/// offsets seen at the last draw
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Scroll {
    x: u16,
    y: u16,
    max_x: u16,
    max_y: u16,
}

impl Scroll {
    fn fit(&mut self, max_x: u16, max_y: u16) {
        self.max_x = max_x;
        self.max_y = max_y;
        self.x = self.x.min(max_x);
        self.y = self.y.min(max_y);
    }

    fn down(&mut self) -> bool {
        if self.y < self.max_y {
            self.y += 1;
            true
        } else {
            false
        }
    }

    fn up(&mut self) -> bool {
        if let Some(y) = self.y.checked_sub(1) {
            self.y = y;
            true
        } else {
            false
        }
    }

    fn right(&mut self) -> bool {
        if self.x < self.max_x {
            self.x += 1;
            true
        } else {
            false
        }
    }

    fn left(&mut self) -> bool {
        if let Some(x) = self.x.checked_sub(1) {
            self.x = x;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Editing,
    Helping,
    Prompting(PromptState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::PRESETS;
    use crate::print::buffer_lines;
    use pretty_assertions::assert_eq;
    use time::macros::date;

    fn draw(app: &mut App, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer_lines(&buffer)
    }

    fn select(app: &mut App, item: PanelItem) {
        while app.panel.selected(&app.config) != Some(item) {
            assert!(app.handle_key(KeyCode::Down), "{item:?} not in panel");
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_initial_render() {
        let mut app = App::new(Configuration::default());
        let lines = draw(&mut app, 60, 30);
        assert_eq!(lines[0], " 快捷预设");
        assert_eq!(lines[6], " 基础信息  共 33 天");
        assert_eq!(
            lines[29],
            " TAB: preview   P: save HTML   ?: help   q: quit"
        );
    }

    #[test]
    fn test_select_preset() {
        let mut app = App::new(Configuration::default());
        select(&mut app, PanelItem::Preset(&PRESETS[1]));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.config.habits, PRESETS[1].habit_list());
        assert_eq!(app.status.as_deref(), Some("Applied preset 健康活力"));
    }

    #[test]
    fn test_apply_date_range() {
        let mut app = App::new(Configuration::default());
        select(
            &mut app,
            PanelItem::Range(crate::editor::DateRange::PostHoliday),
        );
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.config.start_date, Some(date!(2026 - 01 - 29)));
        assert_eq!(app.config.end_date, Some(date!(2026 - 02 - 16)));
    }

    #[test]
    fn test_add_habit() {
        let mut app = App::new(Configuration::default());
        select(&mut app, PanelItem::AddHabit);
        assert!(app.handle_key(KeyCode::Enter));
        assert!(matches!(app.state, AppState::Prompting(_)));
        type_text(&mut app, "练字");
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Editing);
        assert_eq!(app.config.habits.len(), 5);
        assert_eq!(app.config.habits[4], "练字");
    }

    #[test]
    fn test_duplicate_habit_keeps_prompt() {
        let mut app = App::new(Configuration::default());
        select(&mut app, PanelItem::AddHabit);
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "阅读30分钟");
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(matches!(app.state, AppState::Prompting(_)));
        assert_eq!(app.config.habits.len(), 4);
        assert_eq!(
            app.status.as_deref(),
            Some(r#"habit "阅读30分钟" is already on the sheet"#)
        );
        assert!(app.handle_key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Editing);
    }

    #[test]
    fn test_remove_habit() {
        let mut app = App::new(Configuration::default());
        select(&mut app, PanelItem::Habit(1));
        assert!(app.handle_key(KeyCode::Char('d')));
        assert_eq!(app.config.habits, ["阅读30分钟", "做一件家务", "兴趣爱好练习"]);
        assert_eq!(app.panel.selected(&app.config), Some(PanelItem::Habit(1)));
    }

    #[test]
    fn test_remove_non_habit() {
        let mut app = App::new(Configuration::default());
        assert!(!app.handle_key(KeyCode::Char('d')));
        assert_eq!(app.config, Configuration::default());
    }

    #[test]
    fn test_text_fields_kept_verbatim() {
        let mut app = App::new(Configuration::default());
        select(&mut app, PanelItem::Reward);
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "  去动物园  ");
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.config.reward, "  去动物园  ");
        assert_eq!(GridView::render(&app.config).reward, "  去动物园  ");

        while app.handle_key(KeyCode::Up) {}
        select(&mut app, PanelItem::ChildName);
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "   ");
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.config.child_name, "   ");
        assert_eq!(GridView::render(&app.config).title, "   的寒假打卡表");
    }

    #[test]
    fn test_edit_child_name() {
        let mut app = App::new(Configuration::default());
        select(&mut app, PanelItem::ChildName);
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "王小明");
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.config.child_name, "王小明");
        app.handle_key(KeyCode::Tab);
        let lines = draw(&mut app, 160, 30);
        assert_eq!(lines[0].trim(), "王小明的寒假打卡表");
    }

    #[test]
    fn test_bad_end_date() {
        let mut app = App::new(Configuration::default());
        select(&mut app, PanelItem::EndDate);
        app.handle_key(KeyCode::Enter);
        for _ in 0..3 {
            app.handle_key(KeyCode::Backspace);
        }
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.config.end_date, None);
        assert_eq!(
            app.status.as_deref(),
            Some(r#""2026-02" is not a YYYY-MM-DD date"#)
        );
        assert!(GridView::render(&app.config).columns.is_empty());
    }

    #[test]
    fn test_toggle_theme() {
        let mut app = App::new(Configuration::default());
        assert!(app.handle_key(KeyCode::Char('t')));
        assert_eq!(app.config.theme, crate::model::Theme::Colorful);
        assert!(app.handle_key(KeyCode::Char('t')));
        assert_eq!(app.config.theme, crate::model::Theme::Monochrome);
    }

    #[test]
    fn test_preview_scroll() {
        let mut app = App::new(Configuration::default());
        assert!(app.handle_key(KeyCode::Tab));
        let lines = draw(&mut app, 40, 10);
        assert_eq!(lines[0], "");
        assert_eq!(lines[9], " TAB: editor   P: save HTML   ?: help   q: quit");
        assert!(!app.handle_key(KeyCode::Char('h')));
        assert!(!app.handle_key(KeyCode::Char('k')));
        assert!(app.handle_key(KeyCode::Char('l')));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.scroll.x, 1);
        assert_eq!(app.scroll.y, 1);
    }

    #[test]
    fn test_help() {
        let mut app = App::new(Configuration::default());
        assert!(app.handle_key(KeyCode::Char('?')));
        let lines = draw(&mut app, 60, 20);
        assert!(lines.iter().any(|ln| ln.contains(" Commands ")));
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Editing);
    }

    #[test]
    fn test_quit() {
        let mut app = App::new(Configuration::default());
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
        assert!(!app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn test_invalid_key() {
        let mut app = App::new(Configuration::default());
        assert!(!app.handle_key(KeyCode::Char('z')));
        assert!(!app.handle_key(KeyCode::Up));
    }

    #[test]
    fn test_save_html() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Configuration::default());
        app.html_path = dir.path().join("sheet.html");
        assert!(app.handle_key(KeyCode::Char('P')));
        assert!(app.html_path.exists());
        assert_eq!(
            app.status,
            Some(format!("Wrote {}", app.html_path.display()))
        );
    }

    #[test]
    fn test_save_html_fails() {
        let mut app = App::new(Configuration::default());
        app.html_path = PathBuf::from("/nonexistent-habitgrid-dir/sheet.html");
        assert!(!app.handle_key(KeyCode::Char('P')));
        assert!(app
            .status
            .as_deref()
            .is_some_and(|s| s.starts_with("failed to write")));
    }
}
