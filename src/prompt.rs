use crate::theme::{
    prompt::{HINT_STYLE, INPUT_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 44;
const OUTER_HEIGHT: u16 = 8;

/// Columns inside the prompt's border available for the entered text
const INPUT_WIDTH: u16 = OUTER_WIDTH - 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Prompt;

impl StatefulWidget for Prompt {
    type State = PromptState;

    /*
     * ............................................
     * .┌─ 孩子姓名 ─────────────────────────────┐.
     * .│                                        │.
     * .│王小明                                  │.
     * .│                                        │.
     * .│        [ENTER] 确定   [ESC] 取消       │.
     * .└────────────────────────────────────────┘.
     * ............................................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(format!(" {} ", state.target.title()))
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

/// What the text being entered will become
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum PromptTarget {
    ChildName,
    StartDate,
    EndDate,
    NewHabit,
    Reward,
    Note,
}

impl PromptTarget {
    pub(crate) fn title(self) -> &'static str {
        match self {
            PromptTarget::ChildName => "孩子姓名",
            PromptTarget::StartDate => "开始日期",
            PromptTarget::EndDate => "结束日期",
            PromptTarget::NewHabit => "添加习惯",
            PromptTarget::Reward => "奖励承诺",
            PromptTarget::Note => "家长寄语",
        }
    }

    /// Shown in place of the input while nothing has been typed
    fn hint(self) -> &'static str {
        match self {
            PromptTarget::ChildName => "例如：王小明",
            PromptTarget::StartDate | PromptTarget::EndDate => "YYYY-MM-DD",
            PromptTarget::NewHabit => "输入新习惯，按回车添加...",
            PromptTarget::Reward => "完成挑战的奖励是...",
            PromptTarget::Note => "写一句鼓励的话...",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PromptState {
    target: PromptTarget,
    input: String,
}

impl PromptState {
    pub(crate) fn new(target: PromptTarget, initial: String) -> PromptState {
        PromptState {
            target,
            input: initial,
        }
    }

    fn to_text(&self) -> Text<'_> {
        let input = if self.input.is_empty() {
            Line::styled(self.target.hint(), HINT_STYLE)
        } else {
            let visible = visible_tail(&self.input, usize::from(INPUT_WIDTH));
            Line::from(Span::styled(visible, INPUT_STYLE))
        };
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            input,
            Line::styled("", BASE_STYLE),
            Line::styled("[ENTER] 确定   [ESC] 取消", BASE_STYLE).centered(),
        ])
    }

    pub(crate) fn handle_input(&mut self, input: PromptInput) -> PromptOutput {
        match input {
            PromptInput::Char(c) if !c.is_control() => {
                self.input.push(c);
                PromptOutput::Ok
            }
            PromptInput::Char(_) => PromptOutput::Invalid,
            PromptInput::Backspace => {
                if self.input.pop().is_some() {
                    PromptOutput::Ok
                } else {
                    PromptOutput::Invalid
                }
            }
            PromptInput::Enter => PromptOutput::Submit(self.target, self.input.clone()),
            PromptInput::Escape => PromptOutput::Cancel,
        }
    }
}

/// The longest suffix of `s` that fits in `width` columns, so that the end
/// of long input stays visible while typing
fn visible_tail(s: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for (i, c) in s.char_indices().rev() {
        used += Span::raw(String::from(c)).width();
        if used > width {
            break;
        }
        start = i;
    }
    &s[start..]
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PromptInput {
    Char(char),
    Backspace,
    Enter,
    Escape,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum PromptOutput {
    Ok,
    Invalid,
    Cancel,
    Submit(PromptTarget, String),
}
