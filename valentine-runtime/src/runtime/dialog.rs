//! # Dialog 序列器
//!
//! 按台词模式逐行推进对话。每次推进要么给出下一行（已替换名字），
//! 要么在台词耗尽时给出出口。
//!
//! `awaiting_advance` 标记保证一行台词显示完之前的推进请求被忽略；
//! 给出出口之后同样不再接受推进，直到进入新的模式。

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::script::{DialogExit, DialogMode};
use crate::typewriter::substitute_name;

/// 对话游标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogCursor {
    /// 当前模式
    pub mode: DialogMode,
    /// 下一行台词的序号（不超过台词数）
    pub index: usize,
}

impl Default for DialogCursor {
    fn default() -> Self {
        Self {
            mode: DialogMode::Initial,
            index: 0,
        }
    }
}

/// 推进结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogStep {
    /// 显示一行台词
    Reveal {
        /// 已替换名字的文本
        text: String,
    },
    /// 台词耗尽
    Exit(DialogExit),
}

/// 对话序列器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSequencer {
    cursor: DialogCursor,
    awaiting_advance: bool,
}

impl Default for DialogSequencer {
    fn default() -> Self {
        Self {
            cursor: DialogCursor::default(),
            awaiting_advance: true,
        }
    }
}

impl DialogSequencer {
    /// 创建序列器（初始模式）
    pub fn new() -> Self {
        Self::default()
    }

    /// 推进一次
    ///
    /// 正在显示台词或已经给出出口时返回 `None`。
    pub fn advance(&mut self, player_name: &str) -> Option<DialogStep> {
        if !self.awaiting_advance {
            debug!(cursor = ?self.cursor, "对话不接受推进");
            return None;
        }
        self.awaiting_advance = false;

        let script = self.cursor.mode.script();
        match script.get(self.cursor.index) {
            Some(line) => Some(DialogStep::Reveal {
                text: substitute_name(line, player_name),
            }),
            None => Some(DialogStep::Exit(self.cursor.mode.exit())),
        }
    }

    /// 当前台词显示完成
    pub fn reveal_complete(&mut self) {
        let len = self.cursor.mode.script().len();
        self.cursor.index = (self.cursor.index + 1).min(len);
        self.awaiting_advance = true;
    }

    /// 切换模式，游标回到开头
    pub fn enter_mode(&mut self, mode: DialogMode) {
        self.cursor = DialogCursor { mode, index: 0 };
        self.awaiting_advance = true;
    }

    /// 回到初始模式
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 当前游标
    pub fn cursor(&self) -> DialogCursor {
        self.cursor
    }

    /// 当前模式
    pub fn mode(&self) -> DialogMode {
        self.cursor.mode
    }

    /// 是否接受推进
    pub fn is_awaiting_advance(&self) -> bool {
        self.awaiting_advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reveal_count_until_exit(mode: DialogMode) -> (usize, DialogExit) {
        let mut sequencer = DialogSequencer::new();
        sequencer.enter_mode(mode);
        let mut reveals = 0;
        loop {
            match sequencer.advance("Sam").unwrap() {
                DialogStep::Reveal { .. } => {
                    reveals += 1;
                    sequencer.reveal_complete();
                }
                DialogStep::Exit(exit) => return (reveals, exit),
            }
        }
    }

    #[test]
    fn test_each_script_reveals_every_line_then_exits() {
        for mode in [
            DialogMode::Initial,
            DialogMode::Affirmative,
            DialogMode::Negative,
        ] {
            let (reveals, exit) = reveal_count_until_exit(mode);
            assert_eq!(reveals, mode.script().len());
            assert_eq!(exit, mode.exit());
        }
    }

    #[test]
    fn test_first_line_is_substituted() {
        let mut sequencer = DialogSequencer::new();
        let step = sequencer.advance("Sam").unwrap();
        assert_eq!(
            step,
            DialogStep::Reveal {
                text: "Hey Sam... I've been wanting to tell you something for a while now..."
                    .to_string()
            }
        );
    }

    #[test]
    fn test_advance_ignored_while_revealing() {
        let mut sequencer = DialogSequencer::new();
        assert!(sequencer.advance("Sam").is_some());
        assert!(!sequencer.is_awaiting_advance());
        assert!(sequencer.advance("Sam").is_none());
        assert_eq!(sequencer.cursor().index, 0);

        sequencer.reveal_complete();
        assert_eq!(sequencer.cursor().index, 1);
        assert!(sequencer.is_awaiting_advance());
    }

    #[test]
    fn test_exit_is_emitted_once() {
        let mut sequencer = DialogSequencer::new();
        sequencer.enter_mode(DialogMode::Negative);
        for _ in 0..DialogMode::Negative.script().len() {
            sequencer.advance("Sam");
            sequencer.reveal_complete();
        }
        assert_eq!(
            sequencer.advance("Sam"),
            Some(DialogStep::Exit(DialogExit::ToSadEnding))
        );
        assert_eq!(sequencer.advance("Sam"), None);
    }

    #[test]
    fn test_enter_mode_and_reset() {
        let mut sequencer = DialogSequencer::new();
        sequencer.advance("Sam");
        sequencer.reveal_complete();

        sequencer.enter_mode(DialogMode::Affirmative);
        assert_eq!(
            sequencer.cursor(),
            DialogCursor {
                mode: DialogMode::Affirmative,
                index: 0
            }
        );

        sequencer.reset();
        assert_eq!(sequencer, DialogSequencer::default());
        assert_eq!(sequencer.mode(), DialogMode::Initial);
    }
}
