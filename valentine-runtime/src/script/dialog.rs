//! # Dialog 脚本
//!
//! 三组固定台词及其结束出口。台词中的 `{{NAME}}` 在显示前替换为玩家名字。

use serde::{Deserialize, Serialize};

/// 初始告白台词
pub const INITIAL_SCRIPT: [&str; 4] = [
    "Hey {{NAME}}... I've been wanting to tell you something for a while now...",
    "Every moment we spend together makes my heart skip a beat.",
    "You're the most amazing person I've ever met, and I can't imagine my days without you.",
    "So... I have an important question to ask you...",
];

/// 回答"是"之后的台词
pub const AFFIRMATIVE_SCRIPT: [&str; 3] = [
    "Really?! Oh my gosh, {{NAME}}!",
    "You have no idea how happy you've made me!",
    "I have something special for you...",
];

/// 回答"否"之后的台词
pub const NEGATIVE_SCRIPT: [&str; 3] = [
    "Oh... I see...",
    "I understand, {{NAME}}...",
    "I guess this is goodbye then...",
];

/// 对话角色默认立绘
pub const CHARACTER_ART: &str = "images/imms-character.png";

/// 对话角色悲伤立绘
pub const SAD_CHARACTER_ART: &str = "images/imms-character-sad.png";

/// 选择弹窗的问题
pub fn choice_question(player_name: &str) -> String {
    format!("{player_name}, will you be my Valentine?")
}

/// 对话模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogMode {
    /// 初始告白
    Initial,
    /// 回答"是"
    Affirmative,
    /// 回答"否"
    Negative,
}

impl DialogMode {
    /// 该模式的台词
    pub fn script(self) -> &'static [&'static str] {
        match self {
            DialogMode::Initial => &INITIAL_SCRIPT,
            DialogMode::Affirmative => &AFFIRMATIVE_SCRIPT,
            DialogMode::Negative => &NEGATIVE_SCRIPT,
        }
    }

    /// 台词耗尽后的出口
    pub fn exit(self) -> DialogExit {
        match self {
            DialogMode::Initial => DialogExit::ToChoice,
            DialogMode::Affirmative => DialogExit::ToHappyEnding,
            DialogMode::Negative => DialogExit::ToSadEnding,
        }
    }
}

/// 对话结束出口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogExit {
    /// 弹出"是/否"选择
    ToChoice,
    /// 进入好结局
    ToHappyEnding,
    /// 进入坏结局
    ToSadEnding,
}
