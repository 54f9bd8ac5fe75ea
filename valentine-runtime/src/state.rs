//! # State 模块
//!
//! 定义会话状态和场景枚举。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**，由 `GameController` 唯一持有
//! - 不允许隐式全局状态
//! - `reset()` 之后会话回到 [`Session::default`]

use serde::{Deserialize, Serialize};

/// 顶层场景（互斥）
///
/// 任意时刻最多只有一个场景处于激活状态，见 [`crate::scene::SceneRegistry`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Screen {
    /// 开场 Logo 动画
    Intro,
    /// 标题画面
    Start,
    /// 输入名字
    Name,
    /// 房间探索
    Room,
    /// 对话
    Dialog,
    /// 坏结局
    SadEnding,
    /// 好结局
    HappyEnding,
    /// 隐藏结局
    Bonus,
}

impl Screen {
    /// 所有场景
    pub const ALL: [Screen; 8] = [
        Screen::Intro,
        Screen::Start,
        Screen::Name,
        Screen::Room,
        Screen::Dialog,
        Screen::SadEnding,
        Screen::HappyEnding,
        Screen::Bonus,
    ];

    /// 场景名称（用于日志和终端显示）
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Intro => "intro",
            Screen::Start => "start",
            Screen::Name => "name",
            Screen::Room => "room",
            Screen::Dialog => "dialog",
            Screen::SadEnding => "sad-ending",
            Screen::HappyEnding => "happy-ending",
            Screen::Bonus => "bonus",
        }
    }
}

/// 玩家会话
///
/// 在 `GameController` 创建时初始化，随场景切换和彩蛋发现而变化，
/// 重开时整体恢复默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 玩家名字（已去除首尾空白）
    pub player_name: String,
    /// 当前场景
    pub current_screen: Screen,
    /// 是否在房间里发现了 Gregory（决定好结局后是否进入隐藏结局）
    pub gregory_found: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            current_screen: Screen::Start,
            gregory_found: false,
        }
    }
}
