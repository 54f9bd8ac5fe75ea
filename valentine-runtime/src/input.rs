//! # Input 模块
//!
//! 定义 Host 向 Runtime 传递的输入事件。
//!
//! ## 设计说明
//!
//! - `InputEvent` 是 Host 采集用户操作后，传递给 Runtime 的抽象输入
//! - Runtime 不直接处理鼠标/键盘事件，只处理语义化的输入
//! - 时间流逝不是输入：Host 通过 `GameController::advance` 推进虚拟时钟

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scene::VideoId;

/// 房间中可点击的物件
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomObject {
    /// Imms（开始对话）
    Imms,
    /// 相框
    Picture,
    /// 玩偶
    Plushies,
    /// Gregory（彩蛋）
    Gregory,
    /// 其他没有交互的物件
    Other(String),
}

impl FromStr for RoomObject {
    type Err = Infallible;

    /// 从物件 id 解析（不区分大小写，未知 id 归为 `Other`）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "imms" => Self::Imms,
            "picture" => Self::Picture,
            "plushies" => Self::Plushies,
            "gregory" => Self::Gregory,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for RoomObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomObject::Imms => f.write_str("imms"),
            RoomObject::Picture => f.write_str("picture"),
            RoomObject::Plushies => f.write_str("plushies"),
            RoomObject::Gregory => f.write_str("gregory"),
            RoomObject::Other(id) => f.write_str(id),
        }
    }
}

/// 选择弹窗的回答
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceAnswer {
    /// 是
    Yes,
    /// 否
    No,
}

/// Host 向 Runtime 传递的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// 标题画面按下开始
    StartPressed,
    /// 提交名字
    NameSubmitted(String),
    /// 点击房间物件
    RoomObjectSelected(RoomObject),
    /// 对话"继续"
    ContinueDialog,
    /// 回答选择弹窗
    ChoiceMade(ChoiceAnswer),
    /// 切换静音
    MuteToggled,
    /// 视频自然播放结束
    VideoEnded(VideoId),
    /// 关闭物件特写
    ItemFocusClosed,
    /// 关闭彩蛋视频
    EasterEggClosed,
    /// 请求重开
    ResetRequested,
    /// 关闭游戏窗口
    CloseRequested,
}

impl InputEvent {
    /// 是否为按钮操作（会播放 UI 点击音效）
    pub fn is_button_press(&self) -> bool {
        matches!(
            self,
            InputEvent::StartPressed
                | InputEvent::NameSubmitted(_)
                | InputEvent::ContinueDialog
                | InputEvent::ChoiceMade(_)
                | InputEvent::MuteToggled
                | InputEvent::ItemFocusClosed
        )
    }

    /// 创建提交名字输入
    pub fn name(text: impl Into<String>) -> Self {
        Self::NameSubmitted(text.into())
    }

    /// 创建点击物件输入
    pub fn select(object_id: &str) -> Self {
        match object_id.parse() {
            Ok(object) => Self::RoomObjectSelected(object),
            Err(never) => match never {},
        }
    }
}
