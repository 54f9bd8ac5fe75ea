//! # Typewriter 模块
//!
//! 打字机效果：按固定间隔逐字把文本写入一个文本接收端。
//!
//! 这里只负责"下一个可见快照是什么"，时间推进由 `GameController`
//! 通过调度器完成：
//!
//! ```text
//! t0           第 1 个字符
//! t0 + I       第 2 个字符
//! ...
//! t0 + (N-1)I  第 N 个字符
//! t0 + N·I     完成信号
//! ```
//!
//! 空文本在开始时立即完成，不产生任何字符 tick。

use std::time::Duration;

use crate::scene::ElementId;

/// 名字占位符
pub const NAME_PLACEHOLDER: &str = "{{NAME}}";

/// 快速打字间隔（对话、隐藏结局）
pub const FAST_INTERVAL: Duration = Duration::from_millis(30);

/// 慢速打字间隔（坏结局）
pub const SLOW_INTERVAL: Duration = Duration::from_millis(120);

/// 将模板中所有名字占位符替换为玩家名字
pub fn substitute_name(template: &str, player_name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, player_name)
}

/// 打字机
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    sink: ElementId,
    chars: Vec<char>,
    revealed: usize,
    interval: Duration,
}

impl Typewriter {
    /// 创建打字机（文本应已完成名字替换）
    pub fn new(sink: ElementId, text: &str, interval: Duration) -> Self {
        Self {
            sink,
            chars: text.chars().collect(),
            revealed: 0,
            interval,
        }
    }

    /// 推进一个字符
    ///
    /// 返回追加后的可见文本；文本已经全部显示时返回 `None`（完成）。
    pub fn tick(&mut self) -> Option<String> {
        if self.revealed >= self.chars.len() {
            return None;
        }
        self.revealed += 1;
        Some(self.visible_text())
    }

    /// 当前可见文本
    pub fn visible_text(&self) -> String {
        self.chars[..self.revealed].iter().collect()
    }

    /// 完整文本
    pub fn full_text(&self) -> String {
        self.chars.iter().collect()
    }

    /// 文本接收端
    pub fn sink(&self) -> ElementId {
        self.sink
    }

    /// 字符间隔
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 已显示字符数
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// 总字符数
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// 是否为空文本
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// 是否已全部显示
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.chars.len()
    }
}
