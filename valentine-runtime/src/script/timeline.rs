//! # Timeline 定义
//!
//! 时间线是固定顺序的 `{delay, effects}` 步骤列表，由
//! [`crate::runtime::timeline::TimelineRunner`] 统一解释执行。
//!
//! 每一步先等待 `delay`，再依次应用 `effects`。`Reveal` 与
//! `AwaitVideoEnd` 是阻塞效果：运行器会挂起，直到收到完成信号后
//! 才开始下一步的等待。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::audio::CueId;
use crate::scene::{ElementId, VideoId, VisualFlag};
use crate::state::Screen;

/// 时间线种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelineKind {
    /// 开场 Logo
    Intro,
    /// 好结局
    Happy,
    /// 隐藏结局
    Bonus,
    /// 坏结局
    Sad,
}

/// 时间线结束动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finish {
    /// 重开
    Reset,
    /// 若发现了彩蛋则进入隐藏结局，否则重开
    BonusOrReset,
}

/// 时间线效果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// 激活场景
    Activate(Screen),
    /// 打开/关闭显示标记
    Flag {
        /// 目标元素
        element: ElementId,
        /// 标记
        flag: VisualFlag,
        /// 打开还是关闭
        on: bool,
    },
    /// 清空文本
    ClearText(ElementId),
    /// 播放曲目
    PlayCue(CueId),
    /// 从头播放视频
    PlayVideo(VideoId),
    /// 打字机显示文本（阻塞，文本已完成名字替换）
    Reveal {
        /// 文本接收端
        sink: ElementId,
        /// 文本
        text: String,
        /// 字符间隔
        interval: Duration,
    },
    /// 等待视频自然结束（阻塞）
    AwaitVideoEnd(VideoId),
    /// 结束动作
    Finish(Finish),
}

impl Effect {
    /// 是否为阻塞效果
    pub fn is_blocking(&self) -> bool {
        matches!(self, Effect::Reveal { .. } | Effect::AwaitVideoEnd(_))
    }
}

/// 时间线步骤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineStep {
    /// 执行前的等待时长
    pub delay: Duration,
    /// 依次应用的效果
    pub effects: Vec<Effect>,
}

impl TimelineStep {
    /// 立即执行的步骤
    pub fn now() -> Self {
        Self::after_ms(0)
    }

    /// 等待指定毫秒后执行的步骤
    pub fn after_ms(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            effects: Vec::new(),
        }
    }

    /// 添加效果
    pub fn then(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// 打开标记
    pub fn on(self, element: ElementId, flag: VisualFlag) -> Self {
        self.then(Effect::Flag {
            element,
            flag,
            on: true,
        })
    }

    /// 关闭标记
    pub fn off(self, element: ElementId, flag: VisualFlag) -> Self {
        self.then(Effect::Flag {
            element,
            flag,
            on: false,
        })
    }

    /// 取消隐藏
    pub fn unhide(self, element: ElementId) -> Self {
        self.off(element, VisualFlag::Hidden)
    }

    /// 隐藏
    pub fn hide(self, element: ElementId) -> Self {
        self.on(element, VisualFlag::Hidden)
    }

    /// 隐藏并清除所有过渡标记
    pub fn reset_element(self, element: ElementId) -> Self {
        VisualFlag::TRANSITIONS
            .iter()
            .fold(self.hide(element), |step, &flag| step.off(element, flag))
    }

    /// 该步骤是否包含阻塞效果
    pub fn is_blocking(&self) -> bool {
        self.effects.iter().any(Effect::is_blocking)
    }

    /// 阻塞效果（如果有）是否位于最后
    pub fn blocks_last(&self) -> bool {
        match self.effects.iter().position(Effect::is_blocking) {
            Some(index) => index + 1 == self.effects.len(),
            None => true,
        }
    }
}

/// 时间线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// 种类
    pub kind: TimelineKind,
    /// 步骤（按顺序执行）
    pub steps: Vec<TimelineStep>,
}

impl Timeline {
    /// 创建时间线
    ///
    /// 阻塞效果只能是所在步骤的最后一个效果。
    pub fn new(kind: TimelineKind, steps: Vec<TimelineStep>) -> Self {
        debug_assert!(
            steps.iter().all(TimelineStep::blocks_last),
            "{kind:?} 时间线中阻塞效果之后还有效果"
        );
        Self { kind, steps }
    }

    /// 步骤数量
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// 是否没有步骤
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 获取步骤
    pub fn step(&self, index: usize) -> Option<&TimelineStep> {
        self.steps.get(index)
    }

    /// 所有等待时长之和（不含阻塞效果本身耗费的时间）
    pub fn total_delay(&self) -> Duration {
        self.steps.iter().map(|s| s.delay).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_builder() {
        let step = TimelineStep::after_ms(2500)
            .hide(ElementId::Slideshow1)
            .unhide(ElementId::Slideshow2)
            .on(ElementId::Slideshow2, VisualFlag::FadeIn);

        assert_eq!(step.delay, Duration::from_millis(2500));
        assert_eq!(step.effects.len(), 3);
        assert!(!step.is_blocking());
    }

    #[test]
    fn test_reset_element_clears_transitions() {
        let step = TimelineStep::now().reset_element(ElementId::RewardImage);
        assert_eq!(step.effects.len(), 1 + VisualFlag::TRANSITIONS.len());
        assert_eq!(
            step.effects[0],
            Effect::Flag {
                element: ElementId::RewardImage,
                flag: VisualFlag::Hidden,
                on: true
            }
        );
    }

    #[test]
    fn test_blocking_effects() {
        let reveal = Effect::Reveal {
            sink: ElementId::SadTypedText,
            text: "x".to_string(),
            interval: Duration::from_millis(120),
        };
        assert!(reveal.is_blocking());
        assert!(Effect::AwaitVideoEnd(VideoId::SadBridge).is_blocking());
        assert!(!Effect::PlayVideo(VideoId::SadBridge).is_blocking());
        assert!(!Effect::Finish(Finish::Reset).is_blocking());
    }

    #[test]
    fn test_blocks_last() {
        let reveal = Effect::Reveal {
            sink: ElementId::BonusDialogText,
            text: String::new(),
            interval: Duration::from_millis(50),
        };
        let ok = TimelineStep::now()
            .unhide(ElementId::RewardImage)
            .then(reveal.clone());
        assert!(ok.blocks_last());
        assert!(TimelineStep::after_ms(100).blocks_last());

        let bad = TimelineStep::now()
            .then(reveal)
            .unhide(ElementId::RewardImage);
        assert!(!bad.blocks_last());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "阻塞效果之后还有效果")]
    fn test_effect_after_blocking_is_rejected() {
        Timeline::new(
            TimelineKind::Sad,
            vec![
                TimelineStep::now()
                    .then(Effect::AwaitVideoEnd(VideoId::SadBridge))
                    .then(Effect::Finish(Finish::Reset)),
            ],
        );
    }

    #[test]
    fn test_total_delay() {
        let timeline = Timeline::new(
            TimelineKind::Intro,
            vec![TimelineStep::after_ms(500), TimelineStep::after_ms(2000)],
        );
        assert_eq!(timeline.total_delay(), Duration::from_millis(2500));
        assert_eq!(timeline.len(), 2);
        assert!(timeline.step(2).is_none());
    }
}
