//! # Timeline 运行器
//!
//! 解释执行 [`Timeline`] 数据。运行器本身不持有时钟，只负责
//! "下一步是哪一步、等多久"，由 `GameController` 把返回的
//! `(StepToken, Duration)` 登记到调度器。
//!
//! ## 状态机
//!
//! ```text
//! Idle ──start──► Scheduled(t) ──take_step──► Applying(t)
//!                     ▲                          │
//!                     │                 finish_step / suspend
//!                     │                          ▼
//!                     └────── resume ◄──── Suspended{t, wait}
//! ```
//!
//! 每次 `start` 都会分配新的运行 id，旧运行的定时器携带的
//! [`StepToken`] 因此失效。

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::scene::VideoId;
use crate::script::{Timeline, TimelineKind, TimelineStep};

/// 步骤令牌：定时器用它找回自己所属的运行和步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepToken {
    /// 运行 id
    pub run: u64,
    /// 步骤序号
    pub index: usize,
}

/// 阻塞效果等待的完成信号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wait {
    /// 打字机完成
    Reveal,
    /// 视频自然结束
    Video(VideoId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunnerState {
    Idle,
    Scheduled(StepToken),
    Applying(StepToken),
    Suspended { token: StepToken, wait: Wait },
}

/// 时间线运行器
#[derive(Debug, Clone)]
pub struct TimelineRunner {
    timeline: Option<Timeline>,
    run: u64,
    state: RunnerState,
}

impl Default for TimelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineRunner {
    /// 创建空闲的运行器
    pub fn new() -> Self {
        Self {
            timeline: None,
            run: 0,
            state: RunnerState::Idle,
        }
    }

    /// 开始运行时间线（会取消正在运行的时间线）
    ///
    /// 返回第一步的令牌和等待时长；空时间线直接回到空闲。
    pub fn start(&mut self, timeline: Timeline) -> Option<(StepToken, Duration)> {
        self.run += 1;
        debug!(kind = ?timeline.kind, run = self.run, steps = timeline.len(), "开始时间线");

        let first = timeline.step(0).map(|s| s.delay);
        self.timeline = Some(timeline);
        match first {
            Some(delay) => {
                let token = StepToken {
                    run: self.run,
                    index: 0,
                };
                self.state = RunnerState::Scheduled(token);
                Some((token, delay))
            }
            None => {
                self.cancel();
                None
            }
        }
    }

    /// 取出到期的步骤
    ///
    /// 令牌与当前等待的步骤不一致时返回 `None`（过期定时器）。
    pub fn take_step(&mut self, token: StepToken) -> Option<TimelineStep> {
        if self.state != RunnerState::Scheduled(token) {
            trace!(?token, "忽略过期的时间线步骤");
            return None;
        }
        let step = self.timeline.as_ref()?.step(token.index)?.clone();
        self.state = RunnerState::Applying(token);
        Some(step)
    }

    /// 当前步骤含阻塞效果：挂起，等待完成信号
    pub fn suspend(&mut self, wait: Wait) {
        if let RunnerState::Applying(token) = self.state {
            self.state = RunnerState::Suspended { token, wait };
        }
    }

    /// 收到完成信号，若正在等待它则安排下一步
    pub fn resume(&mut self, wait: Wait) -> Option<(StepToken, Duration)> {
        match self.state {
            RunnerState::Suspended { token, wait: w } if w == wait => self.schedule_after(token),
            _ => {
                trace!(?wait, "运行器没有在等待该信号");
                None
            }
        }
    }

    /// 当前步骤的效果已全部应用
    ///
    /// 没有挂起时安排下一步；最后一步完成后回到空闲。
    pub fn finish_step(&mut self, token: StepToken) -> Option<(StepToken, Duration)> {
        if self.state != RunnerState::Applying(token) {
            return None;
        }
        self.schedule_after(token)
    }

    fn schedule_after(&mut self, token: StepToken) -> Option<(StepToken, Duration)> {
        let next = StepToken {
            run: token.run,
            index: token.index + 1,
        };
        match self.timeline.as_ref().and_then(|t| t.step(next.index)) {
            Some(step) => {
                let delay = step.delay;
                self.state = RunnerState::Scheduled(next);
                Some((next, delay))
            }
            None => {
                debug!(kind = ?self.kind(), run = token.run, "时间线结束");
                self.cancel();
                None
            }
        }
    }

    /// 停止运行
    pub fn cancel(&mut self) {
        self.timeline = None;
        self.state = RunnerState::Idle;
    }

    /// 当前运行 id
    pub fn run_id(&self) -> u64 {
        self.run
    }

    /// 正在运行的时间线种类
    pub fn kind(&self) -> Option<TimelineKind> {
        self.timeline.as_ref().map(|t| t.kind)
    }

    /// 是否有时间线在运行
    pub fn is_running(&self) -> bool {
        self.state != RunnerState::Idle
    }

    /// 挂起时等待的信号
    pub fn waiting_for(&self) -> Option<Wait> {
        match self.state {
            RunnerState::Suspended { wait, .. } => Some(wait),
            _ => None,
        }
    }
}
