//! # App 模块
//!
//! 应用状态与驱动逻辑。
//!
//! `App` 把 Runtime、舞台状态、混音器和终端呈现连在一起：
//!
//! ```text
//! 文本行 ──parse_line──► InputEvent ──► GameController
//!                                           │ take_commands()
//!                                           ▼
//!                   CommandExecutor ──► StageState / ConsoleMixer
//!                          │
//!                          └──► Presenter ──► 终端
//! ```
//!
//! 视频没有真实画面，按配置的时长模拟，到点后以 `VideoEnded` 回传。
//! 所有时间都以 Runtime 的虚拟时钟计。

mod clock;
mod presenter;

pub use clock::{RealClock, drive};
pub use presenter::Presenter;

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use tracing::{debug, info, warn};
use valentine_runtime::{GameController, InputEvent, VideoId};

use crate::audio::ConsoleMixer;
use crate::command_executor::{CommandExecutor, ExecuteResult};
use crate::config::AppConfig;
use crate::input::{HELP, HostInput, parse_line};
use crate::stage::StageState;

/// 处理一行输入后，驱动循环应该做什么
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// 继续读下一行
    Continue,
    /// 等待一段时间再读下一行
    Wait(Duration),
    /// 退出
    Quit,
}

/// 应用状态
#[derive(Debug)]
pub struct App<W: Write> {
    game: GameController,
    stage: StageState,
    mixer: ConsoleMixer,
    executor: CommandExecutor,
    presenter: Presenter<W>,
    /// 正在播放的视频及其自然结束时间
    videos: BTreeMap<VideoId, Duration>,
    echo_commands: bool,
}

impl<W: Write> App<W> {
    /// 创建应用（游戏窗口尚未打开）
    pub fn new(config: &AppConfig, out: W) -> Self {
        Self {
            game: GameController::new(),
            stage: StageState::new(),
            mixer: ConsoleMixer::new(config),
            executor: CommandExecutor::new(config),
            presenter: Presenter::new(out),
            videos: BTreeMap::new(),
            echo_commands: config.echo_commands,
        }
    }

    /// 打开游戏窗口
    pub fn open(&mut self) {
        info!("打开游戏窗口");
        self.game.start();
        self.flush();
    }

    /// 处理一行文本输入
    pub fn handle_line(&mut self, line: &str) -> Flow {
        match parse_line(line) {
            Ok(None) => Flow::Continue,
            Ok(Some(HostInput::Game(input))) => {
                self.dispatch(input);
                Flow::Continue
            }
            Ok(Some(HostInput::Open)) => {
                self.open();
                Flow::Continue
            }
            Ok(Some(HostInput::Wait(duration))) => Flow::Wait(duration),
            Ok(Some(HostInput::Quit)) => Flow::Quit,
            Ok(Some(HostInput::Help)) => {
                self.presenter.line(HELP);
                Flow::Continue
            }
            Err(e) => {
                warn!(line, error = %e, "无法解析输入，跳过");
                self.presenter.line(&e.to_string());
                Flow::Continue
            }
        }
    }

    /// 把输入交给 Runtime 并执行产生的 Command
    pub fn dispatch(&mut self, input: InputEvent) {
        // 错误提示已经通过显示标记呈现
        if let Err(e) = self.game.handle_input(input) {
            debug!(error = %e, "输入被拒绝");
        }
        self.flush();
    }

    /// 当前虚拟时间
    pub fn now(&self) -> Duration {
        self.game.now()
    }

    /// 下一次需要唤醒的虚拟时间（定时器或视频结束）
    pub fn next_wake(&self) -> Option<Duration> {
        let video = self.videos.values().min().copied();
        match (self.game.next_deadline(), video) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// 推进虚拟时间
    pub fn advance(&mut self, dt: Duration) {
        let target = self.now() + dt;
        self.advance_to(target);
    }

    /// 推进到指定虚拟时间，沿途按顺序触发定时器与视频结束
    pub fn advance_to(&mut self, target: Duration) {
        while let Some(wake) = self.next_wake().filter(|&wake| wake <= target) {
            let now = self.now();
            self.game.advance(wake.saturating_sub(now));
            self.flush();
            self.finish_due_videos();
        }
        let now = self.now();
        self.game.advance(target.saturating_sub(now));
        self.flush();
    }

    /// 快进：一直推进到没有待处理的定时器和视频
    pub fn fast_forward(&mut self) -> Duration {
        let begin = self.now();
        while let Some(wake) = self.next_wake() {
            self.advance_to(wake);
        }
        self.now() - begin
    }

    fn finish_due_videos(&mut self) {
        let now = self.now();
        let due: Vec<VideoId> = self
            .videos
            .iter()
            .filter(|&(_, &end)| end <= now)
            .map(|(&video, _)| video)
            .collect();
        for video in due {
            self.videos.remove(&video);
            self.stage.stop_video(video);
            debug!(?video, "视频播放结束");
            self.dispatch(InputEvent::VideoEnded(video));
        }
    }

    /// 取走 Runtime 的 Command 并执行
    fn flush(&mut self) {
        let commands = self.game.take_commands();
        if self.echo_commands {
            for command in &commands {
                self.presenter.echo_json(command);
            }
        }

        let results = self
            .executor
            .execute_batch(&commands, &mut self.stage, &mut self.mixer);
        for command in &commands {
            self.presenter.observe(command);
        }
        if !self.game.is_revealing() {
            self.presenter.flush_texts();
        }

        let mut failed = Vec::new();
        for result in results {
            match result {
                ExecuteResult::VideoStarted { video, duration } => {
                    self.videos.insert(video, self.now() + duration);
                }
                ExecuteResult::VideoStopped(video) => {
                    self.videos.remove(&video);
                }
                ExecuteResult::VideoFailed(video) => failed.push(video),
                ExecuteResult::Ok => {}
            }
        }

        // 播放失败的视频立即按结束处理，流程不会卡住
        for video in failed {
            self.dispatch(InputEvent::VideoEnded(video));
        }
    }

    pub fn game(&self) -> &GameController {
        &self.game
    }

    pub fn stage(&self) -> &StageState {
        &self.stage
    }

    pub fn mixer(&self) -> &ConsoleMixer {
        &self.mixer
    }

    /// 视频自然结束时间
    pub fn video_deadline(&self, video: VideoId) -> Option<Duration> {
        self.videos.get(&video).copied()
    }

    pub fn output(&self) -> &W {
        self.presenter.get_ref()
    }

    pub fn into_output(self) -> W {
        self.presenter.into_inner()
    }
}
