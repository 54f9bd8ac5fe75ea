//! # Command Executor 模块
//!
//! Command 执行器，负责将 Runtime 发出的 Command 转换为实际操作。
//!
//! ## 设计说明
//!
//! - `CommandExecutor` 接收 `Command`，更新 `StageState` 并控制 `ConsoleMixer`
//! - 执行器不输出任何内容，终端显示由 `Presenter` 负责
//! - 视频只有模拟时长，开始/停止/失败通过 `ExecuteResult` 告诉调用方

mod types;

pub use types::*;

use std::path::PathBuf;

use tracing::{debug, warn};
use valentine_runtime::{Command, VideoId};

use crate::audio::ConsoleMixer;
use crate::config::{AppConfig, VideoConfig};
use crate::stage::StageState;

/// Command 执行器
#[derive(Debug)]
pub struct CommandExecutor {
    /// 视频配置
    video: VideoConfig,
    /// 资源根目录
    assets_root: PathBuf,
    /// 是否检查资源存在
    check_assets: bool,
}

impl CommandExecutor {
    /// 创建新的 Command 执行器
    pub fn new(config: &AppConfig) -> Self {
        Self {
            video: config.video.clone(),
            assets_root: config.assets_root.clone(),
            check_assets: config.check_assets,
        }
    }

    /// 执行单个 Command
    pub fn execute(
        &mut self,
        command: &Command,
        stage: &mut StageState,
        mixer: &mut ConsoleMixer,
    ) -> ExecuteResult {
        match command {
            Command::ActivateScene { screen } => {
                stage.activate(*screen);
                ExecuteResult::Ok
            }
            Command::DeactivateAll => {
                stage.deactivate_all();
                ExecuteResult::Ok
            }
            Command::SetVisualFlag { element, flag, on } => {
                stage.set_flag(*element, *flag, *on);
                ExecuteResult::Ok
            }
            Command::SetText { element, text } => {
                stage.set_text(*element, text);
                ExecuteResult::Ok
            }
            Command::SetImage { element, asset } => {
                stage.set_image(*element, asset);
                ExecuteResult::Ok
            }
            Command::SetContinueEnabled { enabled } => {
                stage.continue_enabled = *enabled;
                ExecuteResult::Ok
            }
            Command::FocusInput { element } => {
                stage.focused = Some(*element);
                ExecuteResult::Ok
            }
            Command::PlayCue { cue, volume } => {
                mixer.play(*cue, *volume);
                ExecuteResult::Ok
            }
            Command::StopCue { cue } => {
                mixer.stop(*cue);
                ExecuteResult::Ok
            }
            Command::PauseCue { cue } => {
                mixer.pause(*cue);
                ExecuteResult::Ok
            }
            Command::ResumeCue { cue } => {
                mixer.resume(*cue);
                ExecuteResult::Ok
            }
            Command::SetCueVolume { cue, volume } => {
                mixer.set_volume(*cue, *volume);
                ExecuteResult::Ok
            }
            Command::NowPlaying { title } => {
                stage.now_playing = Some(title.clone());
                ExecuteResult::Ok
            }
            Command::PlayVideo { video } => self.execute_play_video(*video, stage),
            Command::StopVideo { video } => {
                let was_playing = stage.is_playing(*video);
                stage.stop_video(*video);
                if was_playing {
                    ExecuteResult::VideoStopped(*video)
                } else {
                    ExecuteResult::Ok
                }
            }
        }
    }

    fn execute_play_video(&mut self, video: VideoId, stage: &mut StageState) -> ExecuteResult {
        let path = self.assets_root.join(&self.video.clip(video).path);
        if self.check_assets && !path.exists() {
            warn!(?video, path = %path.display(), "视频资源不存在，按播放结束处理");
            return ExecuteResult::VideoFailed(video);
        }

        let duration = self.video.duration(video);
        debug!(?video, ?duration, "播放视频");
        stage.start_video(video);
        ExecuteResult::VideoStarted { video, duration }
    }

    /// 批量执行 Commands
    ///
    /// 返回所有需要调用方处理的结果（忽略 `Ok`）。
    pub fn execute_batch(
        &mut self,
        commands: &[Command],
        stage: &mut StageState,
        mixer: &mut ConsoleMixer,
    ) -> Vec<ExecuteResult> {
        commands
            .iter()
            .map(|command| self.execute(command, stage, mixer))
            .filter(|result| !result.is_ok())
            .collect()
    }
}
