//! # Audio 模块
//!
//! 逻辑曲目播放器。
//!
//! Runtime 只按逻辑曲目名（[`CueId`]）发出播放/停止/暂停/音量指令，
//! 不接触任何播放设备。这里维护的是 Runtime 视角的播放状态：
//!
//! - 哪些非 UI 曲目正在播放
//! - 哪个曲目被暂停、等待恢复（最多一个）
//! - 是否静音
//!
//! UI 点击音效不受静音影响，也不参与暂停/恢复。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::Command;

/// 曲目基础音量
pub const BASE_VOLUME: f32 = 0.6;
/// UI 点击音效音量
pub const UI_VOLUME: f32 = 1.0;
/// 静音时的音量
pub const MUTED_VOLUME: f32 = 0.0;

/// 逻辑曲目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CueId {
    /// 标题画面爵士乐
    StartTheme,
    /// 主题曲
    MainTheme,
    /// 心跳声（等待回答时）
    Heartbeat,
    /// 悲伤主题
    SomberTheme,
    /// 庆祝音乐
    CelebrationTheme,
    /// UI 点击音效
    UiClick,
}

impl CueId {
    /// 所有曲目
    pub const ALL: [CueId; 6] = [
        CueId::StartTheme,
        CueId::MainTheme,
        CueId::Heartbeat,
        CueId::SomberTheme,
        CueId::CelebrationTheme,
        CueId::UiClick,
    ];

    /// 所有非 UI 曲目
    pub const MUSIC: [CueId; 5] = [
        CueId::StartTheme,
        CueId::MainTheme,
        CueId::Heartbeat,
        CueId::SomberTheme,
        CueId::CelebrationTheme,
    ];

    /// 是否为 UI 音效
    pub fn is_ui(&self) -> bool {
        matches!(self, CueId::UiClick)
    }

    /// 显示用标题
    pub fn title(&self) -> &'static str {
        match self {
            CueId::StartTheme => "Start Menu Theme",
            CueId::MainTheme => "Main Theme",
            CueId::Heartbeat => "Heartbeat",
            CueId::SomberTheme => "Sad Theme",
            CueId::CelebrationTheme => "Celebration Theme",
            CueId::UiClick => "Button Click",
        }
    }

    /// 配置文件中使用的键名
    pub fn key(&self) -> &'static str {
        match self {
            CueId::StartTheme => "start-theme",
            CueId::MainTheme => "main-theme",
            CueId::Heartbeat => "heartbeat",
            CueId::SomberTheme => "somber-theme",
            CueId::CelebrationTheme => "celebration-theme",
            CueId::UiClick => "ui-click",
        }
    }
}

/// 逻辑曲目播放器
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioCuePlayer {
    /// 是否静音（跨重开保留）
    muted: bool,
    /// 正在播放的非 UI 曲目
    playing: BTreeSet<CueId>,
    /// 被暂停、等待恢复的曲目
    paused: Option<CueId>,
}

impl AudioCuePlayer {
    /// 创建播放器
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前曲目音量
    fn music_volume(&self) -> f32 {
        if self.muted { MUTED_VOLUME } else { BASE_VOLUME }
    }

    /// 从头播放曲目
    ///
    /// 非 UI 曲目会同时更新"正在播放"显示。
    pub fn play(&mut self, cue: CueId) -> Vec<Command> {
        if cue.is_ui() {
            return vec![Command::PlayCue {
                cue,
                volume: UI_VOLUME,
            }];
        }

        debug!(cue = ?cue, muted = self.muted, "播放曲目");
        self.playing.insert(cue);
        vec![
            Command::NowPlaying {
                title: cue.title().to_string(),
            },
            Command::PlayCue {
                cue,
                volume: self.music_volume(),
            },
        ]
    }

    /// 停止所有非 UI 曲目（包括被暂停的曲目）
    pub fn stop_all(&mut self) -> Vec<Command> {
        let mut stopped: BTreeSet<CueId> = std::mem::take(&mut self.playing);
        stopped.extend(self.paused.take());
        stopped
            .into_iter()
            .map(|cue| Command::StopCue { cue })
            .collect()
    }

    /// 停止所有曲目，包括 UI 音效（关闭游戏窗口时使用）
    pub fn stop_everything(&mut self) -> Vec<Command> {
        let mut commands = self.stop_all();
        commands.push(Command::StopCue { cue: CueId::UiClick });
        commands
    }

    /// 暂停当前播放的曲目，记住它以便恢复
    ///
    /// 若同时有多个曲目在播放，全部暂停，最后一个作为恢复对象。
    pub fn pause_current(&mut self) -> Vec<Command> {
        self.paused = None;
        let playing = std::mem::take(&mut self.playing);
        let mut commands = Vec::with_capacity(playing.len());
        for cue in playing {
            commands.push(Command::PauseCue { cue });
            self.paused = Some(cue);
        }
        commands
    }

    /// 恢复被暂停的曲目
    pub fn resume_paused(&mut self) -> Vec<Command> {
        match self.paused.take() {
            Some(cue) => {
                self.playing.insert(cue);
                vec![Command::ResumeCue { cue }]
            }
            None => Vec::new(),
        }
    }

    /// 切换静音，返回音量指令
    ///
    /// 音量对所有非 UI 曲目生效，不论是否正在播放。
    pub fn toggle_mute(&mut self) -> Vec<Command> {
        self.muted = !self.muted;
        let volume = self.music_volume();
        CueId::MUSIC
            .iter()
            .map(|&cue| Command::SetCueVolume { cue, volume })
            .collect()
    }

    /// 是否静音
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// 指定曲目是否正在播放
    pub fn is_playing(&self, cue: CueId) -> bool {
        self.playing.contains(&cue)
    }

    /// 正在播放的曲目
    pub fn playing(&self) -> impl Iterator<Item = CueId> + '_ {
        self.playing.iter().copied()
    }

    /// 等待恢复的曲目
    pub fn paused(&self) -> Option<CueId> {
        self.paused
    }
}
