//! # Audio 模块
//!
//! 控制台混音器：记录每个曲目的播放状态和音量，不接触真实设备。
//!
//! ## 功能特性
//!
//! - 播放/停止/暂停/恢复/调音量，与 Runtime 的音频指令一一对应
//! - 资源缺失或声音关闭时记录日志后忽略，不影响游戏流程
//! - UI 点击音效与音乐一样走同一套通道

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};
use valentine_runtime::CueId;

use crate::config::AppConfig;

/// 通道状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// 播放中
    Playing,
    /// 已暂停（保留进度）
    Paused,
    /// 已停止（回到开头）
    Stopped,
}

/// 曲目通道
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    /// 状态
    pub state: ChannelState,
    /// 音量 (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            state: ChannelState::Stopped,
            volume: valentine_runtime::audio::BASE_VOLUME,
        }
    }
}

/// 控制台混音器
#[derive(Debug, Clone)]
pub struct ConsoleMixer {
    /// 是否启用声音
    enabled: bool,
    /// 是否检查资源存在
    check_assets: bool,
    /// 各曲目资源路径
    paths: BTreeMap<CueId, PathBuf>,
    /// 各曲目通道
    channels: BTreeMap<CueId, Channel>,
}

impl ConsoleMixer {
    /// 根据配置创建混音器
    pub fn new(config: &AppConfig) -> Self {
        let paths = CueId::ALL
            .iter()
            .filter_map(|&cue| config.cue_path(cue).map(|path| (cue, path)))
            .collect();
        Self {
            enabled: config.audio.enabled,
            check_assets: config.check_assets,
            paths,
            channels: BTreeMap::new(),
        }
    }

    /// 从头播放
    ///
    /// 声音关闭、资源未配置或缺失时记录日志并忽略。
    pub fn play(&mut self, cue: CueId, volume: f32) {
        if !self.enabled {
            debug!(cue = cue.key(), "声音已关闭，忽略播放");
            return;
        }
        let Some(path) = self.paths.get(&cue) else {
            warn!(cue = cue.key(), "曲目没有配置资源，忽略播放");
            return;
        };
        if self.check_assets && !path.exists() {
            warn!(cue = cue.key(), path = %path.display(), "曲目资源不存在，忽略播放");
            return;
        }

        debug!(cue = cue.key(), volume, "播放曲目");
        self.channels.insert(
            cue,
            Channel {
                state: ChannelState::Playing,
                volume,
            },
        );
    }

    /// 停止并回到开头
    pub fn stop(&mut self, cue: CueId) {
        if let Some(channel) = self.channels.get_mut(&cue) {
            channel.state = ChannelState::Stopped;
        }
    }

    /// 暂停
    pub fn pause(&mut self, cue: CueId) {
        match self.channels.get_mut(&cue) {
            Some(channel) if channel.state == ChannelState::Playing => {
                channel.state = ChannelState::Paused;
            }
            _ => debug!(cue = cue.key(), "曲目没有在播放，忽略暂停"),
        }
    }

    /// 从暂停处恢复
    pub fn resume(&mut self, cue: CueId) {
        match self.channels.get_mut(&cue) {
            Some(channel) if channel.state == ChannelState::Paused => {
                channel.state = ChannelState::Playing;
            }
            _ => debug!(cue = cue.key(), "曲目没有暂停，忽略恢复"),
        }
    }

    /// 调整音量（对未播放的曲目同样生效）
    pub fn set_volume(&mut self, cue: CueId, volume: f32) {
        self.channels.entry(cue).or_default().volume = volume.clamp(0.0, 1.0);
    }

    /// 曲目是否在播放
    pub fn is_playing(&self, cue: CueId) -> bool {
        self.state(cue) == ChannelState::Playing
    }

    /// 曲目状态
    pub fn state(&self, cue: CueId) -> ChannelState {
        self.channels
            .get(&cue)
            .map(|c| c.state)
            .unwrap_or(ChannelState::Stopped)
    }

    /// 曲目音量
    pub fn volume(&self, cue: CueId) -> f32 {
        self.channels.get(&cue).copied().unwrap_or_default().volume
    }

    /// 所有正在播放的曲目
    pub fn playing(&self) -> Vec<CueId> {
        self.channels
            .iter()
            .filter(|(_, c)| c.state == ChannelState::Playing)
            .map(|(cue, _)| *cue)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer() -> ConsoleMixer {
        ConsoleMixer::new(&AppConfig::default())
    }

    #[test]
    fn test_play_pause_resume_stop() {
        let mut mixer = mixer();
        mixer.play(CueId::MainTheme, 0.6);
        assert!(mixer.is_playing(CueId::MainTheme));

        mixer.pause(CueId::MainTheme);
        assert_eq!(mixer.state(CueId::MainTheme), ChannelState::Paused);

        mixer.resume(CueId::MainTheme);
        assert!(mixer.is_playing(CueId::MainTheme));

        mixer.stop(CueId::MainTheme);
        assert_eq!(mixer.state(CueId::MainTheme), ChannelState::Stopped);
        // 停止后不能恢复
        mixer.resume(CueId::MainTheme);
        assert!(!mixer.is_playing(CueId::MainTheme));
    }

    #[test]
    fn test_volume() {
        let mut mixer = mixer();
        mixer.set_volume(CueId::Heartbeat, 0.0);
        assert_eq!(mixer.volume(CueId::Heartbeat), 0.0);
        assert_eq!(mixer.state(CueId::Heartbeat), ChannelState::Stopped);

        mixer.play(CueId::Heartbeat, 1.0);
        assert_eq!(mixer.volume(CueId::Heartbeat), 1.0);
    }

    #[test]
    fn test_disabled_audio_is_silent() {
        let config = AppConfig {
            audio: crate::config::AudioConfig {
                enabled: false,
                ..Default::default()
            },
            ..AppConfig::default()
        };
        let mut mixer = ConsoleMixer::new(&config);
        mixer.play(CueId::StartTheme, 0.6);
        assert!(mixer.playing().is_empty());
    }

    #[test]
    fn test_missing_asset_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            assets_root: dir.path().to_path_buf(),
            check_assets: true,
            ..AppConfig::default()
        };
        let mut mixer = ConsoleMixer::new(&config);
        mixer.play(CueId::CelebrationTheme, 0.6);
        assert!(!mixer.is_playing(CueId::CelebrationTheme));

        let path = config.cue_path(CueId::UiClick).unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"").unwrap();
        mixer.play(CueId::UiClick, 1.0);
        assert!(mixer.is_playing(CueId::UiClick));
    }
}
