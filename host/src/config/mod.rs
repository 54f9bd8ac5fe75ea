//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）
//!
//! 游戏节奏（各种等待时长）不可配置，这里只有宿主自身的行为。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use valentine_runtime::{CueId, VideoId};

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 输入脚本路径；未配置时从标准输入读取
    #[serde(default)]
    pub input_script: Option<PathBuf>,

    /// 快进：不等待真实时间，直接跳到下一个截止时间
    #[serde(default)]
    pub fast_forward: bool,

    /// 把每条 Command 以 JSON 行输出
    #[serde(default)]
    pub echo_commands: bool,

    /// 资源根目录（仅用于检查资源是否存在）
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// 是否检查媒体资源存在；缺失的资源按播放失败处理
    #[serde(default)]
    pub check_assets: bool,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 视频配置
    #[serde(default)]
    pub video: VideoConfig,
}

/// 音频配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// 是否启用声音输出
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 曲目资源路径（键为曲目名，相对于 assets_root）
    #[serde(default = "default_cue_paths")]
    pub cues: BTreeMap<String, String>,
}

/// 视频片段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoClip {
    /// 资源路径（相对于 assets_root）
    pub path: String,
    /// 模拟播放时长（毫秒）
    pub duration_ms: u64,
}

/// 视频配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// 坏结局过场视频
    #[serde(default = "default_sad_bridge")]
    pub sad_bridge: VideoClip,

    /// 彩蛋视频
    #[serde(default = "default_easter_egg")]
    pub easter_egg: VideoClip,
}

impl VideoConfig {
    /// 获取视频片段配置
    pub fn clip(&self, video: VideoId) -> &VideoClip {
        match video {
            VideoId::SadBridge => &self.sad_bridge,
            VideoId::EasterEgg => &self.easter_egg,
        }
    }

    /// 视频模拟时长
    pub fn duration(&self, video: VideoId) -> Duration {
        Duration::from_millis(self.clip(video).duration_ms)
    }
}

// 默认值函数
fn default_log_level() -> String {
    "info".to_string()
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_true() -> bool {
    true
}

fn default_cue_paths() -> BTreeMap<String, String> {
    [
        (CueId::StartTheme, "audio/start-jazz.mp3"),
        (CueId::MainTheme, "audio/main-jazz.mp3"),
        (CueId::Heartbeat, "audio/heartbeat.mp3"),
        (CueId::SomberTheme, "audio/sad-jazz.mp3"),
        (CueId::CelebrationTheme, "audio/celebration.mp3"),
        (CueId::UiClick, "audio/button-click.mp3"),
    ]
    .into_iter()
    .map(|(cue, path)| (cue.key().to_string(), path.to_string()))
    .collect()
}

fn default_sad_bridge() -> VideoClip {
    VideoClip {
        path: "videos/sad-bridge.mp4".to_string(),
        duration_ms: 6000,
    }
}

fn default_easter_egg() -> VideoClip {
    VideoClip {
        path: "videos/gregory-meme.mp4".to_string(),
        duration_ms: 8000,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            input_script: None,
            fast_forward: false,
            echo_commands: false,
            assets_root: default_assets_root(),
            check_assets: false,
            audio: AudioConfig::default(),
            video: VideoConfig::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cues: default_cue_paths(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            sad_bridge: default_sad_bridge(),
            easter_egg: default_easter_egg(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 文件不存在时返回默认配置；读取或解析失败时返回错误。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "配置文件加载成功");
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level()?;

        for key in self.audio.cues.keys() {
            if !CueId::ALL.iter().any(|cue| cue.key() == key) {
                warn!(key = %key, "未知的曲目名，将被忽略");
            }
        }

        if self.input_script.as_ref().is_some_and(|p| !p.exists()) {
            return Err(ConfigError::Validation(format!(
                "输入脚本不存在: {:?}",
                self.input_script
            )));
        }

        Ok(())
    }

    /// 解析日志级别
    pub fn level(&self) -> Result<tracing::Level, ConfigError> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| ConfigError::Validation(format!("无效的日志级别: {}", self.log_level)))
    }

    /// 曲目资源完整路径
    pub fn cue_path(&self, cue: CueId) -> Option<PathBuf> {
        self.audio
            .cues
            .get(cue.key())
            .map(|p| self.assets_root.join(p))
    }

    /// 视频资源完整路径
    pub fn video_path(&self, video: VideoId) -> PathBuf {
        self.assets_root.join(&self.video.clip(video).path)
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读写失败
    #[error("配置 IO 错误 {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 解析失败
    #[error("配置解析失败 {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialize(#[source] serde_json::Error),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}
