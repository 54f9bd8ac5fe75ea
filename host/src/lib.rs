//! # Host 层
//!
//! 情人节小游戏的无界面宿主，在终端中驱动 valentine-runtime。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 输入采集（标准输入或输入脚本，每行一条指令）
//! - 驱动 Runtime 的虚拟时钟（实时或快进）
//! - 将 Runtime 的 Command 转换为舞台状态与混音器操作
//! - 模拟视频播放并回传播放结束
//! - 终端呈现
//!
//! Host 层不包含剧情逻辑，只负责执行 Runtime 发出的 Command。

pub mod app;
pub mod audio;
pub mod command_executor;
pub mod config;
pub mod input;
pub mod stage;

pub use app::{App, Flow, Presenter, RealClock, drive};
pub use audio::{ChannelState, ConsoleMixer};
pub use command_executor::{CommandExecutor, ExecuteResult};
pub use config::{AppConfig, AudioConfig, ConfigError, VideoClip, VideoConfig};
pub use input::{HostInput, InputError, parse_line};
pub use stage::StageState;
