//! # Command 模块
//!
//! 定义 Runtime 向 Host 发出的所有指令。
//! Command 是 Runtime 与 Host 之间的**唯一通信方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"做什么"，不描述"怎么做"
//! - **无副作用**：Command 本身不执行任何操作
//! - **设备无关**：音频以逻辑曲目 [`CueId`] 表示，不涉及播放设备
//!
//! 媒体播放失败由 Host 记录日志后吞掉，Runtime 的时间线照常推进。

use serde::{Deserialize, Serialize};

use crate::audio::CueId;
use crate::scene::{ElementId, VideoId, VisualFlag};
use crate::state::Screen;

/// Runtime 向 Host 发出的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// 激活场景（互斥，Host 需先隐藏其他场景）
    ActivateScene {
        /// 目标场景
        screen: Screen,
    },

    /// 取消所有场景（游戏窗口关闭）
    DeactivateAll,

    /// 打开/关闭元素的显示标记
    SetVisualFlag {
        /// 目标元素
        element: ElementId,
        /// 标记
        flag: VisualFlag,
        /// true = 添加，false = 移除
        on: bool,
    },

    /// 设置元素文本（打字机每个字符都会发出一次完整快照）
    SetText {
        /// 目标元素
        element: ElementId,
        /// 完整文本
        text: String,
    },

    /// 设置元素图片
    SetImage {
        /// 目标元素
        element: ElementId,
        /// 图片资源路径
        asset: String,
    },

    /// 启用/禁用对话"继续"按钮（禁用时同时隐藏）
    SetContinueEnabled {
        /// 是否启用
        enabled: bool,
    },

    /// 将输入焦点移到元素上
    FocusInput {
        /// 目标元素
        element: ElementId,
    },

    /// 从头播放曲目
    PlayCue {
        /// 曲目
        cue: CueId,
        /// 音量 (0.0 - 1.0)
        volume: f32,
    },

    /// 停止曲目并回到开头
    StopCue {
        /// 曲目
        cue: CueId,
    },

    /// 暂停曲目（保留进度，可恢复）
    PauseCue {
        /// 曲目
        cue: CueId,
    },

    /// 从暂停处恢复曲目
    ResumeCue {
        /// 曲目
        cue: CueId,
    },

    /// 调整曲目音量
    SetCueVolume {
        /// 曲目
        cue: CueId,
        /// 音量 (0.0 - 1.0)
        volume: f32,
    },

    /// 更新"正在播放"显示
    NowPlaying {
        /// 曲目标题
        title: String,
    },

    /// 从头播放视频；播放结束时 Host 需回传 `InputEvent::VideoEnded`
    PlayVideo {
        /// 视频
        video: VideoId,
    },

    /// 停止视频并回到开头
    StopVideo {
        /// 视频
        video: VideoId,
    },
}

impl Command {
    /// 是否为音频指令
    pub fn is_audio(&self) -> bool {
        matches!(
            self,
            Command::PlayCue { .. }
                | Command::StopCue { .. }
                | Command::PauseCue { .. }
                | Command::ResumeCue { .. }
                | Command::SetCueVolume { .. }
                | Command::NowPlaying { .. }
        )
    }

    /// 便捷构造：设置显示标记
    pub fn flag(element: ElementId, flag: VisualFlag, on: bool) -> Self {
        Command::SetVisualFlag { element, flag, on }
    }

    /// 便捷构造：设置文本
    pub fn text(element: ElementId, text: impl Into<String>) -> Self {
        Command::SetText {
            element,
            text: text.into(),
        }
    }
}
