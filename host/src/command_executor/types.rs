//! Command Executor 类型定义

use std::time::Duration;

use valentine_runtime::VideoId;

/// Command 执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteResult {
    /// 执行成功，继续
    Ok,
    /// 视频开始播放，`duration` 后自然结束
    VideoStarted {
        /// 视频
        video: VideoId,
        /// 模拟播放时长
        duration: Duration,
    },
    /// 视频被停止
    VideoStopped(VideoId),
    /// 视频无法播放，应立即按自然结束处理
    VideoFailed(VideoId),
}

impl Default for ExecuteResult {
    fn default() -> Self {
        Self::Ok
    }
}

impl ExecuteResult {
    /// 是否需要宿主进一步处理
    pub fn is_ok(&self) -> bool {
        matches!(self, ExecuteResult::Ok)
    }
}
