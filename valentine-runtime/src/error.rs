//! # Error 模块
//!
//! 定义 valentine-runtime 中使用的错误类型。
//!
//! 错误分类刻意保持最小：除名字为空外，所有不合时宜的输入都会被
//! 记录日志后忽略，不会向 Host 报错。

use thiserror::Error;

/// 游戏流程错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 名字输入为空（去除首尾空白后）
    ///
    /// Runtime 会给名字输入框打上 `Error` 标记并保持在 Name 场景。
    #[error("玩家名字不能为空")]
    EmptyName,
}

/// Result 类型别名
pub type GameResult<T> = Result<T, GameError>;
