//! # Runtime 模块
//!
//! 游戏执行引擎核心，负责流程编排和状态管理。
//!
//! ## 模块结构
//!
//! - [`engine`]：游戏控制器
//! - [`executor`]：时间线效果到 Command 的转换
//! - [`timeline`]：时间线运行器
//! - [`dialog`]：对话序列器
//! - [`scheduler`]：虚拟时钟与定时器队列

pub mod dialog;
pub mod engine;
pub mod executor;
pub mod scheduler;
pub mod timeline;

pub use dialog::{DialogCursor, DialogSequencer, DialogStep};
pub use engine::GameController;
pub use scheduler::Scheduler;
pub use timeline::{StepToken, TimelineRunner, Wait};
