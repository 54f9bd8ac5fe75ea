//! # Script 模块
//!
//! 固定的剧情数据：对话台词、房间物件、时间线。
//! 这里只有不可变数据，执行逻辑在 [`crate::runtime`]。
//!
//! ## 模块结构
//!
//! - [`dialog`]：三组台词与出口
//! - [`room`]：房间物件特写
//! - [`timeline`]：时间线数据结构
//! - [`endings`]：开场与各结局时间线

pub mod dialog;
pub mod endings;
pub mod room;
pub mod timeline;

pub use dialog::{DialogExit, DialogMode};
pub use room::{ItemFocus, item_focus};
pub use timeline::{Effect, Finish, Timeline, TimelineKind, TimelineStep};
