//! # Valentine Runtime
//!
//! 情人节小游戏的核心运行时库。
//!
//! ## 架构概述
//!
//! `valentine-runtime` 是纯逻辑核心，不依赖任何 IO、真实时钟或播放设备。
//! 它通过 **命令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                              Runtime
//!   │                                  │
//!   │──── InputEvent ────────────────►│ handle_input()
//!   │──── dt ────────────────────────►│ advance()
//!   │                                  │
//!   │◄─── Vec<Command> ───────────────│ take_commands()
//!   │                                  │
//! ```
//!
//! 流程：开场 → 标题 → 输入名字 → 房间探索 → 对话 → 选择 →
//! 好结局（可能接隐藏结局）/ 坏结局 → 重开。
//!
//! ## 核心类型
//!
//! - [`GameController`]：游戏控制器
//! - [`Command`]：Runtime 向 Host 发出的指令
//! - [`InputEvent`]：Host 向 Runtime 传递的输入
//! - [`Session`]：玩家会话
//!
//! ## 使用示例
//!
//! ```ignore
//! use valentine_runtime::{GameController, InputEvent};
//!
//! let mut game = GameController::new();
//! game.start();
//!
//! loop {
//!     for cmd in game.take_commands() {
//!         host.execute(cmd);
//!     }
//!     match host.next_input() {
//!         Some(input) => game.handle_input(input)?,
//!         None => game.advance(host.elapsed()),
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`command`]：Command 定义
//! - [`input`]：InputEvent 定义
//! - [`state`]：Session 和 Screen 定义
//! - [`scene`]：场景注册表与元素标识
//! - [`audio`]：逻辑曲目播放器
//! - [`typewriter`]：打字机
//! - [`error`]：错误类型定义
//! - [`script`]：固定剧情数据（台词、时间线）
//! - [`runtime`]：执行引擎

pub mod audio;
pub mod command;
pub mod error;
pub mod input;
pub mod runtime;
pub mod scene;
pub mod script;
pub mod state;
pub mod typewriter;

// 重导出核心类型
pub use audio::{AudioCuePlayer, CueId};
pub use command::Command;
pub use error::{GameError, GameResult};
pub use input::{ChoiceAnswer, InputEvent, RoomObject};
pub use runtime::{DialogCursor, DialogSequencer, DialogStep, GameController};
pub use scene::{ElementId, SceneRegistry, VideoId, VisualFlag};
pub use script::{DialogExit, DialogMode, TimelineKind};
pub use state::{Screen, Session};
pub use typewriter::{Typewriter, substitute_name};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let _cmd = Command::text(ElementId::DialogText, "Hello");

        let _input = InputEvent::select("imms");

        let _session = Session::default();

        let game = GameController::new();
        assert_eq!(game.active_scene(), None);
    }
}
