//! # Input 模块
//!
//! 输入处理，负责把终端文本行转换为 `InputEvent`。
//!
//! ## 设计说明
//!
//! - 每行一条指令，空行与 `#` 开头的注释行被忽略
//! - 指令名不区分大小写，参数保持原样（名字可以包含空格）
//! - 除游戏输入外，还有宿主自身的指令：打开窗口、等待、退出、帮助

use std::time::Duration;

use thiserror::Error;
use valentine_runtime::{ChoiceAnswer, InputEvent};

/// 帮助文本
pub const HELP: &str = "\
指令:
  open             打开游戏窗口（开始开场动画）
  start            标题画面按下开始
  name <名字>      提交名字
  click <物件>     点击房间物件 (imms/picture/plushies/gregory/...)
  continue | c     对话继续
  yes | no         回答选择弹窗
  mute             切换静音
  close-focus      关闭物件特写
  close-video      关闭彩蛋视频
  reset            重开
  close            关闭游戏窗口
  wait <毫秒>      等待一段时间
  quit | exit      退出
  help             显示本帮助";

/// 宿主输入
#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    /// 游戏输入
    Game(InputEvent),
    /// 打开游戏窗口
    Open,
    /// 等待一段时间
    Wait(Duration),
    /// 退出宿主
    Quit,
    /// 显示帮助
    Help,
}

/// 输入解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("未知指令: {0}（输入 help 查看可用指令）")]
    UnknownCommand(String),

    #[error("指令 {0} 缺少参数")]
    MissingArgument(&'static str),

    #[error("无效的数字: {0}")]
    InvalidNumber(String),
}

/// 解析一行输入
///
/// 空行和注释返回 `Ok(None)`。
pub fn parse_line(line: &str) -> Result<Option<HostInput>, InputError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let input = match head.to_lowercase().as_str() {
        "open" => HostInput::Open,
        "start" => HostInput::Game(InputEvent::StartPressed),
        // 名字允许为空，交给 Runtime 显示错误提示
        "name" => HostInput::Game(InputEvent::name(rest)),
        "click" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument("click"));
            }
            HostInput::Game(InputEvent::select(rest))
        }
        "continue" | "c" => HostInput::Game(InputEvent::ContinueDialog),
        "yes" => HostInput::Game(InputEvent::ChoiceMade(ChoiceAnswer::Yes)),
        "no" => HostInput::Game(InputEvent::ChoiceMade(ChoiceAnswer::No)),
        "mute" => HostInput::Game(InputEvent::MuteToggled),
        "close-focus" => HostInput::Game(InputEvent::ItemFocusClosed),
        "close-video" => HostInput::Game(InputEvent::EasterEggClosed),
        "reset" => HostInput::Game(InputEvent::ResetRequested),
        "close" => HostInput::Game(InputEvent::CloseRequested),
        "wait" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument("wait"));
            }
            let ms: u64 = rest
                .parse()
                .map_err(|_| InputError::InvalidNumber(rest.to_string()))?;
            HostInput::Wait(Duration::from_millis(ms))
        }
        "quit" | "exit" => HostInput::Quit,
        "help" | "?" => HostInput::Help,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };

    Ok(Some(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use valentine_runtime::RoomObject;

    #[test]
    fn test_blank_and_comments() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# 走到房间"), Ok(None));
    }

    #[test]
    fn test_game_inputs() {
        assert_eq!(
            parse_line("START"),
            Ok(Some(HostInput::Game(InputEvent::StartPressed)))
        );
        assert_eq!(
            parse_line("c"),
            Ok(Some(HostInput::Game(InputEvent::ContinueDialog)))
        );
        assert_eq!(
            parse_line("click Gregory"),
            Ok(Some(HostInput::Game(InputEvent::RoomObjectSelected(
                RoomObject::Gregory
            ))))
        );
        assert_eq!(
            parse_line("no"),
            Ok(Some(HostInput::Game(InputEvent::ChoiceMade(
                ChoiceAnswer::No
            ))))
        );
    }

    #[test]
    fn test_name_keeps_inner_spaces() {
        assert_eq!(
            parse_line("name   Mary Jane  "),
            Ok(Some(HostInput::Game(InputEvent::name("Mary Jane"))))
        );
        assert_eq!(
            parse_line("name"),
            Ok(Some(HostInput::Game(InputEvent::name(""))))
        );
    }

    #[test]
    fn test_host_inputs() {
        assert_eq!(parse_line("open"), Ok(Some(HostInput::Open)));
        assert_eq!(parse_line("exit"), Ok(Some(HostInput::Quit)));
        assert_eq!(
            parse_line("wait 1500"),
            Ok(Some(HostInput::Wait(Duration::from_millis(1500))))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_line("dance"),
            Err(InputError::UnknownCommand("dance".to_string()))
        );
        assert_eq!(parse_line("click"), Err(InputError::MissingArgument("click")));
        assert_eq!(
            parse_line("wait soon"),
            Err(InputError::InvalidNumber("soon".to_string()))
        );
    }
}
