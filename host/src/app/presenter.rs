//! 终端呈现
//!
//! 把 Command 流翻译成人能读的文本行。打字机会为每个字符发出一次完整
//! 文本快照，这里只缓存最新快照，等打字结束后整行输出。

use std::collections::BTreeMap;
use std::io::Write;

use tracing::warn;
use valentine_runtime::{Command, ElementId, Screen, VideoId, VisualFlag};

/// 终端呈现器
#[derive(Debug)]
pub struct Presenter<W: Write> {
    out: W,
    /// 各文本接收端尚未输出的最新文本
    pending: BTreeMap<ElementId, String>,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: BTreeMap::new(),
        }
    }

    /// 输出一行
    pub fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            warn!(error = %e, "终端输出失败");
        }
    }

    /// 以 JSON 行输出 Command
    pub fn echo_json(&mut self, command: &Command) {
        match serde_json::to_string(command) {
            Ok(json) => self.line(&json),
            Err(e) => warn!(error = %e, "Command 序列化失败"),
        }
    }

    /// 观察一条已执行的 Command
    pub fn observe(&mut self, command: &Command) {
        match command {
            Command::ActivateScene { screen } => {
                // 切场景时旧文本已经没有意义
                self.pending.clear();
                self.line(&format!("== {} ==", screen_title(*screen)));
            }
            Command::DeactivateAll => {
                self.pending.clear();
                self.line("== 游戏窗口已关闭 ==");
            }
            Command::SetText { element, text } => {
                if !speaks(*element) {
                    return;
                }
                if text.is_empty() {
                    self.pending.remove(element);
                } else {
                    self.pending.insert(*element, text.clone());
                }
            }
            Command::SetVisualFlag { element, flag, on } => {
                self.observe_flag(*element, *flag, *on);
            }
            // 只有刚打完一句台词时才提示继续，重开时的恢复不提示
            Command::SetContinueEnabled { enabled: true }
                if self.pending.contains_key(&ElementId::DialogText) =>
            {
                self.flush_texts();
                self.line("  (continue)");
            }
            Command::FocusInput {
                element: ElementId::NameInput,
            } => self.line("  (name <你的名字>)"),
            Command::NowPlaying { title } => self.line(&format!("♪ {title}")),
            Command::PlayVideo { video } => self.line(&format!("▶ {}", video_title(*video))),
            _ => {}
        }
    }

    fn observe_flag(&mut self, element: ElementId, flag: VisualFlag, on: bool) {
        match (element, flag, on) {
            (ElementId::ChoiceModal, VisualFlag::Active, true) => {
                self.flush_texts();
                self.line("  (yes / no)");
            }
            (ElementId::NameInput, VisualFlag::Error, true) => {
                self.line("  名字不能为空");
            }
            (ElementId::ItemFocusOverlay, VisualFlag::Hidden, false) => {
                self.flush_texts();
                self.line("  (close-focus)");
            }
            (ElementId::EasterEggOverlay, VisualFlag::Hidden, false) => {
                self.line("  (close-video)");
            }
            (ElementId::GoodEndingLabel, VisualFlag::Hidden, false) => self.line("[GOOD ENDING]"),
            (ElementId::BadEndingLabel, VisualFlag::Hidden, false) => self.line("[BAD ENDING]"),
            (ElementId::BonusUnlocked, VisualFlag::Hidden, false) => {
                self.line("[BONUS UNLOCKED]")
            }
            _ => {}
        }
    }

    /// 输出所有缓存的完整文本
    pub fn flush_texts(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for (element, text) in pending {
            match speaker(element) {
                Some(name) => self.line(&format!("{name}: {text}")),
                None => self.line(&text),
            }
        }
    }

    /// 是否有尚未输出的文本
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// 会在终端显示的文本接收端
fn speaks(element: ElementId) -> bool {
    ElementId::TEXT_SINKS.contains(&element) || element == ElementId::FocusMessage
}

fn speaker(element: ElementId) -> Option<&'static str> {
    match element {
        ElementId::DialogText => Some("Imms"),
        _ => None,
    }
}

fn screen_title(screen: Screen) -> &'static str {
    match screen {
        Screen::Intro => "Intro",
        Screen::Start => "Start",
        Screen::Name => "Name",
        Screen::Room => "Room",
        Screen::Dialog => "Dialog",
        Screen::SadEnding => "Sad Ending",
        Screen::HappyEnding => "Happy Ending",
        Screen::Bonus => "Bonus",
    }
}

fn video_title(video: VideoId) -> &'static str {
    match video {
        VideoId::SadBridge => "sad-bridge",
        VideoId::EasterEgg => "gregory-meme",
    }
}
