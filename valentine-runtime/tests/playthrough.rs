//! # 完整流程集成测试
//!
//! 只通过公开 API 驱动 `GameController`，模拟 Host 的行为：
//! 执行输入、推进虚拟时钟、收集 Command。

use std::time::Duration;

use valentine_runtime::audio::MUTED_VOLUME;
use valentine_runtime::script::endings::{BONUS_MESSAGE, SAD_MESSAGE};
use valentine_runtime::{
    ChoiceAnswer, Command, CueId, ElementId, GameController, GameError, InputEvent, Screen, Session,
    TimelineKind, VideoId, VisualFlag,
};

/// 带 Command 记录的测试驱动
struct Harness {
    game: GameController,
    log: Vec<Command>,
}

impl Harness {
    /// 打开游戏并跳过开场
    fn at_start_screen() -> Self {
        let mut game = GameController::new();
        game.start();
        game.run_until_idle();
        let mut harness = Self {
            game,
            log: Vec::new(),
        };
        harness.collect();
        harness
    }

    fn collect(&mut self) {
        self.log.extend(self.game.take_commands());
    }

    fn input(&mut self, input: InputEvent) {
        self.game.handle_input(input).unwrap();
        self.collect();
    }

    fn run_until_idle(&mut self) {
        self.game.run_until_idle();
        self.collect();
    }

    /// 打完当前台词
    fn finish_reveal(&mut self) {
        while self.game.is_revealing() {
            self.game.step_to_next();
        }
        self.collect();
    }

    /// 逐句点"继续"，直到对话离开当前模式
    fn read_dialog(&mut self, lines: usize) {
        for _ in 0..lines {
            self.finish_reveal();
            self.input(InputEvent::ContinueDialog);
        }
    }

    fn enter_room(&mut self, name: &str) {
        self.input(InputEvent::StartPressed);
        self.input(InputEvent::name(name));
        self.run_until_idle();
    }

    /// 某个文本接收端收到的最后一次文本
    fn last_text(&self, element: ElementId) -> Option<&str> {
        self.log.iter().rev().find_map(|command| match command {
            Command::SetText { element: e, text } if *e == element => Some(text.as_str()),
            _ => None,
        })
    }

    fn activated(&self) -> Vec<Screen> {
        self.log
            .iter()
            .filter_map(|command| match command {
                Command::ActivateScene { screen } => Some(*screen),
                _ => None,
            })
            .collect()
    }
}

#[test]
fn test_happy_path_returns_to_start() {
    let mut h = Harness::at_start_screen();
    h.enter_room("  Alex  ");
    assert_eq!(h.game.session().player_name, "Alex");
    assert!(h.game.audio().is_playing(CueId::MainTheme));

    h.input(InputEvent::select("imms"));
    h.read_dialog(4);
    assert!(h.game.is_choice_pending());
    assert_eq!(
        h.last_text(ElementId::ChoiceQuestion),
        Some("Alex, will you be my Valentine?")
    );
    assert!(h.game.audio().is_playing(CueId::Heartbeat));

    h.input(InputEvent::ChoiceMade(ChoiceAnswer::Yes));
    h.read_dialog(3);
    assert_eq!(h.game.active_scene(), Some(Screen::HappyEnding));
    assert_eq!(h.game.running_timeline(), Some(TimelineKind::Happy));

    h.run_until_idle();
    assert!(h.log.contains(&Command::text(
        ElementId::HappyTypedText,
        "Thank you for being my Valentine, Alex! 💕"
    )));

    // 没有发现彩蛋：直接重开
    assert!(!h.activated().contains(&Screen::Bonus));
    assert_eq!(h.game.active_scene(), Some(Screen::Start));
    assert_eq!(*h.game.session(), Session::default());
    assert!(h.game.audio().is_playing(CueId::StartTheme));
    assert_eq!(h.game.running_timeline(), None);
    assert_eq!(h.game.pending_timers(), 0);
}

#[test]
fn test_empty_name_stays_on_name_screen() {
    let mut h = Harness::at_start_screen();
    h.input(InputEvent::StartPressed);

    let result = h.game.handle_input(InputEvent::name("   "));
    assert_eq!(result, Err(GameError::EmptyName));
    h.collect();
    assert!(h.log.contains(&Command::flag(
        ElementId::NameInput,
        VisualFlag::Error,
        true
    )));
    assert_eq!(h.game.active_scene(), Some(Screen::Name));

    h.log.clear();
    h.game.advance(Duration::from_millis(3000));
    h.collect();
    assert!(h.log.contains(&Command::flag(
        ElementId::NameInput,
        VisualFlag::Error,
        false
    )));
    assert_eq!(h.game.session().player_name, "");
}

#[test]
fn test_gregory_unlocks_bonus_ending() {
    let mut h = Harness::at_start_screen();
    h.enter_room("Sam");

    h.input(InputEvent::select("gregory"));
    assert!(h.game.is_easter_egg_playing());
    assert!(h.game.session().gregory_found);
    assert_eq!(h.game.audio().paused(), Some(CueId::MainTheme));

    // 视频播放中点击房间物件无效
    h.input(InputEvent::select("imms"));
    assert_eq!(h.game.active_scene(), Some(Screen::Room));

    h.input(InputEvent::VideoEnded(VideoId::EasterEgg));
    assert!(!h.game.is_easter_egg_playing());
    assert!(h.game.audio().is_playing(CueId::MainTheme));

    h.input(InputEvent::select("imms"));
    h.read_dialog(4);
    h.input(InputEvent::ChoiceMade(ChoiceAnswer::Yes));
    h.read_dialog(3);
    h.run_until_idle();

    let screens = h.activated();
    let happy = screens.iter().position(|s| *s == Screen::HappyEnding);
    let bonus = screens.iter().position(|s| *s == Screen::Bonus);
    assert!(happy.is_some());
    assert!(happy < bonus, "隐藏结局应在好结局之后: {screens:?}");
    assert!(h.log.contains(&Command::text(ElementId::BonusDialogText, BONUS_MESSAGE)));

    assert_eq!(h.game.active_scene(), Some(Screen::Start));
    assert!(!h.game.session().gregory_found);
}

#[test]
fn test_sad_path_waits_for_video() {
    let mut h = Harness::at_start_screen();
    h.enter_room("Sam");
    h.input(InputEvent::select("imms"));
    h.read_dialog(4);

    h.input(InputEvent::ChoiceMade(ChoiceAnswer::No));
    assert!(h.log.contains(&Command::SetImage {
        element: ElementId::DialogCharacter,
        asset: "images/imms-character-sad.png".to_string(),
    }));
    assert!(h.game.audio().is_playing(CueId::SomberTheme));
    h.read_dialog(3);

    assert_eq!(h.game.active_scene(), Some(Screen::SadEnding));
    assert!(h.log.contains(&Command::PlayVideo {
        video: VideoId::SadBridge
    }));

    // 视频没结束之前时间线一直挂起
    h.run_until_idle();
    assert_eq!(h.game.running_timeline(), Some(TimelineKind::Sad));
    assert!(!h.log.contains(&Command::text(ElementId::SadTypedText, SAD_MESSAGE)));

    h.input(InputEvent::VideoEnded(VideoId::SadBridge));
    h.run_until_idle();
    assert!(h.log.contains(&Command::text(ElementId::SadTypedText, SAD_MESSAGE)));
    assert_eq!(h.game.active_scene(), Some(Screen::Start));
    // 重开后立绘恢复
    assert_eq!(
        h.log.iter().rev().find_map(|c| match c {
            Command::SetImage {
                element: ElementId::DialogCharacter,
                asset,
            } => Some(asset.as_str()),
            _ => None,
        }),
        Some("images/imms-character.png")
    );
}

#[test]
fn test_reset_twice_equals_reset_once() {
    let mut once = Harness::at_start_screen();
    once.enter_room("Alex");
    once.input(InputEvent::select("imms"));
    let mut twice = Harness::at_start_screen();
    twice.enter_room("Alex");
    twice.input(InputEvent::select("imms"));

    once.input(InputEvent::ResetRequested);
    twice.input(InputEvent::ResetRequested);
    twice.input(InputEvent::ResetRequested);

    assert_eq!(once.game.session(), twice.game.session());
    assert_eq!(once.game.active_scene(), twice.game.active_scene());
    assert_eq!(once.game.audio(), twice.game.audio());
    assert_eq!(once.game.dialog(), twice.game.dialog());
    assert_eq!(once.game.pending_timers(), twice.game.pending_timers());
    assert_eq!(once.game.next_deadline(), twice.game.next_deadline());
    assert!(!twice.game.is_revealing());
}

#[test]
fn test_reset_invalidates_running_timers() {
    let mut game = GameController::new();
    game.start();
    game.advance(Duration::from_millis(1000));
    game.reset();
    game.take_commands();

    game.run_until_idle();
    let after = game.take_commands();
    // 开场动画剩余的步骤都不再执行
    assert!(!after.iter().any(|c| matches!(
        c,
        Command::SetVisualFlag {
            element: ElementId::StudioLogo | ElementId::PresentsText,
            ..
        }
    )));
    assert_eq!(
        after,
        vec![
            Command::NowPlaying {
                title: "Start Menu Theme".to_string()
            },
            Command::PlayCue {
                cue: CueId::StartTheme,
                volume: 0.6
            },
        ]
    );
    assert_eq!(game.active_scene(), Some(Screen::Start));
}

#[test]
fn test_reset_mid_reveal_drops_typewriter() {
    let mut h = Harness::at_start_screen();
    h.enter_room("Alex");
    h.input(InputEvent::select("imms"));
    assert!(h.game.is_revealing());

    h.input(InputEvent::ResetRequested);
    h.log.clear();
    h.run_until_idle();
    assert!(!h.log.iter().any(|c| matches!(
        c,
        Command::SetText {
            element: ElementId::DialogText,
            ..
        }
    )));
}

#[test]
fn test_mute_survives_reset() {
    let mut h = Harness::at_start_screen();
    h.input(InputEvent::MuteToggled);
    h.input(InputEvent::ResetRequested);
    h.log.clear();
    h.run_until_idle();

    assert!(h.game.audio().is_muted());
    assert!(h.log.contains(&Command::PlayCue {
        cue: CueId::StartTheme,
        volume: MUTED_VOLUME
    }));
}

#[test]
fn test_close_deactivates_everything() {
    let mut h = Harness::at_start_screen();
    h.enter_room("Alex");
    h.input(InputEvent::CloseRequested);

    assert_eq!(h.game.active_scene(), None);
    assert_eq!(h.log.last(), Some(&Command::DeactivateAll));
    assert!(h.log.contains(&Command::StopCue { cue: CueId::UiClick }));
    assert_eq!(h.game.pending_timers(), 0);

    // 关闭后可以重新打开
    h.game.start();
    h.collect();
    assert_eq!(h.game.active_scene(), Some(Screen::Intro));
}
