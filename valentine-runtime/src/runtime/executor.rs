//! # Executor 模块
//!
//! 将时间线 [`Effect`] 转换为 Command。
//!
//! ## 职责
//!
//! - 读取 Effect
//! - 更新场景、音频与会话状态，产生对应的 Command
//! - 告诉调用方是否需要挂起、是否要启动打字机、是否结束时间线

use crate::audio::AudioCuePlayer;
use crate::command::Command;
use crate::runtime::timeline::Wait;
use crate::scene::SceneRegistry;
use crate::script::{Effect, Finish};
use crate::state::Session;
use crate::typewriter::Typewriter;

/// 执行结果
#[derive(Debug, Default)]
pub struct ExecuteResult {
    /// 产生的命令
    pub commands: Vec<Command>,
    /// 等待原因（阻塞效果）
    pub waiting: Option<Wait>,
    /// 需要启动的打字机
    pub reveal: Option<Typewriter>,
    /// 结束动作
    pub finish: Option<Finish>,
}

impl ExecuteResult {
    /// 创建空结果
    fn empty() -> Self {
        Self::default()
    }

    /// 创建带命令的结果
    fn with_commands(commands: Vec<Command>) -> Self {
        Self {
            commands,
            ..Self::default()
        }
    }

    /// 创建带等待的结果
    fn with_wait(waiting: Wait) -> Self {
        Self {
            waiting: Some(waiting),
            ..Self::default()
        }
    }
}

/// 执行时可修改的状态
pub struct EffectContext<'a> {
    /// 场景注册表
    pub scenes: &'a mut SceneRegistry,
    /// 曲目播放器
    pub audio: &'a mut AudioCuePlayer,
    /// 玩家会话
    pub session: &'a mut Session,
}

/// 效果执行器
///
/// 负责将单个 Effect 转换为 Command。
#[derive(Debug, Default)]
pub struct Executor;

impl Executor {
    /// 创建新的执行器
    pub fn new() -> Self {
        Self
    }

    /// 执行单个效果
    pub fn execute(&mut self, effect: &Effect, ctx: EffectContext<'_>) -> ExecuteResult {
        match effect {
            Effect::Activate(screen) => {
                ctx.session.current_screen = *screen;
                ExecuteResult::with_commands(vec![ctx.scenes.activate(*screen)])
            }

            Effect::Flag { element, flag, on } => {
                ExecuteResult::with_commands(vec![Command::flag(*element, *flag, *on)])
            }

            Effect::ClearText(element) => {
                ExecuteResult::with_commands(vec![Command::text(*element, "")])
            }

            Effect::PlayCue(cue) => ExecuteResult::with_commands(ctx.audio.play(*cue)),

            Effect::PlayVideo(video) => {
                ExecuteResult::with_commands(vec![Command::PlayVideo { video: *video }])
            }

            Effect::Reveal {
                sink,
                text,
                interval,
            } => ExecuteResult {
                reveal: Some(Typewriter::new(*sink, text, *interval)),
                ..ExecuteResult::with_wait(Wait::Reveal)
            },

            Effect::AwaitVideoEnd(video) => ExecuteResult::with_wait(Wait::Video(*video)),

            Effect::Finish(finish) => ExecuteResult {
                finish: Some(*finish),
                ..ExecuteResult::empty()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::audio::CueId;
    use crate::scene::{ElementId, VideoId, VisualFlag};
    use crate::state::Screen;

    struct Fixture {
        scenes: SceneRegistry,
        audio: AudioCuePlayer,
        session: Session,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                scenes: SceneRegistry::new(),
                audio: AudioCuePlayer::new(),
                session: Session::default(),
            }
        }

        fn run(&mut self, effect: Effect) -> ExecuteResult {
            Executor::new().execute(
                &effect,
                EffectContext {
                    scenes: &mut self.scenes,
                    audio: &mut self.audio,
                    session: &mut self.session,
                },
            )
        }
    }

    #[test]
    fn test_execute_activate() {
        let mut fx = Fixture::new();
        let result = fx.run(Effect::Activate(Screen::Bonus));

        assert_eq!(
            result.commands,
            vec![Command::ActivateScene {
                screen: Screen::Bonus
            }]
        );
        assert!(fx.scenes.is_active(Screen::Bonus));
        assert_eq!(fx.session.current_screen, Screen::Bonus);
        assert!(result.waiting.is_none());
    }

    #[test]
    fn test_execute_flag_and_clear() {
        let mut fx = Fixture::new();
        let result = fx.run(Effect::Flag {
            element: ElementId::GoodEndingLabel,
            flag: VisualFlag::FadeIn,
            on: true,
        });
        assert_eq!(
            result.commands,
            vec![Command::flag(
                ElementId::GoodEndingLabel,
                VisualFlag::FadeIn,
                true
            )]
        );

        let result = fx.run(Effect::ClearText(ElementId::SadTypedText));
        assert_eq!(
            result.commands,
            vec![Command::text(ElementId::SadTypedText, "")]
        );
    }

    #[test]
    fn test_execute_play_cue() {
        let mut fx = Fixture::new();
        let result = fx.run(Effect::PlayCue(CueId::StartTheme));
        assert_eq!(result.commands.len(), 2);
        assert!(fx.audio.is_playing(CueId::StartTheme));
    }

    #[test]
    fn test_execute_reveal_waits() {
        let mut fx = Fixture::new();
        let result = fx.run(Effect::Reveal {
            sink: ElementId::BonusDialogText,
            text: "abc".to_string(),
            interval: Duration::from_millis(30),
        });

        assert!(result.commands.is_empty());
        assert_eq!(result.waiting, Some(Wait::Reveal));
        let writer = result.reveal.unwrap();
        assert_eq!(writer.sink(), ElementId::BonusDialogText);
        assert_eq!(writer.len(), 3);
    }

    #[test]
    fn test_execute_video_effects() {
        let mut fx = Fixture::new();
        let result = fx.run(Effect::PlayVideo(VideoId::SadBridge));
        assert_eq!(
            result.commands,
            vec![Command::PlayVideo {
                video: VideoId::SadBridge
            }]
        );
        assert!(result.waiting.is_none());

        let result = fx.run(Effect::AwaitVideoEnd(VideoId::SadBridge));
        assert!(result.commands.is_empty());
        assert_eq!(result.waiting, Some(Wait::Video(VideoId::SadBridge)));
    }

    #[test]
    fn test_execute_finish() {
        let mut fx = Fixture::new();
        let result = fx.run(Effect::Finish(Finish::BonusOrReset));
        assert_eq!(result.finish, Some(Finish::BonusOrReset));
        assert!(result.commands.is_empty());
    }
}
