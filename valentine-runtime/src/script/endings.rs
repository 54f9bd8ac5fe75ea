//! # Endings 时间线
//!
//! 开场、好结局、隐藏结局、坏结局四条固定时间线。
//! 所有等待时长都是常量，不提供配置入口。

use std::time::Duration;

use crate::audio::CueId;
use crate::scene::{ElementId, VideoId, VisualFlag};
use crate::script::timeline::{Effect, Finish, Timeline, TimelineKind, TimelineStep};
use crate::state::Screen;
use crate::typewriter::{FAST_INTERVAL, SLOW_INTERVAL};

/// 开场：进入后等待多久显示 Logo
pub const INTRO_LEAD_IN_MS: u64 = 500;
/// 开场：Logo / PRESENTS 停留时长
pub const INTRO_HOLD_MS: u64 = 2000;
/// 开场：淡出时长
pub const INTRO_FADE_MS: u64 = 1500;

/// 好结局：每张幻灯片停留时长
pub const SLIDE_HOLD_MS: u64 = 2500;
/// 好结局：幻灯片淡出时长
pub const SLIDE_FADE_MS: u64 = 1500;
/// 取消隐藏后触发过渡的间隔
pub const FADE_TRIGGER_MS: u64 = 100;
/// 好结局：庆祝图片停留时长
pub const CELEBRATION_HOLD_MS: u64 = 3000;
/// 通用淡出时长
pub const FADE_OUT_MS: u64 = 2000;
/// 好结局：感谢文字打完后的停留时长
pub const THANK_YOU_HOLD_MS: u64 = 3000;
/// 黑屏停顿
pub const BLACKOUT_MS: u64 = 1000;
/// 结局标签停留时长
pub const ENDING_LABEL_HOLD_MS: u64 = 4000;
/// 隐藏结局："Bonus Unlocked" 停留时长
pub const BONUS_LABEL_HOLD_MS: u64 = 3000;
/// 隐藏结局：奖励文字打完后的停留时长
pub const BONUS_MESSAGE_HOLD_MS: u64 = 5000;
/// 坏结局：文字打完后的停留时长
pub const SAD_MESSAGE_HOLD_MS: u64 = 4000;

/// 好结局感谢文字的打字间隔
pub const THANK_YOU_INTERVAL: Duration = Duration::from_millis(100);

/// 坏结局文字
pub const SAD_MESSAGE: &str = "Sometimes love isn't meant to be...";

/// 隐藏结局文字
pub const BONUS_MESSAGE: &str = "Congratulations on finding Gregory the Grasshopper!\n\n\
This is perhaps the funniest and most ridiculous meme I've ever seen...\n\n\
I can't believe this exists! 😂";

/// 好结局感谢文字（调用方负责传入玩家名字）
pub fn thank_you_message(player_name: &str) -> String {
    format!("Thank you for being my Valentine, {player_name}! 💕")
}

/// 开场时间线：Logo → PRESENTS → 标题画面
pub fn intro_timeline() -> Timeline {
    let logo = ElementId::StudioLogo;
    let presents = ElementId::PresentsText;

    Timeline::new(
        TimelineKind::Intro,
        vec![
            TimelineStep::now()
                .then(Effect::Activate(Screen::Intro))
                .reset_element(logo)
                .reset_element(presents),
            TimelineStep::after_ms(INTRO_LEAD_IN_MS)
                .unhide(logo)
                .on(logo, VisualFlag::FadeIn),
            TimelineStep::after_ms(INTRO_HOLD_MS)
                .off(logo, VisualFlag::FadeIn)
                .on(logo, VisualFlag::FadeOut),
            TimelineStep::after_ms(INTRO_FADE_MS)
                .hide(logo)
                .unhide(presents)
                .on(presents, VisualFlag::FadeIn),
            TimelineStep::after_ms(INTRO_HOLD_MS)
                .off(presents, VisualFlag::FadeIn)
                .on(presents, VisualFlag::FadeOut),
            TimelineStep::after_ms(INTRO_FADE_MS)
                .hide(presents)
                .then(Effect::PlayCue(CueId::StartTheme))
                .then(Effect::Activate(Screen::Start)),
        ],
    )
}

/// 好结局时间线
///
/// 最后一步根据彩蛋标记决定进入隐藏结局还是重开。
pub fn happy_timeline(player_name: &str) -> Timeline {
    let slide1 = ElementId::Slideshow1;
    let slide2 = ElementId::Slideshow2;
    let celebration = ElementId::CelebrationImage;
    let container = ElementId::HappyTextContainer;
    let label = ElementId::GoodEndingLabel;

    Timeline::new(
        TimelineKind::Happy,
        vec![
            TimelineStep::now()
                .reset_element(celebration)
                .reset_element(container)
                .reset_element(label)
                .reset_element(slide1)
                .reset_element(slide2)
                .then(Effect::ClearText(ElementId::HappyTypedText))
                .unhide(slide1)
                .on(slide1, VisualFlag::FadeIn),
            TimelineStep::after_ms(SLIDE_HOLD_MS)
                .hide(slide1)
                .off(slide1, VisualFlag::FadeIn)
                .unhide(slide2)
                .on(slide2, VisualFlag::FadeIn),
            TimelineStep::after_ms(SLIDE_HOLD_MS)
                .off(slide2, VisualFlag::FadeIn)
                .on(slide2, VisualFlag::FadeOut),
            TimelineStep::after_ms(SLIDE_FADE_MS)
                .hide(slide2)
                .unhide(celebration),
            TimelineStep::after_ms(FADE_TRIGGER_MS).on(celebration, VisualFlag::Show),
            TimelineStep::after_ms(CELEBRATION_HOLD_MS)
                .off(celebration, VisualFlag::Show)
                .on(celebration, VisualFlag::FadeOut),
            TimelineStep::after_ms(FADE_OUT_MS)
                .hide(celebration)
                .unhide(container)
                .on(container, VisualFlag::FadeIn)
                .then(Effect::Reveal {
                    sink: ElementId::HappyTypedText,
                    text: thank_you_message(player_name),
                    interval: THANK_YOU_INTERVAL,
                }),
            TimelineStep::after_ms(THANK_YOU_HOLD_MS)
                .off(container, VisualFlag::FadeIn)
                .on(container, VisualFlag::FadeOut),
            TimelineStep::after_ms(FADE_OUT_MS).hide(container),
            TimelineStep::after_ms(BLACKOUT_MS)
                .unhide(label)
                .on(label, VisualFlag::FadeIn),
            TimelineStep::after_ms(ENDING_LABEL_HOLD_MS)
                .off(label, VisualFlag::FadeIn)
                .on(label, VisualFlag::FadeOut),
            TimelineStep::after_ms(FADE_OUT_MS).then(Effect::Finish(Finish::BonusOrReset)),
        ],
    )
}

/// 隐藏结局时间线
pub fn bonus_timeline() -> Timeline {
    let unlocked = ElementId::BonusUnlocked;
    let reward = ElementId::RewardImage;

    Timeline::new(
        TimelineKind::Bonus,
        vec![
            TimelineStep::now()
                .then(Effect::Activate(Screen::Bonus))
                .reset_element(unlocked)
                .reset_element(reward)
                .then(Effect::ClearText(ElementId::BonusDialogText)),
            TimelineStep::after_ms(BLACKOUT_MS).unhide(unlocked),
            TimelineStep::after_ms(FADE_TRIGGER_MS).on(unlocked, VisualFlag::Show),
            TimelineStep::after_ms(BONUS_LABEL_HOLD_MS)
                .off(unlocked, VisualFlag::Show)
                .on(unlocked, VisualFlag::FadeOut),
            TimelineStep::after_ms(FADE_OUT_MS)
                .hide(unlocked)
                .unhide(reward),
            TimelineStep::after_ms(FADE_TRIGGER_MS)
                .on(reward, VisualFlag::Show)
                .then(Effect::Reveal {
                    sink: ElementId::BonusDialogText,
                    text: BONUS_MESSAGE.to_string(),
                    interval: FAST_INTERVAL,
                }),
            TimelineStep::after_ms(BONUS_MESSAGE_HOLD_MS)
                .off(reward, VisualFlag::Show)
                .on(reward, VisualFlag::FadeOut),
            TimelineStep::after_ms(FADE_OUT_MS).hide(reward),
            TimelineStep::after_ms(BLACKOUT_MS).then(Effect::Finish(Finish::Reset)),
        ],
    )
}

/// 坏结局时间线
///
/// 第一步播放过场视频并挂起，直到 Host 回传视频自然结束。
pub fn sad_timeline() -> Timeline {
    let video = ElementId::SadBridgeVideo;
    let container = ElementId::SadTextContainer;
    let label = ElementId::BadEndingLabel;

    Timeline::new(
        TimelineKind::Sad,
        vec![
            TimelineStep::now()
                .off(video, VisualFlag::FadeOut)
                .reset_element(container)
                .reset_element(label)
                .then(Effect::ClearText(ElementId::SadTypedText))
                .then(Effect::PlayVideo(VideoId::SadBridge))
                .then(Effect::AwaitVideoEnd(VideoId::SadBridge)),
            TimelineStep::now().on(video, VisualFlag::FadeOut),
            TimelineStep::after_ms(FADE_OUT_MS)
                .unhide(container)
                .on(container, VisualFlag::FadeIn)
                .then(Effect::Reveal {
                    sink: ElementId::SadTypedText,
                    text: SAD_MESSAGE.to_string(),
                    interval: SLOW_INTERVAL,
                }),
            TimelineStep::after_ms(SAD_MESSAGE_HOLD_MS)
                .off(container, VisualFlag::FadeIn)
                .on(container, VisualFlag::FadeOut),
            TimelineStep::after_ms(FADE_OUT_MS).hide(container),
            TimelineStep::after_ms(BLACKOUT_MS)
                .unhide(label)
                .on(label, VisualFlag::FadeIn),
            TimelineStep::after_ms(ENDING_LABEL_HOLD_MS).then(Effect::Finish(Finish::Reset)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finishes(timeline: &Timeline) -> Vec<Finish> {
        timeline
            .steps
            .iter()
            .flat_map(|s| s.effects.iter())
            .filter_map(|e| match e {
                Effect::Finish(f) => Some(*f),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_intro_ends_on_start_screen() {
        let timeline = intro_timeline();
        let last = timeline.steps.last().unwrap();
        assert!(last.effects.contains(&Effect::Activate(Screen::Start)));
        assert!(last.effects.contains(&Effect::PlayCue(CueId::StartTheme)));
        assert!(finishes(&timeline).is_empty());
        assert_eq!(timeline.total_delay(), Duration::from_millis(7500));
    }

    #[test]
    fn test_happy_message_is_pre_substituted() {
        let timeline = happy_timeline("Sam");
        let reveal = timeline
            .steps
            .iter()
            .flat_map(|s| s.effects.iter())
            .find_map(|e| match e {
                Effect::Reveal { text, interval, .. } => Some((text.clone(), *interval)),
                _ => None,
            })
            .unwrap();
        assert_eq!(reveal.0, "Thank you for being my Valentine, Sam! 💕");
        assert_eq!(reveal.1, THANK_YOU_INTERVAL);
    }

    #[test]
    fn test_finish_actions() {
        assert_eq!(finishes(&happy_timeline("x")), vec![Finish::BonusOrReset]);
        assert_eq!(finishes(&bonus_timeline()), vec![Finish::Reset]);
        assert_eq!(finishes(&sad_timeline()), vec![Finish::Reset]);
    }

    #[test]
    fn test_finish_is_last_effect() {
        for timeline in [happy_timeline("x"), bonus_timeline(), sad_timeline()] {
            let last = timeline.steps.last().unwrap();
            assert!(matches!(last.effects.last(), Some(Effect::Finish(_))));
        }
    }

    #[test]
    fn test_blocking_effects_end_their_step() {
        for timeline in [
            intro_timeline(),
            happy_timeline("x"),
            bonus_timeline(),
            sad_timeline(),
        ] {
            assert!(timeline.steps.iter().all(TimelineStep::blocks_last));
        }
    }

    #[test]
    fn test_sad_timeline_waits_for_video() {
        let timeline = sad_timeline();
        let first = &timeline.steps[0];
        assert!(first.is_blocking());
        assert_eq!(
            first.effects.last(),
            Some(&Effect::AwaitVideoEnd(VideoId::SadBridge))
        );
    }

    #[test]
    fn test_bonus_starts_on_bonus_screen() {
        let timeline = bonus_timeline();
        assert_eq!(timeline.steps[0].effects[0], Effect::Activate(Screen::Bonus));
        assert_eq!(timeline.steps[0].delay, Duration::ZERO);
    }
}
