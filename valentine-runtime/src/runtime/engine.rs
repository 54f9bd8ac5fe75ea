//! # Engine 模块
//!
//! 游戏控制器：持有会话状态，编排场景、音频、对话与时间线。
//!
//! ## 执行模型
//!
//! ```text
//! handle_input(input) ─┐
//! advance(dt) ─────────┼─► outbox ──take_commands()──► Host
//! ```
//!
//! 1. 输入立即产生 Command，并可能登记定时器
//! 2. `advance(dt)` 推进虚拟时钟，按顺序触发到期定时器
//! 3. Host 在每次调用后取走累积的 Command 并执行
//!
//! 所有定时器都带有会话纪元，`reset()`/`close()` 会递增纪元并清空队列，
//! 因此旧会话留下的回调一律失效。

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::audio::{AudioCuePlayer, CueId};
use crate::command::Command;
use crate::error::{GameError, GameResult};
use crate::input::{ChoiceAnswer, InputEvent, RoomObject};
use crate::runtime::dialog::{DialogSequencer, DialogStep};
use crate::runtime::executor::{EffectContext, Executor};
use crate::runtime::scheduler::Scheduler;
use crate::runtime::timeline::{StepToken, TimelineRunner, Wait};
use crate::scene::{ElementId, SceneRegistry, VideoId, VisualFlag};
use crate::script::dialog::{CHARACTER_ART, SAD_CHARACTER_ART, choice_question};
use crate::script::endings::{bonus_timeline, happy_timeline, intro_timeline, sad_timeline};
use crate::script::{DialogExit, DialogMode, Finish, Timeline, TimelineKind, item_focus};
use crate::state::{Screen, Session};
use crate::typewriter::{FAST_INTERVAL, Typewriter};

/// 进入名字场景后多久聚焦输入框
pub const NAME_FOCUS_DELAY: Duration = Duration::from_millis(500);
/// 提交名字后多久开始播放主题曲
pub const MAIN_THEME_DELAY: Duration = Duration::from_millis(500);
/// 重开后多久重新播放标题音乐
pub const START_THEME_DELAY: Duration = Duration::from_millis(500);
/// 名字输入框错误提示持续时长
pub const NAME_ERROR_DURATION: Duration = Duration::from_millis(3000);

/// 定时器种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    /// 打字机下一个字符（或完成）
    Typewriter { reveal: u64 },
    /// 时间线步骤
    Step(StepToken),
    /// 延迟播放曲目
    PlayCue(CueId),
    /// 聚焦名字输入框
    FocusNameInput,
    /// 清除名字输入框错误标记
    ClearNameError,
}

/// 登记在调度器中的定时器
#[derive(Debug, Clone, Copy)]
struct Scheduled {
    epoch: u64,
    timer: Timer,
}

/// 打字机的使用者
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealOwner {
    Dialog,
    Timeline,
}

#[derive(Debug)]
struct ActiveReveal {
    id: u64,
    owner: RevealOwner,
    writer: Typewriter,
}

/// 游戏控制器
///
/// 这是 valentine-runtime 的核心类型，唯一持有全部游戏状态。
///
/// # 使用示例
///
/// ```ignore
/// let mut game = GameController::new();
/// game.start();
///
/// loop {
///     for cmd in game.take_commands() {
///         host.execute(cmd);
///     }
///     match host.poll_input() {
///         Some(input) => { game.handle_input(input)?; }
///         None => game.advance(host.elapsed()),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct GameController {
    session: Session,
    scenes: SceneRegistry,
    audio: AudioCuePlayer,
    dialog: DialogSequencer,
    timeline: TimelineRunner,
    executor: Executor,
    scheduler: Scheduler<Scheduled>,
    reveal: Option<ActiveReveal>,
    reveal_seq: u64,
    /// 会话纪元，重开/关闭时递增
    epoch: u64,
    choice_pending: bool,
    item_focus_open: bool,
    easter_egg_playing: bool,
    outbox: Vec<Command>,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl GameController {
    /// 创建控制器（游戏窗口尚未打开，没有激活场景）
    pub fn new() -> Self {
        Self {
            session: Session::default(),
            scenes: SceneRegistry::new(),
            audio: AudioCuePlayer::new(),
            dialog: DialogSequencer::new(),
            timeline: TimelineRunner::new(),
            executor: Executor::new(),
            scheduler: Scheduler::new(),
            reveal: None,
            reveal_seq: 0,
            epoch: 0,
            choice_pending: false,
            item_focus_open: false,
            easter_egg_playing: false,
            outbox: Vec::new(),
        }
    }

    // ========== 生命周期 ==========

    /// 打开游戏窗口，播放开场动画
    pub fn start(&mut self) {
        if let Some(active) = self.scenes.active() {
            debug!(active = active.as_str(), "游戏已经打开，忽略 start");
            return;
        }
        info!("打开游戏");
        self.start_timeline(intro_timeline());
    }

    /// 重开：回到标题画面，500ms 后重新播放标题音乐
    pub fn reset(&mut self) {
        info!(epoch = self.epoch + 1, "重开游戏");
        let stop = self.audio.stop_all();
        self.outbox.extend(stop);
        self.clear_session();
        self.switch_screen(Screen::Start);
        self.schedule(START_THEME_DELAY, Timer::PlayCue(CueId::StartTheme));
    }

    /// 关闭游戏窗口：停止所有声音（包括 UI 音效），不保留激活场景
    pub fn close(&mut self) {
        info!("关闭游戏");
        let stop = self.audio.stop_everything();
        self.outbox.extend(stop);
        self.clear_session();
        self.outbox.push(self.scenes.deactivate_all());
    }

    /// 重开与关闭共用的状态清理
    fn clear_session(&mut self) {
        self.epoch += 1;
        self.scheduler.clear();
        self.timeline.cancel();
        self.reveal = None;

        self.session = Session::default();
        self.dialog.reset();
        self.choice_pending = false;
        self.item_focus_open = false;
        self.easter_egg_playing = false;

        self.outbox.push(Command::SetImage {
            element: ElementId::DialogCharacter,
            asset: CHARACTER_ART.to_string(),
        });
        for element in ElementId::ANIMATED {
            self.outbox.push(Command::flag(element, VisualFlag::Hidden, true));
            for flag in VisualFlag::TRANSITIONS {
                self.outbox.push(Command::flag(element, flag, false));
            }
        }
        for sink in ElementId::TEXT_SINKS {
            self.outbox.push(Command::text(sink, ""));
        }
        self.outbox.extend([
            Command::SetContinueEnabled { enabled: true },
            Command::text(ElementId::NameInput, ""),
            Command::flag(ElementId::NameInput, VisualFlag::Error, false),
            Command::flag(ElementId::ChoiceModal, VisualFlag::Active, false),
            Command::flag(ElementId::ItemFocusOverlay, VisualFlag::Hidden, true),
            Command::StopVideo {
                video: VideoId::SadBridge,
            },
            Command::flag(ElementId::SadBridgeVideo, VisualFlag::FadeOut, false),
            Command::StopVideo {
                video: VideoId::EasterEgg,
            },
            Command::flag(ElementId::EasterEggOverlay, VisualFlag::Hidden, true),
        ]);
    }

    // ========== 玩家操作 ==========

    /// 标题画面按下开始：进入名字场景
    pub fn press_start(&mut self) {
        if !self.scenes.is_active(Screen::Start) {
            debug!(screen = ?self.scenes.active(), "不在标题画面，忽略开始");
            return;
        }
        let stop = self.audio.stop_all();
        self.outbox.extend(stop);
        self.switch_screen(Screen::Name);
        self.schedule(NAME_FOCUS_DELAY, Timer::FocusNameInput);
    }

    /// 提交名字
    ///
    /// 去除首尾空白后为空时，输入框显示错误提示 3 秒，停留在名字场景。
    pub fn submit_player_name(&mut self, name: &str) -> GameResult<()> {
        if !self.scenes.is_active(Screen::Name) {
            debug!(screen = ?self.scenes.active(), "不在名字场景，忽略提交");
            return Ok(());
        }
        let name = name.trim();
        if name.is_empty() {
            debug!("名字为空");
            self.outbox
                .push(Command::flag(ElementId::NameInput, VisualFlag::Error, true));
            self.schedule(NAME_ERROR_DURATION, Timer::ClearNameError);
            return Err(GameError::EmptyName);
        }

        info!(player = name, "玩家名字已确定");
        self.session.player_name = name.to_string();
        self.schedule(MAIN_THEME_DELAY, Timer::PlayCue(CueId::MainTheme));
        self.switch_screen(Screen::Room);
        Ok(())
    }

    /// 点击房间物件
    pub fn select_room_object(&mut self, object: &RoomObject) {
        if !self.scenes.is_active(Screen::Room) {
            debug!(%object, "不在房间场景，忽略点击");
            return;
        }
        if self.item_focus_open || self.easter_egg_playing {
            debug!(%object, "遮罩打开中，忽略点击");
            return;
        }

        match object {
            RoomObject::Imms => {
                self.switch_screen(Screen::Dialog);
                self.dialog.enter_mode(DialogMode::Initial);
                self.advance_dialog();
            }
            RoomObject::Picture | RoomObject::Plushies => {
                if let Some(focus) = item_focus(object) {
                    self.outbox.extend([
                        Command::SetImage {
                            element: ElementId::FocusedItem,
                            asset: focus.image.to_string(),
                        },
                        Command::text(ElementId::FocusMessage, focus.caption),
                        Command::flag(ElementId::ItemFocusOverlay, VisualFlag::Hidden, false),
                    ]);
                    self.item_focus_open = true;
                }
            }
            RoomObject::Gregory => {
                info!("发现了 Gregory");
                self.session.gregory_found = true;
                let pause = self.audio.pause_current();
                self.outbox.extend(pause);
                self.outbox.extend([
                    Command::flag(ElementId::EasterEggOverlay, VisualFlag::Hidden, false),
                    Command::PlayVideo {
                        video: VideoId::EasterEgg,
                    },
                ]);
                self.easter_egg_playing = true;
            }
            RoomObject::Other(id) => {
                debug!(object = %id, "物件没有交互");
            }
        }
    }

    /// 对话"继续"
    pub fn continue_dialog(&mut self) {
        if !self.scenes.is_active(Screen::Dialog) || self.choice_pending {
            debug!(screen = ?self.scenes.active(), choice = self.choice_pending, "忽略继续");
            return;
        }
        self.advance_dialog();
    }

    /// 回答"是"
    pub fn choose_affirmative(&mut self) {
        if !self.close_choice() {
            return;
        }
        let stop = self.audio.stop_all();
        self.outbox.extend(stop);
        let play = self.audio.play(CueId::MainTheme);
        self.outbox.extend(play);
        self.dialog.enter_mode(DialogMode::Affirmative);
        self.advance_dialog();
    }

    /// 回答"否"
    pub fn choose_negative(&mut self) {
        if !self.close_choice() {
            return;
        }
        let stop = self.audio.stop_all();
        self.outbox.extend(stop);
        let play = self.audio.play(CueId::SomberTheme);
        self.outbox.extend(play);
        self.outbox.push(Command::SetImage {
            element: ElementId::DialogCharacter,
            asset: SAD_CHARACTER_ART.to_string(),
        });
        self.dialog.enter_mode(DialogMode::Negative);
        self.advance_dialog();
    }

    fn close_choice(&mut self) -> bool {
        if !self.choice_pending {
            debug!("没有选择弹窗，忽略回答");
            return false;
        }
        self.choice_pending = false;
        self.outbox
            .push(Command::flag(ElementId::ChoiceModal, VisualFlag::Active, false));
        true
    }

    /// 切换静音
    pub fn toggle_mute(&mut self) {
        let volume = self.audio.toggle_mute();
        self.outbox.extend(volume);
        debug!(muted = self.audio.is_muted(), "切换静音");
    }

    /// 视频自然播放结束
    pub fn video_ended(&mut self, video: VideoId) {
        match video {
            VideoId::EasterEgg => self.close_easter_egg(),
            VideoId::SadBridge => match self.timeline.resume(Wait::Video(video)) {
                Some((token, delay)) => self.schedule_step(token, delay),
                None => debug!(?video, "没有时间线在等待该视频"),
            },
        }
    }

    /// 关闭物件特写
    pub fn close_item_focus(&mut self) {
        if !self.item_focus_open {
            debug!("物件特写没有打开");
            return;
        }
        self.item_focus_open = false;
        self.outbox
            .push(Command::flag(ElementId::ItemFocusOverlay, VisualFlag::Hidden, true));
    }

    /// 关闭彩蛋视频，恢复之前暂停的曲目
    pub fn close_easter_egg(&mut self) {
        if !self.easter_egg_playing {
            debug!("彩蛋视频没有在播放");
            return;
        }
        self.easter_egg_playing = false;
        self.outbox.extend([
            Command::StopVideo {
                video: VideoId::EasterEgg,
            },
            Command::flag(ElementId::EasterEggOverlay, VisualFlag::Hidden, true),
        ]);
        let resume = self.audio.resume_paused();
        self.outbox.extend(resume);
    }

    /// 统一的输入分发
    ///
    /// 可用的按钮类输入会先播放 UI 点击音效，禁用状态的按钮没有声音。
    pub fn handle_input(&mut self, input: InputEvent) -> GameResult<()> {
        trace!(?input, "收到输入");
        if input.is_button_press() && self.button_enabled(&input) {
            let click = self.audio.play(CueId::UiClick);
            self.outbox.extend(click);
        }

        match input {
            InputEvent::StartPressed => self.press_start(),
            InputEvent::NameSubmitted(name) => return self.submit_player_name(&name),
            InputEvent::RoomObjectSelected(object) => self.select_room_object(&object),
            InputEvent::ContinueDialog => self.continue_dialog(),
            InputEvent::ChoiceMade(ChoiceAnswer::Yes) => self.choose_affirmative(),
            InputEvent::ChoiceMade(ChoiceAnswer::No) => self.choose_negative(),
            InputEvent::MuteToggled => self.toggle_mute(),
            InputEvent::VideoEnded(video) => self.video_ended(video),
            InputEvent::ItemFocusClosed => self.close_item_focus(),
            InputEvent::EasterEggClosed => self.close_easter_egg(),
            InputEvent::ResetRequested => self.reset(),
            InputEvent::CloseRequested => self.close(),
        }
        Ok(())
    }

    /// 按钮当前是否可用
    fn button_enabled(&self, input: &InputEvent) -> bool {
        if self.scenes.active().is_none() {
            return false;
        }
        match input {
            InputEvent::StartPressed => self.scenes.is_active(Screen::Start),
            InputEvent::NameSubmitted(_) => self.scenes.is_active(Screen::Name),
            InputEvent::ContinueDialog => {
                self.scenes.is_active(Screen::Dialog)
                    && !self.choice_pending
                    && self.dialog.is_awaiting_advance()
            }
            InputEvent::ChoiceMade(_) => self.choice_pending,
            InputEvent::ItemFocusClosed => self.item_focus_open,
            _ => true,
        }
    }

    // ========== 时钟 ==========

    /// 推进虚拟时钟，触发所有到期定时器
    pub fn advance(&mut self, dt: Duration) {
        let target = self.scheduler.now() + dt;
        while let Some(scheduled) = self.scheduler.pop_due(target) {
            self.fire(scheduled);
        }
        self.scheduler.advance_to(target);
    }

    /// 直接跳到下一个截止时间并触发该时刻的定时器
    ///
    /// 返回跳到的时间；没有待触发定时器时返回 `None`。
    pub fn step_to_next(&mut self) -> Option<Duration> {
        let deadline = self.scheduler.next_deadline()?;
        self.advance(deadline.saturating_sub(self.scheduler.now()));
        Some(deadline)
    }

    /// 一直跳到没有待触发定时器为止，返回经过的虚拟时间
    pub fn run_until_idle(&mut self) -> Duration {
        let begin = self.scheduler.now();
        while self.step_to_next().is_some() {}
        self.scheduler.now() - begin
    }

    /// 取走累积的 Command
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    // ========== 内部流程 ==========

    fn schedule(&mut self, delay: Duration, timer: Timer) {
        self.scheduler.schedule(
            delay,
            Scheduled {
                epoch: self.epoch,
                timer,
            },
        );
    }

    fn fire(&mut self, scheduled: Scheduled) {
        if scheduled.epoch != self.epoch {
            trace!(timer = ?scheduled.timer, "忽略旧会话的定时器");
            return;
        }
        match scheduled.timer {
            Timer::Typewriter { reveal } => self.tick_reveal(reveal),
            Timer::Step(token) => self.run_step(token),
            Timer::PlayCue(cue) => {
                let play = self.audio.play(cue);
                self.outbox.extend(play);
            }
            Timer::FocusNameInput => self.outbox.push(Command::FocusInput {
                element: ElementId::NameInput,
            }),
            Timer::ClearNameError => self
                .outbox
                .push(Command::flag(ElementId::NameInput, VisualFlag::Error, false)),
        }
    }

    /// 用户操作引起的场景切换，会中止正在运行的时间线
    fn switch_screen(&mut self, screen: Screen) {
        if self.timeline.is_running() {
            debug!(kind = ?self.timeline.kind(), "场景切换，中止时间线");
            self.timeline.cancel();
        }
        info!(screen = screen.as_str(), "切换场景");
        self.session.current_screen = screen;
        self.outbox.push(self.scenes.activate(screen));
    }

    fn advance_dialog(&mut self) {
        match self.dialog.advance(&self.session.player_name) {
            None => {}
            Some(DialogStep::Reveal { text }) => {
                self.outbox
                    .push(Command::SetContinueEnabled { enabled: false });
                let writer = Typewriter::new(ElementId::DialogText, &text, FAST_INTERVAL);
                self.start_reveal(RevealOwner::Dialog, writer);
            }
            Some(DialogStep::Exit(exit)) => self.dialog_exit(exit),
        }
    }

    fn dialog_exit(&mut self, exit: DialogExit) {
        debug!(?exit, "对话结束");
        match exit {
            DialogExit::ToChoice => {
                let stop = self.audio.stop_all();
                self.outbox.extend(stop);
                let play = self.audio.play(CueId::Heartbeat);
                self.outbox.extend(play);
                self.outbox.extend([
                    Command::text(
                        ElementId::ChoiceQuestion,
                        choice_question(&self.session.player_name),
                    ),
                    Command::flag(ElementId::ChoiceModal, VisualFlag::Active, true),
                ]);
                self.choice_pending = true;
            }
            DialogExit::ToHappyEnding => {
                let stop = self.audio.stop_all();
                self.outbox.extend(stop);
                let play = self.audio.play(CueId::CelebrationTheme);
                self.outbox.extend(play);
                self.switch_screen(Screen::HappyEnding);
                let timeline = happy_timeline(&self.session.player_name);
                self.start_timeline(timeline);
            }
            DialogExit::ToSadEnding => {
                self.switch_screen(Screen::SadEnding);
                self.start_timeline(sad_timeline());
            }
        }
    }

    // ---------- 打字机 ----------

    /// 开始打字：清空接收端，立即显示第一个字符
    fn start_reveal(&mut self, owner: RevealOwner, mut writer: Typewriter) {
        self.reveal_seq += 1;
        let id = self.reveal_seq;
        let sink = writer.sink();
        self.outbox.push(Command::text(sink, ""));

        let Some(text) = writer.tick() else {
            self.reveal = None;
            self.reveal_complete(owner);
            return;
        };
        self.outbox.push(Command::text(sink, text));

        let interval = writer.interval();
        self.reveal = Some(ActiveReveal { id, owner, writer });
        self.schedule(interval, Timer::Typewriter { reveal: id });
    }

    fn tick_reveal(&mut self, id: u64) {
        let Some(active) = self.reveal.as_mut().filter(|r| r.id == id) else {
            trace!(reveal = id, "忽略过期的打字机定时器");
            return;
        };
        match active.writer.tick() {
            Some(text) => {
                let sink = active.writer.sink();
                let interval = active.writer.interval();
                self.outbox.push(Command::text(sink, text));
                self.schedule(interval, Timer::Typewriter { reveal: id });
            }
            None => {
                let owner = active.owner;
                self.reveal = None;
                self.reveal_complete(owner);
            }
        }
    }

    fn reveal_complete(&mut self, owner: RevealOwner) {
        match owner {
            RevealOwner::Dialog => {
                self.dialog.reveal_complete();
                self.outbox.push(Command::SetContinueEnabled { enabled: true });
            }
            RevealOwner::Timeline => {
                if let Some((token, delay)) = self.timeline.resume(Wait::Reveal) {
                    self.schedule_step(token, delay);
                }
            }
        }
    }

    // ---------- 时间线 ----------

    fn start_timeline(&mut self, timeline: Timeline) {
        if let Some((token, delay)) = self.timeline.start(timeline) {
            self.schedule_step(token, delay);
        }
    }

    /// 零延迟的步骤同步执行
    fn schedule_step(&mut self, token: StepToken, delay: Duration) {
        if delay.is_zero() {
            self.run_step(token);
        } else {
            self.schedule(delay, Timer::Step(token));
        }
    }

    fn run_step(&mut self, token: StepToken) {
        let Some(step) = self.timeline.take_step(token) else {
            return;
        };
        trace!(?token, effects = step.effects.len(), "执行时间线步骤");

        for effect in &step.effects {
            let result = self.executor.execute(
                effect,
                EffectContext {
                    scenes: &mut self.scenes,
                    audio: &mut self.audio,
                    session: &mut self.session,
                },
            );
            self.outbox.extend(result.commands);
            let blocked = result.waiting.is_some();
            if let Some(wait) = result.waiting {
                self.timeline.suspend(wait);
            }
            if let Some(writer) = result.reveal {
                self.start_reveal(RevealOwner::Timeline, writer);
            }
            if let Some(finish) = result.finish {
                self.finish_timeline(finish);
                return;
            }
            // 阻塞效果之后的步骤由完成信号接续
            if blocked {
                break;
            }
        }

        if let Some((next, delay)) = self.timeline.finish_step(token) {
            self.schedule_step(next, delay);
        }
    }

    fn finish_timeline(&mut self, finish: Finish) {
        self.timeline.cancel();
        match finish {
            Finish::BonusOrReset if self.session.gregory_found => {
                info!("进入隐藏结局");
                self.start_timeline(bonus_timeline());
            }
            Finish::BonusOrReset | Finish::Reset => self.reset(),
        }
    }

    // ========== 状态查询 ==========

    /// 玩家会话
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 当前激活场景（游戏窗口关闭时为 `None`）
    pub fn active_scene(&self) -> Option<Screen> {
        self.scenes.active()
    }

    /// 曲目播放器状态
    pub fn audio(&self) -> &AudioCuePlayer {
        &self.audio
    }

    /// 对话序列器状态
    pub fn dialog(&self) -> &DialogSequencer {
        &self.dialog
    }

    /// 正在运行的时间线
    pub fn running_timeline(&self) -> Option<TimelineKind> {
        self.timeline.kind()
    }

    /// 当前虚拟时间
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// 下一个定时器的截止时间
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// 待触发定时器数量
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// 是否正在打字
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// 选择弹窗是否显示中
    pub fn is_choice_pending(&self) -> bool {
        self.choice_pending
    }

    /// 物件特写是否打开
    pub fn is_item_focus_open(&self) -> bool {
        self.item_focus_open
    }

    /// 彩蛋视频是否在播放
    pub fn is_easter_egg_playing(&self) -> bool {
        self.easter_egg_playing
    }
}
