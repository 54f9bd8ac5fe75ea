//! # Scene 模块
//!
//! 场景注册表与可视元素标识。
//!
//! Runtime 不关心元素如何绘制，只通过 [`ElementId`] + [`VisualFlag`]
//! 描述"哪个元素处于什么显示状态"，由 Host 解释为具体效果。

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::state::Screen;

/// 可视元素标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementId {
    /// 开场工作室 Logo
    StudioLogo,
    /// 开场 "PRESENTS" 文字
    PresentsText,
    /// 名字输入框
    NameInput,
    /// 对话"继续"按钮
    ContinueButton,
    /// 对话文本
    DialogText,
    /// 对话角色立绘
    DialogCharacter,
    /// 选择弹窗
    ChoiceModal,
    /// 选择弹窗中的问题文本
    ChoiceQuestion,
    /// 物品特写遮罩
    ItemFocusOverlay,
    /// 物品特写图片
    FocusedItem,
    /// 物品特写说明
    FocusMessage,
    /// 彩蛋视频遮罩
    EasterEggOverlay,
    /// 好结局幻灯片 1
    Slideshow1,
    /// 好结局幻灯片 2
    Slideshow2,
    /// 庆祝图片
    CelebrationImage,
    /// 好结局文字容器
    HappyTextContainer,
    /// 好结局打字文本
    HappyTypedText,
    /// "GOOD ENDING" 标签
    GoodEndingLabel,
    /// 坏结局过场视频
    SadBridgeVideo,
    /// 坏结局文字容器
    SadTextContainer,
    /// 坏结局打字文本
    SadTypedText,
    /// "BAD ENDING" 标签
    BadEndingLabel,
    /// "Bonus Unlocked" 标签
    BonusUnlocked,
    /// 隐藏结局奖励图片
    RewardImage,
    /// 隐藏结局打字文本
    BonusDialogText,
}

impl ElementId {
    /// 参与时间线动画的元素：重置时统一隐藏并清除淡入淡出标记
    pub const ANIMATED: [ElementId; 11] = [
        ElementId::StudioLogo,
        ElementId::PresentsText,
        ElementId::Slideshow1,
        ElementId::Slideshow2,
        ElementId::CelebrationImage,
        ElementId::HappyTextContainer,
        ElementId::GoodEndingLabel,
        ElementId::SadTextContainer,
        ElementId::BadEndingLabel,
        ElementId::BonusUnlocked,
        ElementId::RewardImage,
    ];

    /// 文本接收端：重置时清空
    pub const TEXT_SINKS: [ElementId; 5] = [
        ElementId::DialogText,
        ElementId::ChoiceQuestion,
        ElementId::HappyTypedText,
        ElementId::SadTypedText,
        ElementId::BonusDialogText,
    ];
}

/// 元素显示标记（对应 hidden / fade-in / fade-out / show / active / error）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VisualFlag {
    /// 隐藏
    Hidden,
    /// 淡入中
    FadeIn,
    /// 淡出中
    FadeOut,
    /// 显示（带过渡）
    Show,
    /// 激活（弹窗）
    Active,
    /// 错误提示
    Error,
}

impl VisualFlag {
    /// 时间线会切换的过渡标记
    pub const TRANSITIONS: [VisualFlag; 3] =
        [VisualFlag::FadeIn, VisualFlag::FadeOut, VisualFlag::Show];
}

/// 视频标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VideoId {
    /// 坏结局过场视频
    SadBridge,
    /// 彩蛋视频
    EasterEgg,
}

impl VideoId {
    /// 所有视频
    pub const ALL: [VideoId; 2] = [VideoId::SadBridge, VideoId::EasterEgg];
}

/// 场景注册表
///
/// 维护"当前激活场景"。激活操作总是先取消所有场景再激活目标场景，
/// 因此任意时刻最多一个场景处于激活状态。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRegistry {
    active: Option<Screen>,
}

impl SceneRegistry {
    /// 创建空注册表（没有激活场景）
    pub fn new() -> Self {
        Self::default()
    }

    /// 激活场景
    pub fn activate(&mut self, screen: Screen) -> Command {
        self.active = Some(screen);
        Command::ActivateScene { screen }
    }

    /// 取消所有场景（关闭游戏窗口）
    pub fn deactivate_all(&mut self) -> Command {
        self.active = None;
        Command::DeactivateAll
    }

    /// 当前激活场景
    pub fn active(&self) -> Option<Screen> {
        self.active
    }

    /// 指定场景是否激活
    pub fn is_active(&self, screen: Screen) -> bool {
        self.active == Some(screen)
    }
}
