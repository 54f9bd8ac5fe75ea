//! # Stage 模块
//!
//! 舞台状态：Runtime 指令作用后的可见状态镜像。
//!
//! 无界面宿主没有真正的画面，这里记录"此刻画面上是什么"，
//! 供终端输出与测试断言使用。

use std::collections::{BTreeMap, BTreeSet};

use valentine_runtime::{ElementId, Screen, VideoId, VisualFlag};

/// 舞台状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageState {
    /// 当前激活场景
    pub active_scene: Option<Screen>,
    /// 各元素上的显示标记
    pub flags: BTreeMap<ElementId, BTreeSet<VisualFlag>>,
    /// 各元素的文本
    pub texts: BTreeMap<ElementId, String>,
    /// 各元素的图片
    pub images: BTreeMap<ElementId, String>,
    /// 对话"继续"按钮是否可用
    pub continue_enabled: bool,
    /// 拥有输入焦点的元素
    pub focused: Option<ElementId>,
    /// 正在播放的视频
    pub playing_videos: BTreeSet<VideoId>,
    /// "正在播放"显示的曲目标题
    pub now_playing: Option<String>,
}

impl Default for StageState {
    fn default() -> Self {
        Self {
            active_scene: None,
            flags: BTreeMap::new(),
            texts: BTreeMap::new(),
            images: BTreeMap::new(),
            continue_enabled: true,
            focused: None,
            playing_videos: BTreeSet::new(),
            now_playing: None,
        }
    }
}

impl StageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 激活场景（互斥）
    pub fn activate(&mut self, screen: Screen) {
        self.active_scene = Some(screen);
    }

    /// 取消所有场景
    pub fn deactivate_all(&mut self) {
        self.active_scene = None;
        self.focused = None;
    }

    /// 添加/移除显示标记
    pub fn set_flag(&mut self, element: ElementId, flag: VisualFlag, on: bool) {
        let flags = self.flags.entry(element).or_default();
        if on {
            flags.insert(flag);
        } else {
            flags.remove(&flag);
        }
    }

    /// 元素是否带有标记
    pub fn has_flag(&self, element: ElementId, flag: VisualFlag) -> bool {
        self.flags
            .get(&element)
            .is_some_and(|flags| flags.contains(&flag))
    }

    /// 元素是否可见（没有 Hidden 标记）
    pub fn is_visible(&self, element: ElementId) -> bool {
        !self.has_flag(element, VisualFlag::Hidden)
    }

    /// 设置文本
    pub fn set_text(&mut self, element: ElementId, text: &str) {
        self.texts.insert(element, text.to_string());
    }

    /// 元素文本（没有设置过时为空）
    pub fn text(&self, element: ElementId) -> &str {
        self.texts.get(&element).map(String::as_str).unwrap_or_default()
    }

    /// 设置图片
    pub fn set_image(&mut self, element: ElementId, asset: &str) {
        self.images.insert(element, asset.to_string());
    }

    /// 元素图片
    pub fn image(&self, element: ElementId) -> Option<&str> {
        self.images.get(&element).map(String::as_str)
    }

    /// 视频开始播放
    pub fn start_video(&mut self, video: VideoId) {
        self.playing_videos.insert(video);
    }

    /// 视频停止并回到开头
    pub fn stop_video(&mut self, video: VideoId) {
        self.playing_videos.remove(&video);
    }

    /// 视频是否在播放
    pub fn is_playing(&self, video: VideoId) -> bool {
        self.playing_videos.contains(&video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut stage = StageState::new();
        assert!(stage.is_visible(ElementId::RewardImage));

        stage.set_flag(ElementId::RewardImage, VisualFlag::Hidden, true);
        stage.set_flag(ElementId::RewardImage, VisualFlag::FadeOut, true);
        assert!(!stage.is_visible(ElementId::RewardImage));
        assert!(stage.has_flag(ElementId::RewardImage, VisualFlag::FadeOut));

        stage.set_flag(ElementId::RewardImage, VisualFlag::Hidden, false);
        assert!(stage.is_visible(ElementId::RewardImage));
        // 移除不存在的标记无影响
        stage.set_flag(ElementId::RewardImage, VisualFlag::Show, false);
        assert!(stage.has_flag(ElementId::RewardImage, VisualFlag::FadeOut));
    }

    #[test]
    fn test_texts_and_images() {
        let mut stage = StageState::new();
        assert_eq!(stage.text(ElementId::DialogText), "");

        stage.set_text(ElementId::DialogText, "Hey");
        stage.set_image(ElementId::DialogCharacter, "images/imms-character.png");
        assert_eq!(stage.text(ElementId::DialogText), "Hey");
        assert_eq!(
            stage.image(ElementId::DialogCharacter),
            Some("images/imms-character.png")
        );
    }

    #[test]
    fn test_deactivate_all_drops_focus() {
        let mut stage = StageState::new();
        stage.activate(Screen::Name);
        stage.focused = Some(ElementId::NameInput);

        stage.deactivate_all();
        assert_eq!(stage.active_scene, None);
        assert_eq!(stage.focused, None);
    }
}
