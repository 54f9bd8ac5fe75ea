//! # Room 物件
//!
//! 房间中可点击物件的特写内容。

use crate::input::RoomObject;

/// 物件特写：图片与说明
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemFocus {
    /// 特写图片
    pub image: &'static str,
    /// 说明文字
    pub caption: &'static str,
}

/// 相框特写
pub const PICTURE_FOCUS: ItemFocus = ItemFocus {
    image: "images/picture-frame.png",
    caption: "A cherished photo of you and Imms together... A memory captured forever.",
};

/// 玩偶特写
pub const PLUSHIES_FOCUS: ItemFocus = ItemFocus {
    image: "images/plushies.png",
    caption: "A blue whale with a white belly and a purple crochet octopus... \
Handmade gifts you crafted with love for Imms!",
};

/// 获取物件的特写内容；没有特写的物件返回 `None`
pub fn item_focus(object: &RoomObject) -> Option<ItemFocus> {
    match object {
        RoomObject::Picture => Some(PICTURE_FOCUS),
        RoomObject::Plushies => Some(PLUSHIES_FOCUS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_focus() {
        assert_eq!(item_focus(&RoomObject::Picture), Some(PICTURE_FOCUS));
        assert_eq!(item_focus(&RoomObject::Plushies), Some(PLUSHIES_FOCUS));
        assert_eq!(item_focus(&RoomObject::Imms), None);
        assert_eq!(item_focus(&RoomObject::Gregory), None);
        assert_eq!(item_focus(&RoomObject::Other("lamp".to_string())), None);
    }
}
