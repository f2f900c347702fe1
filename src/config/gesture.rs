// src/config/gesture.rs
//! ジェスチャーの調整値 ⚙️
//!
//! コントローラーを作るときに JS から JSON で上書きできる。

use serde::{Deserialize, Serialize};

/// マウスを押してからドラッグ開始とみなすまでの移動量 (px)
pub const DRAG_THRESHOLD_PX: f64 = 4.0;

/// ドラッグ中のタッチカードを前面に出す z-index
pub const TOUCH_DRAG_Z_INDEX: &str = "1000";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub drag_threshold_px: f64,
    /// Also require the cards left behind in a source combination to still
    /// form a trio or run (only when the snapshot knows the member cards).
    pub strict_shape_check: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: DRAG_THRESHOLD_PX,
            strict_shape_check: false,
        }
    }
}

impl GestureConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
