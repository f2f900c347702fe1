// src/config/classes.rs
//! CSS class names and selectors shared with the renderer's stylesheet.

pub const DROP_ZONE_SELECTOR: &str = "[data-drop-zone]";
pub const GAME_CARD_SELECTOR: &str = ".game-card";
pub const ACTIVE_TURN_SELECTOR: &str = ".turn-indicator.active";
pub const CURRENT_TURN_ZONE_SELECTOR: &str = "[data-is-current-turn=\"true\"]";

// ドラッグ開始時に全ゾーンに付けるヒント
pub const VALID_HINT: &str = "valid-drop-hint";
pub const INVALID_HINT: &str = "invalid-drop-hint";

// ポインタが乗っているゾーン (マウス)
pub const HOVER_VALID: &str = "valid-drop";
pub const HOVER_INVALID: &str = "invalid-drop";
// ポインタが乗っているゾーン (タッチ)
pub const TOUCH_HOVER: &str = "touch-drag-over";

// ドラッグ中のカード
pub const DRAGGING: &str = "dragging";
pub const TOUCH_DRAGGING: &str = "touch-dragging";

/// Every class this crate may put on a zone; clearing removes all of them.
pub const ZONE_CLASSES: [&str; 5] = [VALID_HINT, INVALID_HINT, HOVER_VALID, HOVER_INVALID, TOUCH_HOVER];
