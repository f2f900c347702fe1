// src/protocol.rs

// クライアントとサーバー、それからレンダラー (マークアップ) との間で
// やり取りするデータの形をここにまとめるよ！💌
// サーバーに送るイベント名とペイロードのフィールド名は絶対に変えないこと。
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{Card, CombinationSlot};

/// マークアップの data 属性から来る値。数字が文字列で来ることもある。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(u64),
    Text(String),
}

impl NumberOrString {
    /// Non-negative integer view, if it has one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            NumberOrString::Number(n) => usize::try_from(*n).ok(),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOrString::Number(n) => write!(f, "{}", n),
            NumberOrString::Text(s) => f.write_str(s),
        }
    }
}

// --- ドラッグされたカードに付いてくるデータ ---

/// Drag payload as the renderer attaches it to a card element (and as it is
/// stored in the `application/json` drag data). Validated into a
/// `DragContext` before anything uses it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    #[serde(default)]
    pub position: Option<NumberOrString>,
    /// `"hand"` or `"table"`
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub combination_name: Option<String>,
    #[serde(default)]
    pub card_value: Option<NumberOrString>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub deck: Option<NumberOrString>,
}

/// Raw attributes of a mounted drop-zone element.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDescriptor {
    /// 要素の id。ハイライトの付け外しに使う
    pub id: String,
    /// `data-drop-zone`
    pub drop_zone: String,
    #[serde(default)]
    pub position: Option<NumberOrString>,
    #[serde(default)]
    pub combination_name: Option<String>,
}

// --- クライアントからサーバーへ (C2S) ---

/// The four moves the client can propose. Serialized as
/// `{"event": "<name>", "payload": {...}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "payload")]
pub enum Intent {
    #[serde(rename = "reorder_hand_card")]
    ReorderHand { from_position: usize, to_position: usize },

    #[serde(rename = "take_table_card")]
    TakeTableCard { combination_name: String, card_position: usize },

    #[serde(rename = "add_cards_to_combination")]
    AddToCombination { combination_name: String, card_positions: Vec<usize> },

    #[serde(rename = "move_card_between_combinations")]
    MoveBetweenCombinations {
        source_combination: String,
        target_combination: String,
        card_id: String,
    },
}

impl Intent {
    pub fn event_name(&self) -> &'static str {
        match self {
            Intent::ReorderHand { .. } => "reorder_hand_card",
            Intent::TakeTableCard { .. } => "take_table_card",
            Intent::AddToCombination { .. } => "add_cards_to_combination",
            Intent::MoveBetweenCombinations { .. } => "move_card_between_combinations",
        }
    }

    /// Payload object alone, for transports that take (event, payload) pairs.
    pub fn payload(&self) -> serde_json::Value {
        match serde_json::to_value(self) {
            Ok(mut framed) => framed["payload"].take(),
            Err(_) => serde_json::Value::Null,
        }
    }
}

// --- サーバーからクライアントへ (S2C) ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum ServerMessage {
    /// 権威あるテーブル状態。届くたびにスナップショットを作り直す。
    TableState { state: TableStateData },
    /// 提案した手をサーバーが却下した
    MoveRejected { reason: String },
    Error { message: String },
}

/// Authoritative table as pushed by the server.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStateData {
    pub is_current_turn: bool,
    #[serde(default)]
    pub hand: Vec<Card>,
    #[serde(default)]
    pub combinations: Vec<CombinationSlot>,
}
