// src/components/drag_context.rs

use serde::{Deserialize, Serialize};

use super::card::{Card, Rank, Suit};
use crate::error::GestureError;
use crate::protocol::CardData;

/// ドラッグを始めた入力デバイス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Where the dragged card was picked up from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum DragOrigin {
    Hand,
    Table { combination: String },
}

impl DragOrigin {
    pub fn combination(&self) -> Option<&str> {
        match self {
            DragOrigin::Hand => None,
            DragOrigin::Table { combination } => Some(combination),
        }
    }
}

/// ドラッグ中のカードの情報だよ！🖱️➡️🃏
///
/// ジェスチャーの間だけ存在して、ドロップかキャンセルで破棄される。
/// 同時に存在できるのは1つだけ (`GestureMachine` が持つ)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragContext {
    pub card: Card,
    pub origin: DragOrigin,
    /// 手札なら手札内の位置、テーブルなら組み合わせ内の位置
    pub position: usize,
    pub pointer_kind: PointerKind,
}

impl DragContext {
    /// Validates the loosely shaped payload the renderer attaches to a card.
    pub fn from_payload(data: &CardData, pointer_kind: PointerKind) -> Result<Self, GestureError> {
        let position = data
            .position
            .as_ref()
            .ok_or_else(|| malformed("missing position"))?
            .as_index()
            .ok_or_else(|| malformed("position is not a non-negative integer"))?;

        let origin = match data.source.as_deref().map(str::trim) {
            Some("hand") => DragOrigin::Hand,
            Some("table") => {
                let combination = data
                    .combination_name
                    .as_deref()
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| malformed("table card without combination name"))?;
                DragOrigin::Table { combination: combination.to_string() }
            }
            Some(other) => return Err(malformed(&format!("unknown source {:?}", other))),
            None => return Err(malformed("missing source")),
        };

        let rank: Rank = data
            .card_value
            .as_ref()
            .ok_or_else(|| malformed("missing card value"))?
            .to_string()
            .parse()?;
        let suit: Suit = data
            .card_type
            .as_deref()
            .ok_or_else(|| malformed("missing card type"))?
            .parse()?;

        // テーブルのカードは card_id にデッキ番号が要るので必須
        let deck_index = match (&origin, data.deck.as_ref()) {
            (_, Some(deck)) => deck
                .as_index()
                .and_then(|d| u32::try_from(d).ok())
                .ok_or_else(|| malformed("deck is not a non-negative integer"))?,
            (DragOrigin::Hand, None) => 0,
            (DragOrigin::Table { .. }, None) => return Err(malformed("table card without deck")),
        };

        Ok(Self {
            card: Card::new(rank, suit, deck_index),
            origin,
            position,
            pointer_kind,
        })
    }

    /// Parses the `application/json` drag data string.
    pub fn from_json(json: &str, pointer_kind: PointerKind) -> Result<Self, GestureError> {
        let data: CardData = serde_json::from_str(json)
            .map_err(|e| malformed(&format!("drag data is not valid JSON: {}", e)))?;
        Self::from_payload(&data, pointer_kind)
    }
}

fn malformed(reason: &str) -> GestureError {
    GestureError::MalformedGesture(reason.to_string())
}
