// src/components/combination.rs

use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::logic::rules::{is_valid_run, is_valid_trio};

/// A visible table combination never has fewer cards than this.
pub const MIN_COMBINATION_SIZE: usize = 3;

/// 組み合わせの種類。カードから導出するもので、保存はしないよ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinationKind {
    /// 同じランク3枚以上
    Trio,
    /// 同じスートの連番3枚以上
    Run,
}

impl CombinationKind {
    /// カードの並びがどっちの形か判定する。どっちでもなければ `None` 🤔
    pub fn of(cards: &[Card]) -> Option<Self> {
        if is_valid_trio(cards) {
            Some(CombinationKind::Trio)
        } else if is_valid_run(cards) {
            Some(CombinationKind::Run)
        } else {
            None
        }
    }
}

/// テーブルに置かれている名前付きのカードグループだよ！🃏🃏🃏
///
/// サーバーから届いた状態をそのまま持つだけで、クライアントでは書き換えない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationSlot {
    pub name: String,
    pub cards: Vec<Card>,
}

impl CombinationSlot {
    pub fn new(name: impl Into<String>, cards: Vec<Card>) -> Self {
        Self { name: name.into(), cards }
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }
}
