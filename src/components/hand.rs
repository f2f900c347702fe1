// src/components/hand.rs

use serde::{Deserialize, Serialize};

use super::card::Card;

/// ローカルプレイヤーの手札だよ！✋ 並び順がそのまま位置 (0始まり)。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandSlot {
    pub cards: Vec<Card>,
}

impl HandSlot {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}
