// src/snapshot.rs
//! 今表示されているテーブルの読み取り専用ビュー 👀

use std::collections::HashMap;

use crate::components::{Card, CombinationSlot, HandSlot};
use crate::protocol::TableStateData;

/// 合法判定が聞いていい質問の一覧。
///
/// 実装は読むだけ。ジェスチャーをまたいでキャッシュしないこと。
pub trait TableSnapshot {
    /// `None` when no combination with that name is on the table.
    fn cards_in_combination(&self, name: &str) -> Option<usize>;

    fn is_player_turn_active(&self) -> bool;

    fn combination_of_card(&self, card: &Card) -> Option<String>;

    /// Member cards, when the backing layer knows them.
    fn combination_cards(&self, _name: &str) -> Option<Vec<Card>> {
        None
    }
}

/// サーバーから届いたテーブル状態をそのまま持つスナップショット。
/// 届くたびに作り直すので、クライアント側で書き換えることはないよ。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    is_current_turn: bool,
    hand: HandSlot,
    combinations: Vec<CombinationSlot>,
    index: HashMap<String, usize>,
}

impl TableState {
    pub fn new(is_current_turn: bool, hand: HandSlot, combinations: Vec<CombinationSlot>) -> Self {
        let index = combinations
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self { is_current_turn, hand, combinations, index }
    }

    pub fn hand(&self) -> &HandSlot {
        &self.hand
    }

    pub fn combinations(&self) -> &[CombinationSlot] {
        &self.combinations
    }

    pub fn combination(&self, name: &str) -> Option<&CombinationSlot> {
        self.index.get(name).map(|&i| &self.combinations[i])
    }
}

impl From<TableStateData> for TableState {
    fn from(data: TableStateData) -> Self {
        TableState::new(data.is_current_turn, HandSlot::new(data.hand), data.combinations)
    }
}

impl TableSnapshot for TableState {
    fn cards_in_combination(&self, name: &str) -> Option<usize> {
        self.combination(name).map(|c| c.cards.len())
    }

    fn is_player_turn_active(&self) -> bool {
        self.is_current_turn
    }

    fn combination_of_card(&self, card: &Card) -> Option<String> {
        self.combinations
            .iter()
            .find(|c| c.contains(card))
            .map(|c| c.name.clone())
    }

    fn combination_cards(&self, name: &str) -> Option<Vec<Card>> {
        self.combination(name).map(|c| c.cards.clone())
    }
}
