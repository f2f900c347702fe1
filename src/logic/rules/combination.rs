// src/logic/rules/combination.rs
//! 組み合わせ (トリオ / ラン) の形を判定する純粋関数たち。

use itertools::Itertools;

use crate::components::card::Card;
use crate::components::combination::{CombinationKind, MIN_COMBINATION_SIZE};

/// 3枚以上、全部同じランク。
pub fn is_valid_trio(cards: &[Card]) -> bool {
    cards.len() >= MIN_COMBINATION_SIZE && cards.iter().map(|c| c.rank).all_equal()
}

/// 3枚以上、全部同じスートで、並べ替えると隙間も重複もない連番。
/// A は 1 としてだけ扱う (K-A の折り返しはなし)。
pub fn is_valid_run(cards: &[Card]) -> bool {
    if cards.len() < MIN_COMBINATION_SIZE || !cards.iter().map(|c| c.suit).all_equal() {
        return false;
    }
    cards
        .iter()
        .map(|c| c.rank.ordinal())
        .sorted_unstable()
        .tuple_windows()
        .all(|(a, b)| b == a + 1)
}

/// `removing` 枚抜いても最低枚数が残るか。
///
/// 残りの形までは見ない (サーバーがやる)。
pub fn can_shrink(cards: &[Card], removing: &Card) -> bool {
    cards.contains(removing) && leaves_minimum(cards.len())
}

/// Count-only form of [`can_shrink`] for snapshots that only expose sizes.
pub fn leaves_minimum(count: usize) -> bool {
    count > MIN_COMBINATION_SIZE
}

/// [`can_shrink`], and the remaining cards still form a trio or a run.
pub fn can_take_preserving_shape(cards: &[Card], removing: &Card) -> bool {
    if !can_shrink(cards, removing) {
        return false;
    }
    let mut remaining = cards.to_vec();
    if let Some(pos) = remaining.iter().position(|c| c == removing) {
        remaining.remove(pos);
    }
    CombinationKind::of(&remaining).is_some()
}
