// src/components/card.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GestureError;

/// カードのスート（マーク）だよ！❤️♦️♣️♠️
///
/// 文字列表現はサーバーと同じ小文字の複数形 (`"hearts"`)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub fn as_str(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suit {
    type Err = GestureError;

    /// サーバーと同じ綴りだけ受け付ける。`card_id` がマークアップの文字列と
    /// 一字一句同じになるように、言い換えはしないよ。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hearts" => Ok(Suit::Hearts),
            "diamonds" => Ok(Suit::Diamonds),
            "clubs" => Ok(Suit::Clubs),
            "spades" => Ok(Suit::Spades),
            other => Err(GestureError::MalformedGesture(format!("unknown suit {:?}", other))),
        }
    }
}

/// カードのランク。A, 2, 3, ..., K
///
/// 判別子がそのまま序数 (A=1, J=11, Q=12, K=13) になってるよ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// Run adjacency value. Not a score.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(value: u8) -> Option<Rank> {
        use Rank::*;
        const ALL: [Rank; 13] = [
            Ace, Two, Three, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King,
        ];
        ALL.get(usize::from(value).checked_sub(1)?).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = GestureError;

    /// `"A"`, `"2"`..`"10"`, `"J"`, `"Q"`, `"K"` だけ。`"a"` や `"07"` はダメ。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        (1..=13)
            .filter_map(Rank::from_ordinal)
            .find(|rank| rank.as_str() == s)
            .ok_or_else(|| GestureError::MalformedGesture(format!("unknown rank {:?}", s)))
    }
}

/// 配られたカード1枚。`(rank, suit, deck_index)` で一意に決まるよ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    /// 複数デッキで遊ぶときの何番目のデッキか
    pub deck_index: u32,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit, deck_index: u32) -> Self {
        Self { rank, suit, deck_index }
    }

    /// `"{rank}_{suit}_{deck_index}"`, the id the server uses for table cards.
    pub fn card_id(&self) -> String {
        format!("{}_{}_{}", self.rank, self.suit, self.deck_index)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} (deck {})", self.rank, self.suit, self.deck_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_id_matches_server_format() {
        let card = Card::new(Rank::Seven, Suit::Hearts, 0);
        assert_eq!(card.card_id(), "7_hearts_0");

        let card = Card::new(Rank::Queen, Suit::Spades, 1);
        assert_eq!(card.card_id(), "Q_spades_1");
    }

    #[test]
    fn rank_ordinals() {
        assert_eq!(Rank::Ace.ordinal(), 1);
        assert_eq!(Rank::Ten.ordinal(), 10);
        assert_eq!(Rank::Jack.ordinal(), 11);
        assert_eq!(Rank::Queen.ordinal(), 12);
        assert_eq!(Rank::King.ordinal(), 13);
        assert!(Rank::Ace < Rank::Two);
        assert!(Rank::Queen < Rank::King);
    }

    #[test]
    fn parse_rank_text() {
        assert_eq!("A".parse::<Rank>().unwrap(), Rank::Ace);
        assert_eq!("10".parse::<Rank>().unwrap(), Rank::Ten);
        assert_eq!("K".parse::<Rank>().unwrap(), Rank::King);
        for bad in ["a", " k ", "0", "07", "11", "joker"] {
            assert!(bad.parse::<Rank>().is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn parse_suit_text() {
        assert_eq!("hearts".parse::<Suit>().unwrap(), Suit::Hearts);
        assert_eq!("spades".parse::<Suit>().unwrap(), Suit::Spades);
        for bad in ["Heart", "Spades", "c", "stars"] {
            assert!(bad.parse::<Suit>().is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn card_id_echoes_parsed_text() {
        // マークアップの文字列をそのまま組み立てたものと同じになる
        for (value, suit, deck) in [("K", "hearts", 1), ("10", "clubs", 0), ("A", "spades", 2)] {
            let card = Card::new(value.parse().unwrap(), suit.parse().unwrap(), deck);
            assert_eq!(card.card_id(), format!("{}_{}_{}", value, suit, deck));
        }
    }
}
