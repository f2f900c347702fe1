// src/app/affordance.rs
//! ハイライトの帳簿 🖍️
//!
//! ステートマシンが書いて、レンダラー (`dom.rs`) が要素に反映する。

use std::collections::BTreeMap;

use crate::components::PointerKind;

/// 各ゾーンに付けるヒント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneHint {
    Allowed,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hover {
    pub legal: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Affordances {
    /// 掴まれているカードがある間だけ Some
    pub dragging: Option<PointerKind>,
    pub hints: BTreeMap<String, ZoneHint>,
    /// ポインタが乗っているゾーンは最大1つ
    pub hovered: Option<(String, Hover)>,
    /// タッチ中のカードの移動量 (見た目だけ)
    pub offset: Option<(f64, f64)>,
}

impl Affordances {
    pub fn start(&mut self, pointer: PointerKind, hints: impl IntoIterator<Item = (String, ZoneHint)>) {
        self.clear();
        self.dragging = Some(pointer);
        self.hints = hints.into_iter().collect();
    }

    pub fn hover(&mut self, zone_id: String, legal: bool) {
        self.hovered = Some((zone_id, Hover { legal }));
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    /// ハイライトを全部消す。何回呼んでもいい 🧹
    pub fn clear(&mut self) {
        self.dragging = None;
        self.hints.clear();
        self.hovered = None;
        self.offset = None;
    }

    /// 何も残っていない?
    pub fn is_clear(&self) -> bool {
        self.dragging.is_none() && self.hints.is_empty() && self.hovered.is_none() && self.offset.is_none()
    }

    pub fn hovered_zone(&self) -> Option<&str> {
        self.hovered.as_ref().map(|(id, _)| id.as_str())
    }
}
