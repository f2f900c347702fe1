// src/app/dom.rs
//! DOM-backed collaborators: zone lookup, rendered-table snapshot, and the
//! renderer that mirrors `Affordances` onto class lists.

use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::affordance::{Affordances, ZoneHint};
use super::gesture::{DropZoneLocator, Point};
use crate::components::{Card, PointerKind};
use crate::config::classes;
use crate::config::gesture::TOUCH_DRAG_Z_INDEX;
use crate::protocol::{CardData, NumberOrString, ZoneDescriptor};
use crate::snapshot::TableSnapshot;

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn attr(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(name).filter(|v| !v.is_empty())
}

/// カード要素の data 属性からドラッグペイロードを作る
pub fn card_data_from_element(el: &Element) -> CardData {
    CardData {
        position: attr(el, "data-position").map(NumberOrString::Text),
        source: attr(el, "data-source"),
        combination_name: attr(el, "data-combination-name"),
        card_value: attr(el, "data-card-value").map(NumberOrString::Text),
        card_type: attr(el, "data-card-type"),
        deck: attr(el, "data-deck").map(NumberOrString::Text),
    }
}

fn all_zone_elements(doc: &Document) -> Vec<Element> {
    let list = match doc.query_selector_all(classes::DROP_ZONE_SELECTOR) {
        Ok(list) => list,
        Err(e) => {
            warn!("querySelectorAll failed: {:?}", e);
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Zones are keyed by element id; id-less zones by their document order.
fn zone_key(el: &Element, index: usize) -> String {
    let id = el.id();
    if id.is_empty() {
        format!("drop-zone-{}", index)
    } else {
        id
    }
}

fn describe(el: &Element, index: usize) -> Option<ZoneDescriptor> {
    Some(ZoneDescriptor {
        id: zone_key(el, index),
        drop_zone: attr(el, "data-drop-zone")?,
        position: attr(el, "data-position").map(NumberOrString::Text),
        combination_name: attr(el, "data-combination-name"),
    })
}

/// Describes a zone element the browser handed us directly (native drop).
pub fn describe_zone_element(el: &Element) -> Option<ZoneDescriptor> {
    let doc = document()?;
    let index = all_zone_elements(&doc)
        .iter()
        .position(|z| z.is_same_node(Some(el.as_ref())))
        .unwrap_or(0);
    describe(el, index)
}

pub struct DomLocator {
    doc: Document,
}

impl DomLocator {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }
}

impl DropZoneLocator for DomLocator {
    fn locate(&self, point: Point) -> Option<ZoneDescriptor> {
        let below = self.doc.element_from_point(point.x as f32, point.y as f32)?;
        let zone = below.closest(classes::DROP_ZONE_SELECTOR).ok()??;
        describe_zone_element(&zone)
    }

    fn mounted_zones(&self) -> Vec<ZoneDescriptor> {
        all_zone_elements(&self.doc)
            .iter()
            .enumerate()
            .filter_map(|(i, el)| describe(el, i))
            .collect()
    }
}

/// 描画済みの DOM から読むスナップショット。
pub struct DomSnapshot {
    doc: Document,
}

impl DomSnapshot {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    fn count(&self, selector: &str) -> Option<usize> {
        self.doc.query_selector_all(selector).ok().map(|list| list.length() as usize)
    }

    fn count_within(el: &Element) -> usize {
        el.query_selector_all(classes::GAME_CARD_SELECTOR)
            .map(|list| list.length() as usize)
            .unwrap_or(0)
    }
}

fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl TableSnapshot for DomSnapshot {
    /// 組み合わせのカード枚数を数えるよ 🃏
    ///
    /// カードを包んでいる要素 (ゾーン自身のこともある) の中身と、
    /// 組み合わせ名の付いた `.game-card` の数の多い方を使う。
    /// 名前の付いた要素が1つもなければ `None`。
    fn cards_in_combination(&self, name: &str) -> Option<usize> {
        let named = format!("[data-combination-name=\"{}\"]", css_escape(name));
        let containers = self
            .doc
            .query_selector_all(&format!("{}:not({})", named, classes::GAME_CARD_SELECTOR))
            .ok()?;
        let nested = (0..containers.length())
            .filter_map(|i| containers.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| Self::count_within(&el))
            .max();
        let tagged = self.count(&format!("{}{}", classes::GAME_CARD_SELECTOR, named)).unwrap_or(0);

        match nested {
            Some(nested) => Some(nested.max(tagged)),
            None if tagged > 0 => Some(tagged),
            None => None,
        }
    }

    fn is_player_turn_active(&self) -> bool {
        [classes::ACTIVE_TURN_SELECTOR, classes::CURRENT_TURN_ZONE_SELECTOR]
            .iter()
            .any(|selector| matches!(self.doc.query_selector(selector), Ok(Some(_))))
    }

    fn combination_of_card(&self, card: &Card) -> Option<String> {
        let selector = format!(
            "{}[data-source=\"table\"][data-card-value=\"{}\"][data-card-type=\"{}\"][data-deck=\"{}\"]",
            classes::GAME_CARD_SELECTOR,
            card.rank,
            card.suit,
            card.deck_index
        );
        let el = self.doc.query_selector(&selector).ok()??;
        attr(&el, "data-combination-name")
    }
}

/// `Affordances` をクラスとスタイルに反映する。何度呼んでも同じ結果になる。
pub struct DomAffordanceRenderer {
    doc: Document,
}

impl DomAffordanceRenderer {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    pub fn render(&self, affordances: &Affordances, dragged: Option<&HtmlElement>) {
        let touch = affordances.dragging == Some(PointerKind::Touch);

        for (i, zone) in all_zone_elements(&self.doc).iter().enumerate() {
            let list = zone.class_list();
            for class in classes::ZONE_CLASSES {
                let _ = list.remove_1(class);
            }
            let key = zone_key(zone, i);
            match affordances.hints.get(&key) {
                Some(ZoneHint::Allowed) => {
                    let _ = list.add_1(classes::VALID_HINT);
                }
                Some(ZoneHint::Denied) => {
                    let _ = list.add_1(classes::INVALID_HINT);
                }
                None => {}
            }
            if let Some((hovered, hover)) = &affordances.hovered {
                if *hovered == key {
                    let class = match (touch, hover.legal) {
                        (true, _) => classes::TOUCH_HOVER,
                        (false, true) => classes::HOVER_VALID,
                        (false, false) => classes::HOVER_INVALID,
                    };
                    let _ = list.add_1(class);
                }
            }
        }

        if let Some(card) = dragged {
            let list = card.class_list();
            let _ = list.remove_2(classes::DRAGGING, classes::TOUCH_DRAGGING);
            match affordances.dragging {
                Some(PointerKind::Mouse) => {
                    let _ = list.add_1(classes::DRAGGING);
                }
                Some(PointerKind::Touch) => {
                    let _ = list.add_1(classes::TOUCH_DRAGGING);
                }
                None => {}
            }
            let style = card.style();
            match affordances.offset {
                Some((dx, dy)) => {
                    let _ = style.set_property("transform", &format!("translate({}px, {}px)", dx, dy));
                    let _ = style.set_property("z-index", TOUCH_DRAG_Z_INDEX);
                }
                None => {
                    let _ = style.remove_property("transform");
                    let _ = style.remove_property("z-index");
                }
            }
        }
    }
}
