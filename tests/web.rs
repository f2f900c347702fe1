// tests/web.rs
//! ブラウザ上でだけ動くテスト (`wasm-pack test --headless --chrome`)。

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use combo_drag::app::affordance::{Affordances, ZoneHint};
use combo_drag::app::dom::{document, DomAffordanceRenderer, DomLocator, DomSnapshot};
use combo_drag::app::gesture::DropZoneLocator;
use combo_drag::components::PointerKind;
use combo_drag::snapshot::TableSnapshot;
use combo_drag::DragDropController;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

const TABLE: &str = r#"
<div class="turn-indicator active"></div>
<div id="hand-zone" data-drop-zone="hand" style="position:fixed;left:0;top:0;width:100px;height:100px"></div>
<div id="combo-trio-A" data-drop-zone="add-to-combination" data-combination-name="trio-A"
     style="position:fixed;left:200px;top:0;width:100px;height:100px"></div>
<div class="combination" data-combination-name="trio-A">
  <div class="game-card" data-source="table" data-combination-name="trio-A" data-position="0"
       data-card-value="7" data-card-type="hearts" data-deck="0"></div>
  <div class="game-card"></div>
  <div class="game-card"></div>
  <div class="game-card"></div>
</div>
<div id="hand-card" class="game-card" data-source="hand" data-position="2"
     data-card-value="K" data-card-type="spades"></div>
"#;

fn mount(html: &str) -> web_sys::Document {
    let doc = document().unwrap();
    doc.body().unwrap().set_inner_html(html);
    doc
}

fn by_id(id: &str) -> Element {
    document().unwrap().get_element_by_id(id).unwrap()
}

#[wasm_bindgen_test]
fn locator_reads_zone_markup() {
    let doc = mount(TABLE);
    let zones = DomLocator::new(doc.clone()).mounted_zones();
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[1].id, "combo-trio-A");
    assert_eq!(zones[1].combination_name.as_deref(), Some("trio-A"));

    let hit = DomLocator::new(doc).locate(combo_drag::app::gesture::Point::new(250.0, 50.0));
    assert_eq!(hit.map(|z| z.id), Some("combo-trio-A".to_string()));
}

#[wasm_bindgen_test]
fn snapshot_counts_rendered_cards() {
    let doc = mount(TABLE);
    let snapshot = DomSnapshot::new(doc.clone());
    assert_eq!(snapshot.cards_in_combination("trio-A"), Some(4));
    assert_eq!(snapshot.cards_in_combination("run-9"), None);
    assert!(snapshot.is_player_turn_active());

    doc.query_selector(".turn-indicator").unwrap().unwrap().remove();
    assert!(!DomSnapshot::new(doc).is_player_turn_active());
}

// ゾーン自身がカードを包んでいるレイアウト
const WRAPPED_TABLE: &str = r#"
<div class="turn-indicator active"></div>
<div id="combo-trio-A" data-drop-zone="add-to-combination" data-combination-name="trio-A">
  <div class="game-card" data-source="table" data-combination-name="trio-A" data-position="0"
       data-card-value="7" data-card-type="hearts" data-deck="0"></div>
  <div class="game-card" data-source="table" data-combination-name="trio-A" data-position="1"
       data-card-value="7" data-card-type="clubs" data-deck="0"></div>
  <div class="game-card" data-source="table" data-combination-name="trio-A" data-position="2"
       data-card-value="7" data-card-type="spades" data-deck="0"></div>
  <div class="game-card" data-source="table" data-combination-name="trio-A" data-position="3"
       data-card-value="7" data-card-type="diamonds" data-deck="0"></div>
</div>
<div id="hand-zone" data-drop-zone="hand"></div>
"#;

#[wasm_bindgen_test]
fn snapshot_counts_cards_inside_a_wrapping_zone() {
    let doc = mount(WRAPPED_TABLE);
    let snapshot = DomSnapshot::new(doc);
    assert_eq!(snapshot.cards_in_combination("trio-A"), Some(4));
}

#[wasm_bindgen_test]
fn table_card_leaves_a_wrapping_zone_of_four() {
    mount(WRAPPED_TABLE);
    let controller = DragDropController::new(None).unwrap();
    let card = document().unwrap().query_selector(".game-card").unwrap().unwrap();

    assert_eq!(controller.pickup(card, 0.0, 0.0, true), "started");
    assert!(by_id("hand-zone").class_list().contains("valid-drop-hint"));
    assert_eq!(controller.drop_on_zone(by_id("hand-zone")), "dropped:take_table_card");
    controller.destroy();
}

#[wasm_bindgen_test]
fn renderer_sets_and_clears_classes() {
    let doc = mount(TABLE);
    let renderer = DomAffordanceRenderer::new(doc);
    let card: HtmlElement = by_id("hand-card").dyn_into().unwrap();

    let mut affordances = Affordances::default();
    affordances.start(
        PointerKind::Mouse,
        vec![("hand-zone".to_string(), ZoneHint::Denied), ("combo-trio-A".to_string(), ZoneHint::Allowed)],
    );
    affordances.hover("combo-trio-A".to_string(), true);
    renderer.render(&affordances, Some(&card));

    let combo = by_id("combo-trio-A").class_list();
    assert!(combo.contains("valid-drop-hint"));
    assert!(combo.contains("valid-drop"));
    assert!(by_id("hand-zone").class_list().contains("invalid-drop-hint"));
    assert!(card.class_list().contains("dragging"));

    affordances.clear();
    renderer.render(&affordances, Some(&card));
    renderer.render(&affordances, Some(&card));
    assert_eq!(by_id("combo-trio-A").class_list().length(), 0);
    assert_eq!(by_id("hand-zone").class_list().length(), 0);
    assert!(!card.class_list().contains("dragging"));
}

#[wasm_bindgen_test]
fn controller_pushes_one_intent_per_drop() {
    mount(TABLE);
    let sent: Rc<RefCell<Vec<(String, String)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&sent);
    let push = Closure::wrap(Box::new(move |event: JsValue, payload: JsValue| {
        let payload = js_sys::JSON::stringify(&payload).unwrap().as_string().unwrap();
        sink.borrow_mut().push((event.as_string().unwrap(), payload));
    }) as Box<dyn FnMut(JsValue, JsValue)>);

    let controller = DragDropController::new(None).unwrap();
    controller.use_push_event(push.as_ref().unchecked_ref::<js_sys::Function>().clone());

    assert_eq!(controller.pickup(by_id("hand-card"), 10.0, 10.0, false), "started");
    assert!(controller.is_dragging());
    assert_eq!(controller.drop_on_zone(by_id("combo-trio-A")), "dropped:add_cards_to_combination");
    assert!(!controller.is_dragging());
    assert_eq!(controller.cancel(), "ignored");

    assert_eq!(
        sent.borrow().as_slice(),
        &[(
            "add_cards_to_combination".to_string(),
            r#"{"card_positions":[2],"combination_name":"trio-A"}"#.to_string()
        )]
    );
    controller.destroy();
}

fn cancelable(name: &str) -> web_sys::Event {
    let init = web_sys::EventInit::new();
    init.set_cancelable(true);
    web_sys::Event::new_with_event_init_dict(name, &init).unwrap()
}

#[wasm_bindgen_test]
fn touch_drag_blocks_scrolling_until_it_ends() {
    mount(TABLE);
    let window = web_sys::window().unwrap();
    let controller = DragDropController::new(None).unwrap();
    assert_eq!(controller.pickup(by_id("hand-card"), 10.0, 10.0, true), "started");

    let touch_move = cancelable("touchmove");
    assert!(!window.dispatch_event(&touch_move).unwrap());
    assert!(touch_move.default_prevented());

    let touch_end = cancelable("touchend");
    window.dispatch_event(&touch_end).unwrap();
    assert!(touch_end.default_prevented());

    // ジェスチャーが終わればリスナーは外れる
    assert_eq!(controller.cancel(), "cancelled");
    let after = cancelable("touchmove");
    assert!(window.dispatch_event(&after).unwrap());
    assert!(!after.default_prevented());
    controller.destroy();
}

#[wasm_bindgen_test]
fn push_callback_can_call_back_into_the_controller() {
    mount(TABLE);
    let controller = Rc::new(DragDropController::new(None).unwrap());
    let seen: Rc<RefCell<Vec<(String, bool)>>> = Rc::new(RefCell::new(Vec::new()));

    let inner = Rc::clone(&controller);
    let sink = Rc::clone(&seen);
    let push = Closure::wrap(Box::new(move |event: JsValue, _payload: JsValue| {
        let dragging = inner.is_dragging();
        assert_eq!(inner.cancel(), "ignored");
        sink.borrow_mut().push((event.as_string().unwrap(), dragging));
    }) as Box<dyn FnMut(JsValue, JsValue)>);
    controller.use_push_event(push.as_ref().unchecked_ref::<js_sys::Function>().clone());

    assert_eq!(controller.pickup(by_id("hand-card"), 10.0, 10.0, false), "started");
    assert_eq!(controller.drop_on_zone(by_id("combo-trio-A")), "dropped:add_cards_to_combination");
    assert_eq!(seen.borrow().as_slice(), &[("add_cards_to_combination".to_string(), false)]);

    // 次のドラッグも普通に始められる
    assert_eq!(controller.pickup(by_id("hand-card"), 10.0, 10.0, false), "started");
    controller.destroy();
}
