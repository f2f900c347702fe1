// src/app/controller.rs
//! JS のフックから呼ばれる窓口だよ！🎮
//!
//! ジェスチャーの状態機械とサーバーから届いた最新の状態はひとつのロックの中、
//! 送信経路は別のロックに置く。ウィンドウのリスナーも直接の呼び出しも同じものを見る。
//! インテントはロックを全部外してから送るので、ホストのコールバックが
//! コントローラーを呼び返してもデッドロックしない。

use std::sync::{Arc, Mutex};

use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use super::browser_event_manager::{detach_drag_listeners, sync_listeners, Listeners};
use super::dom::{self, DomAffordanceRenderer, DomLocator, DomSnapshot};
use super::gesture::{CancelReason, GestureEnv, GestureEvent, GestureMachine, GestureOutcome, GesturePhase, Point, RawPayload};
use crate::components::PointerKind;
use crate::config::GestureConfig;
use crate::error::{GestureError, TransportError};
use crate::logic::intent::{IntentOutbox, IntentTransport};
use crate::network::{lock, ConnectionStatus, NetworkManager};
use crate::protocol::{Intent, ServerMessage};
use crate::snapshot::{TableSnapshot, TableState};

/// インテントの送り先
pub(crate) enum Transport {
    Unset,
    /// `pushEvent(event, payload)` のような JS コールバック
    Callback(js_sys::Function),
    Socket(NetworkManager),
}

impl IntentTransport for Transport {
    fn send_intent(&self, intent: &Intent) -> Result<(), TransportError> {
        match self {
            Transport::Unset => Err(TransportError::NotConnected),
            Transport::Callback(push) => {
                let payload = js_sys::JSON::parse(&intent.payload().to_string())
                    .map_err(|e| TransportError::Serialize(format!("{:?}", e)))?;
                push.call2(&JsValue::NULL, &JsValue::from_str(intent.event_name()), &payload)
                    .map(|_| ())
                    .map_err(|e| TransportError::SendFailed(format!("{:?}", e)))
            }
            Transport::Socket(network) => network.send_intent(intent),
        }
    }
}

pub(crate) struct ControllerState {
    machine: GestureMachine,
    table: Option<TableState>,
    dragged: Option<HtmlElement>,
    last_rejection: Option<String>,
}

/// コントローラーとウィンドウのリスナーで共有するもの一式
#[derive(Clone)]
pub(crate) struct Shared {
    state: Arc<Mutex<ControllerState>>,
    transport: Arc<Mutex<Transport>>,
}

impl Shared {
    fn new(state: ControllerState) -> Self {
        Self { state: Arc::new(Mutex::new(state)), transport: Arc::new(Mutex::new(Transport::Unset)) }
    }

    pub(crate) fn phase(&self) -> GesturePhase {
        lock(&self.state).machine.phase()
    }

    fn pending_messages(&self) -> Vec<ServerMessage> {
        match &*lock(&self.transport) {
            Transport::Socket(network) => network.drain_messages(),
            _ => Vec::new(),
        }
    }

    /// 溜まったインテントを送る。コールバックは取り出してからロックの外で呼ぶ。
    fn deliver(&self, outbox: &IntentOutbox) {
        if outbox.is_empty() {
            return;
        }
        let callback = match &*lock(&self.transport) {
            Transport::Callback(push) => Some(push.clone()),
            _ => None,
        };
        match callback {
            Some(push) => outbox.flush(&Transport::Callback(push)),
            None => outbox.flush(&*lock(&self.transport)),
        }
    }
}

impl ControllerState {
    fn apply(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::TableState { state } => {
                self.table = Some(TableState::from(state));
                self.last_rejection = None;
            }
            ServerMessage::MoveRejected { reason } => {
                info!("server rejected move: {}", reason);
                self.last_rejection = Some(reason);
            }
            ServerMessage::Error { message } => warn!("server error: {}", message),
        }
    }
}

/// イベントを1つ状態機械に通して、ハイライトを描き直す。
///
/// 送信はステートのロックを外したあと。
pub(crate) fn dispatch(shared: &Shared, event: GestureEvent) -> GestureOutcome {
    let Some(doc) = dom::document() else {
        warn!("no document, gesture event dropped");
        return GestureOutcome::Ignored;
    };
    let pending = shared.pending_messages();
    let outbox = IntentOutbox::new();

    let outcome = {
        let mut guard = lock(&shared.state);
        let state = &mut *guard;
        for message in pending {
            state.apply(message);
        }

        let locator = DomLocator::new(doc.clone());
        let dom_snapshot = DomSnapshot::new(doc.clone());
        // サーバーの状態が届いていればそっちを優先
        let snapshot: &dyn TableSnapshot = match &state.table {
            Some(table) => table,
            None => &dom_snapshot,
        };
        let env = GestureEnv { snapshot, locator: &locator, transport: &outbox };
        let outcome = state.machine.handle(event, &env);

        DomAffordanceRenderer::new(doc).render(state.machine.affordances(), state.dragged.as_ref());
        if state.machine.phase() == GesturePhase::Idle {
            state.dragged = None;
        }
        outcome
    };

    shared.deliver(&outbox);
    outcome
}

/// Short label JS can branch on.
fn describe(outcome: &GestureOutcome) -> String {
    match outcome {
        GestureOutcome::Ignored => "ignored".to_string(),
        GestureOutcome::Armed => "armed".to_string(),
        GestureOutcome::Started => "started".to_string(),
        GestureOutcome::Moved { legal: true, .. } => "over-legal".to_string(),
        GestureOutcome::Moved { zone: Some(_), legal: false } => "over-illegal".to_string(),
        GestureOutcome::Moved { zone: None, .. } => "outside".to_string(),
        GestureOutcome::Dropped(intent) => format!("dropped:{}", intent.event_name()),
        GestureOutcome::Cancelled(CancelReason::Aborted) => "cancelled".to_string(),
        GestureOutcome::Cancelled(CancelReason::Denied(reason)) => format!("denied:{:?}", reason),
        GestureOutcome::Cancelled(CancelReason::Error(e)) => format!("error:{}", e),
    }
}

#[wasm_bindgen]
pub struct DragDropController {
    shared: Shared,
    listeners: Listeners,
}

#[wasm_bindgen]
impl DragDropController {
    /// `config_json` は省略可。例: `{"drag_threshold_px": 6, "strict_shape_check": true}`
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<DragDropController, JsValue> {
        let config = match config_json.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(json) => GestureConfig::from_json(json)
                .map_err(|e| GestureError::MalformedGesture(format!("bad config: {}", e)))?,
            None => GestureConfig::default(),
        };
        info!("DragDropController: ready ({:?})", config);
        let state = ControllerState { machine: GestureMachine::new(config), table: None, dragged: None, last_rejection: None };
        Ok(Self { shared: Shared::new(state), listeners: Arc::new(Mutex::new(Vec::new())) })
    }

    /// Sends intents through a JS callback taking `(event, payload)`.
    pub fn use_push_event(&self, push: js_sys::Function) {
        let mut transport = lock(&self.shared.transport);
        if let Transport::Socket(old) = &mut *transport {
            old.disconnect();
        }
        *transport = Transport::Callback(push);
    }

    /// Sends intents over a WebSocket and takes snapshot pushes from it.
    pub fn connect(&self, server_url: String) {
        let mut network = NetworkManager::new(server_url);
        network.connect();
        let mut transport = lock(&self.shared.transport);
        if let Transport::Socket(old) = &mut *transport {
            old.disconnect();
        }
        *transport = Transport::Socket(network);
    }

    pub fn disconnect(&self) {
        if let Transport::Socket(network) = &mut *lock(&self.shared.transport) {
            network.disconnect();
        }
    }

    pub fn connection_status(&self) -> String {
        match &*lock(&self.shared.transport) {
            Transport::Socket(network) => format!("{:?}", network.get_status()),
            Transport::Callback(_) => format!("{:?}", ConnectionStatus::Connected),
            Transport::Unset => format!("{:?}", ConnectionStatus::Disconnected),
        }
    }

    /// Mouse button down on a card element. Becomes a drag after the threshold.
    pub fn press(&self, card: Element, x: f64, y: f64) -> String {
        let payload = RawPayload::Data(dom::card_data_from_element(&card));
        self.start(card, GestureEvent::Press { payload, point: Point::new(x, y), pointer: PointerKind::Mouse })
    }

    /// dragstart / touchstart on a card element.
    pub fn pickup(&self, card: Element, x: f64, y: f64, is_touch: bool) -> String {
        let payload = RawPayload::Data(dom::card_data_from_element(&card));
        self.start(card, GestureEvent::Pickup { payload, point: Point::new(x, y), pointer: pointer_kind(is_touch) })
    }

    /// Pickup from the `application/json` drag data, without an element.
    pub fn pickup_json(&self, card_json: String, x: f64, y: f64, is_touch: bool) -> String {
        let payload = RawPayload::Json(card_json);
        self.run(GestureEvent::Pickup { payload, point: Point::new(x, y), pointer: pointer_kind(is_touch) })
    }

    pub fn move_to(&self, x: f64, y: f64) -> String {
        self.run(GestureEvent::Move { point: Point::new(x, y) })
    }

    pub fn release(&self, x: f64, y: f64) -> String {
        self.run(GestureEvent::Release { point: Point::new(x, y) })
    }

    /// Native drop delivered to a zone element.
    pub fn drop_on_zone(&self, zone: Element) -> String {
        match dom::describe_zone_element(&zone) {
            Some(zone) => self.run(GestureEvent::DropOnZone { zone }),
            None => {
                warn!("drop on an element that is not a drop zone");
                self.run(GestureEvent::Cancel)
            }
        }
    }

    /// 何回呼んでも安全
    pub fn cancel(&self) -> String {
        self.run(GestureEvent::Cancel)
    }

    pub fn is_dragging(&self) -> bool {
        self.shared.phase() == GesturePhase::Active
    }

    /// Applies one server push (JSON `ServerMessage`).
    pub fn apply_server_message(&self, json: &str) -> Result<(), JsValue> {
        let message: ServerMessage = serde_json::from_str(json)
            .map_err(|e| GestureError::MalformedGesture(format!("bad server message: {}", e)))?;
        lock(&self.shared.state).apply(message);
        Ok(())
    }

    /// Drops the pushed snapshot; legality falls back to the rendered DOM.
    pub fn forget_table_state(&self) {
        lock(&self.shared.state).table = None;
    }

    pub fn last_rejection(&self) -> Option<String> {
        lock(&self.shared.state).last_rejection.clone()
    }

    /// Cancels anything in flight and removes window listeners.
    pub fn destroy(&self) {
        self.run(GestureEvent::Cancel);
        if let Err(e) = detach_drag_listeners(&self.listeners) {
            warn!("failed to detach listeners: {:?}", e);
        }
    }
}

impl DragDropController {
    fn start(&self, card: Element, event: GestureEvent) -> String {
        // 進行中のジェスチャーがあるなら、掴み直した要素で上書きしない
        let mut state = lock(&self.shared.state);
        if state.machine.phase() == GesturePhase::Idle {
            state.dragged = card.dyn_into::<HtmlElement>().ok();
        }
        drop(state);
        self.run(event)
    }

    fn run(&self, event: GestureEvent) -> String {
        let outcome = dispatch(&self.shared, event);
        sync_listeners(&self.shared, &self.listeners);
        describe(&outcome)
    }
}

fn pointer_kind(is_touch: bool) -> PointerKind {
    if is_touch {
        PointerKind::Touch
    } else {
        PointerKind::Mouse
    }
}
