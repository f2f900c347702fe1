// src/app/gesture.rs
//! ドラッグ1回分 (マウスでもタッチでも) を、掴んでから落とす/やめるまで追いかけるよ！🖱️👆
//!
//! `Idle -> (Armed ->) Active -> {Dropped, Cancelled} -> Idle`
//!
//! マウスは押しただけだと Armed で、しきい値を超えて動いたらドラッグ開始。
//! dragstart と touchstart はすぐ始まる。押したあとに dragstart が来たら、
//! Armed のドラッグをそのまま昇格させる。

use log::{debug, info, warn};

use super::affordance::{Affordances, ZoneHint};
use crate::components::{DragContext, DropTarget, PointerKind};
use crate::config::GestureConfig;
use crate::error::GestureError;
use crate::logic::intent::{IntentEmitter, IntentTransport};
use crate::logic::rules::{legality_map, resolve, DenyReason, Verdict};
use crate::protocol::{CardData, Intent, ZoneDescriptor};
use crate::snapshot::TableSnapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// 座標からドロップゾーンを探すやつ (ブラウザなら elementFromPoint)。
pub trait DropZoneLocator {
    /// Nearest enclosing drop zone at `point`, if any.
    fn locate(&self, point: Point) -> Option<ZoneDescriptor>;

    /// Every drop zone currently mounted.
    fn mounted_zones(&self) -> Vec<ZoneDescriptor>;
}

/// イベント1つを処理する間だけ借りる道具箱 🧰
pub struct GestureEnv<'a> {
    pub snapshot: &'a dyn TableSnapshot,
    pub locator: &'a dyn DropZoneLocator,
    pub transport: &'a dyn IntentTransport,
}

/// 届いたままのドラッグ情報。構造化済みか、drag data の JSON 文字列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    Data(CardData),
    Json(String),
}

impl RawPayload {
    fn decode(&self, pointer: PointerKind) -> Result<DragContext, GestureError> {
        match self {
            RawPayload::Data(data) => DragContext::from_payload(data, pointer),
            RawPayload::Json(json) => DragContext::from_json(json, pointer),
        }
    }
}

impl From<CardData> for RawPayload {
    fn from(data: CardData) -> Self {
        RawPayload::Data(data)
    }
}

impl From<String> for RawPayload {
    fn from(json: String) -> Self {
        RawPayload::Json(json)
    }
}

/// マウスとタッチで共通のイベント語彙
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// カードの上でマウスを押した。Armed になるだけ
    Press { payload: RawPayload, point: Point, pointer: PointerKind },
    /// dragstart / touchstart. Starts the drag immediately.
    Pickup { payload: RawPayload, point: Point, pointer: PointerKind },
    Move { point: Point },
    Release { point: Point },
    /// Native drop event delivered by the zone element itself.
    DropOnZone { zone: ZoneDescriptor },
    /// Escape, drag abort, pointer-cancel, lost capture.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Armed,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// 明示的なキャンセル、またはドラッグにならなかった押下
    Aborted,
    Denied(DenyReason),
    Error(GestureError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// 今の状態では意味のないイベント (何もしない)
    Ignored,
    Armed,
    Started,
    Moved { zone: Option<String>, legal: bool },
    Dropped(Intent),
    Cancelled(CancelReason),
}

#[derive(Debug, Clone)]
enum GestureState {
    Idle,
    Armed { drag: DragContext, start: Point },
    Active { drag: DragContext, start: Point },
}

/// ドラッグ状態を1つだけ持つステートマシン。
#[derive(Debug, Clone)]
pub struct GestureMachine {
    state: GestureState,
    config: GestureConfig,
    affordances: Affordances,
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureMachine {
    pub fn new(config: GestureConfig) -> Self {
        Self { state: GestureState::Idle, config, affordances: Affordances::default() }
    }

    pub fn phase(&self) -> GesturePhase {
        match self.state {
            GestureState::Idle => GesturePhase::Idle,
            GestureState::Armed { .. } => GesturePhase::Armed,
            GestureState::Active { .. } => GesturePhase::Active,
        }
    }

    /// The one drag context, while armed or active.
    pub fn drag(&self) -> Option<&DragContext> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Armed { drag, .. } | GestureState::Active { drag, .. } => Some(drag),
        }
    }

    pub fn affordances(&self) -> &Affordances {
        &self.affordances
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn handle(&mut self, event: GestureEvent, env: &GestureEnv<'_>) -> GestureOutcome {
        match event {
            GestureEvent::Press { payload, point, pointer } => {
                if self.phase() != GesturePhase::Idle {
                    debug!("press ignored, a drag is already in progress");
                    return GestureOutcome::Ignored;
                }
                match payload.decode(pointer) {
                    Ok(drag) => {
                        self.state = GestureState::Armed { drag, start: point };
                        GestureOutcome::Armed
                    }
                    Err(e) => self.cancel_with(CancelReason::Error(e)),
                }
            }

            GestureEvent::Pickup { payload, point, pointer } => match std::mem::replace(&mut self.state, GestureState::Idle) {
                GestureState::Idle => match payload.decode(pointer) {
                    Ok(drag) => {
                        self.activate(drag, point, env);
                        GestureOutcome::Started
                    }
                    Err(e) => self.cancel_with(CancelReason::Error(e)),
                },
                // mousedown のあとに dragstart が来るのはいつものこと。
                // 押したときのドラッグ情報をそのまま使ってドラッグ開始にする 🖱️
                GestureState::Armed { drag, start } => {
                    self.activate(drag, start, env);
                    GestureOutcome::Started
                }
                active @ GestureState::Active { .. } => {
                    self.state = active;
                    debug!("pickup ignored, a drag is already in progress");
                    GestureOutcome::Ignored
                }
            },

            GestureEvent::Move { point } => match std::mem::replace(&mut self.state, GestureState::Idle) {
                GestureState::Idle => GestureOutcome::Ignored,
                GestureState::Armed { drag, start } => {
                    if point.distance_to(start) <= self.config.drag_threshold_px {
                        self.state = GestureState::Armed { drag, start };
                        return GestureOutcome::Armed;
                    }
                    self.activate(drag, start, env);
                    self.track(point, env);
                    GestureOutcome::Started
                }
                GestureState::Active { drag, start } => {
                    self.state = GestureState::Active { drag, start };
                    self.track(point, env)
                }
            },

            GestureEvent::Release { point } => match std::mem::replace(&mut self.state, GestureState::Idle) {
                GestureState::Idle => GestureOutcome::Ignored,
                GestureState::Armed { .. } => self.cancel_with(CancelReason::Aborted),
                GestureState::Active { drag, .. } => match env.locator.locate(point) {
                    Some(zone) => self.finish(drag, &zone, env),
                    None => self.cancel_with(CancelReason::Error(GestureError::UnknownTarget)),
                },
            },

            GestureEvent::DropOnZone { zone } => match std::mem::replace(&mut self.state, GestureState::Idle) {
                GestureState::Idle => GestureOutcome::Ignored,
                // ドラッグが始まってないのにドロップ? 何も送らずに終わり
                GestureState::Armed { .. } => self.cancel_with(CancelReason::Aborted),
                GestureState::Active { drag, .. } => self.finish(drag, &zone, env),
            },

            GestureEvent::Cancel => match std::mem::replace(&mut self.state, GestureState::Idle) {
                GestureState::Idle => {
                    self.affordances.clear();
                    GestureOutcome::Ignored
                }
                _ => self.cancel_with(CancelReason::Aborted),
            },
        }
    }

    fn activate(&mut self, drag: DragContext, start: Point, env: &GestureEnv<'_>) {
        let zones = env.locator.mounted_zones();
        let hints = legality_map(&drag, &zones, env.snapshot, &self.config)
            .into_iter()
            .map(|(id, verdict)| {
                let hint = if verdict.is_allowed() { ZoneHint::Allowed } else { ZoneHint::Denied };
                (id, hint)
            });
        self.affordances.start(drag.pointer_kind, hints);
        info!("drag started: {} from {:?} ({:?})", drag.card, drag.origin, drag.pointer_kind);
        self.state = GestureState::Active { drag, start };
    }

    /// ポインタの下のゾーンを判定し直して、ホバー表示を1つだけ動かす 🎯
    fn track(&mut self, point: Point, env: &GestureEnv<'_>) -> GestureOutcome {
        let (drag, start) = match &self.state {
            GestureState::Active { drag, start } => (drag, *start),
            _ => return GestureOutcome::Ignored,
        };

        if drag.pointer_kind == PointerKind::Touch {
            self.affordances.offset = Some((point.x - start.x, point.y - start.y));
        }

        match env.locator.locate(point) {
            Some(zone) => {
                let legal = DropTarget::try_from(&zone)
                    .map(|target| resolve(drag, &target, env.snapshot, &self.config).is_allowed())
                    .unwrap_or(false);
                self.affordances.hover(zone.id.clone(), legal);
                GestureOutcome::Moved { zone: Some(zone.id), legal }
            }
            None => {
                self.affordances.leave();
                GestureOutcome::Moved { zone: None, legal: false }
            }
        }
    }

    /// ドロップ！落とされたゾーンでもう一度判定して、Allow ならインテントを出す 📤
    fn finish(&mut self, drag: DragContext, zone: &ZoneDescriptor, env: &GestureEnv<'_>) -> GestureOutcome {
        self.affordances.clear();

        let target = match DropTarget::try_from(zone) {
            Ok(target) => target,
            Err(e) => return self.cancel_with(CancelReason::Error(e)),
        };

        match resolve(&drag, &target, env.snapshot, &self.config) {
            Verdict::Allow => match IntentEmitter::new(env.transport).emit(&drag, &target) {
                Ok(intent) => GestureOutcome::Dropped(intent),
                Err(e) => self.cancel_with(CancelReason::Error(e)),
            },
            Verdict::Deny(reason) => self.cancel_with(CancelReason::Denied(reason)),
        }
    }

    fn cancel_with(&mut self, reason: CancelReason) -> GestureOutcome {
        self.state = GestureState::Idle;
        self.affordances.clear();
        match &reason {
            CancelReason::Error(GestureError::MalformedGesture(msg)) => warn!("drag cancelled, bad payload: {}", msg),
            other => debug!("drag cancelled: {:?}", other),
        }
        GestureOutcome::Cancelled(reason)
    }
}

#[cfg(test)]
#[path = "gesture_tests.rs"]
mod tests;
