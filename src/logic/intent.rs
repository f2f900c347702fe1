// src/logic/intent.rs
//! 許可された (ドラッグ, ドロップ先) の組を、サーバーが待っているインテント1つに変換して送り出す 📨
//!
//! 送信はその場でやらず [`IntentOutbox`] に積んでおき、共有状態のロックを
//! 外してから [`IntentOutbox::flush`] で本物の経路に流すこともできる。

use std::cell::RefCell;

use log::{debug, info, warn};

use crate::components::{DragContext, DragOrigin, DropTarget, ZoneKind};
use crate::error::{GestureError, TransportError};
use crate::protocol::Intent;

/// サーバーへ送る経路。送ったら終わり (確認も再送もしない)。
pub trait IntentTransport {
    fn send_intent(&self, intent: &Intent) -> Result<(), TransportError>;
}

/// (ドラッグ元, ゾーン) からインテントを決める。
///
/// リゾルバーが許可したあとでだけ意味がある。対応するインテントがない組み合わせは
/// `UnknownTarget` にしておく 🤷
pub fn build_intent(drag: &DragContext, target: &DropTarget) -> Result<Intent, GestureError> {
    match (&drag.origin, target.zone) {
        (DragOrigin::Hand, ZoneKind::HandReorder) => {
            let to_position = target.target_position.ok_or(GestureError::UnknownTarget)?;
            Ok(Intent::ReorderHand { from_position: drag.position, to_position })
        }
        (DragOrigin::Table { combination }, ZoneKind::HandIntake) => Ok(Intent::TakeTableCard {
            combination_name: combination.clone(),
            card_position: drag.position,
        }),
        (DragOrigin::Hand, ZoneKind::CombinationIntake) => {
            let combination_name = target.target_combination.clone().ok_or(GestureError::UnknownTarget)?;
            Ok(Intent::AddToCombination { combination_name, card_positions: vec![drag.position] })
        }
        (DragOrigin::Table { combination }, ZoneKind::CombinationIntake) => {
            let target_combination = target.target_combination.clone().ok_or(GestureError::UnknownTarget)?;
            Ok(Intent::MoveBetweenCombinations {
                source_combination: combination.clone(),
                target_combination,
                card_id: drag.card.card_id(),
            })
        }
        _ => Err(GestureError::UnknownTarget),
    }
}

pub struct IntentEmitter<'a> {
    transport: &'a dyn IntentTransport,
}

impl<'a> IntentEmitter<'a> {
    pub fn new(transport: &'a dyn IntentTransport) -> Self {
        Self { transport }
    }

    /// Builds the intent and hands it off. A dead transport is logged and
    /// otherwise ignored; the next server snapshot reconciles state.
    pub fn emit(&self, drag: &DragContext, target: &DropTarget) -> Result<Intent, GestureError> {
        let intent = build_intent(drag, target)?;
        match self.transport.send_intent(&intent) {
            Ok(()) => debug!("handed off {} {}", intent.event_name(), intent.payload()),
            Err(e) => warn!("{}", GestureError::from(e)),
        }
        Ok(intent)
    }
}

/// 送る予定のインテントを溜めておく箱 📮
///
/// これ自体も `IntentTransport` なので、ジェスチャー処理中はこっちに送っておいて、
/// 後で `flush` する。ホスト側のコールバックがコントローラーを呼び返しても大丈夫なように。
#[derive(Debug, Default)]
pub struct IntentOutbox {
    queued: RefCell<Vec<Intent>>,
}

impl IntentOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.borrow().is_empty()
    }

    /// 溜まった分を順番どおりに送って空にする。失敗はログに出すだけ。
    pub fn flush(&self, transport: &dyn IntentTransport) {
        let queued = self.queued.take();
        for intent in &queued {
            match transport.send_intent(intent) {
                Ok(()) => info!("sent {} {}", intent.event_name(), intent.payload()),
                Err(e) => warn!("{}", GestureError::from(e)),
            }
        }
    }
}

impl IntentTransport for IntentOutbox {
    fn send_intent(&self, intent: &Intent) -> Result<(), TransportError> {
        self.queued.borrow_mut().push(intent.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Card, PointerKind, Rank, Suit};

    struct Recording {
        sent: RefCell<Vec<Intent>>,
        fail: bool,
    }

    impl IntentTransport for Recording {
        fn send_intent(&self, intent: &Intent) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::NotConnected);
            }
            self.sent.borrow_mut().push(intent.clone());
            Ok(())
        }
    }

    fn hand_drag(position: usize) -> DragContext {
        DragContext {
            card: Card::new(Rank::King, Suit::Spades, 0),
            origin: DragOrigin::Hand,
            position,
            pointer_kind: PointerKind::Mouse,
        }
    }

    fn reorder_zone(to: usize) -> DropTarget {
        DropTarget::hand_reorder(to)
    }

    #[test]
    fn outbox_holds_intents_until_flushed() {
        let outbox = IntentOutbox::new();
        let first = IntentEmitter::new(&outbox).emit(&hand_drag(2), &reorder_zone(5)).unwrap();
        let second = IntentEmitter::new(&outbox).emit(&hand_drag(0), &reorder_zone(1)).unwrap();
        assert!(!outbox.is_empty());

        let transport = Recording { sent: RefCell::new(Vec::new()), fail: false };
        assert!(transport.sent.borrow().is_empty());
        outbox.flush(&transport);

        assert_eq!(transport.sent.borrow().as_slice(), &[first, second]);
        assert!(outbox.is_empty());

        // 2回目の flush では何も送らない
        outbox.flush(&transport);
        assert_eq!(transport.sent.borrow().len(), 2);
    }

    #[test]
    fn failed_flush_still_empties_the_outbox() {
        let outbox = IntentOutbox::new();
        IntentEmitter::new(&outbox).emit(&hand_drag(2), &reorder_zone(5)).unwrap();

        let dead = Recording { sent: RefCell::new(Vec::new()), fail: true };
        outbox.flush(&dead);
        assert!(outbox.is_empty());
        assert!(dead.sent.borrow().is_empty());
    }

    #[test]
    fn pairing_without_an_intent_is_unknown_target() {
        let outbox = IntentOutbox::new();
        let result = IntentEmitter::new(&outbox).emit(&hand_drag(1), &DropTarget::hand_intake());
        assert_eq!(result, Err(GestureError::UnknownTarget));
        assert!(outbox.is_empty());
    }
}
