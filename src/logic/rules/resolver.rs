// src/logic/rules/resolver.rs
//! ドロップ先が合法かどうかを決めるリゾルバ。
//!
//! 手元で分かること (手番、組み合わせが別物か、最低枚数) だけを見る。
//! 組み合わせの形の最終判定はサーバーの仕事。

use log::debug;

use super::combination::{can_take_preserving_shape, leaves_minimum};
use crate::components::{DragContext, DragOrigin, DropTarget, ZoneKind};
use crate::config::GestureConfig;
use crate::protocol::ZoneDescriptor;
use crate::snapshot::TableSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotYourTurn,
    SameCombination,
    /// 抜くと3枚未満になっちゃう
    BelowMinimum,
    /// 元の組み合わせがもうスナップショットにない
    StaleSnapshot,
    /// Remaining cards would no longer be a trio or run (strict policy only).
    ShapeBroken,
    /// This origin can never be dropped on this kind of zone.
    IncompatibleZone,
    /// The zone element does not describe a usable drop zone.
    UnknownZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(DenyReason),
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

/// Decides whether `drag` may complete on `target`. First matching row wins:
///
/// | origin | zone               | condition                                   |
/// |--------|--------------------|---------------------------------------------|
/// | hand   | hand-reorder       | always                                      |
/// | table  | hand-intake        | turn active, source keeps ≥ 3               |
/// | hand   | combination-intake | turn active                                 |
/// | table  | combination-intake | turn active, target ≠ source, source keeps ≥ 3 |
///
/// Anything else is denied.
pub fn resolve(
    drag: &DragContext,
    target: &DropTarget,
    snapshot: &dyn TableSnapshot,
    config: &GestureConfig,
) -> Verdict {
    let verdict = match (&drag.origin, target.zone) {
        (DragOrigin::Hand, ZoneKind::HandReorder) => Verdict::Allow,

        (DragOrigin::Table { combination }, ZoneKind::HandIntake) => {
            if !snapshot.is_player_turn_active() {
                Verdict::Deny(DenyReason::NotYourTurn)
            } else {
                check_source_shrink(drag, combination, snapshot, config)
            }
        }

        // 形の判定はサーバー任せ
        (DragOrigin::Hand, ZoneKind::CombinationIntake) => {
            if snapshot.is_player_turn_active() {
                Verdict::Allow
            } else {
                Verdict::Deny(DenyReason::NotYourTurn)
            }
        }

        (DragOrigin::Table { combination }, ZoneKind::CombinationIntake) => {
            if !snapshot.is_player_turn_active() {
                Verdict::Deny(DenyReason::NotYourTurn)
            } else if target.target_combination.as_deref() == Some(combination.as_str()) {
                Verdict::Deny(DenyReason::SameCombination)
            } else {
                check_source_shrink(drag, combination, snapshot, config)
            }
        }

        _ => Verdict::Deny(DenyReason::IncompatibleZone),
    };
    debug!(
        "resolve: {:?} at {} -> {:?}: {:?}",
        drag.origin, drag.position, target.zone, verdict
    );
    verdict
}

fn check_source_shrink(
    drag: &DragContext,
    source: &str,
    snapshot: &dyn TableSnapshot,
    config: &GestureConfig,
) -> Verdict {
    let count = match snapshot.cards_in_combination(source) {
        Some(count) => count,
        None => {
            // サーバーからの更新でテーブルが変わっただけ。エラーではない
            debug!("combination {:?} vanished from snapshot, denying", source);
            return Verdict::Deny(DenyReason::StaleSnapshot);
        }
    };
    if !leaves_minimum(count) {
        return Verdict::Deny(DenyReason::BelowMinimum);
    }
    if config.strict_shape_check {
        if let Some(cards) = snapshot.combination_cards(source) {
            if !cards.contains(&drag.card) {
                return Verdict::Deny(DenyReason::StaleSnapshot);
            }
            if !can_take_preserving_shape(&cards, &drag.card) {
                return Verdict::Deny(DenyReason::ShapeBroken);
            }
        }
    }
    Verdict::Allow
}

/// 掴んだ瞬間のハイライト用に、画面上の全ゾーンを判定する ✨
pub fn legality_map(
    drag: &DragContext,
    zones: &[ZoneDescriptor],
    snapshot: &dyn TableSnapshot,
    config: &GestureConfig,
) -> Vec<(String, Verdict)> {
    zones
        .iter()
        .map(|zone| {
            let verdict = match DropTarget::try_from(zone) {
                Ok(target) => resolve(drag, &target, snapshot, config),
                Err(_) => Verdict::Deny(DenyReason::UnknownZone),
            };
            (zone.id.clone(), verdict)
        })
        .collect()
}
