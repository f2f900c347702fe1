// src/components/drop_target.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GestureError;
use crate::protocol::ZoneDescriptor;

/// ドロップゾーンの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneKind {
    /// 手札の並び替え位置
    HandReorder,
    /// テーブルのカードを手札に取り込むエリア
    HandIntake,
    /// 既存の組み合わせにカードを足すエリア
    CombinationIntake,
}

impl FromStr for ZoneKind {
    type Err = GestureError;

    /// Accepts the names used in the rendered markup as well as the canonical ones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "hand-reorder" => Ok(ZoneKind::HandReorder),
            "hand" | "hand-intake" => Ok(ZoneKind::HandIntake),
            "add-to-combination" | "combination-intake" => Ok(ZoneKind::CombinationIntake),
            _ => Err(GestureError::UnknownTarget),
        }
    }
}

/// A recognized drop zone, resolved from the element under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub zone: ZoneKind,
    pub target_position: Option<usize>,
    pub target_combination: Option<String>,
}

impl DropTarget {
    pub fn hand_reorder(position: usize) -> Self {
        Self { zone: ZoneKind::HandReorder, target_position: Some(position), target_combination: None }
    }

    pub fn hand_intake() -> Self {
        Self { zone: ZoneKind::HandIntake, target_position: None, target_combination: None }
    }

    pub fn combination_intake(name: impl Into<String>) -> Self {
        Self {
            zone: ZoneKind::CombinationIntake,
            target_position: None,
            target_combination: Some(name.into()),
        }
    }
}

impl TryFrom<&ZoneDescriptor> for DropTarget {
    type Error = GestureError;

    /// A reorder slot without a position or an intake without a combination
    /// name is not a zone we can act on.
    fn try_from(descriptor: &ZoneDescriptor) -> Result<Self, Self::Error> {
        let zone: ZoneKind = descriptor.drop_zone.parse()?;
        let target_position = descriptor.position.as_ref().and_then(|p| p.as_index());
        let target_combination = descriptor
            .combination_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        match zone {
            ZoneKind::HandReorder if target_position.is_none() => Err(GestureError::UnknownTarget),
            ZoneKind::CombinationIntake if target_combination.is_none() => Err(GestureError::UnknownTarget),
            _ => Ok(Self { zone, target_position, target_combination }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::NumberOrString;

    fn descriptor(kind: &str, position: Option<&str>, name: Option<&str>) -> ZoneDescriptor {
        ZoneDescriptor {
            id: "zone".to_string(),
            drop_zone: kind.to_string(),
            position: position.map(|p| NumberOrString::Text(p.to_string())),
            combination_name: name.map(str::to_string),
        }
    }

    #[test]
    fn markup_names_map_to_zone_kinds() {
        let target = DropTarget::try_from(&descriptor("hand-reorder", Some("5"), None)).unwrap();
        assert_eq!(target, DropTarget::hand_reorder(5));

        let target = DropTarget::try_from(&descriptor("hand", None, None)).unwrap();
        assert_eq!(target.zone, ZoneKind::HandIntake);

        let target = DropTarget::try_from(&descriptor("add-to-combination", None, Some("run-2"))).unwrap();
        assert_eq!(target, DropTarget::combination_intake("run-2"));
    }

    #[test]
    fn incomplete_zones_are_unknown() {
        assert_eq!(
            DropTarget::try_from(&descriptor("hand-reorder", None, None)),
            Err(GestureError::UnknownTarget)
        );
        assert_eq!(
            DropTarget::try_from(&descriptor("add-to-combination", None, Some("  "))),
            Err(GestureError::UnknownTarget)
        );
        assert_eq!(
            DropTarget::try_from(&descriptor("discard-pile", None, None)),
            Err(GestureError::UnknownTarget)
        );
    }
}
