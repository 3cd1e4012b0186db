//! 判定の適用と判定ログ

use crate::cursor::Position;
use crate::types::{DecisionEntry, DecisionKind, DetectionStatus, ImageRecord};
use serde::Serialize;

/// healthy 判定時に validated_as へ入れるタグ
pub const HEALTHY_TAG: &str = "healthy";

/// 判定を検出に適用し、追記専用のログに残す
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationLedger {
    decisions: Vec<DecisionEntry>,
}

impl ValidationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定位置の検出に判定を適用
    ///
    /// - `Other` はラベルが空なら適用しない
    /// - `Delete` は検出を画像から取り除く
    ///
    /// 適用した場合はログに追記したエントリを返す。位置が無効なら None。
    pub fn apply(
        &mut self,
        images: &mut [ImageRecord],
        pos: Position,
        decision: DecisionKind,
        override_label: Option<&str>,
    ) -> Option<DecisionEntry> {
        let image = images.get_mut(pos.image_index)?;
        if pos.detection_index >= image.detections.len() {
            return None;
        }

        let label = override_label.map(str::trim).filter(|s| !s.is_empty());
        if decision == DecisionKind::Other && label.is_none() {
            return None;
        }

        let image_id = image.uploaded_name.clone();
        let detection_id = image.detections[pos.detection_index].id;

        match decision {
            DecisionKind::Correct => {
                let det = &mut image.detections[pos.detection_index];
                det.status = DetectionStatus::Validated;
                det.validated_as = Some(det.defect_type.clone());
            }
            DecisionKind::Healthy => {
                let det = &mut image.detections[pos.detection_index];
                det.status = DetectionStatus::Healthy;
                det.validated_as = Some(HEALTHY_TAG.to_string());
            }
            DecisionKind::Other => {
                let det = &mut image.detections[pos.detection_index];
                let label = label.unwrap_or_default().to_string();
                det.status = DetectionStatus::Validated;
                det.defect_type = label.clone();
                det.validated_as = Some(label);
            }
            DecisionKind::Delete => {
                image.detections.remove(pos.detection_index);
            }
        }

        let entry = DecisionEntry {
            detection_id,
            image_id,
            decision,
            override_label: match decision {
                DecisionKind::Other => label.map(str::to_string),
                _ => None,
            },
        };
        self.decisions.push(entry.clone());
        Some(entry)
    }

    /// 記録順の判定ログ
    pub fn entries(&self) -> &[DecisionEntry] {
        &self.decisions
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DetectionRecord;

    fn dataset() -> Vec<ImageRecord> {
        vec![ImageRecord {
            uploaded_name: "leaf.jpg".into(),
            defect_count: 2,
            detections: vec![
                DetectionRecord { id: 7, defect_type: "Curling".into(), confidence: 0.92, ..Default::default() },
                DetectionRecord { id: 8, defect_type: "Browning".into(), confidence: 0.40, ..Default::default() },
            ],
            ..Default::default()
        }]
    }

    const AT_FIRST: Position = Position { image_index: 0, detection_index: 0 };

    #[test]
    fn test_correct() {
        let mut images = dataset();
        let mut ledger = ValidationLedger::new();
        let entry = ledger.apply(&mut images, AT_FIRST, DecisionKind::Correct, None).unwrap();

        let det = &images[0].detections[0];
        assert_eq!(det.status, DetectionStatus::Validated);
        assert_eq!(det.validated_as.as_deref(), Some("Curling"));
        assert_eq!(entry.detection_id, 7);
        assert_eq!(entry.image_id, "leaf.jpg");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_healthy() {
        let mut images = dataset();
        let mut ledger = ValidationLedger::new();
        ledger.apply(&mut images, AT_FIRST, DecisionKind::Healthy, Some("ignored"));

        let det = &images[0].detections[0];
        assert_eq!(det.status, DetectionStatus::Healthy);
        assert_eq!(det.validated_as.as_deref(), Some(HEALTHY_TAG));
        assert_eq!(det.defect_type, "Curling");
        assert_eq!(ledger.entries()[0].override_label, None);
    }

    #[test]
    fn test_other_relabels() {
        let mut images = dataset();
        let mut ledger = ValidationLedger::new();
        let entry = ledger
            .apply(&mut images, AT_FIRST, DecisionKind::Other, Some(" Wilting "))
            .unwrap();

        let det = &images[0].detections[0];
        assert_eq!(det.defect_type, "Wilting");
        assert_eq!(det.validated_as.as_deref(), Some("Wilting"));
        assert_eq!(det.status, DetectionStatus::Validated);
        assert_eq!(entry.override_label.as_deref(), Some("Wilting"));
    }

    #[test]
    fn test_other_without_label_is_noop() {
        let mut images = dataset();
        let mut ledger = ValidationLedger::new();
        assert!(ledger.apply(&mut images, AT_FIRST, DecisionKind::Other, None).is_none());
        assert!(ledger.apply(&mut images, AT_FIRST, DecisionKind::Other, Some("  ")).is_none());
        assert!(ledger.is_empty());
        assert_eq!(images[0].detections[0].status, DetectionStatus::Unvalidated);
    }

    #[test]
    fn test_delete_removes_entry() {
        let mut images = dataset();
        let mut ledger = ValidationLedger::new();
        let entry = ledger.apply(&mut images, AT_FIRST, DecisionKind::Delete, None).unwrap();

        assert_eq!(entry.detection_id, 7);
        assert_eq!(images[0].detections.len(), 1);
        assert_eq!(images[0].detections[0].id, 8);
        // 取り込み時の件数はそのまま
        assert_eq!(images[0].defect_count, 2);
    }

    #[test]
    fn test_invalid_position_is_noop() {
        let mut images = dataset();
        let mut ledger = ValidationLedger::new();
        let pos = Position { image_index: 0, detection_index: 5 };
        assert!(ledger.apply(&mut images, pos, DecisionKind::Correct, None).is_none());
        let pos = Position { image_index: 3, detection_index: 0 };
        assert!(ledger.apply(&mut images, pos, DecisionKind::Delete, None).is_none());
        assert!(ledger.is_empty());
    }
}
