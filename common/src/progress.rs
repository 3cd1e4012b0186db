//! 進捗集計
//!
//! 常にデータセット全体を対象にする（ウィンドウは見ない）。

use crate::types::{DetectionStatus, ImageRecord};
use std::collections::HashMap;

/// 全検出数
pub fn total_detections(images: &[ImageRecord]) -> usize {
    images.iter().map(|img| img.detections.len()).sum()
}

/// 判定済み（validated / healthy）の検出数
pub fn validated_count(images: &[ImageRecord]) -> usize {
    images
        .iter()
        .flat_map(|img| img.detections.iter())
        .filter(|d| d.is_reviewed())
        .count()
}

/// 進捗率 (0.0-100.0)。検出が0件なら0
pub fn progress_percent(images: &[ImageRecord]) -> f64 {
    let total = total_detections(images);
    if total == 0 {
        return 0.0;
    }
    validated_count(images) as f64 / total as f64 * 100.0
}

/// クラス別の検出数（件数の降順、同数はクラス名順）
pub fn class_breakdown(images: &[ImageRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for det in images.iter().flat_map(|img| img.detections.iter()) {
        *counts.entry(det.defect_type.as_str()).or_default() += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// 状態別の検出数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub validated: usize,
    pub healthy: usize,
    pub unvalidated: usize,
}

pub fn status_breakdown(images: &[ImageRecord]) -> StatusBreakdown {
    let mut out = StatusBreakdown::default();
    for det in images.iter().flat_map(|img| img.detections.iter()) {
        match det.status {
            DetectionStatus::Validated => out.validated += 1,
            DetectionStatus::Healthy => out.healthy += 1,
            // deleted 状態で届いたものも未判定として数える
            DetectionStatus::Unvalidated | DetectionStatus::Deleted => out.unvalidated += 1,
        }
    }
    out
}
