//! レビュー対象データの型定義
//!
//! - ImageRecord: 1枚の画像と、その画像内の検出結果
//! - DetectionRecord: モデルが出力した1件の欠陥検出
//! - DecisionEntry: 人間による判定の記録（監査・エクスポート用）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 画像1枚分のレコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// アップロード時のファイル名（データセット内で一意）
    pub uploaded_name: String,

    /// 推論サービスが生成したオーバーレイ付き画像のURL
    pub processed_image_ref: String,

    /// 取り込み時点の検出数。削除後は detections.len() と一致しないことがある
    pub defect_count: usize,

    /// 検出結果（この順序がナビゲーション順）
    pub detections: Vec<DetectionRecord>,
}

impl ImageRecord {
    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }
}

/// 欠陥検出1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    /// 親画像内で一意なID（バックエンドとの照合に使用）
    pub id: u32,

    /// クラス名（モデル予測、または人間による上書き）
    pub defect_type: String,

    /// 信頼度 (0.0-1.0)
    pub confidence: f64,

    pub bounding_box: BoundingBox,

    pub status: DetectionStatus,

    /// 検出領域を切り出した画像のURL
    pub crop_image_ref: String,

    /// 判定済みの場合のみ設定される
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_as: Option<String>,
}

impl DetectionRecord {
    /// 判定済み（validated または healthy）か
    pub fn is_reviewed(&self) -> bool {
        self.status.is_reviewed()
    }
}

/// バウンディングボックス（元画像のピクセル座標）
///
/// JSONでは `[x1, y1, x2, y2]` の配列として表現する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// 検出の判定状態
///
/// バックエンドの文字列は揺れがあるため、未知の値は Unvalidated として読む。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DetectionStatus {
    #[default]
    Unvalidated,
    Validated,
    Healthy,
    Deleted,
}

impl DetectionStatus {
    pub fn is_reviewed(&self) -> bool {
        matches!(self, DetectionStatus::Validated | DetectionStatus::Healthy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionStatus::Unvalidated => "unvalidated",
            DetectionStatus::Validated => "validated",
            DetectionStatus::Healthy => "healthy",
            DetectionStatus::Deleted => "deleted",
        }
    }

    /// 文字列から寛容にパース（大文字小文字・前後空白を無視）
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "validated" => DetectionStatus::Validated,
            "healthy" => DetectionStatus::Healthy,
            "deleted" => DetectionStatus::Deleted,
            _ => DetectionStatus::Unvalidated,
        }
    }
}

impl From<String> for DetectionStatus {
    fn from(s: String) -> Self {
        Self::parse_lenient(&s)
    }
}

impl fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 人間による判定の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    /// 予測クラスが正しい
    Correct,
    /// 欠陥なし（健全）
    Healthy,
    /// 別クラスに修正
    Other,
    /// 検出自体を削除
    Delete,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Correct => "correct",
            DecisionKind::Healthy => "healthy",
            DecisionKind::Other => "other",
            DecisionKind::Delete => "delete",
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecisionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "correct" | "c" => Ok(DecisionKind::Correct),
            "healthy" | "h" => Ok(DecisionKind::Healthy),
            "other" | "o" => Ok(DecisionKind::Other),
            "delete" | "d" => Ok(DecisionKind::Delete),
            _ => Err(format!("Unknown decision: {}. Use correct, healthy, other, or delete", s)),
        }
    }
}

/// 判定ログの1エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionEntry {
    pub detection_id: u32,
    /// 親画像の uploaded_name
    pub image_id: String,
    pub decision: DecisionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_label: Option<String>,
}

/// 画像単位のナビゲーションフィルタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterStatus {
    #[default]
    All,
    /// 判定済みの検出を含む画像のみ
    Validated,
    /// 未判定の検出を含む画像のみ
    Unvalidated,
}

impl FilterStatus {
    /// 画像がこのフィルタに合致するか（検出の有無は見ない）
    pub fn matches(&self, image: &ImageRecord) -> bool {
        match self {
            FilterStatus::All => true,
            FilterStatus::Validated => image.detections.iter().any(|d| d.is_reviewed()),
            FilterStatus::Unvalidated => image
                .detections
                .iter()
                .any(|d| d.status == DetectionStatus::Unvalidated),
        }
    }
}

impl std::str::FromStr for FilterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(FilterStatus::All),
            "validated" | "reviewed" => Ok(FilterStatus::Validated),
            "unvalidated" | "pending" => Ok(FilterStatus::Unvalidated),
            _ => Err(format!("Unknown filter: {}. Use all, validated, or unvalidated", s)),
        }
    }
}

impl fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStatus::All => write!(f, "all"),
            FilterStatus::Validated => write!(f, "validated"),
            FilterStatus::Unvalidated => write!(f, "unvalidated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lenient_parse() {
        assert_eq!(DetectionStatus::parse_lenient("validated"), DetectionStatus::Validated);
        assert_eq!(DetectionStatus::parse_lenient(" Healthy "), DetectionStatus::Healthy);
        assert_eq!(DetectionStatus::parse_lenient("deleted"), DetectionStatus::Deleted);
        // 未知の値は未判定扱い
        assert_eq!(DetectionStatus::parse_lenient("uncertain"), DetectionStatus::Unvalidated);
        assert_eq!(DetectionStatus::parse_lenient(""), DetectionStatus::Unvalidated);
    }

    #[test]
    fn test_status_deserialize_unknown() {
        let status: DetectionStatus = serde_json::from_str("\"placeholder\"").unwrap();
        assert_eq!(status, DetectionStatus::Unvalidated);
        let json = serde_json::to_string(&DetectionStatus::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");
    }

    #[test]
    fn test_bounding_box_as_array() {
        let bbox = BoundingBox { x1: 1.0, y1: 2.0, x2: 11.0, y2: 22.0 };
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[1.0,2.0,11.0,22.0]");
        assert_eq!(bbox.width(), 10.0);
        assert_eq!(bbox.height(), 20.0);

        assert!(serde_json::from_str::<BoundingBox>("[1.0, 2.0, 3.0]").is_err());
    }

    #[test]
    fn test_decision_entry_serialize() {
        let entry = DecisionEntry {
            detection_id: 3,
            image_id: "leaf_01.jpg".into(),
            decision: DecisionKind::Other,
            override_label: Some("Wilting".into()),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"detectionId\":3"));
        assert!(json.contains("\"decision\":\"other\""));
        assert!(json.contains("\"overrideLabel\":\"Wilting\""));

        let plain = DecisionEntry { override_label: None, decision: DecisionKind::Correct, ..entry };
        assert!(!serde_json::to_string(&plain).unwrap().contains("overrideLabel"));
    }

    #[test]
    fn test_filter_matches() {
        let image = ImageRecord {
            uploaded_name: "a.jpg".into(),
            detections: vec![
                DetectionRecord { id: 0, status: DetectionStatus::Healthy, ..Default::default() },
                DetectionRecord { id: 1, status: DetectionStatus::Healthy, ..Default::default() },
            ],
            ..Default::default()
        };
        assert!(FilterStatus::All.matches(&image));
        assert!(FilterStatus::Validated.matches(&image));
        assert!(!FilterStatus::Unvalidated.matches(&image));
    }

    #[test]
    fn test_decision_kind_from_str() {
        assert_eq!("Correct".parse::<DecisionKind>().unwrap(), DecisionKind::Correct);
        assert_eq!("d".parse::<DecisionKind>().unwrap(), DecisionKind::Delete);
        assert!("skip".parse::<DecisionKind>().is_err());
    }
}
