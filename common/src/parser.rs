//! メタデータレスポンスパーサー
//!
//! バックエンドの `GET /metadata` が返すJSONを ImageRecord 配列に正規化する:
//! - パス系フィールドを完全なURLへ書き換え
//! - confidence を数値化し 0.0-1.0 に揃える
//! - status を閉じた列挙型へ変換

use crate::error::{Error, Result};
use crate::types::{BoundingBox, DetectionRecord, DetectionStatus, ImageRecord};
use serde::Deserialize;
use serde_json::Value;

/// 加工済み画像が配信されるパス
pub const PROCESSED_IMG_ROUTE: &str = "processed_img";

/// バックエンドが返す画像エントリ（生データ）
#[derive(Debug, Deserialize)]
pub struct RawImageEntry {
    pub uploaded_img: String,
    #[serde(default)]
    pub processed_img: String,
    #[serde(default)]
    pub defect_count: Option<usize>,
    pub detections: Vec<RawDetection>,
}

/// バックエンドが返す検出エントリ（生データ）
#[derive(Debug, Deserialize)]
pub struct RawDetection {
    pub defect_id: u32,
    pub defect_type: String,
    /// 数値または数値文字列
    pub confidence: Value,
    pub bbox: [f64; 4],
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub crop_path: String,
}

/// メタデータJSONをパースして正規化
///
/// # Arguments
/// * `body` - `GET /metadata` のレスポンス本文
/// * `base_url` - バックエンドのベースURL（例: `http://localhost:8000`）
///
/// # Returns
/// * `Ok(Vec<ImageRecord>)` - 順序を保った正規化済みデータセット
/// * `Err(Error::Parse)` - 形が想定と異なる場合
pub fn parse_metadata(body: &str, base_url: &str) -> Result<Vec<ImageRecord>> {
    let raw: Vec<RawImageEntry> = serde_json::from_str(body.trim())
        .map_err(|e| Error::Parse(format!("metadata JSONパースエラー: {}", e)))?;

    raw.into_iter()
        .map(|entry| normalize_image(entry, base_url))
        .collect()
}

/// 画像エントリを正規化
pub fn normalize_image(entry: RawImageEntry, base_url: &str) -> Result<ImageRecord> {
    let detections = entry
        .detections
        .into_iter()
        .map(|det| normalize_detection(det, base_url))
        .collect::<Result<Vec<_>>>()
        .map_err(|Error::Parse(msg)| Error::Parse(format!("{}: {}", entry.uploaded_img, msg)))?;

    let processed_image_ref = if entry.processed_img.is_empty() {
        String::new()
    } else {
        let path = format!("{}/{}", PROCESSED_IMG_ROUTE, entry.processed_img);
        resolve_locator(base_url, &path)
    };

    Ok(ImageRecord {
        uploaded_name: entry.uploaded_img,
        processed_image_ref,
        defect_count: entry.defect_count.unwrap_or(detections.len()),
        detections,
    })
}

/// 検出エントリを正規化
pub fn normalize_detection(det: RawDetection, base_url: &str) -> Result<DetectionRecord> {
    let confidence = normalize_confidence(&det.confidence)?;
    let status = det
        .status
        .as_deref()
        .map(DetectionStatus::parse_lenient)
        .unwrap_or_default();

    Ok(DetectionRecord {
        id: det.defect_id,
        defect_type: det.defect_type,
        confidence,
        bounding_box: BoundingBox::from(det.bbox),
        status,
        crop_image_ref: if det.crop_path.is_empty() {
            String::new()
        } else {
            resolve_locator(base_url, &det.crop_path)
        },
        validated_as: None,
    })
}

/// confidence を 0.0-1.0 の数値に揃える
///
/// - 数値・数値文字列のどちらも受け付ける
/// - (1, 100] はパーセント値として 1/100
/// - 100 超は整数エンコード値として 1/1e10
/// - 負値は 0.0、結果は 1.0 で頭打ち
pub fn normalize_confidence(value: &Value) -> Result<f64> {
    let raw = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::Parse(format!("confidenceが数値に変換できません: {}", n)))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Parse(format!("confidenceが数値ではありません: {:?}", s)))?,
        other => {
            return Err(Error::Parse(format!("confidenceの型が不正: {}", other)));
        }
    };

    if !raw.is_finite() {
        return Err(Error::Parse(format!("confidenceが有限値ではありません: {}", raw)));
    }

    let scaled = if raw <= 1.0 {
        raw
    } else if raw <= 100.0 {
        raw / 100.0
    } else {
        raw / 1e10
    };

    Ok(scaled.clamp(0.0, 1.0))
}

/// 相対パスをベースURL配下の完全なURLに変換
///
/// 既に http(s) で始まる場合はそのまま返す。Windows区切り文字は `/` に置換する。
pub fn resolve_locator(base_url: &str, path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.starts_with("http://") || path.starts_with("https://") {
        return path;
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches("./").trim_start_matches('/')
    )
}
