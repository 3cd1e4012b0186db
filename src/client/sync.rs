use super::MetadataClient;
use crate::error::{ReviewError, Result};
use hitl_review_common::{DecisionEntry, DecisionKind};
use serde::Serialize;
use tracing::debug;

/// `PATCH /detections/{id}/validate` のリクエスト本文
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidateRequest {
    pub decision: DecisionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defect_type: Option<String>,
}

impl ValidateRequest {
    pub fn from_entry(entry: &DecisionEntry) -> Self {
        Self {
            decision: entry.decision,
            defect_type: match entry.decision {
                DecisionKind::Other => entry.override_label.clone(),
                _ => None,
            },
        }
    }
}

impl MetadataClient {
    /// 記録済みの判定をバックエンドへ反映する
    ///
    /// 検出は常に整数IDで照合する。ローカル状態は既に更新済みなので、
    /// 失敗しても巻き戻しはしない。
    pub async fn sync(&self, entry: &DecisionEntry) -> Result<()> {
        let response = match entry.decision {
            DecisionKind::Delete => {
                let url = self.endpoint(&format!("detections/{}", entry.detection_id))?;
                debug!(%url, "DELETE detection");
                self.http.delete(url).send().await
            }
            _ => {
                let url = self.endpoint(&format!("detections/{}/validate", entry.detection_id))?;
                let body = ValidateRequest::from_entry(entry);
                debug!(%url, decision = %entry.decision, "PATCH detection");
                self.http.patch(url).json(&body).send().await
            }
        }
        .map_err(|e| ReviewError::Sync(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ReviewError::Sync(format!("HTTP {}: {}", status, text.trim())));
        }

        // 見つからない場合も200で {"error": ...} を返すことがある
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(&text) {
            if let Some(err) = map.get("error") {
                return Err(ReviewError::Sync(format!(
                    "detection {} ({}): {}",
                    entry.detection_id, entry.image_id, err
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(decision: DecisionKind, label: Option<&str>) -> DecisionEntry {
        DecisionEntry {
            detection_id: 12,
            image_id: "leaf.jpg".into(),
            decision,
            override_label: label.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_request_other_carries_defect_type() {
        let body = ValidateRequest::from_entry(&entry(DecisionKind::Other, Some("Wilting")));
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"decision":"other","defect_type":"Wilting"}"#);
    }

    #[test]
    fn test_validate_request_correct_omits_defect_type() {
        let body = ValidateRequest::from_entry(&entry(DecisionKind::Correct, None));
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"decision":"correct"}"#);
    }
}
