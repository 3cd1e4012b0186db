//! 判定ログのエクスポート

use crate::error::Result;
use chrono::{DateTime, Utc};
use hitl_review_common::DecisionEntry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// エクスポートファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionLog {
    pub exported_at: DateTime<Utc>,
    pub decision_count: usize,
    pub decisions: Vec<DecisionEntry>,
}

impl DecisionLog {
    pub fn new(decisions: &[DecisionEntry]) -> Self {
        Self {
            exported_at: Utc::now(),
            decision_count: decisions.len(),
            decisions: decisions.to_vec(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// 出力先がディレクトリならタイムスタンプ付きのファイル名を付ける
pub fn output_path_for(output: &Path, now: DateTime<Utc>) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("decisions_{}.json", now.format("%Y%m%d_%H%M%S")))
    } else {
        output.to_path_buf()
    }
}

/// 判定ログをJSONで書き出し、書き出したパスを返す
pub fn write_decision_log(output: &Path, decisions: &[DecisionEntry]) -> Result<PathBuf> {
    let log = DecisionLog::new(decisions);
    let path = output_path_for(output, log.exported_at);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(&log)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
