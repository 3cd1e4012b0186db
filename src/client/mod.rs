//! バックエンドHTTPクライアント
//!
//! - `GET /metadata` でデータセットを取得・正規化
//! - 判定を `PATCH /detections/{id}/validate` / `DELETE /detections/{id}` で同期
//!
//! reqwest::Client は生成時に1度だけ作り、以降の呼び出しで使い回す。

mod sync;

pub use sync::ValidateRequest;

use crate::config::Config;
use crate::error::{ReviewError, Result};
use hitl_review_common::{parse_metadata, ImageRecord};
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, info};

const METADATA_ROUTE: &str = "metadata";

#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base: Url,
}

impl MetadataClient {
    /// 設定から生成する。`backend_url` が指定されればそれを優先する
    pub fn new(config: &Config, backend_url: Option<&str>) -> Result<Self> {
        let url = match backend_url {
            Some(url) => url.to_string(),
            None => config.get_backend_url(),
        };
        Self::with_base_url(&url, config.timeout_seconds.map(Duration::from_secs))
    }

    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ReviewError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ReviewError::InvalidUrl(base_url.to_string()));
        }
        // join() が最後のセグメントを置き換えないように末尾を / に揃える
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ReviewError::Config(format!("HTTPクライアント生成失敗: {}", e)))?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// データセットを取得して正規化する
    ///
    /// キャッシュは持たず、呼ぶたびにバックエンドへ問い合わせる。
    pub async fn load(&self) -> Result<Vec<ImageRecord>> {
        let url = self.endpoint(METADATA_ROUTE)?;
        let stamp = chrono::Utc::now().timestamp_millis().to_string();
        debug!(%url, "fetching metadata");

        let response = self
            .http
            .get(url)
            .query(&[("t", stamp.as_str())])
            .send()
            .await
            .map_err(|e| ReviewError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ReviewError::Fetch(format!("HTTP {}: {}", status, text.trim())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ReviewError::Fetch(e.to_string()))?;

        let images = parse_metadata(&body, self.base.as_str())?;

        info!(
            images = images.len(),
            detections = images.iter().map(|i| i.detections.len()).sum::<usize>(),
            "metadata loaded"
        );
        Ok(images)
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ReviewError::InvalidUrl(format!("{}: {}", path, e)))
    }
}
