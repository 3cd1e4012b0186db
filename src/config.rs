use crate::error::{ReviewError, Result};
use hitl_review_common::DEFAULT_WINDOW_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const BACKEND_URL_ENV: &str = "HITL_BACKEND_URL";

/// モデルが出力する欠陥クラス
pub const DEFAULT_CLASS_NAMES: &[&str] = &[
    "BrownSpot",
    "Browning",
    "BurnedTip",
    "Curling",
    "Purpling",
    "Wilting",
    "Yellowing",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub window_size: usize,
    /// 未設定ならタイムアウトなし
    pub timeout_seconds: Option<u64>,
    /// Other 判定で選べるクラス名
    pub class_names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".into(),
            window_size: DEFAULT_WINDOW_SIZE,
            timeout_seconds: None,
            class_names: DEFAULT_CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReviewError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("hitl-review").join("config.json"))
    }

    /// 実際に接続するバックエンドURL
    ///
    /// 環境変数は保存済みの値より優先するが、設定ファイルには書き込まない。
    pub fn get_backend_url(&self) -> String {
        // 環境変数を優先
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                return url.to_string();
            }
        }

        self.backend_url.clone()
    }

    pub fn set_backend_url(&mut self, url: String) -> Result<()> {
        reqwest::Url::parse(&url).map_err(|e| ReviewError::InvalidUrl(format!("{}: {}", url, e)))?;
        self.backend_url = url;
        self.save()
    }

    pub fn set_window_size(&mut self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(ReviewError::Config("ウィンドウサイズは1以上を指定してください".into()));
        }
        self.window_size = size;
        self.save()
    }
}
