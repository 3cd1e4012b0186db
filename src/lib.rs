//! hitl-review
//!
//! 推論サービスが出力した欠陥検出を人が1件ずつ確認し、
//! 判定結果をバックエンドへ反映するCLIツール。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod review;
pub mod summary;
