//! 対話式レビューモジュール
//!
//! 検出を1件ずつ表示し、判定・画像移動・再読み込みを受け付ける。
//! 判定はローカルに即時反映し、その後バックエンドへ同期する（楽観的更新）。
//! 同期に失敗しても巻き戻さず、件数を数えて終了時に報告する。

use crate::client::MetadataClient;
use crate::config::Config;
use crate::error::{ReviewError, Result};
use crate::export::write_decision_log;
use crate::summary::render_progress_line;
use dialoguer::{Input, Select};
use hitl_review_common::{
    DecisionKind, DetectionRecord, FilterStatus, ImageRecord, ReviewSession,
};
use std::ops::Range;
use std::path::PathBuf;
use tracing::{info, warn};

/// review サブコマンドのオプション
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    pub filter: FilterStatus,
    pub log_output: Option<PathBuf>,
    /// バックエンドへ同期しない
    pub offline: bool,
}

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Correct,
    Healthy,
    Other,
    Delete,
    NextImage,
    PrevImage,
    Jump,
    Filter,
    Reload,
    Quit,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Correct => "Correct  (予測どおり)",
            MenuItem::Healthy => "Healthy  (欠陥なし)",
            MenuItem::Other => "Other    (別クラスに修正)",
            MenuItem::Delete => "Delete   (検出を削除)",
            MenuItem::NextImage => "次の画像",
            MenuItem::PrevImage => "前の画像",
            MenuItem::Jump => "画像番号へ移動",
            MenuItem::Filter => "フィルタ変更",
            MenuItem::Reload => "再読み込み",
            MenuItem::Quit => "終了",
        }
    }

    pub fn decision(&self) -> Option<DecisionKind> {
        match self {
            MenuItem::Correct => Some(DecisionKind::Correct),
            MenuItem::Healthy => Some(DecisionKind::Healthy),
            MenuItem::Other => Some(DecisionKind::Other),
            MenuItem::Delete => Some(DecisionKind::Delete),
            _ => None,
        }
    }
}

/// 現在位置に検出があるときだけ判定項目を出す
pub fn menu_items(has_detection: bool) -> Vec<MenuItem> {
    let mut items = Vec::new();
    if has_detection {
        items.extend([MenuItem::Correct, MenuItem::Healthy, MenuItem::Other, MenuItem::Delete]);
    }
    items.extend([
        MenuItem::NextImage,
        MenuItem::PrevImage,
        MenuItem::Jump,
        MenuItem::Filter,
        MenuItem::Reload,
        MenuItem::Quit,
    ]);
    items
}

/// 現在の検出の表示行
pub fn describe_current(
    image_index: usize,
    image_count: usize,
    detection_index: usize,
    image: &ImageRecord,
    det: &DetectionRecord,
) -> String {
    let b = &det.bounding_box;
    format!(
        "[画像 {}/{}] {} 検出 {}/{}: {} ({:.1}%) bbox=({:.0}, {:.0}, {:.0}, {:.0}) status={}",
        image_index + 1,
        image_count,
        image.uploaded_name,
        detection_index + 1,
        image.detections.len(),
        det.defect_type,
        det.confidence * 100.0,
        b.x1,
        b.y1,
        b.x2,
        b.y2,
        det.status,
    )
}

/// ウィンドウ内の画像一覧。現在の画像は [] で囲む
///
/// 各画像は `番号:ファイル名(検出数)` で表示する。
pub fn describe_window(range: Range<usize>, window: &[ImageRecord], current: usize) -> String {
    let parts: Vec<String> = range
        .zip(window)
        .map(|(idx, image)| {
            let item = format!("{}:{}({})", idx + 1, image.uploaded_name, image.detections.len());
            if idx == current {
                format!("[{}]", item)
            } else {
                item
            }
        })
        .collect();
    format!("周辺: {}", parts.join(" "))
}

pub async fn run_interactive_review(
    client: &MetadataClient,
    config: &Config,
    options: ReviewOptions,
) -> Result<()> {
    let images = client.load().await?;
    let mut session = ReviewSession::new(images, config.window_size).with_filter(options.filter);
    let mut unsynced = 0usize;

    println!("📋 画像: {}枚 / 検出: {}件 (フィルタ: {})", session.image_count(), session.total_detections(), options.filter);
    println!("---\n");

    loop {
        println!("{}", render_progress_line(session.validated_count(), session.total_detections()));
        let has_detection = match session.current() {
            Some((image, det)) => {
                let cursor = session.cursor();
                println!(
                    "{}",
                    describe_current(cursor.image_index(), session.image_count(), cursor.detection_index(), image, det)
                );
                if !det.crop_image_ref.is_empty() {
                    println!("  切り出し: {}", det.crop_image_ref);
                }
                if !image.processed_image_ref.is_empty() {
                    println!("  画像: {}", image.processed_image_ref);
                }
                true
            }
            None => {
                println!("レビュー対象の検出がありません（すべて判定済み、または検出なし）");
                false
            }
        };

        if session.image_count() > 0 {
            println!(
                "{}",
                describe_window(session.window_range(), session.window(), session.cursor().image_index())
            );
        }

        let items = menu_items(has_detection);
        let labels: Vec<&str> = items.iter().map(|i| i.label()).collect();
        let choice = Select::new()
            .with_prompt("操作")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| ReviewError::CliExecution(e.to_string()))?;
        let item = items[choice];

        if let Some(decision) = item.decision() {
            let label = if decision == DecisionKind::Other {
                Some(prompt_class(&config.class_names)?)
            } else {
                None
            };

            let Some(entry) = session.decide(decision, label.as_deref()) else {
                println!("  → 判定できませんでした\n");
                continue;
            };
            println!("  → {}\n", entry.decision);

            if !options.offline {
                if let Err(e) = client.sync(&entry).await {
                    warn!(detection_id = entry.detection_id, image = %entry.image_id, error = %e, "sync failed");
                    unsynced += 1;
                }
            }
            continue;
        }

        match item {
            MenuItem::NextImage => {
                if !session.next_image() {
                    println!("  → 次の画像はありません\n");
                }
            }
            MenuItem::PrevImage => {
                if !session.prev_image() {
                    println!("  → 前の画像はありません\n");
                }
            }
            MenuItem::Jump => {
                let count = session.image_count();
                let number: usize = Input::new()
                    .with_prompt(format!("画像番号 (1-{})", count))
                    .interact_text()
                    .map_err(|e| ReviewError::CliExecution(e.to_string()))?;
                if number == 0 || !session.jump_to(number - 1) {
                    println!("  → 範囲外です\n");
                }
            }
            MenuItem::Filter => {
                let filter = prompt_filter(session.filter())?;
                session.set_filter(filter);
                println!("  → フィルタ: {}\n", filter);
            }
            MenuItem::Reload => match reload(client, &mut session).await {
                Ok(()) => println!("  → 再読み込みしました\n"),
                Err(e) => println!("  → 再読み込み失敗: {}\n", e),
            },
            MenuItem::Quit => break,
            _ => {}
        }
    }

    println!("\n判定: {}件", session.ledger().len());
    if unsynced > 0 {
        println!("⚠ バックエンドへ未同期の判定: {}件（再読み込みで失われます）", unsynced);
    }

    if let Some(output) = options.log_output {
        let path = write_decision_log(&output, session.ledger().entries())?;
        info!(path = %path.display(), "decision log written");
        println!("✓ 判定ログを保存しました: {}", path.display());
    }

    Ok(())
}

/// バックエンドから取り直してデータセットを丸ごと置き換える
///
/// 取得やパースに失敗した場合、セッションには一切手を付けない。
pub async fn reload(client: &MetadataClient, session: &mut ReviewSession) -> Result<()> {
    match client.load().await {
        Ok(images) => {
            session.replace_dataset(images);
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "reload failed");
            Err(e)
        }
    }
}

const FILTERS: [FilterStatus; 3] = [FilterStatus::All, FilterStatus::Validated, FilterStatus::Unvalidated];

fn prompt_filter(current: FilterStatus) -> Result<FilterStatus> {
    let labels: Vec<String> = FILTERS.iter().map(|f| f.to_string()).collect();
    let default = FILTERS.iter().position(|f| *f == current).unwrap_or(0);
    let idx = Select::new()
        .with_prompt("フィルタ")
        .items(&labels)
        .default(default)
        .interact()
        .map_err(|e| ReviewError::CliExecution(e.to_string()))?;
    Ok(FILTERS[idx])
}

fn prompt_class(class_names: &[String]) -> Result<String> {
    if class_names.is_empty() {
        return Input::new()
            .with_prompt("クラス名")
            .interact_text()
            .map_err(|e| ReviewError::CliExecution(e.to_string()));
    }

    let idx = Select::new()
        .with_prompt("クラス")
        .items(class_names)
        .default(0)
        .interact()
        .map_err(|e| ReviewError::CliExecution(e.to_string()))?;
    Ok(class_names[idx].clone())
}
