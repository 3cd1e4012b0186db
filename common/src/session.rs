//! レビューセッション
//!
//! データセット本体・カーソル・判定ログ・ウィンドウをまとめて所有する。
//! 判定は楽観的にローカルへ即時反映し、バックエンドへの同期は呼び出し側が
//! 返された DecisionEntry を使って行う。

use crate::cursor::{NavigationCursor, Position};
use crate::ledger::ValidationLedger;
use crate::progress;
use crate::types::{DecisionEntry, DecisionKind, DetectionRecord, FilterStatus, ImageRecord};
use crate::window::WindowCache;

#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    images: Vec<ImageRecord>,
    cursor: NavigationCursor,
    ledger: ValidationLedger,
    window: WindowCache,
}

impl ReviewSession {
    pub fn new(images: Vec<ImageRecord>, window_size: usize) -> Self {
        let mut session = Self {
            images: Vec::new(),
            cursor: NavigationCursor::default(),
            ledger: ValidationLedger::new(),
            window: WindowCache::new(window_size),
        };
        session.replace_dataset(images);
        session
    }

    /// 画像単位のフィルタを設定し、その条件で初期位置を決め直す
    pub fn with_filter(mut self, filter: FilterStatus) -> Self {
        self.cursor.set_filter(filter);
        self.cursor.reset(&self.images);
        self.refresh_window();
        self
    }

    /// データセットを丸ごと置き換え、カーソルを初期位置に戻す
    ///
    /// 未同期のローカル変更は破棄される。判定ログは保持する。
    pub fn replace_dataset(&mut self, images: Vec<ImageRecord>) {
        self.images = images;
        self.cursor.reset(&self.images);
        self.refresh_window();
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    pub fn ledger(&self) -> &ValidationLedger {
        &self.ledger
    }

    pub fn position(&self) -> Option<Position> {
        self.cursor.position(&self.images)
    }

    pub fn current(&self) -> Option<(&ImageRecord, &DetectionRecord)> {
        self.cursor.current(&self.images)
    }

    /// 現在の検出の切り出し画像URL
    pub fn current_crop_ref(&self) -> Option<&str> {
        self.current().map(|(_, det)| det.crop_image_ref.as_str())
    }

    pub fn filter(&self) -> FilterStatus {
        self.cursor.filter()
    }

    pub fn set_filter(&mut self, filter: FilterStatus) {
        self.cursor.set_filter(filter);
    }

    // ---- navigation ----

    pub fn advance(&mut self) {
        self.cursor.advance(&self.images);
        self.refresh_window();
    }

    pub fn next_image(&mut self) -> bool {
        let moved = self.cursor.next_image(&self.images);
        self.refresh_window();
        moved
    }

    pub fn prev_image(&mut self) -> bool {
        let moved = self.cursor.prev_image(&self.images);
        self.refresh_window();
        moved
    }

    pub fn jump_to(&mut self, image_index: usize) -> bool {
        let moved = self.cursor.jump_to(&self.images, image_index);
        self.refresh_window();
        moved
    }

    // ---- validation ----

    /// 現在の検出に判定を適用し、カーソルを次へ進める
    ///
    /// 現在位置に検出がない場合や、ラベルなしの Other は何もせず None。
    pub fn decide(
        &mut self,
        decision: DecisionKind,
        override_label: Option<&str>,
    ) -> Option<DecisionEntry> {
        let pos = self.cursor.position(&self.images)?;
        let entry = self
            .ledger
            .apply(&mut self.images, pos, decision, override_label)?;

        if decision == DecisionKind::Delete {
            self.cursor.resolve_after_removal(&self.images);
        } else {
            self.cursor.advance(&self.images);
        }
        self.refresh_window();
        Some(entry)
    }

    // ---- progress ----

    pub fn total_detections(&self) -> usize {
        progress::total_detections(&self.images)
    }

    pub fn validated_count(&self) -> usize {
        progress::validated_count(&self.images)
    }

    pub fn progress_percent(&self) -> f64 {
        progress::progress_percent(&self.images)
    }

    // ---- window ----

    pub fn window(&self) -> &[ImageRecord] {
        self.window.view(&self.images)
    }

    pub fn window_range(&self) -> std::ops::Range<usize> {
        self.window.range()
    }

    fn refresh_window(&mut self) {
        self.window
            .recompute(self.cursor.image_index(), self.images.len());
    }
}
