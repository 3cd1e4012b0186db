//! 2段階ナビゲーション（画像 → 画像内の検出）
//!
//! カーソル自体はインデックスだけを持ち、データセットは各操作に借用で渡す。
//! 検出のない画像は「止まる価値のない画像」としてスキップする。

use crate::types::{DetectionRecord, FilterStatus, ImageRecord};

/// カーソル位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub image_index: usize,
    pub detection_index: usize,
}

/// レビュー用カーソル
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    image_index: usize,
    detection_index: usize,
    exhausted: bool,
    filter: FilterStatus,
}

impl NavigationCursor {
    /// データセット読み込み時の初期位置を決める
    ///
    /// 検出を持つ最初の画像。なければ画像0（プレースホルダ状態）。
    pub fn new(images: &[ImageRecord], filter: FilterStatus) -> Self {
        let mut cursor = Self {
            filter,
            ..Default::default()
        };
        cursor.reset(images);
        cursor
    }

    pub fn reset(&mut self, images: &[ImageRecord]) {
        self.image_index = first_stop(images, self.filter).unwrap_or(0);
        self.detection_index = 0;
        self.exhausted = false;
    }

    pub fn filter(&self) -> FilterStatus {
        self.filter
    }

    /// フィルタを変更する。現在位置は動かさない
    pub fn set_filter(&mut self, filter: FilterStatus) {
        self.filter = filter;
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    pub fn detection_index(&self) -> usize {
        self.detection_index
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// 有効な位置を指している場合のみ Some
    pub fn position(&self, images: &[ImageRecord]) -> Option<Position> {
        if self.exhausted {
            return None;
        }
        let image = images.get(self.image_index)?;
        if self.detection_index >= image.detections.len() {
            return None;
        }
        Some(Position {
            image_index: self.image_index,
            detection_index: self.detection_index,
        })
    }

    pub fn current<'a>(
        &self,
        images: &'a [ImageRecord],
    ) -> Option<(&'a ImageRecord, &'a DetectionRecord)> {
        let pos = self.position(images)?;
        let image = &images[pos.image_index];
        Some((image, &image.detections[pos.detection_index]))
    }

    /// 検出優先で次へ進む
    ///
    /// 画像内に次の検出があればそこへ、なければ次の停止可能な画像の先頭へ。
    /// どちらもなければ終端状態になり、以降の呼び出しは何もしない。
    pub fn advance(&mut self, images: &[ImageRecord]) {
        if self.exhausted {
            return;
        }
        let len = images
            .get(self.image_index)
            .map(|img| img.detections.len())
            .unwrap_or(0);
        if self.detection_index + 1 < len {
            self.detection_index += 1;
            return;
        }
        self.move_to_next_stop(images);
    }

    /// 現在位置の検出が削除された後に位置を解決し直す
    ///
    /// 後続の検出は1つ前に詰まるので、同じインデックスが残っていればそのまま。
    pub fn resolve_after_removal(&mut self, images: &[ImageRecord]) {
        if self.exhausted {
            return;
        }
        let len = images
            .get(self.image_index)
            .map(|img| img.detections.len())
            .unwrap_or(0);
        if self.detection_index < len {
            return;
        }
        self.move_to_next_stop(images);
    }

    /// 次の停止可能な画像へ。なければ何もしない
    pub fn next_image(&mut self, images: &[ImageRecord]) -> bool {
        match next_stop(images, self.image_index, self.filter) {
            Some(idx) => {
                self.set(idx);
                true
            }
            None => false,
        }
    }

    /// 前の停止可能な画像へ。なければ何もしない
    ///
    /// 終端状態は末尾の外側とみなし、最後の停止可能な画像に戻る。
    pub fn prev_image(&mut self, images: &[ImageRecord]) -> bool {
        let from = if self.exhausted { images.len() } else { self.image_index };
        match prev_stop(images, from, self.filter) {
            Some(idx) => {
                self.set(idx);
                true
            }
            None => false,
        }
    }

    /// 指定画像へ直接移動（検出の有無は問わない）。範囲外なら何もしない
    pub fn jump_to(&mut self, images: &[ImageRecord], image_index: usize) -> bool {
        if image_index >= images.len() {
            return false;
        }
        self.set(image_index);
        true
    }

    fn move_to_next_stop(&mut self, images: &[ImageRecord]) {
        match next_stop(images, self.image_index, self.filter) {
            Some(idx) => self.set(idx),
            None => {
                self.detection_index = 0;
                self.exhausted = true;
            }
        }
    }

    fn set(&mut self, image_index: usize) {
        self.image_index = image_index;
        self.detection_index = 0;
        self.exhausted = false;
    }
}

/// 検出を持ち、フィルタに合致する画像か
pub fn is_stop(image: &ImageRecord, filter: FilterStatus) -> bool {
    image.has_detections() && filter.matches(image)
}

fn first_stop(images: &[ImageRecord], filter: FilterStatus) -> Option<usize> {
    images.iter().position(|img| is_stop(img, filter))
}

fn next_stop(images: &[ImageRecord], from: usize, filter: FilterStatus) -> Option<usize> {
    images
        .iter()
        .enumerate()
        .skip(from + 1)
        .find(|(_, img)| is_stop(img, filter))
        .map(|(i, _)| i)
}

fn prev_stop(images: &[ImageRecord], from: usize, filter: FilterStatus) -> Option<usize> {
    images[..from.min(images.len())]
        .iter()
        .rposition(|img| is_stop(img, filter))
}
