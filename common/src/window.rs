//! スライディングウィンドウ
//!
//! 表示側が一度に保持するデータ量を抑えるための読み取り専用ビュー。
//! 実体はデータセット上の範囲だけで、データの複製は持たない。

use crate::types::ImageRecord;
use std::ops::Range;

pub const DEFAULT_WINDOW_SIZE: usize = 5;
/// 現在位置より前に残す画像数
pub const BACK_BUFFER: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowCache {
    size: usize,
    range: Range<usize>,
}

impl Default for WindowCache {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl WindowCache {
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            range: 0..0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// カーソルの画像インデックスを基準に範囲を再計算
    pub fn recompute(&mut self, image_index: usize, dataset_len: usize) {
        let start = image_index.saturating_sub(BACK_BUFFER).min(dataset_len);
        let end = (start + self.size).min(dataset_len);
        self.range = start..end;
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// ウィンドウ内の画像
    pub fn view<'a>(&self, images: &'a [ImageRecord]) -> &'a [ImageRecord] {
        let end = self.range.end.min(images.len());
        let start = self.range.start.min(end);
        &images[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<ImageRecord> {
        (0..n)
            .map(|i| ImageRecord {
                uploaded_name: format!("img_{}.jpg", i),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_window_near_start() {
        let mut window = WindowCache::default();
        window.recompute(0, 10);
        assert_eq!(window.range(), 0..5);
        window.recompute(1, 10);
        assert_eq!(window.range(), 0..5);
    }

    #[test]
    fn test_window_centered() {
        let data = images(10);
        let mut window = WindowCache::default();
        window.recompute(4, data.len());
        assert_eq!(window.range(), 2..7);
        let view = window.view(&data);
        assert_eq!(view.len(), 5);
        assert_eq!(view[2].uploaded_name, "img_4.jpg");
    }

    #[test]
    fn test_window_near_end_is_truncated() {
        let mut window = WindowCache::default();
        window.recompute(9, 10);
        assert_eq!(window.range(), 7..10);
    }

    #[test]
    fn test_window_small_dataset() {
        let data = images(2);
        let mut window = WindowCache::new(5);
        window.recompute(1, data.len());
        assert_eq!(window.view(&data).len(), 2);

        window.recompute(0, 0);
        assert!(window.view(&[]).is_empty());
    }

    #[test]
    fn test_window_view_survives_shrunk_dataset() {
        let mut window = WindowCache::new(3);
        window.recompute(5, 10);
        assert!(window.view(&images(4)).len() <= 3);
    }
}
