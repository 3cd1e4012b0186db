//! 進捗サマリー表示

use hitl_review_common::progress::{progress_percent, total_detections, validated_count};
use hitl_review_common::{class_breakdown, status_breakdown, ImageRecord};
use indicatif::{ProgressBar, ProgressStyle};

/// `12/40 (30.0%)` 形式の1行表示
pub fn render_progress_line(validated: usize, total: usize) -> String {
    let percent = if total == 0 {
        0.0
    } else {
        validated as f64 / total as f64 * 100.0
    };
    format!("進捗: {}/{} ({:.1}%)", validated, total, percent)
}

pub fn print_summary(images: &[ImageRecord]) {
    let total = total_detections(images);
    let validated = validated_count(images);
    let with_detections = images.iter().filter(|img| img.has_detections()).count();

    println!("画像: {}枚（検出あり {}枚）", images.len(), with_detections);
    println!("検出: {}件", total);

    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("{bar:40.green/white} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_position(validated as u64);
    bar.abandon_with_message(format!("({:.1}%)", progress_percent(images)));

    println!("{}", render_progress_line(validated, total));

    let status = status_breakdown(images);
    println!("\n状態別:");
    println!("  validated:   {}", status.validated);
    println!("  healthy:     {}", status.healthy);
    println!("  unvalidated: {}", status.unvalidated);

    let classes = class_breakdown(images);
    if !classes.is_empty() {
        println!("\nクラス別:");
        for (name, count) in classes {
            println!("  {:<12} {}", name, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_progress_line() {
        assert_eq!(render_progress_line(3, 4), "進捗: 3/4 (75.0%)");
        assert_eq!(render_progress_line(0, 0), "進捗: 0/0 (0.0%)");
    }
}
