//! HITL Review Common Library
//!
//! 検出レビューの状態管理（I/Oを持たない中核部分）:
//! メタデータの正規化、2段階ナビゲーション、判定ログ、進捗集計、スライディングウィンドウ

pub mod types;
pub mod error;
pub mod parser;
pub mod cursor;
pub mod ledger;
pub mod progress;
pub mod window;
pub mod session;

pub use types::{
    BoundingBox, DecisionEntry, DecisionKind, DetectionRecord, DetectionStatus, FilterStatus,
    ImageRecord,
};
pub use error::{Error, Result};
pub use parser::{parse_metadata, normalize_confidence, resolve_locator};
pub use cursor::{NavigationCursor, Position};
pub use ledger::ValidationLedger;
pub use progress::{class_breakdown, status_breakdown, StatusBreakdown};
pub use window::{WindowCache, DEFAULT_WINDOW_SIZE};
pub use session::ReviewSession;
