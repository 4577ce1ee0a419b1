//! codemap - コードミニマップの座標マッパー
//!
//! ドキュメント全体の縮小表示と、表示領域の双方向の対応付け
//! （ポインタ位置 → スクロール位置、スクロール状態 → ビューポート矩形）。

// コアモジュール
pub mod error;
pub mod logging;

// データ層
pub mod color;
pub mod document;
pub mod highlight;
pub mod scroll;

// 座標変換
pub mod geometry;
pub mod render;
pub mod viewport;

// 編集面と通知
pub mod editor;
pub mod events;

// ミニマップ本体
pub mod config;
pub mod minimap;

// 表示層
pub mod frontend;
pub mod ui;

// 公開API
pub use config::{MinimapConfig, Palette};
pub use document::{Document, DocumentLine, StyleRun};
pub use editor::{EditorSurface, TextView};
pub use error::{CodemapError, Result};
pub use frontend::TuiApplication;
pub use geometry::{MinimapGeometry, PixelRect};
pub use minimap::{DragState, Minimap, PointerEvent, PointerKind};
pub use render::{DrawCommand, RenderFrame};
pub use scroll::{ScrollCommand, ScrollState};
