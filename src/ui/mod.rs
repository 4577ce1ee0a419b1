//! UIモジュール
//!
//! ratatuiベースのウィジェット（ミニマップ・行番号・テキストエリア）

pub mod gutter;
pub mod minimap_widget;
pub mod text_area;

// 公開API
pub use gutter::{GutterWidget, LineNumberGutter};
pub use minimap_widget::{pointer_from_mouse, MinimapInput, MinimapWidget, Raster};
pub use text_area::{styled_line, TextAreaWidget};
