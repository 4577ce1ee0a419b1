//! 編集面
//!
//! ミニマップが読み書きする外部協調者のインターフェースと、
//! そのインメモリ実装。

pub mod text_view;

pub use text_view::TextView;

use crate::document::Document;
use crate::scroll::ScrollState;

/// ミニマップから見た編集面
///
/// ドキュメントとスクロール状態の読み取り、スクロール位置の書き込みだけを行う。
pub trait EditorSurface {
    fn document(&self) -> &Document;

    fn scroll_state(&self) -> ScrollState;

    /// スクロール位置を設定する（範囲外は実装側で丸める）
    fn set_scroll_position(&mut self, position: u64);

    /// 相対スクロール
    fn scroll_by(&mut self, delta: i64) {
        let state = self.scroll_state();
        let target = if delta.is_negative() {
            state.position.saturating_sub(delta.unsigned_abs())
        } else {
            state.position.saturating_add(delta as u64)
        };
        self.set_scroll_position(state.clamp_position(target));
    }
}
