//! インメモリの編集面
//!
//! ハイライト済みドキュメント・表示先頭行・カーソル行を持ち、
//! 変更があれば `ChangeNotifier` で通知する。

use super::EditorSurface;
use crate::document::Document;
use crate::events::{ChangeEvent, ChangeNotifier};
use crate::highlight::SyntaxHighlighter;
use crate::scroll::ScrollState;

#[derive(Debug)]
pub struct TextView {
    document: Document,
    highlighter: SyntaxHighlighter,
    /// 表示の開始行
    top_line: usize,
    /// 表示可能な行数
    visible_rows: usize,
    cursor_line: usize,
    notifier: ChangeNotifier,
}

impl TextView {
    pub fn new(text: &str, highlighter: SyntaxHighlighter) -> Self {
        Self {
            document: Document::highlighted(text, &highlighter),
            highlighter,
            top_line: 0,
            visible_rows: 1,
            cursor_line: 0,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    pub fn line_count(&self) -> usize {
        self.document.line_count()
    }

    /// 表示中の行範囲
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let end = (self.top_line + self.visible_rows).min(self.line_count());
        self.top_line.min(end)..end
    }

    /// テキストを差し替えて再ハイライトする
    pub fn set_text(&mut self, text: &str) {
        self.document = Document::highlighted(text, &self.highlighter);
        self.cursor_line = self.cursor_line.min(self.line_count().saturating_sub(1));
        self.notifier.notify(ChangeEvent::TextChanged);
        let top = self.top_line as u64;
        self.apply_scroll(top);
    }

    /// 表示可能な行数を更新する（ウィンドウのリサイズ時）
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.max(1);
        let top = self.top_line as u64;
        self.apply_scroll(top);
    }

    /// カーソル行を移動し、画面外に出たら中央に来るようスクロールする
    pub fn move_cursor_to(&mut self, line: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        if line != self.cursor_line {
            self.cursor_line = line;
            self.notifier.notify(ChangeEvent::CursorMoved { line });
        }

        let bottom = self.top_line + self.visible_rows.saturating_sub(1);
        if line < self.top_line {
            self.apply_scroll(line as u64);
        } else if line > bottom {
            // 中央表示ポリシー
            let half = self.visible_rows / 2;
            self.apply_scroll(line.saturating_sub(half) as u64);
        }
    }

    pub fn move_cursor_by(&mut self, delta: i64) {
        let target = if delta.is_negative() {
            self.cursor_line.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.cursor_line.saturating_add(delta as usize)
        };
        self.move_cursor_to(target);
    }

    fn apply_scroll(&mut self, position: u64) {
        let clamped = self.scroll_state().clamp_position(position) as usize;
        if clamped != self.top_line {
            self.top_line = clamped;
            self.notifier.notify(ChangeEvent::ScrollChanged {
                position: clamped as u64,
            });
        }
    }
}

impl EditorSurface for TextView {
    fn document(&self) -> &Document {
        &self.document
    }

    fn scroll_state(&self) -> ScrollState {
        ScrollState::new(
            self.top_line as u64,
            self.visible_rows as u64,
            self.line_count() as u64,
        )
    }

    fn set_scroll_position(&mut self, position: u64) {
        self.apply_scroll(position);
    }
}
