//! ドキュメントスナップショット
//!
//! 編集面から読み取る行とスタイルランの列。ミニマップはこれを読むだけで変更しない。

use crate::color::Rgba;
use crate::highlight::SyntaxHighlighter;

/// 1行内で同じ前景色を共有する連続区間（オフセットは文字単位）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRun {
    pub start: usize,
    pub length: usize,
    pub color: Rgba,
}

impl StyleRun {
    pub fn new(start: usize, length: usize, color: Rgba) -> Self {
        Self {
            start,
            length,
            color,
        }
    }

    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }
}

/// ドキュメントの1行（ブロック）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentLine {
    text: String,
    runs: Vec<StyleRun>,
    char_len: usize,
}

impl DocumentLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_runs(text, Vec::new())
    }

    /// スタイルラン付きで作成する
    ///
    /// ランは開始位置順に並べ替え、長さ0のランは捨てる。
    pub fn with_runs(text: impl Into<String>, mut runs: Vec<StyleRun>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        runs.retain(|run| run.length > 0);
        runs.sort_by_key(|run| run.start);
        Self {
            text,
            runs,
            char_len,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    /// 文字数
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }
}

/// 行の順序付き列
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<DocumentLine>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<DocumentLine>) -> Self {
        Self { lines }
    }

    /// スタイルなしのプレーンテキストから作成
    ///
    /// 空文字列は0行として扱う（末尾の改行は空行を1つ作る）。
    pub fn from_plain_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        Self {
            lines: text.split('\n').map(|line| DocumentLine::new(strip_cr(line))).collect(),
        }
    }

    /// ハイライタを通してスタイルラン付きで作成
    ///
    /// 複数行にまたがる状態（三重引用符など）は前の行から引き継ぐ。
    pub fn highlighted(text: &str, highlighter: &SyntaxHighlighter) -> Self {
        if text.is_empty() {
            return Self::new();
        }

        let mut state = 0;
        let lines = text
            .split('\n')
            .map(|raw| {
                let line = strip_cr(raw);
                let (runs, next_state) = highlighter.highlight_line(line, state);
                state = next_state;
                DocumentLine::with_runs(line, runs)
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&DocumentLine> {
        self.lines.get(index)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_splits_lines() {
        let doc = Document::from_plain_text("a\r\nbc\n\nd");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line(0).unwrap().text(), "a");
        assert!(doc.line(2).unwrap().is_empty());
        assert!(doc.line(1).unwrap().runs().is_empty());
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(Document::from_plain_text("").is_empty());
    }

    #[test]
    fn runs_are_sorted_and_zero_length_dropped() {
        let color = Rgba::rgb(1, 1, 1);
        let line = DocumentLine::with_runs(
            "abcdef",
            vec![
                StyleRun::new(4, 2, color),
                StyleRun::new(2, 0, color),
                StyleRun::new(0, 1, color),
            ],
        );
        let starts: Vec<usize> = line.runs().iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0, 4]);
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        assert_eq!(DocumentLine::new("日本語").char_len(), 3);
    }
}
