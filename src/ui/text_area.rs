//! テキストエリア描画
//!
//! ハイライト済みドキュメントの表示範囲をスタイルランの色で描く。

use crate::color::Rgba;
use crate::document::{Document, DocumentLine};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::ops::Range;
use unicode_width::UnicodeWidthChar;

pub struct TextAreaWidget<'a> {
    document: &'a Document,
    range: Range<usize>,
    cursor_line: usize,
    text_color: Color,
    cursor_background: Color,
}

impl<'a> TextAreaWidget<'a> {
    pub fn new(document: &'a Document, range: Range<usize>) -> Self {
        Self {
            document,
            range,
            cursor_line: usize::MAX,
            text_color: Color::Rgb(212, 212, 212),
            cursor_background: Color::Rgb(45, 45, 45),
        }
    }

    pub fn cursor_line(mut self, line: usize) -> Self {
        self.cursor_line = line;
        self
    }

    pub fn text_color(mut self, color: Rgba) -> Self {
        self.text_color = color.into();
        self
    }
}

impl Widget for TextAreaWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        let lines: Vec<Line<'static>> = self
            .range
            .clone()
            .take(area.height as usize)
            .filter_map(|index| {
                let line = self.document.line(index)?;
                let mut rendered = styled_line(line, width, self.text_color);
                if index == self.cursor_line {
                    rendered = rendered.style(Style::default().bg(self.cursor_background));
                }
                Some(rendered)
            })
            .collect();

        Paragraph::new(lines).render(area, buf);
    }
}

/// 1行をスタイルランごとの `Span` に分ける（表示幅で打ち切る）
pub fn styled_line(line: &DocumentLine, max_width: usize, neutral: Color) -> Line<'static> {
    let mut colors: Vec<Option<Rgba>> = vec![None; line.char_len()];
    for run in line.runs() {
        let end = run.end().min(colors.len());
        for slot in colors.iter_mut().take(end).skip(run.start) {
            *slot = Some(run.color);
        }
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut current_color: Option<Rgba> = None;
    let mut used = 0;

    for (ch, color) in line.text().chars().zip(colors) {
        let ch = if ch == '\t' { ' ' } else { ch };
        let width = ch.width().unwrap_or(0);
        if used + width > max_width {
            break;
        }
        used += width;

        if color != current_color && !current.is_empty() {
            spans.push(span_for(std::mem::take(&mut current), current_color, neutral));
        }
        current_color = color;
        current.push(ch);
    }
    if !current.is_empty() {
        spans.push(span_for(current, current_color, neutral));
    }

    Line::from(spans)
}

fn span_for(text: String, color: Option<Rgba>, neutral: Color) -> Span<'static> {
    let fg = color.map(Color::from).unwrap_or(neutral);
    Span::styled(text, Style::default().fg(fg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StyleRun;

    #[test]
    fn spans_follow_runs() {
        let red = Rgba::rgb(255, 0, 0);
        let line = DocumentLine::with_runs("let x", vec![StyleRun::new(0, 3, red)]);
        let rendered = styled_line(&line, 80, Color::White);
        assert_eq!(rendered.spans.len(), 2);
        assert_eq!(rendered.spans[0].content, "let");
        assert_eq!(rendered.spans[0].style.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(rendered.spans[1].content, " x");
        assert_eq!(rendered.spans[1].style.fg, Some(Color::White));
    }

    #[test]
    fn long_lines_are_cut_at_display_width() {
        let line = DocumentLine::new("日本語テキスト");
        let rendered = styled_line(&line, 5, Color::White);
        assert_eq!(rendered.spans[0].content, "日本");
    }

    #[test]
    fn renders_requested_range() {
        let doc = Document::from_plain_text("zero\none\ntwo\nthree");
        let area = Rect::new(0, 0, 8, 2);
        let mut buf = Buffer::empty(area);
        TextAreaWidget::new(&doc, 2..4).render(area, &mut buf);
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), "t");
        assert_eq!(buf.cell((1, 1)).unwrap().symbol(), "h");
    }
}
