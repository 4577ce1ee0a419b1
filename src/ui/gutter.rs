//! 行番号ガター

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// 行番号表示の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberGutter {
    /// 数字の右側の余白
    pub padding: u16,
    pub foreground: Color,
    pub background: Color,
    pub current_line: Color,
}

impl Default for LineNumberGutter {
    fn default() -> Self {
        Self {
            padding: 1,
            foreground: Color::Rgb(211, 211, 211),
            background: Color::Rgb(21, 21, 21),
            current_line: Color::Rgb(255, 255, 153),
        }
    }
}

impl LineNumberGutter {
    /// 行数に応じたガター幅（桁数 + 余白）
    pub fn width(&self, line_count: usize) -> u16 {
        digits(line_count.max(1)) + self.padding
    }

    pub fn widget(&self, first_line: usize, line_count: usize, cursor_line: usize) -> GutterWidget {
        GutterWidget {
            gutter: *self,
            first_line,
            line_count,
            cursor_line,
        }
    }
}

fn digits(mut count: usize) -> u16 {
    let mut digits = 1;
    while count >= 10 {
        count /= 10;
        digits += 1;
    }
    digits
}

/// 表示中の行の番号を右寄せで描く
pub struct GutterWidget {
    gutter: LineNumberGutter,
    first_line: usize,
    line_count: usize,
    cursor_line: usize,
}

impl Widget for GutterWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let base = Style::default()
            .fg(self.gutter.foreground)
            .bg(self.gutter.background);
        buf.set_style(area, base);

        let number_width = area.width.saturating_sub(self.gutter.padding) as usize;
        for row in 0..area.height {
            let line = self.first_line + row as usize;
            if line >= self.line_count {
                break;
            }
            let style = if line == self.cursor_line {
                base.fg(self.gutter.current_line)
            } else {
                base
            };
            let label = format!("{:>width$}", line + 1, width = number_width);
            buf.set_stringn(area.x, area.y + row, label, number_width, style);
        }
    }
}
