//! ミニマップ描画
//!
//! ドキュメントとスクロール状態から描画コマンド列を作る純粋関数。
//! ホスト側（`ui::MinimapWidget` など）が自分の描画プリミティブに割り当てる。
//! 同じ入力に対しては常に同じフレームを返すので、再描画要求が何度来てもよい。

use crate::color::Rgba;
use crate::config::Palette;
use crate::document::{Document, DocumentLine};
use crate::geometry::{MinimapGeometry, PixelRect};
use crate::scroll::ScrollState;
use crate::viewport::viewport_rect;

/// 描画コマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    /// 不透明な塗りつぶし
    Fill { rect: PixelRect, color: Rgba },
    /// ビューポートインジケータ（半透明の塗り + 枠線）
    Viewport {
        rect: PixelRect,
        fill: Rgba,
        border: Rgba,
    },
}

/// 1回分の描画結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    pub fn empty(geometry: &MinimapGeometry) -> Self {
        Self {
            width: geometry.width,
            height: geometry.height,
            commands: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// ビューポートインジケータの矩形
    pub fn viewport(&self) -> Option<PixelRect> {
        self.commands.iter().rev().find_map(|command| match command {
            DrawCommand::Viewport { rect, .. } => Some(*rect),
            DrawCommand::Fill { .. } => None,
        })
    }
}

/// 行の中身の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowContent<'a> {
    Line(&'a DocumentLine),
    Placeholder,
}

/// ドキュメント全体を縮小して描く
///
/// 1. 背景
/// 2. 各行のセグメント（間引き済み、足りない行は埋め草）
/// 3. ビューポートインジケータ
pub fn render(
    document: &Document,
    scroll: &ScrollState,
    geometry: &MinimapGeometry,
    palette: &Palette,
) -> RenderFrame {
    let mut frame = RenderFrame::empty(geometry);
    let total_lines = document.line_count();
    if total_lines == 0 {
        return frame;
    }

    frame.commands.push(DrawCommand::Fill {
        rect: PixelRect::new(0, 0, geometry.width, geometry.height),
        color: palette.background,
    });

    let rows = geometry.rows();
    for row in 0..rows {
        let content = geometry
            .line_index(row, total_lines)
            .and_then(|index| document.line(index))
            .map(RowContent::Line)
            .unwrap_or(RowContent::Placeholder);
        push_row(&mut frame.commands, row, content, geometry, palette);
    }

    if let Some(rect) = viewport_rect(total_lines, scroll, geometry) {
        if !rect.is_empty() {
            frame.commands.push(DrawCommand::Viewport {
                rect,
                fill: palette.viewport_fill,
                border: palette.viewport_border,
            });
        }
    }

    log::trace!(
        "rendered {} rows for {} lines ({} commands)",
        rows,
        total_lines,
        frame.commands.len()
    );
    frame
}

fn push_row(
    commands: &mut Vec<DrawCommand>,
    row: usize,
    content: RowContent<'_>,
    geometry: &MinimapGeometry,
    palette: &Palette,
) {
    let inner = geometry.inner_width();
    if inner == 0 {
        return;
    }
    let y = geometry.row_top(row);
    let height = geometry.line_height;
    let full_row = PixelRect::new(geometry.margin, y, inner, height);

    let line = match content {
        RowContent::Line(line) if !line.is_empty() => line,
        _ => {
            commands.push(DrawCommand::Fill {
                rect: full_row,
                color: palette.placeholder,
            });
            return;
        }
    };

    for (start, end, color) in line_segments(line, palette.text) {
        let x0 = scale_offset(start, line.char_len(), inner);
        let x1 = scale_offset(end, line.char_len(), inner);
        if x1 > x0 {
            commands.push(DrawCommand::Fill {
                rect: PixelRect::new(geometry.margin + x0, y, x1 - x0, height),
                color,
            });
        }
    }
}

/// 行を色付き区間に分割する
///
/// スタイルランの隙間とランのない行は `neutral` で埋める。
/// 重なったランは後のものが優先される。
fn line_segments(line: &DocumentLine, neutral: Rgba) -> Vec<(usize, usize, Rgba)> {
    let len = line.char_len();
    let mut segments = Vec::new();
    let mut cursor = 0;

    for run in line.runs() {
        let start = run.start.min(len).max(cursor);
        let end = run.end().min(len);
        if end <= start {
            continue;
        }
        if start > cursor {
            segments.push((cursor, start, neutral));
        }
        segments.push((start, end, run.color));
        cursor = end;
    }

    if cursor < len {
        segments.push((cursor, len, neutral));
    }
    segments
}

fn scale_offset(offset: usize, line_len: usize, inner_width: u32) -> u32 {
    let line_len = line_len.max(1) as u64;
    ((offset as u64 * inner_width as u64) / line_len) as u32
}
