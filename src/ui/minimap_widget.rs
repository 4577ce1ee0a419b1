//! ミニマップの端末描画
//!
//! `RenderFrame` を ratatui の `Buffer` に割り当てる。1セル = 1ピクセル。
//! ビューポートは下地とアルファ合成し、罫線で枠を描く。

use crate::color::Rgba;
use crate::minimap::{PointerEvent, PointerKind};
use crate::render::{DrawCommand, RenderFrame};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

/// フレームをラスタライズした結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Option<Rgba>>,
    outline: Vec<Option<(char, Rgba)>>,
}

impl Raster {
    pub fn from_frame(frame: &RenderFrame) -> Self {
        let size = frame.width as usize * frame.height as usize;
        let mut raster = Self {
            width: frame.width,
            height: frame.height,
            pixels: vec![None; size],
            outline: vec![None; size],
        };

        for command in &frame.commands {
            match *command {
                DrawCommand::Fill { rect, color } => {
                    raster.for_each_in(rect.x, rect.y, rect.right(), rect.bottom(), |raster, idx| {
                        raster.pixels[idx] = Some(color);
                    });
                }
                DrawCommand::Viewport { rect, fill, border } => {
                    let (left, top) = (rect.x, rect.y);
                    let (right, bottom) = (rect.right(), rect.bottom());
                    raster.for_each_in(left, top, right, bottom, |raster, idx| {
                        let base = raster.pixels[idx].unwrap_or(Rgba::rgb(0, 0, 0));
                        raster.pixels[idx] = Some(fill.blend_over(base));
                    });
                    raster.outline_rect(left, top, right, bottom, border);
                }
            }
        }
        raster
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).and_then(|idx| self.pixels[idx])
    }

    pub fn glyph(&self, x: u32, y: u32) -> Option<char> {
        self.index(x, y)
            .and_then(|idx| self.outline[idx])
            .map(|(glyph, _)| glyph)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    fn for_each_in(
        &mut self,
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
        mut apply: impl FnMut(&mut Self, usize),
    ) {
        let right = right.min(self.width);
        let bottom = bottom.min(self.height);
        for y in top..bottom {
            for x in left..right {
                let idx = (y * self.width + x) as usize;
                apply(self, idx);
            }
        }
    }

    fn outline_rect(&mut self, left: u32, top: u32, right: u32, bottom: u32, color: Rgba) {
        if right <= left || bottom <= top {
            return;
        }
        let (last_x, last_y) = (right - 1, bottom - 1);
        for y in top..bottom {
            for x in left..right {
                let glyph = match (x == left, x == last_x, y == top, y == last_y) {
                    _ if top == last_y => '─',
                    (true, _, true, _) => '┌',
                    (_, true, true, _) => '┐',
                    (true, _, _, true) => '└',
                    (_, true, _, true) => '┘',
                    (_, _, true, _) | (_, _, _, true) => '─',
                    (true, _, _, _) | (_, true, _, _) => '│',
                    _ => continue,
                };
                if let Some(idx) = self.index(x, y) {
                    self.outline[idx] = Some((glyph, color));
                }
            }
        }
    }
}

/// ミニマップウィジェット
pub struct MinimapWidget<'a> {
    frame: &'a RenderFrame,
}

impl<'a> MinimapWidget<'a> {
    pub fn new(frame: &'a RenderFrame) -> Self {
        Self { frame }
    }
}

impl Widget for MinimapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.frame.is_empty() {
            return;
        }
        let raster = Raster::from_frame(self.frame);
        let width = (area.width as u32).min(raster.width());
        let height = (area.height as u32).min(raster.height());

        for y in 0..height {
            for x in 0..width {
                let Some(cell) = buf.cell_mut((area.x + x as u16, area.y + y as u16)) else {
                    continue;
                };
                if let Some(color) = raster.pixel(x, y) {
                    cell.set_bg(Color::from(color));
                }
                match raster
                    .index(x, y)
                    .and_then(|idx| raster.outline[idx])
                {
                    Some((glyph, border)) => {
                        cell.set_char(glyph).set_fg(Color::from(border));
                    }
                    None => {
                        cell.set_char(' ');
                    }
                }
            }
        }
    }
}

/// ミニマップへの入力
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinimapInput {
    Pointer(PointerEvent),
    /// ホイール（正で下方向）
    Wheel(i64),
}

/// 端末のマウスイベントをミニマップのローカル座標に変換する
///
/// * 押下とホイールは領域内のときだけ
/// * ドラッグと離すは領域外でも通す（ポインタ捕捉中のため）
/// * ボタンなしの移動が領域外なら `Leave`
pub fn pointer_from_mouse(event: &MouseEvent, area: Rect) -> Option<MinimapInput> {
    let inside = area.contains((event.column, event.row).into());
    let local_x = event.column as f64 - area.x as f64;
    let local_y = event.row as f64 - area.y as f64;
    let pointer = |kind| MinimapInput::Pointer(PointerEvent::new(kind, local_x, local_y));

    match event.kind {
        MouseEventKind::Down(MouseButton::Left) if inside => Some(pointer(PointerKind::Press)),
        MouseEventKind::Drag(MouseButton::Left) => Some(pointer(PointerKind::Move)),
        MouseEventKind::Up(MouseButton::Left) => Some(pointer(PointerKind::Release)),
        MouseEventKind::Moved if !inside => Some(pointer(PointerKind::Leave)),
        MouseEventKind::ScrollDown if inside => Some(MinimapInput::Wheel(1)),
        MouseEventKind::ScrollUp if inside => Some(MinimapInput::Wheel(-1)),
        _ => None,
    }
}
