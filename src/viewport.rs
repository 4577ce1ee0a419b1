//! ビューポート矩形とその逆変換
//!
//! スクロール状態 → ミニマップ上のハイライト矩形、
//! ミニマップ上のY座標 → スクロール位置、の双方向の変換。

use crate::geometry::{MinimapGeometry, PixelRect};
use crate::scroll::{ScrollCommand, ScrollState};

/// インジケータの最小高さ（巨大なドキュメントでも見えるように）
pub const MIN_INDICATOR_HEIGHT: u32 = 2;

/// 現在の表示範囲をミニマップ上の矩形に変換する
///
/// 空のドキュメントでは `None`。行が1つも入らないキャンバスでは
/// `y = 0` の高さ0の矩形になる。
pub fn viewport_rect(
    total_lines: usize,
    scroll: &ScrollState,
    geometry: &MinimapGeometry,
) -> Option<PixelRect> {
    if total_lines == 0 {
        return None;
    }

    let x = geometry.margin;
    let width = geometry.inner_width().saturating_sub(1);
    let usable = geometry.usable_height(total_lines);
    if usable == 0 {
        return Some(PixelRect::new(x, 0, width, 0));
    }

    let usable_f = usable as f64;
    let mut y = (scroll.top_ratio() * usable_f).round() as u32;
    let height = ((scroll.height_ratio() * usable_f).round() as u32)
        .max(MIN_INDICATOR_HEIGHT)
        .min(usable);

    if y.saturating_add(height) > usable {
        y = usable - height;
    }

    log::trace!(
        "viewport rect y={} h={} usable={} scroll={:?}",
        y,
        height,
        usable,
        scroll
    );

    Some(PixelRect::new(x, y, width, height))
}

/// ミニマップ上のY座標に対応するスクロール位置
///
/// `center` が真ならポインタがビューポートの中央に来るよう、
/// 半分の高さを引いてから変換する。
pub fn scroll_command_for_y(
    y: f64,
    total_lines: usize,
    scroll: &ScrollState,
    geometry: &MinimapGeometry,
    center: bool,
) -> Option<ScrollCommand> {
    let usable = geometry.usable_height(total_lines);
    if usable == 0 {
        return None;
    }

    let mut target = if y.is_finite() { y } else { 0.0 };
    if center {
        let half = viewport_rect(total_lines, scroll, geometry)
            .map(|rect| rect.height as f64 / 2.0)
            .unwrap_or(0.0);
        target -= half;
    }

    let usable_f = usable as f64;
    let ratio = target.clamp(0.0, usable_f) / usable_f;
    let raw = (ratio * scroll.total as f64).round() as u64;
    let position = scroll.clamp_position(raw);

    log::trace!(
        "pointer y={:.1} -> ratio={:.4} position={} (raw {})",
        y,
        ratio,
        position,
        raw
    );

    Some(ScrollCommand { position })
}
