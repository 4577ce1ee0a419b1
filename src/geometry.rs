//! ミニマップの寸法と行マッピング
//!
//! 描画・ビューポート計算・ポインタ変換はすべてここの関数を共有する。
//! 縦方向の基準（使用可能高さ、間引きの分母）がずれるとインジケータが内容から
//! ずれていくため、計算をこのモジュール以外に重複させないこと。

/// ミニマップのピクセル座標上の矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// ミニマップの寸法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimapGeometry {
    pub width: u32,
    pub height: u32,
    /// 1行あたりのピクセル高さ
    pub line_height: u32,
    /// 左右の余白
    pub margin: u32,
}

impl MinimapGeometry {
    pub fn new(width: u32, height: u32, line_height: u32, margin: u32) -> Self {
        Self {
            width,
            height,
            line_height,
            margin,
        }
    }

    /// キャンバスに収まる行数 `floor(height / line_height)`
    pub fn rows(&self) -> usize {
        if self.line_height == 0 {
            0
        } else {
            (self.height / self.line_height) as usize
        }
    }

    /// 左右の余白を除いた幅
    pub fn inner_width(&self) -> u32 {
        self.width.saturating_sub(self.margin.saturating_mul(2))
    }

    /// 実際にドキュメント行を描く行数
    pub fn content_rows(&self, total_lines: usize) -> usize {
        total_lines.min(self.rows())
    }

    /// ドキュメント行が覆う高さ
    ///
    /// ビューポート矩形とポインタ変換の縦方向の基準。
    pub fn usable_height(&self, total_lines: usize) -> u32 {
        self.content_rows(total_lines) as u32 * self.line_height
    }

    /// 行 `row` の上端
    pub fn row_top(&self, row: usize) -> u32 {
        row as u32 * self.line_height
    }

    /// 行 `row` に描くドキュメント行
    pub fn line_index(&self, row: usize, total_lines: usize) -> Option<usize> {
        line_index(row, total_lines, self.rows())
    }
}

/// ミニマップ行からドキュメント行への対応
///
/// * ドキュメントが収まる場合は1対1（`row >= total_lines` は埋め草で `None`）
/// * 収まらない場合は最近傍で間引く: `round(row * (total_lines - 1) / max(1, rows - 1))`
pub fn line_index(row: usize, total_lines: usize, rows: usize) -> Option<usize> {
    if total_lines == 0 || row >= rows {
        return None;
    }

    if total_lines <= rows {
        return (row < total_lines).then_some(row);
    }

    let numerator = row as u128 * (total_lines as u128 - 1);
    let denominator = (rows as u128).saturating_sub(1).max(1);
    let rounded = (numerator * 2 + denominator) / (denominator * 2);
    Some((rounded as usize).min(total_lines - 1))
}
