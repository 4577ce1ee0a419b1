//! スクロール状態
//!
//! 編集面のスクロールバーに相当する `(position, extent, total)` の三つ組。

/// 現在どこが見えているかを表す三つ組
///
/// * `position` - 表示先頭（スクロール単位）
/// * `extent` - 1画面分の大きさ
/// * `total` - スクロール可能な内容全体の大きさ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    pub position: u64,
    pub extent: u64,
    pub total: u64,
}

impl ScrollState {
    pub fn new(position: u64, extent: u64, total: u64) -> Self {
        Self {
            position,
            extent,
            total,
        }
    }

    pub fn minimum(&self) -> u64 {
        0
    }

    /// 最終ページの先頭位置
    pub fn maximum(&self) -> u64 {
        self.total.saturating_sub(self.extent)
    }

    pub fn clamp_position(&self, position: u64) -> u64 {
        position.clamp(self.minimum(), self.maximum())
    }

    /// 表示先頭の割合（`total == 0` のときは 0）
    pub fn top_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.position as f64 / self.total as f64).clamp(0.0, 1.0)
        }
    }

    /// 表示範囲の割合（`total == 0` のときは全体）
    pub fn height_ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.extent as f64 / self.total as f64).clamp(0.0, 1.0)
        }
    }
}

/// 編集面に発行するスクロール指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCommand {
    pub position: u64,
}
