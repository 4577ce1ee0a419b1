//! 設定
//!
//! ミニマップの寸法・幅の上下限・配色。モジュールレベルの可変状態は持たず、
//! 構築時にこの構造体を渡す。JSON ファイルから読み込める（全フィールド省略可）。

use crate::color::Rgba;
use crate::error::{ConfigError, Result};
use crate::geometry::MinimapGeometry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 配色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// キャンバス背景
    pub background: Rgba,
    /// スタイルランのない文字
    pub text: Rgba,
    /// 空行と埋め草の行
    pub placeholder: Rgba,
    /// ビューポートの塗り（半透明）
    pub viewport_fill: Rgba,
    /// ビューポートの枠線
    pub viewport_border: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(30, 30, 30),
            text: Rgba::rgb(212, 212, 212),
            placeholder: Rgba::rgb(56, 56, 56),
            viewport_fill: Rgba::rgba(255, 255, 255, 30),
            viewport_border: Rgba::rgb(100, 100, 100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// 初期幅
    pub width: u32,
    pub min_width: u32,
    pub max_width: u32,
    /// 1行あたりのピクセル高さ
    pub line_height: u32,
    /// 左右の余白
    pub margin: u32,
    /// ドラッグ時にポインタをビューポート中央に合わせる
    pub center_on_pointer: bool,
    /// ホイール1ノッチあたりのスクロール行数
    pub wheel_lines: u64,
    pub palette: Palette,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            width: 120,
            min_width: 60,
            max_width: 240,
            line_height: 2,
            margin: 5,
            center_on_pointer: true,
            wheel_lines: 3,
            palette: Palette::default(),
        }
    }
}

impl MinimapConfig {
    /// 端末向けプリセット（1セル = 1ピクセル）
    pub fn for_terminal() -> Self {
        Self {
            width: 20,
            min_width: 8,
            max_width: 40,
            line_height: 1,
            margin: 1,
            ..Self::default()
        }
    }

    /// JSON 文字列から読み込んで検証する
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(source).map_err(|err| ConfigError::InvalidFile {
                path: "<inline>".to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// ファイルから読み込んで検証する
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|err| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let config: Self =
            serde_json::from_str(&source).map_err(|err| ConfigError::InvalidFile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        log::debug!("loaded minimap config from {}", path.display());
        Ok(config)
    }

    /// 既定の設定ファイルの場所（`<config_dir>/codemap/minimap.json`）
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("codemap").join("minimap.json"))
    }

    /// 既定の場所にファイルがあれば読み込み、なければ `fallback` を返す
    ///
    /// 読み込みに失敗した場合も警告を出して `fallback` を使う。
    pub fn load_or(fallback: Self) -> Self {
        let Some(path) = Self::default_path() else {
            return fallback;
        };
        if !path.exists() {
            return fallback;
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring {}: {}", path.display(), err);
                fallback
            }
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.line_height == 0 {
            return Err(invalid("line_height", self.line_height));
        }
        if self.min_width > self.max_width {
            return Err(invalid(
                "min_width",
                format!("{} > max_width {}", self.min_width, self.max_width),
            ));
        }
        if self.width < self.min_width || self.width > self.max_width {
            return Err(invalid(
                "width",
                format!("{} outside {}..={}", self.width, self.min_width, self.max_width),
            ));
        }
        if self.margin.saturating_mul(2) >= self.min_width.max(1) {
            return Err(invalid("margin", self.margin));
        }
        Ok(())
    }

    /// 幅を上下限に収める
    pub fn clamp_width(&self, width: u32) -> u32 {
        width.clamp(self.min_width, self.max_width)
    }

    /// 指定サイズのジオメトリを作る（幅は上下限に収める）
    pub fn geometry(&self, width: u32, height: u32) -> MinimapGeometry {
        MinimapGeometry::new(
            self.clamp_width(width),
            height,
            self.line_height,
            self.margin,
        )
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodemapError;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(MinimapConfig::default().validate().is_ok());
        assert!(MinimapConfig::for_terminal().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MinimapConfig::from_json_str(
            r##"{ "line_height": 3, "palette": { "background": "#000000" } }"##,
        )
        .unwrap();
        assert_eq!(config.line_height, 3);
        assert_eq!(config.margin, 5);
        assert_eq!(config.palette.background, Rgba::rgb(0, 0, 0));
        assert_eq!(config.palette.text, Palette::default().text);
    }

    #[test]
    fn zero_line_height_is_rejected() {
        let err = MinimapConfig::from_json_str(r#"{ "line_height": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            CodemapError::Config(ConfigError::InvalidValue { ref key, .. }) if key == "line_height"
        ));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config = MinimapConfig {
            min_width: 200,
            max_width: 100,
            ..MinimapConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_color_is_a_file_error() {
        let err =
            MinimapConfig::from_json_str(r#"{ "palette": { "text": "white" } }"#).unwrap_err();
        assert!(matches!(
            err,
            CodemapError::Config(ConfigError::InvalidFile { .. })
        ));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "width": 100, "center_on_pointer": false }}"#).unwrap();
        let config = MinimapConfig::load(file.path()).unwrap();
        assert_eq!(config.width, 100);
        assert!(!config.center_on_pointer);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MinimapConfig::load(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn geometry_clamps_width() {
        let config = MinimapConfig::default();
        assert_eq!(config.geometry(10, 100).width, 60);
        assert_eq!(config.geometry(1000, 100).width, 240);
        assert_eq!(config.geometry(150, 100).width, 150);
    }
}
