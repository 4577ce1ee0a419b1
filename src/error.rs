//! エラーハンドリング
//!
//! codemap 全体で使用されるエラー型を定義する。
//! 座標変換そのものは失敗しない（すべてクランプで解決する）ため、
//! エラーになるのは設定・ハイライト規則・端末操作のみ。

use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum CodemapError {
    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// シンタックスハイライトエラー
    #[error("Highlight rule error")]
    Highlight(#[from] HighlightError),

    /// UI操作エラー
    #[error("UI operation failed")]
    Ui(#[from] UiError),

    /// 入出力エラー
    #[error("IO error: {message}")]
    Io { message: String },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid color: {value}")]
    InvalidColor { value: String },
}

/// ハイライト規則固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("Invalid pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Unknown language: {name}")]
    UnknownLanguage { name: String },
}

/// UI操作固有のエラー
#[derive(Error, Debug, Clone)]
pub enum UiError {
    #[error("Terminal initialization failed: {message}")]
    TerminalInit { message: String },

    #[error("Rendering failed: {component}")]
    RenderingFailed { component: String },
}

impl From<std::io::Error> for CodemapError {
    fn from(error: std::io::Error) -> Self {
        CodemapError::Io {
            message: error.to_string(),
        }
    }
}

/// 標準Result型のエイリアス
pub type Result<T> = std::result::Result<T, CodemapError>;

/// パニック時に端末を復元してから詳細を出力する
///
/// raw mode のまま異常終了すると端末が使えなくなるため、
/// フック内で端末状態を戻してからメッセージを表示する。
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        crate::frontend::restore_terminal();

        let location = panic_info
            .location()
            .unwrap_or_else(|| std::panic::Location::caller());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        eprintln!("PANIC at {}:{}: {}", location.file(), location.line(), message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}
