//! シンタックスハイライト
//!
//! 正規表現の規則で1行ずつスタイルランを作る。規則は順に適用され、後の規則が
//! 前の規則の色を上書きする。三重引用符のような複数行にまたがる区間は
//! ブロック状態（前の行から渡される整数）で引き継ぐ。

use crate::color::Rgba;
use crate::document::StyleRun;
use crate::error::{HighlightError, Result};
use regex::Regex;
use std::path::Path;

/// 複数行区間の外にいることを表すブロック状態
pub const STATE_NORMAL: u32 = 0;

/// 組み込み言語の配色
pub mod palette {
    use crate::color::Rgba;

    pub const KEYWORD: Rgba = Rgba::rgb(0, 255, 255);
    pub const OPERATOR: Rgba = Rgba::rgb(255, 255, 255);
    pub const BRACE: Rgba = Rgba::rgb(255, 165, 0);
    pub const DEFINITION: Rgba = Rgba::rgb(144, 238, 144);
    pub const STRING: Rgba = Rgba::rgb(128, 128, 128);
    pub const COMMENT: Rgba = Rgba::rgb(0, 100, 0);
    pub const SELF: Rgba = Rgba::rgb(255, 165, 0);
    pub const NUMBER: Rgba = Rgba::rgb(255, 0, 255);
    pub const JSON_NUMBER: Rgba = Rgba::rgb(0, 0, 255);
    pub const JSON_VALUE: Rgba = Rgba::rgb(0, 100, 0);
}

/// 1つのハイライト規則
#[derive(Debug, Clone)]
pub struct HighlightRule {
    pattern: Regex,
    group: usize,
    color: Rgba,
    string_literal: bool,
}

impl HighlightRule {
    /// `group` はハイライトするキャプチャ番号（0 = マッチ全体）
    pub fn new(pattern: &str, group: usize, color: Rgba) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|err| HighlightError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            pattern: compiled,
            group,
            color,
            string_literal: false,
        })
    }

    /// 1行文字列リテラルの規則として扱う
    ///
    /// この規則のマッチ内部に現れる複数行区切りは区切りとして扱わない。
    pub fn as_string_literal(mut self) -> Self {
        self.string_literal = true;
        self
    }

    pub fn color(&self) -> Rgba {
        self.color
    }
}

/// 複数行にまたがる区間の区切り
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultilineDelimiter {
    pub delimiter: String,
    /// 区間内にいる間のブロック状態（0 以外）
    pub state: u32,
    pub color: Rgba,
}

/// 規則の集合
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter {
    name: String,
    rules: Vec<HighlightRule>,
    multiline: Vec<MultilineDelimiter>,
}

impl SyntaxHighlighter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            multiline: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: HighlightRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_multiline(mut self, delimiter: &str, state: u32, color: Rgba) -> Self {
        self.multiline.push(MultilineDelimiter {
            delimiter: delimiter.to_string(),
            state,
            color,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// 規則なし
    pub fn plain() -> Self {
        Self::new("plain")
    }

    pub fn python() -> Result<Self> {
        const KEYWORDS: &[&str] = &[
            "and", "assert", "break", "class", "continue", "def", "del", "elif", "else",
            "except", "exec", "finally", "for", "from", "global", "if", "import", "in", "is",
            "lambda", "not", "or", "pass", "print", "raise", "return", "try", "while", "yield",
            "None", "True", "False",
        ];

        let keywords = format!(r"\b(?:{})\b", KEYWORDS.join("|"));
        let highlighter = Self::new("python")
            .with_rule(HighlightRule::new(&keywords, 0, palette::KEYWORD)?)
            .with_rule(HighlightRule::new(
                r"==|!=|<=|>=|<<|>>|\*\*|//|\+=|-=|\*=|/=|%=|[=<>+\-*/%^|&~]",
                0,
                palette::OPERATOR,
            )?)
            .with_rule(HighlightRule::new(r"[{}()\[\]]", 0, palette::BRACE)?)
            .with_rule(HighlightRule::new(r"\bself\b", 0, palette::SELF)?)
            .with_rule(HighlightRule::new(r"\bdef\b\s*(\w+)", 1, palette::DEFINITION)?)
            .with_rule(HighlightRule::new(r"\bclass\b\s*(\w+)", 1, palette::DEFINITION)?)
            .with_rule(HighlightRule::new(r"\b[+-]?[0-9]+[lL]?\b", 0, palette::NUMBER)?)
            .with_rule(HighlightRule::new(
                r"\b[+-]?0[xX][0-9A-Fa-f]+[lL]?\b",
                0,
                palette::NUMBER,
            )?)
            .with_rule(HighlightRule::new(
                r"\b[+-]?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?\b",
                0,
                palette::NUMBER,
            )?)
            .with_rule(
                HighlightRule::new(r#""[^"\\]*(\\.[^"\\]*)*""#, 0, palette::STRING)?
                    .as_string_literal(),
            )
            .with_rule(
                HighlightRule::new(r"'[^'\\]*(\\.[^'\\]*)*'", 0, palette::STRING)?
                    .as_string_literal(),
            )
            .with_rule(HighlightRule::new(r"#[^\n]*", 0, palette::COMMENT)?)
            .with_multiline("'''", 1, palette::STRING)
            .with_multiline("\"\"\"", 2, palette::STRING);
        Ok(highlighter)
    }

    pub fn json() -> Result<Self> {
        let highlighter = Self::new("json")
            .with_rule(HighlightRule::new(
                r"(?:^|[\s:,\[])(-?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)",
                1,
                palette::JSON_NUMBER,
            )?)
            .with_rule(HighlightRule::new(r#":\s*("[^"]*")"#, 1, palette::JSON_VALUE)?);
        Ok(highlighter)
    }

    /// 言語名から組み込みのハイライタを選ぶ
    pub fn for_language(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "python" | "py" => Self::python(),
            "json" => Self::json(),
            "plain" | "text" | "txt" => Ok(Self::plain()),
            _ => Err(HighlightError::UnknownLanguage {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// 拡張子から組み込みのハイライタを選ぶ（不明な場合は規則なし）
    pub fn for_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("py") | Some("pyw") => Self::python(),
            Some("json") => Self::json(),
            _ => Ok(Self::plain()),
        }
    }

    /// 1行をハイライトする
    ///
    /// `previous_state` は前の行の戻り値（先頭行は [`STATE_NORMAL`]）。
    /// 戻り値はスタイルラン（文字単位のオフセット）と次の行に渡す状態。
    pub fn highlight_line(&self, text: &str, previous_state: u32) -> (Vec<StyleRun>, u32) {
        let mut canvas = LineCanvas::new(text);

        let protected = self.delimiters_inside_strings(text);

        for rule in &self.rules {
            for caps in rule.pattern.captures_iter(text) {
                let matched = caps
                    .get(rule.group)
                    .filter(|m| !m.is_empty())
                    .or_else(|| caps.get(0).filter(|m| !m.is_empty()));
                let Some(matched) = matched else {
                    continue;
                };
                if protected.contains(&matched.start()) {
                    continue;
                }
                canvas.paint(matched.start(), matched.end(), rule.color);
            }
        }

        let mut state = STATE_NORMAL;
        for delimiter in &self.multiline {
            let next = match_multiline(text, delimiter, previous_state, &protected, &mut canvas);
            if next == delimiter.state {
                state = next;
                break;
            }
        }

        (canvas.into_runs(), state)
    }

    /// 1行文字列リテラルの内部にある複数行区切りの開始位置（バイト）
    fn delimiters_inside_strings(&self, text: &str) -> Vec<usize> {
        let mut positions = Vec::new();
        if self.multiline.is_empty() {
            return positions;
        }

        for rule in self.rules.iter().filter(|rule| rule.string_literal) {
            for found in rule.pattern.find_iter(text) {
                let inner = &text[found.start()..found.end()];
                for delimiter in &self.multiline {
                    positions.extend(
                        inner
                            .match_indices(delimiter.delimiter.as_str())
                            .filter(|(offset, _)| *offset > 0)
                            .map(|(offset, _)| found.start() + offset),
                    );
                }
            }
        }
        positions
    }
}

/// 複数行区間を塗る。戻り値は行末時点のブロック状態。
fn match_multiline(
    text: &str,
    delimiter: &MultilineDelimiter,
    previous_state: u32,
    protected: &[usize],
    canvas: &mut LineCanvas,
) -> u32 {
    let token = delimiter.delimiter.as_str();
    let token_len = token.len();

    let (mut start, mut skip) = if previous_state == delimiter.state {
        (Some(0), 0)
    } else {
        match find_opening(text, 0, token, protected) {
            Some(pos) => (Some(pos), token_len),
            None => (None, 0),
        }
    };

    let mut state = STATE_NORMAL;
    while let Some(begin) = start {
        let search_from = begin + skip;
        let end = match text[search_from..].find(token) {
            Some(rel) => {
                state = STATE_NORMAL;
                search_from + rel + token_len
            }
            None => {
                state = delimiter.state;
                text.len()
            }
        };

        canvas.paint(begin, end, delimiter.color);

        start = find_opening(text, end, token, protected);
        skip = token_len;
    }
    state
}

/// `from` 以降で文字列リテラルの内部にない最初の区切り
fn find_opening(text: &str, from: usize, token: &str, protected: &[usize]) -> Option<usize> {
    text[from..]
        .match_indices(token)
        .map(|(rel, _)| from + rel)
        .find(|pos| !protected.contains(pos))
}

/// 1行分の文字ごとの色
struct LineCanvas {
    /// バイト位置 → 文字位置
    byte_to_char: Vec<usize>,
    colors: Vec<Option<Rgba>>,
}

impl LineCanvas {
    fn new(text: &str) -> Self {
        let mut byte_to_char = vec![0; text.len() + 1];
        let mut chars = 0;
        for (byte, ch) in text.char_indices() {
            for slot in &mut byte_to_char[byte..byte + ch.len_utf8()] {
                *slot = chars;
            }
            chars += 1;
        }
        byte_to_char[text.len()] = chars;
        Self {
            byte_to_char,
            colors: vec![None; chars],
        }
    }

    fn paint(&mut self, byte_start: usize, byte_end: usize, color: Rgba) {
        let start = self.byte_to_char[byte_start.min(self.byte_to_char.len() - 1)];
        let end = self.byte_to_char[byte_end.min(self.byte_to_char.len() - 1)];
        for slot in &mut self.colors[start..end] {
            *slot = Some(color);
        }
    }

    fn into_runs(self) -> Vec<StyleRun> {
        let mut runs: Vec<StyleRun> = Vec::new();
        for (index, color) in self.colors.into_iter().enumerate() {
            let Some(color) = color else {
                continue;
            };
            match runs.last_mut() {
                Some(last) if last.color == color && last.end() == index => last.length += 1,
                _ => runs.push(StyleRun::new(index, 1, color)),
            }
        }
        runs
    }
}
