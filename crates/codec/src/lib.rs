//! Escaping helpers for embedding file text inside generated TypeScript modules.
//! 將檔案文字嵌入產生之 TypeScript 模組時所需的跳脫工具。
//!
//! Template literals need three substitutions, applied in a fixed order:
//! backslashes first, then backticks, then the `${` interpolation opener.
//! Escaping backslashes first keeps the later steps from being escaped twice.
//! 樣板字串需依序處理反斜線、反引號與 `${`；先處理反斜線才不會重複跳脫。

const BACKSLASH: char = '\\';
const DELIMITER: char = '`';
const SUBSTITUTION_OPEN: &str = "${";

/// 將原始文字轉為可放入樣板字串的內容。 / Escapes raw text for use inside a template literal.
pub fn escape(raw: &str) -> String {
    raw.replace(BACKSLASH, "\\\\")
        .replace(DELIMITER, "\\`")
        .replace(SUBSTITUTION_OPEN, "\\${")
}

/// 還原 [`escape`] 的結果。 / Reverses [`escape`].
///
/// Backslash sequences that [`escape`] never produces are kept verbatim, as is
/// a trailing lone backslash.
pub fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(ch) = chars.next() {
        if ch != BACKSLASH {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(next @ (BACKSLASH | DELIMITER | '$')) => out.push(next),
            Some(other) => {
                out.push(BACKSLASH);
                out.push(other);
            }
            None => out.push(BACKSLASH),
        }
    }
    out
}

/// 以反引號包住跳脫後的文字。 / Renders a complete template literal.
pub fn template_literal(raw: &str) -> String {
    let mut literal = String::with_capacity(raw.len() + 2);
    literal.push(DELIMITER);
    literal.push_str(&escape(raw));
    literal.push(DELIMITER);
    literal
}

/// 產生單引號字串常值。 / Renders a single-quoted string literal.
///
/// Used for object keys, import specifiers and file lists in generated code.
pub fn quote_single(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('\'');
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
