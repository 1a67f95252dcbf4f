//! 文字格式码清理。

use once_cell::sync::Lazy;
use regex::Regex;

/// `\` + 字母 + 数字 + `;` 形式的 MTEXT 格式码，例如换行对齐 `\A1;`。
static FORMAT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[A-Za-z]\d+;").expect("格式码正则应当有效"));

/// 去除文字中的格式控制码；`None` 视为空字符串。
pub fn normalize_text(text: Option<&str>) -> String {
    match text {
        Some(raw) => FORMAT_CODE.replace_all(raw, "").into_owned(),
        None => String::new(),
    }
}
