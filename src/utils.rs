//! 包含一些工具函数的模块。

use regex::Regex;
use std::sync::LazyLock;

/// 匹配单词首尾不属于 `[\w'*@$]` 的字符
static EDGE_PUNCTUATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\w'*@$]+|[^\w'*@$]+$").expect("未能编译 EDGE_PUNCTUATION_REGEX")
});

/// 去掉单词首尾的标点。
///
/// 撇号、`*`、`@`、`$` 会被保留，因为它们常出现在缩写和打码的脏词里。
/// 如果整个单词都是标点，返回空字符串。
pub fn clean_token(token: &str) -> String {
    EDGE_PUNCTUATION_REGEX.replace_all(token, "").into_owned()
}

/// 将秒数四舍五入到毫秒精度。
pub fn round_to_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

/// 两个文本是否在忽略大小写时相同
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_token_strips_edges_only() {
        assert_eq!(clean_token("(fee),"), "fee");
        assert_eq!(clean_token("don't"), "don't");
        assert_eq!(clean_token("\"f*ck!\""), "f*ck");
        assert_eq!(clean_token("$hit"), "$hit");
        assert_eq!(clean_token("rock-n-roll"), "rock-n-roll");
    }

    #[test]
    fn test_clean_token_all_punctuation_becomes_empty() {
        assert_eq!(clean_token("--"), "");
        assert_eq!(clean_token("..."), "");
    }

    #[test]
    fn test_round_to_millis() {
        assert_eq!(round_to_millis(5.4750000001), 5.475);
        assert_eq!(round_to_millis(13.8249999), 13.825);
    }

    #[test]
    fn test_eq_ignore_case_handles_unicode() {
        assert!(eq_ignore_case("Damn", "dAMN"));
        assert!(eq_ignore_case("ÉTÉ", "été"));
        assert!(!eq_ignore_case("damn", "dam"));
    }
}
