//! 单词规范化。
//!
//! 把一个原始单词展开成一组规范化变体，脏词查询和相似度计算都基于这组变体，
//! 这样缩写、打码符号和句尾标点都不会让匹配失败。

use regex::Regex;
use std::sync::LazyLock;

/// 匹配单词末尾的标点（撇号除外）
static TRAILING_PUNCTUATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w'\s]+$").expect("未能编译 TRAILING_PUNCTUATION_REGEX")
});

/// 匹配所有非单词字符
static NON_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("未能编译 NON_WORD_REGEX"));

/// 生成单词的规范化变体。
///
/// 变体按以下顺序生成并去重，空结果会被丢弃：
/// 1. 原词及其小写；
/// 2. 去掉末尾标点（保留撇号）后的词及其小写；
/// 3. 去掉所有非单词字符后的词及其小写；
/// 4. 只去掉一个末尾撇号后的词及其小写。
///
/// 对于非空输入，返回的列表至少包含原词本身。
pub fn normalize_word(word: &str) -> Vec<String> {
    let trailing_stripped = TRAILING_PUNCTUATION_REGEX.replace(word, "");
    let word_chars_only = NON_WORD_REGEX.replace_all(word, "");
    let apostrophe_stripped = word.strip_suffix('\'').unwrap_or(word);

    let candidates = [
        word.to_string(),
        word.to_lowercase(),
        trailing_stripped.to_string(),
        trailing_stripped.to_lowercase(),
        word_chars_only.to_string(),
        word_chars_only.to_lowercase(),
        apostrophe_stripped.to_string(),
        apostrophe_stripped.to_lowercase(),
    ];

    let mut variants: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lowercase_word_has_single_variant() {
        assert_eq!(normalize_word("fee"), vec!["fee"]);
    }

    #[test]
    fn test_variants_keep_insertion_order_and_dedupe() {
        assert_eq!(normalize_word("Damn!"), vec!["Damn!", "damn!", "Damn", "damn"]);
    }

    #[test]
    fn test_contraction_keeps_apostrophe_in_trailing_variant() {
        let variants = normalize_word("Don't,");
        assert!(variants.contains(&"Don't".to_string()));
        assert!(variants.contains(&"don't".to_string()));
        assert!(variants.contains(&"dont".to_string()));
    }

    #[test]
    fn test_trailing_apostrophe_is_dropped_in_last_variants() {
        let variants = normalize_word("fuckin'");
        assert!(variants.contains(&"fuckin'".to_string()));
        assert!(variants.contains(&"fuckin".to_string()));
    }

    #[test]
    fn test_censor_marks_are_removed_in_word_only_variant() {
        let variants = normalize_word("f*ck");
        assert_eq!(variants, vec!["f*ck", "fck"]);
    }

    #[test]
    fn test_pure_punctuation_keeps_original() {
        assert_eq!(normalize_word("?!"), vec!["?!"]);
    }
}
