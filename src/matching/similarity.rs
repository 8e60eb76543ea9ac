//! 字符串相似度算法。
//!
//! 默认使用 Ratcliff/Obershelp（格式塔模式匹配）比率：
//! 贪心地找出两个字符串之间最长的公共连续块，再对左右剩余部分递归，
//! 把所有匹配块的字符数累加为 `M`，最终得分为 `2M / (len(a) + len(b))`。

use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;
use strum_macros::EnumString;

use crate::matching::normalizer::normalize_word;

/// 可选的相似度度量。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SimilarityMetric {
    /// 最长公共块比率。
    #[default]
    Gestalt,
    /// 归一化的 Levenshtein 距离（`1 - 距离 / 最长长度`）。
    Levenshtein,
}

impl SimilarityMetric {
    /// 用当前度量计算两个字符串的相似度，范围 [0, 1]。
    #[must_use]
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::Gestalt => similarity(a, b),
            SimilarityMetric::Levenshtein => normalized_levenshtein(a, b),
        }
    }
}

/// 计算两个字符串的格式塔相似度。
///
/// 只有完全相同时才返回 1.0；两个空串视为相同。
/// 最长块的选取在平局时偏向更早出现的位置，这会让个别输入在交换参数后得到不同的 `M`，
/// 所以这里取两个方向中较大的一个，保证结果对称。
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 1.0;
    }

    let matched =
        matching_char_count(&a_chars, &b_chars).max(matching_char_count(&b_chars, &a_chars));
    2.0 * matched as f64 / total as f64
}

/// 计算两个单词的相似度。
///
/// 对两个单词的每一个规范化变体（统一转为小写）两两打分，返回最高分。
#[must_use]
pub fn compute_word_similarity(word1: &str, word2: &str, metric: SimilarityMetric) -> f64 {
    let variants1: Vec<String> = normalize_word(word1)
        .iter()
        .map(|v| v.to_lowercase())
        .collect();
    let variants2: Vec<String> = normalize_word(word2)
        .iter()
        .map(|v| v.to_lowercase())
        .collect();

    let mut best_score: f64 = 0.0;
    for v1 in &variants1 {
        for v2 in &variants2 {
            best_score = best_score.max(metric.score(v1, v2));
        }
    }
    best_score
}

/// 递归累加所有匹配块的字符数。
fn matching_char_count(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = find_longest_match(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_char_count(&a[..i], &b[..j])
        + matching_char_count(&a[i + size..], &b[j + size..])
}

/// 找出 `a` 和 `b` 的最长公共连续块，返回 `(a 中起点, b 中起点, 长度)`。
///
/// 有多个等长块时，返回在 `a` 中最早开始的；再有平局时返回在 `b` 中最早开始的。
fn find_longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (0, 0, 0);
    // curr[j + 1] 表示以 a[i] 和 b[j] 结尾的公共块长度
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        for (j, b_char) in b.iter().enumerate() {
            curr[j + 1] = if a_char == b_char { prev[j] + 1 } else { 0 };
            let size = curr[j + 1];
            if size > best_size {
                best_i = i + 1 - size;
                best_j = j + 1 - size;
                best_size = size;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(similarity("charge", "charge"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_known_ratios() {
        // "fee" 整体包含在 "feed" 中: 2 * 3 / 7
        assert!(approx_eq(similarity("feed", "fee"), 6.0 / 7.0));
        // 只有 "e" 能匹配上
        assert!(approx_eq(similarity("feed", "them"), 2.0 / 8.0));
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_recursion_collects_blocks_on_both_sides() {
        // 最长块 "bcd"，左边 "a" 对 "a"，右边 "e" 对 "e"
        assert_eq!(similarity("abcde", "axbcdye"), 2.0 * 5.0 / 12.0);
    }

    #[test]
    fn test_order_sensitive() {
        assert!(similarity("abcd", "dcba") < 1.0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("feed", "fee"),
            ("hos", "house"),
            ("abab", "baba"),
            ("charge", "chatter"),
            ("tide", "diet"),
            ("ächtung", "achtung"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn test_symmetry_over_all_short_binary_strings() {
        let mut strings = Vec::new();
        for len in 0..=4 {
            for bits in 0..(1u32 << len) {
                let s: String = (0..len)
                    .map(|i| if (bits >> i) & 1 == 1 { 'b' } else { 'a' })
                    .collect();
                strings.push(s);
            }
        }
        assert_eq!(strings.len(), 31);

        for a in &strings {
            for b in &strings {
                let forward = similarity(a, b);
                assert_eq!(forward, similarity(b, a), "'{a}' / '{b}'");
                assert!((0.0..=1.0).contains(&forward));
                assert_eq!(forward == 1.0, a == b, "'{a}' / '{b}'");
            }
        }
    }

    #[test]
    fn test_word_similarity_uses_lowercase_variants() {
        let metric = SimilarityMetric::Gestalt;
        assert_eq!(compute_word_similarity("Fee,", "fee", metric), 1.0);
        assert_eq!(compute_word_similarity("DON'T", "dont", metric), 1.0);
        assert!(approx_eq(
            compute_word_similarity("feed", "fee", metric),
            6.0 / 7.0
        ));
    }

    #[test]
    fn test_levenshtein_metric() {
        let metric = SimilarityMetric::Levenshtein;
        assert_eq!(metric.score("feed", "feed"), 1.0);
        assert!(approx_eq(metric.score("feed", "fee"), 0.75));
        assert_eq!(compute_word_similarity("Feed!", "feed", metric), 1.0);
    }
}
