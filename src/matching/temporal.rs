//! 时间窗口内的歌词匹配与纠正策略。

use crate::{
    config::ReconcileOptions,
    matching::similarity::compute_word_similarity,
    model::{lyrics::EstimatedLyricWord, word::WordRecord},
    utils::eq_ignore_case,
};

/// 低于此识别置信度的单词被视为不可信，只需一般的相似度即可纠正
const LOW_CONFIDENCE: f64 = 0.5;

/// 低于此识别置信度的单词被视为中等可信
const MEDIUM_CONFIDENCE: f64 = 0.7;

/// 纠正低置信度单词所需的最低相似度
const LOW_CONFIDENCE_MIN_SIMILARITY: f64 = 0.60;

/// 纠正高置信度单词所需的最低相似度（与阈值同时生效）
const HIGH_CONFIDENCE_MIN_SIMILARITY: f64 = 0.90;

/// 一个被接受的歌词匹配。
#[derive(Debug, Clone, PartialEq)]
pub struct LyricMatch<'a> {
    /// 匹配到的歌词单词。
    pub text: &'a str,
    /// 相似度得分。
    pub score: f64,
}

/// 在转录单词开始时间前后的时间窗口内寻找最相似的歌词单词。
///
/// 估算开始时间落在 `[start - 窗口, start + 窗口]` 内的歌词单词才会被考虑；
/// 字符数相差超过 `max_length_diff` 的候选直接跳过。
/// 只有得分严格更高的候选才会替换当前最佳，因此平局时保留歌词顺序中先出现的那个。
/// 最佳得分低于 `min_match_similarity` 时返回 `None`。
pub fn find_best_match<'a>(
    word: &WordRecord,
    lyric_words: &'a [EstimatedLyricWord],
    options: &ReconcileOptions,
) -> Option<LyricMatch<'a>> {
    let window_start = word.start_sec - options.match_window_secs;
    let window_end = word.start_sec + options.match_window_secs;
    let word_len = word.text.chars().count();

    let mut best: Option<LyricMatch<'a>> = None;
    for lyric in lyric_words {
        if lyric.start_sec < window_start || lyric.start_sec > window_end {
            continue;
        }
        if word_len.abs_diff(lyric.text.chars().count()) > options.max_length_diff {
            continue;
        }

        let score = compute_word_similarity(&word.text, &lyric.text, options.similarity_metric);
        let best_score = best.as_ref().map_or(0.0, |m| m.score);
        if score > best_score && score >= options.min_match_similarity {
            best = Some(LyricMatch {
                text: &lyric.text,
                score,
            });
        }
    }
    best
}

/// 判断是否应该用歌词单词覆盖转录单词。
///
/// 两者忽略大小写相同时永远不纠正。否则根据识别置信度 `confidence` 分三档：
/// - 低于 0.5：相似度达到 0.60 即纠正；
/// - 低于 0.7：相似度达到 `threshold` 才纠正；
/// - 其余：相似度须同时达到 `threshold` 和 0.90。
///
/// 引擎越信任自己的转录，覆盖它所需的歌词匹配就越强。
pub fn should_correct(
    transcribed: &str,
    lyric: &str,
    confidence: f64,
    similarity: f64,
    threshold: f64,
) -> bool {
    if eq_ignore_case(transcribed, lyric) {
        return false;
    }

    if confidence < LOW_CONFIDENCE {
        similarity >= LOW_CONFIDENCE_MIN_SIMILARITY
    } else if confidence < MEDIUM_CONFIDENCE {
        similarity >= threshold
    } else {
        similarity >= threshold && similarity >= HIGH_CONFIDENCE_MIN_SIMILARITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lyric(text: &str, start_sec: f64) -> EstimatedLyricWord {
        EstimatedLyricWord {
            text: text.to_string(),
            start_sec,
            end_sec: start_sec + 0.35,
            line_index: 0,
        }
    }

    #[test]
    fn test_best_match_within_window() {
        let lyrics = vec![lyric("fee", 14.5), lyric("feed", 30.0)];
        let word = WordRecord::new("feet", 14.2, 14.6, 0.4);

        let found = find_best_match(&word, &lyrics, &ReconcileOptions::default()).unwrap();
        assert_eq!(found.text, "fee");
        assert!((found.score - 6.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let lyrics = vec![lyric("fee", 15.0)];
        let word = WordRecord::new("fee", 10.0, 10.3, 0.4);
        assert!(find_best_match(&word, &lyrics, &ReconcileOptions::default()).is_some());

        let lyrics = vec![lyric("fee", 15.01)];
        assert!(find_best_match(&word, &lyrics, &ReconcileOptions::default()).is_none());
    }

    #[test]
    fn test_length_difference_filter() {
        // 字符数相差 6，超过上限 3
        let lyrics = vec![lyric("intoxicated", 1.0)];
        let word = WordRecord::new("intox", 1.0, 1.2, 0.3);
        assert!(find_best_match(&word, &lyrics, &ReconcileOptions::default()).is_none());
    }

    #[test]
    fn test_below_minimum_similarity_is_rejected() {
        let lyrics = vec![lyric("chatter", 1.0)];
        let word = WordRecord::new("hello", 1.0, 1.2, 0.3);
        // 只有 "h" 和 "e" 能匹配: 2 * 2 / 12 < 0.6
        assert!(find_best_match(&word, &lyrics, &ReconcileOptions::default()).is_none());
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let lyrics = vec![lyric("bat", 1.0), lyric("cat", 1.5)];
        let word = WordRecord::new("at", 1.0, 1.2, 0.3);
        let found = find_best_match(&word, &lyrics, &ReconcileOptions::default()).unwrap();
        assert_eq!(found.text, "bat");
    }

    #[test]
    fn test_should_correct_never_replaces_equal_text() {
        assert!(!should_correct("hos", "hos", 0.1, 1.0, 0.85));
        assert!(!should_correct("Hos", "hOS", 0.1, 1.0, 0.85));
    }

    #[test]
    fn test_should_correct_decision_matrix() {
        // 低置信度
        assert!(should_correct("feed", "fee", 0.49, 0.60, 0.85));
        assert!(!should_correct("feed", "fee", 0.49, 0.59, 0.85));
        // 中等置信度
        assert!(should_correct("feed", "fee", 0.5, 0.85, 0.85));
        assert!(!should_correct("feed", "fee", 0.69, 0.84, 0.85));
        // 高置信度需要同时达到 0.90
        assert!(!should_correct("feed", "fee", 0.7, 0.89, 0.85));
        assert!(should_correct("feed", "fee", 0.95, 0.90, 0.85));
        assert!(!should_correct("feed", "fee", 0.95, 0.92, 0.95));
    }
}
