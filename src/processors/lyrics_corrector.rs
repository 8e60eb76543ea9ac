//! 使用带时间戳的歌词纠正转录单词。

use tracing::{debug, info};

use crate::{
    config::ReconcileOptions,
    matching::temporal::{find_best_match, should_correct},
    model::word::WordRecord,
    parsers::lrc_parser::{estimate_word_timings, parse_synced_lyrics},
};

/// 为每个转录单词在时间窗口内寻找最相似的歌词单词，满足纠正策略时覆盖其文本。
///
/// 被纠正的单词会记录原文本和匹配相似度，来源标记改为 `lyrics_corrected`，时间戳不变。
/// 转录为空或歌词中解析不出任何一行时原样返回。
pub fn correct_with_lyrics(
    mut words: Vec<WordRecord>,
    synced_lyrics: &str,
    options: &ReconcileOptions,
) -> Vec<WordRecord> {
    if words.is_empty() {
        return words;
    }
    let lines = parse_synced_lyrics(synced_lyrics);
    if lines.is_empty() {
        debug!("[LyricsCorrector] 歌词中没有可用的行，跳过纠正。");
        return words;
    }
    let lyric_words = estimate_word_timings(&lines);

    let mut corrected = 0usize;
    for word in &mut words {
        let Some(found) = find_best_match(word, &lyric_words, options) else {
            continue;
        };
        if !should_correct(
            &word.text,
            found.text,
            word.confidence,
            found.score,
            options.correction_threshold,
        ) {
            continue;
        }

        info!(
            "[LyricsCorrector] 已纠正 '{}' -> '{}' (置信度 {:.2}, 相似度 {:.2})",
            word.text, found.text, word.confidence, found.score
        );
        word.apply_correction(found.text, found.score);
        corrected += 1;
    }

    debug!("[LyricsCorrector] 共纠正 {} 个单词。", corrected);
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::word::DetectionSource;
    use tracing_test::traced_test;

    const LYRICS: &str = "[00:12.50] Charge them hos a fee\n[00:15.00] I don't get into the chatter";

    #[test]
    fn test_empty_lyrics_leave_words_unchanged() {
        let words = vec![WordRecord::new("feed", 14.2, 14.6, 0.55)];
        let options = ReconcileOptions::default();

        assert_eq!(correct_with_lyrics(words.clone(), "", &options), words);
        assert_eq!(
            correct_with_lyrics(words.clone(), "[ar:Nobody]\nno timestamps", &options),
            words
        );
    }

    #[test]
    fn test_empty_transcript_stays_empty() {
        let corrected = correct_with_lyrics(Vec::new(), LYRICS, &ReconcileOptions::default());
        assert!(corrected.is_empty());
    }

    #[test]
    fn test_exact_word_is_not_corrected() {
        let words = vec![WordRecord::new("hos", 14.2, 14.6, 0.55)];
        let corrected = correct_with_lyrics(words.clone(), LYRICS, &ReconcileOptions::default());
        assert_eq!(corrected, words);
    }

    #[test]
    fn test_medium_confidence_correction_depends_on_threshold() {
        let words = vec![WordRecord::new("feed", 14.2, 14.6, 0.55)];

        let corrected = correct_with_lyrics(words.clone(), LYRICS, &ReconcileOptions::default());
        assert_eq!(corrected[0].text, "fee");
        assert_eq!(corrected[0].original_text.as_deref(), Some("feed"));
        assert_eq!(
            corrected[0].detection_source,
            DetectionSource::LyricsCorrected
        );
        let score = corrected[0].correction_confidence.unwrap();
        assert!((score - 6.0 / 7.0).abs() < 1e-9);
        assert_eq!(corrected[0].start_sec, 14.2);
        assert_eq!(corrected[0].end_sec, 14.6);

        let strict = ReconcileOptions {
            correction_threshold: 0.9,
            ..Default::default()
        };
        let untouched = correct_with_lyrics(words.clone(), LYRICS, &strict);
        assert_eq!(untouched, words);
    }

    #[test]
    fn test_high_confidence_words_need_strong_match() {
        let words = vec![WordRecord::new("feed", 14.2, 14.6, 0.95)];
        let corrected = correct_with_lyrics(words.clone(), LYRICS, &ReconcileOptions::default());
        assert_eq!(corrected, words);
    }

    #[test]
    fn test_running_twice_does_not_double_correct() {
        let words = vec![
            WordRecord::new("Charged", 12.5, 12.9, 0.3),
            WordRecord::new("feed", 14.2, 14.6, 0.55),
        ];
        let options = ReconcileOptions::default();

        let once = correct_with_lyrics(words, LYRICS, &options);
        let twice = correct_with_lyrics(once.clone(), LYRICS, &options);
        assert_eq!(once, twice);
        assert_eq!(once[0].text, "Charge");
        assert_eq!(once[0].original_text.as_deref(), Some("Charged"));
    }

    #[traced_test]
    #[test]
    fn test_correction_is_logged() {
        let words = vec![WordRecord::new("feed", 14.2, 14.6, 0.55)];
        let _ = correct_with_lyrics(words, LYRICS, &ReconcileOptions::default());
        assert!(logs_contain("[LyricsCorrector] 已纠正 'feed' -> 'fee'"));
    }
}
