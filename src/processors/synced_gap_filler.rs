//! 利用带时间戳歌词补全转录中遗漏的单词。

use tracing::{debug, info};

use crate::{
    config::ReconcileOptions,
    matching::similarity::compute_word_similarity,
    model::{
        lyrics::EstimatedLyricWord,
        word::{DetectionSource, WordRecord, sort_by_start},
    },
    parsers::lrc_parser::{estimate_line_words, parse_synced_lyrics},
    utils::round_to_millis,
};

/// 从歌词注入的单词的置信度
const INJECTED_CONFIDENCE: f64 = 0.4;

fn is_covered(
    lyric: &EstimatedLyricWord,
    words: &[WordRecord],
    options: &ReconcileOptions,
) -> bool {
    let start_sec = round_to_millis(lyric.start_sec);
    words.iter().any(|word| {
        (word.start_sec - start_sec).abs() <= options.gap_overlap_secs
            && compute_word_similarity(&word.text, &lyric.text, options.similarity_metric)
                >= options.gap_cover_similarity
    })
}

/// 逐行检查歌词被转录覆盖的比例，覆盖率低于阈值的行会把未被覆盖的单词注入结果。
///
/// 一个歌词单词被视为已覆盖，当且仅当存在与其毫秒精度的估计开始时间相差不超过 `gap_overlap_secs`、
/// 且相似度不低于 `gap_cover_similarity` 的转录单词。
/// 覆盖率等于阈值时不补全。注入的单词时间戳精确到毫秒，结果按开始时间稳定排序。
pub fn fill_gaps_synced(
    mut words: Vec<WordRecord>,
    synced_lyrics: &str,
    options: &ReconcileOptions,
) -> Vec<WordRecord> {
    if words.is_empty() {
        return words;
    }
    let lines = parse_synced_lyrics(synced_lyrics);
    if lines.is_empty() {
        return words;
    }

    let mut injected: Vec<WordRecord> = Vec::new();
    for index in 0..lines.len() {
        let line_words = estimate_line_words(&lines, index);
        if line_words.is_empty() {
            continue;
        }

        let uncovered: Vec<&EstimatedLyricWord> = line_words
            .iter()
            .filter(|lyric| !is_covered(lyric, &words, options))
            .collect();
        let covered = line_words.len() - uncovered.len();
        let coverage = covered as f64 / line_words.len() as f64;
        if coverage >= options.gap_coverage_threshold {
            continue;
        }

        debug!(
            "[SyncedGapFiller] 第 {} 行覆盖率 {:.2}，注入 {} 个单词: '{}'",
            index,
            coverage,
            uncovered.len(),
            lines[index].text
        );
        injected.extend(uncovered.into_iter().map(|lyric| {
            WordRecord::injected(
                lyric.text.clone(),
                round_to_millis(lyric.start_sec),
                round_to_millis(lyric.end_sec),
                INJECTED_CONFIDENCE,
                false,
                DetectionSource::LyricsGap,
            )
        }));
    }

    if !injected.is_empty() {
        info!("[SyncedGapFiller] 从歌词补全了 {} 个单词。", injected.len());
        words.append(&mut injected);
        sort_by_start(&mut words);
    }
    words
}
