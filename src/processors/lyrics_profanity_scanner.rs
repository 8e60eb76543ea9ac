//! 直接扫描带时间戳歌词中的脏词，找出转录完全漏掉的那些。

use tracing::info;

use crate::{
    config::ReconcileOptions,
    model::word::{DetectionSource, WordRecord},
    parsers::lrc_parser::{estimate_word_timings, parse_synced_lyrics},
    profanity::ProfanityFilter,
    utils::round_to_millis,
};

/// 仅由歌词检测到的脏词的置信度
const LYRICS_DETECTION_CONFIDENCE: f64 = 0.5;

/// 返回歌词中有、但转录附近没有被标记的脏词，按歌词顺序排列。
///
/// 附近是指开始时间之差严格小于 `scan_overlap_secs`。
/// 返回值只包含新检测到的单词，不包含传入的转录。
pub fn scan_lyrics_for_profanity(
    synced_lyrics: &str,
    words: &[WordRecord],
    filter: &ProfanityFilter,
    options: &ReconcileOptions,
) -> Vec<WordRecord> {
    let lines = parse_synced_lyrics(synced_lyrics);
    if lines.is_empty() {
        return Vec::new();
    }

    let detections: Vec<WordRecord> = estimate_word_timings(&lines)
        .into_iter()
        .filter(|lyric| filter.is_profane(&lyric.text))
        .filter(|lyric| {
            !words.iter().any(|word| {
                word.is_profanity
                    && (word.start_sec - lyric.start_sec).abs() < options.scan_overlap_secs
            })
        })
        .map(|lyric| {
            WordRecord::injected(
                lyric.text,
                round_to_millis(lyric.start_sec),
                round_to_millis(lyric.end_sec),
                LYRICS_DETECTION_CONFIDENCE,
                true,
                DetectionSource::Lyrics,
            )
        })
        .collect();

    if !detections.is_empty() {
        info!(
            "[LyricsProfanityScanner] 歌词中额外发现 {} 个脏词。",
            detections.len()
        );
    }
    detections
}
