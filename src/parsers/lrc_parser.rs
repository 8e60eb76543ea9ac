//! # LRC 格式解析器
//!
//! 只关心 `[mm:ss.fff] 文本` 形式的歌词行，其余行（元数据标签、无时间戳的文本、
//! 格式错误的时间戳）一律静默跳过。解析永远不会失败，最坏情况下返回空列表。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::model::lyrics::{EstimatedLyricWord, LyricLine};
use crate::utils::clean_token;

/// 没有下一行时假定的行时长，同时也是所有行时长的上限（秒）
pub const MAX_LINE_DURATION_SECS: f64 = 5.0;

/// 单个单词估算时长的上限（秒）
pub const MAX_WORD_DURATION_SECS: f64 = 0.35;

/// 用于匹配一个完整的 LRC 歌词行，捕获行首的时间戳组和文本部分
static LRC_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:\[\d+:\d+\.\d+\])+)\s*(.*)$").expect("未能编译 LRC_LINE_REGEX")
});

/// 用于从一个时间戳组中提取出单个时间戳
static LRC_TIMESTAMP_EXTRACT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+):(\d+\.\d+)\]").expect("未能编译 LRC_TIMESTAMP_EXTRACT_REGEX")
});

/// 解析 LRC 格式的带时间戳歌词。
///
/// 一行带有多个时间戳时，每个时间戳各产生一条记录。
/// 结果按时间稳定排序，保证 `time_sec` 单调不减。
pub fn parse_synced_lyrics(content: &str) -> Vec<LyricLine> {
    let mut lines: Vec<LyricLine> = Vec::new();

    for raw_line in content.lines() {
        let Some(line_caps) = LRC_LINE_REGEX.captures(raw_line.trim()) else {
            continue;
        };

        let text = line_caps.get(2).map_or("", |m| m.as_str()).trim();
        if text.is_empty() {
            continue;
        }

        let all_timestamps_str = line_caps.get(1).map_or("", |m| m.as_str());
        for ts_cap in LRC_TIMESTAMP_EXTRACT_REGEX.captures_iter(all_timestamps_str) {
            let minutes = ts_cap.get(1).map_or("", |m| m.as_str()).parse::<u32>();
            let seconds = ts_cap.get(2).map_or("", |m| m.as_str()).parse::<f64>();

            if let (Ok(min), Ok(sec)) = (minutes, seconds) {
                lines.push(LyricLine {
                    time_sec: f64::from(min) * 60.0 + sec,
                    text: text.to_string(),
                });
            } else {
                debug!(
                    "[LrcParser] 跳过无法解析的时间戳 '{}'",
                    ts_cap.get(0).map_or("", |m| m.as_str())
                );
            }
        }
    }

    lines.sort_by(|a, b| a.time_sec.total_cmp(&b.time_sec));
    lines
}

/// 估算第 `index` 行中每个单词的时间。
///
/// 行时长取到下一行的时间差（最后一行取 5 秒），并且不超过 5 秒；
/// 行时长按空白分隔的原始单词数均分，每个单词的时长再限制在 0.35 秒以内。
/// 清理后为空的单词会被丢弃，但仍然占据它在行内的位置。
pub fn estimate_line_words(lines: &[LyricLine], index: usize) -> Vec<EstimatedLyricWord> {
    let Some(line) = lines.get(index) else {
        return Vec::new();
    };

    let next_time = lines
        .get(index + 1)
        .map_or(line.time_sec + MAX_LINE_DURATION_SECS, |next| next.time_sec);
    let line_duration = (next_time - line.time_sec).min(MAX_LINE_DURATION_SECS);

    let tokens: Vec<&str> = line.text.split_whitespace().collect();
    let per_word = line_duration / tokens.len().max(1) as f64;

    tokens
        .iter()
        .enumerate()
        .filter_map(|(j, token)| {
            let text = clean_token(token);
            if text.is_empty() {
                return None;
            }
            let start_sec = line.time_sec + j as f64 * per_word;
            Some(EstimatedLyricWord {
                text,
                start_sec,
                end_sec: start_sec + per_word.min(MAX_WORD_DURATION_SECS),
                line_index: index,
            })
        })
        .collect()
}

/// 估算所有歌词行中每个单词的时间，按歌词顺序返回。
pub fn estimate_word_timings(lines: &[LyricLine]) -> Vec<EstimatedLyricWord> {
    (0..lines.len())
        .flat_map(|index| estimate_line_words(lines, index))
        .collect()
}
