//! 利用不带时间戳的纯文本歌词补全转录中遗漏的单词。
//!
//! 纯文本歌词没有任何时间信息，所以先找到转录开头在歌词中的位置，
//! 再贪心地向前对齐，最后把未被对齐的歌词片段均匀插入到前后两个锚点之间。

use std::ops::Range;

use tracing::{debug, info};

use crate::{
    config::ReconcileOptions,
    matching::similarity::compute_word_similarity,
    model::word::{DetectionSource, WordRecord, sort_by_start},
    parsers::plain_parser::tokenize_plain_lyrics,
    utils::round_to_millis,
};

/// 从歌词注入的单词的置信度
const INJECTED_CONFIDENCE: f64 = 0.3;

/// 注入单词的时长占间距的比例
const INJECTED_DURATION_RATIO: f64 = 0.8;

/// 注入单词的最大时长（秒）
const MAX_INJECTED_DURATION_SECS: f64 = 0.35;

/// 一对互相对齐的歌词单词和转录单词。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedPair {
    /// 歌词单词在歌词序列中的索引。
    pub lyric_index: usize,
    /// 转录单词在转录序列中的索引。
    pub transcript_index: usize,
}

/// 贪心对齐的结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    /// 对齐开始时歌词指针的位置。
    pub start: usize,
    /// 对齐的单词对，`lyric_index` 严格递增。
    pub pairs: Vec<AlignedPair>,
}

impl Alignment {
    /// 歌词单词是否被对齐。
    #[must_use]
    pub fn is_lyric_matched(&self, lyric_index: usize) -> bool {
        self.pairs
            .binary_search_by_key(&lyric_index, |pair| pair.lyric_index)
            .is_ok()
    }
}

/// 寻找转录开头在歌词序列中的位置。
///
/// 取转录的前 `alignment_window` 个单词作为探针，在歌词中逐个位置计算平均相似度，
/// 平均相似度严格更高的位置胜出。最佳平均相似度低于 `alignment_min_score` 时返回 `None`。
/// 歌词比探针还短时直接从 0 开始。
pub fn find_alignment_start(
    words: &[WordRecord],
    lyric_tokens: &[String],
    options: &ReconcileOptions,
) -> Option<usize> {
    let probe = &words[..words.len().min(options.alignment_window)];
    if lyric_tokens.len() < probe.len() {
        return Some(0);
    }
    if probe.is_empty() {
        return None;
    }

    let mut best_position = 0;
    let mut best_score = 0.0;
    for position in 0..=lyric_tokens.len() - probe.len() {
        let total: f64 = probe
            .iter()
            .zip(&lyric_tokens[position..])
            .map(|(word, token)| {
                compute_word_similarity(&word.text, token, options.similarity_metric)
            })
            .sum();
        let score = total / probe.len() as f64;
        if score > best_score {
            best_score = score;
            best_position = position;
        }
    }

    if best_score >= options.alignment_min_score {
        debug!(
            "[PlainGapFiller] 对齐起点为第 {} 个歌词单词 (平均相似度 {:.2})",
            best_position, best_score
        );
        Some(best_position)
    } else {
        debug!(
            "[PlainGapFiller] 找不到可靠的对齐起点 (最佳平均相似度 {:.2})",
            best_score
        );
        None
    }
}

/// 从 `start` 开始贪心地把转录单词对齐到歌词单词。
///
/// 每个转录单词只在歌词指针之后的 `alignment_lookahead` 个单词中寻找得分严格最高、
/// 且不低于 `alignment_match_similarity` 的候选。找到后指针移到该候选之后，
/// 找不到时指针不动。
pub fn align_greedy(
    words: &[WordRecord],
    lyric_tokens: &[String],
    start: usize,
    options: &ReconcileOptions,
) -> Alignment {
    let mut alignment = Alignment {
        start,
        pairs: Vec::new(),
    };
    let mut pointer = start;

    for (transcript_index, word) in words.iter().enumerate() {
        if pointer >= lyric_tokens.len() {
            break;
        }
        let window_end = pointer
            .saturating_add(options.alignment_lookahead)
            .min(lyric_tokens.len());

        let mut best: Option<(usize, f64)> = None;
        for (lyric_index, token) in lyric_tokens
            .iter()
            .enumerate()
            .take(window_end)
            .skip(pointer)
        {
            let score = compute_word_similarity(&word.text, token, options.similarity_metric);
            let best_score = best.map_or(0.0, |(_, s)| s);
            if score > best_score && score >= options.alignment_match_similarity {
                best = Some((lyric_index, score));
            }
        }

        if let Some((lyric_index, _)) = best {
            alignment.pairs.push(AlignedPair {
                lyric_index,
                transcript_index,
            });
            pointer = lyric_index + 1;
        }
    }

    alignment
}

/// 从 0 开始找出所有连续的、未被对齐的歌词单词区间。
pub fn extract_gaps(alignment: &Alignment, lyric_len: usize) -> Vec<Range<usize>> {
    let mut gaps = Vec::new();
    let mut gap_start: Option<usize> = None;

    for index in 0..lyric_len {
        if alignment.is_lyric_matched(index) {
            if let Some(start) = gap_start.take() {
                gaps.push(start..index);
            }
        } else if gap_start.is_none() {
            gap_start = Some(index);
        }
    }
    if let Some(start) = gap_start {
        gaps.push(start..lyric_len);
    }

    gaps
}

/// 用纯文本歌词补全转录。
///
/// 每个未对齐的歌词区间都插入到两个锚点之间：前锚点是区间之前最近一个已对齐单词的结束时间
/// （没有时为 0），后锚点是区间之后第一个已对齐单词的开始时间（没有时为歌曲时长）。
/// 后锚点不晚于前锚点的区间会被跳过。
/// 歌词为空、转录为空、找不到对齐起点或没有任何单词被对齐时原样返回。
pub fn fill_gaps_plain(
    mut words: Vec<WordRecord>,
    plain_lyrics: &str,
    song_duration: f64,
    options: &ReconcileOptions,
) -> Vec<WordRecord> {
    let tokens = tokenize_plain_lyrics(plain_lyrics);
    if tokens.is_empty() || words.is_empty() {
        return words;
    }
    let Some(start) = find_alignment_start(&words, &tokens, options) else {
        return words;
    };
    let alignment = align_greedy(&words, &tokens, start, options);
    if alignment.pairs.is_empty() {
        debug!("[PlainGapFiller] 没有任何单词被对齐，跳过补全。");
        return words;
    }

    let mut injected: Vec<WordRecord> = Vec::new();
    for gap in extract_gaps(&alignment, tokens.len()) {
        let before = alignment
            .pairs
            .iter()
            .rev()
            .find(|pair| pair.lyric_index < gap.start)
            .map_or(0.0, |pair| words[pair.transcript_index].end_sec);
        let after = alignment
            .pairs
            .iter()
            .find(|pair| pair.lyric_index >= gap.end)
            .map_or(song_duration, |pair| words[pair.transcript_index].start_sec);
        if after <= before {
            continue;
        }

        let spacing = (after - before) / (gap.len() + 1) as f64;
        let duration = (spacing * INJECTED_DURATION_RATIO).min(MAX_INJECTED_DURATION_SECS);
        for (j, token) in tokens[gap].iter().enumerate() {
            let start_sec = before + (j + 1) as f64 * spacing;
            injected.push(WordRecord::injected(
                token.clone(),
                round_to_millis(start_sec),
                round_to_millis(start_sec + duration),
                INJECTED_CONFIDENCE,
                false,
                DetectionSource::LyricsGap,
            ));
        }
    }

    if !injected.is_empty() {
        info!(
            "[PlainGapFiller] 从歌词第 {} 个单词起对齐了 {} 个单词，补全了 {} 个单词。",
            alignment.start,
            alignment.pairs.len(),
            injected.len()
        );
        words.append(&mut injected);
        sort_by_start(&mut words);
    }
    words
}
