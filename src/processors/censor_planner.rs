//! 把需要消音的单词转换为交给音频拼接引擎的毫秒区间。

use tracing::{debug, warn};

use crate::{
    config::CensorPadding,
    model::{
        censor::{CensorRegion, CensorType, CensorWord},
        word::WordRecord,
    },
};

fn secs_to_millis(secs: f64) -> u64 {
    // 负数和 NaN 都会被饱和为 0
    (secs * 1000.0).floor() as u64
}

/// 选出所有被标记为脏词的单词，统一使用 `censor_type` 消音。
pub fn select_profane(words: &[WordRecord], censor_type: CensorType) -> Vec<CensorWord> {
    words
        .iter()
        .filter(|word| word.is_profanity)
        .map(|word| CensorWord::from_record(word, censor_type))
        .collect()
}

/// 为每个单词计算加上余量、并裁剪到音频范围内的消音区间。
///
/// 开始时间向前扩展 `padding.before_ms`（不早于 0），结束时间向后扩展
/// `padding.after_ms`（不晚于音频时长）。裁剪后为空的区间会被丢弃。
pub fn plan_censor_regions(
    words: &[CensorWord],
    audio_duration_ms: u64,
    padding: &CensorPadding,
) -> Vec<CensorRegion> {
    let regions: Vec<CensorRegion> = words
        .iter()
        .filter_map(|word| {
            let start_ms = secs_to_millis(word.start).saturating_sub(padding.before_ms);
            let end_ms = secs_to_millis(word.end)
                .saturating_add(padding.after_ms)
                .min(audio_duration_ms);
            if end_ms <= start_ms {
                warn!(
                    "[CensorPlanner] 跳过超出音频范围的单词 '{}' ({:.3}s - {:.3}s)",
                    word.word, word.start, word.end
                );
                return None;
            }
            Some(CensorRegion {
                word: word.word.clone(),
                start_ms,
                end_ms,
                censor_type: word.censor_type,
            })
        })
        .collect();

    debug!(
        "[CensorPlanner] 生成了 {} 个消音区间。",
        regions.len()
    );
    regions
}
