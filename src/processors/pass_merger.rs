//! 合并主转录与人声分离后的第二遍转录。

use tracing::{debug, info};

use crate::{
    config::ReconcileOptions,
    model::word::{DetectionSource, WordRecord, sort_by_start},
    utils::eq_ignore_case,
};

/// 第二遍转录中的单词是否与主转录中的单词指的是同一个词
fn is_same_word(primary: &WordRecord, secondary: &WordRecord, threshold: f64) -> bool {
    if primary.overlap_with(secondary) > 0.0 {
        return true;
    }
    let gap = (secondary.start_sec - primary.end_sec)
        .abs()
        .min((primary.start_sec - secondary.end_sec).abs());
    gap < threshold && eq_ignore_case(&primary.text, &secondary.text)
}

/// 把第二遍转录中的脏词合并进主转录。
///
/// 只有被标记为脏词的第二遍单词才会被导入。与主转录中某个单词时间重叠，
/// 或两者间隔小于 `merge_overlap_secs` 且文本相同时，该主转录单词被标记为脏词，
/// 来源改为 `vocals`；否则作为 `adlib` 追加。
/// 已追加的 adlib 也参与后续比较，所以同一个即兴人声不会被追加两次。
pub fn merge_passes(
    primary: Vec<WordRecord>,
    secondary: &[WordRecord],
    options: &ReconcileOptions,
) -> Vec<WordRecord> {
    let mut merged = primary;
    let mut confirmed = 0usize;
    let mut adlibs = 0usize;

    for candidate in secondary.iter().filter(|word| word.is_profanity) {
        if let Some(existing) = merged
            .iter_mut()
            .find(|word| is_same_word(word, candidate, options.merge_overlap_secs))
        {
            existing.is_profanity = true;
            existing.detection_source = DetectionSource::Vocals;
            confirmed += 1;
        } else {
            debug!(
                "[PassMerger] 人声轨中的 '{}' ({:.2}s) 作为即兴人声加入。",
                candidate.text, candidate.start_sec
            );
            merged.push(WordRecord {
                detection_source: DetectionSource::Adlib,
                ..candidate.clone()
            });
            adlibs += 1;
        }
    }

    if confirmed + adlibs > 0 {
        info!(
            "[PassMerger] 人声轨确认了 {} 个脏词，新增 {} 个即兴人声。",
            confirmed, adlibs
        );
    }
    sort_by_start(&mut merged);
    merged
}
