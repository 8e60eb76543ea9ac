//! 基于词表为转录单词打上脏词标记。

use tracing::debug;

use crate::{model::word::WordRecord, profanity::ProfanityFilter};

/// 为每个单词重新计算 `is_profanity`，其余字段保持不变。
pub fn flag_profanity(mut words: Vec<WordRecord>, filter: &ProfanityFilter) -> Vec<WordRecord> {
    let mut flagged = 0usize;
    for word in &mut words {
        word.is_profanity = filter.is_profane(&word.text);
        if word.is_profanity {
            flagged += 1;
        }
    }
    debug!(
        "[ProfanityFlagger] {} 个单词中有 {} 个脏词。",
        words.len(),
        flagged
    );
    words
}
