//! 定义了转录单词记录 `WordRecord` 及其来源标记。

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

use crate::error::{ReconcilerError, Result};

/// 标记一个单词记录是由哪个处理阶段产生或确认的。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DetectionSource {
    /// 语音识别引擎的原始输出。
    #[default]
    Asr,
    /// 直接从带时间戳歌词中扫描出的脏词。
    Lyrics,
    /// 文本已被歌词纠正过的转录单词。
    LyricsCorrected,
    /// 为填补转录空缺而从歌词中注入的单词。
    LyricsGap,
    /// 由人声分离后的第二遍转录确认的单词。
    Vocals,
    /// 只在人声轨中出现、主转录完全遗漏的即兴人声。
    Adlib,
}

impl DetectionSource {
    /// 返回该来源在 JSON 中使用的字符串形式。
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionSource::Asr => "asr",
            DetectionSource::Lyrics => "lyrics",
            DetectionSource::LyricsCorrected => "lyrics_corrected",
            DetectionSource::LyricsGap => "lyrics_gap",
            DetectionSource::Vocals => "vocals",
            DetectionSource::Adlib => "adlib",
        }
    }

    /// 从字符串解析来源标记，不认识的值返回 `InvalidDetectionSource`。
    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse::<Self>()
            .map_err(|_| ReconcilerError::InvalidDetectionSource(s.to_string()))
    }
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_confidence() -> f64 {
    1.0
}

/// 一个带时间戳的单词。
///
/// 由外部的语音识别引擎产出，之后在整个对齐流程中只会被追加字段或插入新记录。
/// `original_text` 和 `correction_confidence` 只有在单词被纠正后才会存在。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    /// 单词文本。
    #[serde(rename = "word")]
    pub text: String,
    /// 开始时间（秒）。
    #[serde(rename = "start")]
    pub start_sec: f64,
    /// 结束时间（秒）。
    #[serde(rename = "end")]
    pub end_sec: f64,
    /// 识别置信度，范围 [0, 1]。
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// 是否为脏词。
    #[serde(default)]
    pub is_profanity: bool,
    /// 产生或确认该记录的处理阶段。
    #[serde(default)]
    pub detection_source: DetectionSource,
    /// 被纠正之前的原始文本。
    #[serde(
        rename = "original_word",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_text: Option<String>,
    /// 纠正时歌词匹配的相似度。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_confidence: Option<f64>,
}

impl WordRecord {
    /// 创建一个来自语音识别引擎的单词记录。
    #[must_use]
    pub fn new(text: impl Into<String>, start_sec: f64, end_sec: f64, confidence: f64) -> Self {
        Self {
            text: text.into(),
            start_sec,
            end_sec,
            confidence,
            is_profanity: false,
            detection_source: DetectionSource::Asr,
            original_text: None,
            correction_confidence: None,
        }
    }

    /// 创建一个由流程自身插入的单词记录。
    #[must_use]
    pub fn injected(
        text: impl Into<String>,
        start_sec: f64,
        end_sec: f64,
        confidence: f64,
        is_profanity: bool,
        detection_source: DetectionSource,
    ) -> Self {
        Self {
            is_profanity,
            detection_source,
            ..Self::new(text, start_sec, end_sec, confidence)
        }
    }

    /// 用歌词中的单词覆盖当前文本，时间戳保持不变。
    pub fn apply_correction(&mut self, lyric_text: &str, similarity: f64) {
        let previous = std::mem::replace(&mut self.text, lyric_text.to_string());
        self.original_text = Some(previous);
        self.correction_confidence = Some(similarity);
        self.detection_source = DetectionSource::LyricsCorrected;
    }

    /// 检查文本非空、时间戳有限且 `start ≤ end`、置信度位于 [0, 1]。
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(ReconcilerError::InvalidWordRecord(
                "单词文本为空".to_string(),
            ));
        }
        if !self.start_sec.is_finite() || !self.end_sec.is_finite() {
            return Err(ReconcilerError::InvalidWordRecord(format!(
                "'{}' 的时间戳不是有限值",
                self.text
            )));
        }
        if self.start_sec > self.end_sec {
            return Err(ReconcilerError::InvalidWordRecord(format!(
                "'{}' 的开始时间 {} 晚于结束时间 {}",
                self.text, self.start_sec, self.end_sec
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ReconcilerError::InvalidWordRecord(format!(
                "'{}' 的置信度 {} 不在 [0, 1] 内",
                self.text, self.confidence
            )));
        }
        Ok(())
    }

    /// 两个单词的时间区间重叠长度，为负数时表示两者之间的间隔。
    #[must_use]
    pub fn overlap_with(&self, other: &WordRecord) -> f64 {
        self.end_sec.min(other.end_sec) - self.start_sec.max(other.start_sec)
    }
}

/// 按开始时间对单词列表进行稳定排序。
pub fn sort_by_start(words: &mut [WordRecord]) {
    words.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));
}

/// 检查单词列表是否已按开始时间升序排列。
#[must_use]
pub fn is_sorted_by_start(words: &[WordRecord]) -> bool {
    words.windows(2).all(|w| w[0].start_sec <= w[1].start_sec)
}

/// 从 JSON 数组解码单词记录列表。
///
/// 未知的 `detection_source` 会导致解码失败，而不是被静默接受。
/// 每条记录都会经过 [`WordRecord::validate`] 检查。
pub fn parse_word_records(json: &str) -> Result<Vec<WordRecord>> {
    let words: Vec<WordRecord> = serde_json::from_str(json)?;
    for word in &words {
        word.validate()?;
    }
    Ok(words)
}

/// 将单词记录列表编码为 JSON 数组。
pub fn to_json(words: &[WordRecord]) -> Result<String> {
    Ok(serde_json::to_string(words)?)
}
