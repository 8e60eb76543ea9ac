//! 交给外部音频拼接引擎的消音计划。

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

use crate::error::{ReconcilerError, Result};
use crate::model::word::WordRecord;

/// 消音方式。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case", try_from = "String")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CensorType {
    /// 静音。
    #[default]
    Mute,
    /// 替换为与原片段等响度的提示音。
    Beep,
    /// 将片段倒放。
    Reverse,
    /// 模拟磁带停转的降速效果。
    TapeStop,
}

impl CensorType {
    /// 从字符串解析消音方式，不认识的值返回 `InvalidCensorType`。
    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse::<Self>()
            .map_err(|_| ReconcilerError::InvalidCensorType(s.to_string()))
    }
}

impl TryFrom<String> for CensorType {
    type Error = ReconcilerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl fmt::Display for CensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CensorType::Mute => write!(f, "mute"),
            CensorType::Beep => write!(f, "beep"),
            CensorType::Reverse => write!(f, "reverse"),
            CensorType::TapeStop => write!(f, "tape_stop"),
        }
    }
}

/// 用户确认需要消音的一个单词。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensorWord {
    /// 单词文本。
    pub word: String,
    /// 开始时间（秒）。
    pub start: f64,
    /// 结束时间（秒）。
    pub end: f64,
    /// 消音方式。
    #[serde(default)]
    pub censor_type: CensorType,
}

impl CensorWord {
    /// 从单词记录创建一个消音请求。
    #[must_use]
    pub fn from_record(record: &WordRecord, censor_type: CensorType) -> Self {
        Self {
            word: record.text.clone(),
            start: record.start_sec,
            end: record.end_sec,
            censor_type,
        }
    }
}

/// 一段已加上前后余量并裁剪到音频范围内的消音区间（毫秒）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensorRegion {
    /// 被消音的单词。
    pub word: String,
    /// 区间开始（毫秒）。
    pub start_ms: u64,
    /// 区间结束（毫秒）。
    pub end_ms: u64,
    /// 消音方式。
    pub censor_type: CensorType,
}

impl CensorRegion {
    /// 区间时长（毫秒）。
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}
