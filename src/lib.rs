#![warn(missing_docs)]

//! # Lyrics Reconciler RS
//!
//! 用歌词校正语音识别得到的带时间戳转录，找回被漏听或听错的单词，尤其是脏词。
//! 下游的消音流程完全依赖这里给出的脏词标记和时间戳。
//!
//! ## 主要功能
//!
//! - **脏词标记**: 基于内置词表和自定义词表，为每个单词的规范化变体查表。
//! - **歌词纠正**: 在时间窗口内模糊匹配带时间戳的 LRC 歌词，按识别置信度决定是否覆盖转录文本。
//! - **空缺补全**:
//!   - 带时间戳歌词：逐行计算覆盖率，补全覆盖率过低的行。
//!   - 纯文本歌词：先找对齐起点，再贪心对齐，把未对齐的片段插值到锚点之间。
//! - **双轨合并**: 把人声分离后第二遍转录中的脏词合并进主转录。
//! - **消音计划**: 把最终的脏词转换为带余量的毫秒区间。
//!
//! ## 完整流程
//!
//! ```rust
//! use lyrics_reconciler_rs::model::word::{DetectionSource, WordRecord};
//! use lyrics_reconciler_rs::{LyricsReconciler, ReconcileRequest};
//!
//! let reconciler = LyricsReconciler::new()?;
//!
//! let request = ReconcileRequest {
//!     primary: vec![WordRecord::new("feed", 14.2, 14.6, 0.55)],
//!     synced_lyrics: Some(
//!         "[00:12.50] Charge them hos a fee\n[00:15.00] I don't get into the chatter".to_string(),
//!     ),
//!     ..Default::default()
//! };
//!
//! let words = reconciler.reconcile(request);
//! let corrected = words
//!     .iter()
//!     .find(|w| w.detection_source == DetectionSource::LyricsCorrected)
//!     .unwrap();
//! assert_eq!(corrected.text, "fee");
//! assert_eq!(corrected.original_text.as_deref(), Some("feed"));
//! # Ok::<(), lyrics_reconciler_rs::ReconcilerError>(())
//! ```
pub mod config;
pub mod error;
pub mod matching;
pub mod model;
pub mod parsers;
pub mod processors;
pub mod profanity;
pub mod utils;

use tracing::info;

pub use crate::{
    config::ReconcileOptions,
    error::{ReconcilerError, Result},
    model::word::{DetectionSource, WordRecord},
    profanity::ProfanityFilter,
};

use crate::{
    config::load_options_from_config_dir,
    model::{
        censor::{CensorRegion, CensorType, CensorWord},
        word::sort_by_start,
    },
    processors::{
        censor_planner, lyrics_corrector, lyrics_profanity_scanner, pass_merger, plain_gap_filler,
        profanity_flagger, synced_gap_filler,
    },
};

// ==========================================================
//  顶层 API
// ==========================================================

/// 一次完整对齐所需的全部输入。
#[derive(Debug, Clone, Default)]
pub struct ReconcileRequest {
    /// 主转录。
    pub primary: Vec<WordRecord>,
    /// 人声分离后的第二遍转录（可选）。
    pub secondary: Option<Vec<WordRecord>>,
    /// LRC 格式的带时间戳歌词（可选）。
    pub synced_lyrics: Option<String>,
    /// 纯文本歌词（可选），仅在没有带时间戳歌词时用于补全。
    pub plain_lyrics: Option<String>,
    /// 歌曲时长（秒），纯文本补全时作为最后一个锚点。
    pub song_duration: Option<f64>,
}

/// 顶层对齐器，持有脏词词表和所有阈值。
///
/// 构建完成后不可变，可以在多个线程之间共享引用。
#[derive(Debug, Clone)]
pub struct LyricsReconciler {
    filter: ProfanityFilter,
    options: ReconcileOptions,
}

impl LyricsReconciler {
    /// 使用内置词表和默认阈值创建对齐器。
    pub fn new() -> Result<Self> {
        Ok(Self {
            filter: ProfanityFilter::new()?,
            options: ReconcileOptions::default(),
        })
    }

    /// 使用指定的词表和阈值创建对齐器，阈值不合法时返回 `InvalidConfig`。
    pub fn with_options(filter: ProfanityFilter, options: ReconcileOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { filter, options })
    }

    /// 从用户配置目录加载阈值和自定义词表。
    ///
    /// 配置文件不存在时使用默认值。
    pub fn from_config_dir() -> Result<Self> {
        let options = load_options_from_config_dir()?;
        let filter = ProfanityFilter::from_config_dir()?;
        Self::with_options(filter, options)
    }

    /// 当前使用的阈值。
    #[must_use]
    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// 当前使用的脏词词表。
    #[must_use]
    pub fn filter(&self) -> &ProfanityFilter {
        &self.filter
    }

    /// 为每个单词重新计算脏词标记。
    pub fn flag_profanity(&self, words: Vec<WordRecord>) -> Vec<WordRecord> {
        profanity_flagger::flag_profanity(words, &self.filter)
    }

    /// 使用带时间戳歌词纠正转录文本。
    pub fn correct_with_lyrics(
        &self,
        words: Vec<WordRecord>,
        synced_lyrics: &str,
    ) -> Vec<WordRecord> {
        lyrics_corrector::correct_with_lyrics(words, synced_lyrics, &self.options)
    }

    /// 使用带时间戳歌词补全覆盖率过低的行。
    pub fn fill_gaps_synced(
        &self,
        words: Vec<WordRecord>,
        synced_lyrics: &str,
    ) -> Vec<WordRecord> {
        synced_gap_filler::fill_gaps_synced(words, synced_lyrics, &self.options)
    }

    /// 使用纯文本歌词补全转录中的空缺。
    pub fn fill_gaps_plain(
        &self,
        words: Vec<WordRecord>,
        plain_lyrics: &str,
        song_duration: f64,
    ) -> Vec<WordRecord> {
        plain_gap_filler::fill_gaps_plain(words, plain_lyrics, song_duration, &self.options)
    }

    /// 扫描歌词中转录遗漏的脏词，只返回新检测到的单词。
    pub fn scan_lyrics_for_profanity(
        &self,
        synced_lyrics: &str,
        words: &[WordRecord],
    ) -> Vec<WordRecord> {
        lyrics_profanity_scanner::scan_lyrics_for_profanity(
            synced_lyrics,
            words,
            &self.filter,
            &self.options,
        )
    }

    /// 把第二遍转录中的脏词合并进主转录。
    pub fn merge_passes(
        &self,
        primary: Vec<WordRecord>,
        secondary: &[WordRecord],
    ) -> Vec<WordRecord> {
        pass_merger::merge_passes(primary, secondary, &self.options)
    }

    /// 运行完整的对齐流程。
    ///
    /// 依次执行：标记主转录、标记并合并第二遍转录、用带时间戳歌词纠正、
    /// 补全空缺（优先使用带时间戳歌词，否则在提供了歌曲时长时使用纯文本歌词）、
    /// 追加只在歌词中出现的脏词。返回按开始时间排序的最终单词列表。
    pub fn reconcile(&self, request: ReconcileRequest) -> Vec<WordRecord> {
        let ReconcileRequest {
            primary,
            secondary,
            synced_lyrics,
            plain_lyrics,
            song_duration,
        } = request;
        let input_len = primary.len();

        let mut words = self.flag_profanity(primary);

        if let Some(secondary) = secondary {
            let secondary = self.flag_profanity(secondary);
            words = self.merge_passes(words, &secondary);
        }

        let synced_lyrics = synced_lyrics.filter(|lyrics| !lyrics.trim().is_empty());
        if let Some(synced) = &synced_lyrics {
            words = self.correct_with_lyrics(words, synced);
            words = self.fill_gaps_synced(words, synced);
        } else if let (Some(plain), Some(duration)) = (&plain_lyrics, song_duration) {
            words = self.fill_gaps_plain(words, plain, duration);
        }

        if let Some(synced) = &synced_lyrics {
            let mut detections = self.scan_lyrics_for_profanity(synced, &words);
            if !detections.is_empty() {
                words.append(&mut detections);
                sort_by_start(&mut words);
            }
        }

        info!(
            "[Reconciler] 对齐完成: 输入 {} 个单词，输出 {} 个单词，其中 {} 个脏词。",
            input_len,
            words.len(),
            words.iter().filter(|w| w.is_profanity).count()
        );
        words
    }

    /// 为所有被标记为脏词的单词生成消音区间。
    ///
    /// # 参数
    /// * `words` - 对齐后的单词列表。
    /// * `censor_type` - 统一使用的消音方式。
    /// * `audio_duration_ms` - 音频总时长（毫秒），区间不会超出此范围。
    pub fn plan_censor(
        &self,
        words: &[WordRecord],
        censor_type: CensorType,
        audio_duration_ms: u64,
    ) -> Vec<CensorRegion> {
        let selected = censor_planner::select_profane(words, censor_type);
        self.plan_censor_regions(&selected, audio_duration_ms)
    }

    /// 为用户确认过的单词生成消音区间。
    pub fn plan_censor_regions(
        &self,
        words: &[CensorWord],
        audio_duration_ms: u64,
    ) -> Vec<CensorRegion> {
        censor_planner::plan_censor_regions(words, audio_duration_ms, &self.options.censor_padding)
    }
}
