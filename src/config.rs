//! 负责处理可调参数和自定义词表等配置。
//!
//! 所有阈值都有与默认行为一致的默认值，配置文件中缺失的字段会回落到默认值。

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ReconcilerError, Result};
use crate::matching::similarity::SimilarityMetric;

/// 配置目录名
const CONFIG_DIR_NAME: &str = "lyrics-reconciler";

/// 阈值配置文件名
pub const OPTIONS_FILE_NAME: &str = "reconcile_options.json";

/// 自定义词表文件名
pub const CUSTOM_WORDS_FILE_NAME: &str = "custom_words.txt";

/// 消音区间前后的余量（毫秒），用于弥补时间戳的误差。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CensorPadding {
    /// 区间开始前的余量。
    pub before_ms: u64,
    /// 区间结束后的余量。
    pub after_ms: u64,
}

impl Default for CensorPadding {
    fn default() -> Self {
        Self {
            before_ms: 50,
            after_ms: 100,
        }
    }
}

/// 对齐流程中所有可调的阈值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// 纠正中高置信度单词所需的最低歌词相似度。
    pub correction_threshold: f64,
    /// 为转录单词寻找歌词候选时，向前后各扩展的时间窗口（秒）。
    pub match_window_secs: f64,
    /// 歌词候选被接受所需的最低相似度。
    pub min_match_similarity: f64,
    /// 转录单词与歌词候选允许的最大字符数差。
    pub max_length_diff: usize,
    /// 补全带时间戳歌词时，判断歌词单词已被覆盖的最大时间差（秒）。
    pub gap_overlap_secs: f64,
    /// 行覆盖率低于此值时才补全该行。
    pub gap_coverage_threshold: f64,
    /// 判断歌词单词已被覆盖所需的最低相似度。
    pub gap_cover_similarity: f64,
    /// 扫描歌词脏词时，判断已被检测到的最大时间差（秒）。
    pub scan_overlap_secs: f64,
    /// 合并两遍转录时，同文本单词被视为同一个词的最大间隔（秒）。
    pub merge_overlap_secs: f64,
    /// 寻找纯文本歌词起始位置时使用的探测窗口大小。
    pub alignment_window: usize,
    /// 起始位置被接受所需的最低平均相似度。
    pub alignment_min_score: f64,
    /// 贪心对齐时向前查找的歌词单词数。
    pub alignment_lookahead: usize,
    /// 贪心对齐时单词被匹配所需的最低相似度。
    pub alignment_match_similarity: f64,
    /// 使用的相似度度量。
    pub similarity_metric: SimilarityMetric,
    /// 消音区间的前后余量。
    pub censor_padding: CensorPadding,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            correction_threshold: 0.85,
            match_window_secs: 5.0,
            min_match_similarity: 0.6,
            max_length_diff: 3,
            gap_overlap_secs: 0.75,
            gap_coverage_threshold: 0.3,
            gap_cover_similarity: 0.5,
            scan_overlap_secs: 0.75,
            merge_overlap_secs: 0.3,
            alignment_window: 5,
            alignment_min_score: 0.4,
            alignment_lookahead: 20,
            alignment_match_similarity: 0.6,
            similarity_metric: SimilarityMetric::default(),
            censor_padding: CensorPadding::default(),
        }
    }
}

impl ReconcileOptions {
    /// 检查各阈值是否在合理范围内。
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("correction_threshold", self.correction_threshold),
            ("min_match_similarity", self.min_match_similarity),
            ("gap_coverage_threshold", self.gap_coverage_threshold),
            ("gap_cover_similarity", self.gap_cover_similarity),
            ("alignment_min_score", self.alignment_min_score),
            ("alignment_match_similarity", self.alignment_match_similarity),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ReconcilerError::InvalidConfig(format!(
                    "{name} 必须在 [0, 1] 之间，实际为 {value}"
                )));
            }
        }

        let durations = [
            ("match_window_secs", self.match_window_secs),
            ("gap_overlap_secs", self.gap_overlap_secs),
            ("scan_overlap_secs", self.scan_overlap_secs),
            ("merge_overlap_secs", self.merge_overlap_secs),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ReconcilerError::InvalidConfig(format!(
                    "{name} 必须是非负数，实际为 {value}"
                )));
            }
        }

        if self.alignment_window == 0 || self.alignment_lookahead == 0 {
            return Err(ReconcilerError::InvalidConfig(
                "alignment_window 和 alignment_lookahead 必须大于 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// 获取应用配置目录下指定文件的完整路径。
///
/// # 参数
/// * `filename` - 目标配置文件的名称，例如 "custom_words.txt"。
pub fn get_config_file_path(filename: &str) -> Result<PathBuf> {
    if let Some(mut config_dir) = dirs::config_dir() {
        config_dir.push(CONFIG_DIR_NAME);
        fs::create_dir_all(&config_dir)?;
        config_dir.push(filename);
        Ok(config_dir)
    } else {
        Err(ReconcilerError::Io(std::io::Error::new(
            ErrorKind::NotFound,
            "无法找到用户配置目录",
        )))
    }
}

/// 从 JSON 文件加载阈值配置，并校验其合法性。
pub fn load_options(path: &Path) -> Result<ReconcileOptions> {
    let content = fs::read_to_string(path)?;
    let options: ReconcileOptions = serde_json::from_str(&content)?;
    options.validate()?;
    info!("已从 {} 加载对齐配置。", path.display());
    Ok(options)
}

/// 将阈值配置序列化为 JSON 并保存到文件。
pub fn save_options(path: &Path, options: &ReconcileOptions) -> Result<()> {
    let content = serde_json::to_string_pretty(options)?;
    fs::write(path, content)?;
    info!("对齐配置已保存到 {}。", path.display());
    Ok(())
}

/// 从用户配置目录加载阈值配置，文件不存在时使用默认值。
pub fn load_options_from_config_dir() -> Result<ReconcileOptions> {
    let path = get_config_file_path(OPTIONS_FILE_NAME)?;
    match load_options(&path) {
        Ok(options) => Ok(options),
        Err(ReconcilerError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            info!("对齐配置文件不存在，将使用默认配置。");
            Ok(ReconcileOptions::default())
        }
        Err(e) => Err(e),
    }
}

/// 解析自定义词表内容。
///
/// 每行一个词，首尾空白会被去掉；空行和以 `#` 开头的注释行被忽略。
pub fn parse_custom_terms(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// 从文件加载自定义词表，文件不存在时返回空列表。
pub fn load_custom_terms(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let terms = parse_custom_terms(&content);
            info!("已从 {} 加载 {} 个自定义词。", path.display(), terms.len());
            Ok(terms)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("自定义词表 {} 不存在，仅使用内置词表。", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}
