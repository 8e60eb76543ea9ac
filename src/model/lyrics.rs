//! 歌词相关的临时数据结构，每次调用时都从原始歌词字符串重新构建。

/// 带时间戳歌词中的一行。
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// 行开始时间（秒）。
    pub time_sec: f64,
    /// 原始行文本，可能包含多个单词。
    pub text: String,
}

/// 根据行时间均分估算出的歌词单词时间。
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatedLyricWord {
    /// 去除了首尾标点的单词文本。
    pub text: String,
    /// 估算的开始时间（秒）。
    pub start_sec: f64,
    /// 估算的结束时间（秒）。
    pub end_sec: f64,
    /// 所属歌词行的索引。
    pub line_index: usize,
}
