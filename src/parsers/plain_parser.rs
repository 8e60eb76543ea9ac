//! # 纯文本歌词解析器

use crate::utils::clean_token;

/// 将不带时间戳的纯文本歌词拆分为一个扁平的单词序列。
///
/// 每个单词都会去掉首尾标点，清理后为空的单词被丢弃。
pub fn tokenize_plain_lyrics(content: &str) -> Vec<String> {
    content
        .lines()
        .flat_map(str::split_whitespace)
        .map(clean_token)
        .filter(|token| !token.is_empty())
        .collect()
}
