//! 匹配算法模块：单词规范化、相似度计算和时间窗口内的歌词匹配。

pub mod normalizer;
pub mod similarity;
pub mod temporal;
