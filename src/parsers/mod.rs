//! 歌词解析器模块

pub mod lrc_parser;
pub mod plain_parser;
