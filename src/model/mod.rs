//! 数据模型模块

pub mod censor;
pub mod lyrics;
pub mod word;
