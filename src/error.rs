//! 定义了整个 `lyrics-reconciler` 库的错误类型 `ReconcilerError`。
//!
//! 对齐和纠错的核心流程本身永远不会返回错误，遇到无法解析的输入时会原样返回。
//! 这里的错误只会出现在边界上：读取配置、加载词表、从 JSON 解码单词记录。

use std::io;
use thiserror::Error;

/// `lyrics-reconciler` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum ReconcilerError {
    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// JSON 解析失败 (源自 `serde_json::Error`)
    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// 词表 fst 集合加载失败 (源自 `fst::Error`)
    #[error("词表加载失败: {0}")]
    WordList(#[from] fst::Error),

    /// 无法识别的单词来源标记
    #[error("无效的单词来源: '{0}'")]
    InvalidDetectionSource(String),

    /// 单词记录违反了数据约束
    #[error("无效的单词记录: {0}")]
    InvalidWordRecord(String),

    /// 无法识别的消音方式
    #[error("无效的消音方式: '{0}'")]
    InvalidCensorType(String),

    /// 配置内容不合法
    #[error("配置无效: {0}")]
    InvalidConfig(String),
}

/// `ReconcilerError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, ReconcilerError>;
