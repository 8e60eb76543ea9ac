//! 对齐流程中的各个处理阶段。
//!
//! 每个阶段都是一个接收单词列表、返回新单词列表的纯函数，
//! 输出总是按开始时间排序。

pub mod censor_planner;
pub mod lyrics_corrector;
pub mod lyrics_profanity_scanner;
pub mod pass_merger;
pub mod plain_gap_filler;
pub mod profanity_flagger;
pub mod synced_gap_filler;
