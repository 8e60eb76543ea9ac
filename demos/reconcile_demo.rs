//! 用于演示 `lyrics-reconciler` 库的完整对齐流程。
//!
//! ## 如何运行
//!
//! ```bash
//! cargo run --package lyrics_reconciler_rs --example reconcile_demo
//! ```
//!
//! 可以用 `RUST_LOG=debug` 查看每个处理阶段的详细日志，
//! 用 `CENSOR_TYPE=reverse` 等切换消音方式。

use lyrics_reconciler_rs::{
    LyricsReconciler, ReconcileRequest,
    error::Result,
    model::{
        censor::CensorType,
        word::{parse_word_records, to_json},
    },
};

use tracing::info;
use tracing_subscriber::EnvFilter;

const SYNCED_LYRICS: &str = "\
[ti:Night Drive]
[00:01.00] We ride all night
[00:03.00] No time for the bullshit
[00:05.00] Keep it moving
[00:07.00] Damn right
";

const TRANSCRIPT: &str = r#"[
    {"word": "we", "start": 1.0, "end": 1.3, "confidence": 0.95},
    {"word": "ride", "start": 1.5, "end": 1.8, "confidence": 0.9},
    {"word": "all", "start": 2.0, "end": 2.2, "confidence": 0.9},
    {"word": "knight", "start": 2.5, "end": 2.8, "confidence": 0.4},
    {"word": "no", "start": 3.0, "end": 3.2, "confidence": 0.9},
    {"word": "time", "start": 3.4, "end": 3.6, "confidence": 0.9},
    {"word": "four", "start": 3.8, "end": 4.0, "confidence": 0.45},
    {"word": "the", "start": 4.2, "end": 4.3, "confidence": 0.9},
    {"word": "bull", "start": 4.6, "end": 4.9, "confidence": 0.6},
    {"word": "right", "start": 9.5, "end": 9.8, "confidence": 0.9}
]"#;

const VOCALS_TRANSCRIPT: &str = r#"[
    {"word": "bullshit", "start": 4.6, "end": 5.0, "confidence": 0.7}
]"#;

/// 示例音频时长（毫秒）
const AUDIO_DURATION_MS: u64 = 12_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("[Main] 正在加载配置和词表...");
    let reconciler = LyricsReconciler::from_config_dir()?;

    let request = ReconcileRequest {
        primary: parse_word_records(TRANSCRIPT)?,
        secondary: Some(parse_word_records(VOCALS_TRANSCRIPT)?),
        synced_lyrics: Some(SYNCED_LYRICS.to_string()),
        ..Default::default()
    };
    let words = reconciler.reconcile(request);

    println!("\n--- 对齐结果 ---");
    for word in &words {
        let marker = if word.is_profanity { "*" } else { " " };
        let original = word
            .original_text
            .as_deref()
            .map(|o| format!(" (原为 '{o}')"))
            .unwrap_or_default();
        println!(
            "{marker} {:>7.3}s - {:>7.3}s  {:<10} [{}]{original}",
            word.start_sec, word.end_sec, word.text, word.detection_source
        );
    }

    println!("\n--- JSON ---");
    println!("{}", to_json(&words)?);

    println!("\n--- 消音计划 ---");
    let censor_type = match std::env::var("CENSOR_TYPE") {
        Ok(value) => CensorType::parse(&value)?,
        Err(_) => CensorType::Beep,
    };
    for region in reconciler.plan_censor(&words, censor_type, AUDIO_DURATION_MS) {
        println!(
            "{:>6}ms - {:>6}ms  {:<10} {}",
            region.start_ms, region.end_ms, region.word, region.censor_type
        );
    }

    Ok(())
}
