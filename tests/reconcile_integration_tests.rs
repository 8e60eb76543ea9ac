use lyrics_reconciler_rs::{
    DetectionSource, LyricsReconciler, ProfanityFilter, ReconcileOptions, ReconcileRequest,
    WordRecord,
    model::{
        censor::CensorType,
        word::{is_sorted_by_start, parse_word_records, to_json},
    },
};

use std::path::Path;

fn load_test_data(filename: &str) -> String {
    let path = Path::new("tests/test_data").join(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("读取测试文件 '{:?}' 失败: {}", path, e))
}

fn load_words(filename: &str) -> Vec<WordRecord> {
    parse_word_records(&load_test_data(filename))
        .unwrap_or_else(|e| panic!("解析单词记录 '{}' 失败: {}", filename, e))
}

fn render(words: &[WordRecord]) -> String {
    words
        .iter()
        .map(|w| {
            format!(
                "{:.3} {} [{}]{}",
                w.start_sec,
                w.text,
                w.detection_source,
                if w.is_profanity { " *" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test_log::test]
fn test_full_pipeline_with_synced_lyrics() {
    let reconciler = LyricsReconciler::new().unwrap();
    let request = ReconcileRequest {
        primary: load_words("night_drive_transcript.json"),
        secondary: Some(load_words("night_drive_vocals.json")),
        synced_lyrics: Some(load_test_data("night_drive.lrc")),
        ..Default::default()
    };

    let words = reconciler.reconcile(request);
    assert!(is_sorted_by_start(&words), "输出必须按开始时间排序");

    insta::assert_snapshot!(render(&words), @r"
    1.000 we [asr]
    1.500 ride [asr]
    2.000 all [asr]
    2.500 night [lyrics_corrected]
    3.000 no [asr]
    3.400 time [asr]
    3.800 for [lyrics_corrected]
    4.200 the [asr]
    4.600 bull [vocals] *
    5.000 Keep [lyrics_gap]
    5.667 it [lyrics_gap]
    6.333 moving [lyrics_gap]
    7.000 Damn [lyrics] *
    9.500 right [asr]
    ");

    let night = &words[3];
    assert_eq!(night.original_text.as_deref(), Some("knight"));
    assert_eq!(night.start_sec, 2.5, "纠正不应改变时间戳");
}

#[test_log::test]
fn test_full_pipeline_with_plain_lyrics() {
    let reconciler = LyricsReconciler::new().unwrap();
    let request = ReconcileRequest {
        primary: load_words("night_drive_transcript.json"),
        plain_lyrics: Some(load_test_data("night_drive.txt")),
        song_duration: Some(12.0),
        ..Default::default()
    };

    let words = reconciler.reconcile(request);
    assert!(is_sorted_by_start(&words));

    let injected: Vec<(&str, f64)> = words
        .iter()
        .filter(|w| w.detection_source == DetectionSource::LyricsGap)
        .map(|w| (w.text.as_str(), w.start_sec))
        .collect();
    assert_eq!(
        injected,
        [("Keep", 5.82), ("it", 6.74), ("moving", 7.66), ("Damn", 8.58)]
    );
    assert!(
        words.iter().all(|w| w.original_text.is_none()),
        "纯文本歌词不应纠正任何单词"
    );
}

#[test]
fn test_plain_lyrics_need_song_duration() {
    let reconciler = LyricsReconciler::new().unwrap();
    let primary = load_words("night_drive_transcript.json");
    let request = ReconcileRequest {
        primary: primary.clone(),
        plain_lyrics: Some(load_test_data("night_drive.txt")),
        ..Default::default()
    };

    let words = reconciler.reconcile(request);
    assert_eq!(words, primary);
}

#[test]
fn test_individual_stages_are_idempotent_without_lyrics() {
    let reconciler = LyricsReconciler::new().unwrap();
    let words = load_words("night_drive_transcript.json");

    assert_eq!(reconciler.correct_with_lyrics(words.clone(), ""), words);
    assert_eq!(reconciler.fill_gaps_synced(words.clone(), ""), words);
    assert_eq!(reconciler.fill_gaps_plain(words.clone(), "", 12.0), words);
    assert!(reconciler.scan_lyrics_for_profanity("", &words).is_empty());
}

#[test]
fn test_result_round_trips_through_json() {
    let reconciler = LyricsReconciler::new().unwrap();
    let request = ReconcileRequest {
        primary: load_words("night_drive_transcript.json"),
        synced_lyrics: Some(load_test_data("night_drive.lrc")),
        ..Default::default()
    };
    let words = reconciler.reconcile(request);

    let json = to_json(&words).unwrap();
    assert!(json.contains(r#""original_word":"knight""#));
    assert!(json.contains(r#""detection_source":"lyrics_gap""#));

    let decoded = parse_word_records(&json).unwrap();
    assert_eq!(render(&decoded), render(&words));
}

#[test]
fn test_custom_terms_extend_the_word_list() {
    let lyrics = "[00:01.00] oh fiddlesticks\n[00:03.00] end";
    let words = vec![WordRecord::new("oh", 1.0, 1.2, 0.9)];

    let plain = LyricsReconciler::new().unwrap();
    assert!(plain.scan_lyrics_for_profanity(lyrics, &words).is_empty());

    let filter = ProfanityFilter::with_custom_terms(["Fiddlesticks"]).unwrap();
    let custom = LyricsReconciler::with_options(filter, ReconcileOptions::default()).unwrap();
    let found = custom.scan_lyrics_for_profanity(lyrics, &words);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text, "fiddlesticks");
}

#[test]
fn test_censor_plan_for_reconciled_words() {
    let reconciler = LyricsReconciler::new().unwrap();
    let request = ReconcileRequest {
        primary: load_words("night_drive_transcript.json"),
        secondary: Some(load_words("night_drive_vocals.json")),
        synced_lyrics: Some(load_test_data("night_drive.lrc")),
        ..Default::default()
    };
    let words = reconciler.reconcile(request);

    let regions = reconciler.plan_censor(&words, CensorType::Beep, 12_000);
    let spans: Vec<(&str, u64, u64)> = regions
        .iter()
        .map(|r| (r.word.as_str(), r.start_ms, r.end_ms))
        .collect();
    assert_eq!(spans, [("bull", 4550, 5000), ("Damn", 6950, 7450)]);
}
