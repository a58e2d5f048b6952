use pdfcast::{
    api::{DurationBucket, Podcast},
    render::{GENERAL_OVERVIEW, duration_label, format_date, format_day, podcast_list, podcast_title},
};

fn pod(topic: Option<&str>) -> Podcast {
    Podcast {
        podcast_id: "pod1".into(),
        created_at: "2025-10-19T09:05:00".into(),
        topic: topic.map(str::to_string),
        duration: "short".into(),
        script: "HOST: Hi\nGUEST: Hello".into(),
        audio_path: "audio/pod1.mp3".into(),
        audio_filename: "pod1.mp3".into(),
        segments_count: 2,
    }
}

#[test]
fn dates_from_naive_and_rfc3339() {
    assert_eq!(format_date("2025-10-19T09:05:00.123456"), "Oct 19, 2025, 09:05 AM");
    assert_eq!(format_date("2025-10-19T21:30:00Z"), "Oct 19, 2025, 09:30 PM");
    assert_eq!(format_day("2025-01-05T00:00:00"), "1/5/2025");
    assert_eq!(format_day("yesterday"), "yesterday");
}

#[test]
fn duration_labels() {
    assert_eq!(DurationBucket::Short.label(), "3-5 min");
    assert_eq!(duration_label("medium"), "5-8 min");
    assert_eq!(duration_label("long"), "10-15 min");
    assert_eq!(duration_label("epic"), "epic");
    assert_eq!("SHORT".parse::<DurationBucket>(), Ok(DurationBucket::Short));
}

#[test]
fn untitled_podcast_is_general_overview() {
    assert_eq!(podcast_title(&pod(None)), GENERAL_OVERVIEW);
    assert_eq!(podcast_title(&pod(Some(""))), GENERAL_OVERVIEW);
    assert_eq!(podcast_title(&pod(Some("Methods"))), "Methods");
}

#[test]
fn only_selected_podcast_shows_script() {
    let list = vec![pod(Some("A")), pod(Some("B"))];
    let text = podcast_list(&list, 1, |f| format!("http://host/audio/{f}"));
    assert!(text.starts_with("Generated Podcasts (2)"));
    assert_eq!(text.matches("script:").count(), 1);
    assert!(text.contains("> 1. B"));
    assert!(text.contains("audio: http://host/audio/pod1.mp3"));
}
