use api_client::{JobId, JobRecord, MockApi, MockCall, MockReply, PollPolicy};
use serde_json::json;
use session::{Applied, Workbench};
use std::sync::Arc;

fn record(value: serde_json::Value) -> JobRecord {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_fountain_file_through_job_polling() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("Pilot.Fountain");
    std::fs::write(&script, "INT. LAB - NIGHT\n\nMARA\nIt works.\n").unwrap();

    let mock = Arc::new(MockApi::new());
    mock.push_reply(MockReply::body(json!({"job_id": "j-7"})));
    mock.set_job(
        &JobId::new("j-7"),
        vec![
            record(json!({"status": "processing", "progress": 50})),
            record(json!({
                "status": "completed",
                "result_json": json!({
                    "scene_id": 1,
                    "location": "LAB",
                    "beats": [
                        {"beat_id": "1-1", "emotional_arc": {"primary_emotion": {"emotion": "surprise", "intensity": 65}}}
                    ],
                    "pacing_metadata": {"average_pace": 8.2, "overall_pacing": "Fast"}
                }).to_string()
            })),
        ],
    );

    let policy = PollPolicy::default().with_max_attempts(5).with_interval_ms(1);
    let bench = Workbench::new(mock.clone(), policy);

    let applied = bench.submit_files(&[script]).await.unwrap();
    assert_eq!(applied, Applied::Replaced { scenes: 1, beats: 1 });

    let calls = mock.calls();
    assert!(matches!(
        &calls[0],
        MockCall::Analyze { title, .. } if title == "Pilot"
    ));
    assert_eq!(mock.job_polls(&JobId::new("j-7")), 2);

    let session = bench.snapshot();
    assert_eq!(session.job_id(), Some(&JobId::new("j-7")));
    assert_eq!(session.script().length, 33);
    let result = session.result().unwrap();
    assert_eq!(
        result.pacing.as_ref().and_then(|p| p.overall_pacing.as_deref()),
        Some("Fast")
    );

    bench.select_beat("1-1").unwrap();
    let exported = bench.export_selected_beat(dir.path()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(exported).unwrap()).unwrap();
    assert_eq!(value["full_scene_context"]["location"], "LAB");
}

#[tokio::test]
async fn test_failed_job_sets_error_banner() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("draft.txt");
    std::fs::write(&script, "FADE IN:").unwrap();

    let mock = Arc::new(MockApi::new());
    mock.push_reply(MockReply::body(json!({"job_id": "j-8"})));
    mock.set_job(
        &JobId::new("j-8"),
        vec![record(json!({"status": "failed", "error": "No valid scenes found in input text"}))],
    );

    let bench = Workbench::new(mock, PollPolicy::single_shot());
    let applied = bench.submit_files(&[script]).await.unwrap();

    assert!(matches!(applied, Applied::Failed(ref message) if message.contains("No valid scenes")));
    let session = bench.snapshot();
    assert!(session.result().is_none());
    assert!(session.error().unwrap().contains("No valid scenes"));
}
