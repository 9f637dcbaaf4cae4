// エンドツーエンド統合テスト
use crate::fixtures::*;
use prodsim::{
    drive, run_for, CancellationToken, ExitReason, FnProcessor, Item, Limit, LineConfig,
    PassThrough, ProductionLine, WorkOutcome,
};
use std::io::Write;
use std::time::Duration;

const LIMIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_line_without_stages_yields_raw_source() {
    let mut line = ProductionLine::new();
    line.start().unwrap();
    let mut stream = line.items().unwrap();

    assert_eq!(take_within(&mut stream, 4, LIMIT).await, vec![0, 1, 2, 3]);

    line.cancel();
    drop(stream);
    let summary = line.wait().await.unwrap();
    assert!(summary.stages.is_empty());
    assert_eq!(summary.source.exit, ExitReason::Cancelled);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_items_keep_source_order_through_every_stage() {
    let recorders = [RecordingStage::new(), RecordingStage::new(), RecordingStage::new()];
    let mut line = ProductionLine::new();
    for (index, recorder) in recorders.iter().enumerate() {
        line.add_stage(format!("stage-{index}"), recorder.clone())
            .unwrap();
    }
    line.start().unwrap();
    let mut stream = line.items().unwrap();

    let ids = take_within(&mut stream, 50, LIMIT).await;
    assert_eq!(ids, (0..50).collect::<Vec<u64>>());

    line.cancel();
    drop(stream);
    line.wait().await.unwrap();

    // 各ステージが見たIDは0からの連番
    for recorder in &recorders {
        let seen = recorder.seen();
        assert!(seen.len() >= 50);
        assert_eq!(seen, (0..seen.len() as u64).collect::<Vec<u64>>());
    }
}

#[tokio::test]
async fn test_limit_ends_the_stream_and_upstream_follows() {
    let mut line = ProductionLine::new();
    line.add_stage("pass", PassThrough::new()).unwrap();
    line.add_stage("limit", Limit::new(5)).unwrap();
    line.start().unwrap();

    let items = tokio::time::timeout(LIMIT, line.items().unwrap().collect_all())
        .await
        .unwrap();
    assert_eq!(items, (0..5).map(Item::new).collect::<Vec<Item>>());

    let summary = line.wait().await.unwrap();
    assert_eq!(summary.stage("limit").unwrap().exit, ExitReason::EndOfStream);
    assert_eq!(summary.stage("pass").unwrap().exit, ExitReason::DownstreamClosed);
    assert_eq!(summary.source.exit, ExitReason::DownstreamClosed);
    assert_eq!(summary.delivered(), 5);
}

#[tokio::test]
async fn test_discarding_stage_filters_items() {
    let mut line = ProductionLine::new();
    line.add_stage(
        "even",
        FnProcessor::new(|item: Item| {
            if item.id() % 2 == 0 {
                WorkOutcome::Emit(item)
            } else {
                WorkOutcome::Discard
            }
        }),
    )
    .unwrap();
    line.add_stage("bake", instant_stage()).unwrap();
    line.start().unwrap();
    let mut stream = line.items().unwrap();

    assert_eq!(take_within(&mut stream, 5, LIMIT).await, vec![0, 2, 4, 6, 8]);

    drop(stream);
    let summary = line.shutdown().await.unwrap();
    let even = summary.stage("even").unwrap();
    assert!(even.emitted >= 5);
    // キャンセル時に手元にあった製品はどちらにも数えない
    assert!(even.received >= even.emitted + even.discarded);
    assert!(even.received <= even.emitted + even.discarded + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fixed_delay_line_for_a_duration() {
    let line = fixed_delay_line(&["baking", "icing", "packaging"], Duration::from_millis(5));

    let (items, summary) = run_for(line, Duration::from_millis(200)).await.unwrap();

    assert!(!items.is_empty());
    let ids: Vec<u64> = items.iter().map(|item| item.id()).collect();
    assert_eq!(ids, (0..ids.len() as u64).collect::<Vec<u64>>());
    assert_eq!(summary.delivered(), items.len() as u64);
    assert_eq!(summary.stages.len(), 3);
}

#[tokio::test]
async fn test_line_built_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "stages": [
                {{ "name": "bake", "kind": "delay", "base_ms": 1, "stddev_ms": 1, "seed": 3 }},
                {{ "name": "ice", "kind": "pass_through" }},
                {{ "name": "stop", "kind": "limit", "count": 3 }}
            ]
        }}"#
    )
    .unwrap();

    let config = LineConfig::from_json_file(file.path()).unwrap();
    let line = config.build_line(CancellationToken::new()).unwrap();

    let mut received = Vec::new();
    let summary = tokio::time::timeout(
        LIMIT,
        drive(line, std::future::pending::<()>(), |item| received.push(item.id())),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(received, vec![0, 1, 2]);
    assert_eq!(summary.stage("stop").unwrap().exit, ExitReason::EndOfStream);
}
