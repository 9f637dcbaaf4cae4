// キャンセルとバックプレッシャーの統合テスト
use crate::fixtures::*;
use prodsim::{CancellationToken, ExitReason, LineState, PassThrough, ProductionLine};
use std::time::Duration;
use tokio::time::timeout;

const LIMIT: Duration = Duration::from_secs(5);

async fn wait_for_state(line: &ProductionLine, expected: LineState) {
    timeout(LIMIT, async {
        while line.state() != expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("line never reached {expected:?}"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bakery_line_cancels_cleanly() {
    let mut line = fixed_delay_line(&["bake", "ice", "pack"], Duration::from_millis(1));
    line.start().unwrap();
    let mut stream = line.items().unwrap();

    assert_eq!(take_within(&mut stream, 10, LIMIT).await, (0..10).collect::<Vec<u64>>());

    line.cancel();

    // キャンセル後は有限個でストリームが閉じる
    let rest = timeout(LIMIT, stream.collect_all()).await.unwrap();
    for (offset, item) in rest.iter().enumerate() {
        assert_eq!(item.id(), 10 + offset as u64);
    }

    let summary = timeout(LIMIT, line.wait()).await.unwrap().unwrap();
    assert_eq!(summary.source.exit, ExitReason::Cancelled);
    for stage in &summary.stages {
        assert_eq!(stage.exit, ExitReason::Cancelled, "stage {}", stage.name);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unread_line_is_bounded_by_queue_capacity() {
    const STAGES: u64 = 3;

    let mut line = ProductionLine::new();
    for index in 0..STAGES {
        line.add_stage(format!("pass-{index}"), PassThrough::new())
            .unwrap();
    }
    line.start().unwrap();
    let stream = line.items().unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(line.state(), LineState::Running);

    line.cancel();
    drop(stream);
    let summary = timeout(LIMIT, line.wait()).await.unwrap().unwrap();

    // キュー(N+1個)と各ステージの手元(N個)に収まる分しか投入されない
    assert!(
        summary.source.emitted <= 2 * STAGES + 1,
        "source emitted {}",
        summary.source.emitted
    );
    // 末尾キューに入ったまま読まれなかった分だけ
    assert!(summary.delivered() <= 1, "delivered {}", summary.delivered());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_does_not_interrupt_work_in_progress() {
    let gate = GateStage::new();
    let mut line = ProductionLine::new();
    line.add_stage("gate", gate.clone()).unwrap();
    line.start().unwrap();
    let _stream = line.items().unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    line.cancel();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // 作業中のステージが残っている
    assert_eq!(line.state(), LineState::Draining);

    gate.release();
    wait_for_state(&line, LineState::Terminated).await;

    let summary = line.wait().await.unwrap();
    let report = summary.stage("gate").unwrap();
    assert_eq!(report.received, 1);
    assert_eq!(report.emitted, 0);
    assert_eq!(report.exit, ExitReason::Cancelled);
}

#[tokio::test]
async fn test_token_cancelled_before_start_produces_nothing() {
    let token = CancellationToken::new();
    token.cancel();

    let mut line = ProductionLine::with_token(token);
    line.add_stage("bake", instant_stage()).unwrap();
    line.start().unwrap();

    let items = timeout(LIMIT, line.items().unwrap().collect_all())
        .await
        .unwrap();
    assert!(items.is_empty());

    let summary = line.wait().await.unwrap();
    assert_eq!(summary.source.emitted, 0);
    assert_eq!(summary.source.exit, ExitReason::Cancelled);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_token_stops_every_line() {
    for _ in 0..20 {
        let token = CancellationToken::new();

        let mut lines = Vec::new();
        for _ in 0..3 {
            let mut line = ProductionLine::with_token(token.clone());
            line.add_stage("pass", PassThrough::new()).unwrap();
            line.start().unwrap();
            lines.push(line);
        }

        tokio::time::sleep(Duration::from_millis(5)).await;
        token.cancel();
        tokio::time::sleep(Duration::from_millis(5)).await;

        for line in lines {
            let summary = timeout(LIMIT, line.wait()).await.unwrap().unwrap();
            assert_eq!(summary.source.exit, ExitReason::Cancelled);
            assert_eq!(summary.stages[0].exit, ExitReason::Cancelled);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_task_reports_cancelled_under_load() {
    for round in 0..50 {
        let mut line = ProductionLine::new();
        for name in ["bake", "ice", "pack"] {
            line.add_stage(name, PassThrough::new()).unwrap();
        }
        line.start().unwrap();
        let mut stream = line.items().unwrap();

        // 全キューが流れている状態でキャンセルする
        take_within(&mut stream, 20, LIMIT).await;
        line.cancel();
        timeout(LIMIT, stream.collect_all()).await.unwrap();

        let summary = timeout(LIMIT, line.wait()).await.unwrap().unwrap();
        assert_eq!(summary.source.exit, ExitReason::Cancelled, "round {round}");
        for stage in &summary.stages {
            assert_eq!(
                stage.exit,
                ExitReason::Cancelled,
                "round {round}, stage {}",
                stage.name
            );
        }
    }
}

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let mut line = ProductionLine::new();
    line.add_stage("pass", PassThrough::new()).unwrap();
    line.start().unwrap();

    line.cancel();
    line.cancel();
    line.token().cancel();

    let summary = timeout(LIMIT, line.wait()).await.unwrap().unwrap();
    assert_eq!(summary.source.exit, ExitReason::Cancelled);
}
