//! End-to-end: sender against a real receiver on loopback.

use resultcast_core::{
    ConnectionState, NetworkResultSender, ResultEvent, ResultReceiver, SenderConfig,
    TestDescriptor, TestOutcome, TestStatus,
};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

fn sender_for(addr: SocketAddr) -> NetworkResultSender {
    let cfg = SenderConfig::new(addr.ip().to_string(), addr.port())
        .with_timeout(Duration::from_secs(2));
    NetworkResultSender::new(cfg)
}

async fn drain(rx: &ResultReceiver, n: usize) -> Vec<(ResultEvent, SocketAddr)> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(rx.accept_event().await.expect("accept event"));
    }
    out
}

#[tokio::test]
async fn full_run_arrives_in_order_on_separate_connections() {
    let rx = ResultReceiver::bind("127.0.0.1:0").await.unwrap();
    let mut tx = sender_for(rx.local_addr().unwrap());

    let test_a = TestDescriptor::new("Suite.test_a", "Suite");
    let test_b = TestDescriptor::new("Suite.test_b", "Suite");
    let mut a = TestOutcome::running(&test_a);

    assert!(tx.notify_run_started("Editor", &[test_a.clone(), test_b.clone()]).await);
    assert!(tx.notify_test_started(&a).await);

    a.status = TestStatus::Success;
    a.duration = Duration::from_millis(1200);
    assert!(tx.notify_test_finished(&a).await);

    let b = TestOutcome::running(&test_b).with_status(TestStatus::NotRunnable);
    assert!(tx.notify_run_finished(&[a.clone(), b.clone()]).await);

    let got = drain(&rx, 4).await;
    let events: Vec<_> = got.iter().map(|(e, _)| e.clone()).collect();
    assert_eq!(
        events,
        vec![
            ResultEvent::RunStarted {
                platform: "Editor".into(),
                planned: vec![test_a.clone(), test_b],
            },
            ResultEvent::TestStarted {
                result: TestOutcome::running(&test_a),
            },
            ResultEvent::TestFinished { result: a.clone() },
            ResultEvent::RunFinished {
                results: vec![a, b],
            },
        ]
    );

    // Each event came from a distinct client socket.
    let mut peers: Vec<_> = got.iter().map(|(_, p)| *p).collect();
    peers.sort();
    peers.dedup();
    assert_eq!(peers.len(), 4);
}

#[tokio::test]
async fn listener_drop_latches_until_probe_after_restart() {
    let rx = ResultReceiver::bind("127.0.0.1:0").await.unwrap();
    let addr = rx.local_addr().unwrap();
    let mut tx = sender_for(addr);

    assert!(tx.probe().await);
    drain(&rx, 1).await;
    drop(rx);

    let outcome = TestOutcome::running(&TestDescriptor::new("Suite.test_a", "Suite"));
    assert!(!tx.notify_test_started(&outcome).await);
    assert_eq!(tx.state(), ConnectionState::Disabled);

    let started = Instant::now();
    for _ in 0..10 {
        assert!(!tx.notify_test_finished(&outcome).await);
    }
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "disabled sends must return without blocking"
    );

    let rx = ResultReceiver::bind(addr).await.unwrap();
    assert!(tx.probe().await);
    assert_eq!(tx.state(), ConnectionState::Live);
    assert!(tx.notify_run_interrupted(&[outcome.descriptor()]).await);

    let events: Vec<_> = drain(&rx, 2).await.into_iter().map(|(e, _)| e).collect();
    assert_eq!(
        events,
        vec![ResultEvent::Ping, ResultEvent::RunFinished { results: vec![] }]
    );
}

#[tokio::test]
async fn absent_listener_with_refusal_disables_reporting() {
    let addr = {
        let rx = ResultReceiver::bind("127.0.0.1:0").await.unwrap();
        rx.local_addr().unwrap()
    };
    let mut tx = sender_for(addr);

    assert!(!tx.probe().await);
    assert_eq!(tx.state(), ConnectionState::Live, "probe always re-arms");

    assert!(!tx.notify_run_started("Editor", &[]).await);
    assert_eq!(tx.state(), ConnectionState::Disabled);
}
