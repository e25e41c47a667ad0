use crate::cli::args::ReportArgs;
use crate::exit_codes::{DELIVERY_FAILED, SUCCESS};
use anyhow::Context;
use resultcast_core::{
    ListenerSet, NetworkResultSender, RunListener, TestDescriptor, TestOutcome, TracingListener,
};

pub async fn run(args: ReportArgs) -> anyhow::Result<i32> {
    let raw = std::fs::read_to_string(&args.results)
        .with_context(|| format!("failed to read {}", args.results.display()))?;
    let results: Vec<TestOutcome> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", args.results.display()))?;
    let cfg = args.sender.resolve()?;

    let mut listeners = ListenerSet::new()
        .with(TracingListener)
        .with(NetworkResultSender::new(cfg));

    let delivered = replay(
        &mut listeners,
        &args.platform,
        &results,
        args.interrupt_after,
    )
    .await;

    if delivered {
        Ok(SUCCESS)
    } else {
        tracing::warn!("some result events were not delivered");
        Ok(DELIVERY_FAILED)
    }
}

/// Drive `listener` through a recorded run in harness order.
pub async fn replay(
    listener: &mut dyn RunListener,
    platform: &str,
    results: &[TestOutcome],
    interrupt_after: Option<usize>,
) -> bool {
    let planned: Vec<TestDescriptor> = results.iter().map(TestOutcome::descriptor).collect();
    let executed = interrupt_after.unwrap_or(results.len()).min(results.len());

    let mut all = listener.run_started(platform, &planned).await;
    for outcome in &results[..executed] {
        all &= listener
            .test_started(&TestOutcome::running(&outcome.descriptor()))
            .await;
        all &= listener.test_finished(outcome).await;
    }

    if executed < results.len() {
        all &= listener.run_interrupted(&planned[executed..]).await;
    } else {
        all &= listener.run_finished(results).await;
    }
    all
}
