use crate::cli::args::{ListenArgs, OutputFormat};
use crate::exit_codes::SUCCESS;
use anyhow::Context;
use resultcast_core::{ReceiveError, ResultEvent, ResultReceiver};
use std::time::Duration;

/// Pause after the listening socket itself fails (e.g. out of descriptors).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(250);

pub async fn run(args: ListenArgs) -> anyhow::Result<i32> {
    let mut receiver = ResultReceiver::bind(args.bind.as_str())
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    if let Some(read_timeout) = args.read_timeout {
        receiver = receiver.with_read_timeout(read_timeout.into());
    }
    tracing::info!(addr = %receiver.local_addr()?, "listening for result events");

    let mut seen = 0usize;
    while !matches!(args.count, Some(max) if seen >= max) {
        match receiver.accept_event().await {
            Ok((event, _peer)) => {
                seen += 1;
                println!("{}", render(&event, args.format)?);
            }
            Err(e) => {
                let backoff = retry_delay(&e);
                tracing::warn!(error = %e, "skipping result connection");
                if let Some(delay) = backoff {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Ok(SUCCESS)
}

/// Accept failures repeat until the cause clears; per-connection errors do not.
fn retry_delay(err: &ReceiveError) -> Option<Duration> {
    match err {
        ReceiveError::Accept(_) => Some(ACCEPT_BACKOFF),
        ReceiveError::Io { .. } | ReceiveError::Timeout { .. } | ReceiveError::Wire(_) => None,
    }
}

fn render(event: &ResultEvent, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string(event)?);
    }
    let line = match event {
        ResultEvent::Ping => "ping".to_string(),
        ResultEvent::RunStarted { platform, planned } => {
            format!("run_started platform={platform} planned={}", planned.len())
        }
        ResultEvent::TestStarted { result } => format!("test_started {}", result.name),
        ResultEvent::TestFinished { result } => {
            let mut line = format!(
                "test_finished {} {:?} {:.3}s",
                result.name,
                result.status,
                result.duration.as_secs_f64()
            );
            if let Some(msg) = &result.message {
                line.push_str(" -- ");
                line.push_str(msg.lines().next().unwrap_or_default());
            }
            line
        }
        ResultEvent::RunFinished { results } => {
            let failed = results.iter().filter(|r| r.status.is_failure()).count();
            format!("run_finished results={} failed={failed}", results.len())
        }
    };
    Ok(line)
}
