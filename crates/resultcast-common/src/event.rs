use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identity of a test as planned by the harness, before it runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestDescriptor {
    /// Fully qualified test name.
    pub name: String,
    /// Grouping path (fixture / suite hierarchy).
    pub path: String,
}

impl TestDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Success,
    Failure,
    Error,
    Inconclusive,
    Ignored,
    NotRunnable,
    Running,
}

impl TestStatus {
    /// Everything except `Running` is a final verdict.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TestStatus::Running)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, TestStatus::Failure | TestStatus::Error)
    }
}

/// Identity plus execution result of one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub path: String,
    pub status: TestStatus,
    #[serde(default)]
    pub duration: Duration,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack_trace: Option<String>,
}

impl TestOutcome {
    /// Outcome for a test that has just started: identity only, status `Running`.
    pub fn running(test: &TestDescriptor) -> Self {
        Self {
            name: test.name.clone(),
            path: test.path.clone(),
            status: TestStatus::Running,
            duration: Duration::ZERO,
            message: None,
            stack_trace: None,
        }
    }

    pub fn with_status(mut self, status: TestStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn descriptor(&self) -> TestDescriptor {
        TestDescriptor::new(self.name.clone(), self.path.clone())
    }
}

/// Tag of a [`ResultEvent`], used for dispatch on the receiving side and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Ping,
    RunStarted,
    RunFinished,
    TestStarted,
    TestFinished,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Ping => "ping",
            MessageType::RunStarted => "run_started",
            MessageType::RunFinished => "run_finished",
            MessageType::TestStarted => "test_started",
            MessageType::TestFinished => "test_finished",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle event of a test run, as sent over the wire.
///
/// Events own all of their data. Every constructor copies its input, so the
/// harness may keep mutating its own results after an event was built
/// without the change showing up in the event.
///
/// Variant order is the wire tag; append new variants at the end only.
/// Must stay externally tagged: bincode cannot decode internally tagged enums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultEvent {
    Ping,
    RunStarted {
        platform: String,
        planned: Vec<TestDescriptor>,
    },
    RunFinished {
        results: Vec<TestOutcome>,
    },
    TestStarted {
        result: TestOutcome,
    },
    TestFinished {
        result: TestOutcome,
    },
}

impl ResultEvent {
    pub fn ping() -> Self {
        ResultEvent::Ping
    }

    pub fn run_started(platform: &str, planned: &[TestDescriptor]) -> Self {
        ResultEvent::RunStarted {
            platform: platform.to_string(),
            planned: planned.to_vec(),
        }
    }

    /// An empty `results` slice is valid: it reports an interrupted run.
    pub fn run_finished(results: &[TestOutcome]) -> Self {
        ResultEvent::RunFinished {
            results: results.to_vec(),
        }
    }

    pub fn test_started(outcome: &TestOutcome) -> Self {
        ResultEvent::TestStarted {
            result: outcome.clone(),
        }
    }

    pub fn test_finished(outcome: &TestOutcome) -> Self {
        ResultEvent::TestFinished {
            result: outcome.clone(),
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            ResultEvent::Ping => MessageType::Ping,
            ResultEvent::RunStarted { .. } => MessageType::RunStarted,
            ResultEvent::RunFinished { .. } => MessageType::RunFinished,
            ResultEvent::TestStarted { .. } => MessageType::TestStarted,
            ResultEvent::TestFinished { .. } => MessageType::TestFinished,
        }
    }
}
