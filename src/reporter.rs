//! Where the harness sends what it observes.
//!
//! The harness never talks to a test framework directly. It needs two
//! capabilities: a [`Recorder`] for informational entries and non-fatal
//! failures, and a [`FatalReporter`] that can abort the current test.

use std::sync::Mutex;

pub trait Recorder: Send + Sync {
    /// Informational entry.
    fn log(&self, message: &str);

    /// Marks the test failed and keeps running.
    fn error(&self, message: &str);
}

pub trait FatalReporter: Recorder {
    /// Aborts the current test.
    fn fatal(&self, message: &str) -> !;
}

/// Reporter for `#[test]` functions.
///
/// Entries go to `tracing`. Failures recorded with [`Recorder::error`] are
/// kept and turned into a panic when the reporter is dropped, so a test that
/// saw a failure cannot pass.
pub struct TestReporter {
    name: String,
    failures: Mutex<Vec<String>>,
}

impl TestReporter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drops recorded failures and returns them.
    pub fn take_failures(&self) -> Vec<String> {
        std::mem::take(&mut *self.failures.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Recorder for TestReporter {
    fn log(&self, message: &str) {
        tracing::info!("[{}] {}", self.name, message);
    }

    fn error(&self, message: &str) {
        tracing::error!("[{}] {}", self.name, message);
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}

impl FatalReporter for TestReporter {
    fn fatal(&self, message: &str) -> ! {
        tracing::error!("[{}] fatal: {}", self.name, message);
        panic!("{}: {}", self.name, message)
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let failures = self.take_failures();
        if !failures.is_empty() {
            panic!(
                "{} recorded {} failure(s):\n{}",
                self.name,
                failures.len(),
                failures.join("\n")
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Log(String),
    Failure(String),
}

/// Captures every entry in order; used to assert on what the harness reported.
#[derive(Default)]
pub struct RecordingReporter {
    entries: Mutex<Vec<Entry>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Log(m) => Some(m),
                Entry::Failure(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Failure(m) => Some(m),
                Entry::Log(_) => None,
            })
            .collect()
    }

    fn push(&self, entry: Entry) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }
}

impl Recorder for RecordingReporter {
    fn log(&self, message: &str) {
        self.push(Entry::Log(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Entry::Failure(message.to_string()));
    }
}

impl FatalReporter for RecordingReporter {
    fn fatal(&self, message: &str) -> ! {
        panic!("fatal: {}", message)
    }
}
