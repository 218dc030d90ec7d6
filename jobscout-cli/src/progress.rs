//! Live progress line for polled tasks

use colored::*;
use jobscout_client::poller::{PollProgress, ProgressSink};
use std::io::Write;

/// Rewrites a single stderr line before every status check
pub struct ProgressLine {
    verb: &'static str,
}

impl ProgressLine {
    pub fn new(verb: &'static str) -> Self {
        Self { verb }
    }

    /// Ends the progress line so later output starts on a fresh line
    pub fn finish(&self) {
        eprintln!();
    }
}

impl ProgressSink for ProgressLine {
    fn on_progress(&self, progress: &PollProgress<'_>) {
        eprint!("\r{}", format_progress(self.verb, progress).dimmed());
        let _ = std::io::stderr().flush();
    }
}

/// Text of the progress line, e.g. `Searching for "rust"... (12s, check 4/200)`
pub fn format_progress(verb: &str, progress: &PollProgress<'_>) -> String {
    format!(
        "{} \"{}\"... ({}s, check {}/{})",
        verb,
        progress.label,
        progress.elapsed.as_secs(),
        progress.attempt,
        progress.max_attempts
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_progress() {
        let progress = PollProgress {
            task_id: "t1",
            label: "backend engineer",
            attempt: 4,
            max_attempts: 200,
            elapsed: Duration::from_millis(12_000),
        };
        assert_eq!(
            format_progress("Searching for", &progress),
            "Searching for \"backend engineer\"... (12s, check 4/200)"
        );
    }
}
