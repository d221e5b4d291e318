//! Shell command executor.
//!
//! Runs registered invocations through `sh -c` and captures their
//! combined output. Every failure mode (spawn error, non-zero exit,
//! timeout) collapses into the fixed user-facing failure reply; the
//! underlying error is only logged.

use async_trait::async_trait;
use blogbot_core::command::{CommandExecutor, EXECUTION_FAILED_REPLY};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes invocations via `sh -c` with a hard timeout.
pub struct ShellExecutor {
    timeout: Duration,
}

impl ShellExecutor {
    /// Executor with the default 30 second timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Executor with an explicit timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn run(&self, invocation: &str) -> std::io::Result<Output> {
        Command::new("sh")
            .arg("-c")
            .arg(invocation)
            // The child must not outlive a timed-out future.
            .kill_on_drop(true)
            .output()
            .await
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn execute(&self, invocation: &str) -> String {
        let output = match timeout(self.timeout, self.run(invocation)).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                warn!(error = %err, invocation, "failed to spawn shell command");
                return EXECUTION_FAILED_REPLY.to_string();
            }
            Err(_) => {
                warn!(invocation, timeout = ?self.timeout, "shell command timed out");
                return EXECUTION_FAILED_REPLY.to_string();
            }
        };

        if !output.status.success() {
            warn!(invocation, status = ?output.status, "shell command exited non-zero");
            return EXECUTION_FAILED_REPLY.to_string();
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        text.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let executor = ShellExecutor::new();
        assert_eq!(executor.execute("echo pong").await, "pong");
    }

    #[tokio::test]
    async fn test_captures_combined_output() {
        let executor = ShellExecutor::new();
        let output = executor.execute("echo out; echo err 1>&2").await;
        assert!(output.contains("out"));
        assert!(output.contains("err"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_soft_failure() {
        let executor = ShellExecutor::new();
        assert_eq!(executor.execute("exit 3").await, EXECUTION_FAILED_REPLY);
    }

    #[tokio::test]
    async fn test_timeout_is_soft_failure() {
        let executor = ShellExecutor::with_timeout(Duration::from_millis(100));
        assert_eq!(executor.execute("sleep 5").await, EXECUTION_FAILED_REPLY);
    }

    #[tokio::test]
    async fn test_empty_output() {
        let executor = ShellExecutor::new();
        assert_eq!(executor.execute("true").await, "");
    }
}
