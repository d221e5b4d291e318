//! Command executor trait.

use async_trait::async_trait;

/// Fixed user-facing reply when an invocation cannot be run.
pub const EXECUTION_FAILED_REPLY: &str = "Command execution failed!";

/// Runs a resolved shell invocation and captures its output.
///
/// Implementations must never propagate a fault: spawn failure,
/// non-zero exit, and timeout all collapse into
/// [`EXECUTION_FAILED_REPLY`]. Executing arbitrary shell text gated
/// only by the shared admin password is an accepted security concern of
/// this feature; deployments wanting stronger guarantees should swap in
/// an allow-list executor behind this trait.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Executes `invocation` and returns its combined output as text.
    async fn execute(&self, invocation: &str) -> String;
}
