//! Classify command: offline view of the outcome rules.

use anyhow::Result;
use rwc_core::retry::{classify_status, error_kind_for_status, retry_after_duration, StatusClass};

/// Print the outcome class (and retry delay, when recoverable) for `status`.
pub fn run_classify(status: u32, retry_after: Option<&str>, retry_on_rate_limit: bool) -> Result<()> {
    if !(100..=599).contains(&status) {
        anyhow::bail!("not an HTTP status code: {}", status);
    }
    println!("{}", describe(status, retry_after, retry_on_rate_limit));
    Ok(())
}

pub(crate) fn describe(status: u32, retry_after: Option<&str>, retry_on_rate_limit: bool) -> String {
    match classify_status(status, retry_on_rate_limit) {
        StatusClass::Success => format!("{}: success", status),
        StatusClass::NonRecoverable => format!("{}: non-recoverable", status),
        StatusClass::Recoverable => {
            let delay = retry_after_duration(retry_after.unwrap_or(""));
            format!(
                "{}: recoverable ({:?}), retry after {}s",
                status,
                error_kind_for_status(status),
                delay.as_secs()
            )
        }
    }
}
