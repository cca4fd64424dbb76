//! Terminal rendering of job status

use aurity_core::domain::{JobId, JobKind, JobState, JobStatus, PollError, PollOutcome};
use aurity_poller::PollSnapshot;
use colored::*;

/// Print one line for a freshly observed status
pub fn print_progress_line(snapshot: &PollSnapshot, kind: JobKind) {
    let Some(status) = &snapshot.status else {
        return;
    };

    println!(
        "{} {} {} {}",
        status.observed_at.format("%H:%M:%S").to_string().dimmed(),
        snapshot.job_id.to_string().cyan(),
        colorize_state(status.state),
        status.summary(kind)
    );
    println!(
        "    {}",
        format!(
            "attempt {}, next check in {} ms",
            snapshot.total_attempts,
            snapshot.current_interval.as_millis()
        )
        .dimmed()
    );
}

/// Print the final result of one session
pub fn print_outcome(job_id: &JobId, kind: JobKind, outcome: Option<&PollOutcome>, attempts: u32) {
    let line = match outcome {
        Some(Ok(status)) => format!("{} {}", "✓".green(), status.summary(kind)),
        Some(Err(PollError::JobFailed { message })) => {
            format!("{} {} failed: {}", "✗".red(), kind.label(), message.red())
        }
        Some(Err(err @ PollError::TimedOut { .. })) => {
            format!("{} {}", "⏱".yellow(), err.to_string().yellow())
        }
        None => format!("{} {}", "–".dimmed(), "cancelled".dimmed()),
    };

    println!(
        "{} {} {}",
        job_id.to_string().cyan(),
        line,
        format!("({} checks)", attempts).dimmed()
    );
}

/// Print detailed status information
pub fn print_status_details(job_id: &JobId, kind: JobKind, status: &JobStatus) {
    println!("{}", "Job Status:".bold());
    println!("  ID:       {}", job_id.to_string().cyan());
    println!("  Kind:     {}", kind);
    println!("  State:    {}", colorize_state(status.state));
    println!("  Progress: {}", status.progress);
    println!("  Summary:  {}", status.summary(kind));
    println!(
        "  Observed: {}",
        status.observed_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(error) = &status.error_message {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }

    if !status.extra.is_empty() {
        println!("\n{}", "Details:".bold());
        for (key, value) in &status.extra {
            println!("  {} = {}", key.cyan(), value);
        }
    }
}

/// Colorize job state for display
fn colorize_state(state: JobState) -> ColoredString {
    let state_str = state.as_str();
    match state {
        JobState::Pending => state_str.yellow(),
        JobState::InProgress => state_str.cyan(),
        JobState::Completed => state_str.green(),
        JobState::Failed => state_str.red(),
    }
}
