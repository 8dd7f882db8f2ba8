//! Progress reporting for generation runs

use colored::Colorize;
use forge_application::RunStateListener;
use forge_domain::{OrchestratorRunState, RunStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports run progress with an indicatif bar
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(Self::run_style());
        Self { bar }
    }

    fn run_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn status_label(status: RunStatus) -> &'static str {
        match status {
            RunStatus::Idle => "Idle",
            RunStatus::Validating => "Validating",
            RunStatus::ContextBuilding => "Context",
            RunStatus::Invoking => "Generating",
            RunStatus::Retrying => "Retrying",
            RunStatus::Success => "Done",
            RunStatus::Error => "Failed",
            RunStatus::Cancelled => "Cancelled",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStateListener for ProgressReporter {
    fn on_state_change(&self, state: &OrchestratorRunState) {
        if state.status == RunStatus::Idle {
            return;
        }

        self.bar.set_prefix(Self::status_label(state.status));
        self.bar.set_position(u64::from(state.progress));

        match state.status {
            RunStatus::Success => self
                .bar
                .finish_with_message(format!("{}", state.current_step.green())),
            RunStatus::Error => self
                .bar
                .abandon_with_message(format!("{}", state.current_step.red())),
            RunStatus::Cancelled => self
                .bar
                .abandon_with_message(format!("{}", state.current_step.yellow())),
            _ => {
                self.bar.set_message(state.current_step.clone());
                self.bar.tick();
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Prints one line per step change.
#[derive(Default)]
pub struct SimpleProgress {
    last_step: Mutex<Option<(RunStatus, String)>>,
}

impl SimpleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(state: &OrchestratorRunState) -> String {
        let marker = match state.status {
            RunStatus::Success => "v".green(),
            RunStatus::Error => "x".red(),
            RunStatus::Cancelled => "-".yellow(),
            _ => "->".cyan(),
        };
        format!(
            "{} [{:>3}%] {}",
            marker,
            state.progress,
            state.current_step.as_str().bold()
        )
    }

    /// Returns the line to print, or `None` if the step did not change.
    fn next_line(&self, state: &OrchestratorRunState) -> Option<String> {
        if state.status == RunStatus::Idle {
            return None;
        }

        let key = (state.status, state.current_step.clone());
        let mut last = match self.last_step.lock() {
            Ok(last) => last,
            Err(poisoned) => poisoned.into_inner(),
        };
        if last.as_ref() == Some(&key) {
            return None;
        }
        *last = Some(key);
        Some(Self::line(state))
    }
}

impl RunStateListener for SimpleProgress {
    fn on_state_change(&self, state: &OrchestratorRunState) {
        if let Some(line) = self.next_line(state) {
            eprintln!("{}", line);
        }
    }
}
