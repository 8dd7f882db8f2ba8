//! Presentation-level configuration
//!
//! Resolved output settings for one invocation.

use forge_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Full,
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// CLI flags win over file settings.
    pub fn with_cli_overrides(mut self, format: Option<OutputFormat>, quiet: bool) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        if quiet {
            self.show_progress = false;
        }
        // JSON goes to stdout untouched, so keep the terminal quiet too.
        if self.format == OutputFormat::Json {
            self.color = false;
        }
        self
    }

    /// Turn off ANSI colors process-wide when disabled.
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}
