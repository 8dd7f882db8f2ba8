//! Console output formatter for generation results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use forge_domain::{ClassifiedError, GenerationResult, IndividualizationLevel, Severity};

/// Formats generation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result
    pub fn format(result: &GenerationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(result.service_type.label()));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Student:".cyan().bold(),
            result.subject_id
        ));
        output.push_str(&format!(
            "{} {}\n\n",
            "Result:".cyan().bold(),
            result.id.dimmed()
        ));

        output.push_str(&Self::section_header("Content"));
        output.push_str(&format!(
            "\n{}\n",
            result.content.as_deref().unwrap_or("(no content)")
        ));

        output.push_str(&Self::section_header("Quality"));
        output.push_str(&format!(
            "  Quality score:    {}\n  Confidence:       {}\n  Individualization: {}\n",
            Self::score(result.quality_score),
            Self::score(result.confidence_level),
            Self::individualization(result.context_usage.individualization_level()),
        ));

        let usage = &result.context_usage;
        output.push_str(&Self::section_header("Context Usage"));
        output.push_str(&format!("  Completeness: {}%\n", usage.completeness));
        for (label, items) in [
            ("Data sources", &usage.data_sources_used),
            ("Individualized", &usage.individualized_elements),
            ("Adaptations", &usage.adaptations_applied),
            ("Support needs", &usage.support_needs_addressed),
        ] {
            if !items.is_empty() {
                output.push_str(&format!("  {}: {}\n", label, items.join(", ")));
            }
        }

        let meta = &result.metadata;
        output.push_str(&Self::section_header("Metadata"));
        output.push_str(&format!(
            "  Model: {}  (temperature {}, max tokens {})\n  Tokens: {} prompt + {} completion = {}\n  Processing time: {} ms, retries: {}\n",
            meta.model,
            meta.temperature,
            meta.max_tokens,
            meta.tokens.prompt,
            meta.tokens.completion,
            meta.total_tokens(),
            meta.processing_time_ms,
            meta.retry_count,
        ));

        if !result.warnings.is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
            for warning in &result.warnings {
                output.push_str(&format!("  * {}\n", warning));
            }
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &GenerationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the generated content only
    pub fn format_content_only(result: &GenerationResult) -> String {
        let mut output = result.content.clone().unwrap_or_default();
        output.push('\n');
        output
    }

    /// Format a classified error: user-facing message, hint and code.
    ///
    /// The technical message is left to the logs.
    pub fn format_error(error: &ClassifiedError) -> String {
        let label = match error.severity {
            Severity::Low => "Notice:".yellow().bold(),
            Severity::Medium => "Warning:".yellow().bold(),
            Severity::High | Severity::Critical => "Error:".red().bold(),
        };

        let mut output = format!("{} {}\n", label, error.user_facing_message);
        output.push_str(&format!("  {} {}\n", "Hint:".cyan(), error.troubleshooting));
        if !error.diagnostics.problems.is_empty() {
            for problem in &error.diagnostics.problems {
                output.push_str(&format!("  - {}\n", problem));
            }
        }
        output.push_str(&format!(
            "  {}\n",
            format!(
                "[{}] {} ({})",
                error.code,
                error.correlation_id,
                if error.retryable {
                    "retryable"
                } else {
                    "not retryable"
                }
            )
            .dimmed()
        ));
        output
    }

    /// Format an error as JSON
    pub fn format_error_json(error: &ClassifiedError) -> String {
        serde_json::to_string_pretty(error).unwrap_or_else(|_| "{}".to_string())
    }

    fn score(value: u8) -> String {
        let text = format!("{:>3}/100", value);
        match value {
            80..=100 => text.green().to_string(),
            50..=79 => text.yellow().to_string(),
            _ => text.red().to_string(),
        }
    }

    fn individualization(level: IndividualizationLevel) -> &'static str {
        match level {
            IndividualizationLevel::Low => "low",
            IndividualizationLevel::Medium => "medium",
            IndividualizationLevel::High => "high",
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &GenerationResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &GenerationResult) -> String {
        Self::format_json(result)
    }

    fn format_content_only(&self, result: &GenerationResult) -> String {
        Self::format_content_only(result)
    }

    fn format_error(&self, error: &ClassifiedError) -> String {
        Self::format_error(error)
    }
}
