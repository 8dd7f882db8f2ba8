//! Output formatter trait

use forge_domain::{ClassifiedError, GenerationResult, OutputFormat};

/// Trait for formatting generation outcomes
pub trait OutputFormatter {
    /// Format the complete result with metadata and scores
    fn format(&self, result: &GenerationResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &GenerationResult) -> String;

    /// Format the generated content only
    fn format_content_only(&self, result: &GenerationResult) -> String;

    /// Format a classified error for end users
    fn format_error(&self, error: &ClassifiedError) -> String;

    /// Dispatch on the configured output format
    fn render(&self, result: &GenerationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(result),
            OutputFormat::Content => self.format_content_only(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
