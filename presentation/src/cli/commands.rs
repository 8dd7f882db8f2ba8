//! CLI command definitions

use clap::Parser;
use forge_domain::{
    ContextValue, DetailLevel, DomainError, GenerationRequest, OutputFormat, Priority,
    ServiceType, Tone, UserPreferences,
};
use std::path::PathBuf;

fn parse_context(entry: &str) -> Result<(String, ContextValue), DomainError> {
    GenerationRequest::parse_context_entry(entry)
}

/// CLI arguments for lesson-forge
#[derive(Parser, Debug)]
#[command(name = "lesson-forge")]
#[command(author, version, about = "Individualized special-education content generator")]
#[command(long_about = r#"
lesson-forge generates individualized educational documents for a student.

Each run goes through four stages:
1. Validation: the request is checked before anything is spent on it
2. Rate limiting: a sliding-window quota per student and service type
3. Context: the student's profile, levels and support needs are loaded
4. Generation: the backend is called with timeouts and bounded retries

Configuration files are loaded from (in priority order):
1. LESSON_FORGE_* environment variables
2. --config <path>            Explicit config file
3. ./lesson-forge.toml        Project-level config
4. ~/.config/lesson-forge/config.toml   Global config

Example:
  lesson-forge student_001 --service lesson-plan
  lesson-forge student_001 -s assessment --context focus=reading --output json
  lesson-forge --list-services
"#)]
pub struct Cli {
    /// Student to generate content for
    pub subject_id: Option<String>,

    /// Kind of content to generate
    #[arg(short, long, value_name = "SERVICE", default_value = "lesson_plan")]
    pub service: ServiceType,

    /// Request priority (low, normal, high)
    #[arg(long, default_value = "normal")]
    pub priority: Priority,

    /// Extra context passed to the backend (repeatable)
    #[arg(short = 'c', long = "context", value_name = "KEY=VALUE", value_parser = parse_context)]
    pub context: Vec<(String, ContextValue)>,

    /// Explicit request id (one is generated otherwise)
    #[arg(long, value_name = "ID")]
    pub request_id: Option<String>,

    /// Tone of the generated document
    #[arg(long)]
    pub tone: Option<Tone>,

    /// Level of detail (brief, moderate, detailed)
    #[arg(long = "detail", value_name = "LEVEL")]
    pub detail_level: Option<DetailLevel>,

    /// Output language code
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Areas to emphasize (repeatable)
    #[arg(long = "focus", value_name = "AREA")]
    pub focus_areas: Vec<String>,

    /// Free-form instructions appended to the request
    #[arg(long, value_name = "TEXT")]
    pub instructions: Option<String>,

    /// Output format (full, content, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// List the available service types and exit
    #[arg(long)]
    pub list_services: bool,

    /// Append run events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Persist rate-limit counters in this JSON file
    #[arg(long, value_name = "PATH")]
    pub counter_store: Option<PathBuf>,

    /// Load students from a JSON file instead of the sample student
    #[arg(long, value_name = "PATH")]
    pub subjects: Option<PathBuf>,
}

impl Cli {
    /// Build the generation request described by the arguments.
    pub fn request(&self, subject_id: &str) -> GenerationRequest {
        let mut request = GenerationRequest::new(subject_id, self.service)
            .with_priority(self.priority);
        if let Some(id) = &self.request_id {
            request = request.with_request_id(id.as_str());
        }
        for (key, value) in &self.context {
            request = request.with_context(key.clone(), value.clone());
        }
        request
    }

    /// Preferences from the arguments; `None` when no preference flag is set.
    pub fn preferences(&self) -> Option<UserPreferences> {
        let untouched = self.tone.is_none()
            && self.detail_level.is_none()
            && self.language.is_none()
            && self.focus_areas.is_empty()
            && self.instructions.is_none();
        if untouched {
            return None;
        }

        let mut prefs = UserPreferences::default();
        if let Some(tone) = self.tone {
            prefs.tone = tone;
        }
        if let Some(level) = self.detail_level {
            prefs.detail_level = level;
        }
        if let Some(language) = &self.language {
            prefs.language = language.clone();
        }
        prefs.focus_areas = self.focus_areas.clone();
        if let Some(instructions) = &self.instructions {
            prefs.custom_instructions = instructions.clone();
        }
        Some(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lesson-forge").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["student_001"]);
        assert_eq!(cli.subject_id.as_deref(), Some("student_001"));
        assert_eq!(cli.service, ServiceType::LessonPlan);
        assert_eq!(cli.priority, Priority::Normal);
        assert!(cli.output.is_none());
        assert!(cli.preferences().is_none());
    }

    #[test]
    fn test_request_from_args() {
        let cli = parse(&[
            "student_001",
            "--service",
            "assessment",
            "--priority",
            "high",
            "-c",
            "focus=reading",
            "--request-id",
            "req_fixed",
        ]);
        let request = cli.request("student_001");

        assert_eq!(request.service_type, ServiceType::Assessment);
        assert_eq!(request.priority, Priority::High);
        assert_eq!(request.request_id.as_str(), Some("req_fixed"));
        assert_eq!(
            request.additional_context.get("focus"),
            Some(&ContextValue::from("reading"))
        );
    }

    #[test]
    fn test_preferences_override_defaults() {
        let cli = parse(&["s", "--tone", "friendly", "--focus", "읽기", "--focus", "쓰기"]);
        let prefs = cli.preferences().unwrap();

        assert_eq!(prefs.tone, Tone::Friendly);
        assert_eq!(prefs.detail_level, DetailLevel::Moderate);
        assert_eq!(prefs.language, "ko");
        assert_eq!(prefs.focus_areas, vec!["읽기", "쓰기"]);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_service = ["lesson-forge", "s", "--service", "poetry"];
        assert!(Cli::try_parse_from(bad_service).is_err());

        let bad_context = ["lesson-forge", "s", "--context", "novalue"];
        assert!(Cli::try_parse_from(bad_context).is_err());
    }

    #[test]
    fn test_output_format_parses() {
        let cli = parse(&["s", "-o", "json", "-vv"]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }
}
