//! CLI entrypoint for lesson-forge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use forge_application::{
    CounterStore, InMemoryCounterStore, NoRunEventLogger, Orchestrator, RunEventLogger,
    RunStateListener, SubjectDataProvider,
};
use forge_domain::{OutputFormat, RunStatus, ServiceType};
use forge_infrastructure::{
    ConfigLoader, FileConfig, InMemorySubjectDataProvider, JsonFileCounterStore, JsonlRunLogger,
    MockGenerationBackend, MockSubjectDataProvider,
};
use forge_presentation::{
    Cli, ConsoleFormatter, OutputConfig, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    if cli.list_services {
        for service in ServiceType::ALL {
            println!("{:<22} {}", service.as_str(), service.description());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(subject_id) = cli.subject_id.clone() else {
        bail!("A student id is required. Use --list-services to see what can be generated.");
    };

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let issues = file_config.validate();
    if !issues.is_empty() {
        let details: Vec<String> = issues.iter().map(|i| format!("  - {}", i)).collect();
        bail!("Invalid configuration:\n{}", details.join("\n"));
    }

    let output = OutputConfig {
        format: file_config.output.format.unwrap_or_default(),
        color: file_config.output.color,
        show_progress: file_config.output.show_progress,
    }
    .with_cli_overrides(cli.output, cli.quiet);
    output.apply_color();

    info!("Starting lesson-forge for {}", subject_id);

    // === Dependency Injection ===
    let shutdown = CancellationToken::new();
    let orchestrator = Orchestrator::builder(
        Arc::new(MockGenerationBackend::from_config(&file_config.backend)),
        subject_provider(&cli)?,
    )
    .config(file_config.to_orchestrator_config())
    .counter_store(counter_store(&cli, &file_config)?)
    .event_logger(event_logger(&cli, &file_config))
    .cancellation_token(shutdown.clone())
    .build();

    if output.show_progress {
        let listener: Arc<dyn RunStateListener> = if std::io::stderr().is_terminal() {
            Arc::new(ProgressReporter::new())
        } else {
            Arc::new(SimpleProgress::new())
        };
        orchestrator.subscribe(listener);
    }

    // Ctrl-C cancels the in-flight run
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        }
    });

    let request = cli.request(&subject_id);
    let preferences = cli.preferences().map(Arc::new);

    if let Some(result) = orchestrator.run(subject_id, request, preferences).await {
        let rendered = ConsoleFormatter.render(&result, output.format);
        println!("{}", rendered.trim_end());
        return Ok(ExitCode::SUCCESS);
    }

    let state = orchestrator.state();
    match (state.status, state.error) {
        (RunStatus::Error, Some(error)) => {
            if output.format == OutputFormat::Json {
                println!("{}", ConsoleFormatter::format_error_json(&error));
            } else {
                eprint!("{}", ConsoleFormatter::format_error(&error));
            }
            Ok(ExitCode::FAILURE)
        }
        (RunStatus::Cancelled, _) => {
            eprintln!("Generation cancelled.");
            Ok(ExitCode::from(130))
        }
        (status, _) => bail!("Run ended in unexpected state: {}", status),
    }
}

fn subject_provider(cli: &Cli) -> Result<Arc<dyn SubjectDataProvider>> {
    match &cli.subjects {
        Some(path) => {
            let provider = InMemorySubjectDataProvider::from_json_file(path)?;
            info!("Loaded {} students from {}", provider.len(), path.display());
            Ok(Arc::new(provider))
        }
        None => Ok(Arc::new(MockSubjectDataProvider::new())),
    }
}

fn counter_store(cli: &Cli, config: &FileConfig) -> Result<Arc<dyn CounterStore>> {
    match cli.counter_store.as_ref().or(config.storage.counter_store.as_ref()) {
        Some(path) => Ok(Arc::new(JsonFileCounterStore::open(path.clone())?)),
        None => Ok(Arc::new(InMemoryCounterStore::new())),
    }
}

fn event_logger(cli: &Cli, config: &FileConfig) -> Arc<dyn RunEventLogger> {
    let path = cli.log_file.as_ref().or(config.storage.run_log.as_ref());
    match path.and_then(JsonlRunLogger::open) {
        Some(logger) => {
            info!("Run events logged to {}", logger.path().display());
            Arc::new(logger)
        }
        None => {
            if let Some(path) = path {
                warn!("Run event logging disabled: cannot open {}", path.display());
            }
            Arc::new(NoRunEventLogger)
        }
    }
}
