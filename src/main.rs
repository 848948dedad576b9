mod cli;
mod config;
mod execution;
mod extract;
mod llm;
mod logging;
mod pipeline;
mod printer;
mod questions;
mod report;
mod role;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{unescape, Config};
use execution::RunnerConfig;
use llm::{GeneratorConfig, LlmClient};
use pipeline::{RunSummary, SolutionRecord};
use printer::TextPrinter;
use questions::QuestionFileError;
use report::ReportFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init_logging(if args.verbose { "debug" } else { "info" });

    // Load config; CLI flags override it
    let cfg = Config::load();
    tracing::debug!(config = %cfg.config_path.display(), "configuration loaded");
    let settings = Settings::resolve(&cfg, &args)?;

    let questions = match questions::load_questions(&args.questions) {
        Ok(q) => q,
        Err(e @ QuestionFileError::NotFound(_)) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let printer = TextPrinter::default();
    printer.found(questions.len());

    let (records, path) = generate_report(&settings, questions).await?;

    printer.summary(&RunSummary::from_records(&records));
    printer.saved(&path);
    Ok(())
}

/// Everything one run needs, resolved from config and CLI.
#[derive(Debug, Clone)]
struct Settings {
    generator: GeneratorConfig,
    runner: RunnerConfig,
    workers: usize,
    format: ReportFormat,
    output: PathBuf,
}

impl Settings {
    fn resolve(cfg: &Config, args: &cli::Cli) -> Result<Self> {
        let mut generator = GeneratorConfig::from_config(cfg);
        if let Some(model) = &args.model {
            generator.model = model.clone();
        }
        if let Some(t) = args.temperature {
            generator.temperature = t;
        }
        if let Some(n) = args.max_tokens {
            generator.max_tokens = n;
        }

        let mut runner = RunnerConfig::from_config(cfg);
        if let Some(cc) = &args.compiler {
            runner.compiler = cc.clone();
        }
        if let Some(input) = &args.stdin {
            runner.default_stdin = unescape(input);
        }

        let configured_format: ReportFormat = cfg
            .get("OUTPUT_FORMAT")
            .unwrap_or_else(|| "html".into())
            .parse()
            .context("Invalid OUTPUT_FORMAT")?;
        let format = match (&args.format, &args.output) {
            (Some(f), _) => f.parse()?,
            (None, Some(path)) => format_from_extension(path).unwrap_or(configured_format),
            (None, None) => configured_format,
        };

        let output = match &args.output {
            Some(path) => path.clone(),
            None => cfg
                .get_path("OUTPUT_FILE")
                .unwrap_or_else(|| PathBuf::from("C_Programming_Solutions.html"))
                .with_extension(format.extension()),
        };

        let workers = args.workers.or_else(|| cfg.get_usize("WORKERS")).unwrap_or(4).max(1);

        Ok(Self { generator, runner, workers, format, output })
    }
}

fn format_from_extension(path: &Path) -> Option<ReportFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
}

/// Process all questions, then write the document once every record is in.
async fn generate_report(
    settings: &Settings,
    questions: Vec<questions::Question>,
) -> Result<(Vec<SolutionRecord>, PathBuf)> {
    let client = LlmClient::new(&settings.generator)?;
    let records = pipeline::process_all(
        &client,
        &settings.generator.chat_options(),
        &settings.runner,
        questions,
        settings.workers,
    )
    .await;

    let document = report::build_report(&records);
    let path = report::write_report(&document, settings.format, &settings.output)?;
    Ok((records, path))
}
