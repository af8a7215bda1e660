//! CLI entrypoint for formpilot
//!
//! Wires the infrastructure adapters into the application use cases and
//! drives the fill / questions commands.

mod args;
mod artifacts;
mod progress;

use anyhow::{Context, Result, bail};
use args::{Cli, Command};
use artifacts::{CompletedArtifacts, FormArtifacts};
use chrono::Datelike;
use clap::Parser;
use colored::Colorize;
use formpilot_application::{
    DocumentConverterPort, FillFormInput, FillFormUseCase, GenerateQuestionsUseCase,
    ObjectStorePort, RetrievalFilter,
};
use formpilot_domain::{DocumentFormat, QuestionSet, TemplateDocument};
use formpilot_infrastructure::{
    BedrockGenerator, ConfigLoader, FileConfig, KnowledgeBaseRetriever, LocalObjectStore,
    PandocConverter, S3ObjectStore, TiktokenCounter,
};
use progress::ProgressReporter;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    let issues = config.validate();
    if !issues.is_empty() {
        bail!("Invalid configuration:\n  {}", issues.join("\n  "));
    }

    match cli.command {
        Command::Fill { user, form, year } => {
            let year = year.unwrap_or_else(|| chrono::Utc::now().year());
            fill(&config, &user, &form, year, cli.quiet).await
        }
        Command::Questions { form } => questions(&config, &form, cli.quiet).await,
    }
}

/// Build the docs and filled artifact stores per the configuration.
async fn stores(config: &FileConfig) -> (Arc<dyn ObjectStorePort>, Arc<dyn ObjectStorePort>) {
    if let Some(ref root) = config.store.local_root {
        let root = std::path::PathBuf::from(root);
        (
            Arc::new(LocalObjectStore::new(root.join("docs"))),
            Arc::new(LocalObjectStore::new(root.join("filled"))),
        )
    } else {
        let sdk_config = config.bedrock.sdk_config().await;
        (
            Arc::new(S3ObjectStore::new(&sdk_config, &config.store.docs_bucket)),
            Arc::new(S3ObjectStore::new(&sdk_config, &config.store.filled_bucket)),
        )
    }
}

async fn fill(config: &FileConfig, user: &str, form: &str, year: i32, quiet: bool) -> Result<()> {
    let inputs = FormArtifacts { form };
    let outputs = CompletedArtifacts { form, user, year };
    let (docs_store, filled_store) = stores(config).await;

    // === Load form inputs ===
    let template_bytes = docs_store.get(&inputs.template()).await.with_context(|| {
        format!(
            "Application form template not found, upload it to {} first",
            inputs.template()
        )
    })?;
    let template = TemplateDocument::docx(format!("{form} Application Form"), template_bytes);

    let questions_json = docs_store
        .get_text(&inputs.questions())
        .await
        .with_context(|| format!("Question set not found at {}", inputs.questions()))?;
    let question_set = QuestionSet::from_json(&questions_json)?;

    let writing_prompt = docs_store
        .get_text(&inputs.writing_prompt())
        .await
        .with_context(|| format!("Writing prompt not found at {}", inputs.writing_prompt()))?;

    // === Dependency Injection ===
    let params = config.pipeline.to_fill_params();
    let retrieval = Arc::new(
        KnowledgeBaseRetriever::new(&config.bedrock, params.results_per_query).await,
    );
    let generation = Arc::new(BedrockGenerator::new(&config.bedrock).await);
    let converter = Arc::new(PandocConverter::new()?);
    let counter = Arc::new(TiktokenCounter::new());

    let use_case = FillFormUseCase::new(
        retrieval,
        generation,
        Arc::clone(&converter),
        counter,
        params,
    );

    let input = FillFormInput::new(template, question_set.questions, writing_prompt).with_filter(
        RetrievalFilter::new()
            .equals("username", user)
            .equals("year", year as i64),
    );

    if !quiet {
        println!();
        println!("Filling {} for {} ({})", form.bold(), user.bold(), year);
        println!();
    }

    let started = std::time::Instant::now();
    let filled = if quiet {
        use_case.execute(input).await?
    } else {
        let reporter = ProgressReporter::new();
        use_case.execute_with_progress(input, &reporter).await?
    };
    info!(elapsed_secs = started.elapsed().as_secs(), "Form generation finished");

    // === Persist outputs ===
    let contexts_json = serde_json::to_vec_pretty(&filled.enriched)?;
    filled_store
        .put(&outputs.retrieved_contexts(), &contexts_json)
        .await?;

    let docx = converter
        .convert(
            filled.text.as_bytes(),
            DocumentFormat::Markdown,
            DocumentFormat::Docx,
        )
        .await?;
    filled_store.put(&outputs.completed_form(), &docx).await?;

    if !quiet {
        println!();
        println!("{}", "Application form completed".green().bold());
        println!("  {}", outputs.completed_form());
    }

    Ok(())
}

async fn questions(config: &FileConfig, form: &str, quiet: bool) -> Result<()> {
    let inputs = FormArtifacts { form };
    let (docs_store, _) = stores(config).await;

    let template_bytes = docs_store.get(&inputs.template()).await.with_context(|| {
        format!(
            "Application form template not found, upload it to {} first",
            inputs.template()
        )
    })?;
    let template = TemplateDocument::docx(format!("{form} Application Form"), template_bytes);

    let params = config.pipeline.to_fill_params();
    let generation = Arc::new(BedrockGenerator::new(&config.bedrock).await);
    let use_case = GenerateQuestionsUseCase::new(
        generation,
        params.token_budget.partial_output_tokens(),
    );

    let set = use_case.execute(&template).await?;

    let json = serde_json::to_vec_pretty(&set)?;
    docs_store.put(&inputs.questions(), &json).await?;

    if !quiet {
        println!(
            "{} {} questions extracted to {}",
            "Done:".green().bold(),
            set.len(),
            inputs.questions()
        );
    }

    Ok(())
}
