use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemini_client::{GeminiClient, GeminiConfig};
use quizsolver_cli::{
    load_config, resolve_api_key, resolve_store_path, AppConfig, DetachedPage, PngFileCapture,
    SolveFlow, SolveOptions,
};
use quizsolver_core_types::{FontSize, Settings};
use solve_store::{JsonFileStore, SolveStore};
use tool_fill_answer::{FillPolicyView, FillToolBuilder};
use tool_submit_form::{SubmitPolicyView, SubmitToolBuilder};

/// QuizSolver - screenshot-based exercise solving via the Gemini API
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the exercise on a captured screenshot
    Solve(SolveArgs),

    /// Inspect the answer history
    History(HistoryArgs),

    /// Show solving statistics
    Stats,

    /// Show or change user settings
    Settings(SettingsArgs),

    /// Show or change the auto-fill / auto-submit toggles
    Toggles(TogglesArgs),
}

#[derive(Args)]
struct SolveArgs {
    /// PNG screenshot of the exercise to solve
    #[arg(long, value_name = "FILE")]
    screenshot: PathBuf,

    /// Override the stored auto-fill toggle for this run
    #[arg(long)]
    auto_fill: Option<bool>,

    /// Override the stored auto-submit toggle for this run
    #[arg(long)]
    auto_submit: Option<bool>,

    /// Print only the answer text (for piping)
    #[arg(long)]
    raw: bool,
}

#[derive(Args)]
struct HistoryArgs {
    #[command(subcommand)]
    action: HistoryAction,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List stored answers, newest first
    List {
        /// Maximum number of entries to print
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Print one stored answer in full
    Show { index: usize },

    /// Delete one stored answer
    Delete { index: usize },

    /// Delete the whole history
    Clear,
}

#[derive(Args)]
struct SettingsArgs {
    #[command(subcommand)]
    action: SettingsAction,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show current settings
    Show,

    /// Change settings fields (unset fields keep their value)
    Set {
        #[arg(long)]
        dark_mode: Option<bool>,

        #[arg(long, value_enum)]
        font_size: Option<FontSizeOpt>,

        /// API key stored in settings (highest precedence)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum FontSizeOpt {
    Small,
    Medium,
    Large,
}

impl From<FontSizeOpt> for FontSize {
    fn from(value: FontSizeOpt) -> Self {
        match value {
            FontSizeOpt::Small => FontSize::Small,
            FontSizeOpt::Medium => FontSize::Medium,
            FontSizeOpt::Large => FontSize::Large,
        }
    }
}

#[derive(Args)]
struct TogglesArgs {
    #[arg(long)]
    auto_fill: Option<bool>,

    #[arg(long)]
    auto_submit: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = load_config(cli.config.as_deref()).await?;
    let result = run(cli.command, &config).await;

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            error!("command failed: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let level: tracing::Level = level.parse().context("invalid log level")?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    Ok(())
}

async fn run(command: Commands, config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    match command {
        Commands::Solve(args) => cmd_solve(args, config, store).await,
        Commands::History(args) => cmd_history(args.action, store).await,
        Commands::Stats => cmd_stats(store).await,
        Commands::Settings(args) => cmd_settings(args.action, store).await,
        Commands::Toggles(args) => cmd_toggles(args, store).await,
    }
}

fn open_store(config: &AppConfig) -> Result<SolveStore<JsonFileStore>> {
    let path = resolve_store_path(config)?;
    let port = JsonFileStore::open(&path)
        .with_context(|| format!("failed to open store at {}", path.display()))?;
    Ok(SolveStore::new(port))
}

async fn cmd_solve(
    args: SolveArgs,
    config: &AppConfig,
    store: SolveStore<JsonFileStore>,
) -> Result<()> {
    let settings = store.settings().await?;
    let Some(api_key) = resolve_api_key(&settings, config) else {
        bail!("no API key configured (settings, {} or config file)", quizsolver_cli::API_KEY_ENV);
    };

    let mut gemini_config = GeminiConfig::new(api_key);
    if let Some(model) = &config.model {
        gemini_config = gemini_config.with_model(model);
    }
    let client = GeminiClient::new(gemini_config).map_err(|err| anyhow::anyhow!(err))?;

    let page = Arc::new(DetachedPage);
    let fill = FillToolBuilder::new(FillPolicyView::default())
        .with_page(page.clone())
        .build();
    let submit = SubmitToolBuilder::new(SubmitPolicyView::default())
        .with_page(page.clone())
        .build();

    let mut flow = SolveFlow::new(
        store,
        Arc::new(PngFileCapture::new(args.screenshot)),
        client,
        fill,
        submit,
    )
    .with_probe(page);

    let options = SolveOptions {
        auto_fill: args.auto_fill,
        auto_submit: args.auto_submit,
    };
    let outcome = flow.solve(options).await?;

    if args.raw {
        println!("{}", outcome.answer.answer_part);
        return Ok(());
    }

    println!("[ĐÁP ÁN]");
    println!("{}\n", outcome.answer.answer_part);
    println!("[GIẢI THÍCH]");
    println!("{}\n", outcome.answer.explanation_part);
    println!("[ĐỘ TIN CẬY] {}%", outcome.answer.confidence);
    if let Some(fill) = &outcome.fill {
        match fill.strategy {
            Some(strategy) if fill.filled => {
                println!("filled {} control(s) via {strategy}", fill.controls_touched);
            }
            _ => println!("no form control accepted the answer"),
        }
    }
    if let Some(submit) = &outcome.submit {
        match &submit.via {
            Some(via) if submit.submitted => println!("submitted via {via}"),
            _ => println!("no submit control found"),
        }
    }
    info!(solved = outcome.stats.solved, "statistics updated");
    Ok(())
}

async fn cmd_history(action: HistoryAction, store: SolveStore<JsonFileStore>) -> Result<()> {
    match action {
        HistoryAction::List { limit } => {
            let history = store.history().await?;
            if history.is_empty() {
                println!("history is empty");
                return Ok(());
            }
            for (index, entry) in history.iter().take(limit).enumerate() {
                println!(
                    "{index:3}  {}  [{}%]  {}",
                    entry.timestamp,
                    entry.confidence,
                    entry.preview(60)
                );
            }
        }
        HistoryAction::Show { index } => {
            let history = store.history().await?;
            let Some(entry) = history.get(index) else {
                bail!("no history entry at index {index}");
            };
            println!("{}", entry.timestamp);
            println!("[ĐÁP ÁN]\n{}\n", entry.answer_part);
            println!("[GIẢI THÍCH]\n{}\n", entry.explanation_part);
            println!("[ĐỘ TIN CẬY] {}%", entry.confidence);
        }
        HistoryAction::Delete { index } => {
            if store.delete_history(index).await? {
                println!("deleted entry {index}");
            } else {
                bail!("no history entry at index {index}");
            }
        }
        HistoryAction::Clear => {
            store.clear_history().await?;
            println!("history cleared");
        }
    }
    Ok(())
}

async fn cmd_stats(store: SolveStore<JsonFileStore>) -> Result<()> {
    let view = store.stats_view().await?;
    println!("solved:             {}", view.solved);
    println!("average time:       {}s", view.average_time_secs);
    println!("average confidence: {}%", view.average_confidence);
    Ok(())
}

async fn cmd_settings(action: SettingsAction, store: SolveStore<JsonFileStore>) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = store.settings().await?;
            print_settings(&settings);
        }
        SettingsAction::Set {
            dark_mode,
            font_size,
            api_key,
        } => {
            let mut settings = store.settings().await?;
            if let Some(dark_mode) = dark_mode {
                settings.dark_mode = dark_mode;
            }
            if let Some(font_size) = font_size {
                settings.font_size = font_size.into();
            }
            if let Some(api_key) = api_key {
                settings.api_key = if api_key.is_empty() {
                    None
                } else {
                    Some(api_key)
                };
            }
            store.set_settings(&settings).await?;
            print_settings(&settings);
        }
    }
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("dark mode: {}", settings.dark_mode);
    println!("font size: {}", settings.font_size);
    println!(
        "api key:   {}",
        if settings.api_key.is_some() {
            "set"
        } else {
            "unset"
        }
    );
}

async fn cmd_toggles(args: TogglesArgs, store: SolveStore<JsonFileStore>) -> Result<()> {
    if let Some(auto_fill) = args.auto_fill {
        store.set_auto_fill_enabled(auto_fill).await?;
    }
    if let Some(auto_submit) = args.auto_submit {
        store.set_auto_submit_enabled(auto_submit).await?;
    }
    println!("auto-fill:   {}", store.auto_fill_enabled().await?);
    println!("auto-submit: {}", store.auto_submit_enabled().await?);
    Ok(())
}
