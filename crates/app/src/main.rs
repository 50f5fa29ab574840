use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, TreatmentService};
use tracing_subscriber::EnvFilter;
use treatment_core::model::{TreatmentDraft, TreatmentId};
use ui::vm::render_treatments;
use ui::{App, UiApp, build_app_context};

/// Track treatment plans and how far along they are.
#[derive(Parser, Debug)]
#[command(name = "treatments", version)]
struct Cli {
    /// SQLite database to persist treatments in. Without it the session is in-memory.
    #[arg(long = "db", env = "TREATMENT_DB_URL", global = true)]
    db_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Open the desktop window (default).
    Ui,
    /// Store the default treatments if nothing is stored yet.
    Seed,
    /// Print every treatment and the overall progress.
    List,
    /// Add a treatment at the end of the list.
    Add(AddArgs),
    /// Replace every field of an existing treatment.
    Update {
        id: TreatmentId,
        #[command(flatten)]
        fields: AddArgs,
    },
    /// Remove a treatment by id.
    Remove { id: TreatmentId },
}

#[derive(Args, Debug, Default, PartialEq, Eq)]
struct AddArgs {
    name: String,
    #[arg(long, default_value = "")]
    frequency: String,
    /// First day, as YYYY-MM-DD.
    #[arg(long, default_value = "")]
    start: String,
    /// Last day, as YYYY-MM-DD.
    #[arg(long, default_value = "")]
    end: String,
    #[arg(long, default_value = "")]
    notes: String,
    /// Whole-number percentage overriding the date-based progress.
    #[arg(long, default_value = "")]
    progress: String,
    #[arg(long)]
    reminders: bool,
    #[arg(long)]
    caregiver: bool,
}

impl AddArgs {
    fn into_draft(self) -> TreatmentDraft {
        TreatmentDraft {
            name: self.name,
            frequency: self.frequency,
            start_date: self.start,
            end_date: self.end,
            notes: self.notes,
            reminders: self.reminders,
            caregiver_notifications: self.caregiver,
            manual_progress: self.progress,
        }
    }
}

struct DesktopApp {
    clock: Clock,
    treatments: Arc<TreatmentService>,
}

impl UiApp for DesktopApp {
    fn clock(&self) -> Clock {
        self.clock
    }

    fn treatments(&self) -> Arc<TreatmentService> {
        Arc::clone(&self.treatments)
    }
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:"
        || trimmed.starts_with("sqlite://")
        || trimmed.starts_with("sqlite:file:")
    {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

async fn open_services(db_url: Option<&str>, clock: Clock) -> Result<AppServices> {
    match db_url {
        Some(raw) => {
            let url = normalize_sqlite_url(raw);
            prepare_sqlite_file(&url)?;
            tracing::info!(db = %url, "opening treatment database");
            Ok(AppServices::new_sqlite(&url, clock).await?)
        }
        None => {
            tracing::info!("no database configured; treatments last for this session only");
            Ok(AppServices::in_memory(clock))
        }
    }
}

async fn print_list(treatments: &TreatmentService) -> Result<()> {
    let store = treatments.load_store().await?;
    let vm = render_treatments(&store, treatments.clock().today());
    for row in &vm.rows {
        let status = row.status.as_deref().unwrap_or("no end date");
        println!(
            "{:>3}  {:<24} {:>4}  {} • {}  ({})",
            row.id, row.name, row.progress_label, row.frequency, status, row.dates_label
        );
    }
    println!("{}", vm.summary);
    Ok(())
}

fn launch_ui(services: &AppServices) {
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        clock: services.clock(),
        treatments: services.treatments(),
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Treatments")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}

async fn run(cli: Cli) -> Result<()> {
    let services = open_services(cli.db_url.as_deref(), Clock::default_clock()).await?;
    let treatments = services.treatments();

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => launch_ui(&services),
        Command::Seed => {
            let store = treatments.load_store().await?;
            println!("{} treatments stored", store.len());
        }
        Command::List => print_list(&treatments).await?,
        Command::Add(args) => {
            let added = treatments.add(args.into_draft()).await?;
            println!("added {} as #{}", added.name(), added.id());
        }
        Command::Update { id, fields } => {
            let updated = treatments
                .update(id, fields.into_draft())
                .await
                .with_context(|| format!("updating treatment #{id}"))?;
            println!("updated #{} {}", updated.id(), updated.name());
        }
        Command::Remove { id } => {
            treatments
                .delete(id)
                .await
                .with_context(|| format!("removing treatment #{id}"))?;
            println!("removed #{id}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "treatments failed");
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
