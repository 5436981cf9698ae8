use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rollcall_core::simulation::{SimulatedDetector, SimulatedRecognizer};
use rollcall_core::{
    AgeStore, AttendanceLedger, Console, GenderClassifier, NoClassifier, OnnxGenderClassifier,
    Registry, RenderStyle, TableSources, UserTable,
};
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "rollcall", about = "Registered-user attendance table and recognition demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show registered users with gender, attendance and predicted age
    Table {
        /// Refresh and redraw every N seconds until interrupted
        #[arg(short, long, value_name = "SECS")]
        watch: Option<u64>,
    },
    /// Run the simulated registration / login console
    Simulate {
        /// Seed for the simulated predictions
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Table { watch } => run_table(&config, watch),
        Commands::Simulate { seed } => run_simulation(&config, seed),
    }
}

/// `RUST_LOG`-style filter; lookup fallbacks log at `warn`, so that is the floor
/// when no directives are given.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

fn run_table(config: &Config, watch: Option<u64>) -> Result<()> {
    let registry = Registry::load_roster(&config.roster_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring roster, roll numbers will show as N/A");
        Registry::new()
    });

    let model_path = config.gender_model_path();
    let classifier: Box<dyn GenderClassifier> = match OnnxGenderClassifier::load(&model_path) {
        Ok(c) => Box::new(c),
        Err(e) => {
            tracing::warn!(path = %model_path, error = %e, "gender model unavailable");
            Box::new(NoClassifier)
        }
    };

    let sources = TableSources {
        images_dir: config.images_dir.clone(),
        attendance: AttendanceLedger::new(&config.attendance_path),
        ages: AgeStore::new(&config.age_dir),
    };
    let style = if config.color {
        RenderStyle::colored()
    } else {
        RenderStyle::plain()
    };

    let mut table = UserTable::new(sources, registry, classifier);
    print!("{}", table.render(style));

    if let Some(secs) = watch {
        let interval = Duration::from_secs(secs.max(1));
        loop {
            std::thread::sleep(interval);
            table.refresh();
            println!();
            print!("{}", table.render(style));
        }
    }

    Ok(())
}

fn run_simulation(config: &Config, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let detector = SimulatedDetector::new(StdRng::from_rng(&mut rng)?);
    let recognizer = SimulatedRecognizer::new(rng);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(
        Registry::new(),
        detector,
        recognizer,
        stdin.lock(),
        stdout.lock(),
    )
    .with_scan_delay(config.scan_delay);

    console.run()?;
    tracing::info!(users = console.registry().len(), "console session ended");
    Ok(())
}
