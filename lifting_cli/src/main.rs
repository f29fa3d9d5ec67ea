use clap::{Args, Parser, Subcommand};
use lifting_core::program::training_max_from_1rm;
use lifting_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lifting")]
#[command(about = "5/3/1 Boring But Big program generator with Hevy sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the program memory file
    #[arg(long, global = true)]
    memory_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a 4-week cycle and write it as CSV
    Export {
        #[command(flatten)]
        program: ProgramArgs,

        /// Output file name (".csv" is appended if missing)
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Generate a 4-week cycle and sync it to Hevy as routines
    Sync {
        #[command(flatten)]
        program: ProgramArgs,

        /// Hevy API key
        #[arg(long, env = "HEVY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Hevy API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show the saved program memory
    ShowMemory,
}

#[derive(Args)]
struct ProgramArgs {
    /// Squat training max (lbs)
    #[arg(long)]
    squat: Option<f64>,

    /// Bench press training max (lbs)
    #[arg(long)]
    bench: Option<f64>,

    /// Deadlift training max (lbs)
    #[arg(long)]
    deadlift: Option<f64>,

    /// Overhead press training max (lbs)
    #[arg(long)]
    ohp: Option<f64>,

    /// Treat the given maxes as true 1RMs (training max = 90%)
    #[arg(long)]
    true_max: bool,

    /// BBB percentage of training max
    #[arg(long)]
    bbb_percent: Option<f64>,

    /// Day order, e.g. "squat,bench,deadlift,ohp"
    #[arg(long, value_delimiter = ',')]
    order: Option<Vec<Lift>>,

    /// BBB lift for a main lift's day, e.g. "squat=deadlift"
    #[arg(long = "bbb-pair", value_parser = parse_bbb_pair)]
    bbb_pairs: Vec<(Lift, Lift)>,

    /// Accessory for a main lift's day, e.g. "bench=Dips" (empty name for none)
    #[arg(long = "accessory", value_parser = parse_accessory)]
    accessories: Vec<(Lift, String)>,

    /// Start from the saved program memory
    #[arg(long, conflicts_with = "next_cycle")]
    reuse: bool,

    /// Start from the saved program memory with next-cycle training maxes
    #[arg(long)]
    next_cycle: bool,

    /// Save the resulting configuration as program memory
    #[arg(long)]
    save_memory: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    lifting_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Determine memory location
    let mut data = config.data.clone();
    if let Some(data_dir) = cli.data_dir {
        data.data_dir = data_dir;
    }
    let memory_path = cli.memory_file.unwrap_or_else(|| data.memory_path());

    match cli.command {
        Commands::Export { program, output } => {
            cmd_export(&program, output.as_deref(), &memory_path)
        }
        Commands::Sync {
            program,
            api_key,
            base_url,
        } => cmd_sync(&program, api_key, base_url, &memory_path, &config),
        Commands::ShowMemory => cmd_show_memory(&memory_path),
    }
}

fn cmd_export(args: &ProgramArgs, output: Option<&str>, memory_path: &Path) -> Result<()> {
    let (config, program) = prepare_program(args, memory_path)?;

    let path = lifting_core::export::output_path(output);
    lifting_core::export::to_csv_file(&program, &path)?;

    println!("✓ Program exported to {}", path.display());
    remember(args, memory_path, &config)
}

fn cmd_sync(
    args: &ProgramArgs,
    api_key: Option<String>,
    base_url: Option<String>,
    memory_path: &Path,
    config: &Config,
) -> Result<()> {
    let api_key = api_key
        .or_else(|| config.hevy.api_key.clone())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            Error::Config("no Hevy API key (use --api-key, HEVY_API_KEY or [hevy].api_key)".into())
        })?;
    let base_url = base_url.unwrap_or_else(|| config.hevy.base_url.clone());

    let (program_config, program) = prepare_program(args, memory_path)?;

    let client = HevyClient::with_base_url(api_key, base_url);
    tracing::info!("Fetching exercise templates from {}", client.base_url());
    let templates = client.exercise_templates()?;
    tracing::info!("Fetched {} exercise templates", templates.len());

    let aliases = AliasTable::builtin().with_overrides(&config.aliases);
    let resolver = ExerciseResolver::with_aliases(templates, aliases);
    let routines = convert_program(&program, &resolver)?;

    let report = RoutineSync::new(&client, &ThreadSleeper, SyncOptions::from(&config.sync))
        .sync(&routines)?;

    println!(
        "Sync complete! Created: {}, Updated: {}",
        report.created, report.updated
    );
    remember(args, memory_path, &program_config)
}

fn cmd_show_memory(memory_path: &Path) -> Result<()> {
    let Some(snapshot) = Snapshot::load(memory_path)? else {
        println!("No saved program memory at {}", memory_path.display());
        return Ok(());
    };

    println!("Saved: {}", snapshot.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Training maxes:");
    for (lift, max) in &snapshot.config.training_maxes {
        println!("  {}: {}", lift, max);
    }
    println!("BBB: {}%", snapshot.config.bbb_percentage);

    Ok(())
}

/// Build the config and generate the program
fn prepare_program(args: &ProgramArgs, memory_path: &Path) -> Result<(ProgramConfig, Program)> {
    let config = build_program_config(args, memory_path)?;
    let program = generate(&config)?;
    Ok((config, program))
}

/// Persist the config once the command has succeeded
fn remember(args: &ProgramArgs, memory_path: &Path, config: &ProgramConfig) -> Result<()> {
    if args.save_memory {
        Snapshot::save(memory_path, config)?;
        println!("✓ Program memory saved to {}", memory_path.display());
    }
    Ok(())
}

fn build_program_config(args: &ProgramArgs, memory_path: &Path) -> Result<ProgramConfig> {
    let from_memory = args.reuse || args.next_cycle;

    let mut config = if from_memory {
        let snapshot = Snapshot::load(memory_path)?.ok_or_else(|| {
            Error::Memory(format!(
                "no saved program memory at {}",
                memory_path.display()
            ))
        })?;
        if args.next_cycle {
            snapshot.config.next_cycle()
        } else {
            snapshot.config
        }
    } else {
        ProgramConfig::default()
    };

    let maxes = [
        (Lift::Squat, args.squat),
        (Lift::BenchPress, args.bench),
        (Lift::Deadlift, args.deadlift),
        (Lift::OverheadPress, args.ohp),
    ];

    if !from_memory {
        let missing: Vec<&str> = maxes
            .iter()
            .filter(|(_, max)| max.is_none())
            .map(|(lift, _)| lift.name())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Program(format!(
                "missing training max for {} (pass --squat, --bench, --deadlift and --ohp, or --reuse)",
                missing.join(", ")
            )));
        }
    }

    for (lift, max) in maxes {
        if let Some(max) = max {
            let training_max = if args.true_max {
                training_max_from_1rm(max)
            } else {
                max
            };
            config.training_maxes.insert(lift, training_max);
        }
    }

    if let Some(pct) = args.bbb_percent {
        config.bbb_percentage = pct;
    }
    if let Some(order) = &args.order {
        config.lift_order = order.clone();
    }
    for (main, paired) in &args.bbb_pairs {
        config.bbb_pairing.insert(*main, *paired);
    }
    for (lift, name) in &args.accessories {
        config.accessories.insert(*lift, name.clone());
    }

    Ok(config)
}

fn split_pair(s: &str) -> std::result::Result<(Lift, &str), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LIFT=VALUE, got '{}'", s))?;
    let lift = key.parse::<Lift>().map_err(|e| e.to_string())?;
    Ok((lift, value.trim()))
}

fn parse_bbb_pair(s: &str) -> std::result::Result<(Lift, Lift), String> {
    let (main, paired) = split_pair(s)?;
    let paired = paired.parse::<Lift>().map_err(|e| e.to_string())?;
    Ok((main, paired))
}

fn parse_accessory(s: &str) -> std::result::Result<(Lift, String), String> {
    let (lift, name) = split_pair(s)?;
    Ok((lift, name.to_string()))
}
