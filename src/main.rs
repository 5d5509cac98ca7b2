//! Fitness Tracker CLI
//!
//! Explores the exercise dataset and predicts calories burned.

use clap::{Parser, Subcommand};
use fitness_tracker::insights;
use fitness_tracker::preprocessing::Gender;
use fitness_tracker::{AppConfig, Error, RawSingleInput, Result, Session};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fitness-tracker")]
#[command(about = "Calorie-burn prediction over an exercise dataset", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = "fitness.toml")]
    config: PathBuf,

    /// Exercise CSV, overrides the config
    #[arg(long, global = true)]
    exercise: Option<PathBuf>,

    /// Calories CSV, overrides the config
    #[arg(long, global = true)]
    calories: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the first rows of the encoded dataset and its correlations
    Overview {
        /// Number of rows to show
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Predict calories burned for one workout
    Predict {
        /// Age in years (10-100)
        #[arg(long, value_parser = age)]
        age: f64,
        /// Body Mass Index (15-40)
        #[arg(long, value_parser = bmi)]
        bmi: f64,
        /// Workout duration in minutes (0-60)
        #[arg(long, value_parser = duration)]
        duration: f64,
        /// Heart rate in beats per minute (60-160)
        #[arg(long, value_parser = heart_rate)]
        heart_rate: f64,
        /// Body temperature in degrees Celsius (36-42)
        #[arg(long, value_parser = body_temp)]
        body_temp: f64,
        /// male or female
        #[arg(long)]
        gender: Gender,
    },
    /// BMI and heart rate distributions, mean calories by duration
    Stats {
        /// Histogram bins
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
        bins: u32,
    },
    /// Write a default config file
    Init,
}

fn bounded(s: &str, min: f64, max: f64) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not in {}..={}", value, min, max))
    }
}

fn age(s: &str) -> std::result::Result<f64, String> {
    bounded(s, 10.0, 100.0)
}

fn bmi(s: &str) -> std::result::Result<f64, String> {
    bounded(s, 15.0, 40.0)
}

fn duration(s: &str) -> std::result::Result<f64, String> {
    bounded(s, 0.0, 60.0)
}

fn heart_rate(s: &str) -> std::result::Result<f64, String> {
    bounded(s, 60.0, 160.0)
}

fn body_temp(s: &str) -> std::result::Result<f64, String> {
    bounded(s, 36.0, 42.0)
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match &cli.command {
        Commands::Init => init(&cli.config),
        command => load_config(&cli).and_then(|config| run(command, &config)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(path) = &cli.exercise {
        config.data.exercise_path = path.clone();
    }
    if let Some(path) = &cli.calories {
        config.data.calories_path = path.clone();
    }
    Ok(config)
}

fn run(command: &Commands, config: &AppConfig) -> Result<()> {
    let session = Session::initialize(config)?;
    match *command {
        Commands::Overview { rows } => overview(&session, rows),
        Commands::Predict {
            age,
            bmi,
            duration,
            heart_rate,
            body_temp,
            gender,
        } => {
            let input = RawSingleInput {
                age,
                bmi,
                duration,
                heart_rate,
                body_temp,
                gender,
            };
            println!("{}", session.predict(&input)?);
            Ok(())
        }
        Commands::Stats { bins } => stats(&session, bins as usize),
        Commands::Init => Ok(()),
    }
}

fn overview(session: &Session, rows: usize) -> Result<()> {
    let table = session.dataset().table();
    println!("Dataset ({} rows)", table.n_rows());
    println!("{}", insights::head(table, rows));

    println!("Correlation matrix");
    println!("{}", insights::correlation_matrix(table));

    println!("Training fit: {}", session.training_metrics()?);
    Ok(())
}

fn stats(session: &Session, bins: usize) -> Result<()> {
    let table = session.dataset().table();

    for column in ["BMI", "Heart_Rate"] {
        println!("{} distribution", column);
        match insights::histogram(table.numeric(column)?, bins) {
            Some(hist) => println!("{}", hist),
            None => println!("  no values"),
        }
    }

    let target = session.dataset().target_column();
    println!("Mean {} by Duration", target);
    for group in insights::grouped_mean(table, "Duration", target)? {
        println!("{:>8} {:>10.2}  (n={})", group.key, group.mean, group.count);
    }
    Ok(())
}

fn init(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::Config(format!("{} already exists", path.display())));
    }
    AppConfig::default().save(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
