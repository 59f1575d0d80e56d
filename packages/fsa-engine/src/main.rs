use std::{fs, fs::File, path::Path, sync::Mutex};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use fsa_engine_lib::{
    automaton::{Automaton, templates::Template},
    config::{EngineConfig, LoggerConfig},
    diagnostics::NetworkStatistics,
    solver::{
        SerializableSimulationResult,
        equivalence::{SerializableEquivalenceResult, check_equivalence},
        simulate,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Finite State Machine Engine")]
#[command(version = "0.1")]
#[command(about = "Simulate finite automata and check them for equivalence", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an input string through a saved machine.
    Simulate { file: String, input: String },
    /// Check two saved DFAs for language equivalence.
    Equivalence { first: String, second: String },
    /// Print statistics and diagnostics of a saved machine.
    Stats { file: String },
    /// Write one of the built-in machines as JSON.
    Template {
        name: String,

        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = EngineConfig::from_optional_file(args.config.as_deref())?;
    init_tracing(config.get_logger())?;

    match args.command {
        Command::Simulate { file, input } => {
            config.get_guard().check_input(&input)?;

            let automaton = load_automaton(&file)?;
            let result = simulate(&automaton, &input)
                .with_context(|| format!("failed to simulate {}", file))?;

            print_verdict(result.is_accepted(), &result.message());
            let json_res =
                serde_json::to_string_pretty(&SerializableSimulationResult::from(&result))?;
            println!("{}", json_res);
        }
        Command::Equivalence { first, second } => {
            let a = load_automaton(&first)?;
            let b = load_automaton(&second)?;
            let result = check_equivalence(&a, &b)
                .with_context(|| format!("failed to compare {} and {}", first, second))?;

            print_verdict(result.is_equivalent(), &result.message());
            let json_res =
                serde_json::to_string_pretty(&SerializableEquivalenceResult::from(&result))?;
            println!("{}", json_res);
        }
        Command::Stats { file } => {
            let automaton = load_automaton(&file)?;
            let json_res = serde_json::to_string_pretty(&NetworkStatistics::of(&automaton))?;
            println!("{}", json_res);
        }
        Command::Template { name, output } => {
            let template = Template::from_name(&name).with_context(|| {
                format!(
                    "unknown template {:?}, available: {}",
                    name,
                    Template::ALL.map(|t| t.slug()).join(", ")
                )
            })?;
            let json = template.machine_data().to_json()?;

            match output {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("failed to write {}", path))?;
                    tracing::info!(template = template.name(), path = %path, "wrote template");
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}

fn load_automaton<P: AsRef<Path>>(path: P) -> anyhow::Result<Automaton> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    Automaton::from_json(&content).with_context(|| format!("failed to load {}", path.display()))
}

fn print_verdict(success: bool, message: &str) {
    if success {
        eprintln!("[{}] {}", "OK".bright_green(), message);
    } else {
        eprintln!("[{}] {}", "NO".bright_red(), message);
    }
}

fn init_tracing(config: &LoggerConfig) -> anyhow::Result<()> {
    if !*config.get_enabled() {
        return Ok(());
    }

    let level = config.get_log_level().to_tracing_level();

    if *config.get_log_file() {
        fs::create_dir_all("./logs").context("failed to create log folder")?;
        let path = format!(
            "./logs/fsa_run_{}.txt",
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        );
        let file = File::create(&path).with_context(|| format!("failed to create {}", path))?;

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}
