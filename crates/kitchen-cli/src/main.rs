//! Kitchen CLI - drive the mid-level agent against a simulated kitchen.
//!
//! - `kitchen run` - run one intent to completion
//! - `kitchen valid` - list intents that would not fail right away
//! - `kitchen tasks` - list sub-tasks the executor could start
//! - `kitchen layouts` - list the built-in scenarios

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing_subscriber::{fmt, EnvFilter};

use kitchen_agent::{config, KitchenConfig, MidAgent};
use kitchen_core::{AgentId, KitchenView};
use kitchen_sim::{builtin, Kitchen, Scenario, SimConfig, BUILTIN_SCENARIOS};

/// The agent's settings plus the simulator timers, read from one file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunConfig {
    #[serde(flatten)]
    kitchen: KitchenConfig,
    sim: SimConfig,
}

#[derive(Parser)]
#[command(name = "kitchen")]
#[command(about = "Cooperative kitchen planner", version)]
struct Cli {
    /// Project root directory (reads `.kitchen/config.yaml`)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Explicit config file; overrides the project config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one intent until it succeeds or fails
    Run {
        /// Built-in scenario name or path to a scenario YAML file
        #[arg(long)]
        layout: String,

        /// Intent verb (prepare, assemble, serve, pass_on, putout_fire, clean_a_counter)
        #[arg(long)]
        intent: String,

        /// Intent argument as key=value; repeatable
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// Controlled agent index
        #[arg(long, default_value_t = 0)]
        agent: u32,

        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,

        /// Give up after this many ticks
        #[arg(long, default_value_t = 200)]
        max_ticks: u64,
    },

    /// Print valid intents per verb as JSON
    Valid {
        #[arg(long)]
        layout: String,

        #[arg(long, default_value_t = 0)]
        agent: u32,
    },

    /// Print the sub-tasks the executor could start
    Tasks {
        #[arg(long)]
        layout: String,

        #[arg(long, default_value_t = 0)]
        agent: u32,
    },

    /// List built-in scenarios
    Layouts,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    if cli.log_json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    let project_root = match cli.project {
        Some(root) => root,
        None => std::env::current_dir().context("failed to get current directory")?,
    };
    let config: RunConfig = match &cli.config {
        Some(path) => config::load_yaml(path)?,
        None => config::load_from_project(&project_root)?,
    };

    match cli.command {
        Commands::Run {
            layout,
            intent,
            args,
            agent,
            seed,
            max_ticks,
        } => {
            let mut config = config;
            if let Some(seed) = seed {
                config.kitchen.seed = seed;
            }
            run_intent(&config, &layout, &intent, &args, AgentId(agent), max_ticks)
        }
        Commands::Valid { layout, agent } => {
            let kitchen = load_kitchen(&layout, config.sim)?;
            let agent = controlled(&kitchen, AgentId(agent), &config.kitchen)?;
            let valid = agent.get_valid_mid_actions(&kitchen);
            println!("{}", serde_json::to_string_pretty(&valid)?);
            Ok(())
        }
        Commands::Tasks { layout, agent } => {
            let kitchen = load_kitchen(&layout, config.sim)?;
            let agent = controlled(&kitchen, AgentId(agent), &config.kitchen)?;
            for task in agent.get_valid_actions(&kitchen) {
                println!("{task}");
            }
            Ok(())
        }
        Commands::Layouts => {
            for name in BUILTIN_SCENARIOS {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn run_intent(
    config: &RunConfig,
    layout: &str,
    verb: &str,
    args: &[String],
    id: AgentId,
    max_ticks: u64,
) -> Result<()> {
    let mut kitchen = load_kitchen(layout, config.sim)?;
    let mut agent = controlled(&kitchen, id, &config.kitchen)?;
    let kwargs = parse_kwargs(args)?;
    tracing::info!(layout, verb, seed = config.kitchen.seed, "starting");

    for _ in 0..max_ticks {
        let tick = kitchen.tick();
        let outcome = agent.get_action(&kitchen, verb, &kwargs);
        let task = agent
            .current_task()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{tick:>4}  {:<8} {task:<40} {}", outcome.action.to_string(), outcome.status);
        if outcome.end {
            for delivery in kitchen.deliver_log() {
                println!("delivered {} at tick {}", delivery.food, delivery.tick);
            }
            return Ok(());
        }
        kitchen.step(&[(id, outcome.action)]);
    }
    bail!("{verb} did not finish within {max_ticks} ticks")
}

fn load_kitchen(layout: &str, sim: SimConfig) -> Result<Kitchen> {
    let scenario = if Path::new(layout).is_file() {
        Scenario::load(layout).with_context(|| format!("failed to load scenario {layout}"))?
    } else {
        builtin(layout)?
    };
    Ok(scenario.build_with(sim))
}

fn controlled(kitchen: &Kitchen, id: AgentId, config: &KitchenConfig) -> Result<MidAgent> {
    if kitchen.agent(id).is_none() {
        bail!("scenario has no agent {id}");
    }
    Ok(MidAgent::new(id, config))
}

/// `plate=true` becomes a JSON bool; anything that is not valid JSON stays a string.
fn parse_kwargs(args: &[String]) -> Result<Map<String, Value>> {
    let mut kwargs = Map::new();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("expected KEY=VALUE, got {arg:?}");
        };
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        kwargs.insert(key.trim().to_string(), value);
    }
    Ok(kwargs)
}
