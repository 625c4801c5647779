use crate::analysis::flow::FlowMode;
use crate::analysis::robustness::Strategy;
use crate::graph::node::NodeId;
use crate::graph::topology::Topology;
use crate::scenario::basic::BasicScenario;
use crate::scenario::random::RandomTopology;
use crate::settings::Settings;
use crate::tui::app::App;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod analysis;
mod error;
mod graph;
mod report;
mod scenario;
mod settings;
#[cfg(test)]
mod testing;
mod tui;

#[derive(Parser)]
#[command(
    name = "linkgraph",
    about = "Latency, bandwidth and failure analysis of copper and optical networks",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file; the interactive view logs nowhere else
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Menu-driven terminal UI
    Interactive {
        /// Topology file, the built-in campus network if omitted
        file: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t)]
        flow_mode: FlowMode,

        #[arg(long, value_enum, default_value_t)]
        strategy: Strategy,

        /// Pair each node only with articulation points of the rest
        #[arg(long)]
        strict: bool,
    },

    /// Lowest-latency path between two nodes
    Latency { file: PathBuf, from: usize, to: usize },

    /// Whether every node is reachable from node 0 over copper alone
    Copper { file: PathBuf },

    /// Maximum bandwidth between two nodes
    MaxFlow {
        file: PathBuf,
        from: usize,
        to: usize,

        #[arg(long, value_enum, default_value_t)]
        flow_mode: FlowMode,
    },

    /// Lowest-latency spanning tree grown from node 0
    SpanningTree { file: PathBuf },

    /// Pairs of nodes whose joint failure splits the network
    Robustness {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t)]
        strategy: Strategy,

        /// Pair each node only with articulation points of the rest
        #[arg(long)]
        strict: bool,
    },

    /// Print a random connected topology in the input format
    Generate {
        #[arg(short, long)]
        nodes: usize,

        /// Links added on top of the spanning tree
        #[arg(short, long, default_value = "0")]
        extra_links: usize,

        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Probability that a link is copper rather than optical
        #[arg(long, default_value = "0.5")]
        copper_share: f64,

        /// Longest link length
        #[arg(long, default_value = "5000")]
        max_length: u64,
    },
}

fn init_logging(verbose: bool, log_file: Option<&Path>, interactive: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // stderr would draw over the terminal UI
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Topology> {
    Topology::read_file(path).with_context(|| format!("cannot load topology {}", path.display()))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, Commands::Interactive { .. });
    init_logging(cli.verbose, cli.log_file.as_deref(), interactive)?;

    match cli.command {
        Commands::Interactive {
            file,
            flow_mode,
            strategy,
            strict,
        } => {
            let (topology, name) = match file {
                Some(path) => (load(&path)?, path.display().to_string()),
                None => (BasicScenario::build()?, "campus".to_owned()),
            };
            let settings = Settings {
                flow_mode,
                strategy,
                strict,
            };
            info!(?settings, "starting interactive session");
            tui::run(App::new(topology, settings, name))?;
        }
        Commands::Latency { file, from, to } => {
            let topology = load(&file)?;
            print_lines(&report::latency_path(&topology, NodeId(from), NodeId(to))?);
        }
        Commands::Copper { file } => {
            print_lines(&report::copper(&load(&file)?));
        }
        Commands::MaxFlow {
            file,
            from,
            to,
            flow_mode,
        } => {
            let mut topology = load(&file)?;
            print_lines(&report::max_bandwidth(
                &mut topology,
                NodeId(from),
                NodeId(to),
                flow_mode,
            )?);
        }
        Commands::SpanningTree { file } => {
            print_lines(&report::spanning_tree(&load(&file)?));
        }
        Commands::Robustness {
            file,
            strategy,
            strict,
        } => {
            let mut topology = load(&file)?;
            print_lines(&report::critical_pairs(&mut topology, strategy, strict)?);
        }
        Commands::Generate {
            nodes,
            extra_links,
            seed,
            copper_share,
            max_length,
        } => {
            let topology = RandomTopology::new(nodes)
                .extra_links(extra_links)
                .copper_share(copper_share)
                .max_length(max_length)
                .build(seed)?;
            print!("{topology}");
        }
    }

    Ok(())
}
