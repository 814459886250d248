use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shiproute_cli::commands::benchmark::{handle_benchmark, BenchmarkArgs};
use shiproute_cli::commands::filter::{handle_filter, FilterArgs};
use shiproute_cli::commands::info::{handle_info, InfoArgs};
use shiproute_cli::commands::intersect::{handle_intersect, IntersectArgs};
use shiproute_cli::commands::route::{handle_route, RouteArgs};
use shiproute_cli::commands::store::{handle_store, StoreArgs};
use shiproute_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Vessel-trajectory graph builder and router")]
struct Cli {
    /// How results are printed on stdout.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::default())]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest CSV position reports into a graph container.
    Store(StoreArgs),
    /// Splice trajectory crossings into a graph container.
    Intersect(IntersectArgs),
    /// Drop trajectories from a graph that has not been intersected yet.
    Filter(FilterArgs),
    /// Plan a minimum-time route between two positions or along a trajectory.
    Route(RouteArgs),
    /// Route every trajectory end to end and write per-path metrics.
    Benchmark(BenchmarkArgs),
    /// Summarize a graph container.
    Info(InfoArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Store(args) => handle_store(args, cli.format),
        Command::Intersect(args) => handle_intersect(args, cli.format),
        Command::Filter(args) => handle_filter(args, cli.format),
        Command::Route(args) => handle_route(args, cli.format),
        Command::Benchmark(args) => handle_benchmark(args, cli.format),
        Command::Info(args) => handle_info(args, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
