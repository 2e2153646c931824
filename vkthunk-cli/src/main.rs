// vkthunk-cli: CLI entry point for vkthunk tools (generate, plan).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vkthunk", about = "vkthunk CLI: Vulkan guest/host thunk generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate marshaling wrappers from Vulkan descriptor JSON.
    Generate {
        /// Path to vkthunk.config.toml.
        #[arg(long, default_value = "vkthunk.config.toml")]
        config: PathBuf,
    },
    /// Print the marshaling strategy chosen for every parameter.
    Plan {
        /// Path to vkthunk.config.toml.
        #[arg(long, default_value = "vkthunk.config.toml")]
        config: PathBuf,
        /// Only show parameters of this function.
        #[arg(long)]
        function: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { config } => vkthunk_codegen::run_generate(&config).map(|report| {
            for (function, reason) in &report.skipped {
                eprintln!("  skipped {function}: {reason}");
            }
            println!(
                "{} wrappers, {} marshal-in types -> {}",
                report.emitted,
                report.marshal_in_types,
                report.out_dir.display()
            );
        }),
        Commands::Plan { config, function } => vkthunk_codegen::run_plan(&config).map(|plan| {
            for entry in plan
                .iter()
                .filter(|e| function.as_deref().is_none_or(|f| f == e.function))
            {
                println!("{}.{}: {}", entry.function, entry.param, entry.strategy);
            }
        }),
    };

    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
