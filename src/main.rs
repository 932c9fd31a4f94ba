use clap::{Parser, Subcommand};
use colored::Colorize;
use prop_hoist::commands::{self, Overrides};
use prop_hoist::config::{EmitFormat, ResolverMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prop-hoist")]
#[command(about = "Hoist constant attribute values out of render functions", long_about = None)]
#[command(version)]
struct Cli {
    /// Log pass decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a single serialized syntax tree and print the result
    Transform {
        /// Path to a .ast.json file produced by the front end
        file: String,
        /// Path to hoist.toml (default: ./hoist.toml when present)
        #[arg(long)]
        config: Option<String>,
        /// Only hoist values of attributes whose name matches this regex
        #[arg(long)]
        prop_filter: Option<String>,
        /// Output format
        #[arg(long, value_enum)]
        emit: Option<EmitFormat>,
        /// Where identifier classifications come from
        #[arg(long, value_enum)]
        resolver: Option<ResolverMode>,
    },
    /// Transform every .ast.json file below a directory
    Batch {
        /// Source directory (defaults to current directory)
        #[arg(default_value = ".")]
        src: String,
        /// Output directory (default: [output] dir from hoist.toml, else build)
        #[arg(long)]
        out: Option<String>,
        /// Path to hoist.toml (default: ./hoist.toml when present)
        #[arg(long)]
        config: Option<String>,
        /// Only hoist values of attributes whose name matches this regex
        #[arg(long)]
        prop_filter: Option<String>,
        /// Output format
        #[arg(long, value_enum)]
        emit: Option<EmitFormat>,
        /// Where identifier classifications come from
        #[arg(long, value_enum)]
        resolver: Option<ResolverMode>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Transform { file, config, prop_filter, emit, resolver } => {
            let overrides = Overrides { prop_filter, emit, resolver };
            commands::transform::execute(&file, config.as_deref(), &overrides)
        }
        Commands::Batch { src, out, config, prop_filter, emit, resolver } => {
            let overrides = Overrides { prop_filter, emit, resolver };
            commands::batch::execute(&src, out.as_deref(), config.as_deref(), &overrides)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
