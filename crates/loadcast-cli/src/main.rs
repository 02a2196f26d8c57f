use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "loadcast",
    about = "loadcast — load-test aggregation and scalability projection",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fold raw request samples into per-group summaries
    Aggregate {
        /// JSON file with an array of samples
        #[arg(short, long)]
        input: String,
        /// Peak concurrent virtual users during the run
        #[arg(short, long, default_value_t = 0)]
        load: u32,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Project group baselines to the configured target load
    Project {
        /// JSON file with an array of group summaries
        #[arg(short, long)]
        input: String,
        /// Path to the loadcast.toml configuration
        #[arg(short, long, default_value = "loadcast.toml")]
        config: String,
        /// Only project this group
        #[arg(short, long)]
        group: Option<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Check groups for performance equivalence
    Compare {
        /// JSON file with an array of group summaries
        #[arg(short, long)]
        input: String,
        /// Path to the loadcast.toml configuration
        #[arg(short, long, default_value = "loadcast.toml")]
        config: String,
        /// Compare observed figures instead of projections
        #[arg(short, long)]
        observed: bool,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("loadcast=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate { input, load, format } => {
            commands::aggregate::aggregate(&input, load, &format)
        }
        Commands::Project {
            input,
            config,
            group,
            format,
        } => commands::project::project(&input, &config, group.as_deref(), &format),
        Commands::Compare {
            input,
            config,
            observed,
            format,
        } => commands::compare::compare(&input, &config, observed, &format),
    }
}
