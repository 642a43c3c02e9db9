//! painmine command line interface.

mod report;
mod snapshot;

use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use painmine_analysis::mine_ideas;
use painmine_core::MiningConfig;

#[derive(Debug, Parser)]
#[command(name = "painmine")]
#[command(about = "Mine blog posts for pain points and rank project ideas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Pipeline flags shared by `analyze` and `report`. Unset flags fall
/// back to `PAINMINE_*` env vars, then to defaults.
#[derive(Debug, Args)]
struct PipelineFlags {
    /// Skip posts with a parseable date older than this many days
    #[arg(long)]
    max_age_days: Option<i64>,

    /// Vocabulary cap for the signal vectorizer
    #[arg(long)]
    max_features: Option<usize>,

    /// Trend bucketing granularity: week or month
    #[arg(long)]
    period: Option<String>,

    /// Maximum number of ideas to return
    #[arg(long)]
    top_n: Option<usize>,
}

impl PipelineFlags {
    fn into_config(self) -> anyhow::Result<MiningConfig> {
        let mut config = painmine_core::load_config()?;
        if let Some(max_age_days) = self.max_age_days {
            config.max_age_days = max_age_days;
        }
        if let Some(max_features) = self.max_features {
            config.max_features = max_features;
        }
        if let Some(period) = self.period {
            config.period = period.parse()?;
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show an overview of a post snapshot
    Status {
        /// Path to the JSON post snapshot
        #[arg(long)]
        posts: PathBuf,
    },
    /// Run the ideas pipeline and print results to stdout
    Analyze {
        /// Path to the JSON post snapshot
        #[arg(long)]
        posts: PathBuf,

        #[command(flatten)]
        flags: PipelineFlags,
    },
    /// Run the pipeline and write markdown + JSON reports
    Report {
        /// Path to the JSON post snapshot
        #[arg(long)]
        posts: PathBuf,

        /// Directory for the generated report files
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,

        #[command(flatten)]
        flags: PipelineFlags,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::Status { posts } => {
            let posts = snapshot::load_posts(&posts)?;
            report::print_status(&posts);
        }
        Commands::Analyze { posts, flags } => {
            let posts = snapshot::load_posts(&posts)?;
            let config = flags.into_config()?;
            let outcome = mine_ideas(&posts, &config, today);
            report::print_analysis(&outcome);
        }
        Commands::Report {
            posts,
            output_dir,
            flags,
        } => {
            let posts = snapshot::load_posts(&posts)?;
            let config = flags.into_config()?;
            let outcome = mine_ideas(&posts, &config, today);
            let paths = report::write_reports(&outcome, &output_dir, today)?;
            for path in paths {
                println!("wrote {}", path.display());
            }
        }
    }

    Ok(())
}
