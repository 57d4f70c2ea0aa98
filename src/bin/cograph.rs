use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use cograph::attributes::read_metadata_csv;
use cograph::export::write_all;
use cograph::relation::validate_row_count;
use cograph::{Pipeline, PipelineConfig, ProjectionSide, Relation};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cograph",
    version,
    about = "Project a bipartite relation onto a co-association graph and analyze it"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Left,
    Right,
}

impl From<Side> for ProjectionSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => ProjectionSide::Left,
            Side::Right => ProjectionSide::Right,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline on a CSV relation
    Run {
        /// Relation CSV with a header row
        #[arg(long)]
        input: PathBuf,
        /// Column holding the projected-side id
        #[arg(long)]
        left: String,
        /// Column holding the bridging id
        #[arg(long)]
        right: String,
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Which side to project onto
        #[arg(long, value_enum)]
        side: Option<Side>,
        /// Row count declared by the source; the run aborts on disagreement
        #[arg(long)]
        expected_rows: Option<usize>,
        /// Keep edge multiplicity as weights
        #[arg(long)]
        weighted: bool,
        /// Keep duplicate rows (they become parallel edges)
        #[arg(long)]
        keep_duplicates: bool,
        /// Maximum number of projected edges
        #[arg(long)]
        ceiling: Option<u64>,
        /// Reference metadata CSV joined onto node records
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Id column of the metadata CSV
        #[arg(long, default_value = "id")]
        metadata_key: String,
        /// Directory for exported artifacts
        #[arg(long)]
        out: Option<PathBuf>,
        /// Debug logging
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            left,
            right,
            config,
            side,
            expected_rows,
            weighted,
            keep_duplicates,
            ceiling,
            metadata,
            metadata_key,
            out,
            verbose,
        } => {
            init_tracing(verbose);

            let mut cfg = match &config {
                Some(path) => PipelineConfig::load(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => PipelineConfig::default(),
            };
            if let Some(side) = side {
                cfg = cfg.with_side(side.into());
            }
            if weighted {
                cfg = cfg.with_weighted(true);
            }
            if keep_duplicates {
                cfg = cfg.with_keep_duplicates(true);
            }
            if let Some(ceiling) = ceiling {
                cfg = cfg.with_edge_ceiling(ceiling);
            }

            let relation = Relation::load_csv(&input, &left, &right)
                .with_context(|| format!("reading relation {}", input.display()))?;
            if let Some(declared) = expected_rows {
                validate_row_count(declared, &relation)?;
            }

            let mut report = Pipeline::new(cfg)?.run(&relation)?;
            if let Some(path) = &metadata {
                let file = File::open(path)
                    .with_context(|| format!("opening metadata {}", path.display()))?;
                report = report.with_metadata(&read_metadata_csv(file, &metadata_key)?);
            }

            for (name, value) in report.table.iter() {
                println!("{name:<22} {value}");
            }

            if let Some(dir) = &out {
                write_all(dir, &report)
                    .with_context(|| format!("writing artifacts to {}", dir.display()))?;
            }
        }
    }

    Ok(())
}
