use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use likeday::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Find historical days whose hourly profile matches a reference day
#[derive(Parser, Debug)]
#[command(name = "likeday")]
#[command(about = "Likeday analysis for energy-market time series", long_about = None)]
struct Args {
    /// JSON file with hourly rows
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank historical days against a reference day
    Analyze {
        /// Reference day (YYYY-MM-DD)
        #[arg(long, required_unless_present = "request")]
        reference: Option<NaiveDate>,

        /// First historical day
        #[arg(long, required_unless_present = "request")]
        start: Option<NaiveDate>,

        /// Last historical day
        #[arg(long, required_unless_present = "request")]
        end: Option<NaiveDate>,

        /// Variable to match on, e.g. "RT Load"
        #[arg(long, required_unless_present = "request")]
        variable: Option<MatchVariable>,

        /// Number of days to return
        #[arg(long, default_value_t = likeday::DEFAULT_TOP_N)]
        top_n: usize,

        /// Weight of the Euclidean term in [0, 1]
        #[arg(long, default_value_t = likeday::DEFAULT_EUCLIDEAN_WEIGHT)]
        weight: f64,

        /// historical or forecast
        #[arg(long, default_value_t = ReferenceMode::Historical)]
        mode: ReferenceMode,

        /// Read the whole request from a JSON file
        #[arg(long, conflicts_with_all = ["reference", "start", "end", "variable"])]
        request: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Project another variable onto a ranked day-set
    Project {
        /// Analysis result written by `analyze`
        #[arg(long, required_unless_present = "request", requires = "variable")]
        result: Option<PathBuf>,

        /// Variable to project
        #[arg(long)]
        variable: Option<MatchVariable>,

        /// Read a reference day and day list from a JSON file instead
        #[arg(long, conflicts_with_all = ["result", "variable"])]
        request: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("likeday v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Analyze {
            reference,
            start,
            end,
            variable,
            top_n,
            weight,
            mode,
            request,
            output,
        } => {
            let request = match request {
                Some(path) => read_json::<AnalysisRequest>(&path)?,
                None => {
                    // clap enforces these when no request file is given
                    let (Some(reference), Some(start), Some(end), Some(variable)) =
                        (reference, start, end, variable)
                    else {
                        bail!("--reference, --start, --end and --variable are required");
                    };
                    AnalysisRequest::new(reference, start, end, variable)
                        .with_top_n(top_n)
                        .with_euclidean_weight(weight)
                        .with_reference_mode(mode)
                }
            };

            let Some(data) = args.data.as_deref() else {
                bail!("analyze needs --data <rows.json>");
            };
            let engine = LikedayEngine::new(open_source(data)?);
            info!(
                "Analyzing {} for {} over {}..{}",
                request.match_variable, request.reference_date, request.start_date, request.end_date
            );

            let result = engine.analyze(&request)?;
            info!(
                "{} of {} candidate days returned",
                result.similarity_scores.len(),
                result.pool_summary.candidates_considered
            );
            write_json(&result, output.as_deref())
        }

        Command::Project {
            result,
            variable,
            request,
            output,
        } => {
            // Projection may be served entirely from the analysis result
            let source: Box<dyn DaySource> = match args.data.as_deref() {
                Some(path) => Box::new(open_source(path)?),
                None => Box::new(InMemorySource::default()),
            };
            let engine = LikedayEngine::new(source.as_ref());

            let projection = match (result, variable, request) {
                (_, _, Some(path)) => engine.project_request(&read_json::<SecondaryRequest>(&path)?)?,
                (Some(path), Some(variable), None) => {
                    engine.project(&read_json::<AnalysisResult>(&path)?, &variable)?
                }
                _ => bail!("project needs --result and --variable, or --request"),
            };

            if !projection.omitted.is_empty() {
                info!("{} days omitted from projection", projection.omitted.len());
            }
            write_json(&projection, output.as_deref())
        }
    }
}

fn open_source(path: &Path) -> anyhow::Result<JsonFileSource> {
    let source = JsonFileSource::open(path)
        .with_context(|| format!("failed to load rows from {}", path.display()))?;
    info!("Loaded {} days from {:?}", source.records().len(), path);
    Ok(source)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
            info!("Wrote {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
