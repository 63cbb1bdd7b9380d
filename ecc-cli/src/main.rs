use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ecc_core::{ChequeRecord, EccError, LedgerBatch};
use ecc_finance::{
    accepted_cheque_numbers, generate_accepted_batch, generate_commission_batch,
    generate_full_batch, read_ledger, reconcile, write_batch, write_report, DispositionSummary,
};
use ecc_ingest::{Document, Extractor, StatsCollector, TracingObserver};
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod state;

use config::{load_config, Overrides};

#[derive(Parser, Debug)]
#[command(name = "ecc", version, about = "ECC clearing report extraction and ledger batches")]
struct Cli {
    /// Config file (default: ~/.ecc/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract cheque records from a decoded report and print them as JSON
    Extract {
        /// Decoded report (JSON pages of tables / text)
        input: PathBuf,

        /// Print per-page extraction counters instead of the records
        #[arg(long)]
        stats: bool,
    },

    /// Counts and amounts per disposition, as JSON
    Summary {
        input: PathBuf,
    },

    /// Write the display report (sorted by amount, with a total row) as CSV
    Report {
        input: PathBuf,

        #[arg(long, default_value = "ecc_report.csv")]
        output: PathBuf,
    },

    /// Generate a ledger batch
    Batch {
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = BatchArg::Full)]
        kind: BatchArg,

        /// Output CSV (default: <batch name>.csv)
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Keep only the pairs of a full-batch ledger whose cheques the report shows as ACCEPTED
    Reconcile {
        /// Decoded report to take the accepted cheque numbers from
        input: PathBuf,

        /// Full-batch ledger CSV
        #[arg(long)]
        ledger: PathBuf,

        #[arg(long, default_value = "final_batch.csv")]
        output: PathBuf,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.ecc/config.toml with default values
    Init,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BatchArg {
    Full,
    Accepted,
    Commission,
}

#[derive(clap::Args, Debug)]
struct ParamArgs {
    #[arg(long)]
    clearing_account: Option<String>,

    #[arg(long)]
    branch: Option<String>,

    #[arg(long)]
    commission_account: Option<String>,

    #[arg(long)]
    commission_amount: Option<Decimal>,

    /// Commission applies to cheques strictly above this amount
    #[arg(long)]
    threshold: Option<Decimal>,
}

impl From<ParamArgs> for Overrides {
    fn from(args: ParamArgs) -> Self {
        Overrides {
            clearing_account: args.clearing_account,
            branch: args.branch,
            commission_account: args.commission_account,
            commission_amount: args.commission_amount,
            threshold: args.threshold,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Extract { input, stats } => {
            let document = load_document(&input)?;
            if stats {
                let mut collector = StatsCollector::default();
                let result = Extractor::new().extract(&document.pages, &mut collector);
                println!("{}", serde_json::to_string_pretty(&collector.pages)?);
                result.map(|_| ()).or_else(tolerate_empty)?;
            } else {
                let records = extract_records(&document)?;
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }

        Command::Summary { input } => {
            let records = extract_records(&load_document(&input)?)?;
            let summary = DispositionSummary::from_records(&records);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Report { input, output } => {
            let records = extract_records(&load_document(&input)?)?;
            let file = create(&output)?;
            write_report(&records, file)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote {} records to {}", records.len(), output.display());
        }

        Command::Batch { input, kind, output, params } => {
            let cfg = load_config(cli.config.as_deref())?;
            let overrides = Overrides::from(params);
            let records = extract_records(&load_document(&input)?)?;

            let batch = match kind {
                BatchArg::Full => generate_full_batch(&records, &cfg.clearing_params(&overrides))?,
                BatchArg::Accepted => {
                    generate_accepted_batch(&records, &cfg.clearing_params(&overrides))?
                }
                BatchArg::Commission => {
                    generate_commission_batch(&records, &cfg.commission_params(&overrides))?
                }
            };

            let output = output.unwrap_or_else(|| default_output(&batch));
            save_batch(&batch, &output)?;
        }

        Command::Reconcile { input, ledger, output } => {
            let records = extract_records(&load_document(&input)?)?;
            let accepted = accepted_cheque_numbers(&records);
            if accepted.is_empty() {
                return Err(EccError::NoAcceptedRecords { total: records.len() }.into());
            }

            let file = File::open(&ledger).with_context(|| format!("opening {}", ledger.display()))?;
            let read = read_ledger(file).with_context(|| format!("reading {}", ledger.display()))?;
            if read.skipped > 0 {
                info!(skipped = read.skipped, "ledger rows with unknown transaction codes ignored");
            }

            let batch = reconcile(&read.batch, &accepted)?;
            save_batch(&batch, &output)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        bail!("report not found: {}", path.display());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

fn extract_records(document: &Document) -> Result<Vec<ChequeRecord>> {
    Ok(Extractor::new().extract(&document.pages, &mut TracingObserver)?)
}

/// `--stats` still prints counters for a report that yields nothing.
fn tolerate_empty(err: EccError) -> Result<()> {
    match err {
        EccError::NoDataExtracted { .. } => Ok(()),
        other => Err(other.into()),
    }
}

fn default_output(batch: &LedgerBatch) -> PathBuf {
    PathBuf::from(format!("{}.csv", batch.kind.file_stem()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn save_batch(batch: &LedgerBatch, path: &Path) -> Result<()> {
    write_batch(batch, create(path)?).with_context(|| format!("writing {}", path.display()))?;
    println!(
        "Wrote {} batch: {} pairs ({} rows) to {}",
        batch.kind,
        batch.pair_count(),
        batch.len(),
        path.display()
    );
    Ok(())
}
