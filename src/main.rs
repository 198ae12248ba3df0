use chrono::Local;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use pen_report::application::engine::ReportEngine;
use pen_report::domain::policy::{CountedStatuses, DedupKey, ReconPolicy};
use pen_report::infrastructure::files::FileSources;
use pen_report::interfaces::csv::report_writer::ReportWriter;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Voice attempts file (CSV or spreadsheet). Prompted for when omitted.
    #[arg(long, env = "PEN_REPORT_VOICE")]
    voice: Option<PathBuf>,

    /// SMS attempts file. Prompted for when omitted.
    #[arg(long, env = "PEN_REPORT_SMS")]
    sms: Option<PathBuf>,

    /// Payment-link interaction file. Prompted for when omitted.
    #[arg(long, env = "PEN_REPORT_PAYMENTS")]
    payments: Option<PathBuf>,

    /// Comma-separated import summary files. Prompted for when omitted.
    #[arg(long, env = "PEN_REPORT_IMPORTS", value_delimiter = ',')]
    imports: Vec<PathBuf>,

    /// Output CSV path. Defaults to PEN_Combined_Report_<date>.csv.
    #[arg(short, long, env = "PEN_REPORT_OUTPUT")]
    output: Option<PathBuf>,

    /// Interaction statuses counted as clicks
    #[arg(long, value_enum, default_value_t = CountedStatuses::All)]
    counted: CountedStatuses,

    /// Key under which only the latest row is kept
    #[arg(long, value_enum, default_value_t = DedupKey::Recipient)]
    dedup_key: DedupKey,

    /// Keep voice attempts whatever their delivery status
    #[arg(long)]
    no_reached_filter: bool,

    /// Keep every attempt instead of the last one per message
    #[arg(long)]
    all_attempts: bool,

    /// Fail when a join stage produces no rows
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn policy(&self) -> ReconPolicy {
        ReconPolicy {
            counted: self.counted,
            reached_only: !self.no_reached_filter,
            last_attempt_only: !self.all_attempts,
            dedup_key: self.dedup_key,
            strict: self.strict,
        }
    }
}

fn prompt(label: &str) -> io::Result<String> {
    eprint!("Enter the {label}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn path_or_prompt(path: Option<PathBuf>, label: &str) -> io::Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => prompt(label).map(PathBuf::from),
    }
}

fn default_output() -> PathBuf {
    PathBuf::from(format!(
        "PEN_Combined_Report_{}.csv",
        Local::now().format("%Y-%m-%d")
    ))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let policy = cli.policy();

    let voice = path_or_prompt(cli.voice, "voice attempts file path").into_diagnostic()?;
    let sms = path_or_prompt(cli.sms, "SMS attempts file path").into_diagnostic()?;
    let payments = path_or_prompt(cli.payments, "payment interaction file path").into_diagnostic()?;
    let imports: Vec<PathBuf> = if cli.imports.is_empty() {
        prompt("import summary file paths (comma-separated)")
            .into_diagnostic()?
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect()
    } else {
        cli.imports
    };
    if imports.is_empty() {
        miette::bail!("at least one import summary file is required");
    }

    let sources = FileSources::new(voice, sms, payments, imports);
    sources.check().into_diagnostic()?;

    let engine = ReportEngine::new(Box::new(sources), policy);
    let rows = engine.run().into_diagnostic()?;

    let output = cli.output.unwrap_or_else(default_output);
    let file = File::create(&output).into_diagnostic()?;
    let mut writer = ReportWriter::new(file);
    writer.write_rows(&rows).into_diagnostic()?;

    eprintln!("Wrote {} rows to {}", rows.len(), output.display());
    Ok(())
}
