use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use glob::glob;
use serde::Serialize;

use iexhist_core::{HistFormat, Message, MessageKind, Parser, ParserError, SessionStats};

#[derive(ClapParser, Debug)]
#[command(name = "iexhist")]
#[command(version)]
#[command(
    about = "Offline decoder for IEX historical market-data (HIST) capture files.",
    long_about = None,
    after_help = "Examples:\n  iexhist dump 20180103_IEXTP1_TOPS1.6.pcap --format tops16\n  iexhist dump deep.pcap --format deep10 --kind trade-report --kind quote-update\n  iexhist summary tops.pcap --format tops16 --stdout --pretty"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a capture and print one JSON message per line.
    #[command(
        after_help = "Examples:\n  iexhist dump tops.pcap --format tops16\n  iexhist dump tops.pcap --format tops16 --kind trade-report --limit 100"
    )]
    Dump {
        /// Path to a .pcap or .pcapng HIST capture
        input: PathBuf,

        /// Feed format of the capture
        #[arg(long, value_enum)]
        format: FormatArg,

        /// Only emit these message kinds (repeatable)
        #[arg(long = "kind", value_enum)]
        kinds: Vec<KindArg>,

        /// Stop after this many messages
        #[arg(long)]
        limit: Option<u64>,

        /// Write output to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Suppress the trailing statistics line on stderr
        #[arg(long)]
        quiet: bool,
    },

    /// Decode a capture and generate a JSON report of message counts.
    #[command(
        after_help = "Examples:\n  iexhist summary tops.pcap --format tops16 -o report.json\n  iexhist summary tops.pcap --format tops16 --stdout --pretty"
    )]
    Summary {
        /// Path to a .pcap or .pcapng HIST capture
        input: PathBuf,

        /// Feed format of the capture
        #[arg(long, value_enum)]
        format: FormatArg,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Tops15,
    Tops16,
    Deep10,
}

impl From<FormatArg> for HistFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Tops15 => HistFormat::Tops15,
            FormatArg::Tops16 => HistFormat::Tops16,
            FormatArg::Deep10 => HistFormat::Deep10,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    SystemEvent,
    SecurityDirectory,
    TradingStatus,
    OperationalHalt,
    ShortSalePriceTest,
    SecurityEvent,
    QuoteUpdate,
    TradeReport,
    OfficialPrice,
    TradeBreak,
    AuctionInformation,
    PriceLevelUpdate,
}

impl From<KindArg> for MessageKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::SystemEvent => MessageKind::SystemEvent,
            KindArg::SecurityDirectory => MessageKind::SecurityDirectory,
            KindArg::TradingStatus => MessageKind::TradingStatus,
            KindArg::OperationalHalt => MessageKind::OperationalHalt,
            KindArg::ShortSalePriceTest => MessageKind::ShortSalePriceTest,
            KindArg::SecurityEvent => MessageKind::SecurityEvent,
            KindArg::QuoteUpdate => MessageKind::QuoteUpdate,
            KindArg::TradeReport => MessageKind::TradeReport,
            KindArg::OfficialPrice => MessageKind::OfficialPrice,
            KindArg::TradeBreak => MessageKind::TradeBreak,
            KindArg::AuctionInformation => MessageKind::AuctionInformation,
            KindArg::PriceLevelUpdate => MessageKind::PriceLevelUpdate,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dump {
            input,
            format,
            kinds,
            limit,
            output,
            quiet,
        } => cmd_dump(input, format.into(), &kinds, limit, output, quiet),
        Commands::Summary {
            input,
            format,
            report,
            stdout,
            pretty,
            compact,
            quiet,
        } => cmd_summary(input, format.into(), report, stdout, pretty, compact, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

impl From<ParserError> for CliError {
    fn from(err: ParserError) -> Self {
        let hint = match &err {
            ParserError::Source(_) => Some("use a .pcap or .pcapng HIST capture".to_string()),
            ParserError::Framing(_) => {
                Some("check that --format matches the capture's feed".to_string())
            }
            ParserError::Message(_) => None,
        };
        CliError::new(err.to_string(), hint)
    }
}

fn cmd_dump(
    input: PathBuf,
    format: HistFormat,
    kinds: &[KindArg],
    limit: Option<u64>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let allowed: Vec<MessageKind> = kinds.iter().copied().map(MessageKind::from).collect();
    let filter = (!allowed.is_empty()).then_some(allowed.as_slice());

    let mut out: Box<dyn Write> = match output.as_ref() {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(std::io::BufWriter::new(file))
        }
        None => Box::new(std::io::BufWriter::new(std::io::stdout())),
    };

    let mut parser = Parser::open(&resolved_input, format)?;
    let mut emitted: u64 = 0;
    let mut decode_errors: u64 = 0;

    loop {
        if limit.is_some_and(|limit| emitted >= limit) {
            break;
        }
        match parser.get_next_message(filter) {
            Ok(Some(message)) => {
                let line = serialize_message(&message)?;
                writeln!(out, "{}", line)
                    .context("Failed to write output")
                    .map_err(CliError::from)?;
                emitted += 1;
            }
            Ok(None) => break,
            // A truncated message block does not poison the session.
            Err(ParserError::Message(err)) => {
                decode_errors += 1;
                if !quiet {
                    eprintln!("warning: {}", err);
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
    out.flush()
        .context("Failed to flush output")
        .map_err(CliError::from)?;

    if !quiet {
        let stats = parser.stats();
        eprintln!(
            "OK: {} messages emitted ({} decoded, {} filtered, {} unsupported, {} decode errors)",
            emitted,
            stats.messages_decoded,
            stats.messages_filtered,
            stats.messages_unsupported,
            decode_errors
        );
    }
    Ok(())
}

const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct SummaryReport {
    schema_version: u32,
    input: String,
    format: HistFormat,
    stats: SessionStats,
    decode_errors: u64,
    message_counts: Vec<KindCount>,
}

#[derive(Debug, Serialize)]
struct KindCount {
    kind: MessageKind,
    count: u64,
}

fn cmd_summary(
    input: PathBuf,
    format: HistFormat,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    let rep = summarize_capture(&resolved_input, format)?;
    let json = serialize_report(&rep, pretty, compact)?;

    if stdout {
        print!("{}", json);
        return Ok(());
    }

    let report = report.expect("report required when not using stdout");
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;
    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    Ok(())
}

const ALL_KINDS: [MessageKind; 12] = [
    MessageKind::SystemEvent,
    MessageKind::SecurityDirectory,
    MessageKind::TradingStatus,
    MessageKind::OperationalHalt,
    MessageKind::ShortSalePriceTest,
    MessageKind::SecurityEvent,
    MessageKind::QuoteUpdate,
    MessageKind::TradeReport,
    MessageKind::OfficialPrice,
    MessageKind::TradeBreak,
    MessageKind::AuctionInformation,
    MessageKind::PriceLevelUpdate,
];

fn summarize_capture(input: &PathBuf, format: HistFormat) -> Result<SummaryReport, CliError> {
    let mut counts = [0u64; ALL_KINDS.len()];
    let mut decode_errors: u64 = 0;

    let stats = Parser::with_capture(input, format, |parser| {
        loop {
            match parser.get_next_message(None) {
                Ok(Some(message)) => {
                    if let Some(slot) = ALL_KINDS.iter().position(|k| *k == message.kind()) {
                        counts[slot] += 1;
                    }
                }
                Ok(None) => break,
                Err(ParserError::Message(_)) => decode_errors += 1,
                Err(err) => return Err(CliError::from(err)),
            }
        }
        Ok(parser.stats())
    })??;

    Ok(SummaryReport {
        schema_version: REPORT_SCHEMA_VERSION,
        input: input.display().to_string(),
        format,
        stats,
        decode_errors,
        message_counts: ALL_KINDS
            .iter()
            .zip(counts)
            .map(|(kind, count)| KindCount { kind: *kind, count })
            .collect(),
    })
}

fn serialize_message(message: &Message) -> Result<String, CliError> {
    serde_json::to_string(message)
        .context("JSON serialization failed")
        .map_err(Into::into)
}

fn serialize_report(rep: &SummaryReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        ));
    }
    if matches.len() > 1 {
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches)",
                pattern,
                matches.len()
            ),
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
