//! CLI argument definitions for `labgrid`.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use labgrid_model::{CellStatus, GridId};
use labgrid_output::ExportDialect;

#[derive(Parser)]
#[command(
    name = "labgrid",
    version,
    about = "Edit, diff and export laboratory plate grids",
    long_about = "Work with plate grid documents (JSON): tag and fill wells, mark results,\n\
                  compute the minimal patch set against a baseline, export finished plates\n\
                  to instrument CSV dialects, and encrypt applicant personal data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (labgrid.toml). Built-in defaults when omitted.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow sample codes and applicant fields in trace logs.
    ///
    /// WARNING: log output will contain personal data.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Lay out a new, empty plate and write its document.
    Create {
        /// Grid id. A random UUID when omitted.
        #[arg(long = "id", value_parser = parse_grid_id)]
        id: Option<GridId>,
        #[arg(long = "title")]
        title: Option<String>,
        /// Wells per row (e.g. 12 for a 96-well plate).
        #[arg(long = "width")]
        width: usize,
        /// Number of rows (e.g. 8 for a 96-well plate).
        #[arg(long = "height")]
        height: usize,
        /// Dates accept RFC 3339 timestamps or plain `YYYY-MM-DD`.
        #[arg(long = "sample-arrival-date", value_name = "DATE", value_parser = parse_date)]
        sample_arrival_date: Option<DateTime<Utc>>,
        #[arg(long = "sample-taken-date", value_name = "DATE", value_parser = parse_date)]
        sample_taken_date: Option<DateTime<Utc>>,
        #[arg(long = "test-initiation-date", value_name = "DATE", value_parser = parse_date)]
        test_initiation_date: Option<DateTime<Utc>>,
        /// Where to write the new document. Must not exist yet.
        #[arg(long = "output", value_name = "PATH")]
        output: PathBuf,
    },

    /// Render a grid as a table with its plate labels.
    Show {
        #[arg(value_name = "GRID_JSON")]
        grid: PathBuf,
    },

    /// Print the patches a save of CURRENT over BASELINE would write.
    Diff {
        #[arg(value_name = "BASELINE_JSON")]
        baseline: PathBuf,
        #[arg(value_name = "CURRENT_JSON")]
        current: PathBuf,
        #[arg(long = "mode", value_enum, default_value = "all")]
        mode: DiffModeArg,
    },

    /// Stage a status on every empty well of a rectangular selection.
    Tag {
        #[arg(value_name = "GRID_JSON")]
        grid: PathBuf,
        /// First corner of the selection (e.g. A1).
        #[arg(long = "from", value_name = "WELL")]
        from: String,
        /// Opposite corner of the selection (e.g. C4).
        #[arg(long = "to", value_name = "WELL")]
        to: String,
        #[arg(long = "status", value_parser = parse_status)]
        status: CellStatus,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Type a sample code into a well, or clear it.
    Enter {
        #[arg(value_name = "GRID_JSON")]
        grid: PathBuf,
        #[arg(long = "well", value_name = "WELL")]
        well: String,
        #[arg(long = "value", value_name = "CODE", required_unless_present = "clear")]
        value: Option<String>,
        #[arg(long = "clear", conflicts_with = "value")]
        clear: bool,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Toggle a result mark on a well.
    Mark {
        #[arg(value_name = "GRID_JSON")]
        grid: PathBuf,
        #[arg(long = "well", value_name = "WELL")]
        well: String,
        #[arg(long = "result", value_enum)]
        result: MarkArg,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Mark a grid finished. Finished grids can be exported but not edited.
    Finish {
        #[arg(value_name = "GRID_JSON")]
        grid: PathBuf,
        /// Set the title before finishing.
        #[arg(long = "title")]
        title: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Export a finished grid in an instrument CSV dialect.
    Export {
        #[arg(value_name = "GRID_JSON")]
        grid: PathBuf,
        #[arg(long = "dialect", value_parser = parse_dialect)]
        dialect: ExportDialect,
        /// Emit the dialect's column names as the first line.
        #[arg(long = "header")]
        header: bool,
        /// Write `<dialect>-<title>.csv` into this directory instead of stdout.
        #[arg(long = "output-dir", value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Encrypt or decrypt the personal fields of an applicant record.
    Applicant {
        #[command(subcommand)]
        command: ApplicantCommand,
    },

    /// List the configured cell statuses.
    Statuses,
}

#[derive(Subcommand)]
pub enum ApplicantCommand {
    Encrypt(ApplicantArgs),
    Decrypt(ApplicantArgs),
}

#[derive(Args)]
pub struct ApplicantArgs {
    #[arg(value_name = "APPLICANT_JSON")]
    pub applicant: PathBuf,

    /// File holding the secret. Falls back to the LABGRID_SECRET variable.
    #[arg(long = "secret-file", value_name = "PATH")]
    pub secret_file: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Write the updated document here instead of overwriting the input.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

fn parse_grid_id(value: &str) -> Result<GridId, String> {
    GridId::new(value).map_err(|e| e.to_string())
}

fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| format!("`{value}` is neither YYYY-MM-DD nor an RFC 3339 timestamp"))
}

fn parse_status(value: &str) -> Result<CellStatus, String> {
    value.parse()
}

fn parse_dialect(value: &str) -> Result<ExportDialect, String> {
    value.parse().map_err(|e: labgrid_output::ExportError| e.to_string())
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DiffModeArg {
    Entry,
    Evaluation,
    All,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MarkArg {
    /// Toggle positive.
    Positive,
    /// Toggle needs-retest.
    Retest,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn dates_accept_plain_days_and_timestamps() {
        assert_eq!(
            parse_date("2024-05-02"),
            Ok(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-05-02T10:30:00+02:00"),
            Ok(Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap())
        );
        assert!(parse_date("02.05.2024").is_err());
    }

    #[test]
    fn create_requires_dimensions_and_output() {
        let cli = Cli::try_parse_from([
            "labgrid", "create", "--width", "12", "--height", "8", "--output", "plate.json",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Create {
                id: None,
                width: 12,
                height: 8,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["labgrid", "create", "--width", "12"]).is_err());
        assert!(
            Cli::try_parse_from([
                "labgrid", "create", "--id", " ", "--width", "1", "--height", "1", "--output",
                "p.json",
            ])
            .is_err()
        );
    }
}
