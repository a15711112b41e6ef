//! `labgrid` command-line entry point.

use clap::{ColorChoice, Parser};
use labgrid_cli::commands::{
    run_applicant, run_create, run_diff, run_enter, run_export, run_finish, run_mark, run_show,
    run_statuses, run_tag,
};
use labgrid_cli::config::LabgridConfig;
use labgrid_cli::logging::{LogConfig, LogFormat, init_logging};
use labgrid_cli::types::{ApplicantAction, DiffMode, NewGrid};
use labgrid_core::EvaluationAction;
use labgrid_output::ExportOptions;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{ApplicantCommand, Cli, Command, DiffModeArg, LogFormatArg, LogLevelArg, MarkArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!("{error:#}");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = LabgridConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Create {
            id,
            title,
            width,
            height,
            sample_arrival_date,
            sample_taken_date,
            test_initiation_date,
            output,
        } => run_create(
            NewGrid {
                id,
                title,
                width,
                height,
                sample_arrival_date,
                sample_taken_date,
                test_initiation_date,
            },
            &output,
        ),
        Command::Show { grid } => run_show(&grid, &config),
        Command::Diff {
            baseline,
            current,
            mode,
        } => {
            let mode = match mode {
                DiffModeArg::Entry => DiffMode::Entry,
                DiffModeArg::Evaluation => DiffMode::Evaluation,
                DiffModeArg::All => DiffMode::All,
            };
            run_diff(&baseline, &current, mode)
        }
        Command::Tag {
            grid,
            from,
            to,
            status,
            output,
        } => run_tag(&grid, &from, &to, status, output.output.as_deref(), &config),
        Command::Enter {
            grid,
            well,
            value,
            clear,
            output,
        } => {
            let value = if clear { None } else { value.as_deref() };
            run_enter(&grid, &well, value, output.output.as_deref())
        }
        Command::Mark {
            grid,
            well,
            result,
            output,
        } => {
            let action = match result {
                MarkArg::Positive => EvaluationAction::Primary,
                MarkArg::Retest => EvaluationAction::Secondary,
            };
            run_mark(&grid, &well, action, output.output.as_deref(), &config)
        }
        Command::Finish {
            grid,
            title,
            output,
        } => run_finish(&grid, title.as_deref(), output.output.as_deref()),
        Command::Export {
            grid,
            dialect,
            header,
            output_dir,
        } => run_export(
            &grid,
            dialect,
            ExportOptions {
                include_header: header,
            },
            output_dir.as_deref(),
        ),
        Command::Applicant { command } => {
            let (action, args) = match command {
                ApplicantCommand::Encrypt(args) => (ApplicantAction::Encrypt, args),
                ApplicantCommand::Decrypt(args) => (ApplicantAction::Decrypt, args),
            };
            run_applicant(
                action,
                &args.applicant,
                args.secret_file.as_deref(),
                args.output.as_deref(),
                &config,
            )
        }
        Command::Statuses => run_statuses(&config),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
