//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads and filters the sales file
//! - prints reports or JSON
//! - writes exports and demo data

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DemoArgs, ExportArgs, QueryArgs, SourceArgs};
use crate::data::{DemoConfig, write_demo_csv};
use crate::error::{AppError, SalesError};

pub mod pipeline;

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    // `sales` and `sales -f orders.csv` behave like `sales tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let interactive = matches!(cli.command, Command::Tui(_));
    init_logging(cli.verbose, interactive);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Options(args) => handle_options(args),
        Command::Export(args) => handle_export(args),
        Command::Demo(args) => handle_demo(args),
        Command::Tui(args) => handle_tui(args),
    }
}

/// Install the stderr subscriber.
///
/// The TUI owns the terminal, so it logs nothing unless `RUST_LOG` asks for it.
fn init_logging(verbose: u8, interactive: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, interactive)));

    // A second init (tests, embedding) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_level(verbose: u8, interactive: bool) -> &'static str {
    if interactive {
        return "off";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn handle_summary(args: QueryArgs) -> Result<(), AppError> {
    let run = pipeline::run_query(&args.source, &args.filter)?;

    if args.json {
        let json = serde_json::to_string_pretty(&run.views).map_err(SalesError::from)?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", crate::report::format_load_summary(&run.path, &run.table));
    println!("{}", crate::report::format_views(&run.views, args.preview));
    Ok(())
}

fn handle_options(args: QueryArgs) -> Result<(), AppError> {
    let run = pipeline::run_query(&args.source, &args.filter)?;

    if args.json {
        let json = serde_json::to_string_pretty(&run.views.options).map_err(SalesError::from)?;
        println!("{json}");
        return Ok(());
    }

    print!("{}", crate::report::format_filter(&run.filter));
    print!("{}", crate::report::format_options(&run.views.options, &run.filter));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let run = pipeline::run_query(&args.source, &args.filter)?;
    let written = crate::io::export::export_all(&args.out_dir, &run.table, &run.views)?;

    println!(
        "Exported {} of {} records ({} files) to {}",
        run.views.totals.records,
        run.table.rows_used(),
        written.len(),
        args.out_dir.display()
    );
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = DemoConfig {
        rows: args.rows,
        seed: args.seed,
        start: args.start,
        end: args.end,
    };
    let rows = write_demo_csv(&args.out, &config)?;
    println!("Wrote {rows} demo rows to {}", args.out.display());
    Ok(())
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

/// Rewrite argv so `sales` defaults to `sales tui`.
///
/// Rules:
/// - `sales`                      -> `sales tui`
/// - `sales -f orders.csv ...`    -> `sales tui -f orders.csv ...`
/// - `sales --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "summary" | "options" | "export" | "demo" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["sales"])), argv(&["sales", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["sales", "-f", "a.csv"])),
            argv(&["sales", "tui", "-f", "a.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(rewrite_args(argv(&["sales", "--help"])), argv(&["sales", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["sales", "export", "-o", "out"])),
            argv(&["sales", "export", "-o", "out"])
        );
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_level(0, false), "warn");
        assert_eq!(default_level(1, false), "info");
        assert_eq!(default_level(5, false), "debug");
        assert_eq!(default_level(2, true), "off");
    }
}
