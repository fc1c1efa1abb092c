//! declkit CLI binary entry point.
//!
//! All successful output goes to stdout in the selected format. Failures
//! are reported as a JSON error response on stdout with a stable exit
//! code. Logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use declkit::error::{DeclkitError, OutputErrorCode};
use declkit::error_bridges::type_failure;
use declkit::model::ParameterDescriptor;
use declkit::output::{emit_response, emit_response_compact, ErrorResponse};
use declkit::report::{
    write_descriptor_summary, write_scan_summary, ScanResponse, SignatureResponse,
};
use declkit::scan::{scan, ScanConfig};

// ============================================================================
// CLI Structure
// ============================================================================

/// Extract declarations and type signatures from Swift source.
#[derive(Parser, Debug)]
#[command(name = "declkit", version, about = "Extract declarations from Swift source")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: OutputFormat,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format for successful responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Single-line JSON.
    Compact,
    /// Human-readable text.
    Summary,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract declarations from files and directories.
    Scan {
        /// Files or directories to scan.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Leave start/end locations empty.
        #[arg(long)]
        no_locations: bool,

        /// Additional file extension to include (repeatable).
        #[arg(long = "extension", value_name = "EXT")]
        extensions: Vec<String>,

        /// Additional directory name to skip (repeatable).
        #[arg(long = "exclude", value_name = "DIR")]
        excludes: Vec<String>,

        /// Skip files larger than this many bytes.
        #[arg(long, value_name = "BYTES")]
        max_file_size: Option<u64>,

        /// Follow symbolic links while walking directories.
        #[arg(long)]
        follow_symlinks: bool,
    },

    /// Decompose a single type expression.
    Signature {
        /// Type expression, e.g. "(Int) async throws -> String".
        #[arg(value_name = "TYPE")]
        type_expr: String,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<ExitCode, DeclkitError> {
    let format = cli.global.format;
    match cli.command {
        Command::Scan {
            paths,
            no_locations,
            extensions,
            excludes,
            max_file_size,
            follow_symlinks,
        } => {
            let mut config = ScanConfig::new().follow_symlinks(follow_symlinks);
            for extension in &extensions {
                config = config.extension(extension);
            }
            for dir in &excludes {
                config = config.exclude(dir);
            }
            if let Some(bytes) = max_file_size {
                config = config.max_file_size(bytes);
            }
            if no_locations {
                config = config.without_locations();
            }
            execute_scan(&paths, &config, format)
        }
        Command::Signature { type_expr } => {
            execute_signature(&type_expr, format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// Command Executors
// ============================================================================

/// Execute scan command.
///
/// Per-file parse failures are listed in the response. When every file
/// failed the response carries status "error" and the exit code of the
/// first failure.
fn execute_scan(
    paths: &[PathBuf],
    config: &ScanConfig,
    format: OutputFormat,
) -> Result<ExitCode, DeclkitError> {
    debug!(?paths, ?config, "scanning");
    let report = scan(paths, config)?;
    let mut stdout = io::stdout();
    match format {
        OutputFormat::Json => emit_response(&ScanResponse::new(&report), &mut stdout),
        OutputFormat::Compact => emit_response_compact(&ScanResponse::new(&report), &mut stdout),
        OutputFormat::Summary => write_scan_summary(&report, &mut stdout),
    }
    .map_err(|e| DeclkitError::internal(format!("failed to write output: {}", e)))?;
    let _ = stdout.flush();

    match report.errors.first() {
        Some(first) if report.all_failed() => Ok(ExitCode::from(first.error_code().code())),
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// Execute signature command.
fn execute_signature(type_expr: &str, format: OutputFormat) -> Result<(), DeclkitError> {
    let descriptor: ParameterDescriptor =
        declkit::decompose_type(type_expr).map_err(|e| type_failure(type_expr, &e))?;
    let mut stdout = io::stdout();
    match format {
        OutputFormat::Json => emit_response(&SignatureResponse::new(&descriptor), &mut stdout),
        OutputFormat::Compact => {
            emit_response_compact(&SignatureResponse::new(&descriptor), &mut stdout)
        }
        OutputFormat::Summary => write_descriptor_summary(&descriptor, &mut stdout),
    }
    .map_err(|e| DeclkitError::internal(format!("failed to write output: {}", e)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_parsing {
        use super::*;

        #[test]
        fn parse_scan_paths() {
            let args = ["declkit", "scan", "Sources", "Tests"];
            let cli = Cli::try_parse_from(args).unwrap();
            match cli.command {
                Command::Scan { paths, no_locations, .. } => {
                    assert_eq!(paths, vec![PathBuf::from("Sources"), PathBuf::from("Tests")]);
                    assert!(!no_locations);
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn scan_requires_a_path() {
            let result = Cli::try_parse_from(["declkit", "scan"]);
            assert!(result.is_err());
        }

        #[test]
        fn parse_scan_options() {
            let args = [
                "declkit",
                "scan",
                ".",
                "--no-locations",
                "--extension",
                "swiftinterface",
                "--exclude",
                "Generated",
                "--exclude",
                "Mocks",
                "--max-file-size",
                "4096",
            ];
            let cli = Cli::try_parse_from(args).unwrap();
            match cli.command {
                Command::Scan {
                    no_locations,
                    extensions,
                    excludes,
                    max_file_size,
                    ..
                } => {
                    assert!(no_locations);
                    assert_eq!(extensions, vec!["swiftinterface"]);
                    assert_eq!(excludes, vec!["Generated", "Mocks"]);
                    assert_eq!(max_file_size, Some(4096));
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn parse_signature() {
            let args = ["declkit", "signature", "(Int) -> Void"];
            let cli = Cli::try_parse_from(args).unwrap();
            match cli.command {
                Command::Signature { type_expr } => assert_eq!(type_expr, "(Int) -> Void"),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn global_flags_after_subcommand() {
            let args = ["declkit", "signature", "Int", "--format", "summary", "--log-level", "debug"];
            let cli = Cli::try_parse_from(args).unwrap();
            assert_eq!(cli.global.format, OutputFormat::Summary);
            assert!(matches!(cli.global.log_level, LogLevel::Debug));
        }

        #[test]
        fn defaults() {
            let cli = Cli::try_parse_from(["declkit", "signature", "Int"]).unwrap();
            assert_eq!(cli.global.format, OutputFormat::Json);
            assert!(matches!(cli.global.log_level, LogLevel::Warn));
        }

        #[test]
        fn unknown_format_rejected() {
            let result = Cli::try_parse_from(["declkit", "--format", "yaml", "signature", "Int"]);
            assert!(result.is_err());
        }
    }

    mod log_level {
        use super::*;

        #[test]
        fn converts_to_tracing_level() {
            assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
            assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
            assert_eq!(LogLevel::Info.to_tracing_level(), tracing::Level::INFO);
            assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
            assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        }
    }
}
