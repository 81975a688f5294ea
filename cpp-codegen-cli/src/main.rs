//! # cpp-codegen
//!
//! CLI tool for generating string and JSON converters for annotated C++ enums.
//!
//! ## Usage
//!
//! ```bash
//! # Generate converters for the headers under the current directory
//! cpp-codegen generate
//!
//! # Generate converters to a specific output directory
//! cpp-codegen generate --input ./include --output ./generated
//!
//! # Use another annotation marker and reject unknown directives
//! cpp-codegen generate --marker @delta_enable_codegen --strict-directives
//!
//! # Watch mode for development
//! cpp-codegen generate --watch
//!
//! # Dry run to preview changes
//! cpp-codegen generate --dry-run
//!
//! # Initialize configuration
//! cpp-codegen init
//!
//! # Check that generated converters are up-to-date
//! cpp-codegen validate --input ./include --output ./generated
//!
//! # Print the declaration model as JSON
//! cpp-codegen inspect --input ./include
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cpp_codegen::{Diagnostic, Severity};
use cpp_codegen_cli::{
    config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME},
    error::CliError,
    generator::{Analysis, ConverterGenerator, DiagnosticPolicy},
    scanner::{SourceFile, SourceScanner},
    watcher::FileWatcher,
    writer::{FileStatus, FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "cpp-codegen")]
#[command(author, version, about = "Generate string and JSON converters for annotated C++ enums", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate converters from annotated C++ headers
    Generate {
        /// Input directory containing C++ headers
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Watch for file changes and regenerate
        #[arg(short, long)]
        watch: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter headers by relative path pattern (glob)
        #[arg(long)]
        filter: Option<String>,

        /// Fail when error diagnostics are reported
        #[arg(long)]
        strict: bool,

        /// Fail when any diagnostic is reported
        #[arg(long)]
        deny_warnings: bool,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Initialize a new cpp-codegen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that generated converters are up-to-date
    Validate {
        /// Input directory containing C++ headers
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory holding the generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Print the declaration model and diagnostics as JSON
    Inspect {
        /// Input directory containing C++ headers
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter headers by relative path pattern (glob)
        #[arg(long)]
        filter: Option<String>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

/// Flags that override `[annotation]` and `[scan]` settings.
#[derive(Args, Debug, Default)]
struct OverrideArgs {
    /// Annotation marker to look for instead of the configured one
    #[arg(long)]
    marker: Option<String>,

    /// Drop enums whose annotation has unrecognized directive lines
    #[arg(long)]
    strict_directives: bool,

    /// Also scan headers ignored by .gitignore
    #[arg(long)]
    no_gitignore: bool,
}

impl OverrideArgs {
    fn into_cli_args(self, output: Option<PathBuf>) -> CliArgs {
        CliArgs {
            output,
            marker: self.marker,
            strict_directives: self.strict_directives.then_some(true),
            respect_gitignore: self.no_gitignore.then_some(false),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

/// Install the log subscriber; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            watch,
            dry_run,
            config,
            filter,
            strict,
            deny_warnings,
            overrides,
        } => {
            let options = GenerateOptions {
                filter,
                dry_run,
                policy: DiagnosticPolicy {
                    strict,
                    deny_warnings,
                },
            };
            let args = overrides.into_cli_args(output);
            cmd_generate(input, args, watch, config, options)
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Validate {
            input,
            output,
            config,
            overrides,
        } => cmd_validate(input, overrides.into_cli_args(output), config),

        Commands::Inspect {
            input,
            config,
            filter,
            overrides,
        } => cmd_inspect(input, overrides.into_cli_args(None), config, filter),
    }
}

/// Flags of the generate command that apply to every run.
struct GenerateOptions {
    filter: Option<String>,
    dry_run: bool,
    policy: DiagnosticPolicy,
}

/// Load the configuration and apply command-line overrides.
fn load_config(config_path: Option<&Path>, args: &CliArgs) -> Result<Config, CliError> {
    ConfigManager::resolve(config_path, args)
}

/// Discover headers under `input`.
fn scan(input: &Path, config: &Config, filter: Option<&str>) -> Result<Vec<SourceFile>, CliError> {
    let mut scanner = SourceScanner::from_config(input, &config.scan);
    if let Some(pattern) = filter {
        scanner = scanner.with_filter(pattern)?;
    }
    scanner.scan_allow_empty()
}

/// Generate command implementation.
fn cmd_generate(
    input: PathBuf,
    args: CliArgs,
    watch: bool,
    config_path: Option<PathBuf>,
    options: GenerateOptions,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref(), &args)?;

    if watch {
        run_watch_mode(&input, &config, &options)
    } else {
        run_generate(&input, &config, &options)
    }
}

/// Run converter generation once.
fn run_generate(input: &Path, config: &Config, options: &GenerateOptions) -> Result<(), CliError> {
    println!("{}", "Scanning for C++ headers...".cyan());

    let files = scan(input, config, options.filter.as_deref())?;
    if files.is_empty() {
        println!("{}", "No header files found.".yellow());
        return Ok(());
    }

    println!("  Found {} header(s)", files.len().to_string().green());

    println!(
        "{}",
        format!("Parsing enums annotated with {}...", config.annotation.marker).cyan()
    );

    let generator = ConverterGenerator::new(config.clone());
    let analysis = generator.analyze(&files);
    report_diagnostics(&analysis);

    let failures = options.policy.failures(&analysis);
    if failures > 0 {
        return Err(CliError::Diagnostics { count: failures });
    }

    if analysis.declaration_count() == 0 {
        println!(
            "{}",
            format!("No enums annotated with {} found.", config.annotation.marker).yellow()
        );
        return Ok(());
    }

    println!(
        "  Found {} annotated enum(s)",
        analysis.declaration_count().to_string().green()
    );

    println!("{}", "Generating converters...".cyan());
    let output = generator.generate(&analysis)?;

    let writer = FileWriter::new(&config.output.dir, options.dry_run);
    let mut written = 0;
    for result in writer.write_all(&output.files)? {
        match result {
            WriteResult::Written { path, bytes } => {
                written += 1;
                println!(
                    "{} Written {} bytes to {}",
                    "✓".green(),
                    bytes,
                    path.display()
                );
            }
            WriteResult::Unchanged { path } => {
                println!("{} Unchanged {}", "·".dimmed(), path.display());
            }
            WriteResult::DryRun { content, path } => {
                println!(
                    "{} Would write to {}:",
                    "[dry-run]".yellow(),
                    path.display()
                );
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", content);
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }

    if !writer.is_dry_run() {
        println!(
            "  Generated converters for {} enum(s), {} file(s) updated",
            output.declarations.to_string().green(),
            written.to_string().green()
        );
    }

    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(
    input: &Path,
    config: &Config,
    options: &GenerateOptions,
) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", input.display());
    println!("  Press Ctrl+C to stop\n");

    if let Err(e) = run_generate(input, config, options) {
        print_error(&e);
    }

    let watcher = FileWatcher::new(input, config.scan.extensions.clone());
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if event.is_error() {
            println!(
                "{} {}",
                "Watch error:".red(),
                event.error_message().unwrap_or("Unknown error")
            );
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "File changed:".cyan(), path.display());
        }

        if let Err(e) = run_generate(input, config, options) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Validate command implementation.
fn cmd_validate(
    input: PathBuf,
    args: CliArgs,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    println!("{}", "Validating converters...".cyan());

    let config = load_config(config_path.as_deref(), &args)?;
    let files = scan(&input, &config, None)?;

    let generator = ConverterGenerator::new(config.clone());
    let analysis = generator.analyze(&files);
    let generated = generator.generate(&analysis)?;

    let writer = FileWriter::new(&config.output.dir, false);
    let outdated: Vec<FileStatus> = writer
        .check(&generated.files)?
        .into_iter()
        .filter(|status| !status.is_fresh())
        .collect();

    if outdated.is_empty() {
        println!(
            "{} {} file(s) are up-to-date",
            "✓".green(),
            generated.files.len()
        );
        return Ok(());
    }

    for status in &outdated {
        match status {
            FileStatus::Stale(path) => println!("  {} {}", "stale:".red(), path.display()),
            FileStatus::Missing(path) => println!("  {} {}", "missing:".red(), path.display()),
            FileStatus::Fresh(_) => {}
        }
    }
    println!("{} Converters are out of date", "✗".red());
    println!("  Run 'cpp-codegen generate' to update");
    Err(CliError::Validation(format!(
        "{} generated file(s) out of date",
        outdated.len()
    )))
}

/// Inspect command implementation.
fn cmd_inspect(
    input: PathBuf,
    args: CliArgs,
    config_path: Option<PathBuf>,
    filter: Option<String>,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref(), &args)?;
    let files = scan(&input, &config, filter.as_deref())?;

    let analysis = ConverterGenerator::new(config).analyze(&files);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

/// Print every diagnostic with its severity.
fn report_diagnostics(analysis: &Analysis) {
    let warnings = analysis.count(Severity::Warning);
    let errors = analysis.count(Severity::Error);
    if warnings + errors == 0 {
        return;
    }

    println!(
        "{} {} error(s), {} warning(s):",
        "Diagnostics:".yellow(),
        errors,
        warnings
    );
    for diagnostic in analysis.diagnostics() {
        println!("  {}", format_diagnostic(diagnostic));
    }
}

/// Format a diagnostic for display.
fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let text = diagnostic.to_string();
    match diagnostic.severity {
        Severity::Error => text.red().to_string(),
        Severity::Warning => text.yellow().to_string(),
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
