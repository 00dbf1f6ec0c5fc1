//! CLI entry point for tale_script.
//! Usage: cargo run -p tale_script -- compile world.tale --format toml

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use tale_data::{Definition, validate_definition};
use tale_script::{CompileError, CompilerConfig, OutputFormat, compile_source, emit_definition, render_source, tokenize};

#[derive(Parser)]
#[command(author, version, about = "Compiler for the Tale adventure language.")]
struct Cli {
    /// TOML file with compiler settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream, one token per line.
    Tokens { file: PathBuf },
    /// Compile a source file and print or write the definition.
    Compile {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Ron)]
        format: OutputFormat,
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compile a source file and report the first error, if any.
    Check { file: PathBuf },
    /// Print the canonical form of a source file.
    Fmt { file: PathBuf },
    /// Check a RON definition written by `compile`.
    Validate { file: PathBuf },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => CompilerConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => CompilerConfig::default(),
    };

    match &cli.command {
        Commands::Tokens { file } => {
            let source = read_source(file)?;
            let tokens = tokenize(&source).map_err(|e| located(file, &CompileError::from(e)))?;
            for token in tokens.tokens() {
                println!(
                    "{:>4} {:>3} {:<10} {}",
                    token.line,
                    token.column,
                    token.kind.name(),
                    token.text.escape_debug()
                );
            }
        },
        Commands::Compile { file, format, out } => {
            let def = compile_file(file, &config)?;
            let text = emit_definition(&def, *format).context("serializing definition")?;
            match out {
                Some(path) => {
                    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
                    info!("wrote {}", path.display());
                },
                None => println!("{text}"),
            }
        },
        Commands::Check { file } => {
            compile_file(file, &config)?;
            println!("{}: ok", file.display());
        },
        Commands::Fmt { file } => {
            let def = compile_file(file, &config)?;
            print!("{}", render_source(&def));
        },
        Commands::Validate { file } => {
            let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
            let def: Definition = ron::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;
            let problems = validate_definition(&def);
            if problems.is_empty() {
                println!("{}: ok", file.display());
            } else {
                for problem in &problems {
                    eprintln!("{}: {problem}", file.display());
                }
                eprintln!("{} problem(s) found", problems.len());
                return Ok(ExitCode::FAILURE);
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn compile_file(path: &Path, config: &CompilerConfig) -> Result<Definition> {
    let source = read_source(path)?;
    compile_source(&source, config).map_err(|e| located(path, &e))
}

// Positioned messages already start with "line:col: ".
fn located(path: &Path, err: &CompileError) -> anyhow::Error {
    match err.position() {
        Some(_) => anyhow::anyhow!("{}:{err}", path.display()),
        None => anyhow::anyhow!("{}: {err}", path.display()),
    }
}
