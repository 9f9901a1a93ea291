//! fncalc CLI
//!
//! Main entry point for the `fncalc` command. Programs are read as JSON
//! expression trees produced by a parser front end.

use clap::{Parser, Subcommand};
use fncalc::{Diagnostics, Environment, EvalConfig, Expr, Interpreter, RuntimeError, Value};
use miette::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "fncalc")]
#[command(author = "Demetrios Chiuratto Agourakis, Dionisio Chiuratto Agourakis")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluate fncalc expression trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a program
    Eval {
        /// Program file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Evaluator configuration (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Treat recoverable errors as fatal
        #[arg(long)]
        strict: bool,

        /// Print the global store after evaluation
        #[arg(long)]
        show_globals: bool,
    },

    /// Print the debug rendering of a program
    Print {
        /// Program file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Info,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Eval {
            input,
            config,
            strict,
            show_globals,
        } => eval(&input, config.as_deref(), strict, show_globals),

        Commands::Print { input } => print(&input),

        Commands::Info => info(),
    }
}

fn read_program(input: &Path) -> Result<Vec<fncalc::Expr>> {
    let source = std::fs::read_to_string(input)
        .map_err(|e| miette::miette!("Failed to read input file: {}", e))?;
    let program = fncalc::parse_program(&source)?;
    tracing::debug!("Loaded {} expressions", program.len());
    Ok(program)
}

fn eval(input: &Path, config: Option<&Path>, strict: bool, show_globals: bool) -> Result<()> {
    tracing::info!("Evaluating {:?}", input);

    let mut config = match config {
        Some(path) => EvalConfig::load(path)?,
        None => EvalConfig::default(),
    };
    config.strict |= strict;

    let program = read_program(input)?;
    let mut env = Environment::new();
    let mut interpreter = Interpreter::with_config(config);

    for expr in &program {
        let (result, recovered) = eval_step(&mut interpreter, expr, &mut env);
        recovered.emit_all();
        println!("{}", result?);
    }

    if show_globals {
        println!("=== Globals ===");
        for (name, value) in env.globals() {
            println!("  {} = {}", name, fncalc::print_value(value));
        }
    }

    Ok(())
}

/// Evaluate one top-level tree, keeping what was recovered even when a
/// fatal error ends the evaluation
fn eval_step(
    interpreter: &mut Interpreter,
    expr: &Expr,
    env: &mut Environment,
) -> (std::result::Result<Value, RuntimeError>, Diagnostics) {
    let result = interpreter.eval(expr, env);
    (result, interpreter.take_diagnostics())
}

fn print(input: &Path) -> Result<()> {
    for expr in read_program(input)? {
        println!("{}", fncalc::print_expr(&expr));
    }
    Ok(())
}

fn info() -> Result<()> {
    println!("fncalc {}", fncalc::VERSION);
    println!();
    println!("Values:     int (i64), float (f64), identifier, function");
    println!("Operators:  + - * / ^ =  (unary + -)");
    println!("Closures:   capture the global store at definition time");
    Ok(())
}
