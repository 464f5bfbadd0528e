use std::{
    io::{BufRead as _, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use safecalc::{EvalConfig, EvaluationError, Evaluator};

#[derive(Parser, Debug)]
#[command(name = "safecalc", version)]
struct Cli {
    /// Evaluator config JSON (`max_depth`, `max_input_len`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the maximum nesting depth.
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Override the maximum input length in bytes.
    #[arg(long, global = true)]
    max_len: Option<usize>,

    /// Log to stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one formula and print the result.
    Eval(EvalArgs),
    /// Evaluate formulas read from stdin, one per line.
    Check(CheckArgs),
    /// Print the parsed operation tree as JSON.
    Tree(TreeArgs),
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Formula to evaluate.
    #[arg(allow_hyphen_values = true)]
    formula: String,

    /// Print a JSON object instead of the bare value.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Print one JSON object per line.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct TreeArgs {
    /// Formula to parse.
    #[arg(allow_hyphen_values = true)]
    formula: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let evaluator = make_evaluator(&cli)?;
    match cli.cmd {
        Command::Eval(args) => cmd_eval(&evaluator, args),
        Command::Check(args) => cmd_check(&evaluator, args),
        Command::Tree(args) => cmd_tree(&evaluator, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => return,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn make_evaluator(cli: &Cli) -> anyhow::Result<Evaluator> {
    let mut config = match &cli.config {
        Some(path) => EvalConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => EvalConfig::default(),
    };
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    if let Some(len) = cli.max_len {
        config.max_input_len = Some(len);
    }
    Ok(Evaluator::new(config)?)
}

fn cmd_eval(evaluator: &Evaluator, args: EvalArgs) -> anyhow::Result<()> {
    let formula = evaluator
        .parse(&args.formula)
        .map_err(|e| rejection(&e))?;
    let value = formula.eval().map_err(|e| rejection(&e))?;

    if args.json {
        let out = serde_json::json!({
            "formula": formula.to_string(),
            "result": value,
        });
        println!("{out}");
    } else {
        println!("{value}");
    }
    Ok(())
}

fn cmd_check(evaluator: &Evaluator, args: CheckArgs) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut rejected = 0usize;

    for (idx, line) in stdin.lock().lines().enumerate() {
        let line = line.with_context(|| format!("read stdin line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let lineno = idx + 1;
        let result = evaluator.evaluate(&line);
        if result.is_err() {
            rejected += 1;
        }

        if args.json {
            let obj = match &result {
                Ok(value) => serde_json::json!({ "line": lineno, "result": value }),
                Err(e) => serde_json::json!({
                    "line": lineno,
                    "error": e.code(),
                    "message": e.user_message(),
                    "detail": e.to_string(),
                }),
            };
            writeln!(out, "{obj}").context("write stdout")?;
        } else {
            let written = match &result {
                Ok(value) => writeln!(out, "{lineno}: {value}"),
                Err(e) => writeln!(out, "{lineno}: error: {} ({e})", e.user_message()),
            };
            written.context("write stdout")?;
        }
    }

    if rejected > 0 {
        anyhow::bail!("{rejected} formula(s) rejected");
    }
    Ok(())
}

fn cmd_tree(evaluator: &Evaluator, args: TreeArgs) -> anyhow::Result<()> {
    let formula = evaluator
        .parse(&args.formula)
        .map_err(|e| rejection(&e))?;
    let s = serde_json::to_string_pretty(&formula).context("serialize formula tree")?;
    println!("{s}");
    Ok(())
}

fn rejection(e: &EvaluationError) -> anyhow::Error {
    anyhow::anyhow!("{}: {e}", e.user_message())
}
