// Spellwright CLI entry point.
//
// Turns a whisper given on the command line (or one whisper per stdin line
// with `--batch`) into a spell and prints it as text or JSON.
//
// Usage:
//   spellwright protect my home from harm
//   spellwright --json --explain "open the old road"
//   printf 'guard the gate\nheal my heart\n' | spellwright --batch
//   spellwright --config spellwright.json --corpus data/spell_corpus.json ...
//
// Logs go to stderr through `tracing-subscriber`; `RUST_LOG` overrides
// `--log-level`. A corpus that fails validation aborts before any whisper is
// processed.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spellwright_core::{
    Execution, IntentScores, RenderFormat, Spell, SpellError, SpellPipeline, SpellwrightConfig,
    Whisper, WhisperError,
};
use spellwright_lexicon::{Corpus, default_corpus};

/// Spellwright: turn a whisper into a spell
#[derive(Parser)]
#[command(name = "spellwright")]
#[command(about = "Turn a short whisper into a deterministic glyph, ritual and verse", long_about = None)]
#[command(version)]
struct Cli {
    /// Whisper text; words are joined with single spaces
    words: Vec<String>,

    /// Read one whisper per line from stdin
    #[arg(long, conflicts_with = "words")]
    batch: bool,

    /// Print spells as JSON
    #[arg(long)]
    json: bool,

    /// Print per-intent keyword scores before the spell
    #[arg(long)]
    explain: bool,

    /// Configuration file (JSON)
    #[arg(short, long, env = "SPELLWRIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Corpus file to use instead of the embedded default
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Run the glyph, ritual and verse generators one after another
    #[arg(long)]
    sequential: bool,

    /// Log level
    #[arg(long, env = "SPELLWRIGHT_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Spell(#[from] SpellError),
    #[error("invalid whisper: {0}")]
    Whisper(#[from] WhisperError),
    #[error("no whisper given (pass words or use --batch)")]
    NoWhisper,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{failed} of {total} whispers failed")]
    BatchFailures { failed: usize, total: usize },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("spellwright: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => SpellwrightConfig::load(path)?,
        None => SpellwrightConfig::default(),
    };
    if cli.sequential {
        config.execution = Execution::Sequential;
    }
    if cli.json {
        config.render = RenderFormat::Json;
    }
    if let Some(path) = &cli.corpus {
        config.corpus_path = Some(path.clone());
    }

    let corpus = match &config.corpus_path {
        Some(path) => Corpus::load(path),
        None => default_corpus(),
    }
    .map_err(SpellError::from)?;
    let pipeline = SpellPipeline::new(Arc::new(corpus), config.execution);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.batch {
        run_batch(&pipeline, config.render, cli.explain, io::stdin().lock(), &mut out)
    } else {
        if cli.words.is_empty() {
            return Err(CliError::NoWhisper);
        }
        let whisper = Whisper::new(&cli.words.join(" "))?;
        let scores = cli.explain.then(|| pipeline.explain(&whisper));
        let spell = pipeline.generate_spell(&whisper)?;
        render(&mut out, config.render, scores.as_ref(), &spell)
    }
}

fn run_batch(
    pipeline: &SpellPipeline,
    format: RenderFormat,
    explain: bool,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut whispers = Vec::new();
    let mut failed = 0;
    for (n, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match Whisper::new(&line) {
            Ok(w) => whispers.push(w),
            Err(err) => {
                tracing::warn!(line = n + 1, %err, "skipping whisper");
                failed += 1;
            }
        }
    }

    let total = whispers.len() + failed;
    let results = pipeline.generate_batch(&whispers);
    failed += write_batch(pipeline, format, explain, &whispers, results, out)?;

    if failed > 0 {
        return Err(CliError::BatchFailures { failed, total });
    }
    Ok(())
}

/// Render the spells of a batch in input order, reporting failures on
/// stderr. Text output puts one blank line between printed spells. Returns
/// the number of failed whispers.
fn write_batch(
    pipeline: &SpellPipeline,
    format: RenderFormat,
    explain: bool,
    whispers: &[Whisper],
    results: Vec<Result<Spell, SpellError>>,
    out: &mut impl Write,
) -> Result<usize, CliError> {
    let mut printed = 0;
    let mut failed = 0;
    for (whisper, result) in whispers.iter().zip(results) {
        match result {
            Ok(spell) => {
                if printed > 0 && format == RenderFormat::Text {
                    writeln!(out)?;
                }
                let scores = explain.then(|| pipeline.explain(whisper));
                render(out, format, scores.as_ref(), &spell)?;
                printed += 1;
            }
            Err(err) => {
                eprintln!("spellwright: \"{whisper}\": {err}");
                failed += 1;
            }
        }
    }
    Ok(failed)
}

fn render(
    out: &mut impl Write,
    format: RenderFormat,
    scores: Option<&IntentScores>,
    spell: &Spell,
) -> Result<(), CliError> {
    match format {
        RenderFormat::Text => {
            if let Some(scores) = scores {
                let winner = scores.winner();
                for (intent, score) in scores.iter() {
                    let mark = if intent == winner { "*" } else { " " };
                    writeln!(out, "{mark} {:<15} {score}", intent.label())?;
                }
                writeln!(out)?;
            }
            write!(out, "{spell}")?;
        }
        RenderFormat::Json => {
            let value = match scores {
                Some(scores) => serde_json::json!({ "scores": scores, "spell": spell }),
                None => serde_json::to_value(spell)?,
            };
            serde_json::to_writer(&mut *out, &value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
