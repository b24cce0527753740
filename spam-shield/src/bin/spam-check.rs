//! Command-line spam check
//!
//! # Usage
//!
//! ```bash
//! # Classify text given as an argument
//! spam-check classify "WIN FREE MONEY NOW!!! Click http://scam.biz"
//!
//! # Classify a saved message, JSON output
//! spam-check classify --file message.txt --json
//!
//! # Classify from stdin
//! cat message.txt | spam-check classify
//!
//! # Show what the normalizer produces
//! spam-check normalize "Hi, see you at 3pm tomorrow for lunch."
//!
//! # Describe the loaded artifacts
//! spam-check --model-dir ./Model inspect
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use spam_shield::logging::init_tracing;
use spam_shield::{ModelCache, Normalizer, SpamClassifier, SpamError, SpamShieldConfig};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "spam-check")]
#[command(about = "Classify email text as spam or ham", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the model artifacts (overrides the config)
    #[arg(short, long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a message
    Classify {
        /// Message text (stdin if neither this nor --file is given)
        text: Option<String>,
        /// Read the message from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the normalized form of a message
    Normalize {
        /// Message text (stdin if neither this nor --file is given)
        text: Option<String>,
        /// Read the message from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Describe the model artifacts
    Inspect,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            match e.downcast_ref::<SpamError>() {
                Some(SpamError::EmptyInput) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = SpamShieldConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.model_dir {
        config.model.artifact_dir = dir;
    }

    init_tracing(&config.logging)?;

    let normalizer = Normalizer::new(config.normalizer_config()?);
    let classifier = SpamClassifier::new(normalizer, ModelCache::new(config.artifact_paths()));

    match cli.command {
        Commands::Classify { text, file, json } => {
            let text = read_input(text, file)?;
            let result = classifier.classify(&text)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let verdict = if result.label.is_spam() {
                    "✗ Spam"
                } else {
                    "✓ Ham"
                };
                println!("{} (spam probability {:.2}%)", verdict, result.confidence_percent);
            }
        }
        Commands::Normalize { text, file } => {
            let text = read_input(text, file)?;
            println!("{}", classifier.normalizer().normalize(&text));
        }
        Commands::Inspect => {
            let model = classifier.model()?;
            let summary = model.summary();
            let paths = classifier.artifact_paths();

            println!("{:<18} {}", "Vectorizer", paths.vectorizer.display());
            println!("{:<18} {}", "Classifier", paths.classifier.display());
            println!("{:-<60}", "");
            println!("{:<18} {:?}", "Vectorizer kind", summary.vectorizer_kind);
            println!("{:<18} {}", "Vocabulary size", summary.vocabulary_size);
            println!("{:<18} {}", "Classifier kind", summary.classifier_kind);
            println!("{:<18} {}", "Features", summary.n_features);
            println!("{:<18} {}", "Stemmer", classifier.normalizer().stem_algorithm());
            println!("{:<18} {}", "Stopwords", classifier.normalizer().stopword_count());
        }
    }

    Ok(())
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}
