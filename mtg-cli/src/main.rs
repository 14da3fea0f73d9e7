use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use mtg_core::io::read_corpus;
use mtg_core::{finish_sentence_with, Selection};

/// Completes a sentence from a whitespace-tokenized corpus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the corpus file.
    #[arg(long)]
    corpus: PathBuf,

    /// Order of the n-gram model (must be >= 1).
    #[arg(short = 'n', long = "order", default_value_t = 3)]
    order: usize,

    /// Sample the next token proportionally to its score.
    #[arg(long, default_value = "false")]
    randomize: bool,

    /// Seed for reproducible sampling (implies --randomize).
    #[arg(long)]
    seed: Option<u64>,

    /// Number of completions to print.
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Sentence tokens to complete.
    #[arg(trailing_var_arg = true)]
    sentence: Vec<String>,
}

impl Args {
    /// Strategy for the `completion`-th output.
    ///
    /// The seed is offset per completion so repeated completions differ but
    /// stay reproducible.
    fn selection(&self, completion: usize) -> Selection {
        if self.randomize || self.seed.is_some() {
            Selection::Stochastic {
                seed: self.seed.map(|seed| seed.wrapping_add(completion as u64)),
            }
        } else {
            Selection::Deterministic
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Load the corpus once, each completion builds its own model
    let corpus = read_corpus(&args.corpus)
        .with_context(|| format!("failed to read corpus {}", args.corpus.display()))?;
    info!("Loaded {} tokens from {}", corpus.len(), args.corpus.display());

    for i in 0..args.count {
        let selection = args.selection(i);
        let completed = finish_sentence_with(&args.sentence, args.order, &corpus, &selection)?;
        println!("{}", completed.join(" "));
    }

    Ok(())
}
