use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plainread_common::{Config, SimplifyResponse};
use plainread_scoring::lexical::uncommon_words;
use plainread_scoring::{
    build_embedder, build_rewriter, difficulty_score, semantic_similarity, ReadabilityReport,
    ReferenceVocabulary, Simplifier,
};
use tracing_subscriber::EnvFilter;

/// Paraphrase pairs used to sanity-check an embedding backend.
const PARAPHRASE_PAIRS: &[(&str, &str)] = &[
    ("The cat was sitting on the mat.", "The kitty was resting on the carpet."),
    ("He quickly ran to the store before it closed.", "He hurried to the shop before it shut."),
    ("I'm going to start cooking dinner now.", "I'll begin making dinner now."),
    ("The weather is nice today.", "Today's weather is pleasant."),
    ("She didn't like the movie.", "She wasn't a fan of the film."),
    ("They decided to cancel the meeting.", "The meeting was called off by them."),
    ("I need to finish this project soon.", "This project must be completed quickly."),
    ("He plays the guitar very well.", "He's really good at playing guitar."),
    ("The exam was extremely difficult.", "The test was really hard."),
    ("She enjoys going for long walks.", "She likes taking long strolls."),
];

#[derive(Parser)]
#[command(name = "plainread", about = "Score and gate dyslexia-friendly rewrites")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the difficulty breakdown of a text (offline)
    Score {
        text: String,
        /// Newline-delimited list of common words
        #[arg(long, env = "VOCABULARY_PATH", default_value = "/usr/share/dict/words")]
        vocabulary: PathBuf,
    },
    /// Print the semantic similarity of two texts
    Compare {
        #[arg(required_unless_present = "examples")]
        a: Option<String>,
        #[arg(required_unless_present = "examples")]
        b: Option<String>,
        /// Run the built-in paraphrase pairs instead
        #[arg(long, conflicts_with_all = ["a", "b"])]
        examples: bool,
    },
    /// Rewrite a text and print the verdict as JSON
    Simplify { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("plainread=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Score { text, vocabulary } => score(&text, &vocabulary),
        Command::Compare { a, b, examples } => {
            let pairs: Vec<(String, String)> = match (a, b) {
                (Some(a), Some(b)) if !examples => vec![(a, b)],
                _ => PARAPHRASE_PAIRS
                    .iter()
                    .map(|(a, b)| (a.to_string(), b.to_string()))
                    .collect(),
            };
            compare(&pairs).await
        }
        Command::Simplify { text } => simplify(&text).await,
    }
}

fn score(text: &str, vocabulary: &Path) -> Result<()> {
    let vocabulary = ReferenceVocabulary::load(vocabulary)?;
    let score = difficulty_score(&vocabulary, text);
    let report = ReadabilityReport::analyze(text);

    println!("difficulty:  {:.2}", score.value);
    println!("lexical:     {:.3}", score.lexical);
    println!("grade:       {:.1}", score.grade);
    println!("syntax:      {:.3}", score.syntax);
    println!(
        "counts:      {} words, {} sentences, {} syllables",
        report.words, report.sentences, report.syllables
    );

    let uncommon = uncommon_words(&vocabulary, text);
    if !uncommon.is_empty() {
        println!("uncommon:    {}", uncommon.join(", "));
    }
    Ok(())
}

async fn compare(pairs: &[(String, String)]) -> Result<()> {
    let config = Config::from_env()?;
    let embedder = build_embedder(&config)?;

    for (i, (a, b)) in pairs.iter().enumerate() {
        let similarity = semantic_similarity(embedder.as_ref(), a, b)
            .await
            .with_context(|| format!("Comparing pair {}", i + 1))?;
        if pairs.len() == 1 {
            println!("{similarity:.3}");
        } else {
            println!("{}. \"{a}\" <> \"{b}\"\n   similarity: {similarity:.3}\n", i + 1);
        }
    }
    Ok(())
}

async fn simplify(text: &str) -> Result<()> {
    let config = Config::from_env()?;
    let policy = config.threshold_policy();
    let vocabulary = Arc::new(ReferenceVocabulary::load(&config.vocabulary_path)?);

    let simplifier = Simplifier::builder()
        .vocabulary(vocabulary)
        .embedder(build_embedder(&config)?)
        .rewriter(build_rewriter(&config)?)
        .policy(policy)
        .build();

    let verdict = simplifier.simplify(text).await?;
    let response = SimplifyResponse::from(verdict);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
