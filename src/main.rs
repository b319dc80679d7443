//! Summarize a text file, extract its keyphrases, and generate
//! multiple-choice questions from it using hosted inference models.
//!
//! Usage:
//!   hf-text-processor notes.txt --keywords 5 --questions 3
//!   hf-text-processor            # asks for everything interactively

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use hf_text_processor::clients::HfInferenceClient;
use hf_text_processor::config::{Config, RuntimeConfig, load_env_file};
use hf_text_processor::interactive::{prompt_in_range, prompt_line};
use hf_text_processor::keyphrase::MAX_KEYWORDS_LIMIT;
use hf_text_processor::processor::{TextProcessor, load_text};
use hf_text_processor::prompts::QUESTION_RANGE;
use tracing::info;

#[derive(Parser)]
#[command(name = "hf-text-processor")]
#[command(about = "Summarize, extract keyphrases, and generate quiz questions from a text file", long_about = None)]
struct Cli {
    /// Text file to process; asked for when omitted
    file: Option<String>,

    /// Number of keyphrases to extract (1-10)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
    keywords: Option<u8>,

    /// Number of multiple-choice questions to generate (1-5)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
    questions: Option<u8>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Subscriber first so warnings raised while loading the config are shown
    load_env_file();
    tracing_subscriber::fmt()
        .with_env_filter(RuntimeConfig::load_from_env().log_level.as_str())
        .with_writer(io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref()).map_err(|e| {
        eprintln!("Failed to load configuration: {:#}", e);
        e
    })?;

    let token = config.require_token()?;
    let client = HfInferenceClient::new(&config.inference, token)?;
    let processor = TextProcessor::new(client, &config);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    println!("=== AI Text Processor ===");
    let file = match cli.file {
        Some(file) => file,
        None => prompt_line(
            &mut input,
            &mut output,
            "Enter the name of the text file (e.g., input.txt): ",
        )?,
    };
    let text = load_text(&file).with_context(|| format!("Could not load {}", file))?;
    info!("Loaded {} ({} chars)", file, text.chars().count());

    let summary = processor.summarize(&text).await;
    println!("\nSummary:\n{}\n", summary);

    let num_keywords = match cli.keywords {
        Some(n) => n,
        None => prompt_in_range(
            &mut input,
            &mut output,
            &format!("How many keywords do you want to extract? (1-{}): ", MAX_KEYWORDS_LIMIT),
            1..=MAX_KEYWORDS_LIMIT as u8,
        )?,
    };
    let keywords = processor
        .extract_keywords(&text, usize::from(num_keywords))
        .await;
    println!("\nKeywords:\n{}\n", keywords);

    let num_questions = match cli.questions {
        Some(n) => n,
        None => prompt_in_range(
            &mut input,
            &mut output,
            &format!(
                "How many questions do you want to generate? ({}-{}): ",
                QUESTION_RANGE.start(),
                QUESTION_RANGE.end()
            ),
            QUESTION_RANGE,
        )?,
    };
    let generated = processor.generate_questions(&text, num_questions).await;
    println!("\nGeneration:\n{}", generated);

    Ok(())
}
