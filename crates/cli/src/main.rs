//! CLI tool that researches a topic and writes a PowerPoint deck about it.

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Input;
use slidesmith_core::Settings;
use slidesmith_pptx::{PptxReader, PptxRenderer};
use slidesmith_research::Pipeline;
use std::fs::File;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

const TOPIC_PROMPT: &str = "Enter the topic on which the Slides has to be prepared";

/// Search the web for a topic and generate a sourced slide deck.
#[derive(Parser, Debug)]
#[command(name = "slidesmith")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topic of the presentation (prompted for, or read from piped stdin, when omitted)
    topic: Option<String>,

    /// Output directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Language model to use (overrides OPENAI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Read the written deck back and report its slide count
    #[arg(long)]
    verify: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut settings = Settings::from_env().context("Failed to load settings")?;
    if let Some(model) = &args.model {
        settings = settings.with_model(model);
    }

    let topic = match &args.topic {
        Some(topic) => topic.clone(),
        None => prompt_topic()?,
    };

    prepare_output_dir(&args.output)?;

    let pipeline = Pipeline::from_settings(&settings, PptxRenderer::new())?;
    let path = pipeline
        .run(&topic, &args.output)
        .with_context(|| format!("Failed to generate slides for '{}'", topic.trim()))?;

    if args.verify {
        let slides = verify_deck(&path)?;
        println!("{} ({} slides)", path.display(), slides);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Ask for the topic on a terminal, or take the first line of piped input.
fn prompt_topic() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        Input::<String>::new()
            .with_prompt(TOPIC_PROMPT)
            .interact_text()
            .context("Failed to read topic")
    } else {
        read_topic_line(stdin.lock())
    }
}

fn read_topic_line(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read topic from stdin")?;

    let topic = line.trim();
    if topic.is_empty() {
        anyhow::bail!("No topic given on stdin");
    }
    Ok(topic.to_string())
}

/// Create the output directory if it does not exist yet.
fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

/// Read a written deck back and return its slide count.
fn verify_deck(path: &Path) -> Result<usize> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let deck = PptxReader::new()
        .read(file)
        .with_context(|| format!("Failed to read back {}", path.display()))?;

    log::debug!("Verified {} slides in {}", deck.slides.len(), path.display());
    Ok(deck.slides.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["slidesmith"]);

        assert!(args.topic.is_none());
        assert_eq!(args.output, PathBuf::from("."));
        assert!(args.model.is_none());
        assert!(!args.verify);
    }

    #[test]
    fn test_args_full() {
        let args = Args::parse_from([
            "slidesmith",
            "Quantum Computing",
            "-o",
            "decks",
            "-m",
            "gpt-4o",
            "--verify",
            "-v",
        ]);

        assert_eq!(args.topic.as_deref(), Some("Quantum Computing"));
        assert_eq!(args.output, PathBuf::from("decks"));
        assert_eq!(args.model.as_deref(), Some("gpt-4o"));
        assert!(args.verify);
        assert!(args.verbose);
    }

    #[test]
    fn test_verify_rejects_non_pptx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-deck.pptx");
        std::fs::write(&path, b"plain text").unwrap();

        assert!(verify_deck(&path).is_err());
    }

    #[test]
    fn test_prepare_output_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("decks").join("2024");

        prepare_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_piped_topic_first_line() {
        let topic = read_topic_line(io::Cursor::new("  Quantum Computing \nignored\n")).unwrap();
        assert_eq!(topic, "Quantum Computing");
    }

    #[test]
    fn test_piped_topic_empty_input() {
        assert!(read_topic_line(io::Cursor::new("")).is_err());
        assert!(read_topic_line(io::Cursor::new("   \n")).is_err());
    }
}
