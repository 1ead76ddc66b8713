// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`    — trains a classifier on featurized examples
//   2. `evaluate` — scores a saved model on a test file
//   3. `rank`     — ranks the labels for one featurized example
//
// Only this layer prints to stdout.

pub mod commands;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, EvaluateArgs, RankArgs, TrainArgs};

/// The main CLI struct
#[derive(Parser, Debug)]
#[command(
    name = "question-classifier",
    version,
    about = "Train a Passive-Aggressive question classifier, then score and rank with it."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Rank(args)     => run_rank(args),
        }
    }
}

/// Handles the `train` subcommand.
fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on examples in: {}", args.train);

    let outcome = TrainUseCase::new(args.into()).execute()?;

    println!("Training complete after {} epochs.", outcome.report.epochs);
    println!("  final train loss:    {:.4}", outcome.report.final_loss);
    if let Some(acc) = outcome.report.val_accuracy {
        println!("  validation accuracy: {:.2}%", acc * 100.0);
    }
    if let Some(acc) = outcome.test_accuracy {
        println!("  test accuracy:       {:.2}%", acc * 100.0);
    }
    println!("Model saved to {}", outcome.model_path.display());
    Ok(())
}

/// Handles the `evaluate` subcommand.
fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let outcome = EvaluateUseCase::new(args.model, args.test, args.coarse, args.lenient).execute()?;

    println!("Accuracy: {:.2}% over {} examples", outcome.accuracy * 100.0, outcome.examples);
    if !outcome.unseen_labels.is_empty() {
        println!("Labels unknown to the model: {}", outcome.unseen_labels.join(", "));
    }
    Ok(())
}

/// Handles the `rank` subcommand.
fn run_rank(args: RankArgs) -> Result<()> {
    use crate::application::rank_use_case::RankUseCase;
    use crate::data::loader::parse_features;

    let features = parse_features(&args.features).context("Invalid --features")?;
    let ranker   = RankUseCase::new(Path::new(&args.model))?;

    for (pos, scored) in ranker.rank(&features, args.top).iter().enumerate() {
        println!("{:>3}. {:<20} {:>10.4}", pos + 1, scored.label, scored.score);
    }
    Ok(())
}
