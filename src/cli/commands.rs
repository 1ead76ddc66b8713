// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `evaluate` and `rank`,
// and all their configurable flags.
//
// clap's derive macros generate --help text, error messages for
// missing args and type conversion (string → f64, usize, ...).

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::data::splitter::DEFAULT_SPLIT_SEED;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a Passive-Aggressive classifier on featurized examples
    Train(TrainArgs),

    /// Measure a saved model's accuracy on a test file
    Evaluate(EvaluateArgs),

    /// Rank the labels for one featurized example
    Rank(RankArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// JSON Lines file, or directory of them, with the training pool
    #[arg(long)]
    pub train: String,

    /// Official test set, scored once after training
    #[arg(long)]
    pub test: Option<String>,

    /// Directory for checkpoints, metrics and the final model
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Aggressiveness bound C of the PA-I update.
    /// Smaller is slower but steadier
    #[arg(long = "c", default_value_t = 0.1)]
    pub aggressiveness: f64,

    /// Number of passes over the training split
    #[arg(long, default_value_t = 1000)]
    pub epochs: usize,

    /// Share of the pool used for training; the rest validates
    #[arg(long, default_value_t = 0.9)]
    pub split: f64,

    /// Seed of the train/validation shuffle
    #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
    pub seed: u64,

    /// Count a second-ranked gold label as correct when evaluating
    #[arg(long)]
    pub lenient: bool,

    /// Train on coarse labels ("LOC:city" → "LOC")
    #[arg(long)]
    pub coarse: bool,

    /// Measure validation accuracy every N epochs
    #[arg(long, default_value_t = 10)]
    pub eval_every: usize,

    /// Write a model checkpoint every N epochs
    #[arg(long, default_value_t = 10)]
    pub checkpoint_every: usize,

    /// Continue from the newest checkpoint in --checkpoint-dir
    #[arg(long)]
    pub resume: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_path:           a.train,
            test_path:            a.test,
            checkpoint_dir:       a.checkpoint_dir,
            aggressiveness:       a.aggressiveness,
            epochs:               a.epochs,
            split_fraction:       a.split,
            seed:                 a.seed,
            lenient_second_guess: a.lenient,
            coarse_labels:        a.coarse,
            eval_every:           a.eval_every,
            checkpoint_every:     a.checkpoint_every,
            resume:               a.resume,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Saved model artifact
    #[arg(long, default_value = "checkpoints/model.json")]
    pub model: String,

    /// JSON Lines file, or directory of them, with the test examples
    #[arg(long)]
    pub test: String,

    /// Compare only the coarse category of predicted and gold labels
    #[arg(long)]
    pub coarse: bool,

    /// Override the model's lenient-second-guess setting
    #[arg(long)]
    pub lenient: Option<bool>,
}

/// All arguments for the `rank` command
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Saved model artifact
    #[arg(long, default_value = "checkpoints/model.json")]
    pub model: String,

    /// Features as a JSON object, e.g. '{"wh_who": 1.0}'
    #[arg(long)]
    pub features: String,

    /// How many labels to print (0 = all)
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}
