// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `prepare` and `audit`
// and all their configurable flags.

use clap::{Args, Subcommand};

use crate::application::audit_use_case::AuditConfig;
use crate::application::prepare_use_case::PrepareConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build training/evaluation batches from a record file and
    /// report shapes and target coverage
    Prepare(PrepareArgs),

    /// Check target keyword coverage against the vocabularies
    /// without building any batches
    Audit(AuditArgs),
}

/// All arguments for the `prepare` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// JSON record file (array of phrase-pair records)
    #[arg(long, default_value = "data/filtered/train.json")]
    pub records: String,

    /// Directory holding <code>.vocab and <code>.npy per language
    #[arg(long, default_value = "models/index")]
    pub index_dir: String,

    /// Pinned tokenizer model (tokenizer.json)
    #[arg(long, default_value = "models/tokenizer.json")]
    pub tokenizer: String,

    /// Directory for the coverage CSV
    #[arg(long, default_value = "reports")]
    pub report_dir: String,

    /// Fixed sequence length L for every tokenized feature
    #[arg(long, default_value_t = 128)]
    pub max_seq_len: usize,

    /// Number of items stacked into one batch
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Produce evaluation batches carrying retrieval config
    #[arg(long)]
    pub eval: bool,

    /// Nearest neighbors to retrieve downstream (eval mode)
    #[arg(long, default_value_t = 10)]
    pub k: usize,

    /// Shuffle seed; omit to keep record order
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Convert CLI PrepareArgs into the application-layer config.
/// The application layer never sees clap types.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            records_path:   a.records,
            index_dir:      a.index_dir,
            tokenizer_path: a.tokenizer,
            report_dir:     a.report_dir,
            max_seq_length: a.max_seq_len,
            batch_size:     a.batch_size,
            eval_k:         a.eval.then_some(a.k),
            shuffle_seed:   a.seed,
        }
    }
}

/// All arguments for the `audit` command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// JSON record file to audit
    #[arg(long, default_value = "data/filtered/train.json")]
    pub records: String,

    /// Directory holding <code>.vocab files per language
    #[arg(long, default_value = "models/index")]
    pub index_dir: String,
}

impl From<AuditArgs> for AuditConfig {
    fn from(a: AuditArgs) -> Self {
        AuditConfig {
            records_path: a.records,
            index_dir:    a.index_dir,
        }
    }
}
