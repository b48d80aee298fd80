// Faceoff - pairwise character voting core
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod ingest;
pub mod leaderboard;
pub mod matchup;
pub mod moderation;
pub mod stats;
pub mod voting;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::Config;
pub use db::{open_database, setup_database};
pub use entities::{Bloodline, Character, Gender, NewCharacter, Race};
pub use error::{Error, ErrorKind, Result, ValidationError};
pub use ingest::{
    add_character, get_character, import_characters, read_csv, search_by_name, total_characters,
    ImportSummary,
};
pub use leaderboard::{bottom_ranked, top_ranked, Filters};
pub use matchup::{select_matchup, Matchup};
pub use moderation::{report_character, ReportOutcome, REPORT_THRESHOLD};
pub use stats::{compute_stats, Leader, Stats};
pub use voting::{apply_vote, VoteOutcome};

#[cfg(feature = "server")]
pub use api::{create_router, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the `RUST_LOG`-driven subscriber, falling back to `default_directive`
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
