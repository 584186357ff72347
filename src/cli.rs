//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{CiIdentity, GERRIT_URL_ENV, GerritConfig, RecheckConfig};
use crate::types::ChangeNumber;
use crate::worker::PollConfig;

#[derive(Debug, Parser)]
#[command(name = "gerrit-recheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Re-trigger CI on Gerrit changes until it approves them", long_about = None)]
pub struct Cli {
    /// Gerrit username
    #[arg(short, long)]
    pub username: String,

    /// Evaluate once and log what would be posted, without posting
    #[arg(long)]
    pub dry_run: bool,

    /// Gerrit base URL
    #[arg(long, env = GERRIT_URL_ENV, default_value = crate::config::DEFAULT_GERRIT_URL)]
    pub gerrit_url: String,

    /// Display name of the CI account whose Verified vote counts
    #[arg(long, default_value = "Zuul")]
    pub ci_name: String,

    /// Read the HTTP password from the first line of this file
    #[arg(long)]
    pub password_file: Option<PathBuf>,

    /// Change numbers to watch
    #[arg(required = true, value_name = "CHANGE")]
    pub changes: Vec<ChangeNumber>,
}

impl Cli {
    pub fn gerrit_config(&self) -> GerritConfig {
        GerritConfig {
            url: self.gerrit_url.clone(),
            ..GerritConfig::default()
        }
    }

    pub fn recheck_config(&self, poll: PollConfig) -> RecheckConfig {
        RecheckConfig {
            ci: CiIdentity::zuul().with_voter_name(&self.ci_name),
            poll,
            ..RecheckConfig::default()
        }
        .with_dry_run(self.dry_run)
    }
}
