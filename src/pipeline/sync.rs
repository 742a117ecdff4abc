// file: src/pipeline/sync.rs
// description: one synchronization pass from the source lister into the mirror service
// reference: sequential list-map-submit workflow

use crate::config::Config;
use crate::error::{Result, SetupStage, SyncError};
use crate::mirror::GiteaClient;
use crate::models::{AccountIdentity, CloneAuth, MirrorRequest, Outcome, RepositoryDescriptor};
use crate::pipeline::report::SyncReport;
use crate::source::GitHubClient;
use futures::TryStreamExt;
use std::pin::pin;
use std::time::Instant;
use tracing::{error, info, warn};

pub struct MirrorSync {
    source: GitHubClient,
    mirror: GiteaClient,
    clone_auth: CloneAuth,
    dry_run: bool,
}

impl MirrorSync {
    pub fn new(source: GitHubClient, mirror: GiteaClient, clone_auth: CloneAuth) -> Self {
        Self {
            source,
            mirror,
            clone_auth,
            dry_run: false,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let source = GitHubClient::new(&config.source, config.http_timeout)?;
        let mirror = GiteaClient::new(&config.mirror, config.http_timeout)?;

        Ok(Self::new(source, mirror, config.source.clone_auth()).with_dry_run(config.dry_run))
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs one pass: resolve the mirror account, then submit every
    /// non-fork source repository exactly once, in listing order.
    ///
    /// Only setup failures abort the pass; per-repository failures are
    /// recorded in the report.
    pub async fn run(&self) -> Result<SyncReport> {
        info!("Starting repository mirroring...");
        let start = Instant::now();

        let report = self.run_inner().await.inspect_err(|e| {
            error!("Aborting mirror pass: {}", e);
        })?;

        let report = SyncReport {
            duration: start.elapsed(),
            ..report
        };
        info!("Repository mirroring completed.");
        report.log_summary();
        Ok(report)
    }

    async fn run_inner(&self) -> Result<SyncReport> {
        let owner = self
            .mirror
            .current_user()
            .await
            .map_err(|e| SyncError::setup(SetupStage::ResolvingMirrorAccount, e))?;

        if self.dry_run {
            warn!("Dry run enabled, no mirrors will be created");
        }

        let mut report = SyncReport::new();
        let mut repos = pin!(self.source.mirrorable_repositories());

        while let Some(repo) = repos
            .try_next()
            .await
            .map_err(|e| SyncError::setup(SetupStage::ListingSource, e))?
        {
            let outcome = self.submit(&repo, owner).await;
            report.record(&repo.full_name, outcome);
        }

        Ok(report)
    }

    async fn submit(&self, repo: &RepositoryDescriptor, owner: AccountIdentity) -> Outcome {
        let request = MirrorRequest::from_repository(repo, owner, &self.clone_auth);

        let outcome = if self.dry_run {
            Outcome::Skipped
        } else {
            self.mirror.create_mirror(&request).await
        };

        let message = outcome.describe(&repo.full_name);
        if outcome.is_failure() {
            error!("{}", message);
        } else {
            info!("{}", message);
        }

        outcome
    }
}
