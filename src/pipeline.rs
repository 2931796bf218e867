// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! The spotlight pipeline.
//!
//! One run walks a fixed sequence of stages:
//!
//! ```text
//! LIST → FILTER → SCORE → RANK → RESOLVE → RENDER → COMPARE → {NO_OP | PUBLISH}
//! ```
//!
//! Listing enumerates the account's repositories. Filtering drops the
//! ignored ones before anything costs a network call. Scoring counts
//! commits and pull requests per repository inside the activity window,
//! fanning queries out behind a bounded concurrency limit. Ranking waits
//! for the complete score set, drops idle repositories, and keeps the top
//! few. The rest is pure string work capped by an idempotent write into
//! the README document.
//!
//! # Skips Are Not Errors
//!
//! Several stages can discover there is nothing left to do: the account
//! has no repositories, everything got filtered away, nothing saw any
//! activity, or the rendered line already sits in the document. Each of
//! those ends the run cleanly with an [`Outcome`] describing why, and the
//! process exits successfully.
//!
//! # State
//!
//! Every run recomputes from scratch. Nothing carries over between
//! invocations, which is what makes the byte-compare against the document
//! the only idempotence mechanism needed.

use crate::{
    config::Replacement,
    github::{ActivitySource, SourceError},
    rank::{filter_ignored, rank, ActivityScore, ActivityWindow, Repository},
    readme::SpotlightFile,
    spotlight::{render, resolve},
};

use chrono::{DateTime, Utc};
use futures::{stream, StreamExt};
use std::{
    collections::{HashMap, HashSet},
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};
use tracing::{info, instrument, warn};

/// Everything one spotlight run needs, threaded through the stages
/// explicitly.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Account whose repositories get ranked.
    pub account: String,

    /// Trailing window that bounds "recent" activity.
    pub window: ActivityWindow,

    /// How many repositories make the spotlight.
    pub top: usize,

    /// Full names of repositories to leave out.
    pub ignore: HashSet<String>,

    /// Display name and link substitutions keyed by short name.
    pub overrides: HashMap<String, Replacement>,

    /// Fixed leading marker that locates the spotlight line.
    pub marker: String,

    /// Path to README document carrying the spotlight line.
    pub readme: PathBuf,

    /// Bound on concurrent activity queries.
    pub concurrency: usize,
}

/// Terminal state of a spotlight run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Document rewritten. The caller should publish.
    Updated,

    /// Rendered line already in place. Nothing written.
    NoChange,

    /// Run ended early with nothing to do.
    Skipped(SkipReason),
}

impl Display for Outcome {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Updated => write!(fmt, "updated"),
            Self::NoChange => write!(fmt, "no-change"),
            Self::Skipped(reason) => write!(fmt, "skipped ({reason})"),
        }
    }
}

/// Why a run ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Account has no repositories at all.
    EmptyListing,

    /// Every listed repository sits in the exclusion set.
    AllIgnored,

    /// No repository showed any activity inside the window.
    NoActivity,
}

impl Display for SkipReason {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::EmptyListing => write!(fmt, "no repositories"),
            Self::AllIgnored => write!(fmt, "all repositories ignored"),
            Self::NoActivity => write!(fmt, "no recent activity"),
        }
    }
}

/// Run the spotlight pipeline to completion.
///
/// # Errors
///
/// - Return [`PipelineError::Source`] if listing repositories fails.
/// - Return [`PipelineError::Readme`] if the document cannot be read,
///   written, or lacks a unique marker line.
#[instrument(skip(ctx, source), level = "debug")]
pub async fn run(ctx: &RunContext, source: &impl ActivitySource) -> Result<Outcome> {
    info!("list repositories for {}", ctx.account);
    let listing = source.list_repositories(&ctx.account).await?;
    if listing.is_empty() {
        return Ok(Outcome::Skipped(SkipReason::EmptyListing));
    }

    // INVARIANT: Ignored repositories never get scored.
    let candidates = filter_ignored(listing, &ctx.ignore);
    if candidates.is_empty() {
        return Ok(Outcome::Skipped(SkipReason::AllIgnored));
    }

    let scored = score_all(source, candidates, ctx.window, ctx.concurrency).await;
    let ranked = rank(scored, ctx.top);
    if ranked.is_empty() {
        return Ok(Outcome::Skipped(SkipReason::NoActivity));
    }

    let links: Vec<_> = ranked
        .iter()
        .map(|repo| resolve(repo, &ctx.overrides))
        .collect();
    let fragment = render(&links);

    if SpotlightFile::new(&ctx.readme).apply(&ctx.marker, &fragment)? {
        info!("spotlight line updated in {:?}", ctx.readme);
        Ok(Outcome::Updated)
    } else {
        Ok(Outcome::NoChange)
    }
}

/// Score every candidate inside the window.
///
/// Queries fan out behind a bounded limit with no ordering requirement
/// between them, but results come back in listing order so ranking stays
/// stable.
async fn score_all(
    source: &impl ActivitySource,
    repos: Vec<Repository>,
    window: ActivityWindow,
    limit: usize,
) -> Vec<(Repository, ActivityScore)> {
    let since = window.since();
    stream::iter(repos)
        .map(|repo| score_one(source, repo, since))
        .buffered(limit.max(1))
        .collect()
        .await
}

async fn score_one(
    source: &impl ActivitySource,
    repo: Repository,
    since: DateTime<Utc>,
) -> (Repository, ActivityScore) {
    // INVARIANT: A repository that fails to answer counts as idle rather
    // than taking the whole run down.
    let commits = match source.count_commits(&repo, since).await {
        Ok(count) => count,
        Err(error) => {
            warn!("no commit count for {}: {error}", repo.full_name());
            0
        }
    };

    let pull_requests = match source.count_pull_requests(&repo, since).await {
        Ok(count) => count,
        Err(error) => {
            warn!("no pull request count for {}: {error}", repo.full_name());
            0
        }
    };

    (repo, ActivityScore::new(commits, pull_requests))
}

/// Pipeline error types.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Listing repositories fails.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Document lookup or replacement fails.
    #[error(transparent)]
    Readme(#[from] crate::readme::Error),
}

/// Friendly result alias :3
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
