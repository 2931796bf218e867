// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Repository activity ranking.
//!
//! The spotlight job boils down to one question: which repositories did an
//! account actually touch lately? This module holds the pure half of the
//! answer. Activity is measured as a pair of counts (commits, pull requests)
//! inside a trailing window anchored to the moment of invocation. Ranking
//! sorts by those counts, drops everything idle, and keeps the first N.
//!
//! Everything in here is deterministic and side-effect free. Fetching the
//! counts themselves is the job of an [`ActivitySource`] implementation.
//!
//! [`ActivitySource`]: crate::github::ActivitySource

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// A repository as enumerated from the hosting account.
///
/// Only the full name in `owner/name` form is carried around. Everything
/// else plumage needs (links, display names) derives from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    full_name: String,
}

impl Repository {
    /// Construct new repository handle.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }

    /// Full name in `owner/name` form.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Basename after the last path separator.
    pub fn short_name(&self) -> &str {
        self.full_name
            .rsplit('/')
            .next()
            .unwrap_or(self.full_name.as_str())
    }
}

/// Commit and pull request counts inside an activity window.
///
/// Derived data. Recomputed on every run, never persisted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActivityScore {
    pub commits: u64,
    pub pull_requests: u64,
}

impl ActivityScore {
    /// Construct new activity score.
    pub fn new(commits: u64, pull_requests: u64) -> Self {
        Self {
            commits,
            pull_requests,
        }
    }

    /// Whether the repository showed no activity at all.
    pub fn is_idle(&self) -> bool {
        self.commits == 0 && self.pull_requests == 0
    }
}

/// Trailing time span that bounds "recent" activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityWindow {
    since: DateTime<Utc>,
}

impl ActivityWindow {
    /// Construct window trailing behind the current moment.
    pub fn trailing(days: u32) -> Self {
        Self::trailing_from(Utc::now(), days)
    }

    /// Construct window trailing behind an explicit anchor.
    pub fn trailing_from(anchor: DateTime<Utc>, days: u32) -> Self {
        Self {
            since: anchor - Duration::days(i64::from(days)),
        }
    }

    /// Starting timestamp of the window.
    pub fn since(&self) -> DateTime<Utc> {
        self.since
    }
}

/// Drop repositories listed in the exclusion set.
///
/// Preserves input order. Runs before any scoring so excluded repositories
/// never cost a network call.
pub fn filter_ignored(
    repos: impl IntoIterator<Item = Repository>,
    ignore: &HashSet<String>,
) -> Vec<Repository> {
    repos
        .into_iter()
        .filter(|repo| !ignore.contains(repo.full_name()))
        .collect()
}

/// Select the top repositories by activity.
///
/// Idle entries are dropped first. The rest sort descending by
/// `(commits, pull_requests)`, with ties keeping their original listing
/// order. Returns at most `top` repositories with no padding when fewer
/// qualify.
pub fn rank(
    scored: impl IntoIterator<Item = (Repository, ActivityScore)>,
    top: usize,
) -> Vec<Repository> {
    let mut active: Vec<(Repository, ActivityScore)> = scored
        .into_iter()
        .filter(|(_, score)| !score.is_idle())
        .collect();

    // INVARIANT: Stable sort, so equal scores keep their listing order.
    active.sort_by(|(_, lhs), (_, rhs)| {
        (rhs.commits, rhs.pull_requests).cmp(&(lhs.commits, lhs.pull_requests))
    });

    active
        .into_iter()
        .take(top)
        .map(|(repo, _)| repo)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn scored(entries: &[(&str, u64, u64)]) -> Vec<(Repository, ActivityScore)> {
        entries
            .iter()
            .map(|(name, commits, pulls)| (Repository::new(*name), ActivityScore::new(*commits, *pulls)))
            .collect()
    }

    #[test_case("octocat/plumage", "plumage"; "full name")]
    #[test_case("plumage", "plumage"; "bare name")]
    #[test]
    fn repository_short_name(full_name: &str, expect: &str) {
        assert_eq!(Repository::new(full_name).short_name(), expect);
    }

    #[test]
    fn filter_ignored_preserves_order() {
        let repos = vec![
            Repository::new("octocat/alpha"),
            Repository::new("octocat/beta"),
            Repository::new("octocat/gamma"),
        ];
        let ignore: HashSet<String> = ["octocat/beta".to_string()].into();

        let result = filter_ignored(repos, &ignore);

        let expect = vec![Repository::new("octocat/alpha"), Repository::new("octocat/gamma")];
        assert_eq!(result, expect);
    }

    #[test]
    fn filter_ignored_drops_top_scorer_too() {
        let repos = vec![Repository::new("octocat/beta"), Repository::new("octocat/alpha")];
        let ignore: HashSet<String> = ["octocat/beta".to_string()].into();

        let result = filter_ignored(repos, &ignore);

        assert!(!result.iter().any(|repo| repo.full_name() == "octocat/beta"));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn rank_drops_idle_repositories() {
        let scored = scored(&[
            ("octocat/repo-a", 5, 0),
            ("octocat/repo-b", 0, 0),
            ("octocat/repo-c", 2, 1),
        ]);

        let result = rank(scored, 3);

        let expect = vec![Repository::new("octocat/repo-a"), Repository::new("octocat/repo-c")];
        assert_eq!(result, expect);
    }

    #[test]
    fn rank_breaks_ties_by_listing_order() {
        let scored = scored(&[
            ("octocat/first", 3, 1),
            ("octocat/second", 3, 1),
            ("octocat/third", 3, 2),
        ]);

        let result = rank(scored, 3);

        let expect = vec![
            Repository::new("octocat/third"),
            Repository::new("octocat/first"),
            Repository::new("octocat/second"),
        ];
        assert_eq!(result, expect);
    }

    #[test_case(1; "top one")]
    #[test_case(2; "top two")]
    #[test_case(5; "top beyond qualifying")]
    #[test]
    fn rank_never_exceeds_top(top: usize) {
        let scored = scored(&[
            ("octocat/repo-a", 4, 0),
            ("octocat/repo-b", 2, 2),
            ("octocat/repo-c", 1, 0),
        ]);

        let result = rank(scored, top);

        assert!(result.len() <= top);
        assert_eq!(result.len(), top.min(3));
    }

    #[test]
    fn rank_secondary_order_is_pull_requests() {
        let scored = scored(&[
            ("octocat/quiet", 2, 0),
            ("octocat/chatty", 2, 4),
        ]);

        let result = rank(scored, 2);

        let expect = vec![Repository::new("octocat/chatty"), Repository::new("octocat/quiet")];
        assert_eq!(result, expect);
    }

    #[test]
    fn window_anchors_to_given_moment() {
        let anchor = DateTime::parse_from_rfc3339("2025-06-30T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let window = ActivityWindow::trailing_from(anchor, 30);

        let expect = DateTime::parse_from_rfc3339("2025-05-31T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(window.since(), expect);
    }
}
