// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Spotlight line rendering.
//!
//! Turn a ranked listing of repositories into the single line of markup
//! that gets planted in the profile README. Rendering is a pure function
//! of its inputs, so the same ranking and the same replacements always
//! produce byte-identical output. The publisher depends on that to decide
//! whether anything actually changed.

use crate::{config::Replacement, rank::Repository};

use std::collections::HashMap;

/// Fixed trailing pointer back to the automation itself.
pub const POINTER: &str =
    r#" <sub><a href="https://github.com/awkless/plumage" target="_blank">(automated)</a></sub>"#;

/// Display name and link for one spotlighted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub label: String,
    pub href: String,
}

/// Resolve a repository to its display name and link.
///
/// A replacement keyed by the repository's short name wins. Otherwise the
/// short name itself and the default GitHub URL for the full name are used.
pub fn resolve(repo: &Repository, overrides: &HashMap<String, Replacement>) -> ResolvedLink {
    match overrides.get(repo.short_name()) {
        Some(replacement) => ResolvedLink {
            label: replacement.name.clone(),
            href: replacement.link.clone(),
        },
        None => ResolvedLink {
            label: repo.short_name().to_string(),
            href: format!("https://github.com/{}", repo.full_name()),
        },
    }
}

/// Render resolved links into the spotlight fragment.
///
/// Each link becomes a bold anchor. Links join with `", "` in ranking
/// order, followed by the fixed pointer.
pub fn render(links: &[ResolvedLink]) -> String {
    let anchors: Vec<String> = links
        .iter()
        .map(|link| {
            format!(
                r#"<a href="{}" target="_blank"><b>{}</b></a>"#,
                link.href, link.label
            )
        })
        .collect();

    format!("{}{POINTER}", anchors.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn overrides() -> HashMap<String, Replacement> {
        HashMap::from([(
            "repo-a".to_string(),
            Replacement {
                name: "Cool Project".into(),
                link: "https://cool.example".into(),
            },
        )])
    }

    #[test]
    fn resolve_prefers_replacement() {
        let repo = Repository::new("octocat/repo-a");

        let result = resolve(&repo, &overrides());

        let expect = ResolvedLink {
            label: "Cool Project".into(),
            href: "https://cool.example".into(),
        };
        assert_eq!(result, expect);
    }

    #[test]
    fn resolve_falls_back_to_github_url() {
        let repo = Repository::new("octocat/repo-b");

        let result = resolve(&repo, &overrides());

        let expect = ResolvedLink {
            label: "repo-b".into(),
            href: "https://github.com/octocat/repo-b".into(),
        };
        assert_eq!(result, expect);
    }

    #[test]
    fn render_replaced_repository_hides_raw_url() {
        let repo = Repository::new("octocat/repo-a");
        let links = vec![resolve(&repo, &overrides())];

        let result = render(&links);

        assert!(result.contains(r#"<a href="https://cool.example" target="_blank"><b>Cool Project</b></a>"#));
        assert!(!result.contains("https://github.com/octocat/repo-a"));
    }

    #[test]
    fn render_joins_in_ranking_order() {
        let links = vec![
            ResolvedLink {
                label: "alpha".into(),
                href: "https://github.com/octocat/alpha".into(),
            },
            ResolvedLink {
                label: "beta".into(),
                href: "https://github.com/octocat/beta".into(),
            },
        ];

        let result = render(&links);

        let expect = format!(
            r#"<a href="https://github.com/octocat/alpha" target="_blank"><b>alpha</b></a>, <a href="https://github.com/octocat/beta" target="_blank"><b>beta</b></a>{POINTER}"#
        );
        assert_eq!(result, expect);
    }

    #[test]
    fn render_is_deterministic() {
        let links = vec![ResolvedLink {
            label: "alpha".into(),
            href: "https://github.com/octocat/alpha".into(),
        }];

        assert_eq!(render(&links), render(&links));
    }
}
