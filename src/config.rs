// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout for the configuration file that plumage uses to
//! simplify the process of serialization and deserialization. File I/O is
//! left to the caller to figure out.

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::PathBuf,
    str::FromStr,
};

/// Spotlight configuration layout.
///
/// # General Layout
///
/// A spotlight configuration is composed of two basic parts: settings and
/// replacements. The settings section controls where the README document
/// lives and how ranking behaves. Each replacement table substitutes the
/// display name and link of one repository, keyed by its short name, for
/// when the plain GitHub presentation is not wanted.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct SpotlightConfig {
    /// Settings for the spotlight job.
    #[serde(default)]
    pub settings: SpotlightSettings,

    /// Display name and link substitutions keyed by repository short name.
    #[serde(default, rename = "replace")]
    pub replacements: HashMap<String, Replacement>,
}

impl FromStr for SpotlightConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: SpotlightConfig =
            toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on readme path field.
        let readme = shellexpand::full(config.settings.readme.to_string_lossy().as_ref())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned();
        config.settings.readme = PathBuf::from(readme);

        Ok(config)
    }
}

impl Display for SpotlightConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Spotlight configuration settings.
///
/// Standard settings for the spotlight job. Any field left out of the
/// configuration file falls back to its default.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpotlightSettings {
    /// Path to README document carrying the spotlight line.
    pub readme: PathBuf,

    /// Fixed leading marker that locates the spotlight line.
    pub marker: String,

    /// How many repositories make the spotlight.
    pub top: usize,

    /// Trailing activity window length in days.
    pub window_days: u32,

    /// Full names of repositories to leave out of the ranking.
    pub ignore: Vec<String>,

    /// Bound on concurrent activity queries.
    pub concurrency: usize,
}

impl Default for SpotlightSettings {
    fn default() -> Self {
        Self {
            readme: PathBuf::from("README.md"),
            marker: crate::readme::DEFAULT_MARKER.to_string(),
            top: 3,
            window_days: 30,
            ignore: Vec::new(),
            concurrency: 4,
        }
    }
}

/// Display name and link substitution for one repository.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Replacement {
    /// Display name to show instead of the repository short name.
    pub name: String,

    /// Link to use instead of the default GitHub URL.
    pub link: String,
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test(env = [("PROFILE_DIR", "/home/blah/profile")])]
    fn deserialize_spotlight_config() -> anyhow::Result<()> {
        let result: SpotlightConfig = r#"
            [settings]
            readme = "$PROFILE_DIR/README.md"
            top = 2
            window_days = 14
            ignore = ["octocat/dotfiles"]

            [replace.cool]
            name = "Cool Project"
            link = "https://cool.example"
        "#
        .parse()?;

        let expect = SpotlightConfig {
            settings: SpotlightSettings {
                readme: PathBuf::from("/home/blah/profile/README.md"),
                marker: crate::readme::DEFAULT_MARKER.to_string(),
                top: 2,
                window_days: 14,
                ignore: vec!["octocat/dotfiles".into()],
                concurrency: 4,
            },
            replacements: HashMap::from([(
                "cool".into(),
                Replacement {
                    name: "Cool Project".into(),
                    link: "https://cool.example".into(),
                },
            )]),
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn deserialize_rejects_malformed_replacement() {
        let result = "[replace.cool]\nname = 42\n".parse::<SpotlightConfig>();

        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn serialize_spotlight_config() {
        let result = SpotlightConfig {
            settings: SpotlightSettings {
                readme: PathBuf::from("README.md"),
                marker: "🔭 Recently hacking on:".into(),
                top: 3,
                window_days: 30,
                ignore: vec!["octocat/old-experiment".into()],
                concurrency: 4,
            },
            replacements: HashMap::from([(
                "cool".into(),
                Replacement {
                    name: "Cool Project".into(),
                    link: "https://cool.example".into(),
                },
            )]),
        }
        .to_string();

        let expect = indoc! {r#"
            [settings]
            readme = "README.md"
            marker = "🔭 Recently hacking on:"
            top = 3
            window_days = 30
            ignore = [
                "octocat/old-experiment",
            ]
            concurrency = 4

            [replace.cool]
            name = "Cool Project"
            link = "https://cool.example"
        "#};

        assert_eq!(result, expect);
    }
}
