// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Profile animation generation.
//!
//! The animation itself comes from an external generator program that
//! plumage treats as a black box: give it an account name and an output
//! path, get an artifact file back. The [`Generate`] trait models that
//! capability so tests can swap the real program out.

use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{info, instrument};

/// Handle on a generated artifact file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub path: PathBuf,
}

/// Layer of indirection for animation generation.
pub trait Generate {
    /// Produce an animation artifact for the account at the output path.
    fn generate(&self, account: &str, output: &Path) -> Result<ArtifactRef>;
}

/// Generator backed by an external program.
///
/// The program is invoked as `program <account> <output>` and is expected
/// to leave an artifact at the output path on success.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: PathBuf,
}

impl CommandGenerator {
    /// Construct new command generator.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Generate for CommandGenerator {
    /// Produce an animation artifact for the account at the output path.
    ///
    /// Creates missing parent directories of the output path before
    /// spawning the program.
    ///
    /// # Errors
    ///
    /// - Return [`AnimateError::Syscall`] if the program cannot be spawned.
    /// - Return [`AnimateError::Generator`] if the program exits non-zero.
    /// - Return [`AnimateError::MissingArtifact`] if no artifact shows up.
    #[instrument(skip(self), level = "debug")]
    fn generate(&self, account: &str, output: &Path) -> Result<ArtifactRef> {
        if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }

        let status = Command::new(&self.program)
            .arg(account)
            .arg(output)
            .status()?;
        if !status.success() {
            return Err(AnimateError::Generator {
                program: self.program.clone(),
                status,
            });
        }

        // INVARIANT: The generator must leave an artifact at the output path.
        if !output.exists() {
            return Err(AnimateError::MissingArtifact {
                path: output.to_path_buf(),
            });
        }

        info!("animation artifact at {}", output.display());
        Ok(ArtifactRef {
            path: output.to_path_buf(),
        })
    }
}

/// Animation generation error types.
#[derive(Debug, thiserror::Error)]
pub enum AnimateError {
    /// Generator program cannot be spawned.
    #[error(transparent)]
    Syscall(#[from] std::io::Error),

    /// Generator program exited with a failure status.
    #[error("generator {program:?} exited with {status}")]
    Generator {
        program: PathBuf,
        status: std::process::ExitStatus,
    },

    /// Generator program produced no artifact.
    #[error("generator produced no artifact at {:?}", path.display())]
    MissingArtifact { path: PathBuf },
}

/// Friendly result alias :3
pub type Result<T, E = AnimateError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[cfg(unix)]
    fn fake_generator(script: &str) -> anyhow::Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = PathBuf::from("./generator.sh");
        std::fs::write(&path, script)?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;

        Ok(path)
    }

    #[cfg(unix)]
    #[sealed_test]
    fn generate_persists_artifact() -> anyhow::Result<()> {
        let program = fake_generator("#!/bin/sh\nprintf svg > \"$2\"\n")?;

        let generator = CommandGenerator::new(program);
        let artifact = generator.generate("octocat", Path::new("dist/animation.svg"))?;

        assert_eq!(artifact.path, PathBuf::from("dist/animation.svg"));
        assert_eq!(std::fs::read_to_string(&artifact.path)?, "svg");

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn generate_reports_failing_program() -> anyhow::Result<()> {
        let program = fake_generator("#!/bin/sh\nexit 3\n")?;

        let generator = CommandGenerator::new(program);
        let result = generator.generate("octocat", Path::new("animation.svg"));

        assert!(matches!(result, Err(AnimateError::Generator { .. })));

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn generate_reports_missing_artifact() -> anyhow::Result<()> {
        let program = fake_generator("#!/bin/sh\nexit 0\n")?;

        let generator = CommandGenerator::new(program);
        let result = generator.generate("octocat", Path::new("animation.svg"));

        assert!(matches!(result, Err(AnimateError::MissingArtifact { .. })));

        Ok(())
    }
}
