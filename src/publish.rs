// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Hand changed files to Git.
//!
//! Plumage never owns the repository it writes into. Once a job decides
//! that content changed, staging, committing, and pushing belong to Git
//! itself, reached through non-interactive system calls. The [`Publish`]
//! trait keeps that hand-off mockable for callers that only care about the
//! changed/unchanged signal.

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{info, instrument};

/// Layer of indirection for the commit-and-push hand-off.
pub trait Publish {
    /// Stage the given paths, commit them, and push the result.
    fn publish(
        &self,
        paths: impl IntoIterator<Item = impl AsRef<Path>>,
        message: &str,
    ) -> Result<()>;
}

/// Publisher backed by the Git binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    /// Construct new Git publisher rooted at the given repository.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Stage the given paths and commit them.
    ///
    /// # Errors
    ///
    /// - Return [`PublishError::Syscall`] if any Git call fails.
    #[instrument(skip(self, paths), level = "debug")]
    pub fn stage_and_commit(
        &self,
        paths: impl IntoIterator<Item = impl AsRef<Path>>,
        message: &str,
    ) -> Result<()> {
        let mut args = self.base_args();
        args.extend(["add".into(), "--".into()]);
        args.extend(
            paths
                .into_iter()
                .map(|path| path.as_ref().as_os_str().to_os_string()),
        );
        syscall_non_interactive("git", args)?;

        let mut args = self.base_args();
        args.extend(["commit".into(), "-m".into(), message.into()]);
        let output = syscall_non_interactive("git", args)?;
        info!("{output}");

        Ok(())
    }

    /// Push the current branch to its upstream.
    ///
    /// # Errors
    ///
    /// - Return [`PublishError::Syscall`] if the Git call fails.
    pub fn push(&self) -> Result<()> {
        let mut args = self.base_args();
        args.push("push".into());
        let output = syscall_non_interactive("git", args)?;
        info!("{output}");

        Ok(())
    }

    fn base_args(&self) -> Vec<OsString> {
        vec!["-C".into(), self.repo_dir.clone().into_os_string()]
    }
}

impl Publish for GitCli {
    fn publish(
        &self,
        paths: impl IntoIterator<Item = impl AsRef<Path>>,
        message: &str,
    ) -> Result<()> {
        self.stage_and_commit(paths, message)?;
        self.push()
    }
}

fn syscall_non_interactive(
    cmd: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
) -> Result<String> {
    let output = Command::new(cmd.as_ref()).args(args).output()?;
    let stdout = String::from_utf8_lossy(output.stdout.as_slice()).into_owned();
    let stderr = String::from_utf8_lossy(output.stderr.as_slice()).into_owned();
    let mut message = String::new();

    if !stdout.is_empty() {
        message.push_str(format!("stdout: {stdout}").as_str());
    }

    if !stderr.is_empty() {
        message.push_str(format!("stderr: {stderr}").as_str());
    }

    // INVARIANT: Chomp trailing newlines.
    let message = message
        .strip_suffix("\r\n")
        .or(message.strip_suffix('\n'))
        .map(ToString::to_string)
        .unwrap_or(message);

    if !output.status.success() {
        return Err(PublishError::Syscall(std::io::Error::other(format!(
            "command {:?} failed:\n{message}",
            cmd.as_ref()
        ))));
    }

    Ok(message)
}

/// Publisher error types.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// System call to Git fails.
    #[error(transparent)]
    Syscall(#[from] std::io::Error),
}

/// Friendly result alias :3
type Result<T, E = PublishError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use sealed_test::prelude::*;

    fn init_repo() -> Result<()> {
        syscall_non_interactive("git", ["init", "."])?;
        syscall_non_interactive("git", ["config", "user.name", "John Doe"])?;
        syscall_non_interactive("git", ["config", "user.email", "john@doe.com"])?;

        Ok(())
    }

    #[sealed_test]
    fn stage_and_commit_records_change() -> anyhow::Result<()> {
        init_repo()?;
        std::fs::write("README.md", "# Hello there!\n")?;

        let publisher = GitCli::new(".");
        publisher.stage_and_commit([Path::new("README.md")], "chore: refresh spotlight line")?;

        let subject = syscall_non_interactive("git", ["log", "-1", "--format=%s"])?;
        assert!(subject.ends_with("chore: refresh spotlight line"));

        Ok(())
    }

    #[sealed_test]
    fn commit_without_repository_fails() {
        let publisher = GitCli::new(".");

        let result = publisher.stage_and_commit([Path::new("README.md")], "chore: doomed");

        assert!(matches!(result, Err(PublishError::Syscall(_))));
    }
}
