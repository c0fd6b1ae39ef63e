//! Version control adapter
//!
//! Shells out to the `git` binary through [CommandRunner] for the handful of
//! operations the bump workflow needs: branch/commit queries, refname
//! validation, committing, and tagging.

use crate::error::{BumpError, Result};
use crate::runner::CommandRunner;
use std::path::{Path, PathBuf};

/// Default tag name prefix applied by [Git::write_tag]
pub const DEFAULT_TAG_PREFIX: &str = "build-";

const DEFAULT_COMMAND: &str = "git";

/// Wrapper around the git command line for commit and tag operations.
#[derive(Debug)]
pub struct Git {
    runner: CommandRunner,
    working_directory: PathBuf,
    tag_prefix: String,
}

impl Git {
    /// Create an adapter for a working directory.
    ///
    /// # Arguments
    /// * `working_directory` - Repository path; defaults to the current directory
    /// * `command_path` - git executable; defaults to `git` resolved on PATH
    ///
    /// # Returns
    /// * `Ok(Git)` - Adapter bound to an existing directory and executable
    /// * `Err` - If the directory or the git command cannot be resolved
    pub fn new(working_directory: Option<&Path>, command_path: Option<&str>) -> Result<Self> {
        let directory = working_directory.unwrap_or_else(|| Path::new("."));
        let working_directory = directory
            .canonicalize()
            .map_err(|_| BumpError::vcs(format!("invalid directory specified: {}", directory.display())))?;
        if !working_directory.is_dir() {
            return Err(BumpError::vcs(format!(
                "invalid directory specified: {}",
                directory.display()
            )));
        }

        let runner = CommandRunner::new(command_path.unwrap_or(DEFAULT_COMMAND))?;

        Ok(Git {
            runner,
            working_directory,
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
        })
    }

    /// The tag name prefix prepended by [Git::write_tag]
    pub fn tag_prefix(&self) -> &str {
        &self.tag_prefix
    }

    /// Replace the tag name prefix
    pub fn set_tag_prefix(&mut self, prefix: impl Into<String>) {
        self.tag_prefix = prefix.into();
    }

    /// Return the current branch name.
    pub fn current_branch(&self) -> Result<String> {
        let output = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        if !output.success {
            return Err(BumpError::vcs(format!(
                "failed to read current branch: {}",
                output.stderr.trim()
            )));
        }
        Ok(output.stdout.trim().to_string())
    }

    /// Return the most-recent commit hash for the specified branch.
    ///
    /// # Arguments
    /// * `branch` - Branch to check; defaults to the current branch
    pub fn current_commit_hash(&self, branch: Option<&str>) -> Result<String> {
        let branch = match branch {
            Some(branch) if !branch.trim().is_empty() => branch.trim().to_string(),
            _ => self.current_branch()?,
        };

        let output = self.run(&["rev-parse", "--verify", &branch])?;
        if !output.success {
            return Err(BumpError::vcs(format!(
                "failed to resolve commit for branch '{}': {}",
                branch,
                output.stderr.trim()
            )));
        }
        Ok(output.stdout.trim().to_string())
    }

    /// Check whether a tag already exists.
    pub fn is_existing_tag(&self, tag: &str) -> Result<bool> {
        let output = self.run(&["rev-parse", tag.trim()])?;
        Ok(output.success && !output.stdout.trim().is_empty())
    }

    /// Check whether a refname (tag or branch name) is well formed.
    ///
    /// Delegates the syntax rules to `git check-ref-format`. The `xxx/`
    /// prefix satisfies the command's requirement that refnames contain a
    /// slash.
    pub fn is_valid_refname(&self, refname: &str) -> Result<bool> {
        let candidate = format!("xxx/{}", refname);
        let output = self.run(&["check-ref-format", "--normalize", &candidate])?;
        Ok(output.success)
    }

    /// Stage the working directory and create a commit.
    ///
    /// # Errors
    /// Returns `Vcs` if the message is empty or either git step fails.
    pub fn write_commit(&self, message: &str) -> Result<()> {
        let message = message.trim();
        if message.is_empty() {
            return Err(BumpError::vcs(
                "message parameter required but not supplied",
            ));
        }

        let workdir = self.working_directory.to_string_lossy().to_string();
        let output = self.run(&["add", &workdir])?;
        if !output.success {
            return Err(BumpError::vcs(format!(
                "failed to stage changes: {}",
                output.stderr.trim()
            )));
        }

        let output = self.run(&["commit", "-m", message])?;
        if !output.success {
            return Err(BumpError::vcs(format!(
                "failed to commit: {}",
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    /// Create a tag, with the configured prefix prepended.
    ///
    /// With a message an annotated tag is created, otherwise a lightweight
    /// one. Without an explicit commit the tag lands on the current HEAD.
    ///
    /// # Errors
    /// Returns `Vcs` if the name is empty, malformed, already taken, or the
    /// git step fails.
    pub fn write_tag(&self, tag: &str, message: Option<&str>, commit: Option<&str>) -> Result<()> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(BumpError::vcs("tag parameter required but not supplied"));
        }

        let full_tag = format!("{}{}", self.tag_prefix, tag);
        if !self.is_valid_refname(&full_tag)? {
            return Err(BumpError::vcs(format!("tag name is malformed: {}", full_tag)));
        }
        if self.is_existing_tag(&full_tag)? {
            return Err(BumpError::vcs(format!("tag already exists: {}", full_tag)));
        }

        let mut args: Vec<&str> = vec!["tag"];
        if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
            args.extend(["-a", "-m", message]);
        }
        args.push(&full_tag);
        if let Some(commit) = commit.filter(|c| !c.trim().is_empty()) {
            args.push(commit);
        }

        let output = self.run(&args)?;
        if !output.success {
            return Err(BumpError::vcs(format!(
                "failed to create tag '{}': {}",
                full_tag,
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    fn run(&self, args: &[&str]) -> Result<crate::runner::CommandOutput> {
        let workdir = self.working_directory.to_string_lossy().to_string();
        let mut full_args = vec!["-C", workdir.as_str()];
        full_args.extend_from_slice(args);
        self.runner.run(&full_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directory_fails() {
        let result = Git::new(Some(Path::new("/nonexistent/repo/path")), None);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("invalid directory"));
    }

    #[test]
    fn test_invalid_command_fails() {
        let result = Git::new(None, Some("/nonexistent/git"));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_tag_prefix() {
        let git = Git::new(None, None).unwrap();
        assert_eq!(git.tag_prefix(), "build-");
    }

    #[test]
    fn test_set_tag_prefix() {
        let mut git = Git::new(None, None).unwrap();
        git.set_tag_prefix("release-");
        assert_eq!(git.tag_prefix(), "release-");
    }

    #[test]
    fn test_write_commit_requires_message() {
        let git = Git::new(None, None).unwrap();
        let result = git.write_commit("  ");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("required but not supplied"));
    }

    #[test]
    fn test_write_tag_requires_name() {
        let git = Git::new(None, None).unwrap();
        assert!(git.write_tag("", None, None).is_err());
    }

    #[test]
    fn test_refname_validation() {
        let git = Git::new(None, None).unwrap();
        assert!(git.is_valid_refname("build-1.2.1-b93").unwrap());
        assert!(!git.is_valid_refname("bad..name").unwrap());
        assert!(!git.is_valid_refname("bad name").unwrap());
    }
}
