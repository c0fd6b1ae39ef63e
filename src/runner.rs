use crate::error::{BumpError, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of one external command invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

/// Thin wrapper that resolves and runs an external command line program.
///
/// The command is resolved once at construction: an explicit path is
/// canonicalized, a bare name is searched on `PATH`. Either way the resolved
/// path must point at an existing file.
#[derive(Debug)]
pub struct CommandRunner {
    command_path: PathBuf,
}

impl CommandRunner {
    /// Resolve a command name or path into a runnable executable.
    ///
    /// # Arguments
    /// * `command` - Absolute/relative path, or a bare name to look up on PATH
    ///
    /// # Returns
    /// * `Ok(CommandRunner)` - Command resolved to an existing file
    /// * `Err` - If the command is empty or cannot be resolved
    pub fn new(command: &str) -> Result<Self> {
        if command.trim().is_empty() {
            return Err(BumpError::command(
                "command parameter required but not supplied",
            ));
        }

        let command_path = if command.contains('/') {
            Path::new(command)
                .canonicalize()
                .map_err(|_| BumpError::command(format!("invalid command path: {}", command)))?
        } else {
            Self::search_path(command)
                .ok_or_else(|| BumpError::command(format!("command not found on PATH: {}", command)))?
        };

        if !command_path.is_file() {
            return Err(BumpError::command(format!(
                "command path is not a file: {}",
                command_path.display()
            )));
        }

        Ok(CommandRunner { command_path })
    }

    /// The resolved executable path
    pub fn path(&self) -> &Path {
        &self.command_path
    }

    /// Run the command with the supplied arguments, capturing output.
    ///
    /// # Returns
    /// * `Ok(CommandOutput)` - stdout, stderr, and exit status of the run
    /// * `Err` - If the process could not be spawned
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(&self.command_path)
            .args(args)
            .output()
            .map_err(|e| {
                BumpError::command(format!(
                    "failed to execute {}: {}",
                    self.command_path.display(),
                    e
                ))
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }

    fn search_path(command: &str) -> Option<PathBuf> {
        let paths = env::var_os("PATH")?;
        env::split_paths(&paths)
            .map(|dir| dir.join(command))
            .find(|candidate| candidate.is_file())
    }
}
