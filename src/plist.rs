//! Property-list adapter
//!
//! Reads and writes the two version fields of an Info.plist through the
//! PlistBuddy command line tool, validating both against the SemVer grammar.
//! `CFBundleShortVersionString` holds the marketing version (a normal
//! `major.minor.patch`), `CFBundleVersion` holds the build number (a
//! concatenated prerelease/metadata string such as `build.2045+1234`).

use crate::clock::Clock;
use crate::error::{BumpError, Result};
use crate::runner::CommandRunner;
use crate::semver;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the PlistBuddy executable on macOS
pub const DEFAULT_COMMAND_PATH: &str = "/usr/libexec/PlistBuddy";

/// Default plist filename searched for by [Plist::find]
pub const DEFAULT_FILENAME: &str = "Info.plist";

const VERSION_KEY: &str = ":CFBundleShortVersionString";
const BUILD_KEY: &str = ":CFBundleVersion";

/// PlistBuddy-backed accessor for a plist file's version and build fields.
pub struct Plist {
    runner: CommandRunner,
    file_path: Option<PathBuf>,
    version: Option<String>,
    build: Option<String>,
}

impl Plist {
    /// Create an adapter around a PlistBuddy executable.
    ///
    /// # Arguments
    /// * `command_path` - PlistBuddy path; defaults to `/usr/libexec/PlistBuddy`
    pub fn new(command_path: Option<&str>) -> Result<Self> {
        let command = match command_path {
            Some(path) if !path.trim().is_empty() => path,
            _ => DEFAULT_COMMAND_PATH,
        };

        Ok(Plist {
            runner: CommandRunner::new(command)?,
            file_path: None,
            version: None,
            build: None,
        })
    }

    /// The plist file path, once set
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// The marketing version, once set or read
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The build number, once set or read
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    /// Point the adapter at a plist file.
    ///
    /// # Errors
    /// Returns `Plist` if the path does not resolve to an existing file.
    pub fn set_file_path(&mut self, file_path: &Path) -> Result<()> {
        let resolved = file_path
            .canonicalize()
            .map_err(|_| BumpError::plist(format!("invalid file_path specified: {}", file_path.display())))?;
        if !resolved.is_file() {
            return Err(BumpError::plist(format!(
                "invalid file_path specified: {}",
                file_path.display()
            )));
        }
        self.file_path = Some(resolved);
        Ok(())
    }

    /// Set the marketing version.
    ///
    /// Must be a SemVer normal version: all three `major.minor.patch`
    /// components present, digits only.
    ///
    /// # Errors
    /// Returns `Plist` when empty and `InvalidFormat` when non-compliant.
    pub fn set_version(&mut self, version: &str) -> Result<()> {
        if version.is_empty() {
            return Err(BumpError::plist(
                "version parameter required but not supplied",
            ));
        }
        if !semver::is_valid_semver_normal(version) {
            return Err(BumpError::invalid_format("semver normal version", version));
        }
        self.version = Some(version.to_string());
        Ok(())
    }

    /// Set the build number.
    ///
    /// The build number concatenates the SemVer prerelease and metadata
    /// components, e.g. `alpha.1`, `build.2054+1234`, or `+20130313144700`.
    /// Build numbers should contain an incrementing numeric component, since
    /// app stores require them to increase between submissions.
    ///
    /// # Errors
    /// Returns `Plist` when empty and `InvalidFormat` when either component
    /// fails its grammar.
    pub fn set_build(&mut self, build: &str) -> Result<()> {
        if build.trim().is_empty() {
            return Err(BumpError::plist(
                "build parameter required but not supplied",
            ));
        }
        semver::split_build_fragment(build)?;
        self.build = Some(build.to_string());
        Ok(())
    }

    /// Increment the build number.
    ///
    /// Composes the stored version and build into a full SemVer string, runs
    /// it through the engine, and stores the resulting build back. By default
    /// the metadata component advances; with `prerelease` true the prerelease
    /// component advances instead.
    ///
    /// # Returns
    /// The updated build string.
    ///
    /// # Errors
    /// Returns `Plist` if version or build are unset, or `InvalidFormat`
    /// from the engine.
    pub fn bump_build(&mut self, prerelease: bool, clock: &dyn Clock) -> Result<String> {
        let version = self
            .version
            .as_deref()
            .ok_or_else(|| BumpError::plist("version not set (did you read the plist?)"))?;
        let build = self
            .build
            .as_deref()
            .ok_or_else(|| BumpError::plist("build not set (did you read the plist?)"))?;

        let full = semver::join_version_build(version, build);

        let bumped = semver::increment_semver_with_clock(&full, prerelease, clock)?;

        let (_, new_prerelease, new_metadata) = semver::parse_semver(&bumped, false)?;
        let new_build = format!(
            "{}{}",
            new_prerelease.strip_prefix('-').unwrap_or(&new_prerelease),
            new_metadata
        );
        self.build = Some(new_build.clone());
        Ok(new_build)
    }

    /// Find a plist file beneath the specified directory.
    ///
    /// # Arguments
    /// * `search_directory` - Directory to search recursively
    /// * `filename` - File to look for; defaults to `Info.plist`
    ///
    /// # Returns
    /// * `Ok(Some(path))` - First match found
    /// * `Ok(None)` - No match beneath the directory
    ///
    /// # Errors
    /// Returns `Plist` if the directory or filename are invalid.
    pub fn find(&self, search_directory: &Path, filename: Option<&str>) -> Result<Option<PathBuf>> {
        let directory = search_directory
            .canonicalize()
            .map_err(|_| BumpError::plist(format!("invalid directory specified: {}", search_directory.display())))?;
        if !directory.is_dir() {
            return Err(BumpError::plist(format!(
                "invalid directory specified: {}",
                search_directory.display()
            )));
        }

        let filename = match filename {
            Some(name) if !name.trim().is_empty() => name,
            Some(_) => return Err(BumpError::plist("filename invalid: undefined or empty")),
            None => DEFAULT_FILENAME,
        };

        Ok(find_file(&directory, filename))
    }

    /// Read the version and build fields from the plist file.
    ///
    /// The file path must be set first.
    ///
    /// # Errors
    /// Returns `Plist` if either PlistBuddy read fails, or `InvalidFormat`
    /// if a stored value is not SemVer compliant.
    pub fn read(&mut self) -> Result<()> {
        let version = self.run_print(VERSION_KEY)?;
        self.set_version(version.trim())?;
        let build = self.run_print(BUILD_KEY)?;
        self.set_build(build.trim())?;
        Ok(())
    }

    /// Write the version and build fields to the plist file.
    ///
    /// The file path must be set first. Prefer [Plist::write_safe], which
    /// refuses to write unset values.
    pub fn write(&self) -> Result<()> {
        let version = self.version.clone().unwrap_or_default();
        let build = self.build.clone().unwrap_or_default();
        self.run_set(VERSION_KEY, &version)?;
        self.run_set(BUILD_KEY, &build)?;
        Ok(())
    }

    /// Write the plist file, refusing if any field is unset or empty.
    ///
    /// # Errors
    /// Returns `Plist` naming the missing setting.
    pub fn write_safe(&self) -> Result<()> {
        if self.version.as_deref().map_or(true, |v| v.trim().is_empty()) {
            return Err(BumpError::plist(
                "unable to write plist, missing setting: \"version\" (did you set it?)",
            ));
        }
        if self.build.as_deref().map_or(true, |b| b.trim().is_empty()) {
            return Err(BumpError::plist(
                "unable to write plist, missing setting: \"build\" (did you set it?)",
            ));
        }
        self.write()
    }

    fn run_print(&self, key: &str) -> Result<String> {
        let file_path = self.require_file_path()?;
        let command = format!("Print {}", key);
        let output = self.runner.run(&["-c", &command, &file_path])?;
        if !output.success {
            return Err(BumpError::plist(format!(
                "failed to read {}: {}",
                key,
                output.stderr.trim()
            )));
        }
        Ok(output.stdout)
    }

    fn run_set(&self, key: &str, value: &str) -> Result<()> {
        let file_path = self.require_file_path()?;
        let command = format!("Set {} {}", key, value);
        let output = self.runner.run(&["-c", &command, &file_path])?;
        if !output.success {
            return Err(BumpError::plist(format!(
                "failed to write {}: {}",
                key,
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    fn require_file_path(&self) -> Result<String> {
        self.file_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .ok_or_else(|| BumpError::plist("invalid file_path: undefined"))
    }
}

fn find_file(directory: &Path, filename: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(directory).ok()?;
    let mut subdirectories = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.file_name().is_some_and(|name| name == filename) {
            return Some(path);
        }
        if path.is_dir() {
            subdirectories.push(path);
        }
    }

    subdirectories
        .iter()
        .find_map(|dir| find_file(dir, filename))
}
