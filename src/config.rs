use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Represents the complete configuration for buildbump.
///
/// Contains the plist adapter settings and the git commit/tag settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub plist: PlistConfig,

    #[serde(default)]
    pub git: GitConfig,
}

/// Configuration for locating and editing the plist file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PlistConfig {
    #[serde(default = "default_plist_filename")]
    pub filename: String,

    #[serde(default = "default_plist_command")]
    pub command_path: String,
}

fn default_plist_filename() -> String {
    "Info.plist".to_string()
}

fn default_plist_command() -> String {
    "/usr/libexec/PlistBuddy".to_string()
}

impl Default for PlistConfig {
    fn default() -> Self {
        PlistConfig {
            filename: default_plist_filename(),
            command_path: default_plist_command(),
        }
    }
}

/// Configuration for the git commit and tag steps.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_git_command")]
    pub command_path: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

fn default_git_command() -> String {
    "git".to_string()
}

fn default_tag_prefix() -> String {
    "build-".to_string()
}

/// Template for the bump commit message; `{tag}` and `{release_type}` are
/// substituted at commit time.
fn default_commit_message() -> String {
    "Updated build to {tag}".to_string()
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            command_path: default_git_command(),
            tag_prefix: default_tag_prefix(),
            commit_message: default_commit_message(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            plist: PlistConfig::default(),
            git: GitConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `buildbump.toml` in current directory
/// 3. `~/.config/.buildbump.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./buildbump.toml").exists() {
        fs::read_to_string("./buildbump.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".buildbump.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
