//! Configuration: directories, source file filters and labeling.
//!
//! Configuration is read from a TOML file. Every section is optional; missing
//! values fall back to the defaults shown here:
//!
//! ```toml
//! [directories]
//! source = "."
//! destination = "."
//!
//! [filters]
//! extensions = ["pdf"]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store"]
//! patterns = ["*.part"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//!
//! [labels]
//! enabled = true
//! command = "/usr/local/bin/tag"
//! ```

use crate::labels::{DEFAULT_TAG_COMMAND, LabelAssigner, NoLabels, TagCommand};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "renfiles.toml";

/// Errors that can occur during configuration loading and filter compilation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Complete configuration of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub directories: DirectoryConfig,
    #[serde(default)]
    pub filters: FilterRules,
    #[serde(default)]
    pub labels: LabelConfig,
}

/// Where files come from and where they go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_dir")]
    pub source: PathBuf,
    #[serde(default = "default_dir")]
    pub destination: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            source: default_dir(),
            destination: default_dir(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Which files of the source directory are considered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Allowed extensions, compared case-insensitively. Empty allows all.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether to include hidden files (starting with "."). Defaults to false.
    #[serde(default)]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides every other rule).
    #[serde(default)]
    pub include: IncludeRules,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            enable_hidden_files: false,
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

/// Rules for excluding files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// File name globs that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// How labels are delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path of the `tag` tool.
    #[serde(default = "default_tag_command")]
    pub command: PathBuf,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_tag_command(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tag_command() -> PathBuf {
    PathBuf::from(DEFAULT_TAG_COMMAND)
}

impl LabelConfig {
    /// The label assigner this configuration asks for.
    pub fn assigner(&self) -> Box<dyn LabelAssigner> {
        if self.enabled {
            Box::new(TagCommand::new(self.command.clone()))
        } else {
            Box::new(NoLabels)
        }
    }
}

impl Config {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `renfiles.toml` in the current directory
    /// 3. Look for `~/.config/renfiles/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any file found is not valid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("renfiles")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Replaces the configured directories with command line values.
    pub fn with_overrides(mut self, source: Option<PathBuf>, destination: Option<PathBuf>) -> Self {
        if let Some(source) = source {
            self.directories.source = source;
        }
        if let Some(destination) = destination {
            self.directories.destination = destination;
        }
        self
    }
}

impl FilterRules {
    /// Compile the rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self)
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

/// Compiled filter rules, ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    extensions: HashSet<String>,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_patterns: compile_globs(&rules.exclude.patterns)?,
            exclude_regexes,
            include_patterns: compile_globs(&rules.include.patterns)?,
        })
    }

    /// Check if a file should be handed to the classifier.
    ///
    /// Globs and regexes are matched against the file name only, never
    /// against the directory part of `file_path`.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Extension allow list - if set and not matched, exclude
    /// 4. Exact filename match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if !self.extensions.is_empty() {
            let ext = file_path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if !self.extensions.contains(&ext) {
                return false;
            }
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(exclude: ExcludeRules) -> FilterRules {
        FilterRules {
            exclude,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.directories.source, PathBuf::from("."));
        assert_eq!(config.directories.destination, PathBuf::from("."));
        assert_eq!(config.filters.extensions, vec!["pdf".to_string()]);
        assert!(config.labels.enabled);
        assert_eq!(config.labels.command, PathBuf::from(DEFAULT_TAG_COMMAND));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml(
            r#"
            [directories]
            source = "/Users/me/Downloads"
            destination = "/Volumes/archive"

            [labels]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.directories.source, PathBuf::from("/Users/me/Downloads"));
        assert_eq!(config.directories.destination, PathBuf::from("/Volumes/archive"));
        assert_eq!(config.filters.extensions, vec!["pdf".to_string()]);
        assert!(!config.labels.enabled);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("[directories\nsource = 1"),
            Err(ConfigError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file() {
        assert!(matches!(
            Config::load(Some(Path::new("/non/existent/renfiles.toml"))),
            Err(ConfigError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some(PathBuf::from("/in")), None);
        assert_eq!(config.directories.source, PathBuf::from("/in"));
        assert_eq!(config.directories.destination, PathBuf::from("."));
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let compiled = FilterRules::default().compile().unwrap();

        assert!(compiled.should_include(Path::new("NZZ_20230405.pdf")));
        assert!(compiled.should_include(Path::new("NZZ_20230405.PDF")));
        assert!(!compiled.should_include(Path::new("notes.txt")));
        assert!(!compiled.should_include(Path::new("README")));
    }

    #[test]
    fn test_empty_extension_list_allows_all() {
        let compiled = FilterRules {
            extensions: Vec::new(),
            ..Default::default()
        }
        .compile()
        .unwrap();

        assert!(compiled.should_include(Path::new("notes.txt")));
        assert!(compiled.should_include(Path::new("README")));
    }

    #[test]
    fn test_hidden_file_excluded_by_default() {
        let compiled = FilterRules::default().compile().unwrap();
        assert!(!compiled.should_include(Path::new(".partial.pdf")));
    }

    #[test]
    fn test_hidden_file_included_when_enabled() {
        let compiled = FilterRules {
            enable_hidden_files: true,
            ..Default::default()
        }
        .compile()
        .unwrap();
        assert!(compiled.should_include(Path::new(".partial.pdf")));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let compiled = rules(ExcludeRules {
            filenames: vec!["scan.pdf".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!compiled.should_include(Path::new("scan.pdf")));
        assert!(compiled.should_include(Path::new("NZZ_20230405.pdf")));
    }

    #[test]
    fn test_exclude_glob_patterns() {
        let compiled = rules(ExcludeRules {
            patterns: vec!["tmp_*.pdf".to_string(), "*.part.pdf".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!compiled.should_include(Path::new("tmp_upload.pdf")));
        assert!(!compiled.should_include(Path::new("/home/user/inbox/tmp_upload.pdf")));
        assert!(!compiled.should_include(Path::new("/inbox/scan.part.pdf")));
        assert!(compiled.should_include(Path::new("/tmp_dir/upload.pdf")));
        assert!(compiled.should_include(Path::new("upload.pdf")));
    }

    #[test]
    fn test_exclude_regex() {
        let compiled = rules(ExcludeRules {
            regex: vec![r"^copy of .*\.pdf$".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!compiled.should_include(Path::new("copy of NZZ_20230405.pdf")));
        assert!(compiled.should_include(Path::new("NZZ_20230405.pdf")));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let compiled = FilterRules {
            include: IncludeRules {
                patterns: vec![".keep.pdf".to_string()],
            },
            ..Default::default()
        }
        .compile()
        .unwrap();

        assert!(compiled.should_include(Path::new(".keep.pdf")));
        assert!(compiled.should_include(Path::new("/inbox/.keep.pdf")));
        assert!(!compiled.should_include(Path::new(".other.pdf")));
    }

    #[test]
    fn test_invalid_regex_returns_error() {
        let result = rules(ExcludeRules {
            regex: vec!["[invalid(".to_string()],
            ..Default::default()
        })
        .compile();
        assert!(matches!(result, Err(ConfigError::InvalidRegexPattern { .. })));
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let result = rules(ExcludeRules {
            patterns: vec!["[invalid".to_string()],
            ..Default::default()
        })
        .compile();
        assert!(matches!(result, Err(ConfigError::InvalidGlobPattern(_))));
    }
}
