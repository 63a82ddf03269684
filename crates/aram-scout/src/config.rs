// Configuration loading and parsing (scout.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Placeholder in the statistics URL template replaced by a revision id.
pub const PATCH_PLACEHOLDER: &str = "$PATCH";

const CONFIG_FILE: &str = "scout.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

/// Everything a run needs. Built once at start and never mutated afterward.
#[derive(Debug, Clone)]
pub struct Config {
    pub sources: SourcesConfig,
    /// Revision ids to average over, in fetch order. Never empty.
    pub patches: Vec<String>,
    pub coefficient: f64,
    pub roster: RosterConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Statistics URL for one revision.
    pub fn stats_url(&self, patch: &str) -> String {
        self.sources
            .stats_url_template
            .replace(PATCH_PLACEHOLDER, patch)
    }

    /// Apply command-line overrides and re-run validation.
    pub fn with_overrides(
        mut self,
        coefficient: Option<f64>,
        patches: Option<Vec<String>>,
    ) -> Result<Self, ConfigError> {
        if let Some(c) = coefficient {
            self.coefficient = c;
        }
        if let Some(p) = patches {
            self.patches = p;
        }
        validate(&self)?;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// scout.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire scout.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ScoutFile {
    sources: SourcesConfig,
    revisions: RevisionsSection,
    comparison: ComparisonSection,
    roster: RosterConfig,
    #[serde(default)]
    http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub roster_url: String,
    pub reference_url: String,
    pub stats_url_template: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RevisionsSection {
    patches: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ComparisonSection {
    coefficient: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    /// Text of the term that introduces the free roster list.
    pub heading: String,
    /// Attribute a list item must carry to count as a character.
    pub item_attribute: String,
    /// Normalized wiki name -> reference-data name.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("aram-scout/", env!("CARGO_PKG_VERSION")).to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/scout.toml` under `base_dir`.
///
/// Does not copy defaults; `load_config()` handles that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    load_config_file(&base_dir.join("config").join(CONFIG_FILE))
}

/// Load and validate a specific config file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let text = read_file(path)?;
    parse_config(&text).map_err(|e| match e {
        ParseFailure::Toml(source) => ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Invalid(err) => err,
    })
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

fn parse_config(text: &str) -> Result<Config, ParseFailure> {
    let file: ScoutFile = toml::from_str(text).map_err(ParseFailure::Toml)?;

    let config = Config {
        sources: file.sources,
        patches: file.revisions.patches,
        coefficient: file.comparison.coefficient,
        roster: file.roster,
        http: file.http,
    };

    validate(&config).map_err(ParseFailure::Invalid)?;
    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the crate root or pass --config",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let urls: &[(&str, &str)] = &[
        ("sources.roster_url", config.sources.roster_url.as_str()),
        ("sources.reference_url", config.sources.reference_url.as_str()),
        (
            "sources.stats_url_template",
            config.sources.stats_url_template.as_str(),
        ),
    ];
    for (name, url) in urls {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(name, format!("must be an http(s) URL, got {url:?}")));
        }
    }

    if !config.sources.stats_url_template.contains(PATCH_PLACEHOLDER) {
        return Err(invalid(
            "sources.stats_url_template",
            format!("must contain the {PATCH_PLACEHOLDER} placeholder"),
        ));
    }

    if config.patches.is_empty() {
        return Err(invalid("revisions.patches", "must list at least one patch"));
    }
    if config.patches.iter().any(|p| p.trim().is_empty()) {
        return Err(invalid("revisions.patches", "must not contain blank entries"));
    }

    let c = config.coefficient;
    if !c.is_finite() || c <= 0.0 {
        return Err(invalid("comparison.coefficient", format!("must be > 0, got {c}")));
    }

    if config.roster.heading.trim().is_empty() {
        return Err(invalid("roster.heading", "must not be empty"));
    }
    if config.roster.item_attribute.trim().is_empty() {
        return Err(invalid("roster.item_attribute", "must not be empty"));
    }

    if config.http.timeout_secs == 0 {
        return Err(invalid("http.timeout_secs", "must be > 0"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Path to the crate root, where `defaults/` lives.
    fn project_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    fn default_text() -> String {
        fs::read_to_string(project_root().join("defaults/scout.toml")).unwrap()
    }

    fn parse_err(text: &str) -> ConfigError {
        match parse_config(text) {
            Err(ParseFailure::Invalid(e)) => e,
            Err(ParseFailure::Toml(e)) => panic!("expected validation error, got parse error: {e}"),
            Ok(_) => panic!("expected validation error, got Ok"),
        }
    }

    fn assert_field(err: ConfigError, expected: &str) {
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let config = load_config_file(&project_root().join("defaults/scout.toml"))
            .expect("defaults should load");

        assert_eq!(
            config.sources.roster_url,
            "https://leagueoflegends.fandom.com/wiki/ARAM"
        );
        assert_eq!(config.patches, vec!["11_9", "11_8", "11_7"]);
        assert!((config.coefficient - 1.12).abs() < f64::EPSILON);
        assert_eq!(config.roster.heading, "ARAM free roster");
        assert_eq!(config.roster.item_attribute, "data-champion");
        assert_eq!(
            config.roster.aliases.get("Wukong").map(String::as_str),
            Some("MonkeyKing")
        );
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn stats_url_substitutes_patch() {
        let config = load_config_file(&project_root().join("defaults/scout.toml")).unwrap();
        let url = config.stats_url("11_8");
        assert!(url.contains("/world/11_8/normal_aram/"));
        assert!(!url.contains(PATCH_PLACEHOLDER));
    }

    #[test]
    fn http_section_is_optional() {
        let text = default_text();
        let cut = text.find("[http]").unwrap();
        let config = match parse_config(&text[..cut]) {
            Ok(c) => c,
            Err(_) => panic!("config without [http] should load"),
        };
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.user_agent.starts_with("aram-scout/"));
    }

    #[test]
    fn rejects_empty_patch_list() {
        let text = default_text().replace(
            r#"patches = ["11_9", "11_8", "11_7"]"#,
            "patches = []",
        );
        assert_field(parse_err(&text), "revisions.patches");
    }

    #[test]
    fn rejects_blank_patch() {
        let text = default_text().replace(
            r#"patches = ["11_9", "11_8", "11_7"]"#,
            r#"patches = ["11_9", " "]"#,
        );
        assert_field(parse_err(&text), "revisions.patches");
    }

    #[test]
    fn rejects_template_without_placeholder() {
        let text = default_text().replace("/world/$PATCH/", "/world/11_9/");
        assert_field(parse_err(&text), "sources.stats_url_template");
    }

    #[test]
    fn rejects_non_http_url() {
        let text = default_text().replace(
            "https://leagueoflegends.fandom.com/wiki/ARAM",
            "ftp://example.com/ARAM",
        );
        assert_field(parse_err(&text), "sources.roster_url");
    }

    #[test]
    fn rejects_zero_coefficient() {
        let text = default_text().replace("coefficient = 1.12", "coefficient = 0.0");
        assert_field(parse_err(&text), "comparison.coefficient");
    }

    #[test]
    fn rejects_zero_timeout() {
        let text = default_text().replace("timeout_secs = 30", "timeout_secs = 0");
        assert_field(parse_err(&text), "http.timeout_secs");
    }

    #[test]
    fn overrides_replace_and_revalidate() {
        let config = load_config_file(&project_root().join("defaults/scout.toml")).unwrap();

        let overridden = config
            .clone()
            .with_overrides(Some(1.5), Some(vec!["12_1".into()]))
            .expect("valid overrides");
        assert!((overridden.coefficient - 1.5).abs() < f64::EPSILON);
        assert_eq!(overridden.patches, vec!["12_1"]);

        let err = config.with_overrides(Some(-1.0), None).unwrap_err();
        assert_field(err, "comparison.coefficient");
    }

    #[test]
    fn file_not_found_for_missing_scout_toml() {
        let tmp = std::env::temp_dir().join("aram_scout_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("scout.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = std::env::temp_dir().join("aram_scout_config_invalid");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/scout.toml"), "this is not valid [[[ toml").unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("scout.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("aram_scout_config_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults/scout.toml"),
            defaults_dir.join("scout.toml"),
        )
        .unwrap();
        fs::write(defaults_dir.join("scout.toml.example"), "# example\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/scout.toml").exists());
        assert!(!tmp.join("config/scout.toml.example").exists());

        let config = load_config_from(&tmp).expect("copied config should load");
        assert_eq!(config.patches.len(), 3);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_keeps_existing() {
        let tmp = std::env::temp_dir().join("aram_scout_config_keeps");
        let _ = fs::remove_dir_all(&tmp);

        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(
            project_root().join("defaults/scout.toml"),
            tmp.join("defaults/scout.toml"),
        )
        .unwrap();
        fs::write(tmp.join("config/scout.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config/scout.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("aram_scout_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
