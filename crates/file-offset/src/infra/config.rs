//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::encoding::Encoding;
use crate::domain::errors::DomainError;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".file-offset/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default = "Defaults::unset")]
    pub defaults: Defaults,
    #[serde(default = "ReportSettings::unset")]
    pub report: ReportSettings,
    #[serde(default)]
    pub scratch: Scratch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Encoding assumed for files when none is given on the command line.
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    format: Option<String>,
}

impl Defaults {
    /// A layer that leaves every setting to lower layers.
    fn unset() -> Self {
        Self {
            encoding: None,
            format: None,
        }
    }

    fn default_encoding() -> &'static str {
        "UTF-8"
    }

    fn default_format() -> &'static str {
        "text"
    }

    /// The configured encoding name, as written.
    pub fn encoding_name(&self) -> String {
        self.encoding
            .clone()
            .unwrap_or_else(|| Self::default_encoding().to_owned())
    }

    /// The configured encoding, parsed.
    pub fn encoding(&self) -> Result<Encoding, DomainError> {
        self.encoding_name().parse()
    }

    /// The configured report format name, as written.
    pub fn format(&self) -> String {
        self.format
            .clone()
            .unwrap_or_else(|| Self::default_format().to_owned())
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            encoding: Some(Self::default_encoding().to_owned()),
            format: Some(Self::default_format().to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    excerpt_chars: Option<usize>,
    #[serde(default)]
    excerpt_carets: Option<bool>,
    #[serde(default)]
    unsaved_label: Option<String>,
}

impl ReportSettings {
    /// A layer that leaves every setting to lower layers.
    fn unset() -> Self {
        Self {
            excerpt_chars: None,
            excerpt_carets: None,
            unsaved_label: None,
        }
    }

    fn default_excerpt_chars() -> usize {
        16
    }

    fn default_excerpt_carets() -> bool {
        false
    }

    fn default_unsaved_label() -> &'static str {
        "None"
    }

    pub fn excerpt_chars(&self) -> usize {
        self.excerpt_chars
            .unwrap_or_else(Self::default_excerpt_chars)
    }

    pub fn excerpt_carets(&self) -> bool {
        self.excerpt_carets
            .unwrap_or_else(Self::default_excerpt_carets)
    }

    pub fn unsaved_label(&self) -> String {
        self.unsaved_label
            .clone()
            .unwrap_or_else(|| Self::default_unsaved_label().to_owned())
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            excerpt_chars: Some(Self::default_excerpt_chars()),
            excerpt_carets: Some(Self::default_excerpt_carets()),
            unsaved_label: Some(Self::default_unsaved_label().to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Scratch {
    /// Directory receiving multi-selection reports. Printed to stdout when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    encoding: Option<String>,
    format: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            encoding: env::var("FILE_OFFSET_ENCODING").ok(),
            format: env::var("FILE_OFFSET_FORMAT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(encoding: &str, format: &str) -> Self {
        Self {
            encoding: Some(encoding.to_owned()),
            format: Some(format.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading global config");
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            report: merge_report(self.report, other.report),
            scratch: Scratch {
                directory: other.scratch.directory.or(self.scratch.directory),
            },
        }
    }
}

fn merge_defaults(mut base: Defaults, overlay: Defaults) -> Defaults {
    if let Some(value) = overlay.encoding {
        base.encoding = Some(value);
    }
    if let Some(value) = overlay.format {
        base.format = Some(value);
    }
    base
}

fn merge_report(mut base: ReportSettings, overlay: ReportSettings) -> ReportSettings {
    if let Some(value) = overlay.excerpt_chars {
        base.excerpt_chars = Some(value);
    }
    if let Some(value) = overlay.excerpt_carets {
        base.excerpt_carets = Some(value);
    }
    if let Some(value) = overlay.unsaved_label {
        base.unsaved_label = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("file-offset/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(encoding) = env.encoding {
        config.defaults.encoding = Some(encoding);
    }
    if let Some(format) = env.format {
        config.defaults.format = Some(format);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.defaults.encoding().unwrap(), Encoding::Utf8);
        assert_eq!(config.report.excerpt_chars(), 16);
        assert!(!config.report.excerpt_carets());
        assert_eq!(config.scratch.directory, None);
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[defaults]
encoding = "UTF-16 LE"
[report]
excerpt_chars = 8
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".file-offset"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".file-offset/config.toml"),
            r#"
[defaults]
format = "json"
[report]
excerpt_carets = true
[scratch]
directory = "/tmp/offsets"
"#,
        )?;

        assert_eq!(find_repo_root(&workspace_dir), Some(workspace_dir.clone()));

        let config = Config::load_with_layers(
            Some(global),
            Some(workspace_dir.join(".file-offset/config.toml")),
            EnvOverrides::default(),
        )?;

        assert_eq!(config.defaults.encoding().unwrap(), Encoding::Utf16Le);
        assert_eq!(config.defaults.format(), "json");
        assert_eq!(config.report.excerpt_chars(), 8);
        assert!(config.report.excerpt_carets());
        assert_eq!(config.report.unsaved_label(), "None");
        assert_eq!(config.scratch.directory, Some(PathBuf::from("/tmp/offsets")));

        Ok(())
    }

    #[test]
    fn layer_without_report_table_keeps_lower_settings() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("global.toml");
        fs::write(&global, "[report]\nexcerpt_chars = 4\n")?;
        let workspace = temp.path().join("workspace.toml");
        fs::write(&workspace, "[defaults]\nformat = \"json\"\n")?;

        let config =
            Config::load_with_layers(Some(global), Some(workspace), EnvOverrides::default())?;
        assert_eq!(config.report.excerpt_chars(), 4);
        Ok(())
    }

    #[test]
    fn workspace_can_restore_default_values() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            "[defaults]\nencoding = \"UTF-16 LE\"\nformat = \"json\"\n",
        )?;
        let workspace = temp.path().join("workspace.toml");
        fs::write(
            &workspace,
            "[defaults]\nencoding = \"UTF-8\"\nformat = \"text\"\n",
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(workspace), EnvOverrides::default())?;
        assert_eq!(config.defaults.encoding()?, Encoding::Utf8);
        assert_eq!(config.defaults.format(), "text");
        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("latin-1", "json");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.defaults.encoding().unwrap(), Encoding::Latin1);
        assert_eq!(config.defaults.format(), "json");
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
