use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::markdown::MarkdownOptions;
use crate::notes::NoteCalendar;

pub mod themes;

pub use themes::Palette;

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "Noteline";
const APP_NAME: &str = "noteline";

pub const CONFIG_ENV: &str = "NOTELINE_CONFIG";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        if !self.paths.config_file.exists() {
            let default_cfg = AppConfig::default();
            self.write_default_config(&default_cfg)?;
            return Ok(default_cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        tracing::info!(path = %self.paths.config_file.display(), "wrote default config");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        if let Some(path) = env::var_os(CONFIG_ENV).map(PathBuf::from) {
            return Ok(Self::from_override(path));
        }

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;
        let config_dir = project_dirs.config_dir().to_path_buf();
        let config_file = config_dir.join("config.toml");
        Ok(Self {
            config_dir,
            config_file,
        })
    }

    /// An override may name either a directory or the file itself.
    pub fn from_override(path: PathBuf) -> Self {
        if path.is_dir() || path.extension().is_none() {
            let config_file = path.join("config.toml");
            return Self {
                config_dir: path,
                config_file,
            };
        }
        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            config_dir,
            config_file: path,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: ThemeName,
    pub calendar: CalendarConfig,
    pub markdown: MarkdownConfig,
    pub list: ListConfig,
}

impl AppConfig {
    fn validate(&self) -> Result<()> {
        self.calendar
            .utc_offset()
            .context("validating [calendar] section")?;
        Ok(())
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(&self.theme)
    }

    pub fn note_calendar(&self) -> Result<NoteCalendar> {
        Ok(match self.calendar.utc_offset()? {
            Some(offset) => NoteCalendar::from_offset(offset),
            None => NoteCalendar::now_local(),
        })
    }

    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions {
            flush_unterminated_fence: self.markdown.flush_unterminated_fence,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Offset used to decide what "today" is. Unset means the system's local
    /// offset (UTC when it cannot be determined).
    pub utc_offset_minutes: Option<i32>,
}

impl CalendarConfig {
    pub fn utc_offset(&self) -> Result<Option<UtcOffset>> {
        let Some(minutes) = self.utc_offset_minutes else {
            return Ok(None);
        };
        let offset = UtcOffset::from_whole_seconds(minutes.saturating_mul(60))
            .with_context(|| format!("utc_offset_minutes {minutes} is out of range"))?;
        Ok(Some(offset))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub flush_unterminated_fence: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            flush_unterminated_fence: MarkdownOptions::default().flush_unterminated_fence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub show_icons: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { show_icons: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, std::hash::Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    HighContrast,
}
