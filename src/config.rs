//! Environment and on-disk configuration.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::KitError;
use crate::modes::Mode;

pub const CONFIG_DIR_ENV_VAR: &str = "KIT_CONFIG_DIR";
pub const PROVIDER_ENV_VAR: &str = "KIT_PROVIDER";
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "KIT_OPENAI_BASE_URL";

const CONFIG_FILE_NAME: &str = "config.json";
const INSTRUCTIONS_DIR_NAME: &str = "instructions";

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub config_dir: Option<PathBuf>,
    pub provider: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            config_dir: env_string_opt(CONFIG_DIR_ENV_VAR).map(PathBuf::from),
            provider: env_string_opt(PROVIDER_ENV_VAR),
            openai_api_key: env_string_opt(API_KEY_ENV_VAR),
            openai_base_url: env_string_opt(BASE_URL_ENV_VAR),
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

/// Locations of everything `kit` keeps under its config directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub instructions_dir: PathBuf,
}

impl ConfigPaths {
    #[must_use]
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_file: root.join(CONFIG_FILE_NAME),
            instructions_dir: root.join(INSTRUCTIONS_DIR_NAME),
            root,
        }
    }

    /// `KIT_CONFIG_DIR` when set, otherwise `~/.config/KIterminal`.
    pub fn resolve(env: &EnvConfig) -> Result<Self, KitError> {
        if let Some(dir) = &env.config_dir {
            return Ok(Self::at(dir));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            KitError::config("~/.config/KIterminal", "could not determine home directory")
        })?;
        Ok(Self::at(home.join(".config").join("KIterminal")))
    }

    pub fn instruction_path(&self, mode: Mode) -> PathBuf {
        self.instructions_dir.join(mode.instruction_file())
    }

    /// Creates the config and instructions directories.
    pub fn ensure_dirs(&self) -> Result<(), KitError> {
        fs::create_dir_all(&self.instructions_dir)
            .map_err(|source| KitError::io("creating config directory", source))
    }
}

/// Contents of `config.json`.
///
/// Key names are kept as they appear in existing config files. Missing keys
/// fall back to their defaults; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    #[serde(rename = "Version")]
    pub version: String,
    pub language: String,
    pub normalchat: String,
    #[serde(rename = "Websearch")]
    pub websearch: String,
    #[serde(rename = "Chatpath")]
    pub chat_path: String,
    #[serde(rename = "ITSecurty_Websearch")]
    pub it_security: String,
    pub email: String,
    pub codex: String,
    pub translate: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub reasoning_effort: BTreeMap<String, String>,
    #[serde(rename = "securityNewsPromt")]
    pub security_news_prompt: String,
    pub security_domains: Vec<String>,
}

impl Default for KitConfig {
    fn default() -> Self {
        let effort = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect()
        };

        Self {
            version: "1.0".to_string(),
            language: "en".to_string(),
            normalchat: "gpt-5.1".to_string(),
            websearch: "gpt-5.1".to_string(),
            chat_path: String::new(),
            it_security: "gpt-5.1".to_string(),
            email: "gpt-5.1".to_string(),
            codex: "gpt-5.1-codex".to_string(),
            translate: "gpt-5.1".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            reasoning_effort: effort(&[
                ("default", "none"),
                ("normalchat", "none"),
                ("Websearch", "low"),
                ("ITSecurty_Websearch", "medium"),
                ("email", "none"),
                ("codex", "low"),
                ("translate", "none"),
            ]),
            security_news_prompt: "Research current security vulnerabilities, zero days and patches for: \
                Exchange on-premises, Windows 11 (23H2 and later), Office 365, \
                Entra ID, Intune, Teams and SharePoint."
                .to_string(),
            security_domains: [
                "msrc.microsoft.com",
                "learn.microsoft.com",
                "support.microsoft.com",
                "techcommunity.microsoft.com",
                "cloudblogs.microsoft.com",
                "nvd.nist.gov",
                "cisa.gov",
                "bleepingcomputer.com",
                "qualys.com",
                "threatprotect.qualys.com",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

impl KitConfig {
    /// Reads `config.json`, writing the defaults first when it does not exist.
    pub fn load_or_create(paths: &ConfigPaths) -> Result<Self, KitError> {
        paths.ensure_dirs()?;
        if !paths.config_file.exists() {
            Self::default().save(&paths.config_file)?;
        }
        Self::load(&paths.config_file)
    }

    pub fn load(path: &Path) -> Result<Self, KitError> {
        let bytes = fs::read(path).map_err(|error| KitError::config(path, error.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|error| KitError::config(path, error.to_string()))
    }

    /// Overwrites `path` with this config, indented by four spaces.
    pub fn save(&self, path: &Path) -> Result<(), KitError> {
        let mut body = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)
            .map_err(|error| KitError::config(path, error.to_string()))?;
        body.push(b'\n');
        fs::write(path, body).map_err(|error| KitError::config(path, error.to_string()))
    }

    /// Restores `config.json` to the defaults.
    pub fn reset(paths: &ConfigPaths) -> Result<Self, KitError> {
        paths.ensure_dirs()?;
        let config = Self::default();
        config.save(&paths.config_file)?;
        Ok(config)
    }

    #[must_use]
    pub fn model_for(&self, mode: Mode) -> &str {
        match mode {
            Mode::NormalChat => &self.normalchat,
            Mode::WebSearch => &self.websearch,
            Mode::Codex => &self.codex,
            Mode::Email => &self.email,
            Mode::Translate => &self.translate,
            Mode::ItSecurityNews => &self.it_security,
        }
    }

    /// Reasoning effort for `mode`, falling back to the `default` entry.
    #[must_use]
    pub fn reasoning_effort_for(&self, mode: Mode) -> Option<&str> {
        self.reasoning_effort
            .get(mode.config_key())
            .or_else(|| self.reasoning_effort.get("default"))
            .map(String::as_str)
            .filter(|effort| !effort.trim().is_empty())
    }

    /// Custom chat storage base, when one is configured.
    #[must_use]
    pub fn chat_base(&self) -> Option<&str> {
        Some(self.chat_path.trim()).filter(|base| !base.is_empty())
    }
}
