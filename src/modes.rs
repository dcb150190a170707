//! Named conversational profiles and the settings each one draws from the config.

use std::fmt;

/// One behavioural profile of the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    NormalChat,
    WebSearch,
    Codex,
    Email,
    Translate,
    ItSecurityNews,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::NormalChat,
        Mode::WebSearch,
        Mode::Codex,
        Mode::Email,
        Mode::Translate,
        Mode::ItSecurityNews,
    ];

    /// Tag written into saved records and their file names.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::NormalChat => "normalchat",
            Self::WebSearch => "Websearch",
            Self::Codex => "codex",
            Self::Email => "email",
            Self::Translate => "translate",
            Self::ItSecurityNews => "ITSecurityNews",
        }
    }

    /// Key of this mode's model and reasoning effort in `config.json`.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::ItSecurityNews => "ITSecurty_Websearch",
            other => other.tag(),
        }
    }

    #[must_use]
    pub const fn instruction_file(self) -> &'static str {
        match self {
            Self::NormalChat => "normalchat.txt",
            Self::WebSearch => "websearch.txt",
            Self::Codex => "codex.txt",
            Self::Email => "email.txt",
            Self::Translate => "translate.txt",
            Self::ItSecurityNews => "itsecuritynews.txt",
        }
    }

    /// Name accepted by `--edit-instructions`.
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::NormalChat => "normalchat",
            Self::WebSearch => "websearch",
            Self::Codex => "codex",
            Self::Email => "email",
            Self::Translate => "translate",
            Self::ItSecurityNews => "itsecurity",
        }
    }

    #[must_use]
    pub fn from_alias(alias: &str) -> Option<Self> {
        let alias = alias.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.alias().eq_ignore_ascii_case(alias))
    }

    /// Whether interactive sessions of this mode are saved and resumable.
    #[must_use]
    pub const fn is_persisted(self) -> bool {
        matches!(self, Self::NormalChat | Self::WebSearch | Self::Codex)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
