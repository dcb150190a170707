use clap::{ArgGroup, Parser};

use crate::modes::Mode;

const AFTER_HELP: &str = "\
Examples:
  kit                      Start a normal chat
  kit -c                   Start the codex coding assistant
  kit -c \"explain this\"    Ask codex a single question
  kit -w                   Start a web search chat
  kit -r -w                Resume a saved web search chat
  kit -t \"Hello World\"     Translate text
  echo draft | kit -m      Proofread an email read from stdin
  kit -e codex             Show the codex instruction file

Environment:
  OPENAI_API_KEY           API key for the OpenAI provider
  KIT_PROVIDER             openai (default) or mock
  KIT_CONFIG_DIR           Config directory (default ~/.config/KIterminal)
  KIT_OPENAI_BASE_URL      Alternative Responses API base URL
  RUST_LOG                 Log filter, e.g. kit=debug";

#[derive(Debug, Parser)]
#[command(
    name = "kit",
    version,
    about = "AI-powered terminal assistant with chat, web search, coding, translation and email modes.",
    after_help = AFTER_HELP
)]
#[command(group(
    ArgGroup::new("action")
        .args(["codex", "websearch", "it_security_news", "translate", "mail", "setup", "init", "edit_instructions"])
        .multiple(false)
))]
pub struct Cli {
    /// Start the codex coding assistant, or ask it one question.
    #[arg(short = 'c', long, value_name = "TEXT", num_args = 0..=1)]
    pub codex: Option<Option<String>>,

    /// Chat with web search enabled.
    #[arg(short = 'w', long)]
    pub websearch: bool,

    /// Summarise recent IT security news from the configured domains.
    #[arg(long = "it", visible_alias = "it-security-news")]
    pub it_security_news: bool,

    /// Translate TEXT, or stdin when no text is given.
    #[arg(short = 't', long, value_name = "TEXT", num_args = 0..=1)]
    pub translate: Option<Option<String>>,

    /// Proofread an email given as TEXT, or read from stdin.
    #[arg(short = 'm', long, value_name = "TEXT", num_args = 0..=1)]
    pub mail: Option<Option<String>>,

    /// Pick a saved chat to continue (normal chat, web search and codex).
    #[arg(short = 'r', long)]
    pub resume: bool,

    /// Show the configuration file path.
    #[arg(short = 's', long)]
    pub setup: bool,

    /// Reset the configuration file to its defaults.
    #[arg(short = 'i', long)]
    pub init: bool,

    /// Show the instruction file of MODE (normalchat, websearch, codex, email, translate, itsecurity).
    #[arg(short = 'e', long, value_name = "MODE")]
    pub edit_instructions: Option<String>,

    /// Enable debug logging.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// What one invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Interactive { mode: Mode, resume: bool },
    /// One request without history; `None` text is read from stdin.
    OneShot { mode: Mode, text: Option<String> },
    SecurityNews,
    Setup,
    Init,
    EditInstructions(String),
}

impl Cli {
    #[must_use]
    pub fn action(&self) -> Action {
        if self.init {
            return Action::Init;
        }
        if let Some(mode) = &self.edit_instructions {
            return Action::EditInstructions(mode.clone());
        }
        if self.websearch {
            return Action::Interactive {
                mode: Mode::WebSearch,
                resume: self.resume,
            };
        }
        if let Some(text) = &self.mail {
            return Action::OneShot {
                mode: Mode::Email,
                text: text.clone(),
            };
        }
        if let Some(text) = &self.translate {
            return Action::OneShot {
                mode: Mode::Translate,
                text: text.clone(),
            };
        }
        if self.setup {
            return Action::Setup;
        }
        if self.it_security_news {
            return Action::SecurityNews;
        }
        match &self.codex {
            Some(Some(text)) => Action::OneShot {
                mode: Mode::Codex,
                text: Some(text.clone()),
            },
            Some(None) => Action::Interactive {
                mode: Mode::Codex,
                resume: self.resume,
            },
            None => Action::Interactive {
                mode: Mode::NormalChat,
                resume: self.resume,
            },
        }
    }
}
