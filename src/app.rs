//! Dispatches one invocation to its mode.

use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

use chat_provider::CancelSignal;
use chat_store::{resolve_storage_root, ChatStore};
use tracing::debug;

use crate::cli::Action;
use crate::config::{ConfigPaths, EnvConfig, KitConfig};
use crate::error::KitError;
use crate::handlers::{run_one_shot, ConversationHandler, ModeProfile};
use crate::instructions::{self, PlatformInfo};
use crate::interaction::Interaction;
use crate::lifecycle::Controller;
use crate::modes::Mode;
use crate::providers;

/// Everything an action needs besides the terminal.
pub struct Context {
    pub env: EnvConfig,
    pub paths: ConfigPaths,
    pub interrupt: CancelSignal,
}

impl Context {
    pub fn new(env: EnvConfig, interrupt: CancelSignal) -> Result<Self, KitError> {
        let paths = ConfigPaths::resolve(&env)?;
        Ok(Self {
            env,
            paths,
            interrupt,
        })
    }
}

pub fn run(action: Action, ctx: &Context, ui: &mut dyn Interaction) -> Result<(), KitError> {
    debug!(?action, config_dir = %ctx.paths.root.display(), "dispatching");
    match action {
        Action::Init => init(ctx, ui),
        Action::Setup => setup(ctx, ui),
        Action::EditInstructions(alias) => edit_instructions(ctx, &alias, ui),
        Action::Interactive { mode, resume } => interactive(ctx, mode, resume, ui),
        Action::OneShot { mode, text } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin(mode, ui)?,
            };
            one_shot(ctx, mode, &text, ui)
        }
        Action::SecurityNews => {
            let config = load_config(ctx)?;
            one_shot(ctx, Mode::ItSecurityNews, &config.security_news_prompt, ui)
        }
    }
}

fn load_config(ctx: &Context) -> Result<KitConfig, KitError> {
    let config = KitConfig::load_or_create(&ctx.paths)?;
    instructions::ensure_defaults(&ctx.paths)?;
    Ok(config)
}

fn init(ctx: &Context, ui: &mut dyn Interaction) -> Result<(), KitError> {
    let answer = ui.ask_with_default("Reset configuration file to defaults? (y/n)", "n")?;
    if answer.trim().eq_ignore_ascii_case("y") {
        KitConfig::reset(&ctx.paths)?;
        instructions::ensure_defaults(&ctx.paths)?;
        ui.success("Configuration reset to defaults");
    } else {
        ui.warn("Configuration reset cancelled");
    }
    Ok(())
}

fn setup(ctx: &Context, ui: &mut dyn Interaction) -> Result<(), KitError> {
    load_config(ctx)?;
    ui.info(&ctx.paths.config_file.display().to_string());
    Ok(())
}

fn edit_instructions(ctx: &Context, alias: &str, ui: &mut dyn Interaction) -> Result<(), KitError> {
    let mode = Mode::from_alias(alias).ok_or_else(|| KitError::UnknownMode(alias.to_string()))?;
    load_config(ctx)?;
    ui.info(&ctx.paths.instruction_path(mode).display().to_string());
    Ok(())
}

fn interactive(
    ctx: &Context,
    mode: Mode,
    resume: bool,
    ui: &mut dyn Interaction,
) -> Result<(), KitError> {
    let config = load_config(ctx)?;
    let profile = ModeProfile::resolve(mode, &config, &ctx.paths, &PlatformInfo::current())?;
    let provider = providers::provider_from_env(&ctx.env)?;
    let store = ChatStore::open(resolve_storage_root(config.chat_base(), &ctx.paths.root)?)?;

    ui.info(&format!(
        "{} mode ({}). Type '{}' or press Ctrl-D to leave.",
        mode,
        profile.model,
        crate::lifecycle::EXIT_KEYWORD
    ));

    let mut handler = ConversationHandler::new(provider, profile, Arc::clone(&ctx.interrupt));
    let controller = Controller::new(store, Arc::clone(&ctx.interrupt));
    let outcome = controller.run(mode.tag(), resume, &mut handler, ui)?;
    debug!(exit = ?outcome.exit, saved = ?outcome.saved, "session ended");
    Ok(())
}

fn one_shot(ctx: &Context, mode: Mode, text: &str, ui: &mut dyn Interaction) -> Result<(), KitError> {
    let config = load_config(ctx)?;
    let profile = ModeProfile::resolve(mode, &config, &ctx.paths, &PlatformInfo::current())?;
    let provider = providers::provider_from_env(&ctx.env)?;
    run_one_shot(&*provider, &profile, text, Arc::clone(&ctx.interrupt), ui)?;
    Ok(())
}

fn read_stdin(mode: Mode, ui: &mut dyn Interaction) -> Result<String, KitError> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        ui.info("Enter the text, then press Ctrl-D:");
    }

    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .map_err(|source| KitError::io("reading text from stdin", source))?;

    if text.trim().is_empty() {
        return Err(KitError::MissingText { mode: mode.tag() });
    }
    Ok(text)
}
