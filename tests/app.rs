mod support;

use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chat_provider::Turn;
use chat_store::ChatStore;
use kit::app::{run, Context};
use kit::cli::Action;
use kit::config::{ConfigPaths, EnvConfig, KitConfig};
use kit::modes::Mode;
use kit::KitError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use support::{line, ScriptedInteraction};

fn mock_context() -> (TempDir, Context) {
    let temp = tempfile::tempdir().expect("tempdir should be created");
    let env = EnvConfig {
        config_dir: Some(temp.path().join("KIterminal")),
        provider: Some("mock".to_string()),
        ..EnvConfig::default()
    };
    let ctx = Context::new(env, Arc::new(AtomicBool::new(false))).expect("context resolves");
    (temp, ctx)
}

#[test]
fn interactive_codex_session_is_saved_under_the_config_dir() {
    let (_temp, ctx) = mock_context();
    let mut ui = ScriptedInteraction::new([line("refactor this"), line("exit")]);

    run(
        Action::Interactive {
            mode: Mode::Codex,
            resume: false,
        },
        &ctx,
        &mut ui,
    )
    .expect("session succeeds");

    let store = ChatStore::open(ctx.paths.root.join("KITchats")).expect("store opens");
    let listed = store.list(Some("codex")).expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(
        store.read(&listed[0]).expect("read"),
        vec![
            Turn::user("refactor this"),
            Turn::assistant("[gpt-5.1-codex] refactor this"),
        ]
    );
    assert!(ctx.paths.config_file.is_file());
    assert!(ctx.paths.instruction_path(Mode::Codex).is_file());
}

#[test]
fn custom_chat_path_moves_saved_sessions() {
    let (temp, ctx) = mock_context();
    let custom = temp.path().join("elsewhere");
    ctx.paths.ensure_dirs().expect("dirs");
    let config = KitConfig {
        chat_path: custom.display().to_string(),
        ..KitConfig::default()
    };
    config.save(&ctx.paths.config_file).expect("config saved");

    let mut ui = ScriptedInteraction::new([line("hello"), line("exit")]);
    run(
        Action::Interactive {
            mode: Mode::NormalChat,
            resume: false,
        },
        &ctx,
        &mut ui,
    )
    .expect("session succeeds");

    let store = ChatStore::open(custom.join("KITchats")).expect("store opens");
    assert_eq!(store.list(Some("normalchat")).expect("list").len(), 1);
    assert!(!ctx.paths.root.join("KITchats").exists());
}

#[test]
fn one_shot_modes_reply_without_saving() {
    let (_temp, ctx) = mock_context();
    let mut ui = ScriptedInteraction::new([]);

    run(
        Action::OneShot {
            mode: Mode::Translate,
            text: Some("Guten Morgen".to_string()),
        },
        &ctx,
        &mut ui,
    )
    .expect("translation succeeds");

    assert_eq!(ui.replies(), vec!["[gpt-5.1] Guten Morgen"]);
    assert!(!ctx.paths.root.join("KITchats").exists());
}

#[test]
fn security_news_sends_the_configured_prompt() {
    let (_temp, ctx) = mock_context();
    let mut ui = ScriptedInteraction::new([]);

    run(Action::SecurityNews, &ctx, &mut ui).expect("news succeeds");

    let expected = format!("[gpt-5.1] {}", KitConfig::default().security_news_prompt);
    assert_eq!(ui.replies(), vec![expected.as_str()]);
}

#[test]
fn setup_and_edit_instructions_print_paths() {
    let (_temp, ctx) = mock_context();
    let mut ui = ScriptedInteraction::new([]);

    run(Action::Setup, &ctx, &mut ui).expect("setup succeeds");
    run(Action::EditInstructions("ItSecurity".to_string()), &ctx, &mut ui)
        .expect("edit succeeds");

    let config_path = ctx.paths.config_file.display().to_string();
    let instruction_path = ctx
        .paths
        .instruction_path(Mode::ItSecurityNews)
        .display()
        .to_string();
    assert_eq!(
        ui.infos(),
        vec![config_path.as_str(), instruction_path.as_str()]
    );
}

#[test]
fn edit_instructions_rejects_unknown_modes() {
    let (_temp, ctx) = mock_context();
    let mut ui = ScriptedInteraction::new([]);

    let error = run(Action::EditInstructions("poetry".to_string()), &ctx, &mut ui)
        .expect_err("unknown mode fails");
    assert!(matches!(error, KitError::UnknownMode(mode) if mode == "poetry"));
}

#[test]
fn init_resets_only_after_confirmation() {
    let (_temp, ctx) = mock_context();
    ctx.paths.ensure_dirs().expect("dirs");
    let custom = KitConfig {
        language: "de".to_string(),
        ..KitConfig::default()
    };
    custom.save(&ctx.paths.config_file).expect("config saved");

    let mut declined = ScriptedInteraction::new([line("n")]);
    run(Action::Init, &ctx, &mut declined).expect("init declined");
    assert_eq!(
        KitConfig::load(&ctx.paths.config_file).expect("load").language,
        "de"
    );

    let mut confirmed = ScriptedInteraction::new([line("Y")]);
    run(Action::Init, &ctx, &mut confirmed).expect("init confirmed");
    assert_eq!(
        KitConfig::load(&ctx.paths.config_file).expect("load").language,
        "en"
    );
    assert_eq!(confirmed.successes(), vec!["Configuration reset to defaults"]);
    assert!(fs::read_dir(&ctx.paths.instructions_dir)
        .expect("instructions dir")
        .next()
        .is_some());
}

#[test]
fn unknown_provider_fails_before_the_session_starts() {
    let (_temp, mut ctx) = mock_context();
    ctx.env.provider = Some("custom".to_string());
    let mut ui = ScriptedInteraction::new([line("hello")]);

    let error = run(
        Action::Interactive {
            mode: Mode::NormalChat,
            resume: false,
        },
        &ctx,
        &mut ui,
    )
    .expect_err("unknown provider fails");

    assert!(matches!(error, KitError::Provider(_)));
    assert_eq!(ui.line_prompts, 0);
}
