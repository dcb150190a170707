//! Per-mode instruction templates stored as editable text files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::ConfigPaths;
use crate::error::KitError;
use crate::modes::Mode;

const NORMALCHAT: &str = "\
Always respond in Markdown.

## Answers
- Answer the whole question before stopping. Prefer a reasonable assumption over a follow-up question and list assumptions at the end.
- Simple questions: two to four sentences. Complex questions: short bold headings and bullet points.
- Start with the answer. No filler, no closing questions.
- Put code, commands and paths in backticks and code samples in fenced blocks with a language hint.
";

const WEBSEARCH: &str = "\
Always respond in Markdown. Research the question on the web, preferring primary sources \
and documentation from the last 90 days (30 days when the user asks for current news). \
Summarise in three to six bullet points followed by a dated source list. \
Flag disputed topics and give both positions briefly.
";

const ITSECURITYNEWS: &str = "\
Respond in Markdown. Report security vulnerabilities and patches for common enterprise systems \
published within the last 10 days. Use one section per finding:

### {title}
- **Date (UTC):** {date_utc}
- **Source:** {source}
- **CVE / KB:** {cve_ids} / {kb_ids}
- **Affected versions:** {affected_versions}
- **Severity / exploit status:** {severity} / {exploit_status}
- **Risk:** {short_risk}
- **Action:** {action}

Return at most 8 findings, known-exploited issues first, then CVSS 8 and above. \
If nothing relevant was published, say so in one sentence.
";

const EMAIL: &str = "\
Always respond in Markdown. Improve only the style, spelling, punctuation and clarity of the \
given email. Keep its voice and facts, add nothing and drop nothing relevant.
";

const TRANSLATE: &str = "\
Always respond in Markdown. Translate the text between German and English, detecting the \
source language automatically. Return only the translation.
";

const CODEX: &str = "\
You are a coding assistant running in a terminal on the user's machine.

Always respond in Markdown.

## System
- Operating system: {currentOS}
- Platform: {platforminfo}

## Style
- Be concise and lead with the result.
- Use backticks for commands, paths and identifiers and fenced blocks for code.
- For reviews, list findings first, ordered by severity, with file and line references.
- Suggest natural next steps (tests, build, commit) only when there are any.
";

/// Built-in template for `mode`, written on first run.
#[must_use]
pub fn default_template(mode: Mode) -> &'static str {
    match mode {
        Mode::NormalChat => NORMALCHAT,
        Mode::WebSearch => WEBSEARCH,
        Mode::Codex => CODEX,
        Mode::Email => EMAIL,
        Mode::Translate => TRANSLATE,
        Mode::ItSecurityNews => ITSECURITYNEWS,
    }
}

/// Instruction prepended for non-English response languages.
#[must_use]
pub fn language_prefix(language: &str) -> &'static str {
    match language.trim().to_ascii_lowercase().as_str() {
        "de" => "IMPORTANT: Always respond in German (Swiss High German without ß).\n\n",
        "fr" => "IMPORTANT: Always respond in French.\n\n",
        "es" => "IMPORTANT: Always respond in Spanish.\n\n",
        "it" => "IMPORTANT: Always respond in Italian.\n\n",
        "pt" => "IMPORTANT: Always respond in Portuguese.\n\n",
        "nl" => "IMPORTANT: Always respond in Dutch.\n\n",
        _ => "",
    }
}

/// Writes the built-in template of every mode whose file is missing.
///
/// Existing files are left untouched, even after `--init`.
pub fn ensure_defaults(paths: &ConfigPaths) -> Result<(), KitError> {
    paths.ensure_dirs()?;
    for mode in Mode::ALL {
        let path = paths.instruction_path(mode);
        if path.exists() {
            continue;
        }
        fs::write(&path, default_template(mode))
            .map_err(|source| KitError::io("writing default instructions", source))?;
    }
    Ok(())
}

/// Loads the instructions for `mode`, language prefix included.
///
/// A missing file yields an empty string.
pub fn load(paths: &ConfigPaths, mode: Mode, language: &str) -> Result<String, KitError> {
    let Some(template) = read_optional(&paths.instruction_path(mode))? else {
        return Ok(String::new());
    };
    Ok(format!("{}{template}", language_prefix(language)))
}

fn read_optional(path: &Path) -> Result<Option<String>, KitError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(KitError::io("reading instructions", source)),
    }
}

/// Host details substituted into the codex template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os: String,
    pub platform: String,
}

impl PlatformInfo {
    #[must_use]
    pub fn current() -> Self {
        let os = match std::env::consts::OS {
            "linux" => "Linux",
            "macos" => "Darwin",
            "windows" => "Windows",
            other => other,
        };
        Self {
            os: os.to_string(),
            platform: format!(
                "{os}-{}-{}",
                std::env::consts::ARCH,
                std::env::consts::FAMILY
            ),
        }
    }
}

/// Fills `{currentOS}` and `{platforminfo}`; other braces stay as written.
#[must_use]
pub fn render_codex(template: &str, platform: &PlatformInfo) -> String {
    template
        .replace("{currentOS}", &platform.os)
        .replace("{platforminfo}", &platform.platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_written_once_and_not_overwritten() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let paths = ConfigPaths::at(temp.path());

        ensure_defaults(&paths).expect("defaults written");
        for mode in Mode::ALL {
            assert!(paths.instruction_path(mode).is_file(), "{mode}");
        }

        fs::write(paths.instruction_path(Mode::Email), "custom").expect("edit");
        ensure_defaults(&paths).expect("second run");
        assert_eq!(
            fs::read_to_string(paths.instruction_path(Mode::Email)).expect("read"),
            "custom"
        );
    }

    #[test]
    fn load_prepends_language_prefix() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let paths = ConfigPaths::at(temp.path());
        paths.ensure_dirs().expect("dirs");
        fs::write(paths.instruction_path(Mode::Translate), "Translate.").expect("fixture");

        assert_eq!(load(&paths, Mode::Translate, "en").expect("en"), "Translate.");
        assert_eq!(
            load(&paths, Mode::Translate, "FR").expect("fr"),
            "IMPORTANT: Always respond in French.\n\nTranslate."
        );
        assert_eq!(load(&paths, Mode::Translate, "xx").expect("xx"), "Translate.");
    }

    #[test]
    fn missing_instruction_file_loads_empty() {
        let temp = tempfile::tempdir().expect("tempdir should be created");
        let paths = ConfigPaths::at(temp.path());

        assert_eq!(load(&paths, Mode::Codex, "de").expect("load"), "");
    }

    #[test]
    fn codex_template_substitutes_platform_placeholders_only() {
        let platform = PlatformInfo {
            os: "Linux".to_string(),
            platform: "Linux-x86_64-unix".to_string(),
        };

        let rendered = render_codex("os={currentOS} p={platforminfo} keep={title}", &platform);
        assert_eq!(rendered, "os=Linux p=Linux-x86_64-unix keep={title}");
        assert!(!render_codex(CODEX, &platform).contains("{currentOS}"));
    }
}
