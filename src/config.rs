//! Saved defaults.
//!
//! Defaults live in a flag file: the same `--flag value` tokens the command
//! line accepts, one or more per line, `#` starting a comment line. The
//! global file is read first, then a `.aisharerc` in the working directory,
//! then the real command line; later sources win.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::theme::ThemeId;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFlags {
    pub theme: Option<ThemeId>,
    pub brand: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub out_dir: Option<PathBuf>,
    /// Export canvas width in CSS pixels.
    pub width: Option<f32>,
    pub settle_ms: Option<u64>,
    pub reformat: bool,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; `other` wins wherever it sets a value.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            theme: other.theme.or(self.theme),
            brand: other.brand.clone().or_else(|| self.brand.clone()),
            title: other.title.clone().or_else(|| self.title.clone()),
            author: other.author.clone().or_else(|| self.author.clone()),
            out_dir: other.out_dir.clone().or_else(|| self.out_dir.clone()),
            width: other.width.or(self.width),
            settle_ms: other.settle_ms.or(self.settle_ms),
            reformat: self.reformat || other.reformat,
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("ai-share").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("ai-share")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("ai-share").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("ai-share")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".aisharerc")
}

/// Read a flag file. A missing file yields empty flags.
///
/// # Errors
/// Fails if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = tokenize(&content);
    let flags = parse_flag_tokens(&tokens);
    tracing::debug!(path = %path.display(), ?flags, "loaded config");
    Ok(flags)
}

/// Write `flags` as a flag file, creating parent directories.
///
/// # Errors
/// Fails if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# ai-share defaults (saved with --save)".to_string()];
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {theme}"));
    }
    if let Some(brand) = &flags.brand {
        lines.push(format!("--brand {}", quote(brand)));
    }
    if let Some(title) = &flags.title {
        lines.push(format!("--title {}", quote(title)));
    }
    if let Some(author) = &flags.author {
        lines.push(format!("--author {}", quote(author)));
    }
    if let Some(dir) = &flags.out_dir {
        lines.push(format!("--out-dir {}", quote(&dir.display().to_string())));
    }
    if let Some(width) = flags.width {
        lines.push(format!("--width {width}"));
    }
    if let Some(settle) = flags.settle_ms {
        lines.push(format!("--settle-ms {settle}"));
    }
    if flags.reformat {
        lines.push("--reformat".to_string());
    }
    if let Some(log) = &flags.log_file {
        lines.push(format!("--log-file {}", quote(&log.display().to_string())));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Delete a flag file if present.
///
/// # Errors
/// Fails if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract the flags this module persists from a token list. Unknown
/// tokens, positional arguments and malformed values are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--reformat" {
            flags.reformat = true;
            i += 1;
            continue;
        }
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
            _ => (token, None),
        };
        if !is_value_flag(name) {
            i += 1;
            continue;
        }
        let value = match inline_value {
            Some(value) => Some(value),
            None => {
                i += 1;
                tokens.get(i).cloned()
            }
        };
        if let Some(value) = value {
            apply_value(&mut flags, name, value);
        }
        i += 1;
    }
    flags
}

fn is_value_flag(name: &str) -> bool {
    matches!(
        name,
        "--theme"
            | "--brand"
            | "--title"
            | "--author"
            | "--out-dir"
            | "--width"
            | "--settle-ms"
            | "--log-file"
    )
}

fn apply_value(flags: &mut ConfigFlags, name: &str, value: String) {
    match name {
        "--theme" => match value.parse::<ThemeId>() {
            Ok(theme) => flags.theme = Some(theme),
            Err(err) => tracing::warn!(%err, "ignoring saved theme"),
        },
        "--brand" => flags.brand = Some(value),
        "--title" => flags.title = Some(value),
        "--author" => flags.author = Some(value),
        "--out-dir" => flags.out_dir = Some(PathBuf::from(value)),
        "--width" => flags.width = value.parse().ok().filter(|w: &f32| *w > 0.0),
        "--settle-ms" => flags.settle_ms = value.parse().ok(),
        "--log-file" => flags.log_file = Some(PathBuf::from(value)),
        _ => {}
    }
}

/// Split a flag file into tokens. Double quotes group words, so titles with
/// spaces survive a save/load cycle.
fn tokenize(content: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut current = String::new();
        let mut in_quotes = false;
        let mut quoted = false;
        let mut chars = line.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '"' => {
                    in_quotes = !in_quotes;
                    quoted = true;
                }
                '\\' if in_quotes => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                c if c.is_whitespace() && !in_quotes => {
                    if !current.is_empty() || quoted {
                        tokens.push(std::mem::take(&mut current));
                    }
                    quoted = false;
                }
                c => current.push(c),
            }
        }
        if !current.is_empty() || quoted {
            tokens.push(current);
        }
    }
    tokens
}

fn quote(value: &str) -> String {
    if !value.is_empty() && !value.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = strings(&[
            "ai-share",
            "--theme",
            "midnight",
            "--brand=claude",
            "--reformat",
            "--width",
            "800",
            "--settle-ms=0",
            "--export",
            "notes.md",
        ]);
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.theme, Some(ThemeId::Midnight));
        assert_eq!(flags.brand.as_deref(), Some("claude"));
        assert!(flags.reformat);
        assert_eq!(flags.width, Some(800.0));
        assert_eq!(flags.settle_ms, Some(0));
    }

    #[test]
    fn test_bad_values_are_skipped() {
        let flags = parse_flag_tokens(&strings(&["--theme", "neon", "--width", "-5"]));
        assert_eq!(flags.theme, None);
        assert_eq!(flags.width, None);
    }

    #[test]
    fn test_config_union_prefers_later_source() {
        let file = ConfigFlags {
            theme: Some(ThemeId::Nature),
            author: Some("file".to_string()),
            reformat: true,
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            theme: Some(ThemeId::Dark),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.theme, Some(ThemeId::Dark));
        assert_eq!(merged.author.as_deref(), Some("file"));
        assert!(merged.reformat);
    }

    #[test]
    fn test_tokenize_honours_quotes_and_comments() {
        let tokens = tokenize("# comment\n--title \"My \\\"big\\\" day\" --author ada\n--author \"\"\n");
        assert_eq!(
            tokens,
            strings(&["--title", "My \"big\" day", "--author", "ada", "--author", ""])
        );
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            theme: Some(ThemeId::Sunset),
            brand: Some("gemini".to_string()),
            title: Some("代码 片段".to_string()),
            author: Some(String::new()),
            out_dir: Some(PathBuf::from("/tmp/share out")),
            width: Some(720.0),
            settle_ms: Some(50),
            reformat: true,
            log_file: Some(PathBuf::from("ai-share.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
