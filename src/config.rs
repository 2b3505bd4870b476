use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Largest tab width accepted from the command line or a config file.
pub const MAX_TAB_WIDTH: usize = 16;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub notes_dir: Option<PathBuf>,
    pub tab_width: Option<usize>,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; values in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            notes_dir: other.notes_dir.clone().or_else(|| self.notes_dir.clone()),
            tab_width: other.tab_width.or(self.tab_width),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("labbook").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("labbook")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("labbook").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("labbook")
                .join("config");
        }
    }

    PathBuf::from(".labbookrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".labbookrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(line_tokens)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// `--flag=value` lines keep their value whole so paths may contain spaces.
fn line_tokens(line: &str) -> Vec<String> {
    if line.starts_with("--") && line.contains('=') {
        vec![line.to_string()]
    } else {
        line.split_whitespace().map(ToOwned::to_owned).collect()
    }
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# labbook defaults (saved with --save)".to_string());
    if let Some(dir) = &flags.notes_dir {
        lines.push(format!("--notes-dir={}", dir.display()));
    }
    if let Some(width) = flags.tab_width {
        lines.push(format!("--tab-width {width}"));
    }
    if let Some(log) = &flags.debug_log {
        lines.push(format!("--debug-log={}", log.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list. Unknown tokens are ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        let value = match inline_value {
            Some(value) => Some(value),
            None if is_value_flag(name) => {
                i += 1;
                tokens.get(i).map(String::as_str)
            }
            None => None,
        };
        match (name, value) {
            ("--notes-dir", Some(value)) => flags.notes_dir = Some(PathBuf::from(value)),
            ("--tab-width", Some(value)) => flags.tab_width = parse_tab_width(value),
            ("--debug-log", Some(value)) => flags.debug_log = Some(PathBuf::from(value)),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn is_value_flag(name: &str) -> bool {
    matches!(name, "--notes-dir" | "--tab-width" | "--debug-log")
}

/// A tab width between 1 and [`MAX_TAB_WIDTH`].
pub fn parse_tab_width(s: &str) -> Option<usize> {
    s.parse::<usize>()
        .ok()
        .filter(|width| (1..=MAX_TAB_WIDTH).contains(width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "labbook".to_string(),
            "--notes-dir".to_string(),
            "/tmp/notes".to_string(),
            "--tab-width=4".to_string(),
            "--debug-log".to_string(),
            "debug.log".to_string(),
            "--unknown".to_string(),
            "yesterday".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.notes_dir, Some(PathBuf::from("/tmp/notes")));
        assert_eq!(flags.tab_width, Some(4));
        assert_eq!(flags.debug_log, Some(PathBuf::from("debug.log")));
    }

    #[test]
    fn test_parse_flag_tokens_rejects_bad_tab_width() {
        let args = vec!["--tab-width".to_string(), "0".to_string()];
        assert_eq!(parse_flag_tokens(&args).tab_width, None);
        let args = vec!["--tab-width=wide".to_string()];
        assert_eq!(parse_flag_tokens(&args).tab_width, None);
        assert_eq!(parse_tab_width("17"), None);
        assert_eq!(parse_tab_width("16"), Some(16));
    }

    #[test]
    fn test_flag_without_value_is_ignored() {
        let args = vec!["--notes-dir".to_string()];
        assert_eq!(parse_flag_tokens(&args), ConfigFlags::default());
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            notes_dir: Some(PathBuf::from("/file/notes")),
            tab_width: Some(8),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            tab_width: Some(4),
            debug_log: Some(PathBuf::from("cli.log")),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.notes_dir, Some(PathBuf::from("/file/notes")));
        assert_eq!(merged.tab_width, Some(4));
        assert_eq!(merged.debug_log, Some(PathBuf::from("cli.log")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".labbookrc");
        let flags = ConfigFlags {
            notes_dir: Some(PathBuf::from("/home/me/My Notes")),
            tab_width: Some(4),
            debug_log: Some(PathBuf::from("debug.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "# comment --tab-width 8\n\n--tab-width 3\n").unwrap();
        assert_eq!(load_config_flags(&path).unwrap().tab_width, Some(3));
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let loaded = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(loaded, ConfigFlags::default());
    }
}
