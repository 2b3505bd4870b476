//! Best-effort clipboard access.
//!
//! Copy and paste go through the platform's clipboard tools when they are
//! installed. Every copy is also kept in an internal buffer, which paste falls
//! back to. Failures are logged and never surfaced.

use std::io::{self, Write, stdout};
use std::process::{Command, Stdio};

use base64::Engine;

/// Clipboard seam used by the effect runner.
pub trait ClipboardPort {
    /// Put `text` on the clipboard.
    fn copy(&mut self, text: &str);

    /// Current clipboard text, or `None` if there is nothing to paste.
    fn paste(&mut self) -> Option<String>;
}

#[cfg(target_os = "macos")]
const COPY_COMMANDS: &[&[&str]] = &[&["pbcopy"]];
#[cfg(target_os = "macos")]
const PASTE_COMMANDS: &[&[&str]] = &[&["pbpaste"]];

#[cfg(target_os = "windows")]
const COPY_COMMANDS: &[&[&str]] = &[&["clip"]];
#[cfg(target_os = "windows")]
const PASTE_COMMANDS: &[&[&str]] = &[&["powershell", "-command", "Get-Clipboard"]];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const COPY_COMMANDS: &[&[&str]] = &[
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const PASTE_COMMANDS: &[&[&str]] = &[
    &["xclip", "-selection", "clipboard", "-o"],
    &["xsel", "--clipboard", "--output"],
];

/// The system clipboard with an internal fallback buffer.
#[derive(Debug, Default)]
pub struct SystemClipboard {
    buffer: String,
    system: bool,
}

impl SystemClipboard {
    /// Clipboard backed by the platform tools.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            system: true,
        }
    }

    /// Clipboard that only uses the internal buffer.
    pub fn detached() -> Self {
        Self::default()
    }
}

impl ClipboardPort for SystemClipboard {
    fn copy(&mut self, text: &str) {
        self.buffer = text.to_string();
        if !self.system {
            return;
        }
        for command in COPY_COMMANDS {
            match pipe_to(command, text) {
                Ok(()) => return,
                Err(err) => tracing::debug!(tool = command[0], %err, "clipboard copy failed"),
            }
        }
        if let Err(err) = copy_osc52(text) {
            tracing::debug!(%err, "OSC 52 copy failed");
        }
    }

    fn paste(&mut self) -> Option<String> {
        if self.system {
            for command in PASTE_COMMANDS {
                match read_from(command) {
                    Ok(text) if !text.is_empty() => return Some(text),
                    Ok(_) => {}
                    Err(err) => tracing::debug!(tool = command[0], %err, "clipboard paste failed"),
                }
            }
        }
        (!self.buffer.is_empty()).then(|| self.buffer.clone())
    }
}

fn pipe_to(command: &[&str], text: &str) -> io::Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| io::Error::other("empty clipboard command"))?;
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("{program} exited with {status}")))
    }
}

fn read_from(command: &[&str]) -> io::Result<String> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| io::Error::other("empty clipboard command"))?;
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()?;
    if !output.status.success() {
        return Err(io::Error::other(format!(
            "{program} exited with {}",
            output.status
        )));
    }
    String::from_utf8(output.stdout).map_err(io::Error::other)
}

fn copy_osc52(text: &str) -> io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence_encodes_text() {
        let seq = osc52_sequence("hi");
        assert_eq!(seq, "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_detached_clipboard_round_trips() {
        let mut clipboard = SystemClipboard::detached();
        clipboard.copy("line one\nline two");
        assert_eq!(clipboard.paste().as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn test_empty_detached_clipboard_pastes_nothing() {
        let mut clipboard = SystemClipboard::detached();
        assert_eq!(clipboard.paste(), None);
    }

    #[test]
    fn test_missing_tool_is_an_error() {
        assert!(pipe_to(&["labbook-no-such-clipboard-tool"], "x").is_err());
        assert!(read_from(&[]).is_err());
    }
}
