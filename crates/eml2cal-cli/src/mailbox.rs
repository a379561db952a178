//! Reading reservation emails from a maildir or mbox.

use std::path::{Path, PathBuf};

use mail_parser::{Address, MessageParser};
use tracing::debug;

use eml2cal_core::EmailSummary;

use crate::config::MailboxSettings;
use crate::error::{RunError, RunResult};

/// A raw email plus, for maildir messages, the file it came from.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub raw: Vec<u8>,
    pub path: Option<PathBuf>,
}

impl RawMessage {
    /// Extracts the Date, From and Subject headers for the run summary.
    pub fn summary(&self) -> EmailSummary {
        let Some(message) = MessageParser::default().parse(&self.raw) else {
            return EmailSummary::default();
        };
        EmailSummary {
            date: message.date().map(|d| d.to_rfc3339()),
            from: message.from().and_then(first_mailbox),
            subject: message.subject().map(ToOwned::to_owned),
        }
    }
}

fn first_mailbox(address: &Address) -> Option<String> {
    let addr = match address {
        Address::List(addrs) => addrs.first()?,
        Address::Group(groups) => groups.first()?.addresses.first()?,
    };
    let email = addr.address.as_deref()?;
    Some(match addr.name.as_deref() {
        Some(name) => format!("{name} <{email}>"),
        None => email.to_string(),
    })
}

/// The mailbox to process, in one of the two supported on-disk formats.
#[derive(Debug)]
pub enum Mailbox {
    Maildir(PathBuf),
    Mbox(PathBuf),
}

impl Mailbox {
    /// Opens the mailbox named by the configuration.
    ///
    /// Maildir takes precedence when both are configured. The path must
    /// exist; a leading `~` is expanded to the home directory.
    pub fn open(settings: &MailboxSettings) -> RunResult<Self> {
        let mailbox = if let Some(path) = &settings.maildir {
            Self::Maildir(expand_tilde(path))
        } else if let Some(path) = &settings.mbox {
            Self::Mbox(expand_tilde(path))
        } else {
            return Err(RunError::Config(
                "no mailbox configured (`mailbox.maildir` or `mailbox.mbox`)".to_string(),
            ));
        };
        let path = mailbox.path();
        if !path.exists() {
            return Err(RunError::Mailbox(format!(
                "file or directory does not exist: {}",
                path.display()
            )));
        }
        Ok(mailbox)
    }

    fn path(&self) -> &Path {
        match self {
            Self::Maildir(path) | Self::Mbox(path) => path,
        }
    }

    /// Reads all messages from the mailbox.
    pub fn messages(&self) -> RunResult<Vec<RawMessage>> {
        match self {
            Self::Maildir(path) => read_maildir(path),
            Self::Mbox(path) => read_mbox(path),
        }
    }

    /// Removes every message from the mailbox.
    pub fn clear(&self) -> RunResult<()> {
        match self {
            Self::Maildir(path) => {
                for file in maildir_files(path)? {
                    debug!(path = %file.display(), "deleting message");
                    std::fs::remove_file(&file)?;
                }
                Ok(())
            }
            Self::Mbox(path) => {
                debug!(path = %path.display(), "truncating mbox");
                std::fs::write(path, b"")?;
                Ok(())
            }
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Message files in a maildir, from `new/` then `cur/`, sorted by name
/// within each directory.
fn maildir_files(root: &Path) -> RunResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for subdir in ["new", "cur"] {
        let dir = root.join(subdir);
        if !dir.is_dir() {
            continue;
        }
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            // Maildir reserves dotfiles for internal use.
            if name.to_string_lossy().starts_with('.') {
                continue;
            }
            if entry.file_type()?.is_file() {
                entries.push(entry.path());
            }
        }
        entries.sort();
        files.extend(entries);
    }
    Ok(files)
}

fn read_maildir(root: &Path) -> RunResult<Vec<RawMessage>> {
    let mut messages = Vec::new();
    for file in maildir_files(root)? {
        let raw = std::fs::read(&file)?;
        messages.push(RawMessage {
            raw,
            path: Some(file),
        });
    }
    Ok(messages)
}

/// Splits an mbox file into messages on `From ` separator lines,
/// unstuffing `>From ` quoted lines.
fn read_mbox(path: &Path) -> RunResult<Vec<RawMessage>> {
    let content = std::fs::read(path)?;
    let mut messages = Vec::new();
    let mut current: Option<Vec<u8>> = None;
    for line in content.split_inclusive(|&b| b == b'\n') {
        if line.starts_with(b"From ") {
            if let Some(message) = current.take() {
                messages.push(RawMessage {
                    raw: message,
                    path: None,
                });
            }
            current = Some(Vec::new());
        } else if let Some(message) = &mut current {
            if line.starts_with(b">From ") {
                message.extend_from_slice(&line[1..]);
            } else {
                message.extend_from_slice(line);
            }
        }
        // Content before the first separator is not a message.
    }
    if let Some(message) = current {
        messages.push(RawMessage {
            raw: message,
            path: None,
        });
    }
    Ok(messages)
}
