//! Configuration file handling.
//!
//! All settings live in a single `config.toml` at
//! `~/.config/eml2cal/config.toml` by default. Passwords are never stored
//! inline; the `password_cmd` options name external commands whose stdout
//! yields the secret.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use eml2cal_core::AugmentConfig;

/// Top-level configuration for eml2cal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extractor invocation settings.
    pub extractor: ExtractorSettings,

    /// Mailbox to read reservation emails from.
    pub mailbox: MailboxSettings,

    /// Header rewriting applied before extraction.
    pub preprocess: PreprocessSettings,

    /// Event augmentation options (global plus per reservation type).
    pub postprocess: AugmentConfig,

    /// Calendar upload settings.
    pub calendar: CalendarSettings,

    /// Run report settings.
    pub report: ReportSettings,

    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Settings for the external extractor command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// Command used to run the extractor.
    pub command: Option<String>,

    /// Extra extractor definitions, passed as `--additional-search-path`.
    pub additional_extractors: Option<String>,
}

/// Settings for the input mailbox.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MailboxSettings {
    /// Path to a maildir directory.
    pub maildir: Option<PathBuf>,

    /// Path to an mbox file.
    pub mbox: Option<PathBuf>,

    /// Delete all emails from the mailbox after a successful run.
    pub delete_processed_emails: bool,
}

/// Header copies applied to each email before extraction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PreprocessSettings {
    /// Maps a source header name to the destination header to overwrite.
    pub headers: HashMap<String, String>,
}

/// Calendar upload settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// CalDAV target calendar.
    pub caldav: Option<CaldavSettings>,
}

/// CalDAV connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CaldavSettings {
    /// URL of the calendar collection.
    pub calendar_url: String,

    /// Basic-auth username.
    pub username: String,

    /// Command whose stdout yields the password.
    pub password_cmd: String,
}

/// Run report settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// SMTP delivery for the run report.
    pub smtp: Option<SmtpSettings>,
}

/// SMTP connection settings for the run report.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,

    /// Command whose stdout yields the password.
    pub password_cmd: String,

    /// Recipient of the report.
    pub to_address: String,

    /// Sender address; defaults to the username.
    pub from_address: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Enable debug logging.
    pub debug: bool,

    /// Directory for per-run log files; stderr is used when unset.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config at {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eml2cal")
            .join("config.toml")
    }

    /// Checks that the required options are present.
    ///
    /// Returns a description of each missing value; an empty list means the
    /// configuration is adequate.
    pub fn missing(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.extractor.command.is_none() {
            missing.push("`extractor.command`".to_string());
        }
        if self.mailbox.maildir.is_none() && self.mailbox.mbox.is_none() {
            missing.push("`mailbox.maildir` or `mailbox.mbox`".to_string());
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let config: Config = toml::from_str(
            r#"
[extractor]
command = "kitinerary-extractor"
additional_extractors = "~/.local/share/kitinerary"

[mailbox]
maildir = "~/Mail/travel"
delete_processed_emails = true

[preprocess.headers]
X-Original-From = "From"

[postprocess]
attendees = ["me@example.com"]

[postprocess.FlightReservation]
alarms = ["03:00:00"]

[calendar.caldav]
calendar_url = "https://caldav.example.com/cal/"
username = "user"
password_cmd = "pass show caldav"

[report.smtp]
server = "smtp.example.com"
port = 465
username = "user@example.com"
password_cmd = "pass show smtp"
to_address = "me@example.com"

[logging]
debug = true
log_dir = "~/.local/state/eml2cal"
"#,
        )
        .unwrap();

        assert_eq!(
            config.extractor.command.as_deref(),
            Some("kitinerary-extractor")
        );
        assert!(config.mailbox.delete_processed_emails);
        assert_eq!(
            config.preprocess.headers.get("X-Original-From").map(String::as_str),
            Some("From")
        );
        let caldav = config.calendar.caldav.as_ref().unwrap();
        assert_eq!(caldav.calendar_url, "https://caldav.example.com/cal/");
        let smtp = config.report.smtp.as_ref().unwrap();
        assert_eq!(smtp.port, 465);
        assert!(smtp.from_address.is_none());
        assert!(config.logging.debug);
        assert!(config.missing().is_empty());
    }

    #[test]
    fn missing_required_options_are_reported() {
        let config: Config = toml::from_str("").unwrap();
        let missing = config.missing();
        assert_eq!(missing.len(), 2);
        assert!(missing[0].contains("extractor.command"));
        assert!(missing[1].contains("mailbox.maildir"));
    }

    #[test]
    fn mbox_alone_satisfies_mailbox_requirement() {
        let config: Config = toml::from_str(
            r#"
[extractor]
command = "kitinerary-extractor"

[mailbox]
mbox = "/var/mail/travel"
"#,
        )
        .unwrap();
        assert!(config.missing().is_empty());
    }

    #[test]
    fn postprocess_options_reach_the_augmenter() {
        let config: Config = toml::from_str(
            r#"
[postprocess]
categories = ["Travel"]
"#,
        )
        .unwrap();
        let event = eml2cal_core::augment(
            eml2cal_core::Event {
                summary: Some("Trip".into()),
                ..Default::default()
            },
            &config.postprocess,
            "EventReservation",
        );
        assert_eq!(event.categories, vec!["Travel"]);
    }
}
