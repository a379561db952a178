//! Config-driven event augmentation.
//!
//! Each option can be set globally and overridden per reservation type; the
//! per-type value wins field by field.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use crate::event::Event;
use crate::time::parse_hms_duration;

/// One set of augmentation options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AugmentOptions {
    pub attendees: Option<Vec<String>>,
    pub default_duration: Option<String>,
    pub categories: Option<Vec<String>>,
    pub alarms: Option<Vec<String>>,
}

/// Global options plus per-reservation-type overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    #[serde(flatten)]
    pub global: AugmentOptions,
    #[serde(flatten)]
    pub by_type: HashMap<String, AugmentOptions>,
}

impl AugmentConfig {
    fn for_type(&self, res_type: &str) -> Option<&AugmentOptions> {
        self.by_type.get(res_type)
    }

    fn attendees(&self, res_type: &str) -> Option<&[String]> {
        self.for_type(res_type)
            .and_then(|o| o.attendees.as_deref())
            .or(self.global.attendees.as_deref())
    }

    fn default_duration(&self, res_type: &str) -> Option<&str> {
        self.for_type(res_type)
            .and_then(|o| o.default_duration.as_deref())
            .or(self.global.default_duration.as_deref())
    }

    fn categories(&self, res_type: &str) -> Option<&[String]> {
        self.for_type(res_type)
            .and_then(|o| o.categories.as_deref())
            .or(self.global.categories.as_deref())
    }

    fn alarms(&self, res_type: &str) -> Option<&[String]> {
        self.for_type(res_type)
            .and_then(|o| o.alarms.as_deref())
            .or(self.global.alarms.as_deref())
    }
}

/// Applies the configured augmentations and returns the augmented event.
///
/// Never rejects an event; a malformed duration or alarm string is logged
/// and skipped.
pub fn augment(mut event: Event, config: &AugmentConfig, res_type: &str) -> Event {
    if let Some(attendees) = config.attendees(res_type) {
        event.attendees.extend(attendees.iter().cloned());
    }

    if event.end.is_none() && event.duration.is_none() {
        if let Some(value) = config.default_duration(res_type) {
            match parse_hms_duration(value) {
                Ok(duration) => event.duration = Some(duration),
                Err(error) => {
                    warn!(value = %value, error = %error, "ignoring bad default duration");
                }
            }
        }
    }

    if let Some(categories) = config.categories(res_type) {
        for category in categories {
            if !event.categories.contains(category) {
                event.categories.push(category.clone());
            }
        }
    }

    if let Some(alarms) = config.alarms(res_type) {
        for value in alarms {
            match parse_hms_duration(value) {
                Ok(offset) => event.alarms.push(-offset),
                Err(error) => {
                    warn!(value = %value, error = %error, "ignoring bad alarm offset");
                }
            }
        }
    }

    event
}
