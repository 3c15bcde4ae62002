//! Injected application state plus the small key-value store behind the durable bits
//! of it (view mode, accent colour, chat quota bookkeeping).

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::ListFormatter;
use crate::config::FormattingConfig;
use crate::error::{ChatError, StoreError};

const VIEW_MODE_KEY: &str = "SelectedView";
const ACCENT_COLOR_KEY: &str = "AccentColor";
const MESSAGE_COUNT_KEY: &str = "DailyMessageCount";
const RESET_DATE_KEY: &str = "DailyMessageResetDate";

pub const DEFAULT_ACCENT_COLOR: &str = "#FF9500";

/// Key-value settings persisted as one JSON object, or held only in memory
#[derive(Debug, Default)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, Value>,
}

impl SettingsStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| StoreError::Init {
                path: path.display().to_string(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StoreError::Init {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Typed read; a value of the wrong shape reads as missing
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed setting {}: {}", key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.set_many([(key, value)])
    }

    /// Write several keys in one save; on failure none of them change
    pub fn set_many<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<(), StoreError> {
        let mut next = self.values.clone();
        for (key, value) in entries {
            next.insert(key.to_string(), value);
        }
        self.save(&next)?;
        self.values = next;
        Ok(())
    }

    fn save(&self, values: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, serde_json::to_string_pretty(values)?)?;
            fs::rename(&tmp, path)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

/// Shared UI state handed to whichever component needs it
#[derive(Debug, Clone)]
pub struct AppState {
    pub accent_color: String,
    pub view_mode: ViewMode,
    pub search_text: String,
    pub formatter: ListFormatter,
}

impl AppState {
    /// Build the state from durable settings, falling back to defaults
    pub fn load(settings: &SettingsStore, formatting: &FormattingConfig) -> Self {
        Self {
            accent_color: settings
                .get(ACCENT_COLOR_KEY)
                .unwrap_or_else(|| DEFAULT_ACCENT_COLOR.to_string()),
            view_mode: settings.get(VIEW_MODE_KEY).unwrap_or_default(),
            search_text: String::new(),
            formatter: ListFormatter::from(formatting),
        }
    }

    pub fn set_view_mode(
        &mut self,
        mode: ViewMode,
        settings: &mut SettingsStore,
    ) -> Result<(), StoreError> {
        settings.set(VIEW_MODE_KEY, mode)?;
        self.view_mode = mode;
        Ok(())
    }

    pub fn set_accent_color(
        &mut self,
        color: impl Into<String>,
        settings: &mut SettingsStore,
    ) -> Result<(), StoreError> {
        let color = color.into();
        settings.set(ACCENT_COLOR_KEY, &color)?;
        self.accent_color = color;
        Ok(())
    }
}

/// Per-calendar-day message allowance
#[derive(Debug, Clone, Copy)]
pub struct DailyQuota {
    pub limit: u32,
}

impl DailyQuota {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    /// Messages already sent on `today`
    pub fn used(&self, settings: &SettingsStore, today: NaiveDate) -> u32 {
        match settings.get::<NaiveDate>(RESET_DATE_KEY) {
            Some(date) if date == today => settings.get(MESSAGE_COUNT_KEY).unwrap_or(0),
            _ => 0,
        }
    }

    pub fn remaining(&self, settings: &SettingsStore, today: NaiveDate) -> u32 {
        self.limit.saturating_sub(self.used(settings, today))
    }

    /// Count one message against `today`, refusing once the limit is reached
    pub fn consume(&self, settings: &mut SettingsStore, today: NaiveDate) -> Result<u32, ChatError> {
        let used = self.used(settings, today);
        if used >= self.limit {
            return Err(ChatError::QuotaExceeded);
        }
        let date = serde_json::to_value(today).map_err(StoreError::from)?;
        settings.set_many([
            (RESET_DATE_KEY, date),
            (MESSAGE_COUNT_KEY, Value::from(used + 1)),
        ])?;
        debug!("Chat message {} of {} for {}", used + 1, self.limit, today);
        Ok(self.limit - used - 1)
    }
}
