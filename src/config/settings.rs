//! User settings for the charity ledger
//!
//! Manages the local UTC offset used for day boundaries and month bucketing,
//! the calendar year floor, display preferences and the external narrative
//! command.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::calendar::resolver::{DEFAULT_UTC_OFFSET_MINUTES, DEFAULT_YEAR_FLOOR};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;
use crate::reports::narrative::PromptLanguage;
use crate::storage::{read_json_if_exists, write_json_atomic};

/// Version written into new settings files
pub const SETTINGS_VERSION: u32 = 1;

/// User settings, persisted as `config.json`
///
/// Every field is optional in the file; anything absent takes the value
/// from [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schema_version: u32,

    /// Local offset from UTC in minutes (Iran Standard Time is +210)
    pub utc_offset_minutes: i32,

    /// Lowest Jalali year accepted from user input
    pub year_floor: i32,

    /// Label printed after amounts in reports
    pub currency_label: String,

    /// Opening balance used by `report` when none is given
    pub default_opening_balance: Money,

    /// How many transactions to include in the narrative prompt
    pub narrative_sample_size: usize,

    /// Language of the narrative prompt and the requested answer
    pub narrative_language: PromptLanguage,

    /// Program and arguments that turn a prompt on stdin into a narrative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_command: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_VERSION,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            year_floor: DEFAULT_YEAR_FLOOR,
            currency_label: "IRR".into(),
            default_opening_balance: Money::zero(),
            narrative_sample_size: 10,
            narrative_language: PromptLanguage::default(),
            narrative_command: None,
        }
    }
}

impl Settings {
    /// Settings from `config.json`, or the defaults when it is absent
    ///
    /// Nothing is written here; `init` is what creates the file.
    pub fn load_or_create(paths: &LedgerPaths) -> LedgerResult<Self> {
        let path = paths.settings_file();
        let settings = read_json_if_exists::<Self>(&path)
            .map_err(|e| match e {
                LedgerError::Json(msg) => LedgerError::Config(msg),
                other => other,
            })?
            .unwrap_or_default();

        if settings.schema_version > SETTINGS_VERSION {
            return Err(LedgerError::Config(format!(
                "{} was written by a newer version (schema {})",
                path.display(),
                settings.schema_version
            )));
        }
        if !settings.default_opening_balance.is_within_limit() {
            return Err(LedgerError::Config(format!(
                "default_opening_balance {} is above the limit of {}",
                settings.default_opening_balance,
                Money::MAX_AMOUNT
            )));
        }
        Ok(settings)
    }

    pub fn save(&self, paths: &LedgerPaths) -> LedgerResult<()> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Human-readable local offset, e.g. "+03:30"
    pub fn offset_label(&self) -> String {
        let sign = if self.utc_offset_minutes < 0 { '-' } else { '+' };
        let minutes = self.utc_offset_minutes.unsigned_abs();
        format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
    }
}
