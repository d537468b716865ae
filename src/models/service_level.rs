//! Service level model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for end-of-life dates
pub const EOL_FORMAT: &str = "%Y-%m-%d";

/// A named support commitment with an optional end-of-life date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceLevel {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eol: Option<NaiveDate>,
}

impl ServiceLevel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eol: None,
        }
    }

    pub fn with_eol(mut self, eol: NaiveDate) -> Self {
        self.eol = Some(eol);
        self
    }

    /// Set the end-of-life date from its parts. Returns false for an impossible date.
    pub fn set_eol_ymd(&mut self, year: i32, month: u32, day: u32) -> bool {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => {
                self.eol = Some(date);
                true
            }
            None => false,
        }
    }

    /// End-of-life date as `YYYY-MM-DD`
    pub fn eol_string(&self) -> Option<String> {
        self.eol.map(|date| date.format(EOL_FORMAT).to_string())
    }
}
