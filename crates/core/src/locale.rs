use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Interface language selected by the administrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// English, left-to-right.
    #[default]
    En,
    /// Arabic, right-to-left.
    Ar,
}

impl Language {
    /// Returns the stable language code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Returns whether text in this language is laid out right-to-left.
    #[must_use]
    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Ar)
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            other => Err(AppError::Validation(format!("unknown language '{other}'"))),
        }
    }
}
