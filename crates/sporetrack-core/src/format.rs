//! # Display Formatting
//!
//! Turns batch attribute values into display strings: calendar dates in the
//! configured style, measurements with their unit, and stage-appropriate
//! placeholders for anything not yet recorded.

use crate::batch::AttributeValue;
use crate::SporetrackError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// UNITS
// =============================================================================

/// Measurement units used on batch records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Grams,
    Celsius,
    Percent,
    Kilograms,
}

impl Unit {
    /// Suffix appended to a formatted value.
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Grams => " g",
            Unit::Celsius => "°C",
            Unit::Percent => "%",
            Unit::Kilograms => " kg",
        }
    }
}

// =============================================================================
// DATE STYLES
// =============================================================================

/// Calendar date rendering styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `3/5/2024`
    #[default]
    Us,
    /// `05/03/2024`
    Eu,
    /// `2024-03-05`
    Iso,
    /// `Mar 5, 2024`
    Long,
}

impl DateStyle {
    fn pattern(&self) -> &'static str {
        match self {
            DateStyle::Us => "%-m/%-d/%Y",
            DateStyle::Eu => "%d/%m/%Y",
            DateStyle::Iso => "%Y-%m-%d",
            DateStyle::Long => "%b %-d, %Y",
        }
    }

    /// Get the style name as used in configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DateStyle::Us => "us",
            DateStyle::Eu => "eu",
            DateStyle::Iso => "iso",
            DateStyle::Long => "long",
        }
    }
}

impl FromStr for DateStyle {
    type Err = SporetrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(DateStyle::Us),
            "eu" => Ok(DateStyle::Eu),
            "iso" => Ok(DateStyle::Iso),
            "long" => Ok(DateStyle::Long),
            other => Err(SporetrackError::ConfigError(format!(
                "unknown date style {:?} (expected us, eu, iso or long)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PLACEHOLDERS
// =============================================================================

/// Text shown in place of a missing value.
///
/// The wording depends on what the field means: a stage date that has not
/// happened yet is "Not started", an assessment nobody made is "Not assessed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    NotStarted,
    NotSet,
    NotRecorded,
    NotAssessed,
}

impl Placeholder {
    #[must_use]
    pub fn text(&self) -> &'static str {
        match self {
            Placeholder::NotStarted => "Not started",
            Placeholder::NotSet => "Not set",
            Placeholder::NotRecorded => "Not recorded",
            Placeholder::NotAssessed => "Not assessed",
        }
    }
}

// =============================================================================
// FORMATTERS
// =============================================================================

/// Format a calendar date in the given style.
#[must_use]
pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    date.format(style.pattern()).to_string()
}

/// Format a measurement with its unit suffix. Trailing zeros are dropped.
#[must_use]
pub fn format_measure(value: Decimal, unit: Unit) -> String {
    format!("{}{}", value.normalize(), unit.suffix())
}

/// Format a present attribute value.
#[must_use]
pub fn format_value(value: &AttributeValue<'_>, style: DateStyle) -> String {
    match value {
        AttributeValue::Text(text) => (*text).to_string(),
        AttributeValue::Date(date) => format_date(*date, style),
        AttributeValue::Measure(amount, unit) => format_measure(*amount, *unit),
    }
}

// =============================================================================
// TESTS
// =============================================================================
