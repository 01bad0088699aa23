//! # Production Batch Records
//!
//! The batch record as delivered by the farm API.
//!
//! Records are created and mutated upstream; this crate only reads them.
//! Decoding is tolerant of what the API actually sends: dates may arrive as
//! `YYYY-MM-DD` or as full RFC 3339 timestamps, measurements as JSON numbers or
//! numeric strings, and blank strings stand in for missing values. A date
//! that cannot be read at all is treated as missing.

use crate::format::Unit;
use crate::primitives::{MAX_BATCH_NUMBER_LENGTH, MAX_TEXT_FIELD_LENGTH};
use crate::workflow::{Stage, resolve_current_stage};
use crate::SporetrackError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// PRODUCTION BATCH
// =============================================================================

/// A single production run tracked through the six stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductionBatch {
    /// Externally assigned, unique batch number.
    pub batch_number: String,
    /// Stored stage pointer. Absent means `batch_creation`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<String>,

    // Batch creation
    #[serde(deserialize_with = "de::date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,

    // Inoculation
    #[serde(deserialize_with = "de::date", skip_serializing_if = "Option::is_none")]
    pub inoculation_date: Option<NaiveDate>,
    /// Spawn added, in grams.
    #[serde(deserialize_with = "de::decimal", skip_serializing_if = "Option::is_none")]
    pub spawn_quantity: Option<Decimal>,

    // Incubation
    #[serde(deserialize_with = "de::date", skip_serializing_if = "Option::is_none")]
    pub incubation_start_date: Option<NaiveDate>,
    /// Incubation room temperature, °C.
    #[serde(deserialize_with = "de::decimal", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substrate_condition: Option<String>,

    // Fruiting
    #[serde(deserialize_with = "de::date", skip_serializing_if = "Option::is_none")]
    pub fruiting_start_date: Option<NaiveDate>,
    /// Relative humidity, percent.
    #[serde(deserialize_with = "de::decimal", skip_serializing_if = "Option::is_none")]
    pub humidity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_exposure: Option<String>,

    // Harvesting
    #[serde(deserialize_with = "de::date", skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<NaiveDate>,
    /// Kilograms picked.
    #[serde(deserialize_with = "de::decimal", skip_serializing_if = "Option::is_none")]
    pub harvested_weight: Option<Decimal>,
    /// Kilograms discarded as damaged.
    #[serde(deserialize_with = "de::decimal", skip_serializing_if = "Option::is_none")]
    pub damaged_weight: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvested_by: Option<String>,

    // Post-harvest
    #[serde(deserialize_with = "de::date", skip_serializing_if = "Option::is_none")]
    pub post_harvest_date: Option<NaiveDate>,
    /// Kilograms collected for sale after grading.
    #[serde(deserialize_with = "de::decimal", skip_serializing_if = "Option::is_none")]
    pub collected_weight: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reuse_status: Option<String>,
}

impl ProductionBatch {
    /// Create an empty batch with the given number.
    #[must_use]
    pub fn new(batch_number: impl Into<String>) -> Self {
        Self {
            batch_number: batch_number.into(),
            ..Self::default()
        }
    }

    /// Set the stored stage pointer.
    #[must_use]
    pub fn with_stage(mut self, key: impl Into<String>) -> Self {
        self.current_stage = Some(key.into());
        self
    }

    /// The stored stage key, defaulting to `batch_creation` when absent.
    #[must_use]
    pub fn current_stage_key(&self) -> &str {
        self.current_stage
            .as_deref()
            .unwrap_or(crate::primitives::DEFAULT_STAGE_KEY)
    }

    /// The resolved current stage, or `None` if the stored key is unknown.
    #[must_use]
    pub fn current_stage(&self) -> Option<Stage> {
        resolve_current_stage(self.current_stage.as_deref())
    }

    /// Read one attribute. Blank text counts as missing.
    #[must_use]
    pub fn attribute(&self, attribute: BatchAttribute) -> Option<AttributeValue<'_>> {
        use BatchAttribute as A;

        match attribute {
            A::BatchNumber => text(Some(&self.batch_number)),
            A::StartDate => self.start_date.map(AttributeValue::Date),
            A::Supplier => text(self.supplier.as_ref()),
            A::AddedBy => text(self.added_by.as_ref()),
            A::InoculationDate => self.inoculation_date.map(AttributeValue::Date),
            A::SpawnQuantity => measure(self.spawn_quantity, Unit::Grams),
            A::IncubationStartDate => self.incubation_start_date.map(AttributeValue::Date),
            A::Temperature => measure(self.temperature, Unit::Celsius),
            A::SubstrateCondition => text(self.substrate_condition.as_ref()),
            A::FruitingStartDate => self.fruiting_start_date.map(AttributeValue::Date),
            A::Humidity => measure(self.humidity, Unit::Percent),
            A::LightExposure => text(self.light_exposure.as_ref()),
            A::HarvestDate => self.harvest_date.map(AttributeValue::Date),
            A::HarvestedWeight => measure(self.harvested_weight, Unit::Kilograms),
            A::DamagedWeight => measure(self.damaged_weight, Unit::Kilograms),
            A::HarvestedBy => text(self.harvested_by.as_ref()),
            A::PostHarvestDate => self.post_harvest_date.map(AttributeValue::Date),
            A::CollectedWeight => measure(self.collected_weight, Unit::Kilograms),
            A::ReuseStatus => text(self.reuse_status.as_ref()),
        }
    }

    /// Validate a record received at the API boundary.
    ///
    /// Checks length limits on text and that measurements are physically
    /// plausible. The workflow view does not require a valid record.
    pub fn validate(&self) -> Result<(), SporetrackError> {
        if self.batch_number.len() > MAX_BATCH_NUMBER_LENGTH {
            return Err(SporetrackError::InvalidBatch(format!(
                "batch number exceeds {} bytes",
                MAX_BATCH_NUMBER_LENGTH
            )));
        }

        let texts = [
            ("supplier", &self.supplier),
            ("addedBy", &self.added_by),
            ("substrateCondition", &self.substrate_condition),
            ("lightExposure", &self.light_exposure),
            ("harvestedBy", &self.harvested_by),
            ("reuseStatus", &self.reuse_status),
        ];
        for (name, value) in texts {
            if value.as_ref().is_some_and(|v| v.len() > MAX_TEXT_FIELD_LENGTH) {
                return Err(SporetrackError::InvalidBatch(format!(
                    "{} exceeds {} bytes",
                    name, MAX_TEXT_FIELD_LENGTH
                )));
            }
        }

        let quantities = [
            ("spawnQuantity", self.spawn_quantity),
            ("harvestedWeight", self.harvested_weight),
            ("damagedWeight", self.damaged_weight),
            ("collectedWeight", self.collected_weight),
        ];
        for (name, value) in quantities {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                return Err(SporetrackError::InvalidBatch(format!(
                    "{} must not be negative",
                    name
                )));
            }
        }

        if self
            .humidity
            .is_some_and(|h| h < Decimal::ZERO || h > Decimal::ONE_HUNDRED)
        {
            return Err(SporetrackError::InvalidBatch(
                "humidity must be between 0 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

fn text(value: Option<&String>) -> Option<AttributeValue<'_>> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(AttributeValue::Text)
}

fn measure(value: Option<Decimal>, unit: Unit) -> Option<AttributeValue<'static>> {
    value.map(|v| AttributeValue::Measure(v, unit))
}

// =============================================================================
// ATTRIBUTES
// =============================================================================

/// Addressable attributes of a batch record, for declarative field tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchAttribute {
    BatchNumber,
    StartDate,
    Supplier,
    AddedBy,
    InoculationDate,
    SpawnQuantity,
    IncubationStartDate,
    Temperature,
    SubstrateCondition,
    FruitingStartDate,
    Humidity,
    LightExposure,
    HarvestDate,
    HarvestedWeight,
    DamagedWeight,
    HarvestedBy,
    PostHarvestDate,
    CollectedWeight,
    ReuseStatus,
}

/// A present attribute value, borrowed from the batch where possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue<'a> {
    Text(&'a str),
    Date(NaiveDate),
    Measure(Decimal, Unit),
}

// =============================================================================
// LENIENT DECODING
// =============================================================================

/// Naive timestamp layouts seen in exported records.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a calendar date from `YYYY-MM-DD` or a timestamp.
///
/// Timestamps keep their own calendar date; no timezone conversion happens.
pub fn parse_date(raw: &str) -> Result<NaiveDate, SporetrackError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
        .ok_or_else(|| SporetrackError::InvalidBatch(format!("unrecognized date {:?}", raw)))
}

mod de {
    use super::parse_date;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, de::Error};
    use std::str::FromStr;

    pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            // An unreadable date renders as missing; it must not reject the record.
            Some(s) => match parse_date(s) {
                Ok(date) => Ok(Some(date)),
                Err(e) => {
                    tracing::warn!("Ignoring date field: {}", e);
                    Ok(None)
                }
            },
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDecimal {
        Text(String),
        Number(Decimal),
    }

    pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawDecimal>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawDecimal::Number(n)) => Ok(Some(n)),
            Some(RawDecimal::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(RawDecimal::Text(s)) => Decimal::from_str(s.trim())
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid number {:?}: {}", s, e))),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("decimal")
    }

    #[test]
    fn absent_stage_defaults_to_creation() {
        let batch = ProductionBatch::new("B-001");
        assert_eq!(batch.current_stage_key(), "batch_creation");
        assert_eq!(batch.current_stage(), Some(Stage::BatchCreation));
    }

    #[test]
    fn unknown_stage_resolves_to_none() {
        let batch = ProductionBatch::new("B-001").with_stage("unknown_stage");
        assert_eq!(batch.current_stage_key(), "unknown_stage");
        assert_eq!(batch.current_stage(), None);
    }

    #[test]
    fn decodes_camel_case_record() {
        let json = r#"{
            "batchNumber": "OYS-2024-017",
            "currentStage": "harvesting",
            "startDate": "2024-03-01",
            "inoculationDate": "2024-03-02T08:30:00Z",
            "spawnQuantity": "250",
            "temperature": 22.5,
            "harvestedWeight": "12.40",
            "supplier": "  ",
            "unrelatedField": true
        }"#;

        let batch: ProductionBatch = serde_json::from_str(json).expect("decode");
        assert_eq!(batch.batch_number, "OYS-2024-017");
        assert_eq!(batch.current_stage(), Some(Stage::Harvesting));
        assert_eq!(batch.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(batch.inoculation_date, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(batch.spawn_quantity, Some(dec("250")));
        assert_eq!(batch.temperature, Some(dec("22.5")));
        assert_eq!(batch.harvested_weight, Some(dec("12.40")));
        assert_eq!(batch.attribute(BatchAttribute::Supplier), None);
    }

    #[test]
    fn blank_and_null_values_decode_as_missing() {
        let json = r#"{"batchNumber":"B","harvestDate":"","damagedWeight":null,"humidity":""}"#;
        let batch: ProductionBatch = serde_json::from_str(json).expect("decode");
        assert_eq!(batch.harvest_date, None);
        assert_eq!(batch.damaged_weight, None);
        assert_eq!(batch.humidity, None);
    }

    #[test]
    fn malformed_date_decodes_as_missing() {
        let json = r#"{"batchNumber":"B","currentStage":"inoculation","inoculationDate":"next tuesday","spawnQuantity":"250"}"#;
        let batch: ProductionBatch = serde_json::from_str(json).expect("decode");
        assert_eq!(batch.inoculation_date, None);
        assert_eq!(batch.spawn_quantity, Some(dec("250")));
        assert_eq!(batch.current_stage(), Some(Stage::Inoculation));
    }

    #[test]
    fn decodes_space_separated_timestamp() {
        let json = r#"{"batchNumber":"B","inoculationDate":"2024-03-02 08:30:00"}"#;
        let batch: ProductionBatch = serde_json::from_str(json).expect("decode");
        assert_eq!(batch.inoculation_date, NaiveDate::from_ymd_opt(2024, 3, 2));
    }

    #[test]
    fn parse_date_accepts_naive_timestamps() {
        assert_eq!(
            parse_date("2024-05-06T10:00:00").ok(),
            NaiveDate::from_ymd_opt(2024, 5, 6)
        );
        assert_eq!(
            parse_date("2024-05-06 10:00:00.250").ok(),
            NaiveDate::from_ymd_opt(2024, 5, 6)
        );
        assert!(matches!(
            parse_date("06/05/2024"),
            Err(SporetrackError::InvalidBatch(_))
        ));
    }

    #[test]
    fn attribute_carries_unit() {
        let mut batch = ProductionBatch::new("B");
        batch.humidity = Some(dec("85"));
        assert_eq!(
            batch.attribute(BatchAttribute::Humidity),
            Some(AttributeValue::Measure(dec("85"), Unit::Percent))
        );
    }

    #[test]
    fn validate_rejects_negative_weights() {
        let mut batch = ProductionBatch::new("B");
        batch.damaged_weight = Some(dec("-1"));
        assert!(matches!(
            batch.validate(),
            Err(SporetrackError::InvalidBatch(msg)) if msg.contains("damagedWeight")
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_humidity() {
        let mut batch = ProductionBatch::new("B");
        batch.humidity = Some(dec("101"));
        assert!(batch.validate().is_err());

        batch.humidity = Some(dec("100"));
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn validate_rejects_long_batch_number() {
        let batch = ProductionBatch::new("X".repeat(MAX_BATCH_NUMBER_LENGTH + 1));
        assert!(batch.validate().is_err());
    }
}
