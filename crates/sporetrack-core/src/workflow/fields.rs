//! # Stage Field Table
//!
//! Which batch attributes each stage shows, in which order, under which
//! label, and what to show when they are missing.
//!
//! The table is plain data. Adding a field to a stage is a one-line edit to
//! [`STAGE_FIELDS`]; no control flow changes.

use super::Stage;
use crate::batch::{BatchAttribute, ProductionBatch};
use crate::format::{DateStyle, Placeholder, format_value};
use crate::primitives::STAGE_COUNT;
use serde::{Deserialize, Serialize};

// =============================================================================
// FIELD SPECS
// =============================================================================

/// One row of the field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub attribute: BatchAttribute,
    pub placeholder: Placeholder,
}

impl FieldSpec {
    const fn new(label: &'static str, attribute: BatchAttribute, placeholder: Placeholder) -> Self {
        Self {
            label,
            attribute,
            placeholder,
        }
    }
}

use BatchAttribute as A;
use Placeholder as P;

/// Per-stage field table, indexed by [`Stage::ordinal`].
pub static STAGE_FIELDS: [&[FieldSpec]; STAGE_COUNT] = [
    // Batch creation
    &[
        FieldSpec::new("Batch Number", A::BatchNumber, P::NotSet),
        FieldSpec::new("Start Date", A::StartDate, P::NotStarted),
        FieldSpec::new("Supplier", A::Supplier, P::NotSet),
        FieldSpec::new("Added By", A::AddedBy, P::NotRecorded),
    ],
    // Inoculation
    &[
        FieldSpec::new("Inoculation Date", A::InoculationDate, P::NotStarted),
        FieldSpec::new("Spawn Quantity", A::SpawnQuantity, P::NotRecorded),
    ],
    // Incubation
    &[
        FieldSpec::new("Incubation Start", A::IncubationStartDate, P::NotStarted),
        FieldSpec::new("Temperature", A::Temperature, P::NotRecorded),
        FieldSpec::new("Substrate Condition", A::SubstrateCondition, P::NotAssessed),
    ],
    // Fruiting
    &[
        FieldSpec::new("Fruiting Start", A::FruitingStartDate, P::NotStarted),
        FieldSpec::new("Humidity", A::Humidity, P::NotRecorded),
        FieldSpec::new("Light Exposure", A::LightExposure, P::NotSet),
    ],
    // Harvesting
    &[
        FieldSpec::new("Harvest Date", A::HarvestDate, P::NotStarted),
        FieldSpec::new("Harvested Weight", A::HarvestedWeight, P::NotRecorded),
        FieldSpec::new("Damaged Weight", A::DamagedWeight, P::NotRecorded),
        FieldSpec::new("Harvested By", A::HarvestedBy, P::NotRecorded),
    ],
    // Post-harvest
    &[
        FieldSpec::new("Post-Harvest Date", A::PostHarvestDate, P::NotStarted),
        FieldSpec::new("Collected Weight", A::CollectedWeight, P::NotRecorded),
        FieldSpec::new("Reuse Status", A::ReuseStatus, P::NotAssessed),
    ],
];

/// Field specs for one stage.
#[must_use]
pub fn field_specs(stage: Stage) -> &'static [FieldSpec] {
    STAGE_FIELDS[stage.ordinal()]
}

// =============================================================================
// PROJECTION
// =============================================================================

/// A rendered (label, value) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageField {
    pub label: String,
    pub value: String,
    /// `false` when `value` is a placeholder.
    pub recorded: bool,
}

/// Render the fields of one stage from a batch record.
#[must_use]
pub fn project_stage_fields(
    batch: &ProductionBatch,
    stage: Stage,
    style: DateStyle,
) -> Vec<StageField> {
    field_specs(stage)
        .iter()
        .map(|spec| match batch.attribute(spec.attribute) {
            Some(value) => StageField {
                label: spec.label.to_string(),
                value: format_value(&value, style),
                recorded: true,
            },
            None => StageField {
                label: spec.label.to_string(),
                value: spec.placeholder.text().to_string(),
                recorded: false,
            },
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn every_stage_has_fields() {
        for stage in Stage::ALL {
            assert!(!field_specs(stage).is_empty(), "{} has no fields", stage);
        }
    }

    #[test]
    fn every_stage_has_one_stage_date() {
        for stage in Stage::ALL {
            let dates = field_specs(stage)
                .iter()
                .filter(|spec| spec.placeholder == Placeholder::NotStarted)
                .count();
            assert_eq!(dates, 1, "{}", stage);
        }
    }

    #[test]
    fn empty_batch_renders_placeholders_only() {
        let batch = ProductionBatch::default();
        for stage in Stage::ALL {
            for field in project_stage_fields(&batch, stage, DateStyle::Iso) {
                assert!(!field.recorded);
                assert!(!field.value.is_empty());
            }
        }
    }

    #[test]
    fn harvesting_fields_in_table_order() {
        let mut batch = ProductionBatch::new("SHI-09");
        batch.harvest_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        batch.harvested_weight = Some(Decimal::new(1250, 2));
        batch.harvested_by = Some("Mina".to_string());

        let fields = project_stage_fields(&batch, Stage::Harvesting, DateStyle::Iso);
        let rendered: Vec<(&str, &str)> = fields
            .iter()
            .map(|f| (f.label.as_str(), f.value.as_str()))
            .collect();

        assert_eq!(
            rendered,
            vec![
                ("Harvest Date", "2024-06-01"),
                ("Harvested Weight", "12.5 kg"),
                ("Damaged Weight", "Not recorded"),
                ("Harvested By", "Mina"),
            ]
        );
    }
}
