//! Specimen groups and their collection-event associations.

use crate::constants::{SPECIMEN_GROUP_DATA_REQUIRED, SPECIMEN_GROUP_REQUIRED};
use crate::data_set::{DataItem, DataSet};
use crate::entity::{Entity, Schema};
use crate::CoreResult;
use bbweb_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A study-level group of specimens sharing a type and measurement units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenGroup {
    pub id: String,
    pub name: NonEmptyText,
    #[serde(default)]
    pub description: Option<String>,
    pub units: String,
}

impl SpecimenGroup {
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Validation`] if `id`, `name` or `units` is missing or
    /// mistyped.
    pub fn create(obj: &Value) -> CoreResult<Self> {
        const SCHEMA: Schema = Schema::new("SpecimenGroup", SPECIMEN_GROUP_REQUIRED);
        SCHEMA.parse(obj)
    }
}

impl Entity for SpecimenGroup {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// How many specimens of a group, and how much of each, a collection event collects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenGroupData {
    pub specimen_group_id: String,
    pub max_count: u32,
    pub amount: f64,
}

impl SpecimenGroupData {
    pub fn create(obj: &Value) -> CoreResult<Self> {
        const SCHEMA: Schema = Schema::new("SpecimenGroupData", SPECIMEN_GROUP_DATA_REQUIRED);
        SCHEMA.parse(obj)
    }
}

impl DataItem for SpecimenGroupData {
    type Entity = SpecimenGroup;

    const ENTITY_KIND: &'static str = "specimen groups";

    fn entity_id(&self) -> &str {
        &self.specimen_group_id
    }

    fn describe(&self, group: &SpecimenGroup) -> String {
        format!(
            "{} ({}, {} {})",
            group.name, self.max_count, self.amount, group.units
        )
    }
}

pub type SpecimenGroupDataSet = DataSet<SpecimenGroupData>;
