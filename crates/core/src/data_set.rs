//! Data sets: the associations an owning entity declares with study-level entities.
//!
//! A collection event type lists the annotation types it records and the specimen groups it
//! collects. Each association is a data item carrying the foreign key of a study entity plus
//! per-association settings. A [`DataSet`] holds those items, resolves each one against an
//! [`EntitySet`] of the study's entities, and enforces that a non-empty id appears at most once.
//! Items with an empty id are new, unsaved associations and may repeat.

use crate::annotation_type::AnnotationType;
use crate::constants::ANNOTATION_TYPE_DATA_REQUIRED;
use crate::entity::{Entity, Schema};
use crate::error::DataSetError;
use crate::CoreResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Study-level entities indexed by id, in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySet<E> {
    entities: Vec<E>,
    index: HashMap<String, usize>,
}

impl<E: Entity> EntitySet<E> {
    /// # Errors
    ///
    /// Returns [`DataSetError::AlreadyExists`] if two entities share an id.
    pub fn new(entities: Vec<E>) -> Result<Self, DataSetError> {
        let mut index = HashMap::with_capacity(entities.len());
        for (position, entity) in entities.iter().enumerate() {
            if index.insert(entity.id().to_string(), position).is_some() {
                return Err(DataSetError::AlreadyExists(entity.id().to_string()));
            }
        }
        Ok(Self { entities, index })
    }

    /// # Errors
    ///
    /// Returns [`DataSetError::NotFound`] if no entity has `id`.
    pub fn get(&self, id: &str) -> Result<&E, DataSetError> {
        self.index
            .get(id)
            .map(|position| &self.entities[*position])
            .ok_or_else(|| DataSetError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }
}

/// One association held by a [`DataSet`].
pub trait DataItem: Clone + std::fmt::Debug + PartialEq {
    type Entity: Entity;

    /// Plural name of the referenced entities, used in error messages.
    const ENTITY_KIND: &'static str;

    /// Foreign key of the referenced study entity; empty for a new item.
    fn entity_id(&self) -> &str;

    /// Display fragment for [`DataSet::get_as_string`].
    fn describe(&self, entity: &Self::Entity) -> String;
}

/// A data item together with the study entity it resolved to.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSetEntry<T: DataItem> {
    pub data: T,
    /// `None` for items with an empty id or when the set has no lookup.
    pub entity: Option<T::Entity>,
}

/// Where a [`DataSet`] gets its study entities from. Supply at most one.
#[derive(Clone, Debug)]
pub struct DataSetOptions<E> {
    pub study_entities: Option<Vec<E>>,
    pub study_entity_set: Option<EntitySet<E>>,
}

impl<E> Default for DataSetOptions<E> {
    fn default() -> Self {
        Self {
            study_entities: None,
            study_entity_set: None,
        }
    }
}

impl<E> DataSetOptions<E> {
    pub fn with_entities(entities: Vec<E>) -> Self {
        Self {
            study_entities: Some(entities),
            study_entity_set: None,
        }
    }

    pub fn with_entity_set(set: EntitySet<E>) -> Self {
        Self {
            study_entities: None,
            study_entity_set: Some(set),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DataSet<T: DataItem> {
    entries: Vec<DataSetEntry<T>>,
    lookup: Option<EntitySet<T::Entity>>,
}

impl<T: DataItem> DataSet<T> {
    /// Builds a data set, resolving every item with a non-empty id against the lookup.
    ///
    /// # Errors
    ///
    /// - [`DataSetError::ConflictingLookupSources`] if both study entities and a study entity
    ///   set are supplied.
    /// - [`DataSetError::AlreadyExists`] if two items share a non-empty id.
    /// - [`DataSetError::NotFound`] if an item references an entity the lookup lacks.
    pub fn new(
        items: Vec<T>,
        options: DataSetOptions<T::Entity>,
    ) -> Result<Self, DataSetError> {
        let lookup = match (options.study_entities, options.study_entity_set) {
            (Some(_), Some(_)) => return Err(DataSetError::ConflictingLookupSources),
            (Some(entities), None) => Some(EntitySet::new(entities)?),
            (None, set) => set,
        };

        let mut data_set = Self {
            entries: Vec::with_capacity(items.len()),
            lookup,
        };
        for item in items {
            data_set.insert(item)?;
        }
        Ok(data_set)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Foreign keys of every item, in insertion order.
    pub fn all_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.data.entity_id()).collect()
    }

    /// Looks up an item by non-empty id; looking up `""` is not supported.
    ///
    /// # Errors
    ///
    /// Returns [`DataSetError::NotFound`] if no item has `id`.
    pub fn get(&self, id: &str) -> Result<&DataSetEntry<T>, DataSetError> {
        self.entries
            .iter()
            .find(|e| e.data.entity_id() == id)
            .ok_or_else(|| DataSetError::NotFound(id.to_string()))
    }

    /// Adds a copy of `item`.
    ///
    /// # Errors
    ///
    /// - [`DataSetError::NoStudyEntities`] if the set was built without study entities.
    /// - [`DataSetError::AlreadyExists`] if `item` has a non-empty id already present.
    /// - [`DataSetError::NotFound`] if `item` references an entity the study lacks.
    pub fn add(&mut self, item: &T) -> Result<(), DataSetError> {
        if self.lookup.is_none() {
            return Err(DataSetError::NoStudyEntities(T::ENTITY_KIND));
        }
        self.insert(item.clone())
    }

    /// Removes and returns the item with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DataSetError::NotFound`] if no item has `id`.
    pub fn remove(&mut self, id: &str) -> Result<T, DataSetError> {
        let position = self
            .entries
            .iter()
            .position(|e| e.data.entity_id() == id)
            .ok_or_else(|| DataSetError::NotFound(id.to_string()))?;
        Ok(self.entries.remove(position).data)
    }

    /// Comma-joined summary of the resolved items, for display.
    pub fn get_as_string(&self) -> String {
        self.entries
            .iter()
            .filter_map(|e| e.entity.as_ref().map(|entity| e.data.describe(entity)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataSetEntry<T>> {
        self.entries.iter()
    }

    fn insert(&mut self, item: T) -> Result<(), DataSetError> {
        let id = item.entity_id();
        if !id.is_empty() && self.entries.iter().any(|e| e.data.entity_id() == id) {
            return Err(DataSetError::AlreadyExists(id.to_string()));
        }

        let entity = match &self.lookup {
            Some(lookup) if !id.is_empty() => Some(lookup.get(id)?.clone()),
            _ => None,
        };

        self.entries.push(DataSetEntry { data: item, entity });
        Ok(())
    }
}

/// Association of an annotation type with an owning entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationTypeData {
    pub annotation_type_id: String,
    pub required: bool,
}

impl AnnotationTypeData {
    pub fn create(obj: &Value) -> CoreResult<Self> {
        const SCHEMA: Schema = Schema::new("AnnotationTypeData", ANNOTATION_TYPE_DATA_REQUIRED);
        SCHEMA.parse(obj)
    }
}

impl DataItem for AnnotationTypeData {
    type Entity = AnnotationType;

    const ENTITY_KIND: &'static str = "annotation types";

    fn entity_id(&self) -> &str {
        &self.annotation_type_id
    }

    fn describe(&self, entity: &AnnotationType) -> String {
        let flag = if self.required { "Req" } else { "N/R" };
        format!("{} ({flag})", entity.name())
    }
}

pub type AnnotationTypeDataSet = DataSet<AnnotationTypeData>;
