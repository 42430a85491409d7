//! # bbweb Core
//!
//! Domain core of the biobank web client: the annotation value-type model and the data set
//! aggregates that tie study-level entities to the types that use them.
//!
//! This crate is pure in-memory logic:
//! - annotation types ([`AnnotationType`]) and their editing rules
//! - annotations of five value kinds ([`Annotation`]), built by [`AnnotationFactory`]
//! - data sets of annotation type and specimen group associations ([`DataSet`])
//! - the shipment state guard ([`ShipmentState`])
//!
//! **No I/O**: server objects arrive as `serde_json::Value` and results go back as domain
//! objects or [`CoreError`]. HTTP, rendering and file handling belong to callers.

pub mod annotation;
pub mod annotation_factory;
pub mod annotation_type;
pub mod config;
pub mod constants;
pub mod data_set;
pub mod entity;
pub mod error;
pub mod shipment;
pub mod specimen_group;

pub use annotation::{Annotation, AnnotationTypeSet, AnnotationValue, AnnotationVariant};
pub use annotation_factory::{AnnotationFactory, UntypedAnnotation};
pub use annotation_type::{AnnotationType, AnnotationValueType, SelectCardinality};
pub use config::{CoreConfig, OptionCheck};
pub use data_set::{
    AnnotationTypeData, AnnotationTypeDataSet, DataItem, DataSet, DataSetEntry, DataSetOptions,
    EntitySet,
};
pub use entity::{Entity, Schema};
pub use error::{CoreError, CoreResult, DataSetError};
pub use shipment::ShipmentState;
pub use specimen_group::{SpecimenGroup, SpecimenGroupData, SpecimenGroupDataSet};
