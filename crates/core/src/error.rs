use crate::shipment::ShipmentState;

/// Errors raised by the data set aggregates.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataSetError {
    #[error("study entities and a study entity set cannot both be supplied")]
    ConflictingLookupSources,
    #[error("study has no {0}")]
    NoStudyEntities(&'static str),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A server object did not match the expected schema.
    #[error("{0}")]
    Validation(String),

    /// The caller used an operation the entity's current shape does not allow.
    #[error("{0}")]
    StructuralMisuse(String),

    #[error("annotation type is undefined")]
    AnnotationTypeMissing,
    #[error("annotation type not found: {0}")]
    AnnotationTypeNotFound(String),
    #[error("invalid select annotation: {0}")]
    InvalidSelectAnnotation(String),
    #[error("invalid value for max count: {0}")]
    InvalidMaxValueCount(String),

    #[error(transparent)]
    DataSet(#[from] DataSetError),

    #[error("invalid shipment state transition: {from} -> {to}")]
    InvalidTransition {
        from: ShipmentState,
        to: ShipmentState,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to serialize: {0}")]
    Serialization(serde_json::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
