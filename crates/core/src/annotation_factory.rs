//! Construction of annotations from server objects.
//!
//! [`AnnotationFactory::create`] is the single entry point that picks the annotation variant
//! for an annotation type. [`UntypedAnnotation`] covers server objects whose annotation type
//! has not been resolved yet; it is diagnostic only and should be promoted with
//! [`UntypedAnnotation::attach`] before use.

use crate::annotation::{
    Annotation, AnnotationBase, AnnotationWire, DateTimeAnnotation, MultipleSelectAnnotation,
    NumberAnnotation, SingleSelectAnnotation, TextAnnotation,
};
use crate::annotation_type::{AnnotationType, AnnotationValueType, SelectCardinality};
use crate::constants::{ANNOTATION_REQUIRED, SELECTED_VALUE_REQUIRED};
use crate::entity::Schema;
use crate::{CoreError, CoreResult};
use serde_json::{json, Value};

const SCHEMA: Schema = Schema::new("Annotation", ANNOTATION_REQUIRED);
const SELECTED_VALUE_SCHEMA: Schema = Schema::new("SelectedValue", SELECTED_VALUE_REQUIRED);

/// Annotation factory operations.
///
/// This is a zero-sized type used for namespacing annotation construction.
pub struct AnnotationFactory;

impl AnnotationFactory {
    /// Builds the annotation variant matching `annotation_type` from a server object.
    ///
    /// `required` overrides the annotation type's required flag when given.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] if `obj` lacks `annotationTypeId` or `selectedValues`, or a
    ///   selected value lacks `annotationTypeId` or `value`.
    /// - [`CoreError::AnnotationTypeMissing`] if `annotation_type` is `None`.
    /// - [`CoreError::InvalidSelectAnnotation`] for a select type that is neither single nor
    ///   multiple.
    pub fn create(
        obj: &Value,
        annotation_type: Option<&AnnotationType>,
        required: Option<bool>,
    ) -> CoreResult<Annotation> {
        let wire = parse_wire(obj)?;
        let annotation_type = annotation_type.ok_or(CoreError::AnnotationTypeMissing)?;

        let annotation = match annotation_type.value_type {
            AnnotationValueType::Text => {
                let base = AnnotationBase::new(annotation_type, required)?;
                Annotation::Text(TextAnnotation::new(base, &wire))
            }
            AnnotationValueType::Number => {
                let base = AnnotationBase::new(annotation_type, required)?;
                Annotation::Number(NumberAnnotation::new(base, &wire))
            }
            AnnotationValueType::DateTime => {
                let base = AnnotationBase::new(annotation_type, required)?;
                Annotation::DateTime(DateTimeAnnotation::new(base, &wire))
            }
            AnnotationValueType::Select => match annotation_type.select_cardinality() {
                Some(SelectCardinality::Single) => {
                    let base = AnnotationBase::new(annotation_type, required)?;
                    Annotation::SingleSelect(SingleSelectAnnotation::new(
                        base,
                        &wire,
                        annotation_type,
                    ))
                }
                Some(SelectCardinality::Multiple) => {
                    let base = AnnotationBase::new(annotation_type, required)?;
                    Annotation::MultipleSelect(MultipleSelectAnnotation::new(
                        base,
                        &wire,
                        annotation_type,
                    ))
                }
                None => {
                    tracing::warn!(
                        annotation_type_id = %annotation_type.id,
                        max_value_count = ?annotation_type.max_value_count,
                        "select annotation type has no cardinality"
                    );
                    return Err(CoreError::InvalidSelectAnnotation(format!(
                        "{:?}",
                        annotation_type.max_value_count
                    )));
                }
            },
        };

        Ok(annotation)
    }

    /// Builds an annotation with no value yet, for a new entity form.
    pub fn empty(annotation_type: &AnnotationType) -> CoreResult<Annotation> {
        let obj = json!({
            "annotationTypeId": annotation_type.id,
            "selectedValues": []
        });
        Self::create(&obj, Some(annotation_type), None)
    }
}

fn parse_wire(obj: &Value) -> CoreResult<AnnotationWire> {
    SCHEMA.check(obj)?;

    if let Some(selected) = obj.get("selectedValues").and_then(Value::as_array) {
        for entry in selected {
            SELECTED_VALUE_SCHEMA.check(entry)?;
        }
    }

    SCHEMA.parse(obj)
}

/// A server annotation validated without an annotation type.
///
/// Kept for annotations whose type has not been resolved on the client. The type-dependent
/// accessors fail until the annotation is promoted with [`UntypedAnnotation::attach`].
#[derive(Clone, Debug, PartialEq)]
pub struct UntypedAnnotation {
    raw: Value,
    declared_annotation_type_id: String,
}

impl UntypedAnnotation {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `obj` lacks `annotationTypeId` or `selectedValues`.
    pub fn create(obj: &Value) -> CoreResult<Self> {
        let wire = parse_wire(obj)?;
        Ok(Self {
            raw: obj.clone(),
            declared_annotation_type_id: wire.annotation_type_id,
        })
    }

    /// The `annotationTypeId` the server object claims, unchecked.
    pub fn declared_annotation_type_id(&self) -> &str {
        &self.declared_annotation_type_id
    }

    pub fn annotation_type_id(&self) -> CoreResult<&str> {
        Err(CoreError::AnnotationTypeMissing)
    }

    pub fn value_type(&self) -> CoreResult<AnnotationValueType> {
        Err(CoreError::AnnotationTypeMissing)
    }

    pub fn label(&self) -> CoreResult<&str> {
        Err(CoreError::AnnotationTypeMissing)
    }

    /// Builds the typed annotation through [`AnnotationFactory::create`].
    pub fn attach(&self, annotation_type: &AnnotationType) -> CoreResult<Annotation> {
        AnnotationFactory::create(&self.raw, Some(annotation_type), None)
    }
}
