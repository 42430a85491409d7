//! Annotations: values recorded against an annotation type.
//!
//! [`Annotation`] is a closed sum over the five value kinds. Each variant holds an
//! [`AnnotationBase`] (the annotation type id and the required flag copied from the type) and
//! implements [`AnnotationVariant`]. The annotation type itself is not stored: label lookups go
//! through an [`AnnotationTypeSet`] owned by the caller.
//!
//! Validity is pull-based. [`Annotation::set_value`] never validates; the UI polls
//! [`Annotation::is_value_valid`] before allowing submission.

use crate::annotation_type::{contains_all, AnnotationType, AnnotationValueType};
use crate::config::{CoreConfig, OptionCheck};
use crate::data_set::EntitySet;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registry of annotation types that annotations resolve their labels against.
pub type AnnotationTypeSet = EntitySet<AnnotationType>;

/// Fields shared by every annotation variant.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationBase {
    annotation_type_id: String,
    value_type: AnnotationValueType,
    required: bool,
}

impl AnnotationBase {
    /// Copies identity and the required flag from `annotation_type`.
    ///
    /// `required` overrides the type's flag when given.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMaxValueCount`] for a select type that is neither single nor
    /// multiple.
    pub fn new(annotation_type: &AnnotationType, required: Option<bool>) -> CoreResult<Self> {
        if annotation_type.is_value_type_select() && annotation_type.select_cardinality().is_none()
        {
            return Err(CoreError::InvalidMaxValueCount(format!(
                "{:?}",
                annotation_type.max_value_count
            )));
        }

        Ok(Self {
            annotation_type_id: annotation_type.id.clone(),
            value_type: annotation_type.value_type,
            required: required.unwrap_or(annotation_type.required),
        })
    }

    pub fn annotation_type_id(&self) -> &str {
        &self.annotation_type_id
    }

    pub fn value_type(&self) -> AnnotationValueType {
        self.value_type
    }

    pub fn required(&self) -> bool {
        self.required
    }
}

/// Behaviour every annotation variant provides.
pub trait AnnotationVariant {
    fn base(&self) -> &AnnotationBase;

    /// Whether a value has been entered, ignoring the required flag.
    fn has_value(&self) -> bool;

    /// Human-readable value, empty when nothing is entered.
    fn display_value(&self) -> String;

    /// The value slots of the server annotation shape.
    fn server_value(&self) -> ServerValue;

    /// Non-required annotations are always valid; required ones need a value.
    fn is_value_valid(&self) -> bool {
        !self.base().required() || self.has_value()
    }
}

/// Value slots written to the server for one annotation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServerValue {
    pub string_value: Option<String>,
    pub number_value: Option<String>,
    pub selected_values: Vec<String>,
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextAnnotation {
    base: AnnotationBase,
    pub value: Option<String>,
}

impl TextAnnotation {
    pub(crate) fn new(base: AnnotationBase, wire: &AnnotationWire) -> Self {
        Self {
            base,
            value: wire.string_value.clone(),
        }
    }
}

impl AnnotationVariant for TextAnnotation {
    fn base(&self) -> &AnnotationBase {
        &self.base
    }

    fn has_value(&self) -> bool {
        non_blank(&self.value)
    }

    fn display_value(&self) -> String {
        self.value.clone().unwrap_or_default()
    }

    fn server_value(&self) -> ServerValue {
        ServerValue {
            string_value: Some(self.value.clone().unwrap_or_default()),
            ..ServerValue::default()
        }
    }
}

/// A number held as the text the user entered. Any non-blank text counts as a value;
/// [`NumberAnnotation::as_f64`] reads it as a number.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberAnnotation {
    base: AnnotationBase,
    pub value: Option<String>,
}

impl NumberAnnotation {
    pub(crate) fn new(base: AnnotationBase, wire: &AnnotationWire) -> Self {
        Self {
            base,
            value: wire.number_value.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_deref().and_then(|v| v.trim().parse().ok())
    }
}

impl AnnotationVariant for NumberAnnotation {
    fn base(&self) -> &AnnotationBase {
        &self.base
    }

    fn has_value(&self) -> bool {
        non_blank(&self.value)
    }

    fn display_value(&self) -> String {
        self.value.clone().unwrap_or_default()
    }

    fn server_value(&self) -> ServerValue {
        ServerValue {
            number_value: Some(self.value.clone().unwrap_or_default()),
            ..ServerValue::default()
        }
    }
}

/// A date-time held as the server's `stringValue`. The text is parsed as RFC 3339 when read;
/// text that does not parse counts as no value.
#[derive(Clone, Debug, PartialEq)]
pub struct DateTimeAnnotation {
    base: AnnotationBase,
    pub value: Option<String>,
}

impl DateTimeAnnotation {
    pub(crate) fn new(base: AnnotationBase, wire: &AnnotationWire) -> Self {
        Self {
            base,
            value: wire.string_value.clone(),
        }
    }

    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        self.value
            .as_deref()
            .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl AnnotationVariant for DateTimeAnnotation {
    fn base(&self) -> &AnnotationBase {
        &self.base
    }

    fn has_value(&self) -> bool {
        self.as_date_time().is_some()
    }

    fn display_value(&self) -> String {
        match self.as_date_time() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => self.value.clone().unwrap_or_default(),
        }
    }

    fn server_value(&self) -> ServerValue {
        let string_value = match self.as_date_time() {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            None => self.value.clone().unwrap_or_default(),
        };
        ServerValue {
            string_value: Some(string_value),
            ..ServerValue::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SingleSelectAnnotation {
    base: AnnotationBase,
    pub value: Option<String>,
    options_at_creation: Vec<String>,
}

impl SingleSelectAnnotation {
    pub(crate) fn new(
        base: AnnotationBase,
        wire: &AnnotationWire,
        annotation_type: &AnnotationType,
    ) -> Self {
        Self {
            base,
            value: wire.selected_values.first().map(|sv| sv.value.clone()),
            options_at_creation: annotation_type.options.clone(),
        }
    }
}

impl AnnotationVariant for SingleSelectAnnotation {
    fn base(&self) -> &AnnotationBase {
        &self.base
    }

    fn has_value(&self) -> bool {
        non_blank(&self.value)
    }

    fn display_value(&self) -> String {
        self.value.clone().unwrap_or_default()
    }

    fn server_value(&self) -> ServerValue {
        ServerValue {
            selected_values: self.value.iter().cloned().collect(),
            ..ServerValue::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MultipleSelectAnnotation {
    base: AnnotationBase,
    pub values: Vec<String>,
    options_at_creation: Vec<String>,
}

impl MultipleSelectAnnotation {
    pub(crate) fn new(
        base: AnnotationBase,
        wire: &AnnotationWire,
        annotation_type: &AnnotationType,
    ) -> Self {
        Self {
            base,
            values: wire
                .selected_values
                .iter()
                .map(|sv| sv.value.clone())
                .collect(),
            options_at_creation: annotation_type.options.clone(),
        }
    }

    pub fn some_selected(&self) -> bool {
        !self.values.is_empty()
    }
}

impl AnnotationVariant for MultipleSelectAnnotation {
    fn base(&self) -> &AnnotationBase {
        &self.base
    }

    fn has_value(&self) -> bool {
        self.some_selected()
    }

    fn display_value(&self) -> String {
        self.values.join(", ")
    }

    fn server_value(&self) -> ServerValue {
        ServerValue {
            selected_values: self.values.clone(),
            ..ServerValue::default()
        }
    }
}

/// A value for [`Annotation::set_value`]; its kind must match the annotation's variant.
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationValue {
    Text(Option<String>),
    Number(Option<String>),
    DateTime(Option<DateTime<Utc>>),
    SingleSelect(Option<String>),
    MultipleSelect(Vec<String>),
}

/// An annotation of one of the five value kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Text(TextAnnotation),
    Number(NumberAnnotation),
    DateTime(DateTimeAnnotation),
    SingleSelect(SingleSelectAnnotation),
    MultipleSelect(MultipleSelectAnnotation),
}

impl Annotation {
    fn variant(&self) -> &dyn AnnotationVariant {
        match self {
            Annotation::Text(a) => a,
            Annotation::Number(a) => a,
            Annotation::DateTime(a) => a,
            Annotation::SingleSelect(a) => a,
            Annotation::MultipleSelect(a) => a,
        }
    }

    pub fn annotation_type_id(&self) -> &str {
        self.variant().base().annotation_type_id()
    }

    pub fn value_type(&self) -> AnnotationValueType {
        self.variant().base().value_type()
    }

    pub fn required(&self) -> bool {
        self.variant().base().required()
    }

    /// The annotation type's name, looked up in `annotation_types`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AnnotationTypeNotFound`] if the registry lacks this annotation's
    /// type.
    pub fn label<'a>(&self, annotation_types: &'a AnnotationTypeSet) -> CoreResult<&'a str> {
        let id = self.annotation_type_id();
        annotation_types
            .get(id)
            .map(|at| at.name.as_str())
            .map_err(|_| CoreError::AnnotationTypeNotFound(id.to_string()))
    }

    /// Soft validity: never an error, and reading it never changes the annotation.
    pub fn is_value_valid(&self) -> bool {
        self.variant().is_value_valid()
    }

    pub fn display_value(&self) -> String {
        self.variant().display_value()
    }

    /// Replaces the value without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StructuralMisuse`] if `value` is of a different kind than this
    /// annotation.
    pub fn set_value(&mut self, value: AnnotationValue) -> CoreResult<()> {
        match (self, value) {
            (Annotation::Text(a), AnnotationValue::Text(v)) => a.value = v,
            (Annotation::Number(a), AnnotationValue::Number(v)) => a.value = v,
            (Annotation::DateTime(a), AnnotationValue::DateTime(v)) => {
                a.value = v.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            (Annotation::SingleSelect(a), AnnotationValue::SingleSelect(v)) => a.value = v,
            (Annotation::MultipleSelect(a), AnnotationValue::MultipleSelect(v)) => a.values = v,
            (annotation, value) => {
                return Err(CoreError::StructuralMisuse(format!(
                    "value kind mismatch: {} annotation given {value:?}",
                    annotation.value_type()
                )));
            }
        }
        Ok(())
    }

    /// Checks a select annotation's selections against `annotation_type`'s options.
    ///
    /// Which option list is used depends on [`CoreConfig::option_check`]. Non-select
    /// annotations have nothing to check and return `true`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StructuralMisuse`] if `annotation_type` is not this annotation's
    /// type.
    pub fn validate_selections(
        &self,
        annotation_type: &AnnotationType,
        config: &CoreConfig,
    ) -> CoreResult<bool> {
        if annotation_type.id != self.annotation_type_id() {
            return Err(CoreError::StructuralMisuse(format!(
                "annotation type {} does not belong to annotation for {}",
                annotation_type.id,
                self.annotation_type_id()
            )));
        }

        let (selected, at_creation) = match self {
            Annotation::SingleSelect(a) => (a.value.as_slice(), a.options_at_creation.as_slice()),
            Annotation::MultipleSelect(a) => {
                (a.values.as_slice(), a.options_at_creation.as_slice())
            }
            _ => return Ok(true),
        };

        let ok = match config.option_check() {
            OptionCheck::CurrentOptions => annotation_type.valid_options(selected),
            OptionCheck::OptionsAtCreation => contains_all(at_creation, selected),
        };
        Ok(ok)
    }

    /// Renders this annotation in the server's object shape, for REST command payloads.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if JSON conversion fails.
    pub fn server_annotation(&self) -> CoreResult<Value> {
        let annotation_type_id = self.annotation_type_id().to_string();
        let value = self.variant().server_value();
        let wire = AnnotationWire {
            selected_values: value
                .selected_values
                .into_iter()
                .map(|value| SelectedValueWire {
                    annotation_type_id: annotation_type_id.clone(),
                    value,
                })
                .collect(),
            annotation_type_id,
            string_value: value.string_value,
            number_value: value.number_value,
        };
        serde_json::to_value(wire).map_err(CoreError::Serialization)
    }
}

// ============================================================================
// Wire types (crate-internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotationWire {
    pub annotation_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_value: Option<String>,
    pub selected_values: Vec<SelectedValueWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SelectedValueWire {
    pub annotation_type_id: String,
    pub value: String,
}
