//! Annotation types: the schema of a single custom field.
//!
//! An annotation type names a field a study attaches to participants, collection events or
//! specimen links, and fixes the kind of value it holds. Select types also carry the list of
//! permitted options and whether one or several may be chosen.
//!
//! Annotation types are built from server objects with [`AnnotationType::create`] and then
//! edited in place by the UI before being sent back with
//! [`AnnotationType::server_annotation_type`].

use crate::constants::{ANNOTATION_TYPE_REQUIRED, SELECT_MULTIPLE, SELECT_SINGLE};
use crate::entity::{Entity, Schema};
use crate::{CoreError, CoreResult};
use bbweb_types::{NonEmptyText, Slug};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const SCHEMA: Schema = Schema::new("AnnotationType", ANNOTATION_TYPE_REQUIRED);

/// The kind of value an annotation holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationValueType {
    Text,
    Number,
    DateTime,
    Select,
}

impl fmt::Display for AnnotationValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnnotationValueType::Text => "Text",
            AnnotationValueType::Number => "Number",
            AnnotationValueType::DateTime => "DateTime",
            AnnotationValueType::Select => "Select",
        };
        f.write_str(s)
    }
}

/// How many options a select annotation may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectCardinality {
    Single,
    Multiple,
}

impl SelectCardinality {
    /// Resolves a `maxValueCount`; `None` when it is neither single nor multiple.
    pub fn from_max_value_count(count: Option<u32>) -> Option<Self> {
        match count {
            Some(SELECT_SINGLE) => Some(SelectCardinality::Single),
            Some(n) if n >= SELECT_MULTIPLE => Some(SelectCardinality::Multiple),
            _ => None,
        }
    }

    pub fn max_value_count(self) -> u32 {
        match self {
            SelectCardinality::Single => SELECT_SINGLE,
            SelectCardinality::Multiple => SELECT_MULTIPLE,
        }
    }
}

/// Schema descriptor of one custom field.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationType {
    /// Server-assigned identity; empty for a type that has not been saved yet.
    pub id: String,
    pub slug: Slug,
    pub name: NonEmptyText,
    pub description: Option<String>,
    pub value_type: AnnotationValueType,
    /// `None` is the NONE sentinel; only meaningful for select types.
    pub max_value_count: Option<u32>,
    pub options: Vec<String>,
    pub required: bool,
}

impl AnnotationType {
    /// Builds an annotation type from a server object.
    ///
    /// This is the only construction path for server-sourced data. A `maxValueCount` of `0`
    /// is read as NONE.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if a required property (`id`, `slug`, `name`,
    /// `valueType`, `required`) is missing or any property has the wrong type.
    pub fn create(obj: &Value) -> CoreResult<Self> {
        let wire: AnnotationTypeWire = SCHEMA.parse(obj)?;
        Ok(wire.into())
    }

    pub fn is_value_type_text(&self) -> bool {
        self.value_type == AnnotationValueType::Text
    }

    pub fn is_value_type_number(&self) -> bool {
        self.value_type == AnnotationValueType::Number
    }

    pub fn is_value_type_date_time(&self) -> bool {
        self.value_type == AnnotationValueType::DateTime
    }

    pub fn is_value_type_select(&self) -> bool {
        self.value_type == AnnotationValueType::Select
    }

    /// Cardinality of a select type; `None` for other value types or an unset count.
    pub fn select_cardinality(&self) -> Option<SelectCardinality> {
        if !self.is_value_type_select() {
            return None;
        }
        SelectCardinality::from_max_value_count(self.max_value_count)
    }

    pub fn is_single_select(&self) -> bool {
        self.select_cardinality() == Some(SelectCardinality::Single)
    }

    pub fn is_multiple_select(&self) -> bool {
        self.select_cardinality() == Some(SelectCardinality::Multiple)
    }

    /// Whether `max_value_count` agrees with the value type. Used to gate form submission.
    pub fn is_max_value_count_valid(&self) -> bool {
        if self.is_value_type_select() {
            self.select_cardinality().is_some()
        } else {
            self.max_value_count.is_none()
        }
    }

    pub fn set_value_type(&mut self, value_type: AnnotationValueType) {
        self.value_type = value_type;
    }

    pub fn set_select_cardinality(&mut self, cardinality: SelectCardinality) {
        self.max_value_count = Some(cardinality.max_value_count());
    }

    /// Call after `value_type` changes: options previously entered no longer apply.
    ///
    /// Clears `options`, and resets `max_value_count` to NONE unless the type is still select.
    pub fn value_type_changed(&mut self) {
        if !self.is_value_type_select() {
            self.max_value_count = None;
        }
        self.options.clear();
    }

    /// Returns a copy switched to `value_type`, with [`value_type_changed`] applied.
    ///
    /// [`value_type_changed`]: AnnotationType::value_type_changed
    #[must_use]
    pub fn with_value_type(&self, value_type: AnnotationValueType) -> Self {
        let mut next = self.clone();
        next.set_value_type(value_type);
        next.value_type_changed();
        next
    }

    /// Appends an empty placeholder option for the UI to fill in.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StructuralMisuse`] if the value type is not select.
    pub fn add_option(&mut self) -> CoreResult<()> {
        if !self.is_value_type_select() {
            return Err(CoreError::StructuralMisuse(format!(
                "value type is not select: {}",
                self.value_type
            )));
        }
        self.options.push(String::new());
        Ok(())
    }

    /// Removes and returns the option at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StructuralMisuse`] if one option or fewer remain, or if `index` is
    /// out of range.
    pub fn remove_option(&mut self, index: usize) -> CoreResult<String> {
        if self.options.len() <= 1 {
            return Err(CoreError::StructuralMisuse(
                "cannot remove last option".into(),
            ));
        }
        if index >= self.options.len() {
            return Err(CoreError::StructuralMisuse(format!(
                "option index out of range: {index} (have {})",
                self.options.len()
            )));
        }
        Ok(self.options.remove(index))
    }

    /// True when every candidate is one of this type's current options.
    pub fn valid_options<S: AsRef<str>>(&self, candidates: &[S]) -> bool {
        contains_all(&self.options, candidates)
    }

    /// Renders this annotation type in the server's object shape.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if JSON conversion fails.
    pub fn server_annotation_type(&self) -> CoreResult<Value> {
        serde_json::to_value(AnnotationTypeWire::from(self)).map_err(CoreError::Serialization)
    }
}

impl Entity for AnnotationType {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

pub(crate) fn contains_all<S: AsRef<str>>(options: &[String], candidates: &[S]) -> bool {
    candidates
        .iter()
        .all(|c| options.iter().any(|o| o == c.as_ref()))
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotationTypeWire {
    id: String,
    slug: Slug,
    name: NonEmptyText,
    #[serde(default)]
    description: Option<String>,
    value_type: AnnotationValueType,
    #[serde(default)]
    max_value_count: Option<u32>,
    #[serde(default)]
    options: Vec<String>,
    required: bool,
}

impl From<AnnotationTypeWire> for AnnotationType {
    fn from(wire: AnnotationTypeWire) -> Self {
        Self {
            id: wire.id,
            slug: wire.slug,
            name: wire.name,
            description: wire.description,
            value_type: wire.value_type,
            max_value_count: wire.max_value_count.filter(|count| *count > 0),
            options: wire.options,
            required: wire.required,
        }
    }
}

impl From<&AnnotationType> for AnnotationTypeWire {
    fn from(at: &AnnotationType) -> Self {
        Self {
            id: at.id.clone(),
            slug: at.slug.clone(),
            name: at.name.clone(),
            description: at.description.clone(),
            value_type: at.value_type,
            max_value_count: at.max_value_count,
            options: at.options.clone(),
            required: at.required,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn colour_json() -> Value {
        json!({
            "id": "1",
            "slug": "x",
            "name": "Colour",
            "valueType": "Select",
            "maxValueCount": 1,
            "options": ["Red", "Blue"],
            "required": true
        })
    }

    pub(crate) fn annotation_type_of(
        value_type: &str,
        max_value_count: Option<u32>,
    ) -> AnnotationType {
        let options = if value_type == "Select" {
            json!(["a", "b", "c"])
        } else {
            json!([])
        };
        AnnotationType::create(&json!({
            "id": format!("at-{}", value_type.to_lowercase()),
            "slug": "field",
            "name": format!("{value_type} field"),
            "valueType": value_type,
            "maxValueCount": max_value_count,
            "options": options,
            "required": true
        }))
        .expect("fixture should be valid")
    }

    #[test]
    fn create_copies_every_field() {
        let obj = json!({
            "id": "abc",
            "slug": "hair_colour",
            "name": " Hair colour ",
            "description": "Colour of the participant's hair",
            "valueType": "Select",
            "maxValueCount": 2,
            "options": ["Brown", "Black", "Red"],
            "required": false
        });

        let at = AnnotationType::create(&obj).expect("should create");
        assert_eq!(at.id, "abc");
        assert_eq!(at.slug.as_str(), "hair_colour");
        assert_eq!(at.name.as_str(), " Hair colour ");
        assert_eq!(
            at.description.as_deref(),
            Some("Colour of the participant's hair")
        );
        assert_eq!(at.value_type, AnnotationValueType::Select);
        assert_eq!(at.max_value_count, Some(2));
        assert_eq!(at.options, vec!["Brown", "Black", "Red"]);
        assert!(!at.required);

        let rendered = at.server_annotation_type().expect("should render");
        assert_eq!(rendered, obj);
    }

    #[test]
    fn create_accepts_server_slug_forms() {
        for slug in ["blood_type", "Blood-Type"] {
            let obj = json!({
                "id": "1",
                "slug": slug,
                "name": "Blood type",
                "valueType": "Text",
                "required": false
            });
            let at = AnnotationType::create(&obj).expect("should create");
            assert_eq!(at.slug.as_str(), slug);

            let rendered = at.server_annotation_type().expect("should render");
            assert_eq!(rendered["slug"], json!(slug));
            assert_eq!(rendered["name"], json!("Blood type"));
        }
    }

    #[test]
    fn create_rejects_each_missing_required_property() {
        for property in ANNOTATION_TYPE_REQUIRED {
            let mut obj = colour_json();
            obj.as_object_mut().expect("object").remove(*property);

            let err = AnnotationType::create(&obj).expect_err("should reject");
            assert!(
                matches!(&err, CoreError::Validation(msg) if msg == &format!("Missing required property: {property}")),
                "unexpected error for {property}: {err:?}"
            );
        }
    }

    #[test]
    fn create_rejects_unknown_value_type() {
        let mut obj = colour_json();
        obj["valueType"] = json!("Colour");
        let err = AnnotationType::create(&obj).expect_err("should reject");
        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("valueType")));
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut obj = colour_json();
        obj["name"] = json!("   ");
        let err = AnnotationType::create(&obj).expect_err("should reject");
        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("name")));
    }

    #[test]
    fn zero_max_value_count_reads_as_none() {
        let mut obj = colour_json();
        obj["valueType"] = json!("Text");
        obj["maxValueCount"] = json!(0);
        obj["options"] = json!([]);
        let at = AnnotationType::create(&obj).expect("should create");
        assert_eq!(at.max_value_count, None);
        assert!(at.is_max_value_count_valid());
    }

    #[test]
    fn value_type_predicates() {
        let text = annotation_type_of("Text", None);
        assert!(text.is_value_type_text());
        assert!(!text.is_value_type_select());
        assert!(annotation_type_of("Number", None).is_value_type_number());
        assert!(annotation_type_of("DateTime", None).is_value_type_date_time());
        assert!(annotation_type_of("Select", Some(1)).is_value_type_select());
    }

    #[test]
    fn select_cardinality_predicates() {
        let single = annotation_type_of("Select", Some(1));
        assert!(single.is_single_select());
        assert!(!single.is_multiple_select());

        let multiple = annotation_type_of("Select", Some(3));
        assert!(multiple.is_multiple_select());
        assert!(!multiple.is_single_select());

        let unset = annotation_type_of("Select", None);
        assert!(!unset.is_single_select());
        assert!(!unset.is_multiple_select());

        let text = annotation_type_of("Text", Some(1));
        assert!(!text.is_single_select());
    }

    #[test]
    fn max_value_count_validity() {
        assert!(annotation_type_of("Select", Some(1)).is_max_value_count_valid());
        assert!(annotation_type_of("Select", Some(2)).is_max_value_count_valid());
        assert!(!annotation_type_of("Select", None).is_max_value_count_valid());
        assert!(annotation_type_of("Text", None).is_max_value_count_valid());
        assert!(!annotation_type_of("Number", Some(1)).is_max_value_count_valid());
    }

    #[test]
    fn add_option_only_for_select() {
        let mut text = annotation_type_of("Text", None);
        let err = text.add_option().expect_err("text has no options");
        assert!(matches!(err, CoreError::StructuralMisuse(msg) if msg.contains("not select")));

        let mut select = annotation_type_of("Select", Some(1));
        select.add_option().expect("select accepts options");
        assert_eq!(select.options, vec!["a", "b", "c", ""]);
    }

    #[test]
    fn remove_option_protects_last_option() {
        let mut select = annotation_type_of("Select", Some(1));
        assert_eq!(select.remove_option(0).expect("first removal"), "a");
        assert_eq!(select.remove_option(0).expect("second removal"), "b");
        assert_eq!(select.options, vec!["c"]);

        let err = select.remove_option(0).expect_err("last option");
        assert!(
            matches!(err, CoreError::StructuralMisuse(msg) if msg == "cannot remove last option")
        );
        assert_eq!(select.options.len(), 1);
    }

    #[test]
    fn remove_option_rejects_out_of_range_index() {
        let mut select = annotation_type_of("Select", Some(1));
        let err = select.remove_option(3).expect_err("out of range");
        assert!(matches!(err, CoreError::StructuralMisuse(msg) if msg.contains("out of range")));
        assert_eq!(select.options.len(), 3);
    }

    #[test]
    fn colour_example_leaves_one_option() {
        let mut at = AnnotationType::create(&colour_json()).expect("should create");
        assert!(at.is_single_select());
        assert!(at.is_max_value_count_valid());

        at.remove_option(0).expect("first removal");
        assert_eq!(at.options, vec!["Blue"]);
        assert!(at.remove_option(0).is_err());
    }

    #[test]
    fn value_type_changed_resets_select_state() {
        let mut at = AnnotationType::create(&colour_json()).expect("should create");
        at.set_value_type(AnnotationValueType::Text);
        at.value_type_changed();
        assert!(at.options.is_empty());
        assert_eq!(at.max_value_count, None);
    }

    #[test]
    fn value_type_changed_keeps_count_while_select() {
        let mut at = AnnotationType::create(&colour_json()).expect("should create");
        at.value_type_changed();
        assert!(at.options.is_empty());
        assert_eq!(at.max_value_count, Some(1));
    }

    #[test]
    fn with_value_type_leaves_original_untouched() {
        let at = AnnotationType::create(&colour_json()).expect("should create");
        let number = at.with_value_type(AnnotationValueType::Number);

        assert!(number.is_value_type_number());
        assert!(number.options.is_empty());
        assert_eq!(number.max_value_count, None);

        assert!(at.is_single_select());
        assert_eq!(at.options, vec!["Red", "Blue"]);
    }

    #[test]
    fn set_select_cardinality_writes_sentinel() {
        let mut at = annotation_type_of("Select", None);
        at.set_select_cardinality(SelectCardinality::Multiple);
        assert_eq!(at.max_value_count, Some(SELECT_MULTIPLE));
        assert!(at.is_multiple_select());
    }

    #[test]
    fn valid_options_uses_exact_membership() {
        let at = AnnotationType::create(&colour_json()).expect("should create");
        assert!(at.valid_options(&["Red"]));
        assert!(at.valid_options(&["Blue", "Red"]));
        assert!(at.valid_options::<&str>(&[]));
        assert!(!at.valid_options(&["red"]));
        assert!(!at.valid_options(&["Red", "Green"]));
    }
}
