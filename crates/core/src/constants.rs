//! Constants used throughout the bbweb core crate.
//!
//! Schema property names live here so the required-property lists and the wire structs agree.

/// Environment variable selecting how select annotations are re-validated.
pub const OPTION_CHECK_ENV_VAR: &str = "BBWEB_OPTION_CHECK";

/// `maxValueCount` of a single-select annotation type.
pub const SELECT_SINGLE: u32 = 1;

/// `maxValueCount` written when a type is switched to multiple-select.
///
/// Any count of two or more is read back as multiple-select.
pub const SELECT_MULTIPLE: u32 = 2;

/// Required properties of a server annotation type object.
pub const ANNOTATION_TYPE_REQUIRED: &[&str] = &["id", "slug", "name", "valueType", "required"];

/// Required properties of a server annotation object.
pub const ANNOTATION_REQUIRED: &[&str] = &["annotationTypeId", "selectedValues"];

/// Required properties of each entry in an annotation's `selectedValues`.
pub const SELECTED_VALUE_REQUIRED: &[&str] = &["annotationTypeId", "value"];

/// Required properties of a server specimen group object.
pub const SPECIMEN_GROUP_REQUIRED: &[&str] = &["id", "name", "units"];

/// Required properties of a specimen group data item.
pub const SPECIMEN_GROUP_DATA_REQUIRED: &[&str] = &["specimenGroupId", "maxCount", "amount"];

/// Required properties of an annotation type data item.
pub const ANNOTATION_TYPE_DATA_REQUIRED: &[&str] = &["annotationTypeId", "required"];
