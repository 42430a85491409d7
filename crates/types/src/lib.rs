//! Validated primitive types shared by the bbweb crates.
//!
//! Server objects carry plain strings. The types here are the ones the domain layer relies on
//! being well formed once constructed: entity names that are never blank, and slugs that fit
//! in a single URL path segment.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The slug contained whitespace or a '/'
    #[error("slug contains invalid characters (whitespace and '/' not allowed): {0}")]
    SlugInvalidCharacters(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is stored exactly as given, so a value read from the server is written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns an error if the input is empty or only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let raw = input.as_ref();
        if raw.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// An identity string assigned by the server (for example `colour_of_hair`).
///
/// The server owns the slug format, so only what would break a URL path segment is rejected:
/// an empty slug, whitespace, or a `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let raw = input.as_ref();
        if raw.is_empty() {
            return Err(TextError::Empty);
        }

        if raw.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(TextError::SlugInvalidCharacters(raw.to_owned()));
        }

        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for Slug {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Slug::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_keeps_input_verbatim() {
        let text = NonEmptyText::new("  Colour  ").expect("should accept padded text");
        assert_eq!(text.as_str(), "  Colour  ");
    }

    #[test]
    fn non_empty_text_rejects_whitespace_only() {
        let err = NonEmptyText::new(" \t ").expect_err("should reject whitespace");
        assert_eq!(err, TextError::Empty);
    }

    #[test]
    fn slug_accepts_server_slugs() {
        for raw in ["hair-colour-2", "blood_type", "Blood-Type", "a"] {
            let slug = Slug::new(raw).expect("should accept server slug");
            assert_eq!(slug.as_str(), raw);
        }
    }

    #[test]
    fn slug_rejects_bad_input() {
        assert_eq!(Slug::new("").expect_err("empty"), TextError::Empty);
        assert!(matches!(
            Slug::new("Hair Colour").expect_err("space"),
            TextError::SlugInvalidCharacters(_)
        ));
        assert!(matches!(
            Slug::new("hair/colour").expect_err("slash"),
            TextError::SlugInvalidCharacters(_)
        ));
    }

    #[test]
    fn deserialize_enforces_validation() {
        let ok: NonEmptyText = serde_json::from_str("\"Blood\"").expect("valid text");
        assert_eq!(ok.as_str(), "Blood");

        let err = serde_json::from_str::<Slug>("\"not a slug\"").expect_err("invalid slug");
        assert!(err.to_string().contains("invalid characters"));
    }
}
