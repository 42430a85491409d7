//! Shared entity capability: identity and schema validation of server objects.
//!
//! Every domain object built from server JSON goes through a [`Schema`]: first the required
//! properties are checked for presence, then the object is deserialised into its wire struct.
//! Deserialisation uses `serde_path_to_error` so a type mismatch names the failing field
//! (e.g. `options[1]`).

use crate::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// An entity with a server-assigned identity, usable as the target of a data set lookup.
pub trait Entity: Clone + std::fmt::Debug + PartialEq {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// Schema of a server object: a name for messages and the properties that must be present.
#[derive(Clone, Copy, Debug)]
pub struct Schema {
    pub name: &'static str,
    pub required: &'static [&'static str],
}

impl Schema {
    pub const fn new(name: &'static str, required: &'static [&'static str]) -> Self {
        Self { name, required }
    }

    /// Checks that `obj` is a JSON object carrying every required property.
    ///
    /// A property explicitly set to `null` counts as present; its type is checked by
    /// [`Schema::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] naming the first missing property.
    pub fn check(&self, obj: &Value) -> CoreResult<()> {
        let Some(map) = obj.as_object() else {
            return Err(self.reject(format!("Invalid type: expected object for {}", self.name)));
        };

        if let Some(missing) = self.required.iter().find(|p| !map.contains_key(**p)) {
            return Err(self.reject(format!("Missing required property: {missing}")));
        }

        Ok(())
    }

    /// Checks required properties, then deserialises `obj` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if a property is missing or has the wrong type.
    pub fn parse<T: DeserializeOwned>(&self, obj: &Value) -> CoreResult<T> {
        self.check(obj)?;

        match serde_path_to_error::deserialize::<_, T>(obj) {
            Ok(parsed) => Ok(parsed),
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                Err(self.reject(format!(
                    "{} schema mismatch at {path}: {source}",
                    self.name
                )))
            }
        }
    }

    fn reject(&self, message: String) -> CoreError {
        tracing::debug!(schema = self.name, %message, "server object rejected");
        CoreError::Validation(message)
    }
}
