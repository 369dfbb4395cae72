//! Test data builders for registration forms.
//!
//! Provides a builder for `/save` request bodies with sensible defaults and
//! per-field control, including the incomplete shapes the endpoint must
//! reject.

use serde_json::{json, Map, Value};

/// Builder for registration form request bodies.
///
/// Unset fields are omitted from the JSON object entirely, which is how a
/// client leaves a field out. For null or otherwise malformed values,
/// construct the body with `serde_json::json!` directly.
pub struct FormBuilder {
    inputname: Option<Value>,
    inputage: Option<Value>,
    inputgender: Option<Value>,
    inputcourse: Option<Value>,
    inputemail: Option<Value>,
}

impl FormBuilder {
    /// Creates a builder with no fields set.
    pub fn new() -> Self {
        Self {
            inputname: None,
            inputage: None,
            inputgender: None,
            inputcourse: None,
            inputemail: None,
        }
    }

    /// Creates a builder with a complete, valid form.
    pub fn with_defaults() -> Self {
        Self {
            inputname: Some(json!("Test Student")),
            inputage: Some(json!("21")),
            inputgender: Some(json!("other")),
            inputcourse: Some(json!("Computer Science")),
            inputemail: Some(json!("student@example.com")),
        }
    }

    /// Sets the name field.
    #[must_use]
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.inputname = Some(Value::String(value.into()));
        self
    }

    /// Sets the age field as a string.
    #[must_use]
    pub fn age(mut self, value: impl Into<String>) -> Self {
        self.inputage = Some(Value::String(value.into()));
        self
    }

    /// Sets the age field as a JSON number.
    #[must_use]
    pub fn age_number(mut self, value: i64) -> Self {
        self.inputage = Some(json!(value));
        self
    }

    /// Sets the gender field.
    #[must_use]
    pub fn gender(mut self, value: impl Into<String>) -> Self {
        self.inputgender = Some(Value::String(value.into()));
        self
    }

    /// Sets the course field.
    #[must_use]
    pub fn course(mut self, value: impl Into<String>) -> Self {
        self.inputcourse = Some(Value::String(value.into()));
        self
    }

    /// Sets the email field.
    #[must_use]
    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.inputemail = Some(Value::String(value.into()));
        self
    }

    /// Removes the name field from the body.
    #[must_use]
    pub fn omit_name(mut self) -> Self {
        self.inputname = None;
        self
    }

    /// Removes the age field from the body.
    #[must_use]
    pub fn omit_age(mut self) -> Self {
        self.inputage = None;
        self
    }

    /// Removes the gender field from the body.
    #[must_use]
    pub fn omit_gender(mut self) -> Self {
        self.inputgender = None;
        self
    }

    /// Removes the course field from the body.
    #[must_use]
    pub fn omit_course(mut self) -> Self {
        self.inputcourse = None;
        self
    }

    /// Removes the email field from the body.
    #[must_use]
    pub fn omit_email(mut self) -> Self {
        self.inputemail = None;
        self
    }

    /// Builds the JSON body, omitting unset fields.
    pub fn build(self) -> Value {
        let mut body = Map::new();
        if let Some(v) = self.inputname {
            body.insert("inputname".to_string(), v);
        }
        if let Some(v) = self.inputage {
            body.insert("inputage".to_string(), v);
        }
        if let Some(v) = self.inputgender {
            body.insert("inputgender".to_string(), v);
        }
        if let Some(v) = self.inputcourse {
            body.insert("inputcourse".to_string(), v);
        }
        if let Some(v) = self.inputemail {
            body.insert("inputemail".to_string(), v);
        }
        Value::Object(body)
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}
