//! Domain models for registration intake.
//!
//! The wire shape ([`RegistrationForm`]) keeps the legacy field names the
//! clients send (`inputname`, `inputage`, ...). Validation turns a form into
//! a [`NewUser`], which is the only thing the storage layer will accept, so
//! an unvalidated form cannot reach the database by construction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};

use crate::error::{CoreError, Result};

type PgDb = sqlx::Postgres;
type BoxDynError = sqlx::error::BoxDynError;
type EncodeResult = std::result::Result<sqlx::encode::IsNull, BoxDynError>;

/// Database-assigned identifier for a stored registration row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId(id)
    }
}

impl sqlx::Type<PgDb> for UserId {
    fn type_info() -> PgTypeInfo {
        <i64 as sqlx::Type<PgDb>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, PgDb> for UserId {
    fn decode(value: PgValueRef<'r>) -> std::result::Result<Self, BoxDynError> {
        let id = <i64 as sqlx::Decode<PgDb>>::decode(value)?;
        Ok(UserId(id))
    }
}

impl sqlx::Encode<'_, PgDb> for UserId {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> EncodeResult {
        <i64 as sqlx::Encode<PgDb>>::encode_by_ref(&self.0, buf)
    }
}

/// Raw sign-up form as clients post it.
///
/// Every field is optional at the wire level; presence is enforced by
/// [`NewUser::from_form`], not by deserialization, so a missing field
/// produces the fixed validation response instead of a framework error.
/// `inputage` accepts either a JSON string or a JSON number, since older
/// clients send ages unquoted. A numeric `0` is falsy under the wire
/// contract and counts as absent; the string `"0"` is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    /// Student name.
    #[serde(default)]
    pub inputname: Option<String>,
    /// Age, normalized to its decimal text form.
    #[serde(default, deserialize_with = "lenient_string")]
    pub inputage: Option<String>,
    /// Gender.
    #[serde(default)]
    pub inputgender: Option<String>,
    /// Course the student is enrolling in.
    #[serde(default)]
    pub inputcourse: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub inputemail: Option<String>,
}

/// Accepts a JSON string or number and yields its text form.
///
/// A numeric zero maps to `None`: the wire contract treats the number `0`
/// as falsy, while any non-empty string, `"0"` included, is truthy.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        StringOrNumber::Text(s) => Some(s),
        StringOrNumber::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        },
    }))
}

/// A fully validated registration, ready to insert.
///
/// All five fields are guaranteed present and non-empty. Values are carried
/// verbatim; no trimming, casing, or format checks happen here or anywhere
/// downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Student name.
    pub name: String,
    /// Age as submitted.
    pub age: String,
    /// Gender as submitted.
    pub gender: String,
    /// Course name.
    pub course: String,
    /// Contact email.
    pub email: String,
}

impl NewUser {
    /// Validates a raw form into an insertable registration.
    ///
    /// A field counts as present when it deserialized to a non-empty
    /// string. Whitespace-only values pass; this mirrors the intake rule
    /// that only absence is rejected, never format.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingFields`] if any of the five fields is
    /// absent, null, or empty (a numeric age of `0` deserializes as
    /// absent).
    pub fn from_form(form: RegistrationForm) -> Result<Self> {
        let name = present(form.inputname);
        let age = present(form.inputage);
        let gender = present(form.inputgender);
        let course = present(form.inputcourse);
        let email = present(form.inputemail);

        match (name, age, gender, course, email) {
            (Some(name), Some(age), Some(gender), Some(course), Some(email)) => {
                Ok(NewUser { name, age, gender, course, email })
            },
            _ => Err(CoreError::MissingFields),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// A registration row as stored, including database-assigned columns.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    /// Row identifier.
    pub id: UserId,
    /// Student name.
    #[sqlx(rename = "inputname")]
    pub name: String,
    /// Age text.
    #[sqlx(rename = "inputage")]
    pub age: String,
    /// Gender text.
    #[sqlx(rename = "inputgender")]
    pub gender: String,
    /// Course name.
    #[sqlx(rename = "inputcourse")]
    pub course: String,
    /// Contact email.
    #[sqlx(rename = "inputemail")]
    pub email: String,
    /// Insertion timestamp, assigned by the database.
    pub created_at: DateTime<Utc>,
}
