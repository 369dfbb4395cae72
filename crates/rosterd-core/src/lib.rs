//! Core domain types and business logic for rosterd registration intake.
//!
//! This crate owns everything below the HTTP surface: the wire form and its
//! validation, the error taxonomy, the `users` repository, and the time
//! abstraction. It knows nothing about routers or status codes; the API
//! crate maps [`CoreError`] values onto the fixed response bodies.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;
pub mod time;

pub use error::{CoreError, Result};
pub use models::{NewUser, RegistrationForm, UserId, UserRecord};
pub use time::{Clock, RealClock, TestClock};
