//! Live object-count subscription.
//!
//! A background worker owns the broker connection and is the sole writer
//! of the latest count; request handlers only ever read it. The worker is
//! started at process init and has no stop signal: it lives until the
//! process exits.

mod auth;
mod error;
mod worker;

pub use auth::CognitoClient;
pub use error::SubscriberError;
pub use worker::{run, spawn};
