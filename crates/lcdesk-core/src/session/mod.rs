//! Session domain types: one session per Letter-of-Credit transaction.

pub mod model;

pub use model::{CustomerRecord, NewSession, Session, SessionStatus};
