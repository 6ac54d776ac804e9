//! Persistence for the service.
//!
//! - [`ReportStore`]: the JSON report written after every live cycle and the
//!   canned demo payload
//! - [`FacebookSettings`]: the cached credential file
//! - [`SettingsDatabase`]: the Postgres table the credential file is
//!   populated from

mod files;
mod postgres;

pub use files::*;
pub use postgres::SettingsDatabase;
