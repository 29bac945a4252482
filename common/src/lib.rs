//! Types shared by the gateway and its tooling: the holiday calendar, the
//! pinned feature schemas and the classifier label tables.

pub mod calendar;
pub mod labels;
pub mod schema;
