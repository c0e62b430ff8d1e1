//! Service layer for subscription records.
//! - `subscription::repository` is the storage contract, `repo::seaorm` the PostgreSQL implementation.
//! - `subscription::service` is the façade the HTTP layer talks to.
//! - Errors are a closed set of kinds (`errors::ErrorKind`).

pub mod errors;
pub mod subscription;
#[cfg(test)]
pub mod test_support;
