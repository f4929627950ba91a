//! Identity service (identity pools, identities, temporary credentials).
//!
//! # Responsibility
//! - Define the client contract, its request/result shapes and the faults
//!   each operation may return.
//! - Provide an in-process implementation of the contract.
//!
//! # Invariants
//! - Fault kinds and operation names match the service's wire names.
//! - Shapes are plain data; validation belongs to the service side.

pub mod client;
pub mod error;
pub mod local;
pub mod model;
pub mod operation;
pub mod validate;

pub use client::CognitoIdentity;
pub use error::{CognitoIdentityError, CognitoResult, ErrorKind};
pub use local::LocalCognitoIdentity;
pub use operation::Operation;
