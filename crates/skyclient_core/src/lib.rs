//! Core of the skyclient service-client library.
//! Holds the service models, the XML response unmarshallers and the
//! identity service contract.

pub mod cognito;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod transform;

pub use cognito::{
    CognitoIdentity, CognitoIdentityError, CognitoResult, ErrorKind, LocalCognitoIdentity,
    Operation,
};
pub use config::{ClientConfiguration, ConfigError, Endpoint, Protocol};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::metadata::ResponseMetadata;
pub use model::scaling_policy::{Alarm, DescribePoliciesResult, ScalingPolicy, StepAdjustment};
pub use model::storage_location::CreateStorageLocationResult;
pub use service::identity_service::IdentityService;
pub use transform::{unmarshall_str, StaxContext, UnmarshallError, Unmarshaller, XmlEvent};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
