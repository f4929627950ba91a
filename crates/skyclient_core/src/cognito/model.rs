//! Request and result shapes of the identity service.
//!
//! Shapes carry no local validation; constraints are enforced by whichever
//! service implementation receives them. Field names serialize in the
//! service's PascalCase wire form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Provider name to token (or app id) map used by login-bearing requests.
pub type Logins = BTreeMap<String, String>;

/// Role-type (`authenticated` / `unauthenticated`) to role ARN map.
pub type Roles = BTreeMap<String, String>;

pub const AUTHENTICATED_ROLE: &str = "authenticated";
pub const UNAUTHENTICATED_ROLE: &str = "unauthenticated";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateIdentityPoolRequest {
    pub identity_pool_name: String,
    pub allow_unauthenticated_identities: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub supported_login_providers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_provider_name: Option<String>,
    #[serde(
        rename = "OpenIdConnectProviderARNs",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub open_id_connect_provider_arns: Vec<String>,
}

impl CreateIdentityPoolRequest {
    pub fn new(identity_pool_name: impl Into<String>, allow_unauthenticated_identities: bool) -> Self {
        Self {
            identity_pool_name: identity_pool_name.into(),
            allow_unauthenticated_identities,
            ..Self::default()
        }
    }

    pub fn with_supported_login_provider(
        mut self,
        provider: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        self.supported_login_providers
            .insert(provider.into(), app_id.into());
        self
    }

    pub fn with_developer_provider_name(mut self, name: impl Into<String>) -> Self {
        self.developer_provider_name = Some(name.into());
        self
    }

    pub fn with_open_id_connect_provider_arn(mut self, arn: impl Into<String>) -> Self {
        self.open_id_connect_provider_arns.push(arn.into());
        self
    }
}

/// Full identity pool description; also the request of `UpdateIdentityPool`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityPool {
    pub identity_pool_id: String,
    pub identity_pool_name: String,
    pub allow_unauthenticated_identities: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub supported_login_providers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_provider_name: Option<String>,
    #[serde(
        rename = "OpenIdConnectProviderARNs",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub open_id_connect_provider_arns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityPoolShortDescription {
    pub identity_pool_id: String,
    pub identity_pool_name: String,
}

impl From<&IdentityPool> for IdentityPoolShortDescription {
    fn from(pool: &IdentityPool) -> Self {
        Self {
            identity_pool_id: pool.identity_pool_id.clone(),
            identity_pool_name: pool.identity_pool_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityPoolIdRequest {
    pub identity_pool_id: String,
}

impl IdentityPoolIdRequest {
    pub fn new(identity_pool_id: impl Into<String>) -> Self {
        Self {
            identity_pool_id: identity_pool_id.into(),
        }
    }
}

/// Request of `DeleteIdentityPool`.
pub type DeleteIdentityPoolRequest = IdentityPoolIdRequest;
/// Request of `DescribeIdentityPool`.
pub type DescribeIdentityPoolRequest = IdentityPoolIdRequest;
/// Request of `GetIdentityPoolRoles`.
pub type GetIdentityPoolRolesRequest = IdentityPoolIdRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteIdentitiesRequest {
    pub identity_ids_to_delete: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteErrorCode {
    AccessDenied,
    InternalServerError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnprocessedIdentityId {
    pub identity_id: String,
    pub error_code: DeleteErrorCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteIdentitiesResult {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unprocessed_identity_ids: Vec<UnprocessedIdentityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeIdentityRequest {
    pub identity_id: String,
}

impl DescribeIdentityRequest {
    pub fn new(identity_id: impl Into<String>) -> Self {
        Self {
            identity_id: identity_id.into(),
        }
    }
}

/// Identity summary. Dates are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityDescription {
    pub identity_id: String,
    #[serde(default)]
    pub logins: Vec<String>,
    pub creation_date: i64,
    pub last_modified_date: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetIdRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub identity_pool_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub logins: Logins,
}

impl GetIdRequest {
    pub fn new(identity_pool_id: impl Into<String>) -> Self {
        Self {
            identity_pool_id: identity_pool_id.into(),
            ..Self::default()
        }
    }

    pub fn with_login(mut self, provider: impl Into<String>, token: impl Into<String>) -> Self {
        self.logins.insert(provider.into(), token.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetIdResult {
    pub identity_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityLoginsRequest {
    pub identity_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub logins: Logins,
}

impl IdentityLoginsRequest {
    pub fn new(identity_id: impl Into<String>) -> Self {
        Self {
            identity_id: identity_id.into(),
            logins: Logins::new(),
        }
    }

    pub fn with_login(mut self, provider: impl Into<String>, token: impl Into<String>) -> Self {
        self.logins.insert(provider.into(), token.into());
        self
    }
}

/// Request of `GetCredentialsForIdentity`.
pub type GetCredentialsForIdentityRequest = IdentityLoginsRequest;
/// Request of `GetOpenIdToken`.
pub type GetOpenIdTokenRequest = IdentityLoginsRequest;

/// Temporary credentials. Expiration is epoch milliseconds.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_key: String,
    pub session_token: String,
    pub expiration: i64,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCredentialsForIdentityResult {
    pub identity_id: String,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetIdentityPoolRolesResult {
    pub identity_pool_id: String,
    #[serde(default)]
    pub roles: Roles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenIdTokenResult {
    pub identity_id: String,
    pub token: String,
}

/// Result of `GetOpenIdToken`.
pub type GetOpenIdTokenResult = OpenIdTokenResult;
/// Result of `GetOpenIdTokenForDeveloperIdentity`.
pub type GetOpenIdTokenForDeveloperIdentityResult = OpenIdTokenResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetOpenIdTokenForDeveloperIdentityRequest {
    pub identity_pool_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    pub logins: Logins,
    /// Token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_duration: Option<i64>,
}

impl GetOpenIdTokenForDeveloperIdentityRequest {
    pub fn new(identity_pool_id: impl Into<String>) -> Self {
        Self {
            identity_pool_id: identity_pool_id.into(),
            ..Self::default()
        }
    }

    pub fn with_login(mut self, provider: impl Into<String>, user: impl Into<String>) -> Self {
        self.logins.insert(provider.into(), user.into());
        self
    }

    pub fn with_identity_id(mut self, identity_id: impl Into<String>) -> Self {
        self.identity_id = Some(identity_id.into());
        self
    }

    pub fn with_token_duration(mut self, seconds: i64) -> Self {
        self.token_duration = Some(seconds);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListIdentitiesRequest {
    pub identity_pool_id: String,
    pub max_results: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ListIdentitiesRequest {
    pub fn new(identity_pool_id: impl Into<String>, max_results: i32) -> Self {
        Self {
            identity_pool_id: identity_pool_id.into(),
            max_results,
            next_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListIdentitiesResult {
    pub identity_pool_id: String,
    #[serde(default)]
    pub identities: Vec<IdentityDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListIdentityPoolsRequest {
    pub max_results: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ListIdentityPoolsRequest {
    pub fn new(max_results: i32) -> Self {
        Self {
            max_results,
            next_token: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListIdentityPoolsResult {
    #[serde(default)]
    pub identity_pools: Vec<IdentityPoolShortDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LookupDeveloperIdentityRequest {
    pub identity_pool_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_user_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LookupDeveloperIdentityResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub developer_user_identifier_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeDeveloperIdentitiesRequest {
    pub source_user_identifier: String,
    pub destination_user_identifier: String,
    pub developer_provider_name: String,
    pub identity_pool_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeDeveloperIdentitiesResult {
    pub identity_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetIdentityPoolRolesRequest {
    pub identity_pool_id: String,
    pub roles: Roles,
}

impl SetIdentityPoolRolesRequest {
    pub fn new(identity_pool_id: impl Into<String>) -> Self {
        Self {
            identity_pool_id: identity_pool_id.into(),
            roles: Roles::new(),
        }
    }

    pub fn with_role(mut self, role_type: impl Into<String>, role_arn: impl Into<String>) -> Self {
        self.roles.insert(role_type.into(), role_arn.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnlinkDeveloperIdentityRequest {
    pub identity_id: String,
    pub identity_pool_id: String,
    pub developer_provider_name: String,
    pub developer_user_identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnlinkIdentityRequest {
    pub identity_id: String,
    pub logins: Logins,
    pub logins_to_remove: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::{CreateIdentityPoolRequest, Credentials, GetIdRequest};

    #[test]
    fn requests_serialize_in_wire_case() {
        let request = CreateIdentityPoolRequest::new("Pool One", false)
            .with_supported_login_provider("graph.facebook.com", "7346241598935555")
            .with_open_id_connect_provider_arn("arn:aws:iam::123456789012:oidc-provider/example");
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["IdentityPoolName"], "Pool One");
        assert_eq!(json["AllowUnauthenticatedIdentities"], false);
        assert_eq!(
            json["SupportedLoginProviders"]["graph.facebook.com"],
            "7346241598935555"
        );
        assert!(json["OpenIdConnectProviderARNs"].is_array());
        assert!(json.get("DeveloperProviderName").is_none());
    }

    #[test]
    fn optional_fields_default_on_deserialize() {
        let request: GetIdRequest =
            serde_json::from_str(r#"{"IdentityPoolId":"us-east-1:abc"}"#).expect("deserialize");
        assert_eq!(request.identity_pool_id, "us-east-1:abc");
        assert!(request.account_id.is_none());
        assert!(request.logins.is_empty());
    }

    #[test]
    fn credentials_debug_hides_secrets() {
        let credentials = Credentials {
            access_key_id: "ASIAEXAMPLE".to_string(),
            secret_key: "super-secret".to_string(),
            session_token: "token-value-123".to_string(),
            expiration: 0,
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("ASIAEXAMPLE"));
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("token-value-123"));
    }
}
