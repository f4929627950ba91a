//! Identity service client contract.
//!
//! # Responsibility
//! - Declare every remote operation of the identity service with its
//!   request and result shapes.
//! - Carry the client-level members: endpoint/region selection, shutdown
//!   and per-operation response metadata.
//!
//! # Invariants
//! - Every operation fails only with the faults its [`Operation`] declares.
//! - Endpoint and region are changed through `&mut self`, so they are set
//!   before the client is shared across threads.

use crate::cognito::error::CognitoResult;
use crate::cognito::model::{
    CreateIdentityPoolRequest, DeleteIdentitiesRequest, DeleteIdentitiesResult,
    DeleteIdentityPoolRequest, DescribeIdentityPoolRequest, DescribeIdentityRequest,
    GetCredentialsForIdentityRequest, GetCredentialsForIdentityResult, GetIdRequest, GetIdResult,
    GetIdentityPoolRolesRequest, GetIdentityPoolRolesResult,
    GetOpenIdTokenForDeveloperIdentityRequest, GetOpenIdTokenForDeveloperIdentityResult,
    GetOpenIdTokenRequest, GetOpenIdTokenResult, IdentityDescription, IdentityPool,
    ListIdentitiesRequest, ListIdentitiesResult, ListIdentityPoolsRequest,
    ListIdentityPoolsResult, LookupDeveloperIdentityRequest, LookupDeveloperIdentityResult,
    MergeDeveloperIdentitiesRequest, MergeDeveloperIdentitiesResult, SetIdentityPoolRolesRequest,
    UnlinkDeveloperIdentityRequest, UnlinkIdentityRequest,
};
use crate::cognito::operation::Operation;
use crate::config::ConfigError;
use crate::model::metadata::ResponseMetadata;

/// Contract of an identity service client.
///
/// Identity pools hold identities; identities are anonymous or linked to
/// external logins or a developer user identifier, and receive temporary
/// credentials through the pool's roles.
pub trait CognitoIdentity: Send + Sync {
    /// Overrides the service endpoint. Accepts a bare host or a full URL.
    fn set_endpoint(&mut self, endpoint: &str) -> Result<(), ConfigError>;

    /// Selects the region and derives the regional endpoint from it.
    fn set_region(&mut self, region: &str) -> Result<(), ConfigError>;

    /// Creates a new identity pool for the account.
    fn create_identity_pool(&self, request: &CreateIdentityPoolRequest)
        -> CognitoResult<IdentityPool>;

    /// Deletes identities from a pool (1-60 per call).
    fn delete_identities(
        &self,
        request: &DeleteIdentitiesRequest,
    ) -> CognitoResult<DeleteIdentitiesResult>;

    /// Deletes a pool; its identities become unusable.
    fn delete_identity_pool(&self, request: &DeleteIdentityPoolRequest) -> CognitoResult<()>;

    fn describe_identity(&self, request: &DescribeIdentityRequest)
        -> CognitoResult<IdentityDescription>;

    fn describe_identity_pool(
        &self,
        request: &DescribeIdentityPoolRequest,
    ) -> CognitoResult<IdentityPool>;

    /// Returns temporary credentials for an identity through the pool's
    /// role for the identity's kind.
    fn get_credentials_for_identity(
        &self,
        request: &GetCredentialsForIdentityRequest,
    ) -> CognitoResult<GetCredentialsForIdentityResult>;

    /// Resolves (or creates) the identity for a set of logins.
    fn get_id(&self, request: &GetIdRequest) -> CognitoResult<GetIdResult>;

    fn get_identity_pool_roles(
        &self,
        request: &GetIdentityPoolRolesRequest,
    ) -> CognitoResult<GetIdentityPoolRolesResult>;

    /// Issues an OpenID token for an identity. Supplying new logins links
    /// them implicitly.
    fn get_open_id_token(
        &self,
        request: &GetOpenIdTokenRequest,
    ) -> CognitoResult<GetOpenIdTokenResult>;

    /// Registers (or looks up) a developer-authenticated identity and issues
    /// an OpenID token for it.
    fn get_open_id_token_for_developer_identity(
        &self,
        request: &GetOpenIdTokenForDeveloperIdentityRequest,
    ) -> CognitoResult<GetOpenIdTokenForDeveloperIdentityResult>;

    fn list_identities(&self, request: &ListIdentitiesRequest)
        -> CognitoResult<ListIdentitiesResult>;

    fn list_identity_pools(
        &self,
        request: &ListIdentityPoolsRequest,
    ) -> CognitoResult<ListIdentityPoolsResult>;

    fn lookup_developer_identity(
        &self,
        request: &LookupDeveloperIdentityRequest,
    ) -> CognitoResult<LookupDeveloperIdentityResult>;

    /// Merges the identity of the source user into the identity of the
    /// destination user.
    fn merge_developer_identities(
        &self,
        request: &MergeDeveloperIdentitiesRequest,
    ) -> CognitoResult<MergeDeveloperIdentitiesResult>;

    fn set_identity_pool_roles(&self, request: &SetIdentityPoolRolesRequest) -> CognitoResult<()>;

    fn unlink_developer_identity(&self, request: &UnlinkDeveloperIdentityRequest)
        -> CognitoResult<()>;

    fn unlink_identity(&self, request: &UnlinkIdentityRequest) -> CognitoResult<()>;

    fn update_identity_pool(&self, request: &IdentityPool) -> CognitoResult<IdentityPool>;

    /// Releases client resources. Subsequent calls fail.
    fn shutdown(&self);

    /// Diagnostic metadata of the last successful call of `operation`.
    fn cached_response_metadata(&self, operation: Operation) -> Option<ResponseMetadata>;
}
