//! Identity use-case service.
//!
//! # Responsibility
//! - Compose identity service operations into caller-level flows
//!   (full listings, login to credentials).
//! - Stay agnostic of which [`CognitoIdentity`] implementation is used.
//!
//! # Invariants
//! - Faults from the underlying client are returned unchanged.
//! - Listings follow pagination tokens until the service stops returning one.

use crate::cognito::client::CognitoIdentity;
use crate::cognito::error::{CognitoIdentityError, CognitoResult};
use crate::cognito::local::OPEN_ID_TOKEN_PROVIDER;
use crate::cognito::model::{
    GetCredentialsForIdentityResult, GetIdRequest, GetOpenIdTokenForDeveloperIdentityRequest,
    IdentityDescription, IdentityLoginsRequest, IdentityPoolShortDescription,
    ListIdentitiesRequest, ListIdentityPoolsRequest,
};
use log::debug;

/// Use-case wrapper over an identity service client.
pub struct IdentityService<C: CognitoIdentity> {
    client: C,
}

impl<C: CognitoIdentity> IdentityService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }

    /// Lists every identity pool, page by page.
    pub fn list_all_identity_pools(
        &self,
        page_size: i32,
    ) -> CognitoResult<Vec<IdentityPoolShortDescription>> {
        let mut request = ListIdentityPoolsRequest::new(page_size);
        let mut pools = Vec::new();
        let mut pages = 0_usize;
        loop {
            let page = self.client.list_identity_pools(&request)?;
            pages += 1;
            pools.extend(page.identity_pools);
            match next_page_token(request.next_token.as_deref(), page.next_token)? {
                Some(token) => request.next_token = Some(token),
                None => break,
            }
        }
        debug!(
            "event=list_all_identity_pools module=service status=ok pages={} pools={}",
            pages,
            pools.len()
        );
        Ok(pools)
    }

    /// Lists every identity of a pool, page by page.
    pub fn list_all_identities(
        &self,
        identity_pool_id: &str,
        page_size: i32,
    ) -> CognitoResult<Vec<IdentityDescription>> {
        let mut request = ListIdentitiesRequest::new(identity_pool_id, page_size);
        let mut identities = Vec::new();
        loop {
            let page = self.client.list_identities(&request)?;
            identities.extend(page.identities);
            match next_page_token(request.next_token.as_deref(), page.next_token)? {
                Some(token) => request.next_token = Some(token),
                None => break,
            }
        }
        Ok(identities)
    }

    /// Finds the first identity pool with an exact name match.
    pub fn find_identity_pool_by_name(
        &self,
        name: &str,
    ) -> CognitoResult<Option<IdentityPoolShortDescription>> {
        Ok(self
            .list_all_identity_pools(60)?
            .into_iter()
            .find(|pool| pool.identity_pool_name == name))
    }

    /// Resolves the identity of an external login and exchanges the login
    /// for temporary credentials.
    pub fn credentials_for_login(
        &self,
        identity_pool_id: &str,
        provider: &str,
        token: &str,
    ) -> CognitoResult<GetCredentialsForIdentityResult> {
        let identity = self
            .client
            .get_id(&GetIdRequest::new(identity_pool_id).with_login(provider, token))?;
        self.client.get_credentials_for_identity(
            &IdentityLoginsRequest::new(identity.identity_id).with_login(provider, token),
        )
    }

    /// Registers (or finds) a developer-authenticated user and exchanges the
    /// issued OpenID token for temporary credentials.
    pub fn credentials_for_developer_user(
        &self,
        identity_pool_id: &str,
        developer_provider: &str,
        user_identifier: &str,
    ) -> CognitoResult<GetCredentialsForIdentityResult> {
        let token = self.client.get_open_id_token_for_developer_identity(
            &GetOpenIdTokenForDeveloperIdentityRequest::new(identity_pool_id)
                .with_login(developer_provider, user_identifier),
        )?;
        self.client.get_credentials_for_identity(
            &IdentityLoginsRequest::new(token.identity_id)
                .with_login(OPEN_ID_TOKEN_PROVIDER, token.token),
        )
    }
}

fn next_page_token(
    current: Option<&str>,
    next: Option<String>,
) -> CognitoResult<Option<String>> {
    match next {
        Some(token) if Some(token.as_str()) == current => Err(CognitoIdentityError::internal(
            format!("service returned the same pagination token twice: {token}"),
        )),
        other => Ok(other),
    }
}
