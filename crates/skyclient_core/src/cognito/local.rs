//! In-process identity service.
//!
//! # Responsibility
//! - Implement [`CognitoIdentity`] over in-memory state for offline use and
//!   as the contract's test double.
//! - Enforce the remote service's request constraints and fault semantics.
//!
//! # Invariants
//! - Every identity belongs to exactly one existing pool; deleting a pool
//!   deletes its identities.
//! - A `(provider, token)` login and a developer user identifier are linked
//!   to at most one identity per pool.
//! - After `shutdown()` every operation fails with `InternalError`.
//! - Only faults declared by the operation are returned.

use crate::cognito::client::CognitoIdentity;
use crate::cognito::error::{CognitoIdentityError, CognitoResult, ErrorKind};
use crate::cognito::model::{
    CreateIdentityPoolRequest, Credentials, DeleteIdentitiesRequest, DeleteIdentitiesResult,
    DeleteIdentityPoolRequest, DescribeIdentityPoolRequest, DescribeIdentityRequest,
    GetCredentialsForIdentityRequest, GetCredentialsForIdentityResult, GetIdRequest, GetIdResult,
    GetIdentityPoolRolesRequest, GetIdentityPoolRolesResult,
    GetOpenIdTokenForDeveloperIdentityRequest, GetOpenIdTokenForDeveloperIdentityResult,
    GetOpenIdTokenRequest, GetOpenIdTokenResult, IdentityDescription, IdentityPool,
    IdentityPoolShortDescription, ListIdentitiesRequest, ListIdentitiesResult,
    ListIdentityPoolsRequest, ListIdentityPoolsResult, Logins, LookupDeveloperIdentityRequest,
    LookupDeveloperIdentityResult, MergeDeveloperIdentitiesRequest,
    MergeDeveloperIdentitiesResult, OpenIdTokenResult, Roles, SetIdentityPoolRolesRequest,
    UnlinkDeveloperIdentityRequest, UnlinkIdentityRequest, AUTHENTICATED_ROLE,
    UNAUTHENTICATED_ROLE,
};
use crate::cognito::operation::Operation;
use crate::cognito::validate::{
    paginate, parse_next_token, validate_account_id, validate_developer_provider_name,
    validate_identity_id, validate_identity_pool_id, validate_logins, validate_max_results,
    validate_pool_name, validate_roles, validate_supported_login_providers,
    validate_token_duration, MAX_IDENTITIES_PER_DELETE, MAX_RESULTS_LIMIT,
};
use crate::config::{validate_region, ClientConfiguration, ConfigError, Endpoint, Protocol};
use crate::logging::sanitize_message;
use crate::model::metadata::ResponseMetadata;
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Maximum number of identity pools one service instance holds.
pub const MAX_IDENTITY_POOLS: usize = 60;

/// Login key under which OpenID tokens issued by this service are presented.
pub const OPEN_ID_TOKEN_PROVIDER: &str = "cognito-identity.amazonaws.com";

const DEFAULT_TOKEN_DURATION_SECS: i64 = 900;
const CREDENTIALS_LIFETIME_MS: i64 = 3_600_000;
const MAX_LOGGED_MESSAGE_CHARS: usize = 200;

#[derive(Debug)]
struct PoolRecord {
    pool: IdentityPool,
    roles: Roles,
    seq: u64,
}

impl PoolRecord {
    fn supports_provider(&self, provider: &str) -> bool {
        self.pool.supported_login_providers.contains_key(provider)
            || self
                .pool
                .open_id_connect_provider_arns
                .iter()
                .any(|arn| arn.rsplit_once("oidc-provider/").map(|(_, name)| name) == Some(provider))
    }
}

#[derive(Debug)]
struct IdentityRecord {
    pool_id: String,
    seq: u64,
    logins: Logins,
    developer_users: BTreeSet<String>,
    creation_date: i64,
    last_modified_date: i64,
}

impl IdentityRecord {
    fn is_authenticated(&self) -> bool {
        !self.logins.is_empty() || !self.developer_users.is_empty()
    }

    fn describe(&self, identity_id: &str, developer_provider: Option<&str>) -> IdentityDescription {
        let mut logins: Vec<String> = self.logins.keys().cloned().collect();
        if let Some(provider) = developer_provider.filter(|_| !self.developer_users.is_empty()) {
            logins.push(provider.to_string());
        }
        IdentityDescription {
            identity_id: identity_id.to_string(),
            logins,
            creation_date: self.creation_date,
            last_modified_date: self.last_modified_date,
        }
    }
}

#[derive(Debug)]
struct IssuedToken {
    identity_id: String,
    expires_at: i64,
}

#[derive(Debug, Default)]
struct ServiceState {
    pools: BTreeMap<String, PoolRecord>,
    identities: BTreeMap<String, IdentityRecord>,
    issued_tokens: BTreeMap<String, IssuedToken>,
    metadata: BTreeMap<Operation, ResponseMetadata>,
    next_seq: u64,
    shut_down: bool,
}

impl ServiceState {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn pool(&self, pool_id: &str) -> CognitoResult<&PoolRecord> {
        validate_identity_pool_id(pool_id)?;
        self.pools.get(pool_id).ok_or_else(|| {
            CognitoIdentityError::not_found(format!("identity pool not found: {pool_id}"))
        })
    }

    fn identity(&self, identity_id: &str) -> CognitoResult<&IdentityRecord> {
        validate_identity_id(identity_id)?;
        self.identities.get(identity_id).ok_or_else(|| {
            CognitoIdentityError::not_found(format!("identity not found: {identity_id}"))
        })
    }

    fn identity_mut(&mut self, identity_id: &str) -> CognitoResult<&mut IdentityRecord> {
        self.identities.get_mut(identity_id).ok_or_else(|| {
            CognitoIdentityError::not_found(format!("identity not found: {identity_id}"))
        })
    }

    fn identity_in_pool(&self, identity_id: &str, pool_id: &str) -> CognitoResult<&IdentityRecord> {
        let identity = self.identity(identity_id)?;
        if identity.pool_id != pool_id {
            return Err(CognitoIdentityError::not_found(format!(
                "identity {identity_id} does not belong to identity pool {pool_id}"
            )));
        }
        Ok(identity)
    }

    fn login_owner(&self, pool_id: &str, provider: &str, token: &str) -> Option<String> {
        self.identities
            .iter()
            .find(|(_, identity)| {
                identity.pool_id == pool_id
                    && identity.logins.get(provider).map(String::as_str) == Some(token)
            })
            .map(|(id, _)| id.clone())
    }

    fn developer_user_owner(&self, pool_id: &str, user: &str) -> Option<String> {
        self.identities
            .iter()
            .find(|(_, identity)| identity.pool_id == pool_id && identity.developer_users.contains(user))
            .map(|(id, _)| id.clone())
    }

    /// Resolves an OpenID token issued by this service to its identity.
    fn token_owner(&self, token: &str, now: i64) -> CognitoResult<String> {
        match self.issued_tokens.get(token) {
            Some(issued) if issued.expires_at > now => Ok(issued.identity_id.clone()),
            Some(_) => Err(CognitoIdentityError::not_authorized("OpenID token has expired")),
            None => Err(CognitoIdentityError::not_authorized("OpenID token is not valid")),
        }
    }

    fn insert_identity(&mut self, region: &str, pool_id: &str, now: i64) -> String {
        let identity_id = new_resource_id(region);
        let seq = self.next_seq();
        self.identities.insert(
            identity_id.clone(),
            IdentityRecord {
                pool_id: pool_id.to_string(),
                seq,
                logins: Logins::new(),
                developer_users: BTreeSet::new(),
                creation_date: now,
                last_modified_date: now,
            },
        );
        identity_id
    }

    fn remove_identity(&mut self, identity_id: &str) -> Option<IdentityRecord> {
        self.issued_tokens
            .retain(|_, issued| issued.identity_id != identity_id);
        self.identities.remove(identity_id)
    }

    fn issue_token(&mut self, identity_id: &str, duration_secs: i64, now: i64) -> String {
        self.issued_tokens.retain(|_, issued| issued.expires_at > now);
        let token = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        self.issued_tokens.insert(
            token.clone(),
            IssuedToken {
                identity_id: identity_id.to_string(),
                expires_at: now.saturating_add(duration_secs.saturating_mul(1000)),
            },
        );
        token
    }

    /// Checks the presented logins against an identity and returns the
    /// supported logins that still need to be linked to it.
    fn authenticate(
        &self,
        identity_id: &str,
        logins: &Logins,
        now: i64,
    ) -> CognitoResult<Vec<(String, String)>> {
        let identity = self.identity(identity_id)?;
        let pool = self.pool(&identity.pool_id)?;

        if logins.is_empty() {
            if identity.is_authenticated() {
                return Err(CognitoIdentityError::not_authorized(
                    "identity is linked to logins; one of them must be supplied",
                ));
            }
            if !pool.pool.allow_unauthenticated_identities {
                return Err(CognitoIdentityError::not_authorized(
                    "unauthenticated access is not supported for this identity pool",
                ));
            }
            return Ok(Vec::new());
        }

        let mut to_link = Vec::new();
        let mut proven = false;
        for (provider, token) in logins {
            if provider == OPEN_ID_TOKEN_PROVIDER {
                if self.token_owner(token, now)? != identity_id {
                    return Err(CognitoIdentityError::not_authorized(
                        "OpenID token was issued for a different identity",
                    ));
                }
                proven = true;
                continue;
            }
            match identity.logins.get(provider) {
                Some(linked) if linked == token => proven = true,
                Some(_) => {
                    return Err(CognitoIdentityError::not_authorized(format!(
                        "invalid login token for provider {provider}"
                    )));
                }
                None => {
                    if !pool.supports_provider(provider) {
                        return Err(CognitoIdentityError::not_authorized(format!(
                            "login provider is not supported by the identity pool: {provider}"
                        )));
                    }
                    if let Some(owner) = self.login_owner(&identity.pool_id, provider, token) {
                        if owner != identity_id {
                            return Err(CognitoIdentityError::conflict(format!(
                                "login for {provider} is already linked to another identity"
                            )));
                        }
                    }
                    to_link.push((provider.clone(), token.clone()));
                }
            }
        }
        // New logins attach to an authenticated identity only through one it already holds.
        if identity.is_authenticated() && !proven {
            return Err(CognitoIdentityError::not_authorized(
                "none of the supplied logins is linked to this identity",
            ));
        }
        Ok(to_link)
    }

    fn link_logins(
        &mut self,
        identity_id: &str,
        logins: Vec<(String, String)>,
        now: i64,
    ) -> CognitoResult<()> {
        if logins.is_empty() {
            return Ok(());
        }
        let identity = self.identity_mut(identity_id)?;
        identity.logins.extend(logins);
        identity.last_modified_date = now;
        Ok(())
    }
}

/// In-memory [`CognitoIdentity`] implementation.
#[derive(Debug)]
pub struct LocalCognitoIdentity {
    endpoint: Endpoint,
    region: String,
    protocol: Protocol,
    state: Mutex<ServiceState>,
}

impl LocalCognitoIdentity {
    /// Creates an empty service from validated client configuration.
    pub fn new(config: &ClientConfiguration) -> Result<Self, ConfigError> {
        validate_region(&config.region)?;
        let endpoint = config.resolve_endpoint()?;
        info!(
            "event=client_init module=cognito status=ok region={} endpoint={}",
            config.region, endpoint
        );
        Ok(Self {
            endpoint,
            region: config.region.clone(),
            protocol: config.protocol,
            state: Mutex::new(ServiceState::default()),
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn call<T>(
        &self,
        operation: Operation,
        body: impl FnOnce(&mut ServiceState, i64) -> CognitoResult<T>,
    ) -> CognitoResult<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| CognitoIdentityError::internal("service state lock poisoned"))?;
        if state.shut_down {
            warn!(
                "event=cognito_call module=cognito status=rejected operation={} reason=shutdown",
                operation
            );
            return Err(CognitoIdentityError::internal("client has been shut down"));
        }

        let result = body(&mut *state, now_millis());
        match &result {
            Ok(_) => {
                let request_id = Uuid::new_v4().to_string();
                info!(
                    "event=cognito_call module=cognito status=ok operation={} request_id={}",
                    operation, request_id
                );
                state
                    .metadata
                    .insert(operation, ResponseMetadata::with_request_id(request_id));
            }
            Err(err) => {
                debug_assert!(
                    operation.declares(err.kind()),
                    "{operation} returned undeclared fault {}",
                    err.kind()
                );
                warn!(
                    "event=cognito_call module=cognito status=error operation={} code={} message={}",
                    operation,
                    err.code(),
                    sanitize_message(err.message(), MAX_LOGGED_MESSAGE_CHARS)
                );
            }
        }
        result
    }

    fn new_pool(&self, state: &mut ServiceState, request: &CreateIdentityPoolRequest) -> CognitoResult<IdentityPool> {
        validate_pool_settings(
            &request.identity_pool_name,
            request.developer_provider_name.as_deref(),
            &request.supported_login_providers,
        )?;
        if state.pools.len() >= MAX_IDENTITY_POOLS {
            return Err(CognitoIdentityError::new(
                ErrorKind::LimitExceeded,
                format!("an account holds at most {MAX_IDENTITY_POOLS} identity pools"),
            ));
        }
        if let Some(provider) = request.developer_provider_name.as_deref() {
            ensure_developer_provider_unused(state, provider, None)?;
        }

        let pool = IdentityPool {
            identity_pool_id: new_resource_id(&self.region),
            identity_pool_name: request.identity_pool_name.clone(),
            allow_unauthenticated_identities: request.allow_unauthenticated_identities,
            supported_login_providers: request.supported_login_providers.clone(),
            developer_provider_name: request.developer_provider_name.clone(),
            open_id_connect_provider_arns: request.open_id_connect_provider_arns.clone(),
        };
        let seq = state.next_seq();
        state.pools.insert(
            pool.identity_pool_id.clone(),
            PoolRecord {
                pool: pool.clone(),
                roles: Roles::new(),
                seq,
            },
        );
        Ok(pool)
    }
}

impl CognitoIdentity for LocalCognitoIdentity {
    fn set_endpoint(&mut self, endpoint: &str) -> Result<(), ConfigError> {
        self.endpoint = Endpoint::parse(endpoint, self.protocol)?;
        info!(
            "event=set_endpoint module=cognito status=ok endpoint={}",
            self.endpoint
        );
        Ok(())
    }

    fn set_region(&mut self, region: &str) -> Result<(), ConfigError> {
        validate_region(region)?;
        self.endpoint = Endpoint::for_region(region, self.protocol)?;
        self.region = region.to_string();
        info!(
            "event=set_region module=cognito status=ok region={} endpoint={}",
            self.region, self.endpoint
        );
        Ok(())
    }

    fn create_identity_pool(
        &self,
        request: &CreateIdentityPoolRequest,
    ) -> CognitoResult<IdentityPool> {
        self.call(Operation::CreateIdentityPool, |state, _| {
            self.new_pool(state, request)
        })
    }

    fn delete_identities(
        &self,
        request: &DeleteIdentitiesRequest,
    ) -> CognitoResult<DeleteIdentitiesResult> {
        self.call(Operation::DeleteIdentities, |state, _| {
            let count = request.identity_ids_to_delete.len();
            if count == 0 || count > MAX_IDENTITIES_PER_DELETE {
                return Err(CognitoIdentityError::invalid_parameter(format!(
                    "IdentityIdsToDelete must hold 1-{MAX_IDENTITIES_PER_DELETE} ids, got {count}"
                )));
            }
            for identity_id in &request.identity_ids_to_delete {
                validate_identity_id(identity_id)?;
            }
            for identity_id in &request.identity_ids_to_delete {
                state.remove_identity(identity_id);
            }
            Ok(DeleteIdentitiesResult::default())
        })
    }

    fn delete_identity_pool(&self, request: &DeleteIdentityPoolRequest) -> CognitoResult<()> {
        self.call(Operation::DeleteIdentityPool, |state, _| {
            state.pool(&request.identity_pool_id)?;
            state.pools.remove(&request.identity_pool_id);
            let doomed: Vec<String> = state
                .identities
                .iter()
                .filter(|(_, identity)| identity.pool_id == request.identity_pool_id)
                .map(|(id, _)| id.clone())
                .collect();
            for identity_id in doomed {
                state.remove_identity(&identity_id);
            }
            Ok(())
        })
    }

    fn describe_identity(
        &self,
        request: &DescribeIdentityRequest,
    ) -> CognitoResult<IdentityDescription> {
        self.call(Operation::DescribeIdentity, |state, _| {
            let identity = state.identity(&request.identity_id)?;
            let pool = state.pool(&identity.pool_id)?;
            Ok(identity.describe(
                &request.identity_id,
                pool.pool.developer_provider_name.as_deref(),
            ))
        })
    }

    fn describe_identity_pool(
        &self,
        request: &DescribeIdentityPoolRequest,
    ) -> CognitoResult<IdentityPool> {
        self.call(Operation::DescribeIdentityPool, |state, _| {
            Ok(state.pool(&request.identity_pool_id)?.pool.clone())
        })
    }

    fn get_credentials_for_identity(
        &self,
        request: &GetCredentialsForIdentityRequest,
    ) -> CognitoResult<GetCredentialsForIdentityResult> {
        self.call(Operation::GetCredentialsForIdentity, |state, now| {
            validate_logins(&request.logins)?;
            let to_link = state.authenticate(&request.identity_id, &request.logins, now)?;

            let identity = state.identity(&request.identity_id)?;
            let authenticated = identity.is_authenticated() || !to_link.is_empty();
            let role_type = if authenticated {
                AUTHENTICATED_ROLE
            } else {
                UNAUTHENTICATED_ROLE
            };
            let pool = state.pool(&identity.pool_id)?;
            if !pool.roles.contains_key(role_type) {
                return Err(CognitoIdentityError::new(
                    ErrorKind::InvalidIdentityPoolConfiguration,
                    format!("identity pool has no {role_type} role"),
                ));
            }

            state.link_logins(&request.identity_id, to_link, now)?;
            Ok(GetCredentialsForIdentityResult {
                identity_id: request.identity_id.clone(),
                credentials: new_credentials(now),
            })
        })
    }

    fn get_id(&self, request: &GetIdRequest) -> CognitoResult<GetIdResult> {
        self.call(Operation::GetId, |state, now| {
            if let Some(account_id) = request.account_id.as_deref() {
                validate_account_id(account_id)?;
            }
            validate_logins(&request.logins)?;
            let pool_id = request.identity_pool_id.as_str();
            let pool = state.pool(pool_id)?;

            if request.logins.is_empty() {
                if !pool.pool.allow_unauthenticated_identities {
                    return Err(CognitoIdentityError::not_authorized(
                        "unauthenticated access is not supported for this identity pool",
                    ));
                }
                let identity_id = state.insert_identity(&self.region, pool_id, now);
                return Ok(GetIdResult { identity_id });
            }

            let mut owners = BTreeSet::new();
            let mut provider_logins = Vec::new();
            for (provider, token) in &request.logins {
                if provider == OPEN_ID_TOKEN_PROVIDER {
                    let owner = state.token_owner(token, now)?;
                    if state.identity_in_pool(&owner, pool_id).is_err() {
                        return Err(CognitoIdentityError::not_authorized(
                            "OpenID token was issued for a different identity pool",
                        ));
                    }
                    owners.insert(owner);
                    continue;
                }
                if !pool.supports_provider(provider) {
                    return Err(CognitoIdentityError::not_authorized(format!(
                        "login provider is not supported by the identity pool: {provider}"
                    )));
                }
                if let Some(owner) = state.login_owner(pool_id, provider, token) {
                    owners.insert(owner);
                } else {
                    provider_logins.push((provider.clone(), token.clone()));
                }
            }

            if owners.len() > 1 {
                return Err(CognitoIdentityError::conflict(
                    "logins are linked to different identities",
                ));
            }
            let identity_id = match owners.into_iter().next() {
                Some(owner) => {
                    let identity = state.identity(&owner)?;
                    if let Some((provider, _)) = provider_logins
                        .iter()
                        .find(|(provider, _)| identity.logins.contains_key(provider))
                    {
                        return Err(CognitoIdentityError::conflict(format!(
                            "identity is already linked to a different {provider} login"
                        )));
                    }
                    owner
                }
                None => state.insert_identity(&self.region, pool_id, now),
            };
            state.link_logins(&identity_id, provider_logins, now)?;
            Ok(GetIdResult { identity_id })
        })
    }

    fn get_identity_pool_roles(
        &self,
        request: &GetIdentityPoolRolesRequest,
    ) -> CognitoResult<GetIdentityPoolRolesResult> {
        self.call(Operation::GetIdentityPoolRoles, |state, _| {
            let pool = state.pool(&request.identity_pool_id)?;
            Ok(GetIdentityPoolRolesResult {
                identity_pool_id: request.identity_pool_id.clone(),
                roles: pool.roles.clone(),
            })
        })
    }

    fn get_open_id_token(
        &self,
        request: &GetOpenIdTokenRequest,
    ) -> CognitoResult<GetOpenIdTokenResult> {
        self.call(Operation::GetOpenIdToken, |state, now| {
            validate_logins(&request.logins)?;
            let to_link = state.authenticate(&request.identity_id, &request.logins, now)?;
            state.link_logins(&request.identity_id, to_link, now)?;
            let token = state.issue_token(&request.identity_id, DEFAULT_TOKEN_DURATION_SECS, now);
            Ok(OpenIdTokenResult {
                identity_id: request.identity_id.clone(),
                token,
            })
        })
    }

    fn get_open_id_token_for_developer_identity(
        &self,
        request: &GetOpenIdTokenForDeveloperIdentityRequest,
    ) -> CognitoResult<GetOpenIdTokenForDeveloperIdentityResult> {
        self.call(Operation::GetOpenIdTokenForDeveloperIdentity, |state, now| {
            let pool_id = request.identity_pool_id.as_str();
            let duration = request.token_duration.unwrap_or(DEFAULT_TOKEN_DURATION_SECS);
            validate_token_duration(duration)?;
            validate_logins(&request.logins)?;
            let pool = state.pool(pool_id)?;
            let developer_provider = pool.pool.developer_provider_name.clone().ok_or_else(|| {
                CognitoIdentityError::not_authorized("identity pool has no developer provider")
            })?;
            let user = request.logins.get(&developer_provider).ok_or_else(|| {
                CognitoIdentityError::invalid_parameter(format!(
                    "Logins must include the developer provider {developer_provider}"
                ))
            })?;

            let mut provider_logins = Vec::new();
            for (provider, token) in &request.logins {
                if provider == &developer_provider {
                    continue;
                }
                if !pool.supports_provider(provider) {
                    return Err(CognitoIdentityError::not_authorized(format!(
                        "login provider is not supported by the identity pool: {provider}"
                    )));
                }
                provider_logins.push((provider.clone(), token.clone()));
            }

            if let Some(identity_id) = request.identity_id.as_deref() {
                state.identity_in_pool(identity_id, pool_id)?;
            }
            let user_owner = state.developer_user_owner(pool_id, user);
            let target = match (user_owner, request.identity_id.as_deref()) {
                (Some(owner), Some(requested)) if owner != requested => {
                    return Err(CognitoIdentityError::new(
                        ErrorKind::DeveloperUserAlreadyRegistered,
                        format!("developer user {user} is registered under a different identity"),
                    ));
                }
                (Some(owner), _) => Some(owner),
                (None, Some(requested)) => Some(requested.to_string()),
                (None, None) => None,
            };

            for (provider, token) in &provider_logins {
                if let Some(owner) = state.login_owner(pool_id, provider, token) {
                    if target.as_deref() != Some(owner.as_str()) {
                        return Err(CognitoIdentityError::conflict(format!(
                            "login for {provider} is already linked to another identity"
                        )));
                    }
                }
            }

            let identity_id = match target {
                Some(identity_id) => identity_id,
                None => state.insert_identity(&self.region, pool_id, now),
            };
            {
                let identity = state.identity_mut(&identity_id)?;
                identity.developer_users.insert(user.clone());
                identity.last_modified_date = now;
            }
            state.link_logins(&identity_id, provider_logins, now)?;
            let token = state.issue_token(&identity_id, duration, now);
            Ok(OpenIdTokenResult { identity_id, token })
        })
    }

    fn list_identities(
        &self,
        request: &ListIdentitiesRequest,
    ) -> CognitoResult<ListIdentitiesResult> {
        self.call(Operation::ListIdentities, |state, _| {
            let page_size = validate_max_results(request.max_results)?;
            let offset = parse_next_token(request.next_token.as_deref())?;
            let pool = state.pool(&request.identity_pool_id)?;
            let developer_provider = pool.pool.developer_provider_name.as_deref();

            let mut members: Vec<(&String, &IdentityRecord)> = state
                .identities
                .iter()
                .filter(|(_, identity)| identity.pool_id == request.identity_pool_id)
                .collect();
            members.sort_by_key(|(_, identity)| identity.seq);
            let descriptions: Vec<IdentityDescription> = members
                .into_iter()
                .map(|(id, identity)| identity.describe(id, developer_provider))
                .collect();

            let (identities, next_token) = paginate(descriptions, offset, page_size);
            Ok(ListIdentitiesResult {
                identity_pool_id: request.identity_pool_id.clone(),
                identities,
                next_token,
            })
        })
    }

    fn list_identity_pools(
        &self,
        request: &ListIdentityPoolsRequest,
    ) -> CognitoResult<ListIdentityPoolsResult> {
        self.call(Operation::ListIdentityPools, |state, _| {
            let page_size = validate_max_results(request.max_results)?;
            let offset = parse_next_token(request.next_token.as_deref())?;

            let mut records: Vec<&PoolRecord> = state.pools.values().collect();
            records.sort_by_key(|record| record.seq);
            let summaries: Vec<IdentityPoolShortDescription> = records
                .into_iter()
                .map(|record| IdentityPoolShortDescription::from(&record.pool))
                .collect();

            let (identity_pools, next_token) = paginate(summaries, offset, page_size);
            Ok(ListIdentityPoolsResult {
                identity_pools,
                next_token,
            })
        })
    }

    fn lookup_developer_identity(
        &self,
        request: &LookupDeveloperIdentityRequest,
    ) -> CognitoResult<LookupDeveloperIdentityResult> {
        self.call(Operation::LookupDeveloperIdentity, |state, _| {
            let page_size = validate_max_results(request.max_results.unwrap_or(MAX_RESULTS_LIMIT))?;
            let offset = parse_next_token(request.next_token.as_deref())?;
            let pool_id = request.identity_pool_id.as_str();
            state.pool(pool_id)?;

            let identity_id = match (
                request.identity_id.as_deref(),
                request.developer_user_identifier.as_deref(),
            ) {
                (None, None) => {
                    return Err(CognitoIdentityError::invalid_parameter(
                        "either IdentityId or DeveloperUserIdentifier is required",
                    ));
                }
                (requested, Some(user)) => {
                    if let Some(requested) = requested {
                        validate_identity_id(requested)?;
                    }
                    let owner = state.developer_user_owner(pool_id, user).ok_or_else(|| {
                        CognitoIdentityError::not_found(format!(
                            "developer user is not registered: {user}"
                        ))
                    })?;
                    if requested.is_some_and(|requested| requested != owner) {
                        return Err(CognitoIdentityError::conflict(
                            "IdentityId does not match the developer user's identity",
                        ));
                    }
                    owner
                }
                (Some(requested), None) => {
                    state.identity_in_pool(requested, pool_id)?;
                    requested.to_string()
                }
            };

            let identity = state.identity(&identity_id)?;
            let users: Vec<String> = identity.developer_users.iter().cloned().collect();
            let (developer_user_identifier_list, next_token) = paginate(users, offset, page_size);
            Ok(LookupDeveloperIdentityResult {
                identity_id: Some(identity_id),
                developer_user_identifier_list,
                next_token,
            })
        })
    }

    fn merge_developer_identities(
        &self,
        request: &MergeDeveloperIdentitiesRequest,
    ) -> CognitoResult<MergeDeveloperIdentitiesResult> {
        self.call(Operation::MergeDeveloperIdentities, |state, now| {
            let pool_id = request.identity_pool_id.as_str();
            validate_developer_provider_name(&request.developer_provider_name)?;
            let pool = state.pool(pool_id)?;
            ensure_developer_provider_matches(pool, &request.developer_provider_name)?;

            let source = state
                .developer_user_owner(pool_id, &request.source_user_identifier)
                .ok_or_else(|| {
                    CognitoIdentityError::not_found(format!(
                        "developer user is not registered: {}",
                        request.source_user_identifier
                    ))
                })?;
            let destination = state
                .developer_user_owner(pool_id, &request.destination_user_identifier)
                .ok_or_else(|| {
                    CognitoIdentityError::not_found(format!(
                        "developer user is not registered: {}",
                        request.destination_user_identifier
                    ))
                })?;
            if source == destination {
                return Ok(MergeDeveloperIdentitiesResult {
                    identity_id: destination,
                });
            }

            {
                let source_record = state.identity(&source)?;
                let destination_record = state.identity(&destination)?;
                for (provider, token) in &source_record.logins {
                    if destination_record
                        .logins
                        .get(provider)
                        .is_some_and(|linked| linked != token)
                    {
                        return Err(CognitoIdentityError::conflict(format!(
                            "both identities are linked to different {provider} logins"
                        )));
                    }
                }
            }

            let source_record = state.remove_identity(&source).ok_or_else(|| {
                CognitoIdentityError::not_found(format!("identity not found: {source}"))
            })?;
            let destination_record = state.identity_mut(&destination)?;
            destination_record
                .developer_users
                .extend(source_record.developer_users);
            destination_record.logins.extend(source_record.logins);
            destination_record.last_modified_date = now;
            Ok(MergeDeveloperIdentitiesResult {
                identity_id: destination,
            })
        })
    }

    fn set_identity_pool_roles(&self, request: &SetIdentityPoolRolesRequest) -> CognitoResult<()> {
        self.call(Operation::SetIdentityPoolRoles, |state, _| {
            state.pool(&request.identity_pool_id)?;
            validate_roles(&request.roles)?;
            if let Some(record) = state.pools.get_mut(&request.identity_pool_id) {
                record.roles = request.roles.clone();
            }
            Ok(())
        })
    }

    fn unlink_developer_identity(
        &self,
        request: &UnlinkDeveloperIdentityRequest,
    ) -> CognitoResult<()> {
        self.call(Operation::UnlinkDeveloperIdentity, |state, now| {
            let pool_id = request.identity_pool_id.as_str();
            validate_developer_provider_name(&request.developer_provider_name)?;
            let pool = state.pool(pool_id)?;
            ensure_developer_provider_matches(pool, &request.developer_provider_name)?;
            state.identity_in_pool(&request.identity_id, pool_id)?;

            match state.developer_user_owner(pool_id, &request.developer_user_identifier) {
                None => Err(CognitoIdentityError::not_found(format!(
                    "developer user is not registered: {}",
                    request.developer_user_identifier
                ))),
                Some(owner) if owner != request.identity_id => Err(CognitoIdentityError::conflict(
                    "developer user is linked to a different identity",
                )),
                Some(_) => {
                    let identity = state.identity_mut(&request.identity_id)?;
                    identity
                        .developer_users
                        .remove(&request.developer_user_identifier);
                    identity.last_modified_date = now;
                    Ok(())
                }
            }
        })
    }

    fn unlink_identity(&self, request: &UnlinkIdentityRequest) -> CognitoResult<()> {
        self.call(Operation::UnlinkIdentity, |state, now| {
            validate_logins(&request.logins)?;
            let identity = state.identity(&request.identity_id)?;
            if request.logins.is_empty() {
                return Err(CognitoIdentityError::not_authorized(
                    "a linked login is required to unlink logins",
                ));
            }
            for (provider, token) in &request.logins {
                let authenticated = if provider == OPEN_ID_TOKEN_PROVIDER {
                    state.token_owner(token, now)? == request.identity_id
                } else {
                    identity.logins.get(provider) == Some(token)
                };
                if !authenticated {
                    return Err(CognitoIdentityError::not_authorized(format!(
                        "login for {provider} does not authenticate this identity"
                    )));
                }
            }
            if let Some(provider) = request
                .logins_to_remove
                .iter()
                .find(|provider| !identity.logins.contains_key(provider.as_str()))
            {
                return Err(CognitoIdentityError::invalid_parameter(format!(
                    "login is not linked to this identity: {provider}"
                )));
            }

            let identity = state.identity_mut(&request.identity_id)?;
            for provider in &request.logins_to_remove {
                identity.logins.remove(provider);
            }
            identity.last_modified_date = now;
            Ok(())
        })
    }

    fn update_identity_pool(&self, request: &IdentityPool) -> CognitoResult<IdentityPool> {
        self.call(Operation::UpdateIdentityPool, |state, _| {
            let pool_id = request.identity_pool_id.as_str();
            let current = state.pool(pool_id)?;
            validate_pool_settings(
                &request.identity_pool_name,
                request.developer_provider_name.as_deref(),
                &request.supported_login_providers,
            )?;
            if let Some(existing) = current.pool.developer_provider_name.as_deref() {
                if request.developer_provider_name.as_deref() != Some(existing) {
                    return Err(CognitoIdentityError::conflict(
                        "developer provider name cannot be changed once set",
                    ));
                }
            }
            if let Some(provider) = request.developer_provider_name.as_deref() {
                ensure_developer_provider_unused(state, provider, Some(pool_id))?;
            }

            let record = state.pools.get_mut(pool_id).ok_or_else(|| {
                CognitoIdentityError::not_found(format!("identity pool not found: {pool_id}"))
            })?;
            record.pool = request.clone();
            Ok(record.pool.clone())
        })
    }

    fn shutdown(&self) {
        match self.state.lock() {
            Ok(mut state) => {
                state.shut_down = true;
                state.pools.clear();
                state.identities.clear();
                state.issued_tokens.clear();
                state.metadata.clear();
                info!("event=client_shutdown module=cognito status=ok");
            }
            Err(_) => warn!("event=client_shutdown module=cognito status=error reason=poisoned"),
        }
    }

    fn cached_response_metadata(&self, operation: Operation) -> Option<ResponseMetadata> {
        let state = self.state.lock().ok()?;
        state.metadata.get(&operation).cloned()
    }
}

fn validate_pool_settings(
    name: &str,
    developer_provider: Option<&str>,
    supported_login_providers: &BTreeMap<String, String>,
) -> CognitoResult<()> {
    validate_pool_name(name)?;
    if let Some(provider) = developer_provider {
        validate_developer_provider_name(provider)?;
    }
    validate_supported_login_providers(supported_login_providers)
}

fn ensure_developer_provider_unused(
    state: &ServiceState,
    provider: &str,
    except_pool: Option<&str>,
) -> CognitoResult<()> {
    let taken = state.pools.iter().any(|(id, record)| {
        Some(id.as_str()) != except_pool
            && record.pool.developer_provider_name.as_deref() == Some(provider)
    });
    if taken {
        return Err(CognitoIdentityError::conflict(format!(
            "developer provider name is already used by another identity pool: {provider}"
        )));
    }
    Ok(())
}

fn ensure_developer_provider_matches(pool: &PoolRecord, provider: &str) -> CognitoResult<()> {
    if pool.pool.developer_provider_name.as_deref() != Some(provider) {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "developer provider does not match the identity pool: {provider}"
        )));
    }
    Ok(())
}

fn new_resource_id(region: &str) -> String {
    format!("{region}:{}", Uuid::new_v4())
}

fn new_credentials(now: i64) -> Credentials {
    let access = Uuid::new_v4().simple().to_string().to_uppercase();
    let secret = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    Credentials {
        access_key_id: format!("ASIA{}", &access[..16]),
        secret_key: secret[..40].to_string(),
        session_token: format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
        expiration: now.saturating_add(CREDENTIALS_LIFETIME_MS),
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{LocalCognitoIdentity, ServiceState, OPEN_ID_TOKEN_PROVIDER};
    use crate::cognito::client::CognitoIdentity;
    use crate::cognito::error::ErrorKind;
    use crate::cognito::model::{CreateIdentityPoolRequest, GetIdRequest, IdentityLoginsRequest};
    use crate::config::ClientConfiguration;

    fn service() -> LocalCognitoIdentity {
        LocalCognitoIdentity::new(&ClientConfiguration::default()).expect("default config")
    }

    #[test]
    fn ids_carry_the_configured_region() {
        let mut service = service();
        service.set_region("eu-west-1").expect("valid region");
        let pool = service
            .create_identity_pool(&CreateIdentityPoolRequest::new("Regional", true))
            .expect("create pool");
        assert!(pool.identity_pool_id.starts_with("eu-west-1:"));
        assert_eq!(
            service.endpoint().host(),
            "cognito-identity.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn issued_open_id_token_authenticates_its_identity() {
        let service = service();
        let pool = service
            .create_identity_pool(&CreateIdentityPoolRequest::new("Tokens", true))
            .expect("create pool");
        let identity = service
            .get_id(&GetIdRequest::new(&pool.identity_pool_id))
            .expect("anonymous id");
        let token = service
            .get_open_id_token(&IdentityLoginsRequest::new(&identity.identity_id))
            .expect("token");

        let resolved = service
            .get_id(
                &GetIdRequest::new(&pool.identity_pool_id)
                    .with_login(OPEN_ID_TOKEN_PROVIDER, &token.token),
            )
            .expect("token login");
        assert_eq!(resolved.identity_id, identity.identity_id);
    }

    #[test]
    fn expired_tokens_stop_resolving_and_are_purged() {
        let mut state = ServiceState::default();
        let identity_id = state.insert_identity("us-east-1", "us-east-1:pool", 0);
        let short = state.issue_token(&identity_id, 1, 0);
        assert_eq!(state.token_owner(&short, 999).expect("live"), identity_id);

        let err = state.token_owner(&short, 1_000).expect_err("expired");
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
        assert!(err.message().contains("expired"));

        let fresh = state.issue_token(&identity_id, 900, 5_000);
        assert_eq!(state.issued_tokens.len(), 1);
        assert!(state.issued_tokens.contains_key(&fresh));
        let err = state.token_owner(&short, 5_000).expect_err("purged");
        assert!(err.message().contains("not valid"));
    }
}
