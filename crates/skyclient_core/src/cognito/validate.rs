//! Service-side request constraints of the identity service.
//!
//! Every failure maps to `InvalidParameter`.

use crate::cognito::error::{CognitoIdentityError, CognitoResult};
use crate::cognito::model::{Logins, Roles, AUTHENTICATED_ROLE, UNAUTHENTICATED_ROLE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

pub const MAX_RESULTS_LIMIT: i32 = 60;
pub const MAX_IDENTITIES_PER_DELETE: usize = 60;
pub const MAX_TOKEN_DURATION_SECS: i64 = 86_400;
const MAX_LOGINS: usize = 10;
const MAX_NAME_LEN: usize = 128;
const MAX_ID_LEN: usize = 55;
const MAX_LOGIN_TOKEN_LEN: usize = 50_000;
const MAX_ACCOUNT_ID_LEN: usize = 15;
const MIN_ROLE_ARN_LEN: usize = 20;
const MAX_ROLE_ARN_LEN: usize = 2048;

static POOL_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w ]+$").expect("valid regex"));
static PROVIDER_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w._-]+$").expect("valid regex"));
static RESOURCE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w-]+:[0-9a-f-]+$").expect("valid regex"));
static ACCOUNT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));

fn check_length(field: &str, value: &str, max: usize) -> CognitoResult<()> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "{field} must be 1-{max} characters, got {len}"
        )));
    }
    Ok(())
}

pub fn validate_pool_name(name: &str) -> CognitoResult<()> {
    check_length("IdentityPoolName", name, MAX_NAME_LEN)?;
    if !POOL_NAME_RE.is_match(name) {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "IdentityPoolName contains unsupported characters: {name}"
        )));
    }
    Ok(())
}

pub fn validate_developer_provider_name(name: &str) -> CognitoResult<()> {
    check_length("DeveloperProviderName", name, MAX_NAME_LEN)?;
    if !PROVIDER_NAME_RE.is_match(name) {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "DeveloperProviderName contains unsupported characters: {name}"
        )));
    }
    Ok(())
}

fn validate_resource_id(field: &str, id: &str) -> CognitoResult<()> {
    check_length(field, id, MAX_ID_LEN)?;
    if !RESOURCE_ID_RE.is_match(id) {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "{field} is malformed: {id}"
        )));
    }
    Ok(())
}

pub fn validate_identity_pool_id(id: &str) -> CognitoResult<()> {
    validate_resource_id("IdentityPoolId", id)
}

pub fn validate_identity_id(id: &str) -> CognitoResult<()> {
    validate_resource_id("IdentityId", id)
}

pub fn validate_account_id(account_id: &str) -> CognitoResult<()> {
    check_length("AccountId", account_id, MAX_ACCOUNT_ID_LEN)?;
    if !ACCOUNT_ID_RE.is_match(account_id) {
        return Err(CognitoIdentityError::invalid_parameter(
            "AccountId must contain digits only",
        ));
    }
    Ok(())
}

pub fn validate_max_results(max_results: i32) -> CognitoResult<usize> {
    if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "MaxResults must be 1-{MAX_RESULTS_LIMIT}, got {max_results}"
        )));
    }
    Ok(max_results as usize)
}

pub fn validate_token_duration(seconds: i64) -> CognitoResult<()> {
    if !(1..=MAX_TOKEN_DURATION_SECS).contains(&seconds) {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "TokenDuration must be 1-{MAX_TOKEN_DURATION_SECS} seconds, got {seconds}"
        )));
    }
    Ok(())
}

pub fn validate_logins(logins: &Logins) -> CognitoResult<()> {
    if logins.len() > MAX_LOGINS {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "at most {MAX_LOGINS} logins are allowed"
        )));
    }
    for (provider, token) in logins {
        check_length("Logins key", provider, MAX_NAME_LEN)?;
        check_length("Logins value", token, MAX_LOGIN_TOKEN_LEN)?;
    }
    Ok(())
}

pub fn validate_supported_login_providers(providers: &BTreeMap<String, String>) -> CognitoResult<()> {
    if providers.len() > MAX_LOGINS {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "at most {MAX_LOGINS} supported login providers are allowed"
        )));
    }
    for (provider, app_id) in providers {
        check_length("SupportedLoginProviders key", provider, MAX_NAME_LEN)?;
        check_length("SupportedLoginProviders value", app_id, MAX_NAME_LEN)?;
    }
    Ok(())
}

pub fn validate_role_arn(arn: &str) -> CognitoResult<()> {
    check_length("role ARN", arn, MAX_ROLE_ARN_LEN)?;
    if arn.len() < MIN_ROLE_ARN_LEN || !arn.starts_with("arn:") {
        return Err(CognitoIdentityError::invalid_parameter(format!(
            "role ARN is malformed: {arn}"
        )));
    }
    Ok(())
}

pub fn validate_roles(roles: &Roles) -> CognitoResult<()> {
    for (role_type, arn) in roles {
        if role_type != AUTHENTICATED_ROLE && role_type != UNAUTHENTICATED_ROLE {
            return Err(CognitoIdentityError::invalid_parameter(format!(
                "unsupported role type: {role_type}"
            )));
        }
        validate_role_arn(arn)?;
    }
    Ok(())
}

/// Parses an opaque pagination token into a list offset.
pub fn parse_next_token(token: Option<&str>) -> CognitoResult<usize> {
    match token {
        None => Ok(0),
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            CognitoIdentityError::invalid_parameter(format!("NextToken is invalid: {raw}"))
        }),
    }
}

/// Slices one page out of an ordered listing.
pub fn paginate<T>(items: Vec<T>, offset: usize, page_size: usize) -> (Vec<T>, Option<String>) {
    let total = items.len();
    let page: Vec<T> = items.into_iter().skip(offset).take(page_size).collect();
    let consumed = offset.saturating_add(page.len());
    let next_token = (consumed < total).then(|| consumed.to_string());
    (page, next_token)
}
