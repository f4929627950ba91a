//! Remote operations of the identity service and their declared faults.

use crate::cognito::error::ErrorKind;
use std::fmt::{Display, Formatter};

use ErrorKind::{
    ConcurrentModification, DeveloperUserAlreadyRegistered, ExternalService, InternalError,
    InvalidIdentityPoolConfiguration, InvalidParameter, LimitExceeded, NotAuthorized,
    ResourceConflict, ResourceNotFound, TooManyRequests,
};

/// One remote action of the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    CreateIdentityPool,
    DeleteIdentities,
    DeleteIdentityPool,
    DescribeIdentity,
    DescribeIdentityPool,
    GetCredentialsForIdentity,
    GetId,
    GetIdentityPoolRoles,
    GetOpenIdToken,
    GetOpenIdTokenForDeveloperIdentity,
    ListIdentities,
    ListIdentityPools,
    LookupDeveloperIdentity,
    MergeDeveloperIdentities,
    SetIdentityPoolRoles,
    UnlinkDeveloperIdentity,
    UnlinkIdentity,
    UpdateIdentityPool,
}

const ALL_OPERATIONS: &[Operation] = &[
    Operation::CreateIdentityPool,
    Operation::DeleteIdentities,
    Operation::DeleteIdentityPool,
    Operation::DescribeIdentity,
    Operation::DescribeIdentityPool,
    Operation::GetCredentialsForIdentity,
    Operation::GetId,
    Operation::GetIdentityPoolRoles,
    Operation::GetOpenIdToken,
    Operation::GetOpenIdTokenForDeveloperIdentity,
    Operation::ListIdentities,
    Operation::ListIdentityPools,
    Operation::LookupDeveloperIdentity,
    Operation::MergeDeveloperIdentities,
    Operation::SetIdentityPoolRoles,
    Operation::UnlinkDeveloperIdentity,
    Operation::UnlinkIdentity,
    Operation::UpdateIdentityPool,
];

const CREATE_IDENTITY_POOL_ERRORS: &[ErrorKind] = &[
    InvalidParameter,
    NotAuthorized,
    ResourceConflict,
    TooManyRequests,
    InternalError,
    LimitExceeded,
];
const DELETE_IDENTITIES_ERRORS: &[ErrorKind] = &[InvalidParameter, TooManyRequests, InternalError];
const DESCRIBE_ERRORS: &[ErrorKind] = &[
    InvalidParameter,
    ResourceNotFound,
    NotAuthorized,
    TooManyRequests,
    InternalError,
];
const GET_CREDENTIALS_FOR_IDENTITY_ERRORS: &[ErrorKind] = &[
    InvalidParameter,
    ResourceNotFound,
    NotAuthorized,
    ResourceConflict,
    TooManyRequests,
    InvalidIdentityPoolConfiguration,
    InternalError,
    ExternalService,
];
const GET_ID_ERRORS: &[ErrorKind] = &[
    InvalidParameter,
    ResourceNotFound,
    NotAuthorized,
    ResourceConflict,
    TooManyRequests,
    InternalError,
    LimitExceeded,
    ExternalService,
];
const CONFLICTING_READ_ERRORS: &[ErrorKind] = &[
    InvalidParameter,
    ResourceNotFound,
    NotAuthorized,
    ResourceConflict,
    TooManyRequests,
    InternalError,
];
const EXTERNAL_LOGIN_ERRORS: &[ErrorKind] = &[
    InvalidParameter,
    ResourceNotFound,
    NotAuthorized,
    ResourceConflict,
    TooManyRequests,
    InternalError,
    ExternalService,
];
const DEVELOPER_TOKEN_ERRORS: &[ErrorKind] = &[
    InvalidParameter,
    ResourceNotFound,
    NotAuthorized,
    ResourceConflict,
    TooManyRequests,
    InternalError,
    DeveloperUserAlreadyRegistered,
];
const LIST_IDENTITY_POOLS_ERRORS: &[ErrorKind] = &[
    InvalidParameter,
    NotAuthorized,
    TooManyRequests,
    InternalError,
];
const CONCURRENT_WRITE_ERRORS: &[ErrorKind] = &[
    InvalidParameter,
    ResourceNotFound,
    NotAuthorized,
    ResourceConflict,
    TooManyRequests,
    InternalError,
    ConcurrentModification,
];

impl Operation {
    pub fn all() -> &'static [Operation] {
        ALL_OPERATIONS
    }

    /// Wire action name.
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateIdentityPool => "CreateIdentityPool",
            Self::DeleteIdentities => "DeleteIdentities",
            Self::DeleteIdentityPool => "DeleteIdentityPool",
            Self::DescribeIdentity => "DescribeIdentity",
            Self::DescribeIdentityPool => "DescribeIdentityPool",
            Self::GetCredentialsForIdentity => "GetCredentialsForIdentity",
            Self::GetId => "GetId",
            Self::GetIdentityPoolRoles => "GetIdentityPoolRoles",
            Self::GetOpenIdToken => "GetOpenIdToken",
            Self::GetOpenIdTokenForDeveloperIdentity => "GetOpenIdTokenForDeveloperIdentity",
            Self::ListIdentities => "ListIdentities",
            Self::ListIdentityPools => "ListIdentityPools",
            Self::LookupDeveloperIdentity => "LookupDeveloperIdentity",
            Self::MergeDeveloperIdentities => "MergeDeveloperIdentities",
            Self::SetIdentityPoolRoles => "SetIdentityPoolRoles",
            Self::UnlinkDeveloperIdentity => "UnlinkDeveloperIdentity",
            Self::UnlinkIdentity => "UnlinkIdentity",
            Self::UpdateIdentityPool => "UpdateIdentityPool",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|operation| operation.name() == name)
    }

    /// Faults the service documents for this operation, in documented order.
    pub fn declared_errors(self) -> &'static [ErrorKind] {
        match self {
            Self::CreateIdentityPool => CREATE_IDENTITY_POOL_ERRORS,
            Self::DeleteIdentities => DELETE_IDENTITIES_ERRORS,
            Self::DeleteIdentityPool
            | Self::DescribeIdentity
            | Self::DescribeIdentityPool
            | Self::ListIdentities => DESCRIBE_ERRORS,
            Self::GetCredentialsForIdentity => GET_CREDENTIALS_FOR_IDENTITY_ERRORS,
            Self::GetId => GET_ID_ERRORS,
            Self::GetIdentityPoolRoles
            | Self::LookupDeveloperIdentity
            | Self::MergeDeveloperIdentities
            | Self::UnlinkDeveloperIdentity => CONFLICTING_READ_ERRORS,
            Self::GetOpenIdToken | Self::UnlinkIdentity => EXTERNAL_LOGIN_ERRORS,
            Self::GetOpenIdTokenForDeveloperIdentity => DEVELOPER_TOKEN_ERRORS,
            Self::ListIdentityPools => LIST_IDENTITY_POOLS_ERRORS,
            Self::SetIdentityPoolRoles | Self::UpdateIdentityPool => CONCURRENT_WRITE_ERRORS,
        }
    }

    pub fn declares(self, kind: ErrorKind) -> bool {
        self.declared_errors().contains(&kind)
    }

    /// Public operations need no developer credentials; end users call them
    /// directly.
    pub fn is_public(self) -> bool {
        matches!(
            self,
            Self::GetCredentialsForIdentity | Self::GetId | Self::GetOpenIdToken | Self::UnlinkIdentity
        )
    }

    /// Operations that return no result body.
    pub fn returns_empty_result(self) -> bool {
        matches!(
            self,
            Self::DeleteIdentityPool
                | Self::SetIdentityPoolRoles
                | Self::UnlinkDeveloperIdentity
                | Self::UnlinkIdentity
        )
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
