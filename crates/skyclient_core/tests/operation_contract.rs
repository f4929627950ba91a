use skyclient_core::{CognitoIdentityError, ErrorKind, Operation};
use std::collections::BTreeSet;

use ErrorKind::{
    ConcurrentModification, DeveloperUserAlreadyRegistered, ExternalService, InternalError,
    InvalidIdentityPoolConfiguration, InvalidParameter, LimitExceeded, NotAuthorized,
    ResourceConflict, ResourceNotFound, TooManyRequests,
};

fn declared(operation: Operation) -> BTreeSet<ErrorKind> {
    operation.declared_errors().iter().copied().collect()
}

fn set(kinds: &[ErrorKind]) -> BTreeSet<ErrorKind> {
    kinds.iter().copied().collect()
}

#[test]
fn declared_fault_sets_match_the_service_contract() {
    let common = [InvalidParameter, TooManyRequests, InternalError];
    let table: &[(Operation, &[ErrorKind])] = &[
        (
            Operation::CreateIdentityPool,
            &[NotAuthorized, ResourceConflict, LimitExceeded],
        ),
        (Operation::DeleteIdentities, &[]),
        (Operation::DeleteIdentityPool, &[ResourceNotFound, NotAuthorized]),
        (Operation::DescribeIdentity, &[ResourceNotFound, NotAuthorized]),
        (Operation::DescribeIdentityPool, &[ResourceNotFound, NotAuthorized]),
        (
            Operation::GetCredentialsForIdentity,
            &[
                ResourceNotFound,
                NotAuthorized,
                ResourceConflict,
                InvalidIdentityPoolConfiguration,
                ExternalService,
            ],
        ),
        (
            Operation::GetId,
            &[
                ResourceNotFound,
                NotAuthorized,
                ResourceConflict,
                LimitExceeded,
                ExternalService,
            ],
        ),
        (
            Operation::GetIdentityPoolRoles,
            &[ResourceNotFound, NotAuthorized, ResourceConflict],
        ),
        (
            Operation::GetOpenIdToken,
            &[ResourceNotFound, NotAuthorized, ResourceConflict, ExternalService],
        ),
        (
            Operation::GetOpenIdTokenForDeveloperIdentity,
            &[
                ResourceNotFound,
                NotAuthorized,
                ResourceConflict,
                DeveloperUserAlreadyRegistered,
            ],
        ),
        (Operation::ListIdentities, &[ResourceNotFound, NotAuthorized]),
        (Operation::ListIdentityPools, &[NotAuthorized]),
        (
            Operation::LookupDeveloperIdentity,
            &[ResourceNotFound, NotAuthorized, ResourceConflict],
        ),
        (
            Operation::MergeDeveloperIdentities,
            &[ResourceNotFound, NotAuthorized, ResourceConflict],
        ),
        (
            Operation::SetIdentityPoolRoles,
            &[
                ResourceNotFound,
                NotAuthorized,
                ResourceConflict,
                ConcurrentModification,
            ],
        ),
        (
            Operation::UnlinkDeveloperIdentity,
            &[ResourceNotFound, NotAuthorized, ResourceConflict],
        ),
        (
            Operation::UnlinkIdentity,
            &[ResourceNotFound, NotAuthorized, ResourceConflict, ExternalService],
        ),
        (
            Operation::UpdateIdentityPool,
            &[
                ResourceNotFound,
                NotAuthorized,
                ResourceConflict,
                ConcurrentModification,
            ],
        ),
    ];

    assert_eq!(table.len(), Operation::all().len());
    for (operation, extra) in table {
        let mut expected = set(&common);
        expected.extend(extra.iter().copied());
        assert_eq!(declared(*operation), expected, "{operation}");
        assert_eq!(
            operation.declared_errors().len(),
            expected.len(),
            "{operation} declares a fault twice"
        );
    }
}

#[test]
fn operation_names_round_trip() {
    for operation in Operation::all() {
        assert_eq!(Operation::from_name(operation.name()), Some(*operation));
        assert_eq!(operation.to_string(), operation.name());
    }
    assert_eq!(Operation::GetId.name(), "GetId");
    assert_eq!(
        Operation::GetOpenIdTokenForDeveloperIdentity.name(),
        "GetOpenIdTokenForDeveloperIdentity"
    );
    assert_eq!(Operation::from_name("AssumeRole"), None);
}

#[test]
fn empty_result_operations() {
    let empty: BTreeSet<Operation> = Operation::all()
        .iter()
        .copied()
        .filter(|operation| operation.returns_empty_result())
        .collect();
    assert_eq!(
        empty,
        set_of_operations(&[
            Operation::DeleteIdentityPool,
            Operation::SetIdentityPoolRoles,
            Operation::UnlinkDeveloperIdentity,
            Operation::UnlinkIdentity,
        ])
    );
}

#[test]
fn unauthenticated_operations_are_public() {
    let public: BTreeSet<Operation> = Operation::all()
        .iter()
        .copied()
        .filter(|operation| operation.is_public())
        .collect();
    assert_eq!(
        public,
        set_of_operations(&[
            Operation::GetCredentialsForIdentity,
            Operation::GetId,
            Operation::GetOpenIdToken,
            Operation::UnlinkIdentity,
        ])
    );
}

fn set_of_operations(operations: &[Operation]) -> BTreeSet<Operation> {
    operations.iter().copied().collect()
}

#[test]
fn wire_codes_round_trip() {
    assert_eq!(ErrorKind::all().len(), 11);
    for kind in ErrorKind::all() {
        assert!(kind.code().ends_with("Exception"));
        assert_eq!(ErrorKind::from_code(kind.code()), Some(*kind));
        assert!(!kind.description().is_empty());
    }
    assert_eq!(
        ErrorKind::from_code("LimitExceededException"),
        Some(LimitExceeded)
    );
    assert_eq!(ErrorKind::from_code("AccessDeniedException"), None);
}

#[test]
fn only_throttling_and_internal_faults_are_retryable() {
    let retryable: BTreeSet<ErrorKind> = ErrorKind::all()
        .iter()
        .copied()
        .filter(|kind| kind.is_retryable())
        .collect();
    assert_eq!(retryable, set(&[TooManyRequests, InternalError]));
}

#[test]
fn error_display_carries_code_and_message() {
    let err = CognitoIdentityError::new(ResourceNotFound, "identity pool not found: us-east-1:0");
    assert_eq!(err.kind(), ResourceNotFound);
    assert_eq!(err.code(), "ResourceNotFoundException");
    assert_eq!(err.message(), "identity pool not found: us-east-1:0");
    assert_eq!(
        err.to_string(),
        "ResourceNotFoundException: identity pool not found: us-east-1:0"
    );
}
