use keyward_access_spec::{Error, Secret, SecretKind, TargetSet, TargetSetKind};
use serde_json::json;
use std::str::FromStr;

#[test]
fn secret_details_normalize_null_and_absent_to_empty() {
    let with_null: Secret = serde_json::from_value(json!({
        "secret_id": "s-1",
        "secret_type": "ProvisionerUser",
        "secret_name": "ops",
        "is_active": true,
        "secret_details": null
    }))
    .unwrap();
    assert!(with_null.secret_details.is_empty());

    let absent: Secret = serde_json::from_value(json!({
        "secret_id": "s-2",
        "secret_type": "PCloudAccount"
    }))
    .unwrap();
    assert!(absent.secret_details.is_empty());
}

#[test]
fn secret_kind_round_trips_exact_names_only() {
    assert_eq!(
        SecretKind::from_str("ProvisionerUser").unwrap(),
        SecretKind::ProvisionerUser
    );
    assert_eq!(
        SecretKind::from_str("PCloudAccount").unwrap(),
        SecretKind::PCloudAccount
    );
    assert_eq!(
        SecretKind::from_str("provisioneruser").unwrap_err(),
        Error::UnknownSecretType("provisioneruser".to_string())
    );
    assert_eq!(SecretKind::ProvisionerUser.to_string(), "ProvisionerUser");
}

#[test]
fn target_set_id_aliases_the_name() {
    let target_set: TargetSet = serde_json::from_value(json!({
        "name": "web.example.com",
        "type": "Suffix"
    }))
    .unwrap();
    assert_eq!(target_set.id(), "web.example.com");
    assert_eq!(target_set.kind, TargetSetKind::Suffix);
}

#[test]
fn target_set_kind_defaults_to_domain() {
    let target_set: TargetSet = serde_json::from_value(json!({"name": "a"})).unwrap();
    assert_eq!(target_set.kind, TargetSetKind::Domain);
    assert_eq!(TargetSetKind::from_str("Target").unwrap(), TargetSetKind::Target);
    assert!(TargetSetKind::from_str("domain").is_err());
}
