use keyward_access_spec::{account_domain, default_secret_details, merge_details};
use serde_json::json;

#[test]
fn defaults_carry_the_declared_entries() {
    let details = default_secret_details();
    assert_eq!(details["certFileName"], "");
    assert_eq!(details["account_domain"], "local");
    assert_eq!(details["ephemeral_domain_user_data"], json!({}));
    assert_eq!(details.len(), 3);
}

#[test]
fn caller_wins_on_collision_and_defaults_survive() {
    let overlay = json!({
        "account_domain": "corp.example",
        "custom_key": [1, 2, 3]
    });
    let merged = merge_details(
        default_secret_details(),
        overlay.as_object().unwrap(),
    );
    assert_eq!(merged["account_domain"], "corp.example");
    assert_eq!(merged["custom_key"], json!([1, 2, 3]));
    assert_eq!(merged["certFileName"], "");
    assert_eq!(merged["ephemeral_domain_user_data"], json!({}));
}

#[test]
fn account_domain_requires_a_textual_value() {
    let details = json!({"account_domain": "corp.example"});
    assert_eq!(
        account_domain(details.as_object().unwrap()),
        Some("corp.example")
    );

    let numeric = json!({"account_domain": 5});
    assert_eq!(account_domain(numeric.as_object().unwrap()), None);

    let absent = json!({});
    assert_eq!(account_domain(absent.as_object().unwrap()), None);
}
