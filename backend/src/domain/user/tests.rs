//! Tests for the domain user model.

use super::*;
use rstest::rstest;
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("must fail"), expected);
}

#[rstest]
fn user_id_keeps_original_text() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.as_ref(), VALID_ID);
    assert_eq!(id.as_uuid().to_string(), VALID_ID);
}

#[rstest]
fn random_ids_are_distinct() {
    assert_ne!(UserId::random(), UserId::random());
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("    ", UserValidationError::EmptyUsername)]
fn username_rejects_blank(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw).expect_err("must fail"), expected);
}

#[rstest]
fn username_rejects_overlong_values() {
    let raw = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw).expect_err("must fail"),
        UserValidationError::UsernameTooLong { max: USERNAME_MAX }
    );
}

#[rstest]
fn username_is_trimmed() {
    let name = Username::new("  alice ").expect("valid username");
    assert_eq!(name.as_ref(), "alice");
}

#[rstest]
fn user_serialises_without_credentials() {
    let user = User::try_from_strings(VALID_ID, "alice").expect("valid user");
    let value = serde_json::to_value(&user).expect("serialise");
    assert_eq!(value, json!({ "id": VALID_ID, "username": "alice" }));
}

#[rstest]
fn user_deserialisation_validates_id() {
    let result = serde_json::from_value::<User>(json!({ "id": "nope", "username": "alice" }));
    assert!(result.is_err());
}
