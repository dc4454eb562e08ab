use genform::interpret::leaf_paths;
use genform::samples::complex_schema;
use genform::{ChangeEvent, FieldPath, FormSession, SubmitError};
use serde_json::json;

fn complex_session() -> FormSession {
    let mut session = FormSession::default();
    session.load_str(&complex_schema().to_string()).unwrap();
    session
}

#[test]
fn every_rendered_path_round_trips_through_change_events() {
    let mut session = complex_session();
    let paths = leaf_paths(session.instructions());
    for path in &paths {
        session.apply(&ChangeEvent::new(path.to_string(), format!("v:{path}"))).unwrap();
    }
    for path in &paths {
        assert_eq!(session.data().get(path), Some(format!("v:{path}").as_str()));
    }
    assert!(session.missing_required().is_empty());
    assert!(session.submit().is_ok());
}

#[test]
fn submit_lists_missing_required_in_document_order() {
    let mut session = complex_session();
    session.change("personalInfo.firstName", "Ada").unwrap();
    session.change("contactInfo.address.location.country", "uk").unwrap();

    let Err(SubmitError::MissingRequired(missing)) = session.submit() else {
        panic!("expected missing required fields");
    };
    let missing: Vec<String> = missing.iter().map(ToString::to_string).collect();
    assert_eq!(
        missing,
        vec![
            "personalInfo.lastName",
            "personalInfo.identification.idType",
            "contactInfo.email",
            "contactInfo.phone",
            "contactInfo.address.street",
            "contactInfo.address.location.city",
            "contactInfo.address.location.state",
            "contactInfo.address.location.zipCode",
            "professionalInfo.employmentStatus",
        ]
    );
}

#[test]
fn snapshots_taken_before_a_change_stay_valid() {
    let mut session = complex_session();
    session.change("contactInfo.email", "a@b.c").unwrap();
    let before = session.data().clone();
    session.change("contactInfo.address.city", "Oslo").unwrap();

    assert_eq!(before.to_json(), json!({"contactInfo": {"email": "a@b.c"}}));
    assert_eq!(
        session.data().to_json(),
        json!({"contactInfo": {"email": "a@b.c", "address": {"city": "Oslo"}}})
    );
}

#[test]
fn hand_built_paths_are_checked() {
    let mut session = complex_session();
    assert!(session.change("", "x").is_err());
    assert!(session.change("contactInfo.", "x").is_err());
    let odd = FieldPath::root().child("a").child("").child("b");
    assert!(session.change_path(&odd, "x").is_err());
    assert!(session.data().is_empty());
}

#[test]
fn swapping_schemas_keeps_values_for_shared_paths() {
    let mut session = FormSession::default();
    session
        .load_str(r#"[{"type": "email", "name": "email", "label": "Email", "required": true}]"#)
        .unwrap();
    session.change("email", "a@b.c").unwrap();
    session.load_str(&complex_schema().to_string()).unwrap();

    assert_eq!(session.data().to_json(), json!({"email": "a@b.c"}));
    assert_eq!(leaf_paths(session.instructions()).len(), 16);
}

#[test]
fn overlong_event_path_is_rejected_without_touching_data() {
    let mut session = complex_session();
    session.change("contactInfo.email", "a@b.c").unwrap();
    let path = vec!["contactInfo"; 20_000].join(".");
    assert!(session.apply(&ChangeEvent::new(path, "x")).is_err());
    assert_eq!(session.data().to_json(), json!({"contactInfo": {"email": "a@b.c"}}));
}
