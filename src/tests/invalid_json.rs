use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_invalid_json() {
    let app = helper::setup_test_app();

    // missing data
    let body = r"{}";
    let (status_code, error) = helper::maybe_create_entry_with_raw_body(&app, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error.is_some());
    let error = error.unwrap();
    assert_eq!("Data error".to_string(), error.error);
    assert_eq!(
        Some("Failed to deserialize the JSON body into the target type".to_string()),
        error.description
    );

    // syntax error
    let body = r#"{"}"#;
    let (status_code, error) = helper::maybe_create_entry_with_raw_body(&app, body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error.is_some());
    let error = error.unwrap();
    assert_eq!("JSON syntax error".to_string(), error.error);
    assert!(error
        .description
        .unwrap()
        .contains("line 1 column 3"));

    // missing content type
    let body = r"{}";
    let (status_code, error) = helper::maybe_create_entry_with_raw_body(&app, body, false).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error.is_some());
    let error = error.unwrap();
    assert_eq!(
        "Missing `application/json` content type".to_string(),
        error.error
    );
}

#[tokio::test]
async fn test_invalid_entry_id() {
    let app = helper::setup_test_app();

    // validate uuid on update
    let (status_code, _, error) =
        helper::maybe_update_entry(&app, "some-id", Some("Alice"), None).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Invalid path parameter".to_string()), error);

    // validate uuid on delete
    let (status_code, _, error) = helper::maybe_delete_entry(&app, "some-id").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Invalid path parameter".to_string()), error);
}
