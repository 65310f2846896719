//! Backend client and page wiring against a mock HTTP server.

use std::time::Duration;

use httpmock::{
    Method::{GET, PATCH, POST},
    MockServer,
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use testresult::TestResult;

use concession::bundles::BundleId;
use concession_app::{
    api::{ApiClient, ApiError},
    context::AppContext,
    pages::BundlesPage,
};

fn client(server: &MockServer) -> Result<ApiClient, ApiError> {
    ApiClient::new(&server.base_url(), Duration::from_secs(5))
}

#[derive(Debug, Deserialize, PartialEq)]
struct Echo {
    ok: bool,
}

#[tokio::test]
async fn error_body_message_is_kept() -> TestResult {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/coupons/apply");
        then.status(400)
            .json_body(json!({ "error": "Coupon has expired" }));
    });

    let result: Result<Echo, ApiError> = client(&server)?
        .post(&["coupons", "apply"], &json!({ "code": "OLD" }))
        .await;

    match result {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message.as_deref(), Some("Coupon has expired"));
        }
        other => return Err(format!("unexpected result: {other:?}").into()),
    }

    Ok(())
}

#[tokio::test]
async fn message_field_is_used_when_error_is_absent() -> TestResult {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/staff/3");
        then.status(403).json_body(json!({ "message": "Forbidden" }));
    });

    let error = client(&server)?
        .get::<Echo>(&["staff", "3"])
        .await
        .err()
        .ok_or("expected an error")?;

    assert_eq!(error.user_message("fallback"), "Forbidden");

    Ok(())
}

#[tokio::test]
async fn plain_text_error_falls_back() -> TestResult {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/ngos");
        then.status(502).body("Bad Gateway");
    });

    let error = client(&server)?
        .get::<Echo>(&["ngos"])
        .await
        .err()
        .ok_or("expected an error")?;

    assert_eq!(error.user_message("Failed to fetch NGOs"), "Failed to fetch NGOs");
    assert!(!error.is_not_found());

    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() -> TestResult {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/suppliers");
        then.status(200).body("not json");
    });

    let result = client(&server)?.get::<Echo>(&["suppliers"]).await;

    assert!(matches!(result, Err(ApiError::Decode(_))));

    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() -> TestResult {
    let api = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(200))?;

    let result = api.get::<Echo>(&["suppliers"]).await;

    assert!(matches!(result, Err(ApiError::Transport(_))));

    Ok(())
}

#[tokio::test]
async fn staff_page_toggles_through_http_services() -> TestResult {
    let server = MockServer::start_async().await;
    let listing = server.mock(|when, then| {
        when.method(GET)
            .path("/bundles")
            .query_param("include_unavailable", "true");
        then.status(200).json_body(json!({
            "bundles": [{
                "id": 4,
                "name": "Movie Night",
                "total_price": 12.0,
                "is_available": true,
                "items": []
            }]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/customers/products");
        then.status(200).json_body(json!({ "products": [] }));
    });
    let toggle = server.mock(|when, then| {
        when.method(PATCH).path("/bundles/4/toggle");
        then.status(200).json_body(json!({}));
    });

    let mut page = BundlesPage::new(AppContext::from_api(&client(&server)?));
    page.mount().await;
    page.toggle(BundleId::new(4)).await;

    toggle.assert();
    listing.assert_hits(2);
    assert_eq!(page.feedback().banner(), None);
    assert_eq!(page.bundles().len(), 1);

    Ok(())
}
