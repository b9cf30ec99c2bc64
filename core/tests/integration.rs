//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and exercises every domain
//! module over real HTTP through `ReqwestTransport`. A second, ad-hoc axum
//! router serves deliberately broken responses to check normalization.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use dashboard_api::{
    is_api_error, ApiClient, ClientConfig, CommissionStatus, CreateReferral, NoopSink,
    PayoutRequest, PointsTransaction, Query, RedeemPointsRequest, ReqwestTransport,
    TransactionKind, UpdateProfile,
};
use tokio::net::TcpListener;
use uuid::Uuid;

const USER_ID: Uuid = Uuid::from_u128(1);

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        dev_mode: true,
    };
    ApiClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn loyalty_lifecycle() {
    let base_url = spawn(mock_server::app()).await;
    let client = client(&base_url);
    let loyalty = client.loyalty();

    let points = loyalty.get_points().await.unwrap();
    assert_eq!(points.balance, 1200);
    assert_eq!(points.next_tier.as_deref(), Some("gold"));

    let first = loyalty.get_transactions(None, None).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.meta.total, 12);
    assert!(first.has_next_page());

    let second = loyalty.get_transactions(Some(2), Some(10)).await.unwrap();
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_next_page());

    let result = loyalty
        .redeem_points(&RedeemPointsRequest {
            amount: 300,
            reward_id: Uuid::new_v4(),
            user_id: USER_ID,
        })
        .await
        .unwrap();
    assert_eq!(result.balance, 900);

    let latest = loyalty.get_transactions(Some(1), Some(1)).await.unwrap();
    let newest: &PointsTransaction = &latest.items[0];
    assert_eq!(newest.id, result.transaction_id);
    assert_eq!(newest.kind, TransactionKind::Redeemed);
    assert_eq!(newest.points, -300);

    let tiers = loyalty.get_tiers().await.unwrap();
    assert_eq!(tiers.len(), 3);
    assert_eq!(tiers[2].tier, "gold");
}

#[tokio::test]
async fn validation_and_business_errors_surface_verbatim() {
    let base_url = spawn(mock_server::app()).await;
    let client = client(&base_url);

    let err = client
        .loyalty()
        .redeem_points(&RedeemPointsRequest {
            amount: 0,
            reward_id: Uuid::nil(),
            user_id: USER_ID,
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.field_error("amount"), Some("must be greater than zero"));

    let err = client
        .loyalty()
        .redeem_points(&RedeemPointsRequest {
            amount: 1_000_000,
            reward_id: Uuid::nil(),
            user_id: USER_ID,
        })
        .await
        .unwrap_err();
    assert_eq!(err.message, "Insufficient points");
    assert!(err.errors.is_none());
}

#[tokio::test]
async fn commissions_referrals_and_users() {
    let base_url = spawn(mock_server::app()).await;
    let client = client(&base_url);

    let paid = client
        .commissions()
        .get_commissions(None, None, Some(CommissionStatus::Paid))
        .await
        .unwrap();
    assert_eq!(paid.meta.total, 2);
    assert!(paid.items.iter().all(|c| c.status == CommissionStatus::Paid));

    let summary = client.commissions().get_summary().await.unwrap();
    assert_eq!(summary.currency, "EUR");
    assert!((summary.total_earned - 100.0).abs() < f64::EPSILON);

    let payout = client
        .commissions()
        .request_payout(&PayoutRequest {
            amount: 50.0,
            destination: "DE89370400440532013000".to_string(),
        })
        .await
        .unwrap();
    assert!((payout.amount - 50.0).abs() < f64::EPSILON);

    let referral = client
        .referrals()
        .create_referral(&CreateReferral {
            email: "grace@example.com".to_string(),
        })
        .await
        .unwrap();
    let referrals = client.referrals().get_referrals(None, None).await.unwrap();
    assert_eq!(referrals.items, vec![referral]);

    let duplicate = client
        .referrals()
        .create_referral(&CreateReferral {
            email: "grace@example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(duplicate.message, "This email has already been referred");

    let link = client.referrals().get_referral_link().await.unwrap();
    assert!(link.url.ends_with(&link.code));

    let user = client.users().get_current_user().await.unwrap();
    assert_eq!(user.id, USER_ID);
    let updated = client
        .users()
        .update_profile(&UpdateProfile {
            name: Some("Ada Lovelace".to_string()),
            email: None,
        })
        .await
        .unwrap();
    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.email, user.email);
}

#[tokio::test]
async fn unstructured_failures_are_normalized() {
    let router = Router::new()
        .route(
            "/plain",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
        .route(
            "/structured",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    r#"{"message":"Maintenance window"}"#,
                )
            }),
        )
        .route(
            "/malformed-errors",
            get(|| async { (StatusCode::BAD_REQUEST, r#"{"message":"x","errors":"bad"}"#) }),
        )
        .route("/no-meta", get(|| async { r#"{"items":[1,2,3]}"# }));
    let base_url = spawn(router).await;
    let client = client(&base_url);

    let err = client.get::<serde_json::Value>("/plain", Query::new()).await.unwrap_err();
    assert_eq!(err.message, "Request failed with status code 500");

    let err = client.get::<serde_json::Value>("/structured", Query::new()).await.unwrap_err();
    assert_eq!(err.message, "Maintenance window");

    let err = client
        .get::<serde_json::Value>("/malformed-errors", Query::new())
        .await
        .unwrap_err();
    assert_eq!(err.message, "Request failed with status code 400");

    let err = client.get::<serde_json::Value>("/missing", Query::new()).await.unwrap_err();
    assert_eq!(err.message, "Request failed with status code 404");
    assert!(is_api_error(&serde_json::to_value(&err).unwrap()));

    let page = client.get_page::<u32>("/no-meta", Query::new()).await.unwrap();
    assert_eq!(page.items, vec![1, 2, 3]);
    assert_eq!(page.meta.current, 1);
    assert_eq!(page.meta.page_size, 3);
    assert_eq!(page.meta.total, 3);
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
    let client = ApiClient::new(&format!("http://{addr}"), Arc::new(transport), Arc::new(NoopSink));

    let err = client.loyalty().get_points().await.unwrap_err();
    assert!(err.message.starts_with("Network error"));
    assert!(err.errors.is_none());
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let base_url = spawn(mock_server::app()).await;
    let client = client(&base_url);

    let loyalty = client.loyalty();
    let users = client.users();

    let (points, tiers, user) = tokio::join!(
        loyalty.get_points(),
        loyalty.get_tiers(),
        users.get_current_user(),
    );
    assert!(points.is_ok());
    assert!(tiers.is_ok());
    assert!(user.is_ok());
}

#[tokio::test]
async fn request_timeout_is_transport_error() {
    let router = Router::new().route(
        "/loyalty/points",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "{}"
        }),
    );
    let base_url = spawn(router).await;
    let transport = ReqwestTransport::new(Duration::from_millis(200)).unwrap();
    let client = ApiClient::new(&base_url, Arc::new(transport), Arc::new(NoopSink));

    let err = client.loyalty().get_points().await.unwrap_err();
    assert_eq!(err.message, "Network error: request timed out");
    assert!(err.errors.is_none());
    assert!(is_api_error(&serde_json::to_value(&err).unwrap()));
}

#[tokio::test]
async fn caller_supplied_reqwest_client() {
    let base_url = spawn(mock_server::app()).await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let transport = ReqwestTransport::from_client(http);
    let client = ApiClient::new(&format!("{base_url}/"), Arc::new(transport), Arc::new(NoopSink));
    assert_eq!(client.base_url(), base_url);

    let points = client.loyalty().get_points().await.unwrap();
    assert_eq!(points.balance, 1200);
}
