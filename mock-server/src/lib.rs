use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyPoints {
    pub balance: u64,
    pub lifetime_earned: u64,
    pub lifetime_redeemed: u64,
    pub tier: String,
    pub next_tier: Option<String>,
    pub points_to_next_tier: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsTransaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub points: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemPoints {
    pub amount: u64,
    pub reward_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub transaction_id: Uuid,
    pub redeemed: u64,
    pub balance: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub tier: String,
    pub min_points: u64,
    pub multiplier: f64,
    pub benefits: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub id: Uuid,
    pub referral_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSummary {
    pub total_earned: f64,
    pub pending: f64,
    pub paid: f64,
    pub currency: String,
}

#[derive(Deserialize)]
pub struct PayoutRequest {
    pub amount: f64,
    pub destination: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: Uuid,
    pub amount: f64,
    pub status: String,
    pub requested_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    pub id: Uuid,
    pub referred_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateReferral {
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferralLink {
    pub code: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageMeta {
    pub current: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub total: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

/// Error body in the `{message, errors?}` shape the client understands.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

pub struct Failure {
    status: StatusCode,
    body: ErrorBody,
}

impl Failure {
    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: message.to_string(),
                errors: None,
            },
        }
    }

    fn invalid(field: &str, message: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody {
                message: "Validation failed".to_string(),
                errors: Some(vec![FieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                }]),
            },
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub struct Store {
    pub user: User,
    pub points: LoyaltyPoints,
    pub transactions: Vec<PointsTransaction>,
    pub tiers: Vec<Tier>,
    pub commissions: Vec<Commission>,
    pub payouts: Vec<Payout>,
    pub referrals: Vec<Referral>,
}

impl Store {
    /// Deterministic demo data: 12 transactions, 3 tiers, 4 commissions.
    pub fn seeded() -> Self {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().unwrap_or_default();
        let transactions: Vec<PointsTransaction> = (0..12)
            .map(|i| PointsTransaction {
                id: Uuid::from_u128(0x1000 + i as u128),
                kind: "earned".to_string(),
                points: 100,
                description: format!("Referral bonus #{}", i + 1),
                created_at: epoch + Duration::days(i),
            })
            .collect();
        let commissions = ["pending", "approved", "paid", "paid"]
            .iter()
            .enumerate()
            .map(|(i, status)| Commission {
                id: Uuid::from_u128(0x2000 + i as u128),
                referral_id: Uuid::from_u128(0x3000 + i as u128),
                amount: 25.0,
                currency: "EUR".to_string(),
                status: status.to_string(),
                created_at: epoch + Duration::days(i as i64),
            })
            .collect();

        Self {
            user: User {
                id: Uuid::from_u128(1),
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
                role: "affiliate".to_string(),
                created_at: epoch,
            },
            points: LoyaltyPoints {
                balance: 1200,
                lifetime_earned: 1200,
                lifetime_redeemed: 0,
                tier: "silver".to_string(),
                next_tier: Some("gold".to_string()),
                points_to_next_tier: Some(800),
            },
            transactions,
            tiers: vec![
                tier("bronze", 0, 1.0, &["Birthday bonus"]),
                tier("silver", 1000, 1.25, &["Birthday bonus", "Early access"]),
                tier("gold", 2000, 1.5, &["Birthday bonus", "Early access", "Priority support"]),
            ],
            commissions,
            payouts: Vec::new(),
            referrals: Vec::new(),
        }
    }
}

fn tier(name: &str, min_points: u64, multiplier: f64, benefits: &[&str]) -> Tier {
    Tier {
        tier: name.to_string(),
        min_points,
        multiplier,
        benefits: benefits.iter().map(|b| b.to_string()).collect(),
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/loyalty/points", get(get_points))
        .route("/loyalty/transactions", get(list_transactions))
        .route("/loyalty/redeem", post(redeem_points))
        .route("/loyalty/tiers", get(list_tiers))
        .route("/commissions", get(list_commissions))
        .route("/commissions/summary", get(commission_summary))
        .route("/commissions/payouts", post(request_payout))
        .route("/referrals", get(list_referrals).post(create_referral))
        .route("/referrals/link", get(referral_link))
        .route("/users/me", get(current_user).post(update_profile))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Slice `items` into the requested page.
fn paginate<T: Clone>(items: &[T], params: &PageParams) -> Page<T> {
    let current = params.page.filter(|p| *p > 0).unwrap_or(1);
    let page_size = params.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE);
    let start = (current as usize - 1).saturating_mul(page_size as usize);
    Page {
        items: items.iter().skip(start).take(page_size as usize).cloned().collect(),
        meta: PageMeta {
            current,
            page_size,
            total: items.len() as u64,
        },
    }
}

// ---------------------------------------------------------------------------
// Loyalty
// ---------------------------------------------------------------------------

async fn get_points(State(db): State<Db>) -> Json<LoyaltyPoints> {
    Json(db.read().await.points.clone())
}

async fn list_transactions(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Json<Page<PointsTransaction>> {
    let store = db.read().await;
    Json(paginate(&store.transactions, &params))
}

async fn redeem_points(
    State(db): State<Db>,
    Json(input): Json<RedeemPoints>,
) -> Result<Json<Redemption>, Failure> {
    if input.amount == 0 {
        return Err(Failure::invalid("amount", "must be greater than zero"));
    }
    let mut store = db.write().await;
    if input.user_id != store.user.id {
        return Err(Failure::invalid("userId", "unknown user"));
    }
    if input.amount > store.points.balance {
        return Err(Failure::bad_request("Insufficient points"));
    }
    store.points.balance -= input.amount;
    store.points.lifetime_redeemed += input.amount;
    let transaction = PointsTransaction {
        id: Uuid::new_v4(),
        kind: "redeemed".to_string(),
        points: -(input.amount as i64),
        description: format!("Reward {}", input.reward_id),
        created_at: Utc::now(),
    };
    let transaction_id = transaction.id;
    store.transactions.insert(0, transaction);
    Ok(Json(Redemption {
        transaction_id,
        redeemed: input.amount,
        balance: store.points.balance,
    }))
}

async fn list_tiers(State(db): State<Db>) -> Json<Vec<Tier>> {
    Json(db.read().await.tiers.clone())
}

// ---------------------------------------------------------------------------
// Commissions
// ---------------------------------------------------------------------------

async fn list_commissions(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Json<Page<Commission>> {
    let store = db.read().await;
    let matching: Vec<Commission> = store
        .commissions
        .iter()
        .filter(|c| params.status.as_deref().map_or(true, |s| c.status == s))
        .cloned()
        .collect();
    Json(paginate(&matching, &params))
}

async fn commission_summary(State(db): State<Db>) -> Json<CommissionSummary> {
    let store = db.read().await;
    let sum = |status: &str| -> f64 {
        store
            .commissions
            .iter()
            .filter(|c| c.status == status)
            .map(|c| c.amount)
            .sum()
    };
    Json(CommissionSummary {
        total_earned: store.commissions.iter().map(|c| c.amount).sum(),
        pending: sum("pending"),
        paid: sum("paid"),
        currency: "EUR".to_string(),
    })
}

async fn request_payout(
    State(db): State<Db>,
    Json(input): Json<PayoutRequest>,
) -> Result<(StatusCode, Json<Payout>), Failure> {
    if input.amount <= 0.0 {
        return Err(Failure::invalid("amount", "must be greater than zero"));
    }
    if input.destination.trim().is_empty() {
        return Err(Failure::invalid("destination", "is required"));
    }
    let mut store = db.write().await;
    let payout = Payout {
        id: Uuid::new_v4(),
        amount: input.amount,
        status: "requested".to_string(),
        requested_at: Utc::now(),
    };
    store.payouts.push(payout.clone());
    Ok((StatusCode::CREATED, Json(payout)))
}

// ---------------------------------------------------------------------------
// Referrals
// ---------------------------------------------------------------------------

async fn list_referrals(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Json<Page<Referral>> {
    let store = db.read().await;
    Json(paginate(&store.referrals, &params))
}

async fn create_referral(
    State(db): State<Db>,
    Json(input): Json<CreateReferral>,
) -> Result<(StatusCode, Json<Referral>), Failure> {
    if !input.email.contains('@') {
        return Err(Failure::invalid("email", "must be a valid email address"));
    }
    let mut store = db.write().await;
    if store.referrals.iter().any(|r| r.referred_email == input.email) {
        return Err(Failure::bad_request("This email has already been referred"));
    }
    let referral = Referral {
        id: Uuid::new_v4(),
        referred_email: input.email,
        status: "pending".to_string(),
        created_at: Utc::now(),
    };
    store.referrals.push(referral.clone());
    Ok((StatusCode::CREATED, Json(referral)))
}

async fn referral_link(State(db): State<Db>) -> Json<ReferralLink> {
    let store = db.read().await;
    let code = store.user.name.to_uppercase();
    Json(ReferralLink {
        url: format!("https://dashboard.example.com/r/{code}"),
        code,
    })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn current_user(State(db): State<Db>) -> Json<User> {
    Json(db.read().await.user.clone())
}

async fn update_profile(
    State(db): State<Db>,
    Json(input): Json<UpdateProfile>,
) -> Result<Json<User>, Failure> {
    let mut store = db.write().await;
    if let Some(name) = input.name {
        if name.trim().is_empty() {
            return Err(Failure::invalid("name", "must not be empty"));
        }
        store.user.name = name;
    }
    if let Some(email) = input.email {
        if !email.contains('@') {
            return Err(Failure::invalid("email", "must be a valid email address"));
        }
        store.user.email = email;
    }
    Ok(Json(store.user.clone()))
}
