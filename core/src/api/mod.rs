//! Domain API modules.
//!
//! Each module is a thin, stateless view over an `ApiClient`: an operation
//! builds its path and query, calls the client with the expected response
//! type and returns whatever the client returns. No module recovers from or
//! rewrites errors.

mod commission;
mod loyalty;
mod referral;
mod user;

pub use commission::CommissionApi;
pub use loyalty::LoyaltyApi;
pub use referral::ReferralApi;
pub use user::UserApi;
