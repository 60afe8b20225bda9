//! Read-only reporting over an account's transactions: monthly totals,
//! category breakdowns, trends and advisory insights.

pub mod aggregate;
pub mod dashboard;
pub mod handlers;
pub mod insights;
pub mod period;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
