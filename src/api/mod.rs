pub mod handlers;

pub use handlers::*;

use crate::service::ReconcileService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 构建全部路由
pub fn routes(service: Arc<ReconcileService>) -> Router {
    let reconcile_routes = Router::new()
        .route("/api/reconcile/propose", post(propose))
        .route("/api/reconcile/rescore", post(rescore))
        .route("/api/reconcile/apply", post(apply_manual))
        .route("/api/reconcile/report", post(report))
        .route("/api/reconcile/report.csv", post(report_csv))
        .with_state(service);

    Router::new()
        .route("/health", get(health_check))
        .merge(reconcile_routes)
}
