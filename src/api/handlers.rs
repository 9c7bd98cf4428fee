use crate::data::write_report_csv;
use crate::error::ReconcileError;
use crate::models::{ManualDecision, ReconcileSession};
use crate::service::ingest::RawTable;
use crate::service::report::ReconcileReport;
use crate::service::ReconcileService;
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 请求体: 已解析的广告表与产品表
#[derive(Debug, Deserialize)]
pub struct ProposeRequest {
    pub campaign_tables: Vec<RawTable>,
    pub product_tables: Vec<RawTable>,
}

/// 请求体: 会话快照 + 本轮人工决定
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub session: ReconcileSession,
    #[serde(default)]
    pub decisions: Vec<ManualDecision>,
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub session: ReconcileSession,
}

/// 响应体: 新会话快照与待人工处理列表
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub message: String,
    pub session: Option<ReconcileSession>,
    pub unresolved: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub message: String,
    pub report: Option<ReconcileReport>,
}

impl SessionResponse {
    fn ok(message: String, session: ReconcileSession) -> Self {
        Self {
            success: true,
            message,
            unresolved: session.unresolved_names(),
            session: Some(session),
            unknown: Vec::new(),
            invalid: Vec::new(),
        }
    }

    fn error(e: &ReconcileError) -> Self {
        Self {
            success: false,
            message: format!("Error: {}", e),
            session: None,
            unresolved: Vec::new(),
            unknown: Vec::new(),
            invalid: Vec::new(),
        }
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 第一步: 导入、聚合并自动匹配
pub async fn propose(
    State(service): State<Arc<ReconcileService>>,
    Json(req): Json<ProposeRequest>,
) -> Response {
    match service.propose(&req.campaign_tables, &req.product_tables) {
        Ok(session) => {
            let message = format!(
                "Matched {} campaign groups against {} products",
                session.campaigns.len(),
                session.products.len()
            );
            (StatusCode::OK, Json(SessionResponse::ok(message, session))).into_response()
        }
        Err(e) => {
            tracing::error!("Propose failed: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, Json(SessionResponse::error(&e))).into_response()
        }
    }
}

/// 重新自动评分 (保留人工结果)
pub async fn rescore(
    State(service): State<Arc<ReconcileService>>,
    Json(req): Json<SessionRequest>,
) -> Response {
    let session = service.rescore(req.session);
    let message = format!("Rescored {} campaign groups", session.campaigns.len());
    (StatusCode::OK, Json(SessionResponse::ok(message, session))).into_response()
}

/// 第二步: 应用人工决定，直到 unresolved 为空
pub async fn apply_manual(
    State(service): State<Arc<ReconcileService>>,
    Json(req): Json<ApplyRequest>,
) -> Response {
    let round = service.apply_manual(req.session, &req.decisions);
    let message = format!("Applied {} manual decisions", round.applied);
    let response = SessionResponse {
        unknown: round.unknown,
        invalid: round.invalid,
        ..SessionResponse::ok(message, round.session)
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 产品花费报表 (JSON)
pub async fn report(
    State(service): State<Arc<ReconcileService>>,
    Json(req): Json<SessionRequest>,
) -> Response {
    let report = service.report(&req.session);
    let response = ReportResponse {
        success: true,
        message: format!("Report for {} products", report.products.len()),
        report: Some(report),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 产品花费报表 (CSV)
pub async fn report_csv(
    State(service): State<Arc<ReconcileService>>,
    Json(req): Json<SessionRequest>,
) -> Response {
    let report = service.report(&req.session);
    let mut body = Vec::new();
    match write_report_csv(&report, &mut body) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            let response = ReportResponse {
                success: false,
                message: format!("Error: {}", e),
                report: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
