use adspend_matcher::{api, AppConfig, ReconcileService};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    info!("Starting server with config: {:?}", config);

    let service = Arc::new(ReconcileService::new(&config.matching, config.columns.clone()));

    let app = api::routes(service).layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/reconcile/propose     - 导入 + 聚合 + 自动匹配");
    info!("  POST /api/reconcile/rescore     - 重新自动评分");
    info!("  POST /api/reconcile/apply       - 应用人工匹配");
    info!("  POST /api/reconcile/report      - 产品花费报表 (JSON)");
    info!("  POST /api/reconcile/report.csv  - 产品花费报表 (CSV)");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
