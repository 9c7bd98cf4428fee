pub mod aggregator;
pub mod columns;
pub mod ingest;
pub mod normalizer;
pub mod report;
pub mod resolver;
pub mod scorer;

use crate::config::MatchingConfig;
use crate::error::ReconcileResult;
use crate::models::{ManualDecision, ReconcileSession};
use columns::ColumnRules;
use ingest::RawTable;
use report::ReconcileReport;
use scorer::SimilarityScorer;

pub use aggregator::aggregate;
pub use columns::detect_columns;
pub use normalizer::normalize;
pub use resolver::{apply_manual, propose_matches};
pub use scorer::find_best_match;

/// 人工匹配一轮后的会话
#[derive(Debug, Clone)]
pub struct ManualRound {
    pub session: ReconcileSession,
    pub applied: usize,
    pub unknown: Vec<String>,
    pub invalid: Vec<String>,
}

/// 对账服务：无状态，每次调用读入快照、返回新快照
#[derive(Debug, Clone)]
pub struct ReconcileService {
    rules: ColumnRules,
    scorer: SimilarityScorer,
}

impl ReconcileService {
    pub fn new(matching: &MatchingConfig, rules: ColumnRules) -> Self {
        Self {
            rules,
            scorer: SimilarityScorer::new(matching),
        }
    }

    /// 第一步：导入 -> 聚合 -> 自动匹配
    pub fn propose(
        &self,
        campaign_tables: &[RawTable],
        product_tables: &[RawTable],
    ) -> ReconcileResult<ReconcileSession> {
        let batch = ingest::ingest(campaign_tables, product_tables, &self.rules)?;
        tracing::info!(
            "导入完成: {} 个广告行, {} 个产品, {} 个文件",
            batch.rows.len(),
            batch.products.len(),
            batch.file_reports.len()
        );

        let groups = aggregate(&batch.rows);
        let product_names: Vec<&str> = batch.products.iter().map(|p| p.product_name.as_str()).collect();
        let campaigns = propose_matches(resolver::initial_matches(groups), &product_names, &self.scorer);

        Ok(ReconcileSession {
            campaigns,
            products: batch.products,
            file_reports: batch.file_reports,
        })
    }

    /// 对已有会话重新自动评分 (MANUAL 不受影响)
    pub fn rescore(&self, session: ReconcileSession) -> ReconcileSession {
        let product_names = session.product_names();
        let campaigns = propose_matches(session.campaigns, &product_names, &self.scorer);
        ReconcileSession { campaigns, ..session }
    }

    /// 第二步：应用人工决定，可反复调用
    pub fn apply_manual(&self, session: ReconcileSession, decisions: &[ManualDecision]) -> ManualRound {
        let outcome = apply_manual(session.campaigns, decisions);
        ManualRound {
            session: ReconcileSession {
                campaigns: outcome.campaigns,
                ..session
            },
            applied: outcome.applied,
            unknown: outcome.unknown,
            invalid: outcome.invalid,
        }
    }

    pub fn report(&self, session: &ReconcileSession) -> ReconcileReport {
        report::build_report(session)
    }
}

impl Default for ReconcileService {
    fn default() -> Self {
        Self::new(&MatchingConfig::default(), ColumnRules::default())
    }
}
