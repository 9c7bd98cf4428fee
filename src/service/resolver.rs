use crate::models::{CampaignMatch, ManualDecision, MatchOrigin, MatchResult, NormalizedCampaignGroup};
use crate::service::scorer::SimilarityScorer;
use rayon::prelude::*;
use std::collections::HashMap;

/// 人工匹配应用结果
#[derive(Debug, Clone, Default)]
pub struct ManualOutcome {
    pub campaigns: Vec<CampaignMatch>,
    /// 实际生效的决定数 (同名只计一次)
    pub applied: usize,
    /// 找不到对应广告组的决定名称
    pub unknown: Vec<String>,
    /// 产品列表为空白的决定名称，对应广告组保持原状
    pub invalid: Vec<String>,
}

/// 聚合结果 -> 全部 UNRESOLVED 的初始状态
pub fn initial_matches(groups: Vec<NormalizedCampaignGroup>) -> Vec<CampaignMatch> {
    groups.into_iter().map(CampaignMatch::new).collect()
}

/// 自动评分：非 MANUAL 的广告组重新计算 AUTO / UNRESOLVED
///
/// 按广告组并行评分，输出顺序与输入一致，结果与串行执行相同。
pub fn propose_matches<S: AsRef<str> + Sync>(
    campaigns: Vec<CampaignMatch>,
    products: &[S],
    scorer: &SimilarityScorer,
) -> Vec<CampaignMatch> {
    let proposed: Vec<CampaignMatch> = campaigns
        .into_par_iter()
        .map(|mut campaign| {
            if campaign.result.is_manual() {
                return campaign;
            }
            campaign.result = match scorer.best_match(campaign.name(), products) {
                (Some(product), score) => MatchResult::auto(product, score),
                (None, _) => MatchResult::unresolved(),
            };
            campaign
        })
        .collect();

    let auto = proposed.iter().filter(|c| c.result.origin == MatchOrigin::Auto).count();
    let pending = unresolved(&proposed).len();
    tracing::info!(
        "自动匹配完成: 广告组 {}, 自动 {}, 待人工 {}, 阈值 {}",
        proposed.len(),
        auto,
        pending,
        scorer.threshold
    );

    proposed
}

/// 仍需人工处理的广告组
pub fn unresolved(campaigns: &[CampaignMatch]) -> Vec<&CampaignMatch> {
    campaigns.iter().filter(|c| c.result.is_unresolved()).collect()
}

/// 应用人工决定；调用方重复调用直到 `unresolved` 为空
///
/// 同一广告组出现多次时以最后一条为准。人工决定覆盖 AUTO 与之前的 MANUAL。
/// 只有 `NoProduct` 会记为无产品；空白的产品列表被拒绝，不改动广告组。
pub fn apply_manual(campaigns: Vec<CampaignMatch>, decisions: &[ManualDecision]) -> ManualOutcome {
    let mut by_name: HashMap<&str, &ManualDecision> = HashMap::new();
    for decision in decisions {
        by_name.insert(decision.normalized_name.as_str(), decision);
    }

    let mut applied = 0usize;
    let mut invalid = Vec::new();
    let campaigns: Vec<CampaignMatch> = campaigns
        .into_iter()
        .map(|mut campaign| {
            let Some(decision) = by_name.remove(campaign.name()) else {
                return campaign;
            };
            match decision.choice.clone().into_products() {
                Some(products) => {
                    tracing::debug!("人工匹配 '{}' -> {:?}", campaign.name(), products);
                    campaign.result = MatchResult::manual(products);
                    applied += 1;
                }
                None => invalid.push(campaign.name().to_string()),
            }
            campaign
        })
        .collect();

    let mut unknown: Vec<String> = by_name.into_keys().map(str::to_string).collect();
    unknown.sort();
    if !unknown.is_empty() {
        tracing::warn!("人工决定中有 {} 个未知广告组: {:?}", unknown.len(), unknown);
    }
    if !invalid.is_empty() {
        tracing::warn!("Rejected {} manual decisions with blank products: {:?}", invalid.len(), invalid);
    }
    tracing::info!(
        "人工匹配: 应用 {}, 剩余待处理 {}",
        applied,
        unresolved(&campaigns).len()
    );

    ManualOutcome {
        campaigns,
        applied,
        unknown,
        invalid,
    }
}
