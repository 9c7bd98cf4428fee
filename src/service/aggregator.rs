use crate::models::{NormalizedCampaignGroup, RawCampaignRow};
use crate::service::normalizer::normalize;
use indexmap::IndexMap;

/// 平台插入的汇总行标记
const TOTAL_MARKER: &str = "total";

/// 是否为汇总行或空名称行 (聚合前丢弃)
pub fn is_summary_row(raw_name: &str) -> bool {
    let trimmed = raw_name.trim();
    trimmed.is_empty() || trimmed.to_lowercase().contains(TOTAL_MARKER)
}

/// 按规范化名称分组，累加花费并计数
///
/// 花费为空的行计入 `ads_count`，不计入 `total_cost`。
/// 输出顺序为首次出现顺序；按花费排序由调用方负责。
pub fn aggregate(rows: &[RawCampaignRow]) -> Vec<NormalizedCampaignGroup> {
    let mut groups: IndexMap<String, NormalizedCampaignGroup> = IndexMap::new();
    let mut skipped = 0usize;

    for row in rows {
        if is_summary_row(&row.campaign_name_raw) {
            skipped += 1;
            continue;
        }
        let key = normalize(&row.campaign_name_raw);
        groups
            .entry(key)
            .or_insert_with_key(|k| NormalizedCampaignGroup::new(k.clone()))
            .absorb(row);
    }

    tracing::info!(
        "聚合完成: {} 行 -> {} 个广告组 (跳过汇总/空行 {})",
        rows.len(),
        groups.len(),
        skipped
    );

    groups.into_values().collect()
}
