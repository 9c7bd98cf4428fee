use bigdecimal::BigDecimal;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// 广告平台导出的原始行 (聚合后丢弃)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCampaignRow {
    pub campaign_name_raw: String,
    pub cost: Option<BigDecimal>, // 非数字花费强制为 None
    #[serde(default)]
    pub results: Option<BigDecimal>, // 平台 Results 列，可选
    pub source_file: String,
}

impl RawCampaignRow {
    pub fn new(name: impl Into<String>, cost: Option<BigDecimal>, source_file: impl Into<String>) -> Self {
        Self {
            campaign_name_raw: name.into(),
            cost,
            results: None,
            source_file: source_file.into(),
        }
    }

    pub fn with_results(mut self, results: Option<BigDecimal>) -> Self {
        self.results = results;
        self
    }
}

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

/// 按规范化名称聚合后的广告组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCampaignGroup {
    pub normalized_name: String,
    pub total_cost: BigDecimal,        // 仅累加非空花费
    #[serde(default = "zero")]
    pub total_results: BigDecimal,     // 仅累加非空结果数
    pub ads_count: usize,              // 包含花费为空的行
    pub raw_names: IndexSet<String>,   // 保序去重
    pub source_files: IndexSet<String>,
}

impl NormalizedCampaignGroup {
    pub fn new(normalized_name: impl Into<String>) -> Self {
        Self {
            normalized_name: normalized_name.into(),
            total_cost: zero(),
            total_results: zero(),
            ads_count: 0,
            raw_names: IndexSet::new(),
            source_files: IndexSet::new(),
        }
    }

    /// 将一行并入当前组
    pub fn absorb(&mut self, row: &RawCampaignRow) {
        if let Some(cost) = &row.cost {
            self.total_cost += cost;
        }
        if let Some(results) = &row.results {
            self.total_results += results;
        }
        self.ads_count += 1;
        self.raw_names.insert(row.campaign_name_raw.clone());
        self.source_files.insert(row.source_file.clone());
    }
}
