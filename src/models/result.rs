use super::campaign::NormalizedCampaignGroup;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// 人工确认的固定分数
pub const MANUAL_MATCH_SCORE: f64 = 100.0;
pub const MANUAL_NO_PRODUCT_SCORE: f64 = 0.0;

/// 匹配来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchOrigin {
    Auto,
    Manual,
    Unresolved,
}

/// 广告组的匹配结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_products: IndexSet<String>, // 空集合 = 明确无产品 (仅 MANUAL)
    pub match_score: f64,
    pub origin: MatchOrigin,
}

impl MatchResult {
    pub fn unresolved() -> Self {
        Self {
            matched_products: IndexSet::new(),
            match_score: 0.0,
            origin: MatchOrigin::Unresolved,
        }
    }

    pub fn auto(product: &str, score: f64) -> Self {
        Self {
            matched_products: IndexSet::from([product.to_string()]),
            match_score: score,
            origin: MatchOrigin::Auto,
        }
    }

    /// 人工决定：有产品则分数 100，无产品则 0
    pub fn manual(products: IndexSet<String>) -> Self {
        let match_score = if products.is_empty() {
            MANUAL_NO_PRODUCT_SCORE
        } else {
            MANUAL_MATCH_SCORE
        };
        Self {
            matched_products: products,
            match_score,
            origin: MatchOrigin::Manual,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.origin == MatchOrigin::Manual
    }

    pub fn is_unresolved(&self) -> bool {
        self.origin == MatchOrigin::Unresolved
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::unresolved()
    }
}

/// 广告组 + 匹配结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignMatch {
    pub group: NormalizedCampaignGroup,
    #[serde(default)]
    pub result: MatchResult,
}

impl CampaignMatch {
    pub fn new(group: NormalizedCampaignGroup) -> Self {
        Self {
            group,
            result: MatchResult::unresolved(),
        }
    }

    pub fn name(&self) -> &str {
        &self.group.normalized_name
    }
}

/// 人工匹配选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "products", rename_all = "snake_case")]
pub enum ManualChoice {
    Single(String),
    Multiple(Vec<String>),
    NoProduct,
}

impl ManualChoice {
    /// 展开为有序去重的产品集合，空白名称忽略
    ///
    /// `Single` / `Multiple` 没有任何非空名称时返回 None，
    /// 只有 `NoProduct` 会得到空集合。
    pub fn into_products(self) -> Option<IndexSet<String>> {
        let (names, no_product) = match self {
            ManualChoice::Single(name) => (vec![name], false),
            ManualChoice::Multiple(names) => (names, false),
            ManualChoice::NoProduct => (Vec::new(), true),
        };
        let products: IndexSet<String> = names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if products.is_empty() && !no_product {
            return None;
        }
        Some(products)
    }
}

/// 针对单个广告组的人工决定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualDecision {
    pub normalized_name: String,
    pub choice: ManualChoice,
}

impl ManualDecision {
    pub fn new(normalized_name: impl Into<String>, choice: ManualChoice) -> Self {
        Self {
            normalized_name: normalized_name.into(),
            choice,
        }
    }
}
