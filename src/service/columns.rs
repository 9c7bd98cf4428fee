use crate::error::{ColumnRole, ReconcileError, ReconcileResult};
use serde::{Deserialize, Serialize};

/// 一档关键字：列名 (小写) 包含任一关键字且不含任何排除标记即命中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTier {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl KeywordTier {
    pub fn new(keywords: &[&str], exclude: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            exclude: exclude.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn accepts(&self, column_lower: &str) -> bool {
        self.keywords.iter().any(|k| column_lower.contains(k.as_str()))
            && !self.exclude.iter().any(|x| column_lower.contains(x.as_str()))
    }
}

/// 某个角色的检测规则：按档位优先级依次尝试，档内按列出现顺序取第一个
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub tiers: Vec<KeywordTier>,
}

impl ColumnRule {
    pub fn new(tiers: Vec<KeywordTier>) -> Self {
        Self { tiers }
    }

    pub fn find<'a>(&self, columns: &'a [String]) -> Option<&'a str> {
        let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();
        self.tiers.iter().find_map(|tier| {
            lowered
                .iter()
                .position(|c| tier.accepts(c))
                .map(|idx| columns[idx].as_str())
        })
    }
}

/// 全部列检测规则；新增平台/语言只需扩展关键字表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRules {
    pub campaign: ColumnRule,
    pub cost: ColumnRule,
    /// 平台结果数 (可选列)
    pub results: ColumnRule,
    pub product_name: ColumnRule,
    pub total_orders: ColumnRule,
    pub delivered: ColumnRule,
    pub cancelled: ColumnRule,
}

impl Default for ColumnRules {
    fn default() -> Self {
        Self {
            campaign: ColumnRule::new(vec![KeywordTier::new(
                &[
                    "campaign", "ad name", "ad set name", "ad",
                    "اسم", "حملة", "الحملة", "إعلان", "اعلان",
                ],
                &[],
            )]),
            cost: ColumnRule::new(vec![
                KeywordTier::new(&["amount spent"], &[]),
                KeywordTier::new(
                    &[
                        "cost", "spend", "spent", "amount",
                        "المبلغ", "المنفق", "إنفاق", "انفاق", "تكلفة", "التكلفة",
                    ],
                    &["cpc", "cpm", "per", "avg", "/"],
                ),
            ]),
            results: ColumnRule::new(vec![KeywordTier::new(
                &["results", "conversions", "النتائج", "نتائج"],
                &["cost", "per", "rate", "/", "تكلفة"],
            )]),
            product_name: ColumnRule::new(vec![
                KeywordTier::new(&["product name", "اسم المنتج"], &[]),
                KeywordTier::new(
                    &["product", "المنتج", "name", "اسم"],
                    &[" id", "sku", "code", "كود"],
                ),
            ]),
            total_orders: ColumnRule::new(vec![
                KeywordTier::new(&["total orders", "إجمالي الطلبات", "اجمالي الطلبات"], &[]),
                KeywordTier::new(
                    &["orders", "الطلبات", "طلبات"],
                    &["delivered", "cancel", "تم التوصيل", "ملغ"],
                ),
            ]),
            delivered: ColumnRule::new(vec![KeywordTier::new(
                &["delivered", "تم التوصيل", "مستلم"],
                &["not delivered", "undelivered"],
            )]),
            cancelled: ColumnRule::new(vec![KeywordTier::new(&["cancel", "ملغ"], &[])]),
        }
    }
}

/// 检测广告名称列和花费列，任一可能缺失
pub fn detect_columns(columns: &[String], rules: &ColumnRules) -> (Option<String>, Option<String>) {
    let campaign = rules.campaign.find(columns).map(str::to_string);
    let cost = rules.cost.find(columns).map(str::to_string);
    (campaign, cost)
}

/// 同 `detect_columns`，但缺任一列时返回 `MissingColumn`
pub fn require_campaign_columns(
    file: &str,
    columns: &[String],
    rules: &ColumnRules,
) -> ReconcileResult<(String, String)> {
    match detect_columns(columns, rules) {
        (Some(campaign), Some(cost)) => Ok((campaign, cost)),
        (None, _) => Err(missing(file, ColumnRole::Campaign, columns)),
        (Some(_), None) => Err(missing(file, ColumnRole::Cost, columns)),
    }
}

pub fn require_column(
    file: &str,
    columns: &[String],
    rule: &ColumnRule,
    role: ColumnRole,
) -> ReconcileResult<String> {
    rule.find(columns)
        .map(str::to_string)
        .ok_or_else(|| missing(file, role, columns))
}

fn missing(file: &str, role: ColumnRole, columns: &[String]) -> ReconcileError {
    ReconcileError::MissingColumn {
        file: file.to_string(),
        role,
        available: columns.to_vec(),
    }
}
