use crate::models::{CampaignMatch, MatchOrigin, ProductRecord, ReconcileSession};
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 报表金额保留位数
const MONEY_SCALE: i64 = 2;

/// 单个产品的花费汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    pub product_name: String,
    pub total_orders: Option<i64>,
    pub delivered_count: Option<i64>,
    pub cancelled_count: Option<i64>,
    pub total_spent: BigDecimal,
    /// 平台结果数，与花费按相同比例分摊
    pub total_results: BigDecimal,
    /// 关联广告组的完整广告数 (不分摊，多产品广告组会在每个产品下各计一次)
    pub ads_count: usize,
    pub campaigns: Vec<String>,
    pub cost_per_delivered: Option<BigDecimal>,
}

/// 整批对账报表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub products: Vec<ProductReport>,
    pub campaigns: Vec<CampaignMatch>,
    /// 仍未匹配的广告组花费
    pub unmatched_spend: BigDecimal,
    /// 人工标记为无产品的花费
    pub no_product_spend: BigDecimal,
    pub generated_at: DateTime<Utc>,
}

/// 金额统一为两位小数
fn money(value: &BigDecimal) -> BigDecimal {
    value.round(MONEY_SCALE).with_scale(MONEY_SCALE)
}

/// 每单送达成本：送达数为 0 或未知时为 None
pub fn cost_per_delivered(total_spent: &BigDecimal, delivered_count: Option<i64>) -> Option<BigDecimal> {
    match delivered_count {
        Some(delivered) if delivered > 0 => {
            Some(money(&(total_spent / &BigDecimal::from(delivered))))
        }
        _ => None,
    }
}

/// 按花费降序排列 (同额按名称)
pub fn sort_by_spend(campaigns: &mut [CampaignMatch]) {
    campaigns.sort_by(|a, b| {
        b.group
            .total_cost
            .cmp(&a.group.total_cost)
            .then_with(|| a.name().cmp(b.name()))
    });
}

struct Accumulator {
    record: ProductRecord,
    spent: BigDecimal,
    results: BigDecimal,
    ads_count: usize,
    campaigns: Vec<String>,
}

impl Accumulator {
    fn new(record: ProductRecord) -> Self {
        Self {
            record,
            spent: BigDecimal::zero(),
            results: BigDecimal::zero(),
            ads_count: 0,
            campaigns: Vec::new(),
        }
    }
}

/// 生成报表；匹配多个产品的广告组花费与结果数按产品数平均分摊
pub fn build_report(session: &ReconcileSession) -> ReconcileReport {
    let mut acc: IndexMap<String, Accumulator> = session
        .products
        .iter()
        .map(|p| (p.product_name.clone(), Accumulator::new(p.clone())))
        .collect();

    let mut unmatched_spend = BigDecimal::zero();
    let mut no_product_spend = BigDecimal::zero();

    for campaign in &session.campaigns {
        let group = &campaign.group;
        let products = &campaign.result.matched_products;

        if products.is_empty() {
            match campaign.result.origin {
                MatchOrigin::Manual => no_product_spend += &group.total_cost,
                _ => unmatched_spend += &group.total_cost,
            }
            continue;
        }

        let n = BigDecimal::from(products.len() as i64);
        let share = &group.total_cost / &n;
        let results_share = &group.total_results / &n;
        for name in products {
            // 人工指定的产品可能不在目录中
            let entry = acc
                .entry(name.clone())
                .or_insert_with(|| Accumulator::new(ProductRecord::named(name.clone())));
            entry.spent += &share;
            entry.results += &results_share;
            entry.ads_count += group.ads_count;
            entry.campaigns.push(group.normalized_name.clone());
        }
    }

    let mut products: Vec<ProductReport> = acc
        .into_values()
        .map(|a| {
            let total_spent = money(&a.spent);
            ProductReport {
                cost_per_delivered: cost_per_delivered(&total_spent, a.record.delivered_count),
                product_name: a.record.product_name,
                total_orders: a.record.total_orders,
                delivered_count: a.record.delivered_count,
                cancelled_count: a.record.cancelled_count,
                total_spent,
                total_results: money(&a.results),
                ads_count: a.ads_count,
                campaigns: a.campaigns,
            }
        })
        .collect();
    products.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));

    let mut campaigns = session.campaigns.clone();
    sort_by_spend(&mut campaigns);

    ReconcileReport {
        products,
        campaigns,
        unmatched_spend: money(&unmatched_spend),
        no_product_spend: money(&no_product_spend),
        generated_at: Utc::now(),
    }
}
