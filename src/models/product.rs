use serde::{Deserialize, Serialize};

/// 产品目录记录，数量字段只供报表使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_name: String,
    #[serde(default)]
    pub total_orders: Option<i64>,
    #[serde(default)]
    pub delivered_count: Option<i64>,
    #[serde(default)]
    pub cancelled_count: Option<i64>,
}

impl ProductRecord {
    pub fn named(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            total_orders: None,
            delivered_count: None,
            cancelled_count: None,
        }
    }

    /// 合并同名产品 (多个目录文件)，数量相加 (溢出时取上限)
    pub fn merge(&mut self, other: &ProductRecord) {
        self.total_orders = add_counts(self.total_orders, other.total_orders);
        self.delivered_count = add_counts(self.delivered_count, other.delivered_count);
        self.cancelled_count = add_counts(self.cancelled_count, other.cancelled_count);
    }
}

fn add_counts(a: Option<i64>, b: Option<i64>) -> Option<i64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.saturating_add(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_known_counts() {
        let mut bag = ProductRecord {
            total_orders: Some(4),
            delivered_count: None,
            ..ProductRecord::named("Bag")
        };
        bag.merge(&ProductRecord {
            total_orders: Some(6),
            delivered_count: Some(2),
            ..ProductRecord::named("Bag")
        });
        assert_eq!(bag.total_orders, Some(10));
        assert_eq!(bag.delivered_count, Some(2));
        assert_eq!(bag.cancelled_count, None);
    }

    #[test]
    fn merge_saturates_huge_counts() {
        let mut bag = ProductRecord {
            total_orders: Some(i64::MAX - 1),
            cancelled_count: Some(i64::MIN),
            ..ProductRecord::named("Bag")
        };
        bag.merge(&ProductRecord {
            total_orders: Some(5),
            cancelled_count: Some(-1),
            ..ProductRecord::named("Bag")
        });
        assert_eq!(bag.total_orders, Some(i64::MAX));
        assert_eq!(bag.cancelled_count, Some(i64::MIN));
    }
}
