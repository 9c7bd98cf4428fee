use crate::error::{ColumnRole, ReconcileError, ReconcileResult};
use crate::models::{FileReport, FileStatus, InputKind, ProductRecord, RawCampaignRow};
use crate::service::aggregator::is_summary_row;
use crate::service::columns::{require_campaign_columns, require_column, ColumnRules};
use bigdecimal::{BigDecimal, ToPrimitive};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// 已解析的表格：列名 -> 值 的有序记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub source: String,
    #[serde(default)]
    pub columns: Vec<String>,
    pub rows: Vec<IndexMap<String, Value>>,
}

impl RawTable {
    pub fn new(source: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            source: source.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// 未显式给出列时取第一行的键顺序
    pub fn column_names(&self) -> Vec<String> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }
        self.rows
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// 导入结果
#[derive(Debug, Clone, Default)]
pub struct IngestedBatch {
    pub rows: Vec<RawCampaignRow>,
    pub products: Vec<ProductRecord>,
    pub file_reports: Vec<FileReport>,
}

/// 宽松的数值解析：无法解析时返回 None
pub fn parse_decimal(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                BigDecimal::from_str(s).ok()
            }
        }
        _ => None,
    }
}

fn parse_count(value: Option<&Value>) -> Option<i64> {
    value.and_then(parse_decimal).and_then(|d| d.to_i64())
}

/// 单元格 -> 文本，空值返回 None
fn cell_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 从广告表中提取原始行；空名称行与汇总行直接丢弃
pub fn extract_campaign_rows(table: &RawTable, rules: &ColumnRules) -> ReconcileResult<Vec<RawCampaignRow>> {
    let columns = table.column_names();
    let (name_col, cost_col) = require_campaign_columns(&table.source, &columns, rules)?;
    let results_col = rules.results.find(&columns).map(str::to_string);
    tracing::debug!(
        "{}: 广告名称列 '{}', 花费列 '{}', 结果列 {:?}",
        table.source,
        name_col,
        cost_col,
        results_col
    );

    let rows = table
        .rows
        .iter()
        .filter_map(|record| {
            let name = cell_text(record.get(&name_col))?;
            if is_summary_row(&name) {
                return None;
            }
            let cost = record.get(&cost_col).and_then(parse_decimal);
            let results = results_col
                .as_ref()
                .and_then(|c| record.get(c))
                .and_then(parse_decimal);
            Some(RawCampaignRow::new(name, cost, table.source.clone()).with_results(results))
        })
        .collect();

    Ok(rows)
}

/// 从产品表中提取产品；名称列必需，数量列可选
pub fn extract_products(table: &RawTable, rules: &ColumnRules) -> ReconcileResult<Vec<ProductRecord>> {
    let columns = table.column_names();
    let name_col = require_column(&table.source, &columns, &rules.product_name, ColumnRole::ProductName)?;
    let orders_col = rules.total_orders.find(&columns).map(str::to_string);
    let delivered_col = rules.delivered.find(&columns).map(str::to_string);
    let cancelled_col = rules.cancelled.find(&columns).map(str::to_string);

    let lookup = |record: &IndexMap<String, Value>, col: &Option<String>| {
        col.as_ref().and_then(|c| parse_count(record.get(c)))
    };

    let products = table
        .rows
        .iter()
        .filter_map(|record| {
            let name = cell_text(record.get(&name_col))?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(ProductRecord {
                product_name: name.to_string(),
                total_orders: lookup(record, &orders_col),
                delivered_count: lookup(record, &delivered_col),
                cancelled_count: lookup(record, &cancelled_col),
            })
        })
        .collect();

    Ok(products)
}

/// 处理全部输入文件
///
/// 单个文件缺列时记入 `file_reports` 并跳过；全部处理后若没有可用广告行
/// (汇总行、空名称行不计) 或产品，返回 `NoUsableInput`。
pub fn ingest(
    campaign_tables: &[RawTable],
    product_tables: &[RawTable],
    rules: &ColumnRules,
) -> ReconcileResult<IngestedBatch> {
    let mut batch = IngestedBatch::default();

    for table in campaign_tables {
        match extract_campaign_rows(table, rules) {
            Ok(rows) => {
                tracing::info!("广告文件 {}: 读取 {} 行", table.source, rows.len());
                batch.file_reports.push(loaded(&table.source, InputKind::Campaigns, rows.len()));
                batch.rows.extend(rows);
            }
            Err(e) if e.is_per_file() => {
                tracing::warn!("Skipping campaign file: {}", e);
                batch.file_reports.push(skipped(&table.source, InputKind::Campaigns, e));
            }
            Err(e) => return Err(e),
        }
    }

    let mut merged: IndexMap<String, ProductRecord> = IndexMap::new();
    for table in product_tables {
        match extract_products(table, rules) {
            Ok(products) => {
                tracing::info!("产品文件 {}: 读取 {} 个产品", table.source, products.len());
                batch.file_reports.push(loaded(&table.source, InputKind::Products, products.len()));
                for product in products {
                    merged
                        .entry(product.product_name.clone())
                        .and_modify(|existing| existing.merge(&product))
                        .or_insert(product);
                }
            }
            Err(e) if e.is_per_file() => {
                tracing::warn!("Skipping product file: {}", e);
                batch.file_reports.push(skipped(&table.source, InputKind::Products, e));
            }
            Err(e) => return Err(e),
        }
    }
    batch.products = merged.into_values().collect();

    if batch.rows.is_empty() {
        return Err(ReconcileError::NoUsableInput(InputKind::Campaigns));
    }
    if batch.products.is_empty() {
        return Err(ReconcileError::NoUsableInput(InputKind::Products));
    }

    Ok(batch)
}

fn loaded(source: &str, kind: InputKind, rows: usize) -> FileReport {
    FileReport {
        source: source.to_string(),
        kind,
        status: FileStatus::Loaded { rows },
    }
}

fn skipped(source: &str, kind: InputKind, error: ReconcileError) -> FileReport {
    let reason = error.to_string();
    let available_columns = match error {
        ReconcileError::MissingColumn { available, .. } => available,
        _ => Vec::new(),
    };
    FileReport {
        source: source.to_string(),
        kind,
        status: FileStatus::Skipped { reason, available_columns },
    }
}
