use crate::models::{CampaignMatch, MatchOrigin};
use crate::service::report::ReconcileReport;
use bigdecimal::BigDecimal;
use std::io::Write;

const PRODUCT_SEPARATOR: &str = " | ";

fn option_to_csv<T: ToString>(val: &Option<T>) -> String {
    val.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn origin_label(origin: MatchOrigin) -> &'static str {
    match origin {
        MatchOrigin::Auto => "AUTO",
        MatchOrigin::Manual => "MANUAL",
        MatchOrigin::Unresolved => "UNRESOLVED",
    }
}

/// 导出产品花费报表
pub fn write_report_csv<W: Write>(report: &ReconcileReport, writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "product_name",
        "total_orders",
        "delivered_count",
        "cancelled_count",
        "total_spent",
        "total_results",
        "ads_count",
        "cost_per_delivered",
        "campaigns",
    ])?;

    for row in &report.products {
        writer.write_record(&[
            row.product_name.clone(),
            option_to_csv(&row.total_orders),
            option_to_csv(&row.delivered_count),
            option_to_csv(&row.cancelled_count),
            row.total_spent.to_string(),
            row.total_results.to_string(),
            row.ads_count.to_string(),
            option_to_csv::<BigDecimal>(&row.cost_per_delivered),
            row.campaigns.join(PRODUCT_SEPARATOR),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// 导出广告组匹配明细
pub fn write_campaigns_csv<W: Write>(campaigns: &[CampaignMatch], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "normalized_name",
        "total_cost",
        "total_results",
        "ads_count",
        "matched_products",
        "match_score",
        "origin",
        "raw_names",
        "source_files",
    ])?;

    for c in campaigns {
        let raw_names: Vec<&str> = c.group.raw_names.iter().map(String::as_str).collect();
        let sources: Vec<&str> = c.group.source_files.iter().map(String::as_str).collect();
        let products: Vec<&str> = c.result.matched_products.iter().map(String::as_str).collect();
        writer.write_record(&[
            c.group.normalized_name.clone(),
            c.group.total_cost.to_string(),
            c.group.total_results.to_string(),
            c.group.ads_count.to_string(),
            products.join(PRODUCT_SEPARATOR),
            format!("{:.1}", c.result.match_score),
            origin_label(c.result.origin).to_string(),
            raw_names.join(PRODUCT_SEPARATOR),
            sources.join(PRODUCT_SEPARATOR),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
