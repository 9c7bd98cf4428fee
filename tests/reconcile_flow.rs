use adspend_matcher::data::read_csv;
use adspend_matcher::models::{FileStatus, ManualChoice, ManualDecision, MatchOrigin};
use adspend_matcher::service::resolver::unresolved;
use adspend_matcher::{ReconcileError, ReconcileService};
use bigdecimal::BigDecimal;
use std::str::FromStr;

const FACEBOOK: &str = "\
Campaign name,CPC (cost per link click),Results,Amount spent (EGP)
Summer Sale - Copy 2,1.2,10,100.50
Summer Sale  12/15,0.9,5,49.50
New Summer Sale,1.1,,
Leather Wallet - Copy,0.4,3,30
Garden Hose 3/1,0.3,-,12
Brand Awareness,0.2,1,8
Total,,19,200
";

const TIKTOK: &str = "\
Ad Set Name,Cost per Result,Cost
Bundle Promo,0.5,20
Leather Wallet 10-2,0.4,n/a
";

const BROKEN: &str = "\
Impressions,Reach
100,50
";

const CATALOG: &str = "\
Product,Total Orders,Delivered,Cancelled
Summer Sale Dress,40,20,5
Winter Coat,10,0,2
Leather Wallet,12,6,1
";

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

#[test]
fn two_call_protocol_end_to_end() {
    let service = ReconcileService::default();
    let campaigns = vec![
        read_csv("facebook.csv", FACEBOOK.as_bytes()).unwrap(),
        read_csv("tiktok.csv", TIKTOK.as_bytes()).unwrap(),
        read_csv("broken.csv", BROKEN.as_bytes()).unwrap(),
    ];
    let products = vec![read_csv("catalog.csv", CATALOG.as_bytes()).unwrap()];

    // 第一步: 自动匹配
    let session = service.propose(&campaigns, &products).unwrap();

    let skipped: Vec<_> = session
        .file_reports
        .iter()
        .filter(|r| matches!(r.status, FileStatus::Skipped { .. }))
        .map(|r| r.source.as_str())
        .collect();
    assert_eq!(skipped, vec!["broken.csv"]);
    // 汇总行不计入读取行数
    assert_eq!(session.file_reports[0].status, FileStatus::Loaded { rows: 6 });

    let summer = session.campaigns.iter().find(|c| c.name() == "Summer Sale").unwrap();
    assert_eq!(summer.group.ads_count, 3);
    assert_eq!(summer.group.total_cost, dec("150"));
    assert_eq!(summer.group.total_results, dec("15"));
    assert_eq!(summer.result.origin, MatchOrigin::Auto);
    assert!(summer.result.matched_products.contains("Summer Sale Dress"));

    let wallet = session.campaigns.iter().find(|c| c.name() == "Leather Wallet").unwrap();
    assert_eq!(wallet.group.ads_count, 2);
    assert_eq!(wallet.group.total_cost, dec("30"));
    assert_eq!(wallet.group.source_files.len(), 2);

    let mut pending = session.unresolved_names();
    pending.sort();
    assert_eq!(pending, vec!["Brand Awareness", "Bundle Promo", "Garden Hose"]);

    // 第二步: 分两轮人工处理
    let round = service.apply_manual(
        session,
        &[ManualDecision::new(
            "Bundle Promo",
            ManualChoice::Multiple(vec!["Summer Sale Dress".into(), "Leather Wallet".into()]),
        )],
    );
    assert!(round.unknown.is_empty());
    assert_eq!(round.applied, 1);
    assert_eq!(unresolved(&round.session.campaigns).len(), 2);

    let round = service.apply_manual(
        round.session,
        &[
            ManualDecision::new("Brand Awareness", ManualChoice::NoProduct),
            ManualDecision::new("Garden Hose", ManualChoice::Single("Winter Coat".into())),
        ],
    );
    assert!(round.session.unresolved_names().is_empty());

    // 重新评分不影响人工结果
    let rescored = service.rescore(round.session.clone());
    assert_eq!(rescored, round.session);

    let report = service.report(&rescored);
    let dress = report.products.iter().find(|p| p.product_name == "Summer Sale Dress").unwrap();
    assert_eq!(dress.total_spent, dec("160"));
    assert_eq!(dress.cost_per_delivered, Some(dec("8")));
    assert_eq!(dress.total_results, dec("15"));

    let coat = report.products.iter().find(|p| p.product_name == "Winter Coat").unwrap();
    assert_eq!(coat.total_spent, dec("12"));
    assert_eq!(coat.cost_per_delivered, None);

    assert_eq!(report.no_product_spend, dec("8"));
    assert!(report.unmatched_spend == dec("0"));
    assert_eq!(report.campaigns[0].name(), "Summer Sale");
}

#[test]
fn batch_without_campaign_rows_fails() {
    let service = ReconcileService::default();
    let campaigns = vec![read_csv("broken.csv", BROKEN.as_bytes()).unwrap()];
    let products = vec![read_csv("catalog.csv", CATALOG.as_bytes()).unwrap()];

    let err = service.propose(&campaigns, &products).unwrap_err();
    assert!(matches!(err, ReconcileError::NoUsableInput(_)));
}
