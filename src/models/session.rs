use super::product::ProductRecord;
use super::result::CampaignMatch;
use serde::{Deserialize, Serialize};

/// 输入文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Campaigns,
    Products,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Campaigns => write!(f, "campaign"),
            InputKind::Products => write!(f, "product"),
        }
    }
}

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Loaded { rows: usize },
    Skipped { reason: String, available_columns: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub source: String,
    pub kind: InputKind,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// 调用方持有的会话快照：每次调用读入旧快照、返回新快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileSession {
    pub campaigns: Vec<CampaignMatch>,
    pub products: Vec<ProductRecord>,
    #[serde(default)]
    pub file_reports: Vec<FileReport>,
}

impl ReconcileSession {
    /// 仍待人工处理的广告组名称
    pub fn unresolved_names(&self) -> Vec<String> {
        self.campaigns
            .iter()
            .filter(|c| c.result.is_unresolved())
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn product_names(&self) -> Vec<String> {
        self.products.iter().map(|p| p.product_name.clone()).collect()
    }
}
