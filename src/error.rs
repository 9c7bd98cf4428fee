use crate::models::InputKind;
use serde::Serialize;
use thiserror::Error;

/// 列检测中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Campaign,
    Cost,
    ProductName,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRole::Campaign => write!(f, "campaign name"),
            ColumnRole::Cost => write!(f, "cost"),
            ColumnRole::ProductName => write!(f, "product name"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// 单个文件无法定位必需列；该文件跳过，批次继续
    #[error("'{file}': no {role} column found, available columns: {available:?}")]
    MissingColumn {
        file: String,
        role: ColumnRole,
        available: Vec<String>,
    },
    /// 所有文件处理完后仍没有可用行，批次失败
    #[error("no usable {0} rows were extracted from any input file")]
    NoUsableInput(InputKind),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ReconcileError {
    /// 是否只影响单个文件
    pub fn is_per_file(&self) -> bool {
        matches!(self, ReconcileError::MissingColumn { .. })
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
