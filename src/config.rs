use crate::error::ReconcileResult;
use crate::service::columns::ColumnRules;
use serde::{Deserialize, Serialize};

/// 默认配置文件名 (可选)
pub const DEFAULT_CONFIG_FILE: &str = "adspend.toml";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub matching: MatchingConfig,
    pub columns: ColumnRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// 匹配参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// 自动匹配需严格超过的分数
    pub threshold: f64,
    /// 每个命中词的加分，不设上限
    pub token_bonus: f64,
    /// 参与加分的词需长于此字符数
    pub min_token_len: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: 60.0,
            token_bonus: 20.0,
            min_token_len: 3,
        }
    }
}

impl AppConfig {
    /// 加载配置：默认值 <- 配置文件 (ADSPEND_CONFIG 或 adspend.toml) <- ADSPEND__* 环境变量
    pub fn load() -> ReconcileResult<Self> {
        let path =
            std::env::var("ADSPEND_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> ReconcileResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("ADSPEND")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_policy() {
        let config = AppConfig::default();
        assert_eq!(config.matching.threshold, 60.0);
        assert_eq!(config.matching.token_bonus, 20.0);
        assert_eq!(config.matching.min_token_len, 3);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn file_overrides_only_given_keys() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[matching]\nthreshold = 75.0\n\n[server]\nport = 9090").unwrap();

        let config = AppConfig::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.matching.threshold, 75.0);
        assert_eq!(config.matching.token_bonus, 20.0);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.columns.cost.tiers.is_empty());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from("/nonexistent/adspend-missing").unwrap();
        assert_eq!(config.matching, MatchingConfig::default());
    }
}
