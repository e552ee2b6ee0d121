//! Application configuration module / 应用配置模块
//!
//! Manages configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::{SearchMode, SearchOptions};
use crate::morph::oracle::DEFAULT_BACKEND;

/// Global configuration instance / 全局配置实例
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Search defaults / 搜索默认值
    pub search: SearchConfig,
    /// Output configuration / 输出配置
    pub output: OutputConfig,
    /// Query history configuration / 查询历史配置
    pub history: HistoryConfig,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default mode when none is given / 默认搜索模式
    pub mode: SearchMode,
    /// Analyser backend: "rule" or "lindera" / 形态分析后端
    pub analyzer: String,
    pub case_sensitive: bool,
    pub fuzzy_match: bool,
    pub regex_enabled: bool,
    pub exact_match: bool,
}

/// Result output format / 输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

/// Output configuration / 输出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Where HTML reports go when no path is given / HTML 报告默认路径
    pub html_path: String,
}

/// Query history configuration / 查询历史配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    /// JSON-lines log file / 历史记录文件
    pub file: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::KoreanWord,
            analyzer: DEFAULT_BACKEND.to_string(),
            case_sensitive: false,
            fuzzy_match: false,
            regex_enabled: false,
            exact_match: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            html_path: "search_results.html".to_string(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: "search_history.jsonl".to_string(),
        }
    }
}

impl SearchConfig {
    /// Default query options / 默认查询选项
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.case_sensitive,
            fuzzy_match: self.fuzzy_match,
            regex_enabled: self.regex_enabled,
            exact_match: self.exact_match,
        }
    }
}

impl AppConfig {
    /// Get the HTML report path / 获取 HTML 报告路径
    pub fn get_html_path(&self) -> PathBuf {
        PathBuf::from(&self.output.html_path)
    }

    /// Get the history file path, if history is on / 获取历史记录文件路径
    pub fn get_history_path(&self) -> Option<PathBuf> {
        (self.history.enabled && !self.history.file.is_empty()).then(|| PathBuf::from(&self.history.file))
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from an explicit path / 从指定路径加载配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::debug!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Initialize global configuration / 初始化全局配置
pub fn init_config(config: AppConfig) -> Result<Arc<RwLock<AppConfig>>, String> {
    let config_arc = Arc::new(RwLock::new(config));

    CONFIG
        .set(config_arc.clone())
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(config_arc)
}

/// Get a read-only snapshot of current config / 获取当前配置的只读快照
///
/// Falls back to defaults when `init_config` has not run.
pub fn config() -> AppConfig {
    CONFIG.get().map(|c| c.read().clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = load_config_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"search": {"mode": "english", "case_sensitive": true}, "output": {"format": "html"}}"#)
            .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.search.mode, SearchMode::English);
        assert_eq!(config.search.analyzer, DEFAULT_BACKEND);
        assert!(config.search.options().case_sensitive);
        assert_eq!(config.output.format, OutputFormat::Html);
        assert_eq!(config.output.html_path, "search_results.html");
        assert!(config.history.enabled);
    }

    #[test]
    fn test_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_global_config() {
        let mut loaded = AppConfig::default();
        loaded.search.mode = SearchMode::English;
        let handle = init_config(loaded.clone()).unwrap();
        assert_eq!(config(), loaded);

        handle.write().output.format = OutputFormat::Json;
        assert_eq!(config().output.format, OutputFormat::Json);
        assert!(init_config(AppConfig::default()).is_err());
    }

    #[test]
    fn test_history_path() {
        let mut config = AppConfig::default();
        assert!(config.get_history_path().is_some());
        config.history.enabled = false;
        assert!(config.get_history_path().is_none());
    }
}
