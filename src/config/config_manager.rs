// ==========================================
// 项目执行仪表盘 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 内存 key-value（单会话，无持久化）
// 来源: 默认值 < JSON 覆写 < 环境变量（前缀 EXEC_DASHBOARD_）
// ==========================================

use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::warn;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "EXEC_DASHBOARD_";

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const DELAY_FLAG_THRESHOLD_DAYS: &str = "delay_flag_threshold_days";
    pub const GROUP_ALERT_THRESHOLD: &str = "group_alert_threshold";
    pub const NO_BATCH_LABEL: &str = "no_batch_label";
    pub const UNASSIGNED_LABEL: &str = "unassigned_label";
    pub const PAGE_SIZE: &str = "page_size";
    pub const LOCALE: &str = "locale";
    pub const EDGE_FUNCTION_URL: &str = "edge_function_url";
    pub const EDGE_FUNCTION_ANON_KEY: &str = "edge_function_anon_key";

    /// 全部已知键
    pub const ALL: [&str; 8] = [
        DELAY_FLAG_THRESHOLD_DAYS,
        GROUP_ALERT_THRESHOLD,
        NO_BATCH_LABEL,
        UNASSIGNED_LABEL,
        PAGE_SIZE,
        LOCALE,
        EDGE_FUNCTION_URL,
        EDGE_FUNCTION_ANON_KEY,
    ];
}

/// 内置默认值（远程端点无默认值）
fn default_value(key: &str) -> Option<&'static str> {
    match key {
        config_keys::DELAY_FLAG_THRESHOLD_DAYS => Some("7"),
        config_keys::GROUP_ALERT_THRESHOLD => Some("3"),
        config_keys::NO_BATCH_LABEL => Some("No Batch"),
        config_keys::UNASSIGNED_LABEL => Some("Unassigned"),
        config_keys::PAGE_SIZE => Some("10"),
        config_keys::LOCALE => Some("en"),
        _ => None,
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置 JSON 解析失败: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("配置根节点必须是对象")]
    NotAnObject,

    #[error("配置项 {key} 的值类型不支持（仅支持字符串/数字/布尔）")]
    UnsupportedValue { key: String },
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    overrides: HashMap<String, String>,
}

impl ConfigManager {
    /// 仅含默认值的配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 对象加载覆写（值可为字符串/数字/布尔）
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(ConfigError::NotAnObject);
        };

        let mut manager = Self::new();
        manager.apply_json(&map)?;
        Ok(manager)
    }

    /// 从环境变量加载（EXEC_DASHBOARD_<KEY 大写>）
    pub fn from_env() -> Self {
        let mut manager = Self::new();
        manager.apply_env(|name| std::env::var(name).ok());
        manager
    }

    fn apply_json(&mut self, map: &Map<String, Value>) -> Result<(), ConfigError> {
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(ConfigError::UnsupportedValue { key: key.clone() }),
            };
            self.set(key, &text);
        }
        Ok(())
    }

    /// 以查找函数读取环境变量（便于测试注入）
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in config_keys::ALL {
            let name = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            if let Some(value) = lookup(&name) {
                self.set(key, &value);
            }
        }
    }

    /// 写入覆写值
    pub fn set(&mut self, key: &str, value: &str) {
        self.overrides.insert(key.to_string(), value.to_string());
    }

    /// 读取配置值（覆写优先，其次默认值）
    pub fn get_global_config_value(&self, key: &str) -> Option<String> {
        self.overrides
            .get(key)
            .cloned()
            .or_else(|| default_value(key).map(str::to_string))
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_global_config_value(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// 解析数值配置，格式错误时告警并回退默认值
    fn get_parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        let raw = match self.overrides.get(key) {
            Some(raw) => raw,
            None => return default,
        };
        match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用默认值");
                default
            }
        }
    }

    /// 非空字符串配置
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_global_config_value(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    // ===== 延期与告警 =====

    /// 延期升级阈值（天），默认 7
    pub fn delay_flag_threshold_days(&self) -> i64 {
        self.get_parsed(config_keys::DELAY_FLAG_THRESHOLD_DAYS, 7)
    }

    /// 分组告警阈值（条），默认 3
    pub fn group_alert_threshold(&self) -> usize {
        self.get_parsed(config_keys::GROUP_ALERT_THRESHOLD, 3)
    }

    // ===== 展示 =====

    pub fn no_batch_label(&self) -> String {
        self.get_config_or_default(config_keys::NO_BATCH_LABEL, "No Batch")
    }

    pub fn unassigned_label(&self) -> String {
        self.get_config_or_default(config_keys::UNASSIGNED_LABEL, "Unassigned")
    }

    /// 明细表每页条数，默认 10，最小 1
    pub fn page_size(&self) -> usize {
        self.get_parsed(config_keys::PAGE_SIZE, 10).max(1)
    }

    pub fn locale(&self) -> String {
        self.get_config_or_default(config_keys::LOCALE, "en")
    }

    // ===== 远程数据源 =====

    pub fn edge_function_url(&self) -> Option<String> {
        self.get_non_empty(config_keys::EDGE_FUNCTION_URL)
    }

    pub fn edge_function_anon_key(&self) -> Option<String> {
        self.get_non_empty(config_keys::EDGE_FUNCTION_ANON_KEY)
    }

    /// 所有生效配置的快照（匿名密钥脱敏）
    pub fn get_config_snapshot(&self) -> Value {
        let mut snapshot: BTreeMap<&str, Value> = BTreeMap::new();
        for key in config_keys::ALL {
            let value = match self.get_global_config_value(key) {
                Some(_) if key == config_keys::EDGE_FUNCTION_ANON_KEY => json!("***"),
                Some(v) => json!(v),
                None => Value::Null,
            };
            snapshot.insert(key, value);
        }
        json!(snapshot)
    }
}
