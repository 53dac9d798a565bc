// ==========================================
// 项目执行仪表盘 - 领域类型定义
// ==========================================
// 职责: 健康度 / 进度 / 延期等级 / 偏差分桶等枚举
// 红线: 源数据为自由文本，解析一律大小写不敏感，未识别值不报错
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 健康度 (Health)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
    Blank, // 空值或未识别
}

impl HealthStatus {
    /// 大小写不敏感解析，未识别值归入 Blank
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "green" => HealthStatus::Green,
            "yellow" => HealthStatus::Yellow,
            "red" => HealthStatus::Red,
            _ => HealthStatus::Blank,
        }
    }

    /// 显示颜色
    pub fn color_hex(&self) -> &'static str {
        match self {
            HealthStatus::Green => "#00C48C",
            HealthStatus::Yellow => "#FFCA41",
            HealthStatus::Red => "#FF4858",
            HealthStatus::Blank => "#aabbd2",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Green => write!(f, "green"),
            HealthStatus::Yellow => write!(f, "yellow"),
            HealthStatus::Red => write!(f, "red"),
            HealthStatus::Blank => write!(f, "blank"),
        }
    }
}

// ==========================================
// 进度状态 (Progress)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Complete,
    InProgress,
    NotStarted,
    Other, // 空值或未识别，只计入总数
}

impl ProgressStatus {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "complete" => ProgressStatus::Complete,
            "in progress" => ProgressStatus::InProgress,
            "not started" => ProgressStatus::NotStarted,
            _ => ProgressStatus::Other,
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::Complete => write!(f, "complete"),
            ProgressStatus::InProgress => write!(f, "in progress"),
            ProgressStatus::NotStarted => write!(f, "not started"),
            ProgressStatus::Other => write!(f, "other"),
        }
    }
}

// ==========================================
// 延期等级 (Delay Severity)
// ==========================================
// Alert: 延期天数未超过阈值; Flag: 超过阈值（默认 7 天）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelaySeverity {
    Alert,
    Flag,
}

impl fmt::Display for DelaySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelaySeverity::Alert => write!(f, "ALERT"),
            DelaySeverity::Flag => write!(f, "FLAG"),
        }
    }
}

// ==========================================
// 偏差分桶 (Variance Bucket)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceBucket {
    AheadOfSchedule, // < 0
    OnTrack,         // = 0
    BehindSchedule,  // > 0
}

impl VarianceBucket {
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            VarianceBucket::AheadOfSchedule
        } else if days == 0 {
            VarianceBucket::OnTrack
        } else {
            VarianceBucket::BehindSchedule
        }
    }
}

// ==========================================
// 分组告警层级
// ==========================================
// Unit/Status 层按周聚合后判定，Week/Activity 层直接判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupLevel {
    Unit,
    Status,
    Week,
    Activity,
}

// ==========================================
// 排序方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

// ==========================================
// 数据源
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Excel,      // 上传的 JSON / 表格导出
    Smartsheet, // 远程拉取
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Excel => write!(f, "excel"),
            DataSource::Smartsheet => write!(f, "smartsheet"),
        }
    }
}

// ==========================================
// 视图选择
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    #[default]
    Overview,
    Timeline,
    Allocation,
    Detailed,
}
