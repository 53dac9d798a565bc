// ==========================================
// 项目执行仪表盘 - 工作流记录
// ==========================================
// 职责: 定义单行工作流数据（WorkflowRecord）及字段元信息
// 红线: 字段名大小写/标点敏感（含 "Assigned to:" 末尾冒号）
// ==========================================

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

// ==========================================
// PercentField - 百分比类字段
// ==========================================
// 源数据中 "% Complete" 等列可能是数字（0.73）、字符串（"45%"）或文字状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PercentField {
    Number(f64),
    Text(String),
}

impl Default for PercentField {
    fn default() -> Self {
        PercentField::Text(String::new())
    }
}

impl PercentField {
    /// 空值判定（空字符串视为缺失）
    pub fn is_blank(&self) -> bool {
        matches!(self, PercentField::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for PercentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentField::Number(n) => write!(f, "{}", n),
            PercentField::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for PercentField {
    fn from(value: &str) -> Self {
        PercentField::Text(value.to_string())
    }
}

impl From<f64> for PercentField {
    fn from(value: f64) -> Self {
        PercentField::Number(value)
    }
}

// ==========================================
// WorkflowRecord - 工作流记录
// ==========================================
// 不变量: 规范化后所有必填字段均存在（缺失时为 ""）
// Batch 为可选字段: None 表示源对象不含该键，Some("") 表示键存在但为空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowRecord {
    #[serde(rename = "Health")]
    pub health: String,
    #[serde(rename = "Format")]
    pub format: String,
    #[serde(rename = "Grade/Level")]
    pub grade: String,
    #[serde(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "Week")]
    pub week: String,
    #[serde(rename = "Component")]
    pub component: String,
    #[serde(rename = "Batch", skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(rename = "Activity")]
    pub activity: String,
    #[serde(rename = "Workflow")]
    pub workflow: String,
    #[serde(rename = "Assigned to:")]
    pub assigned_to: String,
    #[serde(rename = "WW Status")]
    pub ww_status: String,
    #[serde(rename = "Progress")]
    pub progress: String,
    #[serde(rename = "Predecessors")]
    pub predecessors: String,
    #[serde(rename = "Reporting Status")]
    pub reporting_status: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Scheduled Start Date")]
    pub scheduled_start: String,
    #[serde(rename = "Scheduled End Date")]
    pub scheduled_end: String,
    #[serde(rename = "Comments")]
    pub comments: String,
    #[serde(rename = "Completion Date")]
    pub completion_date: String,
    #[serde(rename = "Variance")]
    pub variance: String,
    #[serde(rename = "Baseline Start")]
    pub baseline_start: String,
    #[serde(rename = "Baseline Finish")]
    pub baseline_finish: String,
    #[serde(rename = "% Complete")]
    pub percent_complete: PercentField,
    #[serde(rename = "% Remaining")]
    pub percent_remaining: PercentField,
    #[serde(rename = "% Allocation")]
    pub percent_allocation: PercentField,
    #[serde(rename = "Read")]
    pub read: String,
}

impl WorkflowRecord {
    /// 拆分 "Assigned to:"（逗号分隔，去空白，丢弃空名）
    pub fn assignees(&self) -> Vec<&str> {
        self.assigned_to
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// 读取指定字段的文本值
    pub fn field(&self, field: RecordField) -> Cow<'_, str> {
        use RecordField::*;
        match field {
            Health => Cow::Borrowed(&self.health),
            Format => Cow::Borrowed(&self.format),
            Grade => Cow::Borrowed(&self.grade),
            Unit => Cow::Borrowed(&self.unit),
            Week => Cow::Borrowed(&self.week),
            Component => Cow::Borrowed(&self.component),
            Batch => Cow::Borrowed(self.batch.as_deref().unwrap_or("")),
            Activity => Cow::Borrowed(&self.activity),
            Workflow => Cow::Borrowed(&self.workflow),
            AssignedTo => Cow::Borrowed(&self.assigned_to),
            WwStatus => Cow::Borrowed(&self.ww_status),
            Progress => Cow::Borrowed(&self.progress),
            Predecessors => Cow::Borrowed(&self.predecessors),
            ReportingStatus => Cow::Borrowed(&self.reporting_status),
            Duration => Cow::Borrowed(&self.duration),
            ScheduledStart => Cow::Borrowed(&self.scheduled_start),
            ScheduledEnd => Cow::Borrowed(&self.scheduled_end),
            Comments => Cow::Borrowed(&self.comments),
            CompletionDate => Cow::Borrowed(&self.completion_date),
            Variance => Cow::Borrowed(&self.variance),
            BaselineStart => Cow::Borrowed(&self.baseline_start),
            BaselineFinish => Cow::Borrowed(&self.baseline_finish),
            PercentComplete => Cow::Owned(self.percent_complete.to_string()),
            PercentRemaining => Cow::Owned(self.percent_remaining.to_string()),
            PercentAllocation => Cow::Owned(self.percent_allocation.to_string()),
            Read => Cow::Borrowed(&self.read),
        }
    }
}

// ==========================================
// RecordField - 字段枚举
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordField {
    Health,
    Format,
    Grade,
    Unit,
    Week,
    Component,
    Batch,
    Activity,
    Workflow,
    AssignedTo,
    WwStatus,
    Progress,
    Predecessors,
    ReportingStatus,
    Duration,
    ScheduledStart,
    ScheduledEnd,
    Comments,
    CompletionDate,
    Variance,
    BaselineStart,
    BaselineFinish,
    PercentComplete,
    PercentRemaining,
    PercentAllocation,
    Read,
}

impl RecordField {
    /// 必填字段全集（不含 Batch），顺序与导出表头一致
    pub const REQUIRED: [RecordField; 25] = [
        RecordField::Health,
        RecordField::Format,
        RecordField::Grade,
        RecordField::Unit,
        RecordField::Week,
        RecordField::Component,
        RecordField::Activity,
        RecordField::Workflow,
        RecordField::AssignedTo,
        RecordField::WwStatus,
        RecordField::Progress,
        RecordField::Predecessors,
        RecordField::ReportingStatus,
        RecordField::Duration,
        RecordField::ScheduledStart,
        RecordField::ScheduledEnd,
        RecordField::Comments,
        RecordField::CompletionDate,
        RecordField::Variance,
        RecordField::BaselineStart,
        RecordField::BaselineFinish,
        RecordField::PercentComplete,
        RecordField::PercentRemaining,
        RecordField::PercentAllocation,
        RecordField::Read,
    ];

    /// 源数据列名
    pub fn column_name(&self) -> &'static str {
        use RecordField::*;
        match self {
            Health => "Health",
            Format => "Format",
            Grade => "Grade/Level",
            Unit => "Unit",
            Week => "Week",
            Component => "Component",
            Batch => "Batch",
            Activity => "Activity",
            Workflow => "Workflow",
            AssignedTo => "Assigned to:",
            WwStatus => "WW Status",
            Progress => "Progress",
            Predecessors => "Predecessors",
            ReportingStatus => "Reporting Status",
            Duration => "Duration",
            ScheduledStart => "Scheduled Start Date",
            ScheduledEnd => "Scheduled End Date",
            Comments => "Comments",
            CompletionDate => "Completion Date",
            Variance => "Variance",
            BaselineStart => "Baseline Start",
            BaselineFinish => "Baseline Finish",
            PercentComplete => "% Complete",
            PercentRemaining => "% Remaining",
            PercentAllocation => "% Allocation",
            Read => "Read",
        }
    }

    /// 是否为日期列（排序时按日期比较）
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            RecordField::ScheduledStart
                | RecordField::ScheduledEnd
                | RecordField::CompletionDate
                | RecordField::BaselineStart
                | RecordField::BaselineFinish
        )
    }

    /// 是否为百分比列（源值可能为数字）
    pub fn is_percent(&self) -> bool {
        matches!(
            self,
            RecordField::PercentComplete
                | RecordField::PercentRemaining
                | RecordField::PercentAllocation
        )
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

impl FromStr for RecordField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == RecordField::Batch.column_name() {
            return Ok(RecordField::Batch);
        }
        RecordField::REQUIRED
            .iter()
            .copied()
            .find(|field| field.column_name() == s)
            .ok_or_else(|| format!("未知字段: {}", s))
    }
}
