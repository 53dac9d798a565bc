// ==========================================
// 项目执行仪表盘 - 指标引擎
// ==========================================
// 职责: 状态计数、健康度计数、平均完成度、偏差分桶、总览摘要
// 输入: 当前筛选集（或原始全集）
// 红线: 空集合返回全零结果（不除零、不产生 NaN）；畸形字段按空值处理
// ==========================================

use crate::config::ConfigManager;
use crate::domain::metrics::{
    HealthCounts, MetricSummary, StatusCounts, VarianceCounts, WorkflowMetrics,
};
use crate::domain::record::WorkflowRecord;
use crate::domain::types::{HealthStatus, ProgressStatus, VarianceBucket};
use crate::engine::dates::{parse_date, parse_leading_int};
use crate::engine::progress::record_completion;
use crate::engine::risk::RiskEngine;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// 默认未分配标签
pub const DEFAULT_UNASSIGNED_LABEL: &str = "Unassigned";

/// count / total 的整数百分比（total 为 0 时返回 0）
pub fn percent_of(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// 记录的偏差天数（无法解析 → 0）
pub fn variance_days(record: &WorkflowRecord) -> i64 {
    parse_leading_int(&record.variance).unwrap_or(0)
}

// ==========================================
// MetricsEngine - 指标引擎
// ==========================================
pub struct MetricsEngine {
    risk: RiskEngine,
    unassigned_label: String,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self {
            risk: RiskEngine::new(),
            unassigned_label: DEFAULT_UNASSIGNED_LABEL.to_string(),
        }
    }

    pub fn from_config(config: &ConfigManager) -> Self {
        Self {
            risk: RiskEngine::from_config(config),
            unassigned_label: config.unassigned_label(),
        }
    }

    // ==========================================
    // 基础计数
    // ==========================================

    /// 进度分布 + 风险数
    ///
    /// 未识别的 Progress 不进入三个桶，只计入总数
    pub fn count_by_status(&self, records: &[WorkflowRecord], today: NaiveDate) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in records {
            match ProgressStatus::parse(&record.progress) {
                ProgressStatus::Complete => counts.complete += 1,
                ProgressStatus::InProgress => counts.in_progress += 1,
                ProgressStatus::NotStarted => counts.not_started += 1,
                ProgressStatus::Other => {}
            }
            if self.risk.is_at_risk(record, today) {
                counts.at_risk += 1;
            }
        }
        counts
    }

    pub fn health_counts(&self, records: &[WorkflowRecord]) -> HealthCounts {
        let mut counts = HealthCounts::default();
        for record in records {
            match HealthStatus::parse(&record.health) {
                HealthStatus::Green => counts.green += 1,
                HealthStatus::Yellow => counts.yellow += 1,
                HealthStatus::Red => counts.red += 1,
                HealthStatus::Blank => counts.blank += 1,
            }
        }
        counts
    }

    /// 平均完成度（四舍五入，空集合为 0）
    pub fn average_completion(&self, records: &[WorkflowRecord]) -> u32 {
        if records.is_empty() {
            return 0;
        }
        let sum: f64 = records.iter().map(record_completion).sum();
        (sum / records.len() as f64).round() as u32
    }

    pub fn variance_counts(&self, records: &[WorkflowRecord]) -> VarianceCounts {
        let mut counts = VarianceCounts::default();
        for record in records {
            match VarianceBucket::from_days(variance_days(record)) {
                VarianceBucket::AheadOfSchedule => counts.negative += 1,
                VarianceBucket::OnTrack => counts.zero += 1,
                VarianceBucket::BehindSchedule => counts.positive += 1,
            }
        }
        counts
    }

    // ==========================================
    // 综合指标
    // ==========================================

    /// 当前视图的综合指标
    pub fn calculate_metrics(&self, records: &[WorkflowRecord]) -> WorkflowMetrics {
        let mut completed_items = 0;
        let mut in_progress_items = 0;
        let mut not_started_items = 0;
        let mut workflows_by_assignee: BTreeMap<String, usize> = BTreeMap::new();
        let mut due_date_distribution: BTreeMap<String, usize> = BTreeMap::new();

        for record in records {
            match ProgressStatus::parse(&record.progress) {
                ProgressStatus::Complete => completed_items += 1,
                ProgressStatus::InProgress => in_progress_items += 1,
                ProgressStatus::NotStarted => not_started_items += 1,
                ProgressStatus::Other => {}
            }

            let assignee = if record.assigned_to.is_empty() {
                self.unassigned_label.clone()
            } else {
                record.assigned_to.clone()
            };
            *workflows_by_assignee.entry(assignee).or_insert(0) += 1;

            if let Some(due) = parse_date(&record.scheduled_end) {
                *due_date_distribution
                    .entry(due.format("%Y-%m-%d").to_string())
                    .or_insert(0) += 1;
            }
        }

        WorkflowMetrics {
            total_items: records.len(),
            completed_items,
            in_progress_items,
            not_started_items,
            health_status: self.health_counts(records),
            average_completion: self.average_completion(records),
            workflows_by_assignee,
            due_date_distribution,
            variance: self.variance_counts(records),
        }
    }

    /// 总览摘要
    pub fn summary_metrics(&self, records: &[WorkflowRecord], today: NaiveDate) -> MetricSummary {
        let total = records.len();
        let status = self.count_by_status(records, today);
        let variance = self.variance_counts(records);

        MetricSummary {
            total,
            completed: status.complete,
            in_progress: status.in_progress,
            not_started: status.not_started,
            at_risk: status.at_risk,
            completion: percent_of(status.complete, total),
            on_track: percent_of(variance.zero, total),
            behind_schedule: percent_of(variance.positive, total),
            ahead_of_schedule: percent_of(variance.negative, total),
        }
    }
}
