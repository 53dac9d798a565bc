// ==========================================
// 项目执行仪表盘 - 延期与风险引擎
// ==========================================
// 职责: 单条记录延期判定、延期等级、风险判定、分组告警
// 输入: 记录 + 显式传入的"今天"
// 红线: 引擎内部不读取系统时钟；计划开始日在未来的记录永不延期
// ==========================================

use crate::config::ConfigManager;
use crate::domain::hierarchy::HierarchicalData;
use crate::domain::metrics::{DelayTally, DelayedItem};
use crate::domain::record::WorkflowRecord;
use crate::domain::types::{DelaySeverity, GroupLevel, HealthStatus, ProgressStatus};
use crate::engine::dates::parse_date;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// 默认延期升级阈值（天）
pub const DEFAULT_FLAG_THRESHOLD_DAYS: i64 = 7;

/// 默认分组告警阈值（条）
pub const DEFAULT_GROUP_ALERT_THRESHOLD: usize = 3;

// ==========================================
// RiskEngine - 延期与风险引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct RiskEngine {
    /// 延期天数超过该值 → Flag
    flag_threshold_days: i64,
    /// 分组内 Flag 或 Alert 数超过该值 → 告警
    group_alert_threshold: usize,
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskEngine {
    pub fn new() -> Self {
        Self {
            flag_threshold_days: DEFAULT_FLAG_THRESHOLD_DAYS,
            group_alert_threshold: DEFAULT_GROUP_ALERT_THRESHOLD,
        }
    }

    pub fn with_thresholds(flag_threshold_days: i64, group_alert_threshold: usize) -> Self {
        Self {
            flag_threshold_days,
            group_alert_threshold,
        }
    }

    pub fn from_config(config: &ConfigManager) -> Self {
        Self::with_thresholds(
            config.delay_flag_threshold_days(),
            config.group_alert_threshold(),
        )
    }

    // ==========================================
    // 单条记录
    // ==========================================

    /// 延期边界日: 未开始 → 计划开始日；进行中 → 计划结束日
    ///
    /// 计划开始日缺失/无法解析/在未来 → None
    fn delay_boundary(&self, record: &WorkflowRecord, today: NaiveDate) -> Option<NaiveDate> {
        let start = parse_date(&record.scheduled_start)?;
        if start > today {
            return None;
        }

        let boundary = match ProgressStatus::parse(&record.progress) {
            ProgressStatus::NotStarted => start,
            ProgressStatus::InProgress => parse_date(&record.scheduled_end)?,
            _ => return None,
        };

        (boundary < today).then_some(boundary)
    }

    /// 是否延期
    pub fn is_delayed(&self, record: &WorkflowRecord, today: NaiveDate) -> bool {
        self.delay_boundary(record, today).is_some()
    }

    /// 延期天数（未延期为 0）
    pub fn delay_days(&self, record: &WorkflowRecord, today: NaiveDate) -> i64 {
        self.delay_boundary(record, today)
            .map(|boundary| (today - boundary).num_days())
            .unwrap_or(0)
    }

    /// 延期等级（未延期为 None）
    pub fn delay_severity(
        &self,
        record: &WorkflowRecord,
        today: NaiveDate,
    ) -> Option<DelaySeverity> {
        let boundary = self.delay_boundary(record, today)?;
        let days = (today - boundary).num_days();
        Some(if days > self.flag_threshold_days {
            DelaySeverity::Flag
        } else {
            DelaySeverity::Alert
        })
    }

    /// 风险 = 健康度为红 或 延期
    pub fn is_at_risk(&self, record: &WorkflowRecord, today: NaiveDate) -> bool {
        HealthStatus::parse(&record.health) == HealthStatus::Red || self.is_delayed(record, today)
    }

    // ==========================================
    // 分组
    // ==========================================

    /// 统计一组记录中的 Flag / Alert 数
    pub fn tally<'a, I>(&self, records: I, today: NaiveDate) -> DelayTally
    where
        I: IntoIterator<Item = &'a WorkflowRecord>,
    {
        records
            .into_iter()
            .filter_map(|record| self.delay_severity(record, today))
            .fold(DelayTally::default(), |mut tally, severity| {
                match severity {
                    DelaySeverity::Flag => tally.flags += 1,
                    DelaySeverity::Alert => tally.alerts += 1,
                }
                tally
            })
    }

    fn exceeds_threshold(&self, tally: DelayTally) -> bool {
        tally.flags > self.group_alert_threshold || tally.alerts > self.group_alert_threshold
    }

    /// 分组告警
    ///
    /// - Week / Activity: Flag 或 Alert 数超过阈值
    /// - Unit / Status: 按 Week 再分组，超过一个 Week 满足上述条件
    pub fn group_alert(
        &self,
        records: &[WorkflowRecord],
        level: GroupLevel,
        today: NaiveDate,
    ) -> bool {
        match level {
            GroupLevel::Week | GroupLevel::Activity => {
                self.exceeds_threshold(self.tally(records, today))
            }
            GroupLevel::Unit | GroupLevel::Status => {
                let mut by_week: BTreeMap<&str, Vec<&WorkflowRecord>> = BTreeMap::new();
                for record in records {
                    by_week.entry(record.week.as_str()).or_default().push(record);
                }

                let alerting_weeks = by_week
                    .values()
                    .filter(|week| self.exceeds_threshold(self.tally(week.iter().copied(), today)))
                    .count();
                alerting_weeks > 1
            }
        }
    }

    /// 遍历层级结构，收集所有延期记录（通知列表）
    pub fn delayed_items(&self, hierarchy: &HierarchicalData, today: NaiveDate) -> Vec<DelayedItem> {
        let mut items = Vec::new();
        for (path, records) in hierarchy.leaves() {
            for record in records {
                let Some(severity) = self.delay_severity(record, today) else {
                    continue;
                };
                items.push(DelayedItem {
                    component: path.component.to_string(),
                    batch: path.batch.map(str::to_string),
                    grade: path.grade.to_string(),
                    unit: path.unit.to_string(),
                    week: path.week.to_string(),
                    activity: record.activity.clone(),
                    delay_days: self.delay_days(record, today),
                    severity,
                });
            }
        }
        items
    }
}
