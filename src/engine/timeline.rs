// ==========================================
// 项目执行仪表盘 - 时间线引擎
// ==========================================
// 职责: 月度燃尽、月度完成、里程碑、甘特条目、Component 进度摘要
// 规则:
//   - 月份范围 = 所有可解析的 {计划开始, 计划结束, 完成日} 的最早月 ~ 最晚月
//   - 无法解析的日期不参与任何日期统计
// 注意: remaining = 总数 - 当月实际完成（非累计，保留原口径）
// ==========================================

use crate::domain::metrics::{
    ComponentSchedule, Milestone, MonthlyCompletion, ScheduleItem, TimelinePoint,
};
use crate::domain::record::WorkflowRecord;
use crate::domain::types::ProgressStatus;
use crate::engine::dates::{month_end, month_key, month_label, months_between, parse_date, same_month};
use crate::engine::metrics::variance_days;
use chrono::NaiveDate;
use std::collections::HashMap;

fn is_complete(record: &WorkflowRecord) -> bool {
    ProgressStatus::parse(&record.progress) == ProgressStatus::Complete
}

/// 记录集合涉及的月份（每月第一天），无可解析日期时为空
fn month_span<'a, I>(records: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = &'a WorkflowRecord>,
{
    let mut first: Option<NaiveDate> = None;
    let mut last: Option<NaiveDate> = None;

    for record in records {
        let dates = [
            &record.scheduled_start,
            &record.scheduled_end,
            &record.completion_date,
        ];
        for date in dates.into_iter().filter_map(|d| parse_date(d)) {
            first = Some(first.map_or(date, |f| f.min(date)));
            last = Some(last.map_or(date, |l| l.max(date)));
        }
    }

    match (first, last) {
        (Some(first), Some(last)) => months_between(first, last),
        _ => Vec::new(),
    }
}

pub struct TimelineEngine;

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineEngine {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 月度序列
    // ==========================================

    /// 月度燃尽（可选限定 Unit，空字符串视为不限定）
    pub fn burndown(&self, records: &[WorkflowRecord], unit: Option<&str>) -> Vec<TimelinePoint> {
        let scoped: Vec<&WorkflowRecord> = match unit.filter(|u| !u.is_empty()) {
            Some(unit) => records.iter().filter(|r| r.unit == unit).collect(),
            None => records.iter().collect(),
        };
        let total = scoped.len();

        month_span(scoped.iter().copied())
            .into_iter()
            .map(|month| {
                let last_day = month_end(month);
                let planned = scoped
                    .iter()
                    .filter(|r| parse_date(&r.scheduled_end).is_some_and(|end| end <= last_day))
                    .count();
                let actual = scoped
                    .iter()
                    .filter(|r| {
                        is_complete(r)
                            && parse_date(&r.completion_date).is_some_and(|d| same_month(d, month))
                    })
                    .count();

                TimelinePoint {
                    month: month_label(month),
                    month_key: month_key(month),
                    planned,
                    actual,
                    remaining: total.saturating_sub(actual),
                }
            })
            .collect()
    }

    /// 月度计划/实际完成数（当月计划结束数 / 当月完成日数）
    pub fn monthly_completions(&self, records: &[WorkflowRecord]) -> Vec<MonthlyCompletion> {
        month_span(records)
            .into_iter()
            .map(|month| {
                let in_month =
                    |value: &str| parse_date(value).is_some_and(|d| same_month(d, month));
                MonthlyCompletion {
                    name: month_label(month),
                    month_key: month_key(month),
                    planned: records.iter().filter(|r| in_month(&r.scheduled_end)).count(),
                    actual: records.iter().filter(|r| in_month(&r.completion_date)).count(),
                }
            })
            .collect()
    }

    // ==========================================
    // 里程碑与甘特
    // ==========================================

    /// 里程碑: 按 (Unit, Reporting Status) 聚合
    ///
    /// 组内全部完成才算 completed；按日期升序，无日期的组排在最后
    pub fn milestones(&self, records: &[WorkflowRecord]) -> Vec<Milestone> {
        let mut milestones: Vec<Milestone> = Vec::new();
        let mut index: HashMap<(&str, &str), usize> = HashMap::new();

        for record in records {
            let key = (record.unit.as_str(), record.reporting_status.as_str());
            let slot = *index.entry(key).or_insert_with(|| {
                milestones.push(Milestone {
                    unit: record.unit.clone(),
                    status: record.reporting_status.clone(),
                    date: None,
                    completed: false,
                    total: 0,
                    completed_count: 0,
                });
                milestones.len() - 1
            });

            let milestone = &mut milestones[slot];
            milestone.total += 1;
            if is_complete(record) {
                milestone.completed_count += 1;
            }
            if let Some(end) = parse_date(&record.scheduled_end) {
                milestone.date = Some(milestone.date.map_or(end, |d| d.max(end)));
            }
        }

        for milestone in &mut milestones {
            milestone.completed = milestone.total > 0 && milestone.completed_count == milestone.total;
        }

        milestones.sort_by_key(|m| (m.date.is_none(), m.date));
        milestones
    }

    /// 甘特条目: 仅保留计划起止均可解析的记录，按开始日升序
    pub fn schedule_items(&self, records: &[WorkflowRecord]) -> Vec<ScheduleItem> {
        let mut items: Vec<ScheduleItem> = records
            .iter()
            .filter_map(|record| {
                let start_date = parse_date(&record.scheduled_start)?;
                let end_date = parse_date(&record.scheduled_end)?;
                Some(ScheduleItem {
                    unit: record.unit.clone(),
                    status: record.reporting_status.clone(),
                    start_date,
                    end_date,
                    completed: is_complete(record),
                    title: format!("{} - {}", record.unit, record.activity),
                    description: record.workflow.clone(),
                })
            })
            .collect();

        items.sort_by_key(|item| item.start_date);
        items
    }

    /// Component 进度摘要（首次出现顺序）
    pub fn component_schedules(&self, records: &[WorkflowRecord]) -> Vec<ComponentSchedule> {
        fn earliest(slot: &mut Option<NaiveDate>, value: &str) {
            if let Some(d) = parse_date(value) {
                *slot = Some(slot.map_or(d, |cur| cur.min(d)));
            }
        }
        fn latest(slot: &mut Option<NaiveDate>, value: &str) {
            if let Some(d) = parse_date(value) {
                *slot = Some(slot.map_or(d, |cur| cur.max(d)));
            }
        }

        let mut schedules: Vec<ComponentSchedule> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for record in records {
            let slot = *index.entry(record.component.as_str()).or_insert_with(|| {
                schedules.push(ComponentSchedule {
                    component: record.component.clone(),
                    start_date: None,
                    end_date: None,
                    baseline_start: None,
                    baseline_finish: None,
                    variance: 0,
                });
                schedules.len() - 1
            });

            let schedule = &mut schedules[slot];
            earliest(&mut schedule.start_date, &record.scheduled_start);
            latest(&mut schedule.end_date, &record.scheduled_end);
            earliest(&mut schedule.baseline_start, &record.baseline_start);
            latest(&mut schedule.baseline_finish, &record.baseline_finish);
            schedule.variance += variance_days(record);
        }

        schedules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(progress: &str, start: &str, end: &str, completion: &str) -> WorkflowRecord {
        WorkflowRecord {
            unit: "U1".to_string(),
            progress: progress.to_string(),
            scheduled_start: start.to_string(),
            scheduled_end: end.to_string(),
            completion_date: completion.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_burndown_series() {
        let records = vec![
            record("Complete", "2024-01-05", "2024-01-20", "2024-01-25"),
            record("Complete", "2024-01-10", "2024-02-15", "2024-03-02"),
            record("In Progress", "2024-02-01", "2024-03-10", ""),
        ];
        let points = TimelineEngine::new().burndown(&records, None);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].month, "Jan 2024");
        assert_eq!(points[0].month_key, "2024-01");
        assert_eq!((points[0].planned, points[0].actual, points[0].remaining), (1, 1, 2));
        assert_eq!((points[1].planned, points[1].actual, points[1].remaining), (2, 0, 3));
        assert_eq!((points[2].planned, points[2].actual, points[2].remaining), (3, 1, 2));
    }

    #[test]
    fn test_burndown_actual_requires_complete() {
        let records = vec![record("In Progress", "2024-01-05", "2024-01-20", "2024-01-25")];
        let points = TimelineEngine::new().burndown(&records, None);
        assert_eq!(points[0].actual, 0);
        assert_eq!(points[0].remaining, 1);
    }

    #[test]
    fn test_burndown_unit_scope() {
        let mut other = record("Complete", "2023-06-01", "2023-06-02", "2023-06-02");
        other.unit = "U9".to_string();
        let records = vec![record("Complete", "2024-01-05", "2024-01-20", "2024-01-25"), other];

        let engine = TimelineEngine::new();
        assert_eq!(engine.burndown(&records, Some("U1")).len(), 1);
        assert_eq!(engine.burndown(&records, Some("")).len(), 8);
        assert!(engine.burndown(&records, Some("missing")).is_empty());
    }

    #[test]
    fn test_burndown_no_dates() {
        let records = vec![record("Complete", "TBD", "", "n/a")];
        assert!(TimelineEngine::new().burndown(&records, None).is_empty());
        assert!(TimelineEngine::new().burndown(&[], None).is_empty());
    }

    #[test]
    fn test_monthly_completions() {
        let records = vec![
            record("Complete", "2024-01-05", "2024-01-20", "2024-02-01"),
            record("In Progress", "2024-01-10", "2024-02-15", "2024-02-03"),
        ];
        let months = TimelineEngine::new().monthly_completions(&records);

        assert_eq!(months.len(), 2);
        assert_eq!((months[0].planned, months[0].actual), (1, 0));
        assert_eq!((months[1].planned, months[1].actual), (1, 2));
    }

    #[test]
    fn test_milestones() {
        let mut a = record("Complete", "", "2024-03-01", "");
        a.reporting_status = "Final".to_string();
        let mut b = record("In Progress", "", "2024-04-01", "");
        b.reporting_status = "Final".to_string();
        let mut c = record("Complete", "", "2024-01-01", "");
        c.reporting_status = "Draft".to_string();
        let mut d = record("Complete", "", "", "");
        d.reporting_status = "Review".to_string();

        let milestones = TimelineEngine::new().milestones(&[a, b, c, d]);
        assert_eq!(milestones.len(), 3);

        assert_eq!(milestones[0].status, "Draft");
        assert!(milestones[0].completed);

        assert_eq!(milestones[1].status, "Final");
        assert_eq!(milestones[1].date, Some(ymd(2024, 4, 1)));
        assert_eq!(milestones[1].total, 2);
        assert_eq!(milestones[1].completed_count, 1);
        assert!(!milestones[1].completed);

        // 无日期排最后
        assert_eq!(milestones[2].status, "Review");
        assert_eq!(milestones[2].date, None);
    }

    #[test]
    fn test_schedule_items() {
        let mut late = record("Complete", "2024-03-01", "2024-03-05", "");
        late.activity = "Edit".to_string();
        let early = record("In Progress", "2024-01-01", "2024-01-05", "");
        let skipped = record("In Progress", "2024-01-01", "TBD", "");

        let items = TimelineEngine::new().schedule_items(&[late, early, skipped]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].start_date, ymd(2024, 1, 1));
        assert!(!items[0].completed);
        assert_eq!(items[1].title, "U1 - Edit");
        assert!(items[1].completed);
    }

    #[test]
    fn test_component_schedules() {
        let mut a = record("", "2024-01-10", "2024-02-01", "");
        a.component = "Math".to_string();
        a.baseline_start = "2024-01-01".to_string();
        a.variance = "3".to_string();
        let mut b = record("", "2024-01-05", "2024-01-20", "");
        b.component = "Math".to_string();
        b.baseline_finish = "2024-01-25".to_string();
        b.variance = "-1".to_string();
        let mut c = record("", "", "", "");
        c.component = "ELA".to_string();

        let schedules = TimelineEngine::new().component_schedules(&[a, b, c]);
        assert_eq!(schedules.len(), 2);

        let math = &schedules[0];
        assert_eq!(math.component, "Math");
        assert_eq!(math.start_date, Some(ymd(2024, 1, 5)));
        assert_eq!(math.end_date, Some(ymd(2024, 2, 1)));
        assert_eq!(math.baseline_start, Some(ymd(2024, 1, 1)));
        assert_eq!(math.baseline_finish, Some(ymd(2024, 1, 25)));
        assert_eq!(math.variance, 2);
        assert_eq!(math.duration_days(), Some(27));

        assert_eq!(schedules[1].duration_days(), None);
    }
}
