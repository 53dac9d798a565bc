// ==========================================
// 项目执行仪表盘 - 筛选引擎
// ==========================================
// 职责: 对原始记录全集应用筛选条件（逻辑 AND）
// 规则:
//   - 空字符串 / 空列表 = 不约束
//   - grade/unit/week 比较 trim 后的值；其余文本条件原样比较
//   - assignee 为子串匹配（不拆分）
//   - 日期范围: 无法解析的日期在对应边界生效时被排除
//   - health/progress 为原值成员判定（不做大小写归一）
// 红线: 始终作用于原始全集，不在上一次结果上增量筛选
// ==========================================

use crate::domain::filters::DashboardFilters;
use crate::domain::record::WorkflowRecord;
use crate::engine::dates::parse_date;

/// 非空条件值
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// 非空成员集合
fn active_set(values: &Option<Vec<String>>) -> Option<&[String]> {
    values.as_deref().filter(|v| !v.is_empty())
}

pub struct FilterEngine;

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine {
    pub fn new() -> Self {
        Self
    }

    /// 应用筛选条件，返回满足全部条件的记录（保持原顺序）
    pub fn apply(&self, records: &[WorkflowRecord], filters: &DashboardFilters) -> Vec<WorkflowRecord> {
        records
            .iter()
            .filter(|record| self.matches(record, filters))
            .cloned()
            .collect()
    }

    /// 单条记录是否满足全部条件
    pub fn matches(&self, record: &WorkflowRecord, filters: &DashboardFilters) -> bool {
        if let Some(component) = active(&filters.component) {
            if record.component != component {
                return false;
            }
        }

        if let Some(batch) = active(&filters.batch) {
            if record.batch.as_deref() != Some(batch) {
                return false;
            }
        }

        if let Some(grade) = active(&filters.grade) {
            if record.grade.trim() != grade.trim() {
                return false;
            }
        }

        if let Some(unit) = active(&filters.unit) {
            if record.unit.trim() != unit.trim() {
                return false;
            }
        }

        if let Some(week) = active(&filters.week) {
            if record.week.trim() != week.trim() {
                return false;
            }
        }

        if let Some(activity) = active(&filters.activity) {
            if record.activity != activity {
                return false;
            }
        }

        if let Some(assignee) = active(&filters.assignee) {
            if !record.assigned_to.contains(assignee) {
                return false;
            }
        }

        if let Some(status) = active(&filters.reporting_status) {
            if record.reporting_status != status {
                return false;
            }
        }

        if let Some(start_bound) = filters.start_date {
            match parse_date(&record.scheduled_start) {
                Some(start) if start >= start_bound => {}
                _ => return false,
            }
        }

        if let Some(end_bound) = filters.end_date {
            match parse_date(&record.scheduled_end) {
                Some(end) if end <= end_bound => {}
                _ => return false,
            }
        }

        if let Some(allowed) = active_set(&filters.health_status) {
            if !allowed.contains(&record.health) {
                return false;
            }
        }

        if let Some(allowed) = active_set(&filters.progress_status) {
            if !allowed.contains(&record.progress) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Vec<WorkflowRecord> {
        vec![
            WorkflowRecord {
                component: "Math".to_string(),
                grade: " G3 ".to_string(),
                unit: "U1".to_string(),
                week: "W1".to_string(),
                assigned_to: "Alice, Bob".to_string(),
                health: "Green".to_string(),
                progress: "Complete".to_string(),
                scheduled_start: "2024-01-05".to_string(),
                scheduled_end: "2024-01-20".to_string(),
                ..Default::default()
            },
            WorkflowRecord {
                component: "ELA".to_string(),
                grade: "G4".to_string(),
                unit: "U2".to_string(),
                week: "W2".to_string(),
                assigned_to: "Carol".to_string(),
                health: "red".to_string(),
                progress: "In Progress".to_string(),
                scheduled_start: "TBD".to_string(),
                scheduled_end: "03/01/2024".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_empty_filters_return_all() {
        let records = sample();
        let result = FilterEngine::new().apply(&records, &DashboardFilters::default());
        assert_eq!(result, records);
    }

    #[test]
    fn test_empty_string_is_no_constraint() {
        let records = sample();
        let filters = DashboardFilters {
            component: Some(String::new()),
            health_status: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(FilterEngine::new().apply(&records, &filters).len(), 2);
    }

    #[test]
    fn test_component_exact_match() {
        let records = sample();
        let filters = DashboardFilters {
            component: Some("Math".to_string()),
            ..Default::default()
        };
        let result = FilterEngine::new().apply(&records, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].component, "Math");

        let filters = DashboardFilters {
            component: Some("math".to_string()),
            ..Default::default()
        };
        assert!(FilterEngine::new().apply(&records, &filters).is_empty());
    }

    #[test]
    fn test_grade_trimmed_match() {
        let records = sample();
        let filters = DashboardFilters {
            grade: Some("G3".to_string()),
            ..Default::default()
        };
        assert_eq!(FilterEngine::new().apply(&records, &filters).len(), 1);
    }

    #[test]
    fn test_assignee_substring_match() {
        let records = sample();
        let filters = DashboardFilters {
            assignee: Some("Ali".to_string()),
            ..Default::default()
        };
        let result = FilterEngine::new().apply(&records, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].assigned_to, "Alice, Bob");
    }

    #[test]
    fn test_date_range_excludes_unparseable() {
        let records = sample();
        let filters = DashboardFilters {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        // 第二条记录开始日为 "TBD"
        let result = FilterEngine::new().apply(&records, &filters);
        assert_eq!(result.len(), 1);

        let filters = DashboardFilters {
            end_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        let result = FilterEngine::new().apply(&records, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].component, "Math");
    }

    #[test]
    fn test_membership_filters_are_literal() {
        let records = sample();
        let filters = DashboardFilters {
            health_status: Some(vec!["red".to_string()]),
            ..Default::default()
        };
        assert_eq!(FilterEngine::new().apply(&records, &filters).len(), 1);

        let filters = DashboardFilters {
            health_status: Some(vec!["green".to_string()]),
            ..Default::default()
        };
        // "Green" ≠ "green"
        assert!(FilterEngine::new().apply(&records, &filters).is_empty());

        let filters = DashboardFilters {
            progress_status: Some(vec!["Complete".to_string(), "In Progress".to_string()]),
            ..Default::default()
        };
        assert_eq!(FilterEngine::new().apply(&records, &filters).len(), 2);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let records = sample();
        let filters = DashboardFilters {
            component: Some("Math".to_string()),
            health_status: Some(vec!["red".to_string()]),
            ..Default::default()
        };
        assert!(FilterEngine::new().apply(&records, &filters).is_empty());
    }
}
