// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use executive_dashboard::domain::{PercentField, WorkflowRecord};
use serde_json::Value;

// ==========================================
// WorkflowRecord 构建器
// ==========================================

pub struct RecordBuilder {
    record: WorkflowRecord,
}

impl RecordBuilder {
    pub fn new(component: &str) -> Self {
        Self {
            record: WorkflowRecord {
                component: component.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn batch(mut self, batch: &str) -> Self {
        self.record.batch = Some(batch.to_string());
        self
    }

    pub fn grade(mut self, grade: &str) -> Self {
        self.record.grade = grade.to_string();
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.record.unit = unit.to_string();
        self
    }

    pub fn week(mut self, week: &str) -> Self {
        self.record.week = week.to_string();
        self
    }

    pub fn activity(mut self, activity: &str) -> Self {
        self.record.activity = activity.to_string();
        self
    }

    pub fn health(mut self, health: &str) -> Self {
        self.record.health = health.to_string();
        self
    }

    pub fn progress(mut self, progress: &str) -> Self {
        self.record.progress = progress.to_string();
        self
    }

    pub fn assigned_to(mut self, assignees: &str) -> Self {
        self.record.assigned_to = assignees.to_string();
        self
    }

    pub fn reporting_status(mut self, status: &str) -> Self {
        self.record.reporting_status = status.to_string();
        self
    }

    pub fn scheduled(mut self, start: &str, end: &str) -> Self {
        self.record.scheduled_start = start.to_string();
        self.record.scheduled_end = end.to_string();
        self
    }

    pub fn completion_date(mut self, date: &str) -> Self {
        self.record.completion_date = date.to_string();
        self
    }

    pub fn variance(mut self, variance: &str) -> Self {
        self.record.variance = variance.to_string();
        self
    }

    pub fn percent_complete(mut self, value: impl Into<PercentField>) -> Self {
        self.record.percent_complete = value.into();
        self
    }

    pub fn build(self) -> WorkflowRecord {
        self.record
    }

    /// 序列化为上传 JSON 中的单个对象
    pub fn to_json(self) -> Value {
        serde_json::to_value(self.record).unwrap()
    }
}

/// 多条记录 → 扁平数组输入
pub fn records_to_json(records: &[WorkflowRecord]) -> Value {
    serde_json::to_value(records).unwrap()
}
