// ==========================================
// 项目执行仪表盘 - 筛选条件
// ==========================================
// 职责: 稀疏筛选条件（缺省键 = 该维度不约束）
// 约定: 空字符串 / 空列表 等同于未设置
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 筛选维度（用于单独清除某一维度）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKey {
    Component,
    Batch,
    Grade,
    Unit,
    Week,
    Activity,
    Assignee,
    ReportingStatus,
    StartDate,
    EndDate,
    HealthStatus,
    ProgressStatus,
}

/// 仪表盘筛选条件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_status: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_status: Option<Vec<String>>,
}

impl DashboardFilters {
    /// 合并局部条件: partial 中出现的键覆盖当前值
    ///
    /// 传入 Some("") / Some(vec![]) 可清除对应维度
    pub fn merge(&mut self, partial: DashboardFilters) {
        fn take<T>(slot: &mut Option<T>, incoming: Option<T>) {
            if incoming.is_some() {
                *slot = incoming;
            }
        }

        take(&mut self.component, partial.component);
        take(&mut self.batch, partial.batch);
        take(&mut self.grade, partial.grade);
        take(&mut self.unit, partial.unit);
        take(&mut self.week, partial.week);
        take(&mut self.activity, partial.activity);
        take(&mut self.assignee, partial.assignee);
        take(&mut self.reporting_status, partial.reporting_status);
        take(&mut self.start_date, partial.start_date);
        take(&mut self.end_date, partial.end_date);
        take(&mut self.health_status, partial.health_status);
        take(&mut self.progress_status, partial.progress_status);
    }

    /// 清除单个维度（日期上下界只能通过这里撤销）
    pub fn clear(&mut self, key: FilterKey) {
        match key {
            FilterKey::Component => self.component = None,
            FilterKey::Batch => self.batch = None,
            FilterKey::Grade => self.grade = None,
            FilterKey::Unit => self.unit = None,
            FilterKey::Week => self.week = None,
            FilterKey::Activity => self.activity = None,
            FilterKey::Assignee => self.assignee = None,
            FilterKey::ReportingStatus => self.reporting_status = None,
            FilterKey::StartDate => self.start_date = None,
            FilterKey::EndDate => self.end_date = None,
            FilterKey::HealthStatus => self.health_status = None,
            FilterKey::ProgressStatus => self.progress_status = None,
        }
    }

    /// 生效中的条件个数（用于筛选面板角标）
    pub fn active_count(&self) -> usize {
        let texts = [
            &self.component,
            &self.batch,
            &self.grade,
            &self.unit,
            &self.week,
            &self.activity,
            &self.assignee,
            &self.reporting_status,
        ];
        let text_count = texts
            .iter()
            .filter(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
            .count();
        let date_count = [self.start_date, self.end_date]
            .iter()
            .filter(|d| d.is_some())
            .count();
        let set_count = [&self.health_status, &self.progress_status]
            .iter()
            .filter(|v| v.as_ref().is_some_and(|list| !list.is_empty()))
            .count();

        text_count + date_count + set_count
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}
