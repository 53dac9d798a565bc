// ==========================================
// 项目执行仪表盘 - 仪表盘 API
// ==========================================
// 职责: 面向视图的只读门面，从状态容器的筛选结果 / 层级快照产出视图数据
// 红线: 不修改状态；"今天" 由调用方传入，today() 仅供最外层使用
// ==========================================

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::api::error::{ApiError, ApiResult};
use crate::app::DashboardState;
use crate::config::ConfigManager;
use crate::domain::{
    ActivityCount, AllocationReport, ComponentSchedule, DelayedItem, FilterOptions,
    GroupLevel, HierarchicalData, MetricSummary, Milestone, MonthlyCompletion, RecordField,
    ReportPage, ScheduleItem, SortDirection, StatusCounts, TimelinePoint, WorkflowMetrics,
    WorkflowRecord,
};
use crate::engine::{
    AllocationEngine, MetricsEngine, ReportEngine, RiskEngine, TimelineEngine,
};

/// 系统当前日期（仅在最外层调用）
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ==========================================
// DashboardApi - 仪表盘 API
// ==========================================

/// 仪表盘API
///
/// 所有聚合均基于筛选后的记录；筛选面板选项与组件排期基于原始记录
pub struct DashboardApi {
    metrics: MetricsEngine,
    risk: RiskEngine,
    allocation: AllocationEngine,
    timeline: TimelineEngine,
    report: ReportEngine,
}

impl Default for DashboardApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardApi {
    pub fn new() -> Self {
        Self::from_config(&ConfigManager::new())
    }

    /// 按配置构建各引擎（阈值、标签、页大小）
    pub fn from_config(config: &ConfigManager) -> Self {
        Self {
            metrics: MetricsEngine::from_config(config),
            risk: RiskEngine::from_config(config),
            allocation: AllocationEngine::new(),
            timeline: TimelineEngine::new(),
            report: ReportEngine::from_config(config),
        }
    }

    fn loaded<'a>(&self, state: &'a DashboardState) -> ApiResult<&'a [WorkflowRecord]> {
        if !state.has_data() {
            return Err(ApiError::NoDataLoaded);
        }
        Ok(state.filtered_data())
    }

    // ==========================================
    // 概览
    // ==========================================

    /// 汇总卡片（完成率、按期/延后/提前占比）
    pub fn summary(&self, state: &DashboardState, today: NaiveDate) -> ApiResult<MetricSummary> {
        let records = self.loaded(state)?;
        Ok(self.metrics.summary_metrics(records, today))
    }

    pub fn status_counts(
        &self,
        state: &DashboardState,
        today: NaiveDate,
    ) -> ApiResult<StatusCounts> {
        let records = self.loaded(state)?;
        Ok(self.metrics.count_by_status(records, today))
    }

    pub fn metrics(&self, state: &DashboardState) -> ApiResult<WorkflowMetrics> {
        let records = self.loaded(state)?;
        Ok(self.metrics.calculate_metrics(records))
    }

    // ==========================================
    // 资源分配
    // ==========================================

    pub fn allocation(&self, state: &DashboardState) -> ApiResult<AllocationReport> {
        let records = self.loaded(state)?;
        Ok(self.allocation.allocate(records))
    }

    pub fn activity_distribution(&self, state: &DashboardState) -> ApiResult<Vec<ActivityCount>> {
        let records = self.loaded(state)?;
        Ok(self.allocation.activity_distribution(records))
    }

    // ==========================================
    // 时间线
    // ==========================================

    /// 月度燃尽序列，可限定单个 Unit（None 或空串表示全部）
    pub fn burndown(
        &self,
        state: &DashboardState,
        unit: Option<&str>,
    ) -> ApiResult<Vec<TimelinePoint>> {
        let records = self.loaded(state)?;
        Ok(self.timeline.burndown(records, unit))
    }

    pub fn monthly_completions(&self, state: &DashboardState) -> ApiResult<Vec<MonthlyCompletion>> {
        let records = self.loaded(state)?;
        Ok(self.timeline.monthly_completions(records))
    }

    pub fn milestones(&self, state: &DashboardState) -> ApiResult<Vec<Milestone>> {
        let records = self.loaded(state)?;
        Ok(self.timeline.milestones(records))
    }

    pub fn schedule_items(&self, state: &DashboardState) -> ApiResult<Vec<ScheduleItem>> {
        let records = self.loaded(state)?;
        Ok(self.timeline.schedule_items(records))
    }

    /// 组件级排期对比（始终基于原始记录）
    pub fn component_schedules(
        &self,
        state: &DashboardState,
    ) -> ApiResult<Vec<ComponentSchedule>> {
        self.loaded(state)?;
        Ok(self.timeline.component_schedules(state.raw_data()))
    }

    // ==========================================
    // 层级与延期
    // ==========================================

    pub fn hierarchy<'a>(&self, state: &'a DashboardState) -> ApiResult<&'a HierarchicalData> {
        self.loaded(state)?;
        Ok(state.processed_data())
    }

    /// 通知列表: 层级中所有延期记录
    pub fn delayed_items(
        &self,
        state: &DashboardState,
        today: NaiveDate,
    ) -> ApiResult<Vec<DelayedItem>> {
        self.loaded(state)?;
        Ok(self.risk.delayed_items(state.processed_data(), today))
    }

    /// 触发 Unit 级告警的单元（按筛选结果分组）
    pub fn alerting_units(&self, state: &DashboardState, today: NaiveDate) -> ApiResult<Vec<String>> {
        let records = self.loaded(state)?;

        let mut by_unit: BTreeMap<&str, Vec<WorkflowRecord>> = BTreeMap::new();
        for record in records {
            by_unit
                .entry(record.unit.trim())
                .or_default()
                .push(record.clone());
        }

        Ok(by_unit
            .into_iter()
            .filter(|(_, group)| self.risk.group_alert(group, GroupLevel::Unit, today))
            .map(|(unit, _)| unit.to_string())
            .collect())
    }

    // ==========================================
    // 明细表
    // ==========================================

    /// 排序 + 分页（页码从 1 开始）
    pub fn report_page(
        &self,
        state: &DashboardState,
        sort_field: RecordField,
        direction: SortDirection,
        page: usize,
    ) -> ApiResult<ReportPage> {
        if page == 0 {
            return Err(ApiError::InvalidInput(crate::i18n::t("api.invalid_page")));
        }
        let records = self.loaded(state)?;
        let sorted = self.report.sort_records(records, sort_field, direction);
        Ok(self.report.page(&sorted, page))
    }

    /// 筛选面板选项（基于原始记录，保证筛选后仍可切换）
    pub fn filter_options(&self, state: &DashboardState) -> ApiResult<FilterOptions> {
        self.loaded(state)?;
        Ok(self.report.filter_options(state.raw_data()))
    }

    pub fn unique_units(&self, state: &DashboardState) -> ApiResult<Vec<String>> {
        self.loaded(state)?;
        Ok(self.report.unique_units(state.raw_data()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DashboardFilters;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loaded_state() -> DashboardState {
        let mut state = DashboardState::new();
        state
            .load(&json!([
                {
                    "Component": "Math", "Unit": "U1", "Week": "1", "Activity": "Draft",
                    "Progress": "Not Started", "Health": "Green",
                    "Assigned to:": "Alice, Bob",
                    "Scheduled Start Date": "2024-06-01", "Scheduled End Date": "2024-06-11"
                },
                {
                    "Component": "Math", "Unit": "U2", "Week": "1", "Activity": "Review",
                    "Progress": "Complete", "Health": "Red",
                    "Assigned to:": "Alice",
                    "Scheduled Start Date": "2024-05-01", "Scheduled End Date": "2024-05-05",
                    "Completion Date": "2024-05-05"
                },
                {
                    "Component": "Science", "Unit": "U3", "Week": "2", "Activity": "Draft",
                    "Progress": "In Progress", "Health": "Yellow",
                    "Assigned to:": "Carol",
                    "Scheduled Start Date": "2024-07-01", "Scheduled End Date": "2024-07-20"
                }
            ]))
            .unwrap();
        state
    }

    #[test]
    fn test_requires_loaded_data() {
        let api = DashboardApi::new();
        let state = DashboardState::new();
        assert!(matches!(
            api.summary(&state, date(2024, 6, 15)),
            Err(ApiError::NoDataLoaded)
        ));
        assert!(matches!(api.filter_options(&state), Err(ApiError::NoDataLoaded)));
    }

    #[test]
    fn test_summary_follows_filters() {
        let api = DashboardApi::new();
        let mut state = loaded_state();
        let today = date(2024, 6, 15);

        let summary = api.summary(&state, today).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        // 红色健康 + 已过开始日未开工
        assert_eq!(summary.at_risk, 2);

        state.update_filters(DashboardFilters {
            component: Some("Science".to_string()),
            ..Default::default()
        });
        let summary = api.summary(&state, today).unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.at_risk, 0);

        // 筛选面板仍基于原始记录
        let options = api.filter_options(&state).unwrap();
        assert_eq!(options.components, vec!["Math", "Science"]);
    }

    #[test]
    fn test_delayed_items_from_hierarchy() {
        let api = DashboardApi::new();
        let state = loaded_state();

        let items = api.delayed_items(&state, date(2024, 6, 15)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit, "U1");
        assert_eq!(items[0].delay_days, 14);
    }

    #[test]
    fn test_report_page_sorted_and_paged() {
        let mut config = ConfigManager::new();
        config.set(crate::config::config_keys::PAGE_SIZE, "2");
        let api = DashboardApi::from_config(&config);
        let state = loaded_state();

        let page = api
            .report_page(&state, RecordField::Unit, SortDirection::Desc, 1)
            .unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].unit, "U3");

        assert!(matches!(
            api.report_page(&state, RecordField::Unit, SortDirection::Asc, 0),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_allocation_and_units() {
        let api = DashboardApi::new();
        let state = loaded_state();

        let report = api.allocation(&state).unwrap();
        assert_eq!(report.get("Bob").unwrap().allocated_days, 5.0);
        assert_eq!(report.shared_tasks.len(), 1);

        assert_eq!(api.unique_units(&state).unwrap(), vec!["U1", "U2", "U3"]);
        assert!(api.alerting_units(&state, date(2024, 6, 15)).unwrap().is_empty());
    }
}
