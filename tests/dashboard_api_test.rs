// ==========================================
// DashboardApi 集成测试
// ==========================================
// 职责: 验证视图门面基于状态快照产出的各类视图数据
// ==========================================

mod helpers;

use executive_dashboard::config::{config_keys, ConfigManager};
use executive_dashboard::domain::{
    DashboardFilters, DashboardView, DelaySeverity, RecordField, SortDirection,
};
use executive_dashboard::{DashboardApi, DashboardState};
use helpers::test_data_builder::records_to_json;
use helpers::{ymd, RecordBuilder};

fn program_state(config: ConfigManager) -> DashboardState {
    let records = vec![
        RecordBuilder::new("Math")
            .batch("B1")
            .grade("G1")
            .unit("U1")
            .week("1")
            .activity("Draft")
            .reporting_status("Drafting")
            .progress("Complete")
            .assigned_to("Alice")
            .scheduled("2024-01-02", "2024-01-12")
            .completion_date("2024-01-12")
            .variance("0")
            .build(),
        RecordBuilder::new("Math")
            .batch("")
            .grade("G1")
            .unit("U1")
            .week("2")
            .activity("Review")
            .reporting_status("Drafting")
            .progress("In Progress")
            .assigned_to("Alice, Bob")
            .scheduled("2024-01-10", "2024-02-09")
            .variance("4")
            .build(),
        RecordBuilder::new("Science")
            .batch("B2")
            .grade("G3")
            .unit("U5")
            .week("1")
            .activity("")
            .reporting_status("Final")
            .progress("Not Started")
            .assigned_to("Carol")
            .scheduled("2024-02-20", "2024-03-01")
            .variance("-1")
            .build(),
    ];

    let mut state = DashboardState::with_config(config);
    state.load(&records_to_json(&records)).unwrap();
    state
}

#[test]
fn test_batched_dataset_views() {
    let config = ConfigManager::new();
    let api = DashboardApi::from_config(&config);
    let state = program_state(config);

    let hierarchy = api.hierarchy(&state).unwrap();
    assert!(hierarchy.has_batch());
    assert!(state.snapshot().unwrap().has_batch);

    let options = api.filter_options(&state).unwrap();
    assert_eq!(options.batches, vec!["B1", "No Batch", "B2"]);
    assert_eq!(options.assignees, vec!["Alice", "Bob", "Carol"]);

    let summary = api.summary(&state, ymd(2024, 6, 15)).unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.on_track, 33);
    assert_eq!(summary.behind_schedule, 33);
    assert_eq!(summary.ahead_of_schedule, 33);
}

#[test]
fn test_delay_threshold_from_config() {
    let mut config = ConfigManager::new();
    config.set(config_keys::DELAY_FLAG_THRESHOLD_DAYS, "30");
    let api = DashboardApi::from_config(&config);
    let state = program_state(config);

    // 2024-02-20 开始未开工，今天 2024-03-01 → 10 天
    let items = api.delayed_items(&state, ymd(2024, 3, 1)).unwrap();
    let science = items.iter().find(|i| i.component == "Science").unwrap();
    assert_eq!(science.delay_days, 10);
    assert_eq!(science.severity, DelaySeverity::Alert);
    assert_eq!(science.batch.as_deref(), Some("B2"));

    // 进行中记录 2024-02-09 结束 → 21 天
    let review = items.iter().find(|i| i.activity == "Review").unwrap();
    assert_eq!(review.delay_days, 21);
    assert_eq!(review.batch.as_deref(), Some("No Batch"));
}

#[test]
fn test_timeline_views() {
    let api = DashboardApi::new();
    let state = program_state(ConfigManager::new());

    let burndown = api.burndown(&state, None).unwrap();
    let keys: Vec<_> = burndown.iter().map(|p| p.month_key.as_str()).collect();
    assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(burndown[0].actual, 1);
    assert_eq!(burndown[1].planned, 2);

    let scoped = api.burndown(&state, Some("U5")).unwrap();
    assert_eq!(scoped.len(), 2);
    assert!(scoped.iter().all(|p| p.actual == 0 && p.remaining == 1));

    let milestones = api.milestones(&state).unwrap();
    assert_eq!(milestones.len(), 2);
    assert_eq!(milestones[0].unit, "U1");
    assert_eq!(milestones[0].total, 2);
    assert!(!milestones[0].completed);
    assert_eq!(milestones[0].date, Some(ymd(2024, 2, 9)));

    let items = api.schedule_items(&state).unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].title, "U1 - Draft");

    let components = api.component_schedules(&state).unwrap();
    let math = components.iter().find(|c| c.component == "Math").unwrap();
    assert_eq!(math.start_date, Some(ymd(2024, 1, 2)));
    assert_eq!(math.end_date, Some(ymd(2024, 2, 9)));
    assert_eq!(math.variance, 4);
}

#[test]
fn test_allocation_views_follow_filters() {
    let api = DashboardApi::new();
    let mut state = program_state(ConfigManager::new());

    let distribution = api.activity_distribution(&state).unwrap();
    assert!(distribution.iter().any(|a| a.name == "Unknown" && a.value == 1));

    state.update_filters(DashboardFilters {
        component: Some("Math".to_string()),
        ..Default::default()
    });
    let report = api.allocation(&state).unwrap();
    assert_eq!(report.total_assignees(), 2);
    // Alice: 10 天 + 30/2 天
    assert_eq!(report.assignees[0].assignee, "Alice");
    assert_eq!(report.assignees[0].allocated_days, 25.0);
    assert_eq!(report.get("Alice").unwrap().shared_task_count, 1);
    assert!(report.get("Carol").is_none());
}

#[test]
fn test_report_sorting_by_date() {
    let mut config = ConfigManager::new();
    config.set(config_keys::PAGE_SIZE, "2");
    let api = DashboardApi::from_config(&config);
    let state = program_state(config);

    let first = api
        .report_page(&state, RecordField::ScheduledEnd, SortDirection::Desc, 1)
        .unwrap();
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items[0].scheduled_end, "2024-03-01");

    // 超出范围的页码截断到最后一页
    let last = api
        .report_page(&state, RecordField::ScheduledEnd, SortDirection::Desc, 9)
        .unwrap();
    assert_eq!(last.page, 2);
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].scheduled_end, "2024-01-12");
}

#[test]
fn test_view_selection_does_not_touch_data() {
    let mut state = program_state(ConfigManager::new());
    state.set_selected_view(DashboardView::Allocation);
    state.toggle_sidebar();

    assert_eq!(state.selected_view(), DashboardView::Allocation);
    assert_eq!(state.filtered_data().len(), 3);
}
