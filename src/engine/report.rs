// ==========================================
// 项目执行仪表盘 - 明细报表引擎
// ==========================================
// 职责: 明细表排序、分页、筛选面板选项
// ==========================================

use crate::config::ConfigManager;
use crate::domain::metrics::{FilterOptions, ReportPage};
use crate::domain::record::{PercentField, RecordField, WorkflowRecord};
use crate::domain::types::SortDirection;
use crate::engine::dates::parse_date;
use crate::engine::hierarchy::DEFAULT_NO_BATCH_LABEL;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 排序键: 日期 < 数值 < 文本（跨类型按类别排序，保证全序）
#[derive(Debug)]
enum SortKey {
    Date(NaiveDate),
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(record: &WorkflowRecord, field: RecordField) -> Self {
        if let Some(PercentField::Number(n)) = record_percent(record, field) {
            return SortKey::Number(*n);
        }

        let text = record.field(field).to_lowercase();
        if field.is_date() {
            if let Some(date) = parse_date(&text) {
                return SortKey::Date(date);
            }
        }
        SortKey::Text(text)
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Date(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn record_percent(record: &WorkflowRecord, field: RecordField) -> Option<&PercentField> {
    match field {
        RecordField::PercentComplete => Some(&record.percent_complete),
        RecordField::PercentRemaining => Some(&record.percent_remaining),
        RecordField::PercentAllocation => Some(&record.percent_allocation),
        _ => None,
    }
}

/// 按首次出现顺序去重收集
fn push_unique(values: &mut Vec<String>, seen: &mut HashSet<String>, value: &str) {
    if !value.is_empty() && seen.insert(value.to_string()) {
        values.push(value.to_string());
    }
}

pub struct ReportEngine {
    page_size: usize,
    no_batch_label: String,
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEngine {
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            no_batch_label: DEFAULT_NO_BATCH_LABEL.to_string(),
        }
    }

    pub fn from_config(config: &ConfigManager) -> Self {
        Self {
            page_size: config.page_size(),
            no_batch_label: config.no_batch_label(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // ==========================================
    // 排序与分页
    // ==========================================

    /// 按字段排序（大小写不敏感；日期字段两侧都可解析时按日期比较）
    ///
    /// 稳定排序: 相等元素保持原顺序
    pub fn sort_records(
        &self,
        records: &[WorkflowRecord],
        field: RecordField,
        direction: SortDirection,
    ) -> Vec<WorkflowRecord> {
        let mut keyed: Vec<(SortKey, &WorkflowRecord)> = records
            .iter()
            .map(|record| (SortKey::of(record, field), record))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| match direction {
            SortDirection::Asc => a.compare(b),
            SortDirection::Desc => b.compare(a),
        });

        keyed.into_iter().map(|(_, record)| record.clone()).collect()
    }

    /// 分页（页码从 1 开始，超出范围时截断到合法页）
    pub fn paginate(&self, records: &[WorkflowRecord], page: usize, page_size: usize) -> ReportPage {
        let page_size = page_size.max(1);
        let total_items = records.len();
        let total_pages = total_items.div_ceil(page_size);
        let page = page.clamp(1, total_pages.max(1));

        let start = (page - 1) * page_size;
        let end = (start + page_size).min(total_items);
        let items = records.get(start..end).map(<[_]>::to_vec).unwrap_or_default();

        ReportPage {
            items,
            page,
            page_size,
            total_pages,
            total_items,
        }
    }

    /// 使用默认页大小分页
    pub fn page(&self, records: &[WorkflowRecord], page: usize) -> ReportPage {
        self.paginate(records, page, self.page_size)
    }

    // ==========================================
    // 筛选面板选项
    // ==========================================

    /// 各维度去重取值（首次出现顺序，空值不列出）
    ///
    /// Batch 仅在数据集带 Batch 列时给出，空值归入默认批次标签
    pub fn filter_options(&self, raw: &[WorkflowRecord]) -> FilterOptions {
        let has_batch = raw.first().is_some_and(|r| r.batch.is_some());
        let mut options = FilterOptions::default();
        let mut seen: [HashSet<String>; 8] = Default::default();

        for record in raw {
            let [components, batches, grades, units, weeks, activities, assignees, statuses] =
                &mut seen;
            push_unique(&mut options.components, components, &record.component);
            if has_batch {
                let batch = record
                    .batch
                    .as_deref()
                    .filter(|b| !b.is_empty())
                    .unwrap_or(self.no_batch_label.as_str());
                push_unique(&mut options.batches, batches, batch);
            }
            push_unique(&mut options.grades, grades, record.grade.trim());
            push_unique(&mut options.units, units, record.unit.trim());
            push_unique(&mut options.weeks, weeks, record.week.trim());
            push_unique(&mut options.activities, activities, &record.activity);
            for name in record.assignees() {
                push_unique(&mut options.assignees, assignees, name);
            }
            push_unique(&mut options.reporting_statuses, statuses, &record.reporting_status);
        }

        options
    }

    /// 去重排序后的 Unit 列表（燃尽图单元选择）
    pub fn unique_units(&self, records: &[WorkflowRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.unit.as_str())
            .filter(|u| !u.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
