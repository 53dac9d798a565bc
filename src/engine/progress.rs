// ==========================================
// 项目执行仪表盘 - 完成度换算
// ==========================================
// 职责: "% Complete" 原始值 → 0..=100 的完成度
// 规则:
//   - 数字: n × 100 后截断到 [0, 100]（源数据为 0..1 小数）
//   - 文本: "complete" → 100，"in progress" → 50，"not started" → 0，否则取第一段连续数字
//   - Progress = "complete" 的记录一律视为 100
// ==========================================

use crate::domain::record::{PercentField, WorkflowRecord};
use crate::domain::types::ProgressStatus;

/// 百分比字段 → 完成度
pub fn progress_percentage(value: &PercentField) -> f64 {
    match value {
        PercentField::Number(n) if n.is_finite() => (n * 100.0).clamp(0.0, 100.0),
        PercentField::Number(_) => 0.0,
        PercentField::Text(text) => text_percentage(text),
    }
}

fn text_percentage(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    match text.trim().to_lowercase().as_str() {
        "complete" => return 100.0,
        "in progress" => return 50.0,
        "not started" => return 0.0,
        _ => {}
    }

    // 第一段连续数字（"Week 3: 45%" → 3）
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0.0;
    };
    let digits: String = text[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    // 超长数字串直接按 100 处理
    digits.parse::<u64>().map_or(100.0, |n| n.min(100) as f64)
}

/// 单条记录的完成度
pub fn record_completion(record: &WorkflowRecord) -> f64 {
    if ProgressStatus::parse(&record.progress) == ProgressStatus::Complete {
        return 100.0;
    }
    progress_percentage(&record.percent_complete)
}
