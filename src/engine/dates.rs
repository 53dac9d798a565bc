// ==========================================
// 项目执行仪表盘 - 日期与数值解析
// ==========================================
// 职责: 双策略日期解析（ISO → MM/DD/YY(YY)）、整数前缀解析、月份运算
// 红线: 解析失败返回 None，由调用方排除出日期相关统计，绝不回退为"今天"或 0
// ==========================================

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};

/// ISO 日期时间的可接受格式（日期与时间之间允许 'T' 或空格）
const ISO_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// 解析日期字符串
///
/// # 策略
/// 1. 严格 ISO: `2024-06-01` / `2024-06-01T08:00:00` / RFC 3339
/// 2. 斜杠格式: `MM/DD/YY` 或 `MM/DD/YYYY`，两位年份 <50 → 20xx，≥50 → 19xx
///
/// # 返回
/// - Some(NaiveDate): 解析成功
/// - None: 空值或无法解析（含非法日历日，如 02/30/2024）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_iso(trimmed).or_else(|| parse_slash_date(trimmed))
}

fn parse_iso(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

fn parse_slash_date(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let month = parse_leading_int(parts[0])?;
    let day = parse_leading_int(parts[1])?;
    let mut year = parse_leading_int(parts[2])?;

    // 两位年份展开
    if (0..100).contains(&year) {
        year += if year < 50 { 2000 } else { 1900 };
    }

    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// 格式化日期为 MM/DD/YYYY，None 返回空字符串
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%m/%d/%Y").to_string())
        .unwrap_or_default()
}

/// 计划日期与实际日期之间的偏差天数（actual - scheduled）
///
/// 任一日期无法解析时返回 0
pub fn calculate_variance(scheduled: &str, actual: &str) -> i64 {
    match (parse_date(scheduled), parse_date(actual)) {
        (Some(s), Some(a)) => (a - s).num_days(),
        _ => 0,
    }
}

/// 解析字符串开头的整数
///
/// 允许前导空白与正负号，遇到第一个非数字字符即停止；
/// "45%" → 45, " -3 days" → -3, "3.7" → 3, "abc" → None
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let s = value.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digit_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digit_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

// ==========================================
// 月份运算
// ==========================================

/// 当月第一天
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// 当月最后一天
pub fn month_end(date: NaiveDate) -> NaiveDate {
    next_month(date)
        .pred_opt()
        .unwrap_or(date)
}

/// 下月第一天
pub fn next_month(date: NaiveDate) -> NaiveDate {
    let start = month_start(date);
    start
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX)
}

/// 是否同一日历月
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// 月份显示标签，如 "Jan 2024"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// 月份排序键，如 "2024-01"
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// 从 first 所在月到 last 所在月（含）的每月第一天
pub fn months_between(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let end = month_start(last);
    let mut current = month_start(first);
    while current <= end {
        months.push(current);
        let next = next_month(current);
        if next == current {
            break;
        }
        current = next;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_variants() {
        assert_eq!(parse_date("2024-06-01"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024-06-01T08:30:00"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024-06-01 08:30:00.250"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024-06-01T08:30:00Z"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("  2024-06-01  "), Some(ymd(2024, 6, 1)));
    }

    #[test]
    fn test_parse_slash_formats() {
        assert_eq!(parse_date("06/15/2024"), Some(ymd(2024, 6, 15)));
        assert_eq!(parse_date("6/5/24"), Some(ymd(2024, 6, 5)));
        assert_eq!(parse_date("01/02/49"), Some(ymd(2049, 1, 2)));
        assert_eq!(parse_date("01/02/50"), Some(ymd(1950, 1, 2)));
        assert_eq!(parse_date("12/31/99"), Some(ymd(1999, 12, 31)));
    }

    #[test]
    fn test_parse_invalid_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("TBD"), None);
        assert_eq!(parse_date("02/30/2024"), None);
        assert_eq!(parse_date("13/01/2024"), None);
        assert_eq!(parse_date("2024/06"), None);
        assert_eq!(parse_date("a/b/c"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some(ymd(2024, 3, 7))), "03/07/2024");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn test_calculate_variance() {
        assert_eq!(calculate_variance("2024-01-01", "2024-01-11"), 10);
        assert_eq!(calculate_variance("2024-01-11", "01/01/2024"), -10);
        assert_eq!(calculate_variance("", "2024-01-11"), 0);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("45%"), Some(45));
        assert_eq!(parse_leading_int(" -3 days"), Some(-3));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("3.7"), Some(3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn test_month_helpers() {
        let d = ymd(2024, 2, 10);
        assert_eq!(month_start(d), ymd(2024, 2, 1));
        assert_eq!(month_end(d), ymd(2024, 2, 29));
        assert_eq!(next_month(ymd(2024, 12, 31)), ymd(2025, 1, 1));
        assert_eq!(month_label(d), "Feb 2024");
        assert_eq!(month_key(d), "2024-02");
        assert!(same_month(ymd(2024, 2, 1), ymd(2024, 2, 29)));
        assert!(!same_month(ymd(2024, 2, 1), ymd(2025, 2, 1)));
    }

    #[test]
    fn test_months_between() {
        let months = months_between(ymd(2023, 11, 20), ymd(2024, 2, 3));
        assert_eq!(
            months,
            vec![ymd(2023, 11, 1), ymd(2023, 12, 1), ymd(2024, 1, 1), ymd(2024, 2, 1)]
        );
        assert_eq!(months_between(ymd(2024, 5, 5), ymd(2024, 5, 6)).len(), 1);
    }
}
