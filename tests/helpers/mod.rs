// ==========================================
// 集成测试共享辅助
// ==========================================

#![allow(dead_code)]

pub mod test_data_builder;

pub use test_data_builder::RecordBuilder;

use chrono::NaiveDate;

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
