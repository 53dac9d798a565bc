// ==========================================
// 项目执行仪表盘 - 文件解析器实现
// ==========================================
// 支持: JSON (.json) / CSV (.csv) / Excel (.xlsx/.xls)
// 输出: serde_json::Value（数组或嵌套对象），不做字段映射
// ==========================================

use crate::domain::record::RecordField;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::traits::FileParser;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::ReaderBuilder;
use serde_json::{Map, Number, Value};
use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 百分比列保留数值语义（"0.45" → 0.45），其余列一律为文本
fn is_percent_column(header: &str) -> bool {
    RecordField::from_str(header)
        .map(|field| field.is_percent())
        .unwrap_or(false)
}

// ==========================================
// JSON Parser 实现
// ==========================================
pub struct JsonFileParser;

impl FileParser for JsonFileParser {
    fn parse_to_raw_value(&self, file_path: &Path) -> ImportResult<Value> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "json" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let content = fs::read_to_string(file_path)?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(value)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_value(&self, file_path: &Path) -> ImportResult<Value> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = Map::new();

            for (col_idx, raw) in record.iter().enumerate() {
                let Some(header) = headers.get(col_idx) else {
                    continue;
                };
                let text = raw.trim();
                let value = match text.parse::<f64>() {
                    Ok(n) if is_percent_column(header) => {
                        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
                    }
                    _ => Value::String(text.to_string()),
                };
                row.insert(header.clone(), value);
            }

            // 跳过完全空白的行
            if row.values().all(|v| v.as_str().is_some_and(str::is_empty)) {
                continue;
            }

            rows.push(Value::Object(row));
        }

        Ok(Value::Array(rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 单元格 → JSON 值
    ///
    /// 日期单元格输出 ISO 日期；整数值浮点输出为整数，避免 "1.0"
    fn cell_to_value(cell: &Data, header: &str) -> Value {
        match cell {
            Data::Empty => Value::String(String::new()),
            Data::String(s) => Value::String(s.trim().to_string()),
            Data::Bool(b) => Value::Bool(*b),
            Data::Int(i) => Value::Number(Number::from(*i)),
            Data::Float(f) if is_percent_column(header) => {
                Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null)
            }
            Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Value::Number(Number::from(*f as i64))
            }
            Data::DateTime(_) | Data::DateTimeIso(_) => cell
                .as_date()
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                .unwrap_or_else(|| Value::String(cell.to_string())),
            other => Value::String(other.to_string().trim().to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_value(&self, file_path: &Path) -> ImportResult<Value> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let Some(sheet_name) = sheet_names.first().cloned() else {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let mut row = Map::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if header.is_empty() {
                        continue;
                    }
                    row.insert(header.clone(), Self::cell_to_value(cell, header));
                }
            }

            // 跳过完全空白的行
            if data_row.iter().all(|cell| matches!(cell, Data::Empty)) {
                continue;
            }

            records.push(Value::Object(row));
        }

        Ok(Value::Array(records))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Value> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "json" => JsonFileParser.parse_to_raw_value(path),
            "csv" => CsvParser.parse_to_raw_value(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_value(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
