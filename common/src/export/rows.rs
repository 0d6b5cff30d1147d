//! 出勤簿の行データ
//!
//! タイムスタンプを表示用の日付・時刻に分解する。Excel以外の出力でも共通。

use crate::attendance::AttendanceRecord;
use chrono::{DateTime, TimeZone};
use std::fmt;

/// 列見出しと列幅
pub const ATTENDANCE_COLUMNS: [(&str, f64); 6] = [
    ("No.", 5.0),
    ("Worker Name", 20.0),
    ("Date", 12.0),
    ("Time", 12.0),
    ("Full Timestamp", 25.0),
    ("Status", 10.0),
];

/// シート名
pub const ATTENDANCE_SHEET_NAME: &str = "Attendance Log";

/// 出勤簿の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    pub no: usize,
    pub worker_name: String,
    pub date: String,
    pub time: String,
    pub full_timestamp: String,
    pub status: String,
}

impl AttendanceRow {
    /// `index` は0始まり。表示の No. は1始まり。
    ///
    /// パースできないタイムスタンプは日付・時刻・全体の3列にそのまま入れる。
    pub fn from_record<Tz>(index: usize, record: &AttendanceRecord, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let (date, time, full_timestamp) = match DateTime::parse_from_rfc3339(&record.time) {
            Ok(parsed) => {
                let local = parsed.with_timezone(tz);
                (
                    local.format("%Y-%m-%d").to_string(),
                    local.format("%H:%M:%S").to_string(),
                    local.format("%Y-%m-%d %H:%M:%S").to_string(),
                )
            }
            Err(_) => (record.time.clone(), record.time.clone(), record.time.clone()),
        };

        Self {
            no: index + 1,
            worker_name: record.worker.clone(),
            date,
            time,
            full_timestamp,
            status: record.status.to_string(),
        }
    }
}

/// レコード列を行に変換
pub fn attendance_rows<Tz>(records: &[AttendanceRecord], tz: &Tz) -> Vec<AttendanceRow>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    records
        .iter()
        .enumerate()
        .map(|(i, r)| AttendanceRow::from_record(i, r, tz))
        .collect()
}
