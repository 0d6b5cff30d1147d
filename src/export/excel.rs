//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを作り、ファイルに書き出す

use crate::attendance_log::AttendanceLog;
use crate::error::{GateError, Result};
use chrono::Local;
use ppe_gate_common::export::excel_core::generate_attendance_buffer;
use std::path::Path;

/// 出勤簿をxlsxで出力（日付・時刻はローカル時刻で表示）
pub fn generate_excel(log: &AttendanceLog, output_path: &Path) -> Result<()> {
    let buffer = generate_attendance_buffer(log.records(), &Local)
        .map_err(GateError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(output_path, buffer)
        .map_err(|e| GateError::ExcelGeneration(format!("ファイル保存エラー: {}", e)))?;
    Ok(())
}
