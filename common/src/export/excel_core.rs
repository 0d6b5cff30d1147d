//! Excel生成（共通ライブラリ）
//!
//! 出勤簿を1シートのxlsxとしてメモリ上に生成する

use super::rows::{attendance_rows, ATTENDANCE_COLUMNS, ATTENDANCE_SHEET_NAME};
use crate::attendance::AttendanceRecord;
use chrono::TimeZone;
use rust_xlsxwriter::*;
use std::fmt;

/// 出勤簿Excelをバッファに生成
///
/// # Arguments
/// * `records` - 出勤レコード（記録順）
/// * `tz` - 日付・時刻の表示に使うタイムゾーン
pub fn generate_attendance_buffer<Tz>(
    records: &[AttendanceRecord],
    tz: &Tz,
) -> Result<Vec<u8>, String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let late_format = Format::new().set_font_color(Color::RGB(0xD32F2F));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(ATTENDANCE_SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, (label, width)) in ATTENDANCE_COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet.write_string_with_format(0, col, *label, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }

    for row in attendance_rows(records, tz) {
        let r = row.no as u32;
        worksheet.write_number(r, 0, row.no as f64)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_string(r, 1, &row.worker_name)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_string(r, 2, &row.date)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_string(r, 3, &row.time)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet.write_string(r, 4, &row.full_timestamp)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;

        if row.status == "Late" {
            worksheet.write_string_with_format(r, 5, &row.status, &late_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        } else {
            worksheet.write_string(r, 5, &row.status)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::AttendanceStatus;
    use chrono::Utc;

    #[test]
    fn test_generate_buffer_is_zip() {
        let records = vec![
            AttendanceRecord {
                worker: "Dadib Florenosos".to_string(),
                time: "2025-07-14T07:55:00Z".to_string(),
                status: AttendanceStatus::Present,
            },
            AttendanceRecord {
                worker: "Lil Empenio".to_string(),
                time: "2025-07-14T08:20:00Z".to_string(),
                status: AttendanceStatus::Late,
            },
        ];

        let buffer = generate_attendance_buffer(&records, &Utc).expect("Excel生成失敗");
        assert!(buffer.len() > 0);
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_generate_buffer_empty_log() {
        let buffer = generate_attendance_buffer(&[], &Utc).expect("Excel生成失敗");
        assert_eq!(&buffer[..2], b"PK");
    }
}
