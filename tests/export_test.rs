//! 出勤簿Excel出力の統合テスト

use ppe_gate::attendance_log::AttendanceLog;
use ppe_gate::export::{excel, output_path};
use ppe_gate_common::{AttendanceRecord, AttendanceStatus};
use chrono::NaiveDate;
use tempfile::tempdir;

fn create_test_log() -> AttendanceLog {
    let mut log = AttendanceLog::default();
    log.append(AttendanceRecord {
        worker: "Dadib Florenosos".to_string(),
        time: "2025-07-14T07:45:12+08:00".to_string(),
        status: AttendanceStatus::Present,
    });
    log.append(AttendanceRecord {
        worker: "Lil Empenio".to_string(),
        time: "2025-07-14T08:20:03+08:00".to_string(),
        status: AttendanceStatus::Late,
    });
    log
}

#[test]
fn test_excel_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("attendance.xlsx");

    let result = excel::generate_excel(&create_test_log(), &output);

    assert!(result.is_ok(), "Excel生成に失敗: {:?}", result.err());
    let bytes = std::fs::read(&output).expect("ファイル読み込み失敗");
    assert!(bytes.len() > 0, "Excelファイルが空");
    assert_eq!(&bytes[..2], b"PK", "xlsx(zip)形式ではない");
}

#[test]
fn test_excel_generation_empty_log() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("empty.xlsx");

    // 見出し行のみのシートになる
    let result = excel::generate_excel(&AttendanceLog::default(), &output);
    assert!(result.is_ok(), "空の出勤簿生成に失敗: {:?}", result.err());
    assert!(output.exists());
}

#[test]
fn test_excel_into_directory_uses_default_name() {
    let dir = tempdir().expect("Failed to create temp dir");
    let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();

    let output = output_path(dir.path(), date);
    excel::generate_excel(&create_test_log(), &output).expect("Excel生成失敗");

    assert!(dir.path().join("attendance_log_2025-07-14.xlsx").exists());
}

#[test]
fn test_excel_creates_parent_dirs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("reports").join("july").join("log.xlsx");

    excel::generate_excel(&create_test_log(), &output).expect("Excel生成失敗");
    assert!(output.exists());
}
