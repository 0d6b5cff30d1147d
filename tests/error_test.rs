//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use ppe_gate::error::GateError;
use ppe_gate_common::{AttendanceError, CatalogError, ScanError, SessionStatus};

/// GateErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        GateError::Config("テスト設定エラー".to_string()),
        GateError::FileNotFound("catalog.json".to_string()),
        GateError::WorkerNotFound(7),
        GateError::InvalidWorker("名前が空".to_string()),
        GateError::ExcelGeneration("Excel生成エラー".to_string()),
        GateError::Prompt("入力中断".to_string()),
        GateError::InvalidInput("連番が範囲外".to_string()),
        GateError::EmptyCatalog,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 共通ライブラリのエラーからの変換
#[test]
fn test_error_conversion() {
    let scan: GateError = ScanError::UnknownEquipment("XYZ-1".to_string()).into();
    assert!(matches!(scan, GateError::Scan(_)));
    assert!(scan.to_string().contains("XYZ-1"));

    let catalog: GateError = CatalogError::DuplicateWorker(3).into();
    assert!(matches!(catalog, GateError::Catalog(_)));
    assert!(catalog.to_string().contains('3'));

    let attendance: GateError =
        AttendanceError::Rejected { status: SessionStatus::Mismatch }.into();
    assert!(attendance.to_string().contains("mismatch"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: GateError = io_err.into();

    assert!(matches!(err, GateError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: GateError = json_err.into();

    assert!(matches!(err, GateError::JsonParse(_)));
}
