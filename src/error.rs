use ppe_gate_common::{AttendanceError, CatalogError, ScanError, WorkerId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("カタログが不正: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("出勤記録できません: {0}")]
    Attendance(#[from] AttendanceError),

    #[error("作業員が見つかりません: ID {0}")]
    WorkerNotFound(WorkerId),

    #[error("作業員の入力が不正: {0}")]
    InvalidWorker(String),

    #[error("入力が不正: {0}")]
    InvalidInput(String),

    #[error("カタログに作業員が登録されていません")]
    EmptyCatalog,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力エラー: {0}")]
    Prompt(String),
}

impl From<dialoguer::Error> for GateError {
    fn from(e: dialoguer::Error) -> Self {
        GateError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
