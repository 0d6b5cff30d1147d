//! エラー型定義
//!
//! - ScanError: スキャン1回ごとの回復可能なエラー（セッションは壊れない）
//! - AttendanceError: 出勤記録の前提条件エラー
//! - CatalogError: 作業員カタログの整合性エラー（読み込みを中断する）

use crate::types::{EquipmentType, WorkerId};
use crate::session::SessionStatus;
use thiserror::Error;

/// スキャン処理のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Scan is empty")]
    EmptyScan,

    #[error("No worker found with equipment ID: {0}")]
    UnknownEquipment(String),

    #[error("Equipment {0} has already been scanned")]
    DuplicateScan(String),

    #[error("Equipment belongs to worker {actual}, but the session is locked to worker {expected}")]
    OwnerMismatch { expected: WorkerId, actual: WorkerId },
}

/// 出勤記録のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("Attendance rejected: verification is {status}, not complete")]
    Rejected { status: SessionStatus },
}

/// カタログ整合性エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Equipment {equipment_id} is assigned to both worker {first_owner} and worker {second_owner}")]
    DuplicateEquipment {
        equipment_id: String,
        first_owner: WorkerId,
        second_owner: WorkerId,
    },

    #[error("Worker ID {0} appears more than once")]
    DuplicateWorker(WorkerId),

    #[error("Worker ID must be a positive integer, got {0}")]
    InvalidWorkerId(WorkerId),

    #[error("Unknown equipment type: {0}")]
    UnknownEquipmentType(String),

    #[error("Worker {worker} requires {equipment_type} but has no item of that type")]
    RequiredTypeNotAssigned {
        worker: WorkerId,
        equipment_type: EquipmentType,
    },

    #[error("Worker {worker} has an empty equipment ID")]
    EmptyEquipmentId { worker: WorkerId },
}
