//! PPE Gate Common Library
//!
//! 保護具（PPE）装備検証エンジン:
//! スキャン入力の正規化、装備・作業員ディレクトリ、検証セッション、出勤判定

pub mod types;
pub mod error;
pub mod normalizer;
pub mod directory;
pub mod session;
pub mod attendance;
pub mod export;

pub use types::{EquipmentRecord, EquipmentType, ScannedItem, WorkerId, WorkerProfile, WorkerRecord};
pub use error::{AttendanceError, CatalogError, ScanError};
pub use normalizer::{normalize_code, normalize_scan};
pub use directory::{Directories, EquipmentDirectory, WorkerDirectory};
pub use session::{CurrentCheck, SessionStatus, VerificationSession, evaluate, missing_types};
pub use attendance::{ArrivalCutoff, AttendanceRecord, AttendanceRecorder, AttendanceStatus};
pub use export::rows::{AttendanceRow, attendance_rows};
