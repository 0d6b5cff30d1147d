//! PPE Gate
//!
//! 現場入場時の保護具（PPE）装備検証・出勤記録ツール。
//! 検証エンジンは `ppe-gate-common`、ここではカタログ・設定・ログ・端末を扱う。

pub mod attendance_log;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod terminal;
