//! 出勤ログ
//!
//! 出勤レコードを記録順に保持するJSONファイル。追記のみ。

use crate::error::Result;
use ppe_gate_common::AttendanceRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct AttendanceLog {
    records: Vec<AttendanceRecord>,
}

impl AttendanceLog {
    /// ログファイルを読み込み（存在しなければ空）
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let records: Vec<AttendanceRecord> = serde_json::from_reader(reader)?;
        Ok(Self { records })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.records)?;
        Ok(())
    }

    pub fn append(&mut self, record: AttendanceRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
