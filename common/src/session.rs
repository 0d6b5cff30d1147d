//! 装備検証セッション
//!
//! 1台の端末で進行中の「1人分」の検証状態を保持する。
//!
//! ## 状態遷移
//! ```text
//! Empty → Scanning → Incomplete ⇄ Complete
//!                  ↘ Mismatch（別作業員の装備を拒否。itemsは変更しない）
//! 任意の状態 → clear() → Empty
//! Complete → 出勤記録 → Empty
//! ```

use crate::directory::Directories;
use crate::error::ScanError;
use crate::normalizer::{normalize_code, normalize_scan};
use crate::types::{EquipmentType, ScannedItem, WorkerId, WorkerProfile};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// セッション状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Empty,
    Scanning,
    Mismatch,
    Incomplete,
    Complete,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Empty => write!(f, "empty"),
            SessionStatus::Scanning => write!(f, "scanning"),
            SessionStatus::Mismatch => write!(f, "mismatch"),
            SessionStatus::Incomplete => write!(f, "incomplete"),
            SessionStatus::Complete => write!(f, "complete"),
        }
    }
}

/// 表示用スナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCheck<'a> {
    pub worker: &'a WorkerProfile,
    pub missing_types: BTreeSet<EquipmentType>,
    pub status: SessionStatus,
}

/// 不足している装備の種類を求める
///
/// `required \ {スキャン済みの種類}`。必要外の装備は無視する。
pub fn missing_types(
    required: &BTreeSet<EquipmentType>,
    items: &[ScannedItem],
) -> BTreeSet<EquipmentType> {
    let scanned: BTreeSet<EquipmentType> = items.iter().map(|i| i.equipment_type).collect();
    required.difference(&scanned).copied().collect()
}

/// 完了判定
pub fn evaluate(required: &BTreeSet<EquipmentType>, items: &[ScannedItem]) -> SessionStatus {
    if items.is_empty() {
        SessionStatus::Empty
    } else if missing_types(required, items).is_empty() {
        SessionStatus::Complete
    } else {
        SessionStatus::Incomplete
    }
}

/// 検証セッション
#[derive(Debug, Clone)]
pub struct VerificationSession {
    directories: Arc<Directories>,
    items: Vec<ScannedItem>,
    status: SessionStatus,
    locked_worker_id: Option<WorkerId>,
}

impl VerificationSession {
    pub fn new(directories: Arc<Directories>) -> Self {
        Self {
            directories,
            items: Vec::new(),
            status: SessionStatus::Empty,
            locked_worker_id: None,
        }
    }

    pub fn directories(&self) -> &Directories {
        &self.directories
    }

    /// スキャン済み装備（スキャン順）
    pub fn items(&self) -> &[ScannedItem] {
        &self.items
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn locked_worker_id(&self) -> Option<WorkerId> {
        self.locked_worker_id
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// スキャン1件を処理する
    ///
    /// エラー時は `OwnerMismatch` で状態が `Mismatch` になる以外、セッションは変化しない。
    pub fn submit_scan(&mut self, raw_code: &str) -> Result<&ScannedItem, ScanError> {
        let code = normalize_scan(raw_code)?;
        debug!(raw = ?raw_code, code = %code, "scan normalized");

        let record = match self.directories.equipment.resolve(&code) {
            Some(record) => record.clone(),
            None => {
                warn!(code = %code, "unknown equipment");
                return Err(ScanError::UnknownEquipment(code));
            }
        };

        if self.items.iter().any(|i| i.equipment_id == record.id) {
            debug!(code = %code, "duplicate scan ignored");
            return Err(ScanError::DuplicateScan(record.id));
        }

        if let Some(expected) = self.locked_worker_id {
            if expected != record.owner_worker_id {
                warn!(
                    expected,
                    actual = record.owner_worker_id,
                    code = %code,
                    "equipment belongs to another worker"
                );
                self.status = SessionStatus::Mismatch;
                return Err(ScanError::OwnerMismatch {
                    expected,
                    actual: record.owner_worker_id,
                });
            }
        }

        let owner_name = self
            .directories
            .workers
            .get(record.owner_worker_id)
            .map(|w| w.name.clone())
            .unwrap_or_default();

        self.items.push(ScannedItem {
            equipment_id: record.id,
            equipment_type: record.equipment_type,
            owner_worker_id: record.owner_worker_id,
            owner_name,
        });
        self.locked_worker_id.get_or_insert(record.owner_worker_id);
        self.status = SessionStatus::Scanning;
        self.recompute();

        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    /// 装備を1件取り除く（存在しなければ何もしない）
    ///
    /// 取り除いた場合は `true`。
    pub fn remove_item(&mut self, equipment_id: &str) -> bool {
        let code = normalize_code(equipment_id);
        let before = self.items.len();
        self.items.retain(|i| i.equipment_id != code);
        let removed = self.items.len() != before;

        if removed {
            debug!(code = %code, remaining = self.items.len(), "item removed");
            if self.items.is_empty() {
                self.reset();
            } else {
                self.recompute();
            }
        }
        removed
    }

    /// 全て破棄して `Empty` に戻す
    pub fn clear(&mut self) {
        debug!(discarded = self.items.len(), "session cleared");
        self.reset();
    }

    /// 表示用の現在の判定（`Empty` なら `None`）
    pub fn current_check(&self) -> Option<CurrentCheck<'_>> {
        let worker_id = self.locked_worker_id?;
        let worker = self.directories.workers.get(worker_id)?;
        Some(CurrentCheck {
            worker,
            missing_types: missing_types(&worker.required_equipment, &self.items),
            status: self.status,
        })
    }

    /// 出勤記録後など、セッションを空に戻す
    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.locked_worker_id = None;
        self.status = SessionStatus::Empty;
    }

    fn recompute(&mut self) {
        let Some(worker_id) = self.locked_worker_id else {
            self.status = SessionStatus::Empty;
            return;
        };

        self.status = match self.directories.workers.required_types(worker_id) {
            Some(required) => evaluate(required, &self.items),
            None => {
                warn!(worker_id, "locked worker missing from directory");
                SessionStatus::Incomplete
            }
        };

        if self.status == SessionStatus::Complete {
            info!(worker_id, items = self.items.len(), "all required equipment verified");
        } else {
            debug!(worker_id, status = %self.status, "completeness recomputed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkerRecord;

    fn directories() -> Arc<Directories> {
        let records = vec![
            WorkerRecord {
                id: 1,
                name: "Dadib Florenosos".to_string(),
                required_equipment: vec!["helmet".into(), "vest".into(), "boots".into()],
                equipment_items: [
                    ("helmet", "HLM-0382"),
                    ("vest", "VST-1201"),
                    ("boots", "BTS-9083"),
                    ("radio", "RDO-0001"),
                ]
                .iter()
                .map(|(t, c)| (t.to_string(), c.to_string()))
                .collect(),
            },
            WorkerRecord {
                id: 2,
                name: "Joebert Eskitit".to_string(),
                required_equipment: vec!["helmet".into()],
                equipment_items: [("helmet", "HLM-0417")]
                    .iter()
                    .map(|(t, c)| (t.to_string(), c.to_string()))
                    .collect(),
            },
        ];
        let profiles: Vec<WorkerProfile> = records
            .into_iter()
            .map(|r| WorkerProfile::try_from(r).unwrap())
            .collect();
        Arc::new(Directories::build(&profiles).unwrap())
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = VerificationSession::new(directories());
        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(session.current_check().is_none());
        assert!(session.locked_worker_id().is_none());
    }

    #[test]
    fn test_helmet_vest_then_boots() {
        let mut session = VerificationSession::new(directories());

        session.submit_scan("HLM-0382").unwrap();
        session.submit_scan("VST-1201").unwrap();
        assert_eq!(session.status(), SessionStatus::Incomplete);
        let check = session.current_check().unwrap();
        assert_eq!(check.worker.id, 1);
        assert_eq!(check.missing_types, BTreeSet::from([EquipmentType::Boots]));

        session.submit_scan("BTS-9083").unwrap();
        assert_eq!(session.status(), SessionStatus::Complete);
        assert!(session.current_check().unwrap().missing_types.is_empty());
    }

    #[test]
    fn test_submit_returns_scanned_item() {
        let mut session = VerificationSession::new(directories());
        let item = session.submit_scan(" hlm-0382\n").unwrap();
        assert_eq!(item.equipment_id, "HLM-0382");
        assert_eq!(item.equipment_type, EquipmentType::Helmet);
        assert_eq!(item.owner_name, "Dadib Florenosos");
        assert_eq!(session.locked_worker_id(), Some(1));
    }

    #[test]
    fn test_empty_scan() {
        let mut session = VerificationSession::new(directories());
        assert_eq!(session.submit_scan(" \r\n"), Err(ScanError::EmptyScan));
        assert_eq!(session.status(), SessionStatus::Empty);
    }

    #[test]
    fn test_unknown_equipment_leaves_session() {
        let mut session = VerificationSession::new(directories());
        assert_eq!(
            session.submit_scan("ZZZ-999").unwrap_err(),
            ScanError::UnknownEquipment("ZZZ-999".to_string())
        );
        assert!(session.items().is_empty());
        assert_eq!(session.status(), SessionStatus::Empty);
    }

    #[test]
    fn test_duplicate_scan() {
        let mut session = VerificationSession::new(directories());
        session.submit_scan("HLM-0382").unwrap();
        assert_eq!(
            session.submit_scan("hlm-0382").unwrap_err(),
            ScanError::DuplicateScan("HLM-0382".to_string())
        );
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.status(), SessionStatus::Incomplete);
    }

    #[test]
    fn test_owner_mismatch_holds_items() {
        let mut session = VerificationSession::new(directories());
        session.submit_scan("HLM-0382").unwrap();

        assert_eq!(
            session.submit_scan("HLM-0417").unwrap_err(),
            ScanError::OwnerMismatch { expected: 1, actual: 2 }
        );
        assert_eq!(session.status(), SessionStatus::Mismatch);
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.locked_worker_id(), Some(1));
        assert_eq!(session.current_check().unwrap().status, SessionStatus::Mismatch);
    }

    #[test]
    fn test_mismatch_recovers_with_valid_scan() {
        let mut session = VerificationSession::new(directories());
        session.submit_scan("HLM-0382").unwrap();
        let _ = session.submit_scan("HLM-0417");
        session.submit_scan("VST-1201").unwrap();
        assert_eq!(session.status(), SessionStatus::Incomplete);
    }

    #[test]
    fn test_clear_then_other_worker() {
        let mut session = VerificationSession::new(directories());
        session.submit_scan("HLM-0382").unwrap();
        let _ = session.submit_scan("HLM-0417");
        session.clear();
        assert_eq!(session.status(), SessionStatus::Empty);

        session.submit_scan("HLM-0417").unwrap();
        assert_eq!(session.status(), SessionStatus::Complete);
        assert_eq!(session.locked_worker_id(), Some(2));
    }

    #[test]
    fn test_remove_last_item_empties_session() {
        let mut session = VerificationSession::new(directories());
        session.submit_scan("HLM-0382").unwrap();
        assert!(session.remove_item("HLM-0382"));
        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(session.locked_worker_id().is_none());
        assert!(session.current_check().is_none());
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut session = VerificationSession::new(directories());
        session.submit_scan("HLM-0382").unwrap();
        let _ = session.submit_scan("HLM-0417");
        assert!(!session.remove_item("VST-1201"));
        assert_eq!(session.status(), SessionStatus::Mismatch);
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_remove_then_rescan_restores_status() {
        let mut session = VerificationSession::new(directories());
        for code in ["HLM-0382", "VST-1201", "BTS-9083"] {
            session.submit_scan(code).unwrap();
        }
        assert_eq!(session.status(), SessionStatus::Complete);

        session.remove_item("VST-1201");
        assert_eq!(session.status(), SessionStatus::Incomplete);
        session.submit_scan("VST-1201").unwrap();
        assert_eq!(session.status(), SessionStatus::Complete);
    }

    #[test]
    fn test_extra_items_do_not_block_completion() {
        let mut session = VerificationSession::new(directories());
        for code in ["RDO-0001", "HLM-0382", "VST-1201", "BTS-9083"] {
            session.submit_scan(code).unwrap();
        }
        assert_eq!(session.status(), SessionStatus::Complete);
        assert_eq!(session.items().len(), 4);
        assert_eq!(session.items()[0].equipment_type, EquipmentType::Radio);
    }

    #[test]
    fn test_only_extra_item_is_incomplete() {
        let mut session = VerificationSession::new(directories());
        session.submit_scan("RDO-0001").unwrap();
        assert_eq!(session.status(), SessionStatus::Incomplete);
        assert_eq!(session.current_check().unwrap().missing_types.len(), 3);
    }

    #[test]
    fn test_evaluate_without_items_is_empty() {
        let required = BTreeSet::from([EquipmentType::Helmet]);
        assert_eq!(evaluate(&required, &[]), SessionStatus::Empty);
        assert_eq!(evaluate(&BTreeSet::new(), &[]), SessionStatus::Empty);
    }
}
