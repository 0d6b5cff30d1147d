//! 作業員・装備ディレクトリ
//!
//! カタログ読み込み時に一度だけ構築する読み取り専用の索引。
//! カタログが変わったら作り直す（途中で書き換えない）。

use crate::error::CatalogError;
use crate::normalizer::normalize_code;
use crate::types::{EquipmentRecord, EquipmentType, WorkerId, WorkerProfile};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// 作業員ID → プロファイル
#[derive(Debug, Clone, Default)]
pub struct WorkerDirectory {
    workers: BTreeMap<WorkerId, WorkerProfile>,
}

impl WorkerDirectory {
    pub fn build(profiles: &[WorkerProfile]) -> Result<Self, CatalogError> {
        let mut workers = BTreeMap::new();
        for profile in profiles {
            if workers.insert(profile.id, profile.clone()).is_some() {
                warn!(worker_id = profile.id, "duplicate worker id in catalog");
                return Err(CatalogError::DuplicateWorker(profile.id));
            }
        }
        Ok(Self { workers })
    }

    pub fn get(&self, worker_id: WorkerId) -> Option<&WorkerProfile> {
        self.workers.get(&worker_id)
    }

    /// 必要装備の種類
    pub fn required_types(&self, worker_id: WorkerId) -> Option<&BTreeSet<EquipmentType>> {
        self.workers.get(&worker_id).map(|w| &w.required_equipment)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

/// 装備ID → (種類, 所有者)
#[derive(Debug, Clone, Default)]
pub struct EquipmentDirectory {
    entries: HashMap<String, EquipmentRecord>,
}

impl EquipmentDirectory {
    /// 全作業員の装備を登録する
    ///
    /// 同じ装備IDを2人が持っている場合はカタログ破損として失敗する。
    pub fn build(profiles: &[WorkerProfile]) -> Result<Self, CatalogError> {
        let mut entries: HashMap<String, EquipmentRecord> = HashMap::new();

        for profile in profiles {
            for (equipment_type, equipment_id) in &profile.equipment_items {
                let id = normalize_code(equipment_id);
                if id.is_empty() {
                    return Err(CatalogError::EmptyEquipmentId { worker: profile.id });
                }

                if let Some(existing) = entries.get(&id) {
                    warn!(
                        equipment_id = %id,
                        first_owner = existing.owner_worker_id,
                        second_owner = profile.id,
                        "equipment assigned to two workers"
                    );
                    return Err(CatalogError::DuplicateEquipment {
                        equipment_id: id,
                        first_owner: existing.owner_worker_id,
                        second_owner: profile.id,
                    });
                }

                entries.insert(
                    id.clone(),
                    EquipmentRecord {
                        id,
                        equipment_type: *equipment_type,
                        owner_worker_id: profile.id,
                    },
                );
            }
        }

        debug!(count = entries.len(), "equipment directory built");
        Ok(Self { entries })
    }

    /// 装備IDを照合する（入力は正規化してから完全一致）
    pub fn resolve(&self, equipment_id: &str) -> Option<&EquipmentRecord> {
        self.entries.get(&normalize_code(equipment_id))
    }

    /// 登録済み装備IDの一覧（診断表示用、ソート済み）
    pub fn known_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 検証エンジンが参照する2つのディレクトリ
///
/// 同じプロファイル列から同時に構築するので、装備の所有者は必ず作業員側にも存在する。
#[derive(Debug, Clone, Default)]
pub struct Directories {
    pub workers: WorkerDirectory,
    pub equipment: EquipmentDirectory,
}

impl Directories {
    pub fn build(profiles: &[WorkerProfile]) -> Result<Self, CatalogError> {
        Ok(Self {
            workers: WorkerDirectory::build(profiles)?,
            equipment: EquipmentDirectory::build(profiles)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkerRecord;

    fn profile(id: WorkerId, items: &[(&str, &str)]) -> WorkerProfile {
        WorkerProfile::try_from(WorkerRecord {
            id,
            name: format!("Worker {}", id),
            required_equipment: items.iter().map(|(t, _)| t.to_string()).collect(),
            equipment_items: items
                .iter()
                .map(|(t, code)| (t.to_string(), code.to_string()))
                .collect(),
        })
        .expect("プロファイル作成失敗")
    }

    #[test]
    fn test_resolve_known_equipment() {
        let profiles = vec![
            profile(1, &[("helmet", "HLM-0382"), ("vest", "VST-1201")]),
            profile(2, &[("helmet", "HLM-0417")]),
        ];
        let dir = EquipmentDirectory::build(&profiles).unwrap();

        let record = dir.resolve("HLM-0417").expect("照合失敗");
        assert_eq!(record.owner_worker_id, 2);
        assert_eq!(record.equipment_type, EquipmentType::Helmet);
        assert_eq!(dir.len(), 3);
    }

    #[test]
    fn test_resolve_normalizes_input() {
        let profiles = vec![profile(1, &[("vest", "VST-1201")])];
        let dir = EquipmentDirectory::build(&profiles).unwrap();
        assert!(dir.resolve(" vst-1201\r\n").is_some());
    }

    #[test]
    fn test_resolve_unknown_returns_none() {
        let profiles = vec![profile(1, &[("vest", "VST-1201")])];
        let dir = EquipmentDirectory::build(&profiles).unwrap();
        assert!(dir.resolve("ZZZ-999").is_none());
        assert!(dir.resolve("").is_none());
    }

    #[test]
    fn test_duplicate_equipment_fails_build() {
        let profiles = vec![
            profile(1, &[("helmet", "HLM-0001")]),
            profile(2, &[("vest", "hlm-0001")]),
        ];
        let err = EquipmentDirectory::build(&profiles).unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateEquipment {
                equipment_id: "HLM-0001".to_string(),
                first_owner: 1,
                second_owner: 2,
            }
        );
    }

    #[test]
    fn test_duplicate_worker_fails_build() {
        let profiles = vec![profile(1, &[("helmet", "A")]), profile(1, &[("vest", "B")])];
        assert_eq!(
            WorkerDirectory::build(&profiles).unwrap_err(),
            CatalogError::DuplicateWorker(1)
        );
        assert!(Directories::build(&profiles).is_err());
    }

    #[test]
    fn test_known_ids_sorted() {
        let profiles = vec![
            profile(1, &[("vest", "VST-2"), ("helmet", "HLM-9")]),
            profile(2, &[("boots", "BTS-1")]),
        ];
        let dir = EquipmentDirectory::build(&profiles).unwrap();
        assert_eq!(dir.known_ids(), vec!["BTS-1", "HLM-9", "VST-2"]);
    }

    #[test]
    fn test_worker_directory_required_types() {
        let profiles = vec![profile(1, &[("helmet", "A"), ("boots", "B")])];
        let dir = WorkerDirectory::build(&profiles).unwrap();
        let required = dir.required_types(1).unwrap();
        assert!(required.contains(&EquipmentType::Helmet));
        assert!(required.contains(&EquipmentType::Boots));
        assert!(dir.required_types(2).is_none());
        assert!(dir.get(2).is_none());
    }
}
