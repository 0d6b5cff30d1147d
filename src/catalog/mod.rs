//! 作業員カタログ
//!
//! カタログJSON（作業員プロファイルの配列）の読み書きと作業員の追加・削除。
//! 検証エンジンにはここから作った `Directories` を渡す。カタログを変更したら作り直す。

pub mod code;

use crate::error::{GateError, Result};
use ppe_gate_common::{
    Directories, EquipmentType, WorkerId, WorkerProfile, WorkerRecord,
};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    workers: Vec<WorkerProfile>,
}

impl Catalog {
    /// 整合性（作業員ID・装備IDの重複）を検査して作成
    pub fn new(workers: Vec<WorkerProfile>) -> Result<Self> {
        Directories::build(&workers)?;
        Ok(Self { workers })
    }

    /// 組み込みサンプル（3名）
    pub fn sample() -> Result<Self> {
        let records = vec![
            sample_record(1, "Dadib Florenosos", &[
                ("helmet", "HLM-0382"),
                ("vest", "VST-1201"),
                ("boots", "BTS-9083"),
            ]),
            sample_record(2, "Joebert Eskitit", &[
                ("helmet", "HLM-0417"),
                ("vest", "VST-1155"),
                ("boots", "BTS-9127"),
                ("gloves", "GLV-0248"),
            ]),
            sample_record(3, "Lil Empenio", &[
                ("helmet", "HLM-0459"),
                ("vest", "VST-1289"),
                ("boots", "BTS-9164"),
            ]),
        ];
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<WorkerRecord>) -> Result<Self> {
        let workers = records
            .into_iter()
            .map(WorkerProfile::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(workers)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<WorkerRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GateError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!(path = %path.display(), workers = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// パス未指定・ファイルなしならサンプルを使う
    pub fn load_or_sample(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                debug!(path = %path.display(), "catalog file missing, using sample");
                Self::sample()
            }
            None => Self::sample(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let records: Vec<WorkerRecord> = self.workers.iter().map(WorkerRecord::from).collect();
        let content = serde_json::to_string_pretty(&records)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn workers(&self) -> &[WorkerProfile] {
        &self.workers
    }

    pub fn get(&self, id: WorkerId) -> Option<&WorkerProfile> {
        self.workers.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// 検証エンジン用の索引を構築
    pub fn directories(&self) -> Result<Arc<Directories>> {
        Ok(Arc::new(Directories::build(&self.workers)?))
    }

    /// 作業員を追加する
    ///
    /// IDは既存の最大値+1。必要装備ごとに装備コードを生成し、既存コードと衝突したら連番を進める。
    pub fn add_worker(
        &mut self,
        name: &str,
        required: &[EquipmentType],
        year: u32,
    ) -> Result<&WorkerProfile> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GateError::InvalidWorker("作業員名を入力してください".into()));
        }

        let mut types: Vec<EquipmentType> = Vec::new();
        for t in required {
            if !types.contains(t) {
                types.push(*t);
            }
        }
        if types.is_empty() {
            return Err(GateError::InvalidWorker("必要装備を1つ以上選択してください".into()));
        }

        if !code::YEAR_RANGE.contains(&year) {
            return Err(GateError::InvalidInput(format!("年は4桁で指定してください: {}", year)));
        }

        let mut used: HashSet<String> = self
            .workers
            .iter()
            .flat_map(|w| w.equipment_ids().map(str::to_string))
            .collect();

        let mut equipment_items = BTreeMap::new();
        let generated = code::generate_worker_equipment(name, &types, year);
        for (i, (t, mut candidate)) in generated.into_iter().enumerate() {
            let mut sequence = i as u32 + 1;
            while used.contains(&candidate) {
                sequence += 1;
                if sequence > code::MAX_SEQUENCE {
                    return Err(GateError::InvalidWorker(format!(
                        "{}の装備コードを割り当てられません",
                        t
                    )));
                }
                candidate = code::generate_equipment_code(t, name, sequence, year);
            }
            debug!(equipment_type = %t, code = %candidate, "equipment code assigned");
            used.insert(candidate.clone());
            equipment_items.insert(t, candidate);
        }

        let id = self.workers.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        let profile = WorkerProfile {
            id,
            name: name.to_string(),
            required_equipment: types.iter().copied().collect(),
            equipment_items,
        };

        let mut workers = self.workers.clone();
        workers.push(profile);
        Directories::build(&workers)?;
        self.workers = workers;

        info!(worker_id = id, name, "worker added");
        let index = self.workers.len() - 1;
        Ok(&self.workers[index])
    }

    /// 作業員を削除する（削除したら `true`）
    pub fn remove_worker(&mut self, id: WorkerId) -> bool {
        let before = self.workers.len();
        self.workers.retain(|w| w.id != id);
        let removed = self.workers.len() != before;
        if removed {
            info!(worker_id = id, "worker removed");
        }
        removed
    }
}

fn sample_record(id: WorkerId, name: &str, items: &[(&str, &str)]) -> WorkerRecord {
    WorkerRecord {
        id,
        name: name.to_string(),
        required_equipment: items.iter().map(|(t, _)| t.to_string()).collect(),
        equipment_items: items
            .iter()
            .map(|(t, code)| (t.to_string(), code.to_string()))
            .collect(),
    }
}
