//! カタログ・スキャンの型定義
//!
//! - EquipmentType: 保護具の種類（閉じた列挙）
//! - WorkerRecord: カタログJSONの1行（文字列のまま）
//! - WorkerProfile: 検証済みの作業員プロファイル
//! - EquipmentRecord / ScannedItem: 照合・スキャン結果

use crate::error::CatalogError;
use crate::normalizer::normalize_code;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// 作業員ID
pub type WorkerId = u32;

/// 保護具の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EquipmentType {
    Helmet,
    Vest,
    Gloves,
    Boots,
    Goggles,
    Flashlight,
    Radio,
    Harness,
    Mask,
    Tool,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 10] = [
        EquipmentType::Helmet,
        EquipmentType::Vest,
        EquipmentType::Gloves,
        EquipmentType::Boots,
        EquipmentType::Goggles,
        EquipmentType::Flashlight,
        EquipmentType::Radio,
        EquipmentType::Harness,
        EquipmentType::Mask,
        EquipmentType::Tool,
    ];

    /// カタログ上の名前
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Helmet => "helmet",
            EquipmentType::Vest => "vest",
            EquipmentType::Gloves => "gloves",
            EquipmentType::Boots => "boots",
            EquipmentType::Goggles => "goggles",
            EquipmentType::Flashlight => "flashlight",
            EquipmentType::Radio => "radio",
            EquipmentType::Harness => "harness",
            EquipmentType::Mask => "mask",
            EquipmentType::Tool => "tool",
        }
    }

    /// 装備コードの3文字種別コード
    pub fn type_code(&self) -> &'static str {
        match self {
            EquipmentType::Helmet => "HTM",
            EquipmentType::Vest => "VST",
            EquipmentType::Gloves => "GLV",
            EquipmentType::Boots => "BTS",
            EquipmentType::Goggles => "GOG",
            EquipmentType::Flashlight => "FLT",
            EquipmentType::Radio => "RDO",
            EquipmentType::Harness => "HRN",
            EquipmentType::Mask => "MSK",
            EquipmentType::Tool => "TLN",
        }
    }

    /// 種別コードから逆引き
    pub fn from_type_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.type_code() == code)
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| CatalogError::UnknownEquipmentType(s.to_string()))
    }
}

/// カタログJSONの1作業員（検証前）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    pub id: WorkerId,
    pub name: String,
    #[serde(default)]
    pub required_equipment: Vec<String>,
    #[serde(default)]
    pub equipment_items: BTreeMap<String, String>,
}

/// 作業員プロファイル
///
/// `equipment_items` の装備IDは正規化済み（大文字・空白除去）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerProfile {
    pub id: WorkerId,
    pub name: String,
    pub required_equipment: BTreeSet<EquipmentType>,
    pub equipment_items: BTreeMap<EquipmentType, String>,
}

impl WorkerProfile {
    /// 装備IDの一覧（種類順）
    pub fn equipment_ids(&self) -> impl Iterator<Item = &str> {
        self.equipment_items.values().map(|id| id.as_str())
    }
}

impl TryFrom<WorkerRecord> for WorkerProfile {
    type Error = CatalogError;

    fn try_from(record: WorkerRecord) -> Result<Self, Self::Error> {
        if record.id == 0 {
            return Err(CatalogError::InvalidWorkerId(record.id));
        }

        let required_equipment = record
            .required_equipment
            .iter()
            .map(|name| name.parse::<EquipmentType>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        let mut equipment_items = BTreeMap::new();
        for (name, equipment_id) in &record.equipment_items {
            let equipment_type: EquipmentType = name.parse()?;
            let normalized = normalize_code(equipment_id);
            if normalized.is_empty() {
                return Err(CatalogError::EmptyEquipmentId { worker: record.id });
            }
            equipment_items.insert(equipment_type, normalized);
        }

        if let Some(missing) = required_equipment
            .iter()
            .find(|t| !equipment_items.contains_key(*t))
        {
            return Err(CatalogError::RequiredTypeNotAssigned {
                worker: record.id,
                equipment_type: *missing,
            });
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            required_equipment,
            equipment_items,
        })
    }
}

impl From<&WorkerProfile> for WorkerRecord {
    fn from(profile: &WorkerProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            required_equipment: profile
                .required_equipment
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            equipment_items: profile
                .equipment_items
                .iter()
                .map(|(t, id)| (t.as_str().to_string(), id.clone()))
                .collect(),
        }
    }
}

/// 装備IDの照合結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentRecord {
    pub id: String,
    pub equipment_type: EquipmentType,
    pub owner_worker_id: WorkerId,
}

/// セッションに記録されたスキャン済み装備
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedItem {
    pub equipment_id: String,
    pub equipment_type: EquipmentType,
    pub owner_worker_id: WorkerId,
    pub owner_name: String,
}
