//! 装備コード生成・検証
//!
//! 形式: `EQ-<種別3文字>-<連番3桁>-<イニシャル><年4桁>`（例: `EQ-HTM-001-JD2024`）

use crate::error::{GateError, Result};
use ppe_gate_common::EquipmentType;
use regex::Regex;
use std::ops::RangeInclusive;

lazy_static::lazy_static! {
    static ref CODE_RE: Regex =
        Regex::new(r"^EQ-([A-Z]{3})-([0-9]{3})-([A-Z]{2,4})([0-9]{4})$").unwrap();
}

/// 連番の上限（3桁）
pub const MAX_SEQUENCE: u32 = 999;

/// コードに入れられる年（4桁）
pub const YEAR_RANGE: RangeInclusive<u32> = 1000..=9999;

/// 装備コードの分解結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEquipmentCode {
    pub type_code: String,
    /// 未知の種別コードなら `None`
    pub equipment_type: Option<EquipmentType>,
    pub sequence: u32,
    pub worker_initials: String,
    pub year: u32,
}

/// 作業員名からイニシャルを作る
///
/// 各単語の先頭英字を大文字で連結。2文字未満は `X` で埋め、4文字で切る。
pub fn worker_initials(name: &str) -> String {
    let mut initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .take(4)
        .collect();

    while initials.len() < 2 {
        initials.push('X');
    }
    initials
}

/// 装備コードを生成する
pub fn generate_equipment_code(
    equipment_type: EquipmentType,
    worker_name: &str,
    sequence: u32,
    year: u32,
) -> String {
    format!(
        "EQ-{}-{:03}-{}{:04}",
        equipment_type.type_code(),
        sequence,
        worker_initials(worker_name),
        year
    )
}

/// 連番が3桁に収まるか確認する
pub fn check_sequence(sequence: u32) -> Result<u32> {
    if sequence == 0 || sequence > MAX_SEQUENCE {
        return Err(GateError::InvalidInput(format!(
            "連番は1〜{}で指定してください: {}",
            MAX_SEQUENCE, sequence
        )));
    }
    Ok(sequence)
}

/// 作業員1人分の装備コードを生成（連番は1から）
pub fn generate_worker_equipment(
    worker_name: &str,
    types: &[EquipmentType],
    year: u32,
) -> Vec<(EquipmentType, String)> {
    types
        .iter()
        .enumerate()
        .map(|(i, t)| (*t, generate_equipment_code(*t, worker_name, i as u32 + 1, year)))
        .collect()
}

pub fn is_valid_equipment_code(code: &str) -> bool {
    CODE_RE.is_match(code)
}

pub fn parse_equipment_code(code: &str) -> Option<ParsedEquipmentCode> {
    let caps = CODE_RE.captures(code)?;
    let type_code = caps[1].to_string();

    Some(ParsedEquipmentCode {
        equipment_type: EquipmentType::from_type_code(&type_code),
        type_code,
        sequence: caps[2].parse().ok()?,
        worker_initials: caps[3].to_string(),
        year: caps[4].parse().ok()?,
    })
}
