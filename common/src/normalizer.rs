//! スキャン入力の正規化
//!
//! カメラ読み取り・手入力のどちらも同じ規則で装備IDに変換する。

use crate::error::ScanError;

/// 生のスキャン文字列を装備IDの正規形に変換する
///
/// 制御文字（CR/LF/TABなど）を除去し、前後の空白を落として大文字化する。
pub fn normalize_code(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !c.is_control()).collect();
    stripped.trim().to_uppercase()
}

/// 正規化して空なら `EmptyScan` を返す
pub fn normalize_scan(raw: &str) -> Result<String, ScanError> {
    let code = normalize_code(raw);
    if code.is_empty() {
        return Err(ScanError::EmptyScan);
    }
    Ok(code)
}
