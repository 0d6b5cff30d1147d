use crate::error::{GateError, Result};
use ppe_gate_common::ArrivalCutoff;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// カタログパスを上書きする環境変数
pub const CATALOG_ENV: &str = "PPE_GATE_CATALOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 作業員カタログJSON（未設定なら組み込みサンプル）
    pub catalog_path: Option<PathBuf>,
    /// 出勤ログJSON
    pub attendance_log_path: Option<PathBuf>,
    /// Excel出力先
    pub export_dir: Option<PathBuf>,
    /// 遅刻判定の締め時刻
    pub cutoff_hour: u32,
    pub cutoff_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.json"))
    }

    /// カタログ未設定時の保存先
    pub fn default_catalog_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("catalog.json"))
    }

    fn data_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GateError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ppe-gate"))
    }

    fn default_config() -> Self {
        Self {
            catalog_path: None,
            attendance_log_path: None,
            export_dir: None,
            cutoff_hour: 8,
            cutoff_minute: 0,
        }
    }

    /// カタログパス（環境変数を優先）
    pub fn catalog_path(&self) -> Option<PathBuf> {
        match std::env::var(CATALOG_ENV) {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => self.catalog_path.clone(),
        }
    }

    /// 出勤ログのパス（未設定なら設定ディレクトリ内）
    pub fn attendance_log_path(&self) -> Result<PathBuf> {
        match &self.attendance_log_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("attendance.json")),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn cutoff(&self) -> Result<ArrivalCutoff> {
        ArrivalCutoff::new(self.cutoff_hour, self.cutoff_minute).ok_or_else(|| {
            GateError::Config(format!(
                "締め時刻が不正です: {}:{:02}",
                self.cutoff_hour, self.cutoff_minute
            ))
        })
    }

    pub fn set_catalog_path(&mut self, path: PathBuf) -> Result<()> {
        self.catalog_path = Some(path);
        self.save()
    }

    pub fn set_attendance_log_path(&mut self, path: PathBuf) -> Result<()> {
        self.attendance_log_path = Some(path);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cutoff_is_eight() {
        let config = Config::default();
        let cutoff = config.cutoff().unwrap();
        assert_eq!(cutoff, ArrivalCutoff::default());
    }

    #[test]
    fn test_invalid_cutoff() {
        let config = Config { cutoff_hour: 25, ..Config::default() };
        assert!(matches!(config.cutoff(), Err(GateError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "cutoff_minute": 15 }"#)
            .expect("デシリアライズ失敗");
        assert_eq!(config.cutoff_hour, 8);
        assert_eq!(config.cutoff_minute, 15);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_export_dir_default() {
        assert_eq!(Config::default().export_dir(), PathBuf::from("."));
    }
}
