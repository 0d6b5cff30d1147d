pub mod excel;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// デフォルトの出勤簿ファイル名
pub fn default_file_name(date: NaiveDate) -> String {
    format!("attendance_log_{}.xlsx", date.format("%Y-%m-%d"))
}

/// 出力先がディレクトリ（または拡張子なし）ならデフォルト名を付ける
pub fn output_path(output: &Path, date: NaiveDate) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(default_file_name(date))
    } else {
        output.to_path_buf()
    }
}
