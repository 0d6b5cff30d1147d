use clap::{Parser, Subcommand};
use ppe_gate_common::{EquipmentType, WorkerId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ppe-gate")]
#[command(about = "保護具（PPE）装備検証・出勤記録ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 作業員カタログJSON（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話式スキャン端末を起動
    Scan,

    /// 装備IDをまとめて検証
    Check {
        /// 装備ID（スキャン順）
        #[arg(required = true)]
        codes: Vec<String>,

        /// 全装備確認済みなら出勤記録
        #[arg(long)]
        mark: bool,
    },

    /// 作業員カタログ管理
    Workers {
        #[command(subcommand)]
        action: WorkersAction,
    },

    /// 出勤ログ
    Log {
        #[command(subcommand)]
        action: LogAction,
    },

    /// 出勤ログをExcelに出力
    Export {
        /// 出力ファイル/ディレクトリ（デフォルト: 設定の出力先）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 装備コードの生成・検証
    Code {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// 設定を表示/編集
    Config {
        /// カタログJSONのパスを設定
        #[arg(long)]
        set_catalog: Option<PathBuf>,

        /// 出勤ログJSONのパスを設定
        #[arg(long)]
        set_log: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum WorkersAction {
    /// 作業員一覧
    List,

    /// 作業員を追加（装備コードは自動生成）
    Add {
        /// 作業員名
        #[arg(required = true)]
        name: String,

        /// 必要装備（カンマ区切り: helmet,vest,boots）
        #[arg(short, long, value_delimiter = ',', required = true)]
        equipment: Vec<EquipmentType>,

        /// コードに入れる年（デフォルト: 今年）
        #[arg(long, value_parser = clap::value_parser!(u32).range(1000..=9999))]
        year: Option<u32>,
    },

    /// 作業員を削除
    Remove {
        #[arg(required = true)]
        id: WorkerId,
    },
}

#[derive(Subcommand)]
pub enum LogAction {
    /// 出勤ログを表示
    Show,
}

#[derive(Subcommand)]
pub enum CodeAction {
    /// コード形式を検証
    Validate {
        #[arg(required = true)]
        code: String,
    },

    /// コードを分解して表示
    Parse {
        #[arg(required = true)]
        code: String,
    },

    /// コードを生成
    Generate {
        /// 装備種別
        #[arg(short = 't', long = "type")]
        equipment_type: EquipmentType,

        /// 作業員名
        #[arg(short, long)]
        name: String,

        /// 連番（1〜999）
        #[arg(short, long, default_value = "1")]
        sequence: u32,

        /// 年（デフォルト: 今年）
        #[arg(long, value_parser = clap::value_parser!(u32).range(1000..=9999))]
        year: Option<u32>,
    },
}
