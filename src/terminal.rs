//! スキャン端末（対話式）
//!
//! カメラ/バーコードリーダー（キーボード入力）や手入力の装備IDを検証セッションに流し、
//! 判定結果を表示する。出勤記録はログファイルに追記する。

use crate::attendance_log::AttendanceLog;
use crate::error::{GateError, Result};
use chrono::{DateTime, Local, TimeZone};
use dialoguer::Input;
use ppe_gate_common::{
    normalize_code, AttendanceRecord, AttendanceRecorder, CurrentCheck, Directories, ScanError,
    ScannedItem, SessionStatus, VerificationSession,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 端末の操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalAction {
    /// 装備IDをスキャン
    Scan(String),
    /// 装備を1件取り除く
    Remove(String),
    /// 全てクリア
    Clear,
    /// 出勤記録
    Mark,
    /// 現在の判定を表示
    Status,
    Help,
    Quit,
    /// 不明なコマンド
    Unknown(String),
}

pub const HELP: &str = "操作: [装備ID]スキャン  :rm <ID>取り除く  :clear全てクリア  :mark出勤記録  :status判定表示  :q終了";

/// 入力行を操作に変換する
///
/// `:` で始まる行はコマンド、それ以外はスキャン入力（生のまま渡す）。
pub fn parse_action(line: &str) -> TerminalAction {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return TerminalAction::Scan(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.next();

    match (name, arg) {
        ("rm" | "remove", Some(code)) => TerminalAction::Remove(code.to_string()),
        ("clear", _) => TerminalAction::Clear,
        ("mark", _) => TerminalAction::Mark,
        ("status" | "s", _) => TerminalAction::Status,
        ("help" | "h" | "?", _) => TerminalAction::Help,
        ("q" | "quit" | "exit", _) => TerminalAction::Quit,
        _ => TerminalAction::Unknown(trimmed.to_string()),
    }
}

/// スキャン済み装備の一覧
pub fn render_items(items: &[ScannedItem]) -> String {
    if items.is_empty() {
        return "スキャン済み装備: なし".to_string();
    }

    let mut out = format!("スキャン済み装備 ({})", items.len());
    for item in items {
        out.push_str(&format!(
            "\n  - {:<10} {}  ({})",
            item.equipment_type.as_str().to_uppercase(),
            item.equipment_id,
            item.owner_name
        ));
    }
    out
}

/// 現在の判定
pub fn render_check(check: Option<&CurrentCheck<'_>>) -> String {
    let Some(check) = check else {
        return "判定: -".to_string();
    };

    let mut out = format!("作業員: {} (ID {})", check.worker.name, check.worker.id);
    match check.status {
        SessionStatus::Complete => {
            out.push_str("\n✅ 全装備確認済み（:mark で出勤記録）");
        }
        SessionStatus::Mismatch => {
            out.push_str("\n⚠ 別の作業員の装備が読み取られました。:rm か :clear で続行してください");
        }
        _ => {
            let missing: Vec<&str> = check.missing_types.iter().map(|t| t.as_str()).collect();
            out.push_str(&format!("\n⚠ 不足装備: {}", missing.join(", ")));
            out.push_str("\n❌ 出勤記録できません（必要装備を全てスキャンしてください）");
        }
    }
    out
}

/// スキャンエラーの表示文
pub fn describe_scan_error(err: &ScanError, directories: &Directories) -> String {
    match err {
        ScanError::EmptyScan => "読み取り結果が空です".to_string(),
        ScanError::UnknownEquipment(code) => format!(
            "装備が見つかりません: {}\n  登録済みID: {}",
            code,
            directories.equipment.known_ids().join(", ")
        ),
        ScanError::DuplicateScan(code) => format!("スキャン済みです: {}", code),
        ScanError::OwnerMismatch { expected, actual } => {
            let name = |id: &u32| {
                directories
                    .workers
                    .get(*id)
                    .map(|w| w.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string())
            };
            format!(
                "装備の持ち主が違います: {} の装備ですが、{} の装備をスキャン中です",
                name(actual),
                name(expected)
            )
        }
    }
}

/// 操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub quit: bool,
}

impl Outcome {
    fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), quit: false }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// 1台の端末
pub struct Terminal {
    session: VerificationSession,
    recorder: AttendanceRecorder,
    log: AttendanceLog,
    log_path: PathBuf,
}

impl Terminal {
    /// 作業員が1人もいないカタログでは起動しない
    pub fn new(
        directories: Arc<Directories>,
        recorder: AttendanceRecorder,
        log: AttendanceLog,
        log_path: PathBuf,
    ) -> Result<Self> {
        if directories.workers.is_empty() {
            return Err(GateError::EmptyCatalog);
        }

        Ok(Self {
            session: VerificationSession::new(directories),
            recorder,
            log,
            log_path,
        })
    }

    pub fn session(&self) -> &VerificationSession {
        &self.session
    }

    pub fn log(&self) -> &AttendanceLog {
        &self.log
    }

    /// 操作を1件処理する（出勤記録は現在時刻）
    pub fn handle(&mut self, action: TerminalAction) -> Result<Outcome> {
        self.handle_at(action, &Local::now())
    }

    pub fn handle_at<Tz>(&mut self, action: TerminalAction, now: &DateTime<Tz>) -> Result<Outcome>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        debug!(?action, "terminal action");

        let outcome = match action {
            TerminalAction::Scan(raw) => {
                let message = match self.session.submit_scan(&raw) {
                    Ok(item) => format!(
                        "✔ {}  ID: {}  持ち主: {}",
                        item.equipment_type.as_str().to_uppercase(),
                        item.equipment_id,
                        item.owner_name
                    ),
                    Err(err) => format!("✖ {}", describe_scan_error(&err, self.session.directories())),
                };
                Outcome::message(format!("{}\n{}", message, self.summary()))
            }
            TerminalAction::Remove(code) => {
                let message = if self.session.remove_item(&code) {
                    format!("取り除きました: {}", normalize_code(&code))
                } else {
                    format!("スキャン済み装備にありません: {}", code)
                };
                Outcome::message(format!("{}\n{}", message, self.summary()))
            }
            TerminalAction::Clear => {
                self.session.clear();
                Outcome::message("全てクリアしました")
            }
            TerminalAction::Mark => match self.mark_present(now) {
                Ok(record) => Outcome::message(format!(
                    "✅ {} を {} として記録しました ({})",
                    record.worker, record.status, record.time
                )),
                Err(GateError::Attendance(err)) => {
                    Outcome::message(format!("✖ {}", err))
                }
                Err(err) => {
                    warn!(error = %err, path = %self.log_path.display(), "attendance log not saved");
                    Outcome::message(format!(
                        "✖ 出勤ログを保存できません: {}\n  確認済みの装備はそのままです。:mark で再試行してください",
                        err
                    ))
                }
            },
            TerminalAction::Status => Outcome::message(self.summary()),
            TerminalAction::Help => Outcome::message(HELP),
            TerminalAction::Quit => Outcome { message: "終了します".to_string(), quit: true },
            TerminalAction::Unknown(command) => {
                Outcome::message(format!("不明なコマンド: {}\n{}", command, HELP))
            }
        };
        Ok(outcome)
    }

    /// 出勤を記録してログファイルに保存する
    ///
    /// 保存に成功してからセッションを空に戻す。失敗時はログもセッションも元のまま。
    pub fn mark_present<Tz>(&mut self, now: &DateTime<Tz>) -> Result<AttendanceRecord>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let record = self.recorder.prepare_record(&self.session, now)?;

        let mut log = self.log.clone();
        log.append(record.clone());
        log.save(&self.log_path)?;

        self.log = log;
        self.session.clear();
        info!(worker = %record.worker, status = %record.status, time = %record.time, "attendance marked");
        Ok(record)
    }

    /// 一覧と判定
    pub fn summary(&self) -> String {
        format!(
            "{}\n{}",
            render_items(self.session.items()),
            render_check(self.session.current_check().as_ref())
        )
    }
}

/// 対話ループ
pub fn run_interactive(terminal: &mut Terminal) -> Result<()> {
    println!("{}", HELP);
    println!("---");

    loop {
        let line: String = Input::new()
            .with_prompt("装備ID")
            .allow_empty(true)
            .interact_text()?;

        if line.trim().is_empty() {
            continue;
        }

        let outcome = terminal.handle(parse_action(&line))?;
        println!("{}\n", outcome);
        if outcome.quit {
            break;
        }
    }

    Ok(())
}
