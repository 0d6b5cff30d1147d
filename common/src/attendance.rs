//! 出勤記録
//!
//! 検証が完了したセッションから出勤レコードを作る。
//! 締め時刻（デフォルト 08:00）の分までは Present、それ以降は Late。

use crate::error::AttendanceError;
use crate::session::{SessionStatus, VerificationSession};
use chrono::{DateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// 出勤区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Late,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Late => write!(f, "Late"),
        }
    }
}

/// 出勤レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// 作業員名
    pub worker: String,
    /// ISO 8601 (RFC 3339) タイムスタンプ
    pub time: String,
    pub status: AttendanceStatus,
}

/// 遅刻判定の締め時刻
///
/// 締め時刻の「分」の間（08:00:00〜08:00:59）までは Present。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalCutoff {
    hour: u32,
    minute: u32,
}

impl Default for ArrivalCutoff {
    fn default() -> Self {
        Self { hour: 8, minute: 0 }
    }
}

impl ArrivalCutoff {
    /// 範囲外（24時以降・60分以降）なら `None`
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// 到着時刻を判定する
    pub fn classify(&self, time: NaiveTime) -> AttendanceStatus {
        if (time.hour(), time.minute()) <= (self.hour, self.minute) {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Late
        }
    }
}

impl fmt::Display for ArrivalCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// 完了したセッションを出勤レコードに変換する
#[derive(Debug, Clone, Copy, Default)]
pub struct AttendanceRecorder {
    cutoff: ArrivalCutoff,
}

impl AttendanceRecorder {
    pub fn new(cutoff: ArrivalCutoff) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> ArrivalCutoff {
        self.cutoff
    }

    /// 完了したセッションから出勤レコードを作る（セッションは変更しない）
    ///
    /// 記録の保存が終わるまでセッションを残したい呼び出し側向け。
    /// `Complete` 以外では `Rejected`。判定は `now` のタイムゾーンの時刻で行う。
    pub fn prepare_record<Tz>(
        &self,
        session: &VerificationSession,
        now: &DateTime<Tz>,
    ) -> Result<AttendanceRecord, AttendanceError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if session.status() != SessionStatus::Complete {
            return Err(AttendanceError::Rejected { status: session.status() });
        }

        let worker = session
            .current_check()
            .map(|check| check.worker.name.clone())
            .ok_or(AttendanceError::Rejected { status: session.status() })?;

        Ok(AttendanceRecord {
            worker,
            time: now.to_rfc3339(),
            status: self.cutoff.classify(now.time()),
        })
    }

    /// 出勤を記録する
    ///
    /// `Complete` 以外では `Rejected` を返しセッションは変更しない。
    /// 成功したらセッションは `Empty` に戻る。
    pub fn mark_present<Tz>(
        &self,
        session: &mut VerificationSession,
        now: &DateTime<Tz>,
    ) -> Result<AttendanceRecord, AttendanceError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let record = self.prepare_record(session, now)?;
        info!(worker = %record.worker, status = %record.status, time = %record.time, "attendance marked");
        session.reset();
        Ok(record)
    }
}
