use chrono::NaiveDateTime;
use strum_macros::{Display, EnumIter, EnumString};

use super::{ApprovalStatus, Record};

/// What the employee reports for the day. `Display` is the stored label.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[strum(to_string = "Aanwezig", serialize = "present")]
    Present,
    #[strum(to_string = "Afwezig", serialize = "absent")]
    Absent,
    #[strum(to_string = "Ziek", serialize = "sick")]
    Sick,
    #[strum(to_string = "Verlof", serialize = "on-leave")]
    OnLeave,
}

#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub approval: ApprovalStatus,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

impl Record for AttendanceRecord {
    type Draft = NewAttendance;

    const KIND: &'static str = "attendance";
    const DELETABLE_ONCE_DECIDED: bool = true;

    fn id(&self) -> u64 {
        self.id
    }

    fn owner(&self) -> u64 {
        self.employee_id
    }

    fn approval(&self) -> ApprovalStatus {
        self.approval
    }

    fn from_draft(id: u64, owner: u64, draft: NewAttendance) -> Self {
        Self {
            id,
            employee_id: owner,
            check_in: draft.check_in,
            check_out: draft.check_out,
            status: draft.status,
            note: draft.note,
            approval: ApprovalStatus::Pending,
        }
    }

    // attendance keeps no approver
    fn record_decision(&mut self, status: ApprovalStatus, _approver: u64) {
        self.approval = status;
    }
}
