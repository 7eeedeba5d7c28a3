use chrono::NaiveDate;
use strum_macros::{Display, EnumIter, EnumString};

use super::{ApprovalStatus, Record};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum LeaveType {
    #[strum(to_string = "ziek", serialize = "sick")]
    Sick,
    #[strum(to_string = "betaald", serialize = "paid")]
    Paid,
    #[strum(to_string = "onbetaald", serialize = "unpaid")]
    Unpaid,
    #[strum(to_string = "vakantie", serialize = "vacation")]
    Vacation,
}

#[derive(Debug, Clone)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ApprovalStatus,
    pub approved_by: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct NewLeave {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewLeave {
    pub fn ends_before_start(&self) -> bool {
        self.end_date < self.start_date
    }
}

impl Record for LeaveRequest {
    type Draft = NewLeave;

    const KIND: &'static str = "leave";
    const DELETABLE_ONCE_DECIDED: bool = false;

    fn id(&self) -> u64 {
        self.id
    }

    fn owner(&self) -> u64 {
        self.employee_id
    }

    fn approval(&self) -> ApprovalStatus {
        self.status
    }

    fn from_draft(id: u64, owner: u64, draft: NewLeave) -> Self {
        Self {
            id,
            employee_id: owner,
            leave_type: draft.leave_type,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: ApprovalStatus::Pending,
            approved_by: None,
        }
    }

    fn record_decision(&mut self, status: ApprovalStatus, approver: u64) {
        self.status = status;
        self.approved_by = Some(approver);
    }
}
