use std::str::FromStr;

use serde::Deserialize;

use crate::model::{AttendanceStatus, LeaveType, NewAttendance, NewLeave};
use crate::utils::form_values::{non_blank, parse_date, parse_timestamp};
use crate::workflow::{Action, Command, WorkflowError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// POST / in the attendance variant.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttendanceForm {
    pub action: Option<String>,
    pub check_in: Option<String>,
    pub check_uit: Option<String>,
    pub status: Option<String>,
    pub notities: Option<String>,
    pub record_id: Option<String>,
    pub csrf_token: Option<String>,
}

/// POST / in the leave variant.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LeaveForm {
    pub action: Option<String>,
    pub verlof_type: Option<String>,
    pub start_datum: Option<String>,
    pub eind_datum: Option<String>,
    pub verlof_id: Option<String>,
    pub csrf_token: Option<String>,
}

/// `None` when the action field is missing or not one we know.
fn parse_action(action: Option<&str>) -> Option<Action> {
    action.and_then(|a| Action::from_str(a.trim()).ok())
}

fn parse_id(field: &str, value: Option<&str>) -> Result<u64, WorkflowError> {
    let value = non_blank(value).ok_or_else(|| WorkflowError::Validation(format!("{field} is required")))?;
    value
        .parse()
        .map_err(|_| WorkflowError::Validation(format!("{field} must be a number, got {value:?}")))
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, WorkflowError> {
    non_blank(value).ok_or_else(|| WorkflowError::Validation(format!("{field} is required")))
}

impl AttendanceForm {
    pub fn command(&self) -> Result<Option<Command<NewAttendance>>, WorkflowError> {
        let Some(action) = parse_action(self.action.as_deref()) else {
            return Ok(None);
        };

        let command = match action {
            Action::Create => Command::Create(self.draft()?),
            Action::Delete => Command::Delete(parse_id("record_id", self.record_id.as_deref())?),
            Action::Approve => Command::Approve(parse_id("record_id", self.record_id.as_deref())?),
            Action::Reject => Command::Reject(parse_id("record_id", self.record_id.as_deref())?),
        };
        Ok(Some(command))
    }

    fn draft(&self) -> Result<NewAttendance, WorkflowError> {
        let check_in =
            parse_timestamp(required("check_in", self.check_in.as_deref())?).map_err(WorkflowError::Validation)?;
        let check_out = non_blank(self.check_uit.as_deref())
            .map(parse_timestamp)
            .transpose()
            .map_err(WorkflowError::Validation)?;
        let status_value = required("status", self.status.as_deref())?;
        let status = AttendanceStatus::from_str(status_value)
            .map_err(|_| WorkflowError::Validation(format!("unknown status {status_value:?}")))?;

        Ok(NewAttendance {
            check_in,
            check_out,
            status,
            note: non_blank(self.notities.as_deref()).map(str::to_string),
        })
    }
}

impl LeaveForm {
    /// `enforce_date_order` rejects leave that ends before it starts.
    pub fn command(&self, enforce_date_order: bool) -> Result<Option<Command<NewLeave>>, WorkflowError> {
        let Some(action) = parse_action(self.action.as_deref()) else {
            return Ok(None);
        };

        let command = match action {
            Action::Create => Command::Create(self.draft(enforce_date_order)?),
            Action::Delete => Command::Delete(parse_id("verlof_id", self.verlof_id.as_deref())?),
            Action::Approve => Command::Approve(parse_id("verlof_id", self.verlof_id.as_deref())?),
            Action::Reject => Command::Reject(parse_id("verlof_id", self.verlof_id.as_deref())?),
        };
        Ok(Some(command))
    }

    fn draft(&self, enforce_date_order: bool) -> Result<NewLeave, WorkflowError> {
        let type_value = required("verlof_type", self.verlof_type.as_deref())?;
        let leave_type = LeaveType::from_str(type_value)
            .map_err(|_| WorkflowError::Validation(format!("unknown leave type {type_value:?}")))?;
        let start_date =
            parse_date(required("start_datum", self.start_datum.as_deref())?).map_err(WorkflowError::Validation)?;
        let end_date =
            parse_date(required("eind_datum", self.eind_datum.as_deref())?).map_err(WorkflowError::Validation)?;

        let draft = NewLeave {
            leave_type,
            start_date,
            end_date,
        };
        if enforce_date_order && draft.ends_before_start() {
            return Err(WorkflowError::Validation(format!(
                "eind_datum {end_date} is before start_datum {start_date}"
            )));
        }
        Ok(draft)
    }
}
