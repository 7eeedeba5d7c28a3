use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{FromRow, MySqlPool};

use super::store::{RecordStore, StoreError, Transition, UserStore};
use crate::model::{
    ApprovalStatus, AttendanceRecord, AttendanceStatus, LeaveRequest, LeaveType, NewAttendance,
    NewLeave, Role, User,
};

/// sqlx-backed store over the `Gebruikers`, `Aanwezigheid` and `Verlof` tables.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    werknemer_id: u64,
    gebruikersnaam: String,
    wachtwoord_hash: String,
    rol: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.werknemer_id,
            username: row.gebruikersnaam,
            password_hash: row.wachtwoord_hash,
            role: Role::from_stored(&row.rol),
        }
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    aanwezigheid_id: u64,
    werknemer_id: u64,
    check_in: NaiveDateTime,
    check_uit: Option<NaiveDateTime>,
    status: String,
    notities: Option<String>,
    goedkeuring_status: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StoreError::Corrupt {
            table: "Aanwezigheid",
            id: row.aanwezigheid_id,
            reason,
        };
        let status = AttendanceStatus::from_str(&row.status)
            .map_err(|_| corrupt(format!("unknown status {:?}", row.status)))?;
        let approval = ApprovalStatus::from_str(&row.goedkeuring_status).map_err(|_| {
            corrupt(format!(
                "unknown approval status {:?}",
                row.goedkeuring_status
            ))
        })?;

        Ok(AttendanceRecord {
            id: row.aanwezigheid_id,
            employee_id: row.werknemer_id,
            check_in: row.check_in,
            check_out: row.check_uit,
            status,
            note: row.notities,
            approval,
        })
    }
}

#[derive(FromRow)]
struct LeaveRow {
    verlof_id: u64,
    werknemer_id: u64,
    verlof_type: String,
    start_datum: NaiveDate,
    eind_datum: NaiveDate,
    status: String,
    goedgekeurd_door: Option<u64>,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StoreError::Corrupt {
            table: "Verlof",
            id: row.verlof_id,
            reason,
        };
        let leave_type = LeaveType::from_str(&row.verlof_type)
            .map_err(|_| corrupt(format!("unknown leave type {:?}", row.verlof_type)))?;
        let status = ApprovalStatus::from_str(&row.status)
            .map_err(|_| corrupt(format!("unknown status {:?}", row.status)))?;

        Ok(LeaveRequest {
            id: row.verlof_id,
            employee_id: row.werknemer_id,
            leave_type,
            start_date: row.start_datum,
            end_date: row.eind_datum,
            status,
            approved_by: row.goedgekeurd_door,
        })
    }
}

const USER_COLUMNS: &str = "werknemer_id, gebruikersnaam, wachtwoord_hash, rol";

const ATTENDANCE_COLUMNS: &str = "aanwezigheid_id, werknemer_id, check_in, check_uit, status, \
     notities, goedkeuring_status";

const LEAVE_COLUMNS: &str = "verlof_id, werknemer_id, verlof_type, start_datum, eind_datum, \
     status, goedgekeurd_door";

#[async_trait]
impl UserStore for MySqlStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM Gebruikers WHERE gebruikersnaam = ?");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM Gebruikers WHERE werknemer_id = ?");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl RecordStore<AttendanceRecord> for MySqlStore {
    async fn insert(&self, owner: u64, draft: NewAttendance) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO Aanwezigheid
                (werknemer_id, check_in, check_uit, status, notities, goedkeuring_status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(owner)
        .bind(draft.check_in)
        .bind(draft.check_out)
        .bind(draft.status.to_string())
        .bind(draft.note)
        .bind(ApprovalStatus::Pending.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn delete_if_owner(&self, id: u64, owner: u64) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM Aanwezigheid WHERE aanwezigheid_id = ? AND werknemer_id = ?")
                .bind(id)
                .bind(owner)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_status(
        &self,
        id: u64,
        status: ApprovalStatus,
        _approver: u64,
    ) -> Result<Transition, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE Aanwezigheid
            SET goedkeuring_status = ?
            WHERE aanwezigheid_id = ?
            AND goedkeuring_status = ?
            "#,
        )
        .bind(status.to_string())
        .bind(id)
        .bind(ApprovalStatus::Pending.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(Transition::Applied);
        }

        let current = sqlx::query_scalar::<_, String>(
            "SELECT goedkeuring_status FROM Aanwezigheid WHERE aanwezigheid_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        settle(current, "Aanwezigheid", id)
    }

    async fn list_by_owner(&self, owner: u64) -> Result<Vec<AttendanceRecord>, StoreError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM Aanwezigheid WHERE werknemer_id = ? ORDER BY aanwezigheid_id"
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    async fn list_by_status(
        &self,
        status: ApprovalStatus,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM Aanwezigheid WHERE goedkeuring_status = ? ORDER BY aanwezigheid_id"
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(status.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }
}

#[async_trait]
impl RecordStore<LeaveRequest> for MySqlStore {
    async fn insert(&self, owner: u64, draft: NewLeave) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO Verlof
                (werknemer_id, verlof_type, start_datum, eind_datum, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(owner)
        .bind(draft.leave_type.to_string())
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(ApprovalStatus::Pending.leave_label())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn delete_if_owner(&self, id: u64, owner: u64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM Verlof
            WHERE verlof_id = ?
            AND werknemer_id = ?
            AND status = ?
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(ApprovalStatus::Pending.leave_label())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_status(
        &self,
        id: u64,
        status: ApprovalStatus,
        approver: u64,
    ) -> Result<Transition, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE Verlof
            SET status = ?, goedgekeurd_door = ?
            WHERE verlof_id = ?
            AND status = ?
            "#,
        )
        .bind(status.leave_label())
        .bind(approver)
        .bind(id)
        .bind(ApprovalStatus::Pending.leave_label())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(Transition::Applied);
        }

        let current =
            sqlx::query_scalar::<_, String>("SELECT status FROM Verlof WHERE verlof_id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        settle(current, "Verlof", id)
    }

    async fn list_by_owner(&self, owner: u64) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql =
            format!("SELECT {LEAVE_COLUMNS} FROM Verlof WHERE werknemer_id = ? ORDER BY verlof_id");
        let rows = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LeaveRequest::try_from).collect()
    }

    async fn list_by_status(&self, status: ApprovalStatus) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM Verlof WHERE status = ? ORDER BY verlof_id");
        let rows = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(status.leave_label())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LeaveRequest::try_from).collect()
    }
}

/// Interprets the status read back after a conditional update touched no rows.
fn settle(current: Option<String>, table: &'static str, id: u64) -> Result<Transition, StoreError> {
    let Some(current) = current else {
        return Ok(Transition::Missing);
    };
    match ApprovalStatus::from_str(&current) {
        Ok(status) => Ok(Transition::AlreadyDecided(status)),
        Err(_) => Err(StoreError::Corrupt {
            table,
            id,
            reason: format!("unknown status {current:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendance_row(status: &str, approval: &str) -> AttendanceRow {
        AttendanceRow {
            aanwezigheid_id: 7,
            werknemer_id: 3,
            check_in: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            check_uit: None,
            status: status.to_string(),
            notities: Some("Kantoor".to_string()),
            goedkeuring_status: approval.to_string(),
        }
    }

    fn leave_row(status: &str) -> LeaveRow {
        LeaveRow {
            verlof_id: 9,
            werknemer_id: 3,
            verlof_type: "vakantie".to_string(),
            start_datum: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            eind_datum: NaiveDate::from_ymd_opt(2024, 7, 12).unwrap(),
            status: status.to_string(),
            goedgekeurd_door: Some(2),
        }
    }

    #[test]
    fn settle_reports_missing_rows() {
        assert!(matches!(settle(None, "Verlof", 1), Ok(Transition::Missing)));
    }

    #[test]
    fn settle_reads_both_label_sets() {
        assert!(matches!(
            settle(Some("Goedgekeurd".to_string()), "Verlof", 1),
            Ok(Transition::AlreadyDecided(ApprovalStatus::Approved))
        ));
        assert!(matches!(
            settle(Some("rejected".to_string()), "Aanwezigheid", 1),
            Ok(Transition::AlreadyDecided(ApprovalStatus::Rejected))
        ));
    }

    #[test]
    fn settle_flags_unknown_status() {
        let err = settle(Some("misschien".to_string()), "Verlof", 4).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { table: "Verlof", id: 4, .. }));
    }

    #[test]
    fn attendance_row_converts() {
        let record = AttendanceRecord::try_from(attendance_row("Ziek", "approved")).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.employee_id, 3);
        assert_eq!(record.status, AttendanceStatus::Sick);
        assert_eq!(record.approval, ApprovalStatus::Approved);
        assert_eq!(record.note.as_deref(), Some("Kantoor"));
    }

    #[test]
    fn attendance_row_with_bad_values_is_corrupt() {
        for row in [attendance_row("Thuis", "pending"), attendance_row("Aanwezig", "later")] {
            let err = AttendanceRecord::try_from(row).unwrap_err();
            assert!(matches!(
                err,
                StoreError::Corrupt { table: "Aanwezigheid", id: 7, .. }
            ));
        }
    }

    #[test]
    fn leave_labels_round_trip() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            let leave = LeaveRequest::try_from(leave_row(status.leave_label())).unwrap();
            assert_eq!(leave.status, status);
            assert_eq!(leave.leave_type, LeaveType::Vacation);
            assert_eq!(leave.approved_by, Some(2));
        }
        let err = LeaveRequest::try_from(leave_row("Onbekend")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { table: "Verlof", id: 9, .. }));
    }

    #[test]
    fn user_row_maps_role() {
        let user = User::from(UserRow {
            werknemer_id: 5,
            gebruikersnaam: "lars".to_string(),
            wachtwoord_hash: "abc".to_string(),
            rol: "teamleider".to_string(),
        });
        assert_eq!(user.id, 5);
        assert_eq!(user.role, Role::TeamLead);
    }
}
