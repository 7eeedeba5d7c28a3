use crate::auth::{auth::AuthUser, session::{Session, verify_csrf}};
use crate::config::Config;
use crate::db::RecordStore;
use crate::error::AppError;
use crate::model::{AttendanceRecord, AttendanceStatus, Record};
use crate::models::AttendanceForm;
use crate::utils::redirect::see_other;
use crate::views::Views;
use crate::workflow;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use strum::IntoEnumIterator;

const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M";

/// Row as shown on the index page.
#[derive(Serialize)]
pub struct AttendanceVm {
    pub id: u64,
    pub employee_id: u64,
    pub check_in: String,
    pub check_out: String,
    pub status: String,
    pub note: String,
    pub approval: String,
}

impl From<&AttendanceRecord> for AttendanceVm {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: record.id,
            employee_id: record.employee_id,
            check_in: record.check_in.format(TIMESTAMP_DISPLAY).to_string(),
            check_out: record
                .check_out
                .map(|t| t.format(TIMESTAMP_DISPLAY).to_string())
                .unwrap_or_default(),
            status: record.status.to_string(),
            note: record.note.clone().unwrap_or_default(),
            approval: record.approval.to_string(),
        }
    }
}

// GET /
pub async fn index(
    auth: AuthUser,
    session: Session,
    store: web::Data<dyn RecordStore<AttendanceRecord>>,
    views: web::Data<Views>,
) -> Result<HttpResponse, AppError> {
    let records = workflow::visible_records(store.get_ref(), &auth).await?;

    let mut context = tera::Context::new();
    context.insert("username", &auth.username);
    context.insert("role", &auth.role.to_string());
    context.insert("is_team_lead", &auth.is_team_lead());
    context.insert("csrf_token", &session.csrf_token);
    context.insert(
        "statuses",
        &AttendanceStatus::iter().map(|s| s.to_string()).collect::<Vec<_>>(),
    );
    context.insert(
        "records",
        &records.iter().map(AttendanceVm::from).collect::<Vec<_>>(),
    );

    views.render("attendance.html", &context)
}

// POST /
pub async fn submit(
    auth: AuthUser,
    session: Session,
    form: web::Form<AttendanceForm>,
    store: web::Data<dyn RecordStore<AttendanceRecord>>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    verify_csrf(&config, Some(&session), form.csrf_token.as_deref())?;

    let result = match form.command() {
        Ok(Some(command)) => workflow::apply(store.get_ref(), &auth, command).await,
        Ok(None) => {
            tracing::debug!(user_id = auth.user_id, action = ?form.action, "Ignoring unknown action");
            return Ok(see_other("/"));
        }
        Err(e) => Err(e),
    };
    workflow::log_outcome(AttendanceRecord::KIND, &auth, &result);

    Ok(see_other("/"))
}
