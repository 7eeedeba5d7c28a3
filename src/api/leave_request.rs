use crate::auth::auth::AuthUser;
use crate::auth::session::{Session, verify_csrf};
use crate::config::Config;
use crate::db::RecordStore;
use crate::error::AppError;
use crate::model::{LeaveRequest, LeaveType, Record};
use crate::models::LeaveForm;
use crate::utils::redirect::see_other;
use crate::views::Views;
use crate::workflow;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use strum::IntoEnumIterator;

#[derive(Serialize)]
pub struct LeaveVm {
    pub id: u64,
    pub employee_id: u64,
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    /// Dutch label as stored.
    pub status: String,
    /// pending / approved / rejected, for styling and the delete button.
    pub approval: String,
    pub approved_by: String,
}

impl From<&LeaveRequest> for LeaveVm {
    fn from(leave: &LeaveRequest) -> Self {
        Self {
            id: leave.id,
            employee_id: leave.employee_id,
            leave_type: leave.leave_type.to_string(),
            start_date: leave.start_date.to_string(),
            end_date: leave.end_date.to_string(),
            status: leave.status.leave_label().to_string(),
            approval: leave.status.to_string(),
            approved_by: leave.approved_by.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

// GET /
pub async fn index(
    auth: AuthUser,
    session: Session,
    store: web::Data<dyn RecordStore<LeaveRequest>>,
    views: web::Data<Views>,
) -> Result<HttpResponse, AppError> {
    let leaves = workflow::visible_records(store.get_ref(), &auth).await?;

    let mut context = tera::Context::new();
    context.insert("username", &auth.username);
    context.insert("role", &auth.role.to_string());
    context.insert("is_team_lead", &auth.is_team_lead());
    context.insert("csrf_token", &session.csrf_token);
    context.insert(
        "leave_types",
        &LeaveType::iter().map(|t| t.to_string()).collect::<Vec<_>>(),
    );
    context.insert("records", &leaves.iter().map(LeaveVm::from).collect::<Vec<_>>());

    views.render("leave.html", &context)
}

// POST /
pub async fn submit(
    auth: AuthUser,
    session: Session,
    form: web::Form<LeaveForm>,
    store: web::Data<dyn RecordStore<LeaveRequest>>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    verify_csrf(&config, Some(&session), form.csrf_token.as_deref())?;

    let result = match form.command(config.enforce_leave_date_order) {
        Ok(Some(command)) => workflow::apply(store.get_ref(), &auth, command).await,
        Ok(None) => {
            tracing::debug!(user_id = auth.user_id, action = ?form.action, "Ignoring unknown action");
            return Ok(see_other("/"));
        }
        Err(e) => Err(e),
    };
    workflow::log_outcome(LeaveRequest::KIND, &auth, &result);

    Ok(see_other("/"))
}
