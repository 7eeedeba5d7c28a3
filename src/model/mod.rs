pub mod approval;
pub mod attendance;
pub mod leave_request;
pub mod role;
pub mod user;

pub use approval::ApprovalStatus;
pub use attendance::{AttendanceRecord, AttendanceStatus, NewAttendance};
pub use leave_request::{LeaveRequest, LeaveType, NewLeave};
pub use role::Role;
pub use user::User;

/// A row that moves through the approval workflow.
///
/// Both attendance records and leave requests share the same lifecycle: an
/// owner creates a draft, a team lead decides on it once.
pub trait Record: Clone + Send + Sync + 'static {
    /// Validated input needed to create a new row.
    type Draft: Send + 'static;

    /// Short name used in log fields.
    const KIND: &'static str;

    /// Whether the owner may still delete the row after a decision was made.
    const DELETABLE_ONCE_DECIDED: bool;

    fn id(&self) -> u64;
    fn owner(&self) -> u64;
    fn approval(&self) -> ApprovalStatus;

    /// Build a fresh row. The approval status always starts as pending.
    fn from_draft(id: u64, owner: u64, draft: Self::Draft) -> Self;

    fn record_decision(&mut self, status: ApprovalStatus, approver: u64);
}
