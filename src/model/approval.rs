use strum_macros::{Display, EnumString};

/// Tri-state decision on a record. `pending` is the only non-terminal state.
///
/// `Display` yields the value stored for attendance rows; the Dutch labels
/// used by the leave table parse as well.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ApprovalStatus {
    #[strum(to_string = "pending", serialize = "In behandeling")]
    Pending,
    #[strum(to_string = "approved", serialize = "Goedgekeurd")]
    Approved,
    #[strum(to_string = "rejected", serialize = "Afgekeurd")]
    Rejected,
}

impl ApprovalStatus {
    /// Value stored in the `Verlof.status` column.
    pub fn leave_label(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "In behandeling",
            ApprovalStatus::Approved => "Goedgekeurd",
            ApprovalStatus::Rejected => "Afgekeurd",
        }
    }

    pub fn is_decided(&self) -> bool {
        *self != ApprovalStatus::Pending
    }
}
