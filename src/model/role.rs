use strum_macros::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
pub enum Role {
    #[strum(to_string = "employee")]
    Employee,
    #[strum(to_string = "team-lead")]
    TeamLead,
}

impl Role {
    /// Maps the stored `rol` column. Anything that is not a team lead is an
    /// ordinary employee.
    pub fn from_stored(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("teamleider") || value.eq_ignore_ascii_case("team-lead") {
            Role::TeamLead
        } else {
            Role::Employee
        }
    }

    pub fn is_team_lead(&self) -> bool {
        *self == Role::TeamLead
    }
}
