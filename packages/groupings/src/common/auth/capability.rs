use crate::domains::grouping::GroupingPath;

/// Capabilities checked before a groupings operation runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingCapability {
    /// Change memberships, owners and settings of one grouping (owner or admin)
    ManageGrouping(GroupingPath),

    /// Change the admin roster (admin only)
    ManageAdmins,

    /// Act on the given person's own behalf, e.g. self opt-in (that person only)
    ActAs(String),

    /// Read the given person's memberships (that person or an admin)
    ViewMemberships(String),
}

impl GroupingCapability {
    /// Admins hold every capability except acting as somebody else.
    pub fn granted_to_admin(&self) -> bool {
        !matches!(self, GroupingCapability::ActAs(_))
    }
}
