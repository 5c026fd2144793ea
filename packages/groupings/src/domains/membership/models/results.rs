use serde::{Deserialize, Serialize};

use crate::common::{Group, Person, FAILURE, SUCCESS};
use crate::domains::grouping::{GroupKind, GroupingSettings};

/// Success/failure marker of a per-person result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILURE")]
    Failure,
}

impl ResultCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCode::Success => SUCCESS,
            ResultCode::Failure => FAILURE,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultCode::Success)
    }
}

/// Outcome of adding one person to Include or Exclude
///
/// Identity fields are only filled in when the add succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberResult {
    /// Identifier exactly as the caller passed it
    pub user_identifier: String,
    pub result: ResultCode,
    pub reason: Option<String>,
    pub path_of_add: Option<String>,
    /// Opposite path the person was taken out of (always attempted)
    pub path_of_removed: Option<String>,
    /// Whether the person actually was in the opposite path
    pub was_removed_from_opposite: bool,
    pub uid: Option<String>,
    pub uh_uuid: Option<String>,
    pub name: Option<String>,
}

impl AddMemberResult {
    pub fn not_found(identifier: &str) -> Self {
        Self {
            user_identifier: identifier.to_string(),
            result: ResultCode::Failure,
            reason: Some(format!("{} is not a known person", identifier)),
            path_of_add: None,
            path_of_removed: None,
            was_removed_from_opposite: false,
            uid: None,
            uh_uuid: None,
            name: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Outcome of removing one person from Include or Exclude
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberResult {
    pub user_identifier: String,
    pub result: ResultCode,
    pub reason: Option<String>,
    pub path_of_removed: Option<String>,
    pub user_was_removed: bool,
    pub uid: Option<String>,
    pub uh_uuid: Option<String>,
    pub name: Option<String>,
}

impl RemoveMemberResult {
    pub fn not_found(identifier: &str) -> Self {
        Self {
            user_identifier: identifier.to_string(),
            result: ResultCode::Failure,
            reason: Some(format!("{} is not a known person", identifier)),
            path_of_removed: None,
            user_was_removed: false,
            uid: None,
            uh_uuid: None,
            name: None,
        }
    }

    pub fn removed(identifier: &str, path: String, person: &Person) -> Self {
        Self {
            user_identifier: identifier.to_string(),
            result: ResultCode::Success,
            reason: None,
            path_of_removed: Some(path),
            user_was_removed: true,
            uid: Some(person.username.clone()),
            uh_uuid: Some(person.id.to_string()),
            name: Some(person.name.clone()),
        }
    }

    pub fn failed(identifier: &str, path: String, reason: impl Into<String>) -> Self {
        Self {
            user_identifier: identifier.to_string(),
            result: ResultCode::Failure,
            reason: Some(reason.into()),
            path_of_removed: Some(path),
            user_was_removed: false,
            uid: None,
            uh_uuid: None,
            name: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Result of a single (non per-person) operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingsServiceResult {
    /// Starts with SUCCESS or FAILURE
    pub result_code: String,
    pub action: String,
}

impl GroupingsServiceResult {
    pub fn success(action: impl Into<String>) -> Self {
        Self::with_code(SUCCESS, action)
    }

    pub fn failure(action: impl Into<String>) -> Self {
        Self::with_code(FAILURE, action)
    }

    pub fn with_code(code: &str, action: impl Into<String>) -> Self {
        Self {
            result_code: code.to_string(),
            action: action.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result_code.starts_with(SUCCESS)
    }
}

/// How one person relates to one grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub path: String,
    pub name: String,
    pub in_basis: bool,
    pub in_include: bool,
    pub in_exclude: bool,
    pub in_composite: bool,
    pub in_owner: bool,
    pub is_self_opted: bool,
    pub is_opt_out_possible: bool,
}

impl Membership {
    /// Relationship types that hold, in a fixed order
    pub fn kinds(&self) -> Vec<GroupKind> {
        [
            (self.in_basis, GroupKind::Basis),
            (self.in_include, GroupKind::Include),
            (self.in_exclude, GroupKind::Exclude),
            (self.in_composite, GroupKind::Composite),
            (self.in_owner, GroupKind::Owners),
        ]
        .into_iter()
        .filter_map(|(held, kind)| held.then_some(kind))
        .collect()
    }
}

/// All groups of one grouping, with its composite resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingView {
    pub path: String,
    pub basis: Group,
    pub include: Group,
    pub exclude: Group,
    pub owners: Group,
    pub composite: Group,
    pub settings: GroupingSettings,
}
