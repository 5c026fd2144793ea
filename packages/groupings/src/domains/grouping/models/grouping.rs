use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::GroupingsError;

/// Kind of group backing a grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Authoritative source membership, fed externally
    Basis,
    /// Manually added members
    Include,
    /// Manually removed members
    Exclude,
    /// People allowed to manage the grouping
    Owners,
    /// Derived membership: (basis ∪ include) − exclude
    Composite,
}

impl GroupKind {
    const SUFFIXED: [GroupKind; 4] = [
        GroupKind::Basis,
        GroupKind::Include,
        GroupKind::Exclude,
        GroupKind::Owners,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            GroupKind::Basis => ":basis",
            GroupKind::Include => ":include",
            GroupKind::Exclude => ":exclude",
            GroupKind::Owners => ":owners",
            GroupKind::Composite => "",
        }
    }

    /// Include and Exclude are the only directly mutable membership paths.
    pub fn is_manual(&self) -> bool {
        matches!(self, GroupKind::Include | GroupKind::Exclude)
    }

    /// The path a person must leave when added to this one.
    pub fn opposite(&self) -> Option<GroupKind> {
        match self {
            GroupKind::Include => Some(GroupKind::Exclude),
            GroupKind::Exclude => Some(GroupKind::Include),
            _ => None,
        }
    }
}

/// Path of a grouping, e.g. `tmp:grouping-many`. Doubles as the composite group path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupingPath(String);

impl GroupingPath {
    /// Rejects empty paths and paths of a single group such as `tmp:g:include`.
    pub fn new(path: impl Into<String>) -> Result<Self, GroupingsError> {
        let path = path.into();
        let names_a_group = GroupKind::SUFFIXED
            .iter()
            .any(|kind| path.ends_with(kind.suffix()));
        if path.trim().is_empty() || path.ends_with(':') || names_a_group {
            return Err(GroupingsError::InvalidPath(path));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, used as a display name.
    pub fn name(&self) -> &str {
        self.0.rsplit(':').next().unwrap_or(&self.0)
    }

    pub fn group(&self, kind: GroupKind) -> GroupPath {
        GroupPath {
            grouping: self.clone(),
            kind,
        }
    }

    pub fn basis(&self) -> GroupPath {
        self.group(GroupKind::Basis)
    }

    pub fn include(&self) -> GroupPath {
        self.group(GroupKind::Include)
    }

    pub fn exclude(&self) -> GroupPath {
        self.group(GroupKind::Exclude)
    }

    pub fn owners(&self) -> GroupPath {
        self.group(GroupKind::Owners)
    }

    pub fn composite(&self) -> GroupPath {
        self.group(GroupKind::Composite)
    }
}

impl fmt::Display for GroupingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<GroupingPath> for GroupingPath {
    fn as_ref(&self) -> &GroupingPath {
        self
    }
}

/// Full path of one group that belongs to a grouping
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupPath {
    pub grouping: GroupingPath,
    pub kind: GroupKind,
}

impl GroupPath {
    /// Split a full group path into its grouping and kind.
    ///
    /// Paths without a known suffix are taken to be composite (grouping) paths.
    pub fn parse(path: &str) -> Result<Self, GroupingsError> {
        for kind in GroupKind::SUFFIXED {
            if let Some(prefix) = path.strip_suffix(kind.suffix()) {
                return Ok(GroupingPath::new(prefix)?.group(kind));
            }
        }
        Ok(GroupingPath::new(path)?.composite())
    }

    pub fn opposite(&self) -> Option<GroupPath> {
        self.kind.opposite().map(|kind| self.grouping.group(kind))
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.grouping, self.kind.suffix())
    }
}

impl AsRef<GroupingPath> for GroupPath {
    fn as_ref(&self) -> &GroupingPath {
        &self.grouping
    }
}
