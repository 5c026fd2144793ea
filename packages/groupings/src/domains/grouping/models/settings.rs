use anyhow::Result;
use futures::try_join;
use serde::{Deserialize, Serialize};

use super::grouping::{GroupKind, GroupingPath};
use crate::kernel::{AttributeKey, AttributeSubject, BaseAttributeStore};

/// Per-grouping switches, read from the grouping's attribute assignments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingSettings {
    pub opt_in: bool,
    pub opt_out: bool,
    pub listserv: bool,
}

impl GroupingSettings {
    /// Read all switches for a grouping. Missing assignments mean disabled.
    pub async fn load(grouping: &GroupingPath, store: &dyn BaseAttributeStore) -> Result<Self> {
        let subject = AttributeSubject::group(grouping.as_str());

        let (opt_in, opt_out, listserv) = try_join!(
            store.get_attribute(&subject, AttributeKey::OptIn),
            store.get_attribute(&subject, AttributeKey::OptOut),
            store.get_attribute(&subject, AttributeKey::Listserv),
        )?;

        Ok(Self {
            opt_in: is_enabled(opt_in.as_deref()),
            opt_out: is_enabled(opt_out.as_deref()),
            listserv: is_enabled(listserv.as_deref()),
        })
    }

    /// Whether a person may put themselves into the given manual path.
    pub fn allows_self_opt(&self, target: GroupKind) -> bool {
        match target {
            GroupKind::Include => self.opt_in,
            GroupKind::Exclude => self.opt_out,
            _ => false,
        }
    }
}

/// Encode a switch the way `load` reads it back.
pub fn switch_value(enabled: bool) -> &'static str {
    if enabled {
        "true"
    } else {
        "false"
    }
}

fn is_enabled(value: Option<&str>) -> bool {
    matches!(value, Some(v) if v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_enabled() {
        assert!(is_enabled(Some("true")));
        assert!(is_enabled(Some("TRUE")));
        assert!(!is_enabled(Some("false")));
        assert!(!is_enabled(None));
    }

    #[test]
    fn test_allows_self_opt() {
        let settings = GroupingSettings {
            opt_in: true,
            opt_out: false,
            listserv: false,
        };
        assert!(settings.allows_self_opt(GroupKind::Include));
        assert!(!settings.allows_self_opt(GroupKind::Exclude));
        assert!(!settings.allows_self_opt(GroupKind::Basis));
    }
}
