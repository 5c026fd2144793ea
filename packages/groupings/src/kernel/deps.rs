//! Groupings dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by all membership
//! activities. Every external service is reached through a trait object so the
//! directory web service can be swapped for the in-memory fakes in tests.

use std::sync::Arc;

use crate::common::auth::HasAuthContext;
use crate::config::GroupingsConfig;
use crate::kernel::{BaseAttributeStore, BaseGroupMembershipStore, BaseIdentityResolver};

// =============================================================================
// GroupingsDeps
// =============================================================================

/// Dependencies accessible to activities
#[derive(Clone)]
pub struct GroupingsDeps {
    pub membership_store: Arc<dyn BaseGroupMembershipStore>,
    pub attribute_store: Arc<dyn BaseAttributeStore>,
    pub identity: Arc<dyn BaseIdentityResolver>,
    pub config: GroupingsConfig,
}

impl GroupingsDeps {
    /// Create new GroupingsDeps with the given dependencies
    pub fn new(
        membership_store: Arc<dyn BaseGroupMembershipStore>,
        attribute_store: Arc<dyn BaseAttributeStore>,
        identity: Arc<dyn BaseIdentityResolver>,
        config: GroupingsConfig,
    ) -> Self {
        Self {
            membership_store,
            attribute_store,
            identity,
            config,
        }
    }
}

/// Implement HasAuthContext for GroupingsDeps to enable authorization checks
impl HasAuthContext for GroupingsDeps {
    fn membership_store(&self) -> &dyn BaseGroupMembershipStore {
        self.membership_store.as_ref()
    }

    fn identity_resolver(&self) -> &dyn BaseIdentityResolver {
        self.identity.as_ref()
    }

    fn admins_group(&self) -> &str {
        &self.config.admins_group
    }
}
