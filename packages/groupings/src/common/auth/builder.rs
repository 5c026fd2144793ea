use tracing::{debug, warn};

use super::{AuthError, GroupingCapability};
use crate::common::Person;
use crate::domains::grouping::GroupingPath;
use crate::kernel::{BaseGroupMembershipStore, BaseIdentityResolver};

/// Entry point for authorization checks
///
/// Usage:
/// ```ignore
/// let actor = Actor::new("iamtst01")
///     .can(GroupingCapability::ManageAdmins)
///     .check(deps)
///     .await?;
/// ```
pub struct Actor {
    identifier: String,
}

impl Actor {
    /// Create a new actor for authorization checks
    ///
    /// # Arguments
    /// * `identifier` - Username or stable id of the caller, already authenticated upstream
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: GroupingCapability) -> CapabilityBuilder {
        CapabilityBuilder {
            identifier: self.identifier,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    identifier: String,
    capability: GroupingCapability,
}

impl CapabilityBuilder {
    /// Perform the authorization check, returning the resolved actor
    pub async fn check<D>(self, deps: &D) -> Result<Person, AuthError>
    where
        D: HasAuthContext + ?Sized,
    {
        check_permission(&self.identifier, &self.capability, deps).await
    }
}

/// Trait for dependencies that can perform auth checks
pub trait HasAuthContext: Send + Sync {
    fn membership_store(&self) -> &dyn BaseGroupMembershipStore;
    fn identity_resolver(&self) -> &dyn BaseIdentityResolver;
    fn admins_group(&self) -> &str;
}

/// Owner of `grouping`, or admin.
pub async fn check_is_owner_or_admin<D>(
    actor: &str,
    grouping: &GroupingPath,
    deps: &D,
) -> Result<Person, AuthError>
where
    D: HasAuthContext + ?Sized,
{
    Actor::new(actor)
        .can(GroupingCapability::ManageGrouping(grouping.clone()))
        .check(deps)
        .await
}

/// Admin only.
pub async fn check_is_admin<D>(actor: &str, deps: &D) -> Result<Person, AuthError>
where
    D: HasAuthContext + ?Sized,
{
    Actor::new(actor)
        .can(GroupingCapability::ManageAdmins)
        .check(deps)
        .await
}

/// The target person themselves, or admin.
pub async fn check_is_self_or_admin<D>(
    actor: &str,
    target: &str,
    deps: &D,
) -> Result<Person, AuthError>
where
    D: HasAuthContext + ?Sized,
{
    Actor::new(actor)
        .can(GroupingCapability::ViewMemberships(target.to_string()))
        .check(deps)
        .await
}

/// The target person themselves. Admins get no exception here.
pub async fn check_is_self<D>(actor: &str, target: &str, deps: &D) -> Result<Person, AuthError>
where
    D: HasAuthContext + ?Sized,
{
    Actor::new(actor)
        .can(GroupingCapability::ActAs(target.to_string()))
        .check(deps)
        .await
}

/// Core permission check function
///
/// Every check re-reads the admins and owners groups. An actor the identity
/// system does not know holds no capability at all.
async fn check_permission<D>(
    identifier: &str,
    capability: &GroupingCapability,
    deps: &D,
) -> Result<Person, AuthError>
where
    D: HasAuthContext + ?Sized,
{
    let Some(actor) = deps.identity_resolver().lookup(identifier).await? else {
        warn!(actor = identifier, ?capability, "Unknown actor denied");
        return Err(AuthError::InsufficientPrivileges);
    };

    if capability.granted_to_admin()
        && deps
            .membership_store()
            .is_member(deps.admins_group(), &actor.id)
            .await?
    {
        debug!(actor = %actor.username, ?capability, "Granted as admin");
        return Ok(actor);
    }

    let granted = match capability {
        GroupingCapability::ManageGrouping(grouping) => {
            deps.membership_store()
                .is_member(&grouping.owners().to_string(), &actor.id)
                .await?
        }
        GroupingCapability::ManageAdmins => false,
        GroupingCapability::ActAs(target) | GroupingCapability::ViewMemberships(target) => {
            is_same_person(&actor, target, deps).await?
        }
    };

    if !granted {
        warn!(actor = %actor.username, ?capability, "Insufficient privileges");
        return Err(AuthError::InsufficientPrivileges);
    }

    Ok(actor)
}

async fn is_same_person<D>(actor: &Person, target: &str, deps: &D) -> Result<bool, AuthError>
where
    D: HasAuthContext + ?Sized,
{
    if actor.username == target {
        return Ok(true);
    }
    let target = deps.identity_resolver().lookup(target).await?;
    Ok(target.is_some_and(|t| t.id == actor.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ADMINS_GROUP;
    use crate::kernel::{InMemoryDirectory, TestDependencies};

    fn grouping() -> GroupingPath {
        GroupingPath::new("tmp:grouping-many").unwrap()
    }

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new()
            .with_members(DEFAULT_ADMINS_GROUP, &["admin"])
            .with_members("tmp:grouping-many:owners", &["owner"])
            .with_person("stranger", "Stranger")
    }

    #[tokio::test]
    async fn test_admin_passes_every_grouping_check() {
        let deps = TestDependencies::new().directory(directory()).into_deps();

        let actor = check_is_owner_or_admin("admin", &grouping(), deps.as_ref())
            .await
            .unwrap();
        assert_eq!(actor.username, "admin");
        assert!(check_is_admin("admin", deps.as_ref()).await.is_ok());
    }

    #[tokio::test]
    async fn test_owner_passes_only_for_own_grouping() {
        let deps = TestDependencies::new().directory(directory()).into_deps();
        let other = GroupingPath::new("tmp:other").unwrap();

        assert!(check_is_owner_or_admin("owner", &grouping(), deps.as_ref())
            .await
            .is_ok());
        assert!(matches!(
            check_is_owner_or_admin("owner", &other, deps.as_ref()).await,
            Err(AuthError::InsufficientPrivileges)
        ));
        assert!(matches!(
            check_is_admin("owner", deps.as_ref()).await,
            Err(AuthError::InsufficientPrivileges)
        ));
    }

    #[tokio::test]
    async fn test_unknown_actor_rejected() {
        let deps = TestDependencies::new().directory(directory()).into_deps();

        let result = check_is_owner_or_admin("zzzz", &grouping(), deps.as_ref()).await;
        assert!(matches!(result, Err(AuthError::InsufficientPrivileges)));
        assert_eq!(
            result.unwrap_err().to_string(),
            super::super::INSUFFICIENT_PRIVILEGES
        );
    }

    #[tokio::test]
    async fn test_act_as_requires_same_person_even_for_admin() {
        let deps = TestDependencies::new().directory(directory()).into_deps();

        let stranger = deps.identity.lookup("stranger").await.unwrap().unwrap();
        let by_id = Actor::new("stranger")
            .can(GroupingCapability::ActAs(stranger.id.to_string()))
            .check(deps.as_ref())
            .await;
        assert!(by_id.is_ok());

        let admin_for_other = Actor::new("admin")
            .can(GroupingCapability::ActAs("stranger".to_string()))
            .check(deps.as_ref())
            .await;
        assert!(matches!(admin_for_other, Err(AuthError::InsufficientPrivileges)));
    }

    #[tokio::test]
    async fn test_view_memberships_self_or_admin() {
        let deps = TestDependencies::new().directory(directory()).into_deps();

        let own = Actor::new("stranger")
            .can(GroupingCapability::ViewMemberships("stranger".to_string()))
            .check(deps.as_ref())
            .await;
        assert!(own.is_ok());

        let admin = Actor::new("admin")
            .can(GroupingCapability::ViewMemberships("stranger".to_string()))
            .check(deps.as_ref())
            .await;
        assert!(admin.is_ok());

        let other = Actor::new("owner")
            .can(GroupingCapability::ViewMemberships("stranger".to_string()))
            .check(deps.as_ref())
            .await;
        assert!(matches!(other, Err(AuthError::InsufficientPrivileges)));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_a_denial() {
        let deps = TestDependencies::new()
            .directory(directory().failing_group(DEFAULT_ADMINS_GROUP))
            .into_deps();

        let result = check_is_admin("admin", deps.as_ref()).await;
        assert!(matches!(result, Err(AuthError::InternalError(_))));
    }
}
