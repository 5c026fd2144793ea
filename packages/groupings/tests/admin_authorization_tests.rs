//! Admin/owner management and authorization of privileged operations
//!
//! Every privileged operation gets checked three ways where it applies:
//! 1. as admin it succeeds
//! 2. as the grouping's owner it succeeds (grouping-scoped operations only)
//! 3. as anyone else it fails with "Insufficient Privileges" and writes nothing

mod common;

use crate::common::*;
use groupings_core::common::{
    GroupingsError, INSUFFICIENT_PRIVILEGES, SUCCESS, SUCCESS_ALREADY_EXISTED,
    SUCCESS_WASNT_IMMEDIATE,
};
use groupings_core::DEFAULT_ADMINS_GROUP;
use test_context::test_context;

fn assert_denied<T: std::fmt::Debug>(result: Result<T, GroupingsError>) {
    let err = result.expect_err("expected access denied");
    assert!(err.is_access_denied(), "unexpected error: {:?}", err);
    assert_eq!(err.to_string(), INSUFFICIENT_PRIVILEGES);
}

// ============================================================================
// Admins
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn add_admin_twice_succeeds_both_times(ctx: &TestHarness) {
    let first = ctx.service.add_admin(ADMIN, USERS[0]).await.unwrap();
    assert_eq!(first.result_code, SUCCESS);

    let second = ctx.service.add_admin(ADMIN, USERS[0]).await.unwrap();
    assert!(second.is_success());
    assert_eq!(second.result_code, SUCCESS_ALREADY_EXISTED);

    assert_eq!(
        ctx.directory.usernames_in(DEFAULT_ADMINS_GROUP),
        vec![ADMIN, USERS[0]]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_non_admin_succeeds(ctx: &TestHarness) {
    let result = ctx.service.delete_admin(ADMIN, USERS[0]).await.unwrap();
    assert!(result.is_success());
    assert_eq!(result.result_code, SUCCESS_WASNT_IMMEDIATE);

    ctx.service.add_admin(ADMIN, USERS[0]).await.unwrap();
    let result = ctx.service.delete_admin(ADMIN, USERS[0]).await.unwrap();
    assert_eq!(result.result_code, SUCCESS);
    assert!(!ctx.directory.contains(DEFAULT_ADMINS_GROUP, USERS[0]));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn new_admin_gains_privileges_immediately(ctx: &TestHarness) {
    assert_denied(ctx.service.add_admin(USERS[0], USERS[1]).await);

    ctx.service.add_admin(ADMIN, USERS[0]).await.unwrap();
    let result = ctx.service.add_admin(USERS[0], USERS[1]).await.unwrap();
    assert!(result.is_success());

    ctx.service.delete_admin(ADMIN, USERS[0]).await.unwrap();
    assert_denied(ctx.service.add_admin(USERS[0], USERS[2]).await);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn add_unknown_admin_is_failure_result(ctx: &TestHarness) {
    let result = ctx.service.add_admin(ADMIN, "zzzzz").await.unwrap();
    assert!(!result.is_success());
    assert!(result.action.contains("zzzzz"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn owner_cannot_manage_admins(ctx: &TestHarness) {
    ctx.directory.clear_calls();

    assert_denied(ctx.service.add_admin(OWNER, USERS[0]).await);
    assert_denied(ctx.service.delete_admin(OWNER, ADMIN).await);

    assert!(ctx.directory.calls().is_empty());
    assert!(ctx.directory.contains(DEFAULT_ADMINS_GROUP, ADMIN));
}

// ============================================================================
// Owners
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn owner_can_assign_and_remove_owners(ctx: &TestHarness) {
    let g = grouping();
    let owners = g.owners().to_string();

    let result = ctx.service.assign_ownership(OWNER, &g, USERS[0]).await.unwrap();
    assert_eq!(result.result_code, SUCCESS);
    let result = ctx.service.assign_ownership(OWNER, &g, USERS[0]).await.unwrap();
    assert_eq!(result.result_code, SUCCESS_ALREADY_EXISTED);
    assert!(ctx.directory.contains(&owners, USERS[0]));

    // The new owner can manage members straight away
    let results = ctx
        .service
        .add_grouping_members(USERS[0], &g.include(), [USERS[5]])
        .await
        .unwrap();
    assert!(results[0].is_success());

    let result = ctx.service.remove_ownership(ADMIN, &g, USERS[0]).await.unwrap();
    assert_eq!(result.result_code, SUCCESS);
    let result = ctx.service.remove_ownership(ADMIN, &g, USERS[0]).await.unwrap();
    assert_eq!(result.result_code, SUCCESS_WASNT_IMMEDIATE);
    assert!(!ctx.directory.contains(&owners, USERS[0]));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn ownership_is_scoped_to_one_grouping(ctx: &TestHarness) {
    let other = other_grouping();

    // grpowner owns tmp:grouping-test only; outsider owns the other grouping
    assert_denied(
        ctx.service
            .add_grouping_members(OWNER, &other.include(), [USERS[0]])
            .await,
    );
    assert_denied(
        ctx.service
            .add_grouping_members(OUTSIDER, &grouping().include(), [USERS[0]])
            .await,
    );

    let results = ctx
        .service
        .add_grouping_members(OUTSIDER, &other.include(), [USERS[0]])
        .await
        .unwrap();
    assert!(results[0].is_success());
}

// ============================================================================
// Access denied writes nothing
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn non_owner_gets_access_denied_everywhere(ctx: &TestHarness) {
    let g = grouping();
    let include_before = ctx.directory.usernames_in(&g.include().to_string());
    ctx.directory.clear_calls();

    let caller = USERS[5];
    assert_denied(
        ctx.service
            .add_grouping_members(caller, &g.include(), [USERS[5]])
            .await,
    );
    assert_denied(
        ctx.service
            .add_grouping_members(caller, &g.exclude(), [USERS[0]])
            .await,
    );
    assert_denied(
        ctx.service
            .remove_grouping_members(caller, &g.include(), [USERS[0]])
            .await,
    );
    assert_denied(ctx.service.add_admin(caller, caller).await);
    assert_denied(ctx.service.delete_admin(caller, ADMIN).await);
    assert_denied(ctx.service.assign_ownership(caller, &g, caller).await);
    assert_denied(ctx.service.remove_ownership(caller, &g, OWNER).await);
    assert_denied(ctx.service.change_opt_in_status(caller, &g, true).await);
    assert_denied(ctx.service.change_opt_out_status(caller, &g, true).await);
    assert_denied(ctx.service.change_listserv_status(caller, &g, true).await);
    assert_denied(ctx.service.get_grouping(caller, &g).await);
    assert_denied(ctx.service.get_membership_results(caller, USERS[0]).await);

    assert!(ctx.directory.calls().is_empty());
    assert_eq!(
        ctx.directory.usernames_in(&g.include().to_string()),
        include_before
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_actor_is_denied(ctx: &TestHarness) {
    assert_denied(
        ctx.service
            .add_grouping_members("nobody-at-all", &grouping().include(), [USERS[5]])
            .await,
    );
    assert_denied(ctx.service.add_admin("nobody-at-all", USERS[5]).await);
}

#[tokio::test]
async fn store_failure_during_check_is_not_a_denial() {
    let ctx = TestHarness::with_directory(
        seeded_directory().failing_group(DEFAULT_ADMINS_GROUP),
    );

    let err = ctx
        .service
        .add_admin(ADMIN, USERS[0])
        .await
        .expect_err("admins group is unreachable");

    assert!(matches!(err, GroupingsError::Store(_)));
}
