//! Test fixtures: a directory seeded like a small real grouping.
//!
//! Layout of `tmp:grouping-test`:
//! - basis:   iamtst04, iamtst05
//! - include: iamtst01, iamtst02, iamtst03
//! - exclude: (empty)
//! - owners:  grpowner
//!
//! `grpadmin` is the only admin; `iamtst06` and `outsider` are known people
//! with no relation to the grouping.

use groupings_core::common::PersonId;
use groupings_core::domains::grouping::{switch_value, GroupingPath};
use groupings_core::kernel::{AttributeKey, AttributeSubject, InMemoryDirectory};
use groupings_core::DEFAULT_ADMINS_GROUP;

pub const GROUPING: &str = "tmp:grouping-test";
pub const OTHER_GROUPING: &str = "tmp:grouping-other";

pub const ADMIN: &str = "grpadmin";
pub const OWNER: &str = "grpowner";
pub const OUTSIDER: &str = "outsider";

pub const USERS: [&str; 6] = [
    "iamtst01", "iamtst02", "iamtst03", "iamtst04", "iamtst05", "iamtst06",
];

pub fn grouping() -> GroupingPath {
    GroupingPath::new(GROUPING).expect("valid grouping path")
}

pub fn other_grouping() -> GroupingPath {
    GroupingPath::new(OTHER_GROUPING).expect("valid grouping path")
}

/// Directory with the standard layout and every switch turned off.
pub fn seeded_directory() -> InMemoryDirectory {
    let g = grouping();
    let mut directory = InMemoryDirectory::new()
        .with_person(ADMIN, "Groupings Admin")
        .with_person(OWNER, "Grouping Owner")
        .with_person(OUTSIDER, "Out Sider");

    for (i, username) in USERS.iter().enumerate() {
        directory = directory.with_person(username, &format!("Test User {}", i + 1));
    }

    directory
        .with_members(DEFAULT_ADMINS_GROUP, &[ADMIN])
        .with_members(g.owners().to_string(), &[OWNER])
        .with_members(g.basis().to_string(), &[USERS[3], USERS[4]])
        .with_members(g.include().to_string(), &[USERS[0], USERS[1], USERS[2]])
        .with_members(other_grouping().owners().to_string(), &[OUTSIDER])
}

/// Turn a grouping switch on at seed time.
pub fn enable(directory: InMemoryDirectory, key: AttributeKey) -> InMemoryDirectory {
    directory.with_attribute(AttributeSubject::group(GROUPING), key, switch_value(true))
}

pub fn self_opted_subject(group: &str, person: PersonId) -> AttributeSubject {
    AttributeSubject::membership(group, person)
}
