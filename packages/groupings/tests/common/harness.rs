//! Test harness over the in-memory directory.
//!
//! Every test gets its own directory, so tests never see each other's writes.

use std::sync::Arc;

use groupings_core::kernel::{InMemoryDirectory, TestDependencies};
use groupings_core::{GroupingsConfig, MembershipService};
use test_context::AsyncTestContext;

use super::fixtures::seeded_directory;

/// Test harness holding the service and the directory behind it.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let results = ctx.service.add_grouping_members(ADMIN, &path, ["iamtst06"]).await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub service: MembershipService,
    /// Same directory the service writes to; use it to seed and inspect.
    pub directory: Arc<InMemoryDirectory>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::with_directory(seeded_directory())
    }

    async fn teardown(self) {
        // Directory is dropped with the harness
    }
}

impl TestHarness {
    pub fn with_directory(directory: InMemoryDirectory) -> Self {
        Self::with_config(directory, GroupingsConfig::default())
    }

    pub fn with_config(directory: InMemoryDirectory, config: GroupingsConfig) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = TestDependencies::new().directory(directory).config(config);
        let directory = deps.directory.clone();

        Self {
            service: deps.into_service(),
            directory,
        }
    }
}
