//! `PostgreSQL` integration tests for user storage.

use super::helpers::{BoxError, TestDatabase, test_runtime};
use crate::test_helpers::SharedClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taskmaster::intern::{
    domain::{ApprovalStatus, EmailAddress, User},
    ports::{UserRepository, UserRepositoryError},
};

#[rstest]
fn users_round_trip_and_filter_by_approval(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    let repository = database.user_repository();
    let clock = SharedClock::new();

    let admin = User::new_admin("Grace", EmailAddress::new("grace@example.com")?, &clock)?;
    let mut approved =
        User::register_intern("Alice", EmailAddress::new("alice@example.com")?, &clock)?;
    let waiting = User::register_intern("Bob", EmailAddress::new("bob@example.com")?, &clock)?;

    test_runtime()?.block_on(async {
        for user in [&admin, &approved, &waiting] {
            repository.store(user).await?;
        }
        approved.approve(&clock)?;
        repository.update(&approved).await?;

        assert_eq!(repository.find_by_id(approved.id()).await?, Some(approved.clone()));
        let interns = repository.list_interns(None).await?;
        assert_eq!(interns.len(), 2);
        let only_approved = repository
            .list_interns(Some(ApprovalStatus::Approved))
            .await?;
        assert_eq!(only_approved, vec![approved]);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn duplicate_email_is_reported(shared_test_cluster: &'static TestCluster) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    let repository = database.user_repository();
    let clock = SharedClock::new();
    let first = User::register_intern("Cleo", EmailAddress::new("cleo@example.com")?, &clock)?;
    let second = User::register_intern("Cleo B", EmailAddress::new("cleo@example.com")?, &clock)?;

    let result = test_runtime()?.block_on(async {
        repository.store(&first).await?;
        Ok::<_, BoxError>(repository.store(&second).await)
    })?;

    assert!(matches!(result, Err(UserRepositoryError::DuplicateEmail(_))));
    Ok(())
}

#[rstest]
fn updating_a_missing_user_is_not_found(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    let repository = database.user_repository();
    let ghost = User::register_intern(
        "Ghost",
        EmailAddress::new("ghost@example.com")?,
        &SharedClock::new(),
    )?;

    let result = test_runtime()?.block_on(repository.update(&ghost));

    assert!(matches!(result, Err(UserRepositoryError::NotFound(id)) if id == ghost.id()));
    Ok(())
}
