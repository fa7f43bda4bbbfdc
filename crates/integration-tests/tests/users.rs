//! User operation behavior against a real `SQLite` file.

#![allow(clippy::unwrap_used)]

use secrecy::ExposeSecret;

use userctl_core::Page;
use userctl_integration_tests::TestStore;
use userctl_store::services::users;
use userctl_store::services::{
    ChangeEmailOutcome, CreateOutcome, DeleteOutcome, ListingScope, LookupOutcome,
};
use userctl_store::{RepositoryError, Store, UserRepository};

async fn create(store: &Store, username: &str, email: &str, password: &str) {
    let outcome = users::create_user(store, username, email, password)
        .await
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Created(_)), "{outcome}");
}

async fn lookup(store: &Store, username: &str) -> Option<userctl_core::User> {
    match users::get_user(store, username).await.unwrap() {
        LookupOutcome::Found(user) => Some(user),
        LookupOutcome::NotFound { .. } => None,
    }
}

async fn usernames(store: &Store, page: Page) -> Vec<String> {
    users::list_users(store, page)
        .await
        .unwrap()
        .users
        .into_iter()
        .map(|u| u.username)
        .collect()
}

// ============================================================================
// initialize
// ============================================================================

#[tokio::test]
async fn test_initialize_leaves_only_bob() {
    let test = TestStore::initialized().await;

    let all = users::get_all_users(&test.store).await.unwrap();
    assert_eq!(all.users.len(), 1);
    assert_eq!(all.users[0].username, "bob");
    assert_eq!(all.users[0].email, "bob@mail.com");
    assert_eq!(all.users[0].password.expose_secret(), "bobpass");
}

#[tokio::test]
async fn test_initialize_is_destructive_and_repeatable() {
    let test = TestStore::initialized().await;
    create(&test.store, "a", "a@x.com", "p").await;

    let outcome = users::initialize_schema(&test.store).await.unwrap();
    assert_eq!(outcome.to_string(), "Database Initialized");
    assert_eq!(outcome.seed.id.as_i64(), 1);

    let all = users::get_all_users(&test.store).await.unwrap();
    assert_eq!(all.users.len(), 1);
    assert!(lookup(&test.store, "a").await.is_none());
}

#[tokio::test]
async fn test_failed_initialize_keeps_existing_rows() {
    let test = TestStore::initialized().await;
    create(&test.store, "a", "a@x.com", "p").await;
    let read_only = test.connect_read_only().await;

    let result = users::initialize_schema(&read_only).await;
    assert!(matches!(result, Err(RepositoryError::Database(_))));
    read_only.close().await;

    let names: Vec<String> = users::get_all_users(&test.store)
        .await
        .unwrap()
        .users
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, ["bob", "a"]);
}

// ============================================================================
// create_user
// ============================================================================

#[tokio::test]
async fn test_create_user_conflict_leaves_first_row() {
    let test = TestStore::without_users().await;

    create(&test.store, "a", "a@x.com", "p").await;
    let second = users::create_user(&test.store, "a", "b@x.com", "q")
        .await
        .unwrap();
    assert!(matches!(second, CreateOutcome::Conflict));

    let all = users::get_all_users(&test.store).await.unwrap();
    assert_eq!(all.users.len(), 1);
    let a = &all.users[0];
    assert_eq!(a.username, "a");
    assert_eq!(a.email, "a@x.com");
    assert_eq!(a.password.expose_secret(), "p");
}

#[tokio::test]
async fn test_create_user_conflict_on_email_only() {
    let test = TestStore::initialized().await;

    let outcome = users::create_user(&test.store, "robert", "bob@mail.com", "p")
        .await
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Conflict));
    assert!(lookup(&test.store, "robert").await.is_none());
}

#[tokio::test]
async fn test_create_user_assigns_increasing_ids() {
    let test = TestStore::initialized().await;

    let CreateOutcome::Created(a) = users::create_user(&test.store, "a", "a@x.com", "p")
        .await
        .unwrap()
    else {
        panic!("expected a to be created");
    };
    let CreateOutcome::Created(b) = users::create_user(&test.store, "b", "b@x.com", "p")
        .await
        .unwrap()
    else {
        panic!("expected b to be created");
    };
    assert!(a.id < b.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_racing_creates_from_separate_pools_yield_one_conflict() {
    let test = TestStore::without_users().await;
    let first = test.store.clone();
    let second = test.connect_again().await;

    for round in 0..10 {
        let username = format!("racer{round}");
        let (a, b) = tokio::join!(
            tokio::spawn({
                let store = first.clone();
                let username = username.clone();
                async move {
                    users::create_user(&store, &username, &format!("{username}-a@x.com"), "p")
                        .await
                }
            }),
            tokio::spawn({
                let store = second.clone();
                let username = username.clone();
                async move {
                    users::create_user(&store, &username, &format!("{username}-b@x.com"), "q")
                        .await
                }
            }),
        );
        let outcomes = [a.unwrap().unwrap(), b.unwrap().unwrap()];

        let created = outcomes
            .iter()
            .filter(|o| matches!(o, CreateOutcome::Created(_)))
            .count();
        let conflicts = outcomes
            .iter()
            .filter(|o| matches!(o, CreateOutcome::Conflict))
            .count();
        assert_eq!((created, conflicts), (1, 1), "round {round}");
    }

    assert_eq!(users::get_all_users(&second).await.unwrap().users.len(), 10);
    second.close().await;
}

// ============================================================================
// get_user / change_email / delete_user
// ============================================================================

#[tokio::test]
async fn test_get_user_missing_is_empty() {
    let test = TestStore::initialized().await;
    let outcome = users::get_user(&test.store, "ghost").await.unwrap();
    assert!(matches!(outcome, LookupOutcome::NotFound { ref username } if username == "ghost"));
}

#[tokio::test]
async fn test_get_user_is_exact_match() {
    let test = TestStore::initialized().await;
    assert!(lookup(&test.store, "bo").await.is_none());
    assert!(lookup(&test.store, "Bob").await.is_none());
    assert!(lookup(&test.store, "bob").await.is_some());
}

#[tokio::test]
async fn test_change_email_only_touches_email() {
    let test = TestStore::without_users().await;
    create(&test.store, "a", "a@x.com", "p").await;
    let before = lookup(&test.store, "a").await.unwrap();

    let outcome = users::change_email(&test.store, "a", "new@x.com")
        .await
        .unwrap();
    assert!(matches!(outcome, ChangeEmailOutcome::Updated(_)));

    let after = lookup(&test.store, "a").await.unwrap();
    assert_eq!(after.email, "new@x.com");
    assert_eq!(after.id, before.id);
    assert_eq!(after.username, "a");
    assert_eq!(after.password.expose_secret(), "p");
}

#[tokio::test]
async fn test_change_email_missing_user() {
    let test = TestStore::initialized().await;
    let outcome = users::change_email(&test.store, "ghost", "g@x.com")
        .await
        .unwrap();
    assert!(matches!(outcome, ChangeEmailOutcome::NotFound { .. }));
}

#[tokio::test]
async fn test_change_email_to_taken_address_is_rolled_back() {
    let test = TestStore::initialized().await;
    create(&test.store, "a", "a@x.com", "p").await;

    let outcome = users::change_email(&test.store, "a", "bob@mail.com")
        .await
        .unwrap();
    assert!(matches!(outcome, ChangeEmailOutcome::EmailTaken { ref email } if email == "bob@mail.com"));
    assert_eq!(lookup(&test.store, "a").await.unwrap().email, "a@x.com");
}

#[tokio::test]
async fn test_delete_user_then_lookup_is_empty() {
    let test = TestStore::without_users().await;
    create(&test.store, "a", "a@x.com", "p").await;

    let outcome = users::delete_user(&test.store, "a").await.unwrap();
    assert!(matches!(outcome, DeleteOutcome::Deleted { .. }));
    assert!(lookup(&test.store, "a").await.is_none());

    let again = users::delete_user(&test.store, "a").await.unwrap();
    assert!(matches!(again, DeleteOutcome::NotFound { .. }));
}

// ============================================================================
// get_all_users / search_users / list_users
// ============================================================================

#[tokio::test]
async fn test_get_all_users_empty() {
    let test = TestStore::without_users().await;
    let all = users::get_all_users(&test.store).await.unwrap();
    assert!(all.is_empty());
    assert_eq!(all.scope, ListingScope::All);
    assert_eq!(all.to_string(), "No users found");
}

#[tokio::test]
async fn test_search_matches_username_or_email_case_sensitively() {
    let test = TestStore::initialized().await;
    create(&test.store, "alice", "alice@x.com", "p").await;
    create(&test.store, "x.com-fan", "fan@mail.com", "p").await;
    create(&test.store, "carol", "carol@X.COM", "p").await;

    let found: Vec<String> = users::search_users(&test.store, "x.com")
        .await
        .unwrap()
        .users
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(found, ["alice", "x.com-fan"]);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let test = TestStore::initialized().await;
    create(&test.store, "under_score", "u@x.com", "p").await;

    let percent = users::search_users(&test.store, "%").await.unwrap();
    assert!(percent.is_empty());

    let underscore = users::search_users(&test.store, "_").await.unwrap();
    assert_eq!(underscore.users.len(), 1);
    assert_eq!(underscore.users[0].username, "under_score");
}

#[tokio::test]
async fn test_search_no_match_message() {
    let test = TestStore::initialized().await;
    let outcome = users::search_users(&test.store, "zzz").await.unwrap();
    assert!(outcome.is_empty());
    assert_eq!(outcome.to_string(), "No users found matching 'zzz'");
}

#[tokio::test]
async fn test_list_users_window_in_insertion_order() {
    let test = TestStore::without_users().await;
    for name in ["u1", "u2", "u3", "u4", "u5"] {
        create(&test.store, name, &format!("{name}@x.com"), "p").await;
    }

    assert_eq!(usernames(&test.store, Page::new(2, 1)).await, ["u2", "u3"]);
    assert_eq!(
        usernames(&test.store, Page::default()).await,
        ["u1", "u2", "u3", "u4", "u5"]
    );
    assert_eq!(usernames(&test.store, Page::new(10, 4)).await, ["u5"]);
    assert!(usernames(&test.store, Page::new(0, 0)).await.is_empty());
}

#[tokio::test]
async fn test_list_users_past_end_is_empty() {
    let test = TestStore::initialized().await;
    let outcome = users::list_users(&test.store, Page::new(10, 1)).await.unwrap();
    assert!(outcome.is_empty());
    assert_eq!(outcome.to_string(), "No users found.");
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_uncommitted_session_writes_are_discarded() {
    let test = TestStore::initialized().await;
    {
        let mut session = test.store.session().await.unwrap();
        let mut repo = UserRepository::new(&mut session);
        repo.create(&userctl_core::NewUser::new("a", "a@x.com", "p"))
            .await
            .unwrap();
        assert!(repo.get_by_username("a").await.unwrap().is_some());
    }
    assert!(lookup(&test.store, "a").await.is_none());
}

#[tokio::test]
async fn test_operations_on_missing_table_fail() {
    let test = TestStore::empty().await;
    assert!(users::get_all_users(&test.store).await.is_err());
    assert!(users::create_user(&test.store, "a", "a@x.com", "p").await.is_err());
}
