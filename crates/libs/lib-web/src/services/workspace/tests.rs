use super::*;
use crate::test_utils::{count_rows, create_user, identity_of, setup_test_db};
use lib_core::model::store::models::UserForCreate;
use lib_core::model::store::UserRepository;

/// Pool over a fresh database file, built the way the server builds its pool.
async fn file_backed_pool(dir: &tempfile::TempDir) -> DbPool {
    let url = format!("sqlite:{}", dir.path().join("huddle.db").display());
    let pool = lib_core::create_pool(&url).await.expect("file-backed pool");
    lib_core::run_migrations(&pool).await.expect("migrations");
    pool
}

#[tokio::test]
async fn test_create_workspace_writes_workspace_and_admin_membership() {
    let pool = setup_test_db().await;
    let owner = identity_of(&create_user(&pool, "Owner", "owner@example.com", "secret123").await);
    let service = WorkspaceService::new(pool.clone());

    let workspace = service
        .create_workspace(&owner, "Acme", "acme", Some("https://example.com/logo.png".into()))
        .await
        .expect("create should succeed");

    assert_eq!(workspace.name, "Acme");
    assert_eq!(workspace.username, "acme");
    assert_eq!(workspace.logo.as_deref(), Some("https://example.com/logo.png"));
    assert_eq!(workspace.member_count, INITIAL_MEMBER_COUNT);
    assert_eq!(workspace.user_id, owner.user_id);

    let membership = MembershipRepository::find(&pool, &workspace.id, &owner.user_id)
        .await
        .expect("query")
        .expect("founding membership exists");
    assert_eq!(membership.role, MemberRole::Admin);
    assert_eq!(membership.status, MemberStatus::Accepted);
}

#[tokio::test]
async fn test_duplicate_username_is_conflict_and_writes_nothing() {
    let pool = setup_test_db().await;
    let first = identity_of(&create_user(&pool, "First", "first@example.com", "secret123").await);
    let second = identity_of(&create_user(&pool, "Second", "second@example.com", "secret123").await);
    let service = WorkspaceService::new(pool.clone());

    service
        .create_workspace(&first, "Acme", "acme", None)
        .await
        .expect("first create");
    let err = service
        .create_workspace(&second, "Acme Two", "acme", None)
        .await
        .expect_err("second create must fail");

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM workspaces").await, 1);
    assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM workspace_members").await, 1);
    assert_eq!(
        count_rows(
            &pool,
            &format!(
                "SELECT COUNT(*) FROM workspace_members WHERE user_id = '{}'",
                second.user_id
            )
        )
        .await,
        0
    );
}

#[tokio::test]
async fn test_failed_membership_insert_rolls_back_workspace() {
    let pool = setup_test_db().await;
    let owner = identity_of(&create_user(&pool, "Owner", "owner@example.com", "secret123").await);
    let service = WorkspaceService::new(pool.clone());

    // Fault injection: every membership insert aborts after the workspace insert succeeded.
    sqlx::query(
        "CREATE TRIGGER fail_membership_insert BEFORE INSERT ON workspace_members
         BEGIN SELECT RAISE(ABORT, 'injected fault'); END",
    )
    .execute(&pool)
    .await
    .expect("create trigger");

    let err = service
        .create_workspace(&owner, "Acme", "acme", None)
        .await
        .expect_err("membership insert must fail");

    assert!(matches!(err, AppError::Internal(_)));
    assert_eq!(err.user_message(), lib_core::error::INTERNAL_ERROR_MESSAGE);
    assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM workspaces").await, 0);
    assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM workspace_members").await, 0);

    // The username is free again once the fault is gone.
    sqlx::query("DROP TRIGGER fail_membership_insert")
        .execute(&pool)
        .await
        .expect("drop trigger");
    service
        .create_workspace(&owner, "Acme", "acme", None)
        .await
        .expect("create after rollback");
}

#[tokio::test]
async fn test_create_for_unknown_owner_is_internal() {
    let pool = setup_test_db().await;
    let service = WorkspaceService::new(pool.clone());
    let ghost = Identity {
        user_id: "00000000-0000-4000-8000-000000000000".to_string(),
        email: "ghost@example.com".to_string(),
    };

    let err = service
        .create_workspace(&ghost, "Acme", "acme", None)
        .await
        .expect_err("owner must exist");

    assert!(matches!(err, AppError::Internal(_)));
    assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM workspaces").await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_creates_with_same_username_admit_exactly_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = file_backed_pool(&dir).await;

    let alice = identity_of(&create_user(&pool, "Alice", "alice@example.com", "secret123").await);
    let bob = identity_of(&create_user(&pool, "Bob", "bob@example.com", "secret123").await);
    let service = WorkspaceService::new(pool.clone());

    let (a, b) = tokio::join!(
        service.create_workspace(&alice, "Acme by Alice", "acme", None),
        service.create_workspace(&bob, "Acme by Bob", "acme", None),
    );

    let (winner, loser) = match (a, b) {
        (Ok(ws), Err(err)) | (Err(err), Ok(ws)) => (ws, err),
        (a, b) => panic!("expected exactly one success, got {:?} and {:?}", a.map(|w| w.id), b.map(|w| w.id)),
    };

    assert!(matches!(loser, AppError::Conflict(_)), "loser got {:?}", loser);
    assert_eq!(
        count_rows(&pool, "SELECT COUNT(*) FROM workspaces WHERE username = 'acme'").await,
        1
    );
    let members = MembershipRepository::list_by_workspace(&pool, &winner.id)
        .await
        .expect("members");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, winner.user_id);
    assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM workspace_members").await, 1);

    pool.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_by_distinct_users_all_succeed() {
    const JOINERS: usize = 16;

    let dir = tempfile::tempdir().expect("tempdir");
    let pool = file_backed_pool(&dir).await;
    let owner = identity_of(&create_user(&pool, "Owner", "owner@example.com", "secret123").await);
    let service = WorkspaceService::new(pool.clone());
    let workspace = service
        .create_workspace(&owner, "Acme", "acme", None)
        .await
        .expect("create");

    let mut joiners = Vec::with_capacity(JOINERS);
    for i in 0..JOINERS {
        // Digest content is irrelevant here; skipping argon2 keeps setup fast.
        let user = UserRepository::create(
            &pool,
            UserForCreate::new(
                format!("Joiner {}", i),
                format!("joiner{}@example.com", i),
                "not-a-real-digest".to_string(),
            ),
        )
        .await
        .expect("create user");
        joiners.push(identity_of(&user));
    }

    let handles: Vec<_> = joiners
        .into_iter()
        .map(|joiner| {
            let service = service.clone();
            let workspace_id = workspace.id.clone();
            tokio::spawn(async move { service.join_workspace(&joiner, &workspace_id).await })
        })
        .collect();

    let mut failures = Vec::new();
    for handle in handles {
        if let Err(err) = handle.await.expect("join task") {
            failures.push(err);
        }
    }

    assert!(failures.is_empty(), "joins failed: {:?}", failures);
    assert_eq!(
        count_rows(
            &pool,
            "SELECT COUNT(*) FROM workspace_members WHERE status = 'pending'"
        )
        .await,
        JOINERS as i64
    );
    assert_eq!(
        count_rows(&pool, "SELECT COUNT(*) FROM workspace_members").await,
        JOINERS as i64 + 1
    );

    pool.close().await;
}

#[tokio::test]
async fn test_unique_violation_on_other_column_is_not_reported_as_taken_username() {
    let pool = setup_test_db().await;
    let owner = identity_of(&create_user(&pool, "Owner", "owner@example.com", "secret123").await);
    let service = WorkspaceService::new(pool.clone());

    // An extra unique constraint that has nothing to do with the username.
    sqlx::query("CREATE UNIQUE INDEX workspaces_name_unique ON workspaces (name)")
        .execute(&pool)
        .await
        .expect("create index");

    service
        .create_workspace(&owner, "Acme", "acme", None)
        .await
        .expect("first create");
    let err = service
        .create_workspace(&owner, "Acme", "acme-two", None)
        .await
        .expect_err("duplicate name must fail");

    assert!(matches!(err, AppError::Internal(_)), "got {:?}", err);
    assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM workspaces").await, 1);
    assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM workspace_members").await, 1);

    let taken = service
        .create_workspace(&owner, "Acme Again", "acme", None)
        .await
        .expect_err("username is taken");
    assert!(matches!(taken, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_join_missing_workspace_is_not_found() {
    let pool = setup_test_db().await;
    let user = identity_of(&create_user(&pool, "Bob", "bob@example.com", "secret123").await);
    let service = WorkspaceService::new(pool.clone());

    let err = service
        .join_workspace(&user, "6f1d7a4e-2b7c-4c1e-9a53-0d3f1c2b4a5e")
        .await
        .expect_err("workspace does not exist");

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(count_rows(&pool, "SELECT COUNT(*) FROM workspace_members").await, 0);
}

#[tokio::test]
async fn test_join_creates_pending_member_once() {
    let pool = setup_test_db().await;
    let owner = identity_of(&create_user(&pool, "Owner", "owner@example.com", "secret123").await);
    let joiner = identity_of(&create_user(&pool, "Bob", "bob@example.com", "secret123").await);
    let service = WorkspaceService::new(pool.clone());
    let workspace = service
        .create_workspace(&owner, "Acme", "acme", None)
        .await
        .expect("create");

    service
        .join_workspace(&joiner, &workspace.id)
        .await
        .expect("join");

    let membership = MembershipRepository::find(&pool, &workspace.id, &joiner.user_id)
        .await
        .expect("query")
        .expect("membership exists");
    assert_eq!(membership.status, MemberStatus::Pending);
    assert_eq!(membership.role, MemberRole::Member);

    let err = service
        .join_workspace(&joiner, &workspace.id)
        .await
        .expect_err("second join is rejected");
    assert!(matches!(err, AppError::Conflict(_)));

    let owner_rejoin = service
        .join_workspace(&owner, &workspace.id)
        .await
        .expect_err("admin cannot re-join");
    assert!(matches!(owner_rejoin, AppError::Conflict(_)));

    let members = service.list_members(&workspace.id).await.expect("members");
    assert_eq!(members.len(), 2);

    // Pending joins do not bump the informational member count.
    let reloaded = service.get_workspace(&workspace.id).await.expect("get");
    assert_eq!(reloaded.member_count, INITIAL_MEMBER_COUNT);
}

#[tokio::test]
async fn test_list_workspaces_reports_membership_status() {
    let pool = setup_test_db().await;
    let owner = identity_of(&create_user(&pool, "Owner", "owner@example.com", "secret123").await);
    let joiner = identity_of(&create_user(&pool, "Bob", "bob@example.com", "secret123").await);
    let service = WorkspaceService::new(pool.clone());

    let acme = service
        .create_workspace(&owner, "Acme", "acme", None)
        .await
        .expect("create");
    service
        .create_workspace(&owner, "Globex", "globex", None)
        .await
        .expect("create");
    service.join_workspace(&joiner, &acme.id).await.expect("join");

    let owned = service.list_workspaces(&owner, 10, 0).await.expect("list");
    assert_eq!(owned.len(), 2);

    let joined = service.list_workspaces(&joiner, 10, 0).await.expect("list");
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].workspace.id, acme.id);
    assert_eq!(joined[0].status, MemberStatus::Pending);

    assert!(UserRepository::find_by_id(&pool, &joiner.user_id)
        .await
        .expect("query")
        .is_some());
}

#[tokio::test]
async fn test_get_missing_workspace_is_not_found() {
    let pool = setup_test_db().await;
    let service = WorkspaceService::new(pool);

    assert!(matches!(
        service.get_workspace("missing").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.list_members("missing").await,
        Err(AppError::NotFound(_))
    ));
}
