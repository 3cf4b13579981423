use critica_api::domain::types::{Actor, UserPatch};
use critica_api::error::ApiServiceError;
use critica_api::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetMeUseCase, GetUserUseCase,
    ListUsersUseCase, UpdateMeUseCase, UpdateUserUseCase,
};
use critica_domain::pagination::PageRequest;
use critica_domain::user::Role;

use crate::helpers::{MockUserRepo, test_actor, test_user};

// ── Admin account management ─────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_listing_users_for_non_admins() {
    let uc = ListUsersUseCase {
        repo: MockUserRepo::new(vec![test_user("alice", Role::User)]),
    };

    for role in [Role::User, Role::Moderator] {
        let result = uc.execute(&test_actor(role), None, PageRequest::default()).await;
        assert!(
            matches!(result, Err(ApiServiceError::Forbidden)),
            "expected Forbidden for {role:?}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_list_users_sorted_by_username_for_admin() {
    let uc = ListUsersUseCase {
        repo: MockUserRepo::new(vec![
            test_user("bob", Role::User),
            test_user("alice", Role::Moderator),
        ]),
    };

    let users = uc
        .execute(&test_actor(Role::Admin), None, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].username, "alice");
    assert_eq!(users[1].username, "bob");
}

#[tokio::test]
async fn should_filter_users_by_username_substring() {
    let uc = ListUsersUseCase {
        repo: MockUserRepo::new(vec![
            test_user("alice", Role::User),
            test_user("bob", Role::User),
        ]),
    };

    let users = uc
        .execute(&test_actor(Role::Admin), Some("LI"), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(users.len(), 1, "search should be case-insensitive");
    assert_eq!(users[0].username, "alice");
}

#[tokio::test]
async fn should_get_user_by_username() {
    let user = test_user("alice", Role::Moderator);

    let uc = GetUserUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };

    let found = uc.execute(&test_actor(Role::Admin), "alice").await.unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.role, Role::Moderator);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_username() {
    let uc = GetUserUseCase {
        repo: MockUserRepo::empty(),
    };

    let result = uc.execute(&test_actor(Role::Admin), "nobody").await;
    assert!(
        matches!(result, Err(ApiServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_create_user_with_requested_role() {
    let mock_repo = MockUserRepo::empty();
    let users_handle = mock_repo.users_handle();

    let uc = CreateUserUseCase { repo: mock_repo };

    let created = uc
        .execute(
            &test_actor(Role::Admin),
            CreateUserInput {
                username: "mona".to_owned(),
                email: "mona@example.com".to_owned(),
                first_name: "Mona".to_owned(),
                last_name: String::new(),
                bio: String::new(),
                role: Role::Moderator,
            },
        )
        .await
        .unwrap();

    assert_eq!(created.role, Role::Moderator);
    assert!(!created.is_superuser);
    assert_eq!(
        created.confirmation_code.len(),
        24,
        "admin-created accounts still get a confirmation code"
    );
    assert_eq!(users_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_forbid_user_creation_for_moderator() {
    let uc = CreateUserUseCase {
        repo: MockUserRepo::empty(),
    };

    let result = uc
        .execute(
            &test_actor(Role::Moderator),
            CreateUserInput {
                username: "mona".to_owned(),
                email: "mona@example.com".to_owned(),
                first_name: String::new(),
                last_name: String::new(),
                bio: String::new(),
                role: Role::User,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_conflict_when_creating_duplicate_username() {
    let uc = CreateUserUseCase {
        repo: MockUserRepo::new(vec![test_user("alice", Role::User)]),
    };

    let result = uc
        .execute(
            &test_actor(Role::Admin),
            CreateUserInput {
                username: "alice".to_owned(),
                email: "alice2@example.com".to_owned(),
                first_name: String::new(),
                last_name: String::new(),
                bio: String::new(),
                role: Role::User,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiServiceError::UserAlreadyExists)),
        "expected UserAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_update_role_as_admin() {
    let user = test_user("alice", Role::User);

    let uc = UpdateUserUseCase {
        repo: MockUserRepo::new(vec![user]),
    };

    let updated = uc
        .execute(
            &test_actor(Role::Admin),
            "alice",
            UserPatch {
                role: Some(Role::Moderator),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, Role::Moderator);
}

#[tokio::test]
async fn should_return_user_unchanged_for_empty_patch() {
    let user = test_user("alice", Role::User);
    let updated_at = user.updated_at;

    let uc = UpdateUserUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };

    let unchanged = uc
        .execute(&test_actor(Role::Admin), "alice", UserPatch::default())
        .await
        .unwrap();

    assert_eq!(unchanged.id, user.id);
    assert_eq!(unchanged.role, Role::User);
    assert_eq!(
        unchanged.updated_at, updated_at,
        "an empty patch should not touch the record"
    );
}

#[tokio::test]
async fn should_reject_invalid_username_in_patch() {
    let uc = UpdateUserUseCase {
        repo: MockUserRepo::new(vec![test_user("alice", Role::User)]),
    };

    let result = uc
        .execute(
            &test_actor(Role::Admin),
            "alice",
            UserPatch {
                username: Some("me".to_owned()),
                ..Default::default()
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiServiceError::InvalidUsername)),
        "expected InvalidUsername, got {result:?}"
    );
}

#[tokio::test]
async fn should_delete_user_as_admin() {
    let mock_repo = MockUserRepo::new(vec![test_user("alice", Role::User)]);
    let users_handle = mock_repo.users_handle();

    let uc = DeleteUserUseCase { repo: mock_repo };

    uc.execute(&test_actor(Role::Admin), "alice").await.unwrap();
    assert!(users_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_return_not_found_when_deleting_unknown_user() {
    let uc = DeleteUserUseCase {
        repo: MockUserRepo::empty(),
    };

    let result = uc.execute(&test_actor(Role::Admin), "nobody").await;
    assert!(
        matches!(result, Err(ApiServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

// ── Self-service profile ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_get_own_profile() {
    let user = test_user("alice", Role::User);

    let uc = GetMeUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };

    let me = uc.execute(&Actor::from(&user)).await.unwrap();
    assert_eq!(me.id, user.id);
    assert_eq!(me.username, "alice");
}

#[tokio::test]
async fn should_return_not_found_when_own_account_deleted() {
    let user = test_user("alice", Role::User);

    let uc = GetMeUseCase {
        repo: MockUserRepo::empty(),
    };

    let result = uc.execute(&Actor::from(&user)).await;
    assert!(
        matches!(result, Err(ApiServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_update_own_bio_without_touching_role() {
    let user = test_user("alice", Role::User);

    let uc = UpdateMeUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };

    let updated = uc
        .execute(
            &Actor::from(&user),
            UserPatch {
                bio: Some("likes long movies".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.bio, "likes long movies");
    assert_eq!(updated.role, Role::User);
}

#[tokio::test]
async fn should_cap_profile_names_in_chars_not_bytes() {
    let user = test_user("alice", Role::User);

    let uc = UpdateMeUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
    };

    // At the limit: 150 Cyrillic chars is twice that in bytes.
    let updated = uc
        .execute(
            &Actor::from(&user),
            UserPatch {
                first_name: Some("ж".repeat(150)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name.chars().count(), 150);

    let result = uc
        .execute(
            &Actor::from(&user),
            UserPatch {
                last_name: Some("ж".repeat(151)),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(result, Err(ApiServiceError::InvalidName)),
        "expected InvalidName, got {result:?}"
    );
}
