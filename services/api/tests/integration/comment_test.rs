use critica_api::domain::types::Actor;
use critica_api::error::ApiServiceError;
use critica_api::usecase::comment::{
    CreateCommentInput, CreateCommentUseCase, DeleteCommentUseCase, GetCommentUseCase,
    ListCommentsUseCase, UpdateCommentInput, UpdateCommentUseCase,
};
use critica_domain::pagination::PageRequest;
use critica_domain::user::Role;

use crate::helpers::{
    MockCommentRepo, MockReviewRepo, test_actor, test_comment, test_review, test_user,
};

#[tokio::test]
async fn should_return_not_found_listing_comments_for_unknown_review() {
    let uc = ListCommentsUseCase {
        comments: MockCommentRepo::empty(),
        reviews: MockReviewRepo::empty(),
    };

    let result = uc.execute(1, 42, PageRequest::default()).await;
    assert!(
        matches!(result, Err(ApiServiceError::ReviewNotFound)),
        "expected ReviewNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_when_review_under_wrong_title() {
    let author = test_user("alice", Role::User);

    let uc = ListCommentsUseCase {
        comments: MockCommentRepo::new(vec![test_comment(1, 1, &author)]),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    // Review 1 belongs to title 1; asking for it under title 2 is a miss.
    let result = uc.execute(2, 1, PageRequest::default()).await;
    assert!(
        matches!(result, Err(ApiServiceError::ReviewNotFound)),
        "expected ReviewNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_list_comments_for_review() {
    let alice = test_user("alice", Role::User);
    let bob = test_user("bob", Role::User);

    let uc = ListCommentsUseCase {
        comments: MockCommentRepo::new(vec![
            test_comment(1, 1, &alice),
            test_comment(2, 1, &bob),
            test_comment(3, 2, &alice),
        ]),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &alice), test_review(2, 1, &bob)]),
    };

    let comments = uc.execute(1, 1, PageRequest::default()).await.unwrap();
    assert_eq!(comments.len(), 2, "only comments of the requested review");
}

#[tokio::test]
async fn should_create_comment_under_review() {
    let author = test_user("alice", Role::User);
    let mock_comments = MockCommentRepo::empty();
    let comments_handle = mock_comments.comments_handle();
    let actor = test_actor(Role::User);

    let uc = CreateCommentUseCase {
        comments: mock_comments,
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    let comment = uc
        .execute(
            &actor,
            CreateCommentInput {
                title_id: 1,
                review_id: 1,
                text: "could not agree more".to_owned(),
            },
        )
        .await
        .unwrap();

    assert_eq!(comment.text, "could not agree more");
    assert_eq!(comment.author_id, actor.id);
    assert_eq!(comments_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_empty_and_overlong_comment_text() {
    let author = test_user("alice", Role::User);

    let uc = CreateCommentUseCase {
        comments: MockCommentRepo::empty(),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    for text in [String::new(), "x".repeat(301)] {
        let result = uc
            .execute(
                &test_actor(Role::User),
                CreateCommentInput {
                    title_id: 1,
                    review_id: 1,
                    text,
                },
            )
            .await;
        assert!(
            matches!(result, Err(ApiServiceError::InvalidText)),
            "expected InvalidText, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_accept_multibyte_text_at_the_length_limit() {
    let author = test_user("alice", Role::User);

    let uc = CreateCommentUseCase {
        comments: MockCommentRepo::empty(),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    // 300 Cyrillic chars is 600 bytes; the limit is on characters.
    let text = "ы".repeat(300);
    let comment = uc
        .execute(
            &test_actor(Role::User),
            CreateCommentInput {
                title_id: 1,
                review_id: 1,
                text: text.clone(),
            },
        )
        .await
        .unwrap();

    assert_eq!(comment.text, text);
}

#[tokio::test]
async fn should_get_comment_scoped_to_review() {
    let author = test_user("alice", Role::User);

    let uc = GetCommentUseCase {
        comments: MockCommentRepo::new(vec![test_comment(1, 1, &author)]),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    let comment = uc.execute(1, 1, 1).await.unwrap();
    assert_eq!(comment.author_username, "alice");
}

#[tokio::test]
async fn should_return_not_found_for_comment_under_wrong_review() {
    let author = test_user("alice", Role::User);

    let uc = GetCommentUseCase {
        comments: MockCommentRepo::new(vec![test_comment(1, 1, &author)]),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author), test_review(2, 1, &author)]),
    };

    // Comment 1 hangs off review 1, not review 2.
    let result = uc.execute(1, 2, 1).await;
    assert!(
        matches!(result, Err(ApiServiceError::CommentNotFound)),
        "expected CommentNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_author_to_update_own_comment() {
    let author = test_user("alice", Role::User);

    let uc = UpdateCommentUseCase {
        comments: MockCommentRepo::new(vec![test_comment(1, 1, &author)]),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    let comment = uc
        .execute(
            &Actor::from(&author),
            1,
            1,
            1,
            UpdateCommentInput {
                text: Some("revised after a rewatch".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(comment.text, "revised after a rewatch");
}

#[tokio::test]
async fn should_forbid_comment_update_by_unrelated_user() {
    let author = test_user("alice", Role::User);

    let uc = UpdateCommentUseCase {
        comments: MockCommentRepo::new(vec![test_comment(1, 1, &author)]),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    let result = uc
        .execute(
            &test_actor(Role::User),
            1,
            1,
            1,
            UpdateCommentInput {
                text: Some("mine now".to_owned()),
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_comment_unchanged_when_text_missing() {
    let author = test_user("alice", Role::User);
    let existing = test_comment(1, 1, &author);

    let uc = UpdateCommentUseCase {
        comments: MockCommentRepo::new(vec![existing.clone()]),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    let comment = uc
        .execute(
            &Actor::from(&author),
            1,
            1,
            1,
            UpdateCommentInput { text: None },
        )
        .await
        .unwrap();

    assert_eq!(comment.text, existing.text);
}

#[tokio::test]
async fn should_allow_moderator_to_delete_any_comment() {
    let author = test_user("alice", Role::User);
    let mock_comments = MockCommentRepo::new(vec![test_comment(1, 1, &author)]);
    let comments_handle = mock_comments.comments_handle();

    let uc = DeleteCommentUseCase {
        comments: mock_comments,
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    uc.execute(&test_actor(Role::Moderator), 1, 1, 1).await.unwrap();
    assert!(comments_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_comment_delete_by_unrelated_user() {
    let author = test_user("alice", Role::User);

    let uc = DeleteCommentUseCase {
        comments: MockCommentRepo::new(vec![test_comment(1, 1, &author)]),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
    };

    let result = uc.execute(&test_actor(Role::User), 1, 1, 1).await;
    assert!(
        matches!(result, Err(ApiServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}
