use critica_api::domain::types::Actor;
use critica_api::error::ApiServiceError;
use critica_api::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase,
    ListReviewsUseCase, UpdateReviewInput, UpdateReviewUseCase,
};
use critica_domain::pagination::PageRequest;
use critica_domain::user::Role;

use crate::helpers::{MockReviewRepo, MockTitleRepo, test_actor, test_review, test_title, test_user};

#[tokio::test]
async fn should_return_not_found_listing_reviews_for_unknown_title() {
    let uc = ListReviewsUseCase {
        reviews: MockReviewRepo::empty(),
        titles: MockTitleRepo::empty(),
    };

    let result = uc.execute(42, PageRequest::default()).await;
    assert!(
        matches!(result, Err(ApiServiceError::TitleNotFound)),
        "expected TitleNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_list_reviews_with_title_name() {
    let alice = test_user("alice", Role::User);
    let bob = test_user("bob", Role::User);

    let uc = ListReviewsUseCase {
        reviews: MockReviewRepo::new(vec![
            test_review(1, 1, &alice),
            test_review(2, 1, &bob),
            test_review(3, 2, &alice),
        ]),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul"), test_title(2, "Silent Winter")]),
    };

    let output = uc.execute(1, PageRequest::default()).await.unwrap();
    assert_eq!(output.title_name, "The Long Haul");
    assert_eq!(output.reviews.len(), 2, "only reviews of the requested title");
}

#[tokio::test]
async fn should_create_review_for_title() {
    let mock_reviews = MockReviewRepo::empty();
    let reviews_handle = mock_reviews.reviews_handle();
    let actor = test_actor(Role::User);

    let uc = CreateReviewUseCase {
        reviews: mock_reviews,
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    let output = uc
        .execute(
            &actor,
            CreateReviewInput {
                title_id: 1,
                text: "kept me up all night".to_owned(),
                score: 8,
            },
        )
        .await
        .unwrap();

    assert_eq!(output.title_name, "The Long Haul");
    assert_eq!(output.review.score, 8);
    assert_eq!(output.review.author_id, actor.id);
    assert_eq!(reviews_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_second_review_from_same_author() {
    let author = test_user("alice", Role::User);

    let uc = CreateReviewUseCase {
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    let result = uc
        .execute(
            &Actor::from(&author),
            CreateReviewInput {
                title_id: 1,
                text: "changed my mind".to_owned(),
                score: 3,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiServiceError::DuplicateReview)),
        "expected DuplicateReview, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_out_of_range_score() {
    let uc = CreateReviewUseCase {
        reviews: MockReviewRepo::empty(),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    for score in [0, 11, -3] {
        let result = uc
            .execute(
                &test_actor(Role::User),
                CreateReviewInput {
                    title_id: 1,
                    text: "fine".to_owned(),
                    score,
                },
            )
            .await;
        assert!(
            matches!(result, Err(ApiServiceError::InvalidScore)),
            "expected InvalidScore for {score}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_empty_review_text() {
    let uc = CreateReviewUseCase {
        reviews: MockReviewRepo::empty(),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    let result = uc
        .execute(
            &test_actor(Role::User),
            CreateReviewInput {
                title_id: 1,
                text: String::new(),
                score: 5,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiServiceError::InvalidText)),
        "expected InvalidText, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_for_review_under_wrong_title() {
    let author = test_user("alice", Role::User);

    let uc = GetReviewUseCase {
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul"), test_title(2, "Silent Winter")]),
    };

    // Review 1 exists, but not under title 2.
    let result = uc.execute(2, 1).await;
    assert!(
        matches!(result, Err(ApiServiceError::ReviewNotFound)),
        "expected ReviewNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_author_to_update_own_review() {
    let author = test_user("alice", Role::User);

    let uc = UpdateReviewUseCase {
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    let output = uc
        .execute(
            &Actor::from(&author),
            1,
            1,
            UpdateReviewInput {
                text: Some("on a rewatch it holds up".to_owned()),
                score: Some(9),
            },
        )
        .await
        .unwrap();

    assert_eq!(output.review.text, "on a rewatch it holds up");
    assert_eq!(output.review.score, 9);
}

#[tokio::test]
async fn should_forbid_update_by_unrelated_user() {
    let author = test_user("alice", Role::User);

    let uc = UpdateReviewUseCase {
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    let result = uc
        .execute(
            &test_actor(Role::User),
            1,
            1,
            UpdateReviewInput {
                text: Some("mine now".to_owned()),
                score: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_moderator_to_update_any_review() {
    let author = test_user("alice", Role::User);

    let uc = UpdateReviewUseCase {
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    let output = uc
        .execute(
            &test_actor(Role::Moderator),
            1,
            1,
            UpdateReviewInput {
                text: Some("trimmed by moderation".to_owned()),
                score: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(output.review.text, "trimmed by moderation");
    assert_eq!(output.review.score, 7, "score untouched when not in the patch");
}

#[tokio::test]
async fn should_return_review_unchanged_for_empty_update() {
    let author = test_user("alice", Role::User);
    let review = test_review(1, 1, &author);

    let uc = UpdateReviewUseCase {
        reviews: MockReviewRepo::new(vec![review.clone()]),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    let output = uc
        .execute(
            &Actor::from(&author),
            1,
            1,
            UpdateReviewInput {
                text: None,
                score: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(output.review.text, review.text);
    assert_eq!(output.review.score, review.score);
}

#[tokio::test]
async fn should_allow_moderator_to_delete_any_review() {
    let author = test_user("alice", Role::User);
    let mock_reviews = MockReviewRepo::new(vec![test_review(1, 1, &author)]);
    let reviews_handle = mock_reviews.reviews_handle();

    let uc = DeleteReviewUseCase {
        reviews: mock_reviews,
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    uc.execute(&test_actor(Role::Moderator), 1, 1).await.unwrap();
    assert!(reviews_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_delete_by_unrelated_user() {
    let author = test_user("alice", Role::User);

    let uc = DeleteReviewUseCase {
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &author)]),
        titles: MockTitleRepo::new(vec![test_title(1, "The Long Haul")]),
    };

    let result = uc.execute(&test_actor(Role::User), 1, 1).await;
    assert!(
        matches!(result, Err(ApiServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}
