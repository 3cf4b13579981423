use critica_api::auth::validate_access_token;
use critica_api::error::ApiServiceError;
use critica_api::usecase::token::{ExchangeTokenInput, ExchangeTokenUseCase};
use critica_domain::user::Role;

use crate::helpers::{MockUserRepo, TEST_JWT_SECRET, test_user};

#[tokio::test]
async fn should_issue_token_for_valid_confirmation_code() {
    let user = test_user("alice", Role::User);

    let uc = ExchangeTokenUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let output = uc
        .execute(ExchangeTokenInput {
            username: user.username.clone(),
            confirmation_code: user.confirmation_code.clone(),
        })
        .await
        .unwrap();

    assert!(!output.token.is_empty());

    let actor = validate_access_token(&output.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(actor.id, user.id);
    assert_eq!(actor.role, Role::User);
    assert!(!actor.is_superuser);
}

#[tokio::test]
async fn should_carry_role_and_superuser_flag_in_token() {
    let mut user = test_user("root", Role::Admin);
    user.is_superuser = true;

    let uc = ExchangeTokenUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let output = uc
        .execute(ExchangeTokenInput {
            username: user.username.clone(),
            confirmation_code: user.confirmation_code.clone(),
        })
        .await
        .unwrap();

    let actor = validate_access_token(&output.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(actor.role, Role::Admin);
    assert!(actor.is_superuser);
    assert!(actor.is_admin());
}

#[tokio::test]
async fn should_return_not_found_for_unknown_username() {
    let uc = ExchangeTokenUseCase {
        repo: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(ExchangeTokenInput {
            username: "nobody".to_owned(),
            confirmation_code: "ABCDEFGHIJKLMNOP12345678".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(ApiServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_wrong_confirmation_code() {
    let user = test_user("alice", Role::User);

    let uc = ExchangeTokenUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(ExchangeTokenInput {
            username: user.username.clone(),
            confirmation_code: "WRONGCODEWRONGCODEWRONG1".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(ApiServiceError::InvalidConfirmationCode)),
        "expected InvalidConfirmationCode, got {result:?}"
    );
}

#[tokio::test]
async fn should_keep_code_valid_after_exchange() {
    let user = test_user("alice", Role::User);

    let uc = ExchangeTokenUseCase {
        repo: MockUserRepo::new(vec![user.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let input = || ExchangeTokenInput {
        username: user.username.clone(),
        confirmation_code: user.confirmation_code.clone(),
    };

    // The code is single-owner, not single-use: only a new signup replaces it.
    uc.execute(input()).await.unwrap();
    uc.execute(input()).await.unwrap();
}
