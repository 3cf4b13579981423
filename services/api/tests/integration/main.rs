
mod comment_test;
mod review_test;
mod token_test;
mod user_test;
