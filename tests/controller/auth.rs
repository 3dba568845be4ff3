use pricehub::{
    model::user::{LoginDto, RegisterDto, UserDto},
    server::{
        controller::auth::{login, logout, me, register},
        error::auth::AuthError,
    },
};

use super::*;

fn credentials(email: &str, password: &str) -> LoginDto {
    LoginDto {
        email: email.to_string(),
        password: password.to_string(),
        totp_code: None,
    }
}

#[tokio::test]
/// Expect the first account to become super admin and later ones plain users
async fn registers_first_user_as_super_admin() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let first = register(
        State(state.clone()),
        Json(RegisterDto {
            email: "Owner@Example.com".to_string(),
            password: "long-enough".to_string(),
        }),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(first.status(), StatusCode::OK);
    let first: UserDto = body_json(first).await;

    let second = register(
        State(state),
        Json(RegisterDto {
            email: "member@example.com".to_string(),
            password: "long-enough".to_string(),
        }),
    )
    .await
    .unwrap()
    .into_response();
    let second: UserDto = body_json(second).await;

    assert_eq!(first.email, "owner@example.com");
    assert_eq!(first.role, "super_admin");
    assert_eq!(second.role, "user");

    Ok(())
}

#[tokio::test]
/// Expect login to store the user in session so `me` returns them
async fn logs_in_and_reads_me() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();
    let user = test.user().insert_user("alice@example.com").await?;

    let result = login(
        State(state.clone()),
        test.session.clone(),
        Json(credentials("alice@example.com", TEST_PASSWORD)),
    )
    .await;
    assert!(result.is_ok());

    let session_user = SessionUserId::get(&test.session).await.unwrap();
    assert_eq!(session_user, Some(user.id));

    let resp = me(State(state), test.session.clone())
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: UserDto = body_json(resp).await;
    assert_eq!(body.id, user.id);

    Ok(())
}

#[tokio::test]
/// Expect the same error for a wrong password as for an unknown email
async fn rejects_bad_credentials() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();
    test.user().insert_user("alice@example.com").await?;

    let wrong_password = login(
        State(state.clone()),
        test.session.clone(),
        Json(credentials("alice@example.com", "not-the-password")),
    )
    .await;
    let unknown_email = login(
        State(state),
        test.session.clone(),
        Json(credentials("nobody@example.com", TEST_PASSWORD)),
    )
    .await;

    assert!(matches!(
        wrong_password,
        Err(Error::AuthError(AuthError::InvalidCredentials))
    ));
    assert!(matches!(
        unknown_email,
        Err(Error::AuthError(AuthError::InvalidCredentials))
    ));

    Ok(())
}

#[tokio::test]
/// Expect a disabled account to be refused even with the right password
async fn rejects_inactive_user() -> Result<(), TestError> {
    use entity::sea_orm_active_enums::UserRole;

    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();
    test.user()
        .insert_user_with("banned@example.com", UserRole::User, false, true)
        .await?;

    let result = login(
        State(state),
        test.session.clone(),
        Json(credentials("banned@example.com", TEST_PASSWORD)),
    )
    .await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::InactiveUser))
    ));

    Ok(())
}

#[tokio::test]
/// Expect 401 from `me` without a user in session
async fn me_requires_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let state: AppState = test.to_app_state();

    let result = me(State(state), test.session.clone()).await;

    match result {
        Err(err) => assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED),
        Ok(_) => panic!("Expected an error without a session"),
    }

    Ok(())
}

#[tokio::test]
/// Expect logout to clear the session user
async fn logout_clears_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    SessionUserId::insert(&test.session, 1).await.unwrap();

    let resp = logout(test.session.clone()).await.unwrap().into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(SessionUserId::get(&test.session).await.unwrap().is_none());

    Ok(())
}

#[tokio::test]
/// Expect logout without a session to succeed instead of failing to clear an empty session
async fn logout_without_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let resp = logout(test.session.clone()).await.unwrap().into_response();

    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}
