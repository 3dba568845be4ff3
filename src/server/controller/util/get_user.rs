use tower_sessions::Session;

use crate::server::{
    data::{setting::SettingRepository, user::UserRepository},
    error::{auth::AuthError, Error},
    model::{app::AppState, session::user::SessionUserId},
    service::email::setting_flag,
    util::role::{is_admin, is_super_admin},
};

pub const FORCE_EMAIL_VERIFICATION_KEY: &str = "force_email_verification";

/// Retrieves the logged in user from session and then from database
///
/// # Returns
/// - `Ok(user)`: User found
/// - `Err(Error::AuthError(AuthError::UserNotInSession))`: User ID not present in session
/// - `Err(Error::AuthError(AuthError::UserNotInDatabase))`: User ID exists in session but not
///   found in database (session is cleared)
pub async fn get_user_from_session(
    state: &AppState,
    session: &Session,
) -> Result<entity::user::Model, Error> {
    let Some(user_id) = SessionUserId::get(session).await? else {
        return Err(Error::AuthError(AuthError::UserNotInSession));
    };

    let Some(user) = UserRepository::new(&state.db).get(user_id).await? else {
        session.clear().await;

        tracing::debug!(
            "Session cleared for user ID {} with active session but was not found in database",
            user_id
        );

        return Err(Error::AuthError(AuthError::UserNotInDatabase(user_id)));
    };

    Ok(user)
}

/// Logged in user that is not disabled and, when `force_email_verification` is on, verified
pub async fn get_active_user(
    state: &AppState,
    session: &Session,
) -> Result<entity::user::Model, Error> {
    let user = get_user_from_session(state, session).await?;

    if !user.is_active {
        return Err(AuthError::InactiveUser.into());
    }

    if !user.email_verified {
        let force_verification = SettingRepository::new(&state.db)
            .get(FORCE_EMAIL_VERIFICATION_KEY)
            .await?;

        if setting_flag(force_verification.as_ref(), false) {
            return Err(AuthError::EmailNotVerified.into());
        }
    }

    Ok(user)
}

/// Active user with the `admin` or `super_admin` role
pub async fn get_admin(state: &AppState, session: &Session) -> Result<entity::user::Model, Error> {
    let user = get_active_user(state, session).await?;

    if !is_admin(user.role) {
        return Err(AuthError::NotAdmin.into());
    }

    Ok(user)
}

pub async fn get_super_admin(
    state: &AppState,
    session: &Session,
) -> Result<entity::user::Model, Error> {
    let user = get_active_user(state, session).await?;

    if !is_super_admin(user.role) {
        return Err(AuthError::NotSuperAdmin.into());
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    mod get_user_from_session {
        use pricehub_test_utils::prelude::*;

        use crate::server::{
            controller::util::get_user::get_user_from_session,
            error::{auth::AuthError, Error},
            model::{app::AppState, session::user::SessionUserId},
        };

        /// Expect the user stored in session
        #[tokio::test]
        async fn returns_session_user() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;
            SessionUserId::insert(&test.session, user.id).await.unwrap();

            let state: AppState = test.to_app_state();
            let result = get_user_from_session(&state, &test.session).await;

            assert!(result.is_ok());
            assert_eq!(result.unwrap().id, user.id);

            Ok(())
        }

        /// Expect an error for an empty session
        #[tokio::test]
        async fn fails_without_session() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;

            let state: AppState = test.to_app_state();
            let result = get_user_from_session(&state, &test.session).await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::UserNotInSession))
            ));

            Ok(())
        }

        /// Expect the session to be cleared when its user no longer exists
        #[tokio::test]
        async fn clears_session_for_missing_user() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            SessionUserId::insert(&test.session, 42).await.unwrap();

            let state: AppState = test.to_app_state();
            let result = get_user_from_session(&state, &test.session).await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::UserNotInDatabase(42)))
            ));
            assert!(matches!(SessionUserId::get(&test.session).await, Ok(None)));

            Ok(())
        }
    }

    mod get_active_user {
        use entity::sea_orm_active_enums::UserRole;
        use pricehub_test_utils::prelude::*;

        use crate::server::{
            controller::util::get_user::get_active_user,
            error::{auth::AuthError, Error},
            model::{app::AppState, session::user::SessionUserId},
        };

        /// Expect disabled accounts to be refused
        #[tokio::test]
        async fn rejects_inactive_user() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test
                .user()
                .insert_user_with("off@example.com", UserRole::User, false, true)
                .await?;
            SessionUserId::insert(&test.session, user.id).await.unwrap();

            let state: AppState = test.to_app_state();
            let result = get_active_user(&state, &test.session).await;

            assert!(matches!(result, Err(Error::AuthError(AuthError::InactiveUser))));

            Ok(())
        }

        /// Expect unverified users to pass unless verification is forced
        #[tokio::test]
        async fn enforces_verification_when_configured() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test
                .user()
                .insert_user_with("new@example.com", UserRole::User, true, false)
                .await?;
            SessionUserId::insert(&test.session, user.id).await.unwrap();

            let state: AppState = test.to_app_state();
            assert!(get_active_user(&state, &test.session).await.is_ok());

            test.setting()
                .insert_setting("force_email_verification", "true")
                .await?;
            let result = get_active_user(&state, &test.session).await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::EmailNotVerified))
            ));

            Ok(())
        }
    }

    mod get_admin {
        use pricehub_test_utils::prelude::*;

        use crate::server::{
            controller::util::get_user::{get_admin, get_super_admin},
            error::{auth::AuthError, Error},
            model::{app::AppState, session::user::SessionUserId},
        };

        /// Expect plain users to be refused admin access
        #[tokio::test]
        async fn rejects_plain_user() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("user@example.com").await?;
            SessionUserId::insert(&test.session, user.id).await.unwrap();

            let state: AppState = test.to_app_state();
            let result = get_admin(&state, &test.session).await;

            assert!(matches!(result, Err(Error::AuthError(AuthError::NotAdmin))));

            Ok(())
        }

        /// Expect admins to pass the admin check but not the super admin check
        #[tokio::test]
        async fn distinguishes_super_admin() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin("admin@example.com").await?;
            SessionUserId::insert(&test.session, admin.id).await.unwrap();

            let state: AppState = test.to_app_state();
            assert!(get_admin(&state, &test.session).await.is_ok());

            let result = get_super_admin(&state, &test.session).await;
            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::NotSuperAdmin))
            ));

            Ok(())
        }
    }
}
