//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every API endpoint is registered here together with its utoipa annotation. The collected
//! OpenAPI document is served at `/api/docs/openapi.json` with Swagger UI at `/api/docs`.

use axum::{
    extract::DefaultBodyLimit, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use utoipa::OpenApi;
use utoipa_axum::{
    router::{OpenApiRouter, UtoipaMethodRouterExt},
    routes,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    model::api::MessageDto,
    server::{controller, model::app::AppState},
};

async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(MessageDto::new("LLM Price Hub API is running")),
    )
}

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// Handlers sharing a path are registered in the same `routes!` call so their methods are
/// merged into one route.
///
/// # Example
/// ```ignore
/// let state = AppState { db, http_client, static_dir, scheduler: Some(scheduler) };
/// let router = routes().with_state(state);
/// ```
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "LLM Price Hub", description = "LLM Price Hub API"),
        tags(
            (name = controller::auth::AUTH_TAG, description = "Registration, login and second factor"),
            (name = controller::account::ACCOUNT_TAG, description = "Password and email changes"),
            (name = controller::price::PRICE_TAG, description = "Price submission and comparison"),
            (name = controller::model::MODEL_TAG, description = "Standard model catalogue"),
            (name = controller::config::CONFIG_TAG, description = "Public configuration"),
            (name = controller::settings::SETTINGS_TAG, description = "Currencies and user preferences"),
            (name = controller::user::USER_TAG, description = "Personal workspace"),
            (name = controller::review::REVIEW_TAG, description = "Provider reviews"),
            (name = controller::admin::ADMIN_TAG, description = "Moderation and administration"),
        )
    )]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        // Auth
        .routes(routes!(controller::auth::register))
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::auth::me))
        .routes(routes!(controller::auth::totp_setup))
        .routes(routes!(controller::auth::totp_enable))
        .routes(routes!(controller::auth::totp_disable))
        .routes(routes!(controller::auth::verify_email))
        .routes(routes!(controller::auth::resend_verification))
        // Account
        .routes(routes!(controller::account::request_code))
        .routes(routes!(controller::account::reset_password))
        .routes(routes!(controller::account::change_email))
        // Prices
        .routes(
            routes!(controller::price::submit_price)
                .layer(DefaultBodyLimit::max(controller::price::MAX_SUBMISSION_BYTES)),
        )
        .routes(routes!(controller::price::submit_batch))
        .routes(routes!(controller::price::compare))
        .routes(routes!(controller::price::highlights))
        .routes(routes!(controller::price::list_models))
        .routes(routes!(controller::price::request_model))
        .routes(routes!(controller::price::update_price))
        // Standard models
        .routes(routes!(
            controller::model::list_models,
            controller::model::create_model
        ))
        .routes(routes!(controller::model::update_model))
        // Public config
        .routes(routes!(controller::config::get_rates))
        .routes(routes!(controller::config::get_providers))
        .routes(routes!(controller::config::get_public_settings))
        // Settings
        .routes(routes!(controller::settings::get_currencies))
        .routes(routes!(
            controller::settings::get_user_preferences,
            controller::settings::update_user_preferences
        ))
        // User workspace
        .routes(routes!(controller::user::get_e2ee_settings))
        .routes(routes!(
            controller::user::enable_e2ee,
            controller::user::disable_e2ee
        ))
        .routes(routes!(
            controller::user::list_api_keys,
            controller::user::add_api_key
        ))
        .routes(routes!(controller::user::delete_api_key))
        .routes(routes!(
            controller::user::list_providers,
            controller::user::create_provider
        ))
        .routes(routes!(
            controller::user::update_provider,
            controller::user::delete_provider
        ))
        .routes(routes!(controller::user::submit_provider))
        // Reviews
        .routes(routes!(
            controller::review::list_reviews,
            controller::review::create_review
        ))
        // Admin
        .routes(routes!(controller::admin::pending_prices))
        .routes(routes!(controller::admin::approve_price))
        .routes(routes!(controller::admin::reject_price))
        .routes(routes!(controller::admin::pending_providers))
        .routes(routes!(controller::admin::approve_provider))
        .routes(routes!(controller::admin::reject_provider))
        .routes(routes!(controller::admin::pending_model_requests))
        .routes(routes!(controller::admin::approve_model_request))
        .routes(routes!(controller::admin::reject_model_request))
        .routes(routes!(controller::admin::list_users))
        .routes(routes!(controller::admin::update_user_role))
        .routes(routes!(
            controller::admin::get_settings,
            controller::admin::update_settings
        ))
        .split_for_parts();

    routes
        .route("/", get(root))
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
