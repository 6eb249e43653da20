use std::{sync::Arc, time::Duration};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor};

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    middleware::auth_jwt_middleware,
    routes::{
        invites::{create_invite, list_notifications, redeem_invite, respond_invite},
        organizations::{create_organization, remove_admin, remove_recruiter},
        session::{sign_in, sign_up},
    },
    state::AppState,
};

pub mod invites;
pub mod organizations;
pub mod session;

pub fn api_router(config: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", session(config.clone()))
        .merge(invite(config.clone()))
        .merge(organization(config.clone()))
        .with_state(config)
}

fn session(config: AppState) -> Router<AppState> {
    // ? rate limiter for credential guessing
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );
    let governor_limiter = governor_conf.limiter().clone();
    let interval = Duration::from_secs(60);
    // a separate background task to clean up
    std::thread::spawn(move || {
        loop {
            std::thread::sleep(interval);
            tracing::info!("rate limiting storage size: {}", governor_limiter.len());
            governor_limiter.retain_recent();
        }
    });

    Router::new()
        .route(
            "/signin",
            post(sign_in).layer(GovernorLayer {
                config: governor_conf,
            }),
        )
        .route("/signup", post(sign_up))
        .with_state(config)
}

fn invite(config: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/invites", post(create_invite))
        .route("/invite-responses", post(respond_invite))
        .route("/notifications", get(list_notifications))
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth_jwt_middleware,
        ));

    Router::new()
        // ! token-link path combines registration and redemption, no session
        .route("/invites/{token}/redeem", post(redeem_invite))
        .merge(protected)
        .with_state(config)
}

fn organization(config: AppState) -> Router<AppState> {
    Router::new()
        .route("/organizations", post(create_organization))
        .route(
            "/organizations/{org_id}/admins/{user_id}/remove",
            post(remove_admin),
        )
        .route(
            "/organizations/{org_id}/recruiters/{user_id}/remove",
            post(remove_recruiter),
        )
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth_jwt_middleware,
        ))
        .with_state(config)
}
