use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, Method},
};
use crate::state::AppState;
use crate::error::AppError;
use crate::domain::models::auth::Claims;
use crate::domain::models::user::Actor;
use crate::domain::services::auth_service::TOKEN_AUDIENCE;
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::{warn, Span};

pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Caller authenticated by the `access_token` cookie. Mutating requests must
/// also echo the token's CSRF value in `X-CSRF-Token`.
///
/// The role comes from the stored profile, not the token, so role changes and
/// profile deletion take effect on the next request.
pub struct AuthUser(pub Actor);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(AppError::InternalWithMsg("CookieManagerLayer missing".into()))?;

        let access_token = cookies.get("access_token")
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("invalid JWT public key: {}", e)))?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[app_state.config.auth_issuer.as_str()]);

        let claims = decode::<Claims>(&access_token, &decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?
            .claims;

        if !matches!(parts.method, Method::GET | Method::HEAD | Method::OPTIONS) {
            let csrf = parts.headers.get(CSRF_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or(AppError::Forbidden("Missing CSRF token".into()))?;

            if csrf != claims.csrf {
                warn!("CSRF mismatch for user {}", claims.sub);
                return Err(AppError::Forbidden("Invalid CSRF token".into()));
            }
        }

        let profile = app_state.profile_repo.find_by_user_id(&claims.sub).await?
            .ok_or(AppError::Unauthorized)?;

        Span::current().record("user_id", profile.user_id.as_str());

        Ok(AuthUser(Actor {
            user_id: profile.user_id,
            profile_id: profile.id,
            role: profile.role,
        }))
    }
}

/// An [`AuthUser`] whose profile currently has the ADMIN role.
pub struct AdminUser(pub Actor);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(actor) = AuthUser::from_request_parts(parts, state).await?;
        if !actor.is_admin() {
            return Err(AppError::Forbidden("Administrator role required".into()));
        }
        Ok(AdminUser(actor))
    }
}
