use std::sync::Arc;
use crate::domain::{
    models::auth::{Claims, RefreshTokenRecord, TokenPair},
    ports::AuthRepository
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{encode, EncodingKey, Header, Algorithm};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Sha256, Digest};
use tracing::warn;

pub const TOKEN_AUDIENCE: &str = "court-booking-frontend";
const ACCESS_TOKEN_MINUTES: i64 = 15;
const REFRESH_TOKEN_DAYS: i64 = 7;

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    issuer: String,
    encoding_key: EncodingKey,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, config: &Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("invalid JWT private key PEM: {}", e)))?;

        Ok(Self { repo, issuer: config.auth_issuer.clone(), encoding_key })
    }

    pub async fn login(&self, user_id: &str) -> Result<TokenPair, AppError> {
        self.issue_token_pair(user_id, Uuid::new_v4(), 1).await
    }

    /// Rotates a refresh token. The presented token is consumed whether or
    /// not it is still valid; an expired one also revokes its family.
    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<(String, TokenPair), AppError> {
        let token_hash = hash_token(raw_refresh_token);

        let record = self.repo.find_refresh_token(&token_hash).await?
            .ok_or(AppError::Unauthorized)?;

        self.repo.delete_refresh_token(&token_hash).await?;

        if record.expires_at < Utc::now() {
            warn!("Expired refresh token presented for user {}", record.user_id);
            self.repo.delete_refresh_family(record.family_id).await?;
            return Err(AppError::Unauthorized);
        }

        let pair = self.issue_token_pair(&record.user_id, record.family_id, record.generation_id + 1).await?;
        Ok((record.user_id, pair))
    }

    pub async fn logout(&self, raw_refresh_token: &str) -> Result<(), AppError> {
        self.repo.delete_refresh_token(&hash_token(raw_refresh_token)).await
    }

    async fn issue_token_pair(&self, user_id: &str, family_id: Uuid, generation_id: i32) -> Result<TokenPair, AppError> {
        let csrf_token = random_token(32);
        let now = Utc::now();

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp: (now + Duration::minutes(ACCESS_TOKEN_MINUTES)).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            csrf: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let refresh_token = random_token(64);
        self.repo.create_refresh_token(&RefreshTokenRecord {
            token_hash: hash_token(&refresh_token),
            user_id: user_id.to_string(),
            family_id,
            generation_id,
            expires_at: now + Duration::days(REFRESH_TOKEN_DAYS),
            created_at: now,
        }).await?;

        Ok(TokenPair { access_token, refresh_token, csrf_token })
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalWithMsg(format!("password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<(), AppError> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|_| AppError::Internal)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn random_token(len: usize) -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(len).map(char::from).collect()
}
