use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};

use crate::config::Config;
use crate::database::models::{
    AuthResponse, CreateUserInput, LoginInput, User, UserInfo, UserRole,
};
use crate::database::repositories::UserRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub role: UserRole,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn is_viewer(&self) -> bool {
        self.role == UserRole::Viewer
    }

    pub fn can_edit(&self) -> bool {
        !self.is_viewer()
    }

    /// Viewers are read-only.
    pub fn require_editor(&self) -> Result<(), AppError> {
        if self.can_edit() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Viewers cannot modify data".to_string(),
            ))
        }
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    if let Some(config) = req.app_data::<Data<Config>>() {
                        return match decode_token(token, &config.jwt_secret) {
                            Ok(claims) => ready(Ok(claims)),
                            Err(_) => ready(Err(ErrorUnauthorized("Invalid token"))),
                        };
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: UserRepository, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    pub async fn register(&self, request: CreateUserInput) -> Result<AuthResponse, AppError> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest(
                "Email and password are required".to_string(),
            ));
        }

        if self.user_repository.email_exists(&email).await? {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        let user = User::new(email, password_hash, request.name, request.company_name);
        let user = self.user_repository.create_user(&user).await?;

        log::info!("Registered user {}", user.id);

        let token = self.generate_token(&user)?;

        Ok(AuthResponse::bearer(token, user.into()))
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .user_repository
            .find_by_email(&request.email.trim().to_lowercase())
            .await?
            .ok_or_else(invalid)?;

        let matches = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;
        if !matches {
            return Err(invalid());
        }

        let token = self.generate_token(&user)?;

        Ok(AuthResponse::bearer(token, user.into()))
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<UserInfo, AppError> {
        let user = self
            .user_repository
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(self.config.jwt_expiration_days))
            .ok_or_else(|| AppError::internal_server_error_message("Invalid token expiry"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::internal_server_error_message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: "u1".to_string(),
            email: "a@b.c".to_string(),
            role,
            exp: 0,
        }
    }

    #[test]
    fn test_viewer_cannot_edit() {
        assert!(!claims(UserRole::Viewer).can_edit());
        assert!(claims(UserRole::Viewer).require_editor().is_err());
        assert!(claims(UserRole::Manager).require_editor().is_ok());
        assert!(claims(UserRole::Admin).can_edit());
    }

    #[test]
    fn test_token_round_trip() {
        let config = Config::test_config();
        let mut user = User::new(
            "a@b.c".to_string(),
            "hash".to_string(),
            "A".to_string(),
            None,
        );
        user.role = UserRole::Admin;

        let token = {
            let exp = (Utc::now() + Duration::days(1)).timestamp() as usize;
            encode(
                &Header::default(),
                &Claims {
                    sub: user.id.clone(),
                    email: user.email.clone(),
                    role: user.role,
                    exp,
                },
                &EncodingKey::from_secret(config.jwt_secret.as_ref()),
            )
            .unwrap()
        };

        let decoded = decode_token(&token, &config.jwt_secret).unwrap();
        assert_eq!(decoded.sub, user.id);
        assert_eq!(decoded.role, UserRole::Admin);
        assert!(decode_token(&token, "other-secret").is_err());
    }
}
