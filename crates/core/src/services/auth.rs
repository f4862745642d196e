//! Authentication service.
//!
//! Registration and login. Login failures are uniform: an unknown email
//! and a wrong password both come back as the same 401, and no token is
//! issued on either.

use classroom_common::{AppError, AppResult, TokenIssuer};
use classroom_db::entities::user;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::{CreateUserInput, UserService, verify_password};

/// Authentication service for business logic.
#[derive(Clone)]
pub struct AuthService {
    user_service: UserService,
    token_issuer: TokenIssuer,
}

/// Input for registering a new account.
pub type RegisterInput = CreateUserInput;

/// Input for logging in.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// User fields safe to return alongside a token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: user::UserRole,
}

impl From<user::Model> for UserSummary {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

/// A successful register/login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(user_service: UserService, token_issuer: TokenIssuer) -> Self {
        Self {
            user_service,
            token_issuer,
        }
    }

    /// Register a new account and issue a token for it.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        let user = self.user_service.create(input).await?;
        self.issue_for(user)
    }

    /// Log in with email and password.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        input.validate().map_err(|_| AppError::InvalidCredentials)?;

        let user = self
            .user_service
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        self.issue_for(user)
    }

    /// Resolve a bearer token to its user.
    ///
    /// An invalid token and a token for a since-deleted user are both a
    /// plain Unauthorized.
    pub async fn authenticate(&self, token: &str) -> AppResult<user::Model> {
        let claims = self.token_issuer.verify(token)?;
        self.user_service
            .get(&claims.sub)
            .await
            .map_err(|_| AppError::Unauthorized)
    }

    fn issue_for(&self, user: user::Model) -> AppResult<AuthResponse> {
        let role = serde_json::to_value(user.role)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| "Student".to_string());

        let token = self.token_issuer.issue(&user.id, &user.email, &role)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::user::hash_password;
    use chrono::Utc;
    use classroom_common::config::AuthConfig;
    use classroom_db::entities::user::UserRole;
    use classroom_db::repositories::UserRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: "test-secret-which-is-long-enough".to_string(),
            token_expiry_hours: 24,
        })
    }

    fn create_test_user(email: &str, password: &str) -> user::Model {
        user::Model {
            id: "user1".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            role: UserRole::Teacher,
            avatar_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> AuthService {
        AuthService::new(UserService::new(UserRepository::new(db)), test_issuer())
    }

    #[tokio::test]
    async fn test_login_success_issues_token() {
        let user = create_test_user("alice@example.com", "password123");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = service_with(db);
        let response = service
            .login(LoginInput {
                email: "alice@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert!(!response.token.is_empty());
        assert_eq!(response.user.email, "alice@example.com");

        let claims = test_issuer().verify(&response.token).unwrap();
        assert_eq!(claims.sub, "user1");
        assert_eq!(claims.role, "Teacher");
    }

    #[tokio::test]
    async fn test_login_wrong_password_rejected() {
        let user = create_test_user("alice@example.com", "password123");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .login(LoginInput {
                email: "alice@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_rejected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .login(LoginInput {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await;

        // Same error as a wrong password; no hint which part failed.
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
}
