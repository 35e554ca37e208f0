//! Authentication service: user accounts, login and bearer tokens
//!
//! Provides:
//! - User creation
//! - Login against the shared accepted password
//! - JWT signing and verification
//! - Resolving the acting user from an `Authorization` header

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::db::{CreateUser, Database, UserRecord};
use crate::error::{CatalogError, CatalogResult};

/// The only password accepted by [AuthService::login]. Passwords are not stored.
pub const ACCEPTED_PASSWORD: &str = "password";

const BEARER_PREFIX: &str = "bearer ";

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims carried by a login token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub username: String,
    /// User ID
    pub id: String,
    /// Issued at timestamp
    pub iat: i64,
}

// ============================================================================
// Auth Types
// ============================================================================

/// The user acting on a request, resolved from its bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub UserRecord);

/// Arguments of `createUser`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserArgs {
    pub username: String,
    pub favorite_genre: String,
}

/// Arguments of `login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginArgs {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Create a new user account
    pub async fn create_user(&self, args: CreateUserArgs) -> CatalogResult<UserRecord> {
        let user = self
            .db
            .users()
            .create(CreateUser {
                username: args.username.clone(),
                favorite_genre: args.favorite_genre.clone(),
            })
            .await
            .map_err(|e| CatalogError::user_input(e.to_string(), &args))?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Check credentials and issue a signed token
    pub async fn login(&self, args: LoginArgs) -> CatalogResult<String> {
        let user = self.db.users().get_by_username(&args.username).await?;

        let user = match user {
            Some(user) if args.password == ACCEPTED_PASSWORD => user,
            _ => {
                debug!(username = %args.username, "Login rejected");
                return Err(CatalogError::user_input("Wrong credentials", &args));
            }
        };

        let token = self.sign_token(&user)?;
        info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(token)
    }

    /// Sign a token carrying the user's name and id
    pub fn sign_token(&self, user: &UserRecord) -> CatalogResult<String> {
        let claims = TokenClaims {
            username: user.username.clone(),
            id: user.id.clone(),
            iat: Utc::now().timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify a token's signature and decode its claims
    pub fn verify_token(&self, token: &str) -> CatalogResult<TokenClaims> {
        // Tokens carry no expiry.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }

    /// Resolve the acting user from an `Authorization` header value.
    ///
    /// A missing or non-bearer header, or a token whose user no longer exists,
    /// yields `None`. A bearer token that fails verification is an error.
    pub async fn current_user(
        &self,
        authorization: Option<&str>,
    ) -> CatalogResult<Option<CurrentUser>> {
        let Some(token) = authorization.and_then(bearer_token) else {
            return Ok(None);
        };

        let claims = self.verify_token(token)?;
        let user = self.db.users().get_by_id(&claims.id).await?;
        if user.is_none() {
            debug!(user_id = %claims.id, "Token refers to an unknown user");
        }
        Ok(user.map(CurrentUser))
    }
}

/// Strip a case-insensitive `Bearer ` scheme label from a header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let scheme = header.get(..BEARER_PREFIX.len())?;
    if scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        Some(&header[BEARER_PREFIX.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    async fn service() -> AuthService {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        AuthService::new(
            db,
            AuthConfig {
                jwt_secret: "test-secret".to_string(),
            },
        )
    }

    fn create_args(username: &str) -> CreateUserArgs {
        CreateUserArgs {
            username: username.to_string(),
            favorite_genre: "refactoring".to_string(),
        }
    }

    fn login_args(username: &str, password: &str) -> LoginArgs {
        LoginArgs {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("BEARER abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token(""), None);
        // a multi-byte character straddling the prefix boundary
        assert_eq!(bearer_token("bearerétoken"), None);
    }

    #[tokio::test]
    async fn test_login_token_decodes_to_user_id() {
        let auth = service().await;
        let user = auth.create_user(create_args("martin")).await.unwrap();

        let token = auth.login(login_args("martin", ACCEPTED_PASSWORD)).await.unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.username, "martin");
    }

    #[tokio::test]
    async fn test_wrong_password_is_user_input_error() {
        let auth = service().await;
        auth.create_user(create_args("martin")).await.unwrap();

        let err = auth.login(login_args("martin", "hunter2")).await.unwrap_err();
        assert_matches!(&err, CatalogError::UserInput { message, invalid_args } => {
            assert_eq!(message, "Wrong credentials");
            assert_eq!(invalid_args, &json!({ "username": "martin" }));
        });
    }

    #[tokio::test]
    async fn test_unknown_user_cannot_login() {
        let auth = service().await;
        let err = auth
            .login(login_args("nobody", ACCEPTED_PASSWORD))
            .await
            .unwrap_err();
        assert_matches!(err, CatalogError::UserInput { .. });
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let auth = service().await;
        auth.create_user(create_args("martin")).await.unwrap();

        let err = auth.create_user(create_args("martin")).await.unwrap_err();
        assert_matches!(&err, CatalogError::UserInput { message, invalid_args } => {
            assert_eq!(message, "duplicate key: `username` must be unique");
            assert_eq!(
                invalid_args,
                &json!({ "username": "martin", "favoriteGenre": "refactoring" })
            );
        });
    }

    #[tokio::test]
    async fn test_current_user() {
        let auth = service().await;
        let user = auth.create_user(create_args("martin")).await.unwrap();
        let token = auth.sign_token(&user).unwrap();

        let header = format!("bearer {}", token);
        let current = auth.current_user(Some(&header)).await.unwrap();
        assert_eq!(current, Some(CurrentUser(user)));

        assert_eq!(auth.current_user(None).await.unwrap(), None);
        assert_eq!(auth.current_user(Some("Basic abc")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_token_is_an_error() {
        let auth = service().await;
        let err = auth
            .current_user(Some("Bearer not-a-token"))
            .await
            .unwrap_err();
        assert_matches!(err, CatalogError::Token(_));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let auth = service().await;
        let user = auth.create_user(create_args("martin")).await.unwrap();

        let other = AuthService::new(
            auth.db.clone(),
            AuthConfig {
                jwt_secret: "another-secret".to_string(),
            },
        );
        let token = other.sign_token(&user).unwrap();
        assert_matches!(auth.verify_token(&token), Err(CatalogError::Token(_)));
    }

    #[tokio::test]
    async fn test_token_for_unknown_user_yields_none() {
        let auth = service().await;
        let ghost = UserRecord {
            id: "ghost".to_string(),
            username: "ghost".to_string(),
            favorite_genre: "horror".to_string(),
            created_at: String::new(),
        };
        let token = auth.sign_token(&ghost).unwrap();
        let header = format!("Bearer {}", token);
        assert_eq!(auth.current_user(Some(&header)).await.unwrap(), None);
    }
}
