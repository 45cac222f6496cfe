//! Identity-provider capability.
//!
//! Users and tokens belong to a separate identity domain. This trait only
//! names what such a provider offers so that other crates can depend on
//! the capability; the registry itself never calls it.

use thiserror::Error;

use crate::models::identity::{IdentityToken, IdentityUser};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

pub trait IdentityProvider: Send + Sync {
    fn get_user(&self, id: &str) -> impl Future<Output = IdentityResult<IdentityUser>> + Send;
    fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = IdentityResult<IdentityToken>> + Send;
    fn validate_token(&self, token: &str)
    -> impl Future<Output = IdentityResult<IdentityToken>> + Send;
    fn create_user(
        &self,
        user: IdentityUser,
    ) -> impl Future<Output = IdentityResult<IdentityUser>> + Send;
    fn update_user(
        &self,
        user: IdentityUser,
    ) -> impl Future<Output = IdentityResult<IdentityUser>> + Send;
    fn delete_user(&self, id: &str) -> impl Future<Output = IdentityResult<()>> + Send;
    fn get_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = IdentityResult<IdentityUser>> + Send;
    fn get_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = IdentityResult<IdentityUser>> + Send;
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    /// Provider backed by a single known user.
    struct SingleUser(IdentityUser);

    impl SingleUser {
        fn find(&self, matches: bool, key: &str) -> IdentityResult<IdentityUser> {
            if matches {
                Ok(self.0.clone())
            } else {
                Err(IdentityError::UserNotFound(key.to_string()))
            }
        }
    }

    impl IdentityProvider for SingleUser {
        async fn get_user(&self, id: &str) -> IdentityResult<IdentityUser> {
            self.find(self.0.id.to_string() == id, id)
        }

        async fn refresh_token(&self, _refresh_token: &str) -> IdentityResult<IdentityToken> {
            Err(IdentityError::Unavailable("tokens are not issued".into()))
        }

        async fn validate_token(&self, token: &str) -> IdentityResult<IdentityToken> {
            Err(IdentityError::InvalidToken(token.to_string()))
        }

        async fn create_user(&self, user: IdentityUser) -> IdentityResult<IdentityUser> {
            Ok(user)
        }

        async fn update_user(&self, user: IdentityUser) -> IdentityResult<IdentityUser> {
            Ok(user)
        }

        async fn delete_user(&self, id: &str) -> IdentityResult<()> {
            self.get_user(id).await.map(|_| ())
        }

        async fn get_user_by_email(&self, email: &str) -> IdentityResult<IdentityUser> {
            self.find(self.0.email == email, email)
        }

        async fn get_user_by_username(&self, username: &str) -> IdentityResult<IdentityUser> {
            self.find(self.0.username == username, username)
        }
    }

    #[tokio::test]
    async fn lookups_go_through_the_capability() {
        let now = Utc::now();
        let provider = SingleUser(IdentityUser {
            id: Uuid::new_v4(),
            subject: "oidc|alice".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            created_at: now,
            updated_at: now,
        });

        let user = provider.get_user_by_username("alice").await.unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(matches!(
            provider.get_user_by_email("bob@example.com").await,
            Err(IdentityError::UserNotFound(_))
        ));
        assert!(matches!(
            provider.validate_token("garbage").await,
            Err(IdentityError::InvalidToken(_))
        ));
    }
}
