use uuid::Uuid;

use crate::domain::user::User;
use crate::usecase::contracts::UserRepository;
use crate::usecase::error::UsecaseError;
use crate::usecase::jwt::{JwtService, TokenPair, TokenType};
use crate::usecase::password::{hash_password, verify_password};

const BAD_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthUseCase<U>
where
    U: UserRepository,
{
    user_repository: U,
    jwt_service: JwtService,
}

impl<U> AuthUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repository: U, jwt_service: JwtService) -> Self {
        Self {
            user_repository,
            jwt_service,
        }
    }

    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<(User, TokenPair), UsecaseError> {
        tracing::debug!("registering user");

        if self
            .user_repository
            .find_by_email(email.clone())
            .await?
            .is_some()
        {
            return Err(UsecaseError::Conflict("Email already registered".to_string()));
        }

        let password_hash =
            hash_password(&password).map_err(|e| UsecaseError::Internal(e.to_string()))?;
        let user = User::new(username, email, password_hash);

        // The unique email index backs up the lookup above under
        // concurrent registrations.
        self.user_repository.create(&user).await.map_err(|e| {
            if matches!(e, crate::repository::errors::RepositoryError::Conflict) {
                UsecaseError::Conflict("Email already registered".to_string())
            } else {
                e.into()
            }
        })?;

        let tokens = self
            .jwt_service
            .generate_token_pair(user.id, &user.email)
            .map_err(|e| UsecaseError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok((user, tokens))
    }

    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: String,
        password: String,
    ) -> Result<(User, TokenPair), UsecaseError> {
        tracing::debug!("logging user in");

        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UsecaseError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

        let valid = verify_password(&password, &user.password_hash)
            .map_err(|e| UsecaseError::Internal(e.to_string()))?;
        if !valid {
            tracing::warn!(user_id = %user.id, "login with wrong password");
            return Err(UsecaseError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        let tokens = self
            .jwt_service
            .generate_token_pair(user.id, &user.email)
            .map_err(|e| UsecaseError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user, tokens))
    }

    #[tracing::instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: String) -> Result<TokenPair, UsecaseError> {
        tracing::debug!("refreshing token pair");

        let claims = self
            .jwt_service
            .validate_token(&refresh_token)
            .map_err(|e| UsecaseError::Unauthorized(e.to_string()))?;

        if claims.token_type != TokenType::Refresh {
            return Err(UsecaseError::Unauthorized("Invalid token type".to_string()));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| UsecaseError::Unauthorized("Invalid token subject".to_string()))?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| UsecaseError::Unauthorized("Unknown user".to_string()))?;

        self.jwt_service
            .generate_token_pair(user.id, &user.email)
            .map_err(|e| UsecaseError::Internal(e.to_string()))
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<User, UsecaseError> {
        tracing::debug!("getting profile");

        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("User".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::contracts::MockUserRepository;

    fn jwt() -> JwtService {
        JwtService::new("test-secret".to_string(), 15, 30)
    }

    #[tokio::test]
    async fn test_register_creates_user_and_tokens() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_create().times(1).returning(|_| Ok(()));

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let (user, tokens) = usecase
            .register(
                "chef1".to_string(),
                "chef1@x.com".to_string(),
                "secret1".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(user.username, "chef1");
        assert!(user.password_hash.starts_with("$argon2"));
        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_email().times(1).returning(|email| {
            Ok(Some(User::new(
                "someone".to_string(),
                email,
                "hash".to_string(),
            )))
        });

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .register(
                "chef1".to_string(),
                "chef1@x.com".to_string(),
                "secret1".to_string(),
            )
            .await;

        assert!(matches!(result, Err(UsecaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password_unauthorized() {
        let hash = hash_password("right-password").unwrap();
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(move |email| {
                Ok(Some(User::new("chef1".to_string(), email, hash.clone())))
            });

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .login("chef1@x.com".to_string(), "wrong-password".to_string())
            .await;

        match result {
            Err(UsecaseError::Unauthorized(msg)) => assert_eq!(msg, BAD_CREDENTIALS),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email_uses_same_message() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .login("nobody@x.com".to_string(), "whatever".to_string())
            .await;

        match result {
            Err(UsecaseError::Unauthorized(msg)) => assert_eq!(msg, BAD_CREDENTIALS),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let jwt_service = jwt();
        let pair = jwt_service
            .generate_token_pair(Uuid::new_v4(), "chef1@x.com")
            .unwrap();

        let usecase = AuthUseCase::new(MockUserRepository::new(), jwt_service);
        let result = usecase.refresh(pair.access_token).await;

        assert!(matches!(result, Err(UsecaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_pair() {
        let jwt_service = jwt();
        let user = User::new("chef1".to_string(), "chef1@x.com".to_string(), "h".to_string());
        let pair = jwt_service.generate_token_pair(user.id, &user.email).unwrap();

        let mut mock_repo = MockUserRepository::new();
        let stored = user.clone();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let usecase = AuthUseCase::new(mock_repo, jwt_service);
        let new_pair = usecase.refresh(pair.refresh_token).await.unwrap();

        assert!(!new_pair.access_token.is_empty());
    }
}
