//! Unit tests for the session crate
//!
//! Use-case tests run against an in-memory repository and the real JWT
//! issuer, so token validation paths are exercised end to end.

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use kernel::id::UserId;
    use platform::password::ClearTextPassword;
    use uuid::Uuid;

    use crate::domain::entity::{refresh_token::RefreshRecord, user::User};
    use crate::domain::repository::{RefreshTokenRepository, UserRepository};
    use crate::domain::value_object::{credential::Credential, email::Email};
    use crate::error::SessionResult;

    #[derive(Default)]
    struct MemoryInner {
        users: HashMap<Uuid, User>,
        refresh: HashMap<Uuid, RefreshRecord>,
        credential_writes: u32,
    }

    /// In-memory repository standing in for Postgres
    #[derive(Clone, Default)]
    pub struct MemoryRepo {
        inner: Arc<Mutex<MemoryInner>>,
    }

    impl MemoryRepo {
        pub fn insert_user(&self, user: User) {
            let mut guard = self.inner.lock().unwrap();
            guard.users.insert(*user.id.as_uuid(), user);
        }

        pub fn remove_user(&self, user_id: &UserId) {
            self.inner.lock().unwrap().users.remove(user_id.as_uuid());
        }

        pub fn stored_credential(&self, user_id: &UserId) -> Credential {
            self.inner.lock().unwrap().users[user_id.as_uuid()]
                .credential
                .clone()
        }

        pub fn credential_writes(&self) -> u32 {
            self.inner.lock().unwrap().credential_writes
        }

        pub fn refresh_record(&self, user_id: &UserId) -> Option<RefreshRecord> {
            self.inner
                .lock()
                .unwrap()
                .refresh
                .get(user_id.as_uuid())
                .cloned()
        }

        pub fn refresh_count(&self) -> usize {
            self.inner.lock().unwrap().refresh.len()
        }
    }

    impl UserRepository for MemoryRepo {
        async fn find_by_email(&self, email: &Email) -> SessionResult<Option<User>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .users
                .values()
                .find(|u| u.email == *email)
                .cloned())
        }

        async fn find_by_id(&self, user_id: &UserId) -> SessionResult<Option<User>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .users
                .get(user_id.as_uuid())
                .cloned())
        }

        async fn update_credential(
            &self,
            user_id: &UserId,
            credential: &Credential,
        ) -> SessionResult<()> {
            let mut guard = self.inner.lock().unwrap();
            let inner = &mut *guard;
            if let Some(user) = inner.users.get_mut(user_id.as_uuid()) {
                user.credential = credential.clone();
                inner.credential_writes += 1;
            }
            Ok(())
        }
    }

    impl RefreshTokenRepository for MemoryRepo {
        async fn find_by_user_id(&self, user_id: &UserId) -> SessionResult<Option<RefreshRecord>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .refresh
                .get(user_id.as_uuid())
                .cloned())
        }

        async fn upsert(&self, record: &RefreshRecord) -> SessionResult<()> {
            self.inner
                .lock()
                .unwrap()
                .refresh
                .insert(*record.user_id.as_uuid(), record.clone());
            Ok(())
        }

        async fn delete_by_user_id(&self, user_id: &UserId) -> SessionResult<u64> {
            let removed = self
                .inner
                .lock()
                .unwrap()
                .refresh
                .remove(user_id.as_uuid());
            Ok(if removed.is_some() { 1 } else { 0 })
        }
    }

    pub fn user_with_hashed_credential(email: &str, password: &str) -> User {
        let hashed = ClearTextPassword::new(password.to_string()).hash().unwrap();
        User::new(
            Email::new(email).unwrap(),
            "tester",
            Credential::Hashed(hashed),
        )
    }

    pub fn user_with_legacy_credential(email: &str, password: &str) -> User {
        User::new(
            Email::new(email).unwrap(),
            "tester",
            Credential::from_stored(password.to_string()),
        )
    }
}

#[cfg(test)]
mod login_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::config::SessionConfig;
    use crate::application::login::{LoginInput, LoginUseCase};
    use crate::error::SessionError;
    use crate::infra::jwt::JwtTokenIssuer;

    fn use_case(repo: &MemoryRepo) -> LoginUseCase<MemoryRepo, JwtTokenIssuer> {
        let config = Arc::new(SessionConfig::default());
        let issuer = Arc::new(JwtTokenIssuer::from_config(&config));
        LoginUseCase::new(Arc::new(repo.clone()), issuer, config)
    }

    fn input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_with_hashed_credential() {
        let repo = MemoryRepo::default();
        let user = user_with_hashed_credential("test@test.com", "correct-horse");
        let user_id = user.id;
        repo.insert_user(user);

        let output = use_case(&repo)
            .execute(input("test@test.com", "correct-horse"))
            .await
            .unwrap();

        assert_eq!(output.user.id, user_id);
        assert_eq!(output.user.email.as_str(), "test@test.com");
        assert!(!output.access_token.is_empty());
        assert!(!output.refresh_token.is_empty());

        // Refresh record created and holds the issued token
        let record = repo.refresh_record(&user_id).unwrap();
        assert!(record.matches(&output.refresh_token));

        // Hashed path performs no credential write
        assert_eq!(repo.credential_writes(), 0);
    }

    #[tokio::test]
    async fn test_login_fail_email_not_found() {
        let repo = MemoryRepo::default();

        let err = use_case(&repo)
            .execute(input("nobody@test.com", "whatever1"))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::NotFoundEmail));
        assert_eq!(repo.refresh_count(), 0);
    }

    #[tokio::test]
    async fn test_login_fail_wrong_password() {
        let repo = MemoryRepo::default();
        repo.insert_user(user_with_hashed_credential("test@test.com", "correct-horse"));

        let err = use_case(&repo)
            .execute(input("test@test.com", "wrong-horse"))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::WrongPassword));
        assert_eq!(repo.refresh_count(), 0);
    }

    #[tokio::test]
    async fn test_login_migrates_legacy_credential_once() {
        let repo = MemoryRepo::default();
        let user = user_with_legacy_credential("legacy@test.com", "pw1-legacy");
        let user_id = user.id;
        repo.insert_user(user);

        // First login upgrades the stored credential
        use_case(&repo)
            .execute(input("legacy@test.com", "pw1-legacy"))
            .await
            .unwrap();

        assert!(repo.stored_credential(&user_id).is_hashed());
        assert_eq!(repo.credential_writes(), 1);

        // Second login goes through the hashed path, no further write
        use_case(&repo)
            .execute(input("legacy@test.com", "pw1-legacy"))
            .await
            .unwrap();

        assert_eq!(repo.credential_writes(), 1);
    }

    #[tokio::test]
    async fn test_login_legacy_mismatch_does_not_migrate() {
        let repo = MemoryRepo::default();
        let user = user_with_legacy_credential("legacy@test.com", "pw1-legacy");
        let user_id = user.id;
        repo.insert_user(user);

        let err = use_case(&repo)
            .execute(input("legacy@test.com", "wrong-password"))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::WrongPassword));
        assert!(!repo.stored_credential(&user_id).is_hashed());
        assert_eq!(repo.credential_writes(), 0);
    }

    #[tokio::test]
    async fn test_repeated_logins_keep_single_record() {
        let repo = MemoryRepo::default();
        let user = user_with_hashed_credential("test@test.com", "correct-horse");
        let user_id = user.id;
        repo.insert_user(user);
        let use_case = use_case(&repo);

        let first = use_case
            .execute(input("test@test.com", "correct-horse"))
            .await
            .unwrap();
        let second = use_case
            .execute(input("test@test.com", "correct-horse"))
            .await
            .unwrap();

        assert_ne!(first.refresh_token, second.refresh_token);
        assert_eq!(repo.refresh_count(), 1);

        // The stored record holds the most recent token only
        let record = repo.refresh_record(&user_id).unwrap();
        assert!(record.matches(&second.refresh_token));
        assert!(!record.matches(&first.refresh_token));
    }
}

#[cfg(test)]
mod refresh_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::config::SessionConfig;
    use crate::application::login::{LoginInput, LoginUseCase};
    use crate::application::refresh::RefreshUseCase;
    use crate::domain::token::TokenIssuer;
    use crate::error::SessionError;
    use crate::infra::jwt::JwtTokenIssuer;

    struct Fixture {
        repo: MemoryRepo,
        issuer: Arc<JwtTokenIssuer>,
        login: LoginUseCase<MemoryRepo, JwtTokenIssuer>,
        refresh: RefreshUseCase<MemoryRepo, JwtTokenIssuer>,
    }

    fn fixture() -> Fixture {
        let repo = MemoryRepo::default();
        let config = Arc::new(SessionConfig::default());
        let issuer = Arc::new(JwtTokenIssuer::from_config(&config));
        let login = LoginUseCase::new(Arc::new(repo.clone()), issuer.clone(), config);
        let refresh = RefreshUseCase::new(Arc::new(repo.clone()), issuer.clone());
        Fixture {
            repo,
            issuer,
            login,
            refresh,
        }
    }

    async fn login(f: &Fixture, email: &str, password: &str) -> String {
        f.login
            .execute(LoginInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
            .refresh_token
    }

    #[tokio::test]
    async fn test_refresh_success_reissues_access_only() {
        let f = fixture();
        let user = user_with_hashed_credential("test@test.com", "correct-horse");
        let user_id = user.id;
        f.repo.insert_user(user);

        let refresh_token = login(&f, "test@test.com", "correct-horse").await;

        let output = f.refresh.execute(Some(&refresh_token)).await.unwrap();
        assert_eq!(output.user.id, user_id);
        assert!(!output.access_token.is_empty());

        // No rotation: the stored refresh token is untouched and stays
        // usable
        let record = f.repo.refresh_record(&user_id).unwrap();
        assert!(record.matches(&refresh_token));
        assert!(f.refresh.execute(Some(&refresh_token)).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_missing_or_blank_token_unauthorized() {
        let f = fixture();

        let err = f.refresh.execute(None).await.unwrap_err();
        assert!(matches!(err, SessionError::UnauthorizedUser));

        let err = f.refresh.execute(Some("   ")).await.unwrap_err();
        assert!(matches!(err, SessionError::UnauthorizedUser));
    }

    #[tokio::test]
    async fn test_refresh_garbage_token_unauthorized() {
        let f = fixture();

        let err = f.refresh.execute(Some("not-a-jwt")).await.unwrap_err();
        assert!(matches!(err, SessionError::UnauthorizedUser));
    }

    #[tokio::test]
    async fn test_refresh_superseded_token_unauthorized() {
        let f = fixture();
        f.repo
            .insert_user(user_with_hashed_credential("test@test.com", "correct-horse"));

        let first = login(&f, "test@test.com", "correct-horse").await;
        let second = login(&f, "test@test.com", "correct-horse").await;

        // The earlier token is cryptographically valid but no longer on
        // record
        let err = f.refresh.execute(Some(&first)).await.unwrap_err();
        assert!(matches!(err, SessionError::UnauthorizedUser));

        assert!(f.refresh.execute(Some(&second)).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_without_stored_record_unauthorized() {
        let f = fixture();
        let user = user_with_hashed_credential("test@test.com", "correct-horse");
        let user_id = user.id;
        f.repo.insert_user(user);

        // Valid signature, but nothing on record for the user
        let token = f.issuer.issue_refresh(&user_id).unwrap();

        let err = f.refresh.execute(Some(&token)).await.unwrap_err();
        assert!(matches!(err, SessionError::UnauthorizedUser));
    }

    #[tokio::test]
    async fn test_refresh_deleted_user_not_found() {
        let f = fixture();
        let user = user_with_hashed_credential("test@test.com", "correct-horse");
        let user_id = user.id;
        f.repo.insert_user(user);

        let refresh_token = login(&f, "test@test.com", "correct-horse").await;
        f.repo.remove_user(&user_id);

        let err = f.refresh.execute(Some(&refresh_token)).await.unwrap_err();
        assert!(matches!(err, SessionError::NotFoundUser));
    }
}

#[cfg(test)]
mod logout_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::config::SessionConfig;
    use crate::application::login::{LoginInput, LoginUseCase};
    use crate::application::logout::{LogoutOutcome, LogoutUseCase};
    use crate::infra::jwt::JwtTokenIssuer;

    struct Fixture {
        repo: MemoryRepo,
        login: LoginUseCase<MemoryRepo, JwtTokenIssuer>,
        logout: LogoutUseCase<MemoryRepo, JwtTokenIssuer>,
    }

    fn fixture() -> Fixture {
        let repo = MemoryRepo::default();
        let config = Arc::new(SessionConfig::default());
        let issuer = Arc::new(JwtTokenIssuer::from_config(&config));
        let login = LoginUseCase::new(Arc::new(repo.clone()), issuer.clone(), config);
        let logout = LogoutUseCase::new(Arc::new(repo.clone()), issuer);
        Fixture { repo, login, logout }
    }

    async fn login(f: &Fixture, email: &str, password: &str) -> String {
        f.login
            .execute(LoginInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
            .refresh_token
    }

    #[tokio::test]
    async fn test_logout_with_valid_token_clears_record() {
        let f = fixture();
        let user = user_with_hashed_credential("test@test.com", "correct-horse");
        let user_id = user.id;
        f.repo.insert_user(user);

        let refresh_token = login(&f, "test@test.com", "correct-horse").await;
        assert!(f.repo.refresh_record(&user_id).is_some());

        let outcome = f.logout.execute(Some(&refresh_token)).await;
        assert!(matches!(outcome, LogoutOutcome::Cleared { user_id: id } if id == user_id));
        assert!(f.repo.refresh_record(&user_id).is_none());
    }

    #[tokio::test]
    async fn test_logout_with_garbage_token_is_ignored() {
        let f = fixture();
        let user = user_with_hashed_credential("test@test.com", "correct-horse");
        let user_id = user.id;
        f.repo.insert_user(user);

        login(&f, "test@test.com", "correct-horse").await;

        let outcome = f.logout.execute(Some("garbage-token")).await;
        assert!(matches!(outcome, LogoutOutcome::Ignored));

        // Nothing matched, nothing deleted
        assert!(f.repo.refresh_record(&user_id).is_some());
    }

    #[tokio::test]
    async fn test_logout_without_token_is_ignored() {
        let f = fixture();

        assert!(matches!(f.logout.execute(None).await, LogoutOutcome::Ignored));
        assert!(matches!(
            f.logout.execute(Some("")).await,
            LogoutOutcome::Ignored
        ));
    }

    #[tokio::test]
    async fn test_logout_with_valid_token_but_no_record_is_ignored() {
        let f = fixture();
        let user = user_with_hashed_credential("test@test.com", "correct-horse");
        let user_id = user.id;
        f.repo.insert_user(user);

        let refresh_token = login(&f, "test@test.com", "correct-horse").await;

        // First logout clears, second finds nothing to delete
        f.logout.execute(Some(&refresh_token)).await;
        let outcome = f.logout.execute(Some(&refresh_token)).await;
        assert!(matches!(outcome, LogoutOutcome::Ignored));
        assert!(f.repo.refresh_record(&user_id).is_none());
    }
}
