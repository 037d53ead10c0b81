use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future;

use super::client::{AuthClient, BoxedAuthFuture, Credentials};
use crate::error::AuthError;
use crate::session::{BoxedSessionFuture, Session, SessionSource};

pub const INVALID_CREDENTIALS: &str = "invalid credentials";
pub const ACCOUNT_EXISTS: &str = "an account with this email already exists";

#[derive(Debug)]
struct Account {
    user_id: String,
    password: String,
}

#[derive(Debug, Default)]
struct BackendState {
    accounts: BTreeMap<String, Account>,
    current: Option<Session>,
    next_user_id: u64,
    sign_in_calls: u32,
    sign_up_calls: u32,
}

/// Account registry and current session kept in memory. Serves both as the auth
/// client and as the session source, so a successful call is visible to the next
/// session refetch. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryAuthBackend {
    state: Arc<RwLock<BackendState>>,
}

impl InMemoryAuthBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account without signing it in.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        {
            let mut state = self.write();
            let user_id = state.allocate_user_id();
            state.accounts.insert(
                normalize_email(email),
                Account {
                    user_id,
                    password: password.to_owned(),
                },
            );
        }
        self
    }

    pub fn sign_in_calls(&self) -> u32 {
        self.read().sign_in_calls
    }

    pub fn sign_up_calls(&self) -> u32 {
        self.read().sign_up_calls
    }

    pub fn sign_out(&self) {
        self.write().current = None;
    }

    fn read(&self) -> RwLockReadGuard<'_, BackendState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, BackendState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let mut state = self.write();
        state.sign_in_calls += 1;
        let email = normalize_email(&credentials.email);
        let Some(account) = state.accounts.get(&email) else {
            tracing::debug!("sign-in for unknown account");
            return Err(AuthError::new(INVALID_CREDENTIALS));
        };
        if account.password != credentials.password {
            tracing::debug!(user_id = %account.user_id, "sign-in with wrong password");
            return Err(AuthError::new(INVALID_CREDENTIALS));
        }
        let session = Session {
            user_id: account.user_id.clone(),
            email,
        };
        state.current = Some(session.clone());
        Ok(session)
    }

    fn register(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let mut state = self.write();
        state.sign_up_calls += 1;
        let email = normalize_email(&credentials.email);
        if state.accounts.contains_key(&email) {
            return Err(AuthError::new(ACCOUNT_EXISTS));
        }
        let user_id = state.allocate_user_id();
        state.accounts.insert(
            email.clone(),
            Account {
                user_id: user_id.clone(),
                password: credentials.password.clone(),
            },
        );
        let session = Session { user_id, email };
        state.current = Some(session.clone());
        Ok(session)
    }
}

impl BackendState {
    fn allocate_user_id(&mut self) -> String {
        self.next_user_id += 1;
        format!("user-{}", self.next_user_id)
    }
}

impl AuthClient for InMemoryAuthBackend {
    fn sign_in<'a>(&'a self, credentials: &'a Credentials) -> BoxedAuthFuture<'a> {
        Box::pin(future::ready(
            self.authenticate(credentials).map_err(Into::into),
        ))
    }

    fn sign_up<'a>(&'a self, credentials: &'a Credentials) -> BoxedAuthFuture<'a> {
        Box::pin(future::ready(self.register(credentials).map_err(Into::into)))
    }
}

impl SessionSource for InMemoryAuthBackend {
    fn fetch_session(&self) -> BoxedSessionFuture<'_> {
        let current = self.read().current.clone();
        Box::pin(future::ready(Ok(current)))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthFailure;
    use futures::executor::block_on;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log lock")).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn sign_up_then_sign_in() {
        let backend = InMemoryAuthBackend::new();
        let credentials = Credentials::new("New@Example.com", "long-password");

        let registered = block_on(backend.sign_up(&credentials)).expect("sign up");
        assert_eq!(registered.email, "new@example.com");

        backend.sign_out();
        let signed_in = block_on(backend.sign_in(&credentials)).expect("sign in");
        assert_eq!(signed_in.user_id, registered.user_id);
        assert_eq!(
            block_on(backend.fetch_session()).expect("fetch"),
            Some(signed_in)
        );
    }

    #[test]
    fn wrong_password_is_a_domain_rejection() {
        let backend = InMemoryAuthBackend::new().with_account("a@b.com", "secret");
        let result = block_on(backend.sign_in(&Credentials::new("a@b.com", "nope")));
        match result {
            Err(AuthFailure::Rejected(error)) => assert_eq!(error.message, INVALID_CREDENTIALS),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(block_on(backend.fetch_session()).expect("fetch"), None);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let backend = InMemoryAuthBackend::new().with_account("a@b.com", "secret");
        let result = block_on(backend.sign_up(&Credentials::new("a@b.com", "another-pass")));
        assert!(matches!(
            result,
            Err(AuthFailure::Rejected(ref error)) if error.message == ACCOUNT_EXISTS
        ));
    }

    #[test]
    fn every_call_is_an_independent_attempt() {
        let backend = InMemoryAuthBackend::new().with_account("a@b.com", "secret");
        let credentials = Credentials::new("a@b.com", "secret");
        block_on(backend.sign_in(&credentials)).expect("first");
        block_on(backend.sign_in(&credentials)).expect("second");
        assert_eq!(backend.sign_in_calls(), 2);
        assert_eq!(backend.sign_up_calls(), 0);
    }

    #[test]
    fn failed_sign_in_logs_do_not_contain_the_email() {
        let backend = InMemoryAuthBackend::new().with_account("known@b.com", "secret");
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            block_on(backend.sign_in(&Credentials::new("known@b.com", "nope")))
                .expect_err("wrong password");
            block_on(backend.sign_in(&Credentials::new("stranger@b.com", "secret")))
                .expect_err("unknown account");
        });

        let output = logs.contents();
        assert!(output.contains("sign-in with wrong password"));
        assert!(output.contains("sign-in for unknown account"));
        assert!(!output.contains("known@b.com"));
        assert!(!output.contains("stranger@b.com"));
    }
}
