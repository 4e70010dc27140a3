//! Shared test helpers: a recording fake backend.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pwsync_connector::{BackendKind, DirectoryError, DirectoryResult, PasswordBackend};

/// One call made to a fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub backend: String,
    pub username: String,
    pub old_password: String,
    pub new_password: String,
}

impl Call {
    pub fn new(backend: &str, username: &str, old_password: &str, new_password: &str) -> Self {
        Self {
            backend: backend.to_string(),
            username: username.to_string(),
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        }
    }
}

/// Call log shared by all fakes of one test.
pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

type ErrorFactory = Box<dyn Fn() -> DirectoryError + Send + Sync>;

/// Fake backend that records every call and fails on demand.
///
/// It tracks the password it currently holds, so a call whose old password
/// does not match behaves like a rejected bind, and reversals are checked
/// against what was actually set.
pub struct FakeBackend {
    name: String,
    kind: BackendKind,
    log: CallLog,
    current: Mutex<String>,
    fail_with: Option<ErrorFactory>,
    fail_when_setting: HashSet<String>,
}

impl FakeBackend {
    pub fn new(name: &str, password: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            kind: BackendKind::Generic,
            log: Arc::clone(log),
            current: Mutex::new(password.to_string()),
            fail_with: None,
            fail_when_setting: HashSet::new(),
        }
    }

    pub fn domain_controller(mut self) -> Self {
        self.kind = BackendKind::DomainController;
        self
    }

    /// Fail every call with the error produced by `factory`.
    pub fn failing(mut self, factory: impl Fn() -> DirectoryError + Send + Sync + 'static) -> Self {
        self.fail_with = Some(Box::new(factory));
        self
    }

    /// Fail with a connection error whenever `password` is the value to set.
    pub fn failing_when_setting(mut self, password: &str) -> Self {
        self.fail_when_setting.insert(password.to_string());
        self
    }

    pub fn password(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl PasswordBackend for FakeBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> DirectoryResult<()> {
        self.log.lock().unwrap().push(Call::new(
            &self.name,
            username,
            old_password,
            new_password,
        ));

        if let Some(factory) = &self.fail_with {
            return Err(factory());
        }
        if self.fail_when_setting.contains(new_password) {
            return Err(DirectoryError::connection_failed("connection reset by peer"));
        }

        let mut current = self.current.lock().unwrap();
        if *current != old_password {
            return Err(DirectoryError::AuthenticationFailed {
                message: "invalid credentials".to_string(),
            });
        }
        *current = new_password.to_string();
        Ok(())
    }
}

pub fn as_backends(fakes: &[Arc<FakeBackend>]) -> Vec<Arc<dyn PasswordBackend>> {
    fakes
        .iter()
        .map(|f| Arc::clone(f) as Arc<dyn PasswordBackend>)
        .collect()
}
