use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use workshop_auth::domain::clock::Clock;
use workshop_auth::domain::repository::{OtpMailer, OtpRepository, SignupRepository};
use workshop_auth::domain::types::{OtpPolicy, OtpRecord, PendingSignup, Role, User};
use workshop_auth::error::AuthServiceError;
use workshop_auth::usecase::hashing::hash_secret;

// ── ManualClock ──────────────────────────────────────────────────────────────

/// Test clock stepped explicitly; lets expiry and cooldown tests run without
/// sleeping.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn start_of_test() -> Self {
        Self::at(Utc::now())
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockOtpRepo {
    pub codes: Arc<Mutex<Vec<OtpRecord>>>,
}

impl MockOtpRepo {
    pub fn empty() -> Self {
        Self {
            codes: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Shared handle to the code list for post-execution inspection.
    pub fn codes_handle(&self) -> Arc<Mutex<Vec<OtpRecord>>> {
        Arc::clone(&self.codes)
    }
}

impl OtpRepository for MockOtpRepo {
    async fn latest_active(&self, email: &str) -> Result<Option<OtpRecord>, AuthServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.email == email && !c.consumed)
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn invalidate_all(&self, email: &str) -> Result<(), AuthServiceError> {
        for c in self.codes.lock().unwrap().iter_mut() {
            if c.email == email {
                c.consumed = true;
            }
        }
        Ok(())
    }

    async fn create(&self, record: &OtpRecord) -> Result<(), AuthServiceError> {
        self.codes.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<(), AuthServiceError> {
        if let Some(c) = self.codes.lock().unwrap().iter_mut().find(|c| c.id == id) {
            c.attempts += 1;
        }
        Ok(())
    }

    async fn mark_consumed(&self, id: Uuid) -> Result<(), AuthServiceError> {
        if let Some(c) = self.codes.lock().unwrap().iter_mut().find(|c| c.id == id) {
            c.consumed = true;
        }
        Ok(())
    }
}

// ── MockSignupRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSignupRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub pendings: Arc<Mutex<Vec<PendingSignup>>>,
    /// Shares the OTP store so `promote` can consume the record with the same
    /// atomicity the real transaction has.
    pub otps: Arc<Mutex<Vec<OtpRecord>>>,
    /// When set, `promote` fails as if the transaction hit an infrastructure
    /// error after rolling back.
    pub fail_promote: bool,
}

impl MockSignupRepo {
    pub fn empty() -> Self {
        Self {
            users: Arc::new(Mutex::new(vec![])),
            pendings: Arc::new(Mutex::new(vec![])),
            otps: Arc::new(Mutex::new(vec![])),
            fail_promote: false,
        }
    }

    pub fn sharing_otps_with(otp_repo: &MockOtpRepo) -> Self {
        Self {
            otps: otp_repo.codes_handle(),
            ..Self::empty()
        }
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        *self.users.lock().unwrap() = users;
        self
    }

    pub fn with_pendings(self, pendings: Vec<PendingSignup>) -> Self {
        *self.pendings.lock().unwrap() = pendings;
        self
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }

    pub fn pendings_handle(&self) -> Arc<Mutex<Vec<PendingSignup>>> {
        Arc::clone(&self.pendings)
    }
}

impl SignupRepository for MockSignupRepo {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn upsert_pending(&self, pending: &PendingSignup) -> Result<(), AuthServiceError> {
        let mut pendings = self.pendings.lock().unwrap();
        pendings.retain(|p| p.email != pending.email);
        pendings.push(pending.clone());
        Ok(())
    }

    async fn find_pending(&self, email: &str) -> Result<Option<PendingSignup>, AuthServiceError> {
        Ok(self
            .pendings
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn promote(&self, email: &str, otp_id: Uuid) -> Result<User, AuthServiceError> {
        // Lock everything for the whole operation — the mock's stand-in for
        // transaction isolation. No await point between check and insert.
        let mut users = self.users.lock().unwrap();
        let mut pendings = self.pendings.lock().unwrap();
        let mut otps = self.otps.lock().unwrap();

        if self.fail_promote {
            return Err(AuthServiceError::Storage(anyhow::anyhow!(
                "injected transaction failure"
            )));
        }

        let pending = pendings
            .iter()
            .find(|p| p.email == email)
            .cloned()
            .ok_or(AuthServiceError::NoPendingSignup)?;

        if users.iter().any(|u| u.email == email) {
            return Err(AuthServiceError::AlreadyRegistered);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: pending.email.clone(),
            name: pending.name.clone(),
            password_hash: pending.password_hash.clone(),
            role: pending.role,
            active: true,
            banned: false,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        pendings.retain(|p| p.email != email);
        if let Some(c) = otps.iter_mut().find(|c| c.id == otp_id) {
            c.consumed = true;
        }
        Ok(user)
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn working() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::working()
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.sent)
    }

    /// Plaintext of the most recently delivered code.
    pub fn last_code(&self) -> String {
        self.sent
            .lock()
            .unwrap()
            .last()
            .expect("no mail sent")
            .1
            .clone()
    }
}

impl OtpMailer for MockMailer {
    async fn send_code(
        &self,
        to: &str,
        code: &str,
        _expires_in_minutes: i64,
    ) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::EmailSend(anyhow::anyhow!(
                "injected smtp failure"
            )));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), code.to_owned()));
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_policy() -> OtpPolicy {
    OtpPolicy {
        code_length: 6,
        expiry_minutes: 5,
        resend_cooldown_seconds: 60,
        max_attempts: 5,
    }
}

pub fn test_user(email: &str, password: &str, role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        name: "Test User".to_owned(),
        password_hash: hash_secret(password).unwrap(),
        role,
        active: true,
        banned: false,
        created_at: Utc::now(),
    }
}

pub fn test_pending(email: &str, role: Role) -> PendingSignup {
    let now = Utc::now();
    PendingSignup {
        email: email.to_owned(),
        name: "Test User".to_owned(),
        password_hash: hash_secret("hunter2hunter2").unwrap(),
        role,
        created_at: now,
        updated_at: now,
    }
}
