//! Process-local game store.
//!
//! Implements every driven port over plain collections guarded by one
//! `tokio::sync::Mutex`. Each port call holds the lock for its whole
//! read/evaluate/write sequence, which gives the same atomicity the database
//! obtains from row locks and the phone unique index. The server falls back
//! to this store when no database URL is configured.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::ports::{
    AdminAuditLog, AdminAuditLogError, AdminRepository, AdminRepositoryError, AttemptWrite,
    GameSettingsRepository, GameSettingsRepositoryError, PlayerRepository, PlayerRepositoryError,
};
use crate::domain::{
    Admin, AdminAuditEntry, AdminId, Attempt, AttemptReceipt, Difference, DiscountPercent,
    DiscountRange, DiscountRangeError, DiscountRanges, GameSettings, LockoutPolicy, LoginDecision,
    PasswordDigest, PasswordDigestError, PhoneNumber, PlayerName, User, UserId,
};

/// Settings matching the row seeded by the initial migration.
pub fn launch_settings() -> Result<GameSettings, DiscountRangeError> {
    let ranges = DiscountRanges::new(vec![
        DiscountRange::new(0.0, Some(10.0), DiscountPercent::new(20)?)?,
        DiscountRange::new(11.0, None, DiscountPercent::new(10)?)?,
    ]);
    Ok(GameSettings::new(3, ranges))
}

#[derive(Debug)]
struct StoreState {
    settings: GameSettings,
    users: HashMap<UserId, User>,
    phones: HashMap<PhoneNumber, UserId>,
    attempts: Vec<Attempt>,
    admins: HashMap<AdminId, Admin>,
    audit: Vec<AdminAuditEntry>,
}

/// In-memory implementation of the player, settings, admin and audit ports.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct InMemoryGameStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryGameStore {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                settings,
                users: HashMap::new(),
                phones: HashMap::new(),
                attempts: Vec::new(),
                admins: HashMap::new(),
                audit: Vec::new(),
            })),
        }
    }

    /// Replace the game settings, as an operator would.
    pub async fn replace_settings(&self, settings: GameSettings) {
        self.state.lock().await.settings = settings;
    }

    /// Create an admin account with a freshly hashed password.
    pub async fn insert_admin(
        &self,
        id: AdminId,
        password: &str,
    ) -> Result<(), PasswordDigestError> {
        let digest = PasswordDigest::hash(password)?;
        self.state
            .lock()
            .await
            .admins
            .insert(id, Admin::new(id, digest, 0, None));
        Ok(())
    }

    /// Current state of an admin account.
    pub async fn admin(&self, id: &AdminId) -> Option<Admin> {
        self.state.lock().await.admins.get(id).cloned()
    }

    /// Current state of a player.
    pub async fn user(&self, id: &UserId) -> Option<User> {
        self.state.lock().await.users.get(id).cloned()
    }

    /// Attempts stored for one player, oldest first.
    pub async fn attempts_for(&self, id: &UserId) -> Vec<Attempt> {
        self.state
            .lock()
            .await
            .attempts
            .iter()
            .filter(|attempt| attempt.user_id == *id)
            .cloned()
            .collect()
    }

    /// Audit entries in append order.
    pub async fn audit_entries(&self) -> Vec<AdminAuditEntry> {
        self.state.lock().await.audit.clone()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryGameStore {
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<User>, PlayerRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .phones
            .get(phone)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn insert_if_absent(
        &self,
        name: &PlayerName,
        phone: &PhoneNumber,
        registered_at: DateTime<Utc>,
    ) -> Result<Option<User>, PlayerRepositoryError> {
        let mut state = self.state.lock().await;
        if state.phones.contains_key(phone) {
            return Ok(None);
        }

        let user = User::register(
            name.clone(),
            phone.clone(),
            state.settings.attempts_number(),
            registered_at,
        );
        state.phones.insert(phone.clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(Some(user))
    }

    async fn record_attempt(
        &self,
        user_id: &UserId,
        difference: Difference,
        recorded_at: DateTime<Utc>,
    ) -> Result<AttemptWrite, PlayerRepositoryError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(stored) = state.users.get_mut(user_id) else {
            return Ok(AttemptWrite::UserNotFound);
        };

        let mut user = stored.clone();
        if let Err(rejection) = user.apply_attempt(difference, state.settings.discount_ranges()) {
            return Ok(AttemptWrite::Rejected(rejection));
        }

        let attempt = Attempt::new(*user_id, difference, recorded_at);
        let receipt = AttemptReceipt::new(&attempt, &user);
        *stored = user;
        state.attempts.push(attempt);
        Ok(AttemptWrite::Committed(receipt))
    }
}

#[async_trait]
impl GameSettingsRepository for InMemoryGameStore {
    async fn load(&self) -> Result<GameSettings, GameSettingsRepositoryError> {
        Ok(self.state.lock().await.settings.clone())
    }
}

#[async_trait]
impl AdminRepository for InMemoryGameStore {
    async fn evaluate_login(
        &self,
        admin_id: &AdminId,
        password: &str,
        policy: LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<Option<LoginDecision>, AdminRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(stored) = state.admins.get_mut(admin_id) else {
            return Ok(None);
        };

        let mut admin = stored.clone();
        let decision = admin
            .authenticate(password, now, policy)
            .map_err(|err| AdminRepositoryError::corrupt_credential(err.to_string()))?;
        if decision.mutates_account() {
            *stored = admin;
        }
        Ok(Some(decision))
    }
}

#[async_trait]
impl AdminAuditLog for InMemoryGameStore {
    async fn append(&self, entry: &AdminAuditEntry) -> Result<(), AdminAuditLogError> {
        self.state.lock().await.audit.push(entry.clone());
        Ok(())
    }
}
