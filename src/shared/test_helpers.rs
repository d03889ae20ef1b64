//! In-memory stand-ins for the Postgres repositories and object storage,
//! plus builders for services and the API router.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::config::{HasherConfig, SessionBackend, SessionConfig};
use crate::core::error::{AppError, Result};
use crate::core::router::AppServices;
use crate::features::activity::ActivityLogger;
use crate::features::auth::models::{NewUser, User};
use crate::features::auth::repositories::UserRepository;
use crate::features::auth::{AuthService, CredentialHasher};
use crate::features::files::models::{FileUsage, NewUploadedFile, UploadedFile};
use crate::features::files::repositories::FileRepository;
use crate::features::files::FileService;
use crate::features::sessions::models::SessionRecord;
use crate::features::sessions::stores::{MemorySessionStore, SessionStore};
use crate::features::sessions::SessionManager;
use crate::features::users::UserService;
use crate::modules::storage::{FileVisibility, ObjectStorage};

/// Argon2id with the smallest accepted work factor
pub fn test_hasher() -> CredentialHasher {
    CredentialHasher::new(&HasherConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .expect("test hasher params are valid")
}

pub fn test_session_config() -> SessionConfig {
    SessionConfig {
        cookie_name: "sid".to_string(),
        ttl: Duration::from_secs(3600),
        secure_cookie: false,
        backend: SessionBackend::Memory,
        sweep_interval: Duration::from_secs(60),
    }
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an active user directly, bypassing hashing
    pub async fn seed(&self, username: &str, email: &str) -> Uuid {
        self.insert(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await
        .expect("seed user is unique")
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn deactivate(&self, id: Uuid) {
        if let Some(user) = self.users.write().await.iter_mut().find(|u| u.id == id) {
            user.is_active = false;
        }
    }

    async fn exists(&self, id: Uuid) -> bool {
        self.users.read().await.iter().any(|u| u.id == id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<Uuid> {
        // Check and insert under one write lock, like a unique constraint
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.email == new_user.email || u.username == new_user.username)
        {
            return Err(AppError::ConstraintViolation(
                "User or email already exists".to_string(),
            ));
        }

        let id = Uuid::now_v7();
        users.push(User {
            id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_active: true,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email && u.is_active)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }
}

// =============================================================================
// FILES
// =============================================================================

/// File metadata store that enforces the owner reference against a user repo
pub struct InMemoryFileRepository {
    users: Arc<InMemoryUserRepository>,
    files: RwLock<Vec<UploadedFile>>,
}

impl InMemoryFileRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            files: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn insert(&self, new_file: NewUploadedFile) -> Result<UploadedFile> {
        if !self.users.exists(new_file.user_id).await {
            return Err(AppError::ConstraintViolation(format!(
                "User {} does not exist",
                new_file.user_id
            )));
        }

        let mut files = self.files.write().await;

        // Strictly increasing so ordering is deterministic in fast tests
        let now = Utc::now();
        let upload_date: DateTime<Utc> = match files.last() {
            Some(last) if last.upload_date >= now => {
                last.upload_date + ChronoDuration::microseconds(1)
            }
            _ => now,
        };

        let file = UploadedFile {
            id: Uuid::now_v7(),
            user_id: new_file.user_id,
            filename: new_file.filename,
            file_key: new_file.file_key,
            file_url: new_file.file_url,
            file_size: new_file.file_size,
            file_type: new_file.file_type,
            description: new_file.description,
            is_public: new_file.is_public,
            upload_date,
        };
        files.push(file.clone());
        Ok(file)
    }

    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<UploadedFile>> {
        let mut owned: Vec<UploadedFile> = self
            .files
            .read()
            .await
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();

        owned.sort_by(|a, b| (b.upload_date, b.id).cmp(&(a.upload_date, a.id)));
        owned.truncate(limit.max(0) as usize);
        Ok(owned)
    }

    async fn usage_for_user(&self, user_id: Uuid) -> Result<FileUsage> {
        let files = self.files.read().await;
        let owned = files.iter().filter(|f| f.user_id == user_id);

        Ok(owned.fold(FileUsage::default(), |usage, f| FileUsage {
            total_files: usage.total_files + 1,
            total_storage: usage.total_storage + f.file_size,
        }))
    }
}

// =============================================================================
// STORAGE
// =============================================================================

#[derive(Default)]
pub struct InMemoryObjectStorage {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `store` fail as if the backend were down
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("http://storage.test/saas-uploads/{}", key)
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    fn object_key(&self, visibility: FileVisibility, path: &str) -> String {
        let prefix = match visibility {
            FileVisibility::Public => "public",
            FileVisibility::Private => "private",
        };
        format!("{}/{}", prefix, path)
    }

    async fn store(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::StorageUnavailable(format!(
                "storage offline while writing '{}'",
                key
            )));
        }

        self.objects.write().await.insert(key.to_string(), data);
        Ok(self.url_for(key))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// SESSIONS
// =============================================================================

/// Session store that reports the first `refusals` inserts as key collisions
pub struct CollidingSessionStore {
    inner: MemorySessionStore,
    refusals_left: AtomicUsize,
    attempts: AtomicUsize,
}

impl CollidingSessionStore {
    pub fn new(refusals: usize) -> Self {
        Self {
            inner: MemorySessionStore::new(),
            refusals_left: AtomicUsize::new(refusals),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for CollidingSessionStore {
    async fn insert(&self, record: &SessionRecord) -> Result<bool> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let refused = self
            .refusals_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                left.checked_sub(1)
            })
            .is_ok();
        if refused {
            return Ok(false);
        }

        self.inner.insert(record).await
    }

    async fn find(&self, id_hash: &str) -> Result<Option<SessionRecord>> {
        self.inner.find(id_hash).await
    }

    async fn delete(&self, id_hash: &str) -> Result<bool> {
        self.inner.delete(id_hash).await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        self.inner.purge_expired(now).await
    }
}

// =============================================================================
// APPLICATION
// =============================================================================

/// Fully wired services over in-memory backends
pub struct TestBackends {
    pub services: AppServices,
    pub users: Arc<InMemoryUserRepository>,
    pub storage: Arc<InMemoryObjectStorage>,
}

pub fn test_backends(max_file_size: usize) -> TestBackends {
    let users = Arc::new(InMemoryUserRepository::new());
    let files = Arc::new(InMemoryFileRepository::new(users.clone()));
    let storage = Arc::new(InMemoryObjectStorage::new());
    let sessions = Arc::new(SessionManager::new(
        Arc::new(MemorySessionStore::new()),
        test_session_config(),
    ));
    // Receiver dropped: audit events are discarded
    let (activity, _) = ActivityLogger::new(16);

    let services = AppServices {
        sessions: sessions.clone(),
        auth: Arc::new(AuthService::new(
            users.clone(),
            test_hasher(),
            sessions,
            activity.clone(),
        )),
        files: Arc::new(FileService::new(
            files.clone(),
            storage.clone(),
            activity,
            max_file_size,
        )),
        users: Arc::new(UserService::new(users.clone(), files.clone())),
    };

    TestBackends {
        services,
        users,
        storage,
    }
}
