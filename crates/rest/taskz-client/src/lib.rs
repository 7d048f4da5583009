//! Authenticated REST client for the Taskz backend.
//!
//! This crate provides:
//! - [`TaskzClient`]: typed login, user and task operations
//! - [`Session`]: the bearer token and cached profile, persisted through a
//!   [`SessionStorage`]
//! - [`SessionEvent`]: notifications (including token expiry) delivered to
//!   handlers registered on the client builder

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod types;

pub use client::{TaskzClient, TaskzClientBuilder};
pub use config::{BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult, StorageError, StorageResult};
pub use session::{Session, SessionEvent, TOKEN_KEY, USER_KEY};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use types::{LoginResponse, SignIn};

pub use taskz_core;
