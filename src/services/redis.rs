//! Redis service for session storage

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use crate::error::{AppError, AppResult};

/// Where session payloads live. Sessions are indexed per user so they can be ended together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a session payload under `key` for `ttl_seconds`
    async fn store_session(
        &self,
        key: &str,
        user_id: i32,
        payload: &str,
        ttl_seconds: u64,
    ) -> AppResult<()>;

    async fn get_session(&self, key: &str) -> AppResult<Option<String>>;

    async fn delete_session(&self, key: &str) -> AppResult<()>;

    /// End every session opened by `user_id`
    async fn delete_user_sessions(&self, user_id: i32) -> AppResult<()>;

    async fn ping(&self) -> AppResult<()>;
}

fn user_index_key(user_id: i32) -> String {
    format!("user_sessions:{}", user_id)
}

#[derive(Clone)]
pub struct RedisService {
    client: Client,
}

impl RedisService {
    /// Create a Redis service without touching the server
    pub fn open(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;
        Ok(Self { client })
    }

    /// Create a new Redis service and test the connection
    pub async fn new(url: &str) -> AppResult<Self> {
        let service = Self::open(url)?;
        service.ping().await?;
        Ok(service)
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Session(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl SessionStore for RedisService {
    async fn store_session(
        &self,
        key: &str,
        user_id: i32,
        payload: &str,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let index = user_index_key(user_id);
        redis::pipe()
            .atomic()
            .set_ex(key, payload, ttl_seconds)
            .ignore()
            .sadd(&index, key)
            .ignore()
            .expire(&index, ttl_seconds as i64)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::Session(format!("Failed to store session in Redis: {}", e)))?;
        Ok(())
    }

    async fn get_session(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| AppError::Session(format!("Failed to read session from Redis: {}", e)))?;
        Ok(payload)
    }

    async fn delete_session(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .del(key)
            .await
            .map_err(|e| AppError::Session(format!("Failed to delete session from Redis: {}", e)))?;
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: i32) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let index = user_index_key(user_id);
        let keys: Vec<String> = conn
            .smembers(&index)
            .await
            .map_err(|e| AppError::Session(format!("Failed to list user sessions: {}", e)))?;

        // Members may point at sessions that already expired; DEL ignores those
        let mut pipe = redis::pipe();
        pipe.atomic();
        for key in &keys {
            pipe.del(key).ignore();
        }
        pipe.del(&index).ignore();
        pipe.query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::Session(format!("Failed to delete user sessions: {}", e)))?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Session(format!("Redis connection test failed: {}", e)))?;
        Ok(())
    }
}
