//! Server State
//!
//! Shared handles passed to every handler: configuration, database pool and
//! the JWT service. Cheap to clone.

use std::sync::Arc;

use shared::models::{AccountStatus, Role};

use crate::auth::{JwtConfig, JwtService, password};
use crate::core::Config;
use crate::db::{DbService, account::{self, NewAccount}};
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Open the database, apply migrations and bootstrap the admin account
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(config).await?;
        let state = Self::with_db(config.clone(), db);
        state.ensure_admin().await?;
        Ok(state)
    }

    /// Build state around an existing database (tests, tools)
    pub fn with_db(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(JwtConfig::from(&config)));
        Self {
            config: Arc::new(config),
            db,
            jwt_service,
        }
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.db.pool
    }

    /// Create the configured admin when no admin account exists yet
    pub async fn ensure_admin(&self) -> Result<(), AppError> {
        let (Some(email), Some(pass)) = (&self.config.admin_email, &self.config.admin_password)
        else {
            return Ok(());
        };

        if account::count_by_role(self.pool(), Role::Admin).await? > 0 {
            return Ok(());
        }

        let admin = account::create(
            self.pool(),
            NewAccount {
                role: Role::Admin,
                full_name: "Administrator".into(),
                email: email.clone(),
                mobile: None,
                password_hash: password::hash_password(pass)?,
                shop_name: None,
                address: None,
                status: AccountStatus::Active,
            },
        )
        .await?;

        tracing::info!(
            admin_id = %admin.id,
            email = %admin.email,
            "Bootstrap admin account created"
        );
        Ok(())
    }
}
