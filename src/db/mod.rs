pub mod memory;
pub mod mysql;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;

use crate::config::Config;
use crate::model::{AttendanceRecord, LeaveRequest};

pub use memory::{MemoryStore, MemoryTable, MemoryUsers};
pub use mysql::MySqlStore;
pub use store::{RecordStore, StoreError, Transition, UserStore};

pub async fn init_db(config: &Config) -> anyhow::Result<MySqlPool> {
    info!("Connecting to MySQL...");
    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    if config.run_migrations {
        info!("Running migrations...");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    Ok(pool)
}

/// The data-access context handed to every request.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub attendance: Arc<dyn RecordStore<AttendanceRecord>>,
    pub leave: Arc<dyn RecordStore<LeaveRequest>>,
}

impl Stores {
    pub fn mysql(pool: MySqlPool) -> Self {
        let store = Arc::new(MySqlStore::new(pool));
        Self {
            users: store.clone(),
            attendance: store.clone(),
            leave: store,
        }
    }

    pub fn memory(store: &MemoryStore) -> Self {
        Self {
            users: store.users.clone(),
            attendance: store.attendance.clone(),
            leave: store.leave.clone(),
        }
    }
}
