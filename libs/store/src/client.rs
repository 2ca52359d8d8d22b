use eyre::Result;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

#[derive(Clone)]
pub struct Client {
    pool: SqlitePool,
    database_url: String,
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl Client {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = if is_in_memory(database_url) {
            // Every new connection to an in-memory database opens an empty one,
            // so the pool must hold on to exactly one.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await?
        } else {
            SqlitePoolOptions::new().max_connections(5).connect(database_url).await?
        };

        Ok(Self { pool, database_url: database_url.to_string() })
    }

    pub async fn init(database_url: &str) -> Result<Self> {
        let client = Client::new(database_url).await?;

        // Create tables on startup
        sqlx::raw_sql(include_str!("../resources/create_tables.sql"))
            .execute(client.pool())
            .await?;

        Ok(client)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn is_in_memory(&self) -> bool {
        is_in_memory(&self.database_url)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
