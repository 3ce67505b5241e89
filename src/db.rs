//! Database module - PostgreSQL connection and migrations

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create tables if not exist. raw_sql because the schema script is
    // multi-statement and cannot be prepared.
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Users (auth)
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    name VARCHAR(255),
    created_at TIMESTAMPTZ DEFAULT NOW(),
    updated_at TIMESTAMPTZ DEFAULT NOW()
);

-- Sensor predictions (immutable once written)
CREATE TABLE IF NOT EXISTS sensor_readings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(255) NOT NULL,
    nh3_ppm DOUBLE PRECISION NOT NULL,
    r INT NOT NULL,
    g INT NOT NULL,
    b INT NOT NULL,
    label VARCHAR(100) NOT NULL,
    food VARCHAR(100) NOT NULL,
    status VARCHAR(20) NOT NULL,
    confidence REAL NOT NULL,
    source VARCHAR(50) DEFAULT 'live',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Image predictions (immutable once written)
CREATE TABLE IF NOT EXISTS image_results (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(255) NOT NULL,
    file_name VARCHAR(255) NOT NULL,
    fruit VARCHAR(100) NOT NULL,
    freshness VARCHAR(20) NOT NULL,
    confidence REAL NOT NULL,
    source VARCHAR(50) DEFAULT 'upload',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Notifications
CREATE TABLE IF NOT EXISTS notifications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(255) NOT NULL,
    message TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Calendar events
CREATE TABLE IF NOT EXISTS calendar_events (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(255) NOT NULL,
    title VARCHAR(500) NOT NULL,
    start_at TIMESTAMPTZ NOT NULL,
    end_at TIMESTAMPTZ,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Blogs
CREATE TABLE IF NOT EXISTS blogs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(500) NOT NULL,
    content TEXT NOT NULL,
    category VARCHAR(100),
    author VARCHAR(255),
    read_time VARCHAR(50),
    tags JSONB,
    image_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Expenses (the mobile app's food-waste calculator records)
CREATE TABLE IF NOT EXISTS expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(255) NOT NULL,
    food VARCHAR(255) NOT NULL,
    amount DOUBLE PRECISION NOT NULL,
    kind VARCHAR(20) NOT NULL,
    spent_on VARCHAR(50) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Thoughts (floating notes from the mobile client)
CREATE TABLE IF NOT EXISTS thoughts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(255) NOT NULL,
    text TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_sensor_readings_user ON sensor_readings(username, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_sensor_readings_status ON sensor_readings(status);
CREATE INDEX IF NOT EXISTS idx_image_results_user ON image_results(username, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_image_results_status ON image_results(freshness);
CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(username, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_calendar_user ON calendar_events(username, start_at DESC);
CREATE INDEX IF NOT EXISTS idx_blogs_category ON blogs(category);
CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(username, spent_on DESC);
CREATE INDEX IF NOT EXISTS idx_expenses_kind ON expenses(kind);
CREATE INDEX IF NOT EXISTS idx_thoughts_user ON thoughts(username, created_at DESC);
"#;
