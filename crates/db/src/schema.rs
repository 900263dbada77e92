use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create orgs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orgs (
            org_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            verified BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            verified BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create workers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workers (
            worker_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            org_id UUID NOT NULL REFERENCES orgs(org_id) ON DELETE CASCADE,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            position VARCHAR(255) NOT NULL DEFAULT '',
            degree VARCHAR(255) NOT NULL DEFAULT ''
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            service_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            org_id UUID NOT NULL REFERENCES orgs(org_id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            cost BIGINT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            CONSTRAINT valid_cost CHECK (cost >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create worker_services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS worker_services (
            worker_id UUID NOT NULL REFERENCES workers(worker_id) ON DELETE CASCADE,
            service_id UUID NOT NULL REFERENCES services(service_id) ON DELETE CASCADE,
            PRIMARY KEY (worker_id, service_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create verification_codes table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS verification_codes (
            code VARCHAR(16) NOT NULL,
            account_id UUID NOT NULL,
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL,
            PRIMARY KEY (code, account_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create worker_schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS worker_schedules (
            schedule_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            worker_id UUID NOT NULL REFERENCES workers(worker_id) ON DELETE CASCADE,
            org_id UUID NOT NULL REFERENCES orgs(org_id) ON DELETE CASCADE,
            weekday SMALLINT NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            break_start TIME NULL,
            break_end TIME NULL,
            CONSTRAINT valid_weekday CHECK (weekday BETWEEN 1 AND 7),
            CONSTRAINT valid_work_window CHECK (end_time > start_time),
            CONSTRAINT valid_break CHECK (
                (break_start IS NULL AND break_end IS NULL)
                OR (break_end > break_start AND break_start >= start_time AND break_end <= end_time)
            ),
            CONSTRAINT one_schedule_per_weekday UNIQUE (worker_id, weekday)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            slot_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            worker_id UUID NOT NULL REFERENCES workers(worker_id) ON DELETE CASCADE,
            org_id UUID NOT NULL REFERENCES orgs(org_id) ON DELETE CASCADE,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            busy BOOLEAN NOT NULL DEFAULT FALSE,
            CONSTRAINT valid_slot_range CHECK (end_time > start_time),
            CONSTRAINT one_slot_per_start UNIQUE (worker_id, start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create records table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            record_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            org_id UUID NOT NULL REFERENCES orgs(org_id) ON DELETE CASCADE,
            user_id UUID NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            slot_id UUID NOT NULL REFERENCES slots(slot_id) ON DELETE CASCADE,
            service_id UUID NOT NULL REFERENCES services(service_id) ON DELETE CASCADE,
            worker_id UUID NOT NULL REFERENCES workers(worker_id) ON DELETE CASCADE,
            reviewed BOOLEAN NOT NULL DEFAULT FALSE,
            reminded_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT one_record_per_slot UNIQUE (slot_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create feedback table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedback (
            record_id UUID PRIMARY KEY REFERENCES records(record_id) ON DELETE CASCADE,
            rating SMALLINT NOT NULL,
            comment TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_rating CHECK (rating BETWEEN 1 AND 5)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_workers_org_id ON workers(org_id)",
        "CREATE INDEX IF NOT EXISTS idx_services_org_id ON services(org_id)",
        "CREATE INDEX IF NOT EXISTS idx_worker_schedules_org_id ON worker_schedules(org_id)",
        "CREATE INDEX IF NOT EXISTS idx_slots_end_time ON slots(end_time)",
        "CREATE INDEX IF NOT EXISTS idx_records_org_id ON records(org_id)",
        "CREATE INDEX IF NOT EXISTS idx_records_user_id ON records(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_verification_codes_expires_at ON verification_codes(expires_at)",
        "CREATE INDEX IF NOT EXISTS idx_orgs_unverified ON orgs(created_at) WHERE verified = FALSE",
        "CREATE INDEX IF NOT EXISTS idx_users_unverified ON users(created_at) WHERE verified = FALSE",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
