use crate::entities::{amenities, facilities, facility_amenities, facility_images};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait, Schema,
};
use std::env;
use std::time::Duration;
use tracing::info;

pub async fn setup_database() -> anyhow::Result<DatabaseConnection> {
    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://facilities.db?mode=rwc".to_string());

    info!("📂 Database: {}", db_url);

    let mut opt = ConnectOptions::new(&db_url);
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    match db.get_database_backend() {
        DbBackend::Postgres => {
            info!("🔄 Running SQLx migrations for PostgreSQL...");
            sqlx::migrate!("./migrations")
                .run(db.get_postgres_connection_pool())
                .await?;
        }
        backend => {
            info!("🔄 Creating schema from entities for {:?}...", backend);
            // Parents before children so the foreign keys resolve
            create_table(db, facilities::Entity).await?;
            create_table(db, amenities::Entity).await?;
            create_table(db, facility_amenities::Entity).await?;
            create_table(db, facility_images::Entity).await?;
        }
    }

    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let stmt = schema
        .create_table_from_entity(entity)
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&stmt)).await?;
    Ok(())
}
