use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{NewServiceLog, VehicleServiceLog};
use crate::utils::errors::{conflict_error, AppError};
use crate::utils::validation::{format_datetime, parse_date_or_none, validate_sql_identifier};

const COLUMNS: &str = "id, owner_name, vehicle_type, vehicle_id, service_date, service_type, \
                       description, mileage, cost, next_service_date, mechanic_id";

/// Almacenamiento de registros de mantenimiento, indexado por `id`
#[async_trait]
pub trait ServiceLogRepository: Send + Sync {
    /// Crea la estructura de almacenamiento si no existe (idempotente)
    async fn ensure_schema(&self) -> Result<(), AppError>;
    async fn insert(&self, log: NewServiceLog) -> Result<VehicleServiceLog, AppError>;
    async fn get(&self, id: &str) -> Result<Option<VehicleServiceLog>, AppError>;
    async fn list(&self, vehicle_id: Option<&str>) -> Result<Vec<VehicleServiceLog>, AppError>;
    /// `true` si alguna fila coincidió con `log.id`
    async fn update(&self, log: &VehicleServiceLog) -> Result<bool, AppError>;
    /// Número de filas eliminadas (0 o 1)
    async fn delete(&self, id: &str) -> Result<u64, AppError>;
}

// Fila tal como está en SQLite: las fechas son texto ISO-8601
#[derive(Debug, sqlx::FromRow)]
struct ServiceLogRow {
    id: String,
    owner_name: Option<String>,
    vehicle_type: Option<String>,
    vehicle_id: String,
    service_date: String,
    service_type: String,
    description: Option<String>,
    mileage: i64,
    cost: f64,
    next_service_date: Option<String>,
    mechanic_id: Option<String>,
}

impl TryFrom<ServiceLogRow> for VehicleServiceLog {
    type Error = AppError;

    fn try_from(row: ServiceLogRow) -> Result<Self, Self::Error> {
        let service_date = parse_date_or_none(&row.service_date).ok_or_else(|| {
            AppError::Storage(format!(
                "Malformed service_date '{}' in service log {}",
                row.service_date, row.id
            ))
        })?;

        let next_service_date = match row.next_service_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_date_or_none(raw).ok_or_else(|| {
                AppError::Storage(format!(
                    "Malformed next_service_date '{}' in service log {}",
                    raw, row.id
                ))
            })?),
        };

        Ok(VehicleServiceLog {
            id: row.id,
            owner_name: row.owner_name,
            vehicle_type: row.vehicle_type,
            vehicle_id: row.vehicle_id,
            service_date,
            service_type: row.service_type,
            description: row.description,
            mileage: row.mileage,
            cost: row.cost,
            next_service_date,
            mechanic_id: row.mechanic_id,
        })
    }
}

/// Repositorio SQLite sobre una única tabla
pub struct SqliteServiceLogRepository {
    pool: SqlitePool,
    table: String,
}

impl SqliteServiceLogRepository {
    /// El nombre de tabla se interpola en el SQL, así que debe ser un identificador simple
    pub fn new(pool: SqlitePool, table: impl Into<String>) -> Result<Self, AppError> {
        let table = table.into();
        validate_sql_identifier(&table)
            .map_err(|_| AppError::Internal(format!("Invalid table name '{}'", table)))?;
        Ok(Self { pool, table })
    }
}

#[async_trait]
impl ServiceLogRepository for SqliteServiceLogRepository {
    async fn ensure_schema(&self) -> Result<(), AppError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                owner_name TEXT,
                vehicle_type TEXT,
                vehicle_id TEXT,
                service_date TEXT,
                service_type TEXT,
                description TEXT,
                mileage INTEGER,
                cost REAL,
                next_service_date TEXT,
                mechanic_id TEXT
            )
            "#,
            self.table
        );

        sqlx::query(&query).execute(&self.pool).await?;

        // Tablas creadas antes de existir `mechanic_id` reciben la columna
        let columns = sqlx::query_scalar::<_, String>(&format!(
            "SELECT name FROM pragma_table_info('{}')",
            self.table
        ))
        .fetch_all(&self.pool)
        .await?;

        if !columns.iter().any(|column| column == "mechanic_id") {
            sqlx::query(&format!("ALTER TABLE {} ADD COLUMN mechanic_id TEXT", self.table))
                .execute(&self.pool)
                .await?;
            log::info!("🗄️ Columna mechanic_id añadida a '{}'", self.table);
        }

        log::debug!("🗄️ Tabla '{}' verificada", self.table);
        Ok(())
    }

    async fn insert(&self, log: NewServiceLog) -> Result<VehicleServiceLog, AppError> {
        let id = log.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        let log = log.with_id(id);

        let query = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.table, COLUMNS
        );

        sqlx::query(&query)
            .bind(&log.id)
            .bind(&log.owner_name)
            .bind(&log.vehicle_type)
            .bind(&log.vehicle_id)
            .bind(format_datetime(&log.service_date))
            .bind(&log.service_type)
            .bind(&log.description)
            .bind(log.mileage)
            .bind(log.cost)
            .bind(log.next_service_date.as_ref().map(format_datetime))
            .bind(&log.mechanic_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let duplicate = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if duplicate {
                    conflict_error("Vehicle service log", "id", &log.id)
                } else {
                    AppError::Database(e)
                }
            })?;

        Ok(log)
    }

    async fn get(&self, id: &str) -> Result<Option<VehicleServiceLog>, AppError> {
        let query = format!("SELECT {} FROM {} WHERE id = ?", COLUMNS, self.table);

        let row = sqlx::query_as::<_, ServiceLogRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(VehicleServiceLog::try_from).transpose()
    }

    async fn list(&self, vehicle_id: Option<&str>) -> Result<Vec<VehicleServiceLog>, AppError> {
        let rows = match vehicle_id {
            Some(vehicle_id) => {
                let query = format!(
                    "SELECT {} FROM {} WHERE vehicle_id = ? ORDER BY rowid",
                    COLUMNS, self.table
                );
                sqlx::query_as::<_, ServiceLogRow>(&query)
                    .bind(vehicle_id)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let query = format!("SELECT {} FROM {} ORDER BY rowid", COLUMNS, self.table);
                sqlx::query_as::<_, ServiceLogRow>(&query)
                    .fetch_all(&self.pool)
                    .await
            }
        }?;

        rows.into_iter().map(VehicleServiceLog::try_from).collect()
    }

    async fn update(&self, log: &VehicleServiceLog) -> Result<bool, AppError> {
        let query = format!(
            r#"
            UPDATE {}
            SET owner_name = ?, vehicle_type = ?, vehicle_id = ?, service_date = ?, service_type = ?,
                description = ?, mileage = ?, cost = ?, next_service_date = ?, mechanic_id = ?
            WHERE id = ?
            "#,
            self.table
        );

        let result = sqlx::query(&query)
            .bind(&log.owner_name)
            .bind(&log.vehicle_type)
            .bind(&log.vehicle_id)
            .bind(format_datetime(&log.service_date))
            .bind(&log.service_type)
            .bind(&log.description)
            .bind(log.mileage)
            .bind(log.cost)
            .bind(log.next_service_date.as_ref().map(format_datetime))
            .bind(&log.mechanic_id)
            .bind(&log.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<u64, AppError> {
        let query = format!("DELETE FROM {} WHERE id = ?", self.table);

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use chrono::{Duration, TimeZone, Utc};

    async fn repository() -> SqliteServiceLogRepository {
        let pool = DatabaseConfig::create_test_pool().await.unwrap();
        let repo = SqliteServiceLogRepository::new(pool, "vehicle_service_logs").unwrap();
        repo.ensure_schema().await.unwrap();
        repo
    }

    fn new_log(vehicle_id: &str, service_type: &str) -> NewServiceLog {
        NewServiceLog {
            id: None,
            owner_name: Some("Alice".to_string()),
            vehicle_type: Some("car".to_string()),
            vehicle_id: vehicle_id.to_string(),
            service_date: Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
            service_type: service_type.to_string(),
            description: Some("routine".to_string()),
            mileage: 15_000,
            cost: 75.25,
            next_service_date: Some(
                Utc.with_ymd_and_hms(2026, 12, 1, 9, 0, 0).unwrap() + Duration::milliseconds(500),
            ),
            mechanic_id: None,
        }
    }

    #[tokio::test]
    async fn test_rejects_unsafe_table_name() {
        let pool = DatabaseConfig::create_test_pool().await.unwrap();
        assert!(matches!(
            SqliteServiceLogRepository::new(pool, "logs; DROP TABLE x"),
            Err(AppError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let repo = repository().await;
        repo.ensure_schema().await.unwrap();
        repo.ensure_schema().await.unwrap();
        assert!(repo.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_schema_adds_mechanic_column_to_older_table() {
        let pool = DatabaseConfig::create_test_pool().await.unwrap();
        sqlx::query(
            "CREATE TABLE vehicle_service_logs (id TEXT PRIMARY KEY, owner_name TEXT, vehicle_type TEXT, \
             vehicle_id TEXT, service_date TEXT, service_type TEXT, description TEXT, mileage INTEGER, \
             cost REAL, next_service_date TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO vehicle_service_logs (id, owner_name, vehicle_id, service_date, service_type, mileage, cost) \
             VALUES ('old-1', 'Bea', 'CAR-7', '2025-05-05', 'tires', 500, 60.0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let repo = SqliteServiceLogRepository::new(pool, "vehicle_service_logs").unwrap();
        repo.ensure_schema().await.unwrap();
        repo.ensure_schema().await.unwrap();

        let logs = repo.list(None).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, "old-1");
        assert_eq!(logs[0].mechanic_id, None);

        let mut tagged = logs[0].clone();
        tagged.mechanic_id = Some("MECH-1".to_string());
        assert!(repo.update(&tagged).await.unwrap());
        assert_eq!(repo.get("old-1").await.unwrap(), Some(tagged));
    }

    #[tokio::test]
    async fn test_missing_table_is_database_error() {
        let pool = DatabaseConfig::create_test_pool().await.unwrap();
        let repo = SqliteServiceLogRepository::new(pool, "never_created").unwrap();

        assert!(matches!(repo.list(None).await, Err(AppError::Database(_))));
        assert!(matches!(
            repo.insert(new_log("CAR-1", "oil change")).await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_get_returns_equal_record() {
        let repo = repository().await;
        let input = new_log("CAR-1", "oil change");

        let stored = repo.insert(input.clone()).await.unwrap();
        assert!(Uuid::parse_str(&stored.id).is_ok());

        let fetched = repo.get(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, input.with_id(stored.id.clone()));
    }

    #[tokio::test]
    async fn test_insert_keeps_supplied_id_and_rejects_duplicates() {
        let repo = repository().await;
        let mut input = new_log("CAR-1", "oil change");
        input.id = Some("fixed-id".to_string());

        let stored = repo.insert(input.clone()).await.unwrap();
        assert_eq!(stored.id, "fixed-id");

        assert!(matches!(repo.insert(input).await, Err(AppError::Conflict(_))));
        assert_eq!(repo.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let repo = repository().await;
        assert_eq!(repo.get("does-not-exist").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_filters_by_vehicle_in_storage_order() {
        let repo = repository().await;
        let a1 = repo.insert(new_log("CAR-A", "oil change")).await.unwrap();
        let b1 = repo.insert(new_log("CAR-B", "tires")).await.unwrap();
        let a2 = repo.insert(new_log("CAR-A", "brakes")).await.unwrap();

        let all = repo.list(None).await.unwrap();
        let ids: Vec<_> = all.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids, vec![a1.id.clone(), b1.id.clone(), a2.id.clone()]);

        let only_a = repo.list(Some("CAR-A")).await.unwrap();
        assert_eq!(only_a, vec![a1, a2]);
        assert_eq!(repo.list(Some("CAR-B")).await.unwrap(), vec![b1]);
        assert!(repo.list(Some("CAR-Z")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_reports_match() {
        let repo = repository().await;
        let mut stored = repo.insert(new_log("CAR-1", "oil change")).await.unwrap();

        stored.cost = 120.0;
        stored.next_service_date = None;
        stored.mechanic_id = Some("MECH-2".to_string());
        assert!(repo.update(&stored).await.unwrap());
        assert_eq!(repo.get(&stored.id).await.unwrap(), Some(stored.clone()));

        let mut ghost = stored.clone();
        ghost.id = "ghost".to_string();
        assert!(!repo.update(&ghost).await.unwrap());
        assert_eq!(repo.get(&stored.id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_count() {
        let repo = repository().await;
        let stored = repo.insert(new_log("CAR-1", "oil change")).await.unwrap();

        assert_eq!(repo.delete(&stored.id).await.unwrap(), 1);
        assert_eq!(repo.delete(&stored.id).await.unwrap(), 0);
        assert_eq!(repo.get(&stored.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_next_service_date_round_trips_same_instant() {
        let repo = repository().await;
        let input = new_log("CAR-1", "oil change");
        let expected = input.next_service_date;

        let stored = repo.insert(input).await.unwrap();
        let fetched = repo.get(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.next_service_date, expected);
    }

    #[tokio::test]
    async fn test_reads_legacy_naive_dates() {
        let repo = repository().await;
        sqlx::query(
            "INSERT INTO vehicle_service_logs (id, vehicle_id, service_date, service_type, mileage, cost, next_service_date) \
             VALUES ('legacy', 'CAR-9', '2025-01-02T03:04:05', 'inspection', 10, 5.0, NULL)",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let log = repo.get("legacy").await.unwrap().unwrap();
        assert_eq!(log.service_date, Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(log.next_service_date, None);
    }

    #[tokio::test]
    async fn test_malformed_stored_date_is_storage_error() {
        let repo = repository().await;
        sqlx::query(
            "INSERT INTO vehicle_service_logs (id, vehicle_id, service_date, service_type, mileage, cost, next_service_date) \
             VALUES ('broken', 'CAR-9', '2025-01-02', 'inspection', 10, 5.0, 'not-a-date')",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        assert!(matches!(repo.get("broken").await, Err(AppError::Storage(_))));
        assert!(matches!(repo.list(None).await, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_schema_persists_across_pools() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("logs.db").display());

        let first = SqliteServiceLogRepository::new(
            DatabaseConfig::new(url.clone()).create_pool().await.unwrap(),
            "fleet_logs",
        )
        .unwrap();
        first.ensure_schema().await.unwrap();
        let stored = first.insert(new_log("CAR-1", "oil change")).await.unwrap();

        let second = SqliteServiceLogRepository::new(
            DatabaseConfig::new(url).create_pool().await.unwrap(),
            "fleet_logs",
        )
        .unwrap();
        second.ensure_schema().await.unwrap();
        assert_eq!(second.get(&stored.id).await.unwrap(), Some(stored));
    }
}
