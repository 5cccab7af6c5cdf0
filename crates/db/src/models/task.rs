use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Recurrence class of a care task.
///
/// For `Daily` only the hour/minute component of `Task::time` is meaningful;
/// for `Weekly` the weekday plus hour/minute; for `Scheduled` the full
/// timestamp is a one-time due instant.
#[derive(
    Debug,
    Clone,
    Copy,
    Type,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sqlx(type_name = "task_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskFrequency {
    Daily,
    Weekly,
    #[default]
    Scheduled,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub pet_id: Uuid,
    /// Free-form label, e.g. "Feeding", "Walking", or a user-chosen name.
    pub task_type: String,
    pub description: String,
    pub time: DateTime<Utc>,
    pub frequency: TaskFrequency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTask {
    pub pet_id: Uuid,
    pub task_type: String,
    pub description: String,
    pub time: DateTime<Utc>,
    pub frequency: Option<TaskFrequency>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateTask {
    pub task_type: Option<String>,
    pub description: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub frequency: Option<TaskFrequency>,
}

impl Task {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All tasks owned by a user, optionally narrowed to one pet.
    pub async fn find_by_owner_id(
        pool: &SqlitePool,
        owner_id: Uuid,
        pet_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        match pet_id {
            Some(pet_id) => {
                sqlx::query_as::<_, Self>(
                    "SELECT * FROM tasks WHERE owner_id = $1 AND pet_id = $2 ORDER BY time ASC",
                )
                .bind(owner_id)
                .bind(pet_id)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Self>(
                    "SELECT * FROM tasks WHERE owner_id = $1 ORDER BY time ASC",
                )
                .bind(owner_id)
                .fetch_all(pool)
                .await
            }
        }
    }

    pub async fn create(
        pool: &SqlitePool,
        owner_id: Uuid,
        data: &CreateTask,
        task_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let frequency = data.frequency.unwrap_or_default();
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO tasks (id, owner_id, pet_id, task_type, description, time, frequency)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(task_id)
        .bind(owner_id)
        .bind(data.pet_id)
        .bind(&data.task_type)
        .bind(&data.description)
        .bind(data.time)
        .bind(frequency)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE tasks
               SET task_type   = COALESCE($2, task_type),
                   description = COALESCE($3, description),
                   time        = COALESCE($4, time),
                   frequency   = COALESCE($5, frequency),
                   updated_at  = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.task_type)
        .bind(&data.description)
        .bind(data.time)
        .bind(data.frequency)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await
    }
}
