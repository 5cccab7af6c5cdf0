use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub pet_id: Uuid,
    /// e.g. "Vaccination", "Checkup", "Surgery".
    pub record_type: String,
    pub description: String,
    pub date: NaiveDate,
    pub clinic_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMedicalRecord {
    pub record_type: String,
    pub description: String,
    pub date: NaiveDate,
    pub clinic_name: Option<String>,
}

impl MedicalRecord {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM medical_records WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_pet_id(
        pool: &SqlitePool,
        pet_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM medical_records WHERE pet_id = $1 ORDER BY date DESC",
        )
        .bind(pet_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        pet_id: Uuid,
        data: &CreateMedicalRecord,
        record_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO medical_records (id, pet_id, record_type, description, date, clinic_name)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(record_id)
        .bind(pet_id)
        .bind(&data.record_type)
        .bind(&data.description)
        .bind(data.date)
        .bind(&data.clinic_name)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM medical_records WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            pet::{CreatePet, Pet},
            user::{CreateUser, User},
        },
        test_pool,
    };

    #[tokio::test]
    async fn test_records_sorted_newest_first() {
        let pool = test_pool().await;
        let user = User::create(
            &pool,
            &CreateUser {
                email: "m@example.com".into(),
                password_hash: "hash".into(),
                name: "M".into(),
                role: None,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let pet = Pet::create(
            &pool,
            user.id,
            &CreatePet {
                name: "Rex".into(),
                species: "dog".into(),
                breed: None,
                birth_date: None,
                image_url: None,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        for (date, record_type) in [("2024-01-10", "Checkup"), ("2024-03-02", "Vaccination")] {
            MedicalRecord::create(
                &pool,
                pet.id,
                &CreateMedicalRecord {
                    record_type: record_type.into(),
                    description: "routine".into(),
                    date: date.parse().unwrap(),
                    clinic_name: None,
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        }

        let records = MedicalRecord::find_by_pet_id(&pool, pet.id).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record_type, "Vaccination");
    }
}
