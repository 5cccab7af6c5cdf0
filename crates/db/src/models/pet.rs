use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Pet {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdatePet {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub image_url: Option<String>,
}

impl Pet {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM pets WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_owner_id(
        pool: &SqlitePool,
        owner_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM pets WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM pets ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        owner_id: Uuid,
        data: &CreatePet,
        pet_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO pets (id, owner_id, name, species, breed, birth_date, image_url)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(pet_id)
        .bind(owner_id)
        .bind(&data.name)
        .bind(&data.species)
        .bind(&data.breed)
        .bind(data.birth_date)
        .bind(&data.image_url)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdatePet,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE pets
               SET name       = COALESCE($2, name),
                   species    = COALESCE($3, species),
                   breed      = COALESCE($4, breed),
                   birth_date = COALESCE($5, birth_date),
                   image_url  = COALESCE($6, image_url),
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.species)
        .bind(&data.breed)
        .bind(data.birth_date)
        .bind(&data.image_url)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pets")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::user::{CreateUser, User},
        test_pool,
    };

    async fn sample_owner(pool: &SqlitePool) -> User {
        let data = CreateUser {
            email: "owner@example.com".into(),
            password_hash: "hash".into(),
            name: "Owner".into(),
            role: None,
        };
        User::create(pool, &data, Uuid::new_v4()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let pool = test_pool().await;
        let owner = sample_owner(&pool).await;

        let pet = Pet::create(
            &pool,
            owner.id,
            &CreatePet {
                name: "Rex".into(),
                species: "dog".into(),
                breed: Some("Labrador".into()),
                birth_date: None,
                image_url: None,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let updated = Pet::update(
            &pool,
            pet.id,
            &UpdatePet {
                name: Some("Max".into()),
                species: None,
                breed: None,
                birth_date: None,
                image_url: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.name, "Max");
        assert_eq!(updated.species, "dog");

        assert_eq!(Pet::delete(&pool, pet.id).await.unwrap(), 1);
        assert!(Pet::find_by_id(&pool, pet.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_owner_cascades() {
        let pool = test_pool().await;
        let owner = sample_owner(&pool).await;
        let pet = Pet::create(
            &pool,
            owner.id,
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

        User::delete(&pool, owner.id).await.unwrap();
        assert!(Pet::find_by_id(&pool, pet.id).await.unwrap().is_none());
    }
}
