use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shop with its distance from the query point, for the map screen.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ShopWithDistance {
    #[serde(flatten)]
    #[ts(flatten)]
    pub shop: Shop,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateShop {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateShop {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

/// Great-circle distance in kilometres between two WGS84 points.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

impl Shop {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM shops WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM shops ORDER BY name ASC")
            .fetch_all(pool)
            .await
    }

    /// Shops within `radius_km` of the point, nearest first. The table is
    /// small enough to filter in memory rather than push the math into SQL.
    pub async fn find_nearby(
        pool: &SqlitePool,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<ShopWithDistance>, sqlx::Error> {
        let mut nearby: Vec<ShopWithDistance> = Self::find_all(pool)
            .await?
            .into_iter()
            .map(|shop| {
                let distance_km =
                    haversine_km(latitude, longitude, shop.latitude, shop.longitude);
                ShopWithDistance { shop, distance_km }
            })
            .filter(|s| s.distance_km <= radius_km)
            .collect();
        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(nearby)
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateShop,
        shop_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO shops (id, name, description, address, latitude, longitude, phone, image_url)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
        )
        .bind(shop_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.address)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(&data.phone)
        .bind(&data.image_url)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateShop,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE shops
               SET name        = COALESCE($2, name),
                   description = COALESCE($3, description),
                   address     = COALESCE($4, address),
                   latitude    = COALESCE($5, latitude),
                   longitude   = COALESCE($6, longitude),
                   phone       = COALESCE($7, phone),
                   image_url   = COALESCE($8, image_url),
                   updated_at  = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.address)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(&data.phone)
        .bind(&data.image_url)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shops")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pool;

    #[test]
    fn test_haversine_zero_distance() {
        assert!(haversine_km(52.52, 13.405, 52.52, 13.405) < 1e-9);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Berlin to Hamburg is roughly 255 km.
        let d = haversine_km(52.52, 13.405, 53.551, 9.993);
        assert!((d - 255.0).abs() < 5.0, "got {d}");
    }

    #[tokio::test]
    async fn test_find_nearby_filters_and_sorts() {
        let pool = test_pool().await;
        for (name, lat, lng) in [
            ("Close", 52.53, 13.41),
            ("Closer", 52.52, 13.406),
            ("Far", 53.551, 9.993),
        ] {
            Shop::create(
                &pool,
                &CreateShop {
                    name: name.into(),
                    description: None,
                    address: "somewhere".into(),
                    latitude: lat,
                    longitude: lng,
                    phone: None,
                    image_url: None,
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        }

        let nearby = Shop::find_nearby(&pool, 52.52, 13.405, 10.0).await.unwrap();
        assert_eq!(nearby.len(), 2);
        assert_eq!(nearby[0].shop.name, "Closer");
        assert_eq!(nearby[1].shop.name, "Close");
    }
}
