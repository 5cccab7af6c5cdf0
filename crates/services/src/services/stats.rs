//! Aggregate counts for the admin dashboard.

use db::models::{
    pet::Pet,
    post::Post,
    shop::Shop,
    task::Task,
    user::{User, UserInfo},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use ts_rs::TS;

const RECENT_USERS_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DashboardStats {
    pub user_count: i64,
    pub pet_count: i64,
    pub task_count: i64,
    pub post_count: i64,
    pub shop_count: i64,
    pub recent_users: Vec<UserInfo>,
}

pub async fn dashboard_stats(pool: &SqlitePool) -> Result<DashboardStats, sqlx::Error> {
    let recent_users = User::find_recent(pool, RECENT_USERS_LIMIT)
        .await?
        .into_iter()
        .map(UserInfo::from)
        .collect();

    Ok(DashboardStats {
        user_count: User::count(pool).await?,
        pet_count: Pet::count(pool).await?,
        task_count: Task::count(pool).await?,
        post_count: Post::count(pool).await?,
        shop_count: Shop::count(pool).await?,
        recent_users,
    })
}
