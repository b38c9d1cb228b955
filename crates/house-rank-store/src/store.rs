use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use house_rank_core::{
    DatabaseConfig, Error, House, HouseList, Principal, Result, Storage, User,
};

use crate::rows::{DbHouse, DbHouseList, DbUser};

/// Postgres-backed [`Storage`]. Every operation acquires a pooled
/// connection for its duration; mutating sequences run in a transaction
/// that commits last, so an early `?` return rolls back.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects, bounds the pool, and runs migrations before anything is
    /// served.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = PgConnectOptions::from_str(&config.url).map_err(db_err)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.connect_timeout_ms))
            .connect_with(options)
            .await
            .map_err(db_err)?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(db_err)?;
        info!(
            max_connections = config.max_connections,
            "connected to Postgres"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_err(e: impl std::fmt::Display) -> Error {
    Error::Database(e.to_string())
}

#[async_trait]
impl Storage for PgStore {
    async fn user_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, DbUser>("select * from users where id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(user.map(Into::into))
    }

    async fn create_user_from_principal(&self, principal: &Principal) -> Result<User> {
        let email = principal
            .email
            .as_deref()
            .ok_or_else(|| Error::Auth("principal carries no email".into()))?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let existing = sqlx::query_as::<_, DbUser>(
            "select * from users where provider_id = $1 and provider = $2",
        )
        .bind(&principal.subject)
        .bind(&principal.provider)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let user = match existing {
            Some(user) => user,
            None => sqlx::query_as::<_, DbUser>(
                "insert into users(provider_id, provider, email, created_at) \
                 values ($1, $2, $3, $4) returning *",
            )
            .bind(&principal.subject)
            .bind(&principal.provider)
            .bind(email)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?,
        };
        tx.commit().await.map_err(db_err)?;
        Ok(user.into())
    }

    async fn house_by_zpid(&self, zpid: &str) -> Result<Option<House>> {
        let house = sqlx::query_as::<_, DbHouse>("select * from houses where zpid = $1")
            .bind(zpid)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(house.map(Into::into))
    }

    async fn update_house_pricing(&self, zpid: &str, doc: &Value) -> Result<()> {
        let result = sqlx::query(
            "update houses set zillow_pricing_info = $1, zillow_pricing_updated_at = $2 \
             where zpid = $3",
        )
        .bind(doc)
        .bind(Utc::now())
        .bind(zpid)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if result.rows_affected() != 1 {
            return Err(Error::not_found("House", "zpid", zpid));
        }
        Ok(())
    }

    async fn update_house_property(&self, zpid: &str, doc: &Value) -> Result<()> {
        let result = sqlx::query(
            "update houses set zillow_property_info = $1, zillow_property_updated_at = $2 \
             where zpid = $3",
        )
        .bind(doc)
        .bind(Utc::now())
        .bind(zpid)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if result.rows_affected() != 1 {
            return Err(Error::not_found("House", "zpid", zpid));
        }
        Ok(())
    }

    async fn has_house_list_access_rw(&self, house_list_id: i32, user_id: i32) -> Result<bool> {
        // Owner or edit-level member; any row means access.
        let rows = sqlx::query(
            "select * from ( \
                 select user_id from house_list_members \
                 where house_list_id = $1 and user_id = $2 and access_level = $3 \
             ) membership UNION ( \
                 select owner_id as user_id from house_lists where owner_id = $2 and id = $1 \
             )",
        )
        .bind(house_list_id)
        .bind(user_id)
        .bind("edit")
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(!rows.is_empty())
    }

    async fn create_house_list(&self, name: &str, owner_id: i32) -> Result<HouseList> {
        let list = sqlx::query_as::<_, DbHouseList>(
            "insert into house_lists(name, owner_id) values ($1, $2) returning *",
        )
        .bind(name)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(list.into())
    }

    // TODO: cascade deletion to house_list_members and house_list_houses.
    async fn delete_house_list(&self, house_list_id: i32) -> Result<HouseList> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let list = sqlx::query_as::<_, DbHouseList>("select * from house_lists where id = $1")
            .bind(house_list_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::not_found("HouseList", "id", house_list_id))?;
        sqlx::query("delete from house_lists where id = $1")
            .bind(house_list_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(list.into())
    }

    async fn add_house_to_list(&self, zpid: &str, house_list_id: i32) -> Result<House> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query("select id from house_lists where id = $1 limit 1")
            .bind(house_list_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::not_found("HouseList", "id", house_list_id))?;

        let house = sqlx::query_as::<_, DbHouse>("select * from houses where zpid = $1")
            .bind(zpid)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;
        let house = match house {
            Some(house) => house,
            None => sqlx::query_as::<_, DbHouse>(
                "insert into houses(zpid) values ($1) returning *",
            )
            .bind(zpid)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?,
        };

        let joined = sqlx::query(
            "select * from house_list_houses where house_list_id = $1 and house_id = $2",
        )
        .bind(house_list_id)
        .bind(house.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;
        if joined.is_none() {
            sqlx::query("insert into house_list_houses(house_list_id, house_id) values ($1, $2)")
                .bind(house_list_id)
                .bind(house.id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(house.into())
    }

    async fn remove_house_from_list(&self, zpid: &str, house_list_id: i32) -> Result<House> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query("select id from house_lists where id = $1 limit 1")
            .bind(house_list_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::not_found("HouseList", "id", house_list_id))?;

        let house = sqlx::query_as::<_, DbHouse>("select * from houses where zpid = $1")
            .bind(zpid)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::not_found("House", "zpid", zpid))?;

        sqlx::query(
            "select * from house_list_houses where house_list_id = $1 and house_id = $2",
        )
        .bind(house_list_id)
        .bind(house.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "House with zpid {zpid} not found in HouseList with id {house_list_id}"
            ))
        })?;

        sqlx::query("delete from house_list_houses where house_list_id = $1 and house_id = $2")
            .bind(house_list_id)
            .bind(house.id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(house.into())
    }

    async fn add_user_to_list(&self, email: &str, house_list_id: i32) -> Result<User> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query("select id from house_lists where id = $1 limit 1")
            .bind(house_list_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::not_found("HouseList", "id", house_list_id))?;

        let user =
            sqlx::query_as::<_, DbUser>("select * from users where email = $1 limit 1")
                .bind(email)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "User with email {email} not found. Have they logged in yet?"
                    ))
                })?;

        let member = sqlx::query(
            "select * from house_list_members where house_list_id = $1 and user_id = $2",
        )
        .bind(house_list_id)
        .bind(user.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;
        if member.is_none() {
            sqlx::query(
                "insert into house_list_members(house_list_id, user_id, access_level) \
                 values ($1, $2, $3)",
            )
            .bind(house_list_id)
            .bind(user.id)
            .bind("edit")
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(user.into())
    }

    async fn remove_user_from_list(&self, user_id: i32, house_list_id: i32) -> Result<User> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query("select id from house_lists where id = $1 limit 1")
            .bind(house_list_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::not_found("HouseList", "id", house_list_id))?;

        let user = sqlx::query_as::<_, DbUser>("select * from users where id = $1 limit 1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "User with id {user_id} not found. Have they logged in yet?"
                ))
            })?;

        sqlx::query("delete from house_list_members where house_list_id = $1 and user_id = $2")
            .bind(house_list_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(user.into())
    }

    async fn house_lists_by_owner(&self, owner_id: i32) -> Result<Vec<HouseList>> {
        let lists =
            sqlx::query_as::<_, DbHouseList>("select * from house_lists where owner_id = $1")
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(lists.into_iter().map(Into::into).collect())
    }

    async fn house_lists_via_membership(&self, user_id: i32) -> Result<Vec<HouseList>> {
        let lists = sqlx::query_as::<_, DbHouseList>(
            "select * from house_lists where id in \
             (select distinct(house_list_id) from house_list_members where user_id = $1)",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(lists.into_iter().map(Into::into).collect())
    }

    async fn users_via_membership(&self, house_list_id: i32) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, DbUser>(
            "select * from users where id in \
             (select user_id from house_list_members where house_list_id = $1)",
        )
        .bind(house_list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn houses_via_membership(&self, house_list_id: i32) -> Result<Vec<House>> {
        let houses = sqlx::query_as::<_, DbHouse>(
            "select * from houses where id in \
             (select house_id from house_list_houses where house_list_id = $1)",
        )
        .bind(house_list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(houses.into_iter().map(Into::into).collect())
    }
}
