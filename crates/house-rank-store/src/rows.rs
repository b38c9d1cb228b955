//! Row shapes for the authoritative tables. Kept separate from the domain
//! types so column naming and storage details stay local to this crate.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

use house_rank_core::{House, HouseList, User};

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: i32,
    pub provider: String,
    pub provider_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            provider: row.provider,
            provider_id: row.provider_id,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbHouse {
    pub id: i32,
    pub zpid: String,
    pub zillow_pricing_info: Option<Value>,
    pub zillow_pricing_updated_at: Option<DateTime<Utc>>,
    pub zillow_property_info: Option<Value>,
    pub zillow_property_updated_at: Option<DateTime<Utc>>,
}

impl From<DbHouse> for House {
    fn from(row: DbHouse) -> Self {
        House {
            id: row.id,
            zpid: row.zpid,
            zillow_pricing_info: row.zillow_pricing_info,
            zillow_pricing_updated_at: row.zillow_pricing_updated_at,
            zillow_property_info: row.zillow_property_info,
            zillow_property_updated_at: row.zillow_property_updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbHouseList {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
}

impl From<DbHouseList> for HouseList {
    fn from(row: DbHouseList) -> Self {
        HouseList {
            id: row.id,
            name: row.name,
            owner_id: row.owner_id,
        }
    }
}
