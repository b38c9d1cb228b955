use std::net::IpAddr;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{
    House, HouseList, Location, MapBounds, MapSearchFilters, Principal, User, ZillowAddress,
    ZillowAddressExtended,
};

/// Persistence capability: users, houses, house lists, memberships.
///
/// The production implementation is Postgres-backed; resolvers and the
/// enrichment engine only ever see this trait.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn user_by_id(&self, id: i32) -> Result<Option<User>>;

    /// Idempotent by (provider, provider_id): re-authenticating returns the
    /// existing row.
    async fn create_user_from_principal(&self, principal: &Principal) -> Result<User>;

    async fn house_by_zpid(&self, zpid: &str) -> Result<Option<House>>;

    /// Overwrites the pricing blob and its timestamp. Fails with `NotFound`
    /// when no House row exists for the zpid — rows are created through the
    /// list-membership path, not here.
    async fn update_house_pricing(&self, zpid: &str, doc: &Value) -> Result<()>;

    /// Property-blob counterpart of [`update_house_pricing`].
    ///
    /// [`update_house_pricing`]: Storage::update_house_pricing
    async fn update_house_property(&self, zpid: &str, doc: &Value) -> Result<()>;

    /// True when the user owns the list or holds an `edit` membership.
    async fn has_house_list_access_rw(&self, house_list_id: i32, user_id: i32) -> Result<bool>;

    async fn create_house_list(&self, name: &str, owner_id: i32) -> Result<HouseList>;
    async fn delete_house_list(&self, house_list_id: i32) -> Result<HouseList>;
    async fn add_house_to_list(&self, zpid: &str, house_list_id: i32) -> Result<House>;
    async fn remove_house_from_list(&self, zpid: &str, house_list_id: i32) -> Result<House>;
    async fn add_user_to_list(&self, email: &str, house_list_id: i32) -> Result<User>;
    async fn remove_user_from_list(&self, user_id: i32, house_list_id: i32) -> Result<User>;

    async fn house_lists_by_owner(&self, owner_id: i32) -> Result<Vec<HouseList>>;
    async fn house_lists_via_membership(&self, user_id: i32) -> Result<Vec<HouseList>>;
    async fn users_via_membership(&self, house_list_id: i32) -> Result<Vec<User>>;
    async fn houses_via_membership(&self, house_list_id: i32) -> Result<Vec<House>>;
}

/// The upstream provider's four operations. Documents come back as raw
/// JSON; search results are pre-validated by the client's parsers.
#[async_trait]
pub trait PropertyClient: Send + Sync {
    /// Pricing and tax history for one listing.
    async fn price_tax(&self, zpid: &str) -> Result<Value>;

    /// Full property render for one listing.
    async fn full_render(&self, zpid: &str) -> Result<Value>;

    /// Free-text address search.
    async fn address_search(&self, address: &str, citystatezip: &str)
        -> Result<Vec<ZillowAddress>>;

    /// Geographic bounding-box search.
    async fn map_search(
        &self,
        bounds: MapBounds,
        filters: &MapSearchFilters,
    ) -> Result<Vec<ZillowAddressExtended>>;
}

/// Identity verification: bearer credential in, verified claims out.
/// Fails closed.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Principal>;
}

/// Best-effort IP geolocation. `None` on any failure.
#[async_trait]
pub trait GeoIp: Send + Sync {
    async fn lookup(&self, ip: IpAddr) -> Option<Location>;
}
