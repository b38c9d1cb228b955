//! In-memory stand-ins for the capability traits, used by schema and
//! router tests.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use house_rank_core::{
    Config, Error, GeoIp, House, HouseList, Location, MapBounds, MapSearchFilters, Principal,
    PropertyClient, Result, Storage, User, ZillowAddress, ZillowAddressExtended,
};
use house_rank_zillow::Enricher;

use crate::auth::FakePrincipalProvider;
use crate::AppState;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    houses: Vec<House>,
    lists: Vec<HouseList>,
    members: Vec<(i32, i32, String)>,
    list_houses: Vec<(i32, i32)>,
    next_id: i32,
}

/// Memory-backed [`Storage`] with the same observable semantics as the
/// Postgres store: idempotent creation paths, NotFound on missing rows,
/// blob and timestamp written together.
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_id: 1,
                ..Tables::default()
            }),
        }
    }

    fn next_id(tables: &mut Tables) -> i32 {
        let id = tables.next_id;
        tables.next_id += 1;
        id
    }

    pub fn seed_user(&self, email: &str) -> User {
        let mut tables = self.tables.lock().unwrap();
        let id = Self::next_id(&mut tables);
        let user = User {
            id,
            provider: "google".into(),
            provider_id: format!("sub-{email}"),
            email: email.into(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        user
    }

    pub fn house_join_count(&self, house_list_id: i32) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .list_houses
            .iter()
            .filter(|(list, _)| *list == house_list_id)
            .count()
    }

    pub fn member_count(&self, house_list_id: i32) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .members
            .iter()
            .filter(|(list, _, _)| *list == house_list_id)
            .count()
    }

    pub fn list_count(&self) -> usize {
        self.tables.lock().unwrap().lists.len()
    }

    /// Backdates a cached sub-resource, for staleness tests.
    pub fn set_pricing(&self, zpid: &str, doc: Value, at: DateTime<Utc>) {
        let mut tables = self.tables.lock().unwrap();
        let house = tables
            .houses
            .iter_mut()
            .find(|h| h.zpid == zpid)
            .expect("house must exist");
        house.zillow_pricing_info = Some(doc);
        house.zillow_pricing_updated_at = Some(at);
    }

    pub fn set_property(&self, zpid: &str, doc: Value, at: DateTime<Utc>) {
        let mut tables = self.tables.lock().unwrap();
        let house = tables
            .houses
            .iter_mut()
            .find(|h| h.zpid == zpid)
            .expect("house must exist");
        house.zillow_property_info = Some(doc);
        house.zillow_property_updated_at = Some(at);
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn user_by_id(&self, id: i32) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user_from_principal(&self, principal: &Principal) -> Result<User> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables
            .users
            .iter()
            .find(|u| u.provider_id == principal.subject && u.provider == principal.provider)
        {
            return Ok(user.clone());
        }
        let id = Self::next_id(&mut tables);
        let user = User {
            id,
            provider: principal.provider.clone(),
            provider_id: principal.subject.clone(),
            email: principal.email.clone().unwrap_or_default(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn house_by_zpid(&self, zpid: &str) -> Result<Option<House>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.houses.iter().find(|h| h.zpid == zpid).cloned())
    }

    async fn update_house_pricing(&self, zpid: &str, doc: &Value) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let house = tables
            .houses
            .iter_mut()
            .find(|h| h.zpid == zpid)
            .ok_or_else(|| Error::not_found("House", "zpid", zpid))?;
        house.zillow_pricing_info = Some(doc.clone());
        house.zillow_pricing_updated_at = Some(Utc::now());
        Ok(())
    }

    async fn update_house_property(&self, zpid: &str, doc: &Value) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let house = tables
            .houses
            .iter_mut()
            .find(|h| h.zpid == zpid)
            .ok_or_else(|| Error::not_found("House", "zpid", zpid))?;
        house.zillow_property_info = Some(doc.clone());
        house.zillow_property_updated_at = Some(Utc::now());
        Ok(())
    }

    async fn has_house_list_access_rw(&self, house_list_id: i32, user_id: i32) -> Result<bool> {
        let tables = self.tables.lock().unwrap();
        let owner = tables
            .lists
            .iter()
            .any(|l| l.id == house_list_id && l.owner_id == user_id);
        let member = tables
            .members
            .iter()
            .any(|(list, user, access)| {
                *list == house_list_id && *user == user_id && access == "edit"
            });
        Ok(owner || member)
    }

    async fn create_house_list(&self, name: &str, owner_id: i32) -> Result<HouseList> {
        let mut tables = self.tables.lock().unwrap();
        let id = Self::next_id(&mut tables);
        let list = HouseList {
            id,
            name: name.into(),
            owner_id,
        };
        tables.lists.push(list.clone());
        Ok(list)
    }

    async fn delete_house_list(&self, house_list_id: i32) -> Result<HouseList> {
        let mut tables = self.tables.lock().unwrap();
        let index = tables
            .lists
            .iter()
            .position(|l| l.id == house_list_id)
            .ok_or_else(|| Error::not_found("HouseList", "id", house_list_id))?;
        Ok(tables.lists.remove(index))
    }

    async fn add_house_to_list(&self, zpid: &str, house_list_id: i32) -> Result<House> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.lists.iter().any(|l| l.id == house_list_id) {
            return Err(Error::not_found("HouseList", "id", house_list_id));
        }
        let house = match tables.houses.iter().find(|h| h.zpid == zpid).cloned() {
            Some(house) => house,
            None => {
                let id = Self::next_id(&mut tables);
                let house = House {
                    id,
                    zpid: zpid.into(),
                    zillow_pricing_info: None,
                    zillow_pricing_updated_at: None,
                    zillow_property_info: None,
                    zillow_property_updated_at: None,
                };
                tables.houses.push(house.clone());
                house
            }
        };
        if !tables
            .list_houses
            .iter()
            .any(|(list, h)| *list == house_list_id && *h == house.id)
        {
            tables.list_houses.push((house_list_id, house.id));
        }
        Ok(house)
    }

    async fn remove_house_from_list(&self, zpid: &str, house_list_id: i32) -> Result<House> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.lists.iter().any(|l| l.id == house_list_id) {
            return Err(Error::not_found("HouseList", "id", house_list_id));
        }
        let house = tables
            .houses
            .iter()
            .find(|h| h.zpid == zpid)
            .cloned()
            .ok_or_else(|| Error::not_found("House", "zpid", zpid))?;
        let index = tables
            .list_houses
            .iter()
            .position(|(list, h)| *list == house_list_id && *h == house.id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "House with zpid {zpid} not found in HouseList with id {house_list_id}"
                ))
            })?;
        tables.list_houses.remove(index);
        Ok(house)
    }

    async fn add_user_to_list(&self, email: &str, house_list_id: i32) -> Result<User> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.lists.iter().any(|l| l.id == house_list_id) {
            return Err(Error::not_found("HouseList", "id", house_list_id));
        }
        let user = tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "User with email {email} not found. Have they logged in yet?"
                ))
            })?;
        if !tables
            .members
            .iter()
            .any(|(list, u, _)| *list == house_list_id && *u == user.id)
        {
            tables.members.push((house_list_id, user.id, "edit".into()));
        }
        Ok(user)
    }

    async fn remove_user_from_list(&self, user_id: i32, house_list_id: i32) -> Result<User> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.lists.iter().any(|l| l.id == house_list_id) {
            return Err(Error::not_found("HouseList", "id", house_list_id));
        }
        let user = tables
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "User with id {user_id} not found. Have they logged in yet?"
                ))
            })?;
        tables
            .members
            .retain(|(list, u, _)| !(*list == house_list_id && *u == user_id));
        Ok(user)
    }

    async fn house_lists_by_owner(&self, owner_id: i32) -> Result<Vec<HouseList>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .lists
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn house_lists_via_membership(&self, user_id: i32) -> Result<Vec<HouseList>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .lists
            .iter()
            .filter(|l| {
                tables
                    .members
                    .iter()
                    .any(|(list, u, _)| *list == l.id && *u == user_id)
            })
            .cloned()
            .collect())
    }

    async fn users_via_membership(&self, house_list_id: i32) -> Result<Vec<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .filter(|u| {
                tables
                    .members
                    .iter()
                    .any(|(list, user, _)| *list == house_list_id && *user == u.id)
            })
            .cloned()
            .collect())
    }

    async fn houses_via_membership(&self, house_list_id: i32) -> Result<Vec<House>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .houses
            .iter()
            .filter(|h| {
                tables
                    .list_houses
                    .iter()
                    .any(|(list, house)| *list == house_list_id && *house == h.id)
            })
            .cloned()
            .collect())
    }
}

/// Upstream stub with canned documents and per-operation call counters.
pub struct StubZillow {
    pub fail: bool,
    pub price_tax_calls: AtomicUsize,
    pub full_render_calls: AtomicUsize,
}

impl Default for StubZillow {
    fn default() -> Self {
        Self {
            fail: false,
            price_tax_calls: AtomicUsize::new(0),
            full_render_calls: AtomicUsize::new(0),
        }
    }
}

impl StubZillow {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl PropertyClient for StubZillow {
    async fn price_tax(&self, zpid: &str) -> Result<Value> {
        self.price_tax_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Upstream("captcha".into()));
        }
        Ok(json!({ "zpid": zpid, "livingArea": 1450, "countyFIPS": "36061" }))
    }

    async fn full_render(&self, zpid: &str) -> Result<Value> {
        self.full_render_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Upstream("captcha".into()));
        }
        Ok(json!({ "zpid": zpid, "homeStatus": "FOR_SALE", "price": 650000.0 }))
    }

    async fn address_search(
        &self,
        _address: &str,
        _citystatezip: &str,
    ) -> Result<Vec<ZillowAddress>> {
        if self.fail {
            return Err(Error::Upstream("captcha".into()));
        }
        Ok(vec![ZillowAddress {
            zpid: "12345".into(),
            city: "New York".into(),
            latitude: 40.730037,
            longitude: -73.998639,
            state: "NY".into(),
            street: "5 Washington Square S".into(),
            zipcode: "10012".into(),
        }])
    }

    async fn map_search(
        &self,
        _bounds: MapBounds,
        _filters: &MapSearchFilters,
    ) -> Result<Vec<ZillowAddressExtended>> {
        if self.fail {
            return Err(Error::Upstream("captcha".into()));
        }
        Ok(vec![ZillowAddressExtended {
            zpid: "44444".into(),
            city: "San Francisco".into(),
            latitude: 37.75,
            longitude: -122.41,
            state: "CA".into(),
            street: "1 Main St".into(),
            zipcode: "94110".into(),
            price: Some(850000.0),
            ..ZillowAddressExtended::default()
        }])
    }
}

pub struct NullGeoIp;

#[async_trait]
impl GeoIp for NullGeoIp {
    async fn lookup(&self, _ip: IpAddr) -> Option<Location> {
        None
    }
}

pub fn test_config() -> Config {
    let vars = [
        ("ZWSID", "X1-test"),
        ("GOOGLE_CLIENT_ID", "test-client.apps.example.com"),
        ("DATABASE_URL", "postgres://unused"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    Config::from_vars(&vars).expect("test config")
}

pub fn test_state(storage: Arc<MemoryStorage>, zillow: Arc<StubZillow>) -> AppState {
    let storage: Arc<dyn Storage> = storage;
    let zillow: Arc<dyn PropertyClient> = zillow;
    AppState {
        config: Arc::new(test_config()),
        storage: storage.clone(),
        zillow: zillow.clone(),
        enricher: Enricher::new(storage, zillow),
        auth: Arc::new(FakePrincipalProvider),
        geoip: Arc::new(NullGeoIp),
    }
}

pub fn localhost() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}
