use async_graphql::{Context, InputObject, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};

use house_rank_core::types as model;
use house_rank_core::Error;

use crate::graphql::zillow_types::{ZillowPricingInfo, ZillowPropertyInfo};
use crate::AppState;

pub struct User(pub model::User);

#[Object]
impl User {
    async fn id(&self) -> i32 {
        self.0.id
    }

    async fn provider(&self) -> &str {
        &self.0.provider
    }

    async fn provider_id(&self) -> &str {
        &self.0.provider_id
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn owned_house_lists(&self, ctx: &Context<'_>) -> Result<Vec<HouseList>> {
        let state = ctx.data::<AppState>()?;
        let lists = state.storage.house_lists_by_owner(self.0.id).await?;
        Ok(lists.into_iter().map(HouseList).collect())
    }

    async fn member_house_lists(&self, ctx: &Context<'_>) -> Result<Vec<HouseList>> {
        let state = ctx.data::<AppState>()?;
        let lists = state.storage.house_lists_via_membership(self.0.id).await?;
        Ok(lists.into_iter().map(HouseList).collect())
    }
}

pub struct HouseList(pub model::HouseList);

#[Object]
impl HouseList {
    async fn id(&self) -> i32 {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn owner(&self, ctx: &Context<'_>) -> Result<User> {
        let state = ctx.data::<AppState>()?;
        let owner = state
            .storage
            .user_by_id(self.0.owner_id)
            .await?
            .ok_or_else(|| Error::not_found("User", "id", self.0.owner_id))?;
        Ok(User(owner))
    }

    async fn members(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let state = ctx.data::<AppState>()?;
        let users = state.storage.users_via_membership(self.0.id).await?;
        Ok(users.into_iter().map(User).collect())
    }

    async fn houses(&self, ctx: &Context<'_>) -> Result<Vec<House>> {
        let state = ctx.data::<AppState>()?;
        let houses = state.storage.houses_via_membership(self.0.id).await?;
        Ok(houses.into_iter().map(House).collect())
    }
}

pub struct House(pub model::House);

#[Object]
impl House {
    async fn id(&self) -> i32 {
        self.0.id
    }

    async fn zpid(&self) -> &str {
        &self.0.zpid
    }

    async fn zillow(&self) -> Zillow {
        Zillow {
            zpid: self.0.zpid.clone(),
        }
    }
}

/// Enriched view of one listing. The two fields consult independent caches
/// and are resolved concurrently when both are selected.
pub struct Zillow {
    pub zpid: String,
}

#[Object]
impl Zillow {
    async fn pricing(&self, ctx: &Context<'_>) -> Result<Option<ZillowPricingInfo>> {
        let state = ctx.data::<AppState>()?;
        let doc = state.enricher.pricing(&self.zpid).await?;
        if doc.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(doc).map_err(Error::from)?))
    }

    async fn property(&self, ctx: &Context<'_>) -> Result<Option<ZillowPropertyInfo>> {
        let state = ctx.data::<AppState>()?;
        let doc = state.enricher.property(&self.zpid).await?;
        if doc.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(doc).map_err(Error::from)?))
    }
}

pub struct Principal(pub model::Principal);

#[Object]
impl Principal {
    async fn email(&self) -> Option<&str> {
        self.0.email.as_deref()
    }

    async fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    async fn family_name(&self) -> Option<&str> {
        self.0.family_name.as_deref()
    }

    async fn given_name(&self) -> Option<&str> {
        self.0.given_name.as_deref()
    }

    async fn picture(&self) -> Option<&str> {
        self.0.picture.as_deref()
    }
}

#[derive(SimpleObject)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<model::Location> for Location {
    fn from(location: model::Location) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

pub struct ZillowAddress(pub model::ZillowAddress);

#[Object]
impl ZillowAddress {
    async fn zpid(&self) -> &str {
        &self.0.zpid
    }

    async fn city(&self) -> &str {
        &self.0.city
    }

    async fn latitude(&self) -> f64 {
        self.0.latitude
    }

    async fn longitude(&self) -> f64 {
        self.0.longitude
    }

    async fn state(&self) -> &str {
        &self.0.state
    }

    async fn street(&self) -> &str {
        &self.0.street
    }

    async fn zipcode(&self) -> &str {
        &self.0.zipcode
    }

    async fn zillow(&self) -> Zillow {
        Zillow {
            zpid: self.0.zpid.clone(),
        }
    }
}

pub struct ZillowAddressExtended(pub model::ZillowAddressExtended);

#[Object]
impl ZillowAddressExtended {
    async fn zpid(&self) -> &str {
        &self.0.zpid
    }

    async fn city(&self) -> &str {
        &self.0.city
    }

    async fn latitude(&self) -> f64 {
        self.0.latitude
    }

    async fn longitude(&self) -> f64 {
        self.0.longitude
    }

    async fn state(&self) -> &str {
        &self.0.state
    }

    async fn street(&self) -> &str {
        &self.0.street
    }

    async fn street_address(&self) -> &str {
        &self.0.street
    }

    async fn zipcode(&self) -> &str {
        &self.0.zipcode
    }

    async fn price(&self) -> Option<f64> {
        self.0.price
    }

    async fn date_sold(&self) -> Option<f64> {
        self.0.date_sold
    }

    async fn bathrooms(&self) -> Option<f64> {
        self.0.bathrooms
    }

    async fn bedrooms(&self) -> Option<f64> {
        self.0.bedrooms
    }

    async fn living_area(&self) -> Option<f64> {
        self.0.living_area
    }

    async fn year_built(&self) -> Option<i32> {
        self.0.year_built
    }

    async fn lot_size(&self) -> Option<f64> {
        self.0.lot_size
    }

    async fn home_type(&self) -> Option<&str> {
        self.0.home_type.as_deref()
    }

    async fn home_status(&self) -> Option<&str> {
        self.0.home_status.as_deref()
    }

    async fn photo_count(&self) -> Option<i32> {
        self.0.photo_count
    }

    async fn image_link(&self) -> Option<&str> {
        self.0.image_link.as_deref()
    }

    async fn days_on_zillow(&self) -> Option<f64> {
        self.0.days_on_zillow
    }

    async fn is_featured(&self) -> Option<bool> {
        self.0.is_featured
    }

    async fn broker_id(&self) -> Option<i32> {
        self.0.broker_id
    }

    async fn zestimate(&self) -> Option<f64> {
        self.0.zestimate
    }

    async fn is_unmappable(&self) -> Option<bool> {
        self.0.is_unmappable
    }

    async fn medium_image_link(&self) -> Option<&str> {
        self.0.medium_image_link.as_deref()
    }

    #[graphql(name = "homeStatusForHDP")]
    async fn home_status_for_hdp(&self) -> Option<&str> {
        self.0.home_status_for_hdp.as_deref()
    }

    #[graphql(name = "priceForHDP")]
    async fn price_for_hdp(&self) -> Option<f64> {
        self.0.price_for_hdp
    }

    async fn festimate(&self) -> Option<f64> {
        self.0.festimate
    }

    async fn hi_res_image_link(&self) -> Option<&str> {
        self.0.hi_res_image_link.as_deref()
    }

    async fn currency(&self) -> Option<&str> {
        self.0.currency.as_deref()
    }

    async fn country(&self) -> Option<&str> {
        self.0.country.as_deref()
    }

    async fn zillow(&self) -> Zillow {
        Zillow {
            zpid: self.0.zpid.clone(),
        }
    }
}

#[derive(InputObject)]
pub struct LatLongInput {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LatLongInput> for model::LatLong {
    fn from(input: LatLongInput) -> Self {
        model::LatLong {
            latitude: input.latitude,
            longitude: input.longitude,
        }
    }
}

#[derive(InputObject, Default)]
pub struct RangeInput {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl From<RangeInput> for model::RangeFilter {
    fn from(input: RangeInput) -> Self {
        model::RangeFilter {
            min: input.min,
            max: input.max,
        }
    }
}

/// Map-search filters; omitted fields fall back to the service's
/// long-standing defaults.
#[derive(InputObject, Default)]
pub struct MapSearchFiltersInput {
    pub price: Option<RangeInput>,
    pub beds_min: Option<f64>,
    pub baths_min: Option<f64>,
    pub living_area: Option<RangeInput>,
    pub lot_size: Option<RangeInput>,
    pub year_built: Option<RangeInput>,
    pub include_for_sale: Option<bool>,
    pub include_pending: Option<bool>,
    pub include_recently_sold: Option<bool>,
    pub include_foreclosure: Option<bool>,
    pub include_pre_foreclosure: Option<bool>,
}

impl MapSearchFiltersInput {
    pub fn into_filters(self) -> model::MapSearchFilters {
        let defaults = model::MapSearchFilters::default();
        model::MapSearchFilters {
            price: self.price.map(Into::into).unwrap_or(defaults.price),
            beds_min: self.beds_min.unwrap_or(defaults.beds_min),
            baths_min: self.baths_min.unwrap_or(defaults.baths_min),
            living_area: self
                .living_area
                .map(Into::into)
                .unwrap_or(defaults.living_area),
            lot_size: self.lot_size.map(Into::into).unwrap_or(defaults.lot_size),
            year_built: self
                .year_built
                .map(Into::into)
                .unwrap_or(defaults.year_built),
            include_for_sale: self.include_for_sale.unwrap_or(defaults.include_for_sale),
            include_pending: self.include_pending.unwrap_or(defaults.include_pending),
            include_recently_sold: self
                .include_recently_sold
                .unwrap_or(defaults.include_recently_sold),
            include_foreclosure: self
                .include_foreclosure
                .unwrap_or(defaults.include_foreclosure),
            include_pre_foreclosure: self
                .include_pre_foreclosure
                .unwrap_or(defaults.include_pre_foreclosure),
        }
    }
}
