use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One property listing, keyed by the provider's immutable `zpid`.
///
/// The two info blobs are opaque upstream documents; each carries its own
/// refresh timestamp. A non-null blob always has a non-null timestamp —
/// both are written together by the enrichment path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct House {
    pub id: i32,
    pub zpid: String,
    pub zillow_pricing_info: Option<Value>,
    pub zillow_pricing_updated_at: Option<DateTime<Utc>>,
    pub zillow_property_info: Option<Value>,
    pub zillow_property_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseList {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub provider: String,
    pub provider_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Verified identity claims for the current request. Never persisted;
/// seeds idempotent [`User`] creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub provider: String,
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLong {
    pub latitude: f64,
    pub longitude: f64,
}

/// One address-search result. Upstream wraps every field in a
/// single-element array; the parser unwraps and validates before this type
/// is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZillowAddress {
    pub zpid: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub state: String,
    pub street: String,
    pub zipcode: String,
}

/// One map-search result: the address fields plus whatever listing detail
/// the provider chose to include. All detail fields are optional — the map
/// payload is not stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZillowAddressExtended {
    pub zpid: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub state: String,
    pub street: String,
    pub zipcode: String,
    pub price: Option<f64>,
    pub date_sold: Option<f64>,
    pub bathrooms: Option<f64>,
    pub bedrooms: Option<f64>,
    pub living_area: Option<f64>,
    pub year_built: Option<i32>,
    pub lot_size: Option<f64>,
    pub home_type: Option<String>,
    pub home_status: Option<String>,
    pub photo_count: Option<i32>,
    pub image_link: Option<String>,
    pub days_on_zillow: Option<f64>,
    pub is_featured: Option<bool>,
    pub broker_id: Option<i32>,
    pub zestimate: Option<f64>,
    pub is_unmappable: Option<bool>,
    pub medium_image_link: Option<String>,
    pub home_status_for_hdp: Option<String>,
    pub price_for_hdp: Option<f64>,
    pub festimate: Option<f64>,
    pub hi_res_image_link: Option<String>,
    pub currency: Option<String>,
    pub country: Option<String>,
}

/// Bounding box for a map search.
#[derive(Debug, Clone, Copy)]
pub struct MapBounds {
    pub top_right: LatLong,
    pub bottom_left: LatLong,
    pub zoom: i32,
}

/// Numeric range filter; either bound may be open.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Map-search filters. Defaults reproduce the provider parameters the
/// service has always sent: for-sale and pending listings on, everything
/// else off, at least one bed, any baths.
#[derive(Debug, Clone)]
pub struct MapSearchFilters {
    pub price: RangeFilter,
    pub beds_min: f64,
    pub baths_min: f64,
    pub living_area: RangeFilter,
    pub lot_size: RangeFilter,
    pub year_built: RangeFilter,
    pub include_for_sale: bool,
    pub include_pending: bool,
    pub include_recently_sold: bool,
    pub include_foreclosure: bool,
    pub include_pre_foreclosure: bool,
}

impl Default for MapSearchFilters {
    fn default() -> Self {
        Self {
            price: RangeFilter::default(),
            beds_min: 1.0,
            baths_min: 0.0,
            living_area: RangeFilter::default(),
            lot_size: RangeFilter::default(),
            year_built: RangeFilter::default(),
            include_for_sale: true,
            include_pending: true,
            include_recently_sold: false,
            include_foreclosure: false,
            include_pre_foreclosure: false,
        }
    }
}
