//! Typed projections of the cached upstream documents. Deserialization is
//! lenient on purpose: every field is optional and unknown fields are
//! ignored, so upstream schema drift degrades to nulls instead of failing
//! the whole field.

use async_graphql::SimpleObject;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The provider is inconsistent about whether ids are strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

#[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[derive(Default)]
pub struct ZillowTaxHistoryInfo {
    pub time: Option<f64>,
    pub tax_paid: Option<f64>,
    pub tax_increase_rate: Option<f64>,
    pub value: Option<f64>,
    pub value_increase_rate: Option<f64>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowAgentPhoto {
    pub url: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowAgentInfo {
    pub photo: Option<ZillowAgentPhoto>,
    pub profile_url: Option<String>,
    pub name: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowPriceHistoryInfo {
    pub time: Option<f64>,
    pub price: Option<f64>,
    pub price_change_rate: Option<f64>,
    pub event: Option<String>,
    pub source: Option<String>,
    pub buyer_agent: Option<ZillowAgentInfo>,
    pub seller_agent: Option<ZillowAgentInfo>,
    pub posting_is_rental: Option<bool>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowPricingInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub zpid: Option<String>,
    pub living_area: Option<f64>,
    #[serde(rename = "countyFIPS")]
    #[graphql(name = "countyFIPS")]
    pub county_fips: Option<String>,
    pub parcel_id: Option<String>,
    pub tax_history: Option<Vec<ZillowTaxHistoryInfo>>,
    pub price_history: Option<Vec<ZillowPriceHistoryInfo>>,
    pub currency: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowFactInfo {
    pub fact_label: Option<String>,
    pub fact_value: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowCategoryInfo {
    pub category_name: Option<String>,
    pub category_facts: Option<Vec<ZillowFactInfo>>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowCategoryDetailsInfo {
    pub category_group_name: Option<String>,
    pub categories: Option<Vec<ZillowCategoryInfo>>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowHomeFactsInfo {
    pub above_facts_and_features_categories: Option<Vec<ZillowCategoryInfo>>,
    pub at_a_glance_facts: Option<Vec<ZillowFactInfo>>,
    pub category_details: Option<Vec<ZillowCategoryDetailsInfo>>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowPhotoInfo {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub url: Option<String>,
    pub caption: Option<String>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowForeclosureInfo {
    pub is_bank_owned: Option<bool>,
    #[serde(rename = "wasREO")]
    #[graphql(name = "wasREO")]
    pub was_reo: Option<bool>,
    #[serde(rename = "isForeclosedNFS")]
    #[graphql(name = "isForeclosedNFS")]
    pub is_foreclosed_nfs: Option<bool>,
    pub is_any_foreclosure: Option<bool>,
    pub is_preforeclosure: Option<bool>,
    pub was_non_retail_auction: Option<bool>,
    pub was_foreclosed: Option<bool>,
    pub was_default: Option<bool>,
}

#[derive(SimpleObject, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZillowPropertyInfo {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub days_on_zillow: Option<i64>,
    pub date_sold: Option<f64>,
    pub date_posted: Option<f64>,
    pub last_sold_price: Option<f64>,
    pub is_zillow_owned: Option<bool>,
    pub currency: Option<String>,
    pub city: Option<String>,
    pub posting_url: Option<String>,
    pub property_type_dimension: Option<String>,
    pub hdp_type_dimension: Option<String>,
    pub listing_type_dimension: Option<String>,
    pub featured_listing_type_dimension: Option<String>,
    pub broker_id_dimension: Option<String>,
    pub keystone_home_status: Option<String>,
    pub rental_applications_accepted_type: Option<String>,
    pub year_built: Option<i64>,
    pub borough_id: Option<i64>,
    pub broker_id: Option<i64>,
    pub brokerage_name: Option<String>,
    #[serde(rename = "providerListingID")]
    #[graphql(name = "providerListingID")]
    pub provider_listing_id: Option<String>,
    pub posting_product_type: Option<String>,
    pub rental_refresh_time: Option<f64>,
    pub is_featured: Option<bool>,
    pub rental_date_available: Option<f64>,
    pub new_construction_type: Option<String>,
    pub coming_soon_on_market_date: Option<f64>,
    pub listing_status_change_date: Option<f64>,
    pub is_preforeclosure_auction: Option<bool>,
    pub tax_assessed_value: Option<f64>,
    pub tax_assessed_year: Option<i64>,
    pub price_change: Option<f64>,
    pub is_non_owner_occupied: Option<bool>,
    pub is_recent_status_change: Option<bool>,
    pub forecast: Option<String>,
    pub home_status: Option<String>,
    pub home_type: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub is_undisclosed_address: Option<bool>,
    pub is_instant_offer_enabled: Option<bool>,
    pub rent_zestimate: Option<f64>,
    pub restimate_high_percent: Option<String>,
    pub restimate_low_percent: Option<String>,
    pub restimate_minus_30: Option<String>,
    pub state: Option<String>,
    pub region_string: Option<String>,
    pub street_address: Option<String>,
    pub abbreviated_address: Option<String>,
    pub lot_size: Option<f64>,
    pub zestimate: Option<f64>,
    pub zestimate_high_percent: Option<String>,
    pub zestimate_low_percent: Option<String>,
    pub zestimate_minus_30: Option<String>,
    pub zipcode: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub zpid: Option<String>,
    pub price: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub living_area: Option<f64>,
    pub hoa_fee: Option<f64>,
    pub property_tax_rate: Option<f64>,
    pub foreclosure_types: Option<ZillowForeclosureInfo>,
    pub small_photos: Option<Vec<ZillowPhotoInfo>>,
    pub medium_photos: Option<Vec<ZillowPhotoInfo>>,
    pub huge_photos: Option<Vec<ZillowPhotoInfo>>,
    pub home_facts: Option<ZillowHomeFactsInfo>,
    pub photo_count: Option<i64>,
}
