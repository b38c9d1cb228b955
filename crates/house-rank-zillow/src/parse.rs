//! Defensive parsing of the provider's loosely-typed search payloads, plus
//! the compact rectangle serialization its map endpoint expects. All the
//! brittle positional/array-wrapped knowledge lives here; a malformed
//! entry is dropped, never an error.

use serde_json::Value;

use house_rank_core::{LatLong, MapBounds, MapSearchFilters, ZillowAddress, ZillowAddressExtended};

/// Significant characters the provider keeps per coordinate group.
const RECT_GROUP_LEN: i32 = 8;

/// Serializes the bounding box as the provider's compact digit-group
/// string: decimal points dropped, a leading minus not counted against the
/// group, commas resetting it, and each coordinate truncated to 8
/// significant characters.
pub fn encode_rect(bottom_left: LatLong, top_right: LatLong) -> String {
    let joined = format!(
        "{},{},{},{}",
        bottom_left.longitude, bottom_left.latitude, top_right.longitude, top_right.latitude
    );
    let mut rect = String::new();
    let mut token_len: i32 = 0;
    for ch in joined.chars() {
        match ch {
            '.' => continue,
            '-' => token_len -= 1,
            ',' => token_len = -1,
            _ if token_len == RECT_GROUP_LEN => continue,
            _ => {}
        }
        rect.push(ch);
        token_len += 1;
    }
    rect
}

fn range_param(min: Option<f64>, max: Option<f64>) -> String {
    let fmt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    format!("{},{}", fmt(min), fmt(max))
}

/// Query parameters for the legacy map-search endpoint. The constants are
/// what the provider's own map page sends; the filter fields vary the
/// handful of parameters the gateway exposes.
pub fn build_map_params(
    zwsid: &str,
    bounds: MapBounds,
    filters: &MapSearchFilters,
) -> Vec<(String, String)> {
    // status digits: [for-sale, make-me-move, recently-sold, for-rent, ...]
    let status = format!(
        "{}0{}000",
        filters.include_for_sale as u8, filters.include_recently_sold as u8
    );
    let params: Vec<(&str, String)> = vec![
        ("rect", encode_rect(bounds.bottom_left, bounds.top_right)),
        ("zoom", bounds.zoom.to_string()),
        ("zws-id", zwsid.to_string()),
        ("spt", "homes".into()),
        ("status", status),
        ("lt", "111101".into()),
        ("ht", "111111".into()),
        ("pr", range_param(filters.price.min, filters.price.max)),
        ("mp", ",".into()),
        ("bd", format!("{},", filters.beds_min)),
        ("ba", format!("{},", filters.baths_min)),
        (
            "sf",
            range_param(filters.living_area.min, filters.living_area.max),
        ),
        (
            "lot",
            range_param(filters.lot_size.min, filters.lot_size.max),
        ),
        (
            "yr",
            range_param(filters.year_built.min, filters.year_built.max),
        ),
        ("singlestory", "0".into()),
        ("hoa", "0,".into()),
        ("pho", "0".into()),
        ("pets", "0".into()),
        ("parking", "0".into()),
        ("laundry", "0".into()),
        ("income-restricted", "0".into()),
        ("fr-bldg", "0".into()),
        ("condo-bldg", "0".into()),
        ("furnished-apartments", "0".into()),
        ("cheap-apartments", "0".into()),
        ("studio-apartments", "0".into()),
        ("pnd", flag(filters.include_pending)),
        ("red", "0".into()),
        ("zso", "0".into()),
        ("days", "any".into()),
        ("ds", "all".into()),
        ("pmf", flag(filters.include_foreclosure)),
        ("pf", flag(filters.include_pre_foreclosure)),
        ("sch", "100111".into()),
        ("p", "1".into()),
        ("sort", "globalrelevanceex".into()),
        ("search", "maplist".into()),
        ("rt", "6".into()),
        ("listright", "true".into()),
        ("isMapSearch", "true".into()),
    ];
    params
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// One address-search entry. Every field arrives wrapped in a
/// single-element array (`zpid[0]`, `address[0].city[0]`). Any missing
/// required field drops the entry.
pub fn parse_address(entry: &Value) -> Option<ZillowAddress> {
    let zpid = first_str(entry.get("zpid")?)?;
    let address = entry.get("address")?.get(0)?;
    Some(ZillowAddress {
        zpid,
        city: first_str(address.get("city")?)?,
        latitude: first_str(address.get("latitude")?)?.parse().ok()?,
        longitude: first_str(address.get("longitude")?)?.parse().ok()?,
        state: first_str(address.get("state")?)?,
        street: first_str(address.get("street")?)?,
        zipcode: first_str(address.get("zipcode")?)?,
    })
}

/// One map-search entry. The property record hides at `entry[8][11]`;
/// everything around it is provider rendering baggage.
pub fn parse_map_entry(entry: &Value) -> Option<ZillowAddressExtended> {
    let record = entry.get(8)?.get(11)?;
    let record = record.as_object()?;

    let street = str_of(record.get("streetAddress")?)?;
    Some(ZillowAddressExtended {
        zpid: str_of(record.get("zpid")?)?,
        city: str_of(record.get("city")?)?,
        latitude: f64_of(record.get("latitude")?)?,
        longitude: f64_of(record.get("longitude")?)?,
        state: str_of(record.get("state")?)?,
        zipcode: str_of(record.get("zipcode")?)?,
        street,
        price: record.get("price").and_then(f64_opt),
        date_sold: record.get("dateSold").and_then(f64_opt),
        bathrooms: record.get("bathrooms").and_then(f64_opt),
        bedrooms: record.get("bedrooms").and_then(f64_opt),
        living_area: record.get("livingArea").and_then(f64_opt),
        year_built: record.get("yearBuilt").and_then(i32_opt),
        lot_size: record.get("lotSize").and_then(f64_opt),
        home_type: record.get("homeType").and_then(str_opt),
        home_status: record.get("homeStatus").and_then(str_opt),
        photo_count: record.get("photoCount").and_then(i32_opt),
        image_link: record.get("imageLink").and_then(str_opt),
        days_on_zillow: record.get("daysOnZillow").and_then(f64_opt),
        is_featured: record.get("isFeatured").and_then(Value::as_bool),
        broker_id: record.get("brokerId").and_then(i32_opt),
        zestimate: record.get("zestimate").and_then(f64_opt),
        is_unmappable: record.get("isUnmappable").and_then(Value::as_bool),
        medium_image_link: record.get("mediumImageLink").and_then(str_opt),
        home_status_for_hdp: record.get("homeStatusForHDP").and_then(str_opt),
        price_for_hdp: record.get("priceForHDP").and_then(f64_opt),
        festimate: record.get("festimate").and_then(f64_opt),
        hi_res_image_link: record.get("hiResImageLink").and_then(str_opt),
        currency: record.get("currency").and_then(str_opt),
        country: record.get("country").and_then(str_opt),
    })
}

/// First element of an array-wrapped field, as a string. Numbers are
/// accepted and rendered; the provider is not consistent about which it
/// sends.
fn first_str(value: &Value) -> Option<String> {
    str_of(value.get(0)?)
}

fn str_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_opt(value: &Value) -> Option<String> {
    str_of(value)
}

fn f64_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn f64_opt(value: &Value) -> Option<f64> {
    f64_of(value)
}

fn i32_opt(value: &Value) -> Option<i32> {
    f64_of(value).map(|v| v as i32)
}
