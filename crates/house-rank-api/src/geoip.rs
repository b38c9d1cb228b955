use std::net::IpAddr;

use async_trait::async_trait;
use serde::Deserialize;

use house_rank_core::{Error, GeoIp, Location, Result};

/// Geolocation over a JSON lookup service (`GET {base}/{ip}` returning
/// `lat`/`lon`). Unconfigured or failing lookups resolve to `None` — the
/// `location` field is best-effort by contract.
pub struct HttpGeoIp {
    base_url: Option<String>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl HttpGeoIp {
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self { base_url, http })
    }
}

#[async_trait]
impl GeoIp for HttpGeoIp {
    async fn lookup(&self, ip: IpAddr) -> Option<Location> {
        let base = self.base_url.as_deref()?;
        let url = format!("{}/{ip}", base.trim_end_matches('/'));
        let response = self.http.get(url).send().await.ok()?;
        let geo: GeoResponse = response.json().await.ok()?;
        if geo.status.as_deref() == Some("fail") {
            return None;
        }
        Some(Location {
            latitude: geo.lat?,
            longitude: geo.lon?,
        })
    }
}
