use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use house_rank_core::{
    Error, MapBounds, MapSearchFilters, PropertyClient, Result, ZillowAddress,
    ZillowAddressExtended,
};

use crate::error::extract_upstream_message;
use crate::parse::{build_map_params, parse_address, parse_map_entry};
use crate::queries::{full_render_query, price_tax_query};

const GRAPHQL_URL: &str = "https://www.zillow.com/graphql/";
const SEARCH_RESULTS_URL: &str = "https://www.zillow.com/webservice/GetSearchResults.htm";
const MAP_RESULTS_URL: &str = "https://www.zillow.com/search/GetResults.htm";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/70.0.3538.67 Safari/537.36";

/// Client for the provider's unofficial endpoints. The header set mimics a
/// browser session on the provider's own pages; without it the endpoints
/// answer with captcha interstitials.
pub struct ZillowClient {
    http: reqwest::Client,
    zwsid: String,
}

impl ZillowClient {
    pub fn new(zwsid: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert("dnt", HeaderValue::from_static("1"));
        headers.insert(header::COOKIE, HeaderValue::from_static("JSESSIONID="));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            header::ORIGIN,
            HeaderValue::from_static("https://www.zillow.com"),
        );
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://www.zillow.com/homes/for_sale/"),
        );
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self { http, zwsid })
    }

    /// POSTs a hand-authored query body and returns `data.property`.
    /// Non-200 statuses and shape mismatches become `Error::Upstream` with
    /// whatever message the body yields.
    async fn property_document(&self, body: String) -> Result<Value> {
        let response = self
            .http
            .post(GRAPHQL_URL)
            .query(&[("zws-id", self.zwsid.as_str())])
            .header(header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let status = response.status();
        let body = read_json(response).await?;
        let property = body.pointer("/data/property").filter(|p| !p.is_null());
        match property {
            Some(property) if status == StatusCode::OK => Ok(property.clone()),
            _ => Err(Error::Upstream(extract_upstream_message(&body))),
        }
    }
}

/// Reads the body as JSON, keeping the raw text as a string value when the
/// provider answers with something that is not JSON (HTML error pages).
async fn read_json(response: reqwest::Response) -> Result<Value> {
    let text = response
        .text()
        .await
        .map_err(|e| Error::Upstream(e.to_string()))?;
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

#[async_trait]
impl PropertyClient for ZillowClient {
    async fn price_tax(&self, zpid: &str) -> Result<Value> {
        self.property_document(price_tax_query(zpid)).await
    }

    async fn full_render(&self, zpid: &str) -> Result<Value> {
        self.property_document(full_render_query(zpid)).await
    }

    async fn address_search(
        &self,
        address: &str,
        citystatezip: &str,
    ) -> Result<Vec<ZillowAddress>> {
        let response = self
            .http
            .get(SEARCH_RESULTS_URL)
            .query(&[
                ("zws-id", self.zwsid.as_str()),
                ("address", address),
                ("citystatezip", citystatezip),
            ])
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let body = read_json(response).await?;
        if body.pointer("/message/code").and_then(Value::as_str) != Some("0") {
            return Err(Error::Upstream(extract_upstream_message(&body)));
        }
        let results = body
            .pointer("/response/results/result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        debug!(count = results.len(), "address search results");
        Ok(results.iter().filter_map(parse_address).collect())
    }

    async fn map_search(
        &self,
        bounds: MapBounds,
        filters: &MapSearchFilters,
    ) -> Result<Vec<ZillowAddressExtended>> {
        let params = build_map_params(&self.zwsid, bounds, filters);
        let response = self
            .http
            .get(MAP_RESULTS_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let status = response.status();
        let body = read_json(response).await?;
        if status != StatusCode::OK || body.is_null() {
            return Err(Error::Upstream(extract_upstream_message(&body)));
        }
        let properties = body
            .pointer("/map/properties")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        debug!(count = properties.len(), "map search results");
        Ok(properties.iter().filter_map(parse_map_entry).collect())
    }
}
