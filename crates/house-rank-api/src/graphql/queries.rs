use async_graphql::{Context, Object, Result};

use house_rank_core::MapBounds;

use crate::auth::RequestContext;
use crate::graphql::types::{
    HouseList, LatLongInput, Location, MapSearchFiltersInput, Principal, User, Zillow,
    ZillowAddress, ZillowAddressExtended,
};
use crate::AppState;

const DEFAULT_SEARCH_ADDRESS: &str = "5 Washington Square S";
const DEFAULT_SEARCH_CITYSTATEZIP: &str = "10001";
const DEFAULT_MAP_ZOOM: i32 = 12;

pub struct Query;

#[Object]
impl Query {
    /// Remote address of the caller, as seen by the gateway.
    async fn ip(&self, ctx: &Context<'_>) -> Result<String> {
        let request = ctx.data::<RequestContext>()?;
        Ok(request.remote_addr.to_string())
    }

    /// The verified identity claims for this request.
    async fn principal(&self, ctx: &Context<'_>) -> Result<Principal> {
        let request = ctx.data::<RequestContext>()?;
        Ok(Principal(request.principal.clone()))
    }

    /// The persisted user bootstrapped from the principal.
    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        let request = ctx.data::<RequestContext>()?;
        Ok(User(request.user.clone()))
    }

    /// Best-effort geolocation of the caller's IP.
    async fn location(&self, ctx: &Context<'_>) -> Result<Option<Location>> {
        let state = ctx.data::<AppState>()?;
        let request = ctx.data::<RequestContext>()?;
        Ok(state
            .geoip
            .lookup(request.remote_addr)
            .await
            .map(Into::into))
    }

    /// Enriched view of a single listing.
    async fn zillow_property(&self, zpid: String) -> Zillow {
        Zillow { zpid }
    }

    /// Free-text address search against the upstream provider.
    async fn zillow_address_search(
        &self,
        ctx: &Context<'_>,
        address: Option<String>,
        citystatezip: Option<String>,
    ) -> Result<Vec<ZillowAddress>> {
        let state = ctx.data::<AppState>()?;
        let address = address.unwrap_or_else(|| DEFAULT_SEARCH_ADDRESS.to_string());
        let citystatezip = citystatezip.unwrap_or_else(|| DEFAULT_SEARCH_CITYSTATEZIP.to_string());
        let results = state.zillow.address_search(&address, &citystatezip).await?;
        Ok(results.into_iter().map(ZillowAddress).collect())
    }

    /// Bounding-box map search against the upstream provider.
    async fn zillow_map_search(
        &self,
        ctx: &Context<'_>,
        top_right: LatLongInput,
        bottom_left: LatLongInput,
        zoom: Option<i32>,
        filters: Option<MapSearchFiltersInput>,
    ) -> Result<Vec<ZillowAddressExtended>> {
        let state = ctx.data::<AppState>()?;
        let bounds = MapBounds {
            top_right: top_right.into(),
            bottom_left: bottom_left.into(),
            zoom: zoom.unwrap_or(DEFAULT_MAP_ZOOM),
        };
        let filters = filters.unwrap_or_default().into_filters();
        let results = state.zillow.map_search(bounds, &filters).await?;
        Ok(results.into_iter().map(ZillowAddressExtended).collect())
    }
}
