use std::sync::Arc;

use tracing::warn;

use house_rank_core::{AuthProvider, Config, GeoIp, PropertyClient, Result, Storage};
use house_rank_store::PgStore;
use house_rank_zillow::{Enricher, ZillowClient};

use crate::auth::{FakePrincipalProvider, GoogleTokenVerifier};
use crate::geoip::HttpGeoIp;

/// Everything a request needs, constructed once at startup and injected
/// explicitly — no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<dyn Storage>,
    pub zillow: Arc<dyn PropertyClient>,
    pub enricher: Enricher,
    pub auth: Arc<dyn AuthProvider>,
    pub geoip: Arc<dyn GeoIp>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        let storage: Arc<dyn Storage> = Arc::new(PgStore::connect(&config.database).await?);
        let zillow: Arc<dyn PropertyClient> = Arc::new(ZillowClient::new(config.zwsid.clone())?);
        let enricher = Enricher::new(storage.clone(), zillow.clone());

        let auth: Arc<dyn AuthProvider> = if config.insecure_fake_principal {
            warn!("INSECURE_FAKE_PRINCIPAL is set; token verification is disabled");
            Arc::new(FakePrincipalProvider::default())
        } else {
            Arc::new(GoogleTokenVerifier::new(config.google_client_id.clone())?)
        };
        let geoip: Arc<dyn GeoIp> = Arc::new(HttpGeoIp::new(config.geoip_url.clone())?);

        Ok(Self {
            config: Arc::new(config),
            storage,
            zillow,
            enricher,
            auth,
            geoip,
        })
    }
}
