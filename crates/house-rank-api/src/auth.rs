use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{error, info};

use house_rank_core::{AuthProvider, Error, Principal, Result, User};

use crate::AppState;

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];
/// How long a fetched key set is trusted before the next refresh.
const JWKS_TTL: Duration = Duration::from_secs(3600);

/// Per-request identity, attached after verification and user bootstrap.
#[derive(Clone)]
pub struct RequestContext {
    pub principal: Principal,
    pub user: User,
    pub remote_addr: IpAddr,
}

/// Verifies the bearer credential, bootstraps the user row, and attaches a
/// [`RequestContext`] — or answers 401 before GraphQL ever runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty());
    let Some(token) = token else {
        return unauthorized("Invalid authorization header");
    };

    let principal = match state.auth.verify(token).await {
        Ok(principal) => principal,
        Err(e) => {
            error!(error = %e, "token verification failed");
            return unauthorized("Invalid or expired authorization");
        }
    };
    let user = match state.storage.create_user_from_principal(&principal).await {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "user bootstrap failed");
            return unauthorized("Invalid or expired authorization");
        }
    };

    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    info!(
        method = %req.method(),
        uri = %req.uri(),
        subject = %principal.subject,
        email = principal.email.as_deref().unwrap_or("-"),
        "request"
    );

    req.extensions_mut().insert(RequestContext {
        principal,
        user,
        remote_addr,
    });
    next.run(req).await
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": message })),
    )
        .into_response()
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct GoogleClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

struct CachedKeys {
    keys: Vec<Jwk>,
    fetched_at: Instant,
}

/// Verifies Google-issued ID tokens (RS256) against the published JWKS,
/// pinned to the configured client id as audience. Fails closed.
pub struct GoogleTokenVerifier {
    audience: String,
    http: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl GoogleTokenVerifier {
    pub fn new(audience: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Auth(e.to_string()))?;
        Ok(Self {
            audience,
            http,
            cache: RwLock::new(None),
        })
    }

    async fn key_for(&self, kid: &str) -> Result<Jwk> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.fetched_at.elapsed() < JWKS_TTL {
                if let Some(jwk) = cached.keys.iter().find(|k| k.kid == kid) {
                    return Ok(jwk.clone());
                }
            }
        }

        // Stale cache or unknown kid (key rotation): refresh.
        let jwks: Jwks = self
            .http
            .get(GOOGLE_JWKS_URL)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("JWKS fetch failed: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Auth(format!("JWKS decode failed: {e}")))?;

        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeys {
            keys: jwks.keys.clone(),
            fetched_at: Instant::now(),
        });
        jwks.keys
            .into_iter()
            .find(|k| k.kid == kid)
            .ok_or_else(|| Error::Auth(format!("no signing key with kid {kid}")))
    }
}

#[async_trait]
impl AuthProvider for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Principal> {
        let header = decode_header(token).map_err(|e| Error::Auth(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| Error::Auth("token carries no key id".into()))?;
        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| Error::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        let data =
            decode::<GoogleClaims>(token, &key, &validation).map_err(|e| Error::Auth(e.to_string()))?;

        let claims = data.claims;
        Ok(Principal {
            provider: "google".into(),
            subject: claims.sub,
            email: claims.email,
            name: claims.name,
            given_name: claims.given_name,
            family_name: claims.family_name,
            picture: claims.picture,
        })
    }
}

/// Fixed principal for local testing; accepts any non-empty token.
#[derive(Default)]
pub struct FakePrincipalProvider;

#[async_trait]
impl AuthProvider for FakePrincipalProvider {
    async fn verify(&self, _token: &str) -> Result<Principal> {
        Ok(Principal {
            provider: "google".into(),
            subject: "0".into(),
            email: Some("dev@localhost".into()),
            name: Some("Local Developer".into()),
            given_name: Some("Local".into()),
            family_name: Some("Developer".into()),
            picture: None,
        })
    }
}
