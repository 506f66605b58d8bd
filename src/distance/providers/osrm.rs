use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, trace, warn};

use crate::config::constant::DEFAULT_OSRM_BASE_URL;
use crate::domain::types::Location;
use crate::error::{CostError, Result};

use super::body_preview;

const SERVICE: &str = "osrm";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Road distance and travel time for one origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadLeg {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}

pub struct OsrmClient {
    base_url: String,
    user_agent: Option<String>,
    client: Client,
}

impl OsrmClient {
    /// `contact_email` goes into the User-Agent required by the public server.
    pub fn new(base_url: impl Into<String>, contact_email: Option<&str>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let user_agent = base_url.contains("router.project-osrm.org").then(|| {
            contact_email
                .map(|email| format!("route-cost/0.1 ({})", email.trim()))
                .unwrap_or_else(|| "route-cost/0.1 (no-email-configured@example.com)".to_string())
        });
        OsrmClient {
            base_url,
            user_agent,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn route_url(&self, from: &Location, to: &Location) -> String {
        // OSRM wants longitude,latitude
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=false",
            self.base_url, from.longitude, from.latitude, to.longitude, to.latitude
        )
    }

    /// Fetches the driving distance and duration between two points.
    pub async fn road_leg(&self, from: &Location, to: &Location) -> Result<RoadLeg> {
        let url = self.route_url(from, to);
        debug!("Built OSRM URL: {}", url);

        let mut request_builder = self.client.get(&url).timeout(REQUEST_TIMEOUT);
        match &self.user_agent {
            Some(user_agent) => {
                request_builder = request_builder.header("User-Agent", user_agent);
                info!("Using public OSRM, added User-Agent: {}", user_agent);
            }
            None => info!("Using self-hosted OSRM at {}", self.base_url),
        }

        let response = request_builder.send().await.map_err(|e| {
            error!("OSRM request failed: {} ({} -> {})", e, from.id, to.id);
            if e.to_string().contains("handshake") || e.to_string().contains("TLS") {
                warn!("TLS/handshake failure, the public OSRM server may be blocking requests");
            }
            CostError::upstream(SERVICE, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "OSRM returned HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            );
            return Err(CostError::upstream(SERVICE, format!("HTTP {status}")));
        }

        let text = response.text().await.map_err(|e| {
            error!("Failed to read OSRM response body: {}", e);
            CostError::upstream(SERVICE, e.to_string())
        })?;
        trace!("Response size: {} bytes", text.len());

        let leg = parse_route_response(&text)?;
        info!(
            "OSRM leg {} -> {}: {:.2} km, {:.1} min",
            from.id, to.id, leg.distance_km, leg.duration_minutes
        );
        Ok(leg)
    }
}

impl Default for OsrmClient {
    fn default() -> Self {
        OsrmClient::new(DEFAULT_OSRM_BASE_URL, None)
    }
}

/// Parses an OSRM `route` service body into kilometers and minutes.
pub(crate) fn parse_route_response(text: &str) -> Result<RoadLeg> {
    let body: RouteResponse = serde_json::from_str(text).map_err(|e| {
        error!(
            "Failed to parse OSRM JSON: {} (first 200 chars: {})",
            e,
            body_preview(text)
        );
        CostError::upstream(SERVICE, format!("malformed response: {e}"))
    })?;

    if body.code != "Ok" {
        let message = body.message.unwrap_or_default();
        error!("OSRM answered code {}: {}", body.code, message);
        return Err(CostError::upstream(
            SERVICE,
            format!("code {}: {}", body.code, message),
        ));
    }

    let route = body.routes.first().ok_or_else(|| {
        error!("No route in OSRM response");
        CostError::upstream(SERVICE, "no route returned")
    })?;

    Ok(RoadLeg {
        distance_km: route.distance / 1000.0,
        duration_minutes: route.duration / 60.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_route_in_km_and_minutes() {
        let body = r#"{"code":"Ok","routes":[{"distance":12500.0,"duration":1800.0,"legs":[]},
                       {"distance":99999.0,"duration":1.0}],"waypoints":[]}"#;
        let leg = parse_route_response(body).unwrap();
        assert_eq!(leg.distance_km, 12.5);
        assert_eq!(leg.duration_minutes, 30.0);
    }

    #[test]
    fn non_ok_code_is_upstream_error() {
        let body = r#"{"code":"NoRoute","message":"Impossible route between points"}"#;
        let err = parse_route_response(body).unwrap_err();
        assert!(matches!(err, CostError::UpstreamUnavailable { service: "osrm", .. }));
    }

    #[test]
    fn empty_routes_and_garbage_are_upstream_errors() {
        assert!(parse_route_response(r#"{"code":"Ok","routes":[]}"#).is_err());
        assert!(parse_route_response("<html>502</html>").is_err());
    }

    #[test]
    fn multibyte_garbage_is_logged_without_panicking() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("error"))
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let err = parse_route_response(&"ข".repeat(100)).unwrap_err();
            assert!(matches!(err, CostError::UpstreamUnavailable { service: "osrm", .. }));
        });
    }

    #[test]
    fn public_server_user_agent_carries_contact_email() {
        let public = OsrmClient::new(DEFAULT_OSRM_BASE_URL, Some(" ops@example.co.th "));
        assert_eq!(
            public.user_agent.as_deref(),
            Some("route-cost/0.1 (ops@example.co.th)")
        );
        let anonymous = OsrmClient::new(DEFAULT_OSRM_BASE_URL, None);
        assert_eq!(
            anonymous.user_agent.as_deref(),
            Some("route-cost/0.1 (no-email-configured@example.com)")
        );
        let self_hosted = OsrmClient::new("http://localhost:5000", Some("ops@example.co.th"));
        assert_eq!(self_hosted.user_agent, None);
    }

    #[test]
    fn url_puts_longitude_first() {
        let client = OsrmClient::new("http://localhost:5000/", None);
        let from = Location::new("A", 13.5, 100.25).unwrap();
        let to = Location::new("B", 14.0, 101.0).unwrap();
        assert_eq!(
            client.route_url(&from, &to),
            "http://localhost:5000/route/v1/driving/100.25,13.5;101,14?overview=false"
        );
    }
}
