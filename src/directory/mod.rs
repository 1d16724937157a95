//! Fundraiser lookup against Supabase (PostgREST)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use url::Url;

use crate::core::config::SupabaseConfig;
use crate::core::models::FundraiserProfile;
use crate::errors::ServiceError;

const FUNDRAISER_SELECT: &str =
    "title,profiles!fundraisers_organizer_id_fkey(organization_name,etransfer_email)";

#[async_trait]
pub trait FundraiserDirectory: Send + Sync {
    /// Looks up the fundraiser and its organizer. `authorization` is the
    /// inbound request's `Authorization` header, forwarded so row-level
    /// security applies to the caller.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] when the fundraiser does not exist or the
    /// lookup fails.
    async fn lookup(
        &self,
        fundraiser_id: &str,
        authorization: Option<&str>,
    ) -> Result<FundraiserProfile, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct Organizer {
    organization_name: Option<String>,
    etransfer_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrganizerRef {
    One(Organizer),
    Many(Vec<Organizer>),
}

#[derive(Debug, Deserialize)]
struct FundraiserRow {
    title: Option<String>,
    profiles: Option<OrganizerRef>,
}

impl From<FundraiserRow> for FundraiserProfile {
    fn from(row: FundraiserRow) -> Self {
        let organizer = match row.profiles {
            Some(OrganizerRef::One(o)) => Some(o),
            Some(OrganizerRef::Many(many)) => many.into_iter().next(),
            None => None,
        };
        let (organization_name, etransfer_email) = organizer
            .map(|o| (o.organization_name, o.etransfer_email))
            .unwrap_or_default();

        FundraiserProfile {
            title: row.title,
            organization_name,
            etransfer_email,
        }
    }
}

pub struct SupabaseDirectory {
    http: Client,
    endpoint: Url,
    anon_key: String,
}

impl SupabaseDirectory {
    /// # Errors
    ///
    /// Returns [`ServiceError::HttpError`] if the REST endpoint URL cannot be built.
    pub fn new(http: Client, config: &SupabaseConfig) -> Result<Self, ServiceError> {
        let endpoint = config
            .url
            .join("rest/v1/fundraisers")
            .map_err(|e| ServiceError::HttpError(format!("Invalid Supabase URL: {e}")))?;
        Ok(Self {
            http,
            endpoint,
            anon_key: config.anon_key.clone(),
        })
    }

    fn not_found(details: Value) -> ServiceError {
        ServiceError::NotFound { details }
    }
}

#[async_trait]
impl FundraiserDirectory for SupabaseDirectory {
    async fn lookup(
        &self,
        fundraiser_id: &str,
        authorization: Option<&str>,
    ) -> Result<FundraiserProfile, ServiceError> {
        info!(fundraiser_id, "Fetching fundraiser data");

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", FUNDRAISER_SELECT)
            .append_pair("id", &format!("eq.{fundraiser_id}"));

        let bearer = format!("Bearer {}", self.anon_key);
        let response = self
            .http
            .get(url)
            .header("apikey", &self.anon_key)
            .header("Authorization", authorization.unwrap_or(bearer.as_str()))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Fundraiser fetch failed");
                Self::not_found(json!({ "message": e.to_string() }))
            })?;

        let status = response.status();
        let raw = response.text().await.map_err(|e| {
            error!(error = %e, "Fundraiser response unreadable");
            Self::not_found(json!({ "message": e.to_string() }))
        })?;

        if !status.is_success() {
            let details =
                serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| json!({ "message": raw }));
            error!(status = status.as_u16(), details = %details, "Fundraiser fetch error");
            return Err(Self::not_found(details));
        }

        let rows: Vec<FundraiserRow> = serde_json::from_str(&raw).map_err(|e| {
            error!(error = %e, "Fundraiser response malformed");
            Self::not_found(json!({ "message": e.to_string() }))
        })?;

        let Some(row) = rows.into_iter().next() else {
            error!(fundraiser_id, "Fundraiser not found");
            return Err(Self::not_found(json!({
                "message": format!("No fundraiser with id {fundraiser_id}")
            })));
        };

        let profile = FundraiserProfile::from(row);
        info!(
            title = profile.title(),
            organization = profile.organization_name(),
            "Fundraiser data retrieved"
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_accepts_embedded_object_or_array() {
        let one: FundraiserRow = serde_json::from_value(json!({
            "title": "Spring Darts",
            "profiles": { "organization_name": "AADS", "etransfer_email": "pay@aads.ca" }
        }))
        .unwrap();
        let profile = FundraiserProfile::from(one);
        assert_eq!(profile.organization_name(), "AADS");
        assert_eq!(profile.etransfer_email(), "pay@aads.ca");

        let many: FundraiserRow = serde_json::from_value(json!({
            "title": null,
            "profiles": [{ "organization_name": null, "etransfer_email": "x@y.z" }]
        }))
        .unwrap();
        let profile = FundraiserProfile::from(many);
        assert_eq!(profile.title(), "Fundraiser");
        assert_eq!(profile.organization_name(), "Fundraiser Organizer");
        assert_eq!(profile.admin_email(), "x@y.z");
    }

    #[test]
    fn missing_organizer_uses_defaults() {
        let row: FundraiserRow = serde_json::from_value(json!({ "title": "Raffle" })).unwrap();
        let profile = FundraiserProfile::from(row);
        assert_eq!(profile.etransfer_email(), "payments@example.com");
        assert_eq!(profile.admin_email(), "admin@example.com");
    }
}
