use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{check_status, require, EnrichError};

/// Google Places web-service client (autocomplete, find-place, details).
pub struct PlacesClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddressInfo {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessInfo {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    fn is(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }
}

/// Street/city/state/zip by component type tag.
pub fn address_from_components(components: &[AddressComponent]) -> AddressInfo {
    let mut number = "";
    let mut route = "";
    let mut info = AddressInfo::default();
    for c in components {
        if c.is("street_number") {
            number = &c.long_name;
        } else if c.is("route") {
            route = &c.long_name;
        } else if c.is("locality") {
            info.city = c.long_name.clone();
        } else if c.is("administrative_area_level_1") {
            info.state = c.short_name.clone();
        } else if c.is("postal_code") {
            info.zip = c.long_name.clone();
        }
    }
    info.street = format!("{number} {route}").trim().to_string();
    info
}

// ── Wire shapes ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ApiStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
}

impl ApiStatus {
    /// Places reports auth and quota failures with HTTP 200 and a status string.
    fn into_result(self) -> Result<(), EnrichError> {
        match (self.status.as_str(), self.error_message) {
            ("" | "OK" | "ZERO_RESULTS" | "NOT_FOUND", _) => Ok(()),
            (status, message) => {
                warn!(status, "places request rejected");
                Err(EnrichError::Upstream {
                    status: 200,
                    message: message.unwrap_or_else(|| status.to_string()),
                })
            }
        }
    }
}

#[derive(Deserialize)]
struct Prediction {
    place_id: String,
}

#[derive(Deserialize)]
struct AutocompleteResponse {
    #[serde(flatten)]
    status: ApiStatus,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Candidate {
    place_id: String,
}

#[derive(Deserialize)]
struct FindPlaceResponse {
    #[serde(flatten)]
    status: ApiStatus,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct PlaceDetails {
    #[serde(default)]
    name: String,
    #[serde(default)]
    formatted_address: String,
    #[serde(default)]
    formatted_phone_number: String,
    address_components: Option<Vec<AddressComponent>>,
}

#[derive(Deserialize)]
struct DetailsResponse {
    #[serde(flatten)]
    status: ApiStatus,
    result: Option<PlaceDetails>,
}

impl PlacesClient {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn key(&self) -> Result<&str, EnrichError> {
        if self.api_key.is_empty() {
            return Err(EnrichError::MissingCredential("Google Places API key"));
        }
        Ok(&self.api_key)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, EnrichError> {
        let response = check_status(self.http.get(url).send().await?, "places").await?;
        response
            .json()
            .await
            .map_err(|e| EnrichError::invalid_response(format!("places: {e}")))
    }

    async fn details(&self, place_id: &str, fields: &str) -> Result<Option<PlaceDetails>, EnrichError> {
        let details: DetailsResponse = self
            .get(format!(
                "{}/details/json?place_id={}&fields={}&key={}",
                self.base_url,
                urlencoding::encode(place_id),
                fields,
                urlencoding::encode(self.key()?)
            ))
            .await?;
        details.status.into_result()?;
        Ok(details.result)
    }

    /// Best autocomplete match for a free-form address, split into parts.
    pub async fn autocomplete_address(&self, address: &str) -> Result<AddressInfo, EnrichError> {
        let address = require(address, "Address is required")?;
        let key = self.key()?;

        let found: AutocompleteResponse = self
            .get(format!(
                "{}/autocomplete/json?input={}&types=address&key={}",
                self.base_url,
                urlencoding::encode(address),
                urlencoding::encode(key)
            ))
            .await?;
        found.status.into_result()?;
        let Some(best) = found.predictions.first() else {
            info!("no address predictions");
            return Err(EnrichError::not_found("Address not found"));
        };

        let components = self
            .details(&best.place_id, "address_components")
            .await?
            .and_then(|d| d.address_components)
            .ok_or_else(|| EnrichError::not_found("Could not fetch address details"))?;

        let info = address_from_components(&components);
        info!(city = %info.city, state = %info.state, "address resolved");
        Ok(info)
    }

    /// Name, address and phone of the best match for a business name.
    pub async fn business_info(&self, business_name: &str) -> Result<BusinessInfo, EnrichError> {
        let business_name = require(business_name, "Business name is required")?;
        let key = self.key()?;

        let found: FindPlaceResponse = self
            .get(format!(
                "{}/findplacefromtext/json?input={}&inputtype=textquery&fields=place_id,name,formatted_address&key={}",
                self.base_url,
                urlencoding::encode(business_name),
                urlencoding::encode(key)
            ))
            .await?;
        found.status.into_result()?;
        let Some(place) = found.candidates.first() else {
            info!("no business candidates");
            return Err(EnrichError::not_found("Business not found"));
        };

        let details = self
            .details(
                &place.place_id,
                "name,formatted_address,address_components,formatted_phone_number",
            )
            .await?
            .ok_or_else(|| EnrichError::not_found("Could not fetch business details"))?;

        let parts = address_from_components(details.address_components.as_deref().unwrap_or_default());
        let address = if parts.street.is_empty() {
            details
                .formatted_address
                .split(", ")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        } else {
            parts.street
        };

        info!(name = %details.name, "business resolved");
        Ok(BusinessInfo {
            name: details.name,
            address,
            city: parts.city,
            state: parts.state,
            zip: parts.zip,
            phone: details.formatted_phone_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(long: &str, short: &str, tag: &str) -> AddressComponent {
        AddressComponent {
            long_name: long.into(),
            short_name: short.into(),
            types: vec![tag.into(), "political".into()],
        }
    }

    #[test]
    fn components_are_picked_by_tag() {
        let info = address_from_components(&[
            component("1600", "1600", "street_number"),
            component("Amphitheatre Parkway", "Amphitheatre Pkwy", "route"),
            component("Mountain View", "Mountain View", "locality"),
            component("Santa Clara County", "Santa Clara County", "administrative_area_level_2"),
            component("California", "CA", "administrative_area_level_1"),
            component("94043", "94043", "postal_code"),
        ]);
        assert_eq!(
            info,
            AddressInfo {
                street: "1600 Amphitheatre Parkway".into(),
                city: "Mountain View".into(),
                state: "CA".into(),
                zip: "94043".into(),
            }
        );
    }

    #[test]
    fn street_without_number_has_no_leading_space() {
        let info = address_from_components(&[component("Main St", "Main St", "route")]);
        assert_eq!(info.street, "Main St");
    }

    #[test]
    fn places_status_ok_and_zero_results_pass() {
        for status in ["OK", "ZERO_RESULTS", ""] {
            let s = ApiStatus {
                status: status.into(),
                error_message: None,
            };
            assert!(s.into_result().is_ok());
        }
        let denied = ApiStatus {
            status: "REQUEST_DENIED".into(),
            error_message: Some("The provided API key is invalid.".into()),
        };
        assert!(matches!(
            denied.into_result(),
            Err(EnrichError::Upstream { message, .. }) if message == "The provided API key is invalid."
        ));
    }
}
