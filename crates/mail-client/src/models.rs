use serde::Deserialize;

/// Hydra-style collection wrapper used by the provider's list endpoints.
#[derive(Debug, Deserialize)]
pub struct HydraCollection<T> {
    #[serde(rename = "hydra:member", default = "Vec::new")]
    pub member: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderDomain {
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct ProviderAccount {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
