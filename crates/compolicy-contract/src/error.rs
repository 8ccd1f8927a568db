use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Endpoint set must contain at least one URL")]
    EmptyEndpointSet,

    #[error("Invalid endpoint URL {url}: {details}")]
    InvalidUrl { url: String, details: String },

    #[error("Endpoint URL must be absolute http(s): {url}")]
    UnsupportedScheme { url: String },
}

impl ContractError {
    pub fn invalid_url(url: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            details: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContractError;

    #[test]
    fn invalid_url_display_includes_url_and_details() {
        let error = ContractError::invalid_url("not a url", "relative URL without a base");

        assert_eq!(
            error.to_string(),
            "Invalid endpoint URL not a url: relative URL without a base"
        );
    }

    #[test]
    fn empty_set_display_is_stable() {
        assert_eq!(
            ContractError::EmptyEndpointSet.to_string(),
            "Endpoint set must contain at least one URL"
        );
    }
}
