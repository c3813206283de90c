use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, ValueObject};

/// Shipping (or billing) address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            line2: None,
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
            country: country.into(),
        }
    }

    /// Names of required fields that are blank, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn validate(&self) -> DomainResult<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "shipping address is missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

impl ValueObject for Address {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_address_is_valid() {
        let address = Address::new("1 Main St", "Springfield", "IL", "62701", "US");
        assert!(address.validate().is_ok());
    }

    #[test]
    fn blank_fields_are_reported_by_wire_name() {
        let address = Address::new("1 Main St", " ", "IL", "", "US");
        assert_eq!(address.missing_fields(), vec!["city", "zipCode"]);

        match address.validate().unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.ends_with("city, zipCode")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn missing_json_fields_deserialize_as_blank() {
        let address: Address = serde_json::from_str(r#"{"street": "1 Main St"}"#).unwrap();
        assert_eq!(
            address.missing_fields(),
            vec!["city", "state", "zipCode", "country"]
        );
    }
}
