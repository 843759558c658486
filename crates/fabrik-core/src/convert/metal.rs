// Metal v1 resource kinds.

use super::{AttributeMapping, put_timestamp, timestamp};
use crate::attrs::AttributeBag;
use crate::error::CoreError;
use crate::model::{Address, Organization};

impl AttributeMapping for Address {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            address: bag.string("address")?,
            city: bag.string("city")?,
            state: bag.string("state")?,
            country: bag.string("country")?,
            zip_code: bag.string("zip_code")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("address", self.address.as_ref())
            .put("city", self.city.as_ref())
            .put("state", self.state.as_ref())
            .put("country", self.country.as_ref())
            .put("zip_code", self.zip_code.as_ref());
        bag
    }
}

impl AttributeMapping for Organization {
    fn to_remote(bag: &AttributeBag) -> Result<Self, CoreError> {
        Ok(Self {
            id: bag.string("id")?,
            name: bag.string("name")?,
            description: bag.string("description")?,
            website: bag.string("website")?,
            twitter: bag.string("twitter")?,
            logo: bag.string("logo")?,
            address: bag.mapped("address")?,
            created_at: timestamp(bag, "created")?,
            updated_at: timestamp(bag, "updated")?,
        })
    }

    fn to_local(&self) -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.put("id", self.id.as_ref())
            .put("name", self.name.as_ref())
            .put("description", self.description.as_ref())
            .put("website", self.website.as_ref())
            .put("twitter", self.twitter.as_ref())
            .put("logo", self.logo.as_ref())
            .put_block("address", self.address.as_ref());
        put_timestamp(&mut bag, "created", self.created_at.as_ref());
        put_timestamp(&mut bag, "updated", self.updated_at.as_ref());
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn organization_round_trip() {
        let bag = AttributeBag::new()
            .with("name", "acme")
            .with("website", "https://acme.example")
            .with(
                "address",
                AttributeBag::new()
                    .with("address", "1 Main St")
                    .with("city", "Springfield")
                    .with("country", "US")
                    .with("zip_code", "12345"),
            )
            .with("created", "2023-11-30T08:00:00Z");
        let org = Organization::to_remote(&bag).unwrap();
        assert_eq!(org.to_local(), bag);
    }

    #[test]
    fn organization_wire_form_is_snake_case() {
        let org = Organization {
            name: Some("acme".into()),
            address: Some(Address {
                zip_code: Some("12345".into()),
                ..Address::default()
            }),
            ..Organization::default()
        };
        assert_eq!(
            serde_json::to_value(&org).unwrap(),
            serde_json::json!({ "name": "acme", "address": { "zip_code": "12345" } })
        );
    }
}
