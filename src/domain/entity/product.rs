use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Natural identity of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub produce_date: DateTime<Utc>,
    pub manufacture_email: String,
}

impl ProductKey {
    pub fn new(produce_date: DateTime<Utc>, manufacture_email: String) -> Self {
        Self {
            produce_date,
            manufacture_email,
        }
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}",
            self.manufacture_email,
            self.produce_date.to_rfc3339()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    key: ProductKey,
    name: String,
    manufacture_phone: Option<String>,
    is_available: bool,
}

impl Product {
    pub fn new(
        key: ProductKey,
        name: String,
        manufacture_phone: Option<String>,
        is_available: bool,
    ) -> Self {
        Self {
            key,
            name,
            manufacture_phone,
            is_available,
        }
    }

    pub fn key(&self) -> &ProductKey {
        &self.key
    }

    pub fn produce_date(&self) -> DateTime<Utc> {
        self.key.produce_date
    }

    pub fn manufacture_email(&self) -> &String {
        &self.key.manufacture_email
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn manufacture_phone(&self) -> &Option<String> {
        &self.manufacture_phone
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    /// Applies the mutable fields, leaving key and phone untouched.
    pub fn with_update(mut self, update: &ProductUpdate) -> Self {
        self.name = update.name.clone();
        self.is_available = update.is_available;
        self
    }
}

/// Fields a product owner may change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub is_available: bool,
}

/// Conjunction of equality predicates; an empty filter matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub manufacture_email: Option<String>,
    pub is_available: Option<bool>,
}

impl ProductFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_manufacture_email(email: impl Into<String>) -> Self {
        Self {
            manufacture_email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.manufacture_email.is_none() && self.is_available.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.name.as_ref().map_or(true, |name| name == product.name())
            && self
                .manufacture_email
                .as_ref()
                .map_or(true, |email| email == product.manufacture_email())
            && self
                .is_available
                .map_or(true, |available| available == product.is_available())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn book() -> Product {
        Product::new(
            ProductKey::new(
                Utc.with_ymd_and_hms(2022, 10, 1, 12, 0, 0).unwrap(),
                "user@example.com".into(),
            ),
            "Book no.1".into(),
            Some("09001234567".into()),
            true,
        )
    }

    #[test]
    fn update_keeps_key_and_phone() {
        let original = book();
        let updated = original.clone().with_update(&ProductUpdate {
            name: "Book no.1 v2".into(),
            is_available: false,
        });

        assert_eq!(updated.key(), original.key());
        assert_eq!(updated.manufacture_phone(), original.manufacture_phone());
        assert_eq!(updated.name(), "Book no.1 v2");
        assert!(!updated.is_available());
    }

    #[test]
    fn filter_is_a_conjunction() {
        let product = book();

        assert!(ProductFilter::default().matches(&product));
        assert!(ProductFilter::by_name("Book no.1").matches(&product));
        assert!(!ProductFilter::by_name("Book no.2").matches(&product));

        let filter = ProductFilter {
            manufacture_email: Some("user@example.com".into()),
            is_available: Some(false),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product));
    }
}
