//! Persisted shop configuration.
//!
//! Settings are stored as strings in a [`KeyValueStore`] under namespaced keys
//! (`"{namespace}.{key}"`) and parsed into a typed [`Configuration`] on load.

use std::{
    collections::HashMap,
    str::FromStr,
    sync::{PoisonError, RwLock},
};

use bon::Builder;
use shop_core::{card_process::MerchantDetails, types::CustomerId};
use url::Url;

/// String key-value storage the configuration is persisted in.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

/// Keys of the persisted settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistenceKey {
    IsTestMode,
    ShouldHideCardTokenizationOption,
    CustomerId,
    UserPhoneNumber,
    TestMerchantId,
    TestBaseUrl,
    MerchantId,
    BaseUrl,
    ExcludeDankortAndMastercard,
    DisableCoBrandedDankortCard,
}

impl PersistenceKey {
    pub const ALL: [PersistenceKey; 10] = [
        PersistenceKey::IsTestMode,
        PersistenceKey::ShouldHideCardTokenizationOption,
        PersistenceKey::CustomerId,
        PersistenceKey::UserPhoneNumber,
        PersistenceKey::TestMerchantId,
        PersistenceKey::TestBaseUrl,
        PersistenceKey::MerchantId,
        PersistenceKey::BaseUrl,
        PersistenceKey::ExcludeDankortAndMastercard,
        PersistenceKey::DisableCoBrandedDankortCard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceKey::IsTestMode => "isTestMode",
            PersistenceKey::ShouldHideCardTokenizationOption => "shouldHideCardTokenizationOption",
            PersistenceKey::CustomerId => "customerID",
            PersistenceKey::UserPhoneNumber => "userPhoneNumber",
            PersistenceKey::TestMerchantId => "testMerchantID",
            PersistenceKey::TestBaseUrl => "testBaseURL",
            PersistenceKey::MerchantId => "merchantID",
            PersistenceKey::BaseUrl => "baseURL",
            PersistenceKey::ExcludeDankortAndMastercard => "excludeDankortAndMastercard",
            PersistenceKey::DisableCoBrandedDankortCard => "disableCoBrandedDankortCard",
        }
    }

    /// Storage key under `namespace`.
    pub fn namespaced(&self, namespace: &str) -> String {
        format!("{namespace}.{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid customer ID '{value}': {source}")]
    InvalidCustomerId {
        value: String,
        source: std::num::ParseIntError,
    },
    #[error("Invalid base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
}

/// Merchant backend settings of one environment.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    #[builder(into)]
    pub merchant_id: String,
    #[builder(into)]
    pub base_url: String,
}

impl Environment {
    pub fn test() -> Self {
        Environment {
            merchant_id: "12002835".to_string(),
            base_url: "https://merchant.example.com/test/".to_string(),
        }
    }

    pub fn prod() -> Self {
        Environment {
            merchant_id: "733255".to_string(),
            base_url: "https://merchant.example.com/".to_string(),
        }
    }
}

/// Shop configuration.
///
/// The test and production environments are kept side by side;
/// [`is_test_mode`](Configuration::is_test_mode) picks the active one.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    #[builder(default = true)]
    pub is_test_mode: bool,
    /// Hides the option to store the card for later use.
    #[builder(default = true)]
    pub should_hide_card_tokenization_option: bool,
    #[builder(into, default = "000013".to_string())]
    pub customer_id: String,
    #[builder(into, default)]
    pub user_phone_number: String,
    #[builder(default = Environment::test())]
    pub test: Environment,
    #[builder(default = Environment::prod())]
    pub prod: Environment,
    /// Card scheme restrictions forwarded to the card payment SDK.
    #[builder(default)]
    pub exclude_dankort_and_mastercard: bool,
    #[builder(default)]
    pub disable_co_branded_dankort_card: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::builder().build()
    }
}

impl Configuration {
    /// Load from `store`, falling back to the default of every missing or unreadable setting.
    pub fn load(store: &impl KeyValueStore, namespace: &str) -> Self {
        let defaults = Configuration::default();
        let get = |key: PersistenceKey| store.get(&key.namespaced(namespace));

        Configuration {
            is_test_mode: parse_or(
                PersistenceKey::IsTestMode,
                get(PersistenceKey::IsTestMode),
                defaults.is_test_mode,
            ),
            should_hide_card_tokenization_option: parse_or(
                PersistenceKey::ShouldHideCardTokenizationOption,
                get(PersistenceKey::ShouldHideCardTokenizationOption),
                defaults.should_hide_card_tokenization_option,
            ),
            customer_id: get(PersistenceKey::CustomerId).unwrap_or(defaults.customer_id),
            user_phone_number: get(PersistenceKey::UserPhoneNumber)
                .unwrap_or(defaults.user_phone_number),
            test: Environment {
                merchant_id: get(PersistenceKey::TestMerchantId)
                    .unwrap_or(defaults.test.merchant_id),
                base_url: get(PersistenceKey::TestBaseUrl).unwrap_or(defaults.test.base_url),
            },
            prod: Environment {
                merchant_id: get(PersistenceKey::MerchantId).unwrap_or(defaults.prod.merchant_id),
                base_url: get(PersistenceKey::BaseUrl).unwrap_or(defaults.prod.base_url),
            },
            exclude_dankort_and_mastercard: parse_or(
                PersistenceKey::ExcludeDankortAndMastercard,
                get(PersistenceKey::ExcludeDankortAndMastercard),
                defaults.exclude_dankort_and_mastercard,
            ),
            disable_co_branded_dankort_card: parse_or(
                PersistenceKey::DisableCoBrandedDankortCard,
                get(PersistenceKey::DisableCoBrandedDankortCard),
                defaults.disable_co_branded_dankort_card,
            ),
        }
    }

    /// Write every setting to `store`.
    pub fn save(&self, store: &impl KeyValueStore, namespace: &str) {
        let entries = [
            (PersistenceKey::IsTestMode, self.is_test_mode.to_string()),
            (
                PersistenceKey::ShouldHideCardTokenizationOption,
                self.should_hide_card_tokenization_option.to_string(),
            ),
            (PersistenceKey::CustomerId, self.customer_id.clone()),
            (PersistenceKey::UserPhoneNumber, self.user_phone_number.clone()),
            (PersistenceKey::TestMerchantId, self.test.merchant_id.clone()),
            (PersistenceKey::TestBaseUrl, self.test.base_url.clone()),
            (PersistenceKey::MerchantId, self.prod.merchant_id.clone()),
            (PersistenceKey::BaseUrl, self.prod.base_url.clone()),
            (
                PersistenceKey::ExcludeDankortAndMastercard,
                self.exclude_dankort_and_mastercard.to_string(),
            ),
            (
                PersistenceKey::DisableCoBrandedDankortCard,
                self.disable_co_branded_dankort_card.to_string(),
            ),
        ];

        for (key, value) in entries {
            store.set(&key.namespaced(namespace), value);
        }
    }

    /// Settings of the active environment.
    pub fn environment(&self) -> &Environment {
        if self.is_test_mode {
            &self.test
        } else {
            &self.prod
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.environment().merchant_id
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let value = &self.environment().base_url;
        Url::parse(value).map_err(|source| ConfigError::InvalidBaseUrl {
            value: value.clone(),
            source,
        })
    }

    pub fn customer_id(&self) -> Result<CustomerId, ConfigError> {
        self.customer_id
            .parse()
            .map_err(|source| ConfigError::InvalidCustomerId {
                value: self.customer_id.clone(),
                source,
            })
    }

    pub fn merchant_details(&self) -> MerchantDetails {
        MerchantDetails {
            merchant_id: self.merchant_id().to_string(),
            is_prod: !self.is_test_mode,
        }
    }
}

fn parse_or<T: FromStr>(key: PersistenceKey, value: Option<String>, default: T) -> T {
    let Some(value) = value else {
        return default;
    };

    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Ignoring unreadable setting '{}': '{}'",
                key.as_str(),
                value
            );
            #[cfg(not(feature = "tracing"))]
            let _ = key;

            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMESPACE: &str = "com.example.shop";

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert!(config.is_test_mode);
        assert!(config.should_hide_card_tokenization_option);
        assert_eq!(config.customer_id().unwrap(), CustomerId(13));
        assert_eq!(config.merchant_id(), "12002835");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://merchant.example.com/test/"
        );
        assert_eq!(
            config.merchant_details(),
            MerchantDetails {
                merchant_id: "12002835".to_string(),
                is_prod: false,
            }
        );
    }

    #[test]
    fn test_load_from_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(
            Configuration::load(&store, NAMESPACE),
            Configuration::default()
        );
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let config = Configuration::builder()
            .is_test_mode(false)
            .customer_id("42")
            .user_phone_number("+4512345678")
            .prod(
                Environment::builder()
                    .merchant_id("M-1")
                    .base_url("https://shop.example.org/api/")
                    .build(),
            )
            .exclude_dankort_and_mastercard(true)
            .build();

        config.save(&store, NAMESPACE);
        assert_eq!(store.len(), PersistenceKey::ALL.len());
        assert_eq!(
            store.get("com.example.shop.merchantID").as_deref(),
            Some("M-1")
        );

        let loaded = Configuration::load(&store, NAMESPACE);
        assert_eq!(loaded, config);
        assert_eq!(loaded.merchant_id(), "M-1");
        assert!(loaded.merchant_details().is_prod);
        assert_eq!(loaded.customer_id().unwrap().to_string(), "000042");
    }

    #[test]
    fn test_unreadable_values_fall_back() {
        let store = MemoryStore::new();
        store.set("com.example.shop.isTestMode", "yes".to_string());
        store.set(
            "com.example.shop.disableCoBrandedDankortCard",
            "true".to_string(),
        );

        let config = Configuration::load(&store, NAMESPACE);
        assert!(config.is_test_mode);
        assert!(config.disable_co_branded_dankort_card);
    }

    #[test]
    fn test_namespaces_are_separate() {
        let store = MemoryStore::new();
        Configuration::builder()
            .customer_id("7")
            .build()
            .save(&store, "a");

        assert_eq!(Configuration::load(&store, "a").customer_id, "7");
        assert_eq!(Configuration::load(&store, "b").customer_id, "000013");
    }

    #[test]
    fn test_invalid_values() {
        let config = Configuration::builder()
            .customer_id("abc")
            .test(
                Environment::builder()
                    .merchant_id("1")
                    .base_url("not a url")
                    .build(),
            )
            .build();

        assert!(matches!(
            config.customer_id(),
            Err(ConfigError::InvalidCustomerId { .. })
        ));
        assert!(matches!(
            config.base_url(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
