//! ProviderRegistry - the set of adapters that could be constructed at startup.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::did::DIdClient;
use super::error::AvatarError;
use super::heygen::HeyGenClient;
use super::provider::{AvatarProvider, ProviderId};
use crate::config::Config;

/// Live adapters keyed by provider, plus the reasons the others are missing.
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: BTreeMap<ProviderId, Arc<dyn AvatarProvider>>,
    unavailable: BTreeMap<ProviderId, String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct every known adapter from config and process environment.
    ///
    /// A provider whose construction fails is recorded as unavailable and
    /// left out; that never fails the registry as a whole.
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with(config, |name| std::env::var(name).ok())
    }

    /// Like [`ProviderRegistry::from_config`] with a custom credential lookup.
    pub fn from_config_with<F>(config: &Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let http = config.http.settings();
        let mut registry = Self::new();

        for id in ProviderId::DEFAULT_ORDER {
            let api_key = lookup(id.credential_env()).unwrap_or_default();
            let built: Result<Arc<dyn AvatarProvider>, AvatarError> = match id {
                ProviderId::DId => DIdClient::from_config(api_key, &config.did, &http)
                    .map(|c| Arc::new(c) as Arc<dyn AvatarProvider>),
                ProviderId::HeyGen => HeyGenClient::from_config(api_key, &config.heygen, &http)
                    .map(|c| Arc::new(c) as Arc<dyn AvatarProvider>),
            };

            match built {
                Ok(adapter) => {
                    log::info!("{} provider configured", id);
                    registry.insert(adapter);
                }
                Err(e) => {
                    log::warn!("{} provider unavailable: {}", id, e);
                    registry.unavailable.insert(id, e.to_string());
                }
            }
        }

        registry
    }

    /// Register an adapter, replacing any previous one for the same provider.
    pub fn insert(&mut self, adapter: Arc<dyn AvatarProvider>) {
        let id = adapter.id();
        self.unavailable.remove(&id);
        self.adapters.insert(id, adapter);
    }

    pub fn with(mut self, adapter: Arc<dyn AvatarProvider>) -> Self {
        self.insert(adapter);
        self
    }

    pub fn get(&self, id: ProviderId) -> Option<&Arc<dyn AvatarProvider>> {
        self.adapters.get(&id)
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.adapters.contains_key(&id)
    }

    /// Configured providers, in `ProviderId` order.
    pub fn ids(&self) -> Vec<ProviderId> {
        self.adapters.keys().copied().collect()
    }

    /// Providers that could not be constructed, with the reason.
    pub fn unavailable(&self) -> impl Iterator<Item = (ProviderId, &str)> {
        self.unavailable.iter().map(|(id, reason)| (*id, reason.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_no_credentials_yields_empty_registry() {
        let registry = ProviderRegistry::from_config_with(&Config::default(), lookup(&[]));
        assert!(registry.is_empty());
        let missing: Vec<_> = registry.unavailable().map(|(id, _)| id).collect();
        assert_eq!(missing, vec![ProviderId::DId, ProviderId::HeyGen]);
    }

    #[test]
    fn test_only_configured_providers_are_live() {
        let registry = ProviderRegistry::from_config_with(
            &Config::default(),
            lookup(&[("HEYGEN_API_KEY", "hg-key")]),
        );
        assert_eq!(registry.ids(), vec![ProviderId::HeyGen]);
        assert!(!registry.contains(ProviderId::DId));

        let (id, reason) = registry.unavailable().next().unwrap();
        assert_eq!(id, ProviderId::DId);
        assert!(reason.contains("DID_API_KEY"));
    }

    #[test]
    fn test_empty_credential_counts_as_missing() {
        let registry = ProviderRegistry::from_config_with(
            &Config::default(),
            lookup(&[("DID_API_KEY", ""), ("HEYGEN_API_KEY", "hg-key")]),
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.get(ProviderId::DId).is_none());
    }

    #[test]
    fn test_all_credentials_present() {
        let registry = ProviderRegistry::from_config_with(
            &Config::default(),
            lookup(&[("DID_API_KEY", "did-key"), ("HEYGEN_API_KEY", "hg-key")]),
        );
        assert_eq!(registry.ids(), vec![ProviderId::DId, ProviderId::HeyGen]);
        assert_eq!(registry.unavailable().count(), 0);
    }

    #[test]
    fn test_insert_clears_unavailable_entry() {
        let mut registry = ProviderRegistry::from_config_with(&Config::default(), lookup(&[]));
        registry.insert(Arc::new(DIdClient::with_api_key("k".to_string()).unwrap()));
        assert!(registry.contains(ProviderId::DId));
        assert!(registry.unavailable().all(|(id, _)| id != ProviderId::DId));
    }
}
