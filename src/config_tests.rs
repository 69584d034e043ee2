// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `config.rs`

#[cfg(test)]
mod tests {
    use crate::config::CloudConfig;
    use crate::constants::*;
    use crate::errors::ConfigError;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        (ENV_SUBSCRIPTION_ID, "00000000-0000-0000-0000-000000000001"),
        (ENV_RESOURCE_GROUP, "cluster-rg"),
        (ENV_LOCATION, "westeurope"),
    ];

    #[test]
    fn test_required_vars_only() {
        let config = CloudConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.subscription_id, "00000000-0000-0000-0000-000000000001");
        assert_eq!(config.resource_group, "cluster-rg");
        assert_eq!(config.region, "westeurope");
        assert_eq!(config.endpoint, DEFAULT_ARM_ENDPOINT);
        assert_eq!(config.cluster_name, None);
        assert_eq!(
            config.poll_interval(),
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MILLIS)
        );
    }

    #[test]
    fn test_missing_subscription() {
        let vars = [(ENV_RESOURCE_GROUP, "rg"), (ENV_LOCATION, "westeurope")];
        let err = CloudConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(ENV_SUBSCRIPTION_ID));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let vars = [
            (ENV_SUBSCRIPTION_ID, "sub"),
            (ENV_RESOURCE_GROUP, "   "),
            (ENV_LOCATION, "westeurope"),
        ];
        let err = CloudConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(ENV_RESOURCE_GROUP));
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push((ENV_ARM_ENDPOINT, "http://127.0.0.1:9000"));
        vars.push((ENV_CLUSTER_NAME, "dev.k8s.local"));
        vars.push((ENV_POLL_INTERVAL_MS, "10"));

        let config = CloudConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.endpoint, "http://127.0.0.1:9000");
        assert_eq!(config.cluster_name.as_deref(), Some("dev.k8s.local"));
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
        assert_eq!(
            config
                .cluster_tags()
                .get(TAG_KUBERNETES_CLUSTER)
                .map(String::as_str),
            Some("dev.k8s.local")
        );
    }

    #[test]
    fn test_invalid_poll_interval() {
        let mut vars = REQUIRED.to_vec();
        vars.push((ENV_POLL_INTERVAL_MS, "soon"));

        let err = CloudConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                name: ENV_POLL_INTERVAL_MS,
                ..
            }
        ));
    }

    #[test]
    fn test_extra_tags_become_cluster_tags() {
        let mut vars = REQUIRED.to_vec();
        vars.push((ENV_CLUSTER_NAME, "dev.example.com"));
        vars.push((ENV_EXTRA_TAGS, "team=platform, cost-center = 42,,url=a=b"));

        let config = CloudConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.extra_tags.len(), 3);
        assert_eq!(config.extra_tags.get("team").map(String::as_str), Some("platform"));
        assert_eq!(config.extra_tags.get("cost-center").map(String::as_str), Some("42"));
        assert_eq!(config.extra_tags.get("url").map(String::as_str), Some("a=b"));
        let tags = config.cluster_tags();
        assert_eq!(
            tags.get(TAG_KUBERNETES_CLUSTER).map(String::as_str),
            Some("dev.example.com")
        );
        assert_eq!(tags.get("team").map(String::as_str), Some("platform"));
    }

    #[test]
    fn test_invalid_extra_tag() {
        let mut vars = REQUIRED.to_vec();
        vars.push((ENV_EXTRA_TAGS, "team=platform,orphan"));

        let err = CloudConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                name: ENV_EXTRA_TAGS,
                ..
            }
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let yaml = "subscriptionId: sub\nresourceGroup: rg\nregion: eastus\n";
        let config: CloudConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config, CloudConfig::new("sub", "rg", "eastus"));
    }
}
