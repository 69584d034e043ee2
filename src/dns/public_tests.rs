// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `public.rs`

#[cfg(test)]
mod tests {
    use crate::arm::credential::StaticTokenCredential;
    use crate::arm::ArmClient;
    use crate::config::CloudConfig;
    use crate::dns::backend::DnsBackend;
    use crate::dns::public::PublicDnsBackend;
    use crate::dns::{ResourceRecordSet, RrsType, ZoneInfo, ZoneKind};
    use crate::errors::BackendError;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ZONES: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/dnsZones";

    fn backend(server: &MockServer) -> PublicDnsBackend {
        let mut config = CloudConfig::new("sub", "rg", "westeurope");
        config.endpoint = server.uri();
        config.poll_interval_ms = 1;
        let arm = ArmClient::new(&config, Arc::new(StaticTokenCredential::new("t"))).unwrap();
        PublicDnsBackend::new(arm)
    }

    #[tokio::test]
    async fn test_create_or_update_wire_shape() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(format!("{ZONES}/example.com/A/www")))
            .and(query_param("api-version", "2018-05-01"))
            .and(body_json(json!({
                "properties": {
                    "TTL": 300,
                    "ARecords": [{"ipv4Address": "1.2.3.4"}, {"ipv4Address": "5.6.7.8"}]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "www"})))
            .expect(1)
            .mount(&server)
            .await;

        let rrset = ResourceRecordSet::new(
            "www.example.com",
            vec!["1.2.3.4".to_string(), "5.6.7.8".to_string()],
            300,
            RrsType::A,
        );
        backend(&server)
            .create_or_update("rg", "example.com", "www", &RrsType::A, &rrset)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_translates_to_uniform_record_sets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{ZONES}/example.com/recordsets")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [
                    {
                        "name": "www",
                        "type": "Microsoft.Network/dnszones/A",
                        "properties": {
                            "TTL": 60,
                            "fqdn": "www.example.com.",
                            "ARecords": [{"ipv4Address": "10.0.0.1"}]
                        }
                    },
                    {
                        "name": "@",
                        "type": "Microsoft.Network/dnszones/NS",
                        "properties": {"TTL": 172800}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let records = backend(&server).list("rg", "example.com").await.unwrap();

        assert_eq!(
            records,
            vec![
                ResourceRecordSet::new("www.example.com", vec!["10.0.0.1".to_string()], 60, RrsType::A),
                ResourceRecordSet::new("example.com", vec![], 172_800, RrsType::Ns),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_record_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{ZONES}/example.com/A/ghost")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let err = backend(&server)
            .delete("rg", "example.com", "ghost", &RrsType::A)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            BackendError::NotFound {
                operation: "DeleteRecordSet",
                resource: "example.com/A/ghost".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_create_zone_is_global() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(format!("{ZONES}/example.com")))
            .and(body_json(json!({
                "location": "global",
                "tags": {"KubernetesCluster": "c1"},
                "properties": {"zoneType": "Public"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": format!("{ZONES}/example.com"),
                "name": "example.com",
                "location": "global",
                "tags": {"KubernetesCluster": "c1"},
                "properties": {"nameServers": ["ns1-01.azure-dns.com."]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut zone = ZoneInfo::new("example.com", ZoneKind::Public);
        zone.tags.insert("KubernetesCluster".to_string(), "c1".to_string());
        let created = backend(&server)
            .create_or_update_zone("rg", &zone)
            .await
            .unwrap();

        assert_eq!(created.id.as_deref(), Some(format!("{ZONES}/example.com").as_str()));
        assert_eq!(created.kind, ZoneKind::Public);
    }
}
