// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `manifest.rs`

#[cfg(test)]
mod tests {
    use crate::errors::{ManifestError, ReconcileError};
    use crate::manifest::{reconcile_manifest, Manifest, ReportEntry};
    use crate::reconcilers::{Outcome, RuleProtocol};
    use crate::testing::FakeCloud;
    use std::io::Write;

    const MANIFEST: &str = r#"
dnsZones:
  - name: example.com
  - name: internal.example.com
    private: true
    virtualNetworkName: cluster-vnet
recordSets:
  - name: api.example.com
    dnsZone: example.com
    ttl: 60
    addresses: ["10.0.0.4"]
applicationSecurityGroups:
  - name: masters
networkSecurityGroups:
  - name: masters-nsg
    tags:
      role: master
securityGroupRules:
  - networkSecurityGroup: masters-nsg
    name: kube-api
    priority: 100
    protocol: Tcp
    access: Allow
    egress: false
    destinationPortRange: "6443"
    destinationApplicationSecurityGroups: [masters]
"#;

    #[test]
    fn test_parse_all_kinds() {
        let manifest = Manifest::from_yaml(MANIFEST).unwrap();

        assert_eq!(manifest.len(), 6);
        assert_eq!(manifest.dns_zones[1].private, Some(true));
        assert_eq!(
            manifest.dns_zones[1].virtual_network_name.as_deref(),
            Some("cluster-vnet")
        );
        assert_eq!(manifest.record_sets[0].dns_zone, "example.com");
        assert_eq!(manifest.record_sets[0].ttl, Some(60));
        assert_eq!(
            manifest.security_group_rules[0].rule.protocol,
            Some(RuleProtocol::Tcp)
        );
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::from_yaml("{}").unwrap();

        assert!(manifest.is_empty());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = Manifest::from_yaml("loadBalancers: []\n").unwrap_err();

        assert!(matches!(err, ManifestError::Parse { ref path, .. } if path == "<inline>"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let manifest = Manifest::load(file.path()).await.unwrap();

        assert_eq!(manifest, Manifest::from_yaml(MANIFEST).unwrap());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = Manifest::load(&path).await.unwrap_err();

        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[tokio::test]
    async fn test_reconcile_in_dependency_order() {
        let cloud = FakeCloud::new();
        let mut manifest = Manifest::from_yaml(MANIFEST).unwrap();

        let report = reconcile_manifest(&cloud, &mut manifest, false).await.unwrap();

        let kinds: Vec<_> = report.entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                "DNSZone",
                "DNSZone",
                "RecordSet",
                "ApplicationSecurityGroup",
                "NetworkSecurityGroup",
                "SecurityGroupRule",
            ]
        );
        assert_eq!(report.count(Outcome::Created), 6);
        assert_eq!(cloud.public.records("example.com").len(), 1);
        assert_eq!(cloud.network.rules("masters-nsg").len(), 1);
    }

    #[tokio::test]
    async fn test_second_run_unchanged() {
        let cloud = FakeCloud::new();
        reconcile_manifest(&cloud, &mut Manifest::from_yaml(MANIFEST).unwrap(), false)
            .await
            .unwrap();

        let report =
            reconcile_manifest(&cloud, &mut Manifest::from_yaml(MANIFEST).unwrap(), false)
                .await
                .unwrap();

        assert_eq!(report.count(Outcome::Unchanged), 6);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let cloud = FakeCloud::new();
        let mut manifest = Manifest::from_yaml(MANIFEST).unwrap();

        let report = reconcile_manifest(&cloud, &mut manifest, true).await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.count(Outcome::Created), 6);
        assert!(cloud.public.mutations().is_empty());
        assert!(cloud.private.mutations().is_empty());
        assert!(cloud
            .network
            .calls()
            .iter()
            .all(|call| call.starts_with("List")));
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let cloud = FakeCloud::new();
        cloud.network.fail_writes();
        let mut manifest = Manifest::from_yaml(MANIFEST).unwrap();

        let err = reconcile_manifest(&cloud, &mut manifest, false)
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::Apply(_)));
        // Zones and record sets were applied before the failing group
        assert_eq!(cloud.public.zone_infos().len(), 1);
        assert_eq!(cloud.private.zone_infos().len(), 1);
        assert!(!cloud
            .network
            .calls()
            .iter()
            .any(|call| call.contains("NetworkSecurityGroup")));
    }

    #[test]
    fn test_report_entry_fields() {
        let entry = ReportEntry {
            kind: "DNSZone",
            name: "example.com".to_string(),
            outcome: Outcome::Updated,
        };

        assert_eq!(entry.outcome.to_string(), "updated");
    }
}
