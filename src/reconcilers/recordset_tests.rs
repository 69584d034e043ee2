// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `recordset.rs`

#[cfg(test)]
mod tests {
    use crate::dns::{ResourceRecordSet, RrsType};
    use crate::errors::{ApplyError, BackendError, ReconcileError, ValidationError};
    use crate::reconcilers::{plan_task, run_task, CloudTask, Outcome, RecordSet};
    use crate::testing::{DnsCall, FakeCloud};

    fn upsert(zone: &str, relative: &str, ttl: i64, ips: &[&str]) -> DnsCall {
        DnsCall::CreateOrUpdate {
            zone: zone.to_string(),
            relative_name: relative.to_string(),
            rrs_type: "A".to_string(),
            ttl,
            rrdatas: ips.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn test_new_sets_zone() {
        let record = RecordSet::new("api.example.com", "example.com");

        assert_eq!(record.name.as_deref(), Some("api.example.com"));
        assert_eq!(record.dns_zone, "example.com");
        assert_eq!(record.ttl, None);
    }

    #[tokio::test]
    async fn test_find_absent_when_zone_missing() {
        let cloud = FakeCloud::new();

        let found = RecordSet::new("api.example.com", "example.com")
            .find(&cloud)
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_absent_among_other_private_records() {
        let cloud = FakeCloud::new();
        cloud.private.insert_zone("internal.example.com", &[]);
        cloud
            .private
            .insert_record("internal.example.com", "db", 300, &["10.1.0.4"]);
        cloud
            .private
            .insert_record("internal.example.com", "web", 300, &["10.1.0.5"]);

        let found = RecordSet::new("api.internal.example.com", "internal.example.com")
            .with_private(true)
            .find(&cloud)
            .await
            .unwrap();

        assert!(found.is_none());
        assert_eq!(
            cloud.private.calls(),
            vec![
                DnsCall::ListZones,
                DnsCall::List {
                    zone: "internal.example.com".to_string()
                },
            ]
        );
        assert!(cloud.private.mutations().is_empty());
        assert!(cloud.public.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_find_present() {
        let cloud = FakeCloud::new();
        cloud.public.insert_zone("example.com", &[]);
        cloud
            .public
            .insert_record("example.com", "api", 60, &["10.0.0.4"]);

        let found = RecordSet::new("API.example.com.", "example.com")
            .find(&cloud)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.name.as_deref(), Some("api.example.com"));
        assert_eq!(found.dns_zone, "example.com");
        assert_eq!(found.private, Some(false));
        assert_eq!(found.ttl, Some(60));
        assert_eq!(found.addresses, vec!["10.0.0.4".to_string()]);
    }

    #[tokio::test]
    async fn test_create_uses_default_ttl() {
        let cloud = FakeCloud::new();
        cloud.public.insert_zone("example.com", &[]);

        let outcome = run_task(
            &cloud,
            &mut RecordSet::new("www.example.com", "example.com")
                .with_addresses(["1.2.3.4", "5.6.7.8"]),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Created);
        assert_eq!(
            cloud.public.mutations(),
            vec![upsert("example.com", "www", 300, &["1.2.3.4", "5.6.7.8"])]
        );
    }

    #[tokio::test]
    async fn test_create_in_private_zone() {
        let cloud = FakeCloud::new();
        cloud.private.insert_zone("internal.example.com", &[]);

        run_task(
            &cloud,
            &mut RecordSet::new("db.internal.example.com", "internal.example.com")
                .with_addresses(["10.1.0.4"])
                .with_ttl(30),
        )
        .await
        .unwrap();

        assert!(cloud.public.mutations().is_empty());
        assert_eq!(
            cloud.private.records("internal.example.com"),
            vec![ResourceRecordSet::new(
                "db.internal.example.com",
                vec!["10.1.0.4".to_string()],
                30,
                RrsType::A
            )]
        );
    }

    #[tokio::test]
    async fn test_same_addresses_in_other_order_are_unchanged() {
        let cloud = FakeCloud::new();
        cloud.public.insert_zone("example.com", &[]);
        cloud
            .public
            .insert_record("example.com", "api", 300, &["10.0.0.2", "10.0.0.1"]);

        let outcome = run_task(
            &cloud,
            &mut RecordSet::new("api.example.com", "example.com")
                .with_addresses(["10.0.0.1", "10.0.0.2"]),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert!(cloud.public.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_update_ttl_keeps_addresses() {
        let cloud = FakeCloud::new();
        cloud.public.insert_zone("example.com", &[]);
        cloud
            .public
            .insert_record("example.com", "api", 300, &["10.0.0.1"]);

        let plan = plan_task(
            &cloud,
            &RecordSet::new("api.example.com", "example.com").with_ttl(60),
        )
        .await
        .unwrap();
        assert_eq!(plan.changes.ttl, Some(60));
        assert_eq!(plan.changes.addresses, None);

        let outcome = run_task(
            &cloud,
            &mut RecordSet::new("api.example.com", "example.com").with_ttl(60),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Updated);
        assert_eq!(
            cloud.public.mutations(),
            vec![upsert("example.com", "api", 60, &["10.0.0.1"])]
        );
    }

    #[tokio::test]
    async fn test_create_requires_zone() {
        let cloud = FakeCloud::new();
        let mut record: RecordSet =
            serde_json::from_value(serde_json::json!({"name": "api.example.com"})).unwrap();

        let err = run_task(&cloud, &mut record).await.unwrap_err();

        assert_eq!(
            err,
            ReconcileError::Validation {
                kind: "RecordSet",
                name: "api.example.com".to_string(),
                source: ValidationError::RequiredField("DNSZone"),
            }
        );
    }

    #[tokio::test]
    async fn test_private_cannot_change() {
        let cloud = FakeCloud::new();
        cloud.public.insert_zone("example.com", &[]);
        cloud
            .public
            .insert_record("example.com", "api", 300, &["10.0.0.1"]);

        let err = run_task(
            &cloud,
            &mut RecordSet::new("api.example.com", "example.com").with_private(true),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Validation {
                source: ValidationError::CannotChangeField("Private"),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_render_into_missing_zone_fails() {
        let cloud = FakeCloud::new();

        let err = run_task(
            &cloud,
            &mut RecordSet::new("api.example.com", "example.com").with_addresses(["10.0.0.1"]),
        )
        .await
        .unwrap_err();

        match err {
            ReconcileError::Apply(ApplyError::Backend { source, .. }) => {
                assert!(matches!(source, BackendError::NotFound { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upsert_failure_is_record_set_error() {
        let cloud = FakeCloud::new();
        cloud.public.insert_zone("example.com", &[]);
        cloud.public.fail_on("api");

        let err = run_task(
            &cloud,
            &mut RecordSet::new("api.example.com", "example.com").with_addresses(["10.0.0.1"]),
        )
        .await
        .unwrap_err();

        match err {
            ReconcileError::Apply(ApplyError::RecordSet {
                operation, name, ..
            }) => {
                assert_eq!(operation, "upsert");
                assert_eq!(name, "api.example.com");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
