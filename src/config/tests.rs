//! Configuration Module Tests
//!
//! ## Test Scopes
//! - **WanConsumerConfig**: binary layout and rolling-upgrade behaviour of the record.
//! - **NodeConfig**: command-line parsing and validation.
//! - **Bootstrap**: JSON loading of WAN consumer configurations.

#[cfg(test)]
mod tests {
    use crate::config::node::{NodeConfig, parse_wan_consumers};
    use crate::config::wan_consumer::WanConsumerConfig;
    use crate::versioning::{RecordError, TaggedValue, Version, decode_record, encode_record};
    use crate::wire::WireReader;

    fn scenario_record(persist: bool) -> WanConsumerConfig {
        WanConsumerConfig::default()
            .with_property("a", "1")
            .with_class_name("Foo")
            .with_implementation(None)
            .with_persist_wan_replicated_data(persist)
    }

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("cluster-dispatch")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    // ============================================================
    // WAN CONSUMER RECORD
    // ============================================================

    #[test]
    fn test_all_fields_survive_at_threshold_version() {
        let record = scenario_record(false);

        for version in [Version::V3_11, Version::V3_12] {
            let bytes = encode_record(&record, version);
            let decoded: WanConsumerConfig = decode_record(bytes, version).unwrap();

            assert_eq!(decoded, record);
            assert_eq!(
                decoded.property("a"),
                Some(&TaggedValue::String("1".to_string()))
            );
            assert_eq!(decoded.class_name.as_deref(), Some("Foo"));
            assert_eq!(decoded.implementation, None);
            assert!(!decoded.persist_wan_replicated_data);
        }
    }

    #[test]
    fn test_old_peer_drops_persist_flag() {
        let record = scenario_record(false);

        let new_bytes = encode_record(&record, Version::V3_11);
        let old_bytes = encode_record(&record, Version::V3_10);
        assert_eq!(new_bytes.len() - old_bytes.len(), 1);
        assert_eq!(&new_bytes[..old_bytes.len()], &old_bytes[..]);

        let decoded: WanConsumerConfig = decode_record(old_bytes, Version::V3_10).unwrap();
        assert!(decoded.persist_wan_replicated_data);
        assert_eq!(decoded.class_name.as_deref(), Some("Foo"));
        assert_eq!(decoded.properties.len(), 1);
    }

    #[test]
    fn test_binary_layout() {
        let bytes = encode_record(&scenario_record(true), Version::V3_11);
        let mut input = WireReader::new(bytes);

        assert_eq!(input.read_i32().unwrap(), 1);
        assert_eq!(input.read_string().unwrap(), "a");
        assert_eq!(input.read_i32().unwrap(), crate::versioning::value::TAG_STRING);
        assert_eq!(input.read_string().unwrap(), "1");
        assert_eq!(input.read_nullable_string().unwrap().as_deref(), Some("Foo"));
        assert_eq!(input.read_i32().unwrap(), crate::versioning::value::TAG_NULL);
        assert!(input.read_bool().unwrap());
        assert!(input.finish().is_ok());
    }

    #[test]
    fn test_missing_persist_flag_is_truncation_not_default() {
        let bytes = encode_record(&scenario_record(false), Version::V3_11);
        let cut = bytes.slice(..bytes.len() - 1);

        match decode_record::<WanConsumerConfig>(cut, Version::V3_11) {
            Err(RecordError::Truncated { field, .. }) => {
                assert_eq!(field, "persistWanReplicatedData")
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_property_list() {
        let record = WanConsumerConfig::default()
            .with_property("endpoint", "dc-2")
            .with_property("batch", 500i64);
        let bytes = encode_record(&record, Version::V3_10);
        let cut = bytes.slice(..10);

        let err = decode_record::<WanConsumerConfig>(cut, Version::V3_10).unwrap_err();
        assert!(matches!(err, RecordError::Truncated { field: "properties", .. }));
    }

    #[test]
    fn test_properties_encode_in_key_order() {
        let forward = WanConsumerConfig::default()
            .with_property("b", 2i64)
            .with_property("a", 1i64);
        let backward = WanConsumerConfig::default()
            .with_property("a", 1i64)
            .with_property("b", 2i64);

        assert_eq!(
            encode_record(&forward, Version::CURRENT),
            encode_record(&backward, Version::CURRENT)
        );
    }

    #[test]
    fn test_null_property_value_is_kept() {
        // ARRANGE
        let record = WanConsumerConfig::default()
            .with_null_property("endpoint")
            .with_property("batch", 500i32);

        // ACT
        let bytes = encode_record(&record, Version::V3_10);
        let mut layout = WireReader::new(bytes.clone());
        let decoded: WanConsumerConfig = decode_record(bytes, Version::V3_10).unwrap();

        // ASSERT
        assert_eq!(layout.read_i32().unwrap(), 2);
        assert_eq!(layout.read_string().unwrap(), "batch");
        assert_eq!(layout.read_i32().unwrap(), crate::versioning::value::TAG_INTEGER);
        assert_eq!(layout.read_i32().unwrap(), 500);
        assert_eq!(layout.read_string().unwrap(), "endpoint");
        assert_eq!(layout.read_i32().unwrap(), crate::versioning::value::TAG_NULL);

        assert_eq!(decoded, record);
        assert_eq!(decoded.properties.get("endpoint"), Some(&None));
        assert_eq!(decoded.property("endpoint"), None);
        assert_eq!(decoded.property("batch"), Some(&TaggedValue::Int(500)));
    }

    #[test]
    fn test_implementation_value_round_trips() {
        let record = WanConsumerConfig::default()
            .with_class_name("com.example.Consumer")
            .with_implementation(Some(TaggedValue::String("inline".to_string())));
        let bytes = encode_record(&record, Version::CURRENT);
        let decoded: WanConsumerConfig = decode_record(bytes, Version::CURRENT).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_defaults() {
        let config = WanConsumerConfig::default();
        assert!(config.persist_wan_replicated_data);
        assert!(config.properties.is_empty());
        assert_eq!(config.class_name, None);
    }

    // ============================================================
    // NODE CONFIG
    // ============================================================

    #[test]
    fn test_node_config_defaults() {
        let config = NodeConfig::from_args(&args(&["--bind", "127.0.0.1:5701"])).unwrap();
        assert_eq!(config.bind_addr.port(), 5701);
        assert_eq!(config.partition_count, 271);
        assert_eq!(config.partition_threads, 4);
        assert_eq!(config.cluster_version, Version::CURRENT);
        assert!(config.wan_consumers_file.is_none());
    }

    #[test]
    fn test_node_config_all_flags() {
        let config = NodeConfig::from_args(&args(&[
            "--bind",
            "0.0.0.0:6000",
            "--partitions",
            "17",
            "--partition-threads",
            "2",
            "--cluster-version",
            "3.10",
            "--wan-consumers",
            "wan.json",
            "--log-level",
            "debug",
        ]))
        .unwrap();

        assert_eq!(config.partition_count, 17);
        assert_eq!(config.partition_threads, 2);
        assert_eq!(config.cluster_version, Version::V3_10);
        assert_eq!(
            config.wan_consumers_file.as_deref(),
            Some(std::path::Path::new("wan.json"))
        );
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_node_config_rejects_bad_input() {
        assert!(NodeConfig::from_args(&args(&[])).is_err());
        assert!(NodeConfig::from_args(&args(&["--bind"])).is_err());
        assert!(NodeConfig::from_args(&args(&["--bind", "nope"])).is_err());
        assert!(
            NodeConfig::from_args(&args(&["--bind", "127.0.0.1:1", "--partitions", "0"])).is_err()
        );
        assert!(
            NodeConfig::from_args(&args(&["--bind", "127.0.0.1:1", "--cluster-version", "x"]))
                .is_err()
        );
    }

    // ============================================================
    // BOOTSTRAP FILE
    // ============================================================

    #[test]
    fn test_parse_wan_consumers() {
        let json = serde_json::json!([
            {
                "wan_replication_name": "dc-east",
                "consumer": {
                    "class_name": "com.example.EastConsumer",
                    "properties": { "batch": 100, "endpoint": "east:5701", "ratio": 0.5, "zone": null },
                    "persist_wan_replicated_data": false
                }
            },
            {
                "wan_replication_name": "dc-west",
                "consumer": {}
            }
        ])
        .to_string();

        let entries = parse_wan_consumers(&json).unwrap();
        assert_eq!(entries.len(), 2);

        let east = &entries[0].consumer;
        assert_eq!(east.class_name.as_deref(), Some("com.example.EastConsumer"));
        assert_eq!(east.property("batch"), Some(&TaggedValue::Long(100)));
        assert_eq!(east.property("ratio"), Some(&TaggedValue::Double(0.5)));
        assert_eq!(east.properties.get("zone"), Some(&None));
        assert!(!east.persist_wan_replicated_data);

        let west = &entries[1].consumer;
        assert_eq!(west, &WanConsumerConfig::default());
    }

    #[test]
    fn test_parse_wan_consumers_requires_name() {
        let json = r#"[{ "wan_replication_name": "", "consumer": {} }]"#;
        assert!(parse_wan_consumers(json).is_err());
        assert!(parse_wan_consumers("not json").is_err());
    }
}
