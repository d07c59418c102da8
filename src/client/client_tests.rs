//! Tests for the client facades.

use super::*;
use crate::locator::EmbeddedLocator;
use crate::provider::ConfigProvider;
use parking_lot::Mutex;
use std::sync::Arc;

async fn setup(content: &str) -> (Arc<EmbeddedLocator>, Arc<ConfigProvider>) {
    let locator = Arc::new(EmbeddedLocator::new("bundle"));
    locator.insert("default/application.yaml", content);
    let provider = ConfigProvider::builder()
        .shared_locator(locator.clone())
        .build()
        .await
        .unwrap();
    (locator, provider)
}

async fn update(locator: &EmbeddedLocator, provider: &ConfigProvider, content: &str) {
    locator.insert("default/application.yaml", content);
    provider.reload().await;
}

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    (seen, move |value: &str| s.lock().push(value.to_string()))
}

mod config_property {
    use super::*;

    #[tokio::test]
    async fn missing_without_default_fails() {
        let (_, provider) = setup("a: 1").await;

        assert!(ConfigProperty::new(&provider, "missing").is_err());
    }

    #[tokio::test]
    async fn typed_accessors() {
        let (_, provider) =
            setup("port: 8080\nbig: 9000000000\nflag: TRUE\nname: orders").await;

        assert_eq!(ConfigProperty::new(&provider, "port").unwrap().as_i32().unwrap(), 8080);
        assert_eq!(
            ConfigProperty::new(&provider, "big").unwrap().as_i64().unwrap(),
            9_000_000_000
        );
        assert!(ConfigProperty::new(&provider, "big").unwrap().as_i32().is_err());
        assert!(ConfigProperty::new(&provider, "flag").unwrap().as_bool().unwrap());

        let name = ConfigProperty::new(&provider, "name").unwrap();
        assert!(matches!(name.as_bool(), Err(ValueError::Boolean { .. })));
        assert!(matches!(name.as_i64(), Err(ValueError::Integer { .. })));
    }

    #[tokio::test]
    async fn follows_changes_and_calls_back() {
        let (locator, provider) = setup("a: 1").await;
        let property = ConfigProperty::new(&provider, "a").unwrap();
        let (seen, callback) = recorder();
        property.on_change(callback, false);

        update(&locator, &provider, "a: 2").await;
        update(&locator, &provider, "a: 2\nb: 1").await;

        assert_eq!(property.value(), "2");
        assert_eq!(*seen.lock(), vec!["2"]);
    }

    #[tokio::test]
    async fn fire_now_delivers_current_value() {
        let (_, provider) = setup("a: 1").await;
        let property = ConfigProperty::new(&provider, "a").unwrap();
        let (seen, callback) = recorder();

        property.on_change(callback, true);

        assert_eq!(*seen.lock(), vec!["1"]);
    }

    #[tokio::test]
    async fn callback_slot_is_replaced() {
        let (locator, provider) = setup("a: 1").await;
        let property = ConfigProperty::new(&provider, "a").unwrap();
        let (first, first_cb) = recorder();
        let (second, second_cb) = recorder();
        property.on_change(first_cb, false);
        property.on_change(second_cb, false);

        update(&locator, &provider, "a: 2").await;

        assert!(first.lock().is_empty());
        assert_eq!(*second.lock(), vec!["2"]);
    }

    #[tokio::test]
    async fn removal_falls_back_to_default() {
        let (locator, provider) = setup("timeout: 30").await;
        let property = ConfigProperty::with_default(&provider, "timeout", "10");
        assert_eq!(property.value(), "30");

        update(&locator, &provider, "other: 1").await;

        assert_eq!(property.value(), "10");
        assert_eq!(property.default_value(), Some("10"));
    }

    #[tokio::test]
    async fn removal_without_default_keeps_last_value() {
        let (locator, provider) = setup("timeout: 30").await;
        let property = ConfigProperty::new(&provider, "timeout").unwrap();

        update(&locator, &provider, "other: 1").await;

        assert_eq!(property.value(), "30");
    }

    #[tokio::test]
    async fn default_is_overridden_by_later_source() {
        let (locator, provider) = setup("a: 1").await;
        let property = ConfigProperty::with_default(&provider, "x", "fallback");
        let (seen, callback) = recorder();
        property.on_change(callback, false);
        assert_eq!(property.value(), "fallback");

        update(&locator, &provider, "a: 1\nx: 5").await;

        assert_eq!(property.value(), "5");
        assert_eq!(*seen.lock(), vec!["5"]);
    }

    #[tokio::test]
    async fn drop_unregisters_listener() {
        let (_, provider) = setup("a: 1").await;
        let baseline = provider.listener_count();

        let property = ConfigProperty::new(&provider, "a").unwrap();
        assert_eq!(provider.listener_count(), baseline + 1);

        drop(property);
        assert_eq!(provider.listener_count(), baseline);
    }
}

mod group {
    use super::*;

    #[tokio::test]
    async fn snapshots_prefix() {
        let (_, provider) = setup("db:\n  host: h\n  port: 5432\ndbx: no").await;

        let group = ConfigPropertyGroup::new(&provider, "db");

        assert_eq!(group.prefix(), "db");
        assert_eq!(group.len(), 2);
        assert_eq!(group.get("host").as_deref(), Some("h"));
        assert_eq!(group.get("port").as_deref(), Some("5432"));
        assert!(group.get("x").is_none());
        assert_eq!(
            group.properties().keys().collect::<Vec<_>>(),
            vec!["db.host", "db.port"]
        );
    }

    #[tokio::test]
    async fn one_batched_callback_per_cycle() {
        let (locator, provider) = setup("db:\n  host: h\n  port: 1\nother: 1").await;
        let group = ConfigPropertyGroup::new(&provider, "db");
        let batches = Arc::new(Mutex::new(Vec::new()));
        let b = Arc::clone(&batches);
        group.on_change(move |keys: &[String]| b.lock().push(keys.to_vec()));

        update(&locator, &provider, "db:\n  host: h2\n  user: u\nother: 2").await;

        let batches = batches.lock();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec!["db.user", "db.host", "db.port"]);
        assert_eq!(group.get("host").as_deref(), Some("h2"));
        assert_eq!(group.get("user").as_deref(), Some("u"));
        assert!(group.get("port").is_none());
    }

    #[tokio::test]
    async fn unrelated_changes_are_ignored() {
        let (locator, provider) = setup("db:\n  host: h\nother: 1").await;
        let group = ConfigPropertyGroup::new(&provider, "db");
        let calls = Arc::new(Mutex::new(0));
        let c = Arc::clone(&calls);
        group.on_change(move |_: &[String]| *c.lock() += 1);

        update(&locator, &provider, "db:\n  host: h\nother: 2").await;

        assert_eq!(*calls.lock(), 0);
    }

    #[tokio::test]
    async fn empty_group_fills_in_later() {
        let (locator, provider) = setup("a: 1").await;
        let group = ConfigPropertyGroup::new(&provider, "cache");
        assert!(group.is_empty());

        update(&locator, &provider, "a: 1\ncache:\n  ttl: 60").await;

        assert_eq!(
            group.values().into_iter().collect::<Vec<_>>(),
            vec![("cache.ttl".to_string(), "60".to_string())]
        );
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn reads_until_first_gap() {
        let (_, provider) = setup("hosts: [a, b, c]").await;

        let list = ConfigPropertyList::new(&provider, "hosts");

        assert_eq!(list.values(), vec!["a", "b", "c"]);
        assert_eq!(list.get(1).as_deref(), Some("b"));
        assert_eq!(list.len(), 3);
        assert_eq!(list.name(), "hosts");
    }

    #[tokio::test]
    async fn missing_list_is_empty() {
        let (_, provider) = setup("a: 1").await;

        assert!(ConfigPropertyList::new(&provider, "hosts").is_empty());
    }

    #[tokio::test]
    async fn rebuilt_on_change_with_one_callback() {
        let (locator, provider) = setup("hosts: [a, b, c]").await;
        let list = ConfigPropertyList::new(&provider, "hosts");
        let batches = Arc::new(Mutex::new(Vec::new()));
        let b = Arc::clone(&batches);
        list.on_change(move |values: &[String]| b.lock().push(values.to_vec()));

        update(&locator, &provider, "hosts: [x]").await;

        assert_eq!(list.values(), vec!["x"]);
        assert_eq!(*batches.lock(), vec![vec!["x".to_string()]]);
    }

    #[tokio::test]
    async fn similarly_named_keys_do_not_trigger() {
        let (locator, provider) = setup("hosts: [a]\nhostsx: [z]").await;
        let list = ConfigPropertyList::new(&provider, "hosts");
        let calls = Arc::new(Mutex::new(0));
        let c = Arc::clone(&calls);
        list.on_change(move |_: &[String]| *c.lock() += 1);

        update(&locator, &provider, "hosts: [a]\nhostsx: [y]").await;

        assert_eq!(*calls.lock(), 0);
    }
}
