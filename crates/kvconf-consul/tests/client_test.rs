mod common;

use std::sync::Arc;

use common::FakeConsul;
use kvconf_consul::kvconf_core::Namespace;
use kvconf_consul::{ConfigClient, PreloadKeys, RedisOptions};

fn carrier_client(consul: &FakeConsul) -> ConfigClient {
    ConfigClient::new(consul.settings(), Namespace::for_service("carrier-service")).unwrap()
}

#[tokio::test]
async fn service_port_scenario() {
    let consul = FakeConsul::start().await;
    consul.put("config/carrier-service/port", "3005");

    let client = carrier_client(&consul);

    assert_eq!(client.get_number("port", None).await.unwrap(), 3005);
}

#[tokio::test]
async fn shared_key_is_cached_after_first_read() {
    let consul = FakeConsul::start().await;
    consul.put("config/shared/redis/host", "shared-redis");

    let client = carrier_client(&consul);

    assert_eq!(
        client.get_shared("redis/host", None).await.unwrap(),
        "shared-redis"
    );
    assert_eq!(
        client.get_shared("redis/host", None).await.unwrap(),
        "shared-redis"
    );
    assert_eq!(consul.kv_requests(), 1);
}

#[tokio::test]
async fn missing_key_with_default_is_not_cached() {
    let consul = FakeConsul::start().await;
    let client = carrier_client(&consul);

    let value = client.get("missing/key", Some("fallback")).await.unwrap();

    assert_eq!(value, "fallback");
    assert!(
        !client
            .cached_keys()
            .contains(&"config/carrier-service/missing/key".to_string())
    );

    let err = client.get("missing/key", None).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(consul.kv_requests(), 2);
}

#[tokio::test]
async fn refresh_issues_a_new_request() {
    let consul = FakeConsul::start().await;
    consul.put("config/carrier-service/database/host", "db-1");

    let client = carrier_client(&consul);
    assert_eq!(client.get("database/host", None).await.unwrap(), "db-1");

    consul.put("config/carrier-service/database/host", "db-2");
    assert_eq!(client.refresh("database/host").await.unwrap(), "db-2");
    assert_eq!(consul.kv_requests(), 2);
}

#[tokio::test]
async fn outage_falls_back_to_defaults() {
    let consul = FakeConsul::start().await;
    consul.put("config/carrier-service/port", "3005");
    consul.set_failing(true);

    let client = carrier_client(&consul);

    assert_eq!(client.get_number("port", Some(3000)).await.unwrap(), 3000);
    assert!(client.get_number("port", None).await.unwrap_err().is_unreachable());
    assert!(client.cached_keys().is_empty());

    consul.set_failing(false);
    assert_eq!(client.get_number("port", Some(3000)).await.unwrap(), 3005);
}

#[tokio::test]
async fn initialize_warms_cache_and_builders_reuse_it() {
    let consul = FakeConsul::start().await;
    consul.put("config/shared/redis/host", "shared-redis");
    consul.put("config/shared/redis/port", "6380");

    let client = Arc::new(
        carrier_client(&consul)
            .with_preload(PreloadKeys::new(Vec::<String>::new(), vec!["redis/host", "redis/port"])),
    );

    let report = client.initialize().await.unwrap();
    assert!(report.is_complete());
    assert_eq!(consul.kv_requests(), 2);

    let no_env = |_: &str| -> Option<String> { None };
    let redis = RedisOptions::load_with(&client, &no_env).await;

    assert_eq!(redis.url(), "redis://shared-redis:6380");
    // host and port come from the cache, only the password is fetched
    assert_eq!(consul.kv_requests(), 3);
}

#[tokio::test]
async fn health_check_reports_store_liveness() {
    let consul = FakeConsul::start().await;
    let client = carrier_client(&consul);

    assert!(client.health_check().await);
    consul.set_no_leader(true);
    assert!(!client.health_check().await);
}

#[tokio::test]
async fn key_with_fragment_is_not_cached_as_its_parent() {
    let consul = FakeConsul::start().await;
    consul.put("config/carrier-service/feature", "parent-value");

    let client = carrier_client(&consul);

    let err = client.get("feature#beta", None).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(client.cached_keys().is_empty());

    assert_eq!(
        client.get("feature", None).await.unwrap(),
        "parent-value"
    );
}
