mod common;

use anyhow::Result;
use bux_admin::core::auth::{
    hash_body, AUTH_HEADER, AUTH_HEADER_HASH, AUTH_HEADER_NONCE, AUTH_HEADER_TIME, AUTH_SIGNATURE,
};
use bux_admin::domain::model::{Conditions, Metadata, QueryParams};
use bux_admin::{AdminApi, BuxError, TransportHttp, TransportOptions};
use common::{admin_transport, admin_xpriv, options, user_transport, xpub_of};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_admin_get_status_is_signed_with_admin_key() -> Result<()> {
    let server = MockServer::start();
    let admin_xpub = xpub_of(&admin_xpriv());

    let status_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/admin/status")
            .header("content-type", "application/json")
            .header(AUTH_HEADER, admin_xpub.as_str())
            .header(AUTH_HEADER_HASH, hash_body("").as_str())
            .header_exists(AUTH_HEADER_NONCE)
            .header_exists(AUTH_HEADER_TIME)
            .header_exists(AUTH_SIGNATURE);
        then.status(200).json_body(json!(true));
    });

    let transport = admin_transport(&server);
    let status = transport.admin_get_status().await?;

    status_mock.assert();
    assert!(status);
    Ok(())
}

#[tokio::test]
async fn test_admin_get_stats() -> Result<()> {
    let server = MockServer::start();

    let stats_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/admin/stats");
        then.status(200).json_body(json!({
            "balance": 150000,
            "destinations": 12,
            "paymail_addresses": 3,
            "transactions": 40,
            "transactions_per_day": {"20230101": 4},
            "utxos": 9,
            "utxos_per_type": {"pubkeyhash": 9},
            "xpubs": 2
        }));
    });

    let stats = admin_transport(&server).admin_get_stats().await?;

    stats_mock.assert();
    assert_eq!(stats.balance, 150000);
    assert_eq!(stats.paymail_addresses, 3);
    assert_eq!(stats.xpubs, 2);
    assert_eq!(stats.utxos_per_type.get("pubkeyhash"), Some(&json!(9)));
    Ok(())
}

#[tokio::test]
async fn test_admin_get_stats_on_empty_server() -> Result<()> {
    let server = MockServer::start();

    let stats_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/admin/stats");
        then.status(200).json_body(json!({
            "balance": 0,
            "destinations": 0,
            "paymail_addresses": 0,
            "transactions": 0,
            "transactions_per_day": null,
            "utxos": 0,
            "utxos_per_type": null,
            "xpubs": 1
        }));
    });

    let stats = admin_transport(&server).admin_get_stats().await?;

    stats_mock.assert();
    assert!(stats.transactions_per_day.is_empty());
    assert!(stats.utxos_per_type.is_empty());
    assert_eq!(stats.xpubs, 1);
    Ok(())
}

#[tokio::test]
async fn test_new_xpub_posts_key_and_metadata() -> Result<()> {
    let server = MockServer::start();
    let raw_xpub = xpub_of(&common::user_xpriv());

    let mut metadata = Metadata::new();
    metadata.insert("owner".to_string(), json!("alice"));

    let xpub_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/xpub")
            .header_exists(AUTH_SIGNATURE)
            .json_body(json!({
                "metadata": {"owner": "alice"},
                "key": raw_xpub
            }));
        then.status(201).json_body(json!({"id": "xpub-id-1"}));
    });

    let transport = admin_transport(&server);
    transport.new_xpub(&raw_xpub, Some(&metadata)).await?;

    xpub_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_register_xpub_sends_empty_metadata_object() -> Result<()> {
    let server = MockServer::start();

    let xpub_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/xpub").json_body(json!({
            "metadata": {},
            "key": "xpub-raw"
        }));
        then.status(201).json_body(json!({"id": "xpub-id-1"}));
    });

    admin_transport(&server)
        .register_xpub("xpub-raw", None)
        .await?;

    xpub_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_admin_get_access_keys_body_and_decoding() -> Result<()> {
    let server = MockServer::start();

    let mut conditions = Conditions::new();
    conditions.insert("xpub_id".to_string(), json!("xpub-id-1"));
    let params = QueryParams {
        page: 1,
        page_size: 20,
        order_by_field: "created_at".to_string(),
        sort_direction: "desc".to_string(),
    };

    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/admin/access-keys/search")
            .json_body(json!({
                "conditions": {"xpub_id": "xpub-id-1"},
                "metadata": {},
                "query_params": {
                    "page": 1,
                    "page_size": 20,
                    "order_by_field": "created_at",
                    "sort_direction": "desc"
                }
            }));
        then.status(200).json_body(json!([
            {"id": "ak-1", "xpub_id": "xpub-id-1", "created_at": "2023-05-01T10:00:00Z"},
            {"id": "ak-2", "xpub_id": "xpub-id-1", "revoked_at": "2023-06-01T10:00:00Z"}
        ]));
    });

    let keys = admin_transport(&server)
        .admin_get_access_keys(Some(&conditions), None, Some(&params))
        .await?;

    search_mock.assert();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].id, "ak-1");
    assert!(keys[0].model.created_at.is_some());
    assert!(keys[1].revoked_at.is_some());
    Ok(())
}

#[tokio::test]
async fn test_search_without_filters_sends_nulls() -> Result<()> {
    let server = MockServer::start();

    let search_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/admin/xpubs/search").json_body(json!({
            "conditions": null,
            "metadata": {},
            "query_params": null
        }));
        then.status(200).json_body(json!(null));
    });

    let xpubs = admin_transport(&server)
        .admin_get_xpubs(None, None, None)
        .await?;

    search_mock.assert();
    assert!(xpubs.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_every_search_uses_its_path() -> Result<()> {
    let server = MockServer::start();
    let transport = admin_transport(&server);

    let paths = [
        "access-keys",
        "block-headers",
        "destinations",
        "paymails",
        "transactions",
        "utxos",
        "xpubs",
    ];
    let mocks: Vec<_> = paths
        .iter()
        .map(|segment| {
            server.mock(|when, then| {
                when.method(GET)
                    .path(format!("/v1/admin/{}/search", segment))
                    .header_exists(AUTH_SIGNATURE);
                then.status(200).json_body(json!([{"id": format!("{}-1", segment)}]));
            })
        })
        .collect();

    assert_eq!(transport.admin_get_access_keys(None, None, None).await?[0].id, "access-keys-1");
    assert_eq!(transport.admin_get_block_headers(None, None, None).await?[0].id, "block-headers-1");
    assert_eq!(transport.admin_get_destinations(None, None, None).await?[0].id, "destinations-1");
    assert_eq!(transport.admin_get_paymails(None, None, None).await?[0].id, "paymails-1");
    assert_eq!(transport.admin_get_transactions(None, None, None).await?[0].id, "transactions-1");
    assert_eq!(transport.admin_get_utxos(None, None, None).await?[0].id, "utxos-1");
    assert_eq!(transport.admin_get_xpubs(None, None, None).await?[0].id, "xpubs-1");

    for mock in &mocks {
        mock.assert();
    }
    Ok(())
}

#[tokio::test]
async fn test_every_count_returns_parsed_integer() -> Result<()> {
    let server = MockServer::start();
    let transport = admin_transport(&server);

    let counts = [
        ("access-keys", 1),
        ("block-headers", 800_000),
        ("destinations", 3),
        ("paymails", 4),
        ("transactions", 5),
        ("utxos", 6),
        ("xpubs", 7),
    ];
    let body = r#"{"conditions":null,"metadata":{}}"#;
    let mocks: Vec<_> = counts
        .iter()
        .map(|(segment, count)| {
            server.mock(|when, then| {
                when.method(GET)
                    .path(format!("/v1/admin/{}/count", segment))
                    .header(AUTH_HEADER_HASH, hash_body(body))
                    .body(body);
                then.status(200).body(count.to_string());
            })
        })
        .collect();

    assert_eq!(transport.admin_get_access_keys_count(None, None).await?, 1);
    assert_eq!(transport.admin_get_block_headers_count(None, None).await?, 800_000);
    assert_eq!(transport.admin_get_destinations_count(None, None).await?, 3);
    assert_eq!(transport.admin_get_paymails_count(None, None).await?, 4);
    assert_eq!(transport.admin_get_transactions_count(None, None).await?, 5);
    assert_eq!(transport.admin_get_utxos_count(None, None).await?, 6);
    assert_eq!(transport.admin_get_xpubs_count(None, None).await?, 7);

    for mock in &mocks {
        mock.assert();
    }
    Ok(())
}

#[tokio::test]
async fn test_paymail_operations() -> Result<()> {
    let server = MockServer::start();
    let paymail_json = json!({
        "id": "pm-1",
        "xpub_id": "xpub-id-1",
        "alias": "alice",
        "domain": "example.com",
        "public_name": "Alice",
        "avatar": "https://example.com/a.png"
    });

    let get_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/admin/paymail/get")
            .json_body(json!({"address": "alice@example.com"}));
        then.status(200).json_body(paymail_json.clone());
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/admin/paymail/create")
            .json_body(json!({
                "xpub_id": "xpub-id-1",
                "address": "alice@example.com",
                "public_name": "Alice",
                "avatar": "https://example.com/a.png"
            }));
        then.status(201).json_body(paymail_json.clone());
    });
    let delete_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/admin/paymail/delete")
            .json_body(json!({"address": "alice@example.com"}));
        then.status(200).json_body(paymail_json.clone());
    });

    let transport = admin_transport(&server);

    let fetched = transport.admin_get_paymail("alice@example.com").await?;
    assert_eq!(fetched.unwrap().address(), "alice@example.com");

    let created = transport
        .admin_create_paymail(
            "xpub-id-1",
            "alice@example.com",
            "Alice",
            "https://example.com/a.png",
        )
        .await?;
    assert_eq!(created.unwrap().public_name, "Alice");

    let deleted = transport.admin_delete_paymail("alice@example.com").await?;
    assert_eq!(deleted.unwrap().id, "pm-1");

    get_mock.assert();
    create_mock.assert();
    delete_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_debug_search_logs_decoded_models() -> Result<()> {
    let server = MockServer::start();

    let search_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/admin/utxos/search");
        then.status(200).json_body(json!([
            {"id": "utxo-1", "transaction_id": "tx-1", "output_index": 0, "satoshis": 1000}
        ]));
    });

    let transport = TransportHttp::new(TransportOptions {
        admin_key: Some(admin_xpriv().to_string()),
        debug: true,
        ..options(&server)
    })?;
    let utxos = transport.admin_get_utxos(None, None, None).await?;

    search_mock.assert();
    assert_eq!(utxos.len(), 1);
    assert_eq!(utxos[0].satoshis, 1000);
    Ok(())
}

#[tokio::test]
async fn test_paymail_null_body_is_none() -> Result<()> {
    let server = MockServer::start();

    let get_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/admin/paymail/get");
        then.status(200).body("null");
    });
    let delete_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/admin/paymail/delete");
        then.status(200).body("null");
    });

    let transport = admin_transport(&server);

    assert!(transport.admin_get_paymail("nobody@example.com").await?.is_none());
    assert!(transport.admin_delete_paymail("nobody@example.com").await?.is_none());

    get_mock.assert();
    delete_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_record_transaction_follows_sign_request() -> Result<()> {
    let server = MockServer::start();
    let admin_xpub = xpub_of(&admin_xpriv());

    let unsigned_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/admin/transactions/record")
            .header(AUTH_HEADER, admin_xpub.as_str())
            .header_missing(AUTH_SIGNATURE)
            .json_body(json!({"hex": "0100000001"}));
        then.status(200)
            .json_body(json!({"id": "tx-1", "hex": "0100000001", "status": "complete"}));
    });

    let transport = TransportHttp::new(TransportOptions {
        admin_key: Some(admin_xpriv().to_string()),
        sign_request: false,
        ..options(&server)
    })?;
    let transaction = transport.admin_record_transaction("0100000001").await?;

    unsigned_mock.assert();
    assert_eq!(transaction.id, "tx-1");
    assert_eq!(transaction.status, "complete");
    Ok(())
}

#[tokio::test]
async fn test_admin_operations_without_admin_key_never_hit_the_network() -> Result<()> {
    let server = MockServer::start();
    let catch_all = server.mock(|_when, then| {
        then.status(200).json_body(json!(true));
    });

    let transport = user_transport(&server);
    let is_admin_key_error = |err: BuxError| matches!(err, BuxError::AdminKeyError);

    assert!(is_admin_key_error(transport.admin_get_status().await.unwrap_err()));
    assert!(is_admin_key_error(transport.admin_get_stats().await.unwrap_err()));
    assert!(is_admin_key_error(transport.new_xpub("xpub", None).await.unwrap_err()));
    assert!(is_admin_key_error(
        transport.admin_get_utxos(None, None, None).await.unwrap_err()
    ));
    assert!(is_admin_key_error(
        transport.admin_get_transactions_count(None, None).await.unwrap_err()
    ));
    assert!(is_admin_key_error(
        transport.admin_get_paymail("a@b.c").await.unwrap_err()
    ));
    assert!(is_admin_key_error(
        transport
            .admin_create_paymail("id", "a@b.c", "", "")
            .await
            .unwrap_err()
    ));
    assert!(is_admin_key_error(
        transport.admin_delete_paymail("a@b.c").await.unwrap_err()
    ));
    assert!(is_admin_key_error(
        transport.admin_record_transaction("00").await.unwrap_err()
    ));

    catch_all.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_error_status_is_passed_through() -> Result<()> {
    let server = MockServer::start();

    let rejected = server.mock(|when, then| {
        when.method(GET).path("/v1/admin/status");
        then.status(401)
            .json_body(json!({"code": "error-unauthorized", "message": "xpub not authorized"}));
    });

    let err = admin_transport(&server).admin_get_status().await.unwrap_err();

    rejected.assert();
    match err {
        BuxError::ResponseError { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "xpub not authorized");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_undecodable_body_is_a_serialization_error() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/v1/admin/utxos/count");
        then.status(200).body("not a number");
    });

    let err = admin_transport(&server)
        .admin_get_utxos_count(None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, BuxError::SerializationError(_)));
    Ok(())
}
