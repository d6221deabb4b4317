//! Integration tests for KubeApiGateway using wiremock

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use policy_reports_core::config::GatewayConfig;
use policy_reports_core::domain::reports::{GatewayError, RemoteGateway, ReportType};
use policy_reports_core::infrastructure::KubeApiGateway;

fn create_gateway(mock_server: &MockServer) -> KubeApiGateway {
    let config = GatewayConfig {
        base_url: mock_server.uri(),
        token: Some("secret".to_string()),
        timeout_seconds: 5,
        page_limit: 2,
        accept_invalid_certs: false,
    };
    KubeApiGateway::new(&config).expect("Failed to build gateway")
}

fn report(name: &str, uid: &str) -> serde_json::Value {
    serde_json::json!({
        "metadata": {
            "name": name,
            "namespace": "ns1",
            "uid": uid,
            "labels": { "app.kubernetes.io/managed-by": "kubewarden" }
        },
        "scope": { "apiVersion": "v1", "kind": "Pod", "name": name, "namespace": "ns1" },
        "results": [{ "policy": "p1", "result": "pass" }]
    })
}

#[tokio::test]
async fn test_discovery_marks_served_report_types() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apis/wgpolicyk8s.io/v1alpha2"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&serde_json::json!({
            "kind": "APIResourceList",
            "groupVersion": "wgpolicyk8s.io/v1alpha2",
            "resources": [
                { "name": "policyreports", "namespaced": true, "kind": "PolicyReport" },
                { "name": "clusterpolicyreports", "namespaced": false, "kind": "ClusterPolicyReport" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let gateway = create_gateway(&mock_server);
    assert!(!gateway.schema_exists(ReportType::PolicyReport));

    let served = gateway.discover().await.expect("discovery succeeds");

    assert_eq!(served.len(), 2);
    assert!(gateway.schema_exists(ReportType::PolicyReport));
    assert!(gateway.schema_exists(ReportType::ClusterPolicyReport));
    assert!(!gateway.schema_exists(ReportType::Report));
    assert!(!gateway.schema_exists(ReportType::ClusterReport));
}

#[tokio::test]
async fn test_fetch_all_follows_continue_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apis/openreports.io/v1alpha1/reports"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&serde_json::json!({
            "metadata": { "continue": "page2" },
            "items": [report("a", "uid-a"), report("b", "uid-b")]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/apis/openreports.io/v1alpha1/reports"))
        .and(query_param("continue", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&serde_json::json!({
            "metadata": {},
            "items": [report("c", "uid-c")]
        })))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    let gateway = create_gateway(&mock_server);
    let records = gateway
        .fetch_all(ReportType::Report)
        .await
        .expect("list succeeds");

    let identities: Vec<&str> = records.iter().map(|record| record.identity()).collect();
    assert_eq!(identities, vec!["uid-a", "uid-b", "uid-c"]);
    assert!(records.iter().all(|record| record.is_managed_by_kubewarden()));
    assert_eq!(records[2].report_type(), ReportType::Report);
}

#[tokio::test]
async fn test_fetch_all_maps_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apis/wgpolicyk8s.io/v1alpha2/clusterpolicyreports"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let gateway = create_gateway(&mock_server);
    let err = gateway
        .fetch_all(ReportType::ClusterPolicyReport)
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Http { status: Some(403), .. }));
}

#[tokio::test]
async fn test_fetch_all_maps_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apis/openreports.io/v1alpha1/clusterreports"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let gateway = create_gateway(&mock_server);
    let err = gateway
        .fetch_all(ReportType::ClusterReport)
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Decode(_)));
}
