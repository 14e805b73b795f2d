//! End to end: discovery and synthesized calls against a mocked api server.

use kube_methods::{CallArg, CallArgs, ClusterConfig, DynamicClient, Error, MethodListing, MethodsFormat, Output};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

async fn mount_discovery(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/apis"))
        .and(bearer_token(TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "APIGroupList",
            "apiVersion": "v1",
            "groups": [{
                "name": "apps",
                "versions": [{"groupVersion": "apps/v1", "version": "v1"}],
                "preferredVersion": {"groupVersion": "apps/v1", "version": "v1"}
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/apis/apps/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "APIResourceList",
            "apiVersion": "v1",
            "groupVersion": "apps/v1",
            "resources": [
                {
                    "name": "deployments",
                    "singularName": "deployment",
                    "namespaced": true,
                    "kind": "Deployment",
                    "verbs": ["create", "delete", "deletecollection", "get", "list", "patch", "update", "watch"],
                    "shortNames": ["deploy"],
                    "categories": ["all"]
                },
                {
                    "name": "deployments/scale",
                    "singularName": "",
                    "namespaced": true,
                    "group": "autoscaling",
                    "version": "v1",
                    "kind": "Scale",
                    "verbs": ["get", "patch", "update"]
                }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "APIResourceList",
            "groupVersion": "v1",
            "resources": [
                {
                    "name": "namespaces",
                    "singularName": "namespace",
                    "namespaced": false,
                    "kind": "Namespace",
                    "verbs": ["create", "delete", "get", "list"]
                },
                {
                    "name": "endpoints",
                    "singularName": "endpoints",
                    "namespaced": true,
                    "kind": "Endpoints",
                    "verbs": ["get", "list"]
                }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_oapi(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/oapi/v1"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "kind": "APIResourceList",
            "groupVersion": "v1",
            "resources": []
        })))
        .mount(server)
        .await;
}

async fn build(server: &MockServer) -> Result<DynamicClient, Error> {
    let config = ClusterConfig::new(server.uri(), Some(TOKEN))?;
    DynamicClient::build(config).await
}

#[tokio::test]
async fn discovery_builds_method_table() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_oapi(&server, 200).await;

    let client = build(&server).await.unwrap();
    let methods = client.methods();
    for name in &[
        "createDeployment",
        "deleteDeployment",
        "deletecollectionDeployment",
        "getDeployment",
        "listDeployment",
        "getDeployments",
        "patchDeployment",
        "updateDeployment",
        "watchDeployment",
        "getScaleScale",
        "patchScaleScale",
        "updateScaleScale",
    ] {
        assert!(methods.get("apis/apps/v1", name).is_some(), "missing {}", name);
    }
    // bundled plural table: Endpoints stays Endpoints
    assert!(methods.get("api/v1", "getEndpoints").is_some());
    assert!(methods.get("api/v1", "getNamespaces").is_some());
    assert!(methods.group("oapi/v1").is_none());
}

#[tokio::test]
async fn get_item_hits_namespaced_route() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_oapi(&server, 200).await;

    Mock::given(method("GET"))
        .and(path("/apis/apps/v1/namespaces/default/deployments/web"))
        .and(bearer_token(TOKEN))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"kind": "Deployment", "metadata": {"name": "web"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = build(&server).await.unwrap();
    let out = client
        .invoke("apis/apps/v1", "getDeployment", &[CallArg::from("default"), CallArg::from("web")])
        .await
        .unwrap();
    assert_eq!(out, Output::Data(json!({"kind": "Deployment", "metadata": {"name": "web"}})));
}

#[tokio::test]
async fn list_alias_passes_query_verbatim() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_oapi(&server, 200).await;

    Mock::given(method("GET"))
        .and(path("/apis/apps/v1/namespaces/prod/deployments"))
        .and(query_param("labelSelector", "app=x"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "DeploymentList", "items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build(&server).await.unwrap();
    let args = CallArgs::new()
        .namespace("prod")
        .query("labelSelector", "app=x")
        .query("limit", 5);
    let out = client.call("apis/apps/v1", "getDeployments", args).await.unwrap();
    assert_eq!(out.into_value()["kind"], "DeploymentList");
}

#[tokio::test]
async fn create_and_patch_send_content_types() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_oapi(&server, 200).await;

    let deployment = json!({"metadata": {"name": "web"}, "spec": {"replicas": 1}});
    Mock::given(method("POST"))
        .and(path("/apis/apps/v1/namespaces/default/deployments"))
        .and(header("content-type", "application/json"))
        .and(body_json(&deployment))
        .respond_with(ResponseTemplate::new(201).set_body_json(&deployment))
        .expect(1)
        .mount(&server)
        .await;

    let patch = json!({"spec": {"replicas": 3}});
    Mock::given(method("PATCH"))
        .and(path("/apis/apps/v1/namespaces/default/deployments/web"))
        .and(header("content-type", "application/strategic-merge-patch+json"))
        .and(body_json(&patch))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"spec": {"replicas": 3}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build(&server).await.unwrap();

    let config: CallArg = serde_json::to_string(&json!({ "body": deployment }))
        .unwrap()
        .parse()
        .unwrap();
    let created = client
        .invoke("apis/apps/v1", "createDeployment", &[CallArg::from("default"), config])
        .await
        .unwrap();
    assert_eq!(created, Output::Data(deployment.clone()));

    let patched = client
        .call(
            "apis/apps/v1",
            "patchDeployment",
            CallArgs::new().namespace("default").item("web").body(patch.clone()),
        )
        .await
        .unwrap();
    assert_eq!(patched.into_value()["spec"]["replicas"], 3);
}

#[tokio::test]
async fn cluster_scoped_delete_with_empty_response_returns_raw() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_oapi(&server, 200).await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/namespaces/scratch"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = build(&server).await.unwrap();
    let out = client
        .call("api/v1", "deleteNamespace", CallArgs::new().item("scratch"))
        .await
        .unwrap();
    match out {
        Output::Raw(resp) => assert_eq!(resp.status.as_u16(), 202),
        other => panic!("expected raw response, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_namespace_issues_no_request() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_oapi(&server, 200).await;

    let client = build(&server).await.unwrap();
    let before = server.received_requests().await.unwrap().len();
    let err = client.invoke("apis/apps/v1", "getDeployments", &[]).await.unwrap_err();
    assert!(matches!(err, Error::MissingNamespace));
    assert_eq!(server.received_requests().await.unwrap().len(), before);
}

#[tokio::test]
async fn server_errors_surface_to_the_caller() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_oapi(&server, 200).await;

    Mock::given(method("GET"))
        .and(path("/apis/apps/v1/namespaces/default/deployments/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"kind": "Status", "code": 404})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build(&server).await.unwrap();
    let err = client
        .invoke("apis/apps/v1", "getDeployment", &[CallArg::from("default"), CallArg::from("missing")])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn failed_resource_list_fails_construction() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_oapi(&server, 403).await;

    match build(&server).await {
        Err(Error::Discovery { path, .. }) => assert_eq!(path, "oapi/v1"),
        other => panic!("expected discovery failure, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn custom_call_and_markdown_listing() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_oapi(&server, 200).await;

    Mock::given(method("GET"))
        .and(path("/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"major": "1", "minor": "29"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build(&server).await.unwrap();
    let version = client.custom_call("get", "/version", None).await.unwrap();
    assert_eq!(version.into_value()["minor"], "29");

    let markdown = match client.get_methods(Some(MethodsFormat::Markdown)) {
        MethodListing::Markdown(markdown) => markdown,
        other => panic!("unexpected listing {:?}", other),
    };
    assert!(markdown.starts_with("### apis/apps/v1\n\n- createDeployment(namespace)\n"));
    assert!(markdown.contains("### api/v1\n\n- createNamespace()\n"));
}
