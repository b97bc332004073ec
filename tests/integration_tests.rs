use actix_web::{http::StatusCode, test, web};
use citeplasm_api::{
    AuthConfig, InMemoryStore, KeyValueStore, MessageError, MessageSuccess, ObjectMapper, Router,
    SignatureVerifier, build_router, create_app, create_signature, fixtures,
    handlers::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    handler_fn,
    models::Provider,
};
use std::sync::Arc;

const DATE: &str = "Sun, 18 Oct 2026 10:00:00 UTC";

/// Build the production route table over an in-memory store seeded with fixtures
async fn seeded_router() -> web::Data<Router> {
    let mapper = ObjectMapper::new(Arc::new(InMemoryStore::new()));
    fixtures::flush_store(&mapper).await.unwrap();
    fixtures::load_fixtures(&mapper).await.unwrap();

    let verifier = SignatureVerifier::from_config(&AuthConfig::default());
    web::Data::new(build_router(mapper, verifier).expect("routes should compile"))
}

fn signed_get(uri: &str) -> test::TestRequest {
    let signature = create_signature("password", "GET", b"", DATE, uri).unwrap();
    test::TestRequest::get()
        .uri(uri)
        .insert_header(("Date", DATE))
        .insert_header(("Authorization", format!("GDS username:{signature}")))
}

/// Integration test for the versioned root listing
///
/// `GET /v1.0` is public and lists the two top-level resources.
#[actix_web::test]
async fn test_version_root_lists_resources() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    let req = test::TestRequest::get().uri("/v1.0").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK, "Expected 200 OK status");
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(
        content_type.contains("application/json"),
        "Expected JSON content type, got: {}",
        content_type
    );

    let body = test::read_body(resp).await;
    let msg: MessageSuccess = serde_json::from_slice(&body).expect("Failed to parse response");
    assert_eq!(msg.msg, "success");
    assert_eq!(msg.results.len(), 2);
    assert_eq!(msg.results[0].uri, "/v1.0/providers");
    assert_eq!(msg.results[1].uri, "/v1.0/resources");
}

#[actix_web::test]
async fn test_bare_root_redirects_to_current_version() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(resp.headers().get("location").unwrap(), "/v1.0");
}

/// Unknown paths and known paths under the wrong method both get the 404 envelope
#[actix_web::test]
async fn test_unmatched_requests_get_404_envelope() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    let requests = [
        test::TestRequest::get().uri("/v2.0").to_request(),
        test::TestRequest::get().uri("/v1.0/users").to_request(),
        test::TestRequest::post().uri("/v1.0").to_request(),
        test::TestRequest::delete().uri("/v1.0/providers").to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": 404, "msg": "Resource does not exist."})
        );
    }
}

#[actix_web::test]
async fn test_providers_without_authorization_is_401() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    let req = test::TestRequest::get()
        .uri("/v1.0/providers")
        .insert_header(("Date", DATE))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let challenge = resp.headers().get("www-authenticate").unwrap();
    assert_eq!(challenge, "GDS realm=\"http://api.citeplasm.com/v1.0\"");

    let body = test::read_body(resp).await;
    let msg: MessageError = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg.code, 401);
    assert_eq!(msg.msg, "You must authenticate prior to accessing this resource.");
}

/// Three fixture providers are listed for a correctly signed request
#[actix_web::test]
async fn test_signed_request_lists_fixture_providers() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    let resp = test::call_service(&app, signed_get("/v1.0/providers").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let msg: MessageSuccess = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg.msg, "success");
    assert_eq!(msg.results.len(), 3);

    let labels: Vec<_> = msg.results.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["National Library of Medicine", "FactCheck.org", "OpenLibrary.org"]
    );
    assert_eq!(msg.results[0].uri, "/v1.0/providers/1001");
}

/// The signature covers the path only, so paging parameters need no re-signing
#[actix_web::test]
async fn test_provider_paging_parameters() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    let signature = create_signature("password", "GET", b"", DATE, "/v1.0/providers").unwrap();
    let req = test::TestRequest::get()
        .uri("/v1.0/providers?offset=1&limit=1")
        .insert_header(("Date", DATE))
        .insert_header(("Authorization", format!("GDS username:{signature}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let msg: MessageSuccess = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg.results.len(), 1);
    assert_eq!(msg.results[0].label, "FactCheck.org");

    let req = test::TestRequest::get()
        .uri("/v1.0/providers?limit=lots")
        .insert_header(("Date", DATE))
        .insert_header(("Authorization", format!("GDS username:{signature}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    let msg: MessageError = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg.code, 400);
}

/// A malformed index entry fails the request with a generic 500 envelope
/// while the server keeps answering other requests.
#[actix_web::test]
async fn test_corrupt_index_is_a_generic_500() {
    let store = InMemoryStore::new();
    let mapper = ObjectMapper::new(Arc::new(store.clone()));
    fixtures::load_fixtures(&mapper).await.unwrap();
    store.list_push("idx:Provider", "corrupt-entry").await.unwrap();

    let verifier = SignatureVerifier::from_config(&AuthConfig::default());
    let router = build_router(mapper, verifier).unwrap();
    let app = test::init_service(create_app(web::Data::new(router))).await;

    let resp = test::call_service(&app, signed_get("/v1.0/providers").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    let msg: MessageError = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg, MessageError::new(500, "Internal server error."));
    assert!(!String::from_utf8_lossy(&body).contains("corrupt-entry"));

    let req = test::TestRequest::get().uri("/v1.0").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_request_id_is_generated_or_echoed() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    let req = test::TestRequest::get().uri("/v1.0").to_request();
    let resp = test::call_service(&app, req).await;
    let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());

    let req = test::TestRequest::get()
        .uri("/nope")
        .insert_header(("X-Request-ID", "trace-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-123");
}

/// Routes registered on a custom router are served through the same app factory
#[actix_web::test]
async fn test_custom_router_is_served_by_app_factory() {
    let mut router = Router::new();
    router
        .get(
            "/echo/(\\w+)",
            handler_fn(|ctx, captures| ctx.write(captures[0].as_bytes())),
        )
        .unwrap();

    let app = test::init_service(create_app(web::Data::new(router))).await;
    let req = test::TestRequest::get().uri("/echo/hello").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "hello");
}

/// Sign over the path alone and send the request to `uri`, which may carry a query
fn signed_get_for_path(uri: &str, path: &str) -> test::TestRequest {
    let signature = create_signature("password", "GET", b"", DATE, path).unwrap();
    test::TestRequest::get()
        .uri(uri)
        .insert_header(("Date", DATE))
        .insert_header(("Authorization", format!("GDS username:{signature}")))
}

/// Offsets beyond any index position return an empty page instead of wrapping
#[actix_web::test]
async fn test_provider_offset_past_index_range_is_empty() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    for offset in ["18446744073709551615", "9223372036854775807"] {
        let uri = format!("/v1.0/providers?offset={offset}&limit=1");
        let req = signed_get_for_path(&uri, "/v1.0/providers").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "offset: {offset}");

        let body = test::read_body(resp).await;
        let msg: MessageSuccess = serde_json::from_slice(&body).unwrap();
        assert!(msg.results.is_empty(), "offset: {offset}");
    }

    let req = signed_get_for_path("/v1.0/providers?offset=-1", "/v1.0/providers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

/// A requested page size above the cap is clamped to 100 providers
#[actix_web::test]
async fn test_provider_limit_is_capped() {
    let mapper = ObjectMapper::new(Arc::new(InMemoryStore::new()));
    fixtures::load_fixtures(&mapper).await.unwrap();
    for n in 0..120 {
        let provider = Provider::create(&mapper, &format!("Provider {n}")).await.unwrap();
        mapper.save(&[&provider]).await.unwrap();
    }
    let verifier = SignatureVerifier::from_config(&AuthConfig::default());
    let router = web::Data::new(build_router(mapper, verifier).unwrap());
    let app = test::init_service(create_app(router)).await;

    let req = signed_get_for_path("/v1.0/providers?limit=1000", "/v1.0/providers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let msg: MessageSuccess = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg.results.len(), MAX_PAGE_SIZE);

    let req = signed_get_for_path("/v1.0/providers", "/v1.0/providers").to_request();
    let resp = test::call_service(&app, req).await;
    let body = test::read_body(resp).await;
    let msg: MessageSuccess = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg.results.len(), DEFAULT_PAGE_SIZE);
}

/// Percent-encoded paths are decoded before routing and signing
#[actix_web::test]
async fn test_percent_encoded_path_is_routed_and_signed_decoded() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    let req = test::TestRequest::get().uri("/v1%2E0").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let msg: MessageSuccess = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg.results.len(), 2);

    let req = signed_get_for_path("/v1.0/provider%73", "/v1.0/providers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let msg: MessageSuccess = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg.results.len(), 3);
}

/// Oversized bodies on unmatched routes still get the 404 envelope
#[actix_web::test]
async fn test_large_body_on_unknown_route_is_404_envelope() {
    let app = test::init_service(create_app(seeded_router().await)).await;

    let req = test::TestRequest::post()
        .uri("/v1.0/texts")
        .set_payload(vec![b'a'; 300 * 1024])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/json");
    let body = test::read_body(resp).await;
    let msg: MessageError = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg, MessageError::new(404, "Resource does not exist."));
}

/// Matched routes read the body up to the limit and answer 413 JSON beyond it
#[actix_web::test]
async fn test_body_limit_on_matched_route() {
    let mut router = Router::new();
    router
        .post(
            "/v1\\.0/texts",
            handler_fn(|ctx, _| {
                let len = ctx.body().len().to_string();
                ctx.write(len.as_bytes());
            }),
        )
        .unwrap();
    let app = test::init_service(create_app(web::Data::new(router))).await;

    let req = test::TestRequest::post()
        .uri("/v1.0/texts")
        .set_payload(vec![b'a'; 1024])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "1024");

    let req = test::TestRequest::post()
        .uri("/v1.0/texts")
        .set_payload(vec![b'a'; 300 * 1024])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/json");
    let body = test::read_body(resp).await;
    let msg: MessageError = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg, MessageError::new(413, "Request body is too large."));
}

#[actix_web::test]
async fn test_configured_body_limit_applies() {
    let mut router = Router::new().with_body_limit(16);
    router
        .post("/upload", handler_fn(|ctx, _| ctx.write(b"ok")))
        .unwrap();
    let app = test::init_service(create_app(web::Data::new(router))).await;

    let req = test::TestRequest::post()
        .uri("/upload")
        .set_payload(vec![b'a'; 17])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
