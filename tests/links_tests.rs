//! Original links, UTMs, generated short links and redirects

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::TestEnv;
use trakerbot::application::core::RequestContext;
use trakerbot::application::links::{FollowShortLink, PeekShortLink};

macro_rules! post_json {
    ($app:expr, $env:expr, $user_id:expr, $uri:expr, $body:expr $(,)?) => {{
        let req = TestRequest::post()
            .uri($uri)
            .insert_header($env.bearer($user_id))
            .set_json($body)
            .to_request();
        let value: Value = test::call_and_read_body_json(&$app, req).await;
        value
    }};
}

#[actix_rt::test]
async fn test_generate_follow_and_count_clicks() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("marketer@example.com").await;
    let app = init_app!(env);

    let original = post_json!(
        app,
        env,
        &user_id,
        "/api/links/original",
        json!({ "url": "https://bet.example.com/promo?ref=1" }),
    );
    let utm = post_json!(
        app,
        env,
        &user_id,
        "/api/utms",
        json!({ "name": "aff", "value": "tg 42", "source": "telegram", "campaign": "spring" }),
    );

    let generated = post_json!(
        app,
        env,
        &user_id,
        "/api/links",
        json!({ "originalLinkId": original["id"], "utmIds": [utm["id"], utm["id"]] }),
    );

    let new_link = generated["newLink"].as_str().unwrap();
    assert!(new_link.starts_with("https://bet.example.com/promo?ref=1&"));
    assert!(new_link.contains("aff=tg+42"));
    assert!(new_link.contains("utm_source=telegram"));
    assert!(new_link.contains("utm_campaign=spring"));
    assert!(!new_link.contains("utm_medium"));
    assert_eq!(generated["clicks"], 0);
    assert_eq!(generated["utms"].as_array().unwrap().len(), 1);

    let short = generated["shortLink"].as_str().unwrap().to_string();
    assert_eq!(short.len(), 8);
    assert_eq!(
        generated["shortUrl"],
        format!("https://trk.example.com/r/{}", short)
    );

    for _ in 0..3 {
        let resp = test::call_service(
            &app,
            TestRequest::get().uri(&format!("/r/{}", short)).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers().get("location").unwrap(), new_link);
    }

    let req = TestRequest::get()
        .uri(&format!("/api/links/{}", generated["id"].as_str().unwrap()))
        .insert_header(env.bearer(&user_id))
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["clicks"], 3);
    assert_eq!(details["utms"][0]["name"], "aff");
}

#[actix_rt::test]
async fn test_head_resolves_without_counting() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("marketer@example.com").await;
    let app = init_app!(env);

    let original = post_json!(
        app,
        env,
        &user_id,
        "/api/links/original",
        json!({ "url": "https://bet.example.com/landing" }),
    );
    let generated = post_json!(
        app,
        env,
        &user_id,
        "/api/links",
        json!({ "originalLinkId": original["id"], "utmIds": [] }),
    );
    let short = generated["shortLink"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            TestRequest::default()
                .method(actix_web::http::Method::HEAD)
                .uri(&format!("/r/{}", short))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers().get("location").unwrap(),
            "https://bet.example.com/landing"
        );
    }

    let resp = test::call_service(
        &app,
        TestRequest::default()
            .method(actix_web::http::Method::HEAD)
            .uri("/r/doesnotexist")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let stored = env
        .storage
        .find_generated_link(generated["id"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.clicks, 0);

    let peeked = env
        .mediator()
        .send(PeekShortLink { short_link: short }, &RequestContext::anonymous())
        .await
        .unwrap();
    assert_eq!(peeked.data.as_deref(), Some("https://bet.example.com/landing"));
}

#[actix_rt::test]
async fn test_unknown_and_invalid_codes_are_404() {
    let env = TestEnv::new().await;
    let app = init_app!(env);

    for uri in ["/r/doesnotexist", "/r/bad-code!"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }

    let followed = env
        .mediator()
        .send(
            FollowShortLink { short_link: "doesnotexist".to_string() },
            &RequestContext::anonymous(),
        )
        .await
        .unwrap();
    assert_eq!(followed.code, 404);
}

#[actix_rt::test]
async fn test_concurrent_redirects_do_not_lose_clicks() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("marketer@example.com").await;
    let app = init_app!(env);

    let original = post_json!(
        app,
        env,
        &user_id,
        "/api/links/original",
        json!({ "url": "https://bet.example.com/" }),
    );
    let generated = post_json!(
        app,
        env,
        &user_id,
        "/api/links",
        json!({ "originalLinkId": original["id"], "utmIds": [] }),
    );
    let short = generated["shortLink"].as_str().unwrap().to_string();

    let mediator = std::sync::Arc::new(env.mediator());
    let mut tasks = Vec::new();
    for _ in 0..10 {
        let mediator = mediator.clone();
        let short = short.clone();
        tasks.push(tokio::spawn(async move {
            mediator
                .send(FollowShortLink { short_link: short }, &RequestContext::anonymous())
                .await
                .unwrap()
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().is_success);
    }

    let stored = env
        .storage
        .find_generated_link(generated["id"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.clicks, 10);
}

#[actix_rt::test]
async fn test_links_are_scoped_to_owner() {
    let env = TestEnv::new().await;
    let owner = env.create_user("owner@example.com").await;
    let intruder = env.create_user("intruder@example.com").await;
    let app = init_app!(env);

    let original = post_json!(
        app,
        env,
        &owner,
        "/api/links/original",
        json!({ "url": "https://bet.example.com/" }),
    );
    let owner_utm = post_json!(
        app,
        env,
        &owner,
        "/api/utms",
        json!({ "name": "src", "value": "x" }),
    );
    let generated = post_json!(
        app,
        env,
        &owner,
        "/api/links",
        json!({ "originalLinkId": original["id"], "utmIds": [owner_utm["id"]] }),
    );
    let link_id = generated["id"].as_str().unwrap();

    // someone else's original link reads as missing
    let req = TestRequest::post()
        .uri("/api/links")
        .insert_header(env.bearer(&intruder))
        .set_json(json!({ "originalLinkId": original["id"], "utmIds": [] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // someone else's UTM on an own link is rejected
    let own_original = post_json!(
        app,
        env,
        &intruder,
        "/api/links/original",
        json!({ "url": "https://other.example.com/" }),
    );
    let req = TestRequest::post()
        .uri("/api/links")
        .insert_header(env.bearer(&intruder))
        .set_json(json!({ "originalLinkId": own_original["id"], "utmIds": [owner_utm["id"]] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "One or more UTMs were not found");

    for req in [
        TestRequest::get().uri(&format!("/api/links/{}", link_id)),
        TestRequest::delete().uri(&format!("/api/links/{}", link_id)),
    ] {
        let resp = test::call_service(&app, req.insert_header(env.bearer(&intruder)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let req = TestRequest::get()
        .uri("/api/links")
        .insert_header(env.bearer(&intruder))
        .to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());

    let req = TestRequest::delete()
        .uri(&format!("/api/links/{}", link_id))
        .insert_header(env.bearer(&owner))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn test_original_link_must_be_http_url() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("marketer@example.com").await;
    let app = init_app!(env);

    let req = TestRequest::post()
        .uri("/api/links/original")
        .insert_header(env.bearer(&user_id))
        .set_json(json!({ "url": "not a url" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["errors"]["url"],
        json!(["URL must be a valid http(s) URL"])
    );
}

#[actix_rt::test]
async fn test_deleting_utm_removes_it_from_links() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("marketer@example.com").await;
    let app = init_app!(env);

    let original = post_json!(
        app,
        env,
        &user_id,
        "/api/links/original",
        json!({ "url": "https://bet.example.com/" }),
    );
    let utm = post_json!(app, env, &user_id, "/api/utms", json!({ "name": "a", "value": "b" }));
    let generated = post_json!(
        app,
        env,
        &user_id,
        "/api/links",
        json!({ "originalLinkId": original["id"], "utmIds": [utm["id"]] }),
    );

    let req = TestRequest::delete()
        .uri(&format!("/api/utms/{}", utm["id"].as_str().unwrap()))
        .insert_header(env.bearer(&user_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = TestRequest::get()
        .uri(&format!("/api/links/{}", generated["id"].as_str().unwrap()))
        .insert_header(env.bearer(&user_id))
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert!(details["utms"].as_array().unwrap().is_empty());
    // the tagged URL was fixed at generation time
    assert!(details["newLink"].as_str().unwrap().contains("a=b"));
}
