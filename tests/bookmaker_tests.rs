//! Bookmaker use cases through the mediator and over HTTP

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::TestEnv;
use trakerbot::application::bookmakers::{
    CreateBookmaker, CreateBookmakerDto, DeleteBookmaker, GetBookmaker, GetBookmakerByName,
    SearchBookmakers, UploadBookmakerLogo,
};
use trakerbot::application::core::RequestContext;
use trakerbot::errors::TrakerError;
use trakerbot::services::PhotoUpload;

fn create(name: &str) -> CreateBookmaker {
    CreateBookmaker {
        dto: CreateBookmakerDto {
            name: name.to_string(),
            logo_url: None,
        },
    }
}

#[actix_rt::test]
async fn test_created_bookmaker_is_found_by_new_id() {
    let env = TestEnv::new().await;
    let mediator = env.mediator();
    let ctx = RequestContext::anonymous();

    for name in ["Bet365", "  Padded Name ", "Ünïcödé Bets"] {
        let created = mediator.send(create(name), &ctx).await.unwrap();
        assert!(created.is_success);
        let id = created.data.expect("new id");

        let found = mediator
            .send(GetBookmaker { id: id.clone() }, &ctx)
            .await
            .unwrap();
        let bookmaker = found.data.expect("bookmaker");
        assert_eq!(bookmaker.id, id);
        assert_eq!(bookmaker.name, name);
    }
}

#[actix_rt::test]
async fn test_empty_name_never_reaches_handler() {
    let env = TestEnv::new().await;
    let mediator = env.mediator();

    for name in ["", "   "] {
        let err = mediator
            .send(create(name), &RequestContext::anonymous())
            .await
            .unwrap_err();

        let TrakerError::Validation(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some(&["Name is required".to_string()][..]));
    }

    assert!(env.storage.list_bookmakers().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_long_name_has_one_max_length_error() {
    let env = TestEnv::new().await;
    let err = env
        .mediator()
        .send(create(&"x".repeat(101)), &RequestContext::anonymous())
        .await
        .unwrap_err();

    let TrakerError::Validation(errors) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(
        errors.get("name"),
        Some(&["Name must not exceed 100 characters".to_string()][..])
    );

    // exactly at the limit is fine
    let ok = env
        .mediator()
        .send(create(&"x".repeat(100)), &RequestContext::anonymous())
        .await
        .unwrap();
    assert!(ok.is_success);
}

#[actix_rt::test]
async fn test_duplicate_name_fails_at_persistence() {
    let env = TestEnv::new().await;
    let mediator = env.mediator();
    let ctx = RequestContext::anonymous();

    assert!(mediator.send(create("Betano"), &ctx).await.unwrap().is_success);

    let second = mediator.send(create("Betano"), &ctx).await.unwrap();
    assert!(!second.is_success);
    assert_eq!(second.code, 400);
    assert!(second.error.unwrap().contains("Betano"));
    assert_eq!(env.storage.list_bookmakers().await.unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_lookup_by_name_ignores_case_and_search_matches_substring() {
    let env = TestEnv::new().await;
    let mediator = env.mediator();
    let ctx = RequestContext::anonymous();
    mediator.send(create("Sportingbet"), &ctx).await.unwrap();
    mediator.send(create("Betfair"), &ctx).await.unwrap();

    let found = mediator
        .send(GetBookmakerByName { name: "SPORTINGBET".to_string() }, &ctx)
        .await
        .unwrap();
    assert_eq!(found.data.unwrap().name, "Sportingbet");

    let missing = mediator
        .send(GetBookmakerByName { name: "Pinnacle".to_string() }, &ctx)
        .await
        .unwrap();
    assert_eq!(missing.code, 404);

    let hits = mediator
        .send(SearchBookmakers { query: "bet".to_string() }, &ctx)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(hits.len(), 2);
}

#[actix_rt::test]
async fn test_search_treats_wildcards_literally() {
    let env = TestEnv::new().await;
    let mediator = env.mediator();
    let ctx = RequestContext::anonymous();
    for name in ["100% Bet", "Bet_365", "Betway"] {
        mediator.send(create(name), &ctx).await.unwrap();
    }

    let search = |query: &str| SearchBookmakers { query: query.to_string() };

    let percent = mediator.send(search("%"), &ctx).await.unwrap().data.unwrap();
    let names: Vec<_> = percent.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["100% Bet"]);

    let underscore = mediator.send(search("_"), &ctx).await.unwrap().data.unwrap();
    let names: Vec<_> = underscore.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Bet_365"]);

    let all = mediator.send(search("bet"), &ctx).await.unwrap().data.unwrap();
    assert_eq!(all.len(), 3);
}

#[actix_rt::test]
async fn test_logo_upload_replaces_previous_logo() {
    let env = TestEnv::new().await;
    let mediator = env.mediator();
    let ctx = RequestContext::anonymous();
    let id = mediator.send(create("Stake"), &ctx).await.unwrap().data.unwrap();

    let upload = |name: &str| UploadBookmakerLogo {
        id: id.clone(),
        file: PhotoUpload {
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            filename: name.to_string(),
        },
    };

    let first = mediator.send(upload("a.png"), &ctx).await.unwrap().data.unwrap();
    let second = mediator.send(upload("b.png"), &ctx).await.unwrap().data.unwrap();
    assert_ne!(first.public_id, second.public_id);

    let stored = env.storage.find_bookmaker(&id).await.unwrap().unwrap();
    assert_eq!(stored.logo_url.as_deref(), Some(second.url.as_str()));
    assert_eq!(*env.photos.deleted.lock().unwrap(), vec![first.public_id.clone()]);

    // deleting the bookmaker also removes the current logo
    let deleted = mediator.send(DeleteBookmaker { id: id.clone() }, &ctx).await.unwrap();
    assert!(deleted.is_success);
    assert!(env.photos.deleted.lock().unwrap().contains(&second.public_id));
}

#[actix_rt::test]
async fn test_logo_replacement_survives_failed_cleanup() {
    let env = TestEnv::new().await;
    let mediator = env.mediator();
    let ctx = RequestContext::anonymous();
    let id = mediator.send(create("Parimatch"), &ctx).await.unwrap().data.unwrap();

    let upload = || UploadBookmakerLogo {
        id: id.clone(),
        file: PhotoUpload {
            bytes: vec![1, 2, 3],
            filename: "logo.png".to_string(),
        },
    };

    mediator.send(upload(), &ctx).await.unwrap();
    env.photos.fail_deletes();

    let replaced = mediator.send(upload(), &ctx).await.unwrap();
    assert!(replaced.is_success);
    let current = replaced.data.unwrap();

    let stored = env.storage.find_bookmaker(&id).await.unwrap().unwrap();
    assert_eq!(stored.logo_url.as_deref(), Some(current.url.as_str()));
    assert_eq!(stored.logo_public_id.as_deref(), Some(current.public_id.as_str()));
}

#[actix_rt::test]
async fn test_bookmaker_http_round_trip() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("punter@example.com").await;
    let app = init_app!(env);

    let req = TestRequest::post()
        .uri("/api/bookmakers")
        .insert_header(env.bearer(&user_id))
        .set_json(json!({ "name": "Betway", "logoUrl": "https://cdn.example.com/betway.png" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let id: String = test::read_body_json(resp).await;

    let req = TestRequest::get()
        .uri(&format!("/api/bookmakers/{}", id))
        .insert_header(env.bearer(&user_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "Betway");
    assert_eq!(body["logoUrl"], "https://cdn.example.com/betway.png");

    let req = TestRequest::put()
        .uri(&format!("/api/bookmakers/{}", id))
        .insert_header(env.bearer(&user_id))
        .set_json(json!({ "name": "Betway BR" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = TestRequest::get()
        .uri("/api/bookmakers/name/betway%20br")
        .insert_header(env.bearer(&user_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::delete()
        .uri(&format!("/api/bookmakers/{}", id))
        .insert_header(env.bearer(&user_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = TestRequest::get()
        .uri(&format!("/api/bookmakers/{}", id))
        .insert_header(env.bearer(&user_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(test::read_body(resp).await.is_empty());
}

#[actix_rt::test]
async fn test_http_validation_problem_document() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("punter@example.com").await;
    let app = init_app!(env);

    let req = TestRequest::post()
        .uri("/api/bookmakers")
        .insert_header(env.bearer(&user_id))
        .set_json(json!({ "name": "", "logoUrl": "javascript:alert(1)" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["type"], "ValidationFluent");
    assert_eq!(body["title"], "Validation error");
    assert_eq!(body["status"], 400);
    assert_eq!(body["errors"]["name"], json!(["Name is required"]));
    assert_eq!(body["errors"]["logoUrl"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_duplicate_name_over_http_is_400_text() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("punter@example.com").await;
    let app = init_app!(env);

    for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
        let req = TestRequest::post()
            .uri("/api/bookmakers")
            .insert_header(env.bearer(&user_id))
            .set_json(json!({ "name": "KTO" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), expected);
    }
}

#[actix_rt::test]
async fn test_affiliate_codes_cascade_with_bookmaker() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("affiliate@example.com").await;
    let app = init_app!(env);

    let req = TestRequest::post()
        .uri("/api/bookmakers")
        .insert_header(env.bearer(&user_id))
        .set_json(json!({ "name": "Novibet" }))
        .to_request();
    let bookmaker_id: String = test::call_and_read_body_json(&app, req).await;

    let req = TestRequest::post()
        .uri(&format!("/api/bookmakers/{}/affiliate-codes", bookmaker_id))
        .insert_header(env.bearer(&user_id))
        .set_json(json!({ "code": "AFF-2024" }))
        .to_request();
    let code: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(code["code"], "AFF-2024");
    assert_eq!(code["userId"], user_id.as_str());

    let req = TestRequest::get()
        .uri("/api/affiliate-codes")
        .insert_header(env.bearer(&user_id))
        .to_request();
    let mine: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(mine.len(), 1);

    let req = TestRequest::delete()
        .uri(&format!("/api/bookmakers/{}", bookmaker_id))
        .insert_header(env.bearer(&user_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    assert!(
        env.storage
            .list_affiliate_codes_for_user(&user_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[actix_rt::test]
async fn test_affiliate_code_for_missing_bookmaker_is_404() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("affiliate@example.com").await;
    let app = init_app!(env);

    let req = TestRequest::post()
        .uri("/api/bookmakers/does-not-exist/affiliate-codes")
        .insert_header(env.bearer(&user_id))
        .set_json(json!({ "code": "AFF-1" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
