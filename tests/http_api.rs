//! End-to-end tests driving the portal router against an in-memory
//! database.

use std::{sync::Arc, time::Duration};

use argon2::Argon2;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{
    RunQueryDsl,
    pooled_connection::{AsyncDieselConnectionManager, bb8::Pool},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use grantes::{
    db::{self, DbConnection, run_migrations},
    models::NewAdmin,
    passwords::hash_password,
    routes::{AppState, router},
};

async fn test_state() -> Arc<AppState> {
    let manager = AsyncDieselConnectionManager::<DbConnection>::new(":memory:");
    let pool = Pool::builder()
        .max_size(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .build(manager)
        .await
        .expect("failed to build pool");
    {
        let mut conn = pool.get().await.expect("failed to get connection");
        run_migrations(&mut conn).await.expect("failed to apply migrations");
    }
    Arc::new(AppState::new(pool, Arc::new(Argon2::default())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(payload) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(payload.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("failed to build request");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("failed to drive request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response was not JSON")
    };
    (status, value)
}

fn register_payload(email: &str, student_id: &str, award_number: &str) -> Value {
    json!({
        "firstName": "Juan",
        "lastName": "Dela Cruz",
        "studentId": student_id,
        "email": email,
        "password": "s3cret!",
        "department": "Engineering",
        "course": "BSCE",
        "year": "2nd Year",
        "awardNumber": award_number,
        "place": "Iloilo",
        "isIndigenous": false,
        "isPwd": false,
    })
}

#[tokio::test]
async fn feed_scenario_save_like_comment() {
    let state = test_state().await;
    let app = router(state);

    let (status, saved) = send(
        &app,
        "POST",
        "/api/save_post",
        Some(json!({"content": "Hello", "audience": "students"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["success"], true);
    let post_id = saved["id"].as_i64().expect("post id");

    let (status, listed) = send(&app, "GET", "/api/get_posts?audience=students", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["count"], 1);
    let post = &listed["posts"][0];
    assert_eq!(post["content"], "Hello");
    assert_eq!(post["likes"], 0);
    assert_eq!(post["comments"], json!([]));
    assert_eq!(post["comments_count"], 0);
    assert_eq!(post["created_at"], post["timestamp"]);

    let (status, liked) = send(
        &app,
        "POST",
        "/api/update_post_engagement",
        Some(json!({"postId": post_id, "action": "like"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["success"], true);
    assert_eq!(liked["likes"], 1);

    let (status, commented) = send(
        &app,
        "POST",
        "/api/update_post_engagement",
        Some(json!({"postId": post_id, "action": "comment", "comment": "Nice!", "author": "Jane"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(commented["success"], true);
    assert_eq!(commented["comments_count"], 1);
    assert_eq!(commented["comment"]["content"], "Nice!");
    assert_eq!(commented["comment"]["text"], "Nice!");
    assert_eq!(commented["comment"]["author"], "Jane");

    let (_, listed) = send(&app, "GET", "/api/get_posts?audience=students", None).await;
    let post = &listed["posts"][0];
    assert_eq!(post["comments_count"], 1);
    assert_eq!(post["comments"][0]["content"], "Nice!");
    assert_eq!(post["comments"][0]["author"], "Jane");
    assert_eq!(post["likes"], 1);
}

#[tokio::test]
async fn sequential_likes_accumulate_without_dedup() {
    let state = test_state().await;
    let app = router(state);
    let (_, saved) = send(
        &app,
        "POST",
        "/api/save_post",
        Some(json!({"content": "Count me", "audience": "home"})),
    )
    .await;
    let post_id = saved["id"].as_i64().expect("post id");

    for expected in 1..=4 {
        let (status, liked) = send(
            &app,
            "POST",
            "/api/update_post_engagement",
            Some(json!({"postId": post_id, "action": "like"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(liked["likes"], expected);
    }
}

#[tokio::test]
async fn engagement_error_taxonomy_is_distinguishable() {
    let state = test_state().await;
    let app = router(state);

    let (status, body) = send(
        &app,
        "POST",
        "/api/update_post_engagement",
        Some(json!({"postId": 12345, "action": "like"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "not_found");

    let (_, saved) = send(
        &app,
        "POST",
        "/api/save_post",
        Some(json!({"content": "target"})),
    )
    .await;
    let post_id = saved["id"].as_i64().expect("post id");

    let (status, body) = send(
        &app,
        "POST",
        "/api/update_post_engagement",
        Some(json!({"postId": post_id, "action": "boost"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_action");

    let (status, body) = send(
        &app,
        "POST",
        "/api/update_post_engagement",
        Some(json!({"action": "like"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn share_counter_tracks_separately() {
    let state = test_state().await;
    let app = router(state);
    let (_, saved) = send(
        &app,
        "POST",
        "/api/save_post",
        Some(json!({"content": "share me"})),
    )
    .await;
    let post_id = saved["id"].as_i64().expect("post id");

    let (status, shared) = send(
        &app,
        "POST",
        "/api/update_post_engagement",
        Some(json!({"postId": post_id, "action": "share"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shared["shares"], 1);

    let (_, liked) = send(
        &app,
        "POST",
        "/api/update_post_engagement",
        Some(json!({"postId": post_id, "action": "like"})),
    )
    .await;
    assert_eq!(liked["likes"], 1);
}

#[tokio::test]
async fn delete_post_removes_it_from_reads() {
    let state = test_state().await;
    let app = router(state);
    let (_, saved) = send(
        &app,
        "POST",
        "/api/save_post",
        Some(json!({"content": "ephemeral"})),
    )
    .await;
    let post_id = saved["id"].as_i64().expect("post id");

    let (status, deleted) = send(
        &app,
        "POST",
        "/api/delete_post",
        Some(json!({"postId": post_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], true);

    let (_, listed) = send(&app, "GET", "/api/get_posts", None).await;
    assert_eq!(listed["count"], 0);

    let (status, body) = send(
        &app,
        "POST",
        "/api/delete_post",
        Some(json!({"postId": post_id})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn legacy_rows_normalise_on_read() {
    let state = test_state().await;
    {
        use grantes::schema::posts::dsl as p;
        let mut conn = state.pool.get().await.expect("connection");
        let stamp = NaiveDate::from_ymd_opt(2023, 11, 20)
            .and_then(|d| d.and_hms_opt(7, 45, 0))
            .expect("valid instant");
        diesel::insert_into(p::posts)
            .values((
                p::content.eq("Imported announcement"),
                p::kind.eq("media"),
                p::audience.eq("students"),
                p::layout.eq("image-left"),
                p::images.eq(r#"["[\"inner.png\"]", "plain.png"]"#),
                p::author.eq("Administrator"),
                p::likes.eq(5),
                p::shares.eq(0),
                p::legacy_timestamp.eq(stamp),
                p::legacy_comments.eq("3"),
            ))
            .execute(&mut conn)
            .await
            .expect("failed to seed legacy row");
    }
    let app = router(state);

    let (status, listed) = send(&app, "GET", "/api/get_posts?audience=students", None).await;
    assert_eq!(status, StatusCode::OK);
    let post = &listed["posts"][0];
    // double-encoded entry resolves to the inner reference
    assert_eq!(post["images"], json!(["inner.png", "plain.png"]));
    // numeric blob is a count with no bodies
    assert_eq!(post["comments_count"], 3);
    assert_eq!(post["comments"], json!([]));
    // missing created_at falls back to the legacy timestamp column
    assert_eq!(post["created_at"], "2023-11-20 07:45:00");
    assert_eq!(post["timestamp"], "2023-11-20 07:45:00");
    assert_eq!(post["likes"], 5);
}

#[tokio::test]
async fn legacy_comment_blob_merges_before_new_comments() {
    let state = test_state().await;
    {
        use grantes::schema::posts::dsl as p;
        let mut conn = state.pool.get().await.expect("connection");
        diesel::insert_into(p::posts)
            .values((
                p::content.eq("Imported with comments"),
                p::kind.eq("text"),
                p::audience.eq("students"),
                p::layout.eq("image-left"),
                p::author.eq("Administrator"),
                p::likes.eq(0),
                p::shares.eq(0),
                p::legacy_comments
                    .eq(r#"[{"id":"17001","author":"Old","content":"first","text":"first"}]"#),
            ))
            .execute(&mut conn)
            .await
            .expect("failed to seed legacy row");
    }
    let app = router(state);

    let (_, listed) = send(&app, "GET", "/api/get_posts", None).await;
    let post_id = listed["posts"][0]["id"].as_i64().expect("post id");
    assert_eq!(listed["posts"][0]["comments_count"], 1);

    let (_, commented) = send(
        &app,
        "POST",
        "/api/update_post_engagement",
        Some(json!({"postId": post_id, "action": "comment", "comment": "second", "author": "New"})),
    )
    .await;
    assert_eq!(commented["comments_count"], 2);

    let (_, listed) = send(&app, "GET", "/api/get_posts", None).await;
    let post = &listed["posts"][0];
    assert_eq!(post["comments_count"], 2);
    assert_eq!(post["comments"][0]["author"], "Old");
    assert_eq!(post["comments"][1]["author"], "New");
}

#[tokio::test]
async fn register_rejects_duplicates_without_inserting() {
    let state = test_state().await;
    let app = router(state);

    let (status, first) = send(
        &app,
        "POST",
        "/api/register",
        Some(register_payload("a@b.com", "2021-0001", "AW-1")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);

    let (status, dup_email) = send(
        &app,
        "POST",
        "/api/register",
        Some(register_payload("a@b.com", "2021-0002", "AW-2")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup_email["code"], "duplicate_entity");
    assert_eq!(dup_email["message"], "Email already exists");

    let (status, dup_sid) = send(
        &app,
        "POST",
        "/api/register",
        Some(register_payload("c@d.com", "2021-0001", "AW-2")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup_sid["message"], "Student ID already exists");

    let (_, listed) = send(&app, "GET", "/api/get_students", None).await;
    assert_eq!(listed["count"], 1);
}

#[tokio::test]
async fn login_verifies_hashed_credentials() {
    let state = test_state().await;
    {
        let hashed = hash_password(&Argon2::default(), "adminpass").expect("hash");
        let mut conn = state.pool.get().await.expect("connection");
        db::create_admin(
            &mut conn,
            &NewAdmin {
                email: "admin@grantes.edu",
                password: &hashed,
                created_at: Utc::now().naive_utc(),
            },
        )
        .await
        .expect("failed to create admin");
    }
    let app = router(state);

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"role": "admin", "email": "admin@grantes.edu", "password": "adminpass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "admin");
    assert_eq!(body["user"]["role"], "admin");

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"role": "admin", "email": "admin@grantes.edu", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (_, registered) = send(
        &app,
        "POST",
        "/api/register",
        Some(register_payload("a@b.com", "2021-0001", "AW-1")),
    )
    .await;
    assert_eq!(registered["success"], true);

    // any of the three identifiers logs the student in
    for identifier in ["a@b.com", "2021-0001", "AW-1"] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/login",
            Some(json!({"role": "student", "identifier": identifier, "password": "s3cret!"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "student");
        assert_eq!(body["user"]["studentData"]["firstName"], "Juan");
        assert_eq!(body["user"]["studentData"]["department"], "Engineering");
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"role": "student", "identifier": "missing", "password": "s3cret!"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");
}

#[tokio::test]
async fn student_password_change_round_trips() {
    let state = test_state().await;
    let app = router(state);
    send(
        &app,
        "POST",
        "/api/register",
        Some(register_payload("a@b.com", "2021-0001", "AW-1")),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/update_student_password",
        Some(json!({"email": "a@b.com", "currentPassword": "s3cret!", "newPassword": "n3wpass!"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"role": "student", "identifier": "a@b.com", "password": "n3wpass!"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/update_student_password",
        Some(json!({"email": "a@b.com", "currentPassword": "stale", "newPassword": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn archive_and_delete_student_lifecycle() {
    let state = test_state().await;
    let app = router(state);
    let (_, registered) = send(
        &app,
        "POST",
        "/api/register",
        Some(register_payload("a@b.com", "2021-0001", "AW-1")),
    )
    .await;
    let student_id = registered["id"].as_i64().expect("student id");

    let (status, archived) = send(
        &app,
        "POST",
        "/api/archive_student",
        Some(json!({"id": student_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["message"], "Student archived successfully");

    let (_, listed) = send(&app, "GET", "/api/get_students", None).await;
    assert_eq!(listed["students"][0]["status"], "archived");
    assert_eq!(listed["students"][0]["student_status"], "archived");

    let (_, restored) = send(
        &app,
        "POST",
        "/api/archive_student",
        Some(json!({"id": student_id, "status": "active"})),
    )
    .await;
    assert_eq!(restored["message"], "Student restored successfully");

    let (status, _) = send(
        &app,
        "POST",
        "/api/delete_student",
        Some(json!({"id": student_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, listed) = send(&app, "GET", "/api/get_students", None).await;
    assert_eq!(listed["count"], 0);
}

#[tokio::test]
async fn search_students_matches_partial_fields() {
    let state = test_state().await;
    let app = router(state);
    send(
        &app,
        "POST",
        "/api/register",
        Some(register_payload("a@b.com", "2021-0001", "AW-1")),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/register",
        Some(json!({
            "firstName": "Maria",
            "lastName": "Santos",
            "studentId": "2021-0002",
            "email": "maria@b.com",
            "password": "s3cret!",
            "awardNumber": "AW-2",
        })),
    )
    .await;

    let (status, found) = send(&app, "GET", "/api/search_students?query=Maria", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["students"].as_array().map(Vec::len), Some(1));
    assert_eq!(found["students"][0]["firstName"], "Maria");

    let (_, found) = send(&app, "GET", "/api/search_students?query=2021-", None).await;
    assert_eq!(found["students"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn messages_flow_between_admin_and_student() {
    let state = test_state().await;
    let app = router(state);

    let (status, body) = send(&app, "GET", "/api/get_messages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"], json!([]));

    let (status, sent) = send(
        &app,
        "POST",
        "/api/save_message",
        Some(json!({
            "senderId": 1, "senderType": "admin",
            "receiverId": 7, "receiverType": "student",
            "content": "Hello student",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["success"], true);

    send(
        &app,
        "POST",
        "/api/save_message",
        Some(json!({
            "senderId": 7, "senderType": "student",
            "receiverId": 1, "receiverType": "admin",
            "content": "Hello admin",
        })),
    )
    .await;

    let uri = "/api/get_messages?userId=1&userType=admin&receiverId=7&receiverType=student";
    let (status, thread) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = thread["messages"].as_array().expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "Hello student");
    assert_eq!(messages[0]["readStatus"], false);
    assert_eq!(messages[1]["senderType"], "student");

    let (status, body) = send(
        &app,
        "POST",
        "/api/save_message",
        Some(json!({
            "senderId": 1, "senderType": "admin",
            "receiverId": 7, "receiverType": "student",
            "content": "",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn report_summary_breaks_down_student_body() {
    let state = test_state().await;
    let app = router(state);
    send(
        &app,
        "POST",
        "/api/register",
        Some(register_payload("a@b.com", "2021-0001", "AW-1")),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/register",
        Some(json!({
            "firstName": "Maria",
            "lastName": "Santos",
            "studentId": "2021-0002",
            "email": "maria@b.com",
            "password": "s3cret!",
            "awardNumber": "AW-2",
            "place": "Cebu",
        })),
    )
    .await;

    let (status, report) = send(&app, "GET", "/api/report_summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total"], 2);
    assert_eq!(report["departments"]["Engineering"], 1);
    assert_eq!(report["departments"]["Unspecified"], 1);
    assert_eq!(report["places"]["Iloilo"], 1);
    assert_eq!(report["places"]["Cebu"], 1);
    assert_eq!(report["statuses"]["active"], 2);
}

#[tokio::test]
async fn wrong_method_and_unknown_route_report_distinct_codes() {
    let state = test_state().await;
    let app = router(state);

    let (status, body) = send(&app, "GET", "/api/save_post", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_request_method");

    let (status, body) = send(&app, "GET", "/api/no_such_endpoint", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}
