use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::data::repositories::memory::{InMemoryPostRepository, InMemoryProfileRepository};
use crate::domain::post::{Post, PostInput};
use crate::infrastructure::jwt::JwtService;
use crate::presentation::AppState;
use crate::server::build_router;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

struct TestApp {
    router: Router,
    jwt: Arc<JwtService>,
    posts: InMemoryPostRepository,
}

impl TestApp {
    fn new(require_profile: bool) -> Self {
        let posts = InMemoryPostRepository::new();
        let service = PostService::new(
            Arc::new(posts.clone()),
            Arc::new(InMemoryProfileRepository::new()),
            require_profile,
        );
        let jwt = Arc::new(JwtService::new(SECRET));
        let state = AppState::new(Arc::new(service), jwt.clone());

        Self {
            router: build_router(state),
            jwt,
            posts,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        caller: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(caller) = caller {
            let token = self.jwt.issue_token(caller, 60).expect("token");
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.dispatch(builder.body(body).expect("request")).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create(&self, caller: Uuid, text: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/posts",
                Some(caller),
                Some(json!({ "text": text, "name": "Alice", "avatar": "a.png" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
        body
    }
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn probe_route_answers() {
    let app = TestApp::new(false);

    let (status, body) = app.send(Method::GET, "/api/posts/test", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": "posts Works" }));
}

#[tokio::test]
async fn create_like_and_unlike_flow() {
    let app = TestApp::new(false);
    let author = Uuid::new_v4();
    let fan = Uuid::new_v4();

    let created = app.create(author, "hello").await;
    assert_eq!(created["text"], json!("hello"));
    assert_eq!(created["user"], json!(author.to_string()));
    assert_eq!(created["likes"], json!([]));
    assert_eq!(created["comments"], json!([]));
    assert_eq!(created["name"], json!("Alice"));
    let id = id_of(&created);

    let (status, liked) = app
        .send(Method::POST, &format!("/api/posts/like/{id}"), Some(fan), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["likes"].as_array().map(Vec::len), Some(1));
    assert_eq!(liked["likes"][0]["user"], json!(fan.to_string()));

    let (status, body) = app
        .send(Method::POST, &format!("/api/posts/like/{id}"), Some(fan), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "alreadyliked": "User already liked this post" }));

    let (status, unliked) = app
        .send(Method::POST, &format!("/api/posts/unlike/{id}"), Some(fan), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unliked["likes"], json!([]));

    let (status, body) = app
        .send(Method::POST, &format!("/api/posts/unlike/{id}"), Some(fan), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "notliked": "User has not liked this post" }));
}

#[tokio::test]
async fn created_post_round_trips_through_get() {
    let app = TestApp::new(false);
    let created = app.create(Uuid::new_v4(), "round trip through http").await;

    let (status, fetched) = app
        .send(
            Method::GET,
            &format!("/api/posts/{}", id_of(&created)),
            None,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = TestApp::new(false);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/posts",
            None,
            Some(json!({ "text": "no token attached here" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "unauthorized": "Unauthorized" }));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/posts")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "text": "forged token here" }).to_string()))
        .expect("request");
    let (status, _) = app.dispatch(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_input_returns_field_errors_and_stores_nothing() {
    let app = TestApp::new(false);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/posts",
            Some(Uuid::new_v4()),
            Some(json!({ "text": "x".repeat(301) })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "text": "Post must be at most 300 characters" }));

    let (status, body) = app
        .send(Method::POST, "/api/posts", Some(Uuid::new_v4()), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "text": "Text field is required" }));

    assert!(app.posts.list_posts().await.expect("list").is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new(false);
    let token = app.jwt.issue_token(Uuid::new_v4(), 60).expect("token");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/posts")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, body) = app.dispatch(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn unknown_or_malformed_post_ids_are_not_found() {
    let app = TestApp::new(false);

    for id in [Uuid::new_v4().to_string(), "not-an-id".to_string()] {
        let (status, body) = app
            .send(Method::GET, &format!("/api/posts/{id}"), None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "nopostfound": "No post found with that ID" }));

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/posts/like/{id}"),
                Some(Uuid::new_v4()),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "postnotfound": "No post found" }));
    }
}

#[tokio::test]
async fn listing_is_newest_first() {
    let app = TestApp::new(false);
    let now = Utc::now();
    for minutes in [5, 1, 3] {
        let input = PostInput {
            text: Some(format!("posted {minutes} minutes ago")),
            name: None,
            avatar: None,
        };
        let post = Post::new(
            Uuid::new_v4(),
            input.checked().expect("valid input"),
            Uuid::new_v4(),
            now - Duration::minutes(minutes),
        );
        app.posts.insert(post).await.expect("insert");
    }

    let (status, body) = app.send(Method::GET, "/api/posts", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|post| post["text"].as_str().expect("text"))
        .collect();
    assert_eq!(
        texts,
        vec![
            "posted 1 minutes ago",
            "posted 3 minutes ago",
            "posted 5 minutes ago"
        ]
    );
}

#[tokio::test]
async fn only_owner_can_delete() {
    let app = TestApp::new(false);
    let owner = Uuid::new_v4();
    let id = id_of(&app.create(owner, "a post worth keeping").await);
    let uri = format!("/api/posts/{id}");

    let (status, body) = app
        .send(Method::DELETE, &uri, Some(Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "notauthorized": "User not authorized" }));

    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::DELETE, &uri, Some(owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_can_be_added_and_removed() {
    let app = TestApp::new(false);
    let commenter = Uuid::new_v4();
    let id = id_of(&app.create(Uuid::new_v4(), "a post to discuss").await);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/posts/comment/{id}"),
            Some(commenter),
            Some(json!({ "text": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "text": "Text field is required" }));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/posts/comment/not-an-id",
            Some(commenter),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "text": "Text field is required" }));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/posts/comment/not-an-id",
            Some(commenter),
            Some(json!({ "text": "ok" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "postnotfound": "No post found" }));

    let (status, commented) = app
        .send(
            Method::POST,
            &format!("/api/posts/comment/{id}"),
            Some(commenter),
            Some(json!({ "text": "a thoughtful comment", "name": "Bob" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let comment = &commented["comments"][0];
    assert_eq!(comment["user"], json!(commenter.to_string()));
    assert_eq!(comment["name"], json!("Bob"));
    assert!(comment.get("createdAt").is_some());
    let comment_id = id_of(comment);

    for missing in [Uuid::new_v4().to_string(), "garbage".to_string()] {
        let (status, body) = app
            .send(
                Method::DELETE,
                &format!("/api/posts/comment/{id}/{missing}"),
                Some(commenter),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "commentnotexists": "No comment exists" }));
    }

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/api/posts/comment/{}/garbage", Uuid::new_v4()),
            Some(commenter),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "postnotfound": "No post found" }));

    let (status, cleaned) = app
        .send(
            Method::DELETE,
            &format!("/api/posts/comment/{id}/{comment_id}"),
            Some(commenter),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleaned["comments"], json!([]));
}

#[tokio::test]
async fn required_profile_gates_interactions() {
    let app = TestApp::new(true);
    let id = id_of(&app.create(Uuid::new_v4(), "profiles are required").await);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/posts/like/{id}"),
            Some(Uuid::new_v4()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "noprofile": "There is no profile for this user" }));

    let (status, commented) = app
        .send(
            Method::POST,
            &format!("/api/posts/comment/{id}"),
            Some(Uuid::new_v4()),
            Some(json!({ "text": "no profile needed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(commented["comments"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = TestApp::new(false);

    let (status, body) = app.send(Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, doc) = app
        .send(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/posts/like/{id}").is_some());
}
