use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;

use accounthub_api::app::{AppServices, build_app};
use accounthub_auth::JwtClaims;
use accounthub_core::{Tenant, TenantId, User, UserId, UserRole};
use accounthub_infra::InMemoryDatabase;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    db: InMemoryDatabase,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over the in-memory store, on an ephemeral port.
        let db = InMemoryDatabase::new();
        let app = build_app(AppServices::in_memory(db.clone()), JWT_SECRET.to_string());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, db, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn seed_tenant(&self, id: &str) -> TenantId {
        let tenant_id = TenantId::new(id).unwrap();
        self.db
            .insert_tenant(Tenant::new(tenant_id.clone(), id, Utc::now()))
            .unwrap();
        tenant_id
    }

    fn seed_user(&self, tenant_id: &TenantId, email: &str, role: UserRole) -> User {
        let user = User::new(UserId::new(), tenant_id.clone(), email, role, Utc::now()).unwrap();
        self.db.insert_user(user.clone()).unwrap();
        user
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(user: &User, locale: Option<&str>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: user.id,
        tenant_id: user.tenant_id.clone(),
        role: user.role,
        email: user.email.clone(),
        given_name: Some("Test".into()),
        family_name: Some("User".into()),
        title: None,
        avatar_url: None,
        locale: locale.map(str::to_string),
        iat: now - ChronoDuration::seconds(5),
        exp: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_user_info_negotiates_browser_locale() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/user-info"))
        .header("Accept-Language", "en-UK,en;q=0.8")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["isAuthenticated"], false);
    assert_eq!(body["locale"], "en-US");
    for field in ["userId", "tenantId", "userRole", "email", "firstName", "lastName", "title", "avatarUrl"] {
        assert!(body[field].is_null(), "{field} should be empty for anonymous callers");
    }
}

#[tokio::test]
async fn authenticated_user_info_comes_from_token() {
    let srv = TestServer::spawn().await;
    let tenant = srv.seed_tenant("acme");
    let owner = srv.seed_user(&tenant, "owner@acme.io", UserRole::Owner);

    let res = reqwest::Client::new()
        .get(srv.url("/api/user-info"))
        .bearer_auth(mint_jwt(&owner, Some("da-DK")))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["isAuthenticated"], true);
    assert_eq!(body["tenantId"], "acme");
    assert_eq!(body["userId"], owner.id.to_string());
    assert_eq!(body["userRole"], "Owner");
    assert_eq!(body["email"], "owner@acme.io");
    assert_eq!(body["locale"], "da-DK");
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    srv.seed_tenant("acme");
    let client = reqwest::Client::new();

    let res = client.delete(srv.url("/api/tenants/acme")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .delete(srv.url("/api/tenants/acme"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tenant_with_users_cannot_be_deleted() {
    let srv = TestServer::spawn().await;
    let tenant = srv.seed_tenant("acme");
    let owner = srv.seed_user(&tenant, "owner@acme.io", UserRole::Owner);
    srv.seed_user(&tenant, "member@acme.io", UserRole::Member);

    let res = reqwest::Client::new()
        .delete(srv.url("/api/tenants/acme"))
        .bearer_auth(mint_jwt(&owner, None))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"][0]["field"], "id");
    assert_eq!(
        body["errors"][0]["message"],
        "All users must be deleted before the tenant can be deleted."
    );
    assert!(srv.db.tenant(&tenant).unwrap().is_some());
}

#[tokio::test]
async fn delete_users_then_tenant() {
    let srv = TestServer::spawn().await;
    let tenant = srv.seed_tenant("acme");
    let owner = srv.seed_user(&tenant, "owner@acme.io", UserRole::Owner);
    let member = srv.seed_user(&tenant, "member@acme.io", UserRole::Member);
    let token = mint_jwt(&owner, None);
    let client = reqwest::Client::new();

    let res = client
        .delete(srv.url(&format!("/api/users/{}", member.id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // The owner cannot remove themselves on their own.
    let res = client
        .delete(srv.url(&format!("/api/users/{}", owner.id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"][0]["message"], "You cannot delete yourself.");

    // Deleting the tenant takes the owner's account with it.
    let res = client
        .delete(srv.url("/api/tenants/acme"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(srv.url("/api/tenants/acme"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(srv.db.user(owner.id).unwrap().is_none());
    assert!(srv.db.user(member.id).unwrap().is_none());
}

#[tokio::test]
async fn get_tenant_returns_json() {
    let srv = TestServer::spawn().await;
    let tenant = srv.seed_tenant("acme");
    let member = srv.seed_user(&tenant, "member@acme.io", UserRole::Member);

    let res = reqwest::Client::new()
        .get(srv.url("/api/tenants/acme"))
        .bearer_auth(mint_jwt(&member, None))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], "acme");
    assert_eq!(body["state"], "Trial");
}

#[tokio::test]
async fn missing_tenant_is_not_found() {
    let srv = TestServer::spawn().await;
    // A token for a tenant that has since disappeared.
    let ghost = User::new(
        UserId::new(),
        TenantId::new("ghost").unwrap(),
        "owner@ghost.io",
        UserRole::Owner,
        Utc::now(),
    )
    .unwrap();

    let res = reqwest::Client::new()
        .delete(srv.url("/api/tenants/ghost"))
        .bearer_auth(mint_jwt(&ghost, None))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Tenant with id 'ghost' not found.");
}

#[tokio::test]
async fn unauthorized_access_blocked_for_commands() {
    let srv = TestServer::spawn().await;
    let tenant = srv.seed_tenant("acme");
    let member = srv.seed_user(&tenant, "member@acme.io", UserRole::Member);
    let admin = srv.seed_user(&tenant, "admin@acme.io", UserRole::Admin);
    let client = reqwest::Client::new();

    // Members may not delete users; admins may not delete tenants.
    let res = client
        .delete(srv.url(&format!("/api/users/{}", admin.id)))
        .bearer_auth(mint_jwt(&member, None))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(srv.url("/api/tenants/acme"))
        .bearer_auth(mint_jwt(&admin, None))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(srv.db.user(admin.id).unwrap().is_some());
}

#[tokio::test]
async fn tenant_isolation_blocks_cross_tenant_reads_and_writes() {
    let srv = TestServer::spawn().await;
    let acme = srv.seed_tenant("acme");
    let globex = srv.seed_tenant("globex");
    let acme_owner = srv.seed_user(&acme, "owner@acme.io", UserRole::Owner);
    let globex_user = srv.seed_user(&globex, "user@globex.io", UserRole::Member);
    let token = mint_jwt(&acme_owner, None);
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/tenants/globex"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(srv.url("/api/tenants/globex"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // User lookups are scoped to the caller's tenant.
    let res = client
        .delete(srv.url(&format!("/api/users/{}", globex_user.id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(srv.db.user(globex_user.id).unwrap().is_some());
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let srv = TestServer::spawn().await;
    let tenant = srv.seed_tenant("acme");
    let owner = srv.seed_user(&tenant, "owner@acme.io", UserRole::Owner);
    let token = mint_jwt(&owner, None);
    let client = reqwest::Client::new();

    for path in ["/api/tenants/NOT_VALID", "/api/users/not-a-uuid"] {
        let res = client
            .delete(srv.url(path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_id");
    }
}
