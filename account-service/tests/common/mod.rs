use std::sync::Arc;

use account_service::domain::account::service::AccountService;
use account_service::domain::session::service::SessionManager;
use account_service::inbound::http::cookies::SessionCookies;
use account_service::inbound::http::cookies::SESSION_COOKIE_NAME;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryDatabase;
use auth::Authenticator;
use auth::PasswordHasher;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: InMemoryDatabase,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let db = InMemoryDatabase::new();

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap hashing parameters keep the suite fast
        let password_hasher =
            PasswordHasher::with_params(256, 1, 1).expect("Failed to build password hasher");
        let account_service = Arc::new(AccountService::new(
            Authenticator::with_hasher(password_hasher),
            Arc::new(SessionManager::default()),
        ));

        let router = create_router(db.clone(), account_service, SessionCookies::new(false));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            db,
            api_client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request carrying a session cookie
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).header(COOKIE, session_cookie(token))
    }

    /// Helper to make POST request carrying a session cookie
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).header(COOKIE, session_cookie(token))
    }

    /// Register an account and return its session token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/register")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
        session_token(&response).expect("Registration did not set a session cookie")
    }
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}", SESSION_COOKIE_NAME, token)
}

/// Every `Set-Cookie` header the response wrote for the session cookie
pub fn session_set_cookies(response: &reqwest::Response) -> Vec<String> {
    let prefix = format!("{}=", SESSION_COOKIE_NAME);
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter(|value| value.starts_with(&prefix))
        .map(str::to_string)
        .collect()
}

/// The single `Set-Cookie` header for the session cookie, if the response wrote one
pub fn session_set_cookie(response: &reqwest::Response) -> Option<String> {
    let mut headers = session_set_cookies(response);
    assert!(
        headers.len() <= 1,
        "Session cookie written more than once: {:?}",
        headers
    );
    headers.pop()
}

/// Token value of the session cookie written by the response, if any
pub fn session_token(response: &reqwest::Response) -> Option<String> {
    let header = session_set_cookie(response)?;
    let value = header
        .split(';')
        .next()?
        .trim_start_matches(&format!("{}=", SESSION_COOKIE_NAME))
        .to_string();

    Some(value).filter(|value| !value.is_empty())
}
