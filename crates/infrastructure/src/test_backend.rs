use std::sync::Arc;

use axum::Router;
use marketdesk_application::AdminSession;
use marketdesk_core::{BearerToken, Language};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;

use crate::http_api_client::HttpApiClient;

/// Requests observed by a fake backend, one line per observation.
pub(crate) type Seen = Arc<Mutex<Vec<String>>>;

pub(crate) const TEST_TOKEN: &str = "secret-token";

/// Serves `router` on an ephemeral port and returns a signed-in client for it.
pub(crate) async fn spawn_backend(router: Router) -> HttpApiClient {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| panic!("test"));
    let address = listener.local_addr().unwrap_or_else(|_| panic!("test"));
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let session = AdminSession::new();
    session
        .start(
            BearerToken::new(TEST_TOKEN).unwrap_or_else(|_| panic!("test")),
            Language::En,
        )
        .await;

    HttpApiClient::new(
        reqwest::Client::new(),
        Url::parse(format!("http://{address}").as_str()).unwrap_or_else(|_| panic!("test")),
        session,
    )
}
