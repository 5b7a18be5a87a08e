#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use recruitdesk::api::{
    HttpRequest, HttpResponse, ManualClock, ResponseCache, Transport, TransportError,
};
use recruitdesk::session::MemorySessionStore;
use recruitdesk::{CrmClient, DashboardRole, SessionUser};

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn replying(responses: &[(u16, &str)]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(
                responses
                    .iter()
                    .map(|(status, body)| HttpResponse {
                        status: *status,
                        body: body.to_string(),
                    })
                    .collect(),
            ),
            requests: Mutex::default(),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[derive(Clone)]
pub struct SharedTransport(pub Arc<RecordingTransport>);

impl Transport for SharedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.0.requests.lock().expect("requests lock").push(request);
        let next = self.0.responses.lock().expect("responses lock").pop_front();
        Ok(next.unwrap_or(HttpResponse {
            status: 200,
            body: "{}".to_string(),
        }))
    }
}

pub type TestClient = CrmClient<SharedTransport, MemorySessionStore>;

pub fn account_manager() -> SessionUser {
    SessionUser {
        id: "17".to_string(),
        name: "Priya Natarajan".to_string(),
        email: "priya@agency.io".to_string(),
        user_code: "AM-17".to_string(),
        role: Some(DashboardRole::AccountManager),
    }
}

pub fn client_with(
    transport: &Arc<RecordingTransport>,
    session: MemorySessionStore,
) -> (TestClient, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let cache = ResponseCache::with_clock(Duration::from_secs(5), clock.clone());
    let client = CrmClient::new(
        "http://crm.test",
        SharedTransport(transport.clone()),
        Arc::new(session),
        cache,
    );
    (client, clock)
}

pub fn signed_in_client(transport: &Arc<RecordingTransport>) -> (TestClient, Arc<ManualClock>) {
    client_with(transport, MemorySessionStore::signed_in(account_manager()))
}
