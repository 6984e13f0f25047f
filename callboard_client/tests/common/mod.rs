#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use callboard_client::{ApiResponse, AuthenticatedTransport, HttpMethod, TransportError};
use serde_json::{json, Value};
use tokio::sync::oneshot;

pub enum Scripted {
    Respond(ApiResponse),
    Fail(TransportError),
    Gated(oneshot::Receiver<ApiResponse>),
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("seen lock").clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..200 {
            if self.seen.lock().expect("seen lock").len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("transport never saw {count} requests");
    }
}

#[async_trait]
impl AuthenticatedTransport for ScriptedTransport {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, TransportError> {
        self.seen.lock().expect("seen lock").push(SeenRequest {
            method,
            path: path.to_string(),
            body,
        });
        let next = self.script.lock().expect("script lock").pop_front();
        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Gated(gate)) => gate
                .await
                .map_err(|_| TransportError::Network("gate dropped".into())),
            None => Err(TransportError::Network("no scripted response".into())),
        }
    }
}

pub fn json_response(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string().into_bytes())
}

/// A `/calls` page holding one record per id, each tagged with `label` in
/// its caller name so tests can tell copies apart.
pub fn calls_page(ids: &[i64], label: &str, next_cursor: Option<&str>) -> ApiResponse {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "caller_name": label,
                "status": "completed",
                "is_starred": false,
                "transcript_messages": []
            })
        })
        .collect();
    json_response(
        200,
        json!({
            "data": data,
            "meta": {
                "perPage": 25,
                "hasMore": next_cursor.is_some(),
                "nextCursor": next_cursor,
                "prevCursor": null
            }
        }),
    )
}
