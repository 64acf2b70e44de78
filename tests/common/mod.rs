//! In-memory queue service used by the facade tests

#![allow(dead_code)]

use async_trait::async_trait;
use rs_sqs_adapter::{
    QueueService, RawMessage, ReceiveRequest, SendReceipt, ServiceError, WireAttributeList,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// Routes library log output through the test harness.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

#[derive(Debug, Clone)]
struct StoredMessage {
    message_id: String,
    body: String,
    attributes: WireAttributeList,
}

#[derive(Debug, Default)]
struct State {
    queues: HashMap<String, VecDeque<StoredMessage>>,
    in_flight: HashMap<String, StoredMessage>,
    next_id: u64,
    receive_requests: Vec<ReceiveRequest>,
    failure: Option<(String, u16)>,
}

/// A queue service keeping messages in memory.
///
/// Received messages stay in flight until acknowledged; acknowledging an
/// unknown or already used receipt handle fails like SQS does.
#[derive(Debug, Clone, Default)]
pub struct FakeQueueService {
    state: Arc<Mutex<State>>,
}

impl FakeQueueService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with the given error code and status.
    pub fn fail_with(&self, code: &str, status: u16) {
        self.state.lock().unwrap().failure = Some((code.to_string(), status));
    }

    /// Pushes a raw message straight into a queue, bypassing `publish`.
    pub fn enqueue_raw(&self, queue_url: &str, body: &str, attributes: WireAttributeList) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let message_id = format!("msg-{}", state.next_id);
        state
            .queues
            .entry(queue_url.to_string())
            .or_default()
            .push_back(StoredMessage {
                message_id: message_id.clone(),
                body: body.to_string(),
                attributes,
            });
        message_id
    }

    pub fn queued(&self, queue_url: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.queues.get(queue_url).map_or(0, VecDeque::len)
    }

    pub fn in_flight(&self) -> usize {
        self.state.lock().unwrap().in_flight.len()
    }

    pub fn receive_requests(&self) -> Vec<ReceiveRequest> {
        self.state.lock().unwrap().receive_requests.clone()
    }

    fn check_failure(state: &State) -> Result<(), ServiceError> {
        match &state.failure {
            Some((code, status)) => Err(ServiceError::new(format!("injected {code}"))
                .with_code(code.clone())
                .with_status(*status)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueueService for FakeQueueService {
    async fn publish(
        &self,
        queue_url: &str,
        body: &str,
        attributes: WireAttributeList,
    ) -> Result<SendReceipt, ServiceError> {
        Self::check_failure(&self.state.lock().unwrap())?;
        let message_id = self.enqueue_raw(queue_url, body, attributes);

        Ok(SendReceipt {
            message_id: Some(message_id),
            ..SendReceipt::default()
        })
    }

    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<RawMessage>, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.receive_requests.push(request.clone());
        Self::check_failure(&state)?;

        let mut messages = Vec::new();
        while messages.len() < request.max_messages as usize {
            let Some(stored) = state
                .queues
                .get_mut(&request.queue_url)
                .and_then(VecDeque::pop_front)
            else {
                break;
            };

            state.next_id += 1;
            let receipt_handle = format!("receipt-{}-{}", stored.message_id, state.next_id);
            state.in_flight.insert(receipt_handle.clone(), stored.clone());

            let mut system_attributes = HashMap::new();
            if request.include_all_attributes {
                system_attributes.insert("ApproximateReceiveCount".to_string(), "1".to_string());
            }

            messages.push(RawMessage {
                receipt_handle: Some(receipt_handle),
                message_id: Some(stored.message_id),
                body: Some(stored.body),
                attributes: if request.include_all_attributes {
                    stored.attributes
                } else {
                    WireAttributeList::new()
                },
                system_attributes,
            });
        }

        Ok(messages)
    }

    async fn acknowledge(
        &self,
        _queue_url: &str,
        receipt_handle: &str,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;

        match state.in_flight.remove(receipt_handle) {
            Some(_) => Ok(()),
            None => Err(ServiceError::new(format!(
                "receipt handle {receipt_handle} is invalid"
            ))
            .with_code("ReceiptHandleIsInvalid")
            .with_status(400)),
        }
    }
}
