//! Typed client for one process's work service and introspection routes.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use lamport_common::{
    AverageRequest, AverageResponse, ClockResponse, Event, MathRequest, MathResponse,
    MatrixRequest, MatrixResponse, ProcessId, ProcessSpec, SearchRequest, SearchResponse,
    SortRequest, SortResponse,
};
use lamport_work::MathOp;

use crate::messenger::MessengerError;

#[derive(Clone)]
pub struct WorkClient {
    client: reqwest::Client,
    base_url: String,
    peer: ProcessId,
    timeout: Duration,
}

impl WorkClient {
    pub fn new(spec: &ProcessSpec, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(Self {
            client,
            base_url: spec.base_url(),
            peer: spec.id.clone(),
            timeout,
        })
    }

    pub fn peer(&self) -> &ProcessId {
        &self.peer
    }

    pub async fn math(
        &self,
        op: MathOp,
        request: &MathRequest,
    ) -> Result<MathResponse, MessengerError> {
        let path = format!("/math/{}", op.to_string().to_lowercase());
        self.post(&path, request).await
    }

    pub async fn average(&self, request: &AverageRequest) -> Result<AverageResponse, MessengerError> {
        self.post("/average", request).await
    }

    pub async fn matrix(&self, request: &MatrixRequest) -> Result<MatrixResponse, MessengerError> {
        self.post("/matrix/multiply", request).await
    }

    pub async fn sort(&self, request: &SortRequest) -> Result<SortResponse, MessengerError> {
        self.post("/sort/quicksort", request).await
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, MessengerError> {
        self.post("/search/linear", request).await
    }

    pub async fn clock(&self) -> Result<ClockResponse, MessengerError> {
        self.get("/clock").await
    }

    pub async fn events(&self) -> Result<Vec<Event>, MessengerError> {
        self.get("/events").await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, MessengerError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| MessengerError::from_reqwest(&self.peer, self.timeout, e))?;
        self.decode(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, MessengerError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| MessengerError::from_reqwest(&self.peer, self.timeout, e))?;
        self.decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, MessengerError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MessengerError::Rejected {
                peer: self.peer.clone(),
                reason: format!("HTTP {}: {body}", status.as_u16()),
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| MessengerError::from_reqwest(&self.peer, self.timeout, e))
    }
}
