// HTTP transport behind the metrics layer
// Forwards `http` requests through a reqwest client and buffers the response
//
// Numan Thabit 2025 Nov

use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Request, Response};
use reqwest::Client;
use std::task::{Context, Poll};
use tower::Service;

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

impl<B> Service<Request<B>> for ReqwestTransport
where
    B: Into<reqwest::Body>,
{
    type Response = Response<Bytes>;
    type Error = reqwest::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let http = self.http.clone();
        let request = reqwest::Request::try_from(request);
        Box::pin(async move {
            let resp = http.execute(request?).await?;
            let status = resp.status();
            let version = resp.version();
            let headers = resp.headers().clone();
            let body = resp.bytes().await?;

            let mut response = Response::new(body);
            *response.status_mut() = status;
            *response.version_mut() = version;
            *response.headers_mut() = headers;
            Ok(response)
        })
    }
}
