use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};

/// The request side of an exchange, as seen by a [`ResponseObserver`].
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub url: Url,
}

/// Status line and headers of a response, captured before the body is read.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Hook invoked once for every HTTP response the client receives, error
/// responses included.
pub trait ResponseObserver: Send + Sync {
    fn observe(&self, request: &RequestInfo, response: &ResponseHead);
}

impl<F> ResponseObserver for F
where
    F: Fn(&RequestInfo, &ResponseHead) + Send + Sync,
{
    fn observe(&self, request: &RequestInfo, response: &ResponseHead) {
        self(request, response)
    }
}
