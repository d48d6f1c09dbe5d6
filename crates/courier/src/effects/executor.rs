use std::sync::Arc;

use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::core;
use crate::data::{ExecutorConfig, MethodDescriptor, StatusPolicy, TransportOptions};
use crate::effects::hooks::{ErrorHandler, IgnoreErrors, NoHooks, RequestHook};
use crate::effects::progress::{DownloadMonitor, fetch_with_progress};
use crate::effects::response::{Blob, Response};
use crate::effects::transport::HttpClient;
use crate::error::{Error, HookError, HookStage, Result};

/// How a call that reached the server settled.
#[derive(Debug)]
pub enum Outcome<T> {
    /// 2xx response, body decoded.
    Success(T),
    /// Non-2xx response, returned unread under [`StatusPolicy::ReturnResponse`].
    Failed(Response),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool { matches!(self, Outcome::Success(_)) }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn failed(self) -> Option<Response> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failed(response) => Some(response),
        }
    }

    /// Status of the failed response, `None` on success.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failed(response) => Some(response.status()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failed(response) => Outcome::Failed(response),
        }
    }

    /// Fold a failed response into [`Error::Status`].
    pub fn into_result(self) -> Result<T> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failed(response) => Err(Error::Status {
                status: response.status(),
                url:    response.url().to_string(),
            }),
        }
    }
}

/// Runs requests described by a [`MethodDescriptor`] through an
/// [`HttpClient`], applying hooks, error dispatch and progress reporting.
///
/// Configure it once with the builder methods, then issue calls through
/// `&self`. Calls share no per-call state, so several may run at once.
///
/// # Examples
///
/// ```no_run
/// use courier::{MethodDescriptor, ReqwestClient, RequestExecutor};
/// use serde_json::Value;
///
/// # async fn run() -> courier::Result<()> {
/// let executor = RequestExecutor::new(ReqwestClient::new())
///     .with_base_url("https://api.example.com")
///     .with_method(MethodDescriptor::get("/users/42"))
///     .with_monitor(|p: &courier::Progress| println!("{} bytes", p.received));
///
/// let user = executor.execute::<Value>().await?.into_result()?;
/// # let _ = user;
/// # Ok(())
/// # }
/// ```
pub struct RequestExecutor<C: HttpClient> {
    client:        C,
    method:        Option<MethodDescriptor>,
    config:        ExecutorConfig,
    hooks:         Arc<dyn RequestHook>,
    error_handler: Arc<dyn ErrorHandler>,
    monitor:       Option<Arc<dyn DownloadMonitor>>,
}

impl<C: HttpClient> RequestExecutor<C> {
    /// Create an executor with default configuration and no collaborators.
    pub fn new(client: C) -> Self {
        Self {
            client,
            method: None,
            config: ExecutorConfig::default(),
            hooks: Arc::new(NoHooks),
            error_handler: Arc::new(IgnoreErrors),
            monitor: None,
        }
    }

    #[must_use]
    pub fn with_method(mut self, descriptor: MethodDescriptor) -> Self {
        self.method = Some(descriptor);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_transport_options(mut self, options: TransportOptions) -> Self {
        self.config.transport = options;
        self
    }

    #[must_use]
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.config.status_policy = policy;
        self
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: impl RequestHook + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    #[must_use]
    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    #[must_use]
    pub fn with_monitor(mut self, monitor: impl DownloadMonitor + 'static) -> Self {
        self.monitor = Some(Arc::new(monitor));
        self
    }

    /// Bind a new descriptor, replacing the previous one.
    pub fn set_method(&mut self, descriptor: MethodDescriptor) { self.method = Some(descriptor); }

    pub fn method(&self) -> Option<&MethodDescriptor> { self.method.as_ref() }

    pub fn config(&self) -> &ExecutorConfig { &self.config }

    pub fn config_mut(&mut self) -> &mut ExecutorConfig { &mut self.config }

    pub fn client(&self) -> &C { &self.client }

    /// Send the bound descriptor and decode a 2xx body as JSON.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingMethod`] if no descriptor is bound; nothing else
    ///   runs in that case.
    /// - Transport, hook, request building and decoding failures, after the
    ///   error handler has seen them.
    /// - [`Error::Status`] for a non-2xx response under
    ///   [`StatusPolicy::Raise`]. Under the default policy the response is
    ///   returned as [`Outcome::Failed`] instead.
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Outcome<T>> {
        let descriptor = self.method.as_ref().ok_or(Error::MissingMethod)?;

        let response = match self.dispatch(descriptor).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(err)),
        };
        if !response.ok() {
            return self.reject(response);
        }

        match response.json::<T>().await {
            Ok(value) => Ok(Outcome::Success(value)),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Fetch `path` (joined with the base URL) as a binary blob.
    ///
    /// The bound descriptor is not used and no hooks run. Headers in
    /// `options` override the configured default headers.
    ///
    /// # Errors
    ///
    /// Same channels as [`execute`](Self::execute), minus the usage error.
    pub async fn download(&self, path: &str, options: TransportOptions) -> Result<Outcome<Blob>> {
        let response = match self.fetch_download(path, &options).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(err)),
        };
        if !response.ok() {
            return self.reject(response);
        }

        match response.blob().await {
            Ok(blob) => {
                tracing::debug!(target: "courier::executor", size = blob.size(), "download complete");
                Ok(Outcome::Success(blob))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn dispatch(&self, descriptor: &MethodDescriptor) -> Result<Response> {
        let request = core::build_execute_request(&self.config, descriptor)?;

        self.hooks
            .before_request()
            .await
            .map_err(|source| self.hook_error(HookStage::BeforeRequest, source))?;

        tracing::debug!(
            target: "courier::executor",
            method = %request.method,
            url = %request.url,
            "sending request"
        );
        let response = fetch_with_progress(&self.client, request, self.monitor.as_ref()).await?;
        tracing::debug!(
            target: "courier::executor",
            status = response.status().as_u16(),
            "response received"
        );

        self.hooks
            .after_request(&response)
            .await
            .map_err(|source| self.hook_error(HookStage::AfterRequest, source))?;

        Ok(response)
    }

    async fn fetch_download(&self, path: &str, options: &TransportOptions) -> Result<Response> {
        let request = core::build_download_request(&self.config, path, options)?;
        tracing::debug!(
            target: "courier::executor",
            method = %request.method,
            url = %request.url,
            "starting download"
        );
        Ok(fetch_with_progress(&self.client, request, self.monitor.as_ref()).await?)
    }

    fn hook_error(&self, stage: HookStage, source: HookError) -> Error {
        Error::Hook {
            hook: self.hooks.name().to_string(),
            stage,
            source,
        }
    }

    /// Notify the handler of a thrown failure and hand it back.
    fn fail(&self, err: Error) -> Error {
        tracing::debug!(target: "courier::executor", kind = ?err.kind(), err = %err, "request failed");
        self.error_handler.handle_error(&err);
        err
    }

    /// Notify the handler of a non-2xx response and settle per policy.
    fn reject<T>(&self, response: Response) -> Result<Outcome<T>> {
        tracing::warn!(
            target: "courier::executor",
            url = %response.url(),
            status = response.status().as_u16(),
            policy = ?self.config.status_policy,
            "non-success status"
        );
        self.error_handler.handle_http_error(&response);
        match self.config.status_policy {
            StatusPolicy::ReturnResponse => Ok(Outcome::Failed(response)),
            StatusPolicy::Raise => Err(Error::Status {
                status: response.status(),
                url:    response.url().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::mock::{MockClient, MockResponse};
    use crate::error::{ErrorKind, TransportError};
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn push(&self, entry: impl Into<String>) { self.0.lock().unwrap().push(entry.into()); }

        fn entries(&self) -> Vec<String> { self.0.lock().unwrap().clone() }
    }

    struct JournalHook(Journal);

    #[async_trait::async_trait]
    impl RequestHook for JournalHook {
        async fn before_request(&self) -> std::result::Result<(), HookError> {
            self.0.push("before");
            Ok(())
        }

        async fn after_request(&self, response: &Response) -> std::result::Result<(), HookError> {
            self.0.push(format!("after {}", response.status().as_u16()));
            Ok(())
        }
    }

    struct JournalHandler(Journal);

    impl ErrorHandler for JournalHandler {
        fn handle_error(&self, error: &Error) { self.0.push(format!("error {:?}", error.kind())); }

        fn handle_http_error(&self, response: &Response) {
            self.0.push(format!("http_error {}", response.status().as_u16()));
        }
    }

    fn executor(client: MockClient, journal: &Journal) -> RequestExecutor<MockClient> {
        RequestExecutor::new(client)
            .with_hooks(JournalHook(journal.clone()))
            .with_error_handler(JournalHandler(journal.clone()))
    }

    #[tokio::test]
    async fn missing_method_fails_before_anything_runs() {
        let journal = Journal::default();
        let client = MockClient::new().respond(MockResponse::ok());
        let exec = executor(client.clone(), &journal);

        let err = exec.execute::<Value>().await.unwrap_err();
        assert!(matches!(err, Error::MissingMethod));
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(client.call_count(), 0);
        assert!(journal.entries().is_empty());
    }

    #[tokio::test]
    async fn success_decodes_json() {
        let journal = Journal::default();
        let client =
            MockClient::new().respond(MockResponse::json(StatusCode::OK, &json!({ "id": 7 })));
        let exec = executor(client, &journal)
            .with_base_url("https://api.test/")
            .with_method(MethodDescriptor::get("/users/7"));

        let value = exec.execute::<Value>().await.unwrap().success().unwrap();
        assert_eq!(value, json!({ "id": 7 }));
        assert_eq!(journal.entries(), vec!["before", "after 200"]);
    }

    #[tokio::test]
    async fn not_found_returns_response_and_notifies_once() {
        let journal = Journal::default();
        let client = MockClient::new().respond(MockResponse::new(StatusCode::NOT_FOUND).chunk("gone"));
        let exec = executor(client, &journal).with_method(MethodDescriptor::get("/missing"));

        let outcome = exec.execute::<Value>().await.unwrap();
        assert_eq!(outcome.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(outcome.failed().unwrap().text().await.unwrap(), "gone");
        assert_eq!(journal.entries(), vec!["before", "after 404", "http_error 404"]);
    }

    #[tokio::test]
    async fn raise_policy_errors_without_generic_notification() {
        let journal = Journal::default();
        let client = MockClient::new().respond(MockResponse::new(StatusCode::BAD_GATEWAY));
        let exec = executor(client, &journal)
            .with_status_policy(StatusPolicy::Raise)
            .with_method(MethodDescriptor::get("https://api.test/up"));

        let err = exec.execute::<Value>().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(journal.entries(), vec!["before", "after 502", "http_error 502"]);
    }

    #[tokio::test]
    async fn transport_failure_is_notified_and_raised() {
        let journal = Journal::default();
        let client = MockClient::new().fail(TransportError::Connection("refused".into()));
        let exec = executor(client, &journal).with_method(MethodDescriptor::get("/x"));

        let err = exec.execute::<Value>().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(journal.entries(), vec!["before", "error Transport"]);
    }

    #[tokio::test]
    async fn decode_failure_is_notified_and_raised() {
        let journal = Journal::default();
        let client = MockClient::new().respond(MockResponse::ok().chunk("<html>"));
        let exec = executor(client, &journal).with_method(MethodDescriptor::get("/x"));

        let err = exec.execute::<Value>().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert_eq!(journal.entries(), vec!["before", "after 200", "error Decoding"]);
    }

    struct RejectingHook;

    #[async_trait::async_trait]
    impl RequestHook for RejectingHook {
        fn name(&self) -> &str { "gate" }

        async fn before_request(&self) -> std::result::Result<(), HookError> {
            Err(HookError::new("closed"))
        }
    }

    #[tokio::test]
    async fn hook_failure_skips_transport() {
        let journal = Journal::default();
        let client = MockClient::new().respond(MockResponse::ok());
        let exec = RequestExecutor::new(client.clone())
            .with_hooks(RejectingHook)
            .with_error_handler(JournalHandler(journal.clone()))
            .with_method(MethodDescriptor::get("/x"));

        let err = exec.execute::<Value>().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Hook { ref hook, stage: HookStage::BeforeRequest, .. } if hook == "gate"
        ));
        assert_eq!(client.call_count(), 0);
        assert_eq!(journal.entries(), vec!["error Hook"]);
    }

    struct FailingAfterHook(Journal);

    #[async_trait::async_trait]
    impl RequestHook for FailingAfterHook {
        fn name(&self) -> &str { "audit" }

        async fn after_request(&self, response: &Response) -> std::result::Result<(), HookError> {
            self.0.push(format!("after {}", response.status().as_u16()));
            Err(HookError::new("rejected response"))
        }
    }

    #[tokio::test]
    async fn after_hook_failure_is_reported_once() {
        let journal = Journal::default();
        let client = MockClient::new().respond(MockResponse::new(StatusCode::NOT_FOUND).chunk("gone"));
        let exec = RequestExecutor::new(client.clone())
            .with_hooks(FailingAfterHook(journal.clone()))
            .with_error_handler(JournalHandler(journal.clone()))
            .with_method(MethodDescriptor::get("/x"));

        let err = exec.execute::<Value>().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Hook { ref hook, stage: HookStage::AfterRequest, .. } if hook == "audit"
        ));
        assert_eq!(client.call_count(), 1);
        assert_eq!(journal.entries(), vec!["after 404", "error Hook"]);
    }

    #[tokio::test]
    async fn download_ignores_descriptor_and_hooks() {
        let journal = Journal::default();
        let client = MockClient::new().respond(MockResponse::ok().chunk(vec![9u8; 4]));
        let exec = executor(client.clone(), &journal)
            .with_base_url("https://cdn.test")
            .with_method(MethodDescriptor::post("/ignored", json!({})));

        let blob = exec
            .download("files/a.bin", TransportOptions::default())
            .await
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(blob.bytes().as_ref(), &[9u8; 4]);

        let sent = client.requests();
        assert_eq!(sent[0].url, "https://cdn.test/files/a.bin");
        assert_eq!(sent[0].method, http::Method::GET);
        assert!(journal.entries().is_empty());
    }
}
