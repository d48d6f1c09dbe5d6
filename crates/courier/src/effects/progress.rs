//! Progress-observing response streams.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures_util::Stream;

use crate::data::{HttpRequest, Progress};
use crate::effects::response::{Body, Response};
use crate::effects::transport::HttpClient;
use crate::error::TransportError;

/// Observer of download progress.
///
/// Invoked once per received chunk, in arrival order, never concurrently
/// for the same response. Closures taking `&Progress` implement it.
pub trait DownloadMonitor: Send + Sync {
    fn on_download_progress(&self, progress: &Progress);
}

impl<F> DownloadMonitor for F
where
    F: Fn(&Progress) + Send + Sync,
{
    fn on_download_progress(&self, progress: &Progress) { self(progress) }
}

/// A stream wrapper that reports cumulative progress for every chunk it
/// passes through.
///
/// Chunks are forwarded unchanged and in order. A read error is forwarded
/// without being counted, after which the stream ends.
pub struct ProgressStream<S> {
    inner:    S,
    monitor:  Arc<dyn DownloadMonitor>,
    received: u64,
    total:    Option<u64>,
    finished: bool,
}

impl<S> ProgressStream<S>
where
    S: Stream<Item = Result<Bytes, TransportError>> + Unpin,
{
    /// Wrap `inner`, reporting against the declared `total`.
    pub fn new(inner: S, monitor: Arc<dyn DownloadMonitor>, total: Option<u64>) -> Self {
        Self {
            inner,
            monitor,
            received: 0,
            total,
            finished: false,
        }
    }

    /// Bytes forwarded so far.
    pub fn received(&self) -> u64 { self.received }
}

impl<S> Stream for ProgressStream<S>
where
    S: Stream<Item = Result<Bytes, TransportError>> + Unpin,
{
    type Item = Result<Bytes, TransportError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
            Some(Ok(chunk)) => {
                this.received += chunk.len() as u64;
                let progress = Progress::new(this.received, this.total);
                tracing::trace!(
                    target: "courier::progress",
                    received = progress.received,
                    total = ?progress.total,
                    "chunk received"
                );
                this.monitor.on_download_progress(&progress);
                Poll::Ready(Some(Ok(chunk)))
            }
            Some(Err(e)) => {
                this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            None => {
                this.finished = true;
                Poll::Ready(None)
            }
        }
    }
}

/// Send `request` and, when a monitor is given, instrument the response body.
///
/// Without a monitor, or for a response with no readable body, the
/// response is returned exactly as the client produced it.
pub async fn fetch_with_progress<C: HttpClient>(
    client: &C,
    request: HttpRequest,
    monitor: Option<&Arc<dyn DownloadMonitor>>,
) -> Result<Response, TransportError> {
    let response = client.send(request).await?;

    let Some(monitor) = monitor else {
        return Ok(response);
    };
    if !response.has_body() {
        return Ok(response);
    }

    let total = response.content_length();
    let monitor = Arc::clone(monitor);
    Ok(response.map_body(|body| {
        Body::from_stream(ProgressStream::new(body.into_stream(), monitor, total))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{StreamExt, stream};
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<Progress>>>, Arc<dyn DownloadMonitor>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let monitor: Arc<dyn DownloadMonitor> =
            Arc::new(move |p: &Progress| sink.lock().unwrap().push(*p));
        (seen, monitor)
    }

    #[tokio::test]
    async fn reports_cumulative_counts_per_chunk() {
        let (seen, monitor) = recorder();
        let chunks = vec![
            Ok(Bytes::from(vec![1u8; 40])),
            Ok(Bytes::from(vec![2u8; 35])),
            Ok(Bytes::from(vec![3u8; 25])),
        ];
        let wrapped = ProgressStream::new(stream::iter(chunks), monitor, Some(100));
        let out: Vec<_> = wrapped.map(|c| c.unwrap()).collect().await;

        assert_eq!(out.iter().map(Bytes::len).collect::<Vec<_>>(), vec![40, 35, 25]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Progress::new(40, Some(100)),
                Progress::new(75, Some(100)),
                Progress::new(100, Some(100)),
            ]
        );
    }

    #[tokio::test]
    async fn error_is_forwarded_uncounted_then_ends() {
        let (seen, monitor) = recorder();
        let chunks = vec![
            Ok(Bytes::from_static(b"abc")),
            Err(TransportError::Body("reset by peer".to_string())),
            Ok(Bytes::from_static(b"never")),
        ];
        let mut wrapped = ProgressStream::new(stream::iter(chunks), monitor, None);

        assert_eq!(wrapped.next().await.unwrap().unwrap(), Bytes::from_static(b"abc"));
        assert!(matches!(wrapped.next().await, Some(Err(TransportError::Body(_)))));
        assert!(wrapped.next().await.is_none());
        assert_eq!(wrapped.received(), 3);
        assert_eq!(*seen.lock().unwrap(), vec![Progress::new(3, None)]);
    }
}
