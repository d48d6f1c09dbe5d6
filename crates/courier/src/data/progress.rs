/// Download progress for a single streamed response.
///
/// Passed to a [`DownloadMonitor`](crate::effects::DownloadMonitor) once per
/// received chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Bytes received so far, cumulative over the whole body.
    pub received: u64,

    /// Declared total from `Content-Length`.
    ///
    /// `None` when the header is absent or not a number (e.g. chunked
    /// transfer encoding). Servers may also declare a wrong value, so
    /// `received` can exceed it.
    pub total: Option<u64>,
}

impl Progress {
    pub fn new(received: u64, total: Option<u64>) -> Self { Self { received, total } }

    /// Percentage of the declared total received.
    ///
    /// Returns `None` if the total is unknown.
    ///
    /// ```
    /// use courier::data::Progress;
    ///
    /// assert_eq!(Progress::new(25, Some(100)).percentage(), Some(25.0));
    /// assert_eq!(Progress::new(25, None).percentage(), None);
    /// ```
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.total.map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.received as f64 / total as f64) * 100.0
            }
        })
    }

    #[must_use]
    pub fn is_complete(&self) -> bool { self.total.is_some_and(|total| self.received >= total) }
}
