//! Streaming answer assembly.
//!
//! [`FragmentStream`] forwards provider fragments to a callback in arrival
//! order. The paired [`StreamHandle`] closes the stream from outside; once
//! closed, no further fragment reaches the callback.

use futures::stream::{AbortHandle, Abortable};
use futures::StreamExt;
use tutor_types::{Result, TutorError};

use crate::ports::{FragmentSource, GenerationPort, GenerationRequest};

/// How a stream ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Finished,
    Cancelled,
}

/// Caller-side handle that stops fragment delivery.
#[derive(Debug, Clone)]
pub struct StreamHandle(AbortHandle);

impl StreamHandle {
    pub fn close(&self) {
        self.0.abort();
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_aborted()
    }
}

pub struct FragmentStream {
    inner: Abortable<FragmentSource>,
    handle: StreamHandle,
}

impl FragmentStream {
    pub fn open(port: &dyn GenerationPort, req: GenerationRequest) -> (Self, StreamHandle) {
        log::debug!("opening {} stream for model {}", port.provider_name(), req.model);
        let (abort, registration) = AbortHandle::new_pair();
        let handle = StreamHandle(abort);
        let stream = Self {
            inner: Abortable::new(port.stream_generate(req), registration),
            handle: handle.clone(),
        };
        (stream, handle)
    }

    /// Deliver every fragment to `on_fragment` until the stream ends, fails, or is closed.
    pub async fn pump<F: FnMut(&str)>(mut self, mut on_fragment: F) -> Result<Completion> {
        while let Some(item) = self.inner.next().await {
            let fragment = item.map_err(normalize_error)?;
            if !fragment.is_empty() {
                on_fragment(&fragment);
            }
        }
        if self.handle.is_closed() {
            Ok(Completion::Cancelled)
        } else {
            Ok(Completion::Finished)
        }
    }
}

/// Every provider failure is either a key problem or a generic generation failure.
fn normalize_error(err: TutorError) -> TutorError {
    log::error!("generation stream failed: {:?}", err);
    if err.is_generation_failure() {
        err
    } else {
        TutorError::from_provider(err.to_string())
    }
}
