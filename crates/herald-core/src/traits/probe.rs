//! Live-status probe port

use std::collections::HashMap;

use async_trait::async_trait;

use crate::status::StreamProbe;

/// Queries the streaming platform for a handle's live state.
///
/// Implementations never fail: every transport, HTTP, or credential problem
/// collapses into [`StreamProbe::Unknown`].
#[async_trait]
pub trait LiveStatusProbe: Send + Sync {
    /// Probe a single handle
    async fn probe(&self, handle: &str) -> StreamProbe;

    /// Probe many handles. Keys are the handles as given.
    ///
    /// The default issues one lookup per handle; implementations that can
    /// batch should override it.
    async fn probe_many(&self, handles: &[String]) -> HashMap<String, StreamProbe> {
        let mut results = HashMap::with_capacity(handles.len());
        for handle in handles {
            let probe = self.probe(handle).await;
            results.insert(handle.clone(), probe);
        }
        results
    }
}
