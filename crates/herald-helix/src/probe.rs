//! `LiveStatusProbe` over Helix
//!
//! Every failure maps to `StreamProbe::Unknown` so callers never mistake an
//! outage for "offline".

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use herald_core::{LiveStatusProbe, LiveStream, StreamProbe};

use crate::client::HelixClient;
use crate::config::MAX_LOGINS_PER_REQUEST;

#[async_trait]
impl LiveStatusProbe for HelixClient {
    async fn probe(&self, handle: &str) -> StreamProbe {
        let handles = [handle.to_string()];
        self.probe_many(&handles)
            .await
            .remove(handle)
            .unwrap_or(StreamProbe::Unknown)
    }

    async fn probe_many(&self, handles: &[String]) -> HashMap<String, StreamProbe> {
        let mut results = HashMap::with_capacity(handles.len());

        for batch in handles.chunks(MAX_LOGINS_PER_REQUEST) {
            match self.get_streams(batch).await {
                Ok(streams) => {
                    let mut live: HashMap<String, LiveStream> = streams
                        .into_iter()
                        .map(LiveStream::from)
                        .map(|s| (s.user_login.clone(), s))
                        .collect();

                    for handle in batch {
                        let probe = live
                            .remove(&handle.to_ascii_lowercase())
                            .map_or(StreamProbe::Offline, StreamProbe::Live);
                        results.insert(handle.clone(), probe);
                    }
                    debug!(batch = batch.len(), "Probed live status");
                }
                Err(e) => {
                    warn!(error = %e, batch = batch.len(), "Live-status lookup failed; treating batch as unknown");
                    for handle in batch {
                        results.insert(handle.clone(), StreamProbe::Unknown);
                    }
                }
            }
        }

        results
    }
}
