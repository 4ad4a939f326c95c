//! Process-wide default client for application code.
//!
//! Library types never read this; they take an explicit `Arc<RpcClient>`.
//! Binaries and scripts may register one client at startup and fetch it
//! where threading a handle through is inconvenient.

use std::sync::{Arc, OnceLock};

use crate::rpc::RpcClient;

static SHARED_CLIENT: OnceLock<Arc<RpcClient>> = OnceLock::new();

/// Register the shared client. Returns the client back if one is already set.
pub fn set_shared_client(client: Arc<RpcClient>) -> Result<(), Arc<RpcClient>> {
    SHARED_CLIENT.set(client)
}

/// The registered client, if any.
pub fn shared_client() -> Option<Arc<RpcClient>> {
    SHARED_CLIENT.get().cloned()
}
