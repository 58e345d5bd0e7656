use crate::error::{ErrorKind, FlowResult};
use crate::flow_error;
use crate::state::offset::{OffsetPayload, OffsetStore};

/// Offset store whose reads always fail, for exercising the fallback path.
#[derive(Debug, Clone, Copy)]
pub struct FailingOffsetStore;

impl OffsetStore for FailingOffsetStore {
    async fn load_offset(&self) -> FlowResult<Option<OffsetPayload>> {
        Err(flow_error!(
            ErrorKind::OffsetStoreError,
            "offset store read failed"
        ))
    }
}
