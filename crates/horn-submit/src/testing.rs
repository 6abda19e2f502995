//! In-process relay for session tests.

use std::sync::Mutex;

use async_trait::async_trait;
use horn_core::RelayPayload;

use crate::client::RelayClient;
use crate::error::{SubmitError, SubmitResult};

/// Records every payload and answers with a fixed outcome.
pub(crate) struct FakeRelay {
    fail: bool,
    sent: Mutex<Vec<RelayPayload>>,
}

impl FakeRelay {
    pub(crate) fn succeeding() -> Self {
        FakeRelay {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        FakeRelay {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sent(&self) -> Vec<RelayPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelayClient for FakeRelay {
    async fn send(&self, payload: &RelayPayload) -> SubmitResult<()> {
        self.sent.lock().unwrap().push(payload.clone());
        if self.fail {
            Err(SubmitError::Rejected {
                status: 502,
                message: "Failed to send email.".into(),
            })
        } else {
            Ok(())
        }
    }
}
