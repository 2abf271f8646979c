use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use crate::error::{DapError, Result};

const ACTIVE: u8 = 0;
const CANCELLED: u8 = 1;
const USER_CANCELLED: u8 = 2;

/// Cooperative cancellation flag, polled by the decoder before every
/// element and row. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicU8>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(CANCELLED, Ordering::Release);
    }

    /// Cancellation requested by an interactive consumer.
    pub fn cancel_by_user(&self) {
        self.0.store(USER_CANCELLED, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire) != ACTIVE
    }

    pub fn reset(&self) {
        self.0.store(ACTIVE, Ordering::Release);
    }

    pub(crate) fn check(&self) -> Result<()> {
        match self.0.load(Ordering::Acquire) {
            ACTIVE => Ok(()),
            USER_CANCELLED => Err(DapError::UserCancelled),
            _ => Err(DapError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(token.check().is_ok());

        thread::spawn(move || handle.cancel()).join().unwrap();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(DapError::Cancelled)));

        token.reset();
        assert!(token.check().is_ok());
    }

    #[test]
    fn user_cancellation_is_distinguished() {
        let token = CancelToken::new();
        token.cancel_by_user();
        assert!(matches!(token.check(), Err(DapError::UserCancelled)));
    }
}
