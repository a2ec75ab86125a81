use sha2::{Digest, Sha256};

/// SHA-256 state for the 32-byte block check. Wraps the sha2 crate behind a
/// lazily initialized delegate so the containing decoder can be built in a
/// `const` context.
#[derive(Clone, Default, Debug)]
#[repr(transparent)]
pub struct Sha256Check {
    /// Inner digest, created on first use.
    delegate: Option<Sha256>,
}

impl Sha256Check {
    /// Empty, uninitialized state.
    pub(crate) const fn new() -> Self {
        Self { delegate: None }
    }

    /// Drops the accumulated state.
    pub(crate) fn reset(&mut self) {
        self.delegate = None;
    }

    /// Feeds `buf` into the digest.
    pub(crate) fn update(&mut self, buf: &[u8]) {
        Digest::update(self.delegate.get_or_insert_with(Sha256::new), buf);
    }

    /// Finishes the digest, leaving the state empty for the next block.
    pub(crate) fn finalize(&mut self) -> [u8; 32] {
        self.delegate.take().unwrap_or_default().finalize().into()
    }
}
