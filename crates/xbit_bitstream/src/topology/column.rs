use crate::frame_address::FrameAddress;

/// One column (major address) of minor frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationColumn {
    frame_count: u32,
}

impl ConfigurationColumn {
    /// A column holding `frame_count` minor frames.
    pub fn new(frame_count: u32) -> Self {
        Self { frame_count }
    }

    /// Builds a column from the addresses of its frames. The frame count is
    /// one more than the largest minor address seen.
    ///
    /// # Panics
    ///
    /// Panics if `addresses` is empty or spans more than one column.
    pub fn from_frame_addresses<F: FrameAddress>(addresses: &[F]) -> Self {
        let first = addresses[0];
        assert!(
            addresses.iter().all(|a| a.with_minor(0) == first.with_minor(0)),
            "frame addresses span multiple columns"
        );
        let max_minor = addresses.iter().map(|a| a.minor()).max().unwrap_or(0);
        Self::new(max_minor + 1)
    }

    /// Number of minor frames.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Whether the minor field of `address` lies in this column.
    pub fn is_valid_frame_address<F: FrameAddress>(&self, address: F) -> bool {
        address.minor() < self.frame_count
    }

    /// The following minor frame, or `None` past the last one.
    pub fn next_frame_address<F: FrameAddress>(&self, address: F) -> Option<F> {
        let next_minor = address.minor() + 1;
        (next_minor < self.frame_count).then(|| address.with_minor(next_minor))
    }
}
