//! Testing utilities for readers and sequencers.
//!
//! - **In-memory sources**: [`VecSource`] feeds prepared rows to a
//!   [`RecordSequencer`](crate::RecordSequencer) without touching the disk
//! - **Assertions**: [`assert_ordinals`], [`assert_row_error`]
//! - **Mock I/O**: [`TempFilePath`], [`write_fixture`]
//!
//! # Quick Start
//!
//! ```
//! use rowcast::processor::PassThrough;
//! use rowcast::testing::*;
//! use rowcast::RecordSequencer;
//!
//! # fn main() -> rowcast::Result<()> {
//! let mut sequencer = RecordSequencer::new(VecSource::new(vec!["a", "b"]), PassThrough::new());
//! let records = sequencer.drain(Default::default(), None)?;
//! assert_ordinals(&records, &[0, 1]);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod mock_io;
pub mod sources;

pub use assertions::*;
pub use mock_io::*;
pub use sources::*;
