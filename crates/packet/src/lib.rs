//! Media units for a capture-decode pipeline.
//!
//! A `MediaUnit` carries one unit of media from capture to display: a hold on
//! the encoded `Payload`, the decoded `Frame`, an optional scratch buffer and
//! the application `Image`. It is decoded through a `DecodeContext`, which
//! wraps an external decoder behind one of the `DecodeStrategy`
//! implementations in `decoder`.
//!
//! Units are not synchronised. Stages hand them to each other by value; the
//! payload storage behind them may be shared by many units at once.

mod config;
pub use config::*;

mod context;
pub use context::*;

pub mod decoder;
pub use decoder::*;

mod error;
pub use error::*;

mod held;
pub use held::*;

mod payload;
pub use payload::*;

mod unit;
pub use unit::*;
