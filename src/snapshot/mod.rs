//! iwinfo client snapshots.
//!
//! A snapshot is a table written by the wireless stats tool: one header
//! line, then one line per associated client. This module turns such a
//! table into [`ClientStat`] records and defines where the table is read
//! from.

mod parser;
mod record;
mod source;

pub use parser::{scan, ParseError, EXPECTED_TOKENS};
pub use record::{ClientStat, Field};
pub use source::{SnapshotError, SnapshotProvider, SnapshotSource};
