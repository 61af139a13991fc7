//! Venue Tools Library
//!
//! Helpers pulled out of the Fyyur venue booking site:
//! - Parse loosely delimited timestamps into UTC
//! - Render timestamps in the site's display formats
//! - Delete a venue over HTTP and navigate back to the site root
//!
//! # Example
//!
//! ```
//! use venue_tools::date::parse_iso_string;
//! use venue_tools::format::{format_datetime, DateFormat};
//!
//! let start = parse_iso_string("2019-05-21T21:30:00.000Z").unwrap();
//! assert_eq!(format_datetime(&start, DateFormat::Medium), "Tue 05, 21, 2019 9:30PM");
//! ```

pub mod error;
pub mod date;
pub mod format;
pub mod logging;
pub mod venue;

// Re-export commonly used items
pub use error::{Error, Result};
pub use date::{parse_iso_string, parse_iso_string_lenient, TimestampComponents};
pub use format::{format_datetime, DateFormat};
pub use venue::{DeleteAction, DeleteConfig, DeleteEvent, Location, Navigator, RedirectScheme, Transport};
