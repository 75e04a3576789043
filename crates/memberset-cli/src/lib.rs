//! # memberset-cli — Command-Line Driver
//!
//! A thin harness around `memberset-pipeline`. It owns no membership logic:
//! it parses update scripts, feeds them to a `Pipeline`, and renders the
//! resulting events.
//!
//! ## Subcommands
//!
//! - `replay` — apply a JSON-lines update script and print every IP set
//!   membership change, optionally followed by the final membership.

pub mod replay;
