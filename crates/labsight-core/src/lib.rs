//! # labsight-core
//!
//! The pure classification runtime for labsight.
//!
//! This crate provides:
//! - The two trait seams (`Classifier`, `Clock`)
//! - The `PanelEvaluator` that runs a classifier over a whole lab panel
//! - `days_since`, the elapsed-day helper behind "last visit N days ago"
//!
//! ## Usage
//!
//! ```rust,ignore
//! use labsight_core::{PanelEvaluator, traits::Classifier};
//! ```

pub mod elapsed;
pub mod panel;
pub mod traits;

pub use elapsed::{days_since, days_since_str, parse_instant};
pub use panel::PanelEvaluator;
pub use traits::{Classifier, Clock, FixedClock, SystemClock, LIVER_FUNCTION_GROUP};
