//! Output model of a conversion.
//!
//! These structures are what the host receives: ordered slide fragments, the
//! aggregate stylesheet, the chart request queue and package-level info.

mod chart;
mod conversion;

pub use chart::*;
pub use conversion::*;
