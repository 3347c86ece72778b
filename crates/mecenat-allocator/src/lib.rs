#![deny(warnings)]
//! Allocation engines for the Mécénat cultural-donation platform.
//!
//! Two independent engines share the same shape: [`DonationAllocator`]
//! spreads a donor's gift across territorial levels and optional targeted
//! projects, [`CapAllocator`] simulates how a project draws its funding from
//! territorial pools under bonus/malus-adjusted caps.
//!
//! Both are pure synchronous calculation engines: every command runs to
//! completion, out-of-range values are clamped (and the clamping reported),
//! and the commit operations (`submit`, `validate`) are the only ones that
//! can fail, when their validity gate does not hold. A rendering adapter is
//! expected to read state through the query methods and request mutations
//! through the command methods; it holds no copy of its own.

/// Owner-side cap-bounded funding allocation
pub mod cap;
/// Donor-facing project catalog and search
pub mod catalog;
/// Donor-side donation distribution
pub mod donation;
/// Structured errors for engine operations
pub mod error;
/// Owner landing-page project ordering
pub mod portfolio;
/// Plain-text receipt rendering
pub mod receipt;
/// Demonstration data for both dashboards
pub mod samples;

pub use cap::{
    AdjustmentBand, AppliedAdjustment, AutoFillOutcome, CapAllocator, FundingRow, FundingStatus,
    base_cap,
};
pub use catalog::ProjectCatalog;
pub use donation::{DonationAllocator, DonationSummary, LevelRow, SummaryStatus};
pub use error::{AllocError, AllocResult};
pub use portfolio::{OwnedProject, ProjectStatus, sort_for_display};
