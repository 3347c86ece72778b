#![deny(warnings)]
//! Mécénat Types
//!
//! This crate defines the domain types shared by the allocation engines and
//! any front-end adapter (donor-side territorial levels and donation records,
//! owner-side funding levels and bonus/malus histories), plus the money
//! helpers both sides derive their euro amounts with.

mod money;
mod types;

pub use money::{derive_amount, fmt_euro, round_euro};
pub use types::{
    AdjustmentEntry, AdjustmentHistory, Clamped, DonationRecord, DonationTarget, FundingLevel,
    InvalidLevel, LevelKind, ProjectInfo, SelectedProject, TerritorialLevel,
};
