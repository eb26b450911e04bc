//! Pure domain decisions.
//!
//! Stores load the rows they need, call into these functions while holding
//! their lock or transaction, and only write when the rule returns `Ok`.

pub mod directory;
pub mod ledger;
pub mod registry;
pub mod roster;
