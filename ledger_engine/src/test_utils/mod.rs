//! Helpers for setting up throwaway ledger databases in tests.
pub mod fixtures;
pub mod prepare_env;
