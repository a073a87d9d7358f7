//! Residency and policy tests.
