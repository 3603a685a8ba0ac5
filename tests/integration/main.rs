//! Integration test harness
//!
//! Each module here exercises the built binary or the public library
//! surface. Unit tests live next to the code they cover.

mod helpers;

mod cli_test;
mod store_test;
