//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one flow against mock
//! adapters.  All tests run on the host (x86_64) with no real hardware
//! required.

mod compose_send_tests;
mod concurrency_tests;
mod mock_hw;
mod receive_playback_tests;
