//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host (x86_64) with no
//! real hardware required.

// embassy-sync's CriticalSectionRawMutex needs an implementation on host.
use critical_section as _;

mod controller_flow_tests;
mod mock_hw;
mod poll_loop_tests;
