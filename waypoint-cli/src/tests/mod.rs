//! Shared test harness modules for the waypoint CLI.

use super::*;

mod helpers;
