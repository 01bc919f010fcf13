//! Application mode gate.

/// Whether the application is collecting stops or following a route.
///
/// Position updates centre the map while [`AppState::Configuring`] and feed
/// the waypoint tracker while [`AppState::Navigating`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppState {
    /// Addresses are being entered; no route is active.
    #[default]
    Configuring,
    /// A route is active and positions are being tracked.
    Navigating,
}

impl AppState {
    /// Whether a new route may be built in this state.
    #[must_use]
    pub const fn accepts_new_route(self) -> bool {
        matches!(self, Self::Configuring)
    }
}
