//! Address collection.
//!
//! [`FormMachine`] is the four-step cycle of prompts. [`AddressEntry`] drives
//! it from user input: debounced searches, result selection, reset and the
//! hand-off to the [`Navigator`](crate::Navigator).

mod entry;

use thiserror::Error;

use crate::BuildRouteError;

pub use entry::{AddressEntry, DEFAULT_DEBOUNCE, EntryConfig, MIN_QUERY_CHARS};

/// Step of the address form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormStep {
    /// Collecting the first address.
    #[default]
    First,
    /// Collecting the second address.
    Second,
    /// Collecting the third address.
    Third,
    /// All addresses collected; the route can be started.
    Done,
}

impl FormStep {
    /// Prompt shown for the step.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::First => "Enter first address",
            Self::Second => "Enter second address",
            Self::Third => "Enter third address",
            Self::Done => "Address are ready",
        }
    }

    /// The step after this one; `Done` wraps to `First`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::Third,
            Self::Third => Self::Done,
            Self::Done => Self::First,
        }
    }
}

/// The address form's step and control flags.
///
/// Entering [`FormStep::Done`] enables the start control and disables text
/// entry; leaving it reverses both.
///
/// # Examples
/// ```
/// use waypoint_core::{FormMachine, FormStep};
///
/// let mut form = FormMachine::default();
/// for _ in 0..3 {
///     form.advance();
/// }
/// assert_eq!(form.step(), FormStep::Done);
/// assert!(form.start_enabled());
/// assert!(!form.text_entry_enabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormMachine {
    step: FormStep,
    start_enabled: bool,
    text_entry_enabled: bool,
}

impl Default for FormMachine {
    fn default() -> Self {
        Self {
            step: FormStep::First,
            start_enabled: false,
            text_entry_enabled: true,
        }
    }
}

impl FormMachine {
    /// Current step.
    #[must_use]
    pub const fn step(&self) -> FormStep {
        self.step
    }

    /// Whether the start control is enabled.
    #[must_use]
    pub const fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    /// Whether the text field accepts input.
    #[must_use]
    pub const fn text_entry_enabled(&self) -> bool {
        self.text_entry_enabled
    }

    /// Prompt for the current step.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.step.title()
    }

    /// Move to the next step and return it.
    pub const fn advance(&mut self) -> FormStep {
        self.enter(self.step.next());
        self.step
    }

    /// Return to [`FormStep::First`].
    pub const fn reset(&mut self) {
        self.enter(FormStep::First);
    }

    const fn enter(&mut self, step: FormStep) {
        let done = matches!(step, FormStep::Done);
        self.step = step;
        self.start_enabled = done;
        self.text_entry_enabled = !done;
    }
}

/// Errors returned by [`AddressEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// All addresses have been collected.
    #[error("all addresses have already been entered")]
    EntryComplete,
    /// The selected row does not exist.
    #[error("no search result at index {index}")]
    UnknownResult {
        /// Requested row.
        index: usize,
    },
    /// The route cannot start before every address is collected.
    #[error("cannot start the route while at step {step:?}")]
    NotReady {
        /// Step the form was in.
        step: FormStep,
    },
    /// Stops cannot be added while a route is being navigated.
    #[error("a route is active; wait for it to finish")]
    RouteActive,
    /// Building the route failed.
    #[error(transparent)]
    Build(#[from] BuildRouteError),
}
