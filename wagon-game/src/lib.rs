//! Wagon Trail Game Engine
//!
//! Platform-agnostic rules for the wagon trail simulation. The whole game is
//! a single pure reducer: feed it the current [`WorldState`] (or nothing, on
//! the first call) and an [`Action`], and it returns the next state.
//!
//! ```
//! use wagon_game::{Action, WorldState, reduce};
//!
//! let wagon = reduce(None, &Action::Unknown);
//! let wagon = reduce(Some(&wagon), &Action::Travel { days: 1 });
//! assert_eq!(wagon, WorldState::new(80, 10, 1));
//! ```

pub mod action;
pub mod constants;
pub mod journey;
pub mod numbers;
pub mod reducer;
pub mod rules;
pub mod state;

// Re-export commonly used types
pub use action::{Action, ActionError, ActionKind, ActionRecord};
pub use journey::{Journey, StepRecord};
pub use reducer::{
    Outcome, Rejection, Transition, fold, fold_from, fold_with, reduce, reduce_with, transition,
    transition_with,
};
pub use rules::{RulesError, TrailRules};
pub use state::WorldState;
