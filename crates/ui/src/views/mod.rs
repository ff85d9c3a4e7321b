mod attempt;
mod home;
mod practice;
mod result;
mod state;

#[cfg(test)]
pub(crate) mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use attempt::AttemptView;
pub use home::HomeView;
pub use practice::PracticeView;
pub use result::ResultView;
pub use state::{ViewError, ViewState, view_state_from_resource};
