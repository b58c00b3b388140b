//! Pages module for the application.
//!
//! One page per [`taskflow_business::Route`]:
//! - `signup_page`: account creation with live validation and OAuth entry points
//! - `profile_page`: display name, avatar and linked providers
//! - `dashboard_page`: landing page after signup

mod dashboard_page;
mod profile_page;
mod signup_page;

pub use dashboard_page::dashboard_page;
pub use profile_page::profile_page;
pub use signup_page::signup_page;
