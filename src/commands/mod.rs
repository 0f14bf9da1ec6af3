//! Tauri command surface — thin wrappers over `crate::core` and
//! `crate::account`, one file per concern.

mod account;
mod auth;
mod misc;
mod profile;
mod remote;
mod settings;
mod styles;

pub use account::*;
pub use auth::*;
pub use misc::*;
pub use profile::*;
pub use remote::*;
pub use settings::*;
pub use styles::*;
