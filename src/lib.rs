//! Builds an HDRi dome and places a sun light at the brightest spot of the
//! environment image projected onto it.
//!
//! The pipeline is one-way and stateless:
//!
//! ```text
//! EnvironmentImage -> scan -> UvCoordinate -> project -> Projection -> place_sun -> SunLight
//! ```
//!
//! Scene mutation is left to a [`SceneBuilder`] supplied by the caller.

#![deny(unsafe_code)]

macro_rules! export {
    [$( $module:ident ),* $(,)*] => {
        $(
            mod $module;
            pub use self::$module::*;
        )*
    };
}

mod analysis;
mod domain;
mod error;
mod scene;

pub use analysis::*;
pub use domain::*;
pub use error::{DomeError, DomeResult};
pub use scene::*;
