//! Platform-agnostic core of the hero scene.
//!
//! Everything here is plain Rust and runs on the host: the procedural mesh
//! and texture builders, particle fields, terrain transforms, the camera rig,
//! the per-frame update and the resource ledger used for teardown. The web
//! and native front-ends only translate platform events into [`InputState`]
//! and hand the [`Scene`] to a [`Renderer`].
//!
//! The analytics counter and contact-form validation used by the rest of the
//! page also live here so they can be tested without a browser.

pub mod analytics;
pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod contact;
pub mod error;
pub mod frame;
pub mod input;
pub mod lifecycle;
pub mod mesh;
pub mod particles;
pub mod scene;
pub mod terrain;
pub mod texture;
pub mod transform;

pub use analytics::*;
pub use camera::*;
pub use color::Rgb;
pub use config::*;
pub use constants::*;
pub use contact::*;
pub use error::{HeroError, Result};
pub use frame::*;
pub use input::*;
pub use lifecycle::*;
pub use mesh::*;
pub use particles::*;
pub use scene::*;
pub use terrain::*;
pub use texture::*;
pub use transform::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../../../shaders/post.wgsl");
