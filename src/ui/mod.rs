//! Panel user interface: geometry, colours, screen composition and the render actor.
//!
//! # Architecture
//!
//! ```text
//! SharedState (mode, page, label) → compose → Screen → Surface::present
//! ```
//!
//! # Modules
//!
//! - [`layout`]: Screen geometry and touch hit-testing
//! - [`theme`]: Colour scheme
//! - [`viewmodel`]: Screens as lists of drawing primitives
//! - [`surface`]: Output boundary and the headless log surface
//! - [`renderer`]: The render actor

pub mod layout;
pub mod renderer;
pub mod surface;
pub mod theme;
pub mod viewmodel;

pub use layout::TouchPoint;
pub use renderer::{spawn_renderer, RenderSettings, Renderer};
pub use surface::{LogSurface, Surface};
pub use theme::{Rgb, Theme};
pub use viewmodel::{compose, compose_farewell, Primitive, Screen};
