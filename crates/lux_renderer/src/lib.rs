//! Lux Renderer - interruptible CPU path tracing.
//!
//! A Monte Carlo path tracer over a small closed set of primitives and
//! materials, accelerated by a BVH. Frames are rendered either in one batch
//! (`render_parallel`) or progressively by a [`FrameScheduler`], whose
//! worker pool can be paused for presentation and restarted when the scene
//! changes.
//!
//! # Example
//!
//! ```ignore
//! use lux_renderer::*;
//!
//! let config = RenderConfig::default();
//! let primitives: Vec<Box<dyn Primitive>> = vec![
//!     Box::new(YPlane::new(0.0, Material::diffuse(Color::splat(0.8)))),
//!     Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Material::metal(Color::ONE, 1.0))),
//! ];
//! let world = World::new(primitives, Environment::default(), config, &mut rand::thread_rng())?;
//!
//! let mut scheduler = FrameScheduler::new(world);
//! scheduler.start_frame()?;
//! while scheduler.needs_presentation() {
//!     let pixels = scheduler.acquire_framebuffer_for_presentation();
//!     // upload pixels.to_argb_bytes()
//!     scheduler.resume_after_presentation();
//! }
//! ```

mod bvh;
mod camera;
mod cube;
mod environment;
mod error;
mod framebuffer;
mod hittable;
mod material;
mod mesh;
mod plane;
mod renderer;
mod rotate;
pub mod sampling;
mod scheduler;
mod span;
mod sphere;
mod texture;
mod triangle;
mod world;

pub use bvh::Bvh;
pub use camera::{Camera, CameraPlacement, WORLD_UP};
pub use cube::Cube;
pub use environment::Environment;
pub use error::{ConfigError, SceneError};
pub use framebuffer::{Framebuffer, BYTES_PER_PIXEL};
pub use hittable::{intersect_all, HitInfo, Primitive, T_MIN};
pub use material::{Color, Material};
pub use mesh::PolygonMesh;
pub use plane::YPlane;
pub use renderer::{pixel_rng, quantize, render_parallel, render_reference, RenderConfig, ToneMap};
pub use rotate::{Axis, Rotate};
pub use scheduler::{FrameScheduler, ThreadState};
pub use span::{split_spans, PixelSpan, StrideCursor};
pub use sphere::Sphere;
pub use texture::{Texture, CHECKER_SCALE};
pub use triangle::Triangle;
pub use world::World;

/// Re-export common math types from lux_math
pub use lux_math::{Aabb, Ray, Vec2, Vec3};
