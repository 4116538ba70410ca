#[macro_use]
pub mod macros; // must stay at the top
pub mod math;
pub mod geometry;
pub mod spectrum;
pub mod sampler;
pub mod filter;
pub mod film;
pub mod camera;
pub mod material;
pub mod light;
pub mod shape;
pub mod bvh;
pub mod scene;
pub mod loaders;
pub mod shader;
pub mod renderer;
pub mod tonemap;
pub mod imageio;

pub use geometry::*;
pub use math::*;

use cgmath::{Point2, Point3, Vector2, Vector3};

pub type Float = f32;

pub type Point2f = Point2<Float>;
pub type Point2i = Point2<i32>;
pub type Point3f = Point3<Float>;
pub type Vec2f = Vector2<Float>;
pub type Vec2i = Vector2<i32>;
pub type Vec3f = Vector3<Float>;
