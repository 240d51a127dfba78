mod aabb;
mod color;
mod ray;

pub use aabb::AABB;
pub use color::rgb_hex;
pub use ray::{intersect_aabb, Ray};
