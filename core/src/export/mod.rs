//! Network exporters

pub mod dot;

pub use self::dot::render_dot;
