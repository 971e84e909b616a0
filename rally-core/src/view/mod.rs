//! Publishing derived views to the rendering collaborator.

pub mod publisher;

pub use publisher::{NullRenderSink, RenderSink, ViewPublisher};
