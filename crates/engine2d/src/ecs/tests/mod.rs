//! ECS integration tests

mod scene_lifecycle;
mod world_properties;
