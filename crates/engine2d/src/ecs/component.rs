//! Component trait

/// Marker for data that can be stored per entity
///
/// One storage table exists per implementing type.
pub trait Component: 'static {}
