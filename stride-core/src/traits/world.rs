//! Host driving loop trait

/// A host world advanced by exactly one fixed step between motion ticks
pub trait PhysicsWorld {
    /// Resynchronise transforms, advance physics by `dt` seconds and refresh
    /// collision signals before the next sample is read
    fn advance(&mut self, dt: f32);
}
