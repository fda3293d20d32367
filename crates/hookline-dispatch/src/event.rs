/// Capability every dispatched payload implements.
///
/// Events are plain mutable carriers; the registry only needs to know whether
/// a listener asked to stop propagation. Payloads that never stop can rely on
/// the default and implement the trait with an empty block.
pub trait Event: Send {
    /// Whether later listeners should be skipped.
    ///
    /// Checked before each listener is invoked.
    fn is_propagation_stopped(&self) -> bool {
        false
    }
}
