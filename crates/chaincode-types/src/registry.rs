//! Registry trait for self-registering implementations.
//!
//! Backends declare the name they are configured under together with the
//! factory that builds them.

/// Base trait for implementation registries.
///
/// Each backend module provides a `Registry` struct implementing this trait,
/// so that every implementation declares its configuration name and a
/// factory function.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// e.g. "memory" for `storage.implementations.memory`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Returns the factory that creates instances of this implementation
	/// from its configuration table.
	fn factory() -> Self::Factory;
}
