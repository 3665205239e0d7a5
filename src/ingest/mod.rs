/// Input loaders.
///
/// Submodules:
/// - `firms` - FIRMS archive / normalized detection CSV parsing.
/// - `fixtures` (test only) - representative CSV payloads.

pub mod firms;

#[cfg(test)]
pub(crate) mod fixtures;
