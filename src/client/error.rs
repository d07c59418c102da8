//! Typed accessor errors.

use thiserror::Error;

/// A property value could not be converted to the requested type.
///
/// Messages name the property but never include its value.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The value is not an integer in range.
    #[error("Property '{name}' is not a valid integer: {source}")]
    Integer {
        /// The property name
        name: String,
        /// Underlying parse error
        #[source]
        source: std::num::ParseIntError,
    },

    /// The value is neither `true` nor `false`.
    #[error("Property '{name}' is not a valid boolean")]
    Boolean {
        /// The property name
        name: String,
    },
}
