// modbridge_mappings - Versioned source-to-target API mapping table
//! The mapping table is loaded read-only before a conversion run and never
//! mutated by the engine. [`MappingTable::resolve`] is a pure in-memory
//! lookup with degrade-to-nearest-older version semantics; a miss is a
//! signal for the transpiler's compromise strategies, not an error.

mod table;
mod types;

pub use table::{MappingError, MappingTable};
pub use types::{ApiMapping, ConversionType, UNSUPPORTED};

#[cfg(test)]
mod tests;
