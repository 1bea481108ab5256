//! Vizij Rive codec (engine-agnostic)
//!
//! Low-level building blocks for reading and writing the `.riv` binary
//! format: LEB128 varints, little-endian fixed-width fields, typed property
//! payloads and the runtime header with its property field table.
//!
//! Readers never panic on malformed input. Every out-of-bounds read flips a
//! sticky overflow flag and yields a zero value; callers check
//! [`BinaryReader::did_overflow`] once they are done with a record.

pub mod error;
pub mod field;
pub mod header;
pub mod num;
pub mod reader;
pub mod value;
pub mod writer;

pub use error::HeaderError;
pub use field::FieldType;
pub use header::{RuntimeHeader, FINGERPRINT, MAJOR_VERSION, MINOR_VERSION};
pub use num::fits_in;
pub use reader::BinaryReader;
pub use value::PropertyValue;
pub use writer::BinaryWriter;
