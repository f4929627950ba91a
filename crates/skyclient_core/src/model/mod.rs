//! Service data models.
//!
//! # Responsibility
//! - Define the records exchanged with remote services.
//! - Keep records as plain values: structural equality, hashing, cloning.
//!
//! # Invariants
//! - Records perform no local validation; documented constraints are
//!   enforced by the remote service.
//! - Unset optional fields are `None`; list fields default to empty.

pub mod metadata;
pub mod scaling_policy;
pub mod storage_location;

use std::fmt::{Display, Formatter};

/// Writes the `{Name: value,Other: value}` form shared by record `Display` impls.
pub(crate) struct RecordFormatter<'a, 'b> {
    f: &'a mut Formatter<'b>,
    wrote_field: bool,
}

impl<'a, 'b> RecordFormatter<'a, 'b> {
    pub(crate) fn begin(f: &'a mut Formatter<'b>) -> Result<Self, std::fmt::Error> {
        f.write_str("{")?;
        Ok(Self {
            f,
            wrote_field: false,
        })
    }

    pub(crate) fn field(&mut self, name: &str, value: &dyn Display) -> std::fmt::Result {
        if self.wrote_field {
            self.f.write_str(",")?;
        }
        self.wrote_field = true;
        write!(self.f, "{name}: {value}")
    }

    /// Writes the field only when it is set.
    pub(crate) fn optional<T: Display>(&mut self, name: &str, value: Option<T>) -> std::fmt::Result {
        match value {
            Some(value) => self.field(name, &value),
            None => Ok(()),
        }
    }

    /// Writes `Name: [a, b]`; lists are always written.
    pub(crate) fn list<T: Display>(&mut self, name: &str, values: &[T]) -> std::fmt::Result {
        self.field(name, &DisplayList(values))
    }

    pub(crate) fn finish(self) -> std::fmt::Result {
        self.f.write_str("}")
    }
}

struct DisplayList<'a, T>(&'a [T]);

impl<T: Display> Display for DisplayList<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

/// Renders floating point values with a fractional part (`1.0`, not `1`).
pub(crate) struct DisplayDouble(pub(crate) f64);

impl Display for DisplayDouble {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
