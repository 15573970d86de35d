//! Port bindings: which bus each named field of a process refers to.

use indexmap::IndexMap;
use sme_core::BusId;

use crate::error::BindError;

/// Direction of a bound field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The process reads the bus.
    Input,
    /// The process drives the bus.
    Output,
}

/// A process's field-name → bus bindings.
///
/// Populated once during [`Setup::setup`](crate::Setup::setup) through
/// [`map_inputs`](Ports::map_inputs) and [`map_outputs`](Ports::map_outputs),
/// then frozen: the network never hands out `&mut Ports` after wiring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ports {
    process: String,
    inputs: IndexMap<String, BusId>,
    outputs: IndexMap<String, BusId>,
}

impl Ports {
    /// Empty bindings for the named process.
    pub fn new(process: impl Into<String>) -> Self {
        Self {
            process: process.into(),
            ..Self::default()
        }
    }

    /// Name of the owning process.
    pub fn process_name(&self) -> &str {
        &self.process
    }

    /// Bind `buses[i]` as the input field `fields[i]`.
    ///
    /// Fails with [`BindError::BusMapMismatch`] if the lists differ in
    /// length, and [`BindError::DuplicateField`] if a field is already
    /// bound in either direction. Nothing is bound on failure.
    pub fn map_inputs(&mut self, buses: &[BusId], fields: &[&str]) -> Result<(), BindError> {
        self.map(Direction::Input, buses, fields)
    }

    /// Bind `buses[i]` as the output field `fields[i]`.
    pub fn map_outputs(&mut self, buses: &[BusId], fields: &[&str]) -> Result<(), BindError> {
        self.map(Direction::Output, buses, fields)
    }

    fn map(
        &mut self,
        direction: Direction,
        buses: &[BusId],
        fields: &[&str],
    ) -> Result<(), BindError> {
        if buses.len() != fields.len() {
            return Err(BindError::BusMapMismatch {
                process: self.process.clone(),
                buses: buses.len(),
                fields: fields.len(),
            });
        }
        for (i, field) in fields.iter().enumerate() {
            if self.direction(field).is_some() || fields[..i].contains(field) {
                return Err(BindError::DuplicateField {
                    process: self.process.clone(),
                    field: field.to_string(),
                });
            }
        }

        let target = match direction {
            Direction::Input => &mut self.inputs,
            Direction::Output => &mut self.outputs,
        };
        for (field, &bus) in fields.iter().zip(buses) {
            target.insert(field.to_string(), bus);
        }
        Ok(())
    }

    /// The bus bound to input field `field`.
    pub fn input(&self, field: &str) -> Option<BusId> {
        self.inputs.get(field).copied()
    }

    /// The bus bound to output field `field`.
    pub fn output(&self, field: &str) -> Option<BusId> {
        self.outputs.get(field).copied()
    }

    /// Direction of `field`, if bound.
    pub fn direction(&self, field: &str) -> Option<Direction> {
        if self.inputs.contains_key(field) {
            Some(Direction::Input)
        } else if self.outputs.contains_key(field) {
            Some(Direction::Output)
        } else {
            None
        }
    }

    /// Input bindings in binding order.
    pub fn inputs(&self) -> impl Iterator<Item = (&str, BusId)> {
        self.inputs.iter().map(|(f, &b)| (f.as_str(), b))
    }

    /// Output bindings in binding order.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, BusId)> {
        self.outputs.iter().map(|(f, &b)| (f.as_str(), b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_buses_with_fields() {
        let mut p = Ports::new("adder");
        p.map_inputs(&[BusId(0), BusId(1)], &["lhs", "rhs"]).unwrap();
        p.map_outputs(&[BusId(2)], &["sum"]).unwrap();
        assert_eq!(p.input("rhs"), Some(BusId(1)));
        assert_eq!(p.output("sum"), Some(BusId(2)));
        assert_eq!(p.direction("lhs"), Some(Direction::Input));
        assert_eq!(p.direction("nope"), None);
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let mut p = Ports::new("adder");
        assert_eq!(
            p.map_inputs(&[BusId(0)], &["lhs", "rhs"]),
            Err(BindError::BusMapMismatch {
                process: "adder".into(),
                buses: 1,
                fields: 2,
            })
        );
        assert_eq!(p.inputs().count(), 0);
    }

    #[test]
    fn field_cannot_be_bound_twice() {
        let mut p = Ports::new("p");
        p.map_inputs(&[BusId(0)], &["x"]).unwrap();
        assert!(matches!(
            p.map_outputs(&[BusId(1)], &["x"]),
            Err(BindError::DuplicateField { .. })
        ));
        assert!(matches!(
            p.map_outputs(&[BusId(1), BusId(2)], &["y", "y"]),
            Err(BindError::DuplicateField { .. })
        ));
        assert_eq!(p.outputs().count(), 0);
    }
}
