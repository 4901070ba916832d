//! Definition of the factor module
//!
//! A `Factor` represents a relationship between a small, fixed set of neighbor `Variable`s. The
//! model graph and the evaluation of potential functions live outside this crate; what this
//! module defines is the boundary inference code consumes - positional access to a factor's
//! neighbors - plus a table-backed implementation used wherever enumeration results need to be
//! scored against a concrete potential.

use assignment::Assignment;
use util::{AmbroseError, Result};
use variable::{Value, Variable};

use ndarray::prelude as nd;

/// Alias f64 ndarray::Array as Table
pub type Table = nd::ArrayD<f64>;


/// A potential over a fixed, small set of neighbor `Variable`s (arity 1 through 4)
pub trait Factor {

    /// The neighbor `Variable`s of this factor, by position
    fn neighbors(&self) -> Vec<Variable>;

    /// The number of neighbors
    fn arity(&self) -> usize {
        self.neighbors().len()
    }

}


/// A `Factor` whose potential is a dense table over the joint domain of its neighbors.
///
/// The table's dimensions correspond positionally to the neighbors, so a `FixedAssignment`
/// produced by `AssignmentIterator` over the neighbors walks the table in row-major order.
#[derive(Clone, Debug)]
pub struct TableFactor {
    neighbors: Vec<Variable>,
    table: Table
}

impl TableFactor {

    /// Create a new `TableFactor`.
    ///
    /// # Args
    /// * `neighbors`: the discrete neighbor variables, in table-dimension order
    /// * `table`: the potential values, one dimension per neighbor, with shape matching the
    ///   neighbor cardinalities
    ///
    /// # Errors
    /// * `AmbroseError::ArityExceeded`, if there are more than four neighbors
    /// * `AmbroseError::General`, if the neighbor list is empty or the table shape does not match
    /// * `AmbroseError::InvalidValue`, if a neighbor is continuous or the table holds a negative
    ///   value
    pub fn new(neighbors: Vec<Variable>, table: Table) -> Result<TableFactor> {
        if neighbors.is_empty() {
            return Err(AmbroseError::General(
                String::from("Invalid arguments. A factor requires at least one neighbor")
            ));
        } else if neighbors.len() > 4 {
            return Err(AmbroseError::ArityExceeded(neighbors.len()));
        } else if neighbors.len() != table.ndim() {
            return Err(AmbroseError::General(
                String::from("Invalid arguments. Arity must match the number of table dimensions")
            ));
        }

        for (v, &t) in neighbors.iter().zip(table.shape().iter()) {
            match v.cardinality() {
                Some(n) if n == t => (),
                Some(_) => {
                    return Err(AmbroseError::General(
                        String::from("Invalid arguments. Table dimensions do not match cardinalities")
                    ));
                },
                None => {
                    return Err(AmbroseError::InvalidValue(
                        String::from("table factors require discrete neighbors")
                    ));
                }
            }
        }

        if table.iter().any(|&v| v < 0.0) {
            return Err(AmbroseError::InvalidValue(
                String::from("potentials may not be negative")
            ));
        }

        Ok(TableFactor { neighbors, table })
    }

    /// Retrieve the potential value for an assignment to this factor's neighbors.
    ///
    /// Each neighbor is resolved through the assignment, so a fixed-arity assignment that binds
    /// only some neighbors supplies the rest from live variable state.
    ///
    /// # Errors
    /// * `AmbroseError::VariableNotBound`, surfaced from an assignment without a live fallback
    ///   that is missing a neighbor
    /// * `AmbroseError::InvalidValue`, if the assignment resolves a neighbor to a continuous
    ///   value or to a code outside the neighbor's domain
    pub fn value(&self, assignment: &dyn Assignment) -> Result<f64> {
        let mut idx = Vec::with_capacity(self.neighbors.len());
        for v in &self.neighbors {
            match assignment.value(v)? {
                Value::Discrete(code) => idx.push(code),
                Value::Continuous(_) => {
                    return Err(AmbroseError::InvalidValue(
                        String::from("cannot index a table by a continuous value")
                    ));
                }
            }
        }

        // fixed-arity assignments do not domain-validate, so the codes must be bounds checked
        self.table
            .get(nd::IxDyn(&idx))
            .cloned()
            .ok_or_else(|| AmbroseError::InvalidValue(
                String::from("assigned value is outside the neighbor's domain")
            ))
    }

}

impl Factor for TableFactor {

    fn neighbors(&self) -> Vec<Variable> {
        self.neighbors.clone()
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use assignment::{Assignment1, AssignmentIterator, CurrentAssignment};

    #[test]
    fn table_factor() {
        let a = Variable::binary();
        let b = Variable::discrete(3);

        let table = array![[0.25, 0.35, 0.08], [0.16, 0.05, 0.11]].into_dyn();
        let f = TableFactor::new(vec![a.clone(), b.clone()], table).unwrap();

        assert_eq!(2, f.arity());
        assert_eq!(vec![a, b], f.neighbors());
    }

    #[test]
    fn table_factor_errs() {
        // empty neighbor list
        let table = Table::ones(vec![2]);
        assert!(TableFactor::new(vec![], table).is_err());

        // too many neighbors
        let vars: Vec<Variable> = (0..5).map(|_| Variable::binary()).collect();
        let table = Table::ones(vec![2, 2, 2, 2, 2]);
        match TableFactor::new(vars, table) {
            Err(AmbroseError::ArityExceeded(5)) => (),
            _ => panic!("expected ArityExceeded")
        };

        // mismatched dimensions
        let vars = vec![Variable::binary(), Variable::binary()];
        let table = Table::ones(vec![2, 2, 2]);
        assert!(TableFactor::new(vars, table).is_err());

        // wrong cardinality
        let vars = vec![Variable::binary(), Variable::binary()];
        let table = Table::ones(vec![2, 3]);
        assert!(TableFactor::new(vars, table).is_err());

        // continuous neighbor
        let vars = vec![Variable::continuous()];
        let table = Table::ones(vec![2]);
        match TableFactor::new(vars, table) {
            Err(AmbroseError::InvalidValue(_)) => (),
            _ => panic!("expected InvalidValue")
        };
    }

    #[test]
    fn value() {
        let a = Variable::binary();
        let b = Variable::binary();

        let table = array![[0.1, 0.2], [0.3, 0.4]].into_dyn();
        let f = TableFactor::new(vec![a.clone(), b.clone()], table).unwrap();

        // the current-state assignment resolves every neighbor to its live value
        a.set_code(1, None).unwrap();
        b.set_code(0, None).unwrap();
        assert_eq!(0.3, f.value(&CurrentAssignment).unwrap());

        // a fixed-arity assignment binding only `a` falls back to `b`'s live value
        let assn = Assignment1::new(&a, Value::Discrete(0));
        assert_eq!(0.1, f.value(&assn).unwrap());
    }

    #[test]
    fn value_out_of_domain_code() {
        let a = Variable::binary();
        let b = Variable::binary();

        let table = array![[0.1, 0.2], [0.3, 0.4]].into_dyn();
        let f = TableFactor::new(vec![a.clone(), b], table).unwrap();

        // fixed-arity constructors do not domain-validate, so an out-of-range code can reach
        // the table lookup; it must surface as an error rather than an out-of-bounds index
        let assn = Assignment1::new(&a, Value::Discrete(5));
        match f.value(&assn) {
            Err(AmbroseError::InvalidValue(_)) => (),
            _ => panic!("expected InvalidValue")
        };
    }

    #[test]
    fn enumeration_row_major() {
        let a = Variable::binary();
        let b = Variable::discrete(3);

        let table = array![[0.25, 0.35, 0.08], [0.16, 0.05, 0.11]].into_dyn();
        let f = TableFactor::new(vec![a.clone(), b.clone()], table.clone()).unwrap();

        // enumeration order corresponds to the flattened table, cell for cell
        let iter = AssignmentIterator::for_factor(&f, &f.neighbors().into_iter().collect()).unwrap();
        let scored: Vec<f64> = iter.map(|assn| f.value(&assn).unwrap()).collect();
        let flat: Vec<f64> = table.iter().cloned().collect();
        assert_eq!(flat, scored);
    }

}
