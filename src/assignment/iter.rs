//! Combinatorial enumeration of assignments.
//!
//! An `AssignmentIterator` lazily enumerates the Cartesian product of legal values over a set of
//! variables, one `FixedAssignment` per combination. Variables marked "varying" contribute their
//! full discrete domain; all others are held fixed at their current live value. This is the
//! workhorse of exact marginalization and enumeration-based inference over small factors.

use super::fixed::FixedAssignment;
use factor::Factor;
use util::{AmbroseError, Result};
use variable::{Value, Variable};

use std::collections::HashSet;


/// The maximum number of variables the fixed-arity representation supports
const MAX_ARITY: usize = 4;


/// A lazy, finite, single-pass enumeration of joint value assignments.
///
/// Combinations are produced in odometer order: the first variable varies slowest and the last
/// varies fastest, consistent with row-major iteration of a multi-dimensional table. Consumers
/// that index a flattened probability table by enumeration position rely on this ordering.
///
/// A single iterator instance is not restartable mid-stream; recreate it to enumerate again.
pub struct AssignmentIterator {
    vars: Vec<Variable>,
    domains: Vec<Vec<Value>>,
    indices: Vec<usize>,
    done: bool
}

impl AssignmentIterator {

    /// Construct an enumerator over the given variables.
    ///
    /// # Args
    /// * `vars`: the variables to assign, in order. At most four.
    /// * `varying`: the subset of `vars` to enumerate over their full domain. Each must be
    ///   discrete. Variables not in this set are held fixed at their current live value.
    ///
    /// # Errors
    /// * `AmbroseError::ArityExceeded`, if more than four variables are given
    /// * `AmbroseError::UnsupportedOperation`, if a varying variable is continuous
    pub fn over(vars: &[Variable], varying: &HashSet<Variable>) -> Result<AssignmentIterator> {
        if vars.len() > MAX_ARITY {
            return Err(AmbroseError::ArityExceeded(vars.len()));
        }

        let mut domains = Vec::with_capacity(vars.len());
        for var in vars {
            if varying.contains(var) {
                if !var.is_discrete() {
                    return Err(AmbroseError::UnsupportedOperation(
                        String::from("enumerating a varying continuous variable")
                    ));
                }

                domains.push(var.domain_values()?);
            } else {
                domains.push(vec![var.value()]);
            }
        }

        // an empty variable list (or an empty domain) yields an empty sequence
        let done = vars.is_empty() || domains.iter().any(|d| d.is_empty());

        Ok(AssignmentIterator {
            vars: vars.to_vec(),
            indices: vec![0; vars.len()],
            domains,
            done
        })
    }

    /// Construct an enumerator over the given variables with every discrete variable varying.
    ///
    /// Continuous variables are held fixed at their current live value.
    pub fn exhaustive(vars: &[Variable]) -> Result<AssignmentIterator> {
        let varying = vars.iter()
                          .filter(|v| v.is_discrete())
                          .cloned()
                          .collect();
        AssignmentIterator::over(vars, &varying)
    }

    /// Construct an enumerator over a factor's neighbor variables
    pub fn for_factor(factor: &dyn Factor, varying: &HashSet<Variable>) -> Result<AssignmentIterator> {
        AssignmentIterator::over(&factor.neighbors(), varying)
    }

    /// The total number of combinations this enumeration produces
    pub fn combinations(&self) -> usize {
        if self.vars.is_empty() {
            0
        } else {
            self.domains.iter().map(|d| d.len()).product()
        }
    }

}

impl Iterator for AssignmentIterator {

    type Item = FixedAssignment;

    fn next(&mut self) -> Option<FixedAssignment> {
        if self.done {
            return None;
        }

        let vals: Vec<Value> = self.indices.iter()
                                           .zip(self.domains.iter())
                                           .map(|(&i, d)| d[i])
                                           .collect();

        // arity was validated at construction, so this cannot fail
        let item = FixedAssignment::over(&self.vars, &vals).ok()?;

        // advance the odometer, last variable fastest
        let mut pos = self.vars.len();
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }

            pos -= 1;
            self.indices[pos] += 1;
            if self.indices[pos] < self.domains[pos].len() {
                break;
            }

            self.indices[pos] = 0;
        }

        Some(item)
    }

}
