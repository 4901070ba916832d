//! Definition of the assignment module
//!
//! An `Assignment` is a (partial) mapping from `Variable`s to `Value`s with a defined fallback
//! rule for unbound variables. Inference algorithms read and write variable state exclusively
//! through assignments: enumeration produces fixed-arity assignments, sampling accumulates into
//! mutable ones, and `globalize` writes any assignment back into the live variables.

use util::{AmbroseError, Result};
use variable::{DiffList, Value, Variable};

use indexmap::IndexMap;

pub mod fixed;
pub mod iter;
pub mod stack;

pub use self::fixed::{
    Assignment1, Assignment2, Assignment3, Assignment4, DiscreteAssignment1, FixedAssignment
};
pub use self::iter::AssignmentIterator;
pub use self::stack::AssignmentStack;


/// A mapping from `Variable`s to `Value`s.
///
/// Implementations differ in two ways: which variables they *explicitly* bind (reported by
/// `variables`, `get` and `contains`), and what `value` returns for a variable they do not bind -
/// the fallback rule. Fixed-arity and virtual assignments fall back to the queried variable's own
/// live value; the map-backed `MutableAssignment` fails instead.
pub trait Assignment {

    /// The `Variable`s explicitly bound by this assignment.
    ///
    /// # Errors
    /// * `AmbroseError::UnsupportedOperation`, for the virtual assignments - their binding is
    ///   implicit over all variables and cannot be enumerated
    fn variables(&self) -> Result<Vec<Variable>>;

    /// Look up the value of `var` under this assignment, applying the implementation's fallback
    /// rule when `var` is not explicitly bound
    fn value(&self, var: &Variable) -> Result<Value>;

    /// Look up the explicitly bound value of `var`. Returns `None` when `var` is not explicitly
    /// bound, even for implementations whose `value` would fall back to the live value.
    fn get(&self, var: &Variable) -> Option<Value>;

    /// Check if `var` is explicitly bound
    fn contains(&self, var: &Variable) -> bool {
        self.get(var).is_some()
    }

    /// Write every explicitly bound value back to its live `Variable`, recording the changes in
    /// the optional `DiffList`.
    ///
    /// # Errors
    /// * `AmbroseError::UnsetVariable`, if a bound variable does not support being set
    fn globalize(&self, mut diff: Option<&mut DiffList>) -> Result<()> {
        for var in self.variables()? {
            // an explicitly bound variable always has an explicit value
            let val = self.get(&var).ok_or(AmbroseError::VariableNotBound)?;
            var.set(val, diff.as_mut().map(|d| &mut **d))?;
        }

        Ok(())
    }

}


/// A general-purpose mutable `Assignment` over a dynamically growing set of `Variable`s.
///
/// Unlike the fixed-arity assignments, an unbound variable is *absent*: `value` fails with
/// `VariableNotBound` rather than deferring to the variable's live value. Bindings iterate in
/// insertion order.
pub struct MutableAssignment {
    bindings: IndexMap<Variable, Value>
}

impl MutableAssignment {

    /// Construct a new, empty `MutableAssignment`
    pub fn new() -> MutableAssignment {
        MutableAssignment { bindings: IndexMap::new() }
    }

    /// Construct a `MutableAssignment` binding each of the given `Variable`s to its live value at
    /// the time of the call
    pub fn from_variables(vars: &[Variable]) -> MutableAssignment {
        let bindings = vars.iter().map(|v| (v.clone(), v.value())).collect();
        MutableAssignment { bindings }
    }

    /// Insert or overwrite the binding for `var`
    pub fn set(&mut self, var: &Variable, value: Value) {
        self.bindings.insert(var.clone(), value);
    }

    /// The number of bound `Variable`s
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if no `Variable` is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

}

impl Assignment for MutableAssignment {

    fn variables(&self) -> Result<Vec<Variable>> {
        Ok(self.bindings.keys().cloned().collect())
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        self.get(var).ok_or(AmbroseError::VariableNotBound)
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        self.bindings.get(var).cloned()
    }

}


/// The virtual `Assignment` representing the current live state of all variables.
///
/// Stateless: it reads live variable state at call time with no caching. Callers needing a stable
/// snapshot should materialize a `MutableAssignment` first.
pub struct CurrentAssignment;

impl Assignment for CurrentAssignment {

    /// Fails: the binding is implicit over all variables
    fn variables(&self) -> Result<Vec<Variable>> {
        Err(AmbroseError::UnsupportedOperation(
            String::from("enumerating the variables of the current-state assignment")
        ))
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        Ok(var.value())
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        Some(var.value())
    }

    fn contains(&self, _var: &Variable) -> bool {
        true
    }

    /// A no-op: the live state already *is* this assignment
    fn globalize(&self, _diff: Option<&mut DiffList>) -> Result<()> {
        Ok(())
    }

}


/// The virtual `Assignment` representing the supervised target state.
///
/// For a variable carrying a target value, `value` returns the target; otherwise it falls back to
/// the live value. This assignment exists for read-only comparison against supervision targets
/// and refuses `globalize` - callers wanting to apply targets must set the variables directly.
pub struct TargetAssignment;

impl Assignment for TargetAssignment {

    /// Fails: the binding is implicit over all variables
    fn variables(&self) -> Result<Vec<Variable>> {
        Err(AmbroseError::UnsupportedOperation(
            String::from("enumerating the variables of the target assignment")
        ))
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        Ok(var.target().unwrap_or_else(|| var.value()))
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        Some(var.target().unwrap_or_else(|| var.value()))
    }

    fn contains(&self, _var: &Variable) -> bool {
        true
    }

    /// Always fails: targets are never written back through this path
    fn globalize(&self, _diff: Option<&mut DiffList>) -> Result<()> {
        Err(AmbroseError::UnsupportedOperation(
            String::from("globalizing the target assignment")
        ))
    }

}
