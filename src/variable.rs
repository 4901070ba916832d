//! Definition of the variable module
//!
//! A `Variable` represents a random variable in a Probabilistic Graphical Model. A `Variable` is a
//! lightweight, cheaply cloneable handle over shared state: cloning a `Variable` yields another
//! handle to the *same* random variable. Equality and hashing are by handle identity, never by
//! value - two independently constructed variables are always distinct, even if their domains and
//! current values coincide.

use util::{AmbroseError, Result};

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);


/// The value of a `Variable`. Discrete variables carry a domain code in `[0, cardinality)`;
/// continuous variables carry a real number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {

    /// A code into a discrete variable's domain
    Discrete(usize),

    /// A real-valued assignment to a continuous variable
    Continuous(f64)

}


/// The domain of a `Variable` - the range of values over which it is defined.
#[derive(Clone, Debug)]
enum Domain {

    /// A discrete domain with the given number of values, coded `0..cardinality`
    Discrete { cardinality: usize },

    /// The real numbers
    Continuous

}

#[derive(Debug)]
struct VariableState {
    domain: Domain,
    value: Value,
    target: Option<Value>,
    settable: bool
}


/// A random variable.
///
/// Every `Variable` has a current ("live") value at all times. Discrete variables start at code
/// `0`, continuous variables at `0.0`. A `Variable` may additionally carry a supervised target
/// value, used by learning code to compare inferred values against ground truth.
#[derive(Clone)]
pub struct Variable {
    id: usize,
    state: Rc<RefCell<VariableState>>
}

impl Variable {

    fn with_state(domain: Domain, value: Value, settable: bool) -> Variable {
        Variable {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            state: Rc::new(RefCell::new(VariableState {
                domain,
                value,
                target: None,
                settable
            }))
        }
    }

    /// Construct a new binary `Variable` (a discrete variable with cardinality 2)
    pub fn binary() -> Variable {
        Variable::discrete(2)
    }

    /// Construct a new discrete `Variable` with the given cardinality. Its values are the codes
    /// `0..cardinality`, and its initial value is `0`.
    pub fn discrete(cardinality: usize) -> Variable {
        Variable::with_state(
            Domain::Discrete { cardinality },
            Value::Discrete(0),
            true
        )
    }

    /// Construct a new continuous `Variable` with an initial value of `0.0`
    pub fn continuous() -> Variable {
        Variable::with_state(Domain::Continuous, Value::Continuous(0.0), true)
    }

    /// Construct an observed discrete `Variable`: its value is fixed at the given code and it does
    /// not support being set.
    ///
    /// # Errors
    /// * `AmbroseError::InvalidValue`, if `code` is outside `[0, cardinality)`
    pub fn observed(cardinality: usize, code: usize) -> Result<Variable> {
        if code >= cardinality {
            return Err(AmbroseError::InvalidValue(
                format!("code {} out of range for cardinality {}", code, cardinality)
            ));
        }

        Ok(Variable::with_state(
            Domain::Discrete { cardinality },
            Value::Discrete(code),
            false
        ))
    }

    /// Check if this `Variable` is discrete
    pub fn is_discrete(&self) -> bool {
        match self.state.borrow().domain {
            Domain::Discrete { .. } => true,
            Domain::Continuous => false
        }
    }

    /// Check if this `Variable` supports being set
    pub fn is_settable(&self) -> bool {
        self.state.borrow().settable
    }

    /// The number of values in this `Variable`'s domain, or `None` for a continuous variable
    pub fn cardinality(&self) -> Option<usize> {
        match self.state.borrow().domain {
            Domain::Discrete { cardinality } => Some(cardinality),
            Domain::Continuous => None
        }
    }

    /// The current live value of this `Variable`
    pub fn value(&self) -> Value {
        self.state.borrow().value
    }

    /// The current live value as a domain code, or `None` for a continuous variable
    pub fn code(&self) -> Option<usize> {
        match self.state.borrow().value {
            Value::Discrete(code) => Some(code),
            Value::Continuous(_) => None
        }
    }

    /// Enumerate the legal values of this `Variable`'s domain.
    ///
    /// # Errors
    /// * `AmbroseError::UnsupportedOperation`, if the variable is continuous - the real line
    ///   cannot be enumerated
    pub fn domain_values(&self) -> Result<Vec<Value>> {
        match self.state.borrow().domain {
            Domain::Discrete { cardinality } => {
                Ok((0..cardinality).map(Value::Discrete).collect())
            },
            Domain::Continuous => Err(AmbroseError::UnsupportedOperation(
                String::from("enumerating the domain of a continuous variable")
            ))
        }
    }

    /// Validate a candidate value against this `Variable`'s domain
    fn check(&self, value: &Value) -> Result<()> {
        match (&self.state.borrow().domain, value) {
            (&Domain::Discrete { cardinality }, &Value::Discrete(code)) => {
                if code < cardinality {
                    Ok(())
                } else {
                    Err(AmbroseError::InvalidValue(
                        format!("code {} out of range for cardinality {}", code, cardinality)
                    ))
                }
            },
            (&Domain::Continuous, &Value::Continuous(_)) => Ok(()),
            _ => Err(AmbroseError::InvalidValue(
                String::from("value kind does not match the variable's domain")
            ))
        }
    }

    /// Set the live value of this `Variable`, recording the change in the optional `DiffList`.
    ///
    /// # Args
    /// * `value`: the new value. Must belong to this variable's domain.
    /// * `diff`: an optional mutation log. When present, the change is appended so the caller can
    ///   later undo or redo it.
    ///
    /// # Errors
    /// * `AmbroseError::UnsetVariable`, if the variable does not support being set
    /// * `AmbroseError::InvalidValue`, if the value is outside the variable's domain
    pub fn set(&self, value: Value, diff: Option<&mut DiffList>) -> Result<()> {
        if !self.is_settable() {
            return Err(AmbroseError::UnsetVariable);
        }

        self.check(&value)?;

        let before = self.value();
        if let Some(d) = diff {
            d.record(self.clone(), before, value);
        }

        self.state.borrow_mut().value = value;
        Ok(())
    }

    /// Set the live value of a discrete `Variable` by domain code
    pub fn set_code(&self, code: usize, diff: Option<&mut DiffList>) -> Result<()> {
        self.set(Value::Discrete(code), diff)
    }

    /// The supervised target value of this `Variable`, if one has been installed
    pub fn target(&self) -> Option<Value> {
        self.state.borrow().target
    }

    /// Install a supervised target value for this `Variable`.
    ///
    /// Targets are independent of settability: an observed variable may still carry a target.
    ///
    /// # Errors
    /// * `AmbroseError::InvalidValue`, if the value is outside the variable's domain
    pub fn set_target(&self, value: Value) -> Result<()> {
        self.check(&value)?;
        self.state.borrow_mut().target = Some(value);
        Ok(())
    }

}

impl PartialEq for Variable {

    fn eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

}

impl Eq for Variable {}

impl Hash for Variable {

    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }

}

impl fmt::Debug for Variable {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.state.borrow();
        write!(f, "Variable({}, {:?}, {:?})", self.id, state.domain, state.value)
    }

}


/// One recorded mutation of a `Variable`'s live value
#[derive(Clone, Debug)]
pub struct Diff {
    variable: Variable,
    before: Value,
    after: Value
}

impl Diff {

    /// The mutated `Variable`
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// The value before the mutation
    pub fn before(&self) -> Value {
        self.before
    }

    /// The value after the mutation
    pub fn after(&self) -> Value {
        self.after
    }

}


/// An ordered log of `Variable` mutations.
///
/// Every mutating operation in this crate accepts an `Option<&mut DiffList>` and, when one is
/// supplied, appends each change it makes. The log can then be played backwards (`undo`) or
/// forwards again (`redo`).
#[derive(Debug)]
pub struct DiffList {
    diffs: Vec<Diff>
}

impl DiffList {

    /// Construct a new, empty `DiffList`
    pub fn new() -> DiffList {
        DiffList { diffs: Vec::new() }
    }

    /// Append a change record. Called by `Variable::set`.
    fn record(&mut self, variable: Variable, before: Value, after: Value) {
        self.diffs.push(Diff { variable, before, after });
    }

    /// The recorded changes, oldest first
    pub fn diffs(&self) -> &[Diff] {
        &self.diffs
    }

    /// The number of recorded changes
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Play the log backwards, restoring every variable to its value before the recorded
    /// mutations. Writes directly to variable state; settability was already checked when the
    /// changes were recorded.
    pub fn undo(&self) {
        for diff in self.diffs.iter().rev() {
            diff.variable.state.borrow_mut().value = diff.before;
        }
    }

    /// Play the log forwards, reapplying every recorded mutation in order
    pub fn redo(&self) {
        for diff in self.diffs.iter() {
            diff.variable.state.borrow_mut().value = diff.after;
        }
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn identity() {
        let a = Variable::binary();
        let b = Variable::binary();

        // same domain and value, but distinct variables
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn discrete() {
        let v = Variable::discrete(5);

        assert!(v.is_discrete());
        assert!(v.is_settable());
        assert_eq!(Some(5), v.cardinality());
        assert_eq!(Value::Discrete(0), v.value());
        assert_eq!(Some(0), v.code());

        v.set_code(3, None).unwrap();
        assert_eq!(Some(3), v.code());

        let vals = v.domain_values().unwrap();
        assert_eq!(5, vals.len());
        assert_eq!(Value::Discrete(4), vals[4]);
    }

    #[test]
    fn discrete_set_err() {
        let v = Variable::discrete(3);

        match v.set_code(3, None) {
            Err(AmbroseError::InvalidValue(_)) => (),
            _ => panic!("expected InvalidValue")
        };

        match v.set(Value::Continuous(1.5), None) {
            Err(AmbroseError::InvalidValue(_)) => (),
            _ => panic!("expected InvalidValue")
        };
    }

    #[test]
    fn continuous() {
        let v = Variable::continuous();

        assert!(!v.is_discrete());
        assert_eq!(None, v.cardinality());
        assert_eq!(None, v.code());

        v.set(Value::Continuous(2.5), None).unwrap();
        assert_eq!(Value::Continuous(2.5), v.value());

        match v.domain_values() {
            Err(AmbroseError::UnsupportedOperation(_)) => (),
            _ => panic!("expected UnsupportedOperation")
        };
    }

    #[test]
    fn observed() {
        let v = Variable::observed(4, 2).unwrap();

        assert!(!v.is_settable());
        assert_eq!(Some(2), v.code());

        match v.set_code(1, None) {
            Err(AmbroseError::UnsetVariable) => (),
            _ => panic!("expected UnsetVariable")
        };

        assert!(Variable::observed(4, 4).is_err());
    }

    #[test]
    fn target() {
        let v = Variable::binary();
        assert_eq!(None, v.target());

        v.set_target(Value::Discrete(1)).unwrap();
        assert_eq!(Some(Value::Discrete(1)), v.target());

        assert!(v.set_target(Value::Discrete(2)).is_err());
    }

    #[test]
    fn diff_list() {
        let a = Variable::discrete(3);
        let b = Variable::discrete(3);

        let mut diff = DiffList::new();
        assert!(diff.is_empty());

        a.set_code(1, Some(&mut diff)).unwrap();
        b.set_code(2, Some(&mut diff)).unwrap();
        a.set_code(2, Some(&mut diff)).unwrap();
        assert_eq!(3, diff.len());

        diff.undo();
        assert_eq!(Some(0), a.code());
        assert_eq!(Some(0), b.code());

        diff.redo();
        assert_eq!(Some(2), a.code());
        assert_eq!(Some(2), b.code());
    }

}
