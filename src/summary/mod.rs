//! Definition of the summary module
//!
//! A `Marginal` is a probability distribution (or point value) attached to one or more
//! `Variable`s, produced by inference. A `Summary` is a keyed collection of `Marginal`s,
//! queryable by variable set or by factor, and collapsible onto the live variables via
//! `set_to_maximize`. Inference engines populate a summary incrementally and hand it to the
//! caller, which treats it as read-only thereafter.

use assignment::Assignment;
use factor::Factor;
use util::{AmbroseError, Result};
use variable::{DiffList, Value, Variable};

use indexmap::IndexMap;
use itertools::Itertools;

use std::rc::Rc;

pub mod discrete;

pub use self::discrete::{DiscreteMarginal1, DiscreteMarginal2, DiscreteSummary1};


/// A probability distribution (or point value) over an ordered, non-empty set of `Variable`s
pub trait Marginal {

    /// The `Variable`s this marginal covers, in order
    fn variables(&self) -> Vec<Variable>;

    /// Overwrite this marginal's variables with the value(s) that maximize it, recording the
    /// changes in the optional `DiffList`
    fn set_to_maximize(&self, diff: Option<&mut DiffList>) -> Result<()>;

}


/// A degenerate `Marginal` placing all probability mass on a single value of a single
/// `Variable`. This is how an `Assignment` stands in as a marginal.
#[derive(Clone, Debug)]
pub struct PointMarginal {
    var: Variable,
    value: Value
}

impl PointMarginal {

    /// Construct a new `PointMarginal` placing all mass on `value`
    pub fn new(var: &Variable, value: Value) -> PointMarginal {
        PointMarginal { var: var.clone(), value }
    }

    /// The value carrying all the mass
    pub fn value(&self) -> Value {
        self.value
    }

}

impl Marginal for PointMarginal {

    fn variables(&self) -> Vec<Variable> {
        vec![self.var.clone()]
    }

    fn set_to_maximize(&self, diff: Option<&mut DiffList>) -> Result<()> {
        self.var.set(self.value, diff)
    }

}


/// A keyed collection of `Marginal`s - the output of an inference run.
///
/// Lookups return a sentinel `None` when no marginal covers the query, never an error. Concrete
/// summaries hand out owned marginals; distribution payloads are cheap to clone and synthesized
/// marginals (point masses, outer-product joints) have no stored counterpart to borrow.
pub trait Summary {

    /// All `Marginal`s contained in this summary
    fn marginals(&self) -> Vec<Box<dyn Marginal>>;

    /// Resolve the marginal covering exactly the given set of `Variable`s, or `None` when this
    /// summary holds no such marginal
    fn marginal(&self, vars: &[Variable]) -> Option<Box<dyn Marginal>>;

    /// Resolve a marginal for the given factor. The default returns the marginal covering the
    /// maximal available subset of the factor's neighbors, preferring larger subsets.
    fn marginal_of_factor(&self, factor: &dyn Factor) -> Option<Box<dyn Marginal>> {
        let neighbors = factor.neighbors();
        for size in (1..neighbors.len() + 1).rev() {
            for combo in neighbors.iter().cloned().combinations(size) {
                if let Some(m) = self.marginal(&combo) {
                    return Some(m);
                }
            }
        }

        None
    }

    /// Apply every contained marginal's maximizing value to its variables, in the summary's
    /// iteration order. If two marginals share a variable, application order is significant;
    /// only summaries that guarantee disjoint marginals make the outcome order-independent.
    fn set_to_maximize(&self, mut diff: Option<&mut DiffList>) -> Result<()> {
        for m in self.marginals() {
            m.set_to_maximize(diff.as_mut().map(|d| &mut **d))?;
        }

        Ok(())
    }

    /// The log partition function of the model this summary was computed from.
    ///
    /// # Errors
    /// * `AmbroseError::UnsupportedOperation`, unless a concrete summary computes it
    fn log_z(&self) -> Result<f64> {
        Err(AmbroseError::UnsupportedOperation(
            String::from("logZ is not computed by this summary")
        ))
    }

    /// The factors this summary was computed from, when tracked
    fn factors(&self) -> Option<Vec<Rc<dyn Factor>>> {
        None
    }

}


/// A `Summary` holding at most one `Marginal` per `Variable`, keyed by that variable.
///
/// Marginals iterate in insertion order, so `set_to_maximize` is deterministic; the per-variable
/// keying guarantees disjointness.
pub struct Summary1<M: Marginal + Clone + 'static> {
    marginals: IndexMap<Variable, M>
}

impl<M: Marginal + Clone + 'static> Summary1<M> {

    /// Construct a new, empty `Summary1`
    pub fn new() -> Summary1<M> {
        Summary1 { marginals: IndexMap::new() }
    }

    /// Register a single-variable marginal, keyed by its variable.
    ///
    /// # Errors
    /// * `AmbroseError::DuplicateMarginal`, if a marginal for that variable is already registered
    /// * `AmbroseError::UnsupportedOperation`, if the marginal does not cover exactly one variable
    pub fn insert(&mut self, marginal: M) -> Result<()> {
        let mut vars = marginal.variables();
        if vars.len() != 1 {
            return Err(AmbroseError::UnsupportedOperation(
                String::from("Summary1 stores single-variable marginals only")
            ));
        }

        let var = vars.remove(0);
        if self.marginals.contains_key(&var) {
            return Err(AmbroseError::DuplicateMarginal);
        }

        self.marginals.insert(var, marginal);
        Ok(())
    }

    /// The marginal registered for `var`, if any
    pub fn get(&self, var: &Variable) -> Option<&M> {
        self.marginals.get(var)
    }

    /// The number of registered marginals
    pub fn len(&self) -> usize {
        self.marginals.len()
    }

    /// Check if no marginal is registered
    pub fn is_empty(&self) -> bool {
        self.marginals.is_empty()
    }

}

impl<M: Marginal + Clone + 'static> Summary for Summary1<M> {

    fn marginals(&self) -> Vec<Box<dyn Marginal>> {
        self.marginals.values()
            .map(|m| Box::new(m.clone()) as Box<dyn Marginal>)
            .collect()
    }

    /// Single-variable queries only
    fn marginal(&self, vars: &[Variable]) -> Option<Box<dyn Marginal>> {
        if vars.len() != 1 {
            return None;
        }

        self.marginals.get(&vars[0])
            .map(|m| Box::new(m.clone()) as Box<dyn Marginal>)
    }

    /// Factor lookup resolves single-neighbor factors only
    fn marginal_of_factor(&self, factor: &dyn Factor) -> Option<Box<dyn Marginal>> {
        let neighbors = factor.neighbors();
        if neighbors.len() == 1 {
            self.marginal(&neighbors)
        } else {
            None
        }
    }

}


/// A `Summary` wrapping exactly one externally supplied `Marginal`
pub struct SingletonSummary<M: Marginal + Clone + 'static> {
    marginal: M
}

impl<M: Marginal + Clone + 'static> SingletonSummary<M> {

    /// Construct a new `SingletonSummary` over the given marginal
    pub fn new(marginal: M) -> SingletonSummary<M> {
        SingletonSummary { marginal }
    }

}

impl<M: Marginal + Clone + 'static> Summary for SingletonSummary<M> {

    fn marginals(&self) -> Vec<Box<dyn Marginal>> {
        vec![Box::new(self.marginal.clone())]
    }

    /// Succeeds only on an exact, order-insensitive match of the wrapped marginal's variable set
    fn marginal(&self, vars: &[Variable]) -> Option<Box<dyn Marginal>> {
        let mine = self.marginal.variables();
        if mine.len() == vars.len() && vars.iter().all(|v| mine.contains(v)) {
            Some(Box::new(self.marginal.clone()))
        } else {
            None
        }
    }

    /// Factor lookup is not supported
    fn marginal_of_factor(&self, _factor: &dyn Factor) -> Option<Box<dyn Marginal>> {
        None
    }

}


/// Adapts an `Assignment` into a `Summary` of point-mass marginals.
///
/// The purpose of this adapter is bulk globalization: `set_to_maximize` globalizes the underlying
/// assignment directly rather than iterating synthesized marginals. Point and factor queries are
/// not supported.
pub struct AssignmentSummary<A: Assignment> {
    assignment: A
}

impl<A: Assignment> AssignmentSummary<A> {

    /// Construct a new `AssignmentSummary` over the given assignment
    pub fn new(assignment: A) -> AssignmentSummary<A> {
        AssignmentSummary { assignment }
    }

}

impl<A: Assignment> Summary for AssignmentSummary<A> {

    /// One point-mass marginal per bound variable, synthesized on demand. Empty for an
    /// assignment whose variables cannot be enumerated.
    fn marginals(&self) -> Vec<Box<dyn Marginal>> {
        self.assignment.variables()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| {
                self.assignment.get(&v)
                    .map(|val| Box::new(PointMarginal::new(&v, val)) as Box<dyn Marginal>)
            })
            .collect()
    }

    /// Point queries are not supported
    fn marginal(&self, _vars: &[Variable]) -> Option<Box<dyn Marginal>> {
        None
    }

    /// Globalizes the underlying assignment directly
    fn set_to_maximize(&self, diff: Option<&mut DiffList>) -> Result<()> {
        self.assignment.globalize(diff)
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use assignment::MutableAssignment;

    /// A minimal factor exposing only its neighbors
    struct StubFactor(Vec<Variable>);

    impl Factor for StubFactor {
        fn neighbors(&self) -> Vec<Variable> {
            self.0.clone()
        }
    }

    #[test]
    fn point_marginal() {
        let v = Variable::discrete(3);
        let m = PointMarginal::new(&v, Value::Discrete(2));

        assert_eq!(vec![v.clone()], m.variables());
        m.set_to_maximize(None).unwrap();
        assert_eq!(Some(2), v.code());
    }

    #[test]
    fn summary1_insert_and_lookup() {
        let a = Variable::discrete(3);
        let b = Variable::discrete(3);

        let mut summary = Summary1::new();
        summary.insert(PointMarginal::new(&a, Value::Discrete(1))).unwrap();
        assert_eq!(1, summary.len());

        match summary.insert(PointMarginal::new(&a, Value::Discrete(0))) {
            Err(AmbroseError::DuplicateMarginal) => (),
            _ => panic!("expected DuplicateMarginal")
        };

        assert!(summary.marginal(&[a.clone()]).is_some());
        assert!(summary.marginal(&[b.clone()]).is_none());
        assert!(summary.marginal(&[a.clone(), b.clone()]).is_none());

        // factor lookup resolves single-neighbor factors only
        assert!(summary.marginal_of_factor(&StubFactor(vec![a.clone()])).is_some());
        assert!(summary.marginal_of_factor(&StubFactor(vec![a.clone(), b.clone()])).is_none());
    }

    #[test]
    fn summary1_maximize() {
        let a = Variable::discrete(3);
        let b = Variable::discrete(3);

        let mut summary = Summary1::new();
        summary.insert(PointMarginal::new(&a, Value::Discrete(1))).unwrap();
        summary.insert(PointMarginal::new(&b, Value::Discrete(2))).unwrap();

        summary.set_to_maximize(None).unwrap();
        assert_eq!(Some(1), a.code());
        assert_eq!(Some(2), b.code());
    }

    #[test]
    fn log_z_unsupported() {
        let summary: Summary1<PointMarginal> = Summary1::new();

        match summary.log_z() {
            Err(AmbroseError::UnsupportedOperation(_)) => (),
            _ => panic!("expected UnsupportedOperation")
        };
        assert!(summary.factors().is_none());
    }

    #[test]
    fn singleton() {
        let a = Variable::binary();
        let b = Variable::binary();

        let summary = SingletonSummary::new(PointMarginal::new(&a, Value::Discrete(1)));

        assert_eq!(1, summary.marginals().len());
        assert!(summary.marginal(&[a.clone()]).is_some());
        assert!(summary.marginal(&[b.clone()]).is_none());
        assert!(summary.marginal(&[a.clone(), b.clone()]).is_none());
        assert!(summary.marginal_of_factor(&StubFactor(vec![a.clone()])).is_none());
    }

    #[test]
    fn assignment_summary() {
        let x = Variable::discrete(3);
        let y = Variable::discrete(3);

        let mut assn = MutableAssignment::new();
        assn.set(&x, Value::Discrete(1));
        assn.set(&y, Value::Discrete(2));

        let summary = AssignmentSummary::new(assn);
        assert_eq!(2, summary.marginals().len());
        assert!(summary.marginal(&[x.clone()]).is_none());
        assert!(summary.marginal_of_factor(&StubFactor(vec![x.clone()])).is_none());

        summary.set_to_maximize(None).unwrap();
        assert_eq!(Some(1), x.code());
        assert_eq!(Some(2), y.code());
    }

}
