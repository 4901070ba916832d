//! Fixed-arity assignments.
//!
//! `Assignment1` through `Assignment4` bind exactly N explicitly named `Variable`s with their
//! values stored inline, avoiding general-purpose map overhead on the hot enumeration path.
//! Querying any other variable falls back to that variable's own live value.
//!
//! Variable matching is by handle identity (the `PartialEq` of `Variable`), never by value
//! equality: two distinct variable instances must remain distinguishable even if a domain
//! considers them equal.

use super::Assignment;
use util::{AmbroseError, Result};
use variable::{Value, Variable};


/// Identity lookup over inline `(Variable, Value)` pairs
fn lookup(vars: &[Variable], vals: &[Value], var: &Variable) -> Option<Value> {
    vars.iter().position(|v| v == var).map(|i| vals[i])
}

/// In-place rebinding over inline pairs.
///
/// # Errors
/// * `AmbroseError::UnsupportedOperation`, if `var` is not among the stored variables
fn rebind(vars: &[Variable], vals: &mut [Value], var: &Variable, value: Value) -> Result<()> {
    match vars.iter().position(|v| v == var) {
        Some(i) => {
            vals[i] = value;
            Ok(())
        },
        None => Err(AmbroseError::UnsupportedOperation(
            String::from("rebinding a variable the fixed-arity assignment does not contain")
        ))
    }
}


/// An `Assignment` over exactly one explicitly named `Variable`
#[derive(Clone, Debug)]
pub struct Assignment1 {
    vars: [Variable; 1],
    vals: [Value; 1]
}

impl Assignment1 {

    /// Construct a new `Assignment1` binding `v1` to `val1`
    pub fn new(v1: &Variable, val1: Value) -> Assignment1 {
        Assignment1 { vars: [v1.clone()], vals: [val1] }
    }

    /// Rebind one of the stored variables in place
    pub fn rebind(&mut self, var: &Variable, value: Value) -> Result<()> {
        rebind(&self.vars, &mut self.vals, var, value)
    }

}

impl Assignment for Assignment1 {

    fn variables(&self) -> Result<Vec<Variable>> {
        Ok(self.vars.to_vec())
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        Ok(self.get(var).unwrap_or_else(|| var.value()))
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        lookup(&self.vars, &self.vals, var)
    }

}


/// An `Assignment` over exactly two explicitly named `Variable`s
#[derive(Clone, Debug)]
pub struct Assignment2 {
    vars: [Variable; 2],
    vals: [Value; 2]
}

impl Assignment2 {

    /// Construct a new `Assignment2` binding `v1` to `val1` and `v2` to `val2`
    pub fn new(v1: &Variable, val1: Value, v2: &Variable, val2: Value) -> Assignment2 {
        Assignment2 { vars: [v1.clone(), v2.clone()], vals: [val1, val2] }
    }

    /// Rebind one of the stored variables in place
    pub fn rebind(&mut self, var: &Variable, value: Value) -> Result<()> {
        rebind(&self.vars, &mut self.vals, var, value)
    }

}

impl Assignment for Assignment2 {

    fn variables(&self) -> Result<Vec<Variable>> {
        Ok(self.vars.to_vec())
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        Ok(self.get(var).unwrap_or_else(|| var.value()))
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        lookup(&self.vars, &self.vals, var)
    }

}


/// An `Assignment` over exactly three explicitly named `Variable`s
#[derive(Clone, Debug)]
pub struct Assignment3 {
    vars: [Variable; 3],
    vals: [Value; 3]
}

impl Assignment3 {

    pub fn new(
        v1: &Variable, val1: Value,
        v2: &Variable, val2: Value,
        v3: &Variable, val3: Value
    ) -> Assignment3 {
        Assignment3 {
            vars: [v1.clone(), v2.clone(), v3.clone()],
            vals: [val1, val2, val3]
        }
    }

    pub fn rebind(&mut self, var: &Variable, value: Value) -> Result<()> {
        rebind(&self.vars, &mut self.vals, var, value)
    }

}

impl Assignment for Assignment3 {

    fn variables(&self) -> Result<Vec<Variable>> {
        Ok(self.vars.to_vec())
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        Ok(self.get(var).unwrap_or_else(|| var.value()))
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        lookup(&self.vars, &self.vals, var)
    }

}


/// An `Assignment` over exactly four explicitly named `Variable`s
#[derive(Clone, Debug)]
pub struct Assignment4 {
    vars: [Variable; 4],
    vals: [Value; 4]
}

impl Assignment4 {

    pub fn new(
        v1: &Variable, val1: Value,
        v2: &Variable, val2: Value,
        v3: &Variable, val3: Value,
        v4: &Variable, val4: Value
    ) -> Assignment4 {
        Assignment4 {
            vars: [v1.clone(), v2.clone(), v3.clone(), v4.clone()],
            vals: [val1, val2, val3, val4]
        }
    }

    pub fn rebind(&mut self, var: &Variable, value: Value) -> Result<()> {
        rebind(&self.vars, &mut self.vals, var, value)
    }

}

impl Assignment for Assignment4 {

    fn variables(&self) -> Result<Vec<Variable>> {
        Ok(self.vars.to_vec())
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        Ok(self.get(var).unwrap_or_else(|| var.value()))
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        lookup(&self.vars, &self.vals, var)
    }

}


/// An `Assignment` over exactly one *discrete* `Variable`, storing the bound value as a bare
/// domain code rather than a boxed `Value`. Useful as a reusable cursor when scoring a single
/// variable's domain.
#[derive(Clone, Debug)]
pub struct DiscreteAssignment1 {
    var: Variable,
    code: usize
}

impl DiscreteAssignment1 {

    /// Construct a new `DiscreteAssignment1` binding `var` to the domain code `code`.
    ///
    /// # Errors
    /// * `AmbroseError::InvalidValue`, if `var` is not discrete or `code` is out of range
    pub fn new(var: &Variable, code: usize) -> Result<DiscreteAssignment1> {
        match var.cardinality() {
            Some(n) if code < n => Ok(DiscreteAssignment1 { var: var.clone(), code }),
            Some(n) => Err(AmbroseError::InvalidValue(
                format!("code {} out of range for cardinality {}", code, n)
            )),
            None => Err(AmbroseError::InvalidValue(
                String::from("DiscreteAssignment1 requires a discrete variable")
            ))
        }
    }

    /// The bound domain code
    pub fn code(&self) -> usize {
        self.code
    }

    /// Mutate the bound domain code in place
    pub fn set_code(&mut self, code: usize) -> Result<()> {
        // cardinality is Some by construction
        let n = self.var.cardinality().unwrap_or(0);
        if code >= n {
            return Err(AmbroseError::InvalidValue(
                format!("code {} out of range for cardinality {}", code, n)
            ));
        }

        self.code = code;
        Ok(())
    }

}

impl Assignment for DiscreteAssignment1 {

    fn variables(&self) -> Result<Vec<Variable>> {
        Ok(vec![self.var.clone()])
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        Ok(self.get(var).unwrap_or_else(|| var.value()))
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        if *var == self.var {
            Some(Value::Discrete(self.code))
        } else {
            None
        }
    }

}


/// A fixed-arity `Assignment` of statically unknown arity - a closed variant over arities 1
/// through 4, dispatched by match. This is the item type of `AssignmentIterator`.
#[derive(Clone, Debug)]
pub enum FixedAssignment {
    One(Assignment1),
    Two(Assignment2),
    Three(Assignment3),
    Four(Assignment4)
}

impl FixedAssignment {

    /// Construct a `FixedAssignment` from parallel slices of variables and values.
    ///
    /// # Errors
    /// * `AmbroseError::ArityExceeded`, if more than four variables are given
    /// * `AmbroseError::UnsupportedOperation`, if no variables are given
    pub fn over(vars: &[Variable], vals: &[Value]) -> Result<FixedAssignment> {
        debug_assert_eq!(vars.len(), vals.len());

        match vars.len() {
            1 => Ok(FixedAssignment::One(Assignment1::new(&vars[0], vals[0]))),
            2 => Ok(FixedAssignment::Two(Assignment2::new(
                &vars[0], vals[0], &vars[1], vals[1]
            ))),
            3 => Ok(FixedAssignment::Three(Assignment3::new(
                &vars[0], vals[0], &vars[1], vals[1], &vars[2], vals[2]
            ))),
            4 => Ok(FixedAssignment::Four(Assignment4::new(
                &vars[0], vals[0], &vars[1], vals[1], &vars[2], vals[2], &vars[3], vals[3]
            ))),
            0 => Err(AmbroseError::UnsupportedOperation(
                String::from("constructing a fixed-arity assignment over zero variables")
            )),
            n => Err(AmbroseError::ArityExceeded(n))
        }
    }

    /// The arity of the underlying assignment
    pub fn arity(&self) -> usize {
        match *self {
            FixedAssignment::One(_) => 1,
            FixedAssignment::Two(_) => 2,
            FixedAssignment::Three(_) => 3,
            FixedAssignment::Four(_) => 4
        }
    }

    pub(crate) fn inner(&self) -> &dyn Assignment {
        match *self {
            FixedAssignment::One(ref a) => a,
            FixedAssignment::Two(ref a) => a,
            FixedAssignment::Three(ref a) => a,
            FixedAssignment::Four(ref a) => a
        }
    }

}

impl Assignment for FixedAssignment {

    fn variables(&self) -> Result<Vec<Variable>> {
        self.inner().variables()
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        self.inner().value(var)
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        self.inner().get(var)
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn fallback() {
        let a = Variable::discrete(3);
        let b = Variable::discrete(3);
        b.set_code(2, None).unwrap();

        let assn = Assignment1::new(&a, Value::Discrete(1));

        assert_eq!(Value::Discrete(1), assn.value(&a).unwrap());

        // any variable not among the bound ones falls back to its own live value
        assert_eq!(Value::Discrete(2), assn.value(&b).unwrap());
        assert_eq!(None, assn.get(&b));
        assert!(!assn.contains(&b));
    }

    #[test]
    fn consistency() {
        let a = Variable::discrete(3);
        let b = Variable::discrete(3);
        let c = Variable::discrete(3);

        let assn = Assignment2::new(&a, Value::Discrete(1), &b, Value::Discrete(2));

        for v in [&a, &b, &c].iter() {
            assert_eq!(assn.get(v).is_some(), assn.contains(v));
            if let Some(val) = assn.get(v) {
                assert_eq!(val, assn.value(v).unwrap());
            }
        }
    }

    #[test]
    fn identity_lookup() {
        // two distinct variables with identical domains and values must not alias
        let a = Variable::binary();
        let b = Variable::binary();

        let assn = Assignment1::new(&a, Value::Discrete(1));
        assert!(assn.contains(&a));
        assert!(!assn.contains(&b));
    }

    #[test]
    fn rebind() {
        let a = Variable::discrete(3);
        let b = Variable::discrete(3);

        let mut assn = Assignment2::new(&a, Value::Discrete(0), &b, Value::Discrete(1));
        assn.rebind(&a, Value::Discrete(2)).unwrap();
        assert_eq!(Some(Value::Discrete(2)), assn.get(&a));

        let c = Variable::discrete(3);
        match assn.rebind(&c, Value::Discrete(0)) {
            Err(AmbroseError::UnsupportedOperation(_)) => (),
            _ => panic!("expected UnsupportedOperation")
        };
    }

    #[test]
    fn globalize() {
        let a = Variable::discrete(3);
        let b = Variable::discrete(3);
        let c = Variable::discrete(3);
        let d = Variable::discrete(3);

        let assn = Assignment4::new(
            &a, Value::Discrete(1),
            &b, Value::Discrete(2),
            &c, Value::Discrete(0),
            &d, Value::Discrete(1)
        );
        assn.globalize(None).unwrap();

        assert_eq!(Some(1), a.code());
        assert_eq!(Some(2), b.code());
        assert_eq!(Some(0), c.code());
        assert_eq!(Some(1), d.code());
    }

    #[test]
    fn discrete1() {
        let a = Variable::discrete(4);
        let b = Variable::discrete(4);

        let mut assn = DiscreteAssignment1::new(&a, 2).unwrap();
        assert_eq!(2, assn.code());
        assert_eq!(Some(Value::Discrete(2)), assn.get(&a));
        assert_eq!(Value::Discrete(0), assn.value(&b).unwrap());

        assn.set_code(3).unwrap();
        assert_eq!(Value::Discrete(3), assn.value(&a).unwrap());

        assert!(assn.set_code(4).is_err());
        assert!(DiscreteAssignment1::new(&a, 4).is_err());
        assert!(DiscreteAssignment1::new(&Variable::continuous(), 0).is_err());
    }

    #[test]
    fn fixed_enum() {
        let a = Variable::binary();
        let b = Variable::binary();

        let vars = vec![a.clone(), b.clone()];
        let vals = vec![Value::Discrete(0), Value::Discrete(1)];

        let assn = FixedAssignment::over(&vars, &vals).unwrap();
        assert_eq!(2, assn.arity());
        assert_eq!(Value::Discrete(0), assn.value(&a).unwrap());
        assert_eq!(Value::Discrete(1), assn.value(&b).unwrap());

        let too_many: Vec<Variable> = (0..5).map(|_| Variable::binary()).collect();
        let zeros = vec![Value::Discrete(0); 5];
        match FixedAssignment::over(&too_many, &zeros) {
            Err(AmbroseError::ArityExceeded(5)) => (),
            _ => panic!("expected ArityExceeded")
        };
    }

}
