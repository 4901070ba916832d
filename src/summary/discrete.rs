//! Discrete marginals backed by proportions vectors.
//!
//! A `DiscreteMarginal1` holds a probability vector ("proportions") over one discrete variable's
//! domain. Proportions need not be normalized in storage - sampling-based inference accumulates
//! raw weighted counts through `increment` and normalizes on read.

use super::{Marginal, Summary};
use util::{AmbroseError, Result};
use variable::{DiffList, Variable};

use indexmap::IndexMap;
use ndarray::prelude as nd;
use rand::Rng;


/// A `Marginal` over exactly one discrete `Variable`.
///
/// The proportions may be absent when the marginal is created as a placeholder to be filled in by
/// a later inference pass.
#[derive(Clone, Debug)]
pub struct DiscreteMarginal1 {
    var: Variable,
    proportions: Option<nd::Array1<f64>>
}

impl DiscreteMarginal1 {

    /// Construct a placeholder `DiscreteMarginal1` with no proportions yet.
    ///
    /// # Errors
    /// * `AmbroseError::InvalidValue`, if `var` is not discrete
    pub fn new(var: &Variable) -> Result<DiscreteMarginal1> {
        if !var.is_discrete() {
            return Err(AmbroseError::InvalidValue(
                String::from("DiscreteMarginal1 requires a discrete variable")
            ));
        }

        Ok(DiscreteMarginal1 { var: var.clone(), proportions: None })
    }

    /// Construct a `DiscreteMarginal1` with the given proportions
    pub fn with_proportions(var: &Variable, proportions: nd::Array1<f64>) -> Result<DiscreteMarginal1> {
        let mut marginal = DiscreteMarginal1::new(var)?;
        marginal.set_proportions(proportions)?;
        Ok(marginal)
    }

    /// The `Variable` this marginal covers
    pub fn variable(&self) -> &Variable {
        &self.var
    }

    /// The proportions, or `None` for an uninitialized placeholder
    pub fn proportions(&self) -> Option<&nd::Array1<f64>> {
        self.proportions.as_ref()
    }

    /// Supply or replace the proportions.
    ///
    /// # Errors
    /// * `AmbroseError::InvalidValue`, if the length does not match the variable's cardinality or
    ///   any entry is negative
    pub fn set_proportions(&mut self, proportions: nd::Array1<f64>) -> Result<()> {
        // the variable is discrete by construction
        let n = self.var.cardinality().unwrap_or(0);
        if proportions.len() != n {
            return Err(AmbroseError::InvalidValue(
                format!("expected {} proportions, got {}", n, proportions.len())
            ));
        }

        if proportions.iter().any(|&p| p < 0.0) {
            return Err(AmbroseError::InvalidValue(
                String::from("proportions may not be negative")
            ));
        }

        self.proportions = Some(proportions);
        Ok(())
    }

    /// Add `weight` to the slot for the given domain code, zero-initializing the proportions if
    /// this marginal was a placeholder
    pub fn increment(&mut self, code: usize, weight: f64) -> Result<()> {
        let n = self.var.cardinality().unwrap_or(0);
        if code >= n {
            return Err(AmbroseError::InvalidValue(
                format!("code {} out of range for cardinality {}", code, n)
            ));
        }

        if self.proportions.is_none() {
            self.proportions = Some(nd::Array1::zeros(n));
        }

        if let Some(ref mut p) = self.proportions {
            p[code] += weight;
        }

        Ok(())
    }

    /// The proportions normalized to sum to one.
    ///
    /// # Errors
    /// * `AmbroseError::UnsupportedOperation`, if the proportions are uninitialized
    /// * `AmbroseError::General`, if the proportions sum to zero
    pub fn normalized(&self) -> Result<nd::Array1<f64>> {
        let p = self.initialized()?;
        let total: f64 = p.sum();
        if total <= 0.0 {
            return Err(AmbroseError::General(
                String::from("cannot normalize proportions summing to zero")
            ));
        }

        Ok(p / total)
    }

    /// Draw a domain code at random, distributed according to the normalized proportions
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<usize> {
        let p = self.normalized()?;
        let u: f64 = rng.gen();

        let mut acc = 0.0;
        for (code, &prob) in p.iter().enumerate() {
            acc += prob;
            if u < acc {
                return Ok(code);
            }
        }

        // floating point slack: the cumulative sum may fall just short of 1.0
        Ok(p.len() - 1)
    }

    fn initialized(&self) -> Result<&nd::Array1<f64>> {
        self.proportions.as_ref().ok_or_else(|| AmbroseError::UnsupportedOperation(
            String::from("reading an uninitialized marginal's proportions")
        ))
    }

}

impl Marginal for DiscreteMarginal1 {

    fn variables(&self) -> Vec<Variable> {
        vec![self.var.clone()]
    }

    /// Set the variable to the code with the greatest proportion
    fn set_to_maximize(&self, diff: Option<&mut DiffList>) -> Result<()> {
        let p = self.initialized()?;

        let mut best = 0;
        for (code, &prob) in p.iter().enumerate() {
            if prob > p[best] {
                best = code;
            }
        }

        self.var.set_code(best, diff)
    }

}


/// A `Marginal` over exactly two discrete `Variable`s, holding a joint distribution as a
/// two-dimensional table (first variable indexes rows).
#[derive(Clone, Debug)]
pub struct DiscreteMarginal2 {
    vars: [Variable; 2],
    proportions: nd::Array2<f64>
}

impl DiscreteMarginal2 {

    /// Construct a new `DiscreteMarginal2` over the given joint proportions.
    ///
    /// # Errors
    /// * `AmbroseError::InvalidValue`, if either variable is continuous or the table shape does
    ///   not match the cardinalities
    pub fn new(v1: &Variable, v2: &Variable, proportions: nd::Array2<f64>) -> Result<DiscreteMarginal2> {
        match (v1.cardinality(), v2.cardinality()) {
            (Some(n1), Some(n2)) if proportions.dim() == (n1, n2) => {
                Ok(DiscreteMarginal2 {
                    vars: [v1.clone(), v2.clone()],
                    proportions
                })
            },
            (Some(_), Some(_)) => Err(AmbroseError::InvalidValue(
                String::from("joint table shape does not match the cardinalities")
            )),
            _ => Err(AmbroseError::InvalidValue(
                String::from("DiscreteMarginal2 requires discrete variables")
            ))
        }
    }

    /// The joint proportions
    pub fn proportions(&self) -> &nd::Array2<f64> {
        &self.proportions
    }

}

impl Marginal for DiscreteMarginal2 {

    fn variables(&self) -> Vec<Variable> {
        self.vars.to_vec()
    }

    /// Set both variables to the jointly maximizing pair of codes
    fn set_to_maximize(&self, mut diff: Option<&mut DiffList>) -> Result<()> {
        let mut best = (0, 0);
        for ((i, j), &prob) in self.proportions.indexed_iter() {
            if prob > self.proportions[best] {
                best = (i, j);
            }
        }

        self.vars[0].set_code(best.0, diff.as_mut().map(|d| &mut **d))?;
        self.vars[1].set_code(best.1, diff)
    }

}


/// A `Summary` holding one `DiscreteMarginal1` per discrete `Variable`.
///
/// Supports incremental accumulation for sampling-based inference: each call to
/// `increment_current_values` adds a weight to every registered variable's current live value.
pub struct DiscreteSummary1 {
    marginals: IndexMap<Variable, DiscreteMarginal1>
}

impl DiscreteSummary1 {

    /// Construct a new, empty `DiscreteSummary1`
    pub fn new() -> DiscreteSummary1 {
        DiscreteSummary1 { marginals: IndexMap::new() }
    }

    /// Construct a `DiscreteSummary1` with an uninitialized placeholder per variable
    pub fn over(vars: &[Variable]) -> Result<DiscreteSummary1> {
        let mut summary = DiscreteSummary1::new();
        for var in vars {
            summary.register(var)?;
        }

        Ok(summary)
    }

    /// Register a marginal, keyed by its variable.
    ///
    /// # Errors
    /// * `AmbroseError::DuplicateMarginal`, if a marginal for that variable is already registered
    pub fn insert(&mut self, marginal: DiscreteMarginal1) -> Result<()> {
        let var = marginal.variable().clone();
        if self.marginals.contains_key(&var) {
            return Err(AmbroseError::DuplicateMarginal);
        }

        self.marginals.insert(var, marginal);
        Ok(())
    }

    /// Register a variable with an as-yet-uninitialized marginal, to be filled in later. A no-op
    /// when the variable is already registered.
    pub fn register(&mut self, var: &Variable) -> Result<()> {
        if !self.marginals.contains_key(var) {
            self.marginals.insert(var.clone(), DiscreteMarginal1::new(var)?);
        }

        Ok(())
    }

    /// Supply the proportions for a variable's marginal, registering the variable first if
    /// needed. Filling in a placeholder does not duplicate its entry.
    pub fn set_proportions(&mut self, var: &Variable, proportions: nd::Array1<f64>) -> Result<()> {
        self.register(var)?;
        // present after register
        match self.marginals.get_mut(var) {
            Some(m) => m.set_proportions(proportions),
            None => Err(AmbroseError::VariableNotBound)
        }
    }

    /// Add `weight` to each registered variable's current live value's slot in its own marginal.
    /// Used by sampling-based inference to accumulate empirical counts.
    pub fn increment_current_values(&mut self, weight: f64) -> Result<()> {
        for (var, marginal) in self.marginals.iter_mut() {
            // registered variables are discrete, so the code is always present
            let code = var.code().ok_or(AmbroseError::VariableNotBound)?;
            marginal.increment(code, weight)?;
        }

        Ok(())
    }

    /// The marginal registered for `var`, if any
    pub fn get(&self, var: &Variable) -> Option<&DiscreteMarginal1> {
        self.marginals.get(var)
    }

    /// The number of registered variables
    pub fn len(&self) -> usize {
        self.marginals.len()
    }

    /// Check if no variable is registered
    pub fn is_empty(&self) -> bool {
        self.marginals.is_empty()
    }

}

impl Summary for DiscreteSummary1 {

    fn marginals(&self) -> Vec<Box<dyn Marginal>> {
        self.marginals.values()
            .map(|m| Box::new(m.clone()) as Box<dyn Marginal>)
            .collect()
    }

    /// One variable resolves to its own distribution. Two *distinct* variables resolve to the
    /// outer product of their independent distributions - an independence approximation, not a
    /// computed joint; each variable's marginal is looked up independently by identity. Any other
    /// query is `None`, as is any query touching an unregistered or uninitialized marginal.
    fn marginal(&self, vars: &[Variable]) -> Option<Box<dyn Marginal>> {
        match vars.len() {
            1 => {
                self.marginals.get(&vars[0])
                    .map(|m| Box::new(m.clone()) as Box<dyn Marginal>)
            },
            2 => {
                if vars[0] == vars[1] {
                    return None;
                }

                // stored proportions may be raw accumulated counts; normalize each before
                // taking the product so the synthesized joint is a distribution
                let p1 = self.marginals.get(&vars[0])?.normalized().ok()?;
                let p2 = self.marginals.get(&vars[1])?.normalized().ok()?;

                let joint = nd::Array2::from_shape_fn(
                    (p1.len(), p2.len()),
                    |(i, j)| p1[i] * p2[j]
                );

                DiscreteMarginal2::new(&vars[0], &vars[1], joint)
                    .ok()
                    .map(|m| Box::new(m) as Box<dyn Marginal>)
            },
            _ => None
        }
    }

}
