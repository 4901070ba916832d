//! A layered stack of `Assignment`s with shadowing.
//!
//! Lookup walks the layers from innermost to outermost and the first layer that explicitly binds
//! the queried variable wins. If no layer binds it, the *outermost* layer's own fallback rule
//! applies - so stacking a fixed-arity assignment on top of `CurrentAssignment` yields
//! "overridden variables take the override, everything else uses live state".
//!
//! Stacks are persistent: `push` produces a new stack sharing its tail with the original.

use super::Assignment;
use util::Result;
use variable::{DiffList, Value, Variable};

use itertools::Itertools;

use std::rc::Rc;


struct Node {
    layer: Rc<dyn Assignment>,
    next: Option<Rc<Node>>
}

/// An ordered list of `Assignment` layers, innermost first
#[derive(Clone)]
pub struct AssignmentStack {
    top: Rc<Node>
}

impl AssignmentStack {

    /// Construct a single-layer stack over the given base assignment
    pub fn new(base: Rc<dyn Assignment>) -> AssignmentStack {
        AssignmentStack { top: Rc::new(Node { layer: base, next: None }) }
    }

    /// Prepend a new innermost layer, producing a new stack without mutating this one. The new
    /// stack shares this stack's layers structurally.
    pub fn push(&self, layer: Rc<dyn Assignment>) -> AssignmentStack {
        AssignmentStack {
            top: Rc::new(Node { layer, next: Some(self.top.clone()) })
        }
    }

    /// The number of layers
    pub fn depth(&self) -> usize {
        self.nodes().count()
    }

    /// Iterate the stack's nodes, innermost first
    fn nodes(&self) -> NodeIter {
        NodeIter { node: Some(&self.top) }
    }

}

struct NodeIter<'a> {
    node: Option<&'a Node>
}

impl<'a> Iterator for NodeIter<'a> {

    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let current = self.node?;
        self.node = current.next.as_ref().map(|n| &**n);
        Some(current)
    }

}

impl Assignment for AssignmentStack {

    /// The de-duplicated union of all layers' variables, innermost layers first.
    ///
    /// Fails if any layer cannot enumerate its variables (e.g. a virtual base layer).
    fn variables(&self) -> Result<Vec<Variable>> {
        let mut vars = Vec::new();
        for node in self.nodes() {
            vars.extend(node.layer.variables()?);
        }

        Ok(vars.into_iter().unique().collect())
    }

    fn value(&self, var: &Variable) -> Result<Value> {
        let mut node = &*self.top;
        loop {
            if node.layer.contains(var) {
                return node.layer.value(var);
            }

            match node.next {
                Some(ref next) => node = &**next,
                // no layer binds the variable: the outermost layer's fallback applies
                None => return node.layer.value(var)
            }
        }
    }

    fn get(&self, var: &Variable) -> Option<Value> {
        self.nodes()
            .find(|node| node.layer.contains(var))
            .and_then(|node| node.layer.get(var))
    }

    fn contains(&self, var: &Variable) -> bool {
        self.nodes().any(|node| node.layer.contains(var))
    }

    /// Globalize every layer, outermost first, so that inner (shadowing) layers win
    fn globalize(&self, mut diff: Option<&mut DiffList>) -> Result<()> {
        let layers: Vec<&Node> = self.nodes().collect();
        for node in layers.into_iter().rev() {
            node.layer.globalize(diff.as_mut().map(|d| &mut **d))?;
        }

        Ok(())
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use assignment::{Assignment1, CurrentAssignment, MutableAssignment};
    use util::AmbroseError;

    #[test]
    fn shadowing() {
        let v = Variable::discrete(3);

        let mut outer = MutableAssignment::new();
        outer.set(&v, Value::Discrete(1));

        let inner = Assignment1::new(&v, Value::Discrete(2));

        let stack = AssignmentStack::new(Rc::new(outer)).push(Rc::new(inner));
        assert_eq!(2, stack.depth());

        // innermost wins
        assert_eq!(Value::Discrete(2), stack.value(&v).unwrap());
        assert_eq!(Some(Value::Discrete(2)), stack.get(&v));
    }

    #[test]
    fn fallback_to_outermost() {
        let v = Variable::discrete(3);
        let w = Variable::discrete(3);
        w.set_code(1, None).unwrap();

        // fixed-arity layer over the live state
        let stack = AssignmentStack::new(Rc::new(CurrentAssignment))
            .push(Rc::new(Assignment1::new(&v, Value::Discrete(2))));

        assert_eq!(Value::Discrete(2), stack.value(&v).unwrap());

        // not bound by the inner layer: the virtual base supplies the live value
        assert_eq!(Value::Discrete(1), stack.value(&w).unwrap());
        assert!(stack.contains(&w));
        assert_eq!(Some(Value::Discrete(1)), stack.get(&w));
    }

    #[test]
    fn mutable_base_fallback() {
        let v = Variable::discrete(3);
        let w = Variable::discrete(3);

        let mut base = MutableAssignment::new();
        base.set(&v, Value::Discrete(1));

        let stack = AssignmentStack::new(Rc::new(base));

        // the map-backed base contributes its own failing fallback
        match stack.value(&w) {
            Err(AmbroseError::VariableNotBound) => (),
            _ => panic!("expected VariableNotBound")
        };
        assert!(!stack.contains(&w));
        assert_eq!(None, stack.get(&w));
    }

    #[test]
    fn structural_sharing() {
        let v = Variable::discrete(3);

        let mut base = MutableAssignment::new();
        base.set(&v, Value::Discrete(0));

        let stack = AssignmentStack::new(Rc::new(base));
        let deeper = stack.push(Rc::new(Assignment1::new(&v, Value::Discrete(2))));

        // pushing must not mutate the original
        assert_eq!(1, stack.depth());
        assert_eq!(Value::Discrete(0), stack.value(&v).unwrap());
        assert_eq!(Value::Discrete(2), deeper.value(&v).unwrap());
    }

    #[test]
    fn variables_union() {
        let v = Variable::discrete(3);
        let w = Variable::discrete(3);

        let mut outer = MutableAssignment::new();
        outer.set(&v, Value::Discrete(1));
        outer.set(&w, Value::Discrete(1));

        let stack = AssignmentStack::new(Rc::new(outer))
            .push(Rc::new(Assignment1::new(&v, Value::Discrete(2))));

        let vars = stack.variables().unwrap();
        assert_eq!(2, vars.len());
        assert!(vars.contains(&v));
        assert!(vars.contains(&w));

        // a virtual base layer cannot be enumerated
        let stack = AssignmentStack::new(Rc::new(CurrentAssignment))
            .push(Rc::new(Assignment1::new(&v, Value::Discrete(2))));
        assert!(stack.variables().is_err());
    }

    #[test]
    fn globalize_inner_wins() {
        let v = Variable::discrete(3);

        let mut outer = MutableAssignment::new();
        outer.set(&v, Value::Discrete(1));

        let stack = AssignmentStack::new(Rc::new(outer))
            .push(Rc::new(Assignment1::new(&v, Value::Discrete(2))));

        stack.globalize(None).unwrap();
        assert_eq!(Some(2), v.code());
    }

}
