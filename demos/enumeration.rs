//! Provides an example of scoring a factor by exhaustive enumeration and collapsing the
//! resulting summary back onto the live variables.

extern crate ambrose;
#[macro_use]
extern crate ndarray;

use ambrose::assignment::{Assignment, AssignmentIterator};
use ambrose::factor::{Factor, TableFactor};
use ambrose::summary::{DiscreteSummary1, Summary};
use ambrose::variable::{DiffList, Variable};

fn main() -> ambrose::Result<()> {
    /////////////////////////////////////////////////////
    // Step 1: two discrete variables and a potential over them
    let weather = Variable::binary();
    let traffic = Variable::discrete(3);

    let phi = TableFactor::new(
        vec![weather.clone(), traffic.clone()],
        array![[0.5, 0.3, 0.2], [0.1, 0.3, 0.6]].into_dyn()
    )?;

    /////////////////////////////////////////////////////
    // Step 2: enumerate every joint assignment and accumulate per-variable weights
    let mut summary = DiscreteSummary1::over(&phi.neighbors())?;

    let varying = phi.neighbors().into_iter().collect();
    for assignment in AssignmentIterator::for_factor(&phi, &varying)? {
        let weight = phi.value(&assignment)?;

        // move the live state to this combination, then count it
        assignment.globalize(None)?;
        summary.increment_current_values(weight)?;
    }

    /////////////////////////////////////////////////////
    // Step 3: inspect the accumulated marginals
    for var in &[weather.clone(), traffic.clone()] {
        let p = summary.get(var).unwrap().normalized()?;
        println!("marginal over {:?}: {}", var, p);
    }

    /////////////////////////////////////////////////////
    // Step 4: collapse onto the maximizing values, then roll the changes back
    let mut diff = DiffList::new();
    summary.set_to_maximize(Some(&mut diff))?;
    println!(
        "maximizing values: weather = {:?}, traffic = {:?}",
        weather.value(),
        traffic.value()
    );

    diff.undo();
    println!(
        "after undo: weather = {:?}, traffic = {:?}",
        weather.value(),
        traffic.value()
    );

    Ok(())
}
