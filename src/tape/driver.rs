use aligned_vec::{AVec, CACHELINE_ALIGN};
use daggy::NodeIndex;
use rayon::prelude::*;

use super::{tape, Op, Tape};
use crate::error::{Error, Result, TapeTag};

/// Evaluates the tape recorded under `tag` at `x`, one output per dependent.
pub fn function(tag: TapeTag, x: &[f64]) -> Result<Vec<f64>> {
    let tape = tape(tag)?;
    let values = forward(&tape, x)?;
    log::debug!("function {} at {:?}", tape.tag(), x);
    Ok(tape.dependents.iter().map(|node| values[node.index()]).collect())
}

/// Gradient of the single dependent recorded under `tag`, at `x`.
pub fn gradient(tag: TapeTag, x: &[f64]) -> Result<Vec<f64>> {
    let tape = tape(tag)?;
    let dependent = match tape.dependents.as_slice() {
        [dependent] => *dependent,
        dependents => {
            return Err(Error::NotScalarValued {
                dependents: dependents.len(),
            })
        }
    };
    let values = forward(&tape, x)?;
    log::debug!("gradient {} at {:?}", tape.tag(), x);
    reverse(&tape, &values, dependent)
}

/// Jacobian of the tape recorded under `tag` at `x`: one row per dependent,
/// one column per independent. Rows are swept in parallel.
pub fn jacobian(tag: TapeTag, x: &[f64]) -> Result<Vec<Vec<f64>>> {
    let tape = tape(tag)?;
    let values = forward(&tape, x)?;
    let values: &[f64] = &values;
    log::debug!(
        "jacobian {} at {:?}: {}x{}",
        tape.tag(),
        x,
        tape.num_dependents(),
        tape.num_independents()
    );
    tape.dependents
        .par_iter()
        .map(|&dependent| reverse(&tape, values, dependent))
        .collect()
}

#[inline]
fn arg_value(tape: &Tape, values: &[f64], arg: Option<NodeIndex>) -> Result<f64> {
    arg.map(|arg| values[arg.index()])
        .ok_or(Error::Corrupted(tape.tag()))
}

fn forward(tape: &Tape, x: &[f64]) -> Result<AVec<f64>> {
    if x.len() != tape.num_independents() {
        return Err(Error::DimensionMismatch {
            expected: tape.num_independents(),
            found: x.len(),
        });
    }

    let len = tape.num_operations();
    let mut values = AVec::<f64>::with_capacity(CACHELINE_ALIGN, len);
    for index in 0..len {
        let node = NodeIndex::new(index);
        let value = match tape.graph[node] {
            Op::Independent(position) => x[position],
            Op::Const(value) => value,
            op => {
                let (lhs, rhs) = tape.args(node);
                let a = arg_value(tape, &values, lhs)?;
                let b = if op.is_binary() {
                    arg_value(tape, &values, rhs)?
                } else {
                    0.0
                };
                op.eval(a, b)
            }
        };
        values.push(value);
    }
    Ok(values)
}

fn reverse(tape: &Tape, values: &[f64], dependent: NodeIndex) -> Result<Vec<f64>> {
    let mut adjoints = vec![0.0; values.len()];
    // nodes the dependent reaches. A reached node propagates even a zero
    // adjoint, so an infinite partial still turns into NaN.
    let mut reached = vec![false; values.len()];
    adjoints[dependent.index()] = 1.0;
    reached[dependent.index()] = true;

    for index in (0..values.len()).rev() {
        if !reached[index] {
            continue;
        }
        let adjoint = adjoints[index];
        let node = NodeIndex::new(index);
        let op = tape.graph[node];
        if matches!(op, Op::Independent(_) | Op::Const(_)) {
            continue;
        }

        let (lhs, rhs) = tape.args(node);
        let a = arg_value(tape, values, lhs)?;
        let b = if op.is_binary() {
            arg_value(tape, values, rhs)?
        } else {
            0.0
        };
        let (da, db) = op.partials(a, b, values[index]);
        if let Some(lhs) = lhs {
            adjoints[lhs.index()] += adjoint * da;
            reached[lhs.index()] = true;
        }
        if let (true, Some(rhs)) = (op.is_binary(), rhs) {
            adjoints[rhs.index()] += adjoint * db;
            reached[rhs.index()] = true;
        }
    }

    Ok(tape
        .independents
        .iter()
        .map(|node| adjoints[node.index()])
        .collect())
}
