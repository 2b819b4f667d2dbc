//! Plan driver

use super::{Operator, compile};
use crate::error::Result;
use crate::planning::plan::Node;
use tracing::debug;

/// Compiles a plan and runs it to completion.
///
/// The root is opened once, pulled until the stream ends, then closed.
/// Close runs on every exit path, including failures during open or
/// next, so file handles and join state are always released.
pub fn execute(plan: &Node) -> Result<()> {
    let mut root = compile(plan);
    run(root.as_mut())
}

fn run(root: &mut dyn Operator) -> Result<()> {
    if let Err(error) = root.open() {
        let _ = root.close();
        return Err(error);
    }
    let pulled = drain(root);
    let closed = root.close();
    let rows = pulled?;
    closed?;
    debug!(rows, "plan executed");
    Ok(())
}

fn drain(root: &mut dyn Operator) -> Result<u64> {
    let mut rows = 0u64;
    while root.next()?.is_some() {
        rows += 1;
    }
    Ok(rows)
}
