//! Structural validation.
//!
//! One forward pass before anything runs. Each block kind keeps its own stack
//! of open lines; kinds never check against each other, so `IF`/`LOOP` may
//! cross as long as each kind balances on its own.

use ec_diagnostic::{missing_close, unexpected_close, EcResult};

use crate::{BlockKind, Edge, Program};

/// Check that every block kind opens and closes in balance.
///
/// A closer with no open block of its kind fails at the closer's line.
/// Anything left open at the end fails at the earliest unclosed opener.
#[tracing::instrument(level = "debug", skip_all, fields(lines = program.len()))]
pub fn validate(program: &Program) -> EcResult<()> {
    let mut open: [Vec<usize>; 4] = Default::default();

    for (index, line) in program.lines().iter().enumerate() {
        let Some((kind, edge)) = line.keyword().and_then(BlockKind::classify) else {
            continue;
        };
        let stack = &mut open[slot(kind)];
        match edge {
            Edge::Open => stack.push(index),
            Edge::Close => {
                if stack.pop().is_none() {
                    return Err(unexpected_close(
                        kind.open_keyword().as_str(),
                        kind.close_keyword().as_str(),
                    )
                    .locate(index + 1, line.text()));
                }
            }
        }
    }

    let earliest = BlockKind::ALL
        .into_iter()
        .filter_map(|kind| open[slot(kind)].first().map(|&index| (index, kind)))
        .min_by_key(|&(index, _)| index);

    if let Some((index, kind)) = earliest {
        let text = program.line(index).map_or("", |line| line.text());
        return Err(missing_close(
            kind.open_keyword().as_str(),
            kind.close_keyword().as_str(),
        )
        .locate(index + 1, text));
    }

    tracing::debug!("structure ok");
    Ok(())
}

fn slot(kind: BlockKind) -> usize {
    match kind {
        BlockKind::If => 0,
        BlockKind::Loop => 1,
        BlockKind::Fn => 2,
        BlockKind::Class => 3,
    }
}
