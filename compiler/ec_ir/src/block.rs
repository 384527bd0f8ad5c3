//! Block kinds and forward scans over the line table.
//!
//! Scans are recomputed on every use. Each kind counts only its own opener
//! and closer, so blocks of different kinds may interleave.

use crate::{Keyword, Program};

/// The four paired constructs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    If,
    Loop,
    Fn,
    Class,
}

/// Which side of a block a keyword sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    Open,
    Close,
}

impl BlockKind {
    pub const ALL: [BlockKind; 4] = [
        BlockKind::If,
        BlockKind::Loop,
        BlockKind::Fn,
        BlockKind::Class,
    ];

    pub fn open_keyword(self) -> Keyword {
        match self {
            BlockKind::If => Keyword::If,
            BlockKind::Loop => Keyword::Loop,
            BlockKind::Fn => Keyword::Fn,
            BlockKind::Class => Keyword::Class,
        }
    }

    pub fn close_keyword(self) -> Keyword {
        match self {
            BlockKind::If => Keyword::EndIf,
            BlockKind::Loop => Keyword::EndLoop,
            BlockKind::Fn => Keyword::EndFn,
            BlockKind::Class => Keyword::EndClass,
        }
    }

    /// Classify a keyword as the opener or closer of some block.
    pub fn classify(keyword: Keyword) -> Option<(BlockKind, Edge)> {
        BlockKind::ALL.into_iter().find_map(|kind| {
            if keyword == kind.open_keyword() {
                Some((kind, Edge::Open))
            } else if keyword == kind.close_keyword() {
                Some((kind, Edge::Close))
            } else {
                None
            }
        })
    }
}

impl Program {
    /// Index of the closer matching the opener of `kind` at `open`.
    ///
    /// The scan starts after `open` at depth one, so it works equally from an
    /// `ELSE` or `ELIF` line when looking for the enclosing `ENDIF`.
    pub fn find_block_end(&self, open: usize, kind: BlockKind) -> Option<usize> {
        let mut depth = 1usize;
        for index in open + 1..self.len() {
            match self.keyword_at(index).and_then(BlockKind::classify) {
                Some((k, Edge::Open)) if k == kind => depth += 1,
                Some((k, Edge::Close)) if k == kind => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Branch points of the `IF` at `open`: each `ELIF`/`ELSE` directly in
    /// that block, then its `ENDIF`.
    pub fn if_branches(&self, open: usize) -> IfBranches<'_> {
        IfBranches {
            program: self,
            pos: open,
            depth: 1,
            done: false,
        }
    }
}

/// A stop along an `IF` block, as seen from its header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BranchPoint<'a> {
    Elif { line: usize, condition: &'a str },
    Else { line: usize },
    EndIf { line: usize },
}

/// Iterator returned by [`Program::if_branches`].
pub struct IfBranches<'a> {
    program: &'a Program,
    pos: usize,
    depth: usize,
    done: bool,
}

impl<'a> Iterator for IfBranches<'a> {
    type Item = BranchPoint<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while self.pos + 1 < self.program.len() {
            self.pos += 1;
            let line = self.pos;
            let Some(source) = self.program.line(line) else {
                break;
            };
            match source.keyword() {
                Some(Keyword::If) => self.depth += 1,
                Some(Keyword::EndIf) => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        self.done = true;
                        return Some(BranchPoint::EndIf { line });
                    }
                }
                Some(Keyword::Else) if self.depth == 1 => {
                    return Some(BranchPoint::Else { line });
                }
                Some(Keyword::Elif) if self.depth == 1 => {
                    return Some(BranchPoint::Elif {
                        line,
                        condition: source.args(),
                    });
                }
                _ => {}
            }
        }
        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn program(src: &str) -> Program {
        Program::parse(src)
    }

    #[test]
    fn nested_same_kind() {
        let p = program("LOOP 3\nLOOP 2\nENDLOOP\nENDLOOP\nOUT 1");
        assert_eq!(p.find_block_end(0, BlockKind::Loop), Some(3));
        assert_eq!(p.find_block_end(1, BlockKind::Loop), Some(2));
    }

    #[test]
    fn other_kinds_are_ignored() {
        let p = program("IF x > 1\nLOOP 2\nENDIF\nENDLOOP");
        assert_eq!(p.find_block_end(0, BlockKind::If), Some(2));
        assert_eq!(p.find_block_end(1, BlockKind::Loop), Some(3));
    }

    #[test]
    fn unclosed_block() {
        assert_eq!(program("FN f\nOUT 1").find_block_end(0, BlockKind::Fn), None);
    }

    #[test]
    fn branch_points_skip_nested_ifs() {
        let p = program(
            "IF a == 1\nIF b == 2\nELSE\nENDIF\nELIF a == 2\nOUT 2\nELSE\nOUT 3\nENDIF\nOUT 4",
        );
        let points: Vec<_> = p.if_branches(0).collect();
        assert_eq!(
            points,
            vec![
                BranchPoint::Elif {
                    line: 4,
                    condition: "a == 2"
                },
                BranchPoint::Else { line: 6 },
                BranchPoint::EndIf { line: 8 },
            ]
        );
    }

    #[test]
    fn classify_covers_all_pairs() {
        assert_eq!(
            BlockKind::classify(Keyword::EndClass),
            Some((BlockKind::Class, Edge::Close))
        );
        assert_eq!(BlockKind::classify(Keyword::Else), None);
    }
}
