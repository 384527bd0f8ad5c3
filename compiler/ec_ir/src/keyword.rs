//! Statement keywords.

use std::fmt;

/// Every command word the language knows.
///
/// Matching is ASCII case-insensitive: `out`, `Out` and `OUT` are the same
/// keyword.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Ec,
    Set,
    Arr,
    Out,
    In,
    If,
    Elif,
    Else,
    EndIf,
    Loop,
    EndLoop,
    Break,
    Continue,
    Fn,
    EndFn,
    Call,
    Ret,
    Class,
    EndClass,
    New,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exec,
    PyRun,
    CRun,
    End,
}

const TABLE: &[(Keyword, &str)] = &[
    (Keyword::Ec, "EC"),
    (Keyword::Set, "SET"),
    (Keyword::Arr, "ARR"),
    (Keyword::Out, "OUT"),
    (Keyword::In, "IN"),
    (Keyword::If, "IF"),
    (Keyword::Elif, "ELIF"),
    (Keyword::Else, "ELSE"),
    (Keyword::EndIf, "ENDIF"),
    (Keyword::Loop, "LOOP"),
    (Keyword::EndLoop, "ENDLOOP"),
    (Keyword::Break, "BREAK"),
    (Keyword::Continue, "CONTINUE"),
    (Keyword::Fn, "FN"),
    (Keyword::EndFn, "ENDFN"),
    (Keyword::Call, "CALL"),
    (Keyword::Ret, "RET"),
    (Keyword::Class, "CLASS"),
    (Keyword::EndClass, "ENDCLASS"),
    (Keyword::New, "NEW"),
    (Keyword::Add, "ADD"),
    (Keyword::Sub, "SUB"),
    (Keyword::Mul, "MUL"),
    (Keyword::Div, "DIV"),
    (Keyword::Mod, "MOD"),
    (Keyword::Exec, "EXEC"),
    (Keyword::PyRun, "PYRUN"),
    (Keyword::CRun, "CRUN"),
    (Keyword::End, "END"),
];

impl Keyword {
    /// Resolve a command word, ignoring ASCII case.
    pub fn from_word(word: &str) -> Option<Keyword> {
        TABLE
            .iter()
            .find(|(_, spelling)| spelling.eq_ignore_ascii_case(word))
            .map(|(keyword, _)| *keyword)
    }

    /// Canonical upper-case spelling.
    pub fn as_str(self) -> &'static str {
        TABLE
            .iter()
            .find(|(keyword, _)| *keyword == self)
            .map_or("?", |(_, spelling)| spelling)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
