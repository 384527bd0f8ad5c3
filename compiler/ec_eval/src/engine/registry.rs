//! Function and class registries.
//!
//! Entries keep registration order. Duplicate names are allowed; name lookup
//! returns the first one registered. Each definition line registers at most
//! once, so a nested `FN` reached repeatedly is only recorded the first time.

use ec_diagnostic::{capacity_exceeded, malformed_statement, EcResult, Resource};
use ec_ir::{BlockKind, Edge, Keyword, Program};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    /// 0-based line of the `FN` header.
    pub start: usize,
    /// 0-based line of the matching `ENDFN`.
    pub end: usize,
    pub params: SmallVec<[String; 4]>,
}

/// Class metadata. Instances carry only the class id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Class {
    pub name: String,
    pub start: usize,
    pub end: usize,
    /// Names declared with `EC` directly in the body.
    pub members: Vec<String>,
    /// Names of `FN` headers directly in the body.
    pub methods: Vec<String>,
}

pub(crate) trait Definition {
    fn name(&self) -> &str;
    fn start(&self) -> usize;
}

impl Definition for Function {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self) -> usize {
        self.start
    }
}

impl Definition for Class {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self) -> usize {
        self.start
    }
}

pub(crate) struct Registry<T> {
    entries: Vec<T>,
    by_name: FxHashMap<String, usize>,
    by_start: FxHashMap<usize, usize>,
    limit: usize,
    resource: Resource,
}

impl<T: Definition> Registry<T> {
    pub(crate) fn new(limit: usize, resource: Resource) -> Self {
        Registry {
            entries: Vec::new(),
            by_name: FxHashMap::default(),
            by_start: FxHashMap::default(),
            limit,
            resource,
        }
    }

    pub(crate) fn insert(&mut self, definition: T) -> EcResult<usize> {
        if self.entries.len() >= self.limit {
            return Err(capacity_exceeded(self.resource, self.limit));
        }
        let index = self.entries.len();
        self.by_name
            .entry(definition.name().to_string())
            .or_insert(index);
        self.by_start.insert(definition.start(), index);
        self.entries.push(definition);
        Ok(index)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<(usize, &T)> {
        let index = *self.by_name.get(name)?;
        self.entries.get(index).map(|entry| (index, entry))
    }

    pub(crate) fn is_registered_at(&self, start: usize) -> bool {
        self.by_start.contains_key(&start)
    }

    pub(crate) fn entries(&self) -> &[T] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Split `name(a, b)` or `name` from an `FN` header.
pub(crate) fn parse_function_header(args: &str) -> EcResult<(String, SmallVec<[String; 4]>)> {
    let (name, params) = match args.split_once('(') {
        Some((name, rest)) => {
            let Some((params, _)) = rest.split_once(')') else {
                return Err(malformed_statement("FN", "a closing ')' after the parameters"));
            };
            (name.trim(), params)
        }
        None => (args.split_whitespace().next().unwrap_or(""), ""),
    };
    if name.is_empty() {
        return Err(malformed_statement("FN", "a function name"));
    }
    let params = params
        .split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(str::to_string)
        .collect();
    Ok((name.to_string(), params))
}

/// Collect member and method names declared directly in a class body.
pub(crate) fn scan_class_body(program: &Program, start: usize, end: usize) -> (Vec<String>, Vec<String>) {
    let mut members = Vec::new();
    let mut methods = Vec::new();
    let mut nested = 0usize;

    for index in start + 1..end {
        let Some(line) = program.line(index) else {
            break;
        };
        let Some(keyword) = line.keyword() else {
            continue;
        };
        let edge = BlockKind::classify(keyword)
            .filter(|(kind, _)| matches!(kind, BlockKind::Fn | BlockKind::Class))
            .map(|(_, edge)| edge);

        match (keyword, edge) {
            (Keyword::Fn, _) if nested == 0 => {
                if let Ok((name, _)) = parse_function_header(line.args()) {
                    methods.push(name);
                }
                nested += 1;
            }
            (Keyword::Ec, _) if nested == 0 => {
                if let Some(name) = line.args().split_whitespace().next() {
                    members.push(name.to_string());
                }
            }
            (_, Some(Edge::Open)) => nested += 1,
            (_, Some(Edge::Close)) => nested = nested.saturating_sub(1),
            _ => {}
        }
    }

    (members, methods)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn header_forms() {
        let (name, params) = parse_function_header("add(a, b ,c)").unwrap_or_default();
        assert_eq!(name, "add");
        assert_eq!(params.as_slice(), ["a", "b", "c"]);

        let (name, params) = parse_function_header("tick").unwrap_or_default();
        assert_eq!(name, "tick");
        assert!(params.is_empty());

        let (name, params) = parse_function_header("none()").unwrap_or_default();
        assert_eq!(name, "none");
        assert!(params.is_empty());
    }

    #[test]
    fn malformed_headers() {
        assert!(parse_function_header("").is_err());
        assert!(parse_function_header("(a)").is_err());
        assert!(parse_function_header("f(a, b").is_err());
    }

    #[test]
    fn first_registration_wins_lookup() {
        let mut registry = Registry::new(4, Resource::Functions);
        for start in [0, 5] {
            let inserted = registry.insert(Function {
                name: "f".into(),
                start,
                end: start + 1,
                params: SmallVec::new(),
            });
            assert!(inserted.is_ok());
        }
        assert_eq!(registry.lookup("f").map(|(_, f)| f.start), Some(0));
        assert!(registry.is_registered_at(5));
        assert!(!registry.is_registered_at(1));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut registry = Registry::new(1, Resource::Classes);
        let class = |start| Class {
            name: "C".into(),
            start,
            end: start + 1,
            members: Vec::new(),
            methods: Vec::new(),
        };
        assert!(registry.insert(class(0)).is_ok());
        assert!(registry.insert(class(2)).is_err());
    }

    #[test]
    fn class_body_metadata() {
        let program = Program::parse(
            "CLASS Point\nEC x 0\nEC y\nFN norm(p)\nEC tmp 1\nENDFN\nCLASS Inner\nEC z\nENDCLASS\nENDCLASS",
        );
        let (members, methods) = scan_class_body(&program, 0, 9);
        assert_eq!(members, vec!["x", "y"]);
        assert_eq!(methods, vec!["norm"]);
    }
}
