//! Variable and array storage.
//!
//! Variables live in a flat global list plus, in [`ParamScoping::PerCall`]
//! mode, a stack of parameter scopes. Lookup scans the innermost scope, then
//! the globals, newest declaration first. New declarations always land in the
//! globals.
//!
//! Arrays are fixed-size `f64` tables addressed by [`ArrayId`]; they are never
//! freed before the store is dropped, even when the variable naming them is
//! reassigned.

use ec_diagnostic::{
    capacity_exceeded, index_out_of_bounds, invalid_size, not_an_array, undefined_array,
    undefined_variable, EcResult, Resource,
};

use crate::{ArrayId, Limits, ParamScoping, Value};

#[derive(Clone, Debug)]
struct Variable {
    name: String,
    value: Value,
}

impl Variable {
    fn new(name: &str, value: Value) -> Self {
        Variable {
            name: name.to_string(),
            value,
        }
    }
}

pub struct Store {
    globals: Vec<Variable>,
    scopes: Vec<Vec<Variable>>,
    arrays: Vec<Vec<f64>>,
    limits: Limits,
    scoping: ParamScoping,
}

impl Store {
    pub fn new(limits: Limits, scoping: ParamScoping) -> Self {
        Store {
            globals: Vec::new(),
            scopes: Vec::new(),
            arrays: Vec::new(),
            limits,
            scoping,
        }
    }

    pub fn scoping(&self) -> ParamScoping {
        self.scoping
    }

    /// Total live variable slots, parameters included.
    pub fn slot_count(&self) -> usize {
        self.globals.len() + self.scopes.iter().map(Vec::len).sum::<usize>()
    }

    pub fn array_count(&self) -> usize {
        self.arrays.len()
    }

    /// Number of active parameter scopes.
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// The visible value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(scope) = self.scopes.last() {
            if let Some(var) = scope.iter().rev().find(|v| v.name == name) {
                return Some(&var.value);
            }
        }
        self.globals
            .iter()
            .rev()
            .find(|v| v.name == name)
            .map(|v| &v.value)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        if let Some(scope) = self.scopes.last_mut() {
            if let Some(var) = scope.iter_mut().rev().find(|v| v.name == name) {
                return Some(&mut var.value);
            }
        }
        self.globals
            .iter_mut()
            .rev()
            .find(|v| v.name == name)
            .map(|v| &mut v.value)
    }

    pub fn get_checked(&self, name: &str) -> EcResult<&Value> {
        self.get(name).ok_or_else(|| undefined_variable(name))
    }

    pub fn get_checked_mut(&mut self, name: &str) -> EcResult<&mut Value> {
        self.get_mut(name).ok_or_else(|| undefined_variable(name))
    }

    /// The visible slot for `name`, creating a Null global if there is none.
    pub fn declare_or_get(&mut self, name: &str) -> EcResult<&mut Value> {
        if self.get(name).is_none() {
            if self.slot_count() >= self.limits.max_variables {
                return Err(capacity_exceeded(
                    Resource::Variables,
                    self.limits.max_variables,
                ));
            }
            tracing::trace!(name, "declare");
            self.globals.push(Variable::new(name, Value::Null));
        }
        self.get_checked_mut(name)
    }

    /// Allocate a zero-filled array of `size` cells and bind `name` to it.
    ///
    /// `size` truncates toward zero and must leave at least one cell, and
    /// no more than `Limits::max_array_cells`.
    pub fn create_array(&mut self, name: &str, size: f64) -> EcResult<ArrayId> {
        let cells = size.trunc();
        if cells.is_nan() || cells < 1.0 {
            return Err(invalid_size(size));
        }
        if cells > self.limits.max_array_cells as f64 {
            return Err(capacity_exceeded(
                Resource::ArrayCells,
                self.limits.max_array_cells,
            ));
        }
        if self.arrays.len() >= self.limits.max_arrays {
            return Err(capacity_exceeded(Resource::Arrays, self.limits.max_arrays));
        }
        let id = ArrayId(self.arrays.len());
        let slot = self.declare_or_get(name)?;
        *slot = Value::Array(id);
        self.arrays.push(vec![0.0; cells as usize]);
        Ok(id)
    }

    pub fn array(&self, id: ArrayId) -> Option<&[f64]> {
        self.arrays.get(id.0).map(Vec::as_slice)
    }

    fn array_id(&self, name: &str) -> EcResult<ArrayId> {
        match self.get(name) {
            None => Err(undefined_array(name)),
            Some(Value::Array(id)) => Ok(*id),
            Some(_) => Err(not_an_array(name)),
        }
    }

    pub fn read_element(&self, name: &str, index: f64) -> EcResult<f64> {
        let id = self.array_id(name)?;
        let cells = self.array(id).unwrap_or_default();
        let i = checked_index(index, cells.len())?;
        cells
            .get(i)
            .copied()
            .ok_or_else(|| index_out_of_bounds(i as i64, cells.len()))
    }

    pub fn write_element(&mut self, name: &str, index: f64, value: f64) -> EcResult<()> {
        let id = self.array_id(name)?;
        let cells = self
            .arrays
            .get_mut(id.0)
            .ok_or_else(|| undefined_array(name))?;
        let size = cells.len();
        let i = checked_index(index, size)?;
        match cells.get_mut(i) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(index_out_of_bounds(i as i64, size)),
        }
    }

    /// Bind call arguments to parameter names.
    ///
    /// `PerCall` pushes a fresh scope (missing arguments bind Null, extras
    /// are dropped). `Shared` assigns the supplied arguments to globals.
    pub fn enter_call(&mut self, params: &[String], args: Vec<Value>) -> EcResult<()> {
        match self.scoping {
            ParamScoping::PerCall => {
                if self.slot_count() + params.len() > self.limits.max_variables {
                    return Err(capacity_exceeded(
                        Resource::Variables,
                        self.limits.max_variables,
                    ));
                }
                let mut args = args.into_iter();
                let scope = params
                    .iter()
                    .map(|param| Variable::new(param, args.next().unwrap_or_default()))
                    .collect();
                self.scopes.push(scope);
            }
            ParamScoping::Shared => {
                for (param, value) in params.iter().zip(args) {
                    *self.declare_or_get(param)? = value;
                }
            }
        }
        Ok(())
    }

    /// Release the scope opened by the matching [`Store::enter_call`].
    pub fn leave_call(&mut self) {
        if self.scoping == ParamScoping::PerCall {
            self.scopes.pop();
        }
    }
}

/// Truncate toward zero and bounds-check against `size`.
fn checked_index(index: f64, size: usize) -> EcResult<usize> {
    let i = index.trunc() as i64;
    match usize::try_from(i) {
        Ok(u) if u < size => Ok(u),
        _ => Err(index_out_of_bounds(i, size)),
    }
}
