//! Engine configuration.

/// Capacity limits. Exceeding one is a runtime error, never a silent
/// truncation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_variables: usize,
    pub max_arrays: usize,
    /// Cells in a single array.
    pub max_array_cells: usize,
    pub max_functions: usize,
    pub max_classes: usize,
    pub max_call_depth: usize,
    pub max_loop_depth: usize,
    pub max_params: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_variables: 1024,
            max_arrays: 256,
            max_array_cells: 1 << 20,
            max_functions: 256,
            max_classes: 64,
            max_call_depth: 256,
            max_loop_depth: 256,
            max_params: 16,
        }
    }
}

/// How function parameters are bound on `CALL`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ParamScoping {
    /// Each call gets a fresh parameter scope, released on return.
    /// Names that are not parameters still resolve to globals.
    #[default]
    PerCall,
    /// Parameters are ordinary global variables; a recursive call
    /// overwrites its caller's arguments.
    Shared,
}
