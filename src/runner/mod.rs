pub mod invocation;
pub mod process;

pub use invocation::{build_invocation, render_template, Invocation};
pub use process::{
    check_status, run_captured, run_discarding_output, run_interactive, CapturedOutput,
};

use crate::extension::Mode;

/// How a bound invocation is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Piped stdio on a worker; the output is decoded into a page.
    Captured,
    /// Inherits the terminal while the render loop is suspended.
    Interactive,
}

impl ExecutionStrategy {
    pub fn for_mode(mode: &Mode) -> Self {
        match mode {
            Mode::Silent => ExecutionStrategy::Interactive,
            _ => ExecutionStrategy::Captured,
        }
    }
}
