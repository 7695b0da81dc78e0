//! Running a system: request assembly, engine response, and results.

mod report;
mod request;
mod response;
mod simulation;

pub use report::{MemoryReporter, Reporter, StdoutReporter};
pub(crate) use report::report_diagnostics;
pub use request::{
    build_request, ConstantKey, GroupKey, RunOptions, RunRequest, RunTarget, NO_GROUP_SENTINEL,
};
pub use response::{Diagnostic, EngineResponse, ResultTable};
pub use simulation::{Simulation, SimulationId};
