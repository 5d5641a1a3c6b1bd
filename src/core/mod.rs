pub mod orchestrator;
pub mod session;

pub use orchestrator::{Orchestrator, TargetChain};
pub use session::{
    CallOutcome, FormFields, OperationKind, OperationState, Session, SimulationOutcome,
    WriteOutcome,
};
