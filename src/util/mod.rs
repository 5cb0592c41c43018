pub mod clock;
pub mod telemetry;
pub mod types;

pub use clock::now_ms;
pub use telemetry::init_tracing;
pub use types::{
    generate_id, ConstraintId, ExecutionStatus, HoldingScope, InstanceId, InstanceState, Strategy,
    UnitType,
};
