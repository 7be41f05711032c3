use std::sync::Arc;

use factlens_orchestrator::FactCheckOrchestrator;

#[derive(Clone)]
pub struct ServeState {
    pub(crate) orchestrator: Arc<FactCheckOrchestrator>,
}

impl ServeState {
    pub fn new(orchestrator: Arc<FactCheckOrchestrator>) -> Self {
        Self { orchestrator }
    }
}
