//! Pipeline plugin trait.

use std::{sync::Mutex, time::Instant};

use super::CompilationContext;
use crate::Result;

/// Hooks called around every phase of a run.
///
/// Returning an error from a hook aborts the run.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    #[allow(unused_variables)]
    fn on_before_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        Ok(())
    }

    #[allow(unused_variables)]
    fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        Ok(())
    }
}

/// Logs phase boundaries and timings through `tracing`.
#[derive(Debug, Default)]
pub struct TracingPlugin {
    started: Mutex<Option<Instant>>,
}

impl TracingPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Plugin for TracingPlugin {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn on_before_phase(&self, phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
        tracing::debug!(phase, "phase started");
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
        Ok(())
    }

    fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        let elapsed = self
            .started
            .lock()
            .ok()
            .and_then(|mut started| started.take())
            .map(|start| start.elapsed());
        tracing::info!(
            phase,
            ?elapsed,
            warnings = ctx.warning_count(),
            "phase finished"
        );
        Ok(())
    }
}
