//! Per-request service lifecycle.
//!
//! # States
//! ```text
//! Created → SetupDone → Invoked ──→ Done
//!    │          │           │
//!    └──────────┴───────────┴──────→ Failed
//! ```
//!
//! # Transitions
//! - Construct failure: Failed, nothing else runs
//! - Setup failure: Failed, no entry point, no teardown
//! - Entry point failure: teardown still runs, then Failed with the entry
//!   point fault (a teardown fault in this case is only logged)
//! - Teardown failure after a successful entry point: Failed
//!
//! # Design Decisions
//! - Panics in the constructor or any method are captured as faults of the
//!   phase they occurred in
//! - No timeouts and no retries; the listener owns cancellation

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{LifecycleFault, Phase};
use crate::routing::{Descriptor, RegisteredRoute};
use crate::service::{Fault, Lifecycle, Value};

/// Last state a failed lifecycle reached. A completed lifecycle is
/// reported as [`Outcome::Done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    SetupDone,
    Invoked,
}

/// Terminal state of one request's lifecycle.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Entry point result (`Value::Unit` for void).
    Done(Value),
    Failed {
        /// Last state reached before the fault.
        stage: Stage,
        fault: LifecycleFault,
    },
}

impl Outcome {
    pub fn into_result(self) -> Result<Value, LifecycleFault> {
        match self {
            Outcome::Done(value) => Ok(value),
            Outcome::Failed { fault, .. } => Err(fault),
        }
    }
}

/// Hooks around each lifecycle phase.
pub trait LifecycleObserver: Send + Sync {
    fn entered(&self, _descriptor: &Descriptor, _phase: Phase) {}

    fn completed(&self, _descriptor: &Descriptor, _phase: Phase, _fault: Option<&LifecycleFault>) {}
}

/// Emits a debug event per phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LifecycleObserver for TracingObserver {
    fn completed(&self, descriptor: &Descriptor, phase: Phase, fault: Option<&LifecycleFault>) {
        match fault {
            None => tracing::debug!(
                route = %descriptor.route,
                verb = %descriptor.verb,
                phase = %phase,
                "Lifecycle phase completed"
            ),
            Some(fault) => tracing::debug!(
                route = %descriptor.route,
                verb = %descriptor.verb,
                phase = %phase,
                error = %fault.message,
                "Lifecycle phase failed"
            ),
        }
    }
}

struct Run<'a> {
    descriptor: &'a Descriptor,
    observer: &'a dyn LifecycleObserver,
}

impl Run<'_> {
    fn phase<T>(&self, phase: Phase, f: impl FnOnce() -> Result<T, Fault>) -> Result<T, LifecycleFault> {
        self.observer.entered(self.descriptor, phase);
        let result = match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(fault)) => Err(self.fault(phase, fault.to_string())),
            Err(payload) => Err(self.fault(phase, panic_message(payload.as_ref()))),
        };
        self.observer
            .completed(self.descriptor, phase, result.as_ref().err());
        result
    }

    fn fault(&self, phase: Phase, message: String) -> LifecycleFault {
        LifecycleFault {
            service: self.descriptor.service.clone(),
            phase,
            message,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

/// Run construct → setup → entry point → teardown for one request.
pub fn invoke(route: &RegisteredRoute, args: Vec<Value>, observer: &dyn LifecycleObserver) -> Outcome {
    let descriptor = &route.descriptor;
    let run = Run { descriptor, observer };

    let mut instance: Box<dyn Lifecycle> = match run.phase(Phase::Construct, || Ok(route.recipe.construct())) {
        Ok(instance) => instance,
        Err(fault) => {
            return Outcome::Failed {
                stage: Stage::Created,
                fault,
            }
        }
    };
    let mut stage = Stage::Created;

    if descriptor.setup.is_some() {
        if let Err(fault) = run.phase(Phase::Setup, || instance.setup()) {
            return Outcome::Failed { stage, fault };
        }
        stage = Stage::SetupDone;
    }

    let result = run.phase(Phase::EntryPoint, || instance.invoke(args));

    let teardown = if descriptor.teardown.is_some() {
        Some(run.phase(Phase::Teardown, || instance.teardown()))
    } else {
        None
    };

    match (result, teardown) {
        (Err(fault), teardown) => {
            if let Some(Err(masked)) = teardown {
                tracing::warn!(
                    route = %descriptor.route,
                    verb = %descriptor.verb,
                    error = %masked,
                    "Teardown failed after entry point failure"
                );
            }
            Outcome::Failed { stage, fault }
        }
        (Ok(_), Some(Err(fault))) => Outcome::Failed {
            stage: Stage::Invoked,
            fault,
        },
        (Ok(value), _) => Outcome::Done(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{HttpVerb, RouteTable};
    use crate::service::{ScalarKind, ServiceCatalog, ServiceType};
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<&'static str>>>;

    struct Tracked {
        log: CallLog,
        fail: Option<&'static str>,
    }

    impl Tracked {
        fn record(&self, call: &'static str) -> Result<(), String> {
            self.log.lock().unwrap().push(call);
            if self.fail == Some(call) {
                return Err(format!("{call} exploded"));
            }
            Ok(())
        }

        fn setup(&mut self) -> Result<(), String> {
            self.record("setup")
        }

        fn run(&mut self, input: String) -> Result<String, String> {
            self.record("handle")?;
            if self.fail == Some("panic") {
                panic!("handler panicked");
            }
            Ok(input.to_uppercase())
        }

        fn teardown(&mut self) -> Result<(), String> {
            self.record("teardown")
        }
    }

    #[derive(Default)]
    struct PhaseRecorder {
        phases: Mutex<Vec<(Phase, bool)>>,
    }

    impl LifecycleObserver for PhaseRecorder {
        fn completed(&self, _descriptor: &Descriptor, phase: Phase, fault: Option<&LifecycleFault>) {
            self.phases.lock().unwrap().push((phase, fault.is_none()));
        }
    }

    fn tracked_route(fail: Option<&'static str>, setup: bool, teardown: bool) -> (Arc<RegisteredRoute>, CallLog) {
        let log = CallLog::default();
        let tracked_log = log.clone();
        let service = ServiceType::new("tracked", move || {
            if fail == Some("construct") {
                panic!("constructor panicked");
            }
            Tracked {
                log: tracked_log.clone(),
                fail,
            }
        })
        .method("Setup", Tracked::setup)
        .method("Run", Tracked::run)
        .method("Teardown", Tracked::teardown);

        let mut descriptor = Descriptor::new("tracked", "Run", HttpVerb::Get, "/tracked")
            .with_parameter("input", ScalarKind::String);
        if setup {
            descriptor = descriptor.with_setup("Setup");
        }
        if teardown {
            descriptor = descriptor.with_teardown("Teardown");
        }

        let catalog = Arc::new(ServiceCatalog::new().with(service).unwrap());
        let table = RouteTable::build(catalog, [descriptor]).unwrap();
        let route = table.lookup("/tracked", HttpVerb::Get).unwrap().clone();
        (route, log)
    }

    fn args() -> Vec<Value> {
        vec![Value::String("hello".into())]
    }

    fn calls(log: &CallLog) -> Vec<&'static str> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_success_order() {
        let (route, log) = tracked_route(None, true, true);
        let observer = PhaseRecorder::default();

        let outcome = invoke(&route, args(), &observer);

        assert!(matches!(outcome, Outcome::Done(Value::String(ref s)) if s == "HELLO"));
        assert_eq!(calls(&log), vec!["setup", "handle", "teardown"]);
        assert_eq!(
            *observer.phases.lock().unwrap(),
            vec![
                (Phase::Construct, true),
                (Phase::Setup, true),
                (Phase::EntryPoint, true),
                (Phase::Teardown, true),
            ]
        );
    }

    #[test]
    fn test_entry_point_only() {
        let (route, log) = tracked_route(None, false, false);
        let outcome = invoke(&route, args(), &TracingObserver);
        assert!(matches!(outcome, Outcome::Done(_)));
        assert_eq!(calls(&log), vec!["handle"]);
    }

    #[test]
    fn test_entry_point_failure_still_tears_down() {
        let (route, log) = tracked_route(Some("handle"), true, true);

        let outcome = invoke(&route, args(), &TracingObserver);

        assert_eq!(calls(&log), vec!["setup", "handle", "teardown"]);
        match outcome {
            Outcome::Failed { stage, fault } => {
                assert_eq!(stage, Stage::SetupDone);
                assert_eq!(fault.phase, Phase::EntryPoint);
                assert_eq!(fault.message, "handle exploded");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_entry_point_failure_without_setup_tears_down() {
        let (route, log) = tracked_route(Some("handle"), false, true);
        let outcome = invoke(&route, args(), &TracingObserver);
        assert_eq!(calls(&log), vec!["handle", "teardown"]);
        assert!(matches!(outcome, Outcome::Failed { stage: Stage::Created, .. }));
    }

    #[test]
    fn test_setup_failure_skips_everything() {
        let (route, log) = tracked_route(Some("setup"), true, true);

        let outcome = invoke(&route, args(), &TracingObserver);

        assert_eq!(calls(&log), vec!["setup"]);
        match outcome {
            Outcome::Failed { stage, fault } => {
                assert_eq!(stage, Stage::Created);
                assert_eq!(fault.phase, Phase::Setup);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_teardown_failure_is_surfaced() {
        let (route, log) = tracked_route(Some("teardown"), true, true);

        let outcome = invoke(&route, args(), &TracingObserver);

        assert_eq!(calls(&log), vec!["setup", "handle", "teardown"]);
        match outcome {
            Outcome::Failed { stage, fault } => {
                assert_eq!(stage, Stage::Invoked);
                assert_eq!(fault.phase, Phase::Teardown);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    struct Brittle;

    impl Brittle {
        fn run(&mut self) -> Result<String, &'static str> {
            Err("entry failed")
        }

        fn close(&mut self) -> Result<(), &'static str> {
            Err("close failed")
        }
    }

    #[test]
    fn test_entry_point_fault_wins_over_teardown_fault() {
        let service = ServiceType::new("brittle", || Brittle)
            .method("Run", Brittle::run)
            .method("Close", Brittle::close);
        let catalog = Arc::new(ServiceCatalog::new().with(service).unwrap());
        let table = RouteTable::build(
            catalog,
            [Descriptor::new("brittle", "Run", HttpVerb::Post, "/brittle").with_teardown("Close")],
        )
        .unwrap();
        let route = table.lookup("/brittle", HttpVerb::Post).unwrap();
        let observer = PhaseRecorder::default();

        let fault = invoke(route, Vec::new(), &observer).into_result().unwrap_err();

        assert_eq!(fault.phase, Phase::EntryPoint);
        assert_eq!(fault.message, "entry failed");
        assert_eq!(
            *observer.phases.lock().unwrap(),
            vec![
                (Phase::Construct, true),
                (Phase::EntryPoint, false),
                (Phase::Teardown, false),
            ]
        );
    }

    #[test]
    fn test_panics_are_captured() {
        let (route, log) = tracked_route(Some("panic"), true, true);
        let fault = invoke(&route, args(), &TracingObserver).into_result().unwrap_err();
        assert_eq!(fault.phase, Phase::EntryPoint);
        assert!(fault.message.contains("handler panicked"));
        assert_eq!(calls(&log), vec!["setup", "handle", "teardown"]);

        let (route, log) = tracked_route(Some("construct"), true, true);
        let fault = invoke(&route, args(), &TracingObserver).into_result().unwrap_err();
        assert_eq!(fault.phase, Phase::Construct);
        assert!(calls(&log).is_empty());
    }
}
