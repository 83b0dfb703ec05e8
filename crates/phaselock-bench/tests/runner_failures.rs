//! Trial failures are excluded and counted, not fatal.

use std::sync::atomic::{AtomicUsize, Ordering};

use phaselock_adapter_sim::SimulatorBackend;
use phaselock_bench::{BenchConfig, BenchReport, BenchmarkRunner, TrialStage, Verdict};
use phaselock_hal::{Backend, Capabilities, ExecutionResult, HalError, HalResult};
use phaselock_ir::Circuit;

/// Simulator whose every `fail_every`-th stabilized execution fails.
struct FlakyBackend {
    inner: SimulatorBackend,
    fail_every: usize,
    stabilized_runs: AtomicUsize,
}

impl FlakyBackend {
    fn new(fail_every: usize) -> Self {
        Self {
            inner: SimulatorBackend::new(),
            fail_every,
            stabilized_runs: AtomicUsize::new(0),
        }
    }
}

impl Backend for FlakyBackend {
    fn name(&self) -> &str {
        "flaky"
    }

    fn capabilities(&self) -> &Capabilities {
        self.inner.capabilities()
    }

    fn run(&self, circuit: &Circuit, shots: u32, seed: u64) -> HalResult<ExecutionResult> {
        if circuit.name().ends_with("_stabilized") {
            let n = self.stabilized_runs.fetch_add(1, Ordering::SeqCst) + 1;
            if n % self.fail_every == 0 {
                return Err(HalError::ExecutionFailed("injected failure".into()));
            }
        }
        self.inner.run(circuit, shots, seed)
    }

    fn ideal_outcome(&self, circuit: &Circuit) -> HalResult<String> {
        self.inner.ideal_outcome(circuit)
    }
}

/// Backend that cannot evaluate ideal outcomes.
struct NoIdealBackend {
    inner: SimulatorBackend,
}

impl Backend for NoIdealBackend {
    fn name(&self) -> &str {
        "no-ideal"
    }

    fn capabilities(&self) -> &Capabilities {
        self.inner.capabilities()
    }

    fn run(&self, circuit: &Circuit, shots: u32, seed: u64) -> HalResult<ExecutionResult> {
        self.inner.run(circuit, shots, seed)
    }
}

fn config(trials: usize) -> BenchConfig {
    BenchConfig {
        trials,
        shots_per_trial: 256,
        seed: Some(7),
        ..BenchConfig::default()
    }
}

#[test]
fn test_failed_trials_are_excluded() {
    let backend = FlakyBackend::new(50);
    let config = config(100);
    let table = BenchmarkRunner::new(&config, &backend).unwrap().run();

    assert_eq!(table.requested, 100);
    assert_eq!(table.successful(), 98);
    assert_eq!(table.failed(), 2);
    assert_eq!(table.failures[0].index, 49);
    assert_eq!(table.failures[1].index, 99);
    assert!(table
        .failures
        .iter()
        .all(|f| f.stage == TrialStage::Stabilized && f.message.contains("injected")));
    assert!(table.records.iter().all(|r| r.index != 49 && r.index != 99));

    let report = BenchReport::new(&config, backend.name(), &table);
    assert_eq!(report.summary.successful, 98);
    assert!(report.render_text().contains("98/100 trials succeeded"));
}

#[test]
fn test_surviving_trials_match_clean_run() {
    let flaky = FlakyBackend::new(3);
    let clean = SimulatorBackend::new();
    let config = config(12);

    let flaky_table = BenchmarkRunner::new(&config, &flaky).unwrap().run();
    let clean_table = BenchmarkRunner::new(&config, &clean).unwrap().run();

    for record in &flaky_table.records {
        assert_eq!(record, &clean_table.records[record.index]);
    }
}

#[test]
fn test_all_trials_failing_is_insufficient() {
    let backend = NoIdealBackend {
        inner: SimulatorBackend::new(),
    };
    let config = config(5);
    let table = BenchmarkRunner::new(&config, &backend).unwrap().run();

    assert_eq!(table.successful(), 0);
    assert_eq!(table.failed(), 5);
    assert!(table.failures.iter().all(|f| f.stage == TrialStage::Expected));

    let report = BenchReport::new(&config, backend.name(), &table);
    assert_eq!(report.summary.verdict, Verdict::InsufficientData);
    assert!(report.render_text().contains("0/5 trials succeeded"));
}
