//! Terminal host for LightScript programs
//!
//! The host owns everything a script can affect from outside: the output
//! sink behind `print`, the virtual clock and callback queues behind
//! `interval` and `nextFrame`, and the stop signal. It steps the program
//! body one top-level statement at a time, then drives frames until no
//! callbacks remain.

mod output;
mod scheduler;

pub use output::OutputSink;
pub use scheduler::Scheduler;

use crate::config::HostConfig;
use crate::error::Result;
use crate::lexer::tokenize;
use crate::parser::{parse, Program};
use crate::runtime::{Evaluator, Execution, Scope, Step, Value};
use crate::tools::stdlib;

/// Owns the environment a program runs in
pub struct Host {
    config: HostConfig,
    output: OutputSink,
    scheduler: Scheduler,
}

impl Host {
    /// Host with a silent, buffering output sink
    pub fn new(config: HostConfig) -> Self {
        Self::with_output(config, OutputSink::new())
    }

    /// Host that writes through `output`
    pub fn with_output(config: HostConfig, output: OutputSink) -> Self {
        Host {
            config,
            output,
            scheduler: Scheduler::new(),
        }
    }

    /// Host that echoes output to stdout
    pub fn echoing(config: HostConfig) -> Self {
        Self::with_output(config, OutputSink::echoing())
    }

    /// Settings every run uses
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Sink behind `print` and `clear`
    pub fn output(&self) -> &OutputSink {
        &self.output
    }

    /// Scheduler of the current (or most recent) run
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Cancels the run: queued callbacks are dropped and never invoked
    pub fn stop(&self) {
        self.scheduler.stop();
    }

    /// True after a run ends or [`Host::stop`] is called
    pub fn is_stopped(&self) -> bool {
        self.scheduler.is_stopped()
    }

    /// Tokenizes, parses and runs `source`
    pub fn run_source(&mut self, source: &str) -> Result<Value> {
        let program = parse(tokenize(source)?)?;
        self.run_program(program)
    }

    /// Runs `program` in a fresh root scope
    ///
    /// Returns the value of the last top-level statement. Any fault stops
    /// the host before it is returned.
    pub fn run_program(&mut self, program: Program) -> Result<Value> {
        self.scheduler = Scheduler::new();
        let scope = Scope::new();

        let context = stdlib::Context::new(
            self.output.clone(),
            self.scheduler.clone(),
            self.config.seed,
        );
        stdlib::registry(&context).install(&scope)?;

        let evaluator = Evaluator::with_max_depth(self.config.max_call_depth);
        let mut execution = Execution::with_evaluator(program, scope, evaluator);

        let result = self
            .run_body(&mut execution)
            .and_then(|value| self.run_frames(&mut execution).map(|_| value));

        match result {
            Ok(value) => {
                let pending = self.scheduler.pending();
                if pending > 0 {
                    tracing::warn!(pending, "host stopped with callbacks still queued");
                }
                self.stop();
                Ok(value)
            }
            Err(e) => {
                self.stop();
                Err(e)
            }
        }
    }

    fn run_body(&self, execution: &mut Execution) -> Result<Value> {
        let mut steps: u64 = 0;
        loop {
            if let Some(limit) = self.config.max_steps {
                if steps >= limit && !execution.is_finished() {
                    tracing::warn!(limit, "step limit reached");
                    return Ok(Value::Null);
                }
            }

            match execution.step()? {
                Step::Yielded => steps += 1,
                Step::Done(value) => return Ok(value),
            }
        }
    }

    fn run_frames(&self, execution: &mut Execution) -> Result<()> {
        let scope = execution.scope().clone();

        for frame in 0..self.config.max_frames {
            if self.is_stopped() || self.scheduler.pending() == 0 {
                break;
            }

            let due = self.scheduler.advance_clock(self.config.frame_ms);
            tracing::debug!(frame, callbacks = due.len(), "frame");

            for callback in due {
                if self.is_stopped() {
                    return Ok(());
                }
                execution
                    .evaluator_mut()
                    .call_function(&callback, &[], &scope)?;
            }
        }
        Ok(())
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn run(source: &str) -> (Host, Result<Value>) {
        let mut host = Host::default();
        let result = host.run_source(source);
        (host, result)
    }

    #[test]
    fn test_print_reaches_output() {
        let (host, result) = run("print(3 + 4)");
        assert!(result.is_ok());
        assert_eq!(host.output().lines(), vec!["7"]);
    }

    #[test]
    fn test_body_value_is_returned() {
        let (_, result) = run("let a = 2; a * 21");
        assert_eq!(result.unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_next_frame_runs_once() {
        let (host, result) = run("fn tick() { print(\"tick\") } nextFrame(tick)");
        assert!(result.is_ok());
        assert_eq!(host.output().lines(), vec!["tick"]);
    }

    #[test]
    fn test_frames_are_bounded() {
        let config = HostConfig {
            max_frames: 5,
            ..HostConfig::default()
        };
        let mut host = Host::new(config);
        host.run_source("let n = 0; fn tick() { n = n + 1; print(n) } interval(tick, 16)")
            .unwrap();

        assert_eq!(host.output().lines().len(), 5);
        assert!(host.is_stopped());
        assert_eq!(host.scheduler().pending(), 0);
    }

    #[test]
    fn test_callback_fault_stops_host() {
        let (host, result) = run(
            "let n = 0
             fn tick() { n = n + 1; print(n); if (n > 1) { missing } }
             interval(tick, 16)",
        );
        assert!(matches!(result, Err(Error::UndeclaredVariable { .. })));
        assert_eq!(host.output().lines(), vec!["1", "2"]);
        assert!(host.is_stopped());
    }

    #[test]
    fn test_step_limit() {
        let config = HostConfig {
            max_steps: Some(1),
            ..HostConfig::default()
        };
        let mut host = Host::new(config);
        host.run_source("print(1); print(2)").unwrap();
        assert_eq!(host.output().lines(), vec!["1"]);
    }

    #[test]
    fn test_seeded_rand_is_reproducible() {
        let config = HostConfig {
            seed: Some(3),
            ..HostConfig::default()
        };
        let first = Host::new(config.clone()).run_source("rand()").unwrap();
        let second = Host::new(config).run_source("rand()").unwrap();
        assert_eq!(first, second);
    }
}
