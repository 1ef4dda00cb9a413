//! Standard natives installed by the host
//!
//! - `constants`: `true`, `false`, `null`
//! - `io`: `print`, `clear`
//! - `math`: `sqrt`, `rand`
//! - `collections`: `addElement`
//! - `scheduling`: `time`, `interval`, `nextFrame`

pub mod collections;
pub mod constants;
pub mod io;
pub mod math;
pub mod scheduling;

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::host::{OutputSink, Scheduler};
use crate::runtime::Value;
use crate::tools::ToolRegistry;

/// Host-owned state the standard natives act on
#[derive(Clone)]
pub struct Context {
    /// Destination of `print`
    pub output: OutputSink,
    /// Clock and callback queues
    pub scheduler: Scheduler,
    /// Generator behind `rand()`
    pub rng: Rc<RefCell<StdRng>>,
}

impl Context {
    /// Creates a context; `seed` makes `rand()` reproducible
    pub fn new(output: OutputSink, scheduler: Scheduler, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Context {
            output,
            scheduler,
            rng: Rc::new(RefCell::new(rng)),
        }
    }
}

/// Register all standard natives
pub fn register_all(registry: &mut ToolRegistry, context: &Context) {
    constants::register(registry);
    io::register(registry, &context.output);
    math::register(registry, &context.rng);
    collections::register(registry);
    scheduling::register(registry, &context.scheduler);
}

/// Registry holding the full standard set
pub fn registry(context: &Context) -> ToolRegistry {
    let mut registry = ToolRegistry::empty();
    register_all(&mut registry, context);
    registry
}

/// True for values `interval` and `nextFrame` can invoke later
pub(crate) fn is_callable(value: &Value) -> bool {
    matches!(value, Value::Function(_) | Value::NativeFunction(_))
}
