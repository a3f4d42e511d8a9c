//! vmbridge - the call boundary between a compiler and a managed runtime
//!
//! A foreign caller that wants to invoke a managed method hands over boxed
//! arguments and a method signature. This crate turns them into the native
//! argument sequence the runtime's call machinery expects:
//!
//! - `vmdata` - one-time snapshot of boxing offsets and runtime constants
//! - `gc` - handle marks bounding the lifetime of transient references
//! - `interop` - the argument unboxer and the native slot buffer
//! - `signature` - method signatures and descriptor parsing
//! - `heap` - host-side traits plus two heap implementations

pub mod config;
pub mod error;
pub mod gc;
pub mod heap;
pub mod interop;
pub mod logging;
pub mod signature;
pub mod vmdata;

pub use config::BridgeConfig;
pub use error::{FrameError, SignatureError, Violation};
pub use gc::HandleMark;
pub use heap::{BoxHeap, LayoutSource, ManagedHeap, ObjectRef};
pub use interop::{unbox_arguments, ArgumentUnboxer, CallArguments, CallKind, NativeSlot};
pub use signature::MethodSignature;
pub use vmdata::VmData;

/// Bring the boundary up: logging, configuration, then the VM data snapshot.
///
/// Must run once, before the first unboxing pass. Calling it twice is fatal.
pub fn init<S: LayoutSource + ?Sized>(config: BridgeConfig, source: &S) -> &'static VmData {
    logging::init_with_config(logging::LogConfig::from_settings(&config.logging).with_env());
    if config::install(config).is_err() {
        tracing::warn!("bridge configuration already installed, keeping the first one");
    }
    vmdata::initialize(source)
}
