#![cfg_attr(not(test), no_std)]

//! Turns a declarative description of compiled-software targets into a
//! shell script that builds, installs, runs, or cleans them.
//!
//! The crate never touches the filesystem and never executes anything: it
//! walks the declared file trees and emits ordered commands into a
//! [`CommandSink`], and the resulting script is inert until an external
//! interpreter runs it.

extern crate alloc;

pub mod modes;
pub mod path;
pub mod sink;
pub mod target;
pub mod tree;

use alloc::rc::Rc;
use alloc::vec::Vec;

pub use crate::modes::Modes;
pub use crate::path::Path;
pub use crate::sink::CommandSink;
pub use crate::target::{Artifact, Target};
pub use crate::tree::FileTree;

/// The script generator: a shared output sink, the mode set fixed at
/// startup, and the targets declared so far.
///
/// Targets are finalized in declaration order by [`emit`](Self::emit),
/// which consumes the generator; a script is produced exactly once.
pub struct Cppbuild {
    sink: Rc<dyn CommandSink>,
    modes: Modes,
    select: bool,
    targets: Vec<Target>,
}

impl Cppbuild {
    pub fn new(sink: impl CommandSink, modes: Modes) -> Self {
        let sink = Rc::new(sink);
        Self {
            sink,
            modes,
            select: false,
            targets: Vec::new(),
        }
    }

    /// Wraps every target's block so the generated script selects one
    /// target by an argument supplied when the script itself is run.
    pub fn select_target(&mut self, enabled: bool) -> &mut Self {
        self.select = enabled;
        self
    }

    /// Declares a target. Declaration order is emission order.
    pub fn target(&mut self, target: Target) -> &mut Self {
        self.targets.push(target);
        self
    }

    /// Emits the script sections of every declared target for every active
    /// mode, in declaration order, into the shared sink.
    pub fn emit(self) {
        for target in self.targets {
            target.emit(&self.modes, self.select, &*self.sink);
        }
    }
}
