use std::cell::RefCell;
use std::rc::Rc;

use cppbuild::{CommandSink, Path};

/// Renders commands as a Windows batch script into a shared buffer. Clones
/// share the buffer, so the driver keeps one handle to read the finished
/// script after the builder has consumed its own.
#[derive(Clone)]
pub struct Batch {
    out: Rc<RefCell<String>>,
}

impl Batch {
    pub fn new() -> Self {
        let batch = Batch {
            out: Rc::new(RefCell::new(String::new())),
        };
        batch.push("@echo off");
        batch
    }

    pub fn script(&self) -> String {
        self.out.borrow().clone()
    }

    fn push(&self, line: impl AsRef<str>) {
        let mut out = self.out.borrow_mut();
        out.push_str(line.as_ref());
        out.push('\n');
    }
}

impl CommandSink for Batch {
    fn echo(&self, msg: &str) {
        self.push(format!("echo {msg}"));
    }

    fn blank(&self) {
        self.push("echo.");
    }

    fn make_dir(&self, dir: &Path) {
        self.push(format!("if not exist {dir} ("));
        self.push(format!("    mkdir {dir}"));
        self.push(")");
    }

    fn copy(&self, src: &Path, dst: &Path) {
        self.push(format!("copy {src} {dst}"));
    }

    fn delete(&self, path: &Path) {
        self.push(format!("del {path}"));
    }

    fn command(&self, line: &str) {
        self.push(line);
    }

    fn invoke(&self, path: &Path) {
        self.push(format!("call {path}"));
    }

    // The generated script's own %1 picks the target; mode selection
    // already happened at generation time.
    fn begin_target(&self, project: &str) {
        self.push(format!("if \"%1\"==\"\" goto target_{project}"));
        self.push(format!("if \"%1\"==\"{project}\" goto target_{project}"));
        self.push(format!("echo Skipping target \"{project}\""));
        self.push(format!("goto after_{project}"));
        self.push(format!(":target_{project}"));
    }

    fn end_target(&self, project: &str) {
        self.push(format!(":after_{project}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_one_script() {
        let batch = Batch::new();
        let handle = batch.clone();
        batch.echo("hello");
        batch.make_dir(&Path::from("build/obj"));
        assert_eq!(
            handle.script(),
            "@echo off\n\
             echo hello\n\
             if not exist build/obj (\n\
             \x20   mkdir build/obj\n\
             )\n"
        );
    }

    #[test]
    fn test_target_block_brackets_with_labels() {
        let batch = Batch::new();
        batch.begin_target("app");
        batch.invoke(&Path::from("build/app.exe"));
        batch.end_target("app");
        assert_eq!(
            batch.script(),
            "@echo off\n\
             if \"%1\"==\"\" goto target_app\n\
             if \"%1\"==\"app\" goto target_app\n\
             echo Skipping target \"app\"\n\
             goto after_app\n\
             :target_app\n\
             call build/app.exe\n\
             :after_app\n"
        );
    }
}
