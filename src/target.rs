use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::{String, ToString as _};
use alloc::vec;
use alloc::vec::Vec;

use indexmap::map::Entry;

use crate::modes::Modes;
use crate::path::Path;
use crate::sink::CommandSink;
use crate::tree::{FileTree, Map};

/// What kind of artifact a target produces. Determines output naming and
/// whether the final step links or archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Executable,
    SharedLibrary,
    StaticLibrary,
}

/// One compiled artifact: a source tree plus the build and install metadata
/// needed to synthesize its script sections.
///
/// A target is declared incrementally through the fluent methods, handed to
/// [`Cppbuild::target`](crate::Cppbuild::target), and consumed exactly once
/// when the script is emitted.
#[derive(Debug, Clone)]
pub struct Target {
    project: String,
    artifact: Artifact,
    sources: FileTree,
    root: Path,
    include_dirs: Vec<Path>,
    libraries: Vec<String>,
    library_dirs: Vec<Path>,
    compiler_flags: String,
    linker_flags: String,
    install_dir: Path,
    target_install_dir: Path,
    install_files: Map<FileTree>,
}

impl Target {
    pub fn new(project: impl Into<String>, artifact: Artifact) -> Self {
        Self {
            project: project.into(),
            artifact,
            sources: FileTree::root(),
            root: Path::from("build"),
            include_dirs: Vec::new(),
            libraries: Vec::new(),
            library_dirs: Vec::new(),
            compiler_flags: String::from("--std=c++11"),
            linker_flags: String::new(),
            install_dir: Path::new(),
            target_install_dir: Path::new(),
            install_files: Map::default(),
        }
    }

    /// Output root directory for objects and artifacts. Defaults to
    /// `"build"`.
    pub fn root(&mut self, dir: impl AsRef<str>) -> &mut Self {
        self.root = Path::from(dir.as_ref());
        self
    }

    /// Declares source files on the target's root node.
    pub fn files<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sources.add_files(names);
        self
    }

    /// Declares a source subfolder; a folder of the same name is merged.
    pub fn folder(&mut self, folder: FileTree) -> &mut Self {
        self.sources.add_folder(folder);
        self
    }

    pub fn include_dirs<I, S>(&mut self, dirs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for dir in dirs {
            self.include_dirs.push(Path::from(dir.as_ref()));
        }
        self
    }

    pub fn libraries<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.libraries.push(name.as_ref().into());
        }
        self
    }

    pub fn library_dirs<I, S>(&mut self, dirs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for dir in dirs {
            self.library_dirs.push(Path::from(dir.as_ref()));
        }
        self
    }

    /// Appends compiler flag tokens, whitespace-joined onto the accumulated
    /// flag string.
    pub fn compiler_flags<I, S>(&mut self, flags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for flag in flags {
            if !self.compiler_flags.is_empty() {
                self.compiler_flags.push(' ');
            }
            self.compiler_flags.push_str(flag.as_ref());
        }
        self
    }

    /// Appends linker flag tokens, whitespace-joined onto the accumulated
    /// flag string.
    pub fn linker_flags<I, S>(&mut self, flags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for flag in flags {
            if !self.linker_flags.is_empty() {
                self.linker_flags.push(' ');
            }
            self.linker_flags.push_str(flag.as_ref());
        }
        self
    }

    /// Root directory the install section copies into.
    pub fn install_dir(&mut self, dir: impl AsRef<str>) -> &mut Self {
        self.install_dir = Path::from(dir.as_ref());
        self
    }

    /// Subdirectory of the install root that receives the built artifact.
    pub fn install_target_into(&mut self, dir: impl AsRef<str>) -> &mut Self {
        self.target_install_dir = Path::from(dir.as_ref());
        self
    }

    /// Maps a file subtree onto a destination below the install root. A
    /// destination declared twice is merged, never rejected.
    pub fn install_tree(&mut self, destination: impl AsRef<str>, tree: FileTree) -> &mut Self {
        let destination = Path::from(destination.as_ref()).to_string();
        match self.install_files.entry(destination) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().merge(tree);
            }
            Entry::Vacant(slot) => {
                slot.insert(tree);
            }
        }
        self
    }

    /// Convenience form of [`install_tree`](Self::install_tree) for a bare
    /// file list.
    pub fn install_files<I, S>(&mut self, destination: impl AsRef<str>, files: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.install_tree(destination, FileTree::root().with_files(files))
    }

    /// Path of the final artifact, deterministic by artifact type.
    pub fn output_file(&self) -> Path {
        match self.artifact {
            Artifact::Executable => self.root.join(format!("{}.exe", self.project)),
            Artifact::SharedLibrary => self.root.join(format!("lib{}.dll", self.project)),
            Artifact::StaticLibrary => self.root.join(format!("lib{}.a", self.project)),
        }
    }

    /// Object file path for one source file: `<root>/obj/<source>.o`, with
    /// parent-directory escapes confined so the object tree stays under the
    /// root no matter how far outside the project a source path reaches.
    pub fn object_path(&self, source: &Path) -> Path {
        self.root
            .join("obj")
            .join(format!("{}.o", source.confined()))
    }

    /// Emits every section whose mode flag is set, in the fixed order
    /// build, install, run, clean, test. Consumes the target: emission is
    /// one-shot.
    ///
    /// With `select` enabled the whole block is wrapped so the generated
    /// script can be pointed at a single target at invocation time.
    pub fn emit(self, modes: &Modes, select: bool, sink: &dyn CommandSink) {
        if select {
            sink.begin_target(&self.project);
        }

        if modes.build {
            self.banner(sink, "build");
            self.emit_build(sink);
        }
        if modes.install {
            self.banner(sink, "install");
            self.emit_install(sink);
        }
        if modes.run {
            self.banner(sink, "run");
            self.emit_run(sink);
        }
        if modes.clean {
            self.banner(sink, "clean");
            self.emit_clean(sink);
        }
        if modes.test {
            self.banner(sink, "test");
            self.emit_test(sink);
        }

        if select {
            sink.end_target(&self.project);
        }
    }

    fn banner(&self, sink: &dyn CommandSink, mode: &str) {
        sink.blank();
        sink.echo(&format!(
            "Executing {mode} script for target \"{}\"",
            self.project
        ));
    }

    fn emit_build(&self, sink: &dyn CommandSink) {
        let obj_root = self.root.join("obj");

        // The folders declared in the source tree and the parents of the
        // derived object paths can diverge (escape confinement, files named
        // with embedded separators), so the creation set is the union of
        // both, deduplicated and emitted in lexicographic order.
        let mut dirs = BTreeSet::new();
        for folder in self.sources.all_folders("") {
            dirs.insert(obj_root.join(&folder));
        }
        for source in self.sources.all_files("") {
            let parent = self.object_path(&source).parent();
            if !parent.is_empty() {
                dirs.insert(parent);
            }
        }
        for dir in &dirs {
            sink.echo(&format!("Creating folder \"{dir}\""));
            sink.make_dir(dir);
        }

        let sources: Vec<Path> = self.sources.all_files("").collect();
        let total = sources.len();
        for (index, source) in sources.iter().enumerate() {
            sink.echo(&format!(
                "[{:>3}%] Compiling \"{source}\"",
                progress(index, total)
            ));
            sink.command(&self.compile_command(source));
        }

        let output = self.output_file();
        let objects = sources.iter().map(|s| self.object_path(s).to_string());

        match self.artifact {
            Artifact::Executable => {
                sink.echo(&format!("[100%] Linking executable \"{output}\""));
                sink.command(&self.link_command(&output, objects, false));
            }
            Artifact::SharedLibrary => {
                sink.echo(&format!("[100%] Linking shared library \"{output}\""));
                sink.command(&self.link_command(&output, objects, true));
            }
            Artifact::StaticLibrary => {
                sink.echo(&format!("[100%] Linking static library \"{output}\""));
                let mut cmd = vec!["ar".to_string(), "rvs".to_string(), output.to_string()];
                cmd.extend(objects);
                sink.command(&cmd.join(" "));
            }
        }
    }

    fn compile_command(&self, source: &Path) -> String {
        let mut cmd = vec!["g++".to_string()];
        cmd.extend(self.compiler_flags.split_whitespace().map(String::from));
        cmd.push(source.to_string());
        cmd.push("-c".to_string());
        cmd.push("-o".to_string());
        cmd.push(self.object_path(source).to_string());
        for dir in &self.include_dirs {
            cmd.push(format!("-I{dir}"));
        }
        cmd.join(" ")
    }

    fn link_command(
        &self,
        output: &Path,
        objects: impl Iterator<Item = String>,
        shared: bool,
    ) -> String {
        let mut cmd = vec!["g++".to_string()];
        cmd.extend(self.linker_flags.split_whitespace().map(String::from));
        if shared {
            cmd.push("-shared".to_string());
        }
        cmd.push("-o".to_string());
        cmd.push(output.to_string());
        cmd.extend(objects);
        for dir in &self.library_dirs {
            cmd.push(format!("-L{dir}"));
        }
        for lib in &self.libraries {
            cmd.push(format!("-l{lib}"));
        }
        cmd.join(" ")
    }

    fn emit_install(&self, sink: &dyn CommandSink) {
        let destination = self.install_dir.join(&self.target_install_dir);
        self.copy_into(sink, &self.output_file(), &destination);

        for (subdir, tree) in &self.install_files {
            let destination = self.install_dir.join(subdir);
            for file in tree.all_files("") {
                self.copy_into(sink, &file, &destination);
            }
        }
    }

    // Installed files keep only their base name at the destination; any
    // directory structure under the mapping subtree is flattened.
    fn copy_into(&self, sink: &dyn CommandSink, file: &Path, destination: &Path) {
        sink.echo(&format!("Copying \"{file}\""));
        sink.copy(file, &destination.join(file.file_name()));
    }

    fn emit_run(&self, sink: &dyn CommandSink) {
        if self.artifact == Artifact::Executable {
            sink.invoke(&self.output_file());
        } else {
            sink.echo("This target is not an executable.");
        }
    }

    fn emit_clean(&self, sink: &dyn CommandSink) {
        let obj_root = self.root.join("obj");

        // Object names are derived from each file's base name alone here,
        // unlike the compile step, which uses the full relative path.
        for file in self.sources.all_files("") {
            self.remove(sink, &obj_root.join(format!("{}.o", file.file_name())));
        }
        self.remove(sink, &self.output_file());
    }

    fn remove(&self, sink: &dyn CommandSink, path: &Path) {
        sink.echo(&format!("Removing \"{path}\""));
        sink.delete(path);
    }

    // Reserved extension point: no test runner exists yet, so the section
    // body is empty.
    fn emit_test(&self, _sink: &dyn CommandSink) {}
}

/// Compile-step progress in percent: `round(100·(index+1)/(total+1))`,
/// rounding half down and clamped to 99. From 200 files up the true value
/// of the last steps rounds to 100 under any tie rule, and compile steps
/// must stay strictly below 100; only the link step reports 100.
fn progress(index: usize, total: usize) -> usize {
    ((200 * (index + 1) + total) / (2 * (total + 1))).min(99)
}
