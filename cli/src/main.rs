mod batch;
mod cli;

use std::fs;

use anyhow::Context;
use cppbuild::{Artifact, Cppbuild, FileTree, Modes, Target};

fn main() -> anyhow::Result<()> {
    let args = cli::parse();
    let modes = Modes::from_args(&args.modes);

    let batch = batch::Batch::new();
    let mut build = Cppbuild::new(batch.clone(), modes);
    build.select_target(args.select);
    describe(&mut build);
    build.emit();

    match args.output {
        Some(path) => fs::write(&path, batch.script())
            .with_context(|| format!("writing script to {}", path.display()))?,
        None => print!("{}", batch.script()),
    }

    Ok(())
}

/// Example project description. Downstream users depend on the `cppbuild`
/// library and write a driver shaped like this one for their own tree.
fn describe(build: &mut Cppbuild) {
    let mut app = Target::new("app", Artifact::Executable);
    app.files(["main.cpp"])
        .folder(FileTree::new("utils").with_files(["helper.cpp", "log.cpp"]))
        .include_dirs(["include"])
        .libraries(["m"])
        .install_dir("dist")
        .install_target_into("bin")
        .install_files("share/doc", ["README.md"]);
    build.target(app);

    let mut core = Target::new("core", Artifact::StaticLibrary);
    core.folder(FileTree::new("core").with_files(["engine.cpp", "state.cpp"]))
        .include_dirs(["include"])
        .install_dir("dist")
        .install_target_into("lib");
    build.target(core);
}
