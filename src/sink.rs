use crate::path::Path;

/// Command emission abstraction for generated scripts
///
/// This trait is the seam between script synthesis and script syntax.
/// The core walks a target and decides *which* commands appear in *what*
/// order; an implementation of this trait decides how each command is
/// spelled for its interpreter (Windows batch, POSIX shell, a recording
/// buffer in tests, ...). Implementations append to their output and never
/// fail: any runtime failure belongs to the interpreter that eventually
/// runs the script, not to generation.
pub trait CommandSink: 'static {
    /// Emits a diagnostic line that the interpreter prints when the script
    /// runs.
    fn echo(&self, msg: &str);

    /// Emits a blank diagnostic line, used to separate script sections.
    fn blank(&self);

    /// Emits an idempotent "create this directory unless it already exists"
    /// command.
    ///
    /// # Arguments
    /// * `dir` - The directory to create, including any missing parents
    fn make_dir(&self, dir: &Path);

    /// Emits a file copy command.
    ///
    /// # Arguments
    /// * `src` - The file to copy
    /// * `dst` - The full destination path, including the file name
    fn copy(&self, src: &Path, dst: &Path);

    /// Emits a file deletion command.
    fn delete(&self, path: &Path);

    /// Emits a fully-formed command line (compiler, linker, or archiver
    /// invocation) verbatim.
    fn command(&self, line: &str);

    /// Emits an invocation of a built artifact.
    fn invoke(&self, path: &Path);

    /// Opens the selection wrapper around one target's whole block.
    ///
    /// Implementations should arrange for the block to run when the
    /// generated script's externally supplied target-name token is absent
    /// or equal to `project`, and to print a skip notice and jump past the
    /// block otherwise. Only called when target selection is enabled.
    fn begin_target(&self, project: &str);

    /// Closes the selection wrapper opened by
    /// [`begin_target`](Self::begin_target).
    fn end_target(&self, project: &str);
}
