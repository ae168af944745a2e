use alloc::string::{String, ToString as _};
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::path::Path;

/// Insertion-ordered map used for folder children and install mappings.
pub(crate) type Map<V> = IndexMap<String, V, DefaultHashBuilder>;

/// An ownership tree of directory nodes and file leaves.
///
/// Each node owns its children, keyed by name, and an ordered list of file
/// names. File names may themselves contain separators ("utils/helper.cpp");
/// such a file stays a single leaf and its path flows through traversal
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    name: String,
    folders: Map<FileTree>,
    files: Vec<String>,
}

impl FileTree {
    /// An unnamed root node. Its own name contributes nothing to any path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a node from a name, which may be a slash-separated path:
    /// `"a/b/c"` produces a node named `"a"` holding a single-child chain
    /// for `"b/c"`.
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = Path::from(name.as_ref());
        let raw = name.as_ref();

        match raw.split_once('/') {
            Some((head, rest)) => {
                let mut tree = FileTree {
                    name: head.to_string(),
                    ..Default::default()
                };
                if !rest.is_empty() {
                    let child = FileTree::new(rest);
                    tree.folders.insert(child.name.clone(), child);
                }
                tree
            }
            None => FileTree {
                name: raw.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends file leaves to this node, in order. Duplicates are kept.
    pub fn add_files<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.files.push(Path::from(name.as_ref()).to_string());
        }
        self
    }

    /// Owned variant of [`add_files`](Self::add_files) for building subtrees
    /// to pass into [`add_folder`](Self::add_folder).
    pub fn with_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_files(names);
        self
    }

    /// Inserts a child node. A child with the same name is merged, never
    /// rejected.
    pub fn add_folder(&mut self, folder: FileTree) -> &mut Self {
        match self.folders.entry(folder.name.clone()) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().merge(folder);
            }
            Entry::Vacant(slot) => {
                slot.insert(folder);
            }
        }
        self
    }

    /// Inserts a child named `name` (path shorthand allowed) holding
    /// `files`, merging on collision.
    pub fn add_folder_files<I, S>(&mut self, name: impl AsRef<str>, files: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_folder(FileTree::new(name).with_files(files))
    }

    /// Unions `other` into this node: `other`'s files are appended to this
    /// node's file list (duplicates preserved), colliding children are merged
    /// recursively, and the rest are inserted unchanged.
    pub fn merge(&mut self, other: FileTree) -> &mut Self {
        self.files.extend(other.files);
        for (name, folder) in other.folders {
            match self.folders.entry(name) {
                Entry::Occupied(mut existing) => {
                    existing.get_mut().merge(folder);
                }
                Entry::Vacant(slot) => {
                    slot.insert(folder);
                }
            }
        }
        self
    }

    /// Full path of every file in the tree, depth-first preorder: a node's
    /// own files before its subfolders, both in declaration order. The
    /// iterator is lazy; call again to restart.
    pub fn all_files(&self, prefix: impl AsRef<str>) -> Files<'_> {
        Files {
            stack: vec![FileFrame {
                node: self,
                path: Path::from(prefix.as_ref()).join(&self.name),
                next_file: 0,
                next_child: 0,
            }],
        }
    }

    /// Path of every non-root node in the tree, preorder. These are the
    /// directories that must exist before any file can be written under them.
    pub fn all_folders(&self, prefix: impl AsRef<str>) -> Folders<'_> {
        Folders {
            stack: vec![FolderFrame {
                node: self,
                path: Path::from(prefix.as_ref()).join(&self.name),
                visited: false,
                next_child: 0,
            }],
        }
    }
}

struct FileFrame<'a> {
    node: &'a FileTree,
    path: Path,
    next_file: usize,
    next_child: usize,
}

/// Lazy depth-first walk over file paths. See [`FileTree::all_files`].
pub struct Files<'a> {
    stack: Vec<FileFrame<'a>>,
}

impl Iterator for Files<'_> {
    type Item = Path;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.node;

            if let Some(file) = node.files.get(frame.next_file) {
                frame.next_file += 1;
                return Some(frame.path.join(file));
            }

            match node.folders.get_index(frame.next_child) {
                Some((_, child)) => {
                    frame.next_child += 1;
                    let path = frame.path.join(&child.name);
                    self.stack.push(FileFrame {
                        node: child,
                        path,
                        next_file: 0,
                        next_child: 0,
                    });
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

struct FolderFrame<'a> {
    node: &'a FileTree,
    path: Path,
    visited: bool,
    next_child: usize,
}

/// Lazy depth-first walk over directory paths. See [`FileTree::all_folders`].
pub struct Folders<'a> {
    stack: Vec<FolderFrame<'a>>,
}

impl Iterator for Folders<'_> {
    type Item = Path;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.node;

            if !frame.visited {
                frame.visited = true;
                if !node.name.is_empty() {
                    return Some(frame.path.clone());
                }
            }

            match node.folders.get_index(frame.next_child) {
                Some((_, child)) => {
                    frame.next_child += 1;
                    let path = frame.path.join(&child.name);
                    self.stack.push(FolderFrame {
                        node: child,
                        path,
                        visited: false,
                        next_child: 0,
                    });
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(iter: impl Iterator<Item = Path>) -> Vec<String> {
        iter.map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_path_shorthand() {
        let mut tree = FileTree::new("a/b/c");
        assert_eq!(tree.name(), "a");
        tree.add_files(["top.cpp"]);

        assert_eq!(paths(tree.all_files("")), ["a/top.cpp"]);
        assert_eq!(paths(tree.all_folders("")), ["a", "a/b", "a/b/c"]);
    }

    #[test]
    fn test_all_files_preorder() {
        let mut tree = FileTree::root();
        tree.add_files(["main.cpp"])
            .add_folder(FileTree::new("utils").with_files(["helper.cpp", "log.cpp"]))
            .add_folder(FileTree::new("net").with_files(["socket.cpp"]));

        assert_eq!(
            paths(tree.all_files("")),
            ["main.cpp", "utils/helper.cpp", "utils/log.cpp", "net/socket.cpp"]
        );
        assert_eq!(paths(tree.all_folders("")), ["utils", "net"]);
    }

    #[test]
    fn test_all_files_with_prefix() {
        let tree = FileTree::new("src").with_files(["main.cpp"]);
        assert_eq!(paths(tree.all_files("top")), ["top/src/main.cpp"]);
        assert_eq!(paths(tree.all_folders("top")), ["top/src"]);
    }

    #[test]
    fn test_iterators_restart() {
        let tree = FileTree::new("src").with_files(["a.cpp", "b.cpp"]);
        let first = paths(tree.all_files(""));
        let second = paths(tree.all_files(""));
        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_non_colliding() {
        let mut a = FileTree::root();
        a.add_folder(FileTree::new("one").with_files(["one.cpp"]))
            .add_folder(FileTree::new("two").with_files(["two.cpp"]));

        let mut b = FileTree::root();
        b.add_folder(FileTree::new("three").with_files(["three.cpp"]));

        let mut expected = paths(a.all_files(""));
        expected.extend(paths(b.all_files("")));

        a.merge(b);
        assert_eq!(paths(a.all_files("")), expected);
        assert_eq!(paths(a.all_folders("")), ["one", "two", "three"]);
    }

    #[test]
    fn test_merge_colliding_child_concatenates_files() {
        let mut a = FileTree::root();
        a.add_folder(FileTree::new("shared").with_files(["a.cpp"]));

        let mut b = FileTree::root();
        b.add_folder(FileTree::new("shared").with_files(["b.cpp", "a.cpp"]));

        a.merge(b);

        // Duplicates preserved, both sides' files concatenated in order.
        assert_eq!(
            paths(a.all_files("")),
            ["shared/a.cpp", "shared/b.cpp", "shared/a.cpp"]
        );
        assert_eq!(paths(a.all_folders("")), ["shared"]);
    }

    #[test]
    fn test_add_folder_merges_duplicates() {
        let mut tree = FileTree::root();
        tree.add_folder(FileTree::new("utils").with_files(["a.cpp"]));
        tree.add_folder_files("utils", ["b.cpp"]);

        assert_eq!(paths(tree.all_files("")), ["utils/a.cpp", "utils/b.cpp"]);
    }
}
