use alloc::string::String;
use core::fmt;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Path(String);

const SEP: &str = "/";
const SEP_CHR: char = '/';

/// Segment that `..` components are rewritten to by [`Path::confined`].
pub const ESCAPE_SENTINEL: &str = "__";

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.0)
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(path: impl AsRef<str>) -> Self {
        Self(path.as_ref().replace("\\", "/"))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        if path.is_empty() {
            return self.clone();
        }
        if self.0.is_empty() {
            return Self::from(path);
        }

        let mut new_path = String::from(self.0.trim_end_matches(SEP));
        new_path.push_str(SEP);
        new_path.push_str(path.trim_start_matches(SEP));
        Self::from(new_path)
    }

    /// The component after the last separator, or the whole path if there
    /// is no separator.
    pub fn file_name(&self) -> &str {
        match self.0.rfind(SEP_CHR) {
            Some(i) => &self.0[i + 1..],
            None => &self.0,
        }
    }

    /// Everything before the last separator. A path without any separator
    /// has no parent to name, so this degrades to the empty path.
    pub fn parent(&self) -> Self {
        match self.0.rfind(SEP_CHR) {
            Some(i) => Self(String::from(&self.0[..i])),
            None => Self::new(),
        }
    }

    /// Rewrites every `..` component to [`ESCAPE_SENTINEL`] so that joining
    /// the result under a directory can never resolve outside it.
    pub fn confined(&self) -> Self {
        let mut out = String::with_capacity(self.0.len());
        for (i, seg) in self.0.split(SEP_CHR).enumerate() {
            if i > 0 {
                out.push_str(SEP);
            }
            if seg == ".." {
                out.push_str(ESCAPE_SENTINEL);
            } else {
                out.push_str(seg);
            }
        }
        Self(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(Path::from("a").join("b").as_ref(), "a/b");
        assert_eq!(Path::from("a/").join("b").as_ref(), "a/b");
        assert_eq!(Path::new().join("b").as_ref(), "b");
        assert_eq!(Path::from("a").join("").as_ref(), "a");
        assert_eq!(Path::from("a").join("b/c").as_ref(), "a/b/c");
    }

    #[test]
    fn test_separator_normalization() {
        assert_eq!(Path::from("a\\b\\c").as_ref(), "a/b/c");
        assert_eq!(Path::from("a").join("b\\c").as_ref(), "a/b/c");
    }

    #[test]
    fn test_file_name_and_parent() {
        let p = Path::from("build/obj/main.cpp.o");
        assert_eq!(p.file_name(), "main.cpp.o");
        assert_eq!(p.parent().as_ref(), "build/obj");

        let bare = Path::from("main.cpp");
        assert_eq!(bare.file_name(), "main.cpp");
        assert_eq!(bare.parent().as_ref(), "");
    }

    #[test]
    fn test_confined() {
        assert_eq!(Path::from("../x.cpp").confined().as_ref(), "__/x.cpp");
        assert_eq!(
            Path::from("a/../../b.cpp").confined().as_ref(),
            "a/__/__/b.cpp"
        );
        assert_eq!(Path::from("a/b.cpp").confined().as_ref(), "a/b.cpp");
    }
}
