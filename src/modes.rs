/// Which script sections get emitted, fixed once at startup.
///
/// Flags are independent and combinable. Emission always walks them in the
/// fixed order build, install, run, clean, test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modes {
    pub build: bool,
    pub install: bool,
    pub run: bool,
    pub clean: bool,
    pub test: bool,
}

impl Modes {
    /// Derives the mode set from command-line arguments (program name
    /// excluded). No arguments means build only; otherwise each recognized
    /// keyword enables its flag and anything else is ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut modes = Modes::default();
        let mut seen_any = false;

        for arg in args {
            seen_any = true;
            match arg.as_ref() {
                "build" => modes.build = true,
                "install" => modes.install = true,
                "run" => modes.run = true,
                "clean" => modes.clean = true,
                "test" => modes.test = true,
                _ => {}
            }
        }

        if !seen_any {
            modes.build = true;
        }
        modes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_defaults_to_build() {
        let modes = Modes::from_args::<_, &str>([]);
        assert_eq!(
            modes,
            Modes {
                build: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_keywords_combine() {
        let modes = Modes::from_args(["build", "run"]);
        assert!(modes.build);
        assert!(modes.run);
        assert!(!modes.install);
        assert!(!modes.clean);
        assert!(!modes.test);
    }

    #[test]
    fn test_unknown_args_are_ignored() {
        let modes = Modes::from_args(["--verbose", "deploy"]);
        assert_eq!(modes, Modes::default());
    }

    #[test]
    fn test_unknown_args_do_not_default_to_build() {
        let modes = Modes::from_args(["clean", "nonsense"]);
        assert!(modes.clean);
        assert!(!modes.build);
    }
}
