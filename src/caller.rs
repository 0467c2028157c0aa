use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Rendering used when nothing is known about the call site.
pub const UNKNOWN_CALLER: &str = "unknown:? unknown";

/// Source location of the code that produced a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    file: Option<&'static str>,
    line: u32,
    function: Option<&'static str>,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, function: Option<&'static str>) -> Self {
        Self { file: Some(file), line, function }
    }

    pub const fn unknown() -> Self {
        Self { file: None, line: 0, function: None }
    }

    /// Location of the caller of the outermost `#[track_caller]` function in
    /// the current chain, i.e. the application code calling into the logger.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line(), None)
    }

    /// Renders as `<file name>:<line> <function>`.
    pub fn resolve(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(file) = self.file else {
            return f.write_str(UNKNOWN_CALLER);
        };
        let base = Path::new(file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(file);
        let function = self.function.map(short_function_name).unwrap_or("unknown");
        write!(f, "{}:{} {}", base, self.line, function)
    }
}

/// Keeps the last two path segments (`module::function`) and strips
/// closure markers.
fn short_function_name(path: &'static str) -> &'static str {
    let mut path = path;
    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        path = stripped;
    }
    match path.rmatch_indices("::").nth(1) {
        Some((idx, _)) => &path[idx + 2..],
        None => path,
    }
}

/// Expands to the [`CallSite`] of the macro invocation, including the path
/// of the enclosing function.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        $crate::CallSite::new(
            file!(),
            line!(),
            Some(name.strip_suffix("::__here").unwrap_or(name)),
        )
    }};
}
